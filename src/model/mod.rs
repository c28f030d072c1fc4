//! 数据模型层：三个互不依赖的面板状态

pub mod beautify;
pub mod compare;
pub mod tree;
