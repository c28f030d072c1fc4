//! 外部协作者：存储、剪贴板、文件IO

pub mod clipboard;
pub mod fs;
pub mod storage;
