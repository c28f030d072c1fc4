//! JSON Studio 工具库
//!
//! 提供三个互不依赖的面板：格式化/压缩、可折叠树视图、按行对比
//! 遵循MVVM架构模式，面板状态均为纯状态对象，可脱离渲染层测试

pub mod model;
pub mod utils;
pub mod vm;

// 重新导出主要类型
pub use model::beautify::{line_count, BeautifyState, INVALID_JSON};
pub use model::compare::{diff_lines, CompareState, LineDiff};
pub use model::tree::{build_tree, NodeKind, TreeNode, TreeState};
pub use utils::storage::{Storage, StorageError};
