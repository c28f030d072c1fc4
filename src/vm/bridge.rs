//! VM桥接层：连接Slint UI与各面板数据模型
//!
//! 注意：此模块的具体实现在main.rs中，因为依赖于Slint生成的类型
//! 这里只提供公共常量

// === 状态栏文案（消除魔法值） ===
pub const STATUS_READY: &str = "就绪";
pub const STATUS_FORMATTED: &str = "格式化完成";
pub const STATUS_PARSED: &str = "解析完成";
pub const STATUS_COPIED: &str = "已复制到剪贴板";
pub const STATUS_EXPORTED: &str = "已导出";
pub const STATUS_ERROR_PREFIX: &str = "错误: ";

// === 持久化键名（沿用 jsonStudio 命名空间，每个面板独立） ===
pub const KEY_BEAUTIFY_INPUT: &str = "jsonStudio-beautify-input";
pub const KEY_BEAUTIFY_OUTPUT: &str = "jsonStudio-beautify-output";
pub const KEY_BEAUTIFY_MINIFIED: &str = "jsonStudio-beautify-minified";
pub const KEY_TREE_INPUT: &str = "jsonStudio-tree-input";
pub const KEY_TREE_PARSED: &str = "jsonStudio-tree-parsed";
pub const KEY_TREE_EXPANDED: &str = "jsonStudio-tree-expanded";
pub const KEY_COMPARE_LEFT: &str = "jsonStudio-compare-left";
pub const KEY_COMPARE_RIGHT: &str = "jsonStudio-compare-right";
