//! 美化面板状态：JSON 格式化与压缩
//!
//! 纯状态对象 + 纯更新函数，不依赖渲染层，可独立测试

use serde_json::Value;

/// 解析失败时展示给用户的哨兵文本（不是错误，是界面值）
pub const INVALID_JSON: &str = "Invalid JSON";

#[derive(Debug, Default, Clone)]
pub struct BeautifyState {
    /// 用户粘贴的原始文本
    pub input: String,
    /// 当前输出（格式化结果或哨兵文本）
    pub output: String,
    /// 当前输出是否为压缩形态
    pub minified: bool,
}

/// 双重回退解析：优先解析 input，失败后再尝试上一次的 output
fn parse_with_fallback(input: &str, fallback: &str) -> Option<Value> {
    serde_json::from_str(input)
        .or_else(|_| serde_json::from_str(fallback))
        .ok()
}

/// 2空格缩进的格式化；serde_json 序列化不会失败于已解析的 Value
fn pretty(v: &Value) -> String {
    serde_json::to_string_pretty(v).unwrap_or_else(|_| INVALID_JSON.to_string())
}

/// 零空白的压缩序列化
fn minify(v: &Value) -> String {
    serde_json::to_string(v).unwrap_or_else(|_| INVALID_JSON.to_string())
}

/// 行号侧栏的行数：按换行拆分，至少为 1（空文本也显示首行行号）
pub fn line_count(text: &str) -> usize {
    text.split('\n').count().max(1)
}

impl BeautifyState {
    /// 格式化：解析成功则 2 空格缩进输出，两次解析都失败则输出哨兵文本。
    /// 压缩标志保持不变。
    pub fn format(&mut self) {
        self.output = match parse_with_fallback(&self.input, &self.output) {
            Some(v) => pretty(&v),
            None => INVALID_JSON.to_string(),
        };
    }

    /// 在压缩与格式化之间切换，返回切换后的压缩标志。
    /// 解析失败时输出哨兵文本且标志不变。
    pub fn toggle_minify(&mut self) -> bool {
        match parse_with_fallback(&self.input, &self.output) {
            Some(v) => {
                if self.minified {
                    self.output = pretty(&v);
                    self.minified = false;
                } else {
                    self.output = minify(&v);
                    self.minified = true;
                }
            }
            None => {
                self.output = INVALID_JSON.to_string();
            }
        }
        self.minified
    }
}
