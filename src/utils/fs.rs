//! IO helper: 导出文件与状态文件路径

use std::io::Write;
use std::path::{Path, PathBuf};
use std::{env, fs::File};

/// 导出时的默认文件名
pub const EXPORT_FILE_NAME: &str = "beautified.json";

/// 将格式化输出写入用户选择的路径
pub fn export_text(p: &Path, text: &str) -> std::io::Result<()> {
    let mut f = File::create(p)?;
    f.write_all(text.as_bytes())?;
    Ok(())
}

/// 面板状态文件的位置：可执行文件旁边，取不到时退回当前目录
pub fn default_state_path() -> PathBuf {
    env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("json-studio-state.json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_export_writes_exact_bytes() {
        let dir = TempDir::new().expect("创建临时目录失败");
        let path = dir.path().join(EXPORT_FILE_NAME);
        let text = "{\n  \"a\": 1\n}";
        export_text(&path, text).expect("导出应该成功");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), text, "导出内容应该逐字节一致");
    }

    #[test]
    fn test_default_state_path_has_fixed_name() {
        let p = default_state_path();
        assert_eq!(p.file_name().unwrap(), "json-studio-state.json");
    }
}
