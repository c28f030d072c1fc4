//! 平面字符串键值存储：浏览器 localStorage 的桌面替身
//!
//! 整个存储是一个 JSON 对象文件，键值都是普通字符串。每次写入立即落盘，
//! 启动时整体读入；文件缺失或损坏按空表处理（静默吸收，不上抛）。

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO失败: {0}")]
    Io(#[from] std::io::Error),
    #[error("序列化失败: {0}")]
    Serde(#[from] serde_json::Error),
}

#[derive(Debug)]
pub struct Storage {
    path: PathBuf,
    map: BTreeMap<String, String>,
}

impl Storage {
    /// 打开指定路径的存储文件；不存在或解析失败时从空表开始
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let map = match File::open(&path) {
            Ok(f) => match serde_json::from_reader(BufReader::new(f)) {
                Ok(m) => m,
                Err(e) => {
                    tracing::warn!("存储文件损坏，按空表处理: {}", e);
                    BTreeMap::new()
                }
            },
            Err(_) => BTreeMap::new(),
        };
        Self { path, map }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.map.get(key).map(String::as_str)
    }

    /// 读取布尔标志；存储层只有字符串，"true" 之外一律视为 false
    pub fn get_bool(&self, key: &str) -> bool {
        self.get(key) == Some("true")
    }

    /// 写入并立即落盘
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.map.insert(key.to_string(), value.to_string());
        self.flush()
    }

    pub fn set_bool(&mut self, key: &str, value: bool) -> Result<(), StorageError> {
        self.set(key, if value { "true" } else { "false" })
    }

    /// 删除键并立即落盘；键不存在时也是成功
    pub fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.map.remove(key);
        self.flush()
    }

    fn flush(&self) -> Result<(), StorageError> {
        let f = File::create(&self.path)?;
        serde_json::to_writer_pretty(f, &self.map)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_store() -> (TempDir, Storage) {
        let dir = TempDir::new().expect("创建临时目录失败");
        let store = Storage::open(dir.path().join("state.json"));
        (dir, store)
    }

    #[test]
    fn test_set_then_get() {
        let (_dir, mut store) = temp_store();
        store.set("jsonStudio-beautify-input", "{\"a\":1}").expect("写入应该成功");
        assert_eq!(store.get("jsonStudio-beautify-input"), Some("{\"a\":1}"));
    }

    #[test]
    fn test_reopen_restores_exact_string() {
        let (dir, mut store) = temp_store();
        let text = "{\n  \"用户\": \"张三\"\n}";
        store.set("jsonStudio-tree-input", text).expect("写入应该成功");
        // 模拟重启：重新打开同一个文件
        let reopened = Storage::open(dir.path().join("state.json"));
        assert_eq!(reopened.get("jsonStudio-tree-input"), Some(text), "重启后应该恢复完全相同的字符串");
    }

    #[test]
    fn test_remove_persists() {
        let (dir, mut store) = temp_store();
        store.set("k", "v").unwrap();
        store.remove("k").expect("删除应该成功");
        assert_eq!(store.get("k"), None);
        let reopened = Storage::open(dir.path().join("state.json"));
        assert_eq!(reopened.get("k"), None, "删除应该持久化");
    }

    #[test]
    fn test_bool_flags_round_trip() {
        let (dir, mut store) = temp_store();
        store.set_bool("jsonStudio-beautify-minified", true).unwrap();
        assert!(store.get_bool("jsonStudio-beautify-minified"));
        let reopened = Storage::open(dir.path().join("state.json"));
        assert!(reopened.get_bool("jsonStudio-beautify-minified"));
        assert!(!reopened.get_bool("不存在的键"), "缺失的标志应该按 false 处理");
    }

    #[test]
    fn test_missing_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        let store = Storage::open(dir.path().join("没有这个文件.json"));
        assert_eq!(store.get("任意键"), None);
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "{bad json").unwrap();
        let store = Storage::open(&path);
        assert_eq!(store.get("任意键"), None, "损坏的存储文件应该按空表处理");
    }
}
