//! 状态存储 - 基础设施层
//!
//! 持有"按键读写本地状态"的能力，不认识历史记录 / 主题这些业务概念。
//! 核心逻辑通过 trait 注入存储，测试用内存实现即可跑通。

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::error::{AppError, AppResult};

/// 历史记录的存储键
pub const HISTORY_KEY: &str = "ai-coach-history";
/// 主题偏好的存储键
pub const THEME_KEY: &str = "ai-coach-theme";

/// 状态存储能力
///
/// 职责：
/// - 按键读 / 写 / 删字符串值（值本身是 JSON 文本，这里不关心格式）
/// - 不出现 HistoryItem / Theme
/// - 不关心流程顺序
pub trait StateStore: Send + Sync {
    /// 读取键对应的值，键不存在时返回 None
    fn read(&self, key: &str) -> AppResult<Option<String>>;

    /// 写入键对应的值（覆盖已有值）
    fn write(&self, key: &str, value: &str) -> AppResult<()>;

    /// 删除键（键不存在视为成功）
    fn clear(&self, key: &str) -> AppResult<()>;
}

/// 本地文件存储
///
/// 每个键对应状态目录下的一个 JSON 文件。
pub struct LocalStateStore {
    dir: PathBuf,
}

impl LocalStateStore {
    /// 创建本地存储，目录不存在时自动创建
    pub fn new(dir: impl Into<PathBuf>) -> AppResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| {
            AppError::Storage(crate::error::StorageError::InitFailed {
                path: dir.display().to_string(),
                source: Box::new(e),
            })
        })?;
        Ok(Self { dir })
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl StateStore for LocalStateStore {
    fn read(&self, key: &str) -> AppResult<Option<String>> {
        match std::fs::read_to_string(self.key_path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::storage_read_failed(key, e)),
        }
    }

    fn write(&self, key: &str, value: &str) -> AppResult<()> {
        std::fs::write(self.key_path(key), value)
            .map_err(|e| AppError::storage_write_failed(key, e))
    }

    fn clear(&self, key: &str) -> AppResult<()> {
        match std::fs::remove_file(self.key_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Storage(crate::error::StorageError::ClearFailed {
                key: key.to_string(),
                source: Box::new(e),
            })),
        }
    }
}

/// 内存存储
///
/// 供测试和一次性运行使用，不落盘。
#[derive(Default)]
pub struct MemoryStateStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStateStore {
    fn read(&self, key: &str) -> AppResult<Option<String>> {
        let entries = self.entries.lock().unwrap_or_else(|p| p.into_inner());
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> AppResult<()> {
        let mut entries = self.entries.lock().unwrap_or_else(|p| p.into_inner());
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear(&self, key: &str) -> AppResult<()> {
        let mut entries = self.entries.lock().unwrap_or_else(|p| p.into_inner());
        entries.remove(key);
        Ok(())
    }
}
