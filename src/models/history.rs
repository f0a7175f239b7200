//! 历史记录数据模型
//!
//! 每条 HistoryItem 是一次"提交 → 应答"的不可变快照，
//! 活跃列表最多保留 10 条，最新的在最前面。

use serde::{Deserialize, Serialize};

use crate::models::subject::SubjectMode;

/// 历史记录的容量上限
pub const HISTORY_CAP: usize = 10;

/// 图片附件（data URI 形式）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageAttachment {
    /// 文件名（仅用于展示）
    pub name: String,
    /// data: 开头的 URI
    pub src: String,
}

impl ImageAttachment {
    pub fn new(name: impl Into<String>, src: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            src: src.into(),
        }
    }
}

/// 一次提交/应答的历史快照
///
/// 字段名保持原有 JSON 格式（`aiText` 等），保证已保存的记录可以继续读。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryItem {
    /// 唯一 ID（毫秒时间戳）
    pub id: i64,
    /// 人类可读的时间
    pub timestamp: String,
    /// 科目模式
    pub mode: SubjectMode,
    /// 学生的提问
    pub ask: String,
    /// 提交的作业文本
    pub code: String,
    /// 图片附件
    pub images: Vec<ImageAttachment>,
    /// AI 的应答文本（失败时为 "Oops — " 开头的错误提示）
    #[serde(rename = "aiText")]
    pub ai_text: String,
}

impl HistoryItem {
    /// 从当前工作状态创建一份快照
    ///
    /// 图片列表会被完整克隆，之后工作状态的任何修改都不影响这条记录。
    pub fn snapshot(
        mode: SubjectMode,
        ask: &str,
        code: &str,
        images: &[ImageAttachment],
        ai_text: &str,
    ) -> Self {
        Self {
            id: chrono::Utc::now().timestamp_millis(),
            timestamp: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            mode,
            ask: ask.to_string(),
            code: code.to_string(),
            images: images.to_vec(),
            ai_text: ai_text.to_string(),
        }
    }
}
