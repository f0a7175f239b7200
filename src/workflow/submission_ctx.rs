//! 提交处理上下文
//!
//! 封装"我正在处理第几份、哪一份提交"这一信息

use std::fmt::Display;

use crate::models::subject::SubjectMode;

/// 提交处理上下文
///
/// 包含处理单份提交所需的所有上下文信息
#[derive(Debug, Clone)]
pub struct SubmissionCtx {
    /// 提交名称（来自文件名或 name 字段）
    pub name: String,

    /// 提交在本批次中的索引（从1开始，仅用于日志显示）
    pub submission_index: usize,

    /// 本批次的提交总数
    pub total: usize,

    /// 科目模式
    pub mode: SubjectMode,
}

impl SubmissionCtx {
    /// 创建新的提交上下文
    pub fn new(name: String, submission_index: usize, total: usize, mode: SubjectMode) -> Self {
        Self {
            name,
            submission_index,
            total,
            mode,
        }
    }
}

impl Display for SubmissionCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[提交 {}/{} 名称#{} 科目#{}]",
            self.submission_index,
            self.total,
            self.name,
            self.mode.code()
        )
    }
}
