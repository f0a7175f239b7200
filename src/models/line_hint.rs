//! 行号提示数据模型
//!
//! LineHint 表示"值得关注的行号范围"；LocatorResult 是定位服务
//! 一次应答解析后的完整结果。

use serde::{Deserialize, Serialize};

/// 行号提示（闭区间，行号从 1 开始）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineHint {
    /// 起始行（≥ 1）
    pub start: usize,
    /// 结束行（≥ start）
    pub end: usize,
    /// 可选的原因说明
    pub reason: Option<String>,
}

impl LineHint {
    /// 创建不带原因的行号提示
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            reason: None,
        }
    }

    /// 创建带原因的行号提示
    pub fn with_reason(start: usize, end: usize, reason: impl Into<String>) -> Self {
        Self {
            start,
            end,
            reason: Some(reason.into()),
        }
    }
}

/// 定位结果
///
/// `ranges` 是模型标记的原始范围（已归一化，供逐行分类使用）；
/// `windows` 是按"前后各扩一行"加宽后的展示窗口（供摘录渲染使用）；
/// `note` 在没有精确范围时携带说明文字。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocatorResult {
    pub ranges: Vec<LineHint>,
    pub windows: Vec<LineHint>,
    pub note: String,
}

impl LocatorResult {
    /// 创建只带说明、不带任何范围的结果
    pub fn empty_with_note(note: impl Into<String>) -> Self {
        Self {
            ranges: Vec::new(),
            windows: Vec::new(),
            note: note.into(),
        }
    }

    /// 是否没有任何可渲染的内容
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty() && self.note.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_hint_ctors() {
        let hint = LineHint::new(3, 5);
        assert_eq!(hint.start, 3);
        assert_eq!(hint.end, 5);
        assert!(hint.reason.is_none());

        let hint = LineHint::with_reason(7, 7, "循环条件");
        assert_eq!(hint.reason.as_deref(), Some("循环条件"));
    }

    #[test]
    fn test_empty_with_note() {
        let result = LocatorResult::empty_with_note("none");
        assert!(result.ranges.is_empty());
        assert!(result.windows.is_empty());
        assert_eq!(result.note, "none");
        assert!(!result.is_empty());

        assert!(LocatorResult::default().is_empty());
    }
}
