//! 定位应答解析 - 业务能力层
//!
//! 只负责"把定位服务的自由文本应答解析成行号提示"这一件事。
//! 应答来自语言模型，随时可能是乱的，所以整个解析是尽力而为：
//! 不抛错误，解析不出来就返回空结果。
//!
//! 应答的约定格式：
//! ```text
//! LINES:
//! - 起始行[-结束行] | 原因
//! NOTE: 说明
//! ```

use regex::Regex;

use crate::models::line_hint::{LineHint, LocatorResult};

/// 行号条目的格式：`- start[-end] | reason`（允许连字符或短横线做范围分隔）
const BULLET_PATTERN: &str = r"^\s*-\s*(\d+)(?:\s*[-–]\s*(\d+))?\s*\|\s*(.*)$";

/// 解析定位服务的应答
///
/// # 参数
/// - `raw`: 服务返回的原始文本
/// - `total_lines`: 被定位文本的总行数（0 表示文本为空）
///
/// # 返回
/// `ranges` 保持应答里的原始顺序（已归一化：end >= start）；
/// `windows` 是前后各扩一行、夹在文档边界内的展示窗口；
/// `note` 是最后一条 `NOTE:` 行的内容（没有则为空字符串）。
pub fn parse_locator_reply(raw: &str, total_lines: usize) -> LocatorResult {
    let mut ranges: Vec<LineHint> = Vec::new();
    let mut note = String::new();

    let bullet_re = Regex::new(BULLET_PATTERN).ok();

    for line in raw.lines() {
        if let Some(hint) = bullet_re.as_ref().and_then(|re| parse_bullet(re, line)) {
            ranges.push(hint);
            continue;
        }
        // 非条目行：检查 NOTE: 前缀，多条时最后一条生效
        if let Some(text) = note_text(line) {
            note = text;
        }
    }

    let windows = pad_ranges(&ranges, total_lines);

    LocatorResult {
        ranges,
        windows,
        note,
    }
}

/// 解析单个行号条目
///
/// 起始行必须是正整数；结束行缺失、无效或小于起始行时都折叠成单行。
fn parse_bullet(re: &Regex, line: &str) -> Option<LineHint> {
    let caps = re.captures(line)?;

    let start: usize = caps.get(1)?.as_str().parse().ok()?;
    if start == 0 {
        return None;
    }

    let end = caps
        .get(2)
        .and_then(|m| m.as_str().parse::<usize>().ok())
        .filter(|&end| end >= start)
        .unwrap_or(start);

    let reason = caps
        .get(3)
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
        .map(String::from);

    Some(LineHint { start, end, reason })
}

/// 提取 NOTE: 行的内容（大小写不敏感）
fn note_text(line: &str) -> Option<String> {
    let trimmed = line.trim();
    let prefix = trimmed.get(..5)?;
    if prefix.eq_ignore_ascii_case("note:") {
        Some(trimmed[5..].trim().to_string())
    } else {
        None
    }
}

/// 把范围加宽成展示窗口
///
/// 总行数大于 0 时前后各扩一行并夹在 [1, total_lines] 内；
/// 总行数为 0 时原样返回。整段落在文档之外的窗口直接丢弃。
fn pad_ranges(ranges: &[LineHint], total_lines: usize) -> Vec<LineHint> {
    if total_lines == 0 {
        return ranges.to_vec();
    }

    ranges
        .iter()
        .filter_map(|hint| {
            let start = hint.start.saturating_sub(1).max(1);
            let end = hint.end.max(hint.start).saturating_add(1).min(total_lines);
            if start > end {
                return None;
            }
            Some(LineHint {
                start,
                end,
                reason: hint.reason.clone(),
            })
        })
        .collect()
}
