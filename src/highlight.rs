//! 行高亮分类
//!
//! 根据当前文本和行号提示，把每一行（1 起始）归到
//! 命中 / 上下文 / 普通 三类之一。纯派生计算，不保存状态，
//! 文本或提示变化后重新算一遍即可。

use crate::models::line_hint::LineHint;

/// 单行的高亮分类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass {
    /// 落在某个提示的 [start, end] 区间内
    Hit,
    /// 紧邻某个提示（start−1 或 end+1）
    Context,
    /// 其余
    Plain,
}

/// 对整份文本逐行分类
///
/// 返回的向量与文本行一一对应（下标 0 对应第 1 行）。
pub fn classify_lines(text: &str, hints: &[LineHint]) -> Vec<LineClass> {
    let total = text.lines().count();
    (1..=total).map(|line| classify_line(line, hints)).collect()
}

/// 对单行分类
///
/// 命中优先于上下文：一行同时是 A 提示的邻居和 B 提示的命中时算命中。
pub fn classify_line(line: usize, hints: &[LineHint]) -> LineClass {
    for hint in hints {
        if line >= hint.start && line <= hint.end {
            return LineClass::Hit;
        }
    }
    for hint in hints {
        if line + 1 == hint.start || line == hint.end.saturating_add(1) {
            return LineClass::Context;
        }
    }
    LineClass::Plain
}

/// 把展示窗口合并成有序、互不相交的区间
///
/// 相邻或重叠的窗口并成一段，供摘录渲染按段输出。
pub fn merge_windows(windows: &[LineHint]) -> Vec<(usize, usize)> {
    let mut spans: Vec<(usize, usize)> = windows.iter().map(|w| (w.start, w.end)).collect();
    spans.sort_unstable();

    let mut merged: Vec<(usize, usize)> = Vec::new();
    for (start, end) in spans {
        match merged.last_mut() {
            Some(last) if start <= last.1.saturating_add(1) => last.1 = last.1.max(end),
            _ => merged.push((start, end)),
        }
    }
    merged
}
