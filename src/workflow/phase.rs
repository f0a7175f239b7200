//! 提交阶段
//!
//! 一次提交从 Idle 出发，按固定顺序推进：
//! Idle → Extracting（仅当需要识别图片）→ RequestingHint → RequestingLocation → Done
//! 任何一步失败落到 Failed。Done / Failed 都可以直接开始下一轮提交。

use std::fmt::Display;

/// 提交流程所处的阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// 空闲，可以接受新提交
    #[default]
    Idle,
    /// 正在识别图片中的文字
    Extracting,
    /// 正在请求学习提示
    RequestingHint,
    /// 正在定位相关行号
    RequestingLocation,
    /// 上一轮提交成功结束
    Done,
    /// 上一轮提交失败结束
    Failed,
}

impl Phase {
    /// 是否有提交正在进行中（此时拒绝新的提交和重置）
    pub fn is_in_flight(&self) -> bool {
        matches!(
            self,
            Phase::Extracting | Phase::RequestingHint | Phase::RequestingLocation
        )
    }
}

impl Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::Idle => "空闲",
            Phase::Extracting => "识别图片中",
            Phase::RequestingHint => "请求提示中",
            Phase::RequestingLocation => "定位行号中",
            Phase::Done => "完成",
            Phase::Failed => "失败",
        };
        write!(f, "{}", name)
    }
}
