//! 提交会话 - 流程层
//!
//! 核心职责：定义"一次提交"的完整处理流程
//!
//! 流程顺序：
//! 1. 图片识别（仅当有图片且作业文本为空）
//! 2. 请求提示 → 记录历史快照
//! 3. 定位行号（尽力而为，失败不影响提示）
//!
//! 同一时刻最多一次提交在进行中，进行中时拒绝新的提交和重置。

use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult};
use crate::highlight::{classify_lines, LineClass};
use crate::models::history::{HistoryItem, ImageAttachment};
use crate::models::line_hint::LocatorResult;
use crate::models::subject::SubjectMode;
use crate::services::locator_parser::parse_locator_reply;
use crate::services::{HistoryLog, TutorGateway};
use crate::workflow::phase::Phase;

/// 失败提示的固定前缀（界面约定，保持原有英文格式）
const OOPS_PREFIX: &str = "Oops — ";
/// 连失败原因都拿不到时的兜底文案
const OOPS_FALLBACK: &str = "Oops — 出了点问题，请稍后再试。";

/// 一次提交的最终结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// 提示已拿到（行号定位可能降级为空）
    Done,
    /// 流程中断，应答是 Oops 开头的错误提示
    Failed,
}

/// 提交会话
///
/// - 编排完整的提交处理流程
/// - 持有学生的工作状态（作业文本 / 提问 / 图片 / 应答 / 定位结果）
/// - 只依赖网关能力（services），不认识具体是托管还是直连
pub struct TutorSession<G: TutorGateway> {
    gateway: G,
    history: HistoryLog,
    mode: SubjectMode,
    code: String,
    ask: String,
    images: Vec<ImageAttachment>,
    response: String,
    locator: LocatorResult,
    phase: Phase,
}

impl<G: TutorGateway> TutorSession<G> {
    /// 创建新的提交会话
    pub fn new(gateway: G, history: HistoryLog) -> Self {
        Self {
            gateway,
            history,
            mode: SubjectMode::Cs,
            code: String::new(),
            ask: String::new(),
            images: Vec::new(),
            response: String::new(),
            locator: LocatorResult::default(),
            phase: Phase::Idle,
        }
    }

    // ========== 工作状态读写 ==========

    pub fn set_mode(&mut self, mode: SubjectMode) {
        self.mode = mode;
    }

    pub fn set_code(&mut self, code: impl Into<String>) {
        self.code = code.into();
    }

    pub fn set_ask(&mut self, ask: impl Into<String>) {
        self.ask = ask.into();
    }

    pub fn set_images(&mut self, images: Vec<ImageAttachment>) {
        self.images = images;
    }

    pub fn mode(&self) -> SubjectMode {
        self.mode
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn ask(&self) -> &str {
        &self.ask
    }

    pub fn images(&self) -> &[ImageAttachment] {
        &self.images
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// 最近一次的应答文本（失败时为 Oops 提示）
    pub fn response(&self) -> &str {
        &self.response
    }

    /// 最近一次的行号定位结果
    pub fn locator(&self) -> &LocatorResult {
        &self.locator
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    // ========== 提交流程 ==========

    /// 执行一次完整提交
    ///
    /// 进行中时返回 `FlowError::Busy`；流程内部的失败不作为 `Err` 返回，
    /// 而是落到 `SubmitOutcome::Failed`，错误提示写入应答文本并记入历史。
    pub async fn submit(&mut self) -> AppResult<SubmitOutcome> {
        if self.phase.is_in_flight() {
            return Err(AppError::flow_busy(self.phase));
        }

        // 新一轮提交，上一轮的应答和定位结果作废
        self.response.clear();
        self.locator = LocatorResult::default();

        // ========== 流程 1: 图片识别（条件进入） ==========
        if !self.images.is_empty() && self.code.trim().is_empty() {
            self.phase = Phase::Extracting;
            info!("🔍 正在识别 {} 张图片中的文字...", self.images.len());

            match self
                .gateway
                .extract_text(&self.images, &self.ask, self.mode)
                .await
            {
                Ok(text) if !text.trim().is_empty() => {
                    info!("✓ 图片识别完成，共 {} 行", text.lines().count());
                    self.code = text;
                }
                Ok(_) => {
                    warn!("⚠️ 图片识别完成，但没有识别出任何文字");
                    return Ok(self.fail_submission("图片识别没有得到任何文字"));
                }
                Err(e) => {
                    warn!("⚠️ 图片识别失败: {}", e);
                    return Ok(self.fail_submission(&e.to_string()));
                }
            }
        }

        // ========== 流程 2: 请求提示 ==========
        self.phase = Phase::RequestingHint;
        info!("📤 正在请求学习提示...");

        let hint = match self
            .gateway
            .request_hint(&self.code, &self.ask, &self.images, self.mode)
            .await
        {
            Ok(text) => text,
            Err(e) => {
                warn!("⚠️ 提示请求失败: {}", e);
                return Ok(self.fail_submission(&e.to_string()));
            }
        };

        // 只去掉开头的空白，Markdown 结尾的换行保留
        self.response = hint.trim_start().to_string();
        self.record_history();
        info!("✓ 提示已收到，共 {} 字符", self.response.chars().count());

        // ========== 流程 3: 定位行号（尽力而为） ==========
        self.phase = Phase::RequestingLocation;
        let total_lines = self.code.lines().count();
        debug!("🔍 正在定位相关行号，作业共 {} 行...", total_lines);

        match self
            .gateway
            .locate_lines(&self.code, &self.ask, self.mode)
            .await
        {
            Ok(reply) => {
                self.locator = parse_locator_reply(&reply, total_lines);
                log_locator(&self.locator);
            }
            Err(e) => {
                // 提示已经到手，定位失败只降级，不改变结果
                warn!("⚠️ 行号定位失败（提示不受影响）: {}", e);
                self.locator = LocatorResult::empty_with_note(oops_text(&e.to_string()));
            }
        }

        self.phase = Phase::Done;
        Ok(SubmitOutcome::Done)
    }

    /// 重置工作状态（历史记录和科目保留）
    ///
    /// 进行中时返回 `FlowError::Busy`。
    pub fn reset(&mut self) -> AppResult<()> {
        if self.phase.is_in_flight() {
            return Err(AppError::flow_busy(self.phase));
        }

        self.code.clear();
        self.ask.clear();
        self.images.clear();
        self.response.clear();
        self.locator = LocatorResult::default();
        self.phase = Phase::Idle;

        debug!("🗑️ 工作状态已重置（历史记录保留）");
        Ok(())
    }

    /// 清空全部历史记录（工作状态不受影响）
    pub fn clear_history(&mut self) {
        self.history.clear();
        info!("🗑️ 历史记录已清空");
    }

    /// 按当前定位结果给作业的每一行分类
    pub fn line_classes(&self) -> Vec<LineClass> {
        classify_lines(&self.code, &self.locator.ranges)
    }

    /// 以失败收尾：写入 Oops 应答、记录历史、进入 Failed
    fn fail_submission(&mut self, reason: &str) -> SubmitOutcome {
        self.response = oops_text(reason);
        self.record_history();
        self.phase = Phase::Failed;
        SubmitOutcome::Failed
    }

    /// 把当前工作状态拍成快照记入历史
    fn record_history(&mut self) {
        let item = HistoryItem::snapshot(
            self.mode,
            &self.ask,
            &self.code,
            &self.images,
            &self.response,
        );
        self.history.push(item);
    }
}

/// 组装给学生看的失败提示
fn oops_text(reason: &str) -> String {
    let reason = reason.trim();
    if reason.is_empty() {
        OOPS_FALLBACK.to_string()
    } else {
        format!("{}{}", OOPS_PREFIX, reason)
    }
}

// ========== 日志辅助函数 ==========

fn log_locator(locator: &LocatorResult) {
    if locator.ranges.is_empty() {
        debug!("定位结果为空");
    } else {
        debug!("✓ 定位到 {} 段相关行", locator.ranges.len());
    }
    if !locator.note.is_empty() {
        debug!("📌 定位备注: {}", locator.note);
    }
}
