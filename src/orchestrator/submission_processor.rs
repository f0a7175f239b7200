//! 单份提交处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块负责处理单份提交，是提交级别的编排器。
//!
//! ## 核心功能
//!
//! 1. **装填状态**：把 TOML 里的提问 / 作业文本 / 图片写入会话
//! 2. **流程委托**：调用 `TutorSession::submit` 执行完整流程
//! 3. **结果渲染**：输出提示正文和带标记的行号摘录
//! 4. **统计输出**：记录成功/失败

use std::path::Path;

use anyhow::Result;
use tracing::{info, warn};

use crate::config::Config;
use crate::highlight::{merge_windows, LineClass};
use crate::models::line_hint::LineHint;
use crate::models::loaders::load_image_attachments;
use crate::models::submission::Submission;
use crate::models::theme::Theme;
use crate::services::TutorGateway;
use crate::utils::truncate_text;
use crate::workflow::{SubmissionCtx, SubmitOutcome, TutorSession};

/// 处理单份提交
///
/// # 参数
/// - `session`: 提交会话（跨提交复用，历史记录累积在里面）
/// - `submission`: 提交数据
/// - `ctx`: 提交上下文（用于日志）
/// - `theme`: 渲染摘录用的主题
/// - `config`: 配置
///
/// # 返回
/// 返回这次提交的最终结果
pub async fn process_submission<G: TutorGateway>(
    session: &mut TutorSession<G>,
    submission: &Submission,
    ctx: &SubmissionCtx,
    theme: Theme,
    config: &Config,
) -> Result<SubmitOutcome> {
    log_submission_start(ctx, submission);

    // 清掉上一份的工作状态（历史记录保留）
    session.reset()?;

    session.set_mode(ctx.mode);
    session.set_ask(submission.ask.clone());
    session.set_code(submission.code.clone().unwrap_or_default());

    // 加载图片附件（相对路径相对于 TOML 所在目录解析）
    let image_paths = submission.images.as_deref().unwrap_or(&[]);
    if !image_paths.is_empty() {
        let base_dir = submission
            .file_path
            .as_deref()
            .and_then(|p| Path::new(p).parent());
        let images = load_image_attachments(image_paths, base_dir).await;

        if images.len() < image_paths.len() {
            warn!(
                "{} ⚠️ 图片加载: {}/{} 张成功",
                ctx,
                images.len(),
                image_paths.len()
            );
        } else {
            info!("{} 📷 已加载 {} 张图片", ctx, images.len());
        }
        session.set_images(images);
    }

    // 执行流程（委托给 TutorSession）
    let outcome = session.submit().await?;

    // 渲染结果
    render_response(session, ctx, theme, config.verbose_logging);

    log_submission_complete(ctx, outcome);

    Ok(outcome)
}

/// 渲染应答正文和行号摘录
fn render_response<G: TutorGateway>(
    session: &TutorSession<G>,
    ctx: &SubmissionCtx,
    theme: Theme,
    verbose_logging: bool,
) {
    info!("\n{} {}", ctx, "─".repeat(30));
    info!("{}", session.response());

    let locator = session.locator();
    if !locator.note.is_empty() {
        info!("📌 {}", locator.note);
    }

    if locator.ranges.is_empty() {
        return;
    }

    // 详细日志（如果启用）：列出每段范围和原因
    if verbose_logging {
        log_locator_ranges(ctx, &locator.ranges);
    }

    // 摘录：按加宽后的展示窗口打印，命中行和上下文行用不同标记
    let classes = session.line_classes();
    let lines: Vec<&str> = session.code().lines().collect();

    for (window_index, (start, end)) in merge_windows(&locator.windows).into_iter().enumerate() {
        if window_index > 0 {
            info!("   ⋯");
        }
        for n in start..=end {
            if let Some(line) = lines.get(n - 1) {
                let marker = match classes.get(n - 1) {
                    Some(LineClass::Hit) => theme.hit_marker(),
                    Some(LineClass::Context) => theme.context_marker(),
                    _ => theme.plain_marker(),
                };
                info!("{} {:>4} | {}", marker, n, line);
            }
        }
    }
}

// ========== 日志辅助函数 ==========

fn log_locator_ranges(ctx: &SubmissionCtx, ranges: &[LineHint]) {
    for (i, hint) in ranges.iter().enumerate() {
        match hint.reason.as_deref() {
            Some(reason) => info!(
                "{}   {}. 第 {}-{} 行: {}",
                ctx,
                i + 1,
                hint.start,
                hint.end,
                reason
            ),
            None => info!("{}   {}. 第 {}-{} 行", ctx, i + 1, hint.start, hint.end),
        }
    }
}

fn log_submission_start(ctx: &SubmissionCtx, submission: &Submission) {
    info!("\n{} {}", ctx, "─".repeat(30));
    info!("{} 开始处理", ctx);
    if let Some(file_path) = submission.file_path.as_deref() {
        info!("{} 文件: {}", ctx, file_path);
    }
    info!("{} 提问: {}", ctx, truncate_text(&submission.ask, 80));
}

fn log_submission_complete(ctx: &SubmissionCtx, outcome: SubmitOutcome) {
    match outcome {
        SubmitOutcome::Done => info!("{} ✅ 提交处理完成\n", ctx),
        SubmitOutcome::Failed => {
            warn!("{} ⚠️ 提交以失败收尾，Oops 提示已记入历史\n", ctx)
        }
    }
}
