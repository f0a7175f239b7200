//! 批量提交处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责批量提交的处理和资源管理。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：启动日志、打开状态存储、加载主题、选择网关
//! 2. **批量加载**：扫描并加载所有待处理的提交（`Vec<Submission>`）
//! 3. **顺序处理**：所有提交走同一个会话，逐份进行
//! 4. **全局统计**：汇总所有提交的处理结果
//!
//! ## 设计特点
//!
//! - **顶层编排**：不处理单份提交的细节
//! - **资源所有者**：唯一持有状态存储和会话的模块
//! - **向下委托**：委托 submission_processor 处理单份提交

use std::sync::Arc;

use anyhow::Result;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::infrastructure::{LocalStateStore, StateStore, THEME_KEY};
use crate::models::loaders::load_all_toml_files;
use crate::models::submission::Submission;
use crate::models::subject::SubjectMode;
use crate::models::theme::Theme;
use crate::orchestrator::submission_processor;
use crate::services::{Gateway, HistoryLog};
use crate::workflow::{SubmissionCtx, SubmitOutcome, TutorSession};

/// 应用主结构
pub struct App {
    config: Config,
    theme: Theme,
    session: TutorSession<Gateway>,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);

        // 打开本地状态存储（历史记录和主题都存在这里）
        let store: Arc<dyn StateStore> = Arc::new(LocalStateStore::new(&config.state_folder)?);

        // 加载主题（配置优先，其次用上次保存的）
        let theme = load_theme(&config, store.as_ref());
        info!("🎨 主题: {}", theme.name());

        // 选择网关并装配会话
        let gateway = Gateway::from_config(&config);
        info!("🌐 网关模式: {}", gateway.mode_name());

        let history = HistoryLog::new(store);
        let session = TutorSession::new(gateway, history);

        Ok(Self {
            config,
            theme,
            session,
        })
    }

    /// 运行应用主逻辑
    pub async fn run(&mut self) -> Result<()> {
        // 加载所有待处理的提交
        let submissions = self.load_submissions().await?;

        if submissions.is_empty() {
            warn!("⚠️ 没有找到待处理的TOML文件，程序结束");
            return Ok(());
        }

        let total = submissions.len();
        log_submissions_loaded(total);

        // 逐份处理（同一个会话，天然保证同一时刻只有一次提交在进行）
        let stats = self.process_all_submissions(&submissions).await;

        // 输出最终统计
        print_final_stats(&stats);

        Ok(())
    }

    /// 加载提交
    async fn load_submissions(&self) -> Result<Vec<Submission>> {
        info!("\n📁 正在扫描待处理的提交...");
        load_all_toml_files(&self.config.submissions_folder).await
    }

    /// 处理所有提交
    async fn process_all_submissions(&mut self, submissions: &[Submission]) -> RunStats {
        let total = submissions.len();
        let mut stats = RunStats {
            total,
            ..Default::default()
        };

        for (index, submission) in submissions.iter().enumerate() {
            let submission_index = index + 1;
            let mode = resolve_mode(submission);
            let ctx = SubmissionCtx::new(
                submission.name.clone(),
                submission_index,
                total,
                mode,
            );

            match submission_processor::process_submission(
                &mut self.session,
                submission,
                &ctx,
                self.theme,
                &self.config,
            )
            .await
            {
                Ok(SubmitOutcome::Done) => {
                    stats.done += 1;
                }
                Ok(SubmitOutcome::Failed) => {
                    stats.failed += 1;
                }
                Err(e) => {
                    error!("{} ❌ 处理过程中发生错误: {}", ctx, e);
                    stats.failed += 1;
                }
            }
        }

        stats
    }
}

/// 处理统计
#[derive(Debug, Default)]
struct RunStats {
    done: usize,
    failed: usize,
    total: usize,
}

/// 解析提交的科目模式
///
/// 没写科目按编程处理；写了但认不出来时告警并落到"其他"。
fn resolve_mode(submission: &Submission) -> SubjectMode {
    if submission.subject.trim().is_empty() {
        return SubjectMode::Cs;
    }
    match SubjectMode::find(&submission.subject) {
        Some(mode) => mode,
        None => {
            warn!(
                "⚠️ 无法识别科目 \"{}\"，按\"其他\"处理",
                submission.subject
            );
            SubjectMode::Other
        }
    }
}

/// 加载主题
///
/// 配置里明确指定了主题名就用它并写回存储；否则用上次保存的；
/// 都没有时用默认主题。加载环节的任何失败只降级，不中断启动。
fn load_theme(config: &Config, store: &dyn StateStore) -> Theme {
    if !config.theme_name.is_empty() {
        let theme = Theme::from_name(&config.theme_name);
        persist_theme(store, theme);
        return theme;
    }

    match store.read(THEME_KEY) {
        Ok(Some(json)) => match serde_json::from_str::<Theme>(&json) {
            Ok(theme) => theme,
            Err(e) => {
                warn!("⚠️ 保存的主题无法解析，使用默认主题: {}", e);
                Theme::default()
            }
        },
        Ok(None) => Theme::default(),
        Err(e) => {
            warn!("⚠️ 主题读取失败，使用默认主题: {}", e);
            Theme::default()
        }
    }
}

/// 把主题写回状态存储，失败只告警
fn persist_theme(store: &dyn StateStore, theme: Theme) {
    match serde_json::to_string(&theme) {
        Ok(json) => {
            if let Err(e) = store.write(THEME_KEY, &json) {
                warn!("⚠️ 主题保存失败: {}", e);
            }
        }
        Err(e) => {
            warn!("⚠️ 主题序列化失败: {}", e);
        }
    }
}

// ========== 日志辅助函数 ==========

fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 作业提示批处理模式");
    info!("📊 网关模式: {}", config.gateway_mode);
    info!("📁 提交目录: {}", config.submissions_folder);
    info!("{}", "=".repeat(60));
}

fn log_submissions_loaded(total: usize) {
    info!("✓ 找到 {} 份待处理的提交", total);
    info!("💡 将按文件名顺序逐份处理\n");
}

fn print_final_stats(stats: &RunStats) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", stats.done, stats.total);
    info!("❌ 失败: {}", stats.failed);
    info!("{}", "=".repeat(60));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::MemoryStateStore;

    fn submission_with_subject(subject: &str) -> Submission {
        Submission {
            name: "测试".to_string(),
            subject: subject.to_string(),
            ask: "问题".to_string(),
            code: None,
            images: None,
            file_path: None,
        }
    }

    #[test]
    fn test_resolve_mode() {
        assert_eq!(
            resolve_mode(&submission_with_subject("")),
            SubjectMode::Cs
        );
        assert_eq!(
            resolve_mode(&submission_with_subject("数学")),
            SubjectMode::Math
        );
        assert_eq!(
            resolve_mode(&submission_with_subject("天文历法")),
            SubjectMode::Other
        );
    }

    #[test]
    fn test_load_theme_prefers_config_and_persists() {
        let store = MemoryStateStore::new();
        let mut config = Config::default();
        config.theme_name = "light".to_string();

        let theme = load_theme(&config, &store);

        assert_eq!(theme, Theme::Light);
        // 配置指定的主题会写回存储
        let stored = store.read(THEME_KEY).unwrap().unwrap();
        assert_eq!(stored, "\"light\"");
    }

    #[test]
    fn test_load_theme_falls_back_to_stored_then_default() {
        let store = MemoryStateStore::new();
        let config = Config::default();

        // 没有任何保存值时用默认主题
        assert_eq!(load_theme(&config, &store), Theme::default());

        // 有保存值时用保存的
        store.write(THEME_KEY, "\"light\"").unwrap();
        assert_eq!(load_theme(&config, &store), Theme::Light);

        // 保存值损坏时降级到默认主题
        store.write(THEME_KEY, "没法解析的东西").unwrap();
        assert_eq!(load_theme(&config, &store), Theme::default());
    }
}
