//! # Hint Coach
//!
//! 一个给学生作业提供启发式提示的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有本地状态目录，只暴露键值读写能力
//! - `StateStore` - 统一的状态存储接口（本地文件 / 内存两种实现）
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单次请求
//! - `Gateway` - 转写 / 提示 / 定位三个远程能力（托管或直连）
//! - `parse_locator_reply` - 定位应答的文本解析能力
//! - `HistoryLog` - 历史快照的维护和持久化能力
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一次提交"的完整处理流程
//! - `SubmissionCtx` - 上下文封装（第几份提交 + 科目）
//! - `TutorSession` - 流程编排（识别 → 提示 → 定位），持有工作状态
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/app` - 批量提交处理器，管理存储、主题和网关
//! - `orchestrator/submission_processor` - 单份提交处理器，渲染结果
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod highlight;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use highlight::{classify_lines, merge_windows, LineClass};
pub use infrastructure::{LocalStateStore, MemoryStateStore, StateStore};
pub use models::history::{HistoryItem, ImageAttachment};
pub use models::line_hint::{LineHint, LocatorResult};
pub use models::subject::SubjectMode;
pub use models::submission::Submission;
pub use models::theme::Theme;
pub use orchestrator::{process_submission, App};
pub use services::{Gateway, HistoryLog, TutorGateway};
pub use workflow::{Phase, SubmissionCtx, SubmitOutcome, TutorSession};
