//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量处理和流程调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `app` - 批量提交处理器
//! - 管理应用生命周期（初始化、运行）
//! - 批量加载提交（Vec<Submission>）
//! - 打开状态存储、加载主题、选择网关
//! - 输出全局统计信息
//!
//! ### `submission_processor` - 单份提交处理器
//! - 把单份提交装入会话并执行流程
//! - 渲染提示正文和行号摘录
//! - 输出单份提交的处理结果
//!
//! ## 层次关系
//!
//! ```text
//! app (处理 Vec<Submission>)
//!     ↓
//! submission_processor (处理单份 Submission)
//!     ↓
//! workflow::TutorSession (一次提交的完整流程)
//!     ↓
//! services (能力层：gateway / locator_parser / history_log)
//!     ↓
//! infrastructure (基础设施：StateStore)
//! ```
//!
//! ## 设计原则
//!
//! 1. **单一职责**：app 管批量，submission_processor 管单份
//! 2. **资源隔离**：只有编排层持有状态存储和主题
//! 3. **向下依赖**：编排层 → workflow → services → infrastructure
//! 4. **无业务逻辑**：只做调度和渲染，不做具体业务判断

pub mod app;
pub mod submission_processor;

// 重新导出主要类型
pub use app::App;
pub use submission_processor::process_submission;
