//! # Vibe Survey
//!
//! 一个用于 Minerva 身份问卷的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有文档存储资源，只暴露能力
//! - `DocumentStore` - 文档读写能力（create / update / query）
//! - `MemoryStore` - 内存实现，可整体替换为任意文档型后端
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，每个服务只负责单一能力
//! - `QuestionBank` - 题库拉取与解析能力
//! - `sampler` - 按类别抽样与打乱能力
//! - `ResponseRecorder` - 作答写入能力
//! - `ResultResolver` - 统计与 vibe 判定能力
//! - `security` - 净化 / 校验 / 限流能力
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一次作答"的完整处理流程
//! - `SurveyCtx` - 上下文封装（身份 + 题号 + 类别）
//! - `SurveyFlow` - 流程编排（校验 → 限流 → 净化 → 写入 → 完成）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/` - 会话编排器，管理初始化、登录引导与整场会话
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult, BankError, StoreError};
pub use infrastructure::{DocumentStore, MemoryStore};
pub use models::identity::Identity;
pub use models::question::QuestionRecord;
pub use models::response::{AnswerEntry, ResponseSession, ResultSummary};
pub use orchestrator::App;
pub use services::bank_service::QuestionBank;
pub use services::recorder::ResponseRecorder;
pub use services::resolver::{Resolution, ResultResolver};
pub use services::security::RateLimiter;
pub use workflow::{SubmitOutcome, SurveyCtx, SurveyFlow};
