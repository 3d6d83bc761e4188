//! # TOEIC Draft Check
//!
//! 托业完整试卷草稿的结构校验工具
//!
//! ## 架构设计
//!
//! ### ① 数据模型（Models）
//! - `models/` - 草稿数据结构、七个部分的规则表、JSON / TOML 草稿加载
//!
//! ### ② 业务能力层（Services）
//! - `validator` - 结构校验：找出所有不合格的部分 / 题组
//! - `DraftStore` - 向导草稿缓存（崩溃 / 刷新后恢复）
//! - `ReportWriter` - 写校验报告能力
//!
//! ### ③ 流程层（Workflow）
//! - `DraftCtx` - 上下文封装（草稿键名 + 索引）
//! - `DraftFlow` - 流程编排（校验 → 报告 → 放行）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 批量检查草稿目录，管理并发
//! - `orchestrator/draft_processor` - 单份草稿的检查与日志

pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{DraftError, DraftResult};
pub use models::{FullTestDraft, GroupData, Part, QuestionData};
pub use orchestrator::{App, ProcessingStats};
pub use services::{diagnose, validate, DraftStore, ErrorLocation, ValidationReport};
pub use workflow::{CheckOutcome, DraftCtx, DraftFlow};
