//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批量草稿检查器
//! - 扫描草稿目录，批量加载（Vec<DraftFile>）
//! - 控制并发数量（Semaphore）
//! - 输出全局统计信息
//!
//! ### `draft_processor` - 单份草稿处理器
//! - 为单份草稿构建上下文并调用 DraftFlow
//! - 输出单份草稿的错误位置
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<DraftFile>)
//!     ↓
//! draft_processor (处理单份草稿)
//!     ↓
//! workflow::DraftFlow (校验 → 报告 → 放行)
//!     ↓
//! services (能力层：validator / report_writer / draft_store)
//! ```

pub mod batch_processor;
pub mod draft_processor;

// 重新导出主要类型
pub use batch_processor::{App, ProcessingStats};
pub use draft_processor::process_draft;
