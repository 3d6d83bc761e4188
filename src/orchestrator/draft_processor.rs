//! 单份草稿处理器 - 编排层
//!
//! 负责一份草稿文件的检查：构建上下文、调用 `DraftFlow`、输出统计。

use crate::models::DraftFile;
use crate::utils::logging::truncate_text;
use crate::workflow::{CheckOutcome, DraftCtx, DraftFlow};
use anyhow::Result;
use tracing::info;

/// 处理单份草稿
///
/// # 参数
/// - `flow`: 检查流程（由调用方创建并复用）
/// - `file`: 草稿文件
/// - `draft_index`: 草稿索引（用于日志）
///
/// # 返回
/// 返回检查结果
pub fn process_draft(flow: &DraftFlow, file: &DraftFile, draft_index: usize) -> Result<CheckOutcome> {
    let ctx = DraftCtx::new(file.name(), draft_index);

    log_draft_start(&ctx, file);

    let outcome = flow.run(&ctx, &file.draft)?;

    log_draft_complete(&ctx, &outcome);

    Ok(outcome)
}

// ========== 日志辅助函数 ==========

fn log_draft_start(ctx: &DraftCtx, file: &DraftFile) {
    info!("{} 开始检查", ctx);
    info!("{} 文件: {}", ctx, truncate_text(&file.path.display().to_string(), 80));
    info!(
        "{} 题组 {} 个，题目 {} 道",
        ctx,
        file.draft.group_count(),
        file.draft.question_count()
    );
}

fn log_draft_complete(ctx: &DraftCtx, outcome: &CheckOutcome) {
    match outcome {
        CheckOutcome::Ready => info!("{} ✅ 草稿可以提交\n", ctx),
        CheckOutcome::Blocked(report) => {
            for location in &report.all {
                info!("{}   - {}", ctx, location);
            }
            info!("{} ⛔ 草稿被阻止提交，共 {} 处错误\n", ctx, report.all.len());
        }
    }
}
