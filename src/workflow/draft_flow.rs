//! 草稿检查流程 - 流程层
//!
//! 核心职责：定义"一份草稿"从校验到放行的完整流程
//!
//! 流程顺序：
//! 1. 结构校验
//! 2. 不合格 → 写报告，阻止提交
//! 3. 合格 → 放行；从缓存提交时顺带删除草稿

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::models::draft::FullTestDraft;
use crate::services::{validator, DraftStore, Issue, ReportWriter, ValidationReport};
use crate::workflow::draft_ctx::DraftCtx;

/// 草稿检查结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// 全部规则通过，可以提交
    Ready,
    /// 存在错误，阻止提交
    Blocked(ValidationReport),
}

impl CheckOutcome {
    pub fn is_ready(&self) -> bool {
        matches!(self, CheckOutcome::Ready)
    }
}

/// 草稿检查流程
///
/// - 编排 校验 → 报告 → 放行
/// - 不持有草稿，只依赖业务能力（services）
pub struct DraftFlow {
    report_writer: ReportWriter,
    verbose_logging: bool,
}

impl DraftFlow {
    /// 创建新的草稿检查流程
    pub fn new(config: &Config) -> Self {
        Self {
            report_writer: ReportWriter::with_path(config.report_file.clone())
                .verbose(config.verbose_logging),
            verbose_logging: config.verbose_logging,
        }
    }

    /// 清空上一次运行留下的报告
    pub fn reset_report(&self) -> Result<()> {
        self.report_writer.reset()
    }

    /// 校验一份草稿，不写报告
    ///
    /// 不合格时一并返回问题明细
    pub fn check(&self, ctx: &DraftCtx, draft: &FullTestDraft) -> (CheckOutcome, Vec<Issue>) {
        debug!(
            "{} 开始校验: {} 个题组，{} 道题目",
            ctx,
            draft.group_count(),
            draft.question_count()
        );

        let Some(report) = validator::validate(draft) else {
            info!("{} ✅ 校验通过", ctx);
            return (CheckOutcome::Ready, Vec::new());
        };

        warn!(
            "{} ⚠️ 校验未通过: 出错部分 {:?}，首个错误 {}",
            ctx, report.parts, report.first
        );

        let issues = validator::diagnose(draft);
        if self.verbose_logging {
            for issue in &issues {
                debug!("{}   · {}", ctx, issue);
            }
        }

        (CheckOutcome::Blocked(report), issues)
    }

    /// 检查一份草稿，不合格时写入报告
    ///
    /// 同步写文件，由调用方放在阻塞线程中执行
    pub fn run(&self, ctx: &DraftCtx, draft: &FullTestDraft) -> Result<CheckOutcome> {
        let (outcome, issues) = self.check(ctx, draft);

        if let CheckOutcome::Blocked(report) = &outcome {
            self.report_writer
                .write(&ctx.key, report, &issues)
                .with_context(|| format!("{} 写入报告失败", ctx))?;
        }

        Ok(outcome)
    }

    /// 从草稿缓存中取出并提交
    ///
    /// 合格的草稿提交后即从缓存中删除；不合格的保留，等待用户修改
    pub async fn submit(&self, store: &DraftStore, ctx: &DraftCtx) -> Result<CheckOutcome> {
        let draft = store
            .load(&ctx.key)
            .await?
            .with_context(|| format!("{} 草稿不存在", ctx))?;

        let (outcome, issues) = self.check(ctx, &draft);
        match &outcome {
            CheckOutcome::Ready => {
                store.remove(&ctx.key).await?;
                info!("{} 🗑️ 已提交，草稿缓存已清除", ctx);
            }
            CheckOutcome::Blocked(report) => {
                self.report_writer
                    .write_async(&ctx.key, report, &issues)
                    .await
                    .with_context(|| format!("{} 写入报告失败", ctx))?;
            }
        }

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::draft::GroupData;
    use crate::models::part::Part;

    fn test_config(dir: &std::path::Path) -> Config {
        Config {
            report_file: dir.join("report.txt").to_string_lossy().to_string(),
            draft_store_dir: dir.join("cache").to_string_lossy().to_string(),
            ..Config::default()
        }
    }

    #[test]
    fn test_run_blocks_invalid_draft_and_writes_report() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        let flow = DraftFlow::new(&config);

        let draft = FullTestDraft::new().with_part(Part::Part2, vec![GroupData::new()]);
        let outcome = flow.run(&DraftCtx::new("mock", 1), &draft).unwrap();

        match outcome {
            CheckOutcome::Blocked(report) => assert_eq!(report.parts, vec![2]),
            CheckOutcome::Ready => panic!("缺少音频的草稿不应通过"),
        }
        let report = std::fs::read_to_string(&config.report_file).unwrap();
        assert!(report.contains("草稿 mock"));
    }

    #[tokio::test]
    async fn test_submit_writes_report_for_blocked_draft() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        let flow = DraftFlow::new(&config);
        let store = DraftStore::new(&config.draft_store_dir);

        std::fs::write(&config.report_file, "草稿 stale\n").unwrap();
        flow.reset_report().unwrap();

        let draft = FullTestDraft::new().with_part(Part::Part3, vec![GroupData::new()]);
        store.save("wizard", &draft).await.unwrap();

        let outcome = flow.submit(&store, &DraftCtx::new("wizard", 1)).await.unwrap();
        assert!(!outcome.is_ready());
        // 不合格的草稿仍留在缓存中
        assert_eq!(store.keys().await.unwrap(), vec!["wizard".to_string()]);

        let report = std::fs::read_to_string(&config.report_file).unwrap();
        assert!(report.contains("草稿 wizard"));
        assert!(!report.contains("stale"));
    }

    #[test]
    fn test_run_passes_empty_draft() {
        let dir = tempfile::tempdir().unwrap();
        let flow = DraftFlow::new(&test_config(dir.path()));
        let outcome = flow.run(&DraftCtx::new("empty", 1), &FullTestDraft::new()).unwrap();
        assert!(outcome.is_ready());
    }
}
