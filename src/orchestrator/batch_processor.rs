//! 批量草稿检查器 - 编排层
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：写日志文件头、输出启动信息
//! 2. **批量加载**：扫描并加载所有待检查的草稿，加载失败的计入失败数
//! 3. **草稿缓存**：提交缓存中的草稿，合格的提交后删除
//! 4. **并发控制**：使用 Semaphore 限制并发数量
//! 5. **分批处理**：每批完成后再开始下一批
//! 6. **全局统计**：汇总所有草稿的检查结果

use crate::config::Config;
use crate::models::{DraftFile, LoadedDrafts};
use crate::orchestrator::draft_processor;
use crate::services::DraftStore;
use crate::utils::logging;
use crate::workflow::{CheckOutcome, DraftCtx, DraftFlow};
use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

/// 应用主结构
pub struct App {
    config: Config,
    flow: Arc<DraftFlow>,
    store: DraftStore,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        // 初始化日志文件
        logging::init_log_file(&config.output_log_file)?;

        logging::log_startup(config.max_concurrent_drafts);

        let flow = Arc::new(DraftFlow::new(&config));
        // 报告只保留本次运行的结果
        flow.reset_report()?;

        let store = DraftStore::new(&config.draft_store_dir);

        Ok(Self {
            config,
            flow,
            store,
        })
    }

    /// 运行应用主逻辑
    ///
    /// 1. 检查草稿目录中的所有文件
    /// 2. 提交草稿缓存中的所有草稿（合格的提交后删除）
    pub async fn run(&self) -> Result<ProcessingStats> {
        // 加载所有待检查的草稿
        let loaded = self.load_drafts().await?;
        let cached_keys = self.store.keys().await?;

        if loaded.is_empty() && cached_keys.is_empty() {
            warn!("⚠️ 没有找到待检查的草稿文件，程序结束");
            return Ok(ProcessingStats::default());
        }

        let mut stats = ProcessingStats::default();

        if !loaded.is_empty() {
            logging::log_drafts_loaded(loaded.total(), self.config.max_concurrent_drafts);

            // 加载失败的文件不能当作合格
            for failure in &loaded.failures {
                error!("❌ 草稿无法加载: {} ({})", failure.path.display(), failure.reason);
            }
            stats.total += loaded.failures.len();
            stats.failed += loaded.failures.len();

            stats.merge(self.process_all_drafts(loaded.files).await?);
        }

        if !cached_keys.is_empty() {
            stats.merge(self.submit_cached_drafts(cached_keys).await);
        }

        logging::print_final_stats(
            stats.passed,
            stats.blocked,
            stats.failed,
            stats.total,
            &self.config.report_file,
        );

        Ok(stats)
    }

    /// 加载草稿
    ///
    /// 草稿目录不存在时，只要草稿缓存中还有内容就继续运行
    async fn load_drafts(&self) -> Result<LoadedDrafts> {
        info!("\n📁 正在扫描待检查的草稿...");
        if !Path::new(&self.config.draft_folder).exists() {
            warn!("⚠️ 草稿目录不存在: {}", self.config.draft_folder);
            return Ok(LoadedDrafts::default());
        }
        crate::models::load_all_draft_files(&self.config.draft_folder).await
    }

    /// 逐个提交草稿缓存中的草稿
    async fn submit_cached_drafts(&self, keys: Vec<String>) -> ProcessingStats {
        info!(
            "\n🗂️ 草稿缓存 {} 中有 {} 份草稿，开始提交",
            self.store.dir().display(),
            keys.len()
        );

        let mut stats = ProcessingStats {
            total: keys.len(),
            ..Default::default()
        };

        for (idx, key) in keys.into_iter().enumerate() {
            let ctx = DraftCtx::new(key, idx + 1);
            match self.flow.submit(&self.store, &ctx).await {
                Ok(CheckOutcome::Ready) => stats.passed += 1,
                Ok(CheckOutcome::Blocked(_)) => stats.blocked += 1,
                Err(e) => {
                    error!("{} ❌ 提交失败: {:#}", ctx, e);
                    stats.failed += 1;
                }
            }
        }

        stats
    }

    /// 处理所有草稿
    async fn process_all_drafts(&self, all_drafts: Vec<DraftFile>) -> Result<ProcessingStats> {
        let batch_size = self.config.max_concurrent_drafts.max(1);
        let semaphore = Arc::new(Semaphore::new(batch_size));
        let total_drafts = all_drafts.len();
        let mut stats = ProcessingStats {
            total: total_drafts,
            ..Default::default()
        };

        for (batch_idx, batch) in all_drafts.chunks(batch_size).enumerate() {
            let batch_start = batch_idx * batch_size;
            let batch_num = batch_idx + 1;
            let total_batches = (total_drafts + batch_size - 1) / batch_size;

            logging::log_batch_start(
                batch_num,
                total_batches,
                batch_start + 1,
                batch_start + batch.len(),
                total_drafts,
            );

            let batch_result = self.process_batch(batch, batch_start, semaphore.clone()).await?;

            stats.passed += batch_result.passed;
            stats.blocked += batch_result.blocked;
            stats.failed += batch_result.failed;

            logging::log_batch_complete(batch_num, batch_result.passed, batch.len());
        }

        Ok(stats)
    }

    /// 处理单个批次
    async fn process_batch(
        &self,
        batch: &[DraftFile],
        batch_start: usize,
        semaphore: Arc<Semaphore>,
    ) -> Result<BatchResult> {
        let mut handles = Vec::new();

        for (idx, file) in batch.iter().enumerate() {
            let draft_index = batch_start + idx + 1;
            let permit = semaphore.clone().acquire_owned().await?;
            let flow = self.flow.clone();
            let file = file.clone();

            let handle = tokio::task::spawn_blocking(move || {
                let _permit = permit;
                draft_processor::process_draft(&flow, &file, draft_index).map_err(|e| {
                    error!("[草稿 #{}] ❌ 检查过程中发生错误: {}", draft_index, e);
                    e
                })
            });
            handles.push((draft_index, handle));
        }

        let mut result = BatchResult::default();
        let outcomes = futures::future::join_all(
            handles.into_iter().map(|(index, handle)| async move { (index, handle.await) }),
        )
        .await;

        for (draft_index, outcome) in outcomes {
            match outcome {
                Ok(Ok(CheckOutcome::Ready)) => result.passed += 1,
                Ok(Ok(CheckOutcome::Blocked(_))) => result.blocked += 1,
                Ok(Err(_)) => result.failed += 1,
                Err(e) => {
                    error!("[草稿 #{}] 任务执行失败: {}", draft_index, e);
                    result.failed += 1;
                }
            }
        }

        Ok(result)
    }
}

/// 处理统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProcessingStats {
    /// 可以提交的草稿
    pub passed: usize,
    /// 被阻止提交的草稿
    pub blocked: usize,
    /// 加载或检查过程出错的草稿
    pub failed: usize,
    pub total: usize,
}

impl ProcessingStats {
    /// 所有草稿都合格（没有被阻止，也没有出错）
    pub fn is_clean(&self) -> bool {
        self.blocked == 0 && self.failed == 0
    }

    fn merge(&mut self, other: ProcessingStats) {
        self.passed += other.passed;
        self.blocked += other.blocked;
        self.failed += other.failed;
        self.total += other.total;
    }
}

/// 批次处理结果
#[derive(Debug, Default)]
struct BatchResult {
    passed: usize,
    blocked: usize,
    failed: usize,
}
