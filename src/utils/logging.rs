//! 日志工具模块
//!
//! 提供日志初始化和输出的辅助函数

use anyhow::Result;
use std::fs;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化 tracing 日志
///
/// 优先使用 `RUST_LOG`，否则按 verbose 选择 debug / info。
/// 重复调用不会报错（测试中会多次调用）。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
    if let Err(e) = installed {
        tracing::debug!("日志已初始化，沿用现有订阅者: {}", e);
    }
}

/// 初始化日志文件
///
/// # 参数
/// - `log_file_path`: 日志文件路径
pub fn init_log_file(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\n草稿检查日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)?;
    Ok(())
}

/// 记录程序启动信息
pub fn log_startup(max_concurrent: usize) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 试卷草稿批量检查");
    info!("📊 最大并发数: {}", max_concurrent);
    info!("{}", "=".repeat(60));
}

/// 记录草稿加载信息
pub fn log_drafts_loaded(total: usize, max_concurrent: usize) {
    info!("✓ 找到 {} 份待检查的草稿", total);
    info!("📋 将以每批 {} 份的方式检查", max_concurrent);
}

/// 记录批次开始信息
///
/// # 参数
/// - `batch_num`: 批次编号
/// - `total_batches`: 批次总数
/// - `start`: 起始草稿编号
/// - `end`: 结束草稿编号
/// - `total`: 草稿总数
pub fn log_batch_start(batch_num: usize, total_batches: usize, start: usize, end: usize, total: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📦 开始检查第 {}/{} 批", batch_num, total_batches);
    info!("📄 本批草稿: {}-{} / 共 {} 份", start, end, total);
    info!("{}", "=".repeat(60));
}

/// 记录批次完成信息
pub fn log_batch_complete(batch_num: usize, passed: usize, total: usize) {
    info!("\n{}", "─".repeat(60));
    info!("✓ 第 {} 批完成: 合格 {}/{}", batch_num, passed, total);
    info!("{}", "─".repeat(60));
}

/// 打印最终统计信息
///
/// # 参数
/// - `passed`: 合格数量
/// - `blocked`: 不合格数量
/// - `failed`: 处理失败数量
/// - `total`: 总数
/// - `report_file`: 报告文件路径
pub fn print_final_stats(passed: usize, blocked: usize, failed: usize, total: usize, report_file: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部检查完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 合格: {}/{}", passed, total);
    info!("⚠️ 不合格: {}", blocked);
    info!("❌ 失败: {}", failed);
    info!("{}", "=".repeat(60));
    if blocked > 0 {
        info!("\n报告已保存至: {}", report_file);
    }
}

/// 截断长文本用于日志显示
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
