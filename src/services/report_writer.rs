//! 校验报告写入服务 - 业务能力层
//!
//! 只负责把不合格草稿的错误位置写进报告文件，不关心流程
//!
//! 报告文件在每次运行开始时清空（`reset`），运行期间只追加

use crate::services::validator::{Issue, ValidationReport};
use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::io::Write;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// 报告写入服务
pub struct ReportWriter {
    report_file_path: String,
    verbose: bool,
}

impl ReportWriter {
    /// 创建新的报告写入服务
    pub fn new() -> Self {
        Self {
            report_file_path: "report.txt".to_string(),
            verbose: false,
        }
    }

    /// 使用自定义文件路径创建
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            report_file_path: path.into(),
            verbose: false,
        }
    }

    /// 同时写出每一条问题明细
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn path(&self) -> &str {
        &self.report_file_path
    }

    /// 清空报告文件并写入本次运行的文件头
    pub fn reset(&self) -> Result<()> {
        let header = format!(
            "草稿校验报告 - {}\n{}\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            "=".repeat(60)
        );
        fs::write(&self.report_file_path, header)
            .with_context(|| format!("无法重置报告文件: {}", self.report_file_path))?;
        Ok(())
    }

    /// 追加一份草稿的报告（同步版本，供阻塞线程中的批量检查使用）
    ///
    /// # 参数
    /// - `draft_name`: 草稿名称
    /// - `report`: 校验结果
    /// - `issues`: 问题明细（仅在 verbose 时写出）
    pub fn write(&self, draft_name: &str, report: &ValidationReport, issues: &[Issue]) -> Result<()> {
        debug!(
            "写入报告: 草稿 {} | 错误位置 {} 处",
            draft_name,
            report.all.len()
        );

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.report_file_path)
            .with_context(|| format!("无法打开报告文件: {}", self.report_file_path))?;

        file.write_all(self.render(draft_name, report, issues).as_bytes())?;

        Ok(())
    }

    /// 追加一份草稿的报告（异步版本）
    pub async fn write_async(
        &self,
        draft_name: &str,
        report: &ValidationReport,
        issues: &[Issue],
    ) -> Result<()> {
        debug!(
            "写入报告: 草稿 {} | 错误位置 {} 处",
            draft_name,
            report.all.len()
        );

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.report_file_path)
            .await
            .with_context(|| format!("无法打开报告文件: {}", self.report_file_path))?;

        file.write_all(self.render(draft_name, report, issues).as_bytes())
            .await?;
        file.flush().await?;

        Ok(())
    }

    fn render(&self, draft_name: &str, report: &ValidationReport, issues: &[Issue]) -> String {
        let parts: Vec<String> = report.parts.iter().map(|p| format!("Part {}", p)).collect();
        let mut out = format!(
            "草稿 {} | 出错部分: {} | 首个错误: {}\n",
            draft_name,
            parts.join(", "),
            report.first
        );
        for location in &report.all {
            out.push_str(&format!("  - {}\n", location));
        }
        if self.verbose {
            for issue in issues {
                out.push_str(&format!("    · {}\n", issue));
            }
        }
        out
    }
}

impl Default for ReportWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::part::Part;
    use crate::services::validator::{Cause, ErrorLocation};

    fn sample_report() -> (ValidationReport, Vec<Issue>) {
        let location = ErrorLocation::group(Part::Part2, 0);
        let report = ValidationReport {
            first: location,
            all: vec![location],
            parts: vec![2],
        };
        let issues = vec![Issue {
            location,
            question: None,
            cause: Cause::MissingAudio,
        }];
        (report, issues)
    }

    #[test]
    fn test_render_lists_locations() {
        let (report, issues) = sample_report();
        let text = ReportWriter::new().render("mock-01", &report, &issues);
        assert_eq!(
            text,
            "草稿 mock-01 | 出错部分: Part 2 | 首个错误: Part 2 第 1 组\n  - Part 2 第 1 组\n"
        );

        let text = ReportWriter::new().verbose(true).render("mock-01", &report, &issues);
        assert!(text.ends_with("    · Part 2 第 1 组: 缺少音频\n"));
    }

    #[tokio::test]
    async fn test_reset_then_async_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.txt");
        std::fs::write(&path, "草稿 old-run | 上一次运行的记录\n").unwrap();

        let writer = ReportWriter::with_path(path.to_string_lossy().to_string());
        writer.reset().unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("草稿校验报告"));
        assert!(!content.contains("old-run"));

        let (report, issues) = sample_report();
        writer.write_async("new-run", &report, &issues).await.unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("草稿 new-run"));
        assert!(!content.contains("old-run"));
    }

    #[test]
    fn test_write_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.txt");
        let writer = ReportWriter::with_path(path.to_string_lossy().to_string());
        let (report, issues) = sample_report();

        writer.write("a", &report, &issues).unwrap();
        writer.write("b", &report, &issues).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().filter(|l| l.starts_with("草稿")).count(), 2);
    }
}
