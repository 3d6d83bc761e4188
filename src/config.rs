/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    /// 同时检查的草稿数量
    pub max_concurrent_drafts: usize,
    /// 待检查草稿（JSON / TOML）所在目录
    pub draft_folder: String,
    /// 向导草稿缓存目录
    pub draft_store_dir: String,
    /// 校验报告文件
    pub report_file: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_concurrent_drafts: 8,
            draft_folder: "drafts".to_string(),
            draft_store_dir: ".draft_cache".to_string(),
            report_file: "report.txt".to_string(),
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            max_concurrent_drafts: std::env::var("MAX_CONCURRENT_DRAFTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|&n: &usize| n > 0)
                .unwrap_or(default.max_concurrent_drafts),
            draft_folder: std::env::var("DRAFT_FOLDER").unwrap_or(default.draft_folder),
            draft_store_dir: std::env::var("DRAFT_STORE_DIR").unwrap_or(default.draft_store_dir),
            report_file: std::env::var("REPORT_FILE").unwrap_or(default.report_file),
            verbose_logging: std::env::var("VERBOSE_LOGGING")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
        }
    }
}
