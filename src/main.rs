use anyhow::Result;
use toeic_draft_check::utils::logging;
use toeic_draft_check::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::from_env();

    // 初始化日志
    logging::init(config.verbose_logging);

    // 初始化并运行应用
    let stats = App::initialize(config).await?.run().await?;

    // 有草稿被阻止或无法加载时以非零状态退出
    if !stats.is_clean() {
        std::process::exit(1);
    }

    Ok(())
}
