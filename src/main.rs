use anyhow::Result;
use atd_check::{App, Cli};
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    // 参数错误在任何浏览器操作之前结束
    let cli = Cli::parse();

    // 加载配置、初始化日志并运行
    App::initialize(cli)?.run().await?;

    Ok(())
}
