use anyhow::Result;
use chatbot_analyzer::cli::{self, Cli};
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    // 解析命令行，日志在加载配置后初始化
    let cli = Cli::parse();

    cli::execute(cli).await
}
