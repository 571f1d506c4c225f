use std::process::ExitCode;

use clap::Parser;
use tracing::error;

use doc_meta_crawler::cli::{Cli, Command};
use doc_meta_crawler::config::RuntimePaths;
use doc_meta_crawler::orchestrator::{app, App};
use doc_meta_crawler::logger;

#[tokio::main]
async fn main() -> ExitCode {
    // 初始化日志
    logger::init();

    let cli = Cli::parse();
    let paths = cli.apply(RuntimePaths::from_env());

    let result = match cli.command() {
        Command::Fetch { .. } => match App::initialize(paths).await {
            Ok(crawler) => crawler.run().await.map(|_| ()),
            Err(e) => Err(e),
        },
        Command::FetchNav { .. } => app::fetch_nav(&paths).await.map(|_| ()),
        Command::ParseNav => app::parse_nav(&paths).await.map(|_| ()),
        Command::Merge {
            navigation,
            descriptions,
        } => app::merge(&paths, &navigation, &descriptions).await.map(|_| ()),
    };

    // 错误只经日志输出一次
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("❌ 执行失败: {:?}", e);
            ExitCode::FAILURE
        }
    }
}
