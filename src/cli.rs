//! 命令行参数

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::RuntimePaths;

/// 文档站页面元数据抓取
#[derive(Parser, Debug)]
#[command(name = "doc-meta-crawler", version, about = "批量抓取文档站页面的标题与描述")]
pub struct Cli {
    /// 当前子命令的配置文件（覆盖 CRAWLER_CONFIG / FETCH_NAV_CONFIG / PARSE_NAV_CONFIG）
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// 数据目录（覆盖 SOURCES_DIR）
    #[arg(long, global = true)]
    pub sources_dir: Option<PathBuf>,

    /// 不指定时执行 fetch
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// 分批打开导航中的每个链接，写出描述文件
    Fetch {
        /// 浏览器可执行文件（覆盖 CHROME_EXECUTABLE）
        #[arg(long)]
        chrome: Option<PathBuf>,
    },

    /// 打开文档站首页，保存导航元素的 HTML
    FetchNav {
        /// 浏览器可执行文件（覆盖 CHROME_EXECUTABLE）
        #[arg(long)]
        chrome: Option<PathBuf>,
    },

    /// 解析保存下来的导航 HTML，生成导航 JSON
    ParseNav,

    /// 合并导航 JSON 与描述 JSON
    Merge {
        /// 数据目录下的导航文件
        #[arg(long, default_value = "mastra-nav.json")]
        navigation: String,

        /// 数据目录下的描述文件
        #[arg(long, default_value = "mastra-descriptions.json")]
        descriptions: String,
    },
}

impl Cli {
    /// 子命令，默认 fetch
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Fetch { chrome: None })
    }

    /// 用命令行参数覆盖环境变量中的路径
    pub fn apply(&self, mut paths: RuntimePaths) -> RuntimePaths {
        if let Some(config) = &self.config {
            match self.command() {
                Command::ParseNav => paths.parse_config = config.clone(),
                Command::FetchNav { .. } => paths.nav_config = config.clone(),
                _ => paths.crawler_config = config.clone(),
            }
        }
        if let Some(dir) = &self.sources_dir {
            paths.sources_dir = dir.clone();
        }
        if let Command::Fetch { chrome: Some(chrome) } | Command::FetchNav { chrome: Some(chrome) } = self.command() {
            paths.chrome_executable = Some(chrome);
        }
        paths
    }
}
