//! 应用入口 - 编排层
//!
//! 四个子命令对应四个入口：
//! - `fetch`：加载配置与导航数据，启动浏览器，分批抓取，写出描述文件
//! - `fetch-nav`：启动浏览器，保存文档站的导航 HTML
//! - `parse-nav`：导航 HTML → 导航 JSON
//! - `merge`：导航 JSON + 描述 JSON → 增强链接列表
//!
//! 浏览器只在 `fetch` 与 `fetch-nav` 中创建，无论成功与否都会关闭。

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::browser::BrowserSession;
use crate::config::{FetchConfig, RuntimePaths};
use crate::infrastructure::{Automation, RandomSource, ThreadRandom};
use crate::models::{
    load_fetch_config, load_fetch_nav_config, load_navigation_data, load_parse_nav_config, write_json, DescriptionsOutput, NavigationData,
};
use crate::orchestrator::BatchScheduler;
use crate::pipeline;
use crate::utils::logging::{log_links_loaded, log_startup, print_final_stats};

/// 抓取应用
pub struct App {
    paths: RuntimePaths,
    config: FetchConfig,
}

impl App {
    /// 加载并校验配置
    pub async fn initialize(paths: RuntimePaths) -> Result<Self> {
        let config = load_fetch_config(&paths.crawler_config).await?;
        Ok(Self::with_config(paths, config))
    }

    pub fn with_config(paths: RuntimePaths, config: FetchConfig) -> Self {
        let crawler = &config.crawler;
        log_startup(&config.name, crawler.batch_size, crawler.navigation_timeout_ms);
        if crawler.retries.max_attempts > 1 {
            warn!(
                "⚠️ 配置了 retries.maxAttempts = {}，当前版本不执行重试，每个链接只访问一次",
                crawler.retries.max_attempts
            );
        }
        Self { paths, config }
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// 描述文件输出路径
    pub fn descriptions_path(&self) -> PathBuf {
        self.paths.source_file(&self.config.descriptions_file)
    }

    /// 运行抓取主流程
    pub async fn run(&self) -> Result<DescriptionsOutput> {
        let nav = load_navigation_data(&self.paths.source_file(&self.config.navigation_file)).await?;
        log_links_loaded(nav.links.len(), &nav.sources);

        let session = BrowserSession::launch(self.config.crawler.headless, self.paths.chrome_executable.as_deref())
            .await
            .context("浏览器启动失败")?;

        let result = self.crawl(&session, &nav, &ThreadRandom).await;
        session.shutdown().await;
        result
    }

    /// 用给定的浏览器抓取全部链接并写出结果
    pub async fn crawl<A: Automation>(
        &self,
        automation: &A,
        nav: &NavigationData,
        random: &dyn RandomSource,
    ) -> Result<DescriptionsOutput> {
        let report = BatchScheduler::new(automation, &self.config.crawler, random)
            .run(&nav.links)
            .await;

        let output = DescriptionsOutput::build(&nav.name, &nav.base_url, &report, &self.config.crawler);
        let path = self.descriptions_path();
        write_json(&path, &output)
            .await
            .with_context(|| format!("无法写出描述文件: {}", path.display()))?;

        print_final_stats(&report, &path.display().to_string());
        Ok(output)
    }
}

/// 获取导航 HTML，返回 HTML 目录
pub async fn fetch_nav(paths: &RuntimePaths) -> Result<PathBuf> {
    let config = load_fetch_nav_config(&paths.nav_config).await?;
    info!("🎯 目标网站: {}", config.name);
    let html_dir = paths.source_file(&config.output.html_folder);

    let session = BrowserSession::launch(true, paths.chrome_executable.as_deref())
        .await
        .context("浏览器启动失败")?;
    let result = pipeline::fetch_navigation(&session, &config, &html_dir).await;
    session.shutdown().await;

    result.context("获取导航失败")?;
    info!("✅ HTML获取完成！请运行 parse-nav 生成JSON数据。");
    Ok(html_dir)
}

/// 解析导航 HTML
pub async fn parse_nav(paths: &RuntimePaths) -> Result<PathBuf> {
    let config = load_parse_nav_config(&paths.parse_config).await?;
    info!("🎯 {}", config.name);
    pipeline::run_parse_nav(&config, &paths.sources_dir).await
}

/// 合并导航与描述
pub async fn merge(paths: &RuntimePaths, navigation_file: &str, descriptions_file: &str) -> Result<PathBuf> {
    pipeline::run_merge(&paths.sources_dir, navigation_file, descriptions_file).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CrawlConfig, DelayRange};
    use crate::infrastructure::fake::{FakeAutomation, RecordingRandom, ScriptedPage};
    use crate::models::LinkDescriptor;

    fn app(sources_dir: PathBuf, max_attempts: u32) -> App {
        let mut crawler = CrawlConfig::default();
        crawler.batch_size = 2;
        crawler.delays.thinking = DelayRange::new(1, 1);
        crawler.delays.reading = DelayRange::new(1, 1);
        crawler.delays.tab_opening = DelayRange::new(1, 1);
        crawler.delays.batch_interval = DelayRange::new(1, 1);
        crawler.retries.max_attempts = max_attempts;

        let paths = RuntimePaths {
            sources_dir,
            ..RuntimePaths::default()
        };
        App::with_config(
            paths,
            FetchConfig {
                name: "Docs crawl".into(),
                navigation_file: "nav.json".into(),
                descriptions_file: "out/descriptions.json".into(),
                crawler,
            },
        )
    }

    fn nav(links: Vec<LinkDescriptor>) -> NavigationData {
        NavigationData {
            name: "Docs".into(),
            base_url: "https://d.dev".into(),
            total: links.len(),
            generated: String::new(),
            sources: vec![],
            links,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_crawl_writes_descriptions() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path().to_path_buf(), 3);
        let automation = FakeAutomation::new([
            ("https://d.dev/a".to_string(), ScriptedPage::ok("A").with_metas(&[Some("alpha")])),
            ("https://d.dev/b".to_string(), ScriptedPage::ok("B").with_status(Some(500))),
        ]);
        let nav = nav(vec![
            LinkDescriptor::new("A", "/a", "https://d.dev/a"),
            LinkDescriptor::new("B", "/b", "https://d.dev/b"),
        ]);

        let output = app
            .crawl(&automation, &nav, &RecordingRandom::new(false))
            .await
            .unwrap();

        assert_eq!(output.name, "Docs");
        assert_eq!(output.total, 2);
        assert_eq!(output.processing_stats.success_count, 1);
        assert_eq!(output.processing_stats.success_rate, "50.0%");

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(app.descriptions_path()).unwrap()).unwrap();
        assert_eq!(written["pages"]["https://d.dev/a"]["description"], "alpha");
        assert_eq!(written["pages"]["https://d.dev/b"]["title"], "");
        assert_eq!(written["crawlerConfig"]["batchSize"], 2);
        assert_eq!(written["processingStats"]["failedCount"], 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_crawl_empty_navigation() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path().to_path_buf(), 1);
        let automation = FakeAutomation::default();

        let output = app
            .crawl(&automation, &nav(vec![]), &RecordingRandom::new(false))
            .await
            .unwrap();

        assert_eq!(output.total, 0);
        assert_eq!(output.processing_stats.total_links, 0);
        assert_eq!(output.processing_stats.success_rate, "0.0%");
        assert!(automation.events().is_empty());
    }
}
