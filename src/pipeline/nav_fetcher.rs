//! 导航页获取
//!
//! 逐个打开 `docsUrls` 中的文档首页，等到导航元素出现后把它的 outerHTML
//! 存到 `<sources_dir>/<htmlFolder>/<页面名>.html`，供 `nav_parser` 解析。

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use scraper::{Html, Selector};
use tokio::fs;
use tracing::{info, warn};

use crate::config::FetchNavConfig;
use crate::error::{AppError, BrowserError};
use crate::infrastructure::{Automation, ContextProfile, PageHandle};

/// 等待导航元素出现的上限
pub const SELECTOR_TIMEOUT: Duration = Duration::from_secs(10);

/// 一次获取的汇总
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavFetchSummary {
    /// 写出的 HTML 文件，按处理顺序
    pub files: Vec<PathBuf>,
    /// 所有导航元素中 `<a>` 的总数
    pub total_links: usize,
}

/// 统计片段中的 `<a>` 数量（只用于日志）
pub fn count_anchors(html: &str) -> usize {
    let fragment = Html::parse_fragment(html);
    match Selector::parse("a") {
        Ok(selector) => fragment.select(&selector).count(),
        Err(_) => 0,
    }
}

/// 获取全部导航页并写入 `html_dir`
///
/// 任一页面失败即中止；已写出的文件保留。标签页与上下文总会被关闭。
pub async fn fetch_navigation<A: Automation>(
    automation: &A,
    config: &FetchNavConfig,
    html_dir: &Path,
) -> Result<NavFetchSummary> {
    info!("🔗 文档页面数量: {}", config.docs_urls.len());
    fs::create_dir_all(html_dir)
        .await
        .with_context(|| format!("无法创建 HTML 目录: {}", html_dir.display()))?;

    let profile = ContextProfile::desktop(config.crawler.user_agent.clone());
    let context = automation.open_context(&profile).await?;
    let result = match automation.open_page(&context).await {
        Ok(page) => {
            let result = fetch_pages(&page, config, html_dir).await;
            if let Err(e) = page.close().await {
                warn!("⚠️ 关闭页面失败: {}", e);
            }
            result
        }
        Err(e) => Err(e.into()),
    };
    if let Err(e) = automation.close_context(context).await {
        warn!("⚠️ 关闭浏览上下文失败: {}", e);
    }

    let summary = result?;
    info!("🎉 所有页面处理完成！");
    info!("📊 总计检测到 {} 个链接", summary.total_links);
    Ok(summary)
}

async fn fetch_pages<P: PageHandle>(page: &P, config: &FetchNavConfig, html_dir: &Path) -> Result<NavFetchSummary> {
    let selector = &config.navigation.full_selector;
    let mut summary = NavFetchSummary {
        files: Vec::with_capacity(config.docs_urls.len()),
        total_links: 0,
    };

    for (name, url) in &config.docs_urls {
        info!("📄 处理页面: {} ({})", name, url);
        page.navigate(url, config.page_timeout()).await?;
        info!("✅ {} 页面加载完成", name);

        info!("⏳ 等待导航元素加载 ({})...", selector);
        page.wait_for_selector(selector, SELECTOR_TIMEOUT).await?;

        let html = page.outer_html(selector).await?.ok_or_else(|| {
            AppError::Browser(BrowserError::ElementMissing {
                selector: selector.clone(),
                page: name.clone(),
            })
        })?;

        let path = html_dir.join(format!("{}.html", name));
        fs::write(&path, &html)
            .await
            .with_context(|| format!("无法写出导航 HTML: {}", path.display()))?;
        info!("💾 {} 导航HTML已保存到: {}", name, path.display());

        let links = count_anchors(&html);
        info!("🔗 {} 检测到 {} 个链接", name, links);
        summary.total_links += links;
        summary.files.push(path);
    }
    Ok(summary)
}
