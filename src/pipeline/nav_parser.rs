//! 导航页解析
//!
//! 从保存下来的导航 HTML 中收集所有链接，拼成完整 URL 并去重。

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use scraper::{Html, Selector};
use tokio::fs;
use tracing::{info, warn};

use crate::config::ParseNavConfig;
use crate::models::{write_json, LinkDescriptor, NavigationData};
use crate::utils::now_iso8601;

/// 相对链接拼接 `base_url`，以 `http` 开头的原样保留
pub fn full_url(base_url: &str, href: &str) -> String {
    if href.starts_with("http") {
        href.to_string()
    } else {
        format!("{}{}", base_url, href)
    }
}

/// 提取文档中所有带 `href` 且文本非空的 `<a>`
pub fn extract_links(html: &str, base_url: &str) -> Vec<LinkDescriptor> {
    let document = Html::parse_document(html);
    let selector = match Selector::parse("a") {
        Ok(s) => s,
        Err(_) => return Vec::new(),
    };

    document
        .select(&selector)
        .filter_map(|anchor| {
            let href = anchor.value().attr("href").filter(|h| !h.is_empty())?;
            let title = anchor.text().collect::<String>();
            let title = title.trim();
            if title.is_empty() {
                return None;
            }
            Some(LinkDescriptor::new(title, href, full_url(base_url, href)))
        })
        .collect()
}

/// 按 `full_url` 去重，保留第一次出现
pub fn dedupe_links(links: Vec<LinkDescriptor>) -> Vec<LinkDescriptor> {
    let mut seen = HashSet::new();
    links
        .into_iter()
        .filter(|link| seen.insert(link.full_url.clone()))
        .collect()
}

/// 目录下所有 `.html` 文件，按文件名排序
async fn html_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = fs::read_dir(dir)
        .await
        .with_context(|| format!("无法读取 HTML 目录: {}", dir.display()))?;

    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) == Some("html") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// 解析 `<sources_dir>/<htmlFolder>` 下的全部导航页
pub async fn parse_navigation(config: &ParseNavConfig, sources_dir: &Path) -> Result<NavigationData> {
    let folder = sources_dir.join(&config.input.html_folder);
    info!("📄 读取HTML文件夹: {}", folder.display());

    let files = html_files(&folder).await?;
    if files.is_empty() {
        warn!("⚠️ 没有找到 HTML 文件: {}", folder.display());
    }

    let mut links = Vec::new();
    let mut sources = Vec::new();
    for file in &files {
        let source = file
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let html = fs::read_to_string(file)
            .await
            .with_context(|| format!("无法读取 HTML 文件: {}", file.display()))?;

        let found = extract_links(&html, &config.base_url);
        info!("🔍 {} 找到 {} 个链接", source, found.len());
        links.extend(found);
        sources.push(source);
    }

    let links = dedupe_links(links);
    info!("🔗 合并去重后得到 {} 个唯一链接", links.len());

    Ok(NavigationData {
        name: config.name.clone(),
        base_url: config.base_url.clone(),
        total: links.len(),
        generated: now_iso8601(),
        sources,
        links,
    })
}

/// 解析并写出导航 JSON，返回输出路径
pub async fn run_parse_nav(config: &ParseNavConfig, sources_dir: &Path) -> Result<PathBuf> {
    let nav = parse_navigation(config, sources_dir).await?;
    let output = sources_dir.join(&config.output.json_file);
    write_json(&output, &nav).await?;

    info!("💾 JSON数据已保存到: {}", output.display());
    info!("📊 总计: {} 个链接", nav.total);
    info!("📦 源文件: {}", nav.sources.join(", "));
    for (i, link) in nav.links.iter().take(5).enumerate() {
        info!("{}. {}", i + 1, link.title);
        info!("   {}", link.full_url);
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://mastra.ai";

    #[test]
    fn test_relative_and_absolute_hrefs() {
        assert_eq!(full_url(BASE, "/docs/agents"), "https://mastra.ai/docs/agents");
        assert_eq!(full_url(BASE, "https://github.com/x"), "https://github.com/x");
        assert_eq!(full_url(BASE, "#intro"), "https://mastra.ai#intro");
    }

    #[test]
    fn test_skips_anchors_without_href_or_text() {
        let html = r#"
            <nav>
              <a href="/docs/a"> Agents </a>
              <a href="/docs/b"></a>
              <a>No href</a>
              <a href="">Empty</a>
              <a href="/docs/c"><span>Nested</span> text</a>
            </nav>
        "#;

        let links = extract_links(html, BASE);
        assert_eq!(
            links,
            vec![
                LinkDescriptor::new("Agents", "/docs/a", "https://mastra.ai/docs/a"),
                LinkDescriptor::new("Nested text", "/docs/c", "https://mastra.ai/docs/c"),
            ]
        );
    }

    #[test]
    fn test_dedupe_keeps_first() {
        let links = vec![
            LinkDescriptor::new("First", "/a", "https://mastra.ai/a"),
            LinkDescriptor::new("Other", "/b", "https://mastra.ai/b"),
            LinkDescriptor::new("Second", "https://mastra.ai/a", "https://mastra.ai/a"),
        ];

        let unique = dedupe_links(links);
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].title, "First");
        assert_eq!(unique[1].title, "Other");
    }
}
