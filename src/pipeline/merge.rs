//! 合并导航数据与页面描述
//!
//! 导航文件必须存在；描述文件缺失或损坏时只告警，所有页面字段留空。

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::{info, warn};

use crate::models::enhanced::{CompletionRate, DescriptionsSource, EnhancedStats, NavigationSource, SourceInfo};
use crate::models::loaders::load_json_file;
use crate::models::report::format_percent;
use crate::models::{
    load_navigation_data, write_json, DescriptionsOutput, EnhancedLink, EnhancedListOutput, NavigationData, PageInfo,
};
use crate::utils::{now_iso8601, truncate_text};

/// 合并结果文件名
pub const ENHANCED_LIST_FILE: &str = "enhanced-list.json";

/// 先按原 URL 查找，再尝试去掉或补上末尾斜杠
pub fn lookup_page<'a>(pages: &'a BTreeMap<String, PageInfo>, url: &str) -> Option<&'a PageInfo> {
    if let Some(page) = pages.get(url) {
        return Some(page);
    }
    let stripped = url.strip_suffix('/').unwrap_or(url);
    pages.get(stripped).or_else(|| pages.get(&format!("{}/", url)))
}

/// 合并两份数据
pub fn merge_sources(nav: &NavigationData, descriptions: Option<&DescriptionsOutput>) -> EnhancedListOutput {
    let empty = BTreeMap::new();
    let pages = descriptions.map(|d| &d.pages).unwrap_or(&empty);

    let links: Vec<EnhancedLink> = nav
        .links
        .iter()
        .map(|link| {
            let page = lookup_page(pages, &link.full_url);
            EnhancedLink {
                nav_title: link.title.clone(),
                link: link.full_url.clone(),
                page_title: page.map(|p| p.title.clone()).unwrap_or_default(),
                page_description: page.map(|p| p.description.clone()).unwrap_or_default(),
            }
        })
        .collect();

    let total = links.len();
    let with_page_title = links.iter().filter(|l| !l.page_title.is_empty()).count();
    let with_page_description = links.iter().filter(|l| !l.page_description.is_empty()).count();

    let descriptions = match descriptions {
        Some(d) => DescriptionsSource {
            name: d.name.clone(),
            processing_stats: d.processing_stats.clone(),
            crawler_config: d.crawler_config.clone(),
            generated: d.generated.clone(),
        },
        None => DescriptionsSource::missing(),
    };

    EnhancedListOutput {
        total,
        generated: now_iso8601(),
        stats: EnhancedStats {
            total_links: total,
            with_page_title,
            with_page_description,
            completion_rate: CompletionRate {
                page_title: format_percent(with_page_title, total),
                page_description: format_percent(with_page_description, total),
            },
        },
        source_info: SourceInfo {
            navigation: NavigationSource {
                name: nav.name.clone(),
                base_url: nav.base_url.clone(),
                sources: nav.sources.clone(),
                generated: nav.generated.clone(),
            },
            descriptions,
        },
        links,
    }
}

/// 读取描述文件；缺失或无法解析时返回 `None`
async fn load_descriptions(path: &Path) -> Option<DescriptionsOutput> {
    match load_json_file::<DescriptionsOutput>(path).await {
        Ok(descriptions) => {
            info!("  ✅ 读取了 {} 个页面描述", descriptions.pages.len());
            info!("  📊 处理统计: {} 成功率", descriptions.processing_stats.success_rate);
            info!("  ⏱️  处理时间: {}", descriptions.processing_stats.processing_time);
            Some(descriptions)
        }
        Err(e) => {
            warn!("  ⚠️ 无法读取页面描述数据，将使用基础链接数据: {:#}", e);
            None
        }
    }
}

/// 合并并写出 `<sources_dir>/enhanced-list.json`，返回输出路径
pub async fn run_merge(sources_dir: &Path, navigation_file: &str, descriptions_file: &str) -> Result<PathBuf> {
    info!("🔗 开始合并导航数据和页面描述数据...");

    let nav = load_navigation_data(&sources_dir.join(navigation_file)).await?;
    info!("  📍 来源: {}", nav.sources.join(", "));
    info!("  🌐 基础URL: {}", nav.base_url);

    let descriptions = load_descriptions(&sources_dir.join(descriptions_file)).await;
    let merged = merge_sources(&nav, descriptions.as_ref());

    let output = sources_dir.join(ENHANCED_LIST_FILE);
    write_json(&output, &merged).await?;

    info!("\n✅ 数据合并完成！");
    info!("   • 总链接数: {}", merged.total);
    info!(
        "   • 有页面标题: {} ({})",
        merged.stats.with_page_title, merged.stats.completion_rate.page_title
    );
    info!(
        "   • 有页面描述: {} ({})",
        merged.stats.with_page_description, merged.stats.completion_rate.page_description
    );
    info!("💾 输出文件: {}", output.display());
    for (i, link) in merged.links.iter().take(3).enumerate() {
        info!("{}. 导航标题: {}", i + 1, link.nav_title);
        info!("   页面标题: {}", if link.page_title.is_empty() { "无" } else { link.page_title.as_str() });
        if link.page_description.is_empty() {
            info!("   页面描述: 无");
        } else {
            info!("   页面描述: {}", truncate_text(&link.page_description, 100));
        }
        info!("   链接: {}", link.link);
    }

    Ok(output)
}
