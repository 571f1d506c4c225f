//! 合并后的增强链接列表

use serde::{Deserialize, Serialize};

use crate::models::report::{CrawlerConfigSummary, ProcessingStats};

/// 导航链接 + 页面元数据
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedLink {
    pub nav_title: String,
    pub link: String,
    pub page_title: String,
    pub page_description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionRate {
    pub page_title: String,
    pub page_description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedStats {
    pub total_links: usize,
    pub with_page_title: usize,
    pub with_page_description: usize,
    pub completion_rate: CompletionRate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationSource {
    pub name: String,
    pub base_url: String,
    pub sources: Vec<String>,
    pub generated: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescriptionsSource {
    pub name: String,
    pub processing_stats: ProcessingStats,
    pub crawler_config: CrawlerConfigSummary,
    pub generated: String,
}

impl DescriptionsSource {
    /// 描述数据缺失时的占位
    pub fn missing() -> Self {
        Self {
            name: "未获取".to_string(),
            processing_stats: ProcessingStats::empty(),
            crawler_config: CrawlerConfigSummary::empty(),
            generated: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceInfo {
    pub navigation: NavigationSource,
    pub descriptions: DescriptionsSource,
}

/// `enhanced-list.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedListOutput {
    pub total: usize,
    pub generated: String,
    pub stats: EnhancedStats,
    pub source_info: SourceInfo,
    pub links: Vec<EnhancedLink>,
}
