//! 抓取统计与输出文档

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::CrawlConfig;
use crate::models::outcome::PageInfo;

/// 全部批次完成后的汇总快照
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregateReport {
    pub total_links: usize,
    pub success_count: usize,
    pub failed_count: usize,
    pub processing_time: Duration,
    /// 按 URL 索引的页面数据
    pub pages: BTreeMap<String, PageInfo>,
}

impl AggregateReport {
    /// 成功率，`total_links == 0` 时为 0
    pub fn success_rate(&self) -> f64 {
        if self.total_links == 0 {
            return 0.0;
        }
        self.success_count as f64 / self.total_links as f64
    }

    /// 形如 `93.3%`
    pub fn success_rate_label(&self) -> String {
        format_percent(self.success_count, self.total_links)
    }

    /// 形如 `12.5s`
    pub fn processing_time_label(&self) -> String {
        format!("{:.1}s", self.processing_time.as_secs_f64())
    }

    /// 有标题的页面数
    pub fn with_title(&self) -> usize {
        self.pages.values().filter(|p| !p.title.is_empty()).count()
    }

    /// 有描述的页面数
    pub fn with_description(&self) -> usize {
        self.pages.values().filter(|p| !p.description.is_empty()).count()
    }
}

/// 百分比文本，分母为 0 时为 `0.0%`
pub fn format_percent(part: usize, whole: usize) -> String {
    if whole == 0 {
        return "0.0%".to_string();
    }
    format!("{:.1}%", part as f64 / whole as f64 * 100.0)
}

/// 输出文件中的处理统计
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingStats {
    pub total_links: usize,
    pub success_count: usize,
    pub failed_count: usize,
    pub success_rate: String,
    pub processing_time: String,
}

impl ProcessingStats {
    /// 未执行抓取时的占位统计
    pub fn empty() -> Self {
        Self {
            total_links: 0,
            success_count: 0,
            failed_count: 0,
            success_rate: "0%".to_string(),
            processing_time: "0s".to_string(),
        }
    }
}

impl From<&AggregateReport> for ProcessingStats {
    fn from(report: &AggregateReport) -> Self {
        Self {
            total_links: report.total_links,
            success_count: report.success_count,
            failed_count: report.failed_count,
            success_rate: report.success_rate_label(),
            processing_time: report.processing_time_label(),
        }
    }
}

/// 输出文件中记录的爬虫参数
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlerConfigSummary {
    pub batch_size: usize,
    pub headless: bool,
    pub user_agent: String,
}

impl CrawlerConfigSummary {
    pub fn empty() -> Self {
        Self {
            batch_size: 0,
            headless: true,
            user_agent: String::new(),
        }
    }
}

impl From<&CrawlConfig> for CrawlerConfigSummary {
    fn from(config: &CrawlConfig) -> Self {
        Self {
            batch_size: config.batch_size,
            headless: config.headless,
            user_agent: config.user_agent.clone(),
        }
    }
}

/// 描述数据文件
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescriptionsOutput {
    pub name: String,
    pub base_url: String,
    /// 去重后的页面条目数
    pub total: usize,
    pub generated: String,
    pub processing_stats: ProcessingStats,
    pub crawler_config: CrawlerConfigSummary,
    #[serde(default)]
    pub pages: BTreeMap<String, PageInfo>,
}

impl DescriptionsOutput {
    pub fn build(
        name: impl Into<String>,
        base_url: impl Into<String>,
        report: &AggregateReport,
        config: &CrawlConfig,
    ) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            total: report.pages.len(),
            generated: crate::utils::now_iso8601(),
            processing_stats: ProcessingStats::from(report),
            crawler_config: CrawlerConfigSummary::from(config),
            pages: report.pages.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_report_rate_is_zero() {
        let report = AggregateReport::default();
        assert_eq!(report.success_rate(), 0.0);
        assert_eq!(report.success_rate_label(), "0.0%");
    }

    #[test]
    fn test_rate_label_has_one_decimal() {
        let report = AggregateReport {
            total_links: 3,
            success_count: 2,
            failed_count: 1,
            ..Default::default()
        };
        assert_eq!(report.success_rate_label(), "66.7%");
    }

    #[test]
    fn test_processing_time_label() {
        let report = AggregateReport {
            processing_time: Duration::from_millis(12_340),
            ..Default::default()
        };
        assert_eq!(report.processing_time_label(), "12.3s");
    }

    #[test]
    fn test_output_serializes_camel_case() {
        let mut report = AggregateReport {
            total_links: 1,
            success_count: 1,
            ..Default::default()
        };
        report
            .pages
            .insert("https://a.dev/x".to_string(), PageInfo::new("X", "about x"));

        let output = DescriptionsOutput::build("Docs", "https://a.dev", &report, &CrawlConfig::default());
        let value = serde_json::to_value(&output).unwrap();

        assert_eq!(value["total"], 1);
        assert_eq!(value["processingStats"]["successRate"], "100.0%");
        assert_eq!(value["processingStats"]["totalLinks"], 1);
        assert_eq!(value["crawlerConfig"]["batchSize"], 5);
        assert_eq!(value["pages"]["https://a.dev/x"]["description"], "about x");
    }
}
