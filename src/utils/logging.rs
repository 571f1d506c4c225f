//! 日志辅助函数
//!
//! 统一批次横幅与统计输出的格式

use tracing::info;

use crate::models::report::{format_percent, AggregateReport};

/// 记录程序启动信息
pub fn log_startup(name: &str, batch_size: usize, timeout_ms: u64) {
    info!("{}", "=".repeat(60));
    info!("🎯 {}", name);
    info!("📊 批处理大小: {}", batch_size);
    info!("⏱️  超时设置: {}ms", timeout_ms);
    info!("{}", "=".repeat(60));
}

/// 记录链接加载信息
pub fn log_links_loaded(total: usize, sources: &[String]) {
    info!("📊 找到 {} 个链接需要处理", total);
    if sources.is_empty() {
        info!("🗂️  数据源: 未知");
    } else {
        info!("🗂️  数据源: {}", sources.join(", "));
    }
}

/// 记录批次开始信息
///
/// `start` / `end` 为从 1 开始的闭区间
pub fn log_batch_start(batch_num: usize, total_batches: usize, start: usize, end: usize, total: usize) {
    info!("\n{}", "=".repeat(60));
    info!("🚀 第 {}/{} 批 ({} 个页面)", batch_num, total_batches, end + 1 - start);
    info!("📍 范围: {}-{} / {}", start, end, total);
    info!("{}", "=".repeat(60));
}

/// 记录批次完成信息
pub fn log_batch_complete(batch_num: usize, success: usize, batch_len: usize, processed: usize, total: usize) {
    info!("\n{}", "─".repeat(60));
    info!("✅ 第 {} 批完成 - 成功: {}/{}", batch_num, success, batch_len);
    info!("📈 总进度: {}/{} ({})", processed, total, format_percent(processed, total));
    info!("{}", "─".repeat(60));
}

/// 打印最终统计信息
pub fn print_final_stats(report: &AggregateReport, output_path: &str) {
    info!("\n{}", "=".repeat(60));
    info!("🎉 处理完成！");
    info!("完成时间: {}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"));
    info!("📁 输出文件: {}", output_path);
    info!("{}", "=".repeat(60));
    info!("   - 总链接: {}", report.total_links);
    info!("   - 成功: {}", report.success_count);
    info!("   - 失败: {}", report.failed_count);
    info!("   - 成功率: {}", report.success_rate_label());
    info!("   - 处理时间: {}", report.processing_time_label());
    info!("   - 有标题: {}", report.with_title());
    info!("   - 有描述: {}", report.with_description());
    info!("{}", "=".repeat(60));

    info!("\n📋 页面信息示例:");
    let samples = report
        .pages
        .iter()
        .filter(|(_, p)| !p.title.is_empty() || !p.description.is_empty())
        .take(3);
    for (i, (url, page)) in samples.enumerate() {
        info!("{}. 标题: {}", i + 1, or_none(&page.title));
        info!("   描述: {}", or_none(&page.description));
        info!("   链接: {}", url);
    }
}

fn or_none(text: &str) -> &str {
    if text.is_empty() {
        "无"
    } else {
        text
    }
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大字符数
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
