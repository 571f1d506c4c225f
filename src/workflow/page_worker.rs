//! 单页处理流程 - 流程层
//!
//! 流程顺序：
//! 1. 安装请求拦截
//! 2. 思考延迟
//! 3. 导航（等到 DOMContentLoaded）
//! 4. 短暂停顿 + 行为模拟
//! 5. 提取标题与描述
//!
//! 任何一步出错都转换成失败结果，`visit` 本身从不返回错误。

use std::time::Duration;

use tokio::time::sleep;
use tracing::{info, warn};

use crate::config::CrawlConfig;
use crate::error::{AppError, AppResult, BrowserError};
use crate::infrastructure::{PageHandle, RandomSource, ResourceFilter};
use crate::models::{LinkDescriptor, PageInfo, PageOutcome};
use crate::services::{metadata, HumanBehaviorSimulator};
use crate::utils::truncate_text;

/// 导航成功后、模拟行为前的固定停顿
const SETTLE_PAUSE: Duration = Duration::from_millis(800);

/// 页面在整个任务中的位置，仅用于日志
#[derive(Debug, Clone, Copy)]
pub struct PagePosition {
    /// 从 1 开始
    pub index: usize,
    pub total: usize,
}

impl std::fmt::Display for PagePosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}/{}]", self.index, self.total)
    }
}

/// 单页处理器
///
/// - 不持有页面，由调度器传入
/// - 不写统计，只返回结果
pub struct PageWorker<'a> {
    config: &'a CrawlConfig,
    random: &'a dyn RandomSource,
    filter: ResourceFilter,
}

impl<'a> PageWorker<'a> {
    pub fn new(config: &'a CrawlConfig, random: &'a dyn RandomSource, filter: ResourceFilter) -> Self {
        Self { config, random, filter }
    }

    /// 处理一个链接，总是返回恰好一个结果
    pub async fn visit<P: PageHandle + ?Sized>(
        &self,
        page: &P,
        link: &LinkDescriptor,
        position: PagePosition,
    ) -> PageOutcome {
        info!("   {} 🔗 {}", position, link.title);
        info!("   📍 {}", link.full_url);

        match self.try_visit(page, link, position).await {
            Ok(data) => {
                info!("   {} ✅ 成功", position);
                info!("      📑 标题: {}", if data.title.is_empty() { "无" } else { data.title.as_str() });
                if data.description.is_empty() {
                    info!("      📝 描述: 无");
                } else {
                    info!("      📝 描述: {}", truncate_text(&data.description, 50));
                }
                PageOutcome::success(&link.full_url, data)
            }
            Err(e) => {
                warn!("   {} ❌ 失败: {}", position, e);
                PageOutcome::failure(&link.full_url)
            }
        }
    }

    async fn try_visit<P: PageHandle + ?Sized>(
        &self,
        page: &P,
        link: &LinkDescriptor,
        position: PagePosition,
    ) -> AppResult<PageInfo> {
        let url = link.full_url.as_str();

        page.install_filter(self.filter).await?;

        sleep(self.random.delay(self.config.delays.thinking)).await;

        info!("   {} 📄 正在加载...", position);
        let response = page.navigate(url, self.config.navigation_timeout()).await?;
        match response {
            Some(response) if response.is_success() => {}
            Some(response) => {
                return Err(AppError::Browser(BrowserError::BadStatus {
                    url: url.to_string(),
                    status: response.status,
                }))
            }
            None => {
                return Err(AppError::Browser(BrowserError::NoResponse { url: url.to_string() }));
            }
        }

        sleep(SETTLE_PAUSE).await;
        HumanBehaviorSimulator::new(&self.config.delays, self.random)
            .simulate(page, &position.to_string())
            .await;

        info!("   {} 🔍 提取信息...", position);
        metadata::extract_page_info(page).await
    }
}
