//! 批次调度器 - 编排层
//!
//! ## 职责
//!
//! 1. 把链接切成固定大小的批次，批次之间串行
//! 2. 每个批次独占一个隔离的浏览上下文，批次结束后销毁
//! 3. 批内页面交错启动（标签页打开延迟），之后并发推进
//! 4. 等到批内所有页面都结束（成功、失败或 panic）才清理资源
//! 5. 把批次结果按链接顺序交给汇总器
//!
//! 批内并发在同一个任务里通过 `FuturesUnordered` 交错执行，不派生线程。

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt;
use tokio::time::{sleep, Instant};
use tracing::{debug, error, info, warn};

use crate::config::CrawlConfig;
use crate::infrastructure::{should_block, Automation, ContextProfile, PageHandle, RandomSource, ResourceFilter};
use crate::models::{AggregateReport, LinkDescriptor, PageOutcome};
use crate::orchestrator::aggregator::ResultAggregator;
use crate::orchestrator::batch_plan::{Batch, BatchPlan};
use crate::utils::logging::{log_batch_complete, log_batch_start};
use crate::workflow::{PagePosition, PageWorker};

type Settled = Result<PageOutcome, Box<dyn Any + Send>>;

/// 批次调度器
pub struct BatchScheduler<'a, A: Automation> {
    automation: &'a A,
    config: &'a CrawlConfig,
    random: &'a dyn RandomSource,
    filter: ResourceFilter,
}

impl<'a, A: Automation> BatchScheduler<'a, A> {
    pub fn new(automation: &'a A, config: &'a CrawlConfig, random: &'a dyn RandomSource) -> Self {
        Self {
            automation,
            config,
            random,
            filter: should_block,
        }
    }

    /// 替换默认的请求过滤策略
    pub fn with_filter(mut self, filter: ResourceFilter) -> Self {
        self.filter = filter;
        self
    }

    /// 处理全部链接，返回汇总报告
    ///
    /// 单个页面的错误不会中断调度；空列表直接返回零值报告。
    pub async fn run(&self, links: &[LinkDescriptor]) -> AggregateReport {
        let started = Instant::now();
        let total = links.len();
        let plan = BatchPlan::new(total, self.config.batch_size);
        let total_batches = plan.batch_count();
        let mut aggregator = ResultAggregator::new(total);

        for batch in plan.batches() {
            if batch.needs_interval() {
                let pause = self.random.delay(self.config.delays.batch_interval);
                info!("\n⏰ 批次间隔 {}ms...", pause.as_millis());
                sleep(pause).await;
            }

            log_batch_start(batch.index + 1, total_batches, batch.start + 1, batch.end, total);

            let outcomes = self.run_batch(&batch, &links[batch.range()], total).await;
            let tally = aggregator.record_batch(outcomes);

            log_batch_complete(batch.index + 1, tally.success, batch.len(), aggregator.processed(), total);
        }

        aggregator.finish(started.elapsed())
    }

    /// 处理单个批次，返回与 `links` 一一对应的结果
    async fn run_batch(&self, batch: &Batch, links: &[LinkDescriptor], total: usize) -> Vec<PageOutcome> {
        let profile = ContextProfile::desktop(self.config.user_agent.as_str());
        let context = match self.automation.open_context(&profile).await {
            Ok(context) => context,
            Err(e) => {
                error!("❌ 第 {} 批创建浏览上下文失败: {}", batch.index + 1, e);
                return links.iter().map(|link| PageOutcome::failure(&link.full_url)).collect();
            }
        };
        debug!("🧭 第 {} 批使用上下文 {}", batch.index + 1, context.id);

        let worker = PageWorker::new(self.config, self.random, self.filter);
        let mut slots: Vec<Option<PageOutcome>> = vec![None; links.len()];
        let mut pages: Vec<Arc<A::Page>> = Vec::with_capacity(links.len());
        let mut running = FuturesUnordered::new();

        for (offset, link) in links.iter().enumerate() {
            let position = PagePosition {
                index: batch.start + offset + 1,
                total,
            };

            // 打开标签页期间继续推进已启动的页面
            let opened = {
                let open = self.automation.open_page(&context);
                tokio::pin!(open);
                loop {
                    tokio::select! {
                        opened = &mut open => break opened,
                        Some((done, settled)) = running.next() => {
                            slots[done] = Some(settle(&links[done], batch.start + done + 1, settled));
                        }
                    }
                }
            };

            match opened {
                Ok(page) => {
                    let page = Arc::new(page);
                    pages.push(Arc::clone(&page));
                    let worker = &worker;
                    running.push(async move {
                        let settled = AssertUnwindSafe(worker.visit(page.as_ref(), link, position))
                            .catch_unwind()
                            .await;
                        (offset, settled)
                    });
                }
                Err(e) => {
                    error!("   {} ❌ 打开标签页失败: {}", position, e);
                    slots[offset] = Some(PageOutcome::failure(&link.full_url));
                }
            }

            // 最后一个页面之后不再等待
            if offset + 1 < links.len() {
                let pause = sleep(self.random.delay(self.config.delays.tab_opening));
                tokio::pin!(pause);
                loop {
                    tokio::select! {
                        _ = &mut pause => break,
                        Some((done, settled)) = running.next() => {
                            slots[done] = Some(settle(&links[done], batch.start + done + 1, settled));
                        }
                    }
                }
            }
        }

        while let Some((done, settled)) = running.next().await {
            slots[done] = Some(settle(&links[done], batch.start + done + 1, settled));
        }
        drop(running);

        info!("🧹 清理第 {} 批资源...", batch.index + 1);
        for page in &pages {
            if let Err(e) = page.close().await {
                warn!("⚠️  关闭页面出错: {}", e);
            }
        }
        drop(pages);
        if let Err(e) = self.automation.close_context(context).await {
            warn!("⚠️  关闭浏览上下文出错: {}", e);
        }

        slots
            .into_iter()
            .zip(links)
            .map(|(slot, link)| slot.unwrap_or_else(|| PageOutcome::failure(&link.full_url)))
            .collect()
    }
}

/// 把任务的结束状态转换成结果，panic 视为失败
fn settle(link: &LinkDescriptor, index: usize, settled: Settled) -> PageOutcome {
    match settled {
        Ok(outcome) => outcome,
        Err(panic) => {
            error!("[页面 {}] 任务执行失败: {}", index, panic_message(panic.as_ref()));
            PageOutcome::failure(&link.full_url)
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.as_str()
    } else {
        "未知错误"
    }
}
