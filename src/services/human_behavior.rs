//! 人类行为模拟 - 业务能力层
//!
//! 页面加载后做一些"像人"的动作：移动指针、偶尔滚动、停下来阅读。
//! 任何内部错误只记录日志，不影响页面处理结果。

use std::time::Duration;

use tokio::time::sleep;
use tracing::debug;

use crate::config::Delays;
use crate::error::AppResult;
use crate::infrastructure::{PageHandle, RandomSource};

/// 指针移动步数范围 `[3, 8)`
const POINTER_STEPS: (u32, u32) = (3, 8);
/// 滚动概率
const SCROLL_PROBABILITY: f64 = 0.3;
/// 滚动距离范围 `[100, 400)` 像素
const SCROLL_OFFSET: (u32, u32) = (100, 400);
/// 滚动后的停顿
const SCROLL_PAUSE: Duration = Duration::from_millis(350);

/// 人类行为模拟器
pub struct HumanBehaviorSimulator<'a> {
    delays: &'a Delays,
    random: &'a dyn RandomSource,
}

impl<'a> HumanBehaviorSimulator<'a> {
    pub fn new(delays: &'a Delays, random: &'a dyn RandomSource) -> Self {
        Self { delays, random }
    }

    /// 执行一轮模拟，从不返回错误
    pub async fn simulate<P: PageHandle + ?Sized>(&self, page: &P, label: &str) {
        if let Err(e) = self.try_simulate(page).await {
            debug!("{} 🤖 模拟行为出错: {}", label, e);
        }
    }

    async fn try_simulate<P: PageHandle + ?Sized>(&self, page: &P) -> AppResult<()> {
        if let Some(viewport) = page.viewport().await? {
            let x = self.random.float_below(viewport.width);
            let y = self.random.float_below(viewport.height);
            let steps = self.random.int_in(POINTER_STEPS.0, POINTER_STEPS.1);
            page.move_pointer(x, y, steps).await?;

            if self.random.chance(SCROLL_PROBABILITY) {
                let offset = self.random.int_in(SCROLL_OFFSET.0, SCROLL_OFFSET.1);
                page.scroll_by(f64::from(offset)).await?;
                sleep(SCROLL_PAUSE).await;
            }
        }

        sleep(self.random.delay(self.delays.reading)).await;
        Ok(())
    }
}
