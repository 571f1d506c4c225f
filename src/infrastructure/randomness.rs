//! 随机数来源
//!
//! 所有节奏延迟与行为模拟的随机量都从这里取，测试可以注入确定值。

use std::time::Duration;

use rand::Rng;

use crate::config::DelayRange;

/// 可注入的随机数来源
pub trait RandomSource: Send + Sync {
    /// 在 `[range.min, range.max]` 内均匀取一个延迟
    fn delay(&self, range: DelayRange) -> Duration;

    /// 在 `[low, high)` 内均匀取一个整数
    fn int_in(&self, low: u32, high: u32) -> u32;

    /// 在 `[0, upper)` 内均匀取一个浮点数
    fn float_below(&self, upper: f64) -> f64;

    /// 以概率 `p` 返回 `true`
    fn chance(&self, p: f64) -> bool;
}

/// 基于线程本地随机数生成器的实现
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn delay(&self, range: DelayRange) -> Duration {
        if range.min >= range.max {
            return Duration::from_millis(range.min);
        }
        Duration::from_millis(rand::rng().random_range(range.min..=range.max))
    }

    fn int_in(&self, low: u32, high: u32) -> u32 {
        if low >= high {
            return low;
        }
        rand::rng().random_range(low..high)
    }

    fn float_below(&self, upper: f64) -> f64 {
        if upper <= 0.0 {
            return 0.0;
        }
        rand::rng().random_range(0.0..upper)
    }

    fn chance(&self, p: f64) -> bool {
        rand::rng().random_bool(p.clamp(0.0, 1.0))
    }
}
