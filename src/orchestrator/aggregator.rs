//! 结果汇总
//!
//! 只在一个批次全部结束后被调用，不存在并发写入。

use std::collections::BTreeMap;
use std::time::Duration;

use crate::models::{AggregateReport, PageInfo, PageOutcome};

/// 单个批次的计数
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchTally {
    pub success: usize,
    pub failed: usize,
}

impl BatchTally {
    pub fn total(&self) -> usize {
        self.success + self.failed
    }
}

/// 结果汇总器
#[derive(Debug)]
pub struct ResultAggregator {
    total_links: usize,
    success_count: usize,
    failed_count: usize,
    pages: BTreeMap<String, PageInfo>,
}

impl ResultAggregator {
    pub fn new(total_links: usize) -> Self {
        Self {
            total_links,
            success_count: 0,
            failed_count: 0,
            pages: BTreeMap::new(),
        }
    }

    /// 记录一个结果；同一 URL 后写覆盖先写
    pub fn record(&mut self, outcome: PageOutcome) {
        if outcome.success {
            self.success_count += 1;
        } else {
            self.failed_count += 1;
        }
        self.pages.insert(outcome.url, outcome.data);
    }

    /// 记录一个批次的全部结果
    pub fn record_batch(&mut self, outcomes: impl IntoIterator<Item = PageOutcome>) -> BatchTally {
        let mut tally = BatchTally::default();
        for outcome in outcomes {
            if outcome.success {
                tally.success += 1;
            } else {
                tally.failed += 1;
            }
            self.record(outcome);
        }
        tally
    }

    /// 已记录的结果数
    pub fn processed(&self) -> usize {
        self.success_count + self.failed_count
    }

    /// 生成最终快照
    pub fn finish(self, processing_time: Duration) -> AggregateReport {
        AggregateReport {
            total_links: self.total_links,
            success_count: self.success_count,
            failed_count: self.failed_count,
            processing_time,
            pages: self.pages,
        }
    }
}
