//! 批次划分

use std::ops::Range;

/// 一个批次：链接序列中的连续切片
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Batch {
    /// 从 0 开始
    pub index: usize,
    pub start: usize,
    /// 不含
    pub end: usize,
}

impl Batch {
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// 第一批之前不等待
    pub fn needs_interval(&self) -> bool {
        self.index > 0
    }
}

/// 把 `total` 个链接按 `batch_size` 切成连续批次，最后一批可以更短
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchPlan {
    total: usize,
    batch_size: usize,
}

impl BatchPlan {
    pub fn new(total: usize, batch_size: usize) -> Self {
        Self {
            total,
            batch_size: batch_size.max(1),
        }
    }

    /// `ceil(total / batch_size)`
    pub fn batch_count(&self) -> usize {
        self.total.div_ceil(self.batch_size)
    }

    pub fn batches(&self) -> impl Iterator<Item = Batch> + '_ {
        (0..self.batch_count()).map(move |index| {
            let start = index * self.batch_size;
            Batch {
                index,
                start,
                end: (start + self.batch_size).min(self.total),
            }
        })
    }
}
