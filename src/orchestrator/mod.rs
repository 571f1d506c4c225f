//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! - `batch_plan`：把链接切成连续批次
//! - `batch_scheduler`：批次串行、批内并发，管理上下文与页面的生命周期
//! - `aggregator`：汇总每个页面的结果
//! - `app`：子命令入口，持有配置与浏览器
//!
//! ## 层次关系
//!
//! ```text
//! app (配置 / 浏览器 / 输出)
//!     ↓
//! batch_scheduler (Vec<LinkDescriptor>)
//!     ↓
//! workflow::PageWorker (单个链接)
//!     ↓
//! services (行为模拟 / 元数据提取)
//!     ↓
//! infrastructure (Automation / PageHandle)
//! ```

pub mod aggregator;
pub mod app;
pub mod batch_plan;
pub mod batch_scheduler;

pub use aggregator::{BatchTally, ResultAggregator};
pub use app::App;
pub use batch_plan::{Batch, BatchPlan};
pub use batch_scheduler::BatchScheduler;
