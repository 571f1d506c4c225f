//! # Doc Meta Crawler
//!
//! 批量打开文档站导航中的每个链接，抓取页面标题与描述。
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 浏览器能力的抽象（`Automation` / `PageHandle`）与随机数来源
//! - `browser/` - 基于 chromiumoxide 的真实实现
//!
//! ### ② 业务能力层（Services）
//! - `HumanBehaviorSimulator` - 指针移动、随机滚动、阅读停顿
//! - `metadata` - 标题与描述提取
//!
//! ### ③ 流程层（Workflow）
//! - `PageWorker` - 一个链接的完整处理流程（拦截 → 导航 → 模拟 → 提取）
//!
//! ### ④ 编排层（Orchestration）
//! - `BatchScheduler` - 批次串行、批内并发，每批一个隔离上下文
//! - `ResultAggregator` - 汇总结果
//! - `App` - 子命令入口
//!
//! `pipeline/` 提供导航获取、导航解析与数据合并三个步骤。

pub mod browser;
pub mod cli;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod pipeline;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use browser::BrowserSession;
pub use config::{CrawlConfig, FetchConfig, RuntimePaths};
pub use error::{AppError, AppResult};
pub use models::{AggregateReport, LinkDescriptor, PageInfo, PageOutcome};
pub use orchestrator::{App, BatchScheduler, ResultAggregator};
pub use workflow::PageWorker;
