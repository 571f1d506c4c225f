//! 数据管线中描述抓取以外的三步
//!
//! - `nav_fetcher`：文档站 → 导航 HTML
//! - `nav_parser`：导航 HTML → 导航 JSON
//! - `merge`：导航 JSON + 描述 JSON → 增强链接列表

pub mod merge;
pub mod nav_fetcher;
pub mod nav_parser;

pub use merge::{merge_sources, run_merge, ENHANCED_LIST_FILE};
pub use nav_fetcher::{fetch_navigation, NavFetchSummary};
pub use nav_parser::{extract_links, parse_navigation, run_parse_nav};
