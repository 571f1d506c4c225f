pub mod enhanced;
pub mod link;
pub mod loaders;
pub mod outcome;
pub mod report;

pub use enhanced::{EnhancedLink, EnhancedListOutput};
pub use link::{LinkDescriptor, NavigationData};
pub use loaders::{load_fetch_config, load_fetch_nav_config, load_navigation_data, load_parse_nav_config, write_json};
pub use outcome::{PageInfo, PageOutcome};
pub use report::{AggregateReport, CrawlerConfigSummary, DescriptionsOutput, ProcessingStats};
