pub mod human_behavior;
pub mod metadata;

pub use human_behavior::HumanBehaviorSimulator;
pub use metadata::{extract_page_info, select_description, DESCRIPTION_SELECTORS};
