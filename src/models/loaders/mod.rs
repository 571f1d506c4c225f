pub mod file_loader;

pub use file_loader::{load_fetch_config, load_fetch_nav_config, load_json_file, load_navigation_data, load_parse_nav_config, write_json};
