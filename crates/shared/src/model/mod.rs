mod cache_name;
pub use cache_name::*;

mod version_pattern;
pub use version_pattern::*;

mod worker_config;
pub use worker_config::*;
