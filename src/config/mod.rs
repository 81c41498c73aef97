mod core;
mod loader;

pub use self::core::{
    A11ymapConfig, AggregationConfig, OutputConfig, StoreConfig, TestConfig, DEFAULT_TOP_ISSUES,
};
pub use self::loader::{
    directory_ancestors, discover_config, load_config, load_config_from_path, parse_config,
    CONFIG_FILE_NAME,
};
