/// Shard files of a node share this suffix
pub const DEFAULT_SHARD_SUFFIX: &str = ".csv";

/// Object key separator
pub const KEY_SEPARATOR: &str = "/";

/// File names
pub const SETTINGS_FILE: &str = "spreads.toml";
pub const SUMMARY_EXTENSION: &str = "json";

/// Environment variable prefix for settings, e.g. SPREADS_STORAGE
pub const SETTINGS_ENV_PREFIX: &str = "SPREADS";

/// Date format of readings
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Processing defaults
pub const DEFAULT_PAGE_SIZE: usize = 1000;
pub const DEFAULT_PREVIEW_ROWS: usize = 5;
pub const DEFAULT_NODE_CONCURRENCY: usize = 1;
pub const DEFAULT_BUFFER_SIZE: usize = 8192 * 16; // 128KB
pub const DEFAULT_STORAGE_DIR: &str = "warehouse";
pub const DEFAULT_REFERENCES_FILE: &str = "references.csv";

/// Default log filter when RUST_LOG is not set
pub const DEFAULT_LOG_FILTER: &str = "spreads_processor=info";
pub const VERBOSE_LOG_FILTER: &str = "spreads_processor=debug";
