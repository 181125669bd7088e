use crate::error::Result;
use crate::utils::constants::{
    DEFAULT_NODE_CONCURRENCY, DEFAULT_PAGE_SIZE, DEFAULT_PREVIEW_ROWS, DEFAULT_REFERENCES_FILE,
    DEFAULT_SHARD_SUFFIX, DEFAULT_STORAGE_DIR, SETTINGS_ENV_PREFIX, SETTINGS_FILE,
};
use config::Config;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use validator::Validate;

/// Run configuration, loaded once and handed to each component.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Settings {
    /// Root of the object store; every key is relative to it
    #[serde(default = "default_source_root")]
    pub source_root: PathBuf,

    /// Only objects under this prefix are considered
    #[serde(default)]
    pub prefix: String,

    /// CSV document of reference attributes, one row per sequence
    #[serde(default = "default_references")]
    pub references: PathBuf,

    /// Directory receiving the summary documents
    #[serde(default = "default_storage")]
    pub storage: PathBuf,

    #[validate(length(min = 1))]
    #[serde(default = "default_shard_suffix")]
    pub shard_suffix: String,

    #[validate(range(min = 1))]
    #[serde(default = "num_cpus::get")]
    pub max_workers: usize,

    #[validate(range(min = 1))]
    #[serde(default = "default_node_concurrency")]
    pub node_concurrency: usize,

    #[validate(range(min = 1))]
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    #[serde(default = "default_preview_rows")]
    pub preview_rows: usize,

    #[serde(default)]
    pub continue_on_error: bool,
}

fn default_source_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_references() -> PathBuf {
    PathBuf::from(DEFAULT_REFERENCES_FILE)
}

fn default_storage() -> PathBuf {
    PathBuf::from(DEFAULT_STORAGE_DIR)
}

fn default_shard_suffix() -> String {
    DEFAULT_SHARD_SUFFIX.to_string()
}

fn default_node_concurrency() -> usize {
    DEFAULT_NODE_CONCURRENCY
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_preview_rows() -> usize {
    DEFAULT_PREVIEW_ROWS
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            source_root: default_source_root(),
            prefix: String::new(),
            references: default_references(),
            storage: default_storage(),
            shard_suffix: default_shard_suffix(),
            max_workers: num_cpus::get(),
            node_concurrency: default_node_concurrency(),
            page_size: default_page_size(),
            preview_rows: default_preview_rows(),
            continue_on_error: false,
        }
    }
}

impl Settings {
    /// Load settings from an optional TOML file, then `SPREADS_*` environment variables.
    ///
    /// Without an explicit path, `spreads.toml` in the working directory is read if present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name(SETTINGS_FILE).required(false),
        };

        let settings: Self = Config::builder()
            .add_source(file)
            .add_source(config::Environment::with_prefix(SETTINGS_ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers;
        self
    }

    pub fn with_node_concurrency(mut self, node_concurrency: usize) -> Self {
        self.node_concurrency = node_concurrency;
        self
    }

    pub fn with_storage(mut self, storage: impl Into<PathBuf>) -> Self {
        self.storage = storage.into();
        self
    }
}
