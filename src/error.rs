use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProcessingError>;

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Listing of '{prefix}' failed: {message}")]
    Listing { prefix: String, message: String },

    #[error("Shard '{shard}' does not match the reading schema: {message}")]
    ReadSchema { shard: String, message: String },

    #[error("Grouped computation failed for sequence {sequence_id} on {date}: {message}")]
    GroupComputation {
        sequence_id: i64,
        date: String,
        message: String,
    },

    #[error("Reference integrity error: {matches} reference records match sequence {sequence_id}, expected exactly one")]
    JoinIntegrity { sequence_id: i64, matches: usize },

    #[error("Date parsing error: '{value}' is not a YYYY-MM-DD date")]
    DateParse { value: String },

    #[error("Settings error: {0}")]
    Settings(#[from] config::ConfigError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    #[error("Async task error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}
