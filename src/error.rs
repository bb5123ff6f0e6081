use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EnrichError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("'{column}' column not found in {table}. Please check the column name.")]
    MissingColumn { column: String, table: String },

    #[error("Row at line {line} of {table} has {fields} fields, but the header has {expected}")]
    MalformedRow {
        table: String,
        line: u64,
        fields: usize,
        expected: usize,
    },

    #[error("Credentials file '{}' not found; it is required for remote lookups", .0.display())]
    MissingCredentials(PathBuf),

    #[error("Invalid credentials header: {0}")]
    InvalidHeader(String),

    #[error("Cache file '{}' is corrupt: {source}", .path.display())]
    CorruptCache {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("API error: {message}")]
    Api { message: String },
}

pub type Result<T> = std::result::Result<T, EnrichError>;
