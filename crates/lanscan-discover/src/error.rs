//! Error types for the lanscan-discover crate.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DiscoverError {
    #[error("Command '{command}' failed: {reason}")]
    CommandExecution { command: String, reason: String },

    #[error("No baseline scan: run a discovery first")]
    NoBaseline,

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Config error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DiscoverError>;
