//! Error types shared by the library and the CLI.

use std::io;

/// Invalid configuration values, detected before any input is read.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid sort field '{0}', expected one of: pss, rss, size, anon")]
    UnknownSortField(String),

    #[error("Invalid output format '{0}', expected 'text' or 'json'")]
    UnknownOutputFormat(String),

    #[error("Invalid log level '{0}', expected off, error, warn, info, debug or trace")]
    UnknownLogLevel(String),
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The smaps input could not be read.
    #[error("{origin}: {source}")]
    Source {
        origin: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
