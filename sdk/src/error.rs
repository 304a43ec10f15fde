use thiserror::Error;

/// Failures of the persistent client id store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored client id is malformed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("no per-user data directory on this platform")]
    NoDataDirectory,

    #[error("client id vanished while being stored")]
    Conflict,
}

/// Failures constructing a [`crate::Qualtive`] instance.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid base url {url:?}: {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}
