// Error types shared by the search client, the downloader and the
// orchestration helpers. The binary wraps these in `anyhow` for display.

use std::path::PathBuf;

use thiserror::Error;

/// Library-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed cause of a network failure. Production code stores a
/// `reqwest::Error` here; tests can store any message.
pub type NetworkCause = Box<dyn std::error::Error + Send + Sync>;

/// Everything that can go wrong while searching and downloading.
#[derive(Debug, Error)]
pub enum Error {
    /// Connection, DNS, TLS or timeout failure.
    #[error("network error requesting {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: NetworkCause,
    },

    /// The server answered, but not with what we expected: bad status,
    /// invalid JSON, or a missing field.
    #[error("unexpected response from {url}: {reason}")]
    Protocol { url: String, reason: String },

    /// User input outside the accepted range.
    #[error("{0}")]
    Validation(String),

    /// Filesystem failure while preparing the output directory or writing
    /// an image.
    #[error("IO error writing to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration value that cannot be used, e.g. a credential that is
    /// not a valid header value.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    pub fn network(url: impl Into<String>, source: impl Into<NetworkCause>) -> Self {
        Self::Network {
            url: url.into(),
            source: source.into(),
        }
    }

    pub fn protocol(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Protocol {
            url: url.into(),
            reason: reason.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Short label used in logs and the final summary.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Network { .. } => "network",
            Self::Protocol { .. } => "protocol",
            Self::Validation(_) => "validation",
            Self::Io { .. } => "io",
            Self::Config(_) => "config",
        }
    }
}
