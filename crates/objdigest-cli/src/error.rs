use objdigest_canonical::DigestError;
use thiserror::Error;

/// Errors reported by CLI commands.
#[derive(Error, Debug)]
pub enum CliError {
    /// Reading an input or config file failed.
    #[error("failed to read {path}: {source}")]
    Read {
        /// File path, or `<stdin>`.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Input was not valid JSON.
    #[error("invalid JSON in {path}: {source}")]
    Json {
        /// File path, or `<stdin>`.
        path: String,
        /// Parse error.
        source: serde_json::Error,
    },
    /// Digest computation or configuration failed.
    #[error(transparent)]
    Digest(#[from] DigestError),
}
