use thiserror::Error;

use crate::digest::DigestAlg;

/// Errors surfaced by digest computation and its configuration.
///
/// Values the engine cannot classify are not errors: they become
/// [`CanonicalNode::Unsupported`](crate::CanonicalNode::Unsupported) markers
/// and a report warning, so the digest still completes.
#[derive(Debug, Error)]
pub enum DigestError {
    /// The top-level value handed to a digest computation was null.
    #[error("cannot digest a null value")]
    NullInput,
    /// The requested hash algorithm is not one of the supported names.
    #[error("unsupported hash algorithm: {0}")]
    UnsupportedAlgorithm(String),
    /// An exclusion argument was neither a field name nor a flat collection of names.
    #[error("invalid exclusion argument of type {0}: expected a field name or a flat collection of field names")]
    InvalidExclusionArgument(String),
    /// A hex digest string does not match the width of its algorithm.
    #[error("{value:?} is not a valid {alg} digest")]
    InvalidDigest {
        /// Algorithm the digest was parsed for.
        alg: DigestAlg,
        /// Offending value.
        value: String,
    },
    /// A host value could not be bridged through serde.
    #[error("serialization failed: {0}")]
    Serialization(String),
    /// Writing the encoded form into the hash state failed.
    #[error("encoding failed: {0}")]
    Encoding(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type DigestResult<T> = Result<T, DigestError>;
