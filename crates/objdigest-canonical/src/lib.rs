//! Deterministic digests for arbitrary structured values.
//!
//! A value is canonicalized into a [`CanonicalNode`] tree (field order,
//! unordered container order and float representation normalized, cycles cut
//! with markers, excluded fields dropped at every depth), encoded into a
//! prefix-free byte stream and hashed with a selectable algorithm.
//!
//! Digests are meant for change detection, cache keys and deduplication.
//! They are not authenticators.
//!
//! Compatibility contract: the encoder's domain separator
//! ([`encoder::DOMAIN_SEPARATOR`]) and the float rule
//! ([`float::FLOAT_FORMAT_VERSION`]) are versioned; changing either changes
//! every digest.
//!
#![deny(missing_docs)]

/// Canonicalization engine.
pub mod canonicalizer;
/// Structural classification of host values.
pub mod classifier;
/// Digest algorithms and the streaming digest computer.
pub mod digest;
/// Binary encoding of canonical trees.
pub mod encoder;
/// Error types.
pub mod errors;
/// Field-exclusion sets.
pub mod exclusions;
/// Float normalization.
pub mod float;
/// Digest handle and one-shot helpers.
pub mod handle;
/// Hygiene report types emitted during canonicalization.
pub mod hygiene;
/// Canonical node tree.
pub mod node;
/// Digest configuration.
pub mod options;
/// Per-pass cycle tracking.
pub mod tracker;
/// Host value model.
pub mod value;

pub use canonicalizer::{CanonicalizationResult, Canonicalizer};
pub use classifier::{classify, Kind};
pub use digest::{digest_node, digest_reader, DigestAlg, DigestComputer, HexDigest};
pub use errors::{DigestError, DigestResult};
pub use exclusions::FieldExclusions;
pub use float::CanonicalFloat;
pub use handle::{digest_value, digest_with_report, ObjectDigest};
pub use hygiene::{CanonicalizationReport, HygieneStatus, HygieneWarning};
pub use node::{CanonicalNode, Scalar};
pub use options::DigestOptions;
pub use tracker::{CyclePolicy, CycleTracker};
pub use value::{Map, MapOrder, Record, Seq, SeqKind, Shared, ToValue, Value};
