use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::canonicalizer::{CanonicalizationResult, Canonicalizer};
use crate::digest::{digest_node, DigestAlg};
use crate::errors::DigestResult;
use crate::exclusions::FieldExclusions;
use crate::hygiene::{CanonicalizationReport, METRIC_NODES};
use crate::options::DigestOptions;
use crate::tracker::CyclePolicy;
use crate::value::Value;

/// Canonicalizes `value` and hashes its encoding.
///
/// # Example
///
/// ```rust
/// use objdigest_canonical::{digest_value, DigestAlg, DigestOptions, Record};
///
/// let person = Record::new("Person").field("Name", "John").field("Age", 30);
/// let options = DigestOptions::new().with_algorithm(DigestAlg::Md5);
/// let hash = digest_value(&person.into(), &options)?;
/// assert_eq!(hash.len(), 32);
/// # Ok::<(), objdigest_canonical::DigestError>(())
/// ```
///
/// # Errors
///
/// [`DigestError::NullInput`](crate::DigestError::NullInput) for a null
/// value; encoding errors from the hash sink.
pub fn digest_value(value: &Value, options: &DigestOptions) -> DigestResult<String> {
    digest_with_report(value, options).map(|(hash, _)| hash)
}

/// Like [`digest_value`], also returning the canonicalization report.
pub fn digest_with_report(
    value: &Value,
    options: &DigestOptions,
) -> DigestResult<(String, CanonicalizationReport)> {
    let CanonicalizationResult { node, report } =
        Canonicalizer::new(options.cycle_policy).canonicalize(value, &options.exclusions)?;
    let hash = digest_node(&node, options.algorithm)?;
    tracing::debug!(
        alg = %options.algorithm,
        nodes = report.metric(METRIC_NODES),
        status = ?report.status,
        "digest computed"
    );
    Ok((hash, report))
}

/// A computed digest together with the settings that produced it.
///
/// Equality, ordering and hashing look at the hash string only.
#[derive(Debug, Clone, Default)]
pub struct ObjectDigest {
    hash: Option<String>,
    options: DigestOptions,
}

impl ObjectDigest {
    /// Digests `value` with default options (SHA-256, no exclusions).
    pub fn new(value: &Value) -> DigestResult<Self> {
        Self::with_options(value, DigestOptions::default())
    }

    /// Digests `value` with the given options.
    pub fn with_options(value: &Value, options: DigestOptions) -> DigestResult<Self> {
        let hash = digest_value(value, &options)?;
        Ok(Self {
            hash: Some(hash),
            options,
        })
    }

    /// A handle with no hash yet; call [`ObjectDigest::digest`] to fill it.
    pub fn empty(options: DigestOptions) -> Self {
        Self {
            hash: None,
            options,
        }
    }

    /// Recomputes the hash for `value`, replacing the stored one.
    ///
    /// On failure the previously stored hash is left untouched.
    pub fn digest(&mut self, value: &Value) -> DigestResult<&str> {
        let hash = digest_value(value, &self.options)?;
        Ok(self.hash.insert(hash).as_str())
    }

    /// Switches to `alg`, then recomputes.
    pub fn digest_with(&mut self, value: &Value, alg: DigestAlg) -> DigestResult<&str> {
        self.set_algorithm(alg);
        self.digest(value)
    }

    /// Stored hash, if one has been computed since the last setting change.
    pub fn hash(&self) -> Option<&str> {
        self.hash.as_deref()
    }

    /// Algorithm used for the next (or last) computation.
    pub fn algorithm(&self) -> DigestAlg {
        self.options.algorithm
    }

    /// Changes the algorithm and clears the stored hash.
    pub fn set_algorithm(&mut self, alg: DigestAlg) {
        self.options.algorithm = alg;
        self.hash = None;
    }

    /// Changes the algorithm by name and clears the stored hash.
    ///
    /// An unknown name leaves the algorithm unchanged; the hash is cleared
    /// either way.
    pub fn set_algorithm_name(&mut self, name: &str) -> DigestResult<()> {
        self.hash = None;
        let alg = name.parse()?;
        self.options.algorithm = alg;
        Ok(())
    }

    /// Current exclusion set.
    pub fn exclusions(&self) -> &FieldExclusions {
        &self.options.exclusions
    }

    /// Adds excluded names. Does not recompute.
    pub fn add_exclusion(&mut self, names: impl Into<FieldExclusions>) {
        self.options.exclusions.extend(names.into());
    }

    /// Adds excluded names given as a value: a name, or a flat collection of names.
    pub fn add_exclusion_value(&mut self, names: &Value) -> DigestResult<()> {
        let names = FieldExclusions::try_from(names)?;
        self.options.exclusions.extend(names);
        Ok(())
    }

    /// Removes an excluded name. Does not recompute.
    pub fn remove_exclusion(&mut self, name: &str) -> bool {
        self.options.exclusions.remove(name)
    }

    /// Cycle policy used for the next computation.
    pub fn cycle_policy(&self) -> CyclePolicy {
        self.options.cycle_policy
    }

    /// Changes the cycle policy and clears the stored hash.
    pub fn set_cycle_policy(&mut self, policy: CyclePolicy) {
        self.options.cycle_policy = policy;
        self.hash = None;
    }

    /// Full option set.
    pub fn options(&self) -> &DigestOptions {
        &self.options
    }
}

impl PartialEq for ObjectDigest {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl Eq for ObjectDigest {}

impl PartialEq<str> for ObjectDigest {
    fn eq(&self, other: &str) -> bool {
        self.hash.as_deref() == Some(other)
    }
}

impl PartialEq<&str> for ObjectDigest {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl PartialEq<String> for ObjectDigest {
    fn eq(&self, other: &String) -> bool {
        self == other.as_str()
    }
}

impl PartialEq<ObjectDigest> for str {
    fn eq(&self, other: &ObjectDigest) -> bool {
        other == self
    }
}

impl PartialEq<ObjectDigest> for &str {
    fn eq(&self, other: &ObjectDigest) -> bool {
        other == *self
    }
}

impl Hash for ObjectDigest {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hash.hash(state);
    }
}

impl PartialOrd for ObjectDigest {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ObjectDigest {
    fn cmp(&self, other: &Self) -> Ordering {
        self.hash.cmp(&other.hash)
    }
}

impl fmt::Display for ObjectDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.hash.as_deref().unwrap_or(""))
    }
}
