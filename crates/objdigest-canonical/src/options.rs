use serde::{Deserialize, Serialize};

use crate::digest::DigestAlg;
use crate::errors::{DigestError, DigestResult};
use crate::exclusions::FieldExclusions;
use crate::tracker::CyclePolicy;

/// Everything that parameterizes a digest besides the value itself.
///
/// Deserializes from JSON with every field optional:
///
/// ```rust
/// use objdigest_canonical::{DigestAlg, DigestOptions};
///
/// let options: DigestOptions =
///     serde_json::from_str(r#"{"algorithm": "sha-512", "exclusions": ["Secret"]}"#)?;
/// assert_eq!(options.algorithm, DigestAlg::Sha512);
/// assert!(options.exclusions.contains("Secret"));
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DigestOptions {
    /// Hash algorithm.
    pub algorithm: DigestAlg,
    /// Field names omitted at every depth.
    pub exclusions: FieldExclusions,
    /// Which revisited containers render as circular.
    pub cycle_policy: CyclePolicy,
}

impl DigestOptions {
    /// Default options: SHA-256, no exclusions, pass-wide cycle tracking.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the algorithm.
    pub fn with_algorithm(mut self, algorithm: DigestAlg) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Adds excluded field names.
    pub fn exclude(mut self, names: impl Into<FieldExclusions>) -> Self {
        self.exclusions.extend(names.into());
        self
    }

    /// Sets the cycle policy.
    pub fn with_cycle_policy(mut self, policy: CyclePolicy) -> Self {
        self.cycle_policy = policy;
        self
    }

    /// Reads options from an already parsed JSON document.
    ///
    /// # Errors
    ///
    /// [`DigestError::UnsupportedAlgorithm`] for an unknown `algorithm` name;
    /// [`DigestError::Serialization`] for any other shape problem.
    pub fn from_json_value(value: serde_json::Value) -> DigestResult<Self> {
        if let Some(name) = value.get("algorithm").and_then(serde_json::Value::as_str) {
            name.parse::<DigestAlg>()?;
        }
        serde_json::from_value(value).map_err(|err| DigestError::Serialization(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_gives_defaults() {
        let options: DigestOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, DigestOptions::new());
        assert_eq!(options.algorithm, DigestAlg::Sha256);
        assert_eq!(options.cycle_policy, CyclePolicy::Pass);
    }

    #[test]
    fn cycle_policy_is_kebab_case() {
        let options: DigestOptions =
            serde_json::from_str(r#"{"cycle_policy": "ancestors"}"#).unwrap();
        assert_eq!(options.cycle_policy, CyclePolicy::Ancestors);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(serde_json::from_str::<DigestOptions>(r#"{"algo": "md5"}"#).is_err());
    }

    #[test]
    fn algorithm_accepts_any_known_spelling() {
        let options: DigestOptions = serde_json::from_str(r#"{"algorithm": "SHA512"}"#).unwrap();
        assert_eq!(options.algorithm, DigestAlg::Sha512);
    }

    #[test]
    fn unknown_algorithm_in_config_is_unsupported() {
        let err = DigestOptions::from_json_value(serde_json::json!({"algorithm": "blake9"}))
            .unwrap_err();
        assert!(matches!(err, DigestError::UnsupportedAlgorithm(name) if name == "blake9"));
    }

    #[test]
    fn config_shape_errors_are_serialization_errors() {
        let err = DigestOptions::from_json_value(serde_json::json!({"algo": "md5"})).unwrap_err();
        assert!(matches!(err, DigestError::Serialization(_)));
        let options =
            DigestOptions::from_json_value(serde_json::json!({"algorithm": "md5"})).unwrap();
        assert_eq!(options.algorithm, DigestAlg::Md5);
    }

    #[test]
    fn builder_accumulates_exclusions() {
        let options = DigestOptions::new()
            .exclude("a")
            .exclude(["b", "c"].into_iter().collect::<FieldExclusions>());
        assert_eq!(options.exclusions.len(), 3);
    }
}
