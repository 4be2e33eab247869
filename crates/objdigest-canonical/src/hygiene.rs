use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Metric key: unsupported markers emitted.
pub const METRIC_UNSUPPORTED: &str = "unsupported_values";
/// Metric key: circular markers emitted.
pub const METRIC_CIRCULAR: &str = "circular_references";
/// Metric key: fields or keys skipped by the exclusion set.
pub const METRIC_EXCLUDED: &str = "excluded_fields";
/// Metric key: canonical nodes in the emitted tree.
pub const METRIC_NODES: &str = "nodes";

/// Overall outcome of a canonicalization pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HygieneStatus {
    /// Every value was represented in full.
    Ok,
    /// Markers stand in for some values; warnings say where.
    Lossy,
}

/// Stable warning code plus the path of the value that raised it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HygieneWarning {
    /// Stable code, e.g. `UnsupportedValue`.
    pub code: String,
    /// Path of the value, e.g. `root.items[2]`.
    pub path: String,
    /// Extra context such as the offending type name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl HygieneWarning {
    /// Creates a warning.
    pub fn new(code: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            path: path.into(),
            detail: None,
        }
    }

    /// Attaches detail text.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Diagnostics gathered during one pass. Never affects the digest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalizationReport {
    /// Overall status.
    pub status: HygieneStatus,
    /// Warnings in traversal order.
    pub warnings: Vec<HygieneWarning>,
    /// Counters keyed by the `METRIC_*` names.
    pub metrics: BTreeMap<String, u64>,
}

impl Default for CanonicalizationReport {
    fn default() -> Self {
        Self {
            status: HygieneStatus::Ok,
            warnings: Vec::new(),
            metrics: BTreeMap::new(),
        }
    }
}

impl CanonicalizationReport {
    pub(crate) fn bump(&mut self, metric: &str) {
        self.add(metric, 1);
    }

    pub(crate) fn add(&mut self, metric: &str, n: u64) {
        *self.metrics.entry(metric.to_string()).or_insert(0) += n;
    }

    pub(crate) fn warn(&mut self, warning: HygieneWarning) {
        self.status = HygieneStatus::Lossy;
        self.warnings.push(warning);
    }

    /// Reads a counter; missing counters are zero.
    pub fn metric(&self, metric: &str) -> u64 {
        self.metrics.get(metric).copied().unwrap_or(0)
    }
}
