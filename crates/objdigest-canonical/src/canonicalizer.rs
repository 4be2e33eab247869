use indexmap::IndexMap;
use std::collections::BTreeMap;
use std::fmt;

use crate::classifier::{classify, Kind, ScalarRef};
use crate::errors::{DigestError, DigestResult};
use crate::exclusions::FieldExclusions;
use crate::float;
use crate::hygiene::{
    CanonicalizationReport, HygieneWarning, METRIC_CIRCULAR, METRIC_EXCLUDED, METRIC_NODES,
    METRIC_UNSUPPORTED,
};
use crate::node::{CanonicalNode, Scalar};
use crate::tracker::{CyclePolicy, CycleTracker};
use crate::value::{Shared, Value};

/// Result of canonicalization.
#[derive(Debug, Clone)]
pub struct CanonicalizationResult {
    /// Canonical tree for the input value.
    pub node: CanonicalNode,
    /// Diagnostics for the pass.
    pub report: CanonicalizationReport,
}

/// Helper for building value paths in diagnostics.
#[derive(Debug, Clone, Default)]
struct Path {
    segments: Vec<Segment>,
}

#[derive(Debug, Clone)]
enum Segment {
    Field(String),
    Index(usize),
}

impl Path {
    fn push_field(&mut self, field: &str) {
        self.segments.push(Segment::Field(field.to_string()));
    }

    fn push_index(&mut self, index: usize) {
        self.segments.push(Segment::Index(index));
    }

    fn pop(&mut self) {
        self.segments.pop();
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("root")?;
        for segment in &self.segments {
            match segment {
                Segment::Field(name) => write!(f, ".{}", name)?,
                Segment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

/// Where the walk is and what it has noticed so far.
#[derive(Debug, Default)]
pub struct Trail {
    path: Path,
    report: CanonicalizationReport,
}

impl Trail {
    /// Starts at the root with an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes the trail, returning its report.
    pub fn into_report(self) -> CanonicalizationReport {
        self.report
    }
}

/// Entry point for one canonicalization pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct Canonicalizer {
    policy: CyclePolicy,
}

impl Canonicalizer {
    /// Creates a canonicalizer using `policy` for cycle tracking.
    pub fn new(policy: CyclePolicy) -> Self {
        Self { policy }
    }

    /// Cycle policy in use.
    pub fn policy(&self) -> CyclePolicy {
        self.policy
    }

    /// Produces the canonical tree and report for a top-level value.
    ///
    /// A fresh cycle tracker lives exactly as long as this call.
    ///
    /// # Errors
    ///
    /// [`DigestError::NullInput`] if `value` is null.
    pub fn canonicalize(
        &self,
        value: &Value,
        exclusions: &FieldExclusions,
    ) -> DigestResult<CanonicalizationResult> {
        if matches!(value, Value::Null) {
            return Err(DigestError::NullInput);
        }
        let mut tracker = CycleTracker::new(self.policy);
        let mut trail = Trail::new();
        let node = canonicalize(value, exclusions, &mut tracker, &mut trail)?;
        let mut report = trail.into_report();
        report.add(METRIC_NODES, node.node_count() as u64);
        Ok(CanonicalizationResult { node, report })
    }
}

/// Recursively canonicalizes a (possibly nested) value.
///
/// Nested nulls become [`CanonicalNode::Null`]; top-level null handling is
/// left to [`Canonicalizer::canonicalize`].
pub fn canonicalize(
    value: &Value,
    exclusions: &FieldExclusions,
    tracker: &mut CycleTracker,
    trail: &mut Trail,
) -> DigestResult<CanonicalNode> {
    match classify(value) {
        Kind::Null => Ok(CanonicalNode::Null),
        Kind::Scalar(scalar) => Ok(CanonicalNode::Scalar(match scalar {
            ScalarRef::Text(s) => Scalar::Text(s.to_owned()),
            ScalarRef::Bool(b) => Scalar::Bool(b),
            ScalarRef::Int(i) => Scalar::Int(i),
            ScalarRef::Float(x) => Scalar::Float(float::normalize(x)),
        })),
        Kind::FieldBearing(record) => sorted_fields(&record.fields, exclusions, tracker, trail),
        Kind::Mapping { map, ordered } => {
            if ordered {
                ordered_entries(&map.entries, exclusions, tracker, trail)
            } else {
                sorted_fields(&map.entries, exclusions, tracker, trail)
            }
        }
        Kind::Sequence { seq, ordered } => {
            if !ordered {
                return unordered_elements(&seq.items, exclusions, tracker, trail);
            }
            let mut items = Vec::with_capacity(seq.items.len());
            for (index, item) in seq.items.iter().enumerate() {
                items.push(element(index, item, exclusions, tracker, trail)?);
            }
            Ok(CanonicalNode::Sequence(items))
        }
        Kind::Reference(shared) => reference(shared, exclusions, tracker, trail),
        Kind::Unsupported(type_name) => Ok(unsupported(type_name, trail)),
    }
}

fn sorted_fields(
    fields: &[(String, Value)],
    exclusions: &FieldExclusions,
    tracker: &mut CycleTracker,
    trail: &mut Trail,
) -> DigestResult<CanonicalNode> {
    // Visit in name order: under `CyclePolicy::Pass` the first field to reach
    // a shared container is the one that gets its contents.
    let mut selected: BTreeMap<&str, &Value> = BTreeMap::new();
    for (name, value) in fields {
        if exclusions.contains(name) {
            trail.report.bump(METRIC_EXCLUDED);
            continue;
        }
        selected.insert(name.as_str(), value);
    }
    let mut out = BTreeMap::new();
    for (name, value) in selected {
        trail.path.push_field(name);
        let node = canonicalize(value, exclusions, tracker, trail);
        trail.path.pop();
        out.insert(name.to_owned(), node?);
    }
    Ok(CanonicalNode::FieldMap(out))
}

/// Order-significant maps keep their key order as a sequence of
/// `[key, value]` pairs; a repeated key keeps its first position.
fn ordered_entries(
    entries: &[(String, Value)],
    exclusions: &FieldExclusions,
    tracker: &mut CycleTracker,
    trail: &mut Trail,
) -> DigestResult<CanonicalNode> {
    let mut selected: IndexMap<&str, &Value> = IndexMap::new();
    for (key, value) in entries {
        if exclusions.contains(key) {
            trail.report.bump(METRIC_EXCLUDED);
            continue;
        }
        selected.insert(key.as_str(), value);
    }
    let mut pairs = Vec::with_capacity(selected.len());
    for (key, value) in selected {
        trail.path.push_field(key);
        let node = canonicalize(value, exclusions, tracker, trail);
        trail.path.pop();
        pairs.push(CanonicalNode::Sequence(vec![CanonicalNode::text(key), node?]));
    }
    Ok(CanonicalNode::Sequence(pairs))
}

fn element(
    index: usize,
    item: &Value,
    exclusions: &FieldExclusions,
    tracker: &mut CycleTracker,
    trail: &mut Trail,
) -> DigestResult<CanonicalNode> {
    trail.path.push_index(index);
    let node = canonicalize(item, exclusions, tracker, trail);
    trail.path.pop();
    node
}

/// Elements of an order-insensitive collection.
///
/// Under [`CyclePolicy::Pass`] an element's rendering depends on which shared
/// containers earlier siblings already reached, so elements are visited in
/// the order of their rendering against the tracker as it was on entry, and
/// the results are sorted again by their final rendering. Under
/// [`CyclePolicy::Ancestors`] every sibling starts from the same tracker
/// state and the first pass is skipped.
fn unordered_elements(
    items: &[Value],
    exclusions: &FieldExclusions,
    tracker: &mut CycleTracker,
    trail: &mut Trail,
) -> DigestResult<CanonicalNode> {
    let mut order: Vec<usize> = (0..items.len()).collect();
    if tracker.policy() == CyclePolicy::Pass && items.len() > 1 {
        let mut keys = Vec::with_capacity(items.len());
        for item in items {
            let mut snapshot = tracker.clone();
            let node = canonicalize(item, exclusions, &mut snapshot, &mut Trail::new())?;
            keys.push(node.to_canonical_json()?);
        }
        order.sort_by(|a, b| keys[*a].cmp(&keys[*b]));
    }
    let mut nodes = Vec::with_capacity(items.len());
    for index in order {
        nodes.push(element(index, &items[index], exclusions, tracker, trail)?);
    }
    Ok(CanonicalNode::Sequence(sort_by_rendering(nodes)?))
}

fn reference(
    shared: &Shared,
    exclusions: &FieldExclusions,
    tracker: &mut CycleTracker,
    trail: &mut Trail,
) -> DigestResult<CanonicalNode> {
    let id = shared.id();
    if tracker.seen(id) {
        tracing::trace!(path = %trail.path, "circular reference");
        trail.report.bump(METRIC_CIRCULAR);
        trail.report.warn(HygieneWarning::new(
            "CircularReference",
            trail.path.to_string(),
        ));
        return Ok(CanonicalNode::Circular);
    }
    let Ok(inner) = shared.cell().try_borrow() else {
        return Ok(unsupported("Shared<borrowed>".to_string(), trail));
    };
    // Scalars behind a cell cannot lead anywhere, so they are not tracked.
    let is_container = matches!(
        &*inner,
        Value::Record(_) | Value::Map(_) | Value::Seq(_) | Value::Shared(_)
    );
    if !is_container {
        return canonicalize(&inner, exclusions, tracker, trail);
    }
    tracker.mark(id);
    let node = canonicalize(&inner, exclusions, tracker, trail);
    tracker.leave(id);
    node
}

fn unsupported(type_name: String, trail: &mut Trail) -> CanonicalNode {
    tracing::debug!(path = %trail.path, type_name = %type_name, "unsupported value");
    trail.report.bump(METRIC_UNSUPPORTED);
    trail.report.warn(
        HygieneWarning::new("UnsupportedValue", trail.path.to_string()).with_detail(&type_name),
    );
    CanonicalNode::Unsupported(type_name)
}

/// Sorts by each element's canonical rendering. The rendering is injective,
/// so equal keys only ever belong to identical nodes.
fn sort_by_rendering(items: Vec<CanonicalNode>) -> DigestResult<Vec<CanonicalNode>> {
    let mut keyed = items
        .into_iter()
        .map(|node| Ok((node.to_canonical_json()?, node)))
        .collect::<DigestResult<Vec<_>>>()?;
    keyed.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(keyed.into_iter().map(|(_, node)| node).collect())
}
