use canonical_json::to_string;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

use crate::errors::{DigestError, DigestResult};
use crate::float::CanonicalFloat;

/// Deterministic intermediate form of a (sub)value.
///
/// Field maps are keyed by a `BTreeMap`, so their keys are unique and always
/// iterate in ascending order no matter how they were inserted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum CanonicalNode {
    /// Nested null.
    Null,
    /// Scalar leaf.
    Scalar(Scalar),
    /// Elements in emission order.
    Sequence(Vec<CanonicalNode>),
    /// Named children, sorted by name.
    FieldMap(BTreeMap<String, CanonicalNode>),
    /// A container already visited earlier in the pass.
    Circular,
    /// A value the system cannot classify, with its type name.
    Unsupported(String),
}

/// Scalar payload of a canonical node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Scalar {
    /// Text.
    Text(String),
    /// Boolean.
    Bool(bool),
    /// Integer; rendered as decimal text so width never depends on the renderer.
    Int(#[serde(serialize_with = "int_as_text")] i128),
    /// Normalized float.
    Float(CanonicalFloat),
}

fn int_as_text<S: Serializer>(value: &i128, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

impl CanonicalNode {
    /// Text scalar node.
    pub fn text(value: impl Into<String>) -> Self {
        CanonicalNode::Scalar(Scalar::Text(value.into()))
    }

    /// Builds a field map; later duplicates overwrite earlier ones.
    pub fn field_map<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, CanonicalNode)>,
        K: Into<String>,
    {
        CanonicalNode::FieldMap(pairs.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Whether this is a `Null` node.
    pub fn is_null(&self) -> bool {
        matches!(self, CanonicalNode::Null)
    }

    /// RFC 8785 canonical JSON of the node's tagged form.
    ///
    /// Distinct trees always render to distinct text, which makes this usable
    /// as a sort key for order-insignificant containers.
    pub fn to_canonical_json(&self) -> DigestResult<String> {
        let value =
            serde_json::to_value(self).map_err(|e| DigestError::Serialization(e.to_string()))?;
        to_string(&value).map_err(|e| DigestError::Serialization(e.to_string()))
    }

    /// Total number of nodes in this tree.
    pub fn node_count(&self) -> usize {
        1 + match self {
            CanonicalNode::Sequence(items) => items.iter().map(Self::node_count).sum(),
            CanonicalNode::FieldMap(fields) => fields.values().map(Self::node_count).sum(),
            _ => 0,
        }
    }
}

impl fmt::Display for CanonicalNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.to_canonical_json().map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::float::normalize;

    #[test]
    fn field_map_sorts_and_overwrites() {
        let node = CanonicalNode::field_map([
            ("b", CanonicalNode::Null),
            ("a", CanonicalNode::text("1")),
            ("b", CanonicalNode::text("2")),
        ]);
        let CanonicalNode::FieldMap(fields) = &node else {
            panic!("expected field map");
        };
        let keys: Vec<_> = fields.keys().cloned().collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(fields["b"], CanonicalNode::text("2"));
    }

    #[test]
    fn rendering_is_tagged() {
        assert_eq!(CanonicalNode::Null.to_canonical_json().unwrap(), r#""Null""#);
        assert_eq!(
            CanonicalNode::Scalar(Scalar::Int(-7)).to_string(),
            r#"{"Scalar":{"Int":"-7"}}"#
        );
        assert_eq!(
            CanonicalNode::Scalar(Scalar::Float(normalize(1.0))).to_string(),
            r#"{"Scalar":{"Float":"3ff0000000000000"}}"#
        );
    }

    #[test]
    fn null_and_null_text_render_differently() {
        assert_ne!(
            CanonicalNode::Null.to_string(),
            CanonicalNode::text("[NULL]").to_string()
        );
        assert_ne!(
            CanonicalNode::Null.to_string(),
            CanonicalNode::text("Null").to_string()
        );
    }

    #[test]
    fn node_count_covers_children() {
        let node = CanonicalNode::Sequence(vec![
            CanonicalNode::Null,
            CanonicalNode::field_map([("k", CanonicalNode::Circular)]),
        ]);
        assert_eq!(node.node_count(), 4);
    }
}
