//! Structural classification of host values.
//!
//! This is the only place that decides what kind a value is and whether a
//! container's order carries meaning.

use crate::value::{Map, MapOrder, Record, Seq, SeqKind, Shared, Value};

/// Scalar payload borrowed from a value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScalarRef<'a> {
    /// Text.
    Text(&'a str),
    /// Boolean.
    Bool(bool),
    /// Integer.
    Int(i128),
    /// Float, not yet normalized.
    Float(f64),
}

/// Structural kind of a value.
#[derive(Debug, Clone)]
pub enum Kind<'a> {
    /// Absent value.
    Null,
    /// Scalar.
    Scalar(ScalarRef<'a>),
    /// Field-bearing object; fields are always re-sorted by name.
    FieldBearing(&'a Record),
    /// Keyed container.
    Mapping {
        /// The container.
        map: &'a Map,
        /// Whether key order is preserved as given.
        ordered: bool,
    },
    /// Element container.
    Sequence {
        /// The container.
        seq: &'a Seq,
        /// Whether element order is preserved as given.
        ordered: bool,
    },
    /// Reference-identity cell; subject to cycle tracking.
    Reference(&'a Shared),
    /// Anything the system cannot look into.
    Unsupported(String),
}

impl MapOrder {
    /// Whether iteration order of this map type is meaningful.
    pub fn is_order_significant(self) -> bool {
        matches!(self, MapOrder::Insertion | MapOrder::Sorted)
    }
}

impl SeqKind {
    /// Positional and FIFO/LIFO containers keep their order; sets do not.
    pub fn is_order_significant(self) -> bool {
        !matches!(self, SeqKind::Set)
    }
}

/// Classifies `value`. Total and side-effect free.
pub fn classify(value: &Value) -> Kind<'_> {
    match value {
        Value::Null => Kind::Null,
        Value::Text(s) => Kind::Scalar(ScalarRef::Text(s)),
        Value::Bool(b) => Kind::Scalar(ScalarRef::Bool(*b)),
        Value::Int(i) => Kind::Scalar(ScalarRef::Int(*i)),
        Value::Float(x) => Kind::Scalar(ScalarRef::Float(*x)),
        Value::Record(record) => Kind::FieldBearing(record),
        Value::Map(map) => Kind::Mapping {
            map,
            ordered: map.order.is_order_significant(),
        },
        Value::Seq(seq) => Kind::Sequence {
            seq,
            ordered: seq.kind.is_order_significant(),
        },
        Value::Shared(shared) => Kind::Reference(shared),
        Value::Opaque(type_name) => Kind::Unsupported(type_name.clone()),
    }
}
