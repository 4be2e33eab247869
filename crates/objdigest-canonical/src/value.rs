//! Host value model fed into the canonicalizer.
//!
//! Inline [`Record`], [`Map`] and [`Seq`] containers own their children and
//! therefore cannot refer back to an ancestor. [`Shared`] cells are the only
//! reference-identity containers; they are what the cycle tracker watches.

use indexmap::IndexMap;
use serde::Serialize;
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt;
use std::rc::Rc;

use crate::errors::{DigestError, DigestResult};

/// A structured in-memory value.
#[derive(Debug, Clone)]
pub enum Value {
    /// Absent value.
    Null,
    /// Boolean scalar.
    Bool(bool),
    /// Integer scalar; wide enough for every primitive integer type.
    Int(i128),
    /// Floating-point scalar.
    Float(f64),
    /// Text scalar.
    Text(String),
    /// Field-bearing object.
    Record(Record),
    /// Keyed container.
    Map(Map),
    /// Element container.
    Seq(Seq),
    /// Reference-identity cell that may participate in a cycle.
    Shared(Shared),
    /// A host value the system cannot look into.
    Opaque(String),
}

impl Value {
    /// Diagnostic type descriptor used for unsupported markers and errors.
    pub fn type_name(&self) -> String {
        match self {
            Value::Null => "null".into(),
            Value::Bool(_) => "bool".into(),
            Value::Int(_) => "int".into(),
            Value::Float(_) => "float".into(),
            Value::Text(_) => "text".into(),
            Value::Record(record) => record.type_name.clone(),
            Value::Map(map) => format!("map<{}>", map.order.as_str()),
            Value::Seq(seq) => seq.kind.as_str().into(),
            Value::Shared(_) => "shared".into(),
            Value::Opaque(name) => name.clone(),
        }
    }

    /// Wraps `self` in a fresh [`Shared`] cell.
    pub fn shared(self) -> Value {
        Value::Shared(Shared::new(self))
    }

    /// Bridges any serializable host type through `serde_json`.
    ///
    /// JSON objects become records named `object`, arrays become lists.
    pub fn from_serialize<T: Serialize>(value: &T) -> DigestResult<Value> {
        let json =
            serde_json::to_value(value).map_err(|e| DigestError::Serialization(e.to_string()))?;
        Ok(Value::from(json))
    }
}

/// Field-bearing object: a type name plus fields in declaration order.
///
/// Field order never matters for the digest.
#[derive(Debug, Clone, Default)]
pub struct Record {
    /// Host type name, only used for diagnostics.
    pub type_name: String,
    /// Fields in declaration order.
    pub fields: Vec<(String, Value)>,
}

impl Record {
    /// Creates an empty record of the given type.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: Vec::new(),
        }
    }

    /// Appends a field.
    pub fn field(mut self, name: impl Into<String>, value: impl ToValue) -> Self {
        self.fields.push((name.into(), value.to_value()));
        self
    }
}

/// How a keyed container orders its keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapOrder {
    /// Hash-table style; iteration order is incidental.
    Unordered,
    /// Keys iterate in insertion order.
    Insertion,
    /// Keys iterate in their own sort order.
    Sorted,
}

impl MapOrder {
    fn as_str(self) -> &'static str {
        match self {
            MapOrder::Unordered => "unordered",
            MapOrder::Insertion => "insertion",
            MapOrder::Sorted => "sorted",
        }
    }
}

/// Keyed container with textual keys.
#[derive(Debug, Clone)]
pub struct Map {
    /// Declared ordering of the concrete map type.
    pub order: MapOrder,
    /// Entries in iteration order.
    pub entries: Vec<(String, Value)>,
}

impl Map {
    /// Creates an empty map with the given ordering.
    pub fn new(order: MapOrder) -> Self {
        Self {
            order,
            entries: Vec::new(),
        }
    }

    /// Appends an entry.
    pub fn entry(mut self, key: impl Into<String>, value: impl ToValue) -> Self {
        self.entries.push((key.into(), value.to_value()));
        self
    }
}

/// Concrete shape of an element container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeqKind {
    /// Fixed-size array snapshot.
    Array,
    /// Growable list.
    List,
    /// FIFO queue.
    Queue,
    /// LIFO stack, elements listed top first.
    Stack,
    /// Membership-only set.
    Set,
}

impl SeqKind {
    fn as_str(self) -> &'static str {
        match self {
            SeqKind::Array => "array",
            SeqKind::List => "list",
            SeqKind::Queue => "queue",
            SeqKind::Stack => "stack",
            SeqKind::Set => "set",
        }
    }
}

/// Element container.
#[derive(Debug, Clone)]
pub struct Seq {
    /// Concrete container shape.
    pub kind: SeqKind,
    /// Elements in iteration order.
    pub items: Vec<Value>,
}

impl Seq {
    /// Creates a container of `kind` holding `items`.
    pub fn new(kind: SeqKind, items: Vec<Value>) -> Self {
        Self { kind, items }
    }
}

/// Reference-identity cell.
///
/// Clones share the same cell, so a value can hold a clone of the cell it
/// lives in, which is how self-referencing structures are built.
#[derive(Clone, Default)]
pub struct Shared(Rc<RefCell<Value>>);

impl Shared {
    /// Creates a new cell holding `value`.
    pub fn new(value: Value) -> Self {
        Self(Rc::new(RefCell::new(value)))
    }

    /// Replaces the cell contents, returning the previous value.
    pub fn replace(&self, value: Value) -> Value {
        self.0.replace(value)
    }

    /// Stable identity of this cell for the lifetime of the allocation.
    pub fn id(&self) -> ContainerId {
        ContainerId(Rc::as_ptr(&self.0) as *const () as usize)
    }

    pub(crate) fn cell(&self) -> &RefCell<Value> {
        &self.0
    }
}

impl fmt::Debug for Shared {
    // Contents may be cyclic, so only the identity is printed.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Shared({:#x})", self.id().0)
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

/// Identity of a [`Shared`] cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContainerId(usize);

/// Conversion of host types into [`Value`].
pub trait ToValue {
    /// Builds the value tree for `self`.
    fn to_value(&self) -> Value;
}

impl ToValue for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }
}

impl<T: ToValue + ?Sized> ToValue for &T {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

impl ToValue for bool {
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }
}

macro_rules! int_to_value {
    ($($t:ty),*) => {
        $(
            impl ToValue for $t {
                fn to_value(&self) -> Value {
                    Value::Int(i128::from(*self))
                }
            }
        )*
    };
}

int_to_value!(i8, i16, i32, i64, u8, u16, u32, u64);

impl ToValue for isize {
    fn to_value(&self) -> Value {
        Value::Int(*self as i128)
    }
}

impl ToValue for usize {
    fn to_value(&self) -> Value {
        Value::Int(*self as i128)
    }
}

impl ToValue for f32 {
    fn to_value(&self) -> Value {
        Value::Float(f64::from(*self))
    }
}

impl ToValue for f64 {
    fn to_value(&self) -> Value {
        Value::Float(*self)
    }
}

impl ToValue for char {
    fn to_value(&self) -> Value {
        Value::Text(self.to_string())
    }
}

impl ToValue for str {
    fn to_value(&self) -> Value {
        Value::Text(self.to_owned())
    }
}

impl ToValue for String {
    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }
}

impl<T: ToValue> ToValue for Option<T> {
    fn to_value(&self) -> Value {
        match self {
            Some(v) => v.to_value(),
            None => Value::Null,
        }
    }
}

impl<T: ToValue> ToValue for [T] {
    fn to_value(&self) -> Value {
        Value::Seq(Seq::new(
            SeqKind::Array,
            self.iter().map(ToValue::to_value).collect(),
        ))
    }
}

impl<T: ToValue, const N: usize> ToValue for [T; N] {
    fn to_value(&self) -> Value {
        self.as_slice().to_value()
    }
}

impl<T: ToValue> ToValue for Vec<T> {
    fn to_value(&self) -> Value {
        Value::Seq(Seq::new(
            SeqKind::List,
            self.iter().map(ToValue::to_value).collect(),
        ))
    }
}

impl<T: ToValue> ToValue for VecDeque<T> {
    fn to_value(&self) -> Value {
        Value::Seq(Seq::new(
            SeqKind::Queue,
            self.iter().map(ToValue::to_value).collect(),
        ))
    }
}

impl<T: ToValue, S> ToValue for HashSet<T, S> {
    fn to_value(&self) -> Value {
        Value::Seq(Seq::new(
            SeqKind::Set,
            self.iter().map(ToValue::to_value).collect(),
        ))
    }
}

impl<T: ToValue> ToValue for BTreeSet<T> {
    fn to_value(&self) -> Value {
        Value::Seq(Seq::new(
            SeqKind::Set,
            self.iter().map(ToValue::to_value).collect(),
        ))
    }
}

fn map_from<'a, K, V, I>(order: MapOrder, entries: I) -> Value
where
    K: fmt::Display + 'a,
    V: ToValue + 'a,
    I: Iterator<Item = (&'a K, &'a V)>,
{
    Value::Map(Map {
        order,
        entries: entries.map(|(k, v)| (k.to_string(), v.to_value())).collect(),
    })
}

impl<K: fmt::Display, V: ToValue, S> ToValue for HashMap<K, V, S> {
    fn to_value(&self) -> Value {
        map_from(MapOrder::Unordered, self.iter())
    }
}

impl<K: fmt::Display, V: ToValue> ToValue for BTreeMap<K, V> {
    fn to_value(&self) -> Value {
        map_from(MapOrder::Sorted, self.iter())
    }
}

impl<K: fmt::Display, V: ToValue, S> ToValue for IndexMap<K, V, S> {
    fn to_value(&self) -> Value {
        map_from(MapOrder::Insertion, self.iter())
    }
}

impl ToValue for serde_json::Value {
    fn to_value(&self) -> Value {
        Value::from(self.clone())
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        use serde_json::Value as Json;
        match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(b),
            Json::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i128::from(i))
                } else if let Some(u) = n.as_u64() {
                    Value::Int(i128::from(u))
                } else {
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Json::String(s) => Value::Text(s),
            Json::Array(items) => Value::Seq(Seq::new(
                SeqKind::List,
                items.into_iter().map(Value::from).collect(),
            )),
            Json::Object(map) => Value::Record(Record {
                type_name: "object".into(),
                fields: map.into_iter().map(|(k, v)| (k, Value::from(v))).collect(),
            }),
        }
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Record(record)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Map(map)
    }
}

impl From<Seq> for Value {
    fn from(seq: Seq) -> Self {
        Value::Seq(seq)
    }
}

impl From<Shared> for Value {
    fn from(shared: Shared) -> Self {
        Value::Shared(shared)
    }
}

impl ToValue for Record {
    fn to_value(&self) -> Value {
        Value::Record(self.clone())
    }
}

impl ToValue for Map {
    fn to_value(&self) -> Value {
        Value::Map(self.clone())
    }
}

impl ToValue for Seq {
    fn to_value(&self) -> Value {
        Value::Seq(self.clone())
    }
}

impl ToValue for Shared {
    fn to_value(&self) -> Value {
        Value::Shared(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn shared_clones_keep_identity() {
        let cell = Shared::new(Value::Int(1));
        let other = cell.clone();
        assert_eq!(cell.id(), other.id());
        assert_ne!(cell.id(), Shared::new(Value::Int(1)).id());
    }

    #[test]
    fn host_collections_pick_their_container_kind() {
        let deque: VecDeque<i32> = [1, 2].into_iter().collect();
        assert!(matches!(deque.to_value(), Value::Seq(Seq { kind: SeqKind::Queue, .. })));
        let set: HashSet<&str> = ["a"].into_iter().collect();
        assert!(matches!(set.to_value(), Value::Seq(Seq { kind: SeqKind::Set, .. })));
        let map: BTreeMap<u8, bool> = [(1, true)].into_iter().collect();
        match map.to_value() {
            Value::Map(m) => {
                assert_eq!(m.order, MapOrder::Sorted);
                assert_eq!(m.entries[0].0, "1");
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(None::<i32>.to_value(), Value::Null));
    }

    #[test]
    fn json_objects_become_records() {
        let value = Value::from(json!({"a": [1, 2.5, u64::MAX], "b": null}));
        let Value::Record(record) = value else {
            panic!("expected record");
        };
        assert_eq!(record.type_name, "object");
        let Value::Seq(seq) = &record.fields[0].1 else {
            panic!("expected list");
        };
        assert!(matches!(seq.items[0], Value::Int(1)));
        assert!(matches!(seq.items[1], Value::Float(f) if f == 2.5));
        assert!(matches!(seq.items[2], Value::Int(i) if i == u64::MAX as i128));
    }

    #[test]
    fn from_serialize_bridges_structs() {
        #[derive(Serialize)]
        struct Person {
            name: String,
            age: u32,
        }
        let value = Value::from_serialize(&Person {
            name: "John".into(),
            age: 30,
        })
        .unwrap();
        assert_eq!(value.type_name(), "object");
    }
}
