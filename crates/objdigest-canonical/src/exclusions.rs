use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::errors::DigestError;
use crate::value::Value;

/// Field names omitted at every nesting depth.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldExclusions(BTreeSet<String>);

impl FieldExclusions {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a name; returns whether it was new.
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.0.insert(name.into())
    }

    /// Removes a name; returns whether it was present.
    pub fn remove(&mut self, name: &str) -> bool {
        self.0.remove(name)
    }

    /// Whether `name` is excluded.
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    /// Adds every name of `other`.
    pub fn extend(&mut self, other: FieldExclusions) {
        self.0.extend(other.0);
    }

    /// Names in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Number of names.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for FieldExclusions {
    fn from(name: &str) -> Self {
        Self(BTreeSet::from([name.to_string()]))
    }
}

impl From<String> for FieldExclusions {
    fn from(name: String) -> Self {
        Self(BTreeSet::from([name]))
    }
}

impl<S: Into<String>> FromIterator<S> for FieldExclusions {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl TryFrom<&Value> for FieldExclusions {
    type Error = DigestError;

    /// Accepts a single name, null (no names), or a flat collection of names.
    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Null => Ok(Self::new()),
            Value::Text(name) => Ok(Self::from(name.as_str())),
            Value::Seq(seq) => seq
                .items
                .iter()
                .map(|item| match item {
                    Value::Text(name) => Ok(name.clone()),
                    other => Err(DigestError::InvalidExclusionArgument(format!(
                        "{} containing {}",
                        value.type_name(),
                        other.type_name()
                    ))),
                })
                .collect(),
            other => Err(DigestError::InvalidExclusionArgument(other.type_name())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ToValue;

    #[test]
    fn accepts_single_name() {
        let set = FieldExclusions::try_from(&Value::Text("Secret".into())).unwrap();
        assert!(set.contains("Secret"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn accepts_flat_collections() {
        let set = FieldExclusions::try_from(&vec!["a", "b"].to_value()).unwrap();
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn rejects_nested_and_non_text() {
        let nested = vec![vec!["a"]].to_value();
        assert!(matches!(
            FieldExclusions::try_from(&nested),
            Err(DigestError::InvalidExclusionArgument(_))
        ));
        let err = FieldExclusions::try_from(&Value::Int(3)).unwrap_err();
        assert!(err.to_string().contains("int"));
    }

    #[test]
    fn serializes_as_plain_list() {
        let set: FieldExclusions = ["b", "a"].into_iter().collect();
        assert_eq!(serde_json::to_string(&set).unwrap(), r#"["a","b"]"#);
    }
}
