//! Attribute values and state snapshots.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A single attribute value.
///
/// Numbers are interpolated by the default interpolation; text values snap
/// to their target when a leg completes.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    Text(String),
}

impl Value {
    /// The numeric payload, if any.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(_) => None,
        }
    }

    /// The text payload, if any.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Number(_) => None,
            Self::Text(s) => Some(s),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// Attribute name, optionally grouped under a namespace.
///
/// Namespaces let one snapshot describe several render targets, e.g. a
/// `circle` namespace and a `label` namespace inside the same node.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub struct AttrKey {
    pub namespace: Option<String>,
    pub name: String,
}

impl AttrKey {
    /// A top-level attribute.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            namespace: None,
            name: name.into(),
        }
    }

    /// An attribute inside `namespace`.
    pub fn namespaced(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            name: name.into(),
        }
    }
}

impl fmt::Display for AttrKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{ns}.{}", self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// The current interpolated state of a node.
///
/// # Example
///
/// ```rust
/// use keyflow::core::{Snapshot, Value};
///
/// let state = Snapshot::new()
///     .with("opacity", 0.0)
///     .with_in("label", "text", "hello");
///
/// assert_eq!(state.number("opacity"), Some(0.0));
/// assert_eq!(state.get_in("label", "text"), Some(&Value::from("hello")));
/// assert_eq!(state.len(), 2);
/// ```
#[derive(Clone, PartialEq, Debug, Default)]
pub struct Snapshot {
    attrs: BTreeMap<AttrKey, Value>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert of a top-level attribute.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attrs.insert(AttrKey::new(name), value.into());
        self
    }

    /// Builder-style insert of a namespaced attribute.
    pub fn with_in(
        mut self,
        namespace: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        self.attrs
            .insert(AttrKey::namespaced(namespace, name), value.into());
        self
    }

    pub fn insert(&mut self, key: AttrKey, value: Value) -> Option<Value> {
        self.attrs.insert(key, value)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attrs.get(&AttrKey::new(name))
    }

    pub fn get_in(&self, namespace: &str, name: &str) -> Option<&Value> {
        self.attrs.get(&AttrKey::namespaced(namespace, name))
    }

    pub fn get_key(&self, key: &AttrKey) -> Option<&Value> {
        self.attrs.get(key)
    }

    /// Numeric value of a top-level attribute.
    pub fn number(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_number)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AttrKey, &Value)> {
        self.attrs.iter()
    }

    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }
}

impl FromIterator<(AttrKey, Value)> for Snapshot {
    fn from_iter<I: IntoIterator<Item = (AttrKey, Value)>>(iter: I) -> Self {
        Self {
            attrs: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_match_the_variant() {
        assert_eq!(Value::from("red").as_text(), Some("red"));
        assert_eq!(Value::from(2.0).as_text(), None);
    }

    #[test]
    fn numbers_display_without_trailing_zeros() {
        assert_eq!(Value::from(50.0).to_string(), "50");
        assert_eq!(Value::from(0.5).to_string(), "0.5");
        assert_eq!(Value::from("red").to_string(), "red");
    }

    #[test]
    fn value_serializes_untagged() {
        assert_eq!(serde_json::to_string(&Value::from(2.5)).unwrap(), "2.5");
        assert_eq!(serde_json::to_string(&Value::from("a")).unwrap(), "\"a\"");
        let back: Value = serde_json::from_str("\"translate(0,1)\"").unwrap();
        assert_eq!(back, Value::from("translate(0,1)"));
    }

    #[test]
    fn namespaced_and_plain_keys_are_distinct() {
        let state = Snapshot::new().with("r", 1).with_in("circle", "r", 2);
        assert_eq!(state.number("r"), Some(1.0));
        assert_eq!(state.get_in("circle", "r"), Some(&Value::from(2)));
        assert_eq!(AttrKey::namespaced("circle", "r").to_string(), "circle.r");
    }

    #[test]
    fn insert_overwrites() {
        let mut state = Snapshot::new().with("x", 1);
        let old = state.insert(AttrKey::new("x"), Value::from(3));
        assert_eq!(old, Some(Value::from(1)));
        assert_eq!(state.number("x"), Some(3.0));
        assert_eq!(state.len(), 1);
    }
}
