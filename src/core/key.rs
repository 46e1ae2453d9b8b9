//! Item keys.
//!
//! A key is the stable identity of an input item across data updates. The
//! engine never inspects a key beyond hashing and comparing it.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Stable identifier derived from an input item.
///
/// # Example
///
/// ```rust
/// use keyflow::core::Key;
///
/// let key = Key::from("bar-7");
/// assert_eq!(key.as_str(), "bar-7");
/// assert_eq!(key.to_string(), "bar-7");
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Key(String);

impl Key {
    /// Create a key from anything string-like.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Borrow the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Key {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl From<String> for Key {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn keys_compare_by_content() {
        assert_eq!(Key::from("a"), Key::new(String::from("a")));
        assert_ne!(Key::from("a"), Key::from("b"));
    }

    #[test]
    fn map_lookup_by_str() {
        let mut map = HashMap::new();
        map.insert(Key::from("k1"), 1);
        assert_eq!(map.get("k1"), Some(&1));
    }

    #[test]
    fn key_serializes_as_plain_string() {
        let json = serde_json::to_string(&Key::from("k9")).unwrap();
        assert_eq!(json, "\"k9\"");
    }
}
