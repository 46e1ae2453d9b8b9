//! Key validation for incoming data.
//!
//! Uses Stillwater's `Validation` to report every duplicate key in one pass
//! instead of stopping at the first.

use crate::core::Key;
use std::collections::HashMap;
use std::fmt;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Two items of one input resolved to the same key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateKey {
    pub key: Key,
    /// Index of the first item with this key.
    pub first: usize,
    /// Index of the colliding item.
    pub duplicate: usize,
}

impl fmt::Display for DuplicateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' at {} and {}",
            self.key, self.first, self.duplicate
        )
    }
}

/// Check that every key is unique, accumulating ALL collisions.
///
/// Returns `Validation::Success(())` if the keys are unique, otherwise a
/// failure carrying one entry per colliding item.
pub fn unique_keys(keys: &[Key]) -> Validation<(), NonEmptyVec<DuplicateKey>> {
    let mut first_seen: HashMap<&Key, usize> = HashMap::with_capacity(keys.len());
    let mut checks: Vec<Validation<(), NonEmptyVec<DuplicateKey>>> = Vec::new();

    for (index, key) in keys.iter().enumerate() {
        let check = match first_seen.get(key) {
            Some(&first) => Validation::fail(DuplicateKey {
                key: key.clone(),
                first,
                duplicate: index,
            }),
            None => {
                first_seen.insert(key, index);
                Validation::success(())
            }
        };
        checks.push(check);
    }

    Validation::all_vec(checks).map(|_| ())
}
