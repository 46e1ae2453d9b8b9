//! Merging the previous key order with the next one.

use crate::core::Key;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// How surviving keys are ordered after an update.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeOrder {
    /// Surviving keys keep their previous relative order; new keys are
    /// placed after their predecessor in the new data.
    #[default]
    Stable,
    /// Surviving and new keys follow the new data order; leaving keys stay
    /// after their previous predecessor.
    FollowData,
}

/// Merge `old` and `next` into one visual order.
///
/// `next_index` maps every key of `next` to its position. Leaving keys
/// (in `old` but not in `next`) are kept, anchored to their neighbours.
///
/// # Example
///
/// ```rust
/// use keyflow::core::Key;
/// use keyflow::reconcile::{merge_keys, MergeOrder};
/// use std::collections::HashMap;
///
/// let keys = |s: &[&str]| s.iter().map(|k| Key::from(*k)).collect::<Vec<_>>();
/// let old = keys(&["k1", "k2"]);
/// let next = keys(&["k2", "k3"]);
/// let index: HashMap<Key, usize> =
///     next.iter().cloned().enumerate().map(|(i, k)| (k, i)).collect();
///
/// let merged = merge_keys(&old, &next, &index, MergeOrder::Stable);
/// assert_eq!(merged, keys(&["k1", "k2", "k3"]));
/// ```
pub fn merge_keys(
    old: &[Key],
    next: &[Key],
    next_index: &HashMap<Key, usize>,
    order: MergeOrder,
) -> Vec<Key> {
    match order {
        MergeOrder::Stable => merge_stable(old, next),
        MergeOrder::FollowData => merge_following(old, next, next_index),
    }
}

fn merge_stable(old: &[Key], next: &[Key]) -> Vec<Key> {
    let mut merged: Vec<Key> = old.to_vec();
    let mut present: HashSet<&Key> = old.iter().collect();

    for (i, key) in next.iter().enumerate() {
        if present.contains(key) {
            continue;
        }
        let position = match i.checked_sub(1).map(|p| &next[p]) {
            Some(prev) => merged
                .iter()
                .position(|k| k == prev)
                .map_or(merged.len(), |p| p + 1),
            None => 0,
        };
        merged.insert(position, key.clone());
        present.insert(key);
    }
    merged
}

fn merge_following(old: &[Key], next: &[Key], next_index: &HashMap<Key, usize>) -> Vec<Key> {
    let mut merged: Vec<Key> = next.to_vec();

    for (i, key) in old.iter().enumerate() {
        if next_index.contains_key(key) {
            continue;
        }
        // Anchor after the closest preceding old key that is already placed.
        let anchor = old[..i]
            .iter()
            .rev()
            .find_map(|prev| merged.iter().position(|k| k == prev));
        let position = anchor.map_or(0, |p| p + 1);
        merged.insert(position, key.clone());
    }
    merged
}
