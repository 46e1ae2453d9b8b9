//! The reconciliation pass.

use super::merge::{merge_keys, MergeOrder};
use super::validate::{unique_keys, DuplicateKey};
use crate::core::{Key, Phase, Snapshot};
use crate::transition::{TransitionEvent, TransitionNode, TransitionSpec};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use stillwater::validation::Validation;

/// Node table: key to node.
pub type NodeTable<T, H> = HashMap<Key, TransitionNode<T, H>>;

/// Derives a key from `(item, index)`.
pub type KeyFn<T> = Arc<dyn Fn(&T, usize) -> Key + Send + Sync>;

/// Produces the starting snapshot of an entering item.
pub type StartFn<T> = Arc<dyn Fn(&T, usize) -> Snapshot + Send + Sync>;

/// Produces the transition for an item in one phase.
pub type SpecFn<T> = Arc<dyn Fn(&T, usize) -> TransitionSpec + Send + Sync>;

/// The caller-supplied functions that drive reconciliation.
pub struct Lifecycle<T> {
    pub key: KeyFn<T>,
    pub start: StartFn<T>,
    pub enter: SpecFn<T>,
    pub update: SpecFn<T>,
    pub leave: SpecFn<T>,
}

impl<T: 'static> Lifecycle<T> {
    /// Lifecycle with no enter, update or leave animation.
    pub fn new(key: KeyFn<T>, start: StartFn<T>) -> Self {
        let none: SpecFn<T> = Arc::new(|_: &T, _| TransitionSpec::none());
        Self {
            key,
            start,
            enter: Arc::clone(&none),
            update: Arc::clone(&none),
            leave: none,
        }
    }
}

impl<T> Clone for Lifecycle<T> {
    fn clone(&self) -> Self {
        Self {
            key: Arc::clone(&self.key),
            start: Arc::clone(&self.start),
            enter: Arc::clone(&self.enter),
            update: Arc::clone(&self.update),
            leave: Arc::clone(&self.leave),
        }
    }
}

impl<T> fmt::Debug for Lifecycle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lifecycle").finish_non_exhaustive()
    }
}

/// What one reconciliation pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    /// The merged key order, leaving keys included.
    pub order: Vec<Key>,
    pub entered: Vec<Key>,
    pub updated: Vec<Key>,
    pub leaving: Vec<Key>,
    /// Interrupt events from transitions cancelled by this pass.
    pub interrupted: Vec<TransitionEvent>,
}

/// Reconcile `data` against the previous `order` and the node table.
///
/// Fails without touching `table` when two items share a key.
pub fn reconcile<T: Clone, H>(
    table: &mut NodeTable<T, H>,
    order: &[Key],
    data: &[T],
    lifecycle: &Lifecycle<T>,
    merge: MergeOrder,
) -> Result<Reconciliation, Vec<DuplicateKey>> {
    let next_order: Vec<Key> = data
        .iter()
        .enumerate()
        .map(|(i, item)| (lifecycle.key)(item, i))
        .collect();

    if let Validation::Failure(dupes) = unique_keys(&next_order) {
        return Err(dupes.iter().cloned().collect());
    }

    let old_index: HashMap<&Key, usize> = order.iter().enumerate().map(|(i, k)| (k, i)).collect();
    let next_index: HashMap<Key, usize> = next_order
        .iter()
        .cloned()
        .enumerate()
        .map(|(i, k)| (k, i))
        .collect();

    let mut result = Reconciliation::default();

    for (i, key) in next_order.iter().enumerate() {
        if !old_index.contains_key(key) {
            table.insert(key.clone(), TransitionNode::new(key.clone(), data[i].clone()));
        }
    }

    for key in order {
        let Some(node) = table.get_mut(key) else {
            continue;
        };
        match next_index.get(key) {
            Some(&i) => {
                node.replace_data(data[i].clone());
                node.reclassify(Phase::Update);
            }
            None => node.reclassify(Phase::Leave),
        }
    }

    let merged = merge_keys(order, &next_order, &next_index, merge);

    for key in &merged {
        let Some(node) = table.get_mut(key) else {
            continue;
        };
        let interrupted = match node.phase() {
            Phase::Enter => {
                let i = next_index.get(key).copied().unwrap_or_default();
                node.set_state((lifecycle.start)(node.data(), i));
                let spec = (lifecycle.enter)(node.data(), i);
                result.entered.push(key.clone());
                node.start_transition(spec)
            }
            Phase::Leave => {
                let i = old_index.get(key).copied().unwrap_or_default();
                let spec = (lifecycle.leave)(node.data(), i);
                result.leaving.push(key.clone());
                node.start_transition(spec)
            }
            Phase::Update => {
                let i = next_index.get(key).copied().unwrap_or_default();
                let spec = (lifecycle.update)(node.data(), i);
                result.updated.push(key.clone());
                node.start_transition(spec)
            }
        };
        result.interrupted.extend(interrupted);
    }

    result.order = merged;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transition::{TargetState, TransitionEventKind};

    #[derive(Clone, Debug, PartialEq)]
    struct Item {
        id: u32,
        value: f64,
    }

    fn item(id: u32) -> Item {
        Item {
            id,
            value: f64::from(id),
        }
    }

    fn lifecycle() -> Lifecycle<Item> {
        Lifecycle {
            key: Arc::new(|d: &Item, _| Key::new(format!("k{}", d.id))),
            start: Arc::new(|_: &Item, _| Snapshot::new().with("x", 0.0)),
            enter: Arc::new(|d: &Item, _| TargetState::new().to("x", d.value).into()),
            update: Arc::new(|d: &Item, _| TargetState::new().to("x", d.value).into()),
            leave: Arc::new(|_: &Item, _| TargetState::new().to("x", -1.0).into()),
        }
    }

    fn keys(s: &[&str]) -> Vec<Key> {
        s.iter().map(|k| Key::from(*k)).collect()
    }

    #[test]
    fn fresh_data_enters_every_item() {
        let mut table: NodeTable<Item, u32> = HashMap::new();
        let result = reconcile(
            &mut table,
            &[],
            &[item(1), item(2)],
            &lifecycle(),
            MergeOrder::Stable,
        )
        .unwrap();

        assert_eq!(result.order, keys(&["k1", "k2"]));
        assert_eq!(result.entered, keys(&["k1", "k2"]));
        assert!(result.interrupted.is_empty());
        assert_eq!(table.len(), 2);
        for node in table.values() {
            assert_eq!(node.phase(), Phase::Enter);
            assert!(node.is_transitioning());
            assert_eq!(node.state().number("x"), Some(0.0));
        }
    }

    #[test]
    fn second_pass_classifies_enter_update_leave() {
        let mut table: NodeTable<Item, u32> = HashMap::new();
        let lifecycle = lifecycle();
        let first = reconcile(
            &mut table,
            &[],
            &[item(1), item(2)],
            &lifecycle,
            MergeOrder::Stable,
        )
        .unwrap();
        let second = reconcile(
            &mut table,
            &first.order,
            &[item(2), item(3)],
            &lifecycle,
            MergeOrder::Stable,
        )
        .unwrap();

        assert_eq!(second.order, keys(&["k1", "k2", "k3"]));
        assert_eq!(table["k1"].phase(), Phase::Leave);
        assert_eq!(table["k2"].phase(), Phase::Update);
        assert_eq!(table["k3"].phase(), Phase::Enter);
        assert_eq!(second.leaving, keys(&["k1"]));
        assert_eq!(second.updated, keys(&["k2"]));
        assert_eq!(second.entered, keys(&["k3"]));

        // k1 and k2 never ticked, so their enter transitions were cut short.
        let interrupted: Vec<&str> = second
            .interrupted
            .iter()
            .map(|e| e.key.as_str())
            .collect();
        assert_eq!(interrupted, vec!["k1", "k2"]);
        assert!(second
            .interrupted
            .iter()
            .all(|e| e.kind == TransitionEventKind::Interrupt));
    }

    #[test]
    fn leave_nodes_keep_their_last_data() {
        let mut table: NodeTable<Item, u32> = HashMap::new();
        let lifecycle = lifecycle();
        let first = reconcile(&mut table, &[], &[item(5)], &lifecycle, MergeOrder::Stable).unwrap();
        reconcile(&mut table, &first.order, &[], &lifecycle, MergeOrder::Stable).unwrap();
        assert_eq!(table["k5"].phase(), Phase::Leave);
        assert_eq!(table["k5"].data(), &item(5));
    }

    #[test]
    fn leaving_key_that_returns_is_revived_as_update() {
        let mut table: NodeTable<Item, u32> = HashMap::new();
        let lifecycle = lifecycle();
        let first = reconcile(&mut table, &[], &[item(1)], &lifecycle, MergeOrder::Stable).unwrap();
        let second =
            reconcile(&mut table, &first.order, &[], &lifecycle, MergeOrder::Stable).unwrap();
        let revived = Item { id: 1, value: 9.0 };
        let third = reconcile(
            &mut table,
            &second.order,
            &[revived.clone()],
            &lifecycle,
            MergeOrder::Stable,
        )
        .unwrap();

        assert_eq!(third.order, keys(&["k1"]));
        assert_eq!(table.len(), 1);
        assert_eq!(table["k1"].phase(), Phase::Update);
        assert_eq!(table["k1"].data(), &revived);
    }

    #[test]
    fn duplicate_keys_are_rejected_without_mutation() {
        let mut table: NodeTable<Item, u32> = HashMap::new();
        let lifecycle = lifecycle();
        let first = reconcile(&mut table, &[], &[item(1)], &lifecycle, MergeOrder::Stable).unwrap();

        let dupes = reconcile(
            &mut table,
            &first.order,
            &[item(2), item(2), item(3), item(3)],
            &lifecycle,
            MergeOrder::Stable,
        )
        .unwrap_err();

        assert_eq!(dupes.len(), 2);
        assert_eq!(dupes[0].key, Key::from("k2"));
        assert_eq!(dupes[1].key, Key::from("k3"));
        assert_eq!(table.len(), 1);
        assert_eq!(table["k1"].phase(), Phase::Enter);
    }

    #[test]
    fn callbacks_receive_data_and_previous_indices() {
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let leave_seen = Arc::clone(&seen);
        let mut lifecycle = lifecycle();
        lifecycle.leave = Arc::new(move |d: &Item, i| {
            if let Ok(mut seen) = leave_seen.lock() {
                seen.push((d.id, i));
            }
            TransitionSpec::none()
        });

        let mut table: NodeTable<Item, u32> = HashMap::new();
        let first = reconcile(
            &mut table,
            &[],
            &[item(1), item(2), item(3)],
            &lifecycle,
            MergeOrder::Stable,
        )
        .unwrap();
        reconcile(&mut table, &first.order, &[item(1)], &lifecycle, MergeOrder::Stable).unwrap();

        let seen = seen.lock().unwrap().clone();
        assert_eq!(seen, vec![(2, 1), (3, 2)]);
    }
}
