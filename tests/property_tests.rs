//! Property-based tests for reconciliation and the animation clock.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated data sequences.

use keyflow::core::{numeric_factory, Key, Phase, Snapshot, Value};
use keyflow::engine::NodeGroup;
use keyflow::reconcile::{merge_keys, MergeOrder};
use keyflow::render::{Element, RecordingSurface};
use keyflow::transition::{
    ResolvedTiming, TargetState, TickContext, TransitionEventKind, TransitionNode,
};
use keyflow::NodeGroupBuilder;
use proptest::prelude::*;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

const FRAME: Duration = Duration::from_millis(16);

#[derive(Clone, Debug)]
struct Item {
    id: u32,
    value: f64,
    duration_ms: u64,
}

fn key_of(item: &Item) -> Key {
    Key::new(format!("k{}", item.id))
}

fn build_group(order: MergeOrder) -> NodeGroup<Item, RecordingSurface> {
    let leg = |item: &Item, to: f64| {
        TargetState::new()
            .to("x", to)
            .duration(Duration::from_millis(item.duration_ms))
    };
    let surface = RecordingSurface::new();
    let container = surface.root();
    NodeGroupBuilder::new()
        .key(|item: &Item, _| key_of(item))
        .start(|_: &Item, _| Snapshot::new().with("x", 0.0))
        .enter(move |item: &Item, _| leg(item, item.value))
        .update(move |item: &Item, _| leg(item, item.value))
        .leave(move |item: &Item, _| leg(item, 0.0))
        .template(Element::new("rect").dynamic(
            "x",
            |s: &Snapshot, _: &Item, _: &Key, _| s.get("x").cloned().unwrap_or(Value::from(0)),
        ))
        .merge_order(order)
        .build(surface, container)
        .unwrap()
}

/// Drop repeated ids, keeping the first occurrence.
fn dedupe(items: Vec<Item>) -> Vec<Item> {
    let mut seen = HashSet::new();
    items.into_iter().filter(|i| seen.insert(i.id)).collect()
}

prop_compose! {
    fn arbitrary_item()(id in 0u32..24, value in -100.0f64..100.0, duration_ms in 0u64..300) -> Item {
        Item { id, value, duration_ms }
    }
}

prop_compose! {
    fn arbitrary_data()(items in prop::collection::vec(arbitrary_item(), 0..16)) -> Vec<Item> {
        dedupe(items)
    }
}

fn arbitrary_order() -> impl Strategy<Value = MergeOrder> {
    prop_oneof![Just(MergeOrder::Stable), Just(MergeOrder::FollowData)]
}

/// Every key in the order has exactly one node and vice versa.
fn assert_table_matches_order(group: &NodeGroup<Item, RecordingSurface>) -> Result<(), TestCaseError> {
    let order = group.key_order();
    let unique: HashSet<&Key> = order.iter().collect();
    prop_assert_eq!(unique.len(), order.len());
    prop_assert_eq!(group.len(), order.len());
    for key in order {
        prop_assert!(group.node(key.as_str()).is_some());
    }
    Ok(())
}

proptest! {
    #[test]
    fn every_input_key_has_one_live_node(
        first in arbitrary_data(),
        second in arbitrary_data(),
        order in arbitrary_order(),
    ) {
        let mut group = build_group(order);
        group.set_data(Arc::from(first)).unwrap();
        group.tick(FRAME);
        group.set_data(Arc::from(second.clone())).unwrap();

        assert_table_matches_order(&group)?;
        for item in &second {
            let node = group.node(key_of(item).as_str());
            prop_assert!(node.is_some());
            let phase = node.map(|n| n.phase());
            prop_assert!(matches!(phase, Some(Phase::Enter) | Some(Phase::Update)));
        }
    }

    #[test]
    fn leave_nodes_are_retired_only_after_their_transition_ends(
        updates in prop::collection::vec(arbitrary_data(), 1..5),
        ticks_between in 0usize..6,
        order in arbitrary_order(),
    ) {
        let mut group = build_group(order);
        for data in updates {
            group.set_data(Arc::from(data)).unwrap();
            for _ in 0..ticks_between {
                let leaving: HashSet<Key> = group
                    .key_order()
                    .iter()
                    .filter(|k| group.node(k.as_str()).map(|n| n.phase()) == Some(Phase::Leave))
                    .cloned()
                    .collect();

                let report = group.tick(FRAME);
                for key in &report.retired {
                    prop_assert!(leaving.contains(key));
                    let ended = report.events.iter().any(|e| {
                        &e.key == key && e.phase == Phase::Leave && e.kind == TransitionEventKind::End
                    });
                    prop_assert!(ended, "{} retired without an end event", key);
                }
                for key in group.key_order() {
                    if let Some(node) = group.node(key.as_str()) {
                        if node.phase() == Phase::Leave {
                            prop_assert!(node.is_transitioning());
                        }
                    }
                }
                assert_table_matches_order(&group)?;
            }
        }
    }

    #[test]
    fn surviving_keys_keep_their_relative_order(
        first in arbitrary_data(),
        second in arbitrary_data(),
    ) {
        let old: Vec<Key> = first.iter().map(key_of).collect();
        let next: Vec<Key> = second.iter().map(key_of).collect();
        let index: HashMap<Key, usize> =
            next.iter().cloned().enumerate().map(|(i, k)| (k, i)).collect();

        let merged = merge_keys(&old, &next, &index, MergeOrder::Stable);
        let position: HashMap<&Key, usize> =
            merged.iter().enumerate().map(|(i, k)| (k, i)).collect();

        let surviving: Vec<&Key> = old.iter().filter(|k| index.contains_key(*k)).collect();
        for pair in surviving.windows(2) {
            prop_assert!(position[pair[0]] < position[pair[1]]);
        }

        let all: HashSet<&Key> = old.iter().chain(next.iter()).collect();
        prop_assert_eq!(merged.len(), all.len());
    }

    #[test]
    fn clock_stops_within_the_longest_duration(
        first in arbitrary_data(),
        second in arbitrary_data(),
        order in arbitrary_order(),
    ) {
        let mut group = build_group(order);
        for data in [first, second] {
            let longest = data.iter().map(|i| i.duration_ms).max().unwrap_or(0);
            group.set_data(Arc::from(data)).unwrap();

            // Leaving nodes reuse their last known duration, which can be
            // longer than anything in the new data.
            let bound = 300 / 16 + 2 + (longest / 16) as usize;
            let mut ticks = 0;
            while group.tick(FRAME).running {
                ticks += 1;
                prop_assert!(ticks <= bound, "clock still running after {} ticks", ticks);
            }
            prop_assert!(!group.is_running());
            for key in group.key_order() {
                let node = group.node(key.as_str());
                prop_assert!(node.is_some_and(|n| !n.is_transitioning()));
                prop_assert!(node.is_some_and(|n| n.phase() != Phase::Leave));
            }
        }
    }

    #[test]
    fn interrupting_never_jumps(
        from in -100.0f64..100.0,
        first in -100.0f64..100.0,
        second in -100.0f64..100.0,
        elapsed_ms in 0u64..100,
    ) {
        let interpolation = numeric_factory();
        let defaults = ResolvedTiming::new(Duration::from_millis(100), Duration::ZERO);
        let ctx = TickContext { interpolation: &interpolation, defaults: &defaults };

        let mut node: TransitionNode<(), u32> = TransitionNode::new(Key::from("k"), ());
        node.set_state(Snapshot::new().with("x", from));
        node.start_transition(TargetState::new().to("x", first).into());
        node.tick(Duration::from_millis(elapsed_ms), &ctx);
        let at_cancel = node.state().clone();

        node.start_transition(TargetState::new().to("x", second).into());
        node.tick(Duration::ZERO, &ctx);
        prop_assert_eq!(node.state(), &at_cancel);
    }
}
