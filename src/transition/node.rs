//! Per-item transition state machine.

use super::target::TransitionSpec;
use super::task::{ActiveTransition, TickContext};
use crate::core::{Key, Phase, Snapshot};
use crate::render::{Patch, ValueFn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Lifecycle notifications raised by a node's transition.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum TransitionEventKind {
    /// The first leg began (after its delay).
    Start,
    /// An unfinished transition was cancelled.
    Interrupt,
    /// The chain was exhausted.
    End,
}

/// A lifecycle notification for one node.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct TransitionEvent {
    pub key: Key,
    pub phase: Phase,
    pub kind: TransitionEventKind,
}

/// What an updater writes to.
#[derive(Clone, PartialEq, Eq, Debug)]
pub(crate) enum UpdateSlot {
    Attribute(String),
    Text,
}

/// A dynamic binding from node state to one render target.
pub(crate) struct Updater<T, H> {
    pub target: H,
    pub slot: UpdateSlot,
    pub value: ValueFn<T>,
}

impl<T, H> Updater<T, H> {
    /// Evaluate the binding into a patch for the render surface.
    pub fn evaluate(&self, state: &Snapshot, data: &T, key: &Key, index: usize) -> Patch<'_, H> {
        let value = (self.value)(state, data, key, index);
        match &self.slot {
            UpdateSlot::Attribute(name) => Patch::SetAttribute {
                target: &self.target,
                name,
                value,
            },
            UpdateSlot::Text => Patch::SetText {
                target: &self.target,
                text: value.to_string(),
            },
        }
    }
}

/// One logical item tracked by a node group.
///
/// The node owns its interpolated state, its running transition, and the
/// render target created for it. Only the reconciler changes its phase and
/// data; only the scheduler mounts and retires it.
pub struct TransitionNode<T, H> {
    key: Key,
    data: T,
    phase: Phase,
    state: Snapshot,
    transition: Option<ActiveTransition>,
    updaters: Vec<Updater<T, H>>,
    mounted: bool,
    target: Option<H>,
}

impl<T, H> TransitionNode<T, H> {
    /// A freshly entered node with an empty state.
    pub fn new(key: Key, data: T) -> Self {
        Self {
            key,
            data,
            phase: Phase::Enter,
            state: Snapshot::new(),
            transition: None,
            updaters: Vec::new(),
            mounted: false,
            target: None,
        }
    }

    pub fn key(&self) -> &Key {
        &self.key
    }

    pub fn data(&self) -> &T {
        &self.data
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> &Snapshot {
        &self.state
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Root render target, if one was created.
    pub fn target(&self) -> Option<&H> {
        self.target.as_ref()
    }

    /// Overwrite the state without interpolation.
    pub fn set_state(&mut self, state: Snapshot) {
        self.state = state;
    }

    /// True while a transition exists and has not completed.
    pub fn is_transitioning(&self) -> bool {
        self.transition
            .as_ref()
            .is_some_and(|transition| !transition.is_finished())
    }

    /// Cancel any running transition and start `spec` from the current state.
    ///
    /// Returns an interrupt event when an unfinished transition was cancelled.
    pub fn start_transition(&mut self, spec: TransitionSpec) -> Option<TransitionEvent> {
        let interrupted = self.stop_transition();
        self.transition = Some(ActiveTransition::new(spec.into_legs()));
        interrupted
    }

    /// Cancel the running transition, keeping the current state.
    pub fn stop_transition(&mut self) -> Option<TransitionEvent> {
        let was_running = self.is_transitioning();
        self.transition = None;
        was_running.then(|| self.event(TransitionEventKind::Interrupt))
    }

    /// Advance the running transition by `elapsed`.
    ///
    /// Returns the lifecycle events raised during this advance.
    pub fn tick(&mut self, elapsed: Duration, ctx: &TickContext<'_>) -> Vec<TransitionEvent> {
        let Some(transition) = self.transition.as_mut() else {
            return Vec::new();
        };
        if transition.is_finished() {
            return Vec::new();
        }

        let progress = transition.advance(elapsed, &mut self.state, ctx);
        let mut events = Vec::new();
        if progress.started {
            events.push(self.event(TransitionEventKind::Start));
        }
        if progress.finished {
            events.push(self.event(TransitionEventKind::End));
        }
        events
    }

    /// Evaluate every updater against the current state.
    pub(crate) fn patches(&self, index: usize) -> impl Iterator<Item = Patch<'_, H>> + '_ {
        self.updaters
            .iter()
            .map(move |updater| updater.evaluate(&self.state, &self.data, &self.key, index))
    }

    pub(crate) fn reclassify(&mut self, phase: Phase) {
        self.phase = phase;
    }

    pub(crate) fn replace_data(&mut self, data: T) {
        self.data = data;
    }

    pub(crate) fn mount(&mut self, target: Option<H>, updaters: Vec<Updater<T, H>>) {
        self.target = target;
        self.updaters = updaters;
        self.mounted = true;
    }

    /// Take the root target for release. Yields it at most once.
    pub(crate) fn release(&mut self) -> Option<H> {
        self.updaters.clear();
        self.target.take()
    }

    fn event(&self, kind: TransitionEventKind) -> TransitionEvent {
        TransitionEvent {
            key: self.key.clone(),
            phase: self.phase,
            kind,
        }
    }
}

impl<T: fmt::Debug, H: fmt::Debug> fmt::Debug for TransitionNode<T, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionNode")
            .field("key", &self.key)
            .field("data", &self.data)
            .field("phase", &self.phase)
            .field("state", &self.state)
            .field("transitioning", &self.is_transitioning())
            .field("mounted", &self.mounted)
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}
