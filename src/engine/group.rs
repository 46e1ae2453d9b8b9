//! A keyed group of animated nodes bound to one render container.

use super::error::EngineError;
use super::report::TickReport;
use super::scheduler::{AnimationScheduler, InstanceId};
use crate::core::{InterpolationFactory, Key, Phase};
use crate::reconcile::{reconcile, Lifecycle, MergeOrder, NodeTable};
use crate::render::{Instantiator, MountScope, RenderSurface, Template};
use crate::transition::{ResolvedTiming, TickContext, TransitionEvent, TransitionNode};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Everything a group needs besides its surface and container.
pub(crate) struct GroupConfig<T> {
    pub lifecycle: Lifecycle<T>,
    pub template: Template<T>,
    pub interpolation: InterpolationFactory,
    pub defaults: ResolvedTiming,
    pub namespace: Option<String>,
    pub merge_order: MergeOrder,
}

/// One engine instance.
///
/// Owns the node table, the merged key order, the render surface and the
/// animation clock. The host feeds it data with [`set_data`](Self::set_data)
/// and drives it with [`tick`](Self::tick) once per frame.
///
/// Build one with [`NodeGroupBuilder`](crate::builder::NodeGroupBuilder).
pub struct NodeGroup<T, S: RenderSurface> {
    config: GroupConfig<T>,
    surface: S,
    container: S::Handle,
    table: NodeTable<T, S::Handle>,
    order: Vec<Key>,
    /// Keys whose roots are attached to the container, in container order.
    placed: Vec<Key>,
    data: Option<Arc<[T]>>,
    scheduler: AnimationScheduler,
    pending_events: Vec<TransitionEvent>,
    torn_down: bool,
}

impl<T: Clone, S: RenderSurface> NodeGroup<T, S> {
    pub(crate) fn new(config: GroupConfig<T>, surface: S, container: S::Handle) -> Self {
        let scheduler = AnimationScheduler::new();
        tracing::debug!(
            instance = %scheduler.instance(),
            merge_order = ?config.merge_order,
            "Node group created"
        );
        Self {
            config,
            surface,
            container,
            table: NodeTable::new(),
            order: Vec::new(),
            placed: Vec::new(),
            data: None,
            scheduler,
            pending_events: Vec::new(),
            torn_down: false,
        }
    }

    /// Replace the data and reconcile.
    ///
    /// Passing the same `Arc` as last time is a no-op and returns
    /// `Ok(false)`. Duplicate keys are rejected with every collision listed,
    /// leaving the group exactly as it was.
    pub fn set_data(&mut self, data: Arc<[T]>) -> Result<bool, EngineError> {
        if self.torn_down {
            return Err(EngineError::TornDown);
        }
        if self
            .data
            .as_ref()
            .is_some_and(|previous| Arc::ptr_eq(previous, &data))
        {
            tracing::trace!(instance = %self.instance_id(), "Data unchanged, skipping reconciliation");
            return Ok(false);
        }

        let result = reconcile(
            &mut self.table,
            &self.order,
            &data,
            &self.config.lifecycle,
            self.config.merge_order,
        )
        .map_err(|dupes| {
            tracing::warn!(
                instance = %self.scheduler.instance(),
                duplicates = dupes.len(),
                "Rejected data with duplicate keys"
            );
            EngineError::DuplicateKeys(dupes)
        })?;

        tracing::debug!(
            instance = %self.scheduler.instance(),
            entered = result.entered.len(),
            updated = result.updated.len(),
            leaving = result.leaving.len(),
            interrupted = result.interrupted.len(),
            "Reconciled"
        );

        self.order = result.order;
        self.pending_events.extend(result.interrupted);
        self.data = Some(data);
        if !self.table.is_empty() {
            self.scheduler.kick();
        }
        Ok(true)
    }

    /// Advance every node by `elapsed`, retire settled LEAVE nodes, mount
    /// new ones and push fresh attribute values to the surface.
    ///
    /// Returns an idle report without doing anything while the clock is
    /// stopped.
    pub fn tick(&mut self, elapsed: Duration) -> TickReport {
        let Some(frame) = self.scheduler.tick(elapsed) else {
            return TickReport::idle();
        };
        let mut report = TickReport::frame(frame.number);
        report.events.append(&mut self.pending_events);

        let pending = self.advance(elapsed, &mut report);
        self.render(&mut report);
        self.restack(&mut report);

        if !pending {
            self.scheduler.stop();
        }
        report.running = self.scheduler.is_running();
        report
    }

    /// Stop the clock, cancel every transition and release every render
    /// target. The group accepts no more data afterwards.
    ///
    /// Returns buffered events plus one interrupt per cancelled transition.
    pub fn teardown(&mut self) -> Vec<TransitionEvent> {
        if self.torn_down {
            return Vec::new();
        }
        self.torn_down = true;
        self.scheduler.stop();

        let mut events = std::mem::take(&mut self.pending_events);
        let mut released = 0usize;
        for key in self.order.drain(..) {
            let Some(mut node) = self.table.remove(&key) else {
                continue;
            };
            events.extend(node.stop_transition());
            if let Some(target) = node.release() {
                self.surface.remove(&target);
                released += 1;
            }
        }
        self.table.clear();
        self.placed.clear();
        self.data = None;

        tracing::debug!(
            instance = %self.scheduler.instance(),
            released,
            "Node group torn down"
        );
        events
    }

    /// Tick every node in key order and retire settled LEAVE nodes.
    /// Returns true if any node is still transitioning.
    fn advance(&mut self, elapsed: Duration, report: &mut TickReport) -> bool {
        let instance = self.scheduler.instance();
        let ctx = TickContext {
            interpolation: &self.config.interpolation,
            defaults: &self.config.defaults,
        };
        let table = &mut self.table;
        let surface = &mut self.surface;
        let placed = &mut self.placed;
        let mut pending = false;

        self.order.retain(|key| {
            let Some(node) = table.get_mut(key) else {
                return false;
            };
            report.events.extend(node.tick(elapsed, &ctx));
            if node.is_transitioning() {
                pending = true;
                return true;
            }
            if node.phase() != Phase::Leave {
                return true;
            }
            if let Some(target) = node.release() {
                surface.remove(&target);
                placed.retain(|k| k != key);
            }
            table.remove(key);
            tracing::trace!(instance = %instance, key = %key, "Retired node");
            report.retired.push(key.clone());
            false
        });
        pending
    }

    /// Mount unmounted nodes and apply updater patches to mounted ones.
    fn render(&mut self, report: &mut TickReport) {
        let mut index = 0;
        while let Some(key) = self.order.get(index) {
            let Some(node) = self.table.get(key) else {
                self.order.remove(index);
                continue;
            };
            if node.is_mounted() {
                for patch in node.patches(index) {
                    self.surface.apply(patch);
                }
                index += 1;
            } else if self.mount(index, report) {
                index += 1;
            }
        }
    }

    /// Instantiate the template for the node at `index`.
    ///
    /// On a surface error the node is dropped from the table and the order
    /// and false is returned.
    fn mount(&mut self, index: usize, report: &mut TickReport) -> bool {
        let Some(key) = self.order.get(index).cloned() else {
            return false;
        };
        let Some(node) = self.table.get(&key) else {
            return false;
        };

        let successor = self.order[index + 1..].iter().find_map(|k| {
            let target = self.table.get(k)?.target()?;
            Some((k.clone(), target.clone()))
        });
        let before = successor.as_ref().map(|(_, target)| target.clone());

        let scope = MountScope {
            key: &key,
            index,
            state: node.state(),
            data: node.data(),
            namespace: self.config.namespace.as_deref(),
            instance: self.scheduler.instance(),
        };
        let result = Instantiator::new(&mut self.surface, scope).mount(
            &self.config.template,
            &self.container,
            before.as_ref(),
        );

        match result {
            Ok(mounted) => {
                if mounted.root.is_none() {
                    tracing::warn!(
                        instance = %self.scheduler.instance(),
                        key = %key,
                        "Node mounted without a render target"
                    );
                } else {
                    let at = successor
                        .and_then(|(next, _)| self.placed.iter().position(|k| *k == next))
                        .unwrap_or(self.placed.len());
                    self.placed.insert(at, key.clone());
                }
                if let Some(node) = self.table.get_mut(&key) {
                    node.mount(mounted.root, mounted.updaters);
                }
                report.warnings.extend(mounted.warnings);
                report.mounted.push(key);
                true
            }
            Err(source) => {
                tracing::error!(
                    instance = %self.scheduler.instance(),
                    key = %key,
                    error = %source,
                    "Dropping node whose render target could not be created"
                );
                if let Some(mut node) = self.table.remove(&key) {
                    report.events.extend(node.stop_transition());
                }
                self.order.remove(index);
                report.errors.push(EngineError::Mount { key, source });
                false
            }
        }
    }

    /// Move mounted roots so the container matches the key order.
    ///
    /// Walks the order from the back; a root already sitting directly before
    /// its mounted successor stays put.
    fn restack(&mut self, report: &mut TickReport) {
        let desired: Vec<Key> = self
            .order
            .iter()
            .filter(|k| self.table.get(*k).is_some_and(|n| n.target().is_some()))
            .cloned()
            .collect();
        if desired == self.placed {
            return;
        }

        let mut successor: Option<&Key> = None;
        for key in desired.iter().rev() {
            let Some(target) = self.table.get(key).and_then(|n| n.target()) else {
                continue;
            };
            let current = self.placed.iter().position(|k| k == key);
            let anchor = successor.and_then(|s| self.placed.iter().position(|k| k == s));
            let in_place = match (current, successor, anchor) {
                (Some(c), None, _) => c + 1 == self.placed.len(),
                (Some(c), Some(_), Some(a)) => c + 1 == a,
                _ => false,
            };

            if !in_place {
                let before = successor
                    .and_then(|s| self.table.get(s))
                    .and_then(|n| n.target());
                match self.surface.insert_child(&self.container, target, before) {
                    Ok(()) => {
                        self.placed.retain(|k| k != key);
                        let at = successor
                            .and_then(|s| self.placed.iter().position(|k| k == s))
                            .unwrap_or(self.placed.len());
                        self.placed.insert(at, key.clone());
                        tracing::trace!(
                            instance = %self.scheduler.instance(),
                            key = %key,
                            "Moved render target"
                        );
                    }
                    Err(source) => {
                        tracing::warn!(
                            instance = %self.scheduler.instance(),
                            key = %key,
                            error = %source,
                            "Could not move render target"
                        );
                        report.errors.push(EngineError::Restack {
                            key: key.clone(),
                            source,
                        });
                    }
                }
            }
            successor = Some(key);
        }
    }
}

impl<T, S: RenderSurface> NodeGroup<T, S> {
    /// Merged key order, LEAVE keys included until they settle.
    pub fn key_order(&self) -> &[Key] {
        &self.order
    }

    pub fn node(&self, key: &str) -> Option<&TransitionNode<T, S::Handle>> {
        self.table.get(key)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Whether the clock will accept the next tick.
    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn instance_id(&self) -> InstanceId {
        self.scheduler.instance()
    }

    /// Ticks admitted since the group was built.
    pub fn frames(&self) -> u64 {
        self.scheduler.frames()
    }

    /// The data passed to the last accepted `set_data`.
    pub fn data(&self) -> Option<&Arc<[T]>> {
        self.data.as_ref()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn container(&self) -> &S::Handle {
        &self.container
    }
}

impl<T: fmt::Debug, S: RenderSurface + fmt::Debug> fmt::Debug for NodeGroup<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeGroup")
            .field("instance", &self.scheduler.instance())
            .field("order", &self.order)
            .field("running", &self.scheduler.is_running())
            .field("torn_down", &self.torn_down)
            .field("surface", &self.surface)
            .finish_non_exhaustive()
    }
}
