//! In-memory render surface that records every call.
//!
//! Useful for tests and for hosts that want to inspect what the engine
//! would do without a real rendering backend.

use super::surface::{Listener, RenderSurface, SurfaceError};
use crate::core::Value;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

/// Handle issued by [`RecordingSurface`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct TargetId(u32);

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One recorded surface call.
#[derive(Clone, PartialEq, Debug)]
pub enum SurfaceCall {
    CreateElement { target: TargetId, tag: String },
    CreateText { target: TargetId, text: String },
    Insert {
        parent: TargetId,
        child: TargetId,
        before: Option<TargetId>,
    },
    Remove { target: TargetId },
    SetAttribute {
        target: TargetId,
        name: String,
        value: Value,
    },
    SetText { target: TargetId, text: String },
    AddListener { target: TargetId, event: String },
}

#[derive(Default)]
struct Target {
    tag: Option<String>,
    namespace: Option<String>,
    text: Option<String>,
    attrs: BTreeMap<String, Value>,
    children: Vec<TargetId>,
    parent: Option<TargetId>,
    listeners: Vec<(String, Listener)>,
}

/// A render surface backed by plain maps.
///
/// # Example
///
/// ```rust
/// use keyflow::core::Value;
/// use keyflow::render::{RecordingSurface, RenderSurface};
///
/// let mut surface = RecordingSurface::new();
/// let root = surface.root();
/// let rect = surface.create_element("rect", None).unwrap();
/// surface.insert_child(&root, &rect, None).unwrap();
/// surface.set_attribute(&rect, "width", &Value::from(10));
///
/// assert_eq!(surface.children(root), vec![rect]);
/// assert_eq!(surface.attribute(rect, "width"), Some(&Value::from(10)));
/// ```
pub struct RecordingSurface {
    targets: HashMap<TargetId, Target>,
    next_id: u32,
    root: TargetId,
    calls: Vec<SurfaceCall>,
    removals: HashMap<TargetId, usize>,
    failing_tags: HashSet<String>,
}

impl RecordingSurface {
    /// A surface with a single root container.
    pub fn new() -> Self {
        let root = TargetId(0);
        let mut targets = HashMap::new();
        targets.insert(
            root,
            Target {
                tag: Some("root".to_string()),
                ..Target::default()
            },
        );
        Self {
            targets,
            next_id: 1,
            root,
            calls: Vec::new(),
            removals: HashMap::new(),
            failing_tags: HashSet::new(),
        }
    }

    /// The container every group mounts into.
    pub fn root(&self) -> TargetId {
        self.root
    }

    /// Make every later `create_element(tag, ..)` fail.
    pub fn fail_on(&mut self, tag: impl Into<String>) {
        self.failing_tags.insert(tag.into());
    }

    pub fn calls(&self) -> &[SurfaceCall] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    pub fn tag(&self, target: TargetId) -> Option<&str> {
        self.targets.get(&target)?.tag.as_deref()
    }

    pub fn namespace(&self, target: TargetId) -> Option<&str> {
        self.targets.get(&target)?.namespace.as_deref()
    }

    pub fn text(&self, target: TargetId) -> Option<&str> {
        self.targets.get(&target)?.text.as_deref()
    }

    pub fn attribute(&self, target: TargetId, name: &str) -> Option<&Value> {
        self.targets.get(&target)?.attrs.get(name)
    }

    pub fn children(&self, target: TargetId) -> Vec<TargetId> {
        self.targets
            .get(&target)
            .map(|t| t.children.clone())
            .unwrap_or_default()
    }

    /// Number of targets currently alive, the root excluded.
    pub fn live_count(&self) -> usize {
        self.targets.keys().filter(|id| **id != self.root).count()
    }

    /// Number of targets ever created.
    pub fn created_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| {
                matches!(
                    call,
                    SurfaceCall::CreateElement { .. } | SurfaceCall::CreateText { .. }
                )
            })
            .count()
    }

    /// How many times `remove` was called for `target`.
    pub fn removal_count(&self, target: TargetId) -> usize {
        self.removals.get(&target).copied().unwrap_or(0)
    }

    /// Invoke every listener registered for `event` on `target`.
    ///
    /// Returns the number of listeners fired.
    pub fn dispatch(&self, target: TargetId, event: &str) -> usize {
        let Some(target) = self.targets.get(&target) else {
            return 0;
        };
        let mut fired = 0;
        for (name, listener) in &target.listeners {
            if name == event {
                listener();
                fired += 1;
            }
        }
        fired
    }

    fn allocate(&mut self, target: Target) -> TargetId {
        let id = TargetId(self.next_id);
        self.next_id += 1;
        self.targets.insert(id, target);
        id
    }

    fn detach(&mut self, child: TargetId) {
        let parent = self.targets.get_mut(&child).and_then(|t| t.parent.take());
        if let Some(parent) = parent.and_then(|p| self.targets.get_mut(&p)) {
            parent.children.retain(|c| *c != child);
        }
    }

    fn drop_subtree(&mut self, target: TargetId) {
        if let Some(removed) = self.targets.remove(&target) {
            for child in removed.children {
                self.drop_subtree(child);
            }
        }
    }
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RecordingSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordingSurface")
            .field("live", &self.live_count())
            .field("calls", &self.calls.len())
            .finish_non_exhaustive()
    }
}

impl RenderSurface for RecordingSurface {
    type Handle = TargetId;

    fn create_element(
        &mut self,
        tag: &str,
        namespace: Option<&str>,
    ) -> Result<TargetId, SurfaceError> {
        if self.failing_tags.contains(tag) {
            return Err(SurfaceError::CreateFailed {
                tag: tag.to_string(),
                reason: "creation disabled for this tag".to_string(),
            });
        }
        let id = self.allocate(Target {
            tag: Some(tag.to_string()),
            namespace: namespace.map(str::to_string),
            ..Target::default()
        });
        self.calls.push(SurfaceCall::CreateElement {
            target: id,
            tag: tag.to_string(),
        });
        Ok(id)
    }

    fn create_text(&mut self, text: &str) -> Result<TargetId, SurfaceError> {
        let id = self.allocate(Target {
            text: Some(text.to_string()),
            ..Target::default()
        });
        self.calls.push(SurfaceCall::CreateText {
            target: id,
            text: text.to_string(),
        });
        Ok(id)
    }

    fn insert_child(
        &mut self,
        parent: &TargetId,
        child: &TargetId,
        before: Option<&TargetId>,
    ) -> Result<(), SurfaceError> {
        if !self.targets.contains_key(child) {
            return Err(SurfaceError::AttachFailed {
                reason: format!("child {child} does not exist"),
            });
        }
        if !self.targets.contains_key(parent) {
            return Err(SurfaceError::AttachFailed {
                reason: format!("parent {parent} does not exist"),
            });
        }
        self.detach(*child);

        let siblings = &mut self
            .targets
            .get_mut(parent)
            .ok_or_else(|| SurfaceError::AttachFailed {
                reason: format!("parent {parent} does not exist"),
            })?
            .children;
        let position = before
            .and_then(|b| siblings.iter().position(|c| c == b))
            .unwrap_or(siblings.len());
        siblings.insert(position, *child);

        if let Some(target) = self.targets.get_mut(child) {
            target.parent = Some(*parent);
        }
        self.calls.push(SurfaceCall::Insert {
            parent: *parent,
            child: *child,
            before: before.copied(),
        });
        Ok(())
    }

    fn remove(&mut self, target: &TargetId) {
        *self.removals.entry(*target).or_insert(0) += 1;
        self.calls.push(SurfaceCall::Remove { target: *target });
        self.detach(*target);
        self.drop_subtree(*target);
    }

    fn set_attribute(&mut self, target: &TargetId, name: &str, value: &Value) {
        if let Some(t) = self.targets.get_mut(target) {
            t.attrs.insert(name.to_string(), value.clone());
        }
        self.calls.push(SurfaceCall::SetAttribute {
            target: *target,
            name: name.to_string(),
            value: value.clone(),
        });
    }

    fn set_text(&mut self, target: &TargetId, text: &str) {
        if let Some(t) = self.targets.get_mut(target) {
            t.text = Some(text.to_string());
        }
        self.calls.push(SurfaceCall::SetText {
            target: *target,
            text: text.to_string(),
        });
    }

    fn add_listener(&mut self, target: &TargetId, event: &str, listener: Listener) {
        if let Some(t) = self.targets.get_mut(target) {
            t.listeners.push((event.to_string(), listener));
        }
        self.calls.push(SurfaceCall::AddListener {
            target: *target,
            event: event.to_string(),
        });
    }
}
