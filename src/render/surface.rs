//! The render-surface seam.
//!
//! Every mutation the engine performs on visual elements goes through
//! [`RenderSurface`]. Handles are opaque to the engine.

use crate::core::Value;
use std::fmt::Debug;
use std::sync::Arc;
use thiserror::Error;

/// Event callback bound to a render target.
pub type Listener = Arc<dyn Fn() + Send + Sync>;

/// Errors a render surface can report.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SurfaceError {
    #[error("failed to create render target '{tag}': {reason}")]
    CreateFailed { tag: String, reason: String },

    #[error("failed to attach render target: {reason}")]
    AttachFailed { reason: String },
}

/// A side effect produced by evaluating an updater.
#[derive(Debug, Clone, PartialEq)]
pub enum Patch<'a, H> {
    SetAttribute {
        target: &'a H,
        name: &'a str,
        value: Value,
    },
    SetText {
        target: &'a H,
        text: String,
    },
}

/// Operations the engine needs from a rendering backend.
pub trait RenderSurface {
    /// Opaque reference to a created target.
    type Handle: Clone + PartialEq + Debug;

    fn create_element(
        &mut self,
        tag: &str,
        namespace: Option<&str>,
    ) -> Result<Self::Handle, SurfaceError>;

    fn create_text(&mut self, text: &str) -> Result<Self::Handle, SurfaceError>;

    /// Attach `child` under `parent`, before `before` when given, else last.
    fn insert_child(
        &mut self,
        parent: &Self::Handle,
        child: &Self::Handle,
        before: Option<&Self::Handle>,
    ) -> Result<(), SurfaceError>;

    /// Detach and release a target together with its subtree.
    fn remove(&mut self, target: &Self::Handle);

    fn set_attribute(&mut self, target: &Self::Handle, name: &str, value: &Value);

    fn set_text(&mut self, target: &Self::Handle, text: &str);

    fn add_listener(&mut self, target: &Self::Handle, event: &str, listener: Listener);

    /// Apply an updater's patch.
    fn apply(&mut self, patch: Patch<'_, Self::Handle>) {
        match patch {
            Patch::SetAttribute {
                target,
                name,
                value,
            } => self.set_attribute(target, name, &value),
            Patch::SetText { target, text } => self.set_text(target, &text),
        }
    }
}
