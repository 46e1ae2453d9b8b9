//! What one clock tick did.

use super::error::EngineError;
use crate::core::Key;
use crate::render::TemplateWarning;
use crate::transition::TransitionEvent;

/// Outcome of [`NodeGroup::tick`](super::NodeGroup::tick).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Frame number, or `None` when the clock was idle and nothing ran.
    pub frame: Option<u64>,
    /// Keys mounted during this tick.
    pub mounted: Vec<Key>,
    /// LEAVE keys whose transition settled and were removed.
    pub retired: Vec<Key>,
    /// Per-node failures. Affected nodes were dropped.
    pub errors: Vec<EngineError>,
    pub warnings: Vec<TemplateWarning>,
    /// Lifecycle events in key order, preceded by events buffered since the
    /// previous tick.
    pub events: Vec<TransitionEvent>,
    /// Whether the clock is still running after this tick.
    pub running: bool,
}

impl TickReport {
    pub(crate) fn idle() -> Self {
        Self::default()
    }

    pub(crate) fn frame(number: u64) -> Self {
        Self {
            frame: Some(number),
            ..Self::default()
        }
    }

    /// True if the clock refused the tick.
    pub fn is_idle(&self) -> bool {
        self.frame.is_none()
    }

    /// True if nothing was mounted or retired, no error or warning was raised,
    /// and no event fired.
    pub fn is_quiet(&self) -> bool {
        self.mounted.is_empty()
            && self.retired.is_empty()
            && self.errors.is_empty()
            && self.warnings.is_empty()
            && self.events.is_empty()
    }
}
