//! Node classification.
//!
//! Every tracked node carries a phase describing why it is animating.
//! Phases are plain values; the reconciler is the only writer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a node is animating.
///
/// # Example
///
/// ```rust
/// use keyflow::core::Phase;
///
/// assert_eq!(Phase::Enter.name(), "ENTER");
/// assert!(Phase::Leave.is_terminal());
/// assert!(!Phase::Update.is_terminal());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    /// The key appeared for the first time.
    Enter,
    /// The key was present before and is still present.
    Update,
    /// The key disappeared from the input data.
    Leave,
}

impl Phase {
    /// Display name of the phase.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Enter => "ENTER",
            Self::Update => "UPDATE",
            Self::Leave => "LEAVE",
        }
    }

    /// Terminal phases end with the node being removed once settled.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Leave)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_stable() {
        assert_eq!(Phase::Enter.name(), "ENTER");
        assert_eq!(Phase::Update.name(), "UPDATE");
        assert_eq!(Phase::Leave.name(), "LEAVE");
        assert_eq!(Phase::Update.to_string(), "UPDATE");
    }

    #[test]
    fn only_leave_is_terminal() {
        assert!(!Phase::Enter.is_terminal());
        assert!(!Phase::Update.is_terminal());
        assert!(Phase::Leave.is_terminal());
    }

    #[test]
    fn phase_serializes_correctly() {
        let json = serde_json::to_string(&Phase::Leave).unwrap();
        assert_eq!(json, "\"LEAVE\"");
        let back: Phase = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Phase::Leave);
    }
}
