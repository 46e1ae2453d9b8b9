//! Transition descriptions and the per-node state machine.
//!
//! # Key Concepts
//!
//! - **Target states**: where attributes go during one leg, with timing
//! - **Chains**: legs played back to back, each starting from the state the
//!   previous one reached
//! - **Nodes**: own the interpolated snapshot and at most one running
//!   transition; starting a new one cancels the old one without a jump

mod node;
mod target;
mod task;

pub(crate) use node::{UpdateSlot, Updater};
pub use node::{TransitionEvent, TransitionEventKind, TransitionNode};
pub use target::{ResolvedTiming, TargetState, Timing, TransitionSpec, Tween};
pub use task::TickContext;
