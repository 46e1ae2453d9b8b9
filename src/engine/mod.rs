//! The imperative shell: node groups and their animation clock.
//!
//! A [`NodeGroup`] ties the pure layers together. `set_data` runs the
//! reconciler and kicks the clock; each `tick` advances transitions,
//! retires settled LEAVE nodes, mounts new nodes through the template
//! instantiator and applies updater patches, then lets the clock stop
//! itself once nothing is moving.

mod error;
mod group;
mod report;
mod scheduler;

pub use error::EngineError;
pub use group::NodeGroup;
pub(crate) use group::GroupConfig;
pub use report::TickReport;
pub use scheduler::{AnimationScheduler, Frame, InstanceId};
