//! Builder API for ergonomic node group construction.
//!
//! This module provides a fluent builder, serializable settings and a macro
//! for writing target states with minimal boilerplate.

pub mod error;
pub mod group;
pub mod macros;
pub mod settings;

pub use error::BuildError;
pub use group::NodeGroupBuilder;
pub use settings::GroupSettings;
