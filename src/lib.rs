//! Keyflow: keyed data reconciliation and animation
//!
//! Keyflow is built on a "pure core, imperative shell" split. Reconciling a
//! new data array against the previous one and interpolating node state are
//! pure bookkeeping; every visual side effect goes through a
//! [`RenderSurface`](render::RenderSurface) driven by a per-instance clock.
//!
//! # Core Concepts
//!
//! - **Keys**: each item gets a stable key from a caller-supplied accessor
//! - **Phases**: nodes are ENTER, UPDATE or LEAVE depending on how their key
//!   moved between two data arrays
//! - **Transitions**: chains of target states interpolated tick by tick;
//!   starting a new one picks up from wherever the last one left off
//! - **Clock**: advances every node, mounts new ones, retires settled LEAVE
//!   nodes, and stops itself once nothing is moving
//!
//! # Example
//!
//! ```rust
//! use keyflow::builder::NodeGroupBuilder;
//! use keyflow::core::{Key, Snapshot, Value};
//! use keyflow::render::{Element, RecordingSurface};
//! use keyflow::target_state;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! #[derive(Clone)]
//! struct Bar {
//!     id: u32,
//!     height: f64,
//! }
//!
//! let surface = RecordingSurface::new();
//! let container = surface.root();
//!
//! let mut group = NodeGroupBuilder::new()
//!     .key(|bar: &Bar, _| Key::new(format!("bar-{}", bar.id)))
//!     .start(|_: &Bar, _| Snapshot::new().with("height", 0.0))
//!     .enter(|bar: &Bar, _| target_state! { "height" => [bar.height] })
//!     .update(|bar: &Bar, _| target_state! { "height" => [bar.height] })
//!     .leave(|_: &Bar, _| target_state! { "height" => [0.0] })
//!     .template(Element::new("rect").dynamic(
//!         "height",
//!         |state: &Snapshot, _: &Bar, _: &Key, _| {
//!             state.get("height").cloned().unwrap_or(Value::from(0))
//!         },
//!     ))
//!     .duration(Duration::from_millis(100))
//!     .build(surface, container)
//!     .unwrap();
//!
//! group
//!     .set_data(Arc::from(vec![Bar { id: 1, height: 40.0 }, Bar { id: 2, height: 80.0 }]))
//!     .unwrap();
//!
//! while group.tick(Duration::from_millis(16)).running {}
//!
//! let bar = group.node("bar-2").unwrap();
//! assert_eq!(bar.state().number("height"), Some(80.0));
//! assert!(!group.is_running());
//! ```

pub mod builder;
pub mod core;
pub mod engine;
pub mod reconcile;
pub mod render;
pub mod transition;

// Re-export commonly used types
pub use builder::{BuildError, GroupSettings, NodeGroupBuilder};
pub use core::{Key, Phase, Snapshot, Value};
pub use engine::{EngineError, NodeGroup, TickReport};
pub use reconcile::MergeOrder;
pub use render::{Element, RecordingSurface, RenderSurface, Template};
pub use transition::{TargetState, TransitionEvent, TransitionEventKind, TransitionSpec};
