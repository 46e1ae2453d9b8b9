//! Core value types.
//!
//! This module contains the pure vocabulary shared by every other layer:
//! - Item keys and node phases
//! - Attribute values and state snapshots
//! - Interpolation factories and easing
//!
//! Nothing in this module touches a render surface.

mod interpolate;
mod key;
mod phase;
mod value;

pub use interpolate::{linear, numeric, numeric_factory, Ease, InterpolationFactory, Interpolator};
pub use key::Key;
pub use phase::Phase;
pub use value::{AttrKey, Snapshot, Value};
