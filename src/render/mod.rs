//! Rendering seam: surfaces, templates and template instantiation.
//!
//! The engine never assumes a concrete rendering backend. It creates,
//! attaches, mutates and removes targets only through [`RenderSurface`],
//! and describes what one item looks like with a [`Template`].

mod instantiate;
mod recording;
mod surface;
mod template;

pub(crate) use instantiate::{Instantiator, MountScope};
pub use instantiate::{validate_tag, TemplateIssue, TemplateWarning};
pub use recording::{RecordingSurface, SurfaceCall, TargetId};
pub use surface::{Listener, Patch, RenderSurface, SurfaceError};
pub use template::{AttrValue, Element, ListenerFactory, Template, ValueFn};
