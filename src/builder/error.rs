//! Build errors for node groups.

use thiserror::Error;

/// Errors that can occur when building a node group.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("Key accessor not specified. Call .key(f) before .build()")]
    MissingKeyAccessor,

    #[error("Start state not specified. Call .start(f) before .build()")]
    MissingStart,

    #[error("Template not specified. Call .template(t) before .build()")]
    MissingTemplate,
}
