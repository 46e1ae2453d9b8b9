//! Engine error types.

use crate::core::Key;
use crate::reconcile::DuplicateKey;
use crate::render::SurfaceError;
use thiserror::Error;

/// Errors surfaced by a [`NodeGroup`](super::NodeGroup).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EngineError {
    /// The input data resolved two or more items to the same key.
    /// Nothing was reconciled.
    #[error("Duplicate keys in input: {}", list(.0))]
    DuplicateKeys(Vec<DuplicateKey>),

    /// The node's render target could not be created; the node was dropped.
    #[error("Failed to mount node '{key}': {source}")]
    Mount {
        key: Key,
        #[source]
        source: SurfaceError,
    },

    /// A mounted render target could not be moved to its place in the key
    /// order. The node keeps animating at its old position.
    #[error("Failed to move node '{key}': {source}")]
    Restack {
        key: Key,
        #[source]
        source: SurfaceError,
    },

    /// The group was torn down and accepts no more data.
    #[error("Node group has been torn down")]
    TornDown,
}

fn list(dupes: &[DuplicateKey]) -> String {
    dupes
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
