//! Keyed reconciliation.
//!
//! Given the previous key order and a new data array, classify every key as
//! ENTER, UPDATE or LEAVE, compute a visually stable merged order, and hand
//! each node its next transition. Reconciliation is pure bookkeeping over
//! the node table; it never touches render targets.

mod merge;
mod reconciler;
mod validate;

pub use merge::{merge_keys, MergeOrder};
pub use reconciler::{reconcile, KeyFn, Lifecycle, NodeTable, Reconciliation, SpecFn, StartFn};
pub use validate::{unique_keys, DuplicateKey};
