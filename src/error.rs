//! Error taxonomy for the stowage engine.
//!
//! Geometric predicates (`contains`, `overlaps`, `is_free`) never use
//! this type — free/not-free and overlap/disjoint are normal outcomes,
//! not failures. This enum only covers the mutating/lookup operations
//! exposed on `Container`.

use crate::item::ItemId;
use crate::retrieval::RetrievalPlan;

/// Errors raised by the public `Container` API.
#[derive(Debug, thiserror::Error)]
pub enum StowageError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("item not found: {0}")]
    NotFound(ItemId),

    #[error("conflict: {0}")]
    Conflict(String),

    /// `removeItem` was blocked by other items; the caller gets the
    /// retrieval plan so it can resolve blockers itself.
    #[error("item {id} is not accessible, {} item(s) block it", plan.moves.len())]
    NotAccessible { id: ItemId, plan: RetrievalPlan },

    #[error("usage budget exhausted for item: {0}")]
    Exhausted(ItemId),

    #[error("operation cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, StowageError>;
