//! Error types for editor operations.

use crate::model::BlockId;

/// Errors surfaced by [`crate::controller::CanvasController`] and snapshot
/// import.
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    /// The geometry provider could not measure a block template.
    #[error("geometry provider failed to measure block template")]
    MeasureFailed,

    /// A snapshot contained the same block id twice.
    #[error("snapshot contains duplicate block id {0}")]
    DuplicateBlockId(BlockId),

    /// A snapshot record referenced itself as its own parent.
    #[error("block {0} lists itself as its parent")]
    SelfParent(BlockId),

    /// An operation that requires an idle controller ran mid-drag.
    #[error("a drag is already in progress")]
    DragInProgress,

    /// Snapshot JSON could not be parsed or serialized.
    #[error("snapshot serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}
