//! Snapshot export and import.
//!
//! A snapshot is a flat list of block records in creation order. Export is a
//! plain projection of the forest; import rebuilds the forest and repairs
//! what it can: a record whose parent is absent from the snapshot becomes a
//! root, while a duplicated id or a self-parenting record is rejected
//! outright.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::EditorError;
use crate::model::{Block, BlockForest, BlockId};

/// One block, flattened for serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockRecord {
    pub id: BlockId,
    #[serde(default)]
    pub parent: Option<BlockId>,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub subtree_width: f32,
    #[serde(default)]
    pub content: serde_json::Value,
}

/// A complete, serializable image of a forest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Snapshot {
    pub blocks: Vec<BlockRecord>,
}

impl Snapshot {
    pub fn to_json(&self) -> Result<String, EditorError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, EditorError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Project the forest into a snapshot, in creation order.
pub fn export(forest: &BlockForest) -> Snapshot {
    Snapshot {
        blocks: forest
            .iter()
            .map(|b| BlockRecord {
                id: b.id,
                parent: b.parent,
                x: b.x,
                y: b.y,
                width: b.width,
                height: b.height,
                subtree_width: b.subtree_width,
                content: b.content.clone(),
            })
            .collect(),
    }
}

/// Rebuild a forest from a snapshot.
///
/// Records whose parent id does not appear in the snapshot are imported as
/// roots. Records are inserted parents-first so sibling order follows the
/// snapshot's record order. Id allocation resumes above the largest imported
/// id.
pub fn import(snapshot: &Snapshot) -> Result<BlockForest, EditorError> {
    let mut seen = HashSet::new();
    for record in &snapshot.blocks {
        if !seen.insert(record.id) {
            return Err(EditorError::DuplicateBlockId(record.id));
        }
        if record.parent == Some(record.id) {
            return Err(EditorError::SelfParent(record.id));
        }
    }

    let mut forest = BlockForest::new();
    let place = |forest: &mut BlockForest, record: &BlockRecord, parent: Option<BlockId>| {
        forest.insert_record(Block {
            id: record.id,
            parent,
            x: record.x,
            y: record.y,
            width: record.width,
            height: record.height,
            subtree_width: record.subtree_width,
            content: record.content.clone(),
        });
        forest.reserve_id(record.id);
    };

    // Insert records whose parent is already placed (or absent from the
    // snapshot entirely), repeating until only unreachable records remain.
    let mut pending: Vec<&BlockRecord> = snapshot.blocks.iter().collect();
    while !pending.is_empty() {
        let mut placed_any = false;
        pending.retain(|record| {
            let parent = record.parent.filter(|p| seen.contains(p));
            if let Some(p) = parent {
                if !forest.contains(p) {
                    return true;
                }
            } else if record.parent.is_some() {
                tracing::warn!(
                    id = record.id,
                    parent = ?record.parent,
                    "snapshot parent missing, importing block as root"
                );
            }
            place(&mut forest, record, parent);
            placed_any = true;
            false
        });
        if !placed_any && !pending.is_empty() {
            // Remaining records form a parent cycle. Break it by promoting
            // the earliest one to a root and resuming.
            let record = pending.remove(0);
            tracing::warn!(id = record.id, "snapshot parent cycle, importing block as root");
            place(&mut forest, record, None);
        }
    }
    Ok(forest)
}
