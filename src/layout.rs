//! Tree layout: subtree-width propagation, centering, and row placement.
//!
//! The engine works on one tree at a time. A settle pass first refreshes the
//! cached `subtree_width` of every block in the affected subtree (bottom-up),
//! pushes the updated widths through the ancestor chain, and then assigns
//! positions from the tree's root downward: children are placed left to right
//! under their parent with exactly [`LayoutConfig::horizontal_padding`]
//! between sibling spans, each child centered in its own effective-width slot,
//! one padding-row below the parent.
//!
//! Roots are never repositioned relative to each other; a root sits wherever
//! it was dropped and only [`crate::viewport::Viewport::normalize`] may shift
//! it (and then shifts everything uniformly).

use crate::model::{BlockForest, BlockId};

/// Spacing knobs for layout and connector routing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    /// Horizontal gap between adjacent sibling spans.
    pub horizontal_padding: f32,
    /// Vertical gap between a parent's bottom edge and its children's row.
    pub vertical_padding: f32,
    /// Half-width and height of connector arrowheads.
    pub arrow_size: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            horizontal_padding: 20.0,
            vertical_padding: 80.0,
            arrow_size: 5.0,
        }
    }
}

/// Id of the root of the tree containing `id`.
pub fn root_of(forest: &BlockForest, id: BlockId) -> Option<BlockId> {
    let mut cur = forest.get(id)?;
    while let Some(p) = cur.parent {
        cur = forest.get(p)?;
    }
    Some(cur.id)
}

/// Recompute `subtree_width` for `id` and every descendant, bottom-up.
///
/// Returns the effective width of `id` (own width or refreshed subtree span,
/// whichever is larger).
fn refresh_widths(forest: &mut BlockForest, id: BlockId, config: &LayoutConfig) -> f32 {
    let children: Vec<BlockId> = forest.children_of(id).to_vec();
    let mut total = 0.0;
    for (i, &child) in children.iter().enumerate() {
        if i > 0 {
            total += config.horizontal_padding;
        }
        total += refresh_widths(forest, child, config);
    }
    if let Some(block) = forest.get_mut(id) {
        block.subtree_width = total;
    }
    forest.get(id).map_or(0.0, |b| b.effective_width())
}

/// Recompute the span a parent's current children occupy, from cached
/// effective widths.
fn span_of_children(forest: &BlockForest, parent: BlockId, config: &LayoutConfig) -> f32 {
    let children = forest.children_of(parent);
    let mut total = 0.0;
    for (i, &child) in children.iter().enumerate() {
        if i > 0 {
            total += config.horizontal_padding;
        }
        total += forest.get(child).map_or(0.0, |b| b.effective_width());
    }
    total
}

/// Walk from `from` up through the parent chain, refreshing each ancestor's
/// `subtree_width` from its current children. Positions are untouched.
pub fn propagate_subtree_width(forest: &mut BlockForest, from: BlockId, config: &LayoutConfig) {
    let mut cur = forest.get(from).and_then(|b| b.parent);
    while let Some(parent) = cur {
        let total = span_of_children(forest, parent, config);
        if let Some(block) = forest.get_mut(parent) {
            block.subtree_width = total;
        }
        cur = forest.get(parent).and_then(|b| b.parent);
    }
}

/// Position all descendants of `parent`, recursing layer by layer.
///
/// Assumes `subtree_width` is current for every block underneath. Sibling
/// order is taken as-is; layout never reorders.
fn place_children(forest: &mut BlockForest, parent: BlockId, config: &LayoutConfig) {
    let Some(p) = forest.get(parent) else {
        return;
    };
    let (parent_x, child_row_y, total) = (
        p.x,
        p.bottom_edge() + config.vertical_padding,
        p.subtree_width,
    );
    let children: Vec<BlockId> = forest.children_of(parent).to_vec();
    let mut cursor = parent_x - total / 2.0;
    for &child in &children {
        let effective = forest.get(child).map_or(0.0, |b| b.effective_width());
        if let Some(block) = forest.get_mut(child) {
            block.x = cursor + effective / 2.0;
            block.y = child_row_y;
        }
        cursor += effective + config.horizontal_padding;
        place_children(forest, child, config);
    }
}

/// Re-settle the tree containing `from`.
///
/// Refreshes subtree widths under `from`, propagates them up to the tree's
/// root, then reassigns every position in that tree from the root downward.
/// Unknown ids are ignored and other trees are left alone. Settling an
/// unchanged forest is idempotent.
pub fn settle(forest: &mut BlockForest, from: BlockId, config: &LayoutConfig) {
    let Some(root) = root_of(forest, from) else {
        return;
    };
    tracing::trace!(from, root, "settle");
    refresh_widths(forest, from, config);
    propagate_subtree_width(forest, from, config);
    place_children(forest, root, config);
}

/// Settle every tree in the forest (used after snapshot import).
pub fn settle_forest(forest: &mut BlockForest, config: &LayoutConfig) {
    for root in forest.roots().to_vec() {
        refresh_widths(forest, root, config);
        place_children(forest, root, config);
    }
}
