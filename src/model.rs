//! The block forest: nodes, parent/child relationships, and cached geometry.
//!
//! [`BlockForest`] is the single owner of all [`Block`] records. Lookups by id
//! go through a hash index and children are kept in a maintained adjacency
//! index, so `get`, `children_of` and reparenting are O(1) instead of linear
//! scans over the whole forest.
//!
//! Structural edits during a drag go through [`BlockForest::detach_subtree`],
//! which moves the dragged block and its descendants out of the forest into an
//! owned [`DetachedSubtree`]. While that value exists the blocks are invisible
//! to every query; the only ways back in are [`BlockForest::reattach`],
//! [`BlockForest::restore`], or dropping the snapshot.

use std::collections::HashMap;

use serde_json::Value;

/// Stable identifier for a block, unique for the lifetime of the forest.
pub type BlockId = i32;

/// A point in canvas space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Intrinsic box size of a block, supplied once by the geometry provider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// One node in the layout forest.
///
/// `x` and `y` are the block's *center* in canvas space and are authoritative:
/// the renderer reads them but never owns them. `subtree_width` caches the
/// horizontal span the block's children occupy (`0.0` for a leaf) and is
/// refreshed by the layout engine whenever the forest's shape changes.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub id: BlockId,
    /// Parent block, or `None` for a root.
    pub parent: Option<BlockId>,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub subtree_width: f32,
    /// Opaque host payload, carried through snapshots untouched.
    pub content: Value,
}

impl Block {
    /// Horizontal span actually required by this block: its own width or the
    /// span of its children, whichever is larger.
    pub fn effective_width(&self) -> f32 {
        self.width.max(self.subtree_width)
    }

    pub fn left_edge(&self) -> f32 {
        self.x - self.width / 2.0
    }

    pub fn right_edge(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn top_edge(&self) -> f32 {
        self.y - self.height / 2.0
    }

    pub fn bottom_edge(&self) -> f32 {
        self.y + self.height / 2.0
    }
}

/// An owned snapshot of a detached subtree.
///
/// Produced by [`BlockForest::detach_subtree`]. Holds the detached root, its
/// descendants in stable pre-order, and the slot the root occupied before
/// detachment so a vetoed delete can put everything back exactly where it was.
/// Descendant `parent` fields are left intact, so the severed connector
/// relations can be read straight off the snapshot via [`Self::relations`].
#[derive(Debug, Clone)]
pub struct DetachedSubtree {
    pub root: Block,
    /// Every descendant of `root`, in pre-order.
    pub descendants: Vec<Block>,
    /// Parent the root had at detach time, or `None` if it was a forest root.
    pub prev_parent: Option<BlockId>,
    /// Sibling index the root occupied under `prev_parent` (0 for a root).
    pub prev_slot: usize,
}

impl DetachedSubtree {
    /// The parent/child relations severed by the detach, root link first.
    ///
    /// The root's former link is reported against `prev_parent`; descendant
    /// links are internal to the snapshot and survive reattachment unchanged.
    pub fn relations(&self) -> impl Iterator<Item = (Option<BlockId>, BlockId)> + '_ {
        std::iter::once((self.prev_parent, self.root.id))
            .chain(self.descendants.iter().map(|b| (b.parent, b.id)))
    }

    /// Number of blocks held by the snapshot, root included.
    pub fn len(&self) -> usize {
        1 + self.descendants.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

/// The forest of blocks, with id and adjacency indexes.
///
/// Iteration order (and therefore attach-target candidate order) is creation
/// order: blocks enter at the tail when created or reattached and keep their
/// slot until removed.
#[derive(Debug, Default)]
pub struct BlockForest {
    blocks: HashMap<BlockId, Block>,
    /// parent id -> ordered child ids. Sibling order is insertion order and is
    /// only ever changed by explicit reparent operations.
    children: HashMap<BlockId, Vec<BlockId>>,
    roots: Vec<BlockId>,
    /// Forest iteration order (creation order).
    order: Vec<BlockId>,
    next_id: BlockId,
}

impl BlockForest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn contains(&self, id: BlockId) -> bool {
        self.blocks.contains_key(&id)
    }

    pub fn get(&self, id: BlockId) -> Option<&Block> {
        self.blocks.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: BlockId) -> Option<&mut Block> {
        self.blocks.get_mut(&id)
    }

    /// Ids of the forest roots, in creation order.
    pub fn roots(&self) -> &[BlockId] {
        &self.roots
    }

    /// Ordered child ids of `id`. Empty for leaves and unknown ids.
    pub fn children_of(&self, id: BlockId) -> &[BlockId] {
        self.children.get(&id).map_or(&[], Vec::as_slice)
    }

    /// Blocks in forest iteration order (creation order).
    pub fn iter(&self) -> impl Iterator<Item = &Block> {
        self.order.iter().filter_map(|id| self.blocks.get(id))
    }

    /// Every parent/child link currently in the forest, in iteration order of
    /// the child.
    pub fn links(&self) -> impl Iterator<Item = (BlockId, BlockId)> + '_ {
        self.iter()
            .filter_map(|b| b.parent.map(|p| (p, b.id)))
    }

    fn alloc_id(&mut self) -> BlockId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Bump the id counter so future allocations stay above `id`.
    pub(crate) fn reserve_id(&mut self, id: BlockId) {
        if id >= self.next_id {
            self.next_id = id + 1;
        }
    }

    fn insert_block(&mut self, block: Block) {
        self.reserve_id(block.id);
        match block.parent {
            Some(p) => self.children.entry(p).or_default().push(block.id),
            None => self.roots.push(block.id),
        }
        self.order.push(block.id);
        self.blocks.insert(block.id, block);
    }

    /// Create a new root block centered at `at`.
    pub fn add_root(&mut self, size: Size, content: Value, at: Point) -> BlockId {
        let id = self.alloc_id();
        self.insert_block(Block {
            id,
            parent: None,
            x: at.x,
            y: at.y,
            width: size.width,
            height: size.height,
            subtree_width: 0.0,
            content,
        });
        id
    }

    /// Create a new block as the last child of `parent`.
    ///
    /// The block's position is provisional (it inherits the parent's center)
    /// until the next settle pass. Returns `None` if `parent` is unknown.
    pub fn add_child(&mut self, parent: BlockId, size: Size, content: Value) -> Option<BlockId> {
        let (px, py) = {
            let p = self.blocks.get(&parent)?;
            (p.x, p.y)
        };
        let id = self.alloc_id();
        self.insert_block(Block {
            id,
            parent: Some(parent),
            x: px,
            y: py,
            width: size.width,
            height: size.height,
            subtree_width: 0.0,
            content,
        });
        Some(id)
    }

    /// Used by snapshot import to re-populate the forest with existing ids.
    pub(crate) fn insert_record(&mut self, block: Block) {
        self.insert_block(block);
    }

    /// Ids of `id` and all its descendants, in pre-order.
    fn collect_subtree(&self, id: BlockId) -> Vec<BlockId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            out.push(cur);
            // Push children reversed so pre-order visits them left to right.
            for &c in self.children_of(cur).iter().rev() {
                stack.push(c);
            }
        }
        out
    }

    fn unlink(&mut self, id: BlockId, parent: Option<BlockId>) -> usize {
        let siblings = match parent {
            Some(p) => self.children.get_mut(&p),
            None => Some(&mut self.roots),
        };
        match siblings.and_then(|s| {
            let slot = s.iter().position(|&c| c == id)?;
            s.remove(slot);
            Some(slot)
        }) {
            Some(slot) => slot,
            None => 0,
        }
    }

    /// Remove `id` and every descendant from the forest. Returns `false` if
    /// the id is unknown.
    pub fn remove(&mut self, id: BlockId) -> bool {
        let Some(parent) = self.blocks.get(&id).map(|b| b.parent) else {
            return false;
        };
        self.unlink(id, parent);
        for sub in self.collect_subtree(id) {
            self.blocks.remove(&sub);
            self.children.remove(&sub);
            self.order.retain(|&o| o != sub);
        }
        true
    }

    /// Detach `id` and its descendants into an owned [`DetachedSubtree`].
    ///
    /// The blocks leave the live forest entirely: the index, the adjacency
    /// lists and the iteration order no longer see them. Layout is not
    /// recomputed here; the caller settles once the drag resolves.
    pub fn detach_subtree(&mut self, id: BlockId) -> Option<DetachedSubtree> {
        if !self.blocks.contains_key(&id) {
            return None;
        }
        let ids = self.collect_subtree(id);
        let prev_parent = self.blocks[&id].parent;
        let prev_slot = self.unlink(id, prev_parent);

        let mut taken: Vec<Block> = Vec::with_capacity(ids.len());
        for sub in &ids {
            self.children.remove(sub);
            self.order.retain(|&o| o != *sub);
            if let Some(block) = self.blocks.remove(sub) {
                taken.push(block);
            }
        }
        let mut it = taken.into_iter();
        let root = it.next()?;
        Some(DetachedSubtree {
            root,
            descendants: it.collect(),
            prev_parent,
            prev_slot,
        })
    }

    /// Reinsert a detached subtree as the last child of `new_parent`.
    ///
    /// Sibling order at the new parent places the moved block after all
    /// existing children. Returns the reattached root id, or gives the
    /// snapshot back untouched if `new_parent` is unknown.
    pub fn reattach(
        &mut self,
        mut subtree: DetachedSubtree,
        new_parent: BlockId,
    ) -> Result<BlockId, DetachedSubtree> {
        if !self.blocks.contains_key(&new_parent) {
            return Err(subtree);
        }
        subtree.root.parent = Some(new_parent);
        let root_id = subtree.root.id;
        self.insert_block(subtree.root);
        for block in subtree.descendants {
            self.insert_block(block);
        }
        Ok(root_id)
    }

    /// Put a detached subtree back where it came from.
    ///
    /// The root returns to its previous parent at its previous sibling slot
    /// (or to the root list, for a detached forest root). If the previous
    /// parent has since vanished the subtree comes back as a root.
    pub fn restore(&mut self, subtree: DetachedSubtree) -> BlockId {
        let root_id = subtree.root.id;
        let mut root = subtree.root;
        let prev_parent = subtree.prev_parent.filter(|p| self.blocks.contains_key(p));
        root.parent = prev_parent;
        self.insert_block(root);
        // insert_block appended the root; move it back to the captured slot.
        let siblings = match prev_parent {
            Some(p) => self.children.get_mut(&p),
            None => Some(&mut self.roots),
        };
        if let Some(s) = siblings {
            if let Some(pos) = s.iter().position(|&c| c == root_id) {
                let slot = subtree.prev_slot.min(s.len() - 1);
                let id = s.remove(pos);
                s.insert(slot, id);
            }
        }
        for block in subtree.descendants {
            self.insert_block(block);
        }
        root_id
    }

    /// Translate every block horizontally by `dx`, preserving all relative
    /// geometry. Subtree widths are unaffected.
    pub fn shift_all_x(&mut self, dx: f32) {
        for block in self.blocks.values_mut() {
            block.x += dx;
        }
    }

    /// Drop every block and reset id allocation.
    pub fn clear(&mut self) {
        self.blocks.clear();
        self.children.clear();
        self.roots.clear();
        self.order.clear();
        self.next_id = 0;
    }
}
