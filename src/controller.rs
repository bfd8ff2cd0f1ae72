//! Pointer-driven canvas controller.
//!
//! The [`CanvasController`] owns the forest and runs the drag state machine:
//! `Idle`, dragging a new block that is not yet part of the forest, or
//! dragging an existing block whose subtree has been detached for the
//! duration of the drag. Pointer moves never mutate the model; they only
//! update the transient drag position and report the current attach target
//! for indicator feedback. All mutation happens at pointer release, which
//! always resolves to a terminal [`DropOutcome`] and re-enters `Idle`.
//!
//! # Example
//!
//! ```ignore
//! use blockflow::{BlockTemplate, CanvasController, Point, Size};
//!
//! let mut ctrl = CanvasController::new();
//! let measure = |_: &BlockTemplate| Some(Size::new(120.0, 60.0));
//!
//! ctrl.begin_new_drag(BlockTemplate::new(serde_json::json!({"kind": "start"})),
//!                     &measure, Point::new(300.0, 100.0))?;
//! ctrl.pointer_move(Point::new(320.0, 110.0));
//! let outcome = ctrl.pointer_up();
//! # Ok::<(), blockflow::EditorError>(())
//! ```

use crate::edge::{route_connector, ConnectorPath};
use crate::error::EditorError;
use crate::hit_test::{find_attach_target, DragProbe};
use crate::hooks::{BlockTemplate, EditorHooks, GeometryProvider};
use crate::layout::{settle, settle_forest, LayoutConfig};
use crate::model::{BlockForest, BlockId, DetachedSubtree, Point, Size};
use crate::snapshot::{self, Snapshot};
use crate::viewport::Viewport;

/// Payload of a drag that spawns a new block.
#[derive(Debug)]
pub struct NewDrag {
    pub template: BlockTemplate,
    pub size: Size,
    /// Current center of the dragged payload.
    pub position: Point,
}

/// Payload of a drag that moves an existing subtree.
#[derive(Debug)]
pub struct ExistingDrag {
    pub subtree: DetachedSubtree,
    /// Current center of the dragged root block.
    pub position: Point,
}

/// Where the state machine currently is.
#[derive(Debug, Default)]
pub enum DragState {
    #[default]
    Idle,
    DraggingNew(NewDrag),
    DraggingExisting(ExistingDrag),
}

impl DragState {
    pub fn is_idle(&self) -> bool {
        matches!(self, DragState::Idle)
    }
}

/// Terminal result of a pointer release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// No drag was in progress.
    Ignored,
    /// A new-block drag ended with no legal landing spot; nothing entered
    /// the model.
    Discarded,
    /// A new block was created, as a root or under `parent`.
    Created {
        id: BlockId,
        parent: Option<BlockId>,
    },
    /// An existing subtree was moved under a new parent.
    Reparented { id: BlockId, parent: BlockId },
    /// An existing subtree was dropped in empty space and removed.
    Deleted { id: BlockId },
    /// An existing subtree went back where it came from (protected root, or
    /// the delete policy refused).
    Restored { id: BlockId },
}

/// Headless flowchart canvas: forest, layout, viewport, and drag machine.
pub struct CanvasController {
    forest: BlockForest,
    layout: LayoutConfig,
    viewport: Viewport,
    hooks: EditorHooks,
    state: DragState,
}

impl CanvasController {
    pub fn new() -> Self {
        Self::with_config(LayoutConfig::default(), Viewport::default())
    }

    pub fn with_config(layout: LayoutConfig, viewport: Viewport) -> Self {
        Self {
            forest: BlockForest::new(),
            layout,
            viewport,
            hooks: EditorHooks::default(),
            state: DragState::Idle,
        }
    }

    /// Install host callbacks, replacing the defaults.
    pub fn set_hooks(&mut self, hooks: EditorHooks) {
        self.hooks = hooks;
    }

    pub fn forest(&self) -> &BlockForest {
        &self.forest
    }

    pub fn layout_config(&self) -> &LayoutConfig {
        &self.layout
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn drag_state(&self) -> &DragState {
        &self.state
    }

    /// Route every parent-child connector in the live forest.
    ///
    /// Detached blocks have no connectors until their drag resolves.
    pub fn connectors(&self) -> Vec<ConnectorPath> {
        self.forest
            .links()
            .filter_map(|(parent, child)| {
                let p = self.forest.get(parent)?;
                let c = self.forest.get(child)?;
                Some(route_connector(p, c, &self.layout))
            })
            .collect()
    }

    /// Start dragging a new block spawned from `template`.
    ///
    /// The template is measured once, up front; a provider that cannot
    /// measure it fails the drag with [`EditorError::MeasureFailed`]. If a
    /// drag is already in flight the pointer-down is ignored and `Ok(false)`
    /// is returned.
    pub fn begin_new_drag(
        &mut self,
        template: BlockTemplate,
        provider: &dyn GeometryProvider,
        at: Point,
    ) -> Result<bool, EditorError> {
        if !self.state.is_idle() {
            return Ok(false);
        }
        let size = provider.measure(&template).ok_or(EditorError::MeasureFailed)?;
        tracing::debug!(x = at.x, y = at.y, "new-block drag started");
        self.state = DragState::DraggingNew(NewDrag {
            template,
            size,
            position: at,
        });
        Ok(true)
    }

    /// Start dragging an existing block and its whole subtree.
    ///
    /// The subtree leaves the live forest until the drag resolves. Returns
    /// `false` when `id` is unknown or a drag is already in flight.
    pub fn begin_block_drag(&mut self, id: BlockId, at: Point) -> bool {
        if !self.state.is_idle() {
            return false;
        }
        let Some(block) = self.forest.get(id) else {
            return false;
        };
        (self.hooks.on_grab)(block);
        let Some(subtree) = self.forest.detach_subtree(id) else {
            return false;
        };
        tracing::debug!(id, descendants = subtree.len() - 1, "block drag started");
        self.state = DragState::DraggingExisting(ExistingDrag {
            subtree,
            position: at,
        });
        true
    }

    /// Update the drag position and report the current attach target.
    ///
    /// Pure indicator feedback: the model is untouched. Returns `None` when
    /// idle or when no candidate admits the probe.
    pub fn pointer_move(&mut self, to: Point) -> Option<BlockId> {
        let probe = match &mut self.state {
            DragState::Idle => return None,
            DragState::DraggingNew(drag) => {
                drag.position = to;
                DragProbe::new(to.x, to.y - drag.size.height / 2.0)
            }
            DragState::DraggingExisting(drag) => {
                drag.position = to;
                DragProbe::new(to.x, to.y - drag.subtree.root.height / 2.0)
            }
        };
        find_attach_target(probe, self.forest.iter(), self.layout.horizontal_padding)
    }

    /// Resolve the drag. Always returns to `Idle`.
    pub fn pointer_up(&mut self) -> DropOutcome {
        let state = std::mem::take(&mut self.state);
        let outcome = match state {
            DragState::Idle => return DropOutcome::Ignored,
            DragState::DraggingNew(drag) => self.resolve_new_drop(drag),
            DragState::DraggingExisting(drag) => self.resolve_existing_drop(drag),
        };
        (self.hooks.on_release)();
        tracing::debug!(?outcome, "drag resolved");
        outcome
    }

    fn resolve_new_drop(&mut self, drag: NewDrag) -> DropOutcome {
        let probe = DragProbe::new(drag.position.x, drag.position.y - drag.size.height / 2.0);
        let target = find_attach_target(probe, self.forest.iter(), self.layout.horizontal_padding);
        let is_first = self.forest.is_empty();

        if let Some(target) = target {
            if !(self.hooks.snapping)(&drag.template, is_first, self.forest.get(target)) {
                return DropOutcome::Discarded;
            }
            let Some(id) = self
                .forest
                .add_child(target, drag.size, drag.template.content)
            else {
                return DropOutcome::Discarded;
            };
            settle(&mut self.forest, target, &self.layout);
            self.viewport.normalize(&mut self.forest);
            return DropOutcome::Created {
                id,
                parent: Some(target),
            };
        }

        // No target: only the very first block may land on open canvas.
        if is_first
            && self.viewport.contains(drag.position)
            && (self.hooks.snapping)(&drag.template, true, None)
        {
            let id = self
                .forest
                .add_root(drag.size, drag.template.content, drag.position);
            settle(&mut self.forest, id, &self.layout);
            self.viewport.normalize(&mut self.forest);
            return DropOutcome::Created { id, parent: None };
        }
        DropOutcome::Discarded
    }

    fn resolve_existing_drop(&mut self, drag: ExistingDrag) -> DropOutcome {
        let probe = DragProbe::new(
            drag.position.x,
            drag.position.y - drag.subtree.root.height / 2.0,
        );
        let target = find_attach_target(probe, self.forest.iter(), self.layout.horizontal_padding);
        let id = drag.subtree.root.id;

        if let Some(target) = target {
            // The subtree is off-graph, so the target can never be one of
            // its own descendants.
            match self.forest.reattach(drag.subtree, target) {
                Ok(id) => {
                    settle(&mut self.forest, target, &self.layout);
                    self.viewport.normalize(&mut self.forest);
                    return DropOutcome::Reparented { id, parent: target };
                }
                Err(subtree) => {
                    let id = self.forest.restore(subtree);
                    settle(&mut self.forest, id, &self.layout);
                    return DropOutcome::Restored { id };
                }
            }
        }

        // The first-ever block keeps its root role; empty-space drops cannot
        // delete it.
        if id == 0 && drag.subtree.root.parent.is_none() {
            let id = self.forest.restore(drag.subtree);
            settle(&mut self.forest, id, &self.layout);
            self.viewport.normalize(&mut self.forest);
            return DropOutcome::Restored { id };
        }

        let former_parent = drag.subtree.prev_parent.and_then(|p| self.forest.get(p));
        if (self.hooks.allow_delete)(&drag.subtree.root, former_parent) {
            let settle_from = drag.subtree.prev_parent;
            tracing::debug!(id, "subtree deleted by empty-space drop");
            drop(drag.subtree);
            if let Some(from) = settle_from {
                settle(&mut self.forest, from, &self.layout);
                self.viewport.normalize(&mut self.forest);
            }
            return DropOutcome::Deleted { id };
        }

        let id = self.forest.restore(drag.subtree);
        settle(&mut self.forest, id, &self.layout);
        self.viewport.normalize(&mut self.forest);
        DropOutcome::Restored { id }
    }

    /// Export the live forest. Fails while a drag holds part of it off-graph.
    pub fn export_snapshot(&self) -> Result<Snapshot, EditorError> {
        if !self.state.is_idle() {
            return Err(EditorError::DragInProgress);
        }
        Ok(snapshot::export(&self.forest))
    }

    /// Replace the forest with an imported snapshot.
    ///
    /// Positions in a snapshot are not trusted; if more than one block comes
    /// in, a full settle and normalize pass runs before returning.
    pub fn import_snapshot(&mut self, snapshot: &Snapshot) -> Result<(), EditorError> {
        if !self.state.is_idle() {
            return Err(EditorError::DragInProgress);
        }
        let forest = snapshot::import(snapshot)?;
        self.forest = forest;
        if self.forest.len() > 1 {
            settle_forest(&mut self.forest, &self.layout);
            self.viewport.normalize(&mut self.forest);
        }
        tracing::debug!(blocks = self.forest.len(), "snapshot imported");
        Ok(())
    }

    /// Drop every block, abandon any in-flight drag, and reset id
    /// allocation.
    pub fn clear(&mut self) {
        self.state = DragState::Idle;
        self.forest.clear();
        tracing::debug!("canvas cleared");
    }
}

impl Default for CanvasController {
    fn default() -> Self {
        Self::new()
    }
}
