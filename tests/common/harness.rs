//! Test harness for driving the canvas controller.
//!
//! Wraps a [`CanvasController`] with a fixed-size geometry provider and
//! helpers for simulating complete drag gestures, so tests read as user
//! actions rather than pointer-event bookkeeping.

#![allow(dead_code)]

use super::HookTracker;
use blockflow::{
    Block, BlockId, BlockTemplate, CanvasController, DropOutcome, EditorHooks, Point, Size,
};
use serde_json::Value;

/// Every block in these tests measures 100x50.
pub const BLOCK: Size = Size {
    width: 100.0,
    height: 50.0,
};

/// Default spot for the first root: comfortably inside the canvas.
pub const ROOT_AT: Point = Point { x: 300.0, y: 100.0 };

pub struct CanvasHarness {
    pub ctrl: CanvasController,
    pub tracker: HookTracker,
}

impl CanvasHarness {
    /// Empty canvas with tracking hooks installed and permissive policies.
    pub fn new() -> Self {
        let tracker = HookTracker::new();
        let mut ctrl = CanvasController::new();
        ctrl.set_hooks(tracking_hooks(&tracker, true, true));
        Self { ctrl, tracker }
    }

    /// Reinstall hooks with the given policy outcomes, keeping tracking.
    pub fn set_policies(&mut self, snapping: bool, allow_delete: bool) {
        self.ctrl
            .set_hooks(tracking_hooks(&self.tracker, snapping, allow_delete));
    }

    /// Complete gesture: spawn a new block and release it at `at`.
    pub fn drop_new(&mut self, at: Point) -> DropOutcome {
        self.drop_new_with_content(at, Value::Null)
    }

    pub fn drop_new_with_content(&mut self, at: Point, content: Value) -> DropOutcome {
        let started = self
            .ctrl
            .begin_new_drag(BlockTemplate::new(content), &measure_fixed, at)
            .expect("measurement cannot fail in the harness");
        assert!(started, "a drag was already in progress");
        self.ctrl.pointer_move(at);
        self.ctrl.pointer_up()
    }

    /// Complete gesture: grab block `id` and release it at `at`.
    pub fn drag_block(&mut self, id: BlockId, at: Point) -> DropOutcome {
        assert!(
            self.ctrl.begin_block_drag(id, at),
            "block {id} could not be grabbed"
        );
        self.ctrl.pointer_move(at);
        self.ctrl.pointer_up()
    }

    /// A release point inside `target`'s attach zone (just under its center).
    pub fn attach_point(&self, target: BlockId) -> Point {
        let t = self.block(target);
        // Payload center, chosen so the payload's top edge lands between the
        // target's center and bottom edge.
        Point::new(t.x, t.y + t.height / 2.0 + BLOCK.height / 2.0)
    }

    /// A release point far from every attach zone.
    pub fn empty_space(&self) -> Point {
        Point::new(1500.0, 900.0)
    }

    pub fn block(&self, id: BlockId) -> Block {
        self.ctrl
            .forest()
            .get(id)
            .unwrap_or_else(|| panic!("block {id} not in forest"))
            .clone()
    }

    /// Every block's position, sorted by id (iteration order changes when a
    /// subtree is detached and reinserted, positions should not).
    pub fn positions(&self) -> Vec<(BlockId, f32, f32)> {
        let mut all: Vec<(BlockId, f32, f32)> =
            self.ctrl.forest().iter().map(|b| (b.id, b.x, b.y)).collect();
        all.sort_by_key(|&(id, ..)| id);
        all
    }

    /// Root B0 with children B1, B2, as the scenario tests use it.
    pub fn with_family() -> (Self, BlockId, BlockId, BlockId) {
        let mut h = Self::new();
        let b0 = created_id(h.drop_new(ROOT_AT));
        let b1 = created_id(h.drop_new(h.attach_point(b0)));
        let b2 = created_id(h.drop_new(h.attach_point(b0)));
        h.tracker.clear();
        (h, b0, b1, b2)
    }
}

/// Fixed-size provider used by every harness drag.
pub fn measure_fixed(_: &BlockTemplate) -> Option<Size> {
    Some(BLOCK)
}

/// Unwrap a `Created` outcome or fail the test.
pub fn created_id(outcome: DropOutcome) -> BlockId {
    match outcome {
        DropOutcome::Created { id, .. } => id,
        other => panic!("expected a created block, got {other:?}"),
    }
}

fn tracking_hooks(tracker: &HookTracker, snapping: bool, allow_delete: bool) -> EditorHooks {
    let grabbed = tracker.grabbed.clone();
    let released = tracker.released.clone();
    let snaps = tracker.snapping_calls.clone();
    let deletes = tracker.delete_calls.clone();
    EditorHooks::new()
        .with_on_grab(move |b| grabbed.borrow_mut().push(b.id))
        .with_on_release(move || *released.borrow_mut() += 1)
        .with_snapping(move |_, first, target| {
            snaps.borrow_mut().push((first, target.map(|b| b.id)));
            snapping
        })
        .with_allow_delete(move |block, parent| {
            deletes
                .borrow_mut()
                .push((block.id, parent.map(|b| b.id)));
            allow_delete
        })
}
