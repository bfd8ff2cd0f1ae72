//! Common test utilities for integration tests.

#![allow(dead_code)]

pub mod harness;

use std::cell::RefCell;
use std::rc::Rc;

use blockflow::BlockId;

/// Tracks hook invocations for testing.
///
/// Each field records calls to the corresponding hook with their arguments.
#[derive(Default, Clone)]
pub struct HookTracker {
    /// Id of each grabbed block.
    pub grabbed: Rc<RefCell<Vec<BlockId>>>,
    /// Count of on_release calls.
    pub released: Rc<RefCell<usize>>,
    /// (is_first, target_id) per snapping evaluation.
    pub snapping_calls: Rc<RefCell<Vec<(bool, Option<BlockId>)>>>,
    /// (block_id, former_parent_id) per delete-policy evaluation.
    pub delete_calls: Rc<RefCell<Vec<(BlockId, Option<BlockId>)>>>,
}

impl HookTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all recorded calls.
    pub fn clear(&self) {
        self.grabbed.borrow_mut().clear();
        *self.released.borrow_mut() = 0;
        self.snapping_calls.borrow_mut().clear();
        self.delete_calls.borrow_mut().clear();
    }
}
