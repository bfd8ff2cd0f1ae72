//! # Blockflow
//!
//! A headless engine for drag-and-drop flowchart builders. Blocks form a
//! rooted forest; dropping a block near an existing one snaps it underneath
//! as a child, and a tree layout keeps every subtree centered under its
//! parent with fixed padding. Rendering, styling, and input capture are the
//! host's job: the engine consumes pointer events in canvas coordinates and
//! exposes plain geometry back.
//!
//! ## Features
//!
//! - **Rooted-forest model** - Blocks with O(1) id lookup, ordered children,
//!   and whole-subtree detach/reattach
//! - **Recursive tree layout** - Subtree-width propagation, sibling padding,
//!   and centering, settled incrementally from any changed block
//! - **Drag state machine** - New-block and reparent drags with attach-zone
//!   detection and host-pluggable snap/delete policies
//! - **Edge routing** - Orthogonal connector polylines with arrowheads
//! - **Snapshots** - JSON import/export with deterministic repair of
//!   inconsistent records
//!
//! ## Quick Start
//!
//! ```ignore
//! use blockflow::{BlockTemplate, CanvasController, Point, Size};
//!
//! let mut ctrl = CanvasController::new();
//! let measure = |_: &BlockTemplate| Some(Size::new(120.0, 60.0));
//!
//! // First block lands as a root wherever it is dropped.
//! ctrl.begin_new_drag(BlockTemplate::new(serde_json::Value::Null),
//!                     &measure, Point::new(300.0, 100.0))?;
//! ctrl.pointer_up();
//!
//! // Later blocks snap under whatever they are released over.
//! ctrl.begin_new_drag(BlockTemplate::new(serde_json::Value::Null),
//!                     &measure, Point::new(300.0, 160.0))?;
//! ctrl.pointer_up();
//!
//! for connector in ctrl.connectors() {
//!     // hand the polyline and arrowhead to your renderer
//! }
//! # Ok::<(), blockflow::EditorError>(())
//! ```
//!
//! ## Core Components
//!
//! - [`CanvasController`] - Pointer-driven facade over the whole engine
//! - [`BlockForest`] - The rooted-forest block model
//! - [`settle`] - The tree layout pass
//! - [`find_attach_target`] - Attach-zone hit testing
//! - [`route_connector`] - Parent-child connector routing
//! - [`Snapshot`] - Serializable forest image

pub mod controller;
pub mod edge;
pub mod error;
pub mod hooks;
pub mod layout;
pub mod model;
pub mod snapshot;
pub mod viewport;

pub use controller::{CanvasController, DragState, DropOutcome};
pub use edge::{route_connector, Arrowhead, ConnectorPath, Side};
pub use error::EditorError;
pub use hit_test::{find_attach_target, AttachZone, DragProbe};
pub use hooks::{BlockTemplate, EditorHooks, GeometryProvider};
pub use layout::{settle, settle_forest, LayoutConfig};
pub use model::{Block, BlockForest, BlockId, DetachedSubtree, Point, Size};
pub use snapshot::{BlockRecord, Snapshot};
pub use viewport::Viewport;
