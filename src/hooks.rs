//! Host integration points: block measurement and drop policy callbacks.
//!
//! The engine is headless, so it cannot know how big a block renders or
//! whether the host wants a particular drop to go through. Hosts supply a
//! [`GeometryProvider`] to measure templates and an [`EditorHooks`] bundle to
//! observe drags and veto attaches or deletions. Every hook has a permissive
//! default, so a host that wants plain snap-and-delete behavior configures
//! nothing.

use crate::model::Block;

/// A description of a block that does not exist yet: the payload of a
/// new-block drag, before it is measured and inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockTemplate {
    /// Opaque host payload, copied into the created block.
    pub content: serde_json::Value,
}

impl BlockTemplate {
    pub fn new(content: serde_json::Value) -> Self {
        Self { content }
    }
}

/// Measures how large a block template will render.
///
/// Returning `None` means the template cannot be measured; the drag that
/// needed the measurement fails with
/// [`EditorError::MeasureFailed`](crate::error::EditorError::MeasureFailed).
pub trait GeometryProvider {
    fn measure(&self, template: &BlockTemplate) -> Option<crate::model::Size>;
}

/// Blanket impl so closures work as providers.
impl<F> GeometryProvider for F
where
    F: Fn(&BlockTemplate) -> Option<crate::model::Size>,
{
    fn measure(&self, template: &BlockTemplate) -> Option<crate::model::Size> {
        self(template)
    }
}

/// Decides whether a new block may be created. Receives the template, whether
/// an attach target was found, and the target block if so.
pub type SnappingFn = dyn Fn(&BlockTemplate, bool, Option<&Block>) -> bool;

/// Decides whether dropping an existing block on empty canvas deletes it.
/// Receives the dragged block and its previous parent, if any.
pub type AllowDeleteFn = dyn Fn(&Block, Option<&Block>) -> bool;

/// Callback bundle a host installs on the controller.
pub struct EditorHooks {
    /// Observes the start of an existing-block drag.
    pub on_grab: Box<dyn FnMut(&Block)>,
    /// Observes the end of any drag, whatever the outcome.
    pub on_release: Box<dyn FnMut()>,
    /// Gate for new-block drops. Defaults to always allowing.
    pub snapping: Box<SnappingFn>,
    /// Gate for delete-by-empty-drop. Defaults to always allowing.
    pub allow_delete: Box<AllowDeleteFn>,
}

impl EditorHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_on_grab(mut self, f: impl FnMut(&Block) + 'static) -> Self {
        self.on_grab = Box::new(f);
        self
    }

    pub fn with_on_release(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_release = Box::new(f);
        self
    }

    pub fn with_snapping(
        mut self,
        f: impl Fn(&BlockTemplate, bool, Option<&Block>) -> bool + 'static,
    ) -> Self {
        self.snapping = Box::new(f);
        self
    }

    pub fn with_allow_delete(mut self, f: impl Fn(&Block, Option<&Block>) -> bool + 'static) -> Self {
        self.allow_delete = Box::new(f);
        self
    }
}

impl Default for EditorHooks {
    fn default() -> Self {
        Self {
            on_grab: Box::new(|_| {}),
            on_release: Box::new(|| {}),
            snapping: Box::new(|_, _, _| true),
            allow_delete: Box::new(|_, _| true),
        }
    }
}

impl std::fmt::Debug for EditorHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorHooks").finish_non_exhaustive()
    }
}
