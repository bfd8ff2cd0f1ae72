//! Canvas bounds and left-overflow normalization.
//!
//! Layout can push blocks past the canvas's left edge (a wide subtree
//! centered on a root near the edge, for instance). Rather than clamping
//! individual blocks, the whole forest is shifted right just far enough to
//! bring everything back inside, preserving every relative position.

use crate::model::{BlockForest, Point};

/// The visible canvas region, in the same coordinate space as block centers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Top-left corner of the canvas.
    pub origin: Point,
    pub width: f32,
    pub height: f32,
    /// Gap kept between the canvas edge and the leftmost block after a
    /// normalize pass.
    pub margin: f32,
}

impl Viewport {
    pub fn new(origin: Point, width: f32, height: f32) -> Self {
        Self {
            origin,
            width,
            height,
            margin: 20.0,
        }
    }

    pub fn with_margin(mut self, margin: f32) -> Self {
        self.margin = margin;
        self
    }

    /// Whether `point` lies inside the canvas (edges inclusive).
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.origin.x
            && point.x <= self.origin.x + self.width
            && point.y >= self.origin.y
            && point.y <= self.origin.y + self.height
    }

    /// Shift every block right if any left edge overflows the canvas.
    ///
    /// Returns the applied shift, or `0.0` when nothing overflowed. All
    /// blocks move by the same amount, so relative geometry is untouched.
    pub fn normalize(&self, forest: &mut BlockForest) -> f32 {
        let Some(min_left) = forest
            .iter()
            .map(|b| b.left_edge())
            .min_by(|a, b| a.total_cmp(b))
        else {
            return 0.0;
        };
        if min_left >= self.origin.x {
            return 0.0;
        }
        let shift = self.origin.x - min_left + self.margin;
        tracing::debug!(shift, "normalizing left overflow");
        forest.shift_all_x(shift);
        shift
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(Point::new(0.0, 0.0), 1920.0, 1080.0)
    }
}
