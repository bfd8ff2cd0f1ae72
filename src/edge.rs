//! Connector routing between parent and child blocks.
//!
//! Every parent-child link is drawn as an orthogonal polyline: straight down
//! from the parent's bottom center to the midpoint of the vertical gap,
//! horizontally across to the child's column, then straight down to the
//! child's top edge, where an arrowhead points into the child. When parent
//! and child share a column the horizontal leg collapses to nothing and the
//! polyline degenerates to a straight drop.

use crate::layout::LayoutConfig;
use crate::model::{Block, Point};

/// Which side of its parent a child landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// A triangular arrowhead pointing down into a child's top edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arrowhead {
    /// Tip of the triangle, at the child's top center.
    pub tip: Point,
    /// Upper-left wing.
    pub left: Point,
    /// Upper-right wing.
    pub right: Point,
}

/// A routed connector: polyline vertices plus arrowhead geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectorPath {
    /// Polyline from the parent's bottom center to the child's top center.
    pub points: Vec<Point>,
    pub arrow: Arrowhead,
    pub side: Side,
}

/// Route the connector from `parent` down to `child`.
///
/// The horizontal leg sits halfway through the vertical gap regardless of
/// the blocks' heights, so all connectors of one sibling row share a rail.
pub fn route_connector(parent: &Block, child: &Block, config: &LayoutConfig) -> ConnectorPath {
    let start = Point::new(parent.x, parent.bottom_edge());
    let rail_y = parent.bottom_edge() + config.vertical_padding / 2.0;
    let end = Point::new(child.x, child.top_edge());

    let mut points = vec![start, Point::new(parent.x, rail_y)];
    if child.x != parent.x {
        points.push(Point::new(child.x, rail_y));
    }
    points.push(end);

    let side = if child.x < parent.x {
        Side::Left
    } else {
        Side::Right
    };

    let wing_y = end.y - config.arrow_size;
    ConnectorPath {
        points,
        arrow: Arrowhead {
            tip: end,
            left: Point::new(child.x - config.arrow_size, wing_y),
            right: Point::new(child.x + config.arrow_size, wing_y),
        },
        side,
    }
}
