//! Quadrilateral geometry used for marker candidates.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Four image-space corners in detector winding order.
///
/// Serializes as `[[x, y], [x, y], [x, y], [x, y]]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quad {
    pub corners: [Point2<f32>; 4],
}

impl Quad {
    pub fn new(corners: [Point2<f32>; 4]) -> Self {
        Self { corners }
    }

    /// Build from plain `[x, y]` pairs.
    pub fn from_xy(points: [[f32; 2]; 4]) -> Self {
        Self {
            corners: points.map(|[x, y]| Point2::new(x, y)),
        }
    }

    /// Axis-aligned square with top-left corner `(x, y)` and side `side`.
    pub fn square(x: f32, y: f32, side: f32) -> Self {
        Self::from_xy([[x, y], [x + side, y], [x + side, y + side], [x, y + side]])
    }

    /// Mean of the four corners.
    pub fn centroid(&self) -> Point2<f32> {
        let sum = self
            .corners
            .iter()
            .fold(nalgebra::Vector2::zeros(), |acc, p| acc + p.coords);
        Point2::from(sum / 4.0)
    }

    /// Sum of side lengths of the closed polygon.
    pub fn perimeter(&self) -> f32 {
        (0..4)
            .map(|k| nalgebra::distance(&self.corners[k], &self.corners[(k + 1) % 4]))
            .sum()
    }

    /// Corners rounded to integer pixel coordinates, for drawing.
    pub fn pixel_corners(&self) -> [(i32, i32); 4] {
        self.corners
            .map(|p| (p.x.round() as i32, p.y.round() as i32))
    }
}
