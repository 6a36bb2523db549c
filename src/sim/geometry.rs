//! Board-space geometry
//!
//! The board photo is a square texture; the playable surface inside it is a
//! convex quadrilateral seen in perspective. Every piece position goes
//! through `clamp_to_quad` so nothing ever lands off the board.
//!
//! Winding: corners run top-left, top-right, bottom-right, bottom-left.
//! With board y pointing down that is clockwise on screen, and the interior
//! sits on the positive side of every edge. `point_in_quad` only asks that
//! all four edge tests agree (zero counts for either side), so a quad given
//! in the opposite winding works too and edge points count as inside.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::{cross, rotate};

/// The playable surface, in board space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoardQuad {
    pub top_left: Vec2,
    pub top_right: Vec2,
    pub bottom_right: Vec2,
    pub bottom_left: Vec2,
}

impl Default for BoardQuad {
    fn default() -> Self {
        Self {
            top_left: Vec2::new(709.0, 668.0),
            top_right: Vec2::new(1516.0, 764.0),
            bottom_right: Vec2::new(1430.0, 1420.0),
            bottom_left: Vec2::new(474.0, 1282.0),
        }
    }
}

impl BoardQuad {
    pub fn new(top_left: Vec2, top_right: Vec2, bottom_right: Vec2, bottom_left: Vec2) -> Self {
        Self {
            top_left,
            top_right,
            bottom_right,
            bottom_left,
        }
    }

    /// Corners in winding order
    pub fn corners(&self) -> [Vec2; 4] {
        [self.top_left, self.top_right, self.bottom_right, self.bottom_left]
    }

    /// Boundary segments in winding order (top, right, bottom, left)
    pub fn edges(&self) -> [(Vec2, Vec2); 4] {
        [
            (self.top_left, self.top_right),
            (self.top_right, self.bottom_right),
            (self.bottom_right, self.bottom_left),
            (self.bottom_left, self.top_left),
        ]
    }

    /// Average of the four corners
    pub fn centroid(&self) -> Vec2 {
        self.corners().iter().copied().sum::<Vec2>() / 4.0
    }
}

/// Same-sign test against all four edges
pub fn point_in_quad(p: Vec2, quad: &BoardQuad) -> bool {
    let sides = quad.edges().map(|(a, b)| cross(a, b, p));
    sides.iter().all(|&s| s >= 0.0) || sides.iter().all(|&s| s <= 0.0)
}

/// Orthogonal projection of `p` onto segment `ab`, clamped to the segment.
/// A zero-length segment projects everything onto `a`.
pub fn closest_point_on_segment(p: Vec2, a: Vec2, b: Vec2) -> Vec2 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    let t = if len_sq > 0.0 {
        ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    a + ab * t
}

/// `p` if it is on the board, otherwise the nearest boundary point.
/// Ties go to the earlier edge (top, right, bottom, left). The result
/// always passes `point_in_quad`, so clamping twice changes nothing.
pub fn clamp_to_quad(p: Vec2, quad: &BoardQuad) -> Vec2 {
    if point_in_quad(p, quad) {
        return p;
    }

    let mut closest = p;
    let mut min_dist = f32::INFINITY;
    for (a, b) in quad.edges() {
        let projected = closest_point_on_segment(p, a, b);
        let dist = p.distance(projected);
        if dist < min_dist {
            min_dist = dist;
            closest = projected;
        }
    }
    nudge_inside(closest, quad)
}

/// Projection rounding can leave a boundary point a hair outside; step it
/// toward the centroid until the inside test agrees
fn nudge_inside(p: Vec2, quad: &BoardQuad) -> Vec2 {
    if point_in_quad(p, quad) {
        return p;
    }
    let inward = (quad.centroid() - p).normalize_or_zero();
    let mut step = 1e-4;
    let mut q = p;
    while step <= 1.0 {
        q = p + inward * step;
        if point_in_quad(q, quad) {
            break;
        }
        step *= 2.0;
    }
    q
}

/// Centre of a board square by bilinear interpolation of the corners.
/// File 0 is the left edge, rank 0 the far (top) edge.
pub fn grid_to_board_position(file: u8, rank: u8, quad: &BoardQuad) -> Vec2 {
    let u = (file as f32 + 0.5) / 8.0;
    let v = (rank as f32 + 0.5) / 8.0;
    quad.top_left * ((1.0 - u) * (1.0 - v))
        + quad.top_right * (u * (1.0 - v))
        + quad.bottom_right * (u * v)
        + quad.bottom_left * ((1.0 - u) * v)
}

/// World-to-screen placement of the board texture
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    /// Screen position of the board texture centre
    pub position: Vec2,
    /// Uniform scale
    pub scale: f32,
    /// Rotation (radians)
    pub rotation: f32,
    /// Side length of the square board texture
    pub texture_size: f32,
}

impl ViewTransform {
    /// "Cover" fit: the board fills the whole viewport, centred
    pub fn cover(width: f32, height: f32, texture_size: f32, overscan: f32) -> Self {
        let scale = (width / texture_size).max(height / texture_size) * overscan;
        Self {
            position: Vec2::new(width / 2.0, height / 2.0),
            scale,
            rotation: 0.0,
            texture_size,
        }
    }

    /// Screen point to unclamped board space
    pub fn screen_to_board(&self, screen: Vec2) -> Vec2 {
        let local = rotate((screen - self.position) / self.scale, -self.rotation);
        local + Vec2::splat(self.texture_size / 2.0)
    }

    /// Board space point to screen
    pub fn board_to_screen(&self, board: Vec2) -> Vec2 {
        let local = board - Vec2::splat(self.texture_size / 2.0);
        self.position + rotate(local * self.scale, self.rotation)
    }
}

/// Screen point to a clamped board position
pub fn screen_to_board_space(screen: Vec2, view: &ViewTransform, quad: &BoardQuad) -> Vec2 {
    clamp_to_quad(view.screen_to_board(screen), quad)
}
