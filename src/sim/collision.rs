//! Hitboxes and landing overlap checks
//!
//! Pieces collide as axis-aligned boxes centred on their board position.
//! Box size depends on the piece type and grows with perspective scale, so
//! pieces near the viewer are both drawn and hit larger.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::piece::{Piece, PieceKind};

/// Unscaled hitbox size (w, h) per piece type
pub fn hitbox_size(kind: PieceKind) -> Vec2 {
    match kind {
        PieceKind::Pawn => Vec2::new(60.0, 50.0),
        PieceKind::Knight | PieceKind::Bishop => Vec2::new(70.0, 50.0),
        PieceKind::Rook | PieceKind::Queen | PieceKind::King => Vec2::new(80.0, 50.0),
    }
}

/// Linear depth scale: 1 at `reference_y`, larger further down the board
#[inline]
pub fn perspective_scale(y: f32, reference_y: f32, scale_factor: f32) -> f32 {
    1.0 + (y - reference_y) * scale_factor
}

/// Axis-aligned box, top-left origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hitbox {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Hitbox {
    /// Box of `size * scale` centred on `center`
    pub fn centered(center: Vec2, size: Vec2, scale: f32) -> Self {
        let scaled = size * scale;
        Self {
            x: center.x - scaled.x / 2.0,
            y: center.y - scaled.y / 2.0,
            w: scaled.x,
            h: scaled.y,
        }
    }

    /// Strict overlap; touching edges do not count
    #[inline]
    pub fn overlaps(&self, other: &Hitbox) -> bool {
        self.x < other.x + other.w
            && self.x + self.w > other.x
            && self.y < other.y + other.h
            && self.y + self.h > other.y
    }
}

/// Indices of on-board pieces (on the table or promoting) whose hitbox
/// overlaps `pieces[subject]`, in list order
pub fn find_overlaps(pieces: &[Piece], subject: usize) -> Vec<usize> {
    let Some(lander) = pieces.get(subject) else {
        return Vec::new();
    };
    let hitbox = lander.hitbox();

    pieces
        .iter()
        .enumerate()
        .filter(|&(i, other)| i != subject && other.is_on_board())
        .filter(|(_, other)| hitbox.overlaps(&other.hitbox()))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::piece::{PieceColor, PieceState};

    fn placed(id: u32, pos: Vec2, kind: PieceKind, state: PieceState) -> Piece {
        let mut piece = Piece::new(id);
        piece.kind = kind;
        piece.color = PieceColor::White;
        piece.position = pos;
        piece.scale = 1.0;
        piece.state = state;
        piece
    }

    #[test]
    fn test_perspective_scale() {
        assert_eq!(perspective_scale(1003.0, 1003.0, 0.0004), 1.0);
        assert!(perspective_scale(1403.0, 1003.0, 0.0004) > 1.0);
        assert!(perspective_scale(703.0, 1003.0, 0.0004) < 1.0);
        assert!((perspective_scale(1503.0, 1003.0, 0.0004) - 1.2).abs() < 1e-6);
    }

    #[test]
    fn test_hitbox_scales_with_perspective() {
        let near = Hitbox::centered(Vec2::new(100.0, 100.0), hitbox_size(PieceKind::Pawn), 1.5);
        assert_eq!(near.w, 90.0);
        assert_eq!(near.h, 75.0);
        assert_eq!(near.x, 55.0);
        assert_eq!(near.y, 62.5);
    }

    #[test]
    fn test_overlap_is_strict() {
        let a = Hitbox { x: 0.0, y: 0.0, w: 10.0, h: 10.0 };
        let touching = Hitbox { x: 10.0, y: 0.0, w: 10.0, h: 10.0 };
        let inside = Hitbox { x: 9.0, y: 9.0, w: 10.0, h: 10.0 };
        assert!(!a.overlaps(&touching));
        assert!(a.overlaps(&inside));
        assert!(inside.overlaps(&a));
    }

    #[test]
    fn test_find_overlaps_skips_self_and_off_board() {
        let pos = Vec2::new(1000.0, 1000.0);
        let pieces = vec![
            placed(1, pos, PieceKind::Pawn, PieceState::OnTable),
            placed(2, pos + Vec2::new(30.0, 0.0), PieceKind::Rook, PieceState::Promoting),
            placed(3, pos, PieceKind::Pawn, PieceState::Captured),
            placed(4, pos, PieceKind::Pawn, PieceState::Thrown),
            placed(5, pos + Vec2::new(500.0, 0.0), PieceKind::King, PieceState::OnTable),
            placed(6, pos, PieceKind::Pawn, PieceState::Thrown),
        ];
        assert_eq!(find_overlaps(&pieces, 5), vec![0, 1]);
        assert_eq!(find_overlaps(&pieces, 0), vec![1]);
        assert!(find_overlaps(&pieces, 42).is_empty());
    }
}
