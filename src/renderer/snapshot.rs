//! Per-piece render snapshots
//!
//! Layer membership is derived from state here rather than tracked on the
//! piece. The renderer moves sprites between layers to match.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::animation::{AnimationCatalog, AnimationKey};
use crate::sim::piece::{Piece, PieceColor, PieceKind, PieceState};

/// Draw order, back to front
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RenderLayer {
    /// Shadows, masked to the table
    Shadow,
    /// Pieces resting on the board
    Table,
    /// Pieces in the air
    Airborne,
}

/// Sprite layer for a state (None while hidden)
pub fn layer_for(state: PieceState) -> Option<RenderLayer> {
    match state {
        PieceState::Hidden => None,
        PieceState::Thrown => Some(RenderLayer::Airborne),
        PieceState::OnTable | PieceState::Promoting | PieceState::Captured => {
            Some(RenderLayer::Table)
        }
    }
}

pub fn shadow_visible(state: PieceState) -> bool {
    !matches!(state, PieceState::Hidden | PieceState::Captured)
}

/// Everything a renderer needs to draw one piece this tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieceSnapshot {
    pub id: u32,
    pub kind: PieceKind,
    pub color: PieceColor,
    pub state: PieceState,
    pub position: Vec2,
    pub scale: f32,
    pub animation_tick: u32,
    /// Frame to display (animation tick held on the last frame)
    pub frame: u32,
    pub sprite: AnimationKey,
    pub layer: RenderLayer,
    pub shadow: Option<AnimationKey>,
    /// Sort key within a layer
    pub z_index: f32,
}

pub fn snapshot(piece: &Piece, catalog: &AnimationCatalog) -> Option<PieceSnapshot> {
    let layer = layer_for(piece.state)?;
    let sprite = AnimationKey::for_piece(piece);
    let frames = catalog.frames(&sprite);
    let shadow = shadow_visible(piece.state).then(|| catalog.shadow_key(piece.color, piece.kind));

    Some(PieceSnapshot {
        id: piece.id,
        kind: piece.kind,
        color: piece.color,
        state: piece.state,
        position: piece.position,
        scale: piece.scale,
        animation_tick: piece.animation_tick,
        frame: piece.animation_tick.min(frames - 1),
        sprite,
        layer,
        shadow,
        z_index: piece.position.y,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layers() {
        assert_eq!(layer_for(PieceState::Hidden), None);
        assert_eq!(layer_for(PieceState::Thrown), Some(RenderLayer::Airborne));
        assert_eq!(layer_for(PieceState::Promoting), Some(RenderLayer::Table));
        assert_eq!(layer_for(PieceState::Captured), Some(RenderLayer::Table));
        assert!(!shadow_visible(PieceState::Captured));
        assert!(shadow_visible(PieceState::Thrown));
    }

    #[test]
    fn test_snapshot_holds_last_frame() {
        let catalog = AnimationCatalog::uniform(10, 5);
        let mut piece = Piece::new(9);
        piece.throw(PieceColor::Black, Vec2::new(800.0, 900.0), 0.96, PieceKind::Pawn, 0);
        piece.land();
        piece.animation_tick = 25;

        let snap = snapshot(&piece, &catalog).expect("visible");
        assert_eq!(snap.frame, 9);
        assert_eq!(snap.layer, RenderLayer::Table);
        assert_eq!(snap.z_index, 900.0);
        assert!(snap.shadow.is_some());

        piece.hide();
        assert!(snapshot(&piece, &catalog).is_none());
    }

    #[test]
    fn test_snapshot_with_missing_animation() {
        let catalog = AnimationCatalog::empty();
        let mut piece = Piece::new(2);
        piece.throw(PieceColor::White, Vec2::ZERO, 1.0, PieceKind::Pawn, 4);
        let snap = snapshot(&piece, &catalog).expect("visible");
        assert_eq!(snap.frame, 0);
        assert_eq!(snap.layer, RenderLayer::Airborne);
    }
}
