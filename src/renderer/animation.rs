//! Animation keys and frame counts
//!
//! Every sprite animation is named by a `(color, type, shadow, variant)`
//! key. The catalog maps keys to frame counts; the simulation uses those to
//! know when a promotion or capture animation has finished.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::sim::piece::{Piece, PieceColor, PieceKind, PieceState};

/// Which animation family a key belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimationVariant {
    /// Throw arc, landing and idle frames
    Piece,
    /// Capture sequence
    Capture,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnimationKey {
    pub color: PieceColor,
    pub kind: PieceKind,
    pub shadow: bool,
    pub variant: AnimationVariant,
}

impl AnimationKey {
    pub fn sprite(color: PieceColor, kind: PieceKind, variant: AnimationVariant) -> Self {
        Self {
            color,
            kind,
            shadow: false,
            variant,
        }
    }

    pub fn shadow(color: PieceColor, kind: PieceKind) -> Self {
        Self {
            color,
            kind,
            shadow: true,
            variant: AnimationVariant::Piece,
        }
    }

    /// Sprite animation a piece plays in its current state
    pub fn for_piece(piece: &Piece) -> Self {
        let variant = if piece.state == PieceState::Captured {
            AnimationVariant::Capture
        } else {
            AnimationVariant::Piece
        };
        Self::sprite(piece.color, piece.kind, variant)
    }
}

/// Frame counts per animation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnimationCatalog {
    frames: HashMap<AnimationKey, u32>,
}

impl AnimationCatalog {
    /// Frame count used for keys the catalog does not know
    pub const PLACEHOLDER_FRAMES: u32 = 1;

    /// No animations at all; every lookup falls back to the placeholder
    pub fn empty() -> Self {
        Self::default()
    }

    /// Same frame count for every piece animation and every capture animation
    pub fn uniform(piece_frames: u32, capture_frames: u32) -> Self {
        let mut catalog = Self::empty();
        for color in PieceColor::ALL {
            for kind in PieceKind::ALL {
                catalog.insert(AnimationKey::sprite(color, kind, AnimationVariant::Piece), piece_frames);
                catalog.insert(AnimationKey::shadow(color, kind), piece_frames);
                catalog.insert(
                    AnimationKey::sprite(color, kind, AnimationVariant::Capture),
                    capture_frames,
                );
            }
        }
        catalog
    }

    pub fn insert(&mut self, key: AnimationKey, frames: u32) {
        self.frames.insert(key, frames.max(1));
    }

    pub fn contains(&self, key: &AnimationKey) -> bool {
        self.frames.contains_key(key)
    }

    /// Frame count, or the placeholder if the animation is missing
    pub fn frames(&self, key: &AnimationKey) -> u32 {
        match self.frames.get(key) {
            Some(&frames) => frames,
            None => {
                log::debug!("no animation for {:?}, using placeholder", key);
                Self::PLACEHOLDER_FRAMES
            }
        }
    }

    /// Shadow animation for a piece, falling back to its sprite animation
    pub fn shadow_key(&self, color: PieceColor, kind: PieceKind) -> AnimationKey {
        let shadow = AnimationKey::shadow(color, kind);
        if self.contains(&shadow) {
            shadow
        } else {
            AnimationKey::sprite(color, kind, AnimationVariant::Piece)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_catalog() {
        let catalog = AnimationCatalog::uniform(40, 20);
        let key = AnimationKey::sprite(PieceColor::Black, PieceKind::Queen, AnimationVariant::Piece);
        assert_eq!(catalog.frames(&key), 40);
        let capture =
            AnimationKey::sprite(PieceColor::White, PieceKind::King, AnimationVariant::Capture);
        assert_eq!(catalog.frames(&capture), 20);
    }

    #[test]
    fn test_missing_animation_falls_back() {
        let catalog = AnimationCatalog::empty();
        let key = AnimationKey::sprite(PieceColor::White, PieceKind::Pawn, AnimationVariant::Piece);
        assert_eq!(catalog.frames(&key), AnimationCatalog::PLACEHOLDER_FRAMES);
        assert_eq!(catalog.shadow_key(PieceColor::White, PieceKind::Pawn), key);
    }

    #[test]
    fn test_zero_frames_clamped() {
        let mut catalog = AnimationCatalog::empty();
        let key = AnimationKey::shadow(PieceColor::Black, PieceKind::Rook);
        catalog.insert(key, 0);
        assert_eq!(catalog.frames(&key), 1);
        assert_eq!(catalog.shadow_key(PieceColor::Black, PieceKind::Rook), key);
    }

    #[test]
    fn test_key_follows_state() {
        let mut piece = Piece::new(1);
        piece.kind = PieceKind::Bishop;
        piece.state = PieceState::OnTable;
        assert_eq!(AnimationKey::for_piece(&piece).variant, AnimationVariant::Piece);
        piece.state = PieceState::Captured;
        assert_eq!(AnimationKey::for_piece(&piece).variant, AnimationVariant::Capture);
    }
}
