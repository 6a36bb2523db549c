//! Live piece counts for the stats display

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::sim::piece::{Piece, PieceColor, PieceKind};

/// Pieces in play (not captured, not hidden) by color and type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PieceCounts {
    counts: [[u32; 6]; 2],
}

impl PieceCounts {
    pub fn from_pieces<'a>(pieces: impl IntoIterator<Item = &'a Piece>) -> Self {
        let mut counts = Self::default();
        for piece in pieces.into_iter().filter(|p| p.is_alive()) {
            counts.counts[piece.color.index()][piece.kind.index()] += 1;
        }
        counts
    }

    pub fn get(&self, color: PieceColor, kind: PieceKind) -> u32 {
        self.counts[color.index()][kind.index()]
    }

    /// All pieces of one color
    pub fn total(&self, color: PieceColor) -> u32 {
        self.counts[color.index()].iter().sum()
    }
}

/// `{"white": {"pawn": 8, ...}, "black": {...}}`
impl Serialize for PieceCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        struct ColorRow<'a>(&'a [u32; 6]);

        impl Serialize for ColorRow<'_> {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let mut map = serializer.serialize_map(Some(6))?;
                for kind in PieceKind::ALL {
                    map.serialize_entry(kind.as_str(), &self.0[kind.index()])?;
                }
                map.end()
            }
        }

        let mut map = serializer.serialize_map(Some(2))?;
        for color in PieceColor::ALL {
            map.serialize_entry(color.as_str(), &ColorRow(&self.counts[color.index()]))?;
        }
        map.end()
    }
}
