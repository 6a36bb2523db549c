//! Opening position feed
//!
//! The 32 starting pieces are thrown one at a time, in random order, as
//! plain pawns that resolve into their real type when they land.

use std::collections::VecDeque;

use glam::Vec2;
use rand::Rng;
use rand::seq::SliceRandom;

use super::geometry::{BoardQuad, grid_to_board_position};
use super::piece::{PieceColor, PieceKind};

pub const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SetupEntry {
    pub position: Vec2,
    pub color: PieceColor,
    pub kind: PieceKind,
}

/// Black on ranks 0-1 (far side), white on ranks 6-7, in board order
pub fn standard_setup(quad: &BoardQuad) -> Vec<SetupEntry> {
    let mut entries = Vec::with_capacity(32);
    for file in 0..8u8 {
        entries.push(SetupEntry {
            position: grid_to_board_position(file, 0, quad),
            color: PieceColor::Black,
            kind: BACK_RANK[file as usize],
        });
        entries.push(SetupEntry {
            position: grid_to_board_position(file, 1, quad),
            color: PieceColor::Black,
            kind: PieceKind::Pawn,
        });
    }
    for file in 0..8u8 {
        entries.push(SetupEntry {
            position: grid_to_board_position(file, 6, quad),
            color: PieceColor::White,
            kind: PieceKind::Pawn,
        });
        entries.push(SetupEntry {
            position: grid_to_board_position(file, 7, quad),
            color: PieceColor::White,
            kind: BACK_RANK[file as usize],
        });
    }
    entries
}

/// Queue of setup throws, drained one per interval once armed
#[derive(Debug, Clone, Default)]
pub struct SetupFeed {
    queue: VecDeque<SetupEntry>,
    next_tick: Option<u64>,
}

impl SetupFeed {
    pub fn new(entries: impl IntoIterator<Item = SetupEntry>) -> Self {
        Self {
            queue: entries.into_iter().collect(),
            next_tick: None,
        }
    }

    /// Standard opening in shuffled order
    pub fn shuffled<R: Rng>(quad: &BoardQuad, rng: &mut R) -> Self {
        let mut entries = standard_setup(quad);
        entries.shuffle(rng);
        Self::new(entries)
    }

    /// Start draining `delay` ticks after `now`
    pub fn arm(&mut self, now: u64, delay: u64) {
        self.next_tick = Some(now + delay);
    }

    pub fn is_armed(&self) -> bool {
        self.next_tick.is_some()
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    /// Next entry if one is due at tick `now`
    pub fn poll(&mut self, now: u64, interval: u64) -> Option<SetupEntry> {
        let due = self.next_tick?;
        if now < due {
            return None;
        }
        let entry = self.queue.pop_front()?;
        self.next_tick = Some(now + interval);
        Some(entry)
    }
}
