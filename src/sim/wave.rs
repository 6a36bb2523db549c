//! King waves
//!
//! When a king falls to a landing piece, or a king is crowned again, every
//! other piece of that color on the board gets the same action. Each one
//! waits `floor(distance / 100) * delay_per_unit` ticks first, so the wave
//! ripples outward from the king. Who is hit is decided once, when the
//! wave starts.

use super::piece::{Piece, PieceState, WaveAction};
use super::state::{Cause, Simulation};
use crate::consts::WAVE_UNIT_DISTANCE;

/// One piece reached by a wave
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaveHit {
    /// Active-list index at the moment the wave starts
    pub index: usize,
    pub delay: u32,
}

/// Ticks before a piece `distance` px from the king is hit
/// Saturates rather than overflowing for huge tunings.
pub fn wave_delay(distance: f32, delay_per_unit: u32) -> u32 {
    ((distance / WAVE_UNIT_DISTANCE).floor() as u32).saturating_mul(delay_per_unit)
}

/// Same-color pieces resting on the board, with their delays.
/// Pieces in the air, captured or hidden are left out.
pub fn plan_wave(pieces: &[Piece], king: usize, delay_per_unit: u32) -> Vec<WaveHit> {
    let Some(origin) = pieces.get(king) else {
        return Vec::new();
    };

    pieces
        .iter()
        .enumerate()
        .filter(|&(i, p)| i != king && p.color == origin.color)
        .filter(|(_, p)| !matches!(p.state, PieceState::Hidden | PieceState::Thrown | PieceState::Captured))
        .map(|(index, p)| WaveHit {
            index,
            delay: wave_delay(p.position.distance(origin.position), delay_per_unit),
        })
        .collect()
}

impl Simulation {
    /// Start a wave from the king at `king`. Zero-delay hits apply now,
    /// the rest are left pending on each piece.
    pub(crate) fn start_king_wave(&mut self, king: usize, action: WaveAction) {
        let hits = plan_wave(self.pool.active(), king, self.tuning.wave_delay_per_unit);
        log::info!(
            "King wave ({:?}) from piece {} reaches {} pieces",
            action,
            self.pool.active()[king].id,
            hits.len()
        );
        self.waves_started += 1;

        for hit in hits {
            if hit.delay == 0 {
                match action {
                    WaveAction::Capture => {
                        self.capture(hit.index, Cause::Wave);
                    }
                    WaveAction::Promote => {
                        self.promote(hit.index, Cause::Wave);
                    }
                }
            } else if let Some(piece) = self.pool.get_mut(hit.index) {
                piece.wave_delay = hit.delay;
                piece.pending_action = Some(action);
            }
        }
    }
}
