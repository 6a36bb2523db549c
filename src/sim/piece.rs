//! A single physical piece and its lifecycle
//!
//! `hidden -> thrown -> onTable <-> promoting -> captured -> hidden`
//!
//! Methods here only change the piece itself and report what happened.
//! Side effects that reach other pieces (collisions, king waves, sounds)
//! are handled by `Simulation`, which owns every piece.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{Hitbox, hitbox_size};
use crate::consts::LANDING_FRAME;

/// Piece type, in promotion order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    pub const ALL: [Self; 6] = [
        Self::Pawn,
        Self::Knight,
        Self::Bishop,
        Self::Rook,
        Self::Queen,
        Self::King,
    ];

    /// Wave promotion picks among these when it does not roll a pawn
    pub const NON_PAWN: [Self; 5] = [Self::Knight, Self::Bishop, Self::Rook, Self::Queen, Self::King];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Next type in promotion order (None at king)
    pub fn next(self) -> Option<Self> {
        Self::ALL.get(self.index() + 1).copied()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pawn => "pawn",
            Self::Knight => "knight",
            Self::Bishop => "bishop",
            Self::Rook => "rook",
            Self::Queen => "queen",
            Self::King => "king",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceColor {
    White,
    Black,
}

impl PieceColor {
    pub const ALL: [Self; 2] = [Self::White, Self::Black];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn opposite(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::White => "white",
            Self::Black => "black",
        }
    }
}

/// Lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PieceState {
    /// Not on the board; eligible for reuse
    #[default]
    Hidden,
    /// In the air, playing the throw arc
    Thrown,
    /// Resting on the board
    OnTable,
    /// Resting on the board, playing the promotion animation
    Promoting,
    /// Playing the capture animation, then hidden
    Captured,
}

/// Action delivered by a king wave
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaveAction {
    Capture,
    Promote,
}

/// How a promotion picks the new type
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Promotion {
    /// One step along the type order; no-op at king
    Step,
    /// Pawn with the given chance, otherwise any non-pawn type
    Random { pawn_chance: f32 },
    /// Jump straight to a type (board setup)
    Target(PieceKind),
}

/// Result of an accepted promotion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Promoted {
    pub from: PieceKind,
    pub to: PieceKind,
}

/// What the wave countdown did this update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaveTick {
    /// Nothing pending
    Idle,
    /// Still counting down; the piece holds its animation
    Holding,
    /// Countdown reached zero with an action pending
    Fire(WaveAction),
}

/// What the animation step did this update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Continue,
    /// Thrown piece reached the landing frame
    Landed,
    /// Promotion animation finished, back on the table
    Settled,
    /// Capture animation finished, piece is now hidden
    Released,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Piece {
    /// Stable for the life of the object, including trips through the pool
    pub id: u32,
    pub kind: PieceKind,
    pub color: PieceColor,
    pub state: PieceState,
    /// Board space, always clamped to the board quad
    pub position: Vec2,
    /// Perspective scale fixed at spawn
    pub scale: f32,
    /// Frames played in the current state
    pub animation_tick: u32,
    /// Ticks until `pending_action` fires (0 = nothing pending)
    pub wave_delay: u32,
    pub pending_action: Option<WaveAction>,
    /// Type the piece resolves to on landing (board setup only)
    pub target_kind: PieceKind,
    /// Spawned by the board setup feed; lands silently
    pub from_setup: bool,
}

impl Piece {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            kind: PieceKind::Pawn,
            color: PieceColor::White,
            state: PieceState::Hidden,
            position: Vec2::ZERO,
            scale: 1.0,
            animation_tick: 0,
            wave_delay: 0,
            pending_action: None,
            target_kind: PieceKind::Pawn,
            from_setup: false,
        }
    }

    /// Throw a (hidden) piece. Every throw starts as a pawn; `target_kind`
    /// takes over on landing.
    pub fn throw(
        &mut self,
        color: PieceColor,
        position: Vec2,
        scale: f32,
        target_kind: PieceKind,
        start_frame: u32,
    ) {
        self.kind = PieceKind::Pawn;
        self.color = color;
        self.target_kind = target_kind;
        self.position = position;
        self.scale = scale;
        self.state = PieceState::Thrown;
        self.animation_tick = start_frame;
        self.wave_delay = 0;
        self.pending_action = None;
        self.from_setup = false;
    }

    /// On the table or promoting
    pub fn is_on_board(&self) -> bool {
        matches!(self.state, PieceState::OnTable | PieceState::Promoting)
    }

    /// Counted by the stats display
    pub fn is_alive(&self) -> bool {
        !matches!(self.state, PieceState::Captured | PieceState::Hidden)
    }

    pub fn hitbox(&self) -> Hitbox {
        Hitbox::centered(self.position, hitbox_size(self.kind), self.scale)
    }

    /// Thrown piece touches down
    pub fn land(&mut self) {
        if self.state == PieceState::Thrown {
            self.state = PieceState::OnTable;
        }
    }

    /// Start the capture animation. Cancels any pending wave action.
    /// Returns false if the piece is not on the board.
    pub fn begin_capture(&mut self) -> bool {
        if !self.is_on_board() {
            log::debug!("piece {} cannot be captured while {:?}", self.id, self.state);
            return false;
        }
        self.state = PieceState::Captured;
        self.animation_tick = 0;
        self.wave_delay = 0;
        self.pending_action = None;
        true
    }

    /// Change type and start the promotion animation.
    /// Returns None if the piece is not on the board.
    pub fn promote<R: Rng>(&mut self, promotion: Promotion, rng: &mut R) -> Option<Promoted> {
        if !self.is_on_board() {
            log::debug!("piece {} cannot be promoted while {:?}", self.id, self.state);
            return None;
        }

        let from = self.kind;
        let to = match promotion {
            Promotion::Step => from.next().unwrap_or(from),
            Promotion::Random { pawn_chance } => {
                if rng.random::<f32>() < pawn_chance {
                    PieceKind::Pawn
                } else {
                    PieceKind::NON_PAWN[rng.random_range(0..PieceKind::NON_PAWN.len())]
                }
            }
            Promotion::Target(kind) => kind,
        };

        self.kind = to;
        self.state = PieceState::Promoting;
        // The pawn animation opens with the throw arc; a fresh pawn skips it
        self.animation_tick = if to == PieceKind::Pawn { LANDING_FRAME } else { 0 };
        Some(Promoted { from, to })
    }

    /// Count down a pending wave action
    pub fn tick_wave(&mut self) -> WaveTick {
        if self.wave_delay == 0 {
            return WaveTick::Idle;
        }
        self.wave_delay -= 1;
        if self.wave_delay == 0 {
            if let Some(action) = self.pending_action.take() {
                return WaveTick::Fire(action);
            }
        }
        WaveTick::Holding
    }

    /// Advance the animation by one frame. `frames` is the length of the
    /// animation currently playing. On `Landed` the frame is not counted
    /// yet: the caller resolves the landing, then calls `step_frame`.
    pub fn advance(&mut self, frames: u32) -> Advance {
        let mut outcome = Advance::Continue;
        match self.state {
            PieceState::Hidden => return Advance::Continue,
            PieceState::Thrown if self.animation_tick == LANDING_FRAME => {
                return Advance::Landed;
            }
            PieceState::Captured if self.animation_tick >= frames => {
                self.hide();
                return Advance::Released;
            }
            PieceState::Promoting if self.animation_tick >= frames => {
                self.state = PieceState::OnTable;
                outcome = Advance::Settled;
            }
            _ => {}
        }
        self.animation_tick += 1;
        outcome
    }

    pub fn step_frame(&mut self) {
        self.animation_tick += 1;
    }

    /// Leave the board
    pub fn hide(&mut self) {
        self.state = PieceState::Hidden;
        self.wave_delay = 0;
        self.pending_action = None;
    }
}
