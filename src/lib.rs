//! Chess Toss - chess pieces thrown onto a perspective board
//!
//! Core modules:
//! - `sim`: Deterministic simulation (board geometry, piece lifecycle, king waves)
//! - `renderer`: Render boundary (animation keys, layers, per-tick snapshots)
//! - `audio`: Fire-and-forget sound events
//! - `stats`: Live piece counts per color and type
//! - `tuning`: Data-driven simulation constants

pub mod audio;
pub mod renderer;
pub mod sim;
pub mod stats;
pub mod tuning;

pub use audio::{AudioSink, SoundEffect};
pub use stats::PieceCounts;
pub use tuning::{Tuning, TuningError};

use glam::Vec2;

/// Simulation configuration constants
pub mod consts {
    /// Logic ticks per second
    pub const TICK_RATE: f64 = 60.0;
    /// Accumulated wall-clock time is capped here (ms) after a stall
    pub const ACCUMULATOR_CAP_MS: f64 = 100.0;
    /// Entities advance once every N logic ticks
    pub const ENTITY_UPDATE_DIVISOR: u64 = 2;
    /// Stats refresh cadence when nothing changed (ticks)
    pub const STATS_REFRESH_TICKS: u64 = 60;

    /// Board texture is square, board space runs 0..BOARD_TEXTURE_SIZE
    pub const BOARD_TEXTURE_SIZE: f32 = 2048.0;
    /// Scene is scaled up slightly to hide the edges of the board photo
    pub const CAMERA_OVERSCAN: f32 = 1.01;

    /// Random offset applied to every spawn (px, each axis)
    pub const SPAWN_JITTER: f32 = 10.0;
    /// Hold time before continuous spawning kicks in (ms)
    pub const CONTINUOUS_SPAWN_DELAY_MS: f64 = 200.0;
    /// Minimum ticks between continuous spawns
    pub const CONTINUOUS_SPAWN_INTERVAL: u64 = 4;

    /// Ticks of wave delay per 100px of distance from the king
    pub const WAVE_DELAY_PER_UNIT: u32 = 1;
    /// Distance covered by one wave delay unit
    pub const WAVE_UNIT_DISTANCE: f32 = 100.0;
    /// Chance a wave promotion lands on a pawn
    pub const PROMOTION_PAWN_CHANCE: f32 = 0.5;

    /// Ticks between setup spawns
    pub const INITIAL_SPAWN_INTERVAL: u64 = 2;
    /// Ticks before the setup feed starts once armed
    pub const INITIAL_SPAWN_DELAY: u64 = 0;

    /// Perspective: scale gained per px of board y
    pub const SCALE_FACTOR: f32 = 0.0004;
    /// Perspective: board y where scale is exactly 1
    pub const PERSPECTIVE_REFERENCE_Y: f32 = 1003.0;

    /// Frame on which a thrown piece touches the table
    pub const LANDING_FRAME: u32 = 16;
    /// Latest frame a throw may start on (widest viewport)
    pub const MAX_THROW_START_FRAME: u32 = 6;
    /// Aspect ratio at which the throw starts at MAX_THROW_START_FRAME
    pub const WIDE_ASPECT: f32 = 1.777;

    /// Default frame counts when no catalog data is supplied
    pub const DEFAULT_PIECE_FRAMES: u32 = 48;
    pub const DEFAULT_CAPTURE_FRAMES: u32 = 24;
}

/// Rotate a vector by `angle` radians
#[inline]
pub fn rotate(v: Vec2, angle: f32) -> Vec2 {
    Vec2::from_angle(angle).rotate(v)
}

/// 2D cross product of (b - a) and (c - a)
#[inline]
pub fn cross(a: Vec2, b: Vec2, c: Vec2) -> f32 {
    (b - a).perp_dot(c - a)
}
