//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (active list, last to first)
//! - No rendering or platform dependencies

pub mod collision;
pub mod geometry;
pub mod piece;
pub mod pool;
pub mod setup;
pub mod state;
pub mod tick;
pub mod wave;

pub use collision::{Hitbox, find_overlaps, hitbox_size, perspective_scale};
pub use geometry::{
    BoardQuad, ViewTransform, clamp_to_quad, closest_point_on_segment, grid_to_board_position,
    point_in_quad, screen_to_board_space,
};
pub use piece::{Piece, PieceColor, PieceKind, PieceState, Promotion, WaveAction};
pub use pool::EntityPool;
pub use setup::{SetupEntry, SetupFeed, standard_setup};
pub use state::{Cause, Simulation, SpawnRequest, throw_start_frame};
pub use tick::{FrameReport, PointerHold, TickInput, TickScheduler, tick};
pub use wave::{WaveHit, plan_wave, wave_delay};
