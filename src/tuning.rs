//! Data-driven simulation constants
//!
//! Defaults match `crate::consts`; a JSON file may override any subset.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::geometry::{BoardQuad, ViewTransform};

#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid tuning JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid tuning value: {0}")]
    Invalid(String),
}

/// Every knob of the simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Scheduler ===
    /// Logic ticks per second
    pub tick_rate: f64,
    /// Accumulator cap in ms (excess time is dropped)
    pub accumulator_cap_ms: f64,
    /// Entities update once every N ticks
    pub entity_update_divisor: u64,
    /// Periodic stats refresh (ticks)
    pub stats_refresh_ticks: u64,

    // === Spawning ===
    pub spawn_jitter: f32,
    pub continuous_spawn_delay_ms: f64,
    pub continuous_spawn_interval: u64,
    pub initial_spawn_interval: u64,
    pub initial_spawn_delay: u64,

    // === King wave ===
    pub wave_delay_per_unit: u32,
    pub promotion_pawn_chance: f32,

    // === Board ===
    pub board: BoardQuad,
    pub board_texture_size: f32,
    pub camera_overscan: f32,
    pub scale_factor: f32,
    pub perspective_reference_y: f32,

    // === Animation ===
    pub piece_frames: u32,
    pub capture_frames: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            tick_rate: TICK_RATE,
            accumulator_cap_ms: ACCUMULATOR_CAP_MS,
            entity_update_divisor: ENTITY_UPDATE_DIVISOR,
            stats_refresh_ticks: STATS_REFRESH_TICKS,

            spawn_jitter: SPAWN_JITTER,
            continuous_spawn_delay_ms: CONTINUOUS_SPAWN_DELAY_MS,
            continuous_spawn_interval: CONTINUOUS_SPAWN_INTERVAL,
            initial_spawn_interval: INITIAL_SPAWN_INTERVAL,
            initial_spawn_delay: INITIAL_SPAWN_DELAY,

            wave_delay_per_unit: WAVE_DELAY_PER_UNIT,
            promotion_pawn_chance: PROMOTION_PAWN_CHANCE,

            board: BoardQuad::default(),
            board_texture_size: BOARD_TEXTURE_SIZE,
            camera_overscan: CAMERA_OVERSCAN,
            scale_factor: SCALE_FACTOR,
            perspective_reference_y: PERSPECTIVE_REFERENCE_Y,

            piece_frames: DEFAULT_PIECE_FRAMES,
            capture_frames: DEFAULT_CAPTURE_FRAMES,
        }
    }
}

impl Tuning {
    /// Duration of one logic tick in ms
    pub fn tick_ms(&self) -> f64 {
        1000.0 / self.tick_rate
    }

    /// Cover-fit view of the board texture for a viewport
    pub fn view(&self, width: f32, height: f32) -> ViewTransform {
        ViewTransform::cover(width, height, self.board_texture_size, self.camera_overscan)
    }

    /// Parse from JSON (missing fields take defaults)
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load from a JSON file on disk
    pub fn load(path: &Path) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        if !(self.tick_rate > 0.0) {
            return Err(TuningError::Invalid(format!(
                "tick_rate must be positive, got {}",
                self.tick_rate
            )));
        }
        if self.entity_update_divisor == 0 {
            return Err(TuningError::Invalid("entity_update_divisor must be at least 1".into()));
        }
        if !(0.0..=1.0).contains(&self.promotion_pawn_chance) {
            return Err(TuningError::Invalid(format!(
                "promotion_pawn_chance must be within [0, 1], got {}",
                self.promotion_pawn_chance
            )));
        }
        if self.accumulator_cap_ms < self.tick_ms() {
            return Err(TuningError::Invalid(format!(
                "accumulator_cap_ms ({}) is shorter than one tick ({:.3} ms)",
                self.accumulator_cap_ms,
                self.tick_ms()
            )));
        }
        if self.spawn_jitter < 0.0 {
            return Err(TuningError::Invalid("spawn_jitter must not be negative".into()));
        }
        Ok(())
    }
}
