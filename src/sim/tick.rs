//! Fixed timestep simulation tick
//!
//! The host calls `TickScheduler::advance` once per rendered frame with the
//! wall-clock delta. Time is accumulated and spent in fixed logic ticks, so
//! the simulation runs the same regardless of frame rate.

use glam::Vec2;

use super::state::{Simulation, SpawnRequest};

/// Pointer held down over the board
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerHold {
    /// Board space position under the pointer
    pub position: Vec2,
    /// Time since the press (ms)
    pub held_ms: f64,
}

/// Input for a frame (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// New press this frame (board space); throws immediately
    pub press: Option<Vec2>,
    /// Pointer still held; throws continuously once held long enough
    pub hold: Option<PointerHold>,
}

/// Advance the simulation by one logic tick.
/// Returns true if any piece appeared, left, or changed state or type.
pub fn tick(sim: &mut Simulation, input: &TickInput) -> bool {
    sim.time_ticks += 1;
    let mut changed = false;

    // Opening position, one throw per interval
    if let Some(entry) = sim.poll_setup() {
        sim.spawn(SpawnRequest::from(entry));
        changed = true;
    }

    // Continuous throwing while held
    if let Some(hold) = input.hold {
        let since_last = sim.time_ticks.saturating_sub(sim.last_spawn_tick());
        if hold.held_ms >= sim.tuning.continuous_spawn_delay_ms
            && since_last >= sim.tuning.continuous_spawn_interval
        {
            sim.press(hold.position);
            changed = true;
        }
    }

    // Pieces animate at a fraction of the logic rate
    if sim.time_ticks % sim.tuning.entity_update_divisor == 0 {
        changed |= sim.update_pieces();
    }

    changed
}

/// What happened during one `advance`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Logic ticks run
    pub ticks: u32,
    /// Stats display should be redrawn
    pub refresh_stats: bool,
}

/// Fixed-timestep accumulator
#[derive(Debug, Clone, Default)]
pub struct TickScheduler {
    accumulator_ms: f64,
}

impl TickScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unspent time (ms)
    pub fn accumulated_ms(&self) -> f64 {
        self.accumulator_ms
    }

    /// Feed one frame's wall-clock delta and run the ticks it pays for.
    /// After a stall the backlog is capped and the excess dropped.
    pub fn advance(&mut self, sim: &mut Simulation, input: &TickInput, delta_ms: f64) -> FrameReport {
        let mut report = FrameReport::default();

        if let Some(position) = input.press {
            sim.press(position);
            report.refresh_stats = true;
        }

        let tick_ms = sim.tuning.tick_ms();
        self.accumulator_ms = (self.accumulator_ms + delta_ms.max(0.0)).min(sim.tuning.accumulator_cap_ms);

        while self.accumulator_ms >= tick_ms {
            self.accumulator_ms -= tick_ms;
            report.ticks += 1;
            if tick(sim, input) {
                report.refresh_stats = true;
            }
            if sim.time_ticks % sim.tuning.stats_refresh_ticks.max(1) == 0 {
                report.refresh_stats = true;
            }
        }

        if report.ticks > 0 {
            log::trace!("advanced {} ticks to {}", report.ticks, sim.time_ticks);
        }
        report
    }
}
