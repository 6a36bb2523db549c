//! Simulation context
//!
//! One `Simulation` owns everything that changes during play: the piece
//! pool, the seeded RNG, the setup feed and the queued sound events. All
//! mutation goes through it, one logic tick at a time.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{find_overlaps, perspective_scale};
use super::geometry::{BoardQuad, ViewTransform, clamp_to_quad, screen_to_board_space};
use super::piece::{
    Advance, Piece, PieceColor, PieceKind, PieceState, Promoted, Promotion, WaveAction, WaveTick,
};
use super::pool::EntityPool;
use super::setup::{SetupEntry, SetupFeed};
use crate::audio::SoundEffect;
use crate::consts::{LANDING_FRAME, MAX_THROW_START_FRAME, WIDE_ASPECT};
use crate::renderer::{AnimationCatalog, AnimationKey, PieceSnapshot, snapshot};
use crate::stats::PieceCounts;
use crate::tuning::Tuning;

/// What set off a capture or promotion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cause {
    /// A thrown piece landed on this one
    Landing,
    /// A king wave reached this piece
    Wave,
    /// A setup throw resolving into its real type
    Setup,
}

/// A request to throw a piece
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnRequest {
    /// Board space aim point (jittered and clamped on spawn)
    pub position: Vec2,
    pub color: PieceColor,
    /// Type to resolve into on landing
    pub target: PieceKind,
    /// Part of the opening setup (lands silently)
    pub from_setup: bool,
}

impl SpawnRequest {
    /// Plain throw that lands as a pawn
    pub fn throw(position: Vec2, color: PieceColor) -> Self {
        Self {
            position,
            color,
            target: PieceKind::Pawn,
            from_setup: false,
        }
    }
}

impl From<SetupEntry> for SpawnRequest {
    fn from(entry: SetupEntry) -> Self {
        Self {
            position: entry.position,
            color: entry.color,
            target: entry.kind,
            from_setup: true,
        }
    }
}

/// Frame a throw starts on for a viewport aspect ratio (width / height).
/// Wider screens skip more of the arc.
pub fn throw_start_frame(aspect: f32) -> u32 {
    let t = ((aspect - 1.0) / (WIDE_ASPECT - 1.0)).clamp(0.0, 1.0);
    ((t * MAX_THROW_START_FRAME as f32).round() as u32).min(LANDING_FRAME)
}

#[derive(Debug, Clone)]
pub struct Simulation {
    pub tuning: Tuning,
    pub catalog: AnimationCatalog,
    pub pool: EntityPool,
    /// Run seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    /// Logic ticks elapsed
    pub time_ticks: u64,
    /// Color of the next player throw
    next_color: PieceColor,
    /// Tick of the last player throw
    last_spawn_tick: u64,
    setup: SetupFeed,
    view: ViewTransform,
    throw_start_frame: u32,
    /// Sounds queued since the last drain
    events: Vec<SoundEffect>,
    pub(crate) waves_started: u32,
}

impl Simulation {
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(Tuning::default(), seed)
    }

    pub fn with_tuning(tuning: Tuning, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let setup = SetupFeed::shuffled(&tuning.board, &mut rng);
        let catalog = AnimationCatalog::uniform(tuning.piece_frames, tuning.capture_frames);
        let view = tuning.view(1920.0, 1080.0);
        Self {
            tuning,
            catalog,
            pool: EntityPool::new(),
            seed,
            rng,
            time_ticks: 0,
            next_color: PieceColor::White,
            last_spawn_tick: 0,
            setup,
            view,
            throw_start_frame: throw_start_frame(16.0 / 9.0),
            events: Vec::new(),
            waves_started: 0,
        }
    }

    pub fn board(&self) -> &BoardQuad {
        &self.tuning.board
    }

    /// Viewport size changed
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.view = self.tuning.view(width, height);
            self.throw_start_frame = throw_start_frame(width / height);
        }
    }

    pub fn view(&self) -> &ViewTransform {
        &self.view
    }

    /// Pointer position on screen to a clamped board position
    pub fn screen_to_board(&self, screen: Vec2) -> Vec2 {
        screen_to_board_space(screen, &self.view, &self.tuning.board)
    }

    pub fn next_color(&self) -> PieceColor {
        self.next_color
    }

    pub fn last_spawn_tick(&self) -> u64 {
        self.last_spawn_tick
    }

    pub fn waves_started(&self) -> u32 {
        self.waves_started
    }

    /// Start throwing the opening position. Ignored once started.
    pub fn start_setup(&mut self) {
        if self.setup.is_armed() {
            log::debug!("board setup already started");
            return;
        }
        log::info!("Board setup starting ({} pieces)", self.setup.remaining());
        self.setup.arm(self.time_ticks, self.tuning.initial_spawn_delay);
    }

    /// Setup throws still queued
    pub fn setup_remaining(&self) -> usize {
        self.setup.remaining()
    }

    pub(crate) fn poll_setup(&mut self) -> Option<SetupEntry> {
        self.setup.poll(self.time_ticks, self.tuning.initial_spawn_interval)
    }

    /// Throw a piece. Returns its id.
    pub fn spawn(&mut self, request: SpawnRequest) -> u32 {
        let jitter = self.tuning.spawn_jitter;
        let offset = Vec2::new(
            (self.rng.random::<f32>() * 2.0 - 1.0) * jitter,
            (self.rng.random::<f32>() * 2.0 - 1.0) * jitter,
        );
        let position = clamp_to_quad(request.position + offset, &self.tuning.board);
        let scale = perspective_scale(
            position.y,
            self.tuning.perspective_reference_y,
            self.tuning.scale_factor,
        );

        let mut piece = self.pool.acquire();
        piece.throw(request.color, position, scale, request.target, self.throw_start_frame);
        piece.from_setup = request.from_setup;
        let id = piece.id;
        log::trace!("spawn {} {:?} at {:?}", id, request.color, position);
        self.pool.activate(piece);
        id
    }

    /// Player throw at a board position, alternating colors
    pub fn press(&mut self, position: Vec2) -> u32 {
        let color = self.next_color;
        self.next_color = color.opposite();
        self.last_spawn_tick = self.time_ticks;
        self.spawn(SpawnRequest::throw(position, color))
    }

    /// Capture the piece at `index`. Returns false if it is not on the board.
    pub fn capture(&mut self, index: usize, cause: Cause) -> bool {
        let Some(piece) = self.pool.get_mut(index) else {
            return false;
        };
        if !piece.begin_capture() {
            return false;
        }
        let is_king = piece.kind == PieceKind::King;

        if cause != Cause::Wave {
            if is_king {
                self.events.push(SoundEffect::GameEnd);
                self.start_king_wave(index, WaveAction::Capture);
            } else {
                self.events.push(SoundEffect::Capture);
            }
        }
        true
    }

    /// Promote the piece at `index`. Landings step one type up, waves pick
    /// at random and setup throws jump to their target type.
    pub fn promote(&mut self, index: usize, cause: Cause) -> Option<Promoted> {
        let pawn_chance = self.tuning.promotion_pawn_chance;
        let piece = self.pool.get_mut(index)?;
        let promotion = match cause {
            Cause::Landing => Promotion::Step,
            Cause::Wave => Promotion::Random { pawn_chance },
            Cause::Setup => Promotion::Target(piece.target_kind),
        };
        let promoted = piece.promote(promotion, &mut self.rng)?;

        match cause {
            Cause::Setup => {}
            Cause::Landing if promoted.to == PieceKind::King => {
                self.events.push(SoundEffect::Check);
                // Only a king crowned again sets off a wave
                if promoted.from == PieceKind::King {
                    self.start_king_wave(index, WaveAction::Promote);
                }
            }
            Cause::Landing | Cause::Wave => self.events.push(SoundEffect::Promote),
        }
        Some(promoted)
    }

    /// Resolve a landing: same-color pieces underneath are promoted and
    /// absorb the thrown piece, other-color pieces are captured.
    pub(crate) fn land(&mut self, index: usize) {
        let overlaps = find_overlaps(self.pool.active(), index);
        let Some(lander) = self.pool.get(index) else {
            return;
        };
        let (color, target, from_setup) = (lander.color, lander.target_kind, lander.from_setup);

        let mut consumed = false;
        for other in overlaps {
            if self.pool.active()[other].color == color {
                consumed = true;
                self.promote(other, Cause::Landing);
            } else {
                self.capture(other, Cause::Landing);
            }
        }

        self.pool.active_mut()[index].land();
        if target != PieceKind::Pawn {
            self.promote(index, Cause::Setup);
        }

        if consumed {
            self.pool.active_mut()[index].hide();
        } else if !from_setup {
            self.events.push(match color {
                PieceColor::White => SoundEffect::MoveSelf,
                PieceColor::Black => SoundEffect::MoveOpponent,
            });
        }
    }

    /// Advance one piece: wave countdown first, then its animation
    pub(crate) fn update_piece(&mut self, index: usize) {
        let Some(piece) = self.pool.get_mut(index) else {
            return;
        };
        if piece.state == PieceState::Hidden {
            return;
        }

        match piece.tick_wave() {
            WaveTick::Holding => return,
            WaveTick::Fire(WaveAction::Capture) => {
                self.capture(index, Cause::Wave);
            }
            WaveTick::Fire(WaveAction::Promote) => {
                self.promote(index, Cause::Wave);
            }
            WaveTick::Idle => {}
        }

        let frames = self.catalog.frames(&AnimationKey::for_piece(&self.pool.active()[index]));
        if self.pool.active_mut()[index].advance(frames) == Advance::Landed {
            self.land(index);
            self.pool.active_mut()[index].step_frame();
        }
    }

    /// Advance every active piece once, last to first, releasing pieces
    /// that left the board. Returns true if any piece changed state or type.
    pub fn update_pieces(&mut self) -> bool {
        let mut changed = false;
        for i in (0..self.pool.active_len()).rev() {
            let Some(before) = self.pool.get(i).map(|p| (p.state, p.kind)) else {
                continue;
            };
            self.update_piece(i);

            let piece = &self.pool.active()[i];
            if piece.state == PieceState::Hidden {
                self.pool.release(i);
                changed = true;
            } else if before != (piece.state, piece.kind) {
                changed = true;
            }
        }
        changed
    }

    /// Pieces currently in play, in scan order
    pub fn pieces(&self) -> &[Piece] {
        self.pool.active()
    }

    /// Active piece by id
    pub fn piece(&self, id: u32) -> Option<&Piece> {
        self.pool.index_of(id).and_then(|i| self.pool.get(i))
    }

    pub fn counts(&self) -> PieceCounts {
        PieceCounts::from_pieces(self.pool.active())
    }

    /// Read-only render state for every visible piece
    pub fn snapshots(&self) -> Vec<PieceSnapshot> {
        self.pool
            .active()
            .iter()
            .filter_map(|p| snapshot(p, &self.catalog))
            .collect()
    }

    /// Sounds queued since the last call
    pub fn drain_events(&mut self) -> Vec<SoundEffect> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
impl Simulation {
    /// Put a piece straight onto the table (no throw). Returns its index.
    pub(crate) fn place(&mut self, color: PieceColor, kind: PieceKind, position: Vec2) -> usize {
        let scale = perspective_scale(
            position.y,
            self.tuning.perspective_reference_y,
            self.tuning.scale_factor,
        );
        let mut piece = self.pool.acquire();
        piece.throw(color, position, scale, PieceKind::Pawn, 0);
        piece.kind = kind;
        piece.land();
        self.pool.activate(piece)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::geometry::point_in_quad;

    fn quiet_sim() -> Simulation {
        let tuning = Tuning {
            spawn_jitter: 0.0,
            ..Tuning::default()
        };
        Simulation::with_tuning(tuning, 7)
    }

    /// Run piece updates until the piece with `id` is no longer thrown
    fn settle(sim: &mut Simulation, id: u32) {
        for _ in 0..64 {
            match sim.piece(id) {
                Some(p) if p.state == PieceState::Thrown => {
                    sim.update_pieces();
                }
                _ => return,
            }
        }
    }

    #[test]
    fn test_throw_start_frame() {
        assert_eq!(throw_start_frame(1.0), 0);
        assert_eq!(throw_start_frame(0.5), 0);
        assert_eq!(throw_start_frame(16.0 / 9.0), 6);
        assert_eq!(throw_start_frame(3.0), 6);
        assert_eq!(throw_start_frame(1.3885), 3);
    }

    #[test]
    fn test_viewport_updates_view_and_start_frame() {
        let mut sim = Simulation::new(1);
        sim.set_viewport(1000.0, 1000.0);
        assert_eq!(sim.view().position, Vec2::new(500.0, 500.0));
        let id = sim.press(sim.screen_to_board(Vec2::new(500.0, 500.0)));
        assert_eq!(sim.piece(id).unwrap().animation_tick, 0);

        // Screen centre is the texture centre, which is on the board
        let centre = sim.screen_to_board(Vec2::new(500.0, 500.0));
        assert!((centre - Vec2::splat(1024.0)).length() < 1e-3);
        // Ignored
        sim.set_viewport(0.0, 600.0);
        assert_eq!(sim.view().position, Vec2::new(500.0, 500.0));
    }

    #[test]
    fn test_spawn_clamps_and_scales() {
        let mut sim = Simulation::new(1);
        let id = sim.spawn(SpawnRequest::throw(Vec2::new(-300.0, 3000.0), PieceColor::Black));
        let piece = sim.piece(id).expect("active");
        assert_eq!(piece.state, PieceState::Thrown);
        assert_eq!(piece.kind, PieceKind::Pawn);
        assert!(point_in_quad(piece.position, sim.board()));
        let expected = 1.0 + (piece.position.y - 1003.0) * 0.0004;
        assert!((piece.scale - expected).abs() < 1e-6);
    }

    #[test]
    fn test_press_alternates_colors() {
        let mut sim = Simulation::new(2);
        let centre = sim.board().centroid();
        let a = sim.press(centre);
        let b = sim.press(centre);
        let c = sim.press(centre);
        assert_eq!(sim.piece(a).unwrap().color, PieceColor::White);
        assert_eq!(sim.piece(b).unwrap().color, PieceColor::Black);
        assert_eq!(sim.piece(c).unwrap().color, PieceColor::White);
    }

    #[test]
    fn test_opposite_color_landing_captures() {
        let mut sim = quiet_sim();
        let centre = sim.board().centroid();
        let victim = sim.place(PieceColor::Black, PieceKind::Rook, centre);
        let victim_id = sim.pieces()[victim].id;

        let id = sim.spawn(SpawnRequest::throw(centre, PieceColor::White));
        settle(&mut sim, id);

        assert_eq!(sim.piece(victim_id).unwrap().state, PieceState::Captured);
        assert_eq!(sim.piece(id).unwrap().state, PieceState::OnTable);
        let events = sim.drain_events();
        assert_eq!(events, vec![SoundEffect::Capture, SoundEffect::MoveSelf]);
        assert_eq!(sim.waves_started(), 0);
    }

    #[test]
    fn test_nearby_guard_falls_with_the_king() {
        let mut sim = quiet_sim();
        let centre = sim.board().centroid();
        sim.place(PieceColor::Black, PieceKind::King, centre);
        // Within 100px of the king, clear of the thrower's hitbox
        let guard = sim.place(PieceColor::Black, PieceKind::Rook, centre + Vec2::new(0.0, 80.0));
        let guard_id = sim.pieces()[guard].id;

        let id = sim.spawn(SpawnRequest::throw(centre, PieceColor::White));
        settle(&mut sim, id);

        let guard = sim.piece(guard_id).unwrap();
        assert_eq!(guard.state, PieceState::Captured);
        assert_eq!(guard.pending_action, None);
        assert_eq!(guard.wave_delay, 0);
        assert_eq!(sim.waves_started(), 1);
        assert_eq!(sim.drain_events(), vec![SoundEffect::GameEnd, SoundEffect::MoveSelf]);
    }

    #[test]
    fn test_start_setup_only_arms_once() {
        let tuning = Tuning {
            initial_spawn_delay: 10,
            ..Tuning::default()
        };
        let mut sim = Simulation::with_tuning(tuning, 7);
        sim.start_setup();
        sim.time_ticks = 50;
        // A second call must not push the schedule back
        sim.start_setup();
        assert!(sim.poll_setup().is_some());
        assert_eq!(sim.setup_remaining(), 31);
    }

    #[test]
    fn test_crowning_sounds_check_without_wave() {
        let mut sim = quiet_sim();
        let centre = sim.board().centroid();
        let queen = sim.place(PieceColor::White, PieceKind::Queen, centre);
        sim.place(PieceColor::White, PieceKind::Pawn, centre + Vec2::new(300.0, 0.0));

        sim.promote(queen, Cause::Landing);
        assert_eq!(sim.pieces()[queen].kind, PieceKind::King);
        assert_eq!(sim.drain_events(), vec![SoundEffect::Check]);
        assert_eq!(sim.waves_started(), 0);
        assert!(sim.pieces().iter().all(|p| p.pending_action.is_none()));
    }

    #[test]
    fn test_recrowned_king_starts_promote_wave() {
        let mut sim = quiet_sim();
        let centre = sim.board().centroid();
        let king = sim.place(PieceColor::White, PieceKind::King, centre);
        let near = sim.place(PieceColor::White, PieceKind::Rook, centre + Vec2::new(40.0, 0.0));
        let far = sim.place(PieceColor::White, PieceKind::Rook, centre + Vec2::new(0.0, 320.0));
        let other = sim.place(PieceColor::Black, PieceKind::Rook, centre + Vec2::new(60.0, 0.0));

        sim.promote(king, Cause::Landing);
        assert_eq!(sim.waves_started(), 1);
        assert_eq!(sim.pieces()[king].kind, PieceKind::King);

        // Within 100px: promoted at once
        assert_eq!(sim.pieces()[near].state, PieceState::Promoting);
        // 320px away: three ticks of delay
        assert_eq!(sim.pieces()[far].wave_delay, 3);
        assert_eq!(sim.pieces()[far].pending_action, Some(WaveAction::Promote));
        // Other color untouched
        assert_eq!(sim.pieces()[other].state, PieceState::OnTable);
        assert_eq!(sim.pieces()[other].pending_action, None);

        let events = sim.drain_events();
        assert_eq!(events[0], SoundEffect::Check);
        assert_eq!(&events[1..], &[SoundEffect::Promote]);
    }

    #[test]
    fn test_wave_promotion_does_not_cascade() {
        let mut sim = quiet_sim();
        let centre = sim.board().centroid();
        let king = sim.place(PieceColor::Black, PieceKind::King, centre);
        let other_king = sim.place(PieceColor::Black, PieceKind::King, centre + Vec2::new(20.0, 0.0));

        let tuning = Tuning {
            promotion_pawn_chance: 0.0,
            ..sim.tuning.clone()
        };
        sim.tuning = tuning;
        sim.promote(king, Cause::Landing);
        assert_eq!(sim.waves_started(), 1);
        assert_eq!(sim.pieces()[other_king].state, PieceState::Promoting);
        assert_ne!(sim.pieces()[other_king].kind, PieceKind::Pawn);
    }

    #[test]
    fn test_invalid_transitions_are_noops() {
        let mut sim = quiet_sim();
        let centre = sim.board().centroid();
        let id = sim.spawn(SpawnRequest::throw(centre, PieceColor::White));
        let index = sim.pool.index_of(id).unwrap();

        // Mid-flight
        assert!(sim.promote(index, Cause::Landing).is_none());
        assert!(!sim.capture(index, Cause::Landing));
        assert_eq!(sim.pieces()[index].state, PieceState::Thrown);

        // Out of range
        assert!(!sim.capture(99, Cause::Landing));
        assert!(sim.promote(99, Cause::Wave).is_none());
        assert!(sim.drain_events().is_empty());
    }

    #[test]
    fn test_setup_landing_is_silent() {
        let mut sim = quiet_sim();
        let centre = sim.board().centroid();
        let id = sim.spawn(SpawnRequest {
            position: centre,
            color: PieceColor::Black,
            target: PieceKind::Queen,
            from_setup: true,
        });
        settle(&mut sim, id);
        let piece = sim.piece(id).unwrap();
        assert_eq!(piece.kind, PieceKind::Queen);
        assert_eq!(piece.state, PieceState::Promoting);
        // The landing update counts as the first promotion frame
        assert_eq!(piece.animation_tick, 1);
        assert!(sim.drain_events().is_empty());
        assert_eq!(sim.waves_started(), 0);
    }

    #[test]
    fn test_snapshots_and_counts() {
        let mut sim = quiet_sim();
        let centre = sim.board().centroid();
        sim.place(PieceColor::White, PieceKind::Knight, centre);
        sim.spawn(SpawnRequest::throw(centre + Vec2::new(200.0, 0.0), PieceColor::Black));

        let snaps = sim.snapshots();
        assert_eq!(snaps.len(), 2);
        let counts = sim.counts();
        assert_eq!(counts.get(PieceColor::White, PieceKind::Knight), 1);
        assert_eq!(counts.get(PieceColor::Black, PieceKind::Pawn), 1);
    }
}
