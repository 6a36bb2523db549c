//! Chess Toss headless driver
//!
//! Runs the simulation at a fixed frame rate with no window, throwing the
//! opening position plus a number of random player throws, then prints the
//! final piece counts as JSON.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use anyhow::{Context, Result};
    use clap::Parser;
    use glam::Vec2;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use chess_toss::audio::{AudioSink, LogAudio};
    use chess_toss::sim::{BoardQuad, Simulation, TickInput, TickScheduler, clamp_to_quad};
    use chess_toss::tuning::Tuning;

    #[derive(Debug, Parser)]
    #[command(name = "chess-toss", version, about = "Run the chess toss simulation headless")]
    struct Args {
        /// RNG seed (defaults to the current time)
        #[arg(long)]
        seed: Option<u64>,

        /// Simulated seconds to run
        #[arg(long, default_value_t = 10.0)]
        seconds: f64,

        /// Frames per second fed to the scheduler
        #[arg(long, default_value_t = 60.0)]
        fps: f64,

        /// Tuning JSON file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Random player throws spread over the run
        #[arg(long, default_value_t = 0)]
        throws: u32,

        /// Viewport size used to pick the throw start frame
        #[arg(long, default_value_t = 1920.0)]
        width: f32,
        #[arg(long, default_value_t = 1080.0)]
        height: f32,
    }

    /// Uniform point over the board's bounding box, pulled onto the board
    fn random_board_point(rng: &mut Pcg32, board: &BoardQuad) -> Vec2 {
        let corners = board.corners();
        let min = corners.iter().fold(Vec2::splat(f32::MAX), |m, &c| m.min(c));
        let max = corners.iter().fold(Vec2::splat(f32::MIN), |m, &c| m.max(c));
        let p = min + (max - min) * Vec2::new(rng.random::<f32>(), rng.random::<f32>());
        clamp_to_quad(p, board)
    }

    pub fn run() -> Result<()> {
        let args = Args::parse();
        anyhow::ensure!(args.fps > 0.0, "--fps must be positive");
        anyhow::ensure!(args.seconds >= 0.0, "--seconds must not be negative");

        let tuning = match &args.config {
            Some(path) => {
                Tuning::load(path).with_context(|| format!("loading {}", path.display()))?
            }
            None => Tuning::default(),
        };
        let seed = args.seed.unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0)
        });
        log::info!("Chess Toss (headless) seed {}", seed);

        let mut sim = Simulation::with_tuning(tuning, seed);
        sim.set_viewport(args.width, args.height);
        sim.start_setup();

        let frame_ms = 1000.0 / args.fps;
        let frames = (args.seconds * args.fps).round() as u64;

        // Player throws use their own stream so the simulation RNG stays
        // identical with or without them
        let mut player = Pcg32::seed_from_u64(seed ^ 0x5eed);
        let mut throws: Vec<(u64, Vec2)> = (0..args.throws)
            .map(|_| {
                let frame = player.random_range(0..frames.max(1));
                (frame, random_board_point(&mut player, sim.board()))
            })
            .collect();
        throws.sort_by_key(|&(frame, _)| frame);
        let mut throws = throws.into_iter().peekable();

        let mut scheduler = TickScheduler::new();
        let mut audio = LogAudio::new();
        let mut stats_refreshes = 0u64;
        for frame in 0..frames {
            let mut input = TickInput::default();
            // Several throws due on one frame go out on consecutive frames
            if throws.peek().is_some_and(|&(due, _)| due <= frame) {
                input.press = throws.next().map(|(_, position)| position);
            }

            let report = scheduler.advance(&mut sim, &input, frame_ms);
            audio.play_all(sim.drain_events());
            if report.refresh_stats {
                stats_refreshes += 1;
                log::debug!("tick {}: {:?}", sim.time_ticks, sim.counts());
            }
        }

        log::info!(
            "Ran {} ticks: {} pieces active, {} pooled, {} king waves, {} sounds, {} stats refreshes",
            sim.time_ticks,
            sim.pool.active_len(),
            sim.pool.free_len(),
            sim.waves_started(),
            audio.played(),
            stats_refreshes
        );
        println!("{}", serde_json::to_string_pretty(&sim.counts())?);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    headless::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No headless driver on the web
}
