//! Cosmic Collector headless runner
//!
//! Plays a session on autopilot and reports the per-level ledger.
//!
//! Usage: `cosmic-collector [SEED] [CONFIG.json] [--realtime]`

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::time::{Duration, Instant};

    use cosmic_collector::GameConfig;
    use cosmic_collector::audio::{AudioManager, LogAudio};
    use cosmic_collector::consts::SIM_DT;
    use cosmic_collector::renderer::{build_frame, tessellate};
    use cosmic_collector::sim::{GamePhase, GameState, TickInput, tick};
    use glam::Vec2;

    /// Simulated minutes before the runner gives up
    const TICK_BUDGET_MINUTES: u64 = 30;
    /// Max ticks per paced frame (prevents spiral of death)
    const MAX_SUBSTEPS: u32 = 4;
    /// Ticks between frame tessellation reports
    const FRAME_REPORT_INTERVAL: u64 = 600;

    struct Options {
        seed: u64,
        config: GameConfig,
        realtime: bool,
    }

    fn parse_args() -> Options {
        let mut seed = None;
        let mut config_path = None;
        let mut realtime = false;
        for arg in std::env::args().skip(1) {
            if arg == "--realtime" {
                realtime = true;
            } else if seed.is_none()
                && let Ok(value) = arg.parse::<u64>()
            {
                seed = Some(value);
            } else {
                config_path = Some(arg);
            }
        }

        let seed = seed.unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0)
        });
        let config = match config_path {
            Some(path) => GameConfig::load_or_default(path),
            None => GameConfig::default(),
        };
        Options {
            seed,
            config,
            realtime,
        }
    }

    /// Fixed-step pacing against wall-clock time
    struct FramePacer {
        accumulator: f32,
        last: Instant,
    }

    impl FramePacer {
        fn new() -> Self {
            Self {
                accumulator: 0.0,
                last: Instant::now(),
            }
        }

        /// Ticks owed since the previous call
        fn due_ticks(&mut self) -> u32 {
            let now = Instant::now();
            let dt = now.duration_since(self.last).as_secs_f32().min(0.1);
            self.last = now;
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                self.accumulator -= SIM_DT;
                substeps += 1;
            }
            substeps
        }
    }

    /// Fires once per interval, even when a frame runs several ticks past it
    struct ReportClock {
        next: u64,
    }

    impl ReportClock {
        fn new() -> Self {
            Self {
                next: FRAME_REPORT_INTERVAL,
            }
        }

        fn due(&mut self, ticks_run: u64) -> bool {
            if ticks_run < self.next {
                return false;
            }
            self.next = ticks_run + FRAME_REPORT_INTERVAL;
            true
        }
    }

    pub fn run() {
        env_logger::init();
        let options = parse_args();
        log::info!("Cosmic Collector starting with seed {}", options.seed);

        let tick_rate = u64::from(options.config.tick_rate.max(1));
        let arena = Vec2::new(options.config.arena_width, options.config.arena_height);
        let mut state = GameState::new(options.config, options.seed);
        let mut audio = AudioManager::new(LogAudio::default());
        audio.start_music();

        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        let budget = TICK_BUDGET_MINUTES * 60 * tick_rate;
        let mut pacer = options.realtime.then(FramePacer::new);
        let mut ticks_run: u64 = 0;
        let mut reports = ReportClock::new();

        while ticks_run < budget {
            let due = match pacer.as_mut() {
                Some(pacer) => {
                    std::thread::sleep(Duration::from_secs_f32(SIM_DT / 2.0));
                    pacer.due_ticks()
                }
                None => 1,
            };
            if due == 0 {
                continue;
            }
            for _ in 0..due {
                tick(&mut state, &input);
            }
            ticks_run += u64::from(due);
            audio.dispatch(&state.drain_events());

            if reports.due(ticks_run) {
                let frame = build_frame(&state);
                let vertices = tessellate(&frame, arena);
                log::debug!(
                    "tick {}: {:?}, {} draw commands, {} vertices",
                    state.time_ticks,
                    state.phase,
                    frame.len(),
                    vertices.len()
                );
            }

            if state.phase == GamePhase::Complete && state.finale.showing_win {
                break;
            }
        }

        report(&state, audio.sink());
    }

    fn report(state: &GameState, audio: &LogAudio) {
        let seconds = state.time_ticks / u64::from(state.config.tick_rate.max(1));
        if state.phase == GamePhase::Complete {
            println!("Run complete in {seconds}s (seed {})", state.seed);
        } else {
            println!(
                "Stopped at level {} after {seconds}s (seed {})",
                state.level_index + 1,
                state.seed
            );
        }
        for (level, score) in state.config.levels.iter().zip(&state.ledger) {
            println!("  {:<12} {score}", level.name);
        }
        println!("  {:<12} {}", "Total", state.ledger_total());
        println!(
            "  {} pickups collected, {} crashes",
            audio.collects, audio.crashes
        );
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    native::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser hosts drive the library directly
}
