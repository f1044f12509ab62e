//! Game state and core simulation types
//!
//! The session aggregate owns every entity, the RNG and the config. Nothing
//! outside the session mutates them; the frontend reads state and drains events.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::challenge::ChallengeBank;
use super::collision::{Rect, step_reflect};
use crate::GameConfig;
use crate::consts::*;
use crate::tuning::{Challenge, LevelDef};

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Level name / fly-in presentation, no simulation
    LevelIntro,
    /// Active gameplay
    Playing,
    /// Score threshold reached, waiting for the riddle answer
    ChallengeGate,
    /// Crash limit reached
    GameOver,
    /// Last riddle answered, run summary
    Complete,
}

/// Things that happened during a tick, for audio and UI feedback
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    LevelStarted { level: usize },
    PickupCollected { score: u32 },
    Crashed { crashes: u32 },
    ChallengeOpened,
    WrongAnswer { attempts: u32 },
    HintRevealed,
    LevelCleared { level: usize, score: u32 },
    GameOver,
    RunComplete { total: u32 },
    Restarted,
}

/// The player's craft
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Center of the craft
    pub pos: Vec2,
    pub radius: f32,
    /// Pixels per tick along each held axis
    pub speed: f32,
    /// Crashes accumulated since the last retry/restart
    pub crashes: u32,
}

impl Player {
    pub fn new(pos: Vec2, radius: f32, speed: f32) -> Self {
        Self {
            pos,
            radius,
            speed,
            crashes: 0,
        }
    }

    /// Collision square centered on the craft (side = 2 * radius)
    pub fn footprint(&self) -> Rect {
        Rect::centered(self.pos, self.radius)
    }

    /// Move by a per-axis direction (-1, 0 or 1 each) and clamp into the arena
    pub fn step(&mut self, dir: Vec2, width: f32, height: f32) {
        self.pos += dir * self.speed;
        self.pos.x = self.pos.x.clamp(self.radius, width - self.radius);
        self.pos.y = self.pos.y.clamp(self.radius, height - self.radius);
    }
}

/// Hazard variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HazardKind {
    /// Drifts and bounces off the arena edges
    Rock,
    /// Falls straight down, spins, wraps to the top
    Vortex,
}

/// A moving obstacle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hazard {
    pub id: u32,
    pub kind: HazardKind,
    pub size: f32,
    /// Top-left corner of the footprint
    pub pos: Vec2,
    /// Pixels per tick
    pub vel: Vec2,
    /// Visual spin in degrees (vortex only, no effect on collision)
    pub spin: f32,
    /// Set on first contact with the player; never cleared
    pub already_hit: bool,
}

impl Hazard {
    /// Randomized hazard of the given kind
    ///
    /// Rocks are placed inside the arena, resampled a bounded number of times
    /// to stay out of `keep_clear`. Vortices start above the top edge.
    pub fn spawn<R: Rng>(
        id: u32,
        kind: HazardKind,
        rng: &mut R,
        width: f32,
        height: f32,
        keep_clear: Option<Rect>,
    ) -> Self {
        match kind {
            HazardKind::Rock => {
                let size = rng.random_range(ROCK_SIZE_MIN..=ROCK_SIZE_MAX) as f32;
                let mut pos = Vec2::ZERO;
                for _ in 0..ROCK_PLACEMENT_ATTEMPTS {
                    pos = Vec2::new(
                        rng.random_range(0.0..=width - size),
                        rng.random_range(0.0..=height - size),
                    );
                    let rect = Rect::new(pos.x, pos.y, size, size);
                    if !keep_clear.is_some_and(|zone| zone.intersects(&rect)) {
                        break;
                    }
                }
                let vel = Vec2::new(
                    rng.random_range(-ROCK_MAX_DRIFT..=ROCK_MAX_DRIFT),
                    rng.random_range(-ROCK_MAX_DRIFT..=ROCK_MAX_DRIFT),
                );
                Self {
                    id,
                    kind,
                    size,
                    pos,
                    vel,
                    spin: 0.0,
                    already_hit: false,
                }
            }
            HazardKind::Vortex => {
                let size = rng.random_range(VORTEX_SIZE_MIN..=VORTEX_SIZE_MAX) as f32;
                let pos = Vec2::new(
                    rng.random_range(0.0..=width - size),
                    rng.random_range(-height..=-size),
                );
                let vel = Vec2::new(0.0, rng.random_range(VORTEX_MIN_FALL..=VORTEX_MAX_FALL));
                Self {
                    id,
                    kind,
                    size,
                    pos,
                    vel,
                    spin: rng.random_range(0.0..360.0),
                    already_hit: false,
                }
            }
        }
    }

    pub fn footprint(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(self.size / 2.0)
    }

    /// Advance one tick
    pub fn update<R: Rng>(&mut self, rng: &mut R, width: f32, height: f32) {
        match self.kind {
            HazardKind::Rock => {
                let x = step_reflect(self.pos.x, self.vel.x, 0.0, width - self.size);
                let y = step_reflect(self.pos.y, self.vel.y, 0.0, height - self.size);
                self.pos = Vec2::new(x.pos, y.pos);
                self.vel = Vec2::new(x.vel, y.vel);
            }
            HazardKind::Vortex => {
                self.pos.y += self.vel.y;
                if self.pos.y > height {
                    self.pos.y = -self.size;
                    self.pos.x = rng.random_range(0.0..=width - self.size);
                }
                self.spin = (self.spin + VORTEX_SPIN) % 360.0;
            }
        }
    }
}

/// Rock placement retries before accepting an overlap with the clear zone
const ROCK_PLACEMENT_ATTEMPTS: u32 = 32;

/// A collectible star
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    pub id: u32,
    /// Center of the star
    pub pos: Vec2,
    /// Outer radius of the star
    pub size: f32,
}

impl Pickup {
    /// Uniform position inside the arena margin, resampled until it is far
    /// enough from the player
    pub fn spawn<R: Rng>(id: u32, rng: &mut R, player: Vec2, config: &GameConfig) -> Self {
        let margin = config.pickup_margin;
        loop {
            let pos = Vec2::new(
                rng.random_range(margin..=config.arena_width - margin),
                rng.random_range(margin..=config.arena_height - margin),
            );
            if pos.distance(player) > config.pickup_min_player_distance {
                return Self {
                    id,
                    pos,
                    size: config.pickup_size,
                };
            }
        }
    }

    pub fn footprint(&self) -> Rect {
        Rect::centered(self.pos, self.size)
    }
}

/// Riddle state while the session is gated
#[derive(Debug, Clone)]
pub struct GateState {
    pub challenge: Challenge,
    /// Answer typed so far
    pub answer: String,
    pub wrong_attempts: u32,
    /// Hint button currently shown
    pub hint_offered: bool,
    /// Hint letter currently shown
    pub hint_revealed: bool,
}

impl GateState {
    pub fn new(challenge: Challenge, hint_offered: bool) -> Self {
        Self {
            challenge,
            answer: String::new(),
            wrong_attempts: 0,
            hint_offered,
            hint_revealed: false,
        }
    }

    pub fn reveal_hint(&mut self) {
        self.hint_revealed = true;
        self.hint_offered = false;
    }
}

/// Fading trail segment behind the scoreboard fly-by craft
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrailPoint {
    pub x: f32,
    pub alpha: u8,
}

/// End-of-run presentation: fly-by over the scoreboard, then the win screen
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Finale {
    pub craft_x: f32,
    pub trail: Vec<TrailPoint>,
    /// Ticks spent after the craft left the screen
    pub hold_ticks: u32,
    pub showing_win: bool,
}

impl Finale {
    pub fn new(flyby: bool) -> Self {
        Self {
            craft_x: FINALE_START_X,
            trail: Vec::new(),
            hold_ticks: 0,
            showing_win: !flyby,
        }
    }
}

/// Where the fly-by craft starts (off the left edge)
pub const FINALE_START_X: f32 = -150.0;

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Tuning, policies and content tables
    pub config: GameConfig,
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub(crate) bank: ChallengeBank,
    /// Progression cursor into `config.levels`
    pub level_index: usize,
    /// Score for the current level attempt
    pub score: u32,
    /// Final score of every cleared level, in order
    pub ledger: Vec<u32>,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Ticks spent in the current level intro
    pub intro_ticks: u32,
    pub player: Player,
    /// Live hazards (creation order)
    pub hazards: Vec<Hazard>,
    /// Live pickups (count fixed for the level)
    pub pickups: Vec<Pickup>,
    /// Present only in `ChallengeGate`
    pub gate: Option<GateState>,
    pub finale: Finale,
    /// Fixed background stars
    pub starfield: Vec<Vec2>,
    /// Last known pointer position (for hover highlights)
    pub pointer: Option<Vec2>,
    /// Events since the last drain
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a new session with the given config and seed
    ///
    /// The config is assumed valid (see [`GameConfig::validate`]).
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let player = Player::new(Vec2::ZERO, config.player_radius, config.player_speed);
        let bank = ChallengeBank::new(config.challenges.clone());
        let mut state = Self {
            finale: Finale::new(config.finale_flyby),
            config,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            bank,
            level_index: 0,
            score: 0,
            ledger: Vec::new(),
            phase: GamePhase::LevelIntro,
            time_ticks: 0,
            intro_ticks: 0,
            player,
            hazards: Vec::new(),
            pickups: Vec::new(),
            gate: None,
            starfield: Vec::new(),
            pointer: None,
            events: Vec::new(),
            next_id: 1,
        };
        state.starfield = state.sample_starfield();
        super::tick::start_level(&mut state);
        state
    }

    /// Reinitialize every session field to its construction-time default
    ///
    /// The RNG keeps running, so the new entity set is freshly sampled.
    pub fn reset(&mut self) {
        log::info!("Session restart");
        self.level_index = 0;
        self.score = 0;
        self.ledger.clear();
        self.time_ticks = 0;
        self.player = Player::new(
            Vec2::ZERO,
            self.config.player_radius,
            self.config.player_speed,
        );
        self.bank = ChallengeBank::new(self.config.challenges.clone());
        self.gate = None;
        self.finale = Finale::new(self.config.finale_flyby);
        self.starfield = self.sample_starfield();
        self.next_id = 1;
        self.events.push(GameEvent::Restarted);
        super::tick::start_level(self);
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Level being played, `None` once the run is complete
    pub fn current_level(&self) -> Option<&LevelDef> {
        self.config.level(self.level_index)
    }

    /// Score needed to open the challenge gate on the current level
    pub fn threshold(&self) -> u32 {
        self.current_level()
            .map(|l| l.threshold(self.config.points_per_pickup))
            .unwrap_or(u32::MAX)
    }

    /// Sum of all cleared levels
    pub fn ledger_total(&self) -> u32 {
        self.ledger.iter().sum()
    }

    /// Whether the active level is the last one in the catalog
    pub fn on_final_level(&self) -> bool {
        self.level_index >= self.config.last_level()
    }

    /// Take all events recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Riddles left in the current pass through the pool
    pub fn riddles_remaining(&self) -> usize {
        self.bank.remaining()
    }

    fn sample_starfield(&mut self) -> Vec<Vec2> {
        let (w, h) = (self.config.arena_width, self.config.arena_height);
        (0..STARFIELD_COUNT)
            .map(|_| {
                Vec2::new(
                    self.rng.random_range(0.0..w),
                    self.rng.random_range(0.0..h),
                )
            })
            .collect()
    }
}
