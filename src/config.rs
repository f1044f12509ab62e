//! Game configuration
//!
//! Tuning constants, revision policy flags and the level/riddle tables, bundled
//! into one value owned by the session for its whole lifetime. Loadable from
//! JSON; every field falls back to its default when absent.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::tuning::{Challenge, LevelDef, default_challenges, default_levels};

/// How a level intro plays out before simulation starts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "style", rename_all = "snake_case")]
pub enum IntroStyle {
    /// Craft flies in from the left edge; intro ends when it reaches mid-screen
    FlyIn { speed: f32 },
    /// Level name shown for a fixed number of ticks, craft waits mid-screen
    Timed { ticks: u32 },
}

impl Default for IntroStyle {
    fn default() -> Self {
        IntroStyle::FlyIn {
            speed: INTRO_FLY_SPEED,
        }
    }
}

/// Errors raised while loading or validating a config
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Arena ===
    pub arena_width: f32,
    pub arena_height: f32,
    /// Ticks per second the host loop is paced at
    pub tick_rate: u32,

    // === Rules ===
    /// Crashes that end the run
    pub crash_limit: u32,
    pub points_per_pickup: u32,
    /// Wrong answers before the hint is revealed automatically
    pub hint_threshold: u32,
    /// One stochastic hazard spawn per N Playing ticks on average (0 disables)
    pub spawn_chance: u32,

    // === Entities ===
    pub player_radius: f32,
    pub player_speed: f32,
    pub pickup_size: f32,
    pub pickup_margin: f32,
    pub pickup_min_player_distance: f32,

    // === Revision policies ===
    pub intro: IntroStyle,
    /// A wrong riddle answer also counts as a crash
    pub wrong_answer_costs_crash: bool,
    /// Retry from GameOver replays the level intro instead of resuming play
    pub retry_replays_intro: bool,
    /// Offer a Hint button as soon as the challenge gate opens
    pub hint_button: bool,
    /// Play the scoreboard fly-by before the win screen
    pub finale_flyby: bool,

    // === Content ===
    pub levels: Vec<LevelDef>,
    pub challenges: Vec<Challenge>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
            tick_rate: TICK_RATE,

            crash_limit: CRASH_LIMIT,
            points_per_pickup: POINTS_PER_PICKUP,
            hint_threshold: HINT_THRESHOLD,
            spawn_chance: SPAWN_CHANCE,

            player_radius: PLAYER_RADIUS,
            player_speed: PLAYER_SPEED,
            pickup_size: PICKUP_SIZE,
            pickup_margin: PICKUP_MARGIN,
            pickup_min_player_distance: PICKUP_MIN_PLAYER_DISTANCE,

            intro: IntroStyle::default(),
            wrong_answer_costs_crash: true,
            retry_replays_intro: true,
            hint_button: true,
            finale_flyby: true,

            levels: default_levels(),
            challenges: default_challenges(),
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load a config file, falling back to defaults on any failure
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("{e} ({}); using default config", path.display());
                Self::default()
            }
        }
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check the invariants the simulation relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::Invalid(msg.to_string()));

        if self.levels.is_empty() {
            return invalid("level table is empty");
        }
        if self.challenges.is_empty() {
            return invalid("challenge pool is empty");
        }
        if self.challenges.iter().any(|c| c.answer.trim().is_empty()) {
            return invalid("challenge with an empty answer");
        }
        if self.crash_limit == 0 {
            return invalid("crash_limit must be at least 1");
        }
        if self.points_per_pickup == 0 {
            return invalid("points_per_pickup must be at least 1");
        }
        if self.tick_rate == 0 {
            return invalid("tick_rate must be at least 1");
        }
        if self.levels.iter().any(|l| l.field_pickups == 0) {
            return invalid("every level needs at least one pickup on the field");
        }
        let dims = [self.arena_width, self.arena_height];
        if dims.iter().any(|d| !d.is_finite() || *d <= 0.0) {
            return invalid("arena dimensions must be positive");
        }
        let positive = |v: f32| v.is_finite() && v > 0.0;
        if !positive(self.player_speed) || !positive(self.player_radius) {
            return invalid("player speed and radius must be positive");
        }
        if !positive(self.pickup_size) {
            return invalid("pickup_size must be positive");
        }
        if !(self.pickup_margin >= 0.0 && self.pickup_min_player_distance >= 0.0) {
            return invalid("pickup margin and distance must not be negative");
        }
        let shortest = self.arena_width.min(self.arena_height);
        if 2.0 * self.player_radius > shortest {
            return invalid("craft does not fit in the arena");
        }
        match self.intro {
            IntroStyle::FlyIn { speed } if speed <= 0.0 => {
                return invalid("intro fly-in speed must be positive");
            }
            _ => {}
        }

        // Pickups are sampled inside the margin and must be able to keep their
        // distance from the player wherever it stands.
        let span_x = self.arena_width - 2.0 * self.pickup_margin;
        let span_y = self.arena_height - 2.0 * self.pickup_margin;
        if span_x <= 2.0 * self.pickup_min_player_distance
            || span_y <= 2.0 * self.pickup_min_player_distance
        {
            return invalid("arena too small for pickup placement");
        }
        if ROCK_SIZE_MAX.max(VORTEX_SIZE_MAX) as f32 >= shortest {
            return invalid("arena smaller than the largest hazard");
        }

        Ok(())
    }

    /// Level definition for an index, if it exists
    pub fn level(&self, index: usize) -> Option<&LevelDef> {
        self.levels.get(index)
    }

    /// Index of the last level
    pub fn last_level(&self) -> usize {
        self.levels.len().saturating_sub(1)
    }
}
