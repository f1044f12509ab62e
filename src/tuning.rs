//! Data-driven game balance
//!
//! The level catalog and the riddle pool. Both are compiled in and copied into
//! [`GameConfig`](crate::GameConfig) by default; a config file may replace them.

use serde::{Deserialize, Serialize};

/// One entry in the ordered level sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelDef {
    /// Display name shown in the intro and HUD
    pub name: String,
    /// Backdrop fill color (RGB)
    pub backdrop: [u8; 3],
    /// Pickups that must be collected to open the challenge gate
    pub pickup_quota: u32,
    /// Pickups kept live on the field at all times
    pub field_pickups: u32,
    /// Rock hazards generated at level start
    pub rocks: u32,
    /// Vortex hazards generated at level start
    pub vortices: u32,
}

impl LevelDef {
    pub fn new(
        name: &str,
        backdrop: [u8; 3],
        pickup_quota: u32,
        field_pickups: u32,
        rocks: u32,
        vortices: u32,
    ) -> Self {
        Self {
            name: name.to_string(),
            backdrop,
            pickup_quota,
            field_pickups,
            rocks,
            vortices,
        }
    }

    /// Score needed to clear this level
    #[inline]
    pub fn threshold(&self, points_per_pickup: u32) -> u32 {
        self.pickup_quota * points_per_pickup
    }
}

/// A riddle gating the transition to the next level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    pub prompt: String,
    pub answer: String,
}

impl Challenge {
    pub fn new(prompt: &str, answer: &str) -> Self {
        Self {
            prompt: prompt.to_string(),
            answer: answer.to_string(),
        }
    }
}

/// The default three-level campaign
pub fn default_levels() -> Vec<LevelDef> {
    vec![
        LevelDef::new("Pink City", [255, 182, 193], 10, 5, 15, 2),
        LevelDef::new("Blue Space", [30, 144, 255], 12, 7, 18, 3),
        LevelDef::new("Ocean Block", [0, 105, 148], 15, 9, 22, 4),
    ]
}

const RIDDLES: &[(&str, &str)] = &[
    ("I speak without a mouth and hear without ears. What am I?", "echo"),
    ("I'm tall when I'm young, and short when I'm old. What am I?", "candle"),
    ("What has keys but can't open locks?", "piano"),
    ("The more of me you take, the more you leave behind. What am I?", "footsteps"),
    (
        "I have cities but no houses, forests but no trees, and water but no fish. What am I?",
        "map",
    ),
    ("What can run but never walks, has a mouth but never talks?", "river"),
    (
        "I am always hungry and will die if not fed, but whatever I touch will soon turn red. What am I?",
        "fire",
    ),
    ("I can fly without wings, cry without eyes. What am I?", "cloud"),
    ("The more you take away from me, the bigger I get. What am I?", "hole"),
    ("What has many teeth, but cannot bite?", "comb"),
    ("What goes up but never comes down?", "age"),
    ("What has a neck but no head?", "bottle"),
    ("What can travel around the world while staying in a corner?", "stamp"),
    ("What has hands but cannot clap?", "clock"),
    (
        "I'm light as a feather, yet the strongest man cannot hold me for long. What am I?",
        "breath",
    ),
    ("What begins with T, ends with T, and has T in it?", "teapot"),
    (
        "What comes once in a minute, twice in a moment, but never in a thousand years?",
        "m",
    ),
];

/// The default riddle pool
pub fn default_challenges() -> Vec<Challenge> {
    RIDDLES
        .iter()
        .map(|(prompt, answer)| Challenge::new(prompt, answer))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_shape() {
        let levels = default_levels();
        assert_eq!(levels.len(), 3);
        assert_eq!(levels[0].threshold(10), 100);
        assert_eq!(levels[2].threshold(10), 150);
        // Field pickups grow by two per level
        for (i, level) in levels.iter().enumerate() {
            assert_eq!(level.field_pickups, 5 + 2 * i as u32);
        }
    }

    #[test]
    fn test_default_riddles_have_answers() {
        let pool = default_challenges();
        assert_eq!(pool.len(), 17);
        assert!(pool.iter().all(|c| !c.answer.trim().is_empty()));
    }
}
