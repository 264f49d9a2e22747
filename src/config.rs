// Configuration module for reading Snake.toml
// Holds the arena settings, the per-tier AI knobs and the EASY cascade odds

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::types::GridBounds;

/// Main configuration structure containing all tunable parameters
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub arena: ArenaConfig,
    pub tiers: TiersConfig,
    pub easy: EasyBehaviorConfig,
    pub debug: DebugConfig,
}

/// Named difficulty level of the computer-controlled snake
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn all() -> [Difficulty; 3] {
        [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(format!("Invalid difficulty: {}", s)),
        }
    }
}

/// Grid and session settings
#[derive(Debug, Deserialize, Clone)]
pub struct ArenaConfig {
    pub width: i32,
    pub height: i32,
    pub initial_snake_length: usize,
    /// Advisory tick period for the front-end scheduler
    pub tick_interval_ms: u64,
    pub default_difficulty: Difficulty,
    /// Fixed seed for reproducible sessions; unseeded when absent
    #[serde(default)]
    pub seed: Option<u64>,
}

impl ArenaConfig {
    pub fn bounds(&self) -> Result<GridBounds, String> {
        GridBounds::new(self.width, self.height)
    }
}

/// The four knobs of one difficulty tier
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
pub struct TierConfig {
    /// Ticks between re-decisions
    pub update_rate: u64,
    /// Max Manhattan distance at which a search is attempted
    pub sight_distance: i32,
    pub path_finding_chance: f64,
    pub random_move_chance: f64,
}

/// Tier table
#[derive(Debug, Deserialize, Clone)]
pub struct TiersConfig {
    pub easy: TierConfig,
    pub medium: TierConfig,
    pub hard: TierConfig,
}

impl TiersConfig {
    /// Gets the knobs bound to a tier
    pub fn for_tier(&self, tier: Difficulty) -> &TierConfig {
        match tier {
            Difficulty::Easy => &self.easy,
            Difficulty::Medium => &self.medium,
            Difficulty::Hard => &self.hard,
        }
    }
}

/// Odds and thresholds of the EASY override cascade, in evaluation order
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct EasyBehaviorConfig {
    // 1. Freeze
    pub freeze_period: u64,
    pub freeze_chance: f64,

    // 2-4. Random, retreat and risky moves
    pub random_move_chance: f64,
    pub move_away_chance: f64,
    pub risky_move_chance: f64,

    // 5. Forced turn every N decisions
    pub forced_turn_period: u64,

    // 6. Retreat when close to food
    pub close_food_distance: i32,
    pub close_food_retreat_chance: f64,

    // 7. Self-destructive move
    pub suicide_chance: f64,
    pub tail_bite_min_length: usize,

    // Greedy fallback picks the secondary axis first
    pub greedy_secondary_axis_chance: f64,

    // 8. Degraded search
    pub sight_clamp_chance: f64,
    pub clamped_sight_distance: i32,
    pub skip_search_chance: f64,
    pub diagonal_skip_chance: f64,
    pub truncate_min_length: usize,
    pub truncate_chance: f64,
    pub truncate_divisor: usize,
    pub abandon_path_chance: f64,
    pub follow_path_threshold: f64,
    pub path_random_turn_chance: f64,
}

/// Debug configuration
#[derive(Debug, Deserialize, Clone)]
pub struct DebugConfig {
    pub enabled: bool,
    pub log_file_path: String,
}

impl Config {
    /// Loads configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the Snake.toml configuration file
    ///
    /// # Returns
    /// * `Result<Config, String>` - Parsed configuration or error message
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let contents = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        Self::from_toml_str(&contents)
    }

    /// Parses configuration from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self, String> {
        toml::from_str(contents).map_err(|e| format!("Failed to parse config file: {}", e))
    }

    /// Loads default configuration from Snake.toml in the project root
    pub fn load_default() -> Result<Self, String> {
        Self::from_file("Snake.toml")
    }

    /// Creates a configuration with hardcoded default values as fallback
    /// This should match the constants defined in Snake.toml
    pub fn default_hardcoded() -> Self {
        Config {
            arena: ArenaConfig {
                width: 30,  // 600px canvas / 20px cells
                height: 20, // 400px canvas / 20px cells
                initial_snake_length: 3,
                tick_interval_ms: 150,
                default_difficulty: Difficulty::Easy,
                seed: None,
            },
            tiers: TiersConfig {
                easy: TierConfig {
                    update_rate: 6,
                    sight_distance: 1,
                    path_finding_chance: 0.05,
                    random_move_chance: 0.85,
                },
                medium: TierConfig {
                    update_rate: 1,
                    sight_distance: 10,
                    path_finding_chance: 0.8,
                    random_move_chance: 0.1,
                },
                hard: TierConfig {
                    update_rate: 1,
                    sight_distance: 20,
                    path_finding_chance: 1.0,
                    random_move_chance: 0.0,
                },
            },
            easy: EasyBehaviorConfig {
                freeze_period: 15,
                freeze_chance: 0.3,
                random_move_chance: 0.5,
                move_away_chance: 0.6,
                risky_move_chance: 0.7,
                forced_turn_period: 7,
                close_food_distance: 3,
                close_food_retreat_chance: 0.8,
                suicide_chance: 0.4,
                tail_bite_min_length: 5,
                greedy_secondary_axis_chance: 0.3,
                sight_clamp_chance: 0.8,
                clamped_sight_distance: 1,
                skip_search_chance: 0.6,
                diagonal_skip_chance: 0.5,
                truncate_min_length: 3,
                truncate_chance: 0.5,
                truncate_divisor: 3,
                abandon_path_chance: 0.1,
                follow_path_threshold: 0.7,
                path_random_turn_chance: 0.4,
            },
            debug: DebugConfig {
                enabled: false,
                log_file_path: "snake_duel_debug.jsonl".to_string(),
            },
        }
    }

    /// Attempts to load from file, falls back to hardcoded defaults on error
    pub fn load_or_default() -> Self {
        Self::load_default().unwrap_or_else(|e| {
            log::warn!("Could not load Snake.toml ({}), using hardcoded defaults", e);
            Self::default_hardcoded()
        })
    }
}
