//! Engine configuration.
//!
//! Settings load from `config.toml` with the following priority (highest to
//! lowest):
//! 1. Environment variables (`GOMOKU_<SECTION>_<KEY>`)
//! 2. config.toml file
//! 3. Built-in defaults
//!
//! ```text
//! GOMOKU_BOARD_SIZE=9
//! GOMOKU_MCTS_NUM_SIMULATIONS=1600
//! GOMOKU_MCTS_EXPLORATION=2.0
//! GOMOKU_MCTS_MAX_DURATION_MS=250
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, info, warn};

// Serde default functions (required for #[serde(default = "...")])

fn d_board_size() -> usize {
    gomoku_core::DEFAULT_SIZE
}
fn d_num_simulations() -> u32 {
    800
}
fn d_exploration() -> f32 {
    1.4
}

/// Board section of the engine configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BoardConfig {
    /// Side length of the square board.
    #[serde(default = "d_board_size")]
    pub size: usize,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            size: d_board_size(),
        }
    }
}

/// Configuration for Monte Carlo Tree Search.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// Number of simulations to run per search.
    #[serde(default = "d_num_simulations")]
    pub num_simulations: u32,

    /// Exploration constant in the UCB1 formula.
    /// Higher values encourage exploration, lower values favor exploitation.
    #[serde(default = "d_exploration")]
    pub exploration: f32,

    /// Optional wall-clock cutoff in milliseconds, checked once per
    /// simulation. The search always completes at least one simulation so a
    /// move can be returned. None means the simulation count alone bounds
    /// the search.
    #[serde(default)]
    pub max_duration_ms: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            num_simulations: d_num_simulations(),
            exploration: d_exploration(),
            max_duration_ms: None,
        }
    }
}

impl SearchConfig {
    /// Create a fast config for testing.
    pub fn for_testing() -> Self {
        Self {
            num_simulations: 50,
            ..Self::default()
        }
    }

    /// Builder pattern: set the number of simulations.
    pub fn with_simulations(mut self, n: u32) -> Self {
        self.num_simulations = n;
        self
    }

    /// Builder pattern: set the exploration constant.
    pub fn with_exploration(mut self, c: f32) -> Self {
        self.exploration = c;
        self
    }

    /// Builder pattern: set the wall-clock cutoff.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.max_duration_ms = Some(deadline.as_millis() as u64);
        self
    }

    /// The wall-clock cutoff, if any.
    pub fn max_duration(&self) -> Option<Duration> {
        self.max_duration_ms.map(Duration::from_millis)
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub board: BoardConfig,

    #[serde(default)]
    pub mcts: SearchConfig,
}

/// Standard locations to search for config.toml
pub const CONFIG_SEARCH_PATHS: &[&str] = &[
    "config.toml",    // Current directory
    "../config.toml", // Parent directory (when running from a subdirectory)
];

/// Load the engine configuration from config.toml.
///
/// Searches in the following order:
/// 1. Path specified by the GOMOKU_CONFIG environment variable
/// 2. Current directory (config.toml)
/// 3. Parent directory (../config.toml)
///
/// After loading, environment variable overrides are applied.
pub fn load_config() -> EngineConfig {
    // Check for explicit config path
    if let Ok(path) = std::env::var("GOMOKU_CONFIG") {
        let path = PathBuf::from(&path);
        if path.exists() {
            info!("loading config from GOMOKU_CONFIG: {}", path.display());
            return load_from_path(&path);
        }
        warn!(
            "GOMOKU_CONFIG={} not found, searching defaults",
            path.display()
        );
    }

    // Search default locations
    for path_str in CONFIG_SEARCH_PATHS {
        let path = PathBuf::from(path_str);
        if path.exists() {
            info!("loading config from {}", path.display());
            return load_from_path(&path);
        }
    }

    // Fall back to defaults
    debug!("no config.toml found, using built-in defaults");
    apply_env_overrides(EngineConfig::default())
}

/// Load configuration from a specific path.
pub fn load_from_path(path: &PathBuf) -> EngineConfig {
    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => apply_env_overrides(config),
            Err(e) => {
                warn!("failed to parse {}: {}, using defaults", path.display(), e);
                apply_env_overrides(EngineConfig::default())
            }
        },
        Err(e) => {
            warn!("failed to read {}: {}, using defaults", path.display(), e);
            apply_env_overrides(EngineConfig::default())
        }
    }
}

/// Macro to reduce env override boilerplate
macro_rules! env_override {
    // Parseable field (usize, u32, f32, etc.)
    ($config:expr, $section:ident . $field:ident, $key:expr, parse) => {
        if let Ok(v) =
            std::env::var($key).and_then(|s| s.parse().map_err(|_| std::env::VarError::NotPresent))
        {
            $config.$section.$field = v;
        }
    };
    // Optional parseable field (Option<u64>, etc.)
    ($config:expr, $section:ident . $field:ident, $key:expr, optional_parse) => {
        if let Ok(v) =
            std::env::var($key).and_then(|s| s.parse().map_err(|_| std::env::VarError::NotPresent))
        {
            $config.$section.$field = Some(v);
        }
    };
}

/// Apply environment variable overrides to a configuration.
///
/// Environment variables follow the pattern: GOMOKU_<SECTION>_<KEY>
pub fn apply_env_overrides(mut config: EngineConfig) -> EngineConfig {
    // Board
    env_override!(config, board.size, "GOMOKU_BOARD_SIZE", parse);

    // MCTS
    env_override!(
        config,
        mcts.num_simulations,
        "GOMOKU_MCTS_NUM_SIMULATIONS",
        parse
    );
    env_override!(config, mcts.exploration, "GOMOKU_MCTS_EXPLORATION", parse);
    env_override!(
        config,
        mcts.max_duration_ms,
        "GOMOKU_MCTS_MAX_DURATION_MS",
        optional_parse
    );

    config
}
