//! Configuration loaded from `uct-chess.toml`.
//!
//! Settings are resolved with the following priority (highest to lowest):
//! 1. Command-line flags
//! 2. Environment variables (`UCT_CHESS_<SECTION>_<KEY>`)
//! 3. `uct-chess.toml`
//! 4. Built-in defaults
//!
//! ```text
//! UCT_CHESS_COMMON_LOG_LEVEL=debug
//! UCT_CHESS_SEARCH_ITERATIONS=5000
//! UCT_CHESS_SEARCH_CUTOFF=evaluation
//! UCT_CHESS_GAME_HUMAN=black
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;
use uct_chess::START_FEN;
use uct_core::Color;
use uct_game::GameConfig;
use uct_mcts::{Cutoff, MctsConfig, SearchBudget};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "UCT_CHESS_CONFIG";

/// Locations searched for a config file, in order.
pub const CONFIG_SEARCH_PATHS: &[&str] = &["uct-chess.toml", "config/uct-chess.toml"];

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub common: CommonConfig,
    pub search: SearchConfig,
    pub game: GameSection,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct CommonConfig {
    pub log_level: String,
    pub seed: u64,
}

impl Default for CommonConfig {
    fn default() -> Self {
        Self {
            log_level: "info".into(),
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct SearchConfig {
    pub iterations: Option<u32>,
    pub time_ms: Option<u64>,
    pub exploration: f32,
    pub playout_cap: u32,
    pub cutoff: CutoffSetting,
    pub threads: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        let mcts = MctsConfig::default();
        Self {
            iterations: Some(2000),
            time_ms: None,
            exploration: mcts.exploration,
            playout_cap: mcts.max_playout_plies,
            cutoff: CutoffSetting::Draw,
            threads: mcts.threads,
        }
    }
}

impl SearchConfig {
    pub fn mcts_config(&self) -> MctsConfig {
        MctsConfig {
            exploration: self.exploration,
            max_playout_plies: self.playout_cap,
            cutoff: self.cutoff.into(),
            threads: self.threads.max(1),
        }
    }

    pub fn budget(&self) -> SearchBudget {
        SearchBudget {
            max_iterations: self.iterations,
            max_time: self.time_ms.map(std::time::Duration::from_millis),
        }
    }
}

/// Text form of [`Cutoff`] in config files and env vars.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CutoffSetting {
    Draw,
    Evaluation,
}

impl From<CutoffSetting> for Cutoff {
    fn from(setting: CutoffSetting) -> Self {
        match setting {
            CutoffSetting::Draw => Cutoff::Draw,
            CutoffSetting::Evaluation => Cutoff::Evaluation,
        }
    }
}

impl FromStr for CutoffSetting {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "draw" => Ok(CutoffSetting::Draw),
            "evaluation" | "eval" => Ok(CutoffSetting::Evaluation),
            other => Err(format!("unknown cutoff '{}'", other)),
        }
    }
}

/// Side played by the human, or nobody.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HumanSide {
    White,
    Black,
    None,
}

impl HumanSide {
    pub fn color(self) -> Option<Color> {
        match self {
            HumanSide::White => Some(Color::White),
            HumanSide::Black => Some(Color::Black),
            HumanSide::None => None,
        }
    }
}

impl FromStr for HumanSide {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "white" | "w" => Ok(HumanSide::White),
            "black" | "b" => Ok(HumanSide::Black),
            "none" => Ok(HumanSide::None),
            other => Err(format!("unknown side '{}'", other)),
        }
    }
}

impl fmt::Display for HumanSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HumanSide::White => write!(f, "white"),
            HumanSide::Black => write!(f, "black"),
            HumanSide::None => write!(f, "none"),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct GameSection {
    pub human: HumanSide,
    pub start_fen: String,
}

impl Default for GameSection {
    fn default() -> Self {
        Self {
            human: HumanSide::White,
            start_fen: START_FEN.into(),
        }
    }
}

impl GameSection {
    pub fn game_config(&self) -> GameConfig {
        GameConfig {
            human: self.human.color(),
        }
    }
}

/// A resolved configuration and where it came from.
///
/// Loading happens before logging is set up, so problems are carried here
/// and reported once the subscriber is installed.
#[derive(Debug)]
pub struct Loaded {
    pub config: AppConfig,
    pub source: Option<PathBuf>,
    pub warnings: Vec<String>,
}

/// Load the configuration.
///
/// Searches `explicit`, then the path in `UCT_CHESS_CONFIG`, then
/// [`CONFIG_SEARCH_PATHS`]. Environment overrides are applied last.
pub fn load_config(explicit: Option<&Path>) -> Loaded {
    let mut warnings = Vec::new();

    // (path, named by the user)
    let mut candidates: Vec<(PathBuf, bool)> = Vec::new();
    if let Some(path) = explicit {
        candidates.push((path.to_path_buf(), true));
    }
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        candidates.push((PathBuf::from(path), true));
    }
    candidates.extend(CONFIG_SEARCH_PATHS.iter().map(|p| (PathBuf::from(p), false)));

    for (path, named) in candidates {
        if path.exists() {
            let mut loaded = load_from_path(&path);
            warnings.append(&mut loaded.warnings);
            loaded.warnings = warnings;
            return loaded;
        }
        if named {
            warnings.push(format!("{} not found, searching defaults", path.display()));
        }
    }

    Loaded {
        config: apply_env_overrides(AppConfig::default()),
        source: None,
        warnings,
    }
}

/// Load configuration from a specific path, falling back to defaults.
pub fn load_from_path(path: &Path) -> Loaded {
    let parsed = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}, using defaults", path.display(), e))
        .and_then(|content| {
            toml::from_str::<AppConfig>(&content)
                .map_err(|e| format!("Failed to parse {}: {}, using defaults", path.display(), e))
        });

    match parsed {
        Ok(config) => Loaded {
            config: apply_env_overrides(config),
            source: Some(path.to_path_buf()),
            warnings: Vec::new(),
        },
        Err(warning) => Loaded {
            config: apply_env_overrides(AppConfig::default()),
            source: None,
            warnings: vec![warning],
        },
    }
}

macro_rules! env_override {
    // String field
    ($config:expr, $section:ident . $field:ident, $key:expr) => {
        if let Ok(v) = std::env::var($key) {
            $config.$section.$field = v;
        }
    };
    // Parseable field
    ($config:expr, $section:ident . $field:ident, $key:expr, parse) => {
        if let Ok(v) =
            std::env::var($key).and_then(|s| s.parse().map_err(|_| std::env::VarError::NotPresent))
        {
            $config.$section.$field = v;
        }
    };
    // Optional parseable field
    ($config:expr, $section:ident . $field:ident, $key:expr, optional_parse) => {
        if let Ok(v) =
            std::env::var($key).and_then(|s| s.parse().map_err(|_| std::env::VarError::NotPresent))
        {
            $config.$section.$field = Some(v);
        }
    };
}

/// Apply `UCT_CHESS_<SECTION>_<KEY>` environment overrides.
pub fn apply_env_overrides(mut config: AppConfig) -> AppConfig {
    env_override!(config, common.log_level, "UCT_CHESS_COMMON_LOG_LEVEL");
    env_override!(config, common.seed, "UCT_CHESS_COMMON_SEED", parse);

    env_override!(config, search.iterations, "UCT_CHESS_SEARCH_ITERATIONS", optional_parse);
    env_override!(config, search.time_ms, "UCT_CHESS_SEARCH_TIME_MS", optional_parse);
    env_override!(config, search.exploration, "UCT_CHESS_SEARCH_EXPLORATION", parse);
    env_override!(config, search.playout_cap, "UCT_CHESS_SEARCH_PLAYOUT_CAP", parse);
    env_override!(config, search.cutoff, "UCT_CHESS_SEARCH_CUTOFF", parse);
    env_override!(config, search.threads, "UCT_CHESS_SEARCH_THREADS", parse);

    env_override!(config, game.human, "UCT_CHESS_GAME_HUMAN", parse);
    env_override!(config, game.start_fen, "UCT_CHESS_GAME_START_FEN");

    config
}
