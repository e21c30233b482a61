//! Search configuration and budgets.

use std::time::Duration;

/// How a playout that reaches the ply cap is scored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Cutoff {
    /// Count it as a draw.
    #[default]
    Draw,
    /// Use the oracle's static evaluation of the final position.
    Evaluation,
}

/// MCTS configuration parameters.
#[derive(Clone, Debug)]
pub struct MctsConfig {
    /// Exploration constant `C` in the UCT score.
    pub exploration: f32,

    /// Hard limit on plies per playout.
    pub max_playout_plies: u32,

    /// Scoring of playouts stopped by the ply cap.
    pub cutoff: Cutoff,

    /// Worker threads running iterations. 1 runs the sequential search.
    pub threads: usize,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            exploration: std::f32::consts::SQRT_2,
            max_playout_plies: 200,
            cutoff: Cutoff::Draw,
            threads: 1,
        }
    }
}

impl MctsConfig {
    /// Default configuration with a different playout cap.
    pub fn with_playout_cap(max_playout_plies: u32) -> Self {
        Self {
            max_playout_plies,
            ..Default::default()
        }
    }

    /// Default configuration spread over `threads` workers.
    pub fn with_threads(threads: usize) -> Self {
        Self {
            threads: threads.max(1),
            ..Default::default()
        }
    }
}

/// When a search stops. Checked between iterations only.
///
/// The search ends as soon as either bound is reached. A budget with no
/// bound at all runs zero iterations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct SearchBudget {
    pub max_iterations: Option<u32>,
    pub max_time: Option<Duration>,
}

impl SearchBudget {
    pub fn iterations(n: u32) -> Self {
        Self {
            max_iterations: Some(n),
            max_time: None,
        }
    }

    pub fn time_ms(ms: u64) -> Self {
        Self {
            max_iterations: None,
            max_time: Some(Duration::from_millis(ms)),
        }
    }

    pub fn both(iterations: u32, ms: u64) -> Self {
        Self {
            max_iterations: Some(iterations),
            max_time: Some(Duration::from_millis(ms)),
        }
    }

    /// Whether no further iteration may start.
    pub fn is_exhausted(&self, completed: u32, elapsed: Duration) -> bool {
        match (self.max_iterations, self.max_time) {
            (None, None) => true,
            (iters, time) => {
                iters.is_some_and(|max| completed >= max) || time.is_some_and(|max| elapsed >= max)
            }
        }
    }
}
