//! Monte Carlo Tree Search with UCT selection.
//!
//! Works with any rules provider implementing [`uct_core::Oracle`].
//!
//! # Features
//!
//! - **UCT selection** with a configurable exploration constant
//! - **Deterministic expansion** in oracle move order
//! - **Random playouts** bounded by a ply cap, scored as a draw or by static evaluation
//! - **Arena tree** rebuilt for every search
//! - **Injected RNG** so searches are reproducible
//! - **Parallel iterations** on a rayon pool sharing one locked tree
//!
//! # Example
//!
//! ```
//! use uct_chess::{Chess, Position};
//! use uct_mcts::{Mcts, MctsConfig, SearchBudget};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let board = Position::startpos();
//! let rng = ChaCha8Rng::seed_from_u64(42);
//! let mut mcts = Mcts::new(MctsConfig::with_playout_cap(40), rng);
//!
//! let report = mcts.search(&Chess, &board, SearchBudget::iterations(100)).unwrap();
//! assert_eq!(report.root_visits, 100);
//! println!("Best move: {}", report.best_move);
//! ```

pub mod config;
mod node;
pub mod playout;
pub mod search;
#[cfg(test)]
mod test_games;
mod tree;

pub use config::{Cutoff, MctsConfig, SearchBudget};
pub use playout::RandomPlayout;
pub use search::{ChildStats, Mcts, SearchReport};
