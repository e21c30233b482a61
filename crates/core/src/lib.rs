//! UCT Chess Core - shared vocabulary for the engine, the rules and the turn machine
//!
//! This crate provides the [`Oracle`] trait through which the search and the
//! turn state machine consult the rules of the game, together with the small
//! set of types every other crate agrees on.
//!
//! # Types
//!
//! - [`Oracle`] - Legal moves, move application and terminal detection
//! - [`Color`] - Side to move
//! - [`Outcome`] - How a finished game ended
//! - [`Reward`] - Playout result or evaluation in [-1, 1]
//! - [`ChessError`] - Error taxonomy shared by all crates

mod error;
mod oracle;
mod types;

pub use error::{ChessError, Result};
pub use oracle::Oracle;
pub use types::{Color, DrawRule, Outcome, Reward};
