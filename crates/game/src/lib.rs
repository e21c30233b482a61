//! Turn sequencing for the UCT chess engine.
//!
//! [`TurnStateMachine`] decides which phase of a turn is active and which
//! events it accepts; [`GameController`] owns a live game and asks the
//! search engine for a move whenever the engine is to play.

pub mod controller;
pub mod machine;
pub mod phase;

pub use controller::{GameConfig, GameController};
pub use machine::{Mover, TurnStateMachine};
pub use phase::{TurnEvent, TurnPhase};
