use thiserror::Error;

use crate::Outcome;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChessError {
    #[error("Illegal move: {0}")]
    IllegalMove(String),

    #[error("No legal moves available")]
    NoLegalMove,

    #[error("Game is already over: {0}")]
    GameAlreadyOver(Outcome),

    #[error("A promotion piece must be chosen before play continues")]
    PromotionChoiceRequired,

    #[error("{event} is not accepted while {phase}")]
    UnexpectedEvent { phase: String, event: String },

    #[error("Invalid FEN string: {0}")]
    InvalidFen(String),

    #[error("Invalid square: {0}")]
    InvalidSquare(String),

    #[error("Invalid move: {0}")]
    InvalidMove(String),
}

pub type Result<T> = std::result::Result<T, ChessError>;
