//! UCT Chess rules - bitboard chess implementing the [`uct_core::Oracle`] trait
//!
//! Positions are immutable snapshots; moves are generated legal-only in a
//! fixed order so that searches over them are reproducible.

mod attacks;
mod bitboard;
pub mod eval;
mod movegen;
mod moves;
mod oracle;
mod piece;
mod position;
mod square;

pub use attacks::{attacks, AttackTables};
pub use bitboard::{Bitboard, Squares};
pub use moves::{Move, MoveKind};
pub use oracle::Chess;
pub use piece::{Piece, PieceType};
pub use position::{CastleSide, CastlingRights, Position, START_FEN};
pub use square::Square;
pub use uct_core::Color;
