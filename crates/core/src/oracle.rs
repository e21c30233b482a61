use std::fmt::{Debug, Display};
use std::hash::Hash;

use crate::{Color, Outcome, Reward};

/// Rules provider consulted by the search and the turn state machine.
///
/// Implementations must be deterministic: the same board always yields the
/// same legal moves in the same order, since search tie-breaks and the
/// zero-budget fallback depend on that order.
pub trait Oracle: Send + Sync {
    /// Immutable position snapshot, including side to move.
    type Board: Clone + Debug + Send + Sync;

    /// Move type. Never mutated after generation.
    type Move: Copy + Debug + Display + Eq + Hash + Send + Sync;

    /// Piece kind a pawn may promote to.
    type Promotion: Copy + Debug + Display + Eq + Send + Sync;

    /// Side to move on `board`.
    fn side_to_move(&self, board: &Self::Board) -> Color;

    /// All legal moves in a fixed order. Empty when the side to move has none.
    fn legal_moves(&self, board: &Self::Board) -> Vec<Self::Move>;

    /// Apply a legal move, returning the new board. Does not mutate `board`.
    fn apply_move(&self, board: &Self::Board, mv: Self::Move) -> Self::Board;

    /// Returns the outcome if the game is over, `None` if play continues.
    fn is_terminal(&self, board: &Self::Board) -> Option<Outcome>;

    /// Whether `mv` takes a pawn to its last rank on `board`.
    fn is_promotion_eligible(&self, mv: Self::Move, board: &Self::Board) -> bool;

    /// Whether the side to move is in check.
    fn is_check(&self, board: &Self::Board) -> bool;

    /// The promotion piece carried by `mv`, if any.
    fn promotion_of(&self, mv: Self::Move) -> Option<Self::Promotion>;

    /// `mv` with its promotion piece set to `piece`.
    fn with_promotion(&self, mv: Self::Move, piece: Self::Promotion) -> Self::Move;

    /// Whether the legal move `legal` is the one a player meant by `requested`.
    ///
    /// A request may lack the flags the generator attaches (capture, castle,
    /// en passant) or the promotion piece. The default compares exactly.
    fn matches(&self, legal: Self::Move, requested: Self::Move) -> bool {
        legal == requested
    }

    /// Static evaluation from the side to move's point of view.
    fn evaluate(&self, _board: &Self::Board) -> Reward {
        Reward::DRAW
    }
}
