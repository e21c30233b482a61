//! [`Oracle`] implementation for standard chess.

use uct_core::{Color, Oracle, Outcome, Reward};

use crate::piece::Side;
use crate::{eval, Move, PieceType, Position};

/// Centipawn scale at which an evaluation maps to tanh(1) ~ 0.76.
const EVAL_SCALE: f32 = 400.0;

/// The rules of chess over bitboard [`Position`]s.
#[derive(Clone, Copy, Debug, Default)]
pub struct Chess;

impl Oracle for Chess {
    type Board = Position;
    type Move = Move;
    type Promotion = PieceType;

    fn side_to_move(&self, board: &Position) -> Color {
        board.side_to_move()
    }

    fn legal_moves(&self, board: &Position) -> Vec<Move> {
        board.legal_moves()
    }

    fn apply_move(&self, board: &Position, mv: Move) -> Position {
        board.make_move(mv)
    }

    fn is_terminal(&self, board: &Position) -> Option<Outcome> {
        board.outcome()
    }

    fn is_promotion_eligible(&self, mv: Move, board: &Position) -> bool {
        let us = board.side_to_move();
        board
            .piece_at(mv.from())
            .is_some_and(|p| p.color == us && p.kind == PieceType::Pawn)
            && mv.to().rank() == us.last_rank()
    }

    fn is_check(&self, board: &Position) -> bool {
        board.in_check()
    }

    fn promotion_of(&self, mv: Move) -> Option<PieceType> {
        mv.promotion_piece()
    }

    fn with_promotion(&self, mv: Move, piece: PieceType) -> Move {
        mv.with_promotion(piece)
    }

    fn matches(&self, legal: Move, requested: Move) -> bool {
        legal.answers(requested)
    }

    fn evaluate(&self, board: &Position) -> Reward {
        Reward::squashed(eval::evaluate_for_side_to_move(board) as f32, EVAL_SCALE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Square;
    use uct_core::DrawRule;

    #[test]
    fn test_oracle_startpos() {
        let board = Position::startpos();
        assert_eq!(Chess.side_to_move(&board), Color::White);
        assert_eq!(Chess.legal_moves(&board).len(), 20);
        assert_eq!(Chess.is_terminal(&board), None);
        assert!(!Chess.is_check(&board));
        assert_eq!(Chess.evaluate(&board), Reward::DRAW);
    }

    #[test]
    fn test_apply_move_does_not_mutate() {
        let board = Position::startpos();
        let mv = Chess.legal_moves(&board)[0];
        let next = Chess.apply_move(&board, mv);
        assert_eq!(board, Position::startpos());
        assert_eq!(next.side_to_move(), Color::Black);
    }

    #[test]
    fn test_promotion_eligibility() {
        let board = Position::from_fen("8/P7/8/8/8/8/1p6/4K2k w - - 0 1").unwrap();
        let push: Move = "a7a8".parse().unwrap();
        assert!(Chess.is_promotion_eligible(push, &board));
        let king: Move = "e1e2".parse().unwrap();
        assert!(!Chess.is_promotion_eligible(king, &board));
        // The black pawn is not White's to move.
        let other: Move = "b2b1".parse().unwrap();
        assert!(!Chess.is_promotion_eligible(other, &board));
    }

    #[test]
    fn test_request_matching() {
        let board = Position::from_fen("8/P7/8/8/8/8/8/4K2k w - - 0 1").unwrap();
        let request: Move = "a7a8".parse().unwrap();
        let matching: Vec<_> = Chess
            .legal_moves(&board)
            .into_iter()
            .filter(|&m| Chess.matches(m, request))
            .collect();
        assert_eq!(matching.len(), 4);

        let queen = Chess.with_promotion(request, PieceType::Queen);
        assert_eq!(Chess.promotion_of(queen), Some(PieceType::Queen));
        let matching: Vec<_> = Chess
            .legal_moves(&board)
            .into_iter()
            .filter(|&m| Chess.matches(m, queen))
            .collect();
        assert_eq!(matching.len(), 1);
        assert_eq!(matching[0].to(), Square::A8);
    }

    #[test]
    fn test_terminal_outcomes() {
        let mate = Position::from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3")
            .unwrap();
        assert_eq!(
            Chess.is_terminal(&mate),
            Some(Outcome::Checkmate {
                winner: Color::Black
            })
        );
        assert!(Chess.is_check(&mate));

        let bare = Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        assert_eq!(
            Chess.is_terminal(&bare),
            Some(Outcome::DrawByRule {
                rule: DrawRule::InsufficientMaterial
            })
        );
    }

    #[test]
    fn test_evaluate_perspective() {
        let white_to_move = Position::from_fen("4k3/8/8/8/3Q4/8/8/4K3 w - - 0 1").unwrap();
        let black_to_move = Position::from_fen("4k3/8/8/8/3Q4/8/8/4K3 b - - 0 1").unwrap();
        let w = Chess.evaluate(&white_to_move).get();
        let b = Chess.evaluate(&black_to_move).get();
        assert!(w > 0.9);
        assert!((w + b).abs() < 1e-6);
    }
}
