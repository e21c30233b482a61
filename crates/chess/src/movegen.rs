//! Legal move generation.
//!
//! Pseudo-legal moves are generated per piece kind, then any move that
//! leaves the mover's king attacked is dropped. The output order is fixed:
//! pawns, knights, bishops, rooks, queens, king, castling; within a kind by
//! origin square, then by target square. Promotions come queen first.

use uct_core::Color;

use crate::piece::Side;
use crate::position::CastleSide;
use crate::{attacks, Bitboard, Move, MoveKind, PieceType, Position, Square};

impl Position {
    /// All legal moves for the side to move.
    pub fn legal_moves(&self) -> Vec<Move> {
        let mut moves = Vec::with_capacity(64);
        self.pseudo_legal(&mut moves);
        moves.retain(|&mv| self.keeps_king_safe(mv));
        moves
    }

    /// Whether at least one legal move exists. Stops at the first one found.
    pub fn has_legal_move(&self) -> bool {
        let mut moves = Vec::with_capacity(64);
        self.pseudo_legal(&mut moves);
        moves.into_iter().any(|mv| self.keeps_king_safe(mv))
    }

    fn keeps_king_safe(&self, mv: Move) -> bool {
        let us = self.side_to_move();
        let after = self.make_move(mv);
        after
            .king_square(us)
            .is_some_and(|k| !after.is_attacked(k, us.opposite()))
    }

    fn pseudo_legal(&self, out: &mut Vec<Move>) {
        let us = self.side_to_move();
        let t = attacks();
        let occ = self.occupied();
        let targets = !self.by_color(us);

        self.pawn_moves(us, out);
        for kind in [
            PieceType::Knight,
            PieceType::Bishop,
            PieceType::Rook,
            PieceType::Queen,
            PieceType::King,
        ] {
            for from in self.pieces(us, kind) {
                let reach = match kind {
                    PieceType::Knight => t.knight(from),
                    PieceType::Bishop => t.bishop(from, occ),
                    PieceType::Rook => t.rook(from, occ),
                    PieceType::Queen => t.queen(from, occ),
                    _ => t.king(from),
                };
                self.push_targets(from, reach & targets, out);
            }
        }
        self.castling_moves(us, out);
    }

    fn push_targets(&self, from: Square, targets: Bitboard, out: &mut Vec<Move>) {
        let occ = self.occupied();
        out.extend(targets.iter().map(|to| {
            if occ.contains(to) {
                Move::capture(from, to)
            } else {
                Move::quiet(from, to)
            }
        }));
    }

    fn pawn_moves(&self, us: Color, out: &mut Vec<Move>) {
        let t = attacks();
        let occ = self.occupied();
        let enemies = self.by_color(us.opposite());
        let fwd = us.forward();

        for from in self.pieces(us, PieceType::Pawn) {
            if let Some(one) = from.offset(0, fwd).filter(|sq| !occ.contains(*sq)) {
                push_pawn(from, one, false, us, out);
                if from.rank() == us.pawn_rank() {
                    if let Some(two) = one.offset(0, fwd).filter(|sq| !occ.contains(*sq)) {
                        out.push(Move::new(from, two, MoveKind::DoublePawnPush));
                    }
                }
            }

            for to in t.pawn(from, us) & enemies {
                push_pawn(from, to, true, us, out);
            }

            if let Some(ep) = self.en_passant() {
                if t.pawn(from, us).contains(ep) {
                    out.push(Move::new(from, ep, MoveKind::EnPassant));
                }
            }
        }
    }

    fn castling_moves(&self, us: Color, out: &mut Vec<Move>) {
        let rank = us.home_rank();
        let Some(king) = Square::from_coords(4, rank) else {
            return;
        };
        if self.king_square(us) != Some(king) || self.in_check() {
            return;
        }
        let them = us.opposite();
        let occ = self.occupied();
        let rooks = self.pieces(us, PieceType::Rook);

        // (side, rook file, files that must be empty, files the king crosses, king target file)
        let lanes: [(CastleSide, u8, &[u8], &[u8], u8); 2] = [
            (CastleSide::Kingside, 7, &[5, 6], &[5, 6], 6),
            (CastleSide::Queenside, 0, &[1, 2, 3], &[3, 2], 2),
        ];
        for (side, rook_file, empty, crossed, target) in lanes {
            if !self.castling().allows(us, side) {
                continue;
            }
            let on_rank = |file: u8| Square::from_coords(file, rank);
            if !on_rank(rook_file).is_some_and(|sq| rooks.contains(sq)) {
                continue;
            }
            let clear = empty
                .iter()
                .all(|&f| on_rank(f).is_some_and(|sq| !occ.contains(sq)));
            let safe = crossed
                .iter()
                .all(|&f| on_rank(f).is_some_and(|sq| !self.is_attacked(sq, them)));
            if let (true, true, Some(to)) = (clear, safe, on_rank(target)) {
                let kind = match side {
                    CastleSide::Kingside => MoveKind::CastleKingside,
                    CastleSide::Queenside => MoveKind::CastleQueenside,
                };
                out.push(Move::new(king, to, kind));
            }
        }
    }
}

fn push_pawn(from: Square, to: Square, capture: bool, us: Color, out: &mut Vec<Move>) {
    if to.rank() == us.last_rank() {
        out.extend(
            PieceType::PROMOTIONS
                .iter()
                .map(|&pt| Move::promotion(from, to, pt, capture)),
        );
    } else if capture {
        out.push(Move::capture(from, to));
    } else {
        out.push(Move::quiet(from, to));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::START_FEN;

    fn castles(pos: &Position) -> Vec<Move> {
        pos.legal_moves().into_iter().filter(|m| m.is_castle()).collect()
    }

    #[test]
    fn test_startpos_moves() {
        let pos = Position::from_fen(START_FEN).unwrap();
        let moves = pos.legal_moves();
        assert_eq!(moves.len(), 20);
        assert!(moves.iter().any(|m| m.to_string() == "e2e4"));
        assert!(moves.iter().any(|m| m.to_string() == "g1f3"));
    }

    #[test]
    fn test_generation_order_is_stable() {
        let pos = Position::startpos();
        let first: Vec<String> = pos.legal_moves().iter().map(Move::to_string).collect();
        let second: Vec<String> = pos.legal_moves().iter().map(Move::to_string).collect();
        assert_eq!(first, second);
        // Pawns first, a-file pawn first, single push before double push.
        assert_eq!(first[0], "a2a3");
        assert_eq!(first[1], "a2a4");
        assert_eq!(first[16], "b1a3");
    }

    #[test]
    fn test_en_passant_generated() {
        let pos =
            Position::from_fen("rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3")
                .unwrap();
        let ep: Vec<_> = pos
            .legal_moves()
            .into_iter()
            .filter(|m| m.is_en_passant())
            .collect();
        assert_eq!(ep.len(), 1);
        assert_eq!(ep[0].to(), Square::F6);
    }

    #[test]
    fn test_promotions_queen_first() {
        let pos = Position::from_fen("8/P7/8/8/8/8/8/4K2k w - - 0 1").unwrap();
        let promos: Vec<_> = pos
            .legal_moves()
            .into_iter()
            .filter(|m| m.is_promotion())
            .collect();
        assert_eq!(promos.len(), 4);
        assert_eq!(promos[0].promotion_piece(), Some(PieceType::Queen));
        assert_eq!(promos[3].promotion_piece(), Some(PieceType::Knight));
    }

    #[test]
    fn test_castling_available() {
        let pos = Position::from_fen("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1").unwrap();
        assert_eq!(castles(&pos).len(), 2);
    }

    #[test]
    fn test_castling_blocked() {
        let pos = Position::from_fen("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/RN2K1NR w KQkq - 0 1").unwrap();
        assert!(castles(&pos).is_empty());
    }

    #[test]
    fn test_castling_through_attacked_square() {
        let pos = Position::from_fen("r3k2r/pppppppp/8/8/8/5q2/PPPPP1PP/R3K2R w KQkq - 0 1").unwrap();
        assert!(pos.is_attacked(Square::F1, Color::Black));
        let moves = castles(&pos);
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].kind(), MoveKind::CastleQueenside);
    }

    #[test]
    fn test_queenside_b_file_may_be_attacked() {
        // b1 attacked by the rook on b8 does not stop O-O-O.
        let pos = Position::from_fen("1r2k3/8/8/8/8/8/8/R3K3 w Q - 0 1").unwrap();
        assert_eq!(castles(&pos).len(), 1);
    }

    #[test]
    fn test_no_castling_in_check() {
        let pos = Position::from_fen("4r3/6k1/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
        assert!(pos.in_check());
        assert!(castles(&pos).is_empty());
    }

    #[test]
    fn test_check_evasions_only() {
        let pos = Position::from_fen("7k/8/8/8/8/8/1q6/K7 w - - 0 1").unwrap();
        let moves = pos.legal_moves();
        assert!(!moves.is_empty());
        for mv in moves {
            assert!(!pos.make_move(mv).is_attacked(
                pos.make_move(mv).king_square(Color::White).unwrap(),
                Color::Black
            ));
        }
    }

    #[test]
    fn test_pinned_piece_cannot_move() {
        // Knight on e2 pinned by the rook on e8.
        let pos = Position::from_fen("4r1k1/8/8/8/8/8/4N3/4K3 w - - 0 1").unwrap();
        assert!(pos.legal_moves().iter().all(|m| m.from() != Square::E2));
    }

    #[test]
    fn test_no_moves_in_mate_and_stalemate() {
        let mate =
            Position::from_fen("r1bqkb1r/pppp1Qpp/2n2n2/4p3/2B1P3/8/PPPP1PPP/RNB1K1NR b KQkq - 0 4")
                .unwrap();
        assert!(mate.legal_moves().is_empty());
        assert!(!mate.has_legal_move());

        let stale = Position::from_fen("7k/8/5KQ1/8/8/8/8/8 b - - 0 1").unwrap();
        assert!(stale.legal_moves().is_empty());
        assert!(!stale.in_check());
    }
}
