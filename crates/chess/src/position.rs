//! Board state: piece placement, side to move, castling rights, en passant
//! target and the two move clocks.
//!
//! A [`Position`] is never mutated by play; [`Position::make_move`] returns
//! the successor.

use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use uct_core::{ChessError, Color, DrawRule, Outcome, Result};

use crate::piece::Side;
use crate::{attacks, Bitboard, Move, MoveKind, Piece, PieceType, Square};

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CastleSide {
    Kingside,
    Queenside,
}

/// Four castling flags packed into the low bits of a byte.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Debug)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const NONE: Self = Self(0);
    pub const ALL: Self = Self(0b1111);

    const fn bit(color: Color, side: CastleSide) -> u8 {
        match (color, side) {
            (Color::White, CastleSide::Kingside) => 0b0001,
            (Color::White, CastleSide::Queenside) => 0b0010,
            (Color::Black, CastleSide::Kingside) => 0b0100,
            (Color::Black, CastleSide::Queenside) => 0b1000,
        }
    }

    #[inline]
    pub const fn allows(self, color: Color, side: CastleSide) -> bool {
        self.0 & Self::bit(color, side) != 0
    }

    pub fn grant(&mut self, color: Color, side: CastleSide) {
        self.0 |= Self::bit(color, side);
    }

    /// Drop every right tied to `sq`: a king's home square or a rook's corner.
    fn touch(&mut self, sq: Square) {
        let lost = match sq {
            Square::E1 => 0b0011,
            Square::H1 => 0b0001,
            Square::A1 => 0b0010,
            Square::E8 => 0b1100,
            Square::H8 => 0b0100,
            Square::A8 => 0b1000,
            _ => 0,
        };
        self.0 &= !lost;
    }

    fn parse(s: &str) -> Option<Self> {
        if s == "-" {
            return Some(Self::NONE);
        }
        let mut rights = Self::NONE;
        for c in s.chars() {
            let (color, side) = match c {
                'K' => (Color::White, CastleSide::Kingside),
                'Q' => (Color::White, CastleSide::Queenside),
                'k' => (Color::Black, CastleSide::Kingside),
                'q' => (Color::Black, CastleSide::Queenside),
                _ => return None,
            };
            rights.grant(color, side);
        }
        Some(rights)
    }
}

impl fmt::Display for CastlingRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            return f.write_str("-");
        }
        for (color, side, c) in [
            (Color::White, CastleSide::Kingside, 'K'),
            (Color::White, CastleSide::Queenside, 'Q'),
            (Color::Black, CastleSide::Kingside, 'k'),
            (Color::Black, CastleSide::Queenside, 'q'),
        ] {
            if self.allows(color, side) {
                write!(f, "{}", c)?;
            }
        }
        Ok(())
    }
}

#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Position {
    kinds: [Bitboard; 6],
    colors: [Bitboard; 2],
    side: Color,
    castling: CastlingRights,
    en_passant: Option<Square>,
    halfmove_clock: u16,
    fullmove_number: u16,
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}

impl Position {
    fn empty(side: Color) -> Self {
        Position {
            kinds: [Bitboard::EMPTY; 6],
            colors: [Bitboard::EMPTY; 2],
            side,
            castling: CastlingRights::NONE,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// The standard initial position.
    pub fn startpos() -> Self {
        use PieceType::*;
        const BACK_RANK: [PieceType; 8] = [Rook, Knight, Bishop, Queen, King, Bishop, Knight, Rook];

        let mut pos = Position::empty(Color::White);
        for (file, &kind) in BACK_RANK.iter().enumerate() {
            let file = file as u8;
            pos.put(Square(file), Piece::new(Color::White, kind));
            pos.put(Square(8 + file), Piece::new(Color::White, Pawn));
            pos.put(Square(48 + file), Piece::new(Color::Black, Pawn));
            pos.put(Square(56 + file), Piece::new(Color::Black, kind));
        }
        pos.castling = CastlingRights::ALL;
        pos
    }

    /// Parse Forsyth-Edwards Notation. The two clocks may be omitted.
    pub fn from_fen(fen: &str) -> Result<Self> {
        let bad = |why: &str| ChessError::InvalidFen(format!("{} in '{}'", why, fen));
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if !(4..=6).contains(&fields.len()) {
            return Err(bad("expected 4 to 6 fields"));
        }

        let side = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            _ => return Err(bad("side to move must be 'w' or 'b'")),
        };
        let mut pos = Position::empty(side);

        let ranks: Vec<&str> = fields[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(bad("placement must have 8 ranks"));
        }
        for (i, row) in ranks.iter().enumerate() {
            let rank = 7 - i as u8;
            let mut file = 0u8;
            for c in row.chars() {
                if let Some(skip) = c.to_digit(10).filter(|d| (1..=8).contains(d)) {
                    file += skip as u8;
                    if file > 8 {
                        return Err(bad("rank too long"));
                    }
                } else {
                    let piece = Piece::from_fen_char(c).ok_or_else(|| bad("unknown piece"))?;
                    let sq = Square::from_coords(file, rank).ok_or_else(|| bad("rank too long"))?;
                    pos.put(sq, piece);
                    file += 1;
                }
            }
            if file != 8 {
                return Err(bad("rank does not cover 8 files"));
            }
        }

        pos.castling = CastlingRights::parse(fields[2]).ok_or_else(|| bad("bad castling field"))?;
        pos.en_passant = match fields[3] {
            "-" => None,
            s => Some(s.parse().map_err(|_| bad("bad en passant square"))?),
        };
        if let Some(clock) = fields.get(4) {
            pos.halfmove_clock = clock.parse().map_err(|_| bad("bad halfmove clock"))?;
        }
        if let Some(number) = fields.get(5) {
            pos.fullmove_number = number.parse().map_err(|_| bad("bad fullmove number"))?;
        }

        pos.validate().map_err(|why| bad(&why))?;
        Ok(pos)
    }

    pub fn to_fen(&self) -> String {
        let mut placement = String::with_capacity(64);
        for rank in (0..8u8).rev() {
            let mut gap = 0;
            for file in 0..8u8 {
                match self.piece_at(Square(rank * 8 + file)) {
                    Some(piece) => {
                        if gap > 0 {
                            placement.push_str(&gap.to_string());
                            gap = 0;
                        }
                        placement.push(piece.fen_char());
                    }
                    None => gap += 1,
                }
            }
            if gap > 0 {
                placement.push_str(&gap.to_string());
            }
            if rank > 0 {
                placement.push('/');
            }
        }

        let side = match self.side {
            Color::White => 'w',
            Color::Black => 'b',
        };
        let ep = self
            .en_passant
            .map_or_else(|| "-".to_string(), |sq| sq.to_string());
        format!(
            "{} {} {} {} {} {}",
            placement, side, self.castling, ep, self.halfmove_clock, self.fullmove_number
        )
    }

    fn validate(&self) -> std::result::Result<(), String> {
        for color in Color::ALL {
            let kings = self.pieces(color, PieceType::King).popcount();
            if kings != 1 {
                return Err(format!("{} has {} kings", color, kings));
            }
        }
        let edge_ranks = Bitboard::rank(0) | Bitboard::rank(7);
        if !(self.kinds[PieceType::Pawn.index()] & edge_ranks).is_empty() {
            return Err("pawn on first or last rank".to_string());
        }
        if self.in_check_color(self.side.opposite()) {
            return Err("side not to move is in check".to_string());
        }
        Ok(())
    }

    fn put(&mut self, sq: Square, piece: Piece) {
        self.kinds[piece.kind.index()].set(sq);
        self.colors[piece.color.index()].set(sq);
    }

    fn lift(&mut self, sq: Square) -> Option<Piece> {
        let piece = self.piece_at(sq)?;
        self.kinds[piece.kind.index()].clear(sq);
        self.colors[piece.color.index()].clear(sq);
        Some(piece)
    }

    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        let color = Color::ALL
            .into_iter()
            .find(|c| self.colors[c.index()].contains(sq))?;
        let kind = PieceType::ALL
            .into_iter()
            .find(|k| self.kinds[k.index()].contains(sq))?;
        Some(Piece::new(color, kind))
    }

    #[inline]
    pub fn pieces(&self, color: Color, kind: PieceType) -> Bitboard {
        self.kinds[kind.index()] & self.colors[color.index()]
    }

    #[inline]
    pub fn by_color(&self, color: Color) -> Bitboard {
        self.colors[color.index()]
    }

    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.colors[0] | self.colors[1]
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side
    }

    #[inline]
    pub fn castling(&self) -> CastlingRights {
        self.castling
    }

    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u16 {
        self.halfmove_clock
    }

    #[inline]
    pub fn fullmove_number(&self) -> u16 {
        self.fullmove_number
    }

    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces(color, PieceType::King).lsb()
    }

    /// Whether any piece of `by` attacks `sq`.
    pub fn is_attacked(&self, sq: Square, by: Color) -> bool {
        let t = attacks();
        let occ = self.occupied();
        let queens = self.pieces(by, PieceType::Queen);
        let hits = (t.pawn(sq, by.opposite()) & self.pieces(by, PieceType::Pawn))
            | (t.knight(sq) & self.pieces(by, PieceType::Knight))
            | (t.king(sq) & self.pieces(by, PieceType::King))
            | (t.bishop(sq, occ) & (self.pieces(by, PieceType::Bishop) | queens))
            | (t.rook(sq, occ) & (self.pieces(by, PieceType::Rook) | queens));
        !hits.is_empty()
    }

    fn in_check_color(&self, color: Color) -> bool {
        self.king_square(color)
            .is_some_and(|k| self.is_attacked(k, color.opposite()))
    }

    /// Whether the side to move is in check.
    pub fn in_check(&self) -> bool {
        self.in_check_color(self.side)
    }

    /// Play `mv` and return the resulting position.
    ///
    /// `mv` must come from [`Position::legal_moves`] of this position; other
    /// moves give an unspecified (but memory-safe) result.
    pub fn make_move(&self, mv: Move) -> Position {
        let mut next = self.clone();
        let us = self.side;
        let (from, to) = (mv.from(), mv.to());

        next.en_passant = None;
        next.halfmove_clock = self.halfmove_clock.saturating_add(1);

        let captured_on = if mv.is_en_passant() {
            Square::from_coords(to.file(), from.rank())
        } else {
            Some(to)
        };
        if captured_on.and_then(|sq| next.lift(sq)).is_some() {
            next.halfmove_clock = 0;
        }

        if let Some(piece) = next.lift(from) {
            let placed = mv.promotion_piece().map_or(piece, |kind| Piece::new(us, kind));
            next.put(to, placed);

            if piece.kind == PieceType::Pawn {
                next.halfmove_clock = 0;
                if mv.kind() == MoveKind::DoublePawnPush {
                    next.en_passant = Square::from_coords(from.file(), (from.rank() + to.rank()) / 2);
                }
            }
        }

        let home = us.home_rank();
        let rook_hop = match mv.kind() {
            MoveKind::CastleKingside => Some((7, 5)),
            MoveKind::CastleQueenside => Some((0, 3)),
            _ => None,
        };
        if let Some((rook_from, rook_to)) = rook_hop {
            if let (Some(src), Some(dst)) = (
                Square::from_coords(rook_from, home),
                Square::from_coords(rook_to, home),
            ) {
                if let Some(rook) = next.lift(src) {
                    next.put(dst, rook);
                }
            }
        }

        next.castling.touch(from);
        next.castling.touch(to);

        if us == Color::Black {
            next.fullmove_number = self.fullmove_number.saturating_add(1);
        }
        next.side = us.opposite();
        next
    }

    /// How the game ended, or `None` if the side to move can still play.
    ///
    /// Checkmate and stalemate take precedence over the draw rules.
    pub fn outcome(&self) -> Option<Outcome> {
        if !self.has_legal_move() {
            return Some(if self.in_check() {
                Outcome::Checkmate {
                    winner: self.side.opposite(),
                }
            } else {
                Outcome::Stalemate
            });
        }
        if self.halfmove_clock >= 100 {
            return Some(Outcome::DrawByRule {
                rule: DrawRule::FiftyMoveRule,
            });
        }
        if self.is_insufficient_material() {
            return Some(Outcome::DrawByRule {
                rule: DrawRule::InsufficientMaterial,
            });
        }
        None
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.outcome().is_some()
    }

    /// Neither side can possibly deliver mate: bare kings, a single minor
    /// piece, or only bishops that all stand on one square color.
    pub fn is_insufficient_material(&self) -> bool {
        let heavy = self.kinds[PieceType::Pawn.index()]
            | self.kinds[PieceType::Rook.index()]
            | self.kinds[PieceType::Queen.index()];
        if !heavy.is_empty() {
            return false;
        }
        let knights = self.kinds[PieceType::Knight.index()].popcount();
        let bishops = self.kinds[PieceType::Bishop.index()];
        match (knights, bishops.popcount()) {
            (0, 0) | (1, 0) | (0, 1) => true,
            (0, _) => {
                let light = bishops & Bitboard::LIGHT_SQUARES;
                light.is_empty() || light == bishops
            }
            _ => false,
        }
    }

    /// Material of `color` in centipawns, kings excluded.
    pub fn material(&self, color: Color) -> i32 {
        PieceType::ALL
            .into_iter()
            .filter(|&k| k != PieceType::King)
            .map(|k| self.pieces(color, k).popcount() as i32 * k.value())
            .sum()
    }
}

impl fmt::Display for Position {
    /// Board diagram from White's side, followed by the FEN.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8u8).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..8u8 {
                let c = self
                    .piece_at(Square(rank * 8 + file))
                    .map_or('.', Piece::fen_char);
                write!(f, " {}", c)?;
            }
            writeln!(f)?;
        }
        writeln!(f, "   a b c d e f g h")?;
        write!(f, "{}", self.to_fen())
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Position(\"{}\")", self.to_fen())
    }
}

impl Serialize for Position {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_fen())
    }
}

impl<'de> Deserialize<'de> for Position {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let fen = String::deserialize(deserializer)?;
        Position::from_fen(&fen).map_err(de::Error::custom)
    }
}
