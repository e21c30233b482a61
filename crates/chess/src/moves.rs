//! Chess moves.
//!
//! A [`Move`] carries its origin, destination, optional promotion piece and a
//! [`MoveKind`] describing how the board changes. Generated moves always have
//! the right kind; moves typed in by a player (see [`Move::request`]) carry
//! only squares and are matched against the generated list.

use std::fmt;
use std::str::FromStr;

use uct_core::ChessError;

use crate::{PieceType, Square};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum MoveKind {
    Quiet,
    DoublePawnPush,
    Capture,
    EnPassant,
    CastleKingside,
    CastleQueenside,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    from: Square,
    to: Square,
    promotion: Option<PieceType>,
    kind: MoveKind,
}

impl Move {
    #[inline]
    pub const fn new(from: Square, to: Square, kind: MoveKind) -> Self {
        Move {
            from,
            to,
            promotion: None,
            kind,
        }
    }

    #[inline]
    pub const fn quiet(from: Square, to: Square) -> Self {
        Self::new(from, to, MoveKind::Quiet)
    }

    #[inline]
    pub const fn capture(from: Square, to: Square) -> Self {
        Self::new(from, to, MoveKind::Capture)
    }

    #[inline]
    pub const fn promotion(from: Square, to: Square, piece: PieceType, capture: bool) -> Self {
        Move {
            from,
            to,
            promotion: Some(piece),
            kind: if capture {
                MoveKind::Capture
            } else {
                MoveKind::Quiet
            },
        }
    }

    /// A move as a player names it: squares and an optional promotion piece.
    pub const fn request(from: Square, to: Square, promotion: Option<PieceType>) -> Self {
        Move {
            from,
            to,
            promotion,
            kind: MoveKind::Quiet,
        }
    }

    #[inline]
    pub const fn from(self) -> Square {
        self.from
    }

    #[inline]
    pub const fn to(self) -> Square {
        self.to
    }

    #[inline]
    pub const fn kind(self) -> MoveKind {
        self.kind
    }

    #[inline]
    pub const fn promotion_piece(self) -> Option<PieceType> {
        self.promotion
    }

    #[inline]
    pub const fn is_promotion(self) -> bool {
        self.promotion.is_some()
    }

    #[inline]
    pub const fn is_capture(self) -> bool {
        matches!(self.kind, MoveKind::Capture | MoveKind::EnPassant)
    }

    #[inline]
    pub const fn is_en_passant(self) -> bool {
        matches!(self.kind, MoveKind::EnPassant)
    }

    #[inline]
    pub const fn is_castle(self) -> bool {
        matches!(
            self.kind,
            MoveKind::CastleKingside | MoveKind::CastleQueenside
        )
    }

    /// Same squares and kind with `piece` as the promotion.
    #[inline]
    pub const fn with_promotion(self, piece: PieceType) -> Self {
        Move {
            promotion: Some(piece),
            ..self
        }
    }

    /// Whether `self`, a generated move, is what `requested` names.
    ///
    /// Squares must agree; a request without a promotion piece matches any
    /// promotion choice.
    pub fn answers(self, requested: Move) -> bool {
        self.from == requested.from
            && self.to == requested.to
            && (requested.promotion.is_none() || self.promotion == requested.promotion)
    }
}

impl FromStr for Move {
    type Err = ChessError;

    /// Parses long algebraic (UCI) notation into a request: `e2e4`, `e7e8q`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if !(4..=5).contains(&s.len()) || !s.is_ascii() {
            return Err(ChessError::InvalidMove(s.to_string()));
        }
        let from: Square = s[0..2].parse()?;
        let to: Square = s[2..4].parse()?;
        let promotion = match s[4..].chars().next() {
            None => None,
            Some(c) => match PieceType::from_letter(c) {
                Some(pt) if pt.is_promotion_choice() => Some(pt),
                _ => return Err(ChessError::InvalidMove(s.to_string())),
            },
        };
        Ok(Move::request(from, to, promotion))
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(pt) = self.promotion {
            write!(f, "{}", pt.letter())?;
        }
        Ok(())
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({} {:?})", self, self.kind)
    }
}
