use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not};

use crate::Square;

/// A set of squares packed into a `u64`, bit 0 = a1 through bit 63 = h8.
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Bitboard(pub u64);

impl Bitboard {
    pub const EMPTY: Bitboard = Bitboard(0);
    pub const FILE_A: Bitboard = Bitboard(0x0101_0101_0101_0101);
    pub const FILE_H: Bitboard = Bitboard(0x8080_8080_8080_8080);
    pub const RANK_1: Bitboard = Bitboard(0x0000_0000_0000_00FF);
    pub const LIGHT_SQUARES: Bitboard = Bitboard(0x55AA_55AA_55AA_55AA);

    /// Mask of the given rank (0 = rank 1).
    #[inline]
    pub const fn rank(rank: u8) -> Bitboard {
        Bitboard(Self::RANK_1.0 << (rank * 8))
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn contains(self, sq: Square) -> bool {
        self.0 & (1u64 << sq.0) != 0
    }

    #[inline]
    pub fn set(&mut self, sq: Square) {
        self.0 |= 1u64 << sq.0;
    }

    #[inline]
    pub fn clear(&mut self, sq: Square) {
        self.0 &= !(1u64 << sq.0);
    }

    #[inline]
    pub const fn popcount(self) -> u32 {
        self.0.count_ones()
    }

    /// Lowest set square.
    #[inline]
    pub const fn lsb(self) -> Option<Square> {
        if self.0 == 0 {
            None
        } else {
            Some(Square(self.0.trailing_zeros() as u8))
        }
    }

    /// Highest set square.
    #[inline]
    pub const fn msb(self) -> Option<Square> {
        if self.0 == 0 {
            None
        } else {
            Some(Square(63 - self.0.leading_zeros() as u8))
        }
    }

    #[inline]
    pub fn iter(self) -> Squares {
        Squares(self.0)
    }
}

/// Iterator over set squares, lowest first.
pub struct Squares(u64);

impl Iterator for Squares {
    type Item = Square;

    #[inline]
    fn next(&mut self) -> Option<Square> {
        if self.0 == 0 {
            return None;
        }
        let sq = Square(self.0.trailing_zeros() as u8);
        self.0 &= self.0 - 1;
        Some(sq)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.0.count_ones() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for Squares {}

impl IntoIterator for Bitboard {
    type Item = Square;
    type IntoIter = Squares;

    fn into_iter(self) -> Squares {
        self.iter()
    }
}

impl FromIterator<Square> for Bitboard {
    fn from_iter<I: IntoIterator<Item = Square>>(iter: I) -> Self {
        let mut bb = Bitboard::EMPTY;
        for sq in iter {
            bb.set(sq);
        }
        bb
    }
}

macro_rules! bit_ops {
    ($($op:ident :: $f:ident, $assign:ident :: $fa:ident => $tok:tt;)*) => {$(
        impl $op for Bitboard {
            type Output = Bitboard;
            #[inline]
            fn $f(self, rhs: Bitboard) -> Bitboard {
                Bitboard(self.0 $tok rhs.0)
            }
        }

        impl $assign for Bitboard {
            #[inline]
            fn $fa(&mut self, rhs: Bitboard) {
                *self = *self $tok rhs;
            }
        }
    )*};
}

bit_ops! {
    BitAnd::bitand, BitAndAssign::bitand_assign => &;
    BitOr::bitor, BitOrAssign::bitor_assign => |;
    BitXor::bitxor, BitXorAssign::bitxor_assign => ^;
}

impl Not for Bitboard {
    type Output = Bitboard;
    #[inline]
    fn not(self) -> Bitboard {
        Bitboard(!self.0)
    }
}

impl fmt::Debug for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bitboard({:#018x})", self.0)
    }
}

impl fmt::Display for Bitboard {
    /// Rank 8 at the top, `x` for set squares.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8).rev() {
            for file in 0..8 {
                let set = Square::from_coords(file, rank).is_some_and(|sq| self.contains(sq));
                write!(f, "{}", if set { 'x' } else { '.' })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bitboard_set_clear() {
        let mut bb = Bitboard::EMPTY;
        assert!(bb.is_empty());
        bb.set(Square::E4);
        bb.set(Square::A1);
        assert!(bb.contains(Square::E4));
        assert_eq!(bb.popcount(), 2);
        bb.clear(Square::E4);
        assert!(!bb.contains(Square::E4));
        assert_eq!(bb.popcount(), 1);
    }

    #[test]
    fn test_bitboard_lsb_msb() {
        let bb: Bitboard = [Square::C3, Square::F7, Square::B2].into_iter().collect();
        assert_eq!(bb.lsb(), Some(Square::B2));
        assert_eq!(bb.msb(), Some(Square::F7));
        assert_eq!(Bitboard::EMPTY.lsb(), None);
    }

    #[test]
    fn test_bitboard_iter_order() {
        let bb = Square::H8.bb() | Square::A1.bb() | Square::D4.bb();
        let squares: Vec<_> = bb.iter().collect();
        assert_eq!(squares, vec![Square::A1, Square::D4, Square::H8]);
        assert_eq!(bb.iter().len(), 3);
    }

    #[test]
    fn test_rank_masks() {
        assert_eq!(Bitboard::rank(0), Bitboard::RANK_1);
        assert!(Bitboard::rank(7).contains(Square::H8));
        assert_eq!(Bitboard::rank(3).popcount(), 8);
        assert!(Bitboard::LIGHT_SQUARES.contains(Square::H1));
        assert!(!Bitboard::LIGHT_SQUARES.contains(Square::A1));
    }

    #[test]
    fn test_bitboard_ops() {
        let a = Square::A1.bb() | Square::B1.bb();
        let b = Square::B1.bb() | Square::C1.bb();
        assert_eq!(a & b, Square::B1.bb());
        assert_eq!((a ^ b).popcount(), 2);
        assert!((!a).contains(Square::C1));
        let mut c = a;
        c &= b;
        assert_eq!(c, Square::B1.bb());
    }
}
