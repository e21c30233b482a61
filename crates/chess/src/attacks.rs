//! Precomputed attack sets.
//!
//! Leapers (pawn, knight, king) use per-square tables. Sliders walk rays:
//! each of the eight directions has a precomputed ray per square, and the
//! first blocker along the ray truncates it.

use std::sync::OnceLock;

use uct_core::Color;

use crate::{Bitboard, Square};

/// Ray directions as (file delta, rank delta). The first four step towards
/// higher square indices, so their nearest blocker is the lowest set bit.
const DIRECTIONS: [(i8, i8); 8] = [
    (0, 1),
    (1, 0),
    (1, 1),
    (-1, 1),
    (0, -1),
    (-1, 0),
    (-1, -1),
    (1, -1),
];

const ORTHOGONAL: [usize; 4] = [0, 1, 4, 5];
const DIAGONAL: [usize; 4] = [2, 3, 6, 7];

const KNIGHT_STEPS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

pub struct AttackTables {
    pawn: [[Bitboard; 64]; 2],
    knight: [Bitboard; 64],
    king: [Bitboard; 64],
    rays: [[Bitboard; 64]; 8],
}

impl AttackTables {
    fn build() -> Self {
        let mut tables = AttackTables {
            pawn: [[Bitboard::EMPTY; 64]; 2],
            knight: [Bitboard::EMPTY; 64],
            king: [Bitboard::EMPTY; 64],
            rays: [[Bitboard::EMPTY; 64]; 8],
        };

        for sq in Square::all() {
            let i = sq.index();
            tables.pawn[Color::White.index()][i] = leaps(sq, &[(-1, 1), (1, 1)]);
            tables.pawn[Color::Black.index()][i] = leaps(sq, &[(-1, -1), (1, -1)]);
            tables.knight[i] = leaps(sq, &KNIGHT_STEPS);
            tables.king[i] = leaps(sq, &DIRECTIONS);

            for (dir, &(df, dr)) in DIRECTIONS.iter().enumerate() {
                let mut ray = Bitboard::EMPTY;
                let mut cur = sq;
                while let Some(next) = cur.offset(df, dr) {
                    ray.set(next);
                    cur = next;
                }
                tables.rays[dir][i] = ray;
            }
        }

        tables
    }

    /// Squares a pawn of `color` on `sq` attacks.
    #[inline]
    pub fn pawn(&self, sq: Square, color: Color) -> Bitboard {
        self.pawn[color.index()][sq.index()]
    }

    #[inline]
    pub fn knight(&self, sq: Square) -> Bitboard {
        self.knight[sq.index()]
    }

    #[inline]
    pub fn king(&self, sq: Square) -> Bitboard {
        self.king[sq.index()]
    }

    #[inline]
    pub fn rook(&self, sq: Square, occupied: Bitboard) -> Bitboard {
        self.slide(sq, occupied, &ORTHOGONAL)
    }

    #[inline]
    pub fn bishop(&self, sq: Square, occupied: Bitboard) -> Bitboard {
        self.slide(sq, occupied, &DIAGONAL)
    }

    #[inline]
    pub fn queen(&self, sq: Square, occupied: Bitboard) -> Bitboard {
        self.rook(sq, occupied) | self.bishop(sq, occupied)
    }

    fn slide(&self, sq: Square, occupied: Bitboard, dirs: &[usize]) -> Bitboard {
        let mut attacks = Bitboard::EMPTY;
        for &dir in dirs {
            let ray = self.rays[dir][sq.index()];
            let blockers = ray & occupied;
            let nearest = if dir < 4 { blockers.lsb() } else { blockers.msb() };
            attacks |= match nearest {
                // Keep the blocker itself, drop everything behind it.
                Some(b) => ray ^ self.rays[dir][b.index()],
                None => ray,
            };
        }
        attacks
    }
}

fn leaps(sq: Square, steps: &[(i8, i8)]) -> Bitboard {
    steps
        .iter()
        .filter_map(|&(df, dr)| sq.offset(df, dr))
        .collect()
}

static TABLES: OnceLock<AttackTables> = OnceLock::new();

/// Shared attack tables, built on first use.
pub fn attacks() -> &'static AttackTables {
    TABLES.get_or_init(AttackTables::build)
}
