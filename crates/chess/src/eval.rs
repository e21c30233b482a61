//! Static evaluation: material, piece-square tables, development and center
//! occupation, in centipawns.

use uct_core::Color;

use crate::piece::Side;
use crate::{PieceType, Position, Square};

const DEVELOPMENT_BONUS: i32 = 10;
const CENTER_BONUS: i32 = 15;

// Tables are laid out as the owner sees the board: row 0 is the far rank,
// row 7 the owner's home rank.
type Table = [[i32; 8]; 8];

const PAWN: Table = [
    [0, 0, 0, 0, 0, 0, 0, 0],
    [50, 50, 50, 50, 50, 50, 50, 50],
    [10, 10, 20, 30, 30, 20, 10, 10],
    [5, 5, 10, 25, 25, 10, 5, 5],
    [0, 0, 0, 20, 20, 0, 0, 0],
    [5, -5, -10, 0, 0, -10, -5, 5],
    [5, 10, 10, -20, -20, 10, 10, 5],
    [0, 0, 0, 0, 0, 0, 0, 0],
];

const KNIGHT: Table = [
    [-50, -40, -30, -30, -30, -30, -40, -50],
    [-40, -20, 0, 0, 0, 0, -20, -40],
    [-30, 0, 10, 15, 15, 10, 0, -30],
    [-30, 5, 15, 20, 20, 15, 5, -30],
    [-30, 0, 15, 20, 20, 15, 0, -30],
    [-30, 5, 10, 15, 15, 10, 5, -30],
    [-40, -20, 0, 5, 5, 0, -20, -40],
    [-50, -40, -30, -30, -30, -30, -40, -50],
];

const BISHOP: Table = [
    [-20, -10, -10, -10, -10, -10, -10, -20],
    [-10, 0, 0, 0, 0, 0, 0, -10],
    [-10, 0, 5, 10, 10, 5, 0, -10],
    [-10, 5, 5, 10, 10, 5, 5, -10],
    [-10, 0, 10, 10, 10, 10, 0, -10],
    [-10, 10, 10, 10, 10, 10, 10, -10],
    [-10, 5, 0, 0, 0, 0, 5, -10],
    [-20, -10, -10, -10, -10, -10, -10, -20],
];

const ROOK: Table = [
    [0, 0, 0, 0, 0, 0, 0, 0],
    [5, 10, 10, 10, 10, 10, 10, 5],
    [-5, 0, 0, 0, 0, 0, 0, -5],
    [-5, 0, 0, 0, 0, 0, 0, -5],
    [-5, 0, 0, 0, 0, 0, 0, -5],
    [-5, 0, 0, 0, 0, 0, 0, -5],
    [-5, 0, 0, 0, 0, 0, 0, -5],
    [0, 0, 0, 5, 5, 0, 0, 0],
];

const QUEEN: Table = [
    [-20, -10, -10, -5, -5, -10, -10, -20],
    [-10, 0, 0, 0, 0, 0, 0, -10],
    [-10, 0, 5, 5, 5, 5, 0, -10],
    [-5, 0, 5, 5, 5, 5, 0, -5],
    [0, 0, 5, 5, 5, 5, 0, -5],
    [-10, 5, 5, 5, 5, 5, 0, -10],
    [-10, 0, 5, 0, 0, 0, 0, -10],
    [-20, -10, -10, -5, -5, -10, -10, -20],
];

const KING: Table = [
    [-30, -40, -40, -50, -50, -40, -40, -30],
    [-30, -40, -40, -50, -50, -40, -40, -30],
    [-30, -40, -40, -50, -50, -40, -40, -30],
    [-30, -40, -40, -50, -50, -40, -40, -30],
    [-20, -30, -30, -40, -40, -30, -30, -20],
    [-10, -20, -20, -20, -20, -20, -20, -10],
    [20, 20, 0, 0, 0, 0, 20, 20],
    [20, 30, 10, 0, 0, 10, 30, 20],
];

fn table(kind: PieceType) -> &'static Table {
    match kind {
        PieceType::Pawn => &PAWN,
        PieceType::Knight => &KNIGHT,
        PieceType::Bishop => &BISHOP,
        PieceType::Rook => &ROOK,
        PieceType::Queen => &QUEEN,
        PieceType::King => &KING,
    }
}

/// Placement bonus for a `kind` of `color` standing on `sq`.
fn placement(kind: PieceType, color: Color, sq: Square) -> i32 {
    let row = match color {
        Color::White => 7 - sq.rank(),
        Color::Black => sq.rank(),
    };
    let mut bonus = table(kind)[row as usize][sq.file() as usize];

    let developed = matches!(kind, PieceType::Knight | PieceType::Bishop)
        && sq.rank() != color.home_rank();
    if developed {
        bonus += DEVELOPMENT_BONUS;
    }
    if (2..=5).contains(&sq.file()) && (2..=5).contains(&sq.rank()) {
        bonus += CENTER_BONUS;
    }
    bonus
}

/// Score of one side: material plus placement.
pub fn side_score(pos: &Position, color: Color) -> i32 {
    PieceType::ALL
        .into_iter()
        .flat_map(|kind| pos.pieces(color, kind).iter().map(move |sq| (kind, sq)))
        .map(|(kind, sq)| kind.value() + placement(kind, color, sq))
        .sum()
}

/// White's score minus Black's, in centipawns.
pub fn evaluate(pos: &Position) -> i32 {
    side_score(pos, Color::White) - side_score(pos, Color::Black)
}

/// Evaluation from the side to move's point of view.
pub fn evaluate_for_side_to_move(pos: &Position) -> i32 {
    match pos.side_to_move() {
        Color::White => evaluate(pos),
        Color::Black => -evaluate(pos),
    }
}
