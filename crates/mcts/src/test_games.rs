//! Small games for exercising the search without chess-sized trees.

use std::convert::Infallible;
use std::fmt;

use uct_core::{Color, Oracle, Outcome};

/// Players alternately add 1 or 2 to a counter; whoever reaches exactly 5 wins.
/// The first player wins with correct play by moving to 2.
#[derive(Clone, Copy, Debug, Default)]
pub struct RaceToFive;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RaceBoard {
    pub count: u8,
    pub to_move: Color,
}

impl Default for RaceBoard {
    fn default() -> Self {
        Self {
            count: 0,
            to_move: Color::White,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Add(pub u8);

impl fmt::Display for Add {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "+{}", self.0)
    }
}

impl Oracle for RaceToFive {
    type Board = RaceBoard;
    type Move = Add;
    type Promotion = Infallible;

    fn side_to_move(&self, board: &RaceBoard) -> Color {
        board.to_move
    }

    fn legal_moves(&self, board: &RaceBoard) -> Vec<Add> {
        if board.count >= 5 {
            return Vec::new();
        }
        [Add(1), Add(2)]
            .into_iter()
            .filter(|a| board.count + a.0 <= 5)
            .collect()
    }

    fn apply_move(&self, board: &RaceBoard, mv: Add) -> RaceBoard {
        RaceBoard {
            count: board.count + mv.0,
            to_move: board.to_move.opposite(),
        }
    }

    fn is_terminal(&self, board: &RaceBoard) -> Option<Outcome> {
        (board.count >= 5).then(|| Outcome::Checkmate {
            winner: board.to_move.opposite(),
        })
    }

    fn is_promotion_eligible(&self, _mv: Add, _board: &RaceBoard) -> bool {
        false
    }

    fn is_check(&self, _board: &RaceBoard) -> bool {
        false
    }

    fn promotion_of(&self, _mv: Add) -> Option<Infallible> {
        None
    }

    fn with_promotion(&self, _mv: Add, piece: Infallible) -> Add {
        match piece {}
    }
}
