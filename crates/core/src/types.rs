//! Domain types with enforced invariants.
//!
//! - Color: the two sides, alternating strictly between applied moves
//! - Outcome: how a finished game ended
//! - Reward: playout result or evaluation in range [-1, 1]

use std::fmt;

use serde::{Deserialize, Serialize};

/// A side in the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White = 0,
    Black = 1,
}

impl Color {
    pub const ALL: [Color; 2] = [Color::White, Color::Black];

    #[inline]
    pub const fn opposite(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Index for table lookups (0 for White, 1 for Black).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}

/// The rule that ended a drawn game other than stalemate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawRule {
    FiftyMoveRule,
    InsufficientMaterial,
}

/// Final result of a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    Checkmate { winner: Color },
    Stalemate,
    DrawByRule { rule: DrawRule },
    Resignation { winner: Color },
}

impl Outcome {
    /// The winning side, or `None` for a draw.
    pub fn winner(self) -> Option<Color> {
        match self {
            Outcome::Checkmate { winner } | Outcome::Resignation { winner } => Some(winner),
            Outcome::Stalemate | Outcome::DrawByRule { .. } => None,
        }
    }

    pub fn is_draw(self) -> bool {
        self.winner().is_none()
    }

    /// Score of this outcome from `color`'s point of view.
    pub fn reward_for(self, color: Color) -> Reward {
        match self.winner() {
            Some(winner) if winner == color => Reward::WIN,
            Some(_) => Reward::LOSS,
            None => Reward::DRAW,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Checkmate { winner } => write!(f, "{} wins by checkmate", winner),
            Outcome::Stalemate => write!(f, "draw by stalemate"),
            Outcome::DrawByRule {
                rule: DrawRule::FiftyMoveRule,
            } => write!(f, "draw by the fifty-move rule"),
            Outcome::DrawByRule {
                rule: DrawRule::InsufficientMaterial,
            } => write!(f, "draw by insufficient material"),
            Outcome::Resignation { winner } => write!(f, "{} wins by resignation", winner),
        }
    }
}

/// A playout result or position evaluation.
///
/// Invariant: Reward is in range [-1, 1] where:
/// - +1 means the side it is scored for has won
/// - -1 means that side has lost
/// - 0 means a draw or an equal position
///
/// # Example
/// ```
/// use uct_core::Reward;
///
/// let reward = Reward::clamped(0.5);
/// assert_eq!(reward.negate().get(), -0.5);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct Reward(f32);

impl Reward {
    /// Reward for a win.
    pub const WIN: Self = Self(1.0);

    /// Reward for a loss.
    pub const LOSS: Self = Self(-1.0);

    /// Reward for a draw.
    pub const DRAW: Self = Self(0.0);

    /// Create a reward by clamping to [-1, 1].
    pub fn clamped(value: f32) -> Self {
        Self(value.clamp(-1.0, 1.0))
    }

    /// Squash an unbounded score into (-1, 1) with `tanh(score / scale)`.
    pub fn squashed(score: f32, scale: f32) -> Self {
        Self::clamped((score / scale).tanh())
    }

    #[inline]
    pub fn get(self) -> f32 {
        self.0
    }

    /// The same result seen from the other side.
    #[inline]
    pub fn negate(self) -> Self {
        Self(-self.0)
    }
}

impl fmt::Display for Reward {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}", self.0)
    }
}
