//! Random playouts used to score newly expanded nodes.

use rand::Rng;
use uct_core::{Oracle, Reward};

use crate::config::{Cutoff, MctsConfig};

/// Plays uniformly random legal moves until the game ends or the ply cap hits.
#[derive(Clone, Copy, Debug)]
pub struct RandomPlayout {
    max_plies: u32,
    cutoff: Cutoff,
}

impl RandomPlayout {
    pub fn new(max_plies: u32, cutoff: Cutoff) -> Self {
        Self { max_plies, cutoff }
    }

    pub fn from_config(config: &MctsConfig) -> Self {
        Self::new(config.max_playout_plies, config.cutoff)
    }

    /// Play out from `board` and score the result for the side to move on `board`.
    pub fn run<O, R>(&self, oracle: &O, board: &O::Board, rng: &mut R) -> Reward
    where
        O: Oracle,
        R: Rng + ?Sized,
    {
        let perspective = oracle.side_to_move(board);
        let mut current = board.clone();

        for _ in 0..self.max_plies {
            if let Some(outcome) = oracle.is_terminal(&current) {
                return outcome.reward_for(perspective);
            }
            let moves = oracle.legal_moves(&current);
            if moves.is_empty() {
                // The oracle did not report an outcome for a stuck position.
                return Reward::DRAW;
            }
            let mv = moves[rng.gen_range(0..moves.len())];
            current = oracle.apply_move(&current, mv);
        }

        if let Some(outcome) = oracle.is_terminal(&current) {
            return outcome.reward_for(perspective);
        }
        match self.cutoff {
            Cutoff::Draw => Reward::DRAW,
            Cutoff::Evaluation => {
                let score = oracle.evaluate(&current);
                if oracle.side_to_move(&current) == perspective {
                    score
                } else {
                    score.negate()
                }
            }
        }
    }
}
