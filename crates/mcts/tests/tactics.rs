//! Tactical positions the search must solve with a modest budget.

use uct_chess::{Chess, Move, Position};
use uct_mcts::{Cutoff, Mcts, MctsConfig, SearchBudget};

fn best_move(fen: &str, config: MctsConfig, iterations: u32, seed: u64) -> String {
    let board = Position::from_fen(fen).unwrap();
    let mut mcts = Mcts::seeded(config, seed);
    mcts.select_move(&Chess, &board, SearchBudget::iterations(iterations))
        .unwrap()
        .to_string()
}

#[test]
fn test_back_rank_mate() {
    let config = MctsConfig::with_playout_cap(40);
    for seed in [1, 2, 3] {
        assert_eq!(best_move("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1", config.clone(), 800, seed), "a1a8");
    }
}

#[test]
fn test_scholars_mate() {
    // Qxf7# is one of several captures available.
    let fen = "r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 4 4";
    assert_eq!(best_move(fen, MctsConfig::with_playout_cap(40), 1500, 4), "h5f7");
}

#[test]
fn test_mate_by_promotion() {
    // b8=Q# and b8=R# both mate; the queen comes first in move order.
    let fen = "7k/1P4pp/8/8/8/8/8/K7 w - - 0 1";
    let board = Position::from_fen(fen).unwrap();
    let mut mcts = Mcts::seeded(MctsConfig::with_playout_cap(40), 6);
    let mv: Move = mcts
        .select_move(&Chess, &board, SearchBudget::iterations(400))
        .unwrap();
    assert_eq!(mv.to_string(), "b7b8q");
}

#[test]
fn test_takes_hanging_queen() {
    let config = MctsConfig {
        max_playout_plies: 8,
        cutoff: Cutoff::Evaluation,
        ..Default::default()
    };
    assert_eq!(best_move("4k3/8/8/3q4/8/8/3R4/4K3 w - - 0 1", config, 1500, 10), "d2d5");
}

#[test]
fn test_only_move() {
    // Kxg2 is the only legal reply to the check.
    for iterations in [0, 1, 50] {
        assert_eq!(
            best_move("7k/8/8/8/8/8/6q1/7K w - - 0 1", MctsConfig::default(), iterations, 0),
            "h1g2"
        );
    }
}
