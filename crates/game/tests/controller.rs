//! End-to-end games through the controller.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use uct_chess::{Chess, Move, Piece, PieceType, Position, Square};
use uct_core::{ChessError, Color, Outcome};
use uct_game::{GameConfig, GameController, TurnPhase};
use uct_mcts::{Mcts, MctsConfig, SearchBudget};

type Game = GameController<Chess, ChaCha8Rng>;

fn game(fen: &str, config: GameConfig, seed: u64) -> Game {
    let engine = Mcts::new(
        MctsConfig::with_playout_cap(40),
        ChaCha8Rng::seed_from_u64(seed),
    );
    GameController::new(Chess, Position::from_fen(fen).unwrap(), config, engine)
}

fn uci(s: &str) -> Move {
    s.parse().unwrap()
}

#[test]
fn test_e2e4_hands_turn_to_engine() {
    let mut game = game(uct_chess::START_FEN, GameConfig::default(), 1);
    assert!(Position::startpos()
        .legal_moves()
        .iter()
        .any(|m| m.to_string() == "e2e4"));

    let phase = game.submit_human_move(uci("e2e4")).unwrap();
    assert_eq!(phase, &TurnPhase::AwaitingEngineMove);
    assert_eq!(game.current_board().side_to_move(), Color::Black);
    assert_eq!(game.history().len(), 1);
    assert_eq!(game.history()[0].to_string(), "e2e4");
    assert!(game.history()[0].answers(uci("e2e4")));
}

#[test]
fn test_engine_replies_and_returns_turn() {
    let mut game = game(uct_chess::START_FEN, GameConfig::default(), 2);
    game.submit_human_move(uci("e2e4")).unwrap();

    let reply = game.request_engine_ply(SearchBudget::iterations(50)).unwrap();
    assert_eq!(game.current_phase(), &TurnPhase::AwaitingHumanMove);
    assert_eq!(game.current_board().side_to_move(), Color::White);
    assert_eq!(game.history().len(), 2);
    assert_eq!(game.history()[1], reply);
}

#[test]
fn test_engine_ply_out_of_turn() {
    let mut game = game(uct_chess::START_FEN, GameConfig::default(), 3);
    let err = game.request_engine_ply(SearchBudget::iterations(10)).unwrap_err();
    assert!(matches!(err, ChessError::UnexpectedEvent { .. }));
    assert_eq!(game.ply_count(), 0);
    assert_eq!(game.current_board(), &Position::startpos());
}

#[test]
fn test_zero_budget_engine_plays_first_move() {
    let mut game = game(uct_chess::START_FEN, GameConfig::human(Color::Black), 4);
    let mv = game.request_engine_ply(SearchBudget::iterations(0)).unwrap();
    assert_eq!(mv.to_string(), "a2a3");
    assert_eq!(game.current_phase(), &TurnPhase::AwaitingHumanMove);
}

#[test]
fn test_human_mate_ends_game() {
    let mut game = game("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1", GameConfig::default(), 5);
    game.submit_human_move(uci("a1a8")).unwrap();
    let mate = Outcome::Checkmate {
        winner: Color::White,
    };
    assert_eq!(game.current_phase(), &TurnPhase::GameOver(mate));
    assert_eq!(game.outcome(), Some(mate));
}

#[test]
fn test_engine_mate_ends_game() {
    let mut game = game("r5k1/8/8/8/8/8/5PPP/6K1 b - - 0 1", GameConfig::default(), 6);
    assert_eq!(game.current_phase(), &TurnPhase::AwaitingEngineMove);

    let mv = game.request_engine_ply(SearchBudget::iterations(800)).unwrap();
    assert_eq!(mv.to_string(), "a8a1");
    assert_eq!(
        game.current_phase(),
        &TurnPhase::GameOver(Outcome::Checkmate {
            winner: Color::Black
        })
    );
}

#[test]
fn test_game_over_rejects_submissions() {
    let mut game = game("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1", GameConfig::default(), 7);
    game.submit_human_move(uci("a1a8")).unwrap();
    let board = game.current_board().clone();

    assert!(matches!(
        game.submit_human_move(uci("g8h8")),
        Err(ChessError::GameAlreadyOver(_))
    ));
    assert!(matches!(
        game.request_engine_ply(SearchBudget::iterations(10)),
        Err(ChessError::GameAlreadyOver(_))
    ));
    assert!(matches!(
        game.resign(Color::Black),
        Err(ChessError::GameAlreadyOver(_))
    ));
    assert_eq!(game.current_board(), &board);
    assert_eq!(game.ply_count(), 1);
}

#[test]
fn test_promotion_to_queen() {
    let mut game = game("8/1P5k/8/8/8/8/8/4K3 w - - 0 1", GameConfig::default(), 8);
    let phase = game.submit_human_move(uci("b7b8")).unwrap();
    assert!(matches!(phase, TurnPhase::PromotionPending { .. }));
    assert_eq!(game.ply_count(), 0);

    assert_eq!(
        game.request_engine_ply(SearchBudget::iterations(10)),
        Err(ChessError::PromotionChoiceRequired)
    );

    game.choose_promotion(PieceType::Queen).unwrap();
    assert_eq!(
        game.current_board().piece_at(Square::B8),
        Some(Piece::new(Color::White, PieceType::Queen))
    );
    assert_eq!(game.history()[0].to_string(), "b7b8q");
    assert_eq!(game.current_phase(), &TurnPhase::AwaitingEngineMove);
}

#[test]
fn test_check_then_engine_escapes() {
    let mut game = game("4k3/8/8/8/8/8/8/R3K3 w - - 0 1", GameConfig::default(), 9);
    game.submit_human_move(uci("a1a8")).unwrap();
    assert_eq!(
        game.current_phase(),
        &TurnPhase::CheckAcknowledged {
            in_check: Color::Black
        }
    );
    assert!(game.is_engine_turn());

    game.request_engine_ply(SearchBudget::iterations(30)).unwrap();
    assert!(!game.current_board().in_check());
    assert_eq!(game.current_phase(), &TurnPhase::AwaitingHumanMove);
}

#[test]
fn test_resignation() {
    let mut game = game(uct_chess::START_FEN, GameConfig::default(), 10);
    let outcome = game.resign(Color::White).unwrap();
    assert_eq!(
        outcome,
        Outcome::Resignation {
            winner: Color::Black
        }
    );
    assert_eq!(game.outcome(), Some(outcome));
    assert!(game.is_over());
}

#[test]
fn test_engine_vs_engine_until_end() {
    // At most two captures are possible, so the fifty-move rule ends the game
    // well inside 400 plies even when the searches are weak.
    let mut game = game("4k3/8/8/8/8/8/8/RR2K3 w - - 0 1", GameConfig::engine_only(), 11);
    for _ in 0..400 {
        if game.is_over() {
            break;
        }
        game.request_engine_ply(SearchBudget::iterations(30)).unwrap();
        match game.current_phase() {
            TurnPhase::GameOver(_) | TurnPhase::CheckAcknowledged { .. } => {}
            phase => assert_eq!(phase, &TurnPhase::AwaitingEngineMove),
        }
    }
    assert!(game.is_over(), "game still running after 400 plies");
    assert!(game.outcome().is_some());
    let history = game.history().to_vec();
    let mut replay = game.start_board().clone();
    for mv in history {
        assert!(replay.legal_moves().contains(&mv));
        replay = replay.make_move(mv);
    }
    assert_eq!(&replay, game.current_board());
}
