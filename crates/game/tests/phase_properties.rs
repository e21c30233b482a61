//! Property-based tests for the turn state machine on random games.

use proptest::prelude::*;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use uct_chess::{Chess, Move, PieceType, Position};
use uct_core::{ChessError, Color};
use uct_game::{TurnEvent, TurnPhase, TurnStateMachine};

type Event = TurnEvent<Move, PieceType>;

/// Play a random game through the machine, as the engine for both sides.
fn play_out(seed: u64, max_plies: usize) -> (TurnStateMachine<Chess>, Position) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut board = Position::startpos();
    let mut machine = TurnStateMachine::new(&Chess, &board, None);
    for _ in 0..max_plies {
        if machine.phase().is_game_over() {
            break;
        }
        let Some(&mv) = board.legal_moves().choose(&mut rng) else {
            break;
        };
        machine
            .handle(&Chess, &mut board, Event::EngineMove(mv))
            .unwrap();
    }
    (machine, board)
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        (0usize..64, 0usize..64).prop_map(|(f, t)| {
            let text = format!("{}{}", square_name(f), square_name(t));
            Event::HumanMove(text.parse().unwrap())
        }),
        (0usize..64, 0usize..64).prop_map(|(f, t)| {
            let text = format!("{}{}", square_name(f), square_name(t));
            Event::EngineMove(text.parse().unwrap())
        }),
        Just(Event::PromotionChoice(PieceType::Queen)),
        Just(Event::AcknowledgeCheck),
        prop_oneof![Just(Color::White), Just(Color::Black)].prop_map(Event::Resign),
    ]
}

fn square_name(index: usize) -> String {
    let file = (b'a' + (index % 8) as u8) as char;
    let rank = (b'1' + (index / 8) as u8) as char;
    format!("{}{}", file, rank)
}

// =============================================================================
// Phase consistency
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// The phase always agrees with the oracle about the current board.
    #[test]
    fn prop_phase_matches_board(seed in any::<u64>(), plies in 0usize..200) {
        let (machine, board) = play_out(seed, plies);
        match machine.phase() {
            TurnPhase::GameOver(outcome) => prop_assert_eq!(board.outcome(), Some(*outcome)),
            TurnPhase::CheckAcknowledged { in_check } => {
                prop_assert!(board.in_check());
                prop_assert_eq!(*in_check, board.side_to_move());
            }
            TurnPhase::AwaitingEngineMove => {
                prop_assert!(!board.in_check());
                prop_assert!(!board.is_terminal());
            }
            phase => prop_assert!(false, "unexpected phase {}", phase),
        }
    }
}

// =============================================================================
// Game over is terminal
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Once over, every event fails with GameAlreadyOver and nothing changes.
    #[test]
    fn prop_game_over_rejects_everything(
        seed in any::<u64>(),
        events in prop::collection::vec(arb_event(), 1..8)
    ) {
        let (mut machine, mut board) = play_out(seed, 400);
        if !machine.phase().is_game_over() {
            machine.handle(&Chess, &mut board, Event::Resign(Color::White)).unwrap();
        }
        let phase = *machine.phase();
        let before = board.clone();

        for event in events {
            let result = machine.handle(&Chess, &mut board, event);
            prop_assert!(matches!(result, Err(ChessError::GameAlreadyOver(_))));
        }
        prop_assert_eq!(machine.phase(), &phase);
        prop_assert_eq!(&board, &before);
    }

    /// A rejected event never changes the phase or the board.
    #[test]
    fn prop_rejections_change_nothing(
        seed in any::<u64>(),
        plies in 0usize..60,
        event in arb_event()
    ) {
        let (mut machine, mut board) = play_out(seed, plies);
        let phase = *machine.phase();
        let before = board.clone();
        if machine.handle(&Chess, &mut board, event).is_err() {
            prop_assert_eq!(machine.phase(), &phase);
            prop_assert_eq!(&board, &before);
        }
    }
}
