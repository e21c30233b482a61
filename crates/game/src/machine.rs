//! Hierarchical turn state machine.
//!
//! The top level is the [`TurnPhase`] of the game. Two sub-flows are shared
//! by every top-level phase that accepts a move, whoever submitted it:
//!
//! - **promotion**: a pawn move to the last rank without a piece parks the
//!   move in `PromotionPending` until a piece is chosen;
//! - **move completion**: apply the move, then run terminal detection before
//!   deciding the next phase (`GameOver`, `CheckAcknowledged` or the next
//!   side's awaiting phase).
//!
//! Every `(phase, event)` pair is resolved in [`TurnStateMachine::handle`].
//! A rejected event leaves both the phase and the board untouched.

use uct_core::{ChessError, Color, Oracle, Outcome, Result};

use crate::phase::{TurnEvent, TurnPhase};

/// Who is submitting a move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mover {
    Human,
    Engine,
}

impl Mover {
    fn event_name(self) -> &'static str {
        match self {
            Mover::Human => "human move",
            Mover::Engine => "engine move",
        }
    }
}

/// Result of a dispatched event, committed only when dispatch succeeds.
struct Step<O: Oracle> {
    phase: TurnPhase<O::Move>,
    played: Option<(O::Board, O::Move)>,
}

impl<O: Oracle> Step<O> {
    fn stay(phase: TurnPhase<O::Move>) -> Self {
        Self {
            phase,
            played: None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct TurnStateMachine<O: Oracle> {
    phase: TurnPhase<O::Move>,
    human: Option<Color>,
}

impl<O: Oracle> TurnStateMachine<O> {
    /// Machine for a game starting at `board`. `human` is the side played by
    /// the human, `None` when the engine plays both sides.
    pub fn new(oracle: &O, board: &O::Board, human: Option<Color>) -> Self {
        Self {
            phase: phase_after(oracle, board, human),
            human,
        }
    }

    pub fn phase(&self) -> &TurnPhase<O::Move> {
        &self.phase
    }

    pub fn human(&self) -> Option<Color> {
        self.human
    }

    /// Who plays `side`.
    pub fn mover_for(&self, side: Color) -> Mover {
        if self.human == Some(side) {
            Mover::Human
        } else {
            Mover::Engine
        }
    }

    /// Check that `mover` may submit a move in the current phase.
    ///
    /// # Errors
    /// `GameAlreadyOver` after the game ended, `PromotionChoiceRequired` while
    /// a promotion is pending, `UnexpectedEvent` when it is the other mover's turn.
    pub fn accepts_move(&self, oracle: &O, board: &O::Board, mover: Mover) -> Result<()> {
        let expected = match self.phase {
            TurnPhase::GameOver(outcome) => return Err(ChessError::GameAlreadyOver(outcome)),
            TurnPhase::PromotionPending { .. } => return Err(ChessError::PromotionChoiceRequired),
            TurnPhase::AwaitingHumanMove => Mover::Human,
            TurnPhase::AwaitingEngineMove => Mover::Engine,
            // A move by the checked side acknowledges the check.
            TurnPhase::CheckAcknowledged { .. } => self.mover_for(oracle.side_to_move(board)),
        };
        if mover == expected {
            Ok(())
        } else {
            Err(self.unexpected(mover.event_name()))
        }
    }

    /// Feed `event` to the machine. On success `board` holds the position
    /// after the event and the applied move, if any, is returned.
    ///
    /// # Errors
    /// - `GameAlreadyOver` for any event once the game has ended
    /// - `IllegalMove` for a move or promotion piece the oracle rejects
    /// - `PromotionChoiceRequired` for a move while a promotion is pending
    /// - `UnexpectedEvent` for an event the current phase cannot take
    pub fn handle(
        &mut self,
        oracle: &O,
        board: &mut O::Board,
        event: TurnEvent<O::Move, O::Promotion>,
    ) -> Result<Option<O::Move>> {
        let step = self.dispatch(oracle, board, event)?;
        self.phase = step.phase;
        Ok(step.played.map(|(next, mv)| {
            *board = next;
            mv
        }))
    }

    fn dispatch(
        &self,
        oracle: &O,
        board: &O::Board,
        event: TurnEvent<O::Move, O::Promotion>,
    ) -> Result<Step<O>> {
        if let TurnPhase::GameOver(outcome) = self.phase {
            return Err(ChessError::GameAlreadyOver(outcome));
        }

        match (self.phase, event) {
            (_, TurnEvent::Resign(color)) => Ok(Step::stay(TurnPhase::GameOver(
                Outcome::Resignation {
                    winner: color.opposite(),
                },
            ))),
            (_, TurnEvent::HumanMove(mv)) => {
                self.accepts_move(oracle, board, Mover::Human)?;
                self.play(oracle, board, mv)
            }
            (_, TurnEvent::EngineMove(mv)) => {
                self.accepts_move(oracle, board, Mover::Engine)?;
                self.play(oracle, board, mv)
            }
            (TurnPhase::PromotionPending { pending }, TurnEvent::PromotionChoice(piece)) => {
                self.promote(oracle, board, pending, piece)
            }
            (TurnPhase::CheckAcknowledged { .. }, TurnEvent::AcknowledgeCheck) => Ok(Step::stay(
                TurnPhase::awaiting(oracle.side_to_move(board), self.human),
            )),
            (_, event) => Err(self.unexpected(event.name())),
        }
    }

    /// Validate `requested` and either park it for a promotion choice or complete it.
    fn play(&self, oracle: &O, board: &O::Board, requested: O::Move) -> Result<Step<O>> {
        let legal = find_legal(oracle, board, requested)?;
        if oracle.promotion_of(requested).is_none() && oracle.is_promotion_eligible(legal, board) {
            return Ok(Step::stay(TurnPhase::PromotionPending { pending: requested }));
        }
        Ok(self.complete(oracle, board, legal))
    }

    fn promote(
        &self,
        oracle: &O,
        board: &O::Board,
        pending: O::Move,
        piece: O::Promotion,
    ) -> Result<Step<O>> {
        let legal = find_legal(oracle, board, oracle.with_promotion(pending, piece))?;
        Ok(self.complete(oracle, board, legal))
    }

    /// Apply a legal move and run terminal detection on the result.
    fn complete(&self, oracle: &O, board: &O::Board, mv: O::Move) -> Step<O> {
        let next = oracle.apply_move(board, mv);
        Step {
            phase: phase_after(oracle, &next, self.human),
            played: Some((next, mv)),
        }
    }

    fn unexpected(&self, event: &str) -> ChessError {
        ChessError::UnexpectedEvent {
            phase: self.phase.to_string(),
            event: event.to_string(),
        }
    }
}

/// The legal move `requested` stands for.
fn find_legal<O: Oracle>(oracle: &O, board: &O::Board, requested: O::Move) -> Result<O::Move> {
    oracle
        .legal_moves(board)
        .into_iter()
        .find(|&legal| oracle.matches(legal, requested))
        .ok_or_else(|| ChessError::IllegalMove(requested.to_string()))
}

/// Phase for a freshly reached `board`: terminal detection first, then check.
fn phase_after<O: Oracle>(oracle: &O, board: &O::Board, human: Option<Color>) -> TurnPhase<O::Move> {
    let side = oracle.side_to_move(board);
    if let Some(outcome) = oracle.is_terminal(board) {
        TurnPhase::GameOver(outcome)
    } else if oracle.is_check(board) {
        TurnPhase::CheckAcknowledged { in_check: side }
    } else {
        TurnPhase::awaiting(side, human)
    }
}
