//! Game controller: owns one live game and wires the turn state machine to
//! the search engine.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};
use uct_core::{Color, Oracle, Outcome, Result};
use uct_mcts::{Mcts, SearchBudget};

use crate::machine::{Mover, TurnStateMachine};
use crate::phase::{TurnEvent, TurnPhase};

/// Who plays which side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Side played by the human. `None` lets the engine play both sides.
    pub human: Option<Color>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            human: Some(Color::White),
        }
    }
}

impl GameConfig {
    pub fn human(color: Color) -> Self {
        Self { human: Some(color) }
    }

    pub fn engine_only() -> Self {
        Self { human: None }
    }
}

/// A single game. Takes `&mut self` for every change, so one caller at a time.
pub struct GameController<O: Oracle, R: Rng> {
    oracle: O,
    start: O::Board,
    board: O::Board,
    machine: TurnStateMachine<O>,
    engine: Mcts<R>,
    history: Vec<O::Move>,
}

impl<O: Oracle, R: Rng> GameController<O, R> {
    pub fn new(oracle: O, board: O::Board, config: GameConfig, engine: Mcts<R>) -> Self {
        let machine = TurnStateMachine::new(&oracle, &board, config.human);
        info!(phase = %machine.phase(), human = ?config.human, "New game");
        Self {
            oracle,
            start: board.clone(),
            board,
            machine,
            engine,
            history: Vec::new(),
        }
    }

    /// Submit the human's move. A pawn move to the last rank without a piece
    /// leaves the game in `PromotionPending`.
    pub fn submit_human_move(&mut self, mv: O::Move) -> Result<&TurnPhase<O::Move>> {
        self.dispatch(TurnEvent::HumanMove(mv))?;
        Ok(self.current_phase())
    }

    /// Finish a pending promotion with `piece`.
    pub fn choose_promotion(&mut self, piece: O::Promotion) -> Result<&TurnPhase<O::Move>> {
        self.dispatch(TurnEvent::PromotionChoice(piece))?;
        Ok(self.current_phase())
    }

    pub fn acknowledge_check(&mut self) -> Result<&TurnPhase<O::Move>> {
        self.dispatch(TurnEvent::AcknowledgeCheck)?;
        Ok(self.current_phase())
    }

    /// `color` gives up; the other side wins.
    pub fn resign(&mut self, color: Color) -> Result<Outcome> {
        self.dispatch(TurnEvent::Resign(color))?;
        Ok(Outcome::Resignation {
            winner: color.opposite(),
        })
    }

    /// Let the engine search the current position within `budget` and play
    /// its choice. Returns the move played.
    ///
    /// # Errors
    /// The same rejections as a submitted move when it is not the engine's
    /// turn. `NoLegalMove` if the oracle offers no move in a live game.
    pub fn request_engine_ply(&mut self, budget: SearchBudget) -> Result<O::Move> {
        if let Err(e) = self
            .machine
            .accepts_move(&self.oracle, &self.board, Mover::Engine)
        {
            warn!(phase = %self.machine.phase(), error = %e, "Engine ply rejected");
            return Err(e);
        }

        let mv = match self.engine.select_move(&self.oracle, &self.board, budget) {
            Ok(mv) => mv,
            Err(e) => {
                error!(
                    phase = %self.machine.phase(),
                    board = ?self.board,
                    error = %e,
                    "Engine found no move in a live game"
                );
                return Err(e);
            }
        };
        self.dispatch(TurnEvent::EngineMove(mv))?;
        Ok(mv)
    }

    fn dispatch(&mut self, event: TurnEvent<O::Move, O::Promotion>) -> Result<()> {
        let name = event.name();
        match self.machine.handle(&self.oracle, &mut self.board, event) {
            Ok(applied) => {
                if let Some(mv) = applied {
                    self.history.push(mv);
                    debug!(mv = %mv, ply = self.history.len(), "Move applied");
                }
                info!(event = name, phase = %self.machine.phase(), "Turn phase changed");
                if let Some(outcome) = self.outcome() {
                    info!(%outcome, plies = self.history.len(), "Game over");
                }
                Ok(())
            }
            Err(e) => {
                warn!(event = name, phase = %self.machine.phase(), error = %e, "Event rejected");
                Err(e)
            }
        }
    }

    pub fn current_phase(&self) -> &TurnPhase<O::Move> {
        self.machine.phase()
    }

    pub fn current_board(&self) -> &O::Board {
        &self.board
    }

    pub fn start_board(&self) -> &O::Board {
        &self.start
    }

    /// Applied moves, oldest first.
    pub fn history(&self) -> &[O::Move] {
        &self.history
    }

    pub fn ply_count(&self) -> usize {
        self.history.len()
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.machine.phase().outcome()
    }

    pub fn is_over(&self) -> bool {
        self.machine.phase().is_game_over()
    }

    /// Whether a move from the engine would be accepted now.
    pub fn is_engine_turn(&self) -> bool {
        self.machine
            .accepts_move(&self.oracle, &self.board, Mover::Engine)
            .is_ok()
    }

    /// Whether a move from the human would be accepted now.
    pub fn is_human_turn(&self) -> bool {
        self.machine
            .accepts_move(&self.oracle, &self.board, Mover::Human)
            .is_ok()
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }
}
