//! Human-versus-engine play over a text stream.

use std::io::{BufRead, Write};

use anyhow::Result;
use rand::Rng;
use uct_chess::{Chess, Move, PieceType};
use uct_core::Outcome;
use uct_game::{GameController, TurnPhase};
use uct_mcts::SearchBudget;

const HELP: &str = "\
Enter moves in UCI notation (e2e4, e7e8q).
Commands: fen, resign, help, quit";

/// Play until the game ends or the input runs out.
///
/// Returns the outcome, or `None` when the human quit or input ended first.
/// Rejected input is reported and asked for again; engine failures are errors.
pub fn run<R, I, W>(
    game: &mut GameController<Chess, R>,
    budget: SearchBudget,
    input: I,
    out: &mut W,
) -> Result<Option<Outcome>>
where
    R: Rng,
    I: BufRead,
    W: Write,
{
    let mut lines = input.lines();

    loop {
        if let Some(outcome) = game.outcome() {
            writeln!(out, "{}", game.current_board())?;
            writeln!(out, "Game over: {}", outcome)?;
            return Ok(Some(outcome));
        }

        if game.is_engine_turn() {
            let mv = game.request_engine_ply(budget)?;
            writeln!(out, "Engine plays {}", mv)?;
            continue;
        }

        writeln!(out, "{}", game.current_board())?;
        let prompt = match game.current_phase() {
            TurnPhase::PromotionPending { .. } => "Promote to (q, r, b, n): ",
            TurnPhase::CheckAcknowledged { .. } => "Check! Your move: ",
            _ => "Your move: ",
        };
        write!(out, "{}", prompt)?;
        out.flush()?;

        let Some(line) = lines.next().transpose()? else {
            return Ok(None);
        };
        let line = line.trim();

        match line {
            "" => continue,
            "quit" | "exit" => return Ok(None),
            "help" => writeln!(out, "{}", HELP)?,
            "fen" => writeln!(out, "{}", game.current_board().to_fen())?,
            "resign" => {
                let side = game.current_board().side_to_move();
                game.resign(side)?;
            }
            text => {
                if let Err(e) = submit(game, text) {
                    writeln!(out, "{}", e)?;
                }
            }
        }
    }
}

fn submit<R: Rng>(game: &mut GameController<Chess, R>, text: &str) -> uct_core::Result<()> {
    if let TurnPhase::PromotionPending { .. } = game.current_phase() {
        let piece: PieceType = text.parse()?;
        game.choose_promotion(piece)?;
    } else {
        let mv: Move = text.parse()?;
        game.submit_human_move(mv)?;
    }
    Ok(())
}
