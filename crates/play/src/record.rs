//! JSON records of finished games.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uct_chess::{Chess, Move, Position};
use uct_core::Outcome;
use uct_game::GameController;

/// A game as played: where it started, the moves in UCI, how it ended.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub start: Position,
    pub moves: Vec<String>,

    /// `None` if the game was stopped before it ended.
    pub outcome: Option<Outcome>,

    pub seed: u64,
}

impl GameRecord {
    pub fn from_game<R: Rng>(game: &GameController<Chess, R>, seed: u64) -> Self {
        Self {
            start: game.start_board().clone(),
            moves: game.history().iter().map(Move::to_string).collect(),
            outcome: game.outcome(),
            seed,
        }
    }

    /// Replay the moves from the start position.
    pub fn replay(&self) -> Result<Position> {
        self.moves.iter().enumerate().try_fold(self.start.clone(), |pos, (ply, text)| {
            let requested: Move = text
                .parse()
                .with_context(|| format!("Bad move '{}' at ply {}", text, ply + 1))?;
            let mv = pos
                .legal_moves()
                .into_iter()
                .find(|legal| legal.answers(requested))
                .with_context(|| format!("Illegal move '{}' at ply {}", text, ply + 1))?;
            Ok(pos.make_move(mv))
        })
    }
}

/// Write `records` to `path` as a pretty-printed JSON array.
pub fn write_records(path: &Path, records: &[GameRecord]) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory: {:?}", dir))?;
    }
    let file = File::create(path).with_context(|| format!("Failed to create file: {:?}", path))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, records).context("Failed to serialize games")?;
    writer.flush().context("Failed to flush game file")?;
    Ok(())
}
