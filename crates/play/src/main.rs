//! Command-line front end for the UCT chess engine.
//!
//! - `play`: human against the engine on stdin/stdout
//! - `selfplay`: engine against itself, games written as JSON
//! - `analyse`: search one position and print the root statistics

mod config;
mod record;
mod session;

use std::io;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rayon::prelude::*;
use tracing::{debug, info, warn};
use uct_chess::{Chess, Move, Position};
use uct_game::{GameConfig, GameController};
use uct_mcts::{Mcts, SearchReport};

use crate::config::{AppConfig, CutoffSetting, HumanSide};
use crate::record::{write_records, GameRecord};

/// UCT chess engine.
#[derive(Parser)]
#[command(name = "uct-play")]
#[command(about = "Play, self-play and analyse chess with a UCT search engine")]
struct Cli {
    /// Config file (defaults: $UCT_CHESS_CONFIG, ./uct-chess.toml, ./config/uct-chess.toml).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level filter; RUST_LOG takes precedence.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Search settings shared by every subcommand. Unset flags keep the config values.
#[derive(Args, Debug, Default)]
struct SearchArgs {
    /// Iterations per engine move.
    #[arg(short, long)]
    iterations: Option<u32>,

    /// Time per engine move in milliseconds.
    #[arg(short, long)]
    time_ms: Option<u64>,

    /// Plies per playout before it is cut off.
    #[arg(long)]
    playout_cap: Option<u32>,

    /// Scoring of cut-off playouts: draw or evaluation.
    #[arg(long)]
    cutoff: Option<CutoffSetting>,

    /// Search worker threads.
    #[arg(long)]
    threads: Option<usize>,

    /// Random seed for reproducibility.
    #[arg(long)]
    seed: Option<u64>,
}

impl SearchArgs {
    fn apply(&self, config: &mut AppConfig) {
        let search = &mut config.search;
        if let Some(n) = self.iterations {
            search.iterations = Some(n);
        }
        if let Some(ms) = self.time_ms {
            search.time_ms = Some(ms);
        }
        if let Some(cap) = self.playout_cap {
            search.playout_cap = cap;
        }
        if let Some(cutoff) = self.cutoff {
            search.cutoff = cutoff;
        }
        if let Some(threads) = self.threads {
            search.threads = threads;
        }
        if let Some(seed) = self.seed {
            config.common.seed = seed;
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Play against the engine.
    Play {
        /// Side you play: white, black or none (watch the engine).
        #[arg(long)]
        color: Option<HumanSide>,

        /// Start position.
        #[arg(long)]
        fen: Option<String>,

        #[command(flatten)]
        search: SearchArgs,
    },

    /// Let the engine play itself.
    Selfplay {
        /// Number of games to play.
        #[arg(short, long, default_value = "4")]
        games: usize,

        /// Output file for the game records.
        #[arg(short, long, default_value = "games.json")]
        output: PathBuf,

        /// Stop a game after this many plies.
        #[arg(long, default_value = "400")]
        max_plies: usize,

        /// Start position.
        #[arg(long)]
        fen: Option<String>,

        #[command(flatten)]
        search: SearchArgs,
    },

    /// Search one position and print the statistics of every root move.
    Analyse {
        /// Position to analyse.
        #[arg(long)]
        fen: Option<String>,

        /// Rows to print, most visited first.
        #[arg(long, default_value = "10")]
        top: usize,

        #[command(flatten)]
        search: SearchArgs,
    },
}

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();

    Ok(())
}

fn start_position(fen: Option<&str>, config: &AppConfig) -> Result<Position> {
    let fen = fen.unwrap_or(&config.game.start_fen);
    Position::from_fen(fen).with_context(|| format!("Invalid start position: {}", fen))
}

/// Run the play command.
fn cmd_play(config: &AppConfig, fen: Option<&str>) -> Result<()> {
    let start = start_position(fen, config)?;
    let engine = Mcts::seeded(config.search.mcts_config(), config.common.seed);
    let mut game = GameController::new(Chess, start, config.game.game_config(), engine);

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let outcome = session::run(&mut game, config.search.budget(), stdin.lock(), &mut stdout)?;

    let record = GameRecord::from_game(&game, config.common.seed);
    println!("Moves: {}", record.moves.join(" "));
    if outcome.is_none() {
        println!("Game stopped after {} plies", game.ply_count());
    }
    Ok(())
}

/// Play one engine-versus-engine game.
fn selfplay_game(
    config: &AppConfig,
    start: &Position,
    seed: u64,
    max_plies: usize,
) -> Result<GameRecord> {
    let engine = Mcts::seeded(config.search.mcts_config(), seed);
    let mut game = GameController::new(Chess, start.clone(), GameConfig::engine_only(), engine);
    let budget = config.search.budget();

    while !game.is_over() && game.ply_count() < max_plies {
        game.request_engine_ply(budget)
            .with_context(|| format!("Engine failed in game with seed {}", seed))?;
    }
    debug!(seed, plies = game.ply_count(), outcome = ?game.outcome(), "Self-play game finished");
    Ok(GameRecord::from_game(&game, seed))
}

/// Run the selfplay command.
fn cmd_selfplay(
    config: &AppConfig,
    games: usize,
    output: PathBuf,
    max_plies: usize,
    fen: Option<&str>,
) -> Result<()> {
    let start_pos = start_position(fen, config)?;
    let seed = config.common.seed;
    println!("Playing {} games", games);
    println!("Seed: {}", seed);

    let start = Instant::now();
    let records: Vec<GameRecord> = (0..games)
        .into_par_iter()
        .map(|i| selfplay_game(config, &start_pos, seed.wrapping_add(i as u64 * 1000), max_plies))
        .collect::<Result<_>>()?;

    write_records(&output, &records)?;

    let elapsed = start.elapsed();
    let total_plies: usize = records.iter().map(|r| r.moves.len()).sum();
    println!("\nCompleted in {:.2}s", elapsed.as_secs_f64());
    println!("Total plies: {}", total_plies);
    println!("Games saved to: {:?}", output);

    let (white, black, draws, unfinished) = tally(&records);
    println!(
        "\nOutcomes: White wins: {}, Black wins: {}, Draws: {}, Unfinished: {}",
        white, black, draws, unfinished
    );
    info!(games, total_plies, "Self-play complete");
    Ok(())
}

/// (white wins, black wins, draws, unfinished)
fn tally(records: &[GameRecord]) -> (usize, usize, usize, usize) {
    use uct_core::Color;

    records
        .iter()
        .fold((0, 0, 0, 0), |(w, b, d, u), r| match r.outcome {
            None => (w, b, d, u + 1),
            Some(o) => match o.winner() {
                Some(Color::White) => (w + 1, b, d, u),
                Some(Color::Black) => (w, b + 1, d, u),
                None => (w, b, d + 1, u),
            },
        })
}

/// Run the analyse command.
fn cmd_analyse(config: &AppConfig, fen: Option<&str>, top: usize) -> Result<()> {
    let board = start_position(fen, config)?;
    println!("{}", board);

    let mut mcts = Mcts::seeded(config.search.mcts_config(), config.common.seed);
    let report = mcts
        .search(&Chess, &board, config.search.budget())
        .context("Nothing to analyse")?;
    print!("{}", format_report(&report, top));
    Ok(())
}

fn format_report(report: &SearchReport<Move>, top: usize) -> String {
    let mut rows: Vec<_> = report.children.iter().collect();
    // Stable, so equal visit counts stay in move order.
    rows.sort_by(|a, b| b.visits.cmp(&a.visits));

    let mut text = format!(
        "Best move: {} ({} iterations, {} ms, {} nodes)\n",
        report.best_move,
        report.iterations,
        report.elapsed.as_millis(),
        report.tree_size
    );
    text.push_str(&format!("{:<8}{:>8}{:>9}\n", "move", "visits", "mean"));
    for child in rows.into_iter().take(top) {
        text.push_str(&format!(
            "{:<8}{:>8}{:>9.3}\n",
            child.mv.to_string(),
            child.visits,
            child.mean_reward
        ));
    }
    text
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = config::load_config(cli.config.as_deref());
    let mut config = loaded.config;
    if let Some(level) = cli.log_level {
        config.common.log_level = level;
    }
    init_tracing(&config.common.log_level)?;
    for warning in &loaded.warnings {
        warn!("{}", warning);
    }
    match &loaded.source {
        Some(path) => info!("Loaded config from {}", path.display()),
        None => debug!("No config file found, using built-in defaults"),
    }

    match cli.command {
        Commands::Play { color, fen, search } => {
            search.apply(&mut config);
            if let Some(side) = color {
                config.game.human = side;
            }
            cmd_play(&config, fen.as_deref())
        }

        Commands::Selfplay {
            games,
            output,
            max_plies,
            fen,
            search,
        } => {
            search.apply(&mut config);
            cmd_selfplay(&config, games, output, max_plies, fen.as_deref())
        }

        Commands::Analyse { fen, top, search } => {
            search.apply(&mut config);
            cmd_analyse(&config, fen.as_deref(), top)
        }
    }
}
