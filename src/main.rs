//! Ataxx-MCTS: a time-bounded MCTS engine for Ataxx.
//!
//! ## Usage
//!
//! - `ataxx-mcts` - Read a turn transcript on stdin and print one move
//! - `ataxx-mcts play --time-ms 500` - Same, with a custom time budget
//! - `ataxx-mcts demo` - Self-play from the starting position

use std::io::{self, Write};
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::{Parser, Subcommand};
use log::info;

use ataxx_mcts::constants::DEFAULT_TIME_MS;
use ataxx_mcts::driver::{timed_search, tree_search, SearchLimits};
use ataxx_mcts::mcts::SearchTree;
use ataxx_mcts::movegen::has_moves;
use ataxx_mcts::position::{play_move, Position};
use ataxx_mcts::transcript::{format_move, read_transcript};

/// Ataxx-MCTS: a time-bounded MCTS engine for Ataxx
#[derive(Parser)]
#[command(name = "ataxx-mcts")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Read a turn transcript from stdin and print the chosen move
    Play {
        /// Time budget for the move in milliseconds, counted from startup
        #[arg(long, default_value_t = DEFAULT_TIME_MS)]
        time_ms: u64,
        /// Run a fixed number of iterations instead of watching the clock
        #[arg(long)]
        iterations: Option<usize>,
        /// Seed for the tie-break generator
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Play the engine against itself from the starting position
    Demo {
        /// Number of moves to play
        #[arg(long, default_value_t = 10)]
        moves: usize,
        /// Iterations per move
        #[arg(long, default_value_t = 2000)]
        iterations: usize,
        /// Seed for the tie-break generator
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> anyhow::Result<()> {
    let started = Instant::now();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Play {
            time_ms,
            iterations,
            seed,
        }) => run_play(started, time_ms, iterations, seed),
        None => run_play(started, DEFAULT_TIME_MS, None, None),
        Some(Commands::Demo {
            moves,
            iterations,
            seed,
        }) => {
            run_demo(moves, iterations, seed);
            Ok(())
        }
    }
}

fn run_play(
    started: Instant,
    time_ms: u64,
    iterations: Option<usize>,
    seed: Option<u64>,
) -> anyhow::Result<()> {
    let pos = read_transcript(io::stdin().lock()).context("invalid turn transcript")?;
    let seed = seed.unwrap_or_else(|| fastrand::u64(..));
    info!("searching for {} with seed {seed}", pos.to_move);

    let mut tree = SearchTree::new(&pos, seed);
    let best = match iterations {
        Some(n) => tree_search(&mut tree, n),
        None => {
            let limits = SearchLimits::with_budget(Duration::from_millis(time_ms));
            let report = timed_search(&mut tree, started, &limits);
            info!(
                "{} iterations in {:.3}s",
                report.iterations,
                report.elapsed.as_secs_f64()
            );
            report.best
        }
    };

    let mut stdout = io::stdout();
    writeln!(stdout, "{}", format_move(best)).context("failed to write move")?;
    stdout.flush().context("failed to flush stdout")?;
    Ok(())
}

fn run_demo(moves: usize, iterations: usize, seed: Option<u64>) {
    println!("Ataxx-MCTS self-play, {iterations} iterations per move\n");

    let mut rng = fastrand::Rng::with_seed(seed.unwrap_or_else(|| fastrand::u64(..)));
    let mut pos = Position::new();
    println!("{pos}");

    for ply in 1..=moves {
        if !has_moves(&pos) {
            println!("{} has no legal move, game over", pos.to_move);
            break;
        }
        let mut tree = SearchTree::new(&pos, rng.u64(..));
        let Some(mv) = tree_search(&mut tree, iterations) else {
            break;
        };
        println!("{ply}. {} plays {}", pos.to_move, format_move(Some(mv)));
        play_move(&mut pos, mv);
        println!("{pos}");
    }
}
