use anyhow::{bail, Context};
use clap::Parser;
use manna_match::config::LevelArgs;
use manna_match::engine::BoardEngine;
use manna_match::events::BoardEvent;
use manna_match::strategy::Strategy;
use manna_match::utils::{grid_from_str_array, init_logging};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Play one level automatically with a move strategy", long_about = None)]
struct Args {
    #[clap(flatten)]
    level: LevelArgs,

    /// Move selection strategy
    #[clap(long, value_enum, default_value_t = Strategy::Greedy)]
    strategy: Strategy,

    /// Optional board file (one row per line, letters M W F S Q)
    #[clap(long)]
    board_file: Option<PathBuf>,

    /// Print the board after every move
    #[clap(short, long)]
    verbose: bool,

    /// Log filter (e.g. `warn`, `manna_match=debug`)
    #[clap(long, default_value = "warn")]
    log: String,
}

fn read_board_file(args: &Args, path: &PathBuf) -> anyhow::Result<BoardEngine> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let lines: Vec<&str> = content
        .lines()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();

    let grid = match grid_from_str_array(&lines) {
        Ok(grid) => grid,
        Err(e) => bail!("invalid board format: {}", e),
    };
    Ok(BoardEngine::new_with_grid(args.level.to_config(), grid)?)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args.log);

    let mut engine = match &args.board_file {
        Some(path) => {
            let engine = read_board_file(&args, path)?;
            println!("Loaded board from {}\n", path.display());
            engine
        }
        None => BoardEngine::new(args.level.to_config())?,
    };
    let mut rng = SmallRng::seed_from_u64(args.level.seed);

    println!("Initial board state:\n{}\n", engine.grid());
    println!("Playing {} moves with the {} strategy...\n", engine.moves_left(), args.strategy);

    let mut step = 0;
    while !engine.is_level_over() {
        let Some((expected, (a, b))) = args.strategy.choose(engine.grid(), &mut rng) else {
            println!("No valid move found.");
            break;
        };
        step += 1;
        let before = engine.score();
        engine.attempt_swap(a, b)?;
        engine.settle()?;

        println!(
            "  Move {}: {} <-> {} (expected {}, gained {})",
            step,
            a,
            b,
            expected,
            engine.score() - before
        );
        if args.verbose {
            println!("{}\n", engine.grid());
        }
    }

    let mut stars = 0;
    for event in engine.drain_events() {
        if let BoardEvent::LevelComplete { stars: s, .. } = event {
            stars = s;
        }
    }
    println!("\nFinal score: {}", engine.score());
    println!("Stars: {}", stars);
    println!("Final board state:\n{}\n", engine.grid());
    Ok(())
}
