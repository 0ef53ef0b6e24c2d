use clap::Parser;
use manna_match::config::{LevelConfig, Timings};
use manna_match::engine::BoardEngine;
use manna_match::strategy::Strategy;
use manna_match::utils::init_logging;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::collections::HashMap;
use tracing::warn;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Compare move strategies over many seeded levels", long_about = None)]
struct Args {
    /// Number of seeded levels to play per strategy
    #[clap(short, long, default_value_t = 20)]
    boards: u64,

    /// First seed; levels use consecutive seeds from here
    #[clap(long, default_value_t = 0)]
    start_seed: u64,

    /// Swaps available in each level
    #[clap(short, long, default_value_t = 20)]
    moves: u32,

    /// Log filter (e.g. `warn`, `manna_match=debug`)
    #[clap(long, default_value = "warn")]
    log: String,
}

/// Plays one level to the end and returns its final score.
fn play_level(config: LevelConfig, strategy: Strategy) -> anyhow::Result<u32> {
    let mut rng = SmallRng::seed_from_u64(config.seed);
    let mut engine = BoardEngine::new(config)?;
    while !engine.is_level_over() {
        let Some((_, (a, b))) = strategy.choose(engine.grid(), &mut rng) else {
            warn!(%strategy, "strategy found no move on a playable board");
            break;
        };
        engine.attempt_swap(a, b)?;
        engine.settle()?;
    }
    Ok(engine.score())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args.log);

    let mut all_scores: HashMap<Strategy, Vec<u32>> = HashMap::new();

    println!("Starting strategy evaluation for {} boards...", args.boards);

    for board_idx in 0..args.boards {
        let seed = args.start_seed + board_idx;
        println!("\nEvaluating Board {} (Seed: {})", board_idx, seed);

        for strategy in Strategy::ALL {
            // Every strategy sees the same initial board and refill sequence.
            let config = LevelConfig::default()
                .with_seed(seed)
                .with_moves(args.moves)
                .with_timings(Timings::instant());
            let score = play_level(config.clone(), strategy)?;
            let stars = config.stars_for(score);
            println!("  Strategy: {:<10}, Score: {:<6}, Stars: {}", strategy, score, stars);
            all_scores.entry(strategy).or_default().push(score);
        }
    }

    println!("\n--- Evaluation Complete ---");
    println!("Number of boards evaluated: {}", args.boards);
    println!("\n--- Average Scores ---");

    let mut sorted_avg_scores: Vec<(Strategy, f64)> = all_scores
        .iter()
        .filter(|(_, scores)| !scores.is_empty())
        .map(|(strategy, scores)| {
            let total: u64 = scores.iter().map(|&s| s as u64).sum();
            (*strategy, total as f64 / scores.len() as f64)
        })
        .collect();
    sorted_avg_scores.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    for (strategy, avg_score) in sorted_avg_scores {
        println!("Strategy {:<10}: Average Score = {:.2}", strategy, avg_score);
    }
    Ok(())
}
