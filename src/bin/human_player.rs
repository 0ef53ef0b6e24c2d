use anyhow::Context;
use clap::Parser;
use manna_match::config::LevelArgs;
use manna_match::engine::{BoardEngine, FaithPower};
use manna_match::events::BoardEvent;
use manna_match::grid::Position;
use manna_match::scoring::FAITH_METER_MAX;
use manna_match::utils::init_logging;
use std::io::{self, Write};

#[derive(Parser, Debug)]
#[clap(author, version, about = "Play a level of Manna Match in the terminal", long_about = None)]
struct Args {
    #[clap(flatten)]
    level: LevelArgs,

    /// Log filter (e.g. `warn`, `manna_match=debug`)
    #[clap(long, default_value = "warn")]
    log: String,
}

fn describe(event: &BoardEvent) -> Option<String> {
    match event {
        BoardEvent::SpecialTileCreated { kind, position } => {
            Some(format!("A {} appeared at {}!", kind, position))
        }
        BoardEvent::SpecialTileActivated { kind, position } => {
            Some(format!("The {} at {} was unleashed!", kind, position))
        }
        BoardEvent::SwapReverted { .. } => Some("No match, swap reverted.".to_string()),
        BoardEvent::BoardShuffled => Some("No moves left, board shuffled.".to_string()),
        BoardEvent::PowerActivated(power) => Some(format!("{} activated!", power)),
        BoardEvent::HintShown { a, b } => Some(format!("Hint: try swapping {} and {}", a, b)),
        BoardEvent::LevelComplete { stars, score } => Some(format!(
            "Level complete with {} star(s) and {} points!",
            stars, score
        )),
        BoardEvent::NoMoreMoves => Some("Out of moves.".to_string()),
        _ => None,
    }
}

fn parse_coords(parts: &[&str]) -> Option<Vec<usize>> {
    parts.iter().map(|p| p.parse::<usize>().ok()).collect()
}

/// Runs one line of input. Returns `Ok(false)` when the player quits.
fn handle_command(engine: &mut BoardEngine, input: &str) -> anyhow::Result<bool> {
    let parts: Vec<&str> = input.split_whitespace().collect();
    let result = match parts.as_slice() {
        ["q"] => return Ok(false),
        ["h"] => engine.show_hint().map(|_| ()),
        ["p", name] => match name.parse::<FaithPower>() {
            Ok(power) => engine.activate_faith_power(power),
            Err(e) => Err(e),
        },
        ["d", kind, x, y] => match parse_coords(&[*x, *y]).as_deref() {
            Some(&[x, y]) => engine.debug_place_tile(kind, x, y),
            _ => {
                println!("Invalid coordinates.");
                return Ok(true);
            }
        },
        [_, _, _, _] => match parse_coords(&parts).as_deref() {
            Some(&[x1, y1, x2, y2]) => {
                engine.attempt_swap(Position::new(x1, y1), Position::new(x2, y2))
            }
            _ => {
                println!("Invalid input: enter four numbers, e.g. '2 3 2 4'.");
                return Ok(true);
            }
        },
        _ => {
            println!("Invalid input format. Use 'x1 y1 x2 y2', 'h', 'p <power>', 'd <kind> x y' or 'q'.");
            return Ok(true);
        }
    };

    match result {
        Ok(()) => engine.settle().context("board could not be settled")?,
        Err(e) => println!("{}", e),
    }
    Ok(true)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args.log);

    let mut engine =
        BoardEngine::new(args.level.to_config()).context("failed to set up the board")?;
    println!("Welcome to Manna Match!");
    println!(
        "Powers: {}",
        FaithPower::ALL
            .iter()
            .map(|p| p.name())
            .collect::<Vec<_>>()
            .join(", ")
    );

    loop {
        for event in engine.drain_events().collect::<Vec<_>>() {
            if let Some(text) = describe(&event) {
                println!("{}", text);
            }
        }

        println!("---------------------");
        println!(
            "Moves: {}, Score: {}, Faith: {:.1}/{}",
            engine.moves_left(),
            engine.score(),
            engine.faith_meter(),
            FAITH_METER_MAX
        );
        println!("{}", engine.grid().to_string_with_highlight(None));

        if engine.is_level_over() {
            println!();
            println!("---------------------");
            println!("GAME OVER!");
            println!("Final Score: {}", engine.score());
            println!("Stars: {}", engine.config().stars_for(engine.score()));
            println!("---------------------");
            break;
        }

        print!("Swap (x1 y1 x2 y2), 'h' hint, 'p <power>', 'd <kind> x y', 'q' quit: ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        if !handle_command(&mut engine, input.trim())? {
            println!("Thanks for playing!");
            break;
        }
    }
    Ok(())
}
