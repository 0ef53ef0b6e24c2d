//! Move selection strategies used by the autoplay binaries.
//!
//! Every strategy looks at a settled grid and proposes one of the swaps
//! reported by [`find_potential_matches`]. None of them look past the first
//! resolution pass: refills are random, so cascades are not predicted.
use crate::grid::{Grid, Position};
use crate::matcher::{find_matches, find_potential_matches};
use crate::scoring::group_matches;
use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt;

/// Immediate result of one swap, before any refill.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MoveOutcome {
    /// Score of the first resolution pass.
    pub score: u32,
    /// Tiles consumed by the pass, before special activations.
    pub tiles: usize,
    /// Special tiles the pass would create.
    pub specials: usize,
}

/// Simulates swapping `a` and `b` on a copy of `grid` and scores the first
/// resolution pass.
///
/// Special tile activations are not included in the result.
///
/// # Arguments
/// * `grid`: The settled grid to evaluate on. It is not modified.
/// * `a`, `b`: The two cells to swap.
///
/// # Returns
/// `Some(MoveOutcome)` if the swap produces at least one match, `None` if it
/// would be reverted (or either cell is empty or off the grid).
///
/// # Examples
/// ```
/// use manna_match::grid::Position;
/// use manna_match::strategy::evaluate_move;
/// use manna_match::utils::grid_from_str_array;
///
/// let grid = grid_from_str_array(&["MMWM", "SQFS"]).unwrap();
/// let outcome = evaluate_move(&grid, Position::new(2, 0), Position::new(3, 0)).unwrap();
/// assert_eq!(outcome.score, 100);
/// assert_eq!(outcome.tiles, 3);
/// assert!(evaluate_move(&grid, Position::new(0, 1), Position::new(1, 1)).is_none());
/// ```
pub fn evaluate_move(grid: &Grid, a: Position, b: Position) -> Option<MoveOutcome> {
    let mut scratch = grid.clone();
    if !scratch.swap_contents(a, b) {
        return None;
    }
    let matches = find_matches(&scratch);
    if matches.is_empty() {
        return None;
    }

    let mut outcome = MoveOutcome::default();
    for group in group_matches(&matches) {
        outcome.score += group.score();
        outcome.tiles += group.len();
        if group.special_reward().is_some() {
            outcome.specials += 1;
        }
    }
    Some(outcome)
}

/// Chooses the swap with the highest immediate score.
///
/// Ties prefer the swap that creates more special tiles, then the one found
/// first in scan order.
///
/// # Returns
/// `Some((score, (a, b)))` with the expected score of the chosen swap, or
/// `None` when the grid has no valid move.
pub fn choose_move_greedy(grid: &Grid) -> Option<(f64, (Position, Position))> {
    let mut best: Option<(MoveOutcome, (Position, Position))> = None;
    for (a, b) in find_potential_matches(grid) {
        let Some(outcome) = evaluate_move(grid, a, b) else {
            continue;
        };
        let better = match &best {
            None => true,
            Some((current, _)) => {
                (outcome.score, outcome.specials) > (current.score, current.specials)
            }
        };
        if better {
            best = Some((outcome, (a, b)));
        }
    }
    best.map(|(outcome, pair)| (outcome.score as f64, pair))
}

/// Chooses the swap that clears the most tiles in its first pass.
pub fn choose_move_largest(grid: &Grid) -> Option<(f64, (Position, Position))> {
    find_potential_matches(grid)
        .into_iter()
        .filter_map(|(a, b)| evaluate_move(grid, a, b).map(|o| (o.tiles, (a, b))))
        .rev()
        .max_by_key(|(tiles, _)| *tiles)
        .map(|(tiles, pair)| (tiles as f64, pair))
}

/// Chooses the first valid swap in scan order (top-left first).
pub fn choose_move_first(grid: &Grid) -> Option<(f64, (Position, Position))> {
    let (a, b) = find_potential_matches(grid).into_iter().next()?;
    let score = evaluate_move(grid, a, b).map_or(0, |o| o.score);
    Some((score as f64, (a, b)))
}

/// Chooses a uniformly random valid swap.
pub fn choose_move_random<R: Rng + ?Sized>(
    grid: &Grid,
    rng: &mut R,
) -> Option<(f64, (Position, Position))> {
    let moves = find_potential_matches(grid);
    let &(a, b) = moves.choose(rng)?;
    let score = evaluate_move(grid, a, b).map_or(0, |o| o.score);
    Some((score as f64, (a, b)))
}

/// Named strategy, selectable from the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Strategy {
    Greedy,
    Largest,
    First,
    Random,
}

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Strategy::Greedy,
        Strategy::Largest,
        Strategy::First,
        Strategy::Random,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Greedy => "greedy",
            Strategy::Largest => "largest",
            Strategy::First => "first",
            Strategy::Random => "random",
        }
    }

    /// Runs the strategy; `rng` is only drawn from by [`Strategy::Random`].
    pub fn choose<R: Rng + ?Sized>(
        &self,
        grid: &Grid,
        rng: &mut R,
    ) -> Option<(f64, (Position, Position))> {
        match self {
            Strategy::Greedy => choose_move_greedy(grid),
            Strategy::Largest => choose_move_largest(grid),
            Strategy::First => choose_move_first(grid),
            Strategy::Random => choose_move_random(grid, rng),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}
