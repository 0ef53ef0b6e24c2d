//! Board engine: the authoritative state machine that turns commands into a
//! settled board.
//!
//! A command (swap, power) moves the engine out of `Idle`; from there the
//! engine only advances through [`BoardEngine::tick`], which counts down the
//! hold of the current phase and runs the next transition when it expires:
//!
//! ```text
//! Idle -> Swapping -> Reverting -> Idle
//!                  \-> Resolving -> Cascading -> Resolving ... -> Idle
//!                                             \-> Shuffling -> Cascading
//! Idle -> ProcessingPower -> Resolving | Cascading
//! ```
//!
//! Pausing freezes every timer and rejects commands until `resume`.
use crate::config::LevelConfig;
use crate::error::{Error, Rejection, Result};
use crate::events::{BoardEvent, MatchSummary};
use crate::generator::{generate_board, refill, shuffle_board, TileDistribution};
use crate::grid::{Grid, Position};
use crate::matcher::{find_matches, find_potential_matches, Match};
use crate::scoring::{
    charge_meter, faith_gain, group_matches, synthetic_score, FAITH_METER_MAX,
};
use crate::tile::{SpecialKind, TileType};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info, instrument, warn};

/// Share of the board retyped by a manna shower.
const MANNA_SHOWER_SHARE: f64 = 0.3;

/// Upper bound on ticks spent by [`BoardEngine::settle`].
const MAX_SETTLE_TICKS: u32 = 10_000;

/// Externally visible phase of the resolution state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    Idle,
    Swapping,
    Reverting,
    Resolving,
    Cascading,
    Shuffling,
    ProcessingPower,
}

/// Board-wide effects bought with a full faith meter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FaithPower {
    /// Clears two or three contiguous random rows.
    RedSeaParting,
    /// Turns roughly 30% of the tiles into manna.
    MannaShower,
    /// Doubles the score of the matches currently on the board.
    TabletsOfStone,
}

impl FaithPower {
    pub const ALL: [FaithPower; 3] = [
        FaithPower::RedSeaParting,
        FaithPower::MannaShower,
        FaithPower::TabletsOfStone,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FaithPower::RedSeaParting => "redSeaParting",
            FaithPower::MannaShower => "mannaShower",
            FaithPower::TabletsOfStone => "tabletsOfStone",
        }
    }
}

impl FromStr for FaithPower {
    type Err = Error;

    /// Accepts the camelCase names as well as snake/kebab case, ignoring case.
    fn from_str(s: &str) -> Result<Self> {
        let wanted: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();
        FaithPower::ALL
            .iter()
            .copied()
            .find(|p| p.name().to_ascii_lowercase() == wanted)
            .ok_or_else(|| Error::UnknownPower(s.to_string()))
    }
}

impl fmt::Display for FaithPower {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Phase plus the work it carries into its next transition.
#[derive(Clone, Debug)]
enum Stage {
    Idle,
    Swapping { a: Position, b: Position },
    Reverting { a: Position, b: Position },
    Resolving { consumed: BTreeSet<Position> },
    Cascading,
    Shuffling,
    ProcessingPower { power: FaithPower, snapshot: Vec<Match> },
}

impl Stage {
    fn phase(&self) -> Phase {
        match self {
            Stage::Idle => Phase::Idle,
            Stage::Swapping { .. } => Phase::Swapping,
            Stage::Reverting { .. } => Phase::Reverting,
            Stage::Resolving { .. } => Phase::Resolving,
            Stage::Cascading => Phase::Cascading,
            Stage::Shuffling => Phase::Shuffling,
            Stage::ProcessingPower { .. } => Phase::ProcessingPower,
        }
    }
}

/// Faith earned by the swap being resolved, recomputed after every pass
/// from the tiles consumed so far.
#[derive(Clone, Copy, Debug, PartialEq)]
struct MeterCharge {
    /// Meter value when the swap committed.
    base: f32,
    consumed: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Hint {
    a: Position,
    b: Position,
    remaining_ms: u32,
}

/// Cells cleared when a special tile of `kind` at `pos` is consumed.
pub fn activation_area(grid: &Grid, kind: SpecialKind, pos: Position) -> Vec<Position> {
    match kind {
        SpecialKind::Staff => (0..grid.width()).map(|x| Position::new(x, pos.y)).collect(),
        SpecialKind::Pillar => (0..grid.height()).map(|y| Position::new(pos.x, y)).collect(),
        SpecialKind::Tablets => {
            let xs = pos.x.saturating_sub(1)..=(pos.x + 1).min(grid.width() - 1);
            let ys = pos.y.saturating_sub(1)..=(pos.y + 1).min(grid.height() - 1);
            ys.flat_map(|y| xs.clone().map(move |x| Position::new(x, y)))
                .collect()
        }
    }
}

/// Owns one live board and its session state.
///
/// # Examples
/// ```
/// use manna_match::config::{LevelConfig, Timings};
/// use manna_match::engine::{BoardEngine, Phase};
///
/// let config = LevelConfig::default().with_timings(Timings::instant());
/// let mut engine = BoardEngine::new(config).unwrap();
/// assert_eq!(engine.phase(), Phase::Idle);
///
/// let (a, b) = engine.find_valid_moves()[0];
/// engine.attempt_swap(a, b).unwrap();
/// engine.settle().unwrap();
///
/// assert_eq!(engine.phase(), Phase::Idle);
/// assert_eq!(engine.moves_left(), 19);
/// assert!(engine.score() >= 100);
/// ```
#[derive(Clone, Debug)]
pub struct BoardEngine {
    config: LevelConfig,
    grid: Grid,
    rng: SmallRng,
    stage: Stage,
    /// Time left in the current phase's hold.
    timer_ms: u32,
    paused: bool,
    level_over: bool,
    score: u32,
    moves_left: u32,
    faith_meter: f32,
    /// Set while a swap-driven chain is resolving; power chains do not
    /// charge the meter.
    charge: Option<MeterCharge>,
    /// Resolution passes run by the current command.
    chain: u32,
    hint: Option<Hint>,
    events: Vec<BoardEvent>,
}

impl BoardEngine {
    /// Creates an engine and sets up a fresh board from `config`.
    pub fn new(config: LevelConfig) -> Result<Self> {
        let rng = SmallRng::seed_from_u64(config.seed);
        let grid = Grid::new_empty(config.width, config.height)?;
        let mut engine = Self::with_parts(config, grid, rng);
        let (width, height, distribution) = (
            engine.config.width,
            engine.config.height,
            engine.config.distribution.clone(),
        );
        engine.setup_board(width, height, distribution)?;
        Ok(engine)
    }

    /// Creates an engine around a prepared grid, skipping generation.
    ///
    /// The grid is used as-is (it may contain matches); it must have no
    /// empty cells.
    pub fn new_with_grid(config: LevelConfig, grid: Grid) -> Result<Self> {
        if !grid.is_full() {
            return Err(Error::InvalidGridShape("grid has empty cells".to_string()));
        }
        let rng = SmallRng::seed_from_u64(config.seed);
        let mut config = config;
        config.width = grid.width();
        config.height = grid.height();
        Ok(Self::with_parts(config, grid, rng))
    }

    fn with_parts(config: LevelConfig, grid: Grid, rng: SmallRng) -> Self {
        let moves_left = config.moves;
        BoardEngine {
            config,
            grid,
            rng,
            stage: Stage::Idle,
            timer_ms: 0,
            paused: false,
            level_over: false,
            score: 0,
            moves_left,
            faith_meter: 0.0,
            charge: None,
            chain: 0,
            hint: None,
            events: Vec::new(),
        }
    }

    /// (Re)initializes a match-free board with at least one valid move and
    /// resets score, moves and faith meter. Accepted in any phase.
    ///
    /// On error the previous board and session are left untouched.
    #[instrument(skip(self, distribution))]
    pub fn setup_board(
        &mut self,
        width: usize,
        height: usize,
        distribution: TileDistribution,
    ) -> Result<()> {
        let grid = generate_board(width, height, &distribution, &mut self.rng)?;

        self.config.width = width;
        self.config.height = height;
        self.config.distribution = distribution;
        self.grid = grid;
        self.stage = Stage::Idle;
        self.timer_ms = 0;
        self.paused = false;
        self.level_over = false;
        self.score = 0;
        self.moves_left = self.config.moves;
        self.faith_meter = 0.0;
        self.charge = None;
        self.chain = 0;
        self.hint = None;

        self.events.push(BoardEvent::ScoreChanged(self.score));
        self.events.push(BoardEvent::MovesChanged(self.moves_left));
        self.events.push(BoardEvent::FaithMeterChanged(self.faith_meter));
        info!(width, height, moves = self.moves_left, "board set up");
        Ok(())
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn config(&self) -> &LevelConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.stage.phase()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_level_over(&self) -> bool {
        self.level_over
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn moves_left(&self) -> u32 {
        self.moves_left
    }

    pub fn faith_meter(&self) -> f32 {
        self.faith_meter
    }

    /// Time left in the current phase's hold.
    pub fn phase_remaining_ms(&self) -> u32 {
        self.timer_ms
    }

    /// The currently highlighted hint pair, if any.
    pub fn hint(&self) -> Option<(Position, Position)> {
        self.hint.map(|h| (h.a, h.b))
    }

    /// Every adjacent swap that would produce a match on the current grid.
    pub fn find_valid_moves(&self) -> Vec<(Position, Position)> {
        find_potential_matches(&self.grid)
    }

    /// Removes and returns all queued events, oldest first.
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, BoardEvent> {
        self.events.drain(..)
    }

    fn ensure_ready(&self) -> Result<()> {
        if self.paused {
            return Err(Rejection::Paused.into());
        }
        if self.level_over {
            return Err(Rejection::LevelOver.into());
        }
        match self.stage {
            Stage::Idle => Ok(()),
            _ => Err(Rejection::WrongPhase(self.phase()).into()),
        }
    }

    fn check_bounds(&self, pos: Position) -> Result<()> {
        if self.grid.in_bounds(pos) {
            Ok(())
        } else {
            Err(Error::OutOfBounds(pos))
        }
    }

    fn enter(&mut self, stage: Stage, hold_ms: u32) {
        debug!(from = ?self.stage.phase(), to = ?stage.phase(), hold_ms, "phase transition");
        self.stage = stage;
        self.timer_ms = hold_ms;
    }

    /// Starts swapping the contents of two adjacent cells.
    ///
    /// # Errors
    /// `Rejected` when paused, after the level ended, outside `Idle`, or when
    /// the positions are not adjacent; `OutOfBounds` for positions off the
    /// grid. A rejected swap changes nothing.
    #[instrument(skip(self))]
    pub fn attempt_swap(&mut self, a: Position, b: Position) -> Result<()> {
        self.ensure_ready()?;
        self.check_bounds(a)?;
        self.check_bounds(b)?;
        if !a.is_adjacent(&b) {
            return Err(Rejection::NotAdjacent.into());
        }

        self.clear_hint();
        for pos in [a, b] {
            if let Some(tile) = self.grid.get_mut(pos) {
                tile.flags.selected = true;
            }
        }
        let hold = self.config.timings.swap_ms;
        self.enter(Stage::Swapping { a, b }, hold);
        Ok(())
    }

    /// Highlights one random valid move for the hint window.
    pub fn show_hint(&mut self) -> Result<(Position, Position)> {
        self.ensure_ready()?;
        let pairs = find_potential_matches(&self.grid);
        let &(a, b) = pairs
            .choose(&mut self.rng)
            .ok_or(Error::Rejected(Rejection::NoHintAvailable))?;

        self.clear_hint();
        for pos in [a, b] {
            if let Some(tile) = self.grid.get_mut(pos) {
                tile.flags.hinted = true;
            }
        }
        self.hint = Some(Hint {
            a,
            b,
            remaining_ms: self.config.timings.hint_ms,
        });
        self.events.push(BoardEvent::HintShown { a, b });
        Ok((a, b))
    }

    fn clear_hint(&mut self) {
        if let Some(hint) = self.hint.take() {
            for pos in [hint.a, hint.b] {
                if let Some(tile) = self.grid.get_mut(pos) {
                    tile.flags.hinted = false;
                }
            }
        }
    }

    /// Freezes all timers and rejects commands until [`BoardEngine::resume`].
    pub fn pause(&mut self) {
        if !self.paused {
            debug!(phase = ?self.phase(), "paused");
            self.paused = true;
        }
    }

    /// Continues exactly where [`BoardEngine::pause`] stopped.
    pub fn resume(&mut self) {
        if self.paused {
            debug!(phase = ?self.phase(), "resumed");
            self.paused = false;
        }
    }

    /// Spends a full faith meter on `power`.
    ///
    /// # Errors
    /// `Rejected` when paused, after the level ended, outside `Idle`, when the
    /// meter is not full, or (for `TabletsOfStone`) when the board holds no
    /// match. A rejected activation changes nothing.
    #[instrument(skip(self))]
    pub fn activate_faith_power(&mut self, power: FaithPower) -> Result<()> {
        self.ensure_ready()?;
        if self.faith_meter < FAITH_METER_MAX {
            return Err(Rejection::MeterNotFull.into());
        }
        let snapshot = match power {
            FaithPower::TabletsOfStone => {
                let matches = find_matches(&self.grid);
                if matches.is_empty() {
                    return Err(Rejection::NothingToDouble.into());
                }
                matches
            }
            _ => Vec::new(),
        };

        self.clear_hint();
        self.faith_meter = 0.0;
        self.charge = None;
        self.chain = 0;
        self.events.push(BoardEvent::FaithMeterChanged(self.faith_meter));
        self.events.push(BoardEvent::PowerActivated(power));
        info!(%power, "faith power activated");

        let hold = self.config.timings.power_ms;
        self.enter(Stage::ProcessingPower { power, snapshot }, hold);
        Ok(())
    }

    /// Diagnostic override writing straight into the grid, bypassing match
    /// rules.
    ///
    /// `kind` is either a base type name (places a fresh plain tile) or a
    /// special kind name (turns the existing tile special). Only accepted in
    /// `Idle` while not paused.
    pub fn debug_place_tile(&mut self, kind: &str, x: usize, y: usize) -> Result<()> {
        if self.paused {
            return Err(Rejection::Paused.into());
        }
        if !matches!(self.stage, Stage::Idle) {
            return Err(Rejection::WrongPhase(self.phase()).into());
        }
        let pos = Position::new(x, y);
        self.check_bounds(pos)?;

        if let Ok(t) = kind.parse::<TileType>() {
            self.clear_hint();
            self.grid.spawn(pos, t);
        } else {
            let special = kind.parse::<SpecialKind>()?;
            if let Some(tile) = self.grid.get_mut(pos) {
                tile.special = Some(special);
            }
        }
        warn!(kind, x, y, "debug tile placed");
        Ok(())
    }

    /// Advances the state machine by `elapsed_ms` of virtual time.
    ///
    /// Expired holds run their transition; zero-length holds chain within the
    /// same call. Returns whether any transition ran.
    ///
    /// # Errors
    /// `BoardGenerationFailed` if a reshuffle cannot restore a valid move.
    /// The grid is left as it was and the next tick tries again.
    pub fn tick(&mut self, elapsed_ms: u32) -> Result<bool> {
        if self.paused {
            return Ok(false);
        }

        if let Some(hint) = self.hint.as_mut() {
            hint.remaining_ms = hint.remaining_ms.saturating_sub(elapsed_ms);
            if hint.remaining_ms == 0 {
                self.clear_hint();
            }
        }

        if matches!(self.stage, Stage::Idle) {
            return Ok(false);
        }

        self.timer_ms = self.timer_ms.saturating_sub(elapsed_ms);
        let mut advanced = false;
        while self.timer_ms == 0 && !matches!(self.stage, Stage::Idle) {
            self.advance()?;
            advanced = true;
        }
        Ok(advanced)
    }

    /// Ticks until the engine is back in `Idle` (or paused).
    pub fn settle(&mut self) -> Result<()> {
        for _ in 0..MAX_SETTLE_TICKS {
            if self.paused || matches!(self.stage, Stage::Idle) {
                return Ok(());
            }
            let step = self.timer_ms.max(1);
            self.tick(step)?;
        }
        warn!(phase = ?self.phase(), "engine did not settle");
        Ok(())
    }

    /// Runs the transition out of the current phase.
    fn advance(&mut self) -> Result<()> {
        let stage = std::mem::replace(&mut self.stage, Stage::Idle);
        match stage {
            Stage::Idle => {}
            Stage::Swapping { a, b } => self.commit_swap(a, b),
            Stage::Reverting { a, b } => {
                self.grid.swap_contents(a, b);
                self.events.push(BoardEvent::SwapReverted { a, b });
                self.enter(Stage::Idle, 0);
            }
            Stage::Resolving { consumed } => self.remove_and_cascade(&consumed),
            Stage::Cascading => self.after_cascade()?,
            Stage::Shuffling => self.enter(Stage::Cascading, 0),
            Stage::ProcessingPower { power, snapshot } => self.apply_power(power, snapshot),
        }
        Ok(())
    }

    fn commit_swap(&mut self, a: Position, b: Position) {
        for pos in [a, b] {
            if let Some(tile) = self.grid.get_mut(pos) {
                tile.flags.selected = false;
            }
        }
        self.grid.swap_contents(a, b);

        let matches = find_matches(&self.grid);
        if matches.is_empty() {
            let hold = self.config.timings.revert_ms;
            self.enter(Stage::Reverting { a, b }, hold);
            return;
        }

        self.moves_left = self.moves_left.saturating_sub(1);
        self.events.push(BoardEvent::MovesChanged(self.moves_left));
        self.charge = Some(MeterCharge {
            base: self.faith_meter,
            consumed: 0,
        });
        self.chain = 0;
        self.begin_resolution(&matches, &BTreeSet::new(), 1);
    }

    /// Scores one pass, triggers special tiles, creates new specials and
    /// marks everything to be removed, then holds in `Resolving`.
    ///
    /// Overlapping matches are merged by [`group_matches`], so every matched
    /// tile is consumed and scored once. `synthetic` cells (power clears) are
    /// consumed and scored as one group but never earn a special tile.
    fn begin_resolution(
        &mut self,
        matches: &[Match],
        synthetic: &BTreeSet<Position>,
        score_multiplier: u32,
    ) {
        self.chain += 1;
        let mut consumed: BTreeSet<Position> = BTreeSet::new();
        let mut gained: u32 = 0;
        let mut summaries = Vec::new();
        let mut creations = Vec::new();

        for group in group_matches(matches) {
            gained += group.score() * score_multiplier;
            summaries.push(MatchSummary {
                matched_type: group.matched_type(),
                size: group.len(),
            });
            if let Some(kind) = group.special_reward() {
                creations.push((group.centroid(), group.matched_type(), kind));
            }
            consumed.extend(group.tiles);
        }
        if !synthetic.is_empty() {
            consumed.extend(synthetic.iter().copied());
            gained += synthetic_score(synthetic.len()) * score_multiplier;
        }

        // Specials hit directly fire once; tiles caught in a blast do not
        // trigger further blasts.
        let direct: Vec<Position> = consumed.iter().copied().collect();
        for pos in direct {
            if let Some(kind) = self.grid.get(pos).and_then(|t| t.special) {
                consumed.extend(activation_area(&self.grid, kind, pos));
                self.events
                    .push(BoardEvent::SpecialTileActivated { kind, position: pos });
            }
        }
        let consumed_count = consumed.len();

        for (pos, matched_type, kind) in creations {
            consumed.remove(&pos);
            if let Some(tile) = self.grid.get_mut(pos) {
                tile.base_type = matched_type;
                tile.special = Some(kind);
                tile.flags.matched = false;
            }
            self.events
                .push(BoardEvent::SpecialTileCreated { kind, position: pos });
        }

        for &pos in &consumed {
            if let Some(tile) = self.grid.get_mut(pos) {
                tile.flags.matched = true;
            }
        }

        if gained > 0 {
            self.score = self.score.saturating_add(gained);
            self.events.push(BoardEvent::ScoreChanged(self.score));
        }
        if !summaries.is_empty() {
            self.events
                .push(BoardEvent::ObjectiveProgress { matches: summaries });
        }
        if let Some(charge) = self.charge.as_mut() {
            charge.consumed += consumed_count;
            let before = self.faith_meter;
            self.faith_meter = charge_meter(charge.base, faith_gain(charge.consumed));
            if self.faith_meter != before {
                self.events
                    .push(BoardEvent::FaithMeterChanged(self.faith_meter));
            }
        }
        debug!(
            chain = self.chain,
            consumed = consumed_count,
            gained,
            score = self.score,
            "resolution pass"
        );

        let hold = self.config.timings.match_hold_ms + self.config.timings.removal_ms;
        self.enter(Stage::Resolving { consumed }, hold);
    }

    fn remove_and_cascade(&mut self, consumed: &BTreeSet<Position>) {
        for &pos in consumed {
            self.grid.take(pos);
        }
        let empties = self.grid.apply_gravity();
        refill(
            &mut self.grid,
            &empties,
            &self.config.distribution,
            &mut self.rng,
        );
        let hold = self.config.timings.cascade_ms;
        self.enter(Stage::Cascading, hold);
    }

    fn after_cascade(&mut self) -> Result<()> {
        for tile in self.grid.tiles_mut() {
            tile.flags.moving = false;
        }

        let matches = find_matches(&self.grid);
        if !matches.is_empty() {
            self.begin_resolution(&matches, &BTreeSet::new(), 1);
            return Ok(());
        }

        if find_potential_matches(&self.grid).is_empty() {
            let before = self.grid.clone();
            let attempts =
                match shuffle_board(&mut self.grid, &self.config.distribution, &mut self.rng) {
                    Ok(attempts) => attempts,
                    Err(e) => {
                        // Stay busy on the last settled grid; the next tick retries.
                        warn!(error = %e, "shuffle failed");
                        self.grid = before;
                        self.enter(Stage::Cascading, 0);
                        return Err(e);
                    }
                };
            info!(attempts, "no valid move left, board shuffled");
            self.events.push(BoardEvent::BoardShuffled);
            let hold = self.config.timings.shuffle_ms;
            self.enter(Stage::Shuffling, hold);
            return Ok(());
        }

        self.finish_command();
        Ok(())
    }

    fn finish_command(&mut self) {
        self.enter(Stage::Idle, 0);
        self.charge = None;
        self.chain = 0;

        if self.moves_left == 0 && !self.level_over {
            self.level_over = true;
            let stars = self.config.stars_for(self.score);
            if stars > 0 {
                self.events.push(BoardEvent::LevelComplete {
                    stars,
                    score: self.score,
                });
            } else {
                self.events.push(BoardEvent::NoMoreMoves);
            }
            info!(stars, score = self.score, "level ended");
        }
    }

    fn apply_power(&mut self, power: FaithPower, snapshot: Vec<Match>) {
        match power {
            FaithPower::RedSeaParting => {
                let (width, height) = (self.grid.width(), self.grid.height());
                let rows = self.rng.gen_range(2..=3usize).min(height);
                let start = self.rng.gen_range(0..=height - rows);
                let cleared: BTreeSet<Position> = (start..start + rows)
                    .flat_map(|y| (0..width).map(move |x| Position::new(x, y)))
                    .collect();
                debug!(start, rows, "red sea parting");
                self.begin_resolution(&[], &cleared, 1);
            }
            FaithPower::MannaShower => {
                let positions: Vec<Position> = self.grid.positions().collect();
                let count =
                    (positions.len() as f64 * MANNA_SHOWER_SHARE).round() as usize;
                let chosen: Vec<Position> = positions
                    .choose_multiple(&mut self.rng, count)
                    .copied()
                    .collect();
                for pos in chosen {
                    if let Some(tile) = self.grid.get_mut(pos) {
                        tile.base_type = TileType::Manna;
                    }
                }
                debug!(count, "manna shower");
                let matches = find_matches(&self.grid);
                if matches.is_empty() {
                    self.enter(Stage::Cascading, 0);
                } else {
                    self.begin_resolution(&matches, &BTreeSet::new(), 1);
                }
            }
            FaithPower::TabletsOfStone => {
                self.begin_resolution(&snapshot, &BTreeSet::new(), 2);
            }
        }
    }
}
