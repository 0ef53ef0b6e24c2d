//! Outcome events produced by the board engine.
//!
//! The engine queues events while it processes commands and ticks; the
//! UI/audio/save collaborators drain the queue whenever they like. Nothing in
//! the engine depends on whether anyone reads them.

use crate::engine::FaithPower;
use crate::grid::Position;
use crate::tile::{SpecialKind, TileType};

/// Size and type of one scored match, reported for objective tracking.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatchSummary {
    pub matched_type: TileType,
    pub size: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub enum BoardEvent {
    ScoreChanged(u32),
    MovesChanged(u32),
    FaithMeterChanged(f32),
    SpecialTileCreated {
        kind: SpecialKind,
        position: Position,
    },
    SpecialTileActivated {
        kind: SpecialKind,
        position: Position,
    },
    /// Matches scored in one resolution pass.
    ObjectiveProgress {
        matches: Vec<MatchSummary>,
    },
    LevelComplete {
        stars: u8,
        score: u32,
    },
    /// Moves ran out without reaching the first star threshold.
    NoMoreMoves,
    SwapReverted {
        a: Position,
        b: Position,
    },
    BoardShuffled,
    PowerActivated(FaithPower),
    HintShown {
        a: Position,
        b: Position,
    },
}
