//! Error types shared by every module of the engine.

use crate::engine::Phase;
use crate::grid::Position;
use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while building or driving a board.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A tile type or special kind name outside the known vocabulary.
    #[error("invalid tile type `{0}`")]
    InvalidTileType(String),

    /// Zero-sized or non-rectangular grid input.
    #[error("invalid grid shape: {0}")]
    InvalidGridShape(String),

    #[error("position {0} is outside the grid")]
    OutOfBounds(Position),

    #[error("unknown faith power `{0}`")]
    UnknownPower(String),

    /// Generation or reshuffling could not produce a playable board.
    #[error("board generation failed after {attempts} attempts")]
    BoardGenerationFailed { attempts: u32 },

    /// The command was ignored; nothing on the board changed.
    #[error("command rejected: {0}")]
    Rejected(Rejection),
}

/// Why a command was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("engine is busy in phase {0:?}")]
    WrongPhase(Phase),
    #[error("engine is paused")]
    Paused,
    #[error("level is over")]
    LevelOver,
    #[error("positions are not adjacent")]
    NotAdjacent,
    #[error("faith meter is not full")]
    MeterNotFull,
    #[error("no match on the board to double")]
    NothingToDouble,
    #[error("no move available to hint")]
    NoHintAvailable,
}

impl From<Rejection> for Error {
    fn from(rejection: Rejection) -> Self {
        Error::Rejected(rejection)
    }
}
