//! # Manna Match
//!
//! This library provides the grid engine of a match-3 puzzle game: tile
//! model, match detection, scoring, board generation and the tick-driven
//! resolution state machine with its faith meter, special tiles and faith
//! powers.
//!
//! It is used by three binaries:
//! - `human_player`: Interactive play on the command line.
//! - `autoplay`: Plays one seeded level with a move strategy and prints the
//!   outcome.
//! - `strategy_evaluator`: Compares the move strategies over many seeds.
//!
//! ## Modules
//! - `tile`, `grid`: Tile types, special kinds, positions and the 2-D grid.
//! - `matcher`: Runs of three or more, L/T composites and valid-move search.
//! - `scoring`: Match scores, overlap selection and faith meter arithmetic.
//! - `generator`: Weighted tile sampling, match-free generation, refill and
//!   shuffle.
//! - `engine`: `BoardEngine`, the authoritative board state machine.
//! - `events`: Outcome events queued by the engine.
//! - `config`: Level configuration, phase timings and shared CLI options.
//! - `strategy`: Move selection strategies for automated play.
//! - `utils`: Parsing grids from strings and logging setup.
//! - `error`: The crate-wide `Error` type.

pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod generator;
pub mod grid;
pub mod matcher;
pub mod scoring;
pub mod strategy;
pub mod tile;
pub mod utils;

pub use error::{Error, Rejection, Result};
