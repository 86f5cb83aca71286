//! Error types for the engine.
//!
//! Every engine error is recoverable: the caller (a session or a CLI) decides
//! whether to retry, reload or abort.

use thiserror::Error;

use crate::entity::PlayerId;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the grid, the movement engine and the turn controller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A coordinate fell outside the grid. Access is never clamped.
    #[error("cell (y={y}, x={x}) is outside the {height}x{width} grid")]
    OutOfBounds {
        y: usize,
        x: usize,
        height: usize,
        width: usize,
    },
    /// The round already reached `Won` or `Draw`.
    #[error("the round is over, no more moves are accepted")]
    RoundOver,
    /// Both players would start on a shared cell.
    #[error("start cells (x={x}, y={y}) overlap")]
    OverlappingStarts { x: usize, y: usize },
    /// An AI move was requested for a human-controlled player.
    #[error("player {0} is not driven by the AI")]
    NotAiTurn(PlayerId),
    #[error(transparent)]
    MapFormat(#[from] MapFormatError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// A rejected option update. The previous value is kept.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("unknown option `{0}`")]
    UnknownOption(String),
    #[error("no option with index {0}")]
    UnknownIndex(usize),
    #[error("option {option} expects a number in {min}..={max}, got `{value}`")]
    InvalidNumber {
        option: &'static str,
        value: String,
        min: usize,
        max: usize,
    },
    #[error("option {option} expects a single character, got `{value}`")]
    InvalidChar { option: &'static str, value: String },
    #[error("option {option} expects a boolean, got `{value}`")]
    InvalidBool { option: &'static str, value: String },
    #[error("unknown difficulty `{0}` (expected 1/easy or 2/hard)")]
    InvalidDifficulty(String),
    #[error("option {option} would reuse `{ch}`, already bound to {other}")]
    Conflict {
        option: &'static str,
        ch: char,
        other: &'static str,
    },
}

/// A map file that does not describe a rectangular grid of known tokens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapFormatError {
    #[error("map is empty")]
    Empty,
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("unknown token `{ch}` at row {row}, column {col}")]
    UnknownToken { row: usize, col: usize, ch: char },
    #[error("map has no cell for player {0}")]
    MissingPlayer(PlayerId),
    #[error("cells of player {0} do not form a filled rectangle")]
    BrokenFootprint(PlayerId),
}
