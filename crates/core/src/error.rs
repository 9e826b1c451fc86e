//! Error types for the core simulation and its configuration.

use thiserror::Error;

use crate::types::{Coord, OccupantId, PieceKind};

/// Invariant violations inside the simulation.
///
/// None of these occur in a correct game; they indicate a logic defect upstream
/// and are propagated to the driver instead of being papered over.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("cell {coord} is outside the playfield")]
    OutOfBounds { coord: Coord },

    #[error("cell {coord} is already occupied by piece #{} ({})", .existing.piece, .existing.kind)]
    OccupancyConflict { coord: Coord, existing: OccupantId },

    #[error("row {row} is not full and cannot be cleared")]
    InvalidRowClear { row: i32 },
}

/// Rejected game configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("playfield must be at least 1x1 and at most 1048576 cells, got {width}x{height}")]
    InvalidDimensions { width: i32, height: i32 },

    #[error("kill line {kill_line} must lie within 1..={height}")]
    InvalidKillLine { kill_line: i32, height: i32 },

    #[error("spawn origin {spawn} lies outside the {width}x{height} playfield")]
    SpawnOutOfBounds { spawn: Coord, width: i32, height: i32 },

    #[error("fall interval must be in (0, 3600] seconds, got {0}")]
    InvalidFallInterval(f64),

    #[error("shape table is empty")]
    EmptyShapeTable,

    #[error("shape {kind} has no rotation states")]
    NoRotations { kind: PieceKind },

    #[error("shape {kind} rotation {rotation} has no cells")]
    EmptyRotation { kind: PieceKind, rotation: usize },

    #[error("shape {kind} rotation {rotation} lists cell ({dx}, {dy}) twice")]
    DuplicateCell {
        kind: PieceKind,
        rotation: usize,
        dx: i32,
        dy: i32,
    },

    #[error("shape {kind} is defined more than once")]
    DuplicateKind { kind: PieceKind },

    #[error("piece sequence is empty")]
    EmptySequence,

    #[error("piece sequence names {kind}, which the shape table does not define")]
    UnknownKind { kind: PieceKind },

    #[error("palette must hold at least one color")]
    EmptyPalette,

    #[error("invalid value {value:?} for {var}")]
    InvalidEnv { var: &'static str, value: String },

    #[error("config parse error: {0}")]
    Json(#[from] serde_json::Error),
}
