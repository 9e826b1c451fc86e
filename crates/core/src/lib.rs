//! Core game logic - pure, deterministic, and testable
//!
//! This crate contains the rules of a falling-block puzzle: grid occupancy,
//! piece shapes, move validation, operation scheduling, row clearing and the
//! game loop that ties them together. It has **no dependencies** on rendering,
//! input devices, or I/O:
//!
//! - **Deterministic**: a seed (or a fixed piece sequence) reproduces a game exactly
//! - **Serialized**: one operation is evaluated and applied at a time
//! - **Observable**: every state transition is announced as a [`GameEvent`]
//!   after the state it describes is final
//!
//! # Module Structure
//!
//! - [`playfield`]: the occupancy grid, row clearing and compaction
//! - [`pieces`]: shape tables and the active piece
//! - [`validator`]: the single predicate deciding every transform
//! - [`scheduler`]: the collapsing priority queue of piece operations
//! - [`line_clear`]: full-row detection, removal and compaction
//! - [`scoring`]: scoring policies and level progression
//! - [`rng`]: seeded uniform, bag and fixed-sequence piece selection
//! - [`game_state`]: the game loop controller
//! - [`events`], [`snapshot`]: outbound notifications and state copies
//! - [`config`], [`error`]: construction parameters and failure kinds
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use blockfall_core::{Game, GameConfig, Progress};
//! use blockfall_core::types::Direction;
//!
//! let mut game = Game::new(GameConfig::default()).unwrap();
//! game.start();
//!
//! game.request_move(Direction::Left);
//! game.request_rotate();
//! let progress = game.request_tick(Duration::from_millis(16)).unwrap();
//!
//! assert_eq!(progress, Progress::Continue);
//! assert!(game.active_piece().is_some());
//! ```
//!
//! # Timing
//!
//! The driver calls [`Game::request_tick`] with the time elapsed since the
//! previous tick. The auto-fall timer accumulates it and enqueues one
//! downward step each time it reaches the configured interval.
//!
//! # Logging
//!
//! Diagnostics go through the `log` facade; installing a logger is up to the
//! binary embedding the core.

pub mod config;
pub mod error;
pub mod events;
pub mod game_state;
pub mod line_clear;
pub mod pieces;
pub mod playfield;
pub mod rng;
pub mod scheduler;
pub mod scoring;
pub mod snapshot;
pub mod validator;

pub use blockfall_types as types;

// Re-export commonly used types for convenience
pub use config::{GameConfig, MAX_FALL_INTERVAL_SECS, MAX_PLAYFIELD_CELLS};
pub use error::{ConfigError, CoreError};
pub use events::{EventBus, EventSink, GameEvent, SubscriptionId, OUTBOX_CAPACITY};
pub use game_state::{Game, GameStatus, PiecePhase, Progress};
pub use line_clear::{clear_full_rows, LineClear};
pub use pieces::{Piece, PieceCells, ShapeEntry, ShapeTable};
pub use playfield::Playfield;
pub use rng::{PieceQueue, PieceSelection};
pub use scheduler::{Enqueued, OperationQueue};
pub use scoring::{calculate_line_score, level_for_lines, ScoringPolicy};
pub use snapshot::{ActiveSnapshot, GameSnapshot};
pub use validator::{landing_origin, validate, validate_spawn, Verdict};
