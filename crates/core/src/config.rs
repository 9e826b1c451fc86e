//! Game configuration
//!
//! Everything the controller needs at construction. Any subset of fields can
//! be given as JSON; the rest fall back to the defaults. Environment overrides
//! follow the `BLOCKFALL_*` naming.

use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::pieces::ShapeTable;
use crate::rng::PieceSelection;
use crate::scoring::ScoringPolicy;
use crate::types::{
    Coord, DEFAULT_FALL_INTERVAL_SECS, DEFAULT_HEIGHT, DEFAULT_KILL_LINE, DEFAULT_PALETTE_SIZE,
    DEFAULT_SPAWN, DEFAULT_WIDTH,
};

/// Largest accepted `width * height`
pub const MAX_PLAYFIELD_CELLS: i32 = 1 << 20;

/// Longest accepted auto-fall interval, one hour
pub const MAX_FALL_INTERVAL_SECS: f64 = 3600.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameConfig {
    pub width: i32,
    pub height: i32,
    /// Committing a cell with `y >= kill_line` ends the session
    pub kill_line: i32,
    pub spawn: Coord,
    /// Seconds between automatic downward steps
    pub fall_interval_secs: f64,
    pub shapes: ShapeTable,
    pub selection: PieceSelection,
    pub scoring: ScoringPolicy,
    pub palette_size: u8,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            kill_line: DEFAULT_KILL_LINE,
            spawn: Coord::new(DEFAULT_SPAWN.0, DEFAULT_SPAWN.1),
            fall_interval_secs: DEFAULT_FALL_INTERVAL_SECS,
            shapes: ShapeTable::standard(),
            selection: PieceSelection::default(),
            scoring: ScoringPolicy::default(),
            palette_size: DEFAULT_PALETTE_SIZE,
        }
    }
}

fn env_parse<T: std::str::FromStr>(var: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(var) {
        Ok(raw) => {
            let value = raw.trim();
            if value.is_empty() {
                return Ok(None);
            }
            value
                .parse::<T>()
                .map(Some)
                .map_err(|_| ConfigError::InvalidEnv {
                    var,
                    value: raw.clone(),
                })
        }
        Err(_) => Ok(None),
    }
}

impl GameConfig {
    /// Parse a (possibly partial) JSON config
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Defaults overridden by environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_overrides()
    }

    /// Apply `BLOCKFALL_WIDTH`, `BLOCKFALL_HEIGHT`, `BLOCKFALL_KILL_LINE`,
    /// `BLOCKFALL_FALL_INTERVAL` and `BLOCKFALL_SEED` on top of `self`
    pub fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        if let Some(width) = env_parse("BLOCKFALL_WIDTH")? {
            self.width = width;
        }
        if let Some(height) = env_parse("BLOCKFALL_HEIGHT")? {
            self.height = height;
        }
        if let Some(kill_line) = env_parse("BLOCKFALL_KILL_LINE")? {
            self.kill_line = kill_line;
        }
        if let Some(secs) = env_parse("BLOCKFALL_FALL_INTERVAL")? {
            self.fall_interval_secs = secs;
        }
        if let Some(seed) = env_parse::<u64>("BLOCKFALL_SEED")? {
            self.selection = self.selection.reseeded(seed);
        }
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let cells = self.width.checked_mul(self.height);
        if self.width < 1
            || self.height < 1
            || cells.map_or(true, |n| n > MAX_PLAYFIELD_CELLS)
        {
            return Err(ConfigError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.kill_line < 1 || self.kill_line > self.height {
            return Err(ConfigError::InvalidKillLine {
                kill_line: self.kill_line,
                height: self.height,
            });
        }
        let spawn = self.spawn;
        if spawn.x < 0 || spawn.x >= self.width || spawn.y < 0 || spawn.y >= self.height {
            return Err(ConfigError::SpawnOutOfBounds {
                spawn,
                width: self.width,
                height: self.height,
            });
        }
        // NaN fails both comparisons.
        let secs = self.fall_interval_secs;
        if !(secs > 0.0 && secs <= MAX_FALL_INTERVAL_SECS) {
            return Err(ConfigError::InvalidFallInterval(self.fall_interval_secs));
        }

        self.shapes.validate()?;

        if let PieceSelection::Sequence { kinds } = &self.selection {
            if kinds.is_empty() {
                return Err(ConfigError::EmptySequence);
            }
            if let Some(&kind) = kinds.iter().find(|k| !self.shapes.contains(**k)) {
                return Err(ConfigError::UnknownKind { kind });
            }
        }

        if self.palette_size == 0 {
            return Err(ConfigError::EmptyPalette);
        }
        Ok(())
    }

    /// The auto-fall interval; an unrepresentable value falls back to the default
    pub fn fall_interval(&self) -> Duration {
        Duration::try_from_secs_f64(self.fall_interval_secs)
            .unwrap_or_else(|_| Duration::from_secs_f64(DEFAULT_FALL_INTERVAL_SECS))
    }
}
