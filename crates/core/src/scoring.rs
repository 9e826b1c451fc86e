//! Scoring module - points awarded per clear event
//!
//! Scoring is a policy, not an invariant: the only guarantee is that score
//! never decreases. Three policies are available:
//! - `FixedPerClear`: the same award for every clear event, however many rows
//! - `PerRow`: a flat award for each cleared row
//! - `Classic`: 40 / 100 / 300 / 1200 scaled by (level + 1); clears of more
//!   than four rows use the four-row value

use serde::{Deserialize, Serialize};

use crate::types::{LINES_PER_LEVEL, LINE_SCORES};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScoringPolicy {
    FixedPerClear(u32),
    PerRow(u32),
    Classic,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        ScoringPolicy::Classic
    }
}

impl ScoringPolicy {
    /// Points for clearing `rows` rows at `level`
    pub fn award(&self, rows: usize, level: u32) -> u32 {
        if rows == 0 {
            return 0;
        }
        match *self {
            ScoringPolicy::FixedPerClear(points) => points,
            ScoringPolicy::PerRow(points) => points.saturating_mul(rows as u32),
            ScoringPolicy::Classic => calculate_line_score(rows, level),
        }
    }
}

/// Classic line clear score
pub fn calculate_line_score(rows: usize, level: u32) -> u32 {
    if rows == 0 {
        return 0;
    }
    let base = LINE_SCORES[rows.min(LINE_SCORES.len() - 1)];
    base.saturating_mul(level.saturating_add(1))
}

/// Level reached after `lines` cleared rows
pub fn level_for_lines(lines: u32) -> u32 {
    lines / LINES_PER_LEVEL
}
