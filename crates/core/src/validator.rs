//! Move validation
//!
//! One predicate decides every transform. Bounds and occupancy are reported as
//! separate outcomes because the consequence depends on the direction: a side
//! step that is blocked is simply dropped, a downward step that is blocked
//! means the piece has landed.

use serde::Serialize;

use crate::pieces::Piece;
use crate::playfield::Playfield;
use crate::types::{Coord, Rotation};

/// Outcome of validating a trial placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Verdict {
    Allowed,
    BlockedByGeometry,
    BlockedByBounds,
}

impl Verdict {
    pub fn is_allowed(self) -> bool {
        self == Verdict::Allowed
    }
}

/// Validate `piece` at `trial_origin` / `trial_rotation` against `playfield`
///
/// Cells left of column 0, right of the last column, below the floor or above
/// the ceiling are out of bounds. Cells the piece already covers never block
/// it, so a piece may always be re-validated in place.
pub fn validate(
    piece: &Piece,
    trial_origin: Coord,
    trial_rotation: Rotation,
    playfield: &Playfield,
) -> Verdict {
    let trial_cells = piece.cells_at(trial_origin, trial_rotation);

    if trial_cells.iter().any(|&c| !playfield.in_bounds(c)) {
        return Verdict::BlockedByBounds;
    }

    let current = piece.cells();
    let blocked = trial_cells
        .iter()
        .filter(|c| !current.contains(c))
        .any(|&c| playfield.is_occupied(c));

    if blocked {
        Verdict::BlockedByGeometry
    } else {
        Verdict::Allowed
    }
}

/// Validate a fresh placement where every cell must be free
///
/// A newly spawned piece has no footprint of its own yet, so nothing is
/// excluded from the occupancy check.
pub fn validate_spawn(piece: &Piece, playfield: &Playfield) -> Verdict {
    let cells = piece.cells();
    if cells.iter().any(|&c| !playfield.in_bounds(c)) {
        Verdict::BlockedByBounds
    } else if cells.iter().any(|&c| playfield.is_occupied(c)) {
        Verdict::BlockedByGeometry
    } else {
        Verdict::Allowed
    }
}

/// Lowest origin the piece can fall to from where it is
pub fn landing_origin(piece: &Piece, playfield: &Playfield) -> Coord {
    let mut origin = piece.origin;
    loop {
        let below = Coord::new(origin.x, origin.y - 1);
        if !validate(piece, below, piece.rotation, playfield).is_allowed() {
            return origin;
        }
        origin = below;
    }
}
