//! Pieces module - shape tables and the active piece
//!
//! Shapes are data: every kind maps to a precomputed list of rotation states,
//! each an ordered set of cell offsets from the piece origin (y grows upward).
//! Rotating a piece is an exact index lookup, never a coordinate transform.

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::{Coord, Direction, OccupantId, Offset, PieceKind, Rotation, MAX_PIECE_CELLS};

/// Cell offsets of one rotation state
pub type CellOffsets = ArrayVec<Offset, MAX_PIECE_CELLS>;

/// Absolute cells of a placed piece
pub type PieceCells = ArrayVec<Coord, MAX_PIECE_CELLS>;

fn offsets(cells: &[Offset]) -> CellOffsets {
    cells.iter().copied().collect()
}

/// All rotation states of a single piece kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeEntry {
    pub kind: PieceKind,
    pub rotations: Vec<CellOffsets>,
}

impl ShapeEntry {
    pub fn new(kind: PieceKind, rotations: &[&[Offset]]) -> Self {
        Self {
            kind,
            rotations: rotations.iter().map(|r| offsets(r)).collect(),
        }
    }

    pub fn rotation_count(&self) -> usize {
        self.rotations.len()
    }

    /// Offsets for `rotation`, wrapping out-of-range indices
    pub fn offsets(&self, rotation: Rotation) -> &[Offset] {
        if self.rotations.is_empty() {
            return &[];
        }
        &self.rotations[rotation.index() % self.rotations.len()]
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.rotations.is_empty() {
            return Err(ConfigError::NoRotations { kind: self.kind });
        }
        for (rotation, cells) in self.rotations.iter().enumerate() {
            if cells.is_empty() {
                return Err(ConfigError::EmptyRotation {
                    kind: self.kind,
                    rotation,
                });
            }
            for (i, &(dx, dy)) in cells.iter().enumerate() {
                if cells[..i].contains(&(dx, dy)) {
                    return Err(ConfigError::DuplicateCell {
                        kind: self.kind,
                        rotation,
                        dx,
                        dy,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Kind → rotation states lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShapeTable {
    entries: Vec<ShapeEntry>,
}

impl ShapeTable {
    pub fn from_entries(entries: Vec<ShapeEntry>) -> Self {
        Self { entries }
    }

    /// The seven tetrominoes with four rotation states each (O has one)
    pub fn standard() -> Self {
        Self::from_entries(vec![
            ShapeEntry::new(
                PieceKind::I,
                &[
                    &[(0, -1), (1, -1), (2, -1), (3, -1)],
                    &[(2, 0), (2, -1), (2, -2), (2, -3)],
                    &[(0, -2), (1, -2), (2, -2), (3, -2)],
                    &[(1, 0), (1, -1), (1, -2), (1, -3)],
                ],
            ),
            ShapeEntry::new(PieceKind::O, &[&[(1, 0), (2, 0), (1, -1), (2, -1)]]),
            ShapeEntry::new(
                PieceKind::T,
                &[
                    &[(1, 0), (0, -1), (1, -1), (2, -1)],
                    &[(1, 0), (1, -1), (2, -1), (1, -2)],
                    &[(0, -1), (1, -1), (2, -1), (1, -2)],
                    &[(1, 0), (0, -1), (1, -1), (1, -2)],
                ],
            ),
            ShapeEntry::new(
                PieceKind::S,
                &[
                    &[(1, 0), (2, 0), (0, -1), (1, -1)],
                    &[(1, 0), (1, -1), (2, -1), (2, -2)],
                    &[(1, -1), (2, -1), (0, -2), (1, -2)],
                    &[(0, 0), (0, -1), (1, -1), (1, -2)],
                ],
            ),
            ShapeEntry::new(
                PieceKind::Z,
                &[
                    &[(0, 0), (1, 0), (1, -1), (2, -1)],
                    &[(2, 0), (1, -1), (2, -1), (1, -2)],
                    &[(0, -1), (1, -1), (1, -2), (2, -2)],
                    &[(1, 0), (0, -1), (1, -1), (0, -2)],
                ],
            ),
            ShapeEntry::new(
                PieceKind::J,
                &[
                    &[(0, 0), (0, -1), (1, -1), (2, -1)],
                    &[(1, 0), (2, 0), (1, -1), (1, -2)],
                    &[(0, -1), (1, -1), (2, -1), (2, -2)],
                    &[(1, 0), (1, -1), (0, -2), (1, -2)],
                ],
            ),
            ShapeEntry::new(
                PieceKind::L,
                &[
                    &[(2, 0), (0, -1), (1, -1), (2, -1)],
                    &[(1, 0), (1, -1), (1, -2), (2, -2)],
                    &[(0, -1), (1, -1), (2, -1), (0, -2)],
                    &[(0, 0), (1, 0), (1, -1), (1, -2)],
                ],
            ),
        ])
    }

    /// Standard table plus the single-cell and three-cell blocks
    pub fn with_extended() -> Self {
        let mut table = Self::standard();
        table
            .entries
            .push(ShapeEntry::new(PieceKind::Dot, &[&[(0, 0)]]));
        table.entries.push(ShapeEntry::new(
            PieceKind::Bar3,
            &[&[(1, 0), (1, -1), (1, -2)], &[(0, -1), (1, -1), (2, -1)]],
        ));
        table
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.entries.is_empty() {
            return Err(ConfigError::EmptyShapeTable);
        }
        for (i, entry) in self.entries.iter().enumerate() {
            if self.entries[..i].iter().any(|e| e.kind == entry.kind) {
                return Err(ConfigError::DuplicateKind { kind: entry.kind });
            }
            entry.validate()?;
        }
        Ok(())
    }

    pub fn get(&self, kind: PieceKind) -> Option<&ShapeEntry> {
        self.entries.iter().find(|e| e.kind == kind)
    }

    pub fn contains(&self, kind: PieceKind) -> bool {
        self.get(kind).is_some()
    }

    /// Kinds in table order
    pub fn kinds(&self) -> Vec<PieceKind> {
        self.entries.iter().map(|e| e.kind).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ShapeTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// The active falling piece
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    pub id: u32,
    pub kind: PieceKind,
    pub color: u8,
    pub origin: Coord,
    pub rotation: Rotation,
    shape: ShapeEntry,
}

impl Piece {
    /// Create a piece in its spawn orientation
    pub fn new(id: u32, shape: &ShapeEntry, color: u8, origin: Coord) -> Self {
        Self {
            id,
            kind: shape.kind,
            color,
            origin,
            rotation: Rotation::SPAWN,
            shape: shape.clone(),
        }
    }

    /// Absolute cells for a trial placement; pure
    pub fn cells_at(&self, origin: Coord, rotation: Rotation) -> PieceCells {
        self.shape
            .offsets(rotation)
            .iter()
            .map(|&offset| origin.offset(offset))
            .collect()
    }

    /// Absolute cells of the current placement
    pub fn cells(&self) -> PieceCells {
        self.cells_at(self.origin, self.rotation)
    }

    /// Rotation state after `delta` quarter turns (no legality check)
    pub fn rotate(&self, delta: i32) -> Rotation {
        self.rotation.turned(delta, self.shape.rotation_count())
    }

    pub fn rotation_count(&self) -> usize {
        self.shape.rotation_count()
    }

    /// Origin one step away in `direction`
    pub fn stepped(&self, direction: Direction) -> Coord {
        self.origin.step(direction)
    }

    /// Identity stamped onto committed cells
    pub fn occupant(&self) -> OccupantId {
        OccupantId {
            piece: self.id,
            kind: self.kind,
            color: self.color,
        }
    }
}
