//! Playfield module - authoritative grid occupancy
//!
//! The playfield is a `width x height` grid where each cell is either empty or
//! owned by the piece that was committed there. Storage is a flat row-major
//! vector (`y * width + x`), so every in-bounds coordinate always has an entry.
//! Coordinates: x grows to the right from 0, y grows upward from the floor row 0.

use crate::error::CoreError;
use crate::types::{Cell, Coord, OccupantId};

/// The game grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playfield {
    width: i32,
    height: i32,
    /// Flat array of cells, row-major order (y * width + x)
    cells: Vec<Cell>,
}

impl Playfield {
    /// Create a new empty playfield
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            cells: vec![None; width as usize * height as usize],
        }
    }

    #[inline(always)]
    fn index(&self, coord: Coord) -> Option<usize> {
        if !self.in_bounds(coord) {
            return None;
        }
        Some(coord.y as usize * self.width as usize + coord.x as usize)
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Check if a coordinate lies on the grid
    pub fn in_bounds(&self, coord: Coord) -> bool {
        coord.x >= 0 && coord.x < self.width && coord.y >= 0 && coord.y < self.height
    }

    /// Get the cell at `coord`; `None` if out of bounds
    pub fn get(&self, coord: Coord) -> Option<Cell> {
        self.index(coord).map(|idx| self.cells[idx])
    }

    /// Whether `coord` holds a committed cell
    ///
    /// Out-of-bounds coordinates answer `false`; callers are expected to have
    /// rejected them before asking.
    pub fn is_occupied(&self, coord: Coord) -> bool {
        matches!(self.get(coord), Some(Some(_)))
    }

    /// Commit a single cell
    ///
    /// Never overwrites: an occupied target is reported as `OccupancyConflict`.
    pub fn occupy(&mut self, coord: Coord, occupant: OccupantId) -> Result<(), CoreError> {
        let idx = self.index(coord).ok_or(CoreError::OutOfBounds { coord })?;
        if let Some(existing) = self.cells[idx] {
            return Err(CoreError::OccupancyConflict { coord, existing });
        }
        self.cells[idx] = Some(occupant);
        Ok(())
    }

    /// Row `y` as a slice, left to right
    pub fn row(&self, y: i32) -> Option<&[Cell]> {
        if y < 0 || y >= self.height {
            return None;
        }
        let start = (y * self.width) as usize;
        Some(&self.cells[start..start + self.width as usize])
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: i32) -> bool {
        self.row(y)
            .map(|row| row.iter().all(|cell| cell.is_some()))
            .unwrap_or(false)
    }

    /// Indices of all full rows, floor to ceiling
    pub fn full_rows(&self) -> Vec<i32> {
        (0..self.height).filter(|&y| self.is_row_full(y)).collect()
    }

    /// Empty every cell of a full row, returning what was removed
    pub fn clear_row(&mut self, y: i32) -> Result<Vec<(Coord, OccupantId)>, CoreError> {
        if !self.is_row_full(y) {
            return Err(CoreError::InvalidRowClear { row: y });
        }

        let start = (y * self.width) as usize;
        let removed = self.cells[start..start + self.width as usize]
            .iter_mut()
            .enumerate()
            .filter_map(|(x, cell)| cell.take().map(|occ| (Coord::new(x as i32, y), occ)))
            .collect();
        Ok(removed)
    }

    /// Drop every occupied cell above row `y` down by `row_count` rows
    ///
    /// The whole region is read into a scratch grid and written back in one
    /// step, so multi-row drops never read a cell that has already been
    /// overwritten. On error the playfield is left untouched.
    pub fn compact_above(&mut self, y: i32, row_count: i32) -> Result<(), CoreError> {
        if row_count <= 0 {
            return Ok(());
        }

        let first = (y + 1).max(0);
        let mut next = self.cells.clone();
        let mut moved = Vec::new();

        for src_y in first..self.height {
            for x in 0..self.width {
                let idx = (src_y * self.width + x) as usize;
                if let Some(occ) = next[idx].take() {
                    moved.push((Coord::new(x, src_y - row_count), occ));
                }
            }
        }

        for (dst, occ) in moved {
            let idx = self.index(dst).ok_or(CoreError::OutOfBounds { coord: dst })?;
            if let Some(existing) = next[idx] {
                return Err(CoreError::OccupancyConflict {
                    coord: dst,
                    existing,
                });
            }
            next[idx] = Some(occ);
        }

        self.cells = next;
        Ok(())
    }

    /// Number of occupied cells
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// Iterate over every occupied cell, row by row from the floor
    pub fn occupied(&self) -> impl Iterator<Item = (Coord, OccupantId)> + '_ {
        let width = self.width;
        self.cells.iter().enumerate().filter_map(move |(idx, cell)| {
            cell.map(|occ| (Coord::new(idx as i32 % width, idx as i32 / width), occ))
        })
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Empty the entire playfield
    pub fn reset(&mut self) {
        for cell in &mut self.cells {
            *cell = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PieceKind;

    fn occ(piece: u32) -> OccupantId {
        OccupantId {
            piece,
            kind: PieceKind::I,
            color: 0,
        }
    }

    fn fill_row(field: &mut Playfield, y: i32, piece: u32) {
        for x in 0..field.width() {
            field.occupy(Coord::new(x, y), occ(piece)).unwrap();
        }
    }

    #[test]
    fn test_index_calculation() {
        let field = Playfield::new(10, 20);
        assert_eq!(field.index(Coord::new(0, 0)), Some(0));
        assert_eq!(field.index(Coord::new(9, 0)), Some(9));
        assert_eq!(field.index(Coord::new(0, 1)), Some(10));
        assert_eq!(field.index(Coord::new(9, 19)), Some(199));
        assert_eq!(field.index(Coord::new(-1, 0)), None);
        assert_eq!(field.index(Coord::new(10, 0)), None);
        assert_eq!(field.index(Coord::new(0, 20)), None);
    }

    #[test]
    fn test_occupy_rejects_overwrite() {
        let mut field = Playfield::new(4, 4);
        field.occupy(Coord::new(1, 1), occ(1)).unwrap();

        let err = field.occupy(Coord::new(1, 1), occ(2)).unwrap_err();
        assert_eq!(
            err,
            CoreError::OccupancyConflict {
                coord: Coord::new(1, 1),
                existing: occ(1),
            }
        );
        assert_eq!(field.get(Coord::new(1, 1)), Some(Some(occ(1))));
    }

    #[test]
    fn test_clear_row_requires_full_row() {
        let mut field = Playfield::new(4, 4);
        field.occupy(Coord::new(0, 0), occ(1)).unwrap();
        assert_eq!(
            field.clear_row(0),
            Err(CoreError::InvalidRowClear { row: 0 })
        );
        assert_eq!(field.occupied_count(), 1);
    }

    #[test]
    fn test_compact_above_multi_row_drop() {
        let mut field = Playfield::new(3, 6);
        fill_row(&mut field, 0, 1);
        fill_row(&mut field, 1, 2);
        field.occupy(Coord::new(0, 2), occ(3)).unwrap();
        field.occupy(Coord::new(2, 3), occ(4)).unwrap();
        field.occupy(Coord::new(1, 5), occ(5)).unwrap();

        field.clear_row(0).unwrap();
        field.clear_row(1).unwrap();
        field.compact_above(1, 2).unwrap();

        assert_eq!(field.get(Coord::new(0, 0)), Some(Some(occ(3))));
        assert_eq!(field.get(Coord::new(2, 1)), Some(Some(occ(4))));
        assert_eq!(field.get(Coord::new(1, 3)), Some(Some(occ(5))));
        assert_eq!(field.occupied_count(), 3);
        assert!(field.row(4).unwrap().iter().all(Option::is_none));
        assert!(field.row(5).unwrap().iter().all(Option::is_none));
    }

    #[test]
    fn test_compact_above_is_atomic_on_conflict() {
        let mut field = Playfield::new(3, 4);
        field.occupy(Coord::new(0, 0), occ(1)).unwrap();
        field.occupy(Coord::new(0, 2), occ(2)).unwrap();
        let before = field.clone();

        // Row 0 was never cleared, so dropping row 2 by two rows collides.
        assert!(field.compact_above(1, 2).is_err());
        assert_eq!(field, before);
    }

    #[test]
    fn test_occupied_iterates_in_row_order() {
        let mut field = Playfield::new(3, 3);
        field.occupy(Coord::new(2, 1), occ(1)).unwrap();
        field.occupy(Coord::new(0, 0), occ(2)).unwrap();
        let coords: Vec<_> = field.occupied().map(|(c, _)| c).collect();
        assert_eq!(coords, vec![Coord::new(0, 0), Coord::new(2, 1)]);
    }
}
