//! Line-clear engine
//!
//! Runs once per landing, after the piece is committed. Full rows are removed
//! and everything above drops to close the gap. A contiguous block of `k`
//! cleared rows (single, double, triple, four-row clear) is compacted in one
//! atomic pass of `k` rows; separated blocks are compacted top block first so
//! every surviving row ends up lowered by the number of cleared rows beneath it.

use serde::Serialize;

use crate::error::CoreError;
use crate::playfield::Playfield;
use crate::types::{Coord, OccupantId};

/// What a clear removed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineClear {
    /// Cleared row indices, floor to ceiling (pre-compaction numbering)
    pub rows: Vec<i32>,
    /// Cells removed from those rows
    pub cells: Vec<(Coord, OccupantId)>,
}

impl LineClear {
    pub fn cleared_count(&self) -> usize {
        self.rows.len()
    }

    pub fn highest_row(&self) -> Option<i32> {
        self.rows.last().copied()
    }
}

/// Group ascending rows into contiguous (bottom, len) runs
fn runs(rows: &[i32]) -> Vec<(i32, i32)> {
    let mut out: Vec<(i32, i32)> = Vec::new();
    for &y in rows {
        match out.last_mut() {
            Some((bottom, len)) if *bottom + *len == y => *len += 1,
            _ => out.push((y, 1)),
        }
    }
    out
}

/// Detect, clear and compact all full rows
///
/// Returns `Ok(None)` when no row is full. The playfield is fully compacted
/// before this returns.
pub fn clear_full_rows(playfield: &mut Playfield) -> Result<Option<LineClear>, CoreError> {
    let rows = playfield.full_rows();
    if rows.is_empty() {
        return Ok(None);
    }

    let mut cells = Vec::with_capacity(rows.len() * playfield.width() as usize);
    for &y in &rows {
        cells.extend(playfield.clear_row(y)?);
    }

    for (bottom, len) in runs(&rows).into_iter().rev() {
        playfield.compact_above(bottom + len - 1, len)?;
    }

    log::debug!("cleared rows {:?} ({} cells)", rows, cells.len());
    Ok(Some(LineClear { rows, cells }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PieceKind;

    fn occ(piece: u32) -> OccupantId {
        OccupantId {
            piece,
            kind: PieceKind::L,
            color: 1,
        }
    }

    fn fill_row(field: &mut Playfield, y: i32) {
        for x in 0..field.width() {
            field.occupy(Coord::new(x, y), occ(100 + y as u32)).unwrap();
        }
    }

    #[test]
    fn test_runs_groups_contiguous_rows() {
        assert_eq!(runs(&[0, 1, 2]), vec![(0, 3)]);
        assert_eq!(runs(&[0, 2, 3, 7]), vec![(0, 1), (2, 2), (7, 1)]);
        assert!(runs(&[]).is_empty());
    }

    #[test]
    fn test_no_full_rows_is_noop() {
        let mut field = Playfield::new(4, 6);
        field.occupy(Coord::new(0, 0), occ(1)).unwrap();
        let before = field.clone();
        assert_eq!(clear_full_rows(&mut field), Ok(None));
        assert_eq!(field, before);
    }

    #[test]
    fn test_four_row_clear_shifts_by_four() {
        let mut field = Playfield::new(4, 10);
        for y in 0..4 {
            fill_row(&mut field, y);
        }
        field.occupy(Coord::new(1, 4), occ(1)).unwrap();
        field.occupy(Coord::new(2, 6), occ(2)).unwrap();

        let clear = clear_full_rows(&mut field).unwrap().unwrap();
        assert_eq!(clear.rows, vec![0, 1, 2, 3]);
        assert_eq!(clear.cells.len(), 16);
        assert_eq!(field.get(Coord::new(1, 0)), Some(Some(occ(1))));
        assert_eq!(field.get(Coord::new(2, 2)), Some(Some(occ(2))));
        assert_eq!(field.occupied_count(), 2);
    }

    #[test]
    fn test_split_clear_lowers_each_row_by_rows_beneath() {
        let mut field = Playfield::new(3, 8);
        fill_row(&mut field, 0);
        field.occupy(Coord::new(0, 1), occ(1)).unwrap();
        fill_row(&mut field, 2);
        field.occupy(Coord::new(2, 3), occ(2)).unwrap();

        let clear = clear_full_rows(&mut field).unwrap().unwrap();
        assert_eq!(clear.rows, vec![0, 2]);
        assert_eq!(field.get(Coord::new(0, 0)), Some(Some(occ(1))));
        assert_eq!(field.get(Coord::new(2, 1)), Some(Some(occ(2))));
        assert_eq!(field.occupied_count(), 2);
    }
}
