//! Playfield tests - occupancy, row clearing and compaction

use blockfall::core::{clear_full_rows, CoreError, Playfield};
use blockfall::types::{Coord, OccupantId, PieceKind, DEFAULT_HEIGHT, DEFAULT_WIDTH};

fn occ(piece: u32) -> OccupantId {
    OccupantId {
        piece,
        kind: PieceKind::T,
        color: (piece % 6) as u8,
    }
}

fn fill_row(field: &mut Playfield, y: i32, piece: u32) {
    for x in 0..field.width() {
        field.occupy(Coord::new(x, y), occ(piece)).unwrap();
    }
}

#[test]
fn test_playfield_new_empty() {
    let field = Playfield::new(DEFAULT_WIDTH, DEFAULT_HEIGHT);
    assert_eq!(field.width(), 10);
    assert_eq!(field.height(), 20);
    assert_eq!(field.cells().len(), 200);

    // Every in-bounds cell has an entry and starts empty
    for y in 0..DEFAULT_HEIGHT {
        for x in 0..DEFAULT_WIDTH {
            assert_eq!(field.get(Coord::new(x, y)), Some(None), "({}, {})", x, y);
        }
    }
}

#[test]
fn test_playfield_get_out_of_bounds() {
    let field = Playfield::new(10, 20);
    assert_eq!(field.get(Coord::new(-1, 0)), None);
    assert_eq!(field.get(Coord::new(0, -1)), None);
    assert_eq!(field.get(Coord::new(10, 0)), None);
    assert_eq!(field.get(Coord::new(0, 20)), None);
    assert!(!field.is_occupied(Coord::new(-1, 0)));
}

#[test]
fn test_occupy_out_of_bounds_is_error() {
    let mut field = Playfield::new(10, 20);
    assert_eq!(
        field.occupy(Coord::new(10, 3), occ(1)),
        Err(CoreError::OutOfBounds {
            coord: Coord::new(10, 3)
        })
    );
    assert_eq!(field.occupied_count(), 0);
}

#[test]
fn test_occupy_never_overwrites() {
    let mut field = Playfield::new(10, 20);
    field.occupy(Coord::new(2, 2), occ(1)).unwrap();
    assert!(matches!(
        field.occupy(Coord::new(2, 2), occ(2)),
        Err(CoreError::OccupancyConflict { .. })
    ));
    assert_eq!(field.get(Coord::new(2, 2)), Some(Some(occ(1))));
}

#[test]
fn test_single_row_clear_shifts_by_one() {
    let mut field = Playfield::new(10, 20);
    fill_row(&mut field, 0, 1);
    field.occupy(Coord::new(3, 1), occ(2)).unwrap();
    field.occupy(Coord::new(7, 5), occ(3)).unwrap();
    let before = field.occupied_count();

    let clear = clear_full_rows(&mut field).unwrap().unwrap();

    assert_eq!(clear.rows, vec![0]);
    assert_eq!(clear.cleared_count(), 1);
    assert_eq!(clear.cells.len(), 10);
    assert_eq!(field.occupied_count(), before - 10);
    assert_eq!(field.get(Coord::new(3, 0)), Some(Some(occ(2))));
    assert_eq!(field.get(Coord::new(7, 4)), Some(Some(occ(3))));
    assert!(!field.is_occupied(Coord::new(7, 5)));
}

#[test]
fn test_k_row_clear_shifts_by_k() {
    for k in 1..=4 {
        let mut field = Playfield::new(10, 20);
        for y in 0..k {
            fill_row(&mut field, y, 10 + y as u32);
        }
        field.occupy(Coord::new(0, k), occ(1)).unwrap();
        field.occupy(Coord::new(9, k + 3), occ(2)).unwrap();

        let clear = clear_full_rows(&mut field).unwrap().unwrap();

        assert_eq!(clear.cleared_count(), k as usize);
        assert_eq!(clear.highest_row(), Some(k - 1));
        assert_eq!(field.occupied_count(), 2);
        assert_eq!(field.get(Coord::new(0, 0)), Some(Some(occ(1))));
        assert_eq!(field.get(Coord::new(9, 3)), Some(Some(occ(2))));
    }
}

#[test]
fn test_clear_preserves_cells_below_cleared_rows() {
    let mut field = Playfield::new(4, 8);
    field.occupy(Coord::new(1, 0), occ(1)).unwrap();
    fill_row(&mut field, 1, 2);
    fill_row(&mut field, 2, 3);
    field.occupy(Coord::new(2, 3), occ(4)).unwrap();

    clear_full_rows(&mut field).unwrap();

    assert_eq!(field.get(Coord::new(1, 0)), Some(Some(occ(1))));
    assert_eq!(field.get(Coord::new(2, 1)), Some(Some(occ(4))));
    assert_eq!(field.occupied_count(), 2);
}

#[test]
fn test_full_rows_reports_floor_to_ceiling() {
    let mut field = Playfield::new(3, 6);
    fill_row(&mut field, 4, 1);
    fill_row(&mut field, 1, 2);
    assert_eq!(field.full_rows(), vec![1, 4]);
    assert!(field.is_row_full(4));
    assert!(!field.is_row_full(0));
    assert!(!field.is_row_full(6));
}

#[test]
fn test_reset_empties_everything() {
    let mut field = Playfield::new(5, 5);
    fill_row(&mut field, 2, 1);
    field.reset();
    assert_eq!(field.occupied_count(), 0);
    assert_eq!(field.cells().len(), 25);
}
