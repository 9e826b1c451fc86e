//! Piece and validator tests

use blockfall::core::{landing_origin, validate, Piece, Playfield, ShapeTable, Verdict};
use blockfall::types::{Coord, Direction, OccupantId, PieceKind, Rotation};

fn spawn(kind: PieceKind, origin: Coord) -> Piece {
    let table = ShapeTable::with_extended();
    Piece::new(1, table.get(kind).unwrap(), 0, origin)
}

#[test]
fn test_all_tetrominoes_have_four_cells() {
    let table = ShapeTable::standard();
    for kind in PieceKind::TETROMINOES {
        let entry = table.get(kind).unwrap();
        for rotation in 0..entry.rotation_count() {
            assert_eq!(
                entry.offsets(Rotation(rotation as u8)).len(),
                4,
                "{} rotation {}",
                kind,
                rotation
            );
        }
    }
}

#[test]
fn test_rotation_counts() {
    let table = ShapeTable::with_extended();
    assert_eq!(table.get(PieceKind::O).unwrap().rotation_count(), 1);
    assert_eq!(table.get(PieceKind::T).unwrap().rotation_count(), 4);
    assert_eq!(table.get(PieceKind::Dot).unwrap().rotation_count(), 1);
    assert_eq!(table.get(PieceKind::Bar3).unwrap().rotation_count(), 2);
    assert!(table.get(PieceKind::Dot).is_some());
    assert!(ShapeTable::standard().get(PieceKind::Dot).is_none());
}

#[test]
fn test_full_turn_returns_to_spawn_cells() {
    for kind in PieceKind::TETROMINOES {
        let mut piece = spawn(kind, Coord::new(4, 10));
        let start = piece.cells();
        for _ in 0..4 {
            piece.rotation = piece.rotate(1);
        }
        assert_eq!(piece.cells(), start, "{}", kind);
    }
}

#[test]
fn test_cells_are_origin_relative() {
    let a = spawn(PieceKind::S, Coord::new(2, 10));
    let b = spawn(PieceKind::S, Coord::new(5, 4));
    for (ca, cb) in a.cells().iter().zip(b.cells().iter()) {
        assert_eq!(cb.x - ca.x, 3);
        assert_eq!(cb.y - ca.y, -6);
    }
}

#[test]
fn test_validator_blocks_walls_in_every_rotation() {
    let field = Playfield::new(10, 20);
    for kind in PieceKind::TETROMINOES {
        let piece = spawn(kind, Coord::new(3, 10));
        for r in 0..piece.rotation_count() {
            let rotation = Rotation(r as u8);
            // Far off the left edge nothing fits.
            assert_eq!(
                validate(&piece, Coord::new(-5, 10), rotation, &field),
                Verdict::BlockedByBounds
            );
        }
    }
}

#[test]
fn test_validator_reports_geometry_and_bounds_separately() {
    let mut field = Playfield::new(10, 20);
    let occupant = OccupantId {
        piece: 7,
        kind: PieceKind::I,
        color: 0,
    };
    field.occupy(Coord::new(5, 5), occupant).unwrap();

    let dot = spawn(PieceKind::Dot, Coord::new(5, 6));
    assert_eq!(
        validate(&dot, dot.stepped(Direction::Down), dot.rotation, &field),
        Verdict::BlockedByGeometry
    );
    assert_eq!(
        validate(&dot, dot.stepped(Direction::Left), dot.rotation, &field),
        Verdict::Allowed
    );

    let floor = spawn(PieceKind::Dot, Coord::new(0, 0));
    assert_eq!(
        validate(&floor, floor.stepped(Direction::Down), floor.rotation, &field),
        Verdict::BlockedByBounds
    );
}

#[test]
fn test_ceiling_is_out_of_bounds() {
    let field = Playfield::new(10, 20);
    let dot = spawn(PieceKind::Dot, Coord::new(0, 19));
    assert_eq!(
        validate(&dot, Coord::new(0, 20), dot.rotation, &field),
        Verdict::BlockedByBounds
    );
}

#[test]
fn test_landing_origin_stops_on_stack() {
    let mut field = Playfield::new(10, 20);
    let occupant = OccupantId {
        piece: 3,
        kind: PieceKind::O,
        color: 1,
    };
    for x in 0..10 {
        field.occupy(Coord::new(x, 0), occupant).unwrap();
    }
    let bar = spawn(PieceKind::Bar3, Coord::new(2, 19));
    // Vertical Bar3 spans origin.y down to origin.y - 2.
    assert_eq!(landing_origin(&bar, &field), Coord::new(2, 3));
}
