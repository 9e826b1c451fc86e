use serde::Serialize;

use crate::game_state::GameStatus;
use crate::pieces::Piece;
use crate::playfield::Playfield;
use crate::types::{Coord, OccupantId, PieceKind, Rotation};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveSnapshot {
    pub id: u32,
    pub kind: PieceKind,
    pub color: u8,
    pub rotation: Rotation,
    pub origin: Coord,
    pub cells: Vec<Coord>,
}

impl From<&Piece> for ActiveSnapshot {
    fn from(value: &Piece) -> Self {
        Self {
            id: value.id,
            kind: value.kind,
            color: value.color,
            rotation: value.rotation,
            origin: value.origin,
            cells: value.cells().to_vec(),
        }
    }
}

/// Owned, serializable copy of everything a renderer needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub width: i32,
    pub height: i32,
    pub kill_line: i32,
    /// Occupied cells, row by row from the floor
    pub occupied: Vec<(Coord, OccupantId)>,
    pub active: Option<ActiveSnapshot>,
    pub ghost: Option<Coord>,
    pub status: GameStatus,
    pub pieces_spawned: u32,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
}

impl GameSnapshot {
    pub(crate) fn board(playfield: &Playfield, kill_line: i32, status: GameStatus) -> Self {
        Self {
            width: playfield.width(),
            height: playfield.height(),
            kill_line,
            occupied: playfield.occupied().collect(),
            active: None,
            ghost: None,
            status,
            pieces_spawned: 0,
            score: 0,
            level: 0,
            lines: 0,
        }
    }

    pub fn playable(&self) -> bool {
        self.status == GameStatus::Running
    }

    /// Occupant at `coord`, if any
    pub fn occupant(&self, coord: Coord) -> Option<OccupantId> {
        self.occupied
            .iter()
            .find(|(c, _)| *c == coord)
            .map(|(_, occ)| *occ)
    }

    /// Rows as strings, top row first; `#` committed, `@` active, `.` empty
    pub fn render_rows(&self) -> Vec<String> {
        let width = self.width.max(0) as usize;
        let height = self.height.max(0) as usize;
        let mut grid = vec!['.'; width * height];
        let mut mark = |coord: Coord, glyph: char| {
            if (0..self.width).contains(&coord.x) && (0..self.height).contains(&coord.y) {
                grid[coord.y as usize * width + coord.x as usize] = glyph;
            }
        };
        for &(coord, _) in &self.occupied {
            mark(coord, '#');
        }
        if let Some(active) = &self.active {
            for &coord in &active.cells {
                mark(coord, '@');
            }
        }

        if width == 0 {
            return vec![String::new(); height];
        }
        grid.chunks(width).rev().map(|row| row.iter().collect()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pieces::ShapeTable;

    #[test]
    fn test_render_rows_marks_active_and_committed() {
        let mut field = Playfield::new(4, 3);
        field
            .occupy(
                Coord::new(0, 0),
                OccupantId {
                    piece: 1,
                    kind: PieceKind::Dot,
                    color: 0,
                },
            )
            .unwrap();
        let table = ShapeTable::with_extended();
        let dot = Piece::new(2, table.get(PieceKind::Dot).unwrap(), 0, Coord::new(3, 2));

        let mut snap = GameSnapshot::board(&field, 2, GameStatus::Running);
        snap.active = Some(ActiveSnapshot::from(&dot));

        assert_eq!(snap.render_rows(), vec!["...@", "....", "#..."]);
        assert!(snap.playable());
    }

    #[test]
    fn test_render_rows_agrees_with_occupant_lookup() {
        let mut field = Playfield::new(10, 20);
        for y in 0..12 {
            for x in (y % 3..10).step_by(2) {
                let occupant = OccupantId {
                    piece: (y * 10 + x) as u32,
                    kind: PieceKind::L,
                    color: 1,
                };
                field.occupy(Coord::new(x, y), occupant).unwrap();
            }
        }
        let snap = GameSnapshot::board(&field, 18, GameStatus::Running);

        let rows = snap.render_rows();
        assert_eq!(rows.len(), 20);
        for (i, row) in rows.iter().enumerate() {
            let y = 19 - i as i32;
            for (x, glyph) in row.chars().enumerate() {
                let expected = if snap.occupant(Coord::new(x as i32, y)).is_some() {
                    '#'
                } else {
                    '.'
                };
                assert_eq!(glyph, expected, "({x}, {y})");
            }
        }
    }
}
