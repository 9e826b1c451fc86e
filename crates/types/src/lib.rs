//! Core types module - shared data structures and constants
//!
//! This crate defines the fundamental types used throughout the workspace.
//! All types are plain data with no game logic, so they can be shared by the
//! core simulation, a presentation layer, and tests alike.
//!
//! # Coordinates
//!
//! The playfield uses integer cell coordinates:
//!
//! - **x**: column, `0` is the leftmost column
//! - **y**: row, `0` is the floor row and `y` grows upward
//!
//! Continuous presentation space is divided by the cell size once, at the
//! boundary; everything in here is exact integer arithmetic.
//!
//! # Defaults
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_WIDTH` | 10 | Playfield columns |
//! | `DEFAULT_HEIGHT` | 20 | Playfield rows |
//! | `DEFAULT_KILL_LINE` | 18 | Committing a cell at or above this row ends the game |
//! | `DEFAULT_SPAWN` | (3, 19) | Origin of every freshly spawned piece |
//! | `DEFAULT_FALL_INTERVAL_SECS` | 1.0 | Seconds between automatic downward steps |
//!
//! # Examples
//!
//! ```
//! use blockfall_types::{Coord, Direction, Operation, PieceKind};
//!
//! let origin = Coord::new(3, 19);
//! assert_eq!(origin.step(Direction::Down), Coord::new(3, 18));
//!
//! assert_eq!(PieceKind::from_str("t"), Some(PieceKind::T));
//! assert!(Operation::Stop.priority() > Operation::Rotate.priority());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default playfield width in cells
pub const DEFAULT_WIDTH: i32 = 10;

/// Default playfield height in cells
pub const DEFAULT_HEIGHT: i32 = 20;

/// Default kill line row
pub const DEFAULT_KILL_LINE: i32 = 18;

/// Default spawn origin (x, y)
pub const DEFAULT_SPAWN: (i32, i32) = (3, 19);

/// Default auto-fall interval in seconds
pub const DEFAULT_FALL_INTERVAL_SECS: f64 = 1.0;

/// Default number of color tags handed out to spawned pieces
pub const DEFAULT_PALETTE_SIZE: u8 = 6;

/// Upper bound on the number of cells a single shape may occupy
pub const MAX_PIECE_CELLS: usize = 5;

/// Rows cleared per level
pub const LINES_PER_LEVEL: u32 = 10;

/// Line clear scoring table (Classic Nintendo scoring)
///
/// Base points for clearing N rows at level 0. Multiplied by (level + 1).
pub const LINE_SCORES: [u32; 5] = [0, 40, 100, 300, 1200];

/// Absolute cell coordinate on the playfield
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Translate by a relative offset
    pub fn offset(self, offset: Offset) -> Self {
        Self {
            x: self.x + offset.0,
            y: self.y + offset.1,
        }
    }

    /// The neighbouring coordinate one cell in `direction`
    pub fn step(self, direction: Direction) -> Self {
        self.offset(direction.delta())
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Offset of a single cell relative to a piece origin (dx, dy)
pub type Offset = (i32, i32);

/// Piece kinds
///
/// The seven tetrominoes plus the two small blocks of the classic block set:
/// - **I**, **O**, **T**, **S**, **Z**, **J**, **L**: standard four-cell pieces
/// - **Dot**: a single cell
/// - **Bar3**: a three-cell straight bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
    Dot,
    Bar3,
}

impl PieceKind {
    /// The seven tetrominoes in table order
    pub const TETROMINOES: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Parse piece kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("Bar3"), Some(PieceKind::Bar3));
    /// assert_eq!(PieceKind::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "o" => Some(PieceKind::O),
            "t" => Some(PieceKind::T),
            "s" => Some(PieceKind::S),
            "z" => Some(PieceKind::Z),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            "dot" => Some(PieceKind::Dot),
            "bar3" => Some(PieceKind::Bar3),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::O => "o",
            PieceKind::T => "t",
            PieceKind::S => "s",
            PieceKind::Z => "z",
            PieceKind::J => "j",
            PieceKind::L => "l",
            PieceKind::Dot => "dot",
            PieceKind::Bar3 => "bar3",
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rotation state, an index into a shape's precomputed rotation list
///
/// Index 0 is the spawn orientation; each step is a quarter turn clockwise.
/// The number of distinct states depends on the shape table entry, so wrapping
/// is done by the caller that knows the count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rotation(pub u8);

impl Rotation {
    /// Spawn orientation
    pub const SPAWN: Rotation = Rotation(0);

    /// Apply `delta` quarter turns, wrapping modulo `count`
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_types::Rotation;
    ///
    /// assert_eq!(Rotation(3).turned(1, 4), Rotation(0));
    /// assert_eq!(Rotation(0).turned(-1, 4), Rotation(3));
    /// assert_eq!(Rotation(0).turned(1, 1), Rotation(0));
    /// ```
    pub fn turned(self, delta: i32, count: usize) -> Self {
        let count = count.max(1) as i32;
        Rotation((self.0 as i32 + delta).rem_euclid(count) as u8)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Nominal angle in degrees for a four-state shape
    pub fn degrees(self) -> u16 {
        self.0 as u16 * 90
    }
}

/// Direction of a discrete move request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
    Down,
}

impl Direction {
    /// Cell delta for one step in this direction
    pub fn delta(self) -> Offset {
        match self {
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Down => (0, -1),
        }
    }

    pub fn is_down(self) -> bool {
        self == Direction::Down
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "left" | "l" => Some(Direction::Left),
            "right" | "r" => Some(Direction::Right),
            "down" | "d" => Some(Direction::Down),
            _ => None,
        }
    }
}

/// A queued intent against the active piece
///
/// Priority: `Stop` > `Rotate` > `Move` > `AutoFall`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    /// Land the active piece
    Stop,
    /// Quarter turn clockwise
    Rotate,
    /// Player-requested step
    Move(Direction),
    /// Timer-driven step
    AutoFall(Direction),
}

impl Operation {
    /// Numeric precedence, higher wins
    pub fn priority(&self) -> u8 {
        match self {
            Operation::Stop => 3,
            Operation::Rotate => 2,
            Operation::Move(_) => 1,
            Operation::AutoFall(_) => 0,
        }
    }

    /// Whether a queued `other` counts as a duplicate of `self`
    ///
    /// Moves are distinct per direction; a pending auto-fall is unique
    /// regardless of direction.
    pub fn same_kind(&self, other: &Operation) -> bool {
        match (self, other) {
            (Operation::Stop, Operation::Stop) => true,
            (Operation::Rotate, Operation::Rotate) => true,
            (Operation::Move(a), Operation::Move(b)) => a == b,
            (Operation::AutoFall(_), Operation::AutoFall(_)) => true,
            _ => false,
        }
    }
}

/// Identity of the piece that owns a committed cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OccupantId {
    /// Monotonic piece serial (1 for the first piece of a session)
    pub piece: u32,
    pub kind: PieceKind,
    /// Color tag, an index into the presentation palette
    pub color: u8,
}

/// A playfield cell (None = empty)
pub type Cell = Option<OccupantId>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operation_priorities_are_totally_ordered() {
        let ops = [
            Operation::Stop,
            Operation::Rotate,
            Operation::Move(Direction::Left),
            Operation::AutoFall(Direction::Down),
        ];
        for pair in ops.windows(2) {
            assert!(pair[0].priority() > pair[1].priority());
        }
    }

    #[test]
    fn same_kind_respects_move_direction() {
        let left = Operation::Move(Direction::Left);
        let right = Operation::Move(Direction::Right);
        assert!(left.same_kind(&left));
        assert!(!left.same_kind(&right));
        assert!(Operation::AutoFall(Direction::Down).same_kind(&Operation::AutoFall(Direction::Left)));
        assert!(!Operation::Rotate.same_kind(&Operation::Stop));
    }

    #[test]
    fn coord_step_moves_one_cell() {
        let c = Coord::new(4, 10);
        assert_eq!(c.step(Direction::Left), Coord::new(3, 10));
        assert_eq!(c.step(Direction::Right), Coord::new(5, 10));
        assert_eq!(c.step(Direction::Down), Coord::new(4, 9));
    }

    #[test]
    fn piece_kind_string_roundtrip() {
        for kind in PieceKind::TETROMINOES {
            assert_eq!(PieceKind::from_str(kind.as_str()), Some(kind));
        }
        assert_eq!(PieceKind::from_str("dot"), Some(PieceKind::Dot));
    }

    #[test]
    fn rotation_wraps_both_ways() {
        assert_eq!(Rotation(1).turned(1, 2), Rotation(0));
        assert_eq!(Rotation(0).turned(-1, 2), Rotation(1));
        assert_eq!(Rotation(2).degrees(), 180);
    }
}
