//! Dungeon floors
//!
//! Contains the floor grid, its cells, rooms, traps and the generator.

mod cell;
mod generation;
mod level;
mod room;
mod trap;

pub use cell::{Cell, CellType, DoorState};
pub use generation::generate_floor;
pub use level::Level;
pub use room::Room;
pub use trap::{Trap, TrapType};

use serde::{Deserialize, Serialize};

/// A map coordinate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: i8,
    pub y: i8,
}

/// Offsets of the eight neighbouring cells, orthogonal first
pub const DIRS8: [(i8, i8); 8] = [
    (0, -1),
    (1, 0),
    (0, 1),
    (-1, 0),
    (1, -1),
    (1, 1),
    (-1, 1),
    (-1, -1),
];

impl Position {
    pub const fn new(x: i8, y: i8) -> Self {
        Self { x, y }
    }

    /// Squared euclidean distance (dist2)
    pub fn distance_sq(&self, other: Position) -> i32 {
        let dx = (self.x as i32) - (other.x as i32);
        let dy = (self.y as i32) - (other.y as i32);
        dx * dx + dy * dy
    }

    /// Chebyshev distance (distmin)
    pub fn distmin(&self, other: Position) -> i32 {
        let dx = ((self.x as i32) - (other.x as i32)).abs();
        let dy = ((self.y as i32) - (other.y as i32)).abs();
        dx.max(dy)
    }

    /// True when the other position is one of the eight neighbours
    pub fn is_adjacent(&self, other: Position) -> bool {
        self.distmin(other) == 1
    }

    pub fn offset(&self, dx: i8, dy: i8) -> Position {
        Position::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }

    /// Unit step from self toward other
    pub fn step_toward(&self, other: Position) -> (i8, i8) {
        ((other.x - self.x).signum(), (other.y - self.y).signum())
    }

    pub fn neighbours(self) -> impl Iterator<Item = Position> {
        DIRS8.iter().map(move |&(dx, dy)| self.offset(dx, dy))
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
