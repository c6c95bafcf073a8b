//! Map cell types

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::consts::*;

/// Terrain type of a cell
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum CellType {
    #[default]
    Stone = 0,
    VWall = 1,
    HWall = 2,
    TLCorner = 3,
    TRCorner = 4,
    BLCorner = 5,
    BRCorner = 6,
    SecretDoor = 7,
    SecretCorridor = 8,
    Pool = 9,
    Lava = 10,
    Door = 11,
    Corridor = 12,
    Room = 13,
    UpStairs = 14,
    DownStairs = 15,
    Fountain = 16,
}

impl CellType {
    pub const fn is_wall(&self) -> bool {
        (*self as u8) >= 1 && (*self as u8) <= 6
    }

    /// Cells a walker can stand on, ignoring door state
    pub const fn is_passable(&self) -> bool {
        matches!(
            self,
            CellType::Door
                | CellType::Corridor
                | CellType::Room
                | CellType::UpStairs
                | CellType::DownStairs
                | CellType::Fountain
        )
    }

    pub const fn is_liquid(&self) -> bool {
        matches!(self, CellType::Pool | CellType::Lava)
    }

    pub const fn blocks_sight(&self) -> bool {
        matches!(
            self,
            CellType::Stone | CellType::SecretDoor | CellType::SecretCorridor
        ) || self.is_wall()
    }

    pub const fn symbol(&self) -> char {
        match self {
            CellType::Stone | CellType::SecretCorridor => S_STONE,
            CellType::VWall => S_VWALL,
            CellType::HWall
            | CellType::TLCorner
            | CellType::TRCorner
            | CellType::BLCorner
            | CellType::BRCorner => S_HWALL,
            CellType::SecretDoor => S_HWALL,
            CellType::Pool | CellType::Lava => S_POOL,
            CellType::Door => S_NDOOR,
            CellType::Corridor => S_CORR,
            CellType::Room => S_ROOM,
            CellType::UpStairs => S_UPSTAIR,
            CellType::DownStairs => S_DNSTAIR,
            CellType::Fountain => S_FOUNTAIN,
        }
    }
}

bitflags! {
    /// Door state; an empty set is a doorless doorway
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DoorState: u8 {
        const BROKEN = 0x01;
        const OPEN = 0x02;
        const CLOSED = 0x04;
        const LOCKED = 0x08;
    }
}

impl_bits_serde!(DoorState, u8);

/// A single map cell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub typ: CellType,
    pub door: DoorState,
    pub lit: bool,
    /// Player has seen this cell
    pub seen: bool,
    /// Room index + 1, or 0 outside rooms
    pub room: u8,
}

impl Cell {
    pub const fn stone() -> Self {
        Self {
            typ: CellType::Stone,
            door: DoorState::empty(),
            lit: false,
            seen: false,
            room: 0,
        }
    }

    pub const fn floor() -> Self {
        Self {
            typ: CellType::Room,
            door: DoorState::empty(),
            lit: true,
            seen: false,
            room: 0,
        }
    }

    pub const fn corridor() -> Self {
        Self {
            typ: CellType::Corridor,
            door: DoorState::empty(),
            lit: false,
            seen: false,
            room: 0,
        }
    }

    pub fn is_door_closed(&self) -> bool {
        self.typ == CellType::Door && self.door.intersects(DoorState::CLOSED | DoorState::LOCKED)
    }

    pub fn is_door_locked(&self) -> bool {
        self.typ == CellType::Door && self.door.contains(DoorState::LOCKED)
    }

    /// Doors that forbid diagonal movement into or out of them.
    /// Empty doorways and broken doors do not.
    pub fn blocks_diagonal(&self) -> bool {
        self.typ == CellType::Door && !self.door.is_empty() && !self.door.contains(DoorState::BROKEN)
    }

    pub fn blocks_sight(&self) -> bool {
        self.typ.blocks_sight() || self.is_door_closed()
    }

    pub fn is_walkable(&self) -> bool {
        self.typ.is_passable() && !self.is_door_closed()
    }

    pub fn symbol(&self) -> char {
        if self.typ == CellType::Door {
            if self.is_door_closed() {
                S_CDOOR
            } else if self.door.contains(DoorState::OPEN) {
                S_VODOOR
            } else {
                S_NDOOR
            }
        } else {
            self.typ.symbol()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_door_walkability() {
        let mut cell = Cell::floor();
        cell.typ = CellType::Door;
        assert!(cell.is_walkable());
        assert!(!cell.blocks_diagonal());

        cell.door = DoorState::CLOSED | DoorState::LOCKED;
        assert!(!cell.is_walkable());
        assert!(cell.blocks_sight());
        assert!(cell.is_door_locked());

        cell.door = DoorState::OPEN;
        assert!(cell.is_walkable());
        assert!(cell.blocks_diagonal());

        cell.door = DoorState::BROKEN;
        assert!(!cell.blocks_diagonal());
    }

    #[test]
    fn test_walls_block_sight() {
        assert!(CellType::VWall.blocks_sight());
        assert!(CellType::SecretDoor.blocks_sight());
        assert!(!CellType::Room.blocks_sight());
        assert!(!CellType::Pool.is_passable());
        assert!(CellType::Pool.is_liquid());
    }

    #[test]
    fn test_door_state_serde() {
        let state = DoorState::CLOSED | DoorState::LOCKED;
        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(json, "12");
        let back: DoorState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}
