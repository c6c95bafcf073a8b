//! Trap kinds placed on the floor

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use super::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
#[repr(u8)]
pub enum TrapType {
    ArrowTrap = 0,
    DartTrap = 1,
    BearTrap = 2,
    SleepingGas = 3,
    Pit = 4,
    Teleport = 5,
    FireTrap = 6,
}

impl TrapType {
    /// Bit used in a monster's known-trap mask
    pub const fn bit(&self) -> u16 {
        1 << (*self as u16)
    }

    pub const fn name(&self) -> &'static str {
        match self {
            TrapType::ArrowTrap => "arrow trap",
            TrapType::DartTrap => "dart trap",
            TrapType::BearTrap => "bear trap",
            TrapType::SleepingGas => "sleeping gas trap",
            TrapType::Pit => "pit",
            TrapType::Teleport => "teleportation trap",
            TrapType::FireTrap => "fire trap",
        }
    }

    /// Ground traps that flying creatures pass over
    pub const fn is_ground_trap(&self) -> bool {
        matches!(self, TrapType::BearTrap | TrapType::Pit)
    }

    /// Shallowest depth at which the trap is generated
    pub const fn min_depth(&self) -> i32 {
        match self {
            TrapType::ArrowTrap | TrapType::DartTrap | TrapType::Pit => 1,
            TrapType::SleepingGas => 2,
            TrapType::BearTrap => 3,
            TrapType::Teleport => 5,
            TrapType::FireTrap => 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trap {
    pub pos: Position,
    pub kind: TrapType,
    /// The player has seen this trap
    pub seen: bool,
}

impl Trap {
    pub fn new(pos: Position, kind: TrapType) -> Self {
        Self {
            pos,
            kind,
            seen: false,
        }
    }
}
