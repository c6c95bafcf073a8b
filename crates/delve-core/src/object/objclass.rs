//! Object classes and armor slots

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use super::WornMask;

/// Object class
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum ObjectClass {
    #[default]
    Weapon = 0,
    Armor = 1,
    Ring = 2,
    Amulet = 3,
    Potion = 4,
    Food = 5,
    Coin = 6,
}

impl ObjectClass {
    pub const fn symbol(&self) -> char {
        match self {
            ObjectClass::Weapon => ')',
            ObjectClass::Armor => '[',
            ObjectClass::Ring => '=',
            ObjectClass::Amulet => '"',
            ObjectClass::Potion => '!',
            ObjectClass::Food => '%',
            ObjectClass::Coin => '$',
        }
    }

    pub fn from_symbol(c: char) -> Option<Self> {
        match c {
            ')' => Some(ObjectClass::Weapon),
            '[' => Some(ObjectClass::Armor),
            '=' => Some(ObjectClass::Ring),
            '"' => Some(ObjectClass::Amulet),
            '!' => Some(ObjectClass::Potion),
            '%' => Some(ObjectClass::Food),
            '$' => Some(ObjectClass::Coin),
            _ => None,
        }
    }

    /// Whether identical items merge into one stack
    pub const fn stacks(&self) -> bool {
        matches!(
            self,
            ObjectClass::Potion | ObjectClass::Food | ObjectClass::Coin | ObjectClass::Weapon
        )
    }

    /// Relative generation weight of floor items
    pub const fn gen_prob(&self) -> u32 {
        match self {
            ObjectClass::Weapon => 10,
            ObjectClass::Armor => 10,
            ObjectClass::Ring => 3,
            ObjectClass::Amulet => 1,
            ObjectClass::Potion => 16,
            ObjectClass::Food => 20,
            ObjectClass::Coin => 0,
        }
    }
}

/// Where a piece of armor is worn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum ArmorSlot {
    Body,
    Shield,
    Helm,
    Gloves,
    Boots,
    Cloak,
}

impl ArmorSlot {
    pub const fn worn_mask(&self) -> WornMask {
        match self {
            ArmorSlot::Body => WornMask::ARMOR,
            ArmorSlot::Shield => WornMask::SHIELD,
            ArmorSlot::Helm => WornMask::HELM,
            ArmorSlot::Gloves => WornMask::GLOVES,
            ArmorSlot::Boots => WornMask::BOOTS,
            ArmorSlot::Cloak => WornMask::CLOAK,
        }
    }
}
