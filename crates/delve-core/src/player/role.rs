//! Roles and races

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};

use super::Property;
use crate::object::{BucStatus, Object, kinds};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
pub enum Role {
    Barbarian,
    #[default]
    Valkyrie,
    Wizard,
    Rogue,
    Priest,
    Samurai,
}

/// Starting item: kind, quantity, enchantment
type Kit = (usize, u32, i8);

impl Role {
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.to_ascii_lowercase();
        Role::iter().find(|r| {
            let role = r.to_string().to_ascii_lowercase();
            role == lower || (lower.len() >= 3 && role.starts_with(&lower))
        })
    }

    /// Base attributes before random distribution
    pub const fn base_attributes(&self) -> [i8; 6] {
        match self {
            Role::Barbarian => [16, 7, 7, 15, 16, 6],
            Role::Valkyrie => [16, 7, 7, 14, 16, 8],
            Role::Wizard => [7, 16, 12, 10, 10, 10],
            Role::Rogue => [10, 10, 7, 16, 10, 8],
            Role::Priest => [12, 10, 16, 8, 12, 10],
            Role::Samurai => [15, 7, 10, 15, 14, 7],
        }
    }

    pub const fn base_hp(&self) -> i32 {
        match self {
            Role::Barbarian => 14,
            Role::Valkyrie => 14,
            Role::Wizard => 10,
            Role::Rogue => 10,
            Role::Priest => 12,
            Role::Samurai => 13,
        }
    }

    pub const fn base_energy(&self) -> i32 {
        match self {
            Role::Wizard => 7,
            Role::Priest => 4,
            _ => 1,
        }
    }

    pub const fn alignment(&self) -> i8 {
        match self {
            Role::Barbarian | Role::Wizard => 0,
            Role::Rogue => -1,
            Role::Valkyrie | Role::Priest | Role::Samurai => 1,
        }
    }

    pub fn intrinsics(&self) -> &'static [Property] {
        match self {
            Role::Barbarian => &[Property::PoisonRes],
            Role::Valkyrie => &[Property::ColdRes, Property::Stealth],
            Role::Rogue => &[Property::Stealth],
            Role::Samurai => &[Property::Fast],
            Role::Wizard | Role::Priest => &[],
        }
    }

    fn kit(&self) -> &'static [Kit] {
        match self {
            Role::Barbarian => &[
                (kinds::LONG_SWORD, 1, 0),
                (kinds::AXE, 1, 0),
                (kinds::RING_MAIL, 1, 0),
                (kinds::FOOD_RATION, 1, 0),
            ],
            Role::Valkyrie => &[
                (kinds::LONG_SWORD, 1, 1),
                (kinds::DAGGER, 1, 0),
                (kinds::SMALL_SHIELD, 1, 3),
                (kinds::FOOD_RATION, 1, 0),
            ],
            Role::Wizard => &[
                (kinds::DAGGER, 1, 1),
                (kinds::CLOAK_OF_MAGIC_RESISTANCE, 1, 0),
                (kinds::POT_HEALING, 2, 0),
                (kinds::RIN_PROTECTION, 1, 2),
                (kinds::APPLE, 2, 0),
            ],
            Role::Rogue => &[
                (kinds::SHORT_SWORD, 1, 0),
                (kinds::DAGGER, 8, 0),
                (kinds::LEATHER_ARMOR, 1, 1),
                (kinds::POT_SLEEPING, 1, 0),
            ],
            Role::Priest => &[
                (kinds::MACE, 1, 1),
                (kinds::LEATHER_CLOAK, 1, 0),
                (kinds::POT_HEALING, 4, 0),
                (kinds::APPLE, 3, 0),
            ],
            Role::Samurai => &[
                (kinds::LONG_SWORD, 1, 0),
                (kinds::SHORT_SWORD, 1, 0),
                (kinds::BOW, 1, 0),
                (kinds::ARROW, 25, 0),
                (kinds::RING_MAIL, 1, 0),
            ],
        }
    }

    /// Starting inventory; the first weapon is wielded and armor is worn
    pub fn starting_inventory(&self) -> Vec<Object> {
        self.kit()
            .iter()
            .map(|&(kind, quantity, enchantment)| {
                let mut obj = Object::new(kind, quantity);
                obj.enchantment = enchantment;
                obj.buc = BucStatus::Uncursed;
                obj
            })
            .collect()
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
pub enum Race {
    #[default]
    Human,
    Elf,
    Dwarf,
    Gnome,
    Orc,
}

impl Race {
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.to_ascii_lowercase();
        Race::iter().find(|r| r.to_string().to_ascii_lowercase() == lower)
    }

    pub const fn base_hp(&self) -> i32 {
        match self {
            Race::Human => 2,
            Race::Elf => 1,
            Race::Dwarf => 4,
            Race::Gnome => 1,
            Race::Orc => 1,
        }
    }

    pub const fn base_energy(&self) -> i32 {
        match self {
            Race::Elf => 2,
            Race::Gnome => 2,
            _ => 1,
        }
    }

    pub fn intrinsics(&self) -> &'static [Property] {
        match self {
            Race::Elf => &[Property::SleepRes, Property::SeeInvisible],
            Race::Orc => &[Property::PoisonRes],
            Race::Human | Race::Dwarf | Race::Gnome => &[],
        }
    }

    /// Whether the race can play the role
    pub const fn allows(&self, role: Role) -> bool {
        match self {
            Race::Human => true,
            Race::Elf => matches!(role, Role::Wizard | Role::Priest),
            Race::Dwarf => matches!(role, Role::Valkyrie | Role::Barbarian),
            Race::Gnome => matches!(role, Role::Wizard),
            Race::Orc => matches!(role, Role::Barbarian | Role::Rogue | Role::Wizard),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_lookup() {
        assert_eq!(Role::from_name("valkyrie"), Some(Role::Valkyrie));
        assert_eq!(Role::from_name("Sam"), Some(Role::Samurai));
        assert_eq!(Role::from_name("x"), None);
        assert_eq!(Race::from_name("ORC"), Some(Race::Orc));
    }

    #[test]
    fn test_every_role_has_a_weapon() {
        for role in Role::iter() {
            let inv = role.starting_inventory();
            assert!(
                inv.iter().any(|o| o.class() == crate::object::ObjectClass::Weapon),
                "{role} has no weapon"
            );
        }
    }

    #[test]
    fn test_humans_play_anything() {
        for role in Role::iter() {
            assert!(Race::Human.allows(role));
        }
        assert!(!Race::Gnome.allows(Role::Samurai));
    }
}
