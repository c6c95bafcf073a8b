//! Static object kind table

use super::{ArmorSlot, ObjectClass};
use crate::player::Property;

/// Static description of an object kind
#[derive(Debug, Clone, Copy)]
pub struct ObjKind {
    pub name: &'static str,
    pub class: ObjectClass,
    /// Generation weight within its class
    pub prob: u16,
    pub weight: u32,
    /// Damage die sides against small monsters
    pub damage: u8,
    pub hit_bonus: i8,
    pub ac: i8,
    pub slot: Option<ArmorSlot>,
    /// Property granted while worn, put on or wielded
    pub conveys: Option<Property>,
    /// Thrown rather than swung
    pub missile: bool,
    /// Needs a launcher for full damage
    pub ammo: bool,
    pub nutrition: u16,
}

const fn weapon(name: &'static str, prob: u16, weight: u32, damage: u8, hit_bonus: i8) -> ObjKind {
    ObjKind {
        name,
        class: ObjectClass::Weapon,
        prob,
        weight,
        damage,
        hit_bonus,
        ac: 0,
        slot: None,
        conveys: None,
        missile: false,
        ammo: false,
        nutrition: 0,
    }
}

const fn missile(name: &'static str, prob: u16, damage: u8, hit_bonus: i8, ammo: bool) -> ObjKind {
    ObjKind {
        missile: true,
        ammo,
        ..weapon(name, prob, 1, damage, hit_bonus)
    }
}

const fn armor(
    name: &'static str,
    prob: u16,
    weight: u32,
    ac: i8,
    slot: ArmorSlot,
    conveys: Option<Property>,
) -> ObjKind {
    ObjKind {
        class: ObjectClass::Armor,
        ac,
        slot: Some(slot),
        conveys,
        ..weapon(name, prob, weight, 0, 0)
    }
}

const fn jewel(name: &'static str, class: ObjectClass, weight: u32, conveys: Property) -> ObjKind {
    ObjKind {
        class,
        conveys: Some(conveys),
        ..weapon(name, 1, weight, 0, 0)
    }
}

const fn potion(name: &'static str, prob: u16) -> ObjKind {
    ObjKind {
        class: ObjectClass::Potion,
        ..weapon(name, prob, 20, 0, 0)
    }
}

const fn food(name: &'static str, prob: u16, weight: u32, nutrition: u16) -> ObjKind {
    ObjKind {
        class: ObjectClass::Food,
        nutrition,
        ..weapon(name, prob, weight, 0, 0)
    }
}

/// Indices into [`OBJECTS`]
pub mod kinds {
    pub const DAGGER: usize = 0;
    pub const DART: usize = 1;
    pub const ARROW: usize = 2;
    pub const SHORT_SWORD: usize = 3;
    pub const LONG_SWORD: usize = 4;
    pub const MACE: usize = 5;
    pub const AXE: usize = 6;
    pub const SPEAR: usize = 7;
    pub const BOW: usize = 8;
    pub const LEATHER_ARMOR: usize = 9;
    pub const RING_MAIL: usize = 10;
    pub const CHAIN_MAIL: usize = 11;
    pub const PLATE_MAIL: usize = 12;
    pub const SMALL_SHIELD: usize = 13;
    pub const HELMET: usize = 14;
    pub const LEATHER_CLOAK: usize = 15;
    pub const CLOAK_OF_MAGIC_RESISTANCE: usize = 16;
    pub const SPEED_BOOTS: usize = 17;
    pub const LEATHER_GLOVES: usize = 18;
    pub const RIN_FREE_ACTION: usize = 19;
    pub const RIN_FIRE_RESISTANCE: usize = 20;
    pub const RIN_REGENERATION: usize = 21;
    pub const RIN_PROTECTION: usize = 22;
    pub const RIN_SEE_INVISIBLE: usize = 23;
    pub const AMULET_OF_REFLECTION: usize = 24;
    pub const POT_HEALING: usize = 25;
    pub const POT_EXTRA_HEALING: usize = 26;
    pub const POT_SPEED: usize = 27;
    pub const POT_CONFUSION: usize = 28;
    pub const POT_SLEEPING: usize = 29;
    pub const POT_BLINDNESS: usize = 30;
    pub const FOOD_RATION: usize = 31;
    pub const APPLE: usize = 32;
    pub const GOLD_PIECE: usize = 33;
}

pub static OBJECTS: &[ObjKind] = &[
    missile("dagger", 30, 4, 2, false),
    missile("dart", 60, 3, 2, false),
    missile("arrow", 55, 6, 0, true),
    weapon("short sword", 8, 30, 6, 0),
    weapon("long sword", 50, 40, 8, 0),
    weapon("mace", 40, 30, 6, 0),
    weapon("axe", 40, 60, 6, 0),
    ObjKind {
        missile: true,
        ..weapon("spear", 50, 30, 6, 0)
    },
    weapon("bow", 24, 30, 2, 0),
    armor("leather armor", 82, 150, 2, ArmorSlot::Body, None),
    armor("ring mail", 72, 250, 3, ArmorSlot::Body, None),
    armor("chain mail", 72, 300, 5, ArmorSlot::Body, None),
    armor("plate mail", 44, 450, 7, ArmorSlot::Body, None),
    armor("small shield", 6, 30, 1, ArmorSlot::Shield, None),
    armor("helmet", 10, 30, 1, ArmorSlot::Helm, None),
    armor("leather cloak", 8, 15, 1, ArmorSlot::Cloak, None),
    armor(
        "cloak of magic resistance",
        2,
        10,
        1,
        ArmorSlot::Cloak,
        Some(Property::MagicResistance),
    ),
    armor("speed boots", 12, 20, 1, ArmorSlot::Boots, Some(Property::VeryFast)),
    armor("leather gloves", 16, 10, 1, ArmorSlot::Gloves, None),
    jewel("ring of free action", ObjectClass::Ring, 3, Property::FreeAction),
    jewel("ring of fire resistance", ObjectClass::Ring, 3, Property::FireRes),
    jewel("ring of regeneration", ObjectClass::Ring, 3, Property::Regeneration),
    jewel("ring of protection", ObjectClass::Ring, 3, Property::Protection),
    jewel("ring of see invisible", ObjectClass::Ring, 3, Property::SeeInvisible),
    jewel("amulet of reflection", ObjectClass::Amulet, 20, Property::Reflection),
    potion("potion of healing", 57),
    potion("potion of extra healing", 47),
    potion("potion of speed", 42),
    potion("potion of confusion", 42),
    potion("potion of sleeping", 42),
    potion("potion of blindness", 40),
    food("food ration", 380, 20, 800),
    food("apple", 15, 2, 50),
    ObjKind {
        class: ObjectClass::Coin,
        ..weapon("gold piece", 0, 0, 0, 0)
    },
];

/// Look up a kind index by name
pub fn kind_by_name(name: &str) -> Option<usize> {
    OBJECTS.iter().position(|k| k.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_indices_match_table() {
        assert_eq!(OBJECTS[kinds::DAGGER].name, "dagger");
        assert_eq!(OBJECTS[kinds::BOW].name, "bow");
        assert_eq!(OBJECTS[kinds::LEATHER_GLOVES].name, "leather gloves");
        assert_eq!(OBJECTS[kinds::AMULET_OF_REFLECTION].name, "amulet of reflection");
        assert_eq!(OBJECTS[kinds::POT_BLINDNESS].name, "potion of blindness");
        assert_eq!(OBJECTS[kinds::GOLD_PIECE].name, "gold piece");
        assert_eq!(OBJECTS.len(), kinds::GOLD_PIECE + 1);
    }

    #[test]
    fn test_armor_has_slot() {
        for kind in OBJECTS.iter().filter(|k| k.class == ObjectClass::Armor) {
            assert!(kind.slot.is_some(), "{} has no slot", kind.name);
            assert!(kind.ac > 0);
        }
    }

    #[test]
    fn test_kind_by_name() {
        assert_eq!(kind_by_name("speed boots"), Some(kinds::SPEED_BOOTS));
        assert_eq!(kind_by_name("vorpal blade"), None);
    }
}
