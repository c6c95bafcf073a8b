//! Object instances

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use super::{OBJECTS, ObjKind, ObjectClass, kinds};
use crate::GameRng;
use crate::dungeon::Position;

/// Unique identifier for object instances on a floor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ObjectId(pub u32);

impl ObjectId {
    pub const NONE: ObjectId = ObjectId(0);
}

/// Blessed/uncursed/cursed status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BucStatus {
    Blessed,
    #[default]
    Uncursed,
    Cursed,
}

bitflags! {
    /// Slots an item occupies while in use
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct WornMask: u16 {
        const ARMOR = 0x0001;
        const SHIELD = 0x0002;
        const HELM = 0x0004;
        const GLOVES = 0x0008;
        const BOOTS = 0x0010;
        const CLOAK = 0x0020;
        const RING_L = 0x0040;
        const RING_R = 0x0080;
        const AMULET = 0x0100;
        const WEAPON = 0x0200;

        const ANY_ARMOR = Self::ARMOR.bits() | Self::SHIELD.bits() | Self::HELM.bits()
            | Self::GLOVES.bits() | Self::BOOTS.bits() | Self::CLOAK.bits();
        const ANY_RING = Self::RING_L.bits() | Self::RING_R.bits();
    }
}

impl_bits_serde!(WornMask, u16);

/// A single item or stack of items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Object {
    pub id: ObjectId,
    /// Index into [`OBJECTS`]
    pub kind: usize,
    pub quantity: u32,
    pub enchantment: i8,
    pub buc: BucStatus,
    pub pos: Position,
    pub worn: WornMask,
    /// Inventory letter, or a space when not carried by the player
    pub inv_letter: char,
}

impl Object {
    pub fn new(kind: usize, quantity: u32) -> Self {
        Self {
            id: ObjectId::NONE,
            kind,
            quantity: quantity.max(1),
            enchantment: 0,
            buc: BucStatus::Uncursed,
            pos: Position::default(),
            worn: WornMask::empty(),
            inv_letter: ' ',
        }
    }

    pub fn gold(amount: u32) -> Self {
        Self::new(kinds::GOLD_PIECE, amount)
    }

    /// Create a random floor item (mkobj with RANDOM_CLASS)
    pub fn random(rng: &mut GameRng) -> Self {
        let classes = [
            ObjectClass::Weapon,
            ObjectClass::Armor,
            ObjectClass::Ring,
            ObjectClass::Amulet,
            ObjectClass::Potion,
            ObjectClass::Food,
        ];
        let total: u32 = classes.iter().map(|c| c.gen_prob()).sum();
        let mut roll = rng.rn2(total);
        let mut class = ObjectClass::Food;
        for c in classes {
            if roll < c.gen_prob() {
                class = c;
                break;
            }
            roll -= c.gen_prob();
        }
        Self::random_of_class(class, rng)
    }

    pub fn random_of_class(class: ObjectClass, rng: &mut GameRng) -> Self {
        let candidates: Vec<usize> = (0..OBJECTS.len())
            .filter(|&k| OBJECTS[k].class == class && OBJECTS[k].prob > 0)
            .collect();
        let total: u32 = candidates.iter().map(|&k| OBJECTS[k].prob as u32).sum();
        let mut roll = rng.rn2(total);
        let mut kind = candidates.first().copied().unwrap_or(kinds::FOOD_RATION);
        for k in candidates {
            let p = OBJECTS[k].prob as u32;
            if roll < p {
                kind = k;
                break;
            }
            roll -= p;
        }

        let mut obj = Self::new(kind, 1);
        let data = obj.data();
        if data.missile && data.class == ObjectClass::Weapon && kind != kinds::SPEAR {
            obj.quantity = rng.rn1(6, 6);
        }
        match class {
            ObjectClass::Weapon | ObjectClass::Armor => {
                if rng.one_in(10) {
                    obj.buc = BucStatus::Cursed;
                    obj.enchantment = -(rng.rnd(3) as i8);
                } else if rng.one_in(10) {
                    obj.enchantment = rng.rnd(3) as i8;
                    if rng.one_in(2) {
                        obj.buc = BucStatus::Blessed;
                    }
                }
            }
            ObjectClass::Ring if kind == kinds::RIN_PROTECTION => {
                obj.enchantment = rng.rnd(3) as i8;
            }
            _ => {}
        }
        obj
    }

    pub fn data(&self) -> &'static ObjKind {
        &OBJECTS[self.kind]
    }

    pub fn class(&self) -> ObjectClass {
        self.data().class
    }

    pub fn is_gold(&self) -> bool {
        self.kind == kinds::GOLD_PIECE
    }

    pub fn is_cursed(&self) -> bool {
        self.buc == BucStatus::Cursed
    }

    pub fn is_worn(&self) -> bool {
        !self.worn.is_empty()
    }

    pub fn is_wielded(&self) -> bool {
        self.worn.contains(WornMask::WEAPON)
    }

    pub fn weight(&self) -> u32 {
        if self.is_gold() {
            (self.quantity + 50) / 100
        } else {
            self.data().weight * self.quantity
        }
    }

    /// AC this item provides while worn
    pub fn armor_bonus(&self) -> i32 {
        if self.class() != ObjectClass::Armor {
            return 0;
        }
        self.data().ac as i32 + self.enchantment as i32
    }

    pub fn can_merge(&self, other: &Object) -> bool {
        self.class().stacks()
            && self.kind == other.kind
            && self.buc == other.buc
            && self.enchantment == other.enchantment
            && !self.is_worn()
            && !other.is_worn()
    }

    /// Split off `count` items into a new stack
    pub fn split(&mut self, count: u32) -> Object {
        let count = count.min(self.quantity);
        self.quantity -= count;
        let mut part = self.clone();
        part.quantity = count;
        part.worn = WornMask::empty();
        part.inv_letter = ' ';
        part
    }

    /// Name without quantity or article
    pub fn xname(&self) -> String {
        let base = self.data().name;
        if self.quantity == 1 {
            return base.to_string();
        }
        match base.split_once(" of ") {
            Some((head, tail)) => format!("{}s of {}", head, tail),
            None => format!("{}s", base),
        }
    }

    /// Full name with quantity, enchantment and use suffix
    pub fn doname(&self) -> String {
        let mut parts = Vec::new();
        if self.quantity > 1 {
            parts.push(self.quantity.to_string());
        } else {
            let article = match self.data().name.chars().next() {
                Some('a' | 'e' | 'i' | 'o' | 'u') => "an",
                _ => "a",
            };
            parts.push(article.to_string());
        }
        match self.buc {
            BucStatus::Blessed => parts.push("blessed".to_string()),
            BucStatus::Cursed => parts.push("cursed".to_string()),
            BucStatus::Uncursed => {}
        }
        if matches!(self.class(), ObjectClass::Weapon | ObjectClass::Armor)
            || self.kind == kinds::RIN_PROTECTION
        {
            if self.enchantment != 0 {
                parts.push(format!("{:+}", self.enchantment));
            }
        }
        parts.push(self.xname());
        let mut name = parts.join(" ");
        name.push_str(self.worn_suffix());
        name
    }

    fn worn_suffix(&self) -> &'static str {
        if self.worn.is_empty() {
            ""
        } else if self.worn.contains(WornMask::WEAPON) {
            " (weapon in hand)"
        } else if self.worn.intersects(WornMask::ANY_RING) {
            " (on finger)"
        } else {
            " (being worn)"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names() {
        let mut darts = Object::new(kinds::DART, 5);
        assert_eq!(darts.doname(), "5 darts");
        darts.quantity = 1;
        assert_eq!(darts.doname(), "a dart");

        let potions = Object::new(kinds::POT_HEALING, 2);
        assert_eq!(potions.xname(), "potions of healing");

        let mut sword = Object::new(kinds::LONG_SWORD, 1);
        sword.enchantment = 2;
        sword.worn = WornMask::WEAPON;
        assert_eq!(sword.doname(), "a +2 long sword (weapon in hand)");

        let apple = Object::new(kinds::APPLE, 1);
        assert_eq!(apple.doname(), "an apple");
    }

    #[test]
    fn test_gold_weight() {
        assert_eq!(Object::gold(49).weight(), 0);
        assert_eq!(Object::gold(150).weight(), 2);
        assert_eq!(Object::new(kinds::PLATE_MAIL, 1).weight(), 450);
    }

    #[test]
    fn test_split_and_merge() {
        let mut stack = Object::new(kinds::DAGGER, 4);
        let one = stack.split(1);
        assert_eq!(stack.quantity, 3);
        assert_eq!(one.quantity, 1);
        assert!(stack.can_merge(&one));

        let mut worn = Object::new(kinds::DAGGER, 1);
        worn.worn = WornMask::WEAPON;
        assert!(!stack.can_merge(&worn));
    }

    #[test]
    fn test_random_objects_are_valid() {
        let mut rng = GameRng::new(9);
        for _ in 0..200 {
            let obj = Object::random(&mut rng);
            assert!(obj.kind < OBJECTS.len());
            assert!(obj.quantity >= 1);
            assert!(!obj.is_gold());
        }
    }
}
