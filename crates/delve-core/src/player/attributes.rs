//! Player attributes (STR, INT, WIS, DEX, CON, CHA)

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
#[repr(u8)]
pub enum Attribute {
    Strength = 0,
    Intelligence = 1,
    Wisdom = 2,
    Dexterity = 3,
    Constitution = 4,
    Charisma = 5,
}

impl Attribute {
    pub const ALL: [Attribute; 6] = [
        Attribute::Strength,
        Attribute::Intelligence,
        Attribute::Wisdom,
        Attribute::Dexterity,
        Attribute::Constitution,
        Attribute::Charisma,
    ];

    pub const fn short_name(&self) -> &'static str {
        match self {
            Attribute::Strength => "St",
            Attribute::Intelligence => "In",
            Attribute::Wisdom => "Wi",
            Attribute::Dexterity => "Dx",
            Attribute::Constitution => "Co",
            Attribute::Charisma => "Ch",
        }
    }
}

/// A full set of six attribute scores, each within 3..=25
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributes([i8; 6]);

impl Default for Attributes {
    fn default() -> Self {
        Self([10; 6])
    }
}

impl Attributes {
    pub const MIN: i8 = 3;
    pub const MAX: i8 = 25;

    pub fn new(values: [i8; 6]) -> Self {
        Self(values.map(|v| v.clamp(Self::MIN, Self::MAX)))
    }

    pub fn get(&self, attr: Attribute) -> i8 {
        self.0[attr as usize]
    }

    pub fn set(&mut self, attr: Attribute, value: i8) {
        self.0[attr as usize] = value.clamp(Self::MIN, Self::MAX);
    }

    /// Adjust an attribute; returns false when already at the limit
    pub fn modify(&mut self, attr: Attribute, delta: i8) -> bool {
        let old = self.get(attr);
        self.set(attr, old.saturating_add(delta));
        self.get(attr) != old
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modify_clamps() {
        let mut attrs = Attributes::new([18, 10, 10, 10, 10, 10]);
        assert!(attrs.modify(Attribute::Strength, 10));
        assert_eq!(attrs.get(Attribute::Strength), Attributes::MAX);
        assert!(!attrs.modify(Attribute::Strength, 1));

        attrs.set(Attribute::Dexterity, 3);
        assert!(!attrs.modify(Attribute::Dexterity, -1));
    }
}
