//! Attack types: how an attack is delivered

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum AttackType {
    #[default]
    None = 0,
    Claw = 1,
    Bite = 2,
    Kick = 3,
    Butt = 4,
    Touch = 5,
    Sting = 6,
    /// Crushing hug; hits automatically after two hits in a row
    Hug = 7,
    Spit = 10,
    Engulf = 11,
    Breath = 12,
    /// Explodes when adjacent to its target, killing itself
    Explode = 13,
    /// Explodes when killed
    Boom = 14,
    Gaze = 15,
    Tentacle = 16,
    Weapon = 254,
    Magic = 255,
    /// Responds only when the monster is attacked
    Passive = 253,
}

impl AttackType {
    /// Attacks that work from a distance
    pub const fn is_ranged(&self) -> bool {
        matches!(
            self,
            AttackType::Spit | AttackType::Breath | AttackType::Gaze | AttackType::Magic
        )
    }

    /// Attacks used only as a reaction, never on the monster's own turn
    pub const fn is_passive(&self) -> bool {
        matches!(self, AttackType::Passive | AttackType::Boom)
    }

    /// Verb used in hit messages
    pub const fn verb(&self) -> &'static str {
        match self {
            AttackType::Claw => "hits",
            AttackType::Bite => "bites",
            AttackType::Kick => "kicks",
            AttackType::Butt => "butts",
            AttackType::Touch => "touches you",
            AttackType::Sting => "stings",
            AttackType::Hug => "squeezes you",
            AttackType::Tentacle => "tentacles suck you",
            AttackType::Weapon => "hits",
            _ => "hits",
        }
    }
}
