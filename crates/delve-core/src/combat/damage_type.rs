//! Damage types: what an attack does once it connects

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::player::Property;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum DamageType {
    #[default]
    Physical = 0,
    MagicMissile = 1,
    Fire = 2,
    Cold = 3,
    Sleep = 4,
    Disintegrate = 5,
    Electric = 6,
    /// Poison that saps strength
    DrainStrength = 7,
    Acid = 8,
    Blind = 11,
    Stun = 12,
    Slow = 13,
    Paralyze = 14,
    DrainLife = 15,
    Stick = 17,
    StealGold = 18,
    Teleport = 21,
    Confuse = 25,
    Digest = 27,
    MageSpell = 240,
    ClericSpell = 241,
}

impl DamageType {
    /// The player property that negates this damage type
    pub const fn player_resistance(&self) -> Option<Property> {
        match self {
            DamageType::Fire => Some(Property::FireRes),
            DamageType::Cold => Some(Property::ColdRes),
            DamageType::Sleep => Some(Property::SleepRes),
            DamageType::Disintegrate => Some(Property::DisintRes),
            DamageType::Electric => Some(Property::ShockRes),
            DamageType::DrainStrength => Some(Property::PoisonRes),
            DamageType::Acid => Some(Property::AcidRes),
            DamageType::DrainLife => Some(Property::DrainRes),
            DamageType::MagicMissile => Some(Property::MagicResistance),
            _ => None,
        }
    }

    /// Adjective for rays and explosions
    pub const fn element_name(&self) -> &'static str {
        match self {
            DamageType::MagicMissile => "magic missile",
            DamageType::Fire => "fire",
            DamageType::Cold => "frost",
            DamageType::Sleep => "sleep",
            DamageType::Disintegrate => "disintegration",
            DamageType::Electric => "lightning",
            DamageType::DrainStrength => "poison gas",
            DamageType::Acid => "acid",
            _ => "blast",
        }
    }
}
