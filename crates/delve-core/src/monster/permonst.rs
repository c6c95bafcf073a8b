//! Monster races: static templates shared by every instance of a species

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::combat::{Attack, AttackSet, AttackType, DamageType};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
    Display, EnumIter,
)]
#[repr(u8)]
pub enum MonsterSize {
    Tiny = 0,
    Small = 1,
    #[default]
    Medium = 2,
    Large = 3,
    Huge = 4,
}

bitflags! {
    /// Race behaviour and body flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MonsterFlags: u32 {
        const FLY = 0x0000_0001;
        const SWIM = 0x0000_0002;
        const AMORPHOUS = 0x0000_0004;
        const NOEYES = 0x0000_0008;
        const NOHANDS = 0x0000_0010;
        /// Moves only orthogonally
        const NODIAG = 0x0000_0020;
        const CARNIVORE = 0x0000_0040;
        const HERBIVORE = 0x0000_0080;
        const UNDEAD = 0x0000_0100;
        const REGEN = 0x0000_0200;
        const SEE_INVIS = 0x0000_0400;
        /// Picks up weapons and food
        const COLLECT = 0x0000_0800;
        /// Picks up gold
        const GREEDY = 0x0000_1000;
        const JEWELS = 0x0000_2000;
        const WANDER = 0x0000_4000;
        const DOMESTIC = 0x0000_8000;
        const HOSTILE = 0x0001_0000;
        const PEACEFUL = 0x0002_0000;
        /// Follows the player across stairs
        const STALK = 0x0004_0000;
        const NOPOISON = 0x0008_0000;
        /// Wields weapons
        const WEAPONS = 0x0010_0000;
        const THICK_HIDE = 0x0020_0000;
        const MINDLESS = 0x0040_0000;
        const ANIMAL = 0x0080_0000;
        const HUMANOID = 0x0100_0000;
    }
}

impl_bits_serde!(MonsterFlags, u32);

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MonsterResistances: u16 {
        const FIRE = 0x0001;
        const COLD = 0x0002;
        const SLEEP = 0x0004;
        const DISINT = 0x0008;
        const ELEC = 0x0010;
        const POISON = 0x0020;
        const ACID = 0x0040;
        const STONE = 0x0080;
    }
}

impl_bits_serde!(MonsterResistances, u16);

impl MonsterResistances {
    /// Resistance matching a damage type, if any
    pub const fn for_damage(damage: DamageType) -> Option<MonsterResistances> {
        match damage {
            DamageType::Fire => Some(MonsterResistances::FIRE),
            DamageType::Cold => Some(MonsterResistances::COLD),
            DamageType::Sleep => Some(MonsterResistances::SLEEP),
            DamageType::Disintegrate => Some(MonsterResistances::DISINT),
            DamageType::Electric => Some(MonsterResistances::ELEC),
            DamageType::DrainStrength => Some(MonsterResistances::POISON),
            DamageType::Acid => Some(MonsterResistances::ACID),
            _ => None,
        }
    }
}

bitflags! {
    /// Generation flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct GenFlags: u8 {
        const SGROUP = 0x01;
        const LGROUP = 0x02;
        const NOGEN = 0x04;
    }
}

/// Static description of a monster race
#[derive(Debug, Clone, Copy)]
pub struct PerMonst {
    pub name: &'static str,
    pub symbol: char,
    pub level: u8,
    pub speed: i16,
    pub ac: i8,
    /// Magic resistance percentage
    pub mr: u8,
    pub alignment: i8,
    pub gen_flags: GenFlags,
    /// Relative generation frequency, 0..=5
    pub frequency: u8,
    pub attacks: AttackSet,
    pub weight: u32,
    pub nutrition: u32,
    pub size: MonsterSize,
    pub resists: MonsterResistances,
    pub flags: MonsterFlags,
    pub difficulty: u8,
}

impl PerMonst {
    pub const fn has_flag(&self, flag: MonsterFlags) -> bool {
        self.flags.contains(flag)
    }

    pub const fn is_undead(&self) -> bool {
        self.flags.contains(MonsterFlags::UNDEAD)
    }

    pub const fn can_fly(&self) -> bool {
        self.flags.contains(MonsterFlags::FLY)
    }

    pub const fn can_swim(&self) -> bool {
        self.flags.contains(MonsterFlags::SWIM)
    }

    pub const fn is_amorphous(&self) -> bool {
        self.flags.contains(MonsterFlags::AMORPHOUS)
    }

    pub const fn regenerates(&self) -> bool {
        self.flags.contains(MonsterFlags::REGEN)
    }

    pub const fn sees_invisible(&self) -> bool {
        self.flags.contains(MonsterFlags::SEE_INVIS)
    }

    pub const fn has_eyes(&self) -> bool {
        !self.flags.contains(MonsterFlags::NOEYES)
    }

    pub const fn nodiag(&self) -> bool {
        self.flags.contains(MonsterFlags::NODIAG)
    }

    pub const fn has_hands(&self) -> bool {
        !self.flags.contains(MonsterFlags::NOHANDS)
    }

    pub const fn resists(&self, damage: DamageType) -> bool {
        match MonsterResistances::for_damage(damage) {
            Some(r) => self.resists.contains(r),
            None => false,
        }
    }

    /// First attack of the given type
    pub fn attack_of(&self, attack_type: AttackType) -> Option<Attack> {
        self.attacks
            .iter()
            .copied()
            .find(|a| a.attack_type == attack_type)
    }

    /// The passive response, if any
    pub fn passive(&self) -> Option<Attack> {
        self.attack_of(AttackType::Passive)
    }

    pub fn has_ranged_attack(&self) -> bool {
        self.attacks.iter().any(|a| {
            matches!(a.attack_type, AttackType::Breath | AttackType::Spit)
                || (a.attack_type == AttackType::Magic && a.damage_type != DamageType::MageSpell
                    && a.damage_type != DamageType::ClericSpell)
        }) || self.has_flag(MonsterFlags::WEAPONS)
    }

    pub fn is_spellcaster(&self) -> bool {
        self.attacks.iter().any(|a| {
            a.attack_type == AttackType::Magic
                && matches!(a.damage_type, DamageType::MageSpell | DamageType::ClericSpell)
        })
    }
}
