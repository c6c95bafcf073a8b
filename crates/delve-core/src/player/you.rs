//! The player character

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use super::{Attribute, Attributes, Property, PropertySet, Race, Role};
use crate::GameRng;
use crate::consts::{BASE_AC, NORMAL_SPEED};
use crate::dungeon::Position;
use crate::monster::MonsterId;

/// Hunger state derived from nutrition
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize, Display,
    EnumIter,
)]
pub enum HungerState {
    Satiated,
    #[default]
    NotHungry,
    Hungry,
    Weak,
    Fainting,
}

impl HungerState {
    pub const fn from_nutrition(nutrition: i32) -> Self {
        if nutrition > 1000 {
            HungerState::Satiated
        } else if nutrition > 150 {
            HungerState::NotHungry
        } else if nutrition > 50 {
            HungerState::Hungry
        } else if nutrition > 0 {
            HungerState::Weak
        } else {
            HungerState::Fainting
        }
    }
}

/// Encumbrance level from carried weight
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize, Display,
    EnumIter,
)]
#[repr(u8)]
pub enum Encumbrance {
    #[default]
    Unencumbered = 0,
    Burdened = 1,
    Stressed = 2,
    Strained = 3,
    Overtaxed = 4,
    Overloaded = 5,
}

impl Encumbrance {
    pub fn from_level(level: u32) -> Self {
        match level {
            0 => Encumbrance::Unencumbered,
            1 => Encumbrance::Burdened,
            2 => Encumbrance::Stressed,
            3 => Encumbrance::Strained,
            4 => Encumbrance::Overtaxed,
            _ => Encumbrance::Overloaded,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct You {
    pub name: String,
    pub role: Role,
    pub race: Race,
    /// Alignment sign: 1 lawful, 0 neutral, -1 chaotic
    pub alignment: i8,

    pub pos: Position,
    pub hp: i32,
    pub hp_max: i32,
    pub energy: i32,
    pub energy_max: i32,
    pub exp_level: u8,
    pub exp: u32,
    pub attr_current: Attributes,
    pub attr_max: Attributes,
    pub luck: i8,

    pub nutrition: i32,
    pub hunger_state: HungerState,
    pub gold: u32,
    /// Turn energy
    pub movement: i16,
    pub properties: PropertySet,

    // Derived by recalc_status
    pub armor_class: i8,
    pub hit_bonus: i8,
    pub damage_bonus: i8,
    pub encumbrance: Encumbrance,

    pub swallowed_by: Option<MonsterId>,
    pub stuck_to: Option<MonsterId>,
    /// Turns left stuck in a trap
    pub utrap: u32,
    pub max_depth: i32,
    pub kills: u32,
}

impl You {
    pub fn new(name: impl Into<String>, role: Role, race: Race, rng: &mut GameRng) -> Self {
        let mut base = role.base_attributes();
        // Distribute a few random points like u_init
        for _ in 0..6 {
            let i = rng.rn2(6) as usize;
            base[i] = base[i].saturating_add(1);
        }
        let attrs = Attributes::new(base);

        let hp = role.base_hp() + race.base_hp();
        let energy = role.base_energy() + race.base_energy();

        let mut properties = PropertySet::new();
        for &prop in role.intrinsics().iter().chain(race.intrinsics()) {
            properties.grant_intrinsic(prop);
        }

        Self {
            name: name.into(),
            role,
            race,
            alignment: role.alignment(),
            pos: Position::default(),
            hp,
            hp_max: hp,
            energy,
            energy_max: energy,
            exp_level: 1,
            exp: 0,
            attr_current: attrs,
            attr_max: attrs,
            luck: 0,
            nutrition: 900,
            hunger_state: HungerState::NotHungry,
            gold: 0,
            movement: NORMAL_SPEED,
            properties,
            armor_class: BASE_AC,
            hit_bonus: 0,
            damage_bonus: 0,
            encumbrance: Encumbrance::Unencumbered,
            swallowed_by: None,
            stuck_to: None,
            utrap: 0,
            max_depth: 1,
            kills: 0,
        }
    }

    pub fn attr(&self, attr: Attribute) -> i8 {
        self.attr_current.get(attr)
    }

    pub fn has(&self, prop: Property) -> bool {
        self.properties.has(prop)
    }

    pub fn is_dead(&self) -> bool {
        self.hp <= 0
    }

    /// Paralyzed or asleep: the player's turns are spent without input
    pub fn is_helpless(&self) -> bool {
        self.has(Property::Paralyzed) || self.has(Property::Asleep)
    }

    pub fn is_blind(&self) -> bool {
        self.has(Property::Blinded)
    }

    pub fn is_confused(&self) -> bool {
        self.has(Property::Confusion)
    }

    pub fn is_stunned(&self) -> bool {
        self.has(Property::Stunned)
    }

    pub fn is_engulfed(&self) -> bool {
        self.swallowed_by.is_some()
    }

    /// Apply damage; returns true when this kills the player
    pub fn take_damage(&mut self, amount: i32) -> bool {
        self.hp -= amount.max(0);
        self.is_dead()
    }

    pub fn heal(&mut self, amount: i32, raise_max: i32) {
        self.hp += amount;
        if self.hp > self.hp_max {
            self.hp_max += raise_max.min(self.hp - self.hp_max);
            self.hp = self.hp.min(self.hp_max);
        }
    }

    /// Sleep or paralysis; free action prevents paralysis.
    /// Returns whether the effect took hold.
    pub fn make_helpless(&mut self, prop: Property, turns: u32) -> bool {
        if prop == Property::Paralyzed && self.has(Property::FreeAction) {
            return false;
        }
        self.properties.incr_timeout(prop, turns);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> You {
        You::new("tester", Role::Valkyrie, Race::Human, &mut GameRng::new(1))
    }

    #[test]
    fn test_new_player_intrinsics() {
        let you = player();
        assert!(you.has(Property::ColdRes));
        assert!(you.has(Property::Stealth));
        assert!(!you.has(Property::FireRes));
        assert_eq!(you.hp, 16);
        assert_eq!(you.movement, NORMAL_SPEED);
    }

    #[test]
    fn test_heal_caps_at_max() {
        let mut you = player();
        you.hp = 5;
        you.heal(100, 0);
        assert_eq!(you.hp, you.hp_max);

        let max = you.hp_max;
        you.heal(10, 2);
        assert_eq!(you.hp_max, max + 2);
        assert_eq!(you.hp, you.hp_max);
    }

    #[test]
    fn test_helpless() {
        let mut you = player();
        assert!(!you.is_helpless());
        assert!(you.make_helpless(Property::Asleep, 3));
        assert!(you.is_helpless());

        let mut free = player();
        free.properties.grant_intrinsic(Property::FreeAction);
        assert!(!free.make_helpless(Property::Paralyzed, 5));
        assert!(!free.is_helpless());
    }

    #[test]
    fn test_hunger_thresholds() {
        assert_eq!(HungerState::from_nutrition(1200), HungerState::Satiated);
        assert_eq!(HungerState::from_nutrition(151), HungerState::NotHungry);
        assert_eq!(HungerState::from_nutrition(150), HungerState::Hungry);
        assert_eq!(HungerState::from_nutrition(50), HungerState::Weak);
        assert_eq!(HungerState::from_nutrition(0), HungerState::Fainting);
    }
}
