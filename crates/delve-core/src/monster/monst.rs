//! Monster instances

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use super::{MONSTERS, MonsterFlags, PerMonst};
use crate::GameRng;
use crate::combat::DamageType;
use crate::consts::NORMAL_SPEED;
use crate::dungeon::{Position, TrapType};
use crate::object::{Object, ObjectClass};

/// Unique identifier for a monster on its floor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct MonsterId(pub u32);

impl MonsterId {
    pub const NONE: MonsterId = MonsterId(0);
}

impl std::fmt::Display for MonsterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Temporary speed modifier
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum SpeedState {
    Slow = 1,
    #[default]
    Normal = 0,
    Fast = 2,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonsterState {
    pub peaceful: bool,
    pub tame: bool,
    pub sleeping: bool,
    pub fleeing: bool,
    pub confused: bool,
    pub stunned: bool,
    pub blinded: bool,
    /// Cannot move (paralysis)
    pub frozen: bool,
    pub cancelled: bool,
    pub invisible: bool,
    pub trapped: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Monster {
    pub id: MonsterId,
    /// Index into [`MONSTERS`]
    pub race: usize,
    pub name: String,
    pub pos: Position,
    /// Where the monster thinks the player is
    pub believed_player: Position,

    /// Turn energy
    pub movement: i16,
    pub level: u8,
    pub hp: i32,
    pub hp_max: i32,
    pub ac: i8,
    pub speed: SpeedState,
    pub permanent_speed: SpeedState,
    pub state: MonsterState,

    pub flee_timeout: u16,
    pub frozen_timeout: u16,
    pub blinded_timeout: u16,
    pub confused_timeout: u16,
    pub stunned_timeout: u16,
    pub trap_timeout: u16,
    /// Special ability cooldown (spells, breath)
    pub spec_used: u16,
    /// Turns left before an engulfed player is expelled
    pub engulf_timer: u16,
    /// Bitmask of trap kinds this monster knows about
    pub trap_seen: u16,

    pub inventory: Vec<Object>,
    pub gold: u32,
    pub tameness: u8,
    /// Experience gained as a pet
    pub exp: u32,
}

impl Monster {
    pub fn new(id: MonsterId, race: usize, pos: Position) -> Self {
        let data = &MONSTERS[race];
        Self {
            id,
            race,
            name: data.name.to_string(),
            pos,
            believed_player: pos,
            movement: 0,
            level: data.level,
            hp: 1,
            hp_max: 1,
            ac: data.ac,
            speed: SpeedState::Normal,
            permanent_speed: SpeedState::Normal,
            state: MonsterState::default(),
            flee_timeout: 0,
            frozen_timeout: 0,
            blinded_timeout: 0,
            confused_timeout: 0,
            stunned_timeout: 0,
            trap_timeout: 0,
            spec_used: 0,
            engulf_timer: 0,
            trap_seen: 0,
            inventory: Vec::new(),
            gold: 0,
            tameness: 0,
            exp: 0,
        }
    }

    pub fn data(&self) -> &'static PerMonst {
        &MONSTERS[self.race]
    }

    /// "the jackal"
    pub fn the_name(&self) -> String {
        format!("the {}", self.name)
    }

    /// "The jackal"
    pub fn cap_name(&self) -> String {
        format!("The {}", self.name)
    }

    pub fn is_hostile(&self) -> bool {
        !self.state.peaceful && !self.state.tame
    }

    pub fn is_helpless(&self) -> bool {
        self.state.sleeping || self.state.frozen
    }

    /// Able to take its turn
    pub fn can_act(&self) -> bool {
        !self.is_helpless() && self.hp > 0
    }

    pub fn can_see(&self) -> bool {
        !self.state.blinded && self.data().has_eyes()
    }

    pub fn resists(&self, damage: DamageType) -> bool {
        self.data().resists(damage)
    }

    /// Magic resistance roll (resist)
    pub fn resist_magic(&self, rng: &mut GameRng) -> bool {
        rng.rn2(100) < self.data().mr as u32
    }

    /// Apply damage; returns true if the monster died
    pub fn take_damage(&mut self, amount: i32) -> bool {
        self.hp -= amount.max(0);
        self.hp <= 0
    }

    pub fn heal(&mut self, amount: i32) {
        self.hp = (self.hp + amount).min(self.hp_max);
    }

    pub fn likes_gold(&self) -> bool {
        self.data().has_flag(MonsterFlags::GREEDY)
    }

    pub fn likes_objects(&self) -> bool {
        self.data().has_flag(MonsterFlags::COLLECT)
    }

    pub fn knows_trap(&self, kind: TrapType) -> bool {
        self.trap_seen & kind.bit() != 0
    }

    pub fn learn_trap(&mut self, kind: TrapType) {
        self.trap_seen |= kind.bit();
    }

    pub fn wielded(&self) -> Option<&Object> {
        self.inventory.iter().find(|o| o.is_wielded())
    }

    /// Pick the best melee weapon in inventory and wield it (mon_wield_item)
    pub fn wield_best(&mut self) {
        let best = self
            .inventory
            .iter()
            .enumerate()
            .filter(|(_, o)| o.class() == ObjectClass::Weapon && !o.data().ammo)
            .max_by_key(|(_, o)| o.data().damage as i32 + o.enchantment as i32)
            .map(|(i, _)| i);
        for obj in &mut self.inventory {
            obj.worn.remove(crate::object::WornMask::WEAPON);
        }
        if let Some(i) = best {
            self.inventory[i].worn.insert(crate::object::WornMask::WEAPON);
        }
    }

    /// Energy gained at the start of a turn (mcalcmove)
    pub fn mcalcmove(&self, rng: &mut GameRng) -> i16 {
        let mut mmove = self.data().speed;
        match self.speed {
            SpeedState::Slow => mmove = (2 * mmove + 1) / 3,
            SpeedState::Fast => mmove = (4 * mmove + 2) / 3,
            SpeedState::Normal => {}
        }
        // Randomly round to a multiple of NORMAL_SPEED so free turns are unpredictable
        let adj = mmove % NORMAL_SPEED;
        mmove -= adj;
        if rng.rn2(NORMAL_SPEED as u32) < adj as u32 {
            mmove += NORMAL_SPEED;
        }
        mmove
    }

    /// Start or extend fleeing. A zero timeout means flee until courage returns.
    /// Returns true if the monster was not already fleeing.
    pub fn monflee(&mut self, timeout: u16, first: bool) -> bool {
        if first && self.state.fleeing {
            return false;
        }
        let started = !self.state.fleeing;
        if timeout == 0 {
            self.flee_timeout = 0;
        } else if !self.state.fleeing || self.flee_timeout < timeout {
            self.flee_timeout = timeout;
        }
        self.state.fleeing = true;
        started
    }

    pub fn set_frozen(&mut self, turns: u16) {
        if turns == 0 {
            return;
        }
        self.state.frozen = true;
        self.frozen_timeout = self.frozen_timeout.max(turns);
    }

    pub fn set_blinded(&mut self, turns: u16) {
        if turns == 0 || !self.data().has_eyes() {
            return;
        }
        self.state.blinded = true;
        self.blinded_timeout = self.blinded_timeout.saturating_add(turns);
    }

    pub fn set_confused(&mut self, turns: u16) {
        self.state.confused = true;
        self.confused_timeout = self.confused_timeout.max(turns);
    }

    pub fn set_stunned(&mut self, turns: u16) {
        self.state.stunned = true;
        self.stunned_timeout = self.stunned_timeout.max(turns);
    }

    /// Count down timed conditions once per turn (mcalcdistress)
    pub fn tick_timeouts(&mut self) {
        fn tick(timer: &mut u16, flag: &mut bool) {
            if *timer > 0 {
                *timer -= 1;
                if *timer == 0 {
                    *flag = false;
                }
            }
        }
        tick(&mut self.frozen_timeout, &mut self.state.frozen);
        tick(&mut self.blinded_timeout, &mut self.state.blinded);
        tick(&mut self.confused_timeout, &mut self.state.confused);
        tick(&mut self.stunned_timeout, &mut self.state.stunned);
        tick(&mut self.flee_timeout, &mut self.state.fleeing);
        if self.spec_used > 0 {
            self.spec_used -= 1;
        }
    }

    /// Regenerate one hit point on a regenerating race or every 20 turns
    pub fn regenerate(&mut self, turn: u64) {
        if self.hp < self.hp_max && (turn % 20 == 0 || self.data().regenerates()) {
            self.hp += 1;
        }
    }
}
