//! Derived player status
//!
//! Armor class, combat bonuses, extrinsic properties and encumbrance are all
//! recomputed from equipment, race, role and attributes by [`recalc_status`].
//! Speed, regeneration, hunger and experience live here as well.

use super::{Attribute, Encumbrance, HungerState, Property, You};
use crate::GameRng;
use crate::consts::{BASE_AC, MAXULEV, NORMAL_SPEED};
use crate::object::{Object, WornMask, kinds};

/// To-hit bonus from strength, dexterity and inexperience (abon)
pub fn hit_bonus(player: &You) -> i8 {
    let str = player.attr(Attribute::Strength);
    let dex = player.attr(Attribute::Dexterity);

    let mut sbon: i8 = match str {
        ..=5 => -2,
        6..=7 => -1,
        8..=16 => 0,
        17..=18 => 1,
        19..=21 => 2,
        _ => 3,
    };
    if player.exp_level < 3 {
        sbon += 1;
    }

    let dbon: i8 = match dex {
        ..=3 => -3,
        4..=5 => -2,
        6..=7 => -1,
        8..=13 => 0,
        d => d - 14,
    };
    sbon + dbon
}

/// Damage bonus from strength (dbon)
pub fn damage_bonus(player: &You) -> i8 {
    match player.attr(Attribute::Strength) {
        ..=5 => -1,
        6..=15 => 0,
        16..=17 => 1,
        18 => 2,
        19..=20 => 3,
        21..=22 => 5,
        _ => 6,
    }
}

/// Carrying capacity (weight_cap)
pub fn weight_cap(player: &You) -> u32 {
    let str = player.attr(Attribute::Strength) as u32;
    let con = player.attr(Attribute::Constitution) as u32;
    (25 * (str + con) + 50).min(1000)
}

pub fn inventory_weight(inventory: &[Object]) -> u32 {
    inventory.iter().map(Object::weight).sum()
}

/// Encumbrance from inventory weight (calc_capacity)
pub fn calc_encumbrance(player: &You, inventory: &[Object]) -> Encumbrance {
    let cap = weight_cap(player);
    let carried = inventory_weight(inventory);
    if carried <= cap {
        return Encumbrance::Unencumbered;
    }
    if cap <= 1 {
        return Encumbrance::Overloaded;
    }
    let excess = carried - cap;
    Encumbrance::from_level((excess * 2 / cap) + 1)
}

/// Recompute every derived stat after an equipment or attribute change
pub fn recalc_status(player: &mut You, inventory: &[Object]) {
    let mut ac = BASE_AC as i32;
    let mut sources = Vec::new();

    for obj in inventory.iter().filter(|o| o.is_worn()) {
        if obj.worn.intersects(WornMask::ANY_ARMOR) {
            ac -= obj.armor_bonus();
        }
        if obj.kind == kinds::RIN_PROTECTION && obj.worn.intersects(WornMask::ANY_RING) {
            ac -= obj.enchantment as i32;
        }
        if let Some(prop) = obj.data().conveys
            && !obj.is_wielded()
        {
            sources.push((prop, obj.worn));
        }
    }
    if player.properties.has_intrinsic(Property::Protection) {
        ac -= 1;
    }

    player.properties.set_extrinsics(&sources);
    player.armor_class = ac.clamp(-99, 99) as i8;
    player.hit_bonus = hit_bonus(player);
    player.damage_bonus = damage_bonus(player);
    player.encumbrance = calc_encumbrance(player, inventory);
}

/// Energy the player gains at the start of a turn (u_calc_moveamt)
pub fn player_move_amount(player: &You, rng: &mut GameRng) -> i16 {
    let mut moveamt = NORMAL_SPEED;

    if player.has(Property::VeryFast) {
        // free action on 2/3 of turns
        if rng.rn2(3) != 0 {
            moveamt += NORMAL_SPEED;
        }
    } else if player.has(Property::Fast) && rng.rn2(3) == 0 {
        moveamt += NORMAL_SPEED;
    }

    if player.has(Property::Slowed) {
        moveamt /= 2;
    }

    match player.encumbrance {
        Encumbrance::Unencumbered => {}
        Encumbrance::Burdened => moveamt -= moveamt / 4,
        Encumbrance::Stressed => moveamt -= moveamt / 2,
        Encumbrance::Strained => moveamt -= (moveamt * 3) / 4,
        Encumbrance::Overtaxed | Encumbrance::Overloaded => moveamt -= (moveamt * 7) / 8,
    }
    moveamt
}

/// Hit point and energy regeneration for one turn
pub fn regenerate(player: &mut You, turn: u64, rng: &mut GameRng) {
    if player.hp < player.hp_max && player.encumbrance < Encumbrance::Strained {
        let level = player.exp_level as u64;
        let heal = if player.has(Property::Regeneration) {
            1
        } else if level > 9 {
            if turn % 3 == 0 {
                let con = player.attr(Attribute::Constitution) as u32;
                if con <= 12 { 1 } else { rng.rnd(con).min(level as u32) as i32 }
            } else {
                0
            }
        } else if turn % ((MAXULEV as u64 + 12) / (level + 2) + 1) == 0 {
            1
        } else {
            0
        };
        player.hp = (player.hp + heal).min(player.hp_max);
    }

    if player.energy < player.energy_max {
        let interval = (19 - player.exp_level as u64 / 2).max(4);
        if turn % interval == 0 {
            player.energy += 1;
        }
    }
}

/// Result of digesting one turn of food
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HungerEvent {
    None,
    Changed(HungerState),
    Fainted(u32),
    Starved,
}

/// Burn nutrition for one turn (gethungry + newuhs)
pub fn digest(player: &mut You, turn: u64, rng: &mut GameRng) -> HungerEvent {
    player.nutrition -= 1;
    if player.has(Property::Regeneration) && turn % 2 == 0 {
        player.nutrition -= 1;
    }

    let con = player.attr(Attribute::Constitution) as i32;
    if player.nutrition < -(100 + 10 * con) {
        return HungerEvent::Starved;
    }

    let state = HungerState::from_nutrition(player.nutrition);
    if state == HungerState::Fainting
        && !player.is_helpless()
        && rng.rn2((20 - player.nutrition / 10).max(1) as u32) >= 19
    {
        let turns = (10 - player.nutrition / 10).max(1) as u32;
        player.properties.incr_timeout(Property::Asleep, turns);
        player.hunger_state = state;
        return HungerEvent::Fainted(turns);
    }
    if state != player.hunger_state {
        player.hunger_state = state;
        return HungerEvent::Changed(state);
    }
    HungerEvent::None
}

/// Experience needed to advance past `level` (newuexp)
pub fn exp_for_level(level: u8) -> u32 {
    match level {
        0 => 0,
        1..=9 => 10 * (1 << level),
        10..=19 => 10_000 * (1 << (level - 10)),
        _ => 10_000_000 * (level as u32 - 19),
    }
}

/// Gain a level (pluslvl)
pub fn newexplevel(player: &mut You, rng: &mut GameRng) -> String {
    if player.exp_level >= MAXULEV {
        return String::from("You feel more experienced.");
    }
    player.exp_level += 1;
    let con_bonus = match player.attr(Attribute::Constitution) {
        ..=6 => -1,
        7..=14 => 0,
        15..=16 => 1,
        17 => 2,
        _ => 3,
    };
    let inc = (rng.rnd(8) as i32 + con_bonus).max(1);
    player.hp_max += inc;
    player.hp += inc;
    let en = rng.rnd(2) as i32;
    player.energy_max += en;
    player.energy += en;
    player.hit_bonus = hit_bonus(player);
    format!("Welcome to experience level {}.", player.exp_level)
}

/// Add experience points and advance levels as thresholds are crossed
pub fn gain_experience(player: &mut You, amount: u32, rng: &mut GameRng) -> Vec<String> {
    player.exp = player.exp.saturating_add(amount);
    let mut messages = Vec::new();
    while player.exp_level < MAXULEV && player.exp >= exp_for_level(player.exp_level) {
        messages.push(newexplevel(player, rng));
    }
    messages
}

/// Lose a level to a drain; returns true when it was the last one
pub fn losexp(player: &mut You, rng: &mut GameRng) -> bool {
    if player.exp_level <= 1 {
        player.exp = 0;
        return true;
    }
    player.exp_level -= 1;
    player.exp = exp_for_level(player.exp_level).saturating_sub(1);

    let loss = rng.rnd(8) as i32;
    player.hp_max = (player.hp_max - loss).max(1);
    player.hp = (player.hp - loss).clamp(1, player.hp_max);
    player.energy_max = (player.energy_max - 1).max(0);
    player.energy = player.energy.min(player.energy_max);
    player.hit_bonus = hit_bonus(player);
    false
}
