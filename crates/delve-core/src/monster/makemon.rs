//! Monster creation (makemon)

use bitflags::bitflags;
use tracing::{debug, warn};

use super::{MONSTERS, Monster, MonsterFlags, MonsterId, race_by_name};
use crate::dungeon::{Level, Position};
use crate::object::{Object, kinds};
use crate::player::{Role, You};
use crate::{GameRng, GameState};

bitflags! {
    /// Options for [`makemon`]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct MakeMonFlags: u8 {
        /// Bring along a group for SGROUP/LGROUP races
        const GROUP = 0x01;
        const ASLEEP = 0x02;
        /// No starting inventory
        const NO_MINVENT = 0x04;
        const PEACEFUL = 0x08;
        const HOSTILE = 0x10;
    }
}

/// What creation needs to know about the player
#[derive(Debug, Clone, Copy, Default)]
pub struct SpawnContext {
    /// Cell a new monster must not take
    pub player_pos: Option<Position>,
    pub alignment: i8,
    pub player_level: u8,
}

impl SpawnContext {
    pub fn from_player(player: &You) -> Self {
        Self {
            player_pos: Some(player.pos),
            alignment: player.alignment,
            player_level: player.exp_level,
        }
    }
}

/// Level of a new monster after depth and player-level adjustment (adj_lev)
fn adjusted_level(race: usize, depth: i32, player_level: u8) -> u8 {
    let base = MONSTERS[race].level as i32;
    let mut lvl = base;
    let diff = depth - base;
    if diff < 0 {
        lvl -= 1;
    } else {
        lvl += diff / 5;
    }
    let above = player_level as i32 - base;
    if above > 0 {
        lvl += above / 4;
    }
    let cap = ((3 * base) / 2).min(49);
    lvl.min(cap).max(0) as u8
}

/// Whether a new monster of this race is generated peaceful
pub fn peace_minded(race: usize, alignment: i8, rng: &mut GameRng) -> bool {
    let data = &MONSTERS[race];
    if data.has_flag(MonsterFlags::PEACEFUL) {
        return true;
    }
    if data.has_flag(MonsterFlags::HOSTILE) {
        return false;
    }
    if data.alignment.signum() != alignment.signum() {
        return false;
    }
    rng.rn2(26) != 0 && rng.rn2(2 + data.alignment.unsigned_abs() as u32) != 0
}

/// Create a monster at `pos`, or the nearest free cell to it
pub fn makemon(
    level: &mut Level,
    race: usize,
    pos: Position,
    ctx: &SpawnContext,
    flags: MakeMonFlags,
    rng: &mut GameRng,
) -> Option<MonsterId> {
    let pos = if level.is_free(pos, ctx.player_pos) {
        pos
    } else {
        match level.enexto(pos, ctx.player_pos, rng) {
            Some(p) => p,
            None => {
                warn!(race = MONSTERS[race].name, %pos, "no room to create monster");
                return None;
            }
        }
    };

    let data = &MONSTERS[race];
    let mut mon = Monster::new(MonsterId::NONE, race, pos);
    mon.level = adjusted_level(race, level.depth, ctx.player_level);
    mon.hp_max = if mon.level == 0 {
        rng.rnd(4) as i32
    } else {
        rng.dice(mon.level as u32, 8) as i32
    };
    mon.hp = mon.hp_max;

    mon.state.peaceful = if flags.contains(MakeMonFlags::PEACEFUL) {
        true
    } else if flags.contains(MakeMonFlags::HOSTILE) {
        false
    } else {
        peace_minded(race, ctx.alignment, rng)
    };
    mon.state.sleeping = flags.contains(MakeMonFlags::ASLEEP);

    if !flags.contains(MakeMonFlags::NO_MINVENT) {
        if data.has_flag(MonsterFlags::WEAPONS) {
            m_initweap(&mut mon, rng);
        }
        if data.has_flag(MonsterFlags::GREEDY) {
            mon.gold = rng.dice(level.depth.max(1) as u32, 30);
        }
    }

    let peaceful = mon.state.peaceful;
    let id = level.add_monster(mon);
    debug!(%id, race = data.name, %pos, peaceful, "created monster");

    if flags.contains(MakeMonFlags::GROUP) {
        let size = if data.gen_flags.contains(super::GenFlags::LGROUP) {
            10
        } else if data.gen_flags.contains(super::GenFlags::SGROUP) {
            3
        } else {
            0
        };
        if size > 0 {
            let mut member_flags = flags - MakeMonFlags::GROUP;
            member_flags.set(MakeMonFlags::PEACEFUL, peaceful);
            member_flags.set(MakeMonFlags::HOSTILE, !peaceful);
            init_group(level, race, pos, size, ctx, member_flags, rng);
        }
    }
    Some(id)
}

/// Companions around a group leader (m_initgrp); fewer for a weak player
fn init_group(
    level: &mut Level,
    race: usize,
    leader: Position,
    size: u32,
    ctx: &SpawnContext,
    flags: MakeMonFlags,
    rng: &mut GameRng,
) {
    let mut count = rng.rnd(size);
    count /= match ctx.player_level {
        0..=2 => 4,
        3..=4 => 2,
        _ => 1,
    };
    count = count.max(1);
    for _ in 0..count {
        let Some(pos) = level.enexto(leader, ctx.player_pos, rng) else {
            break;
        };
        if makemon(level, race, pos, ctx, flags, rng).is_none() {
            break;
        }
    }
}

fn m_initthrow(mon: &mut Monster, kind: usize, n: u32, rng: &mut GameRng) {
    mon.inventory.push(Object::new(kind, rng.rn1(n, 3)));
}

/// Starting weapons by monster class (m_initweap)
fn m_initweap(mon: &mut Monster, rng: &mut GameRng) {
    let data = mon.data();
    match data.symbol {
        'k' => {
            if rng.one_in(4) {
                m_initthrow(mon, kinds::DART, 12, rng);
            }
        }
        'o' => {
            if data.name == "orc shaman" {
                return;
            }
            match rng.rn2(4) {
                0 => mon.inventory.push(Object::new(kinds::MACE, 1)),
                1 => mon.inventory.push(Object::new(kinds::DAGGER, 1)),
                2 => mon.inventory.push(Object::new(kinds::SHORT_SWORD, 1)),
                _ => {
                    mon.inventory.push(Object::new(kinds::BOW, 1));
                    m_initthrow(mon, kinds::ARROW, 12, rng);
                }
            }
        }
        'h' if data.name == "dwarf" => {
            if rng.rn2(7) != 0 {
                mon.inventory.push(Object::new(kinds::AXE, 1));
            }
        }
        '@' if data.name == "Woodland-elf" => {
            if rng.one_in(2) {
                mon.inventory.push(Object::new(kinds::BOW, 1));
                m_initthrow(mon, kinds::ARROW, 12, rng);
            } else {
                mon.inventory.push(Object::new(kinds::LONG_SWORD, 1));
            }
        }
        '@' if data.name == "soldier" => {
            let kind = if rng.one_in(2) {
                kinds::SPEAR
            } else {
                kinds::SHORT_SWORD
            };
            mon.inventory.push(Object::new(kind, 1));
            if rng.one_in(3) {
                mon.inventory.push(Object::new(kinds::DAGGER, 1));
            }
        }
        '@' => mon.inventory.push(Object::new(kinds::MACE, 1)),
        'A' => mon.inventory.push(Object::new(kinds::LONG_SWORD, 1)),
        _ => match rng.rnd(12) {
            1 => m_initthrow(mon, kinds::DART, 12, rng),
            2 => mon.inventory.push(Object::new(kinds::SPEAR, 1)),
            3 | 4 => mon.inventory.push(Object::new(kinds::DAGGER, 1)),
            5 => mon.inventory.push(Object::new(kinds::SHORT_SWORD, 1)),
            6 => mon.inventory.push(Object::new(kinds::MACE, 1)),
            _ => {}
        },
    }
    mon.wield_best();
}

/// Pick a race suited to the depth and the player's level (rndmonst)
pub fn rndmonst(depth: i32, player_level: u8, rng: &mut GameRng) -> Option<usize> {
    let min_diff = depth / 6;
    let max_diff = ((depth + player_level as i32) / 2).max(1);
    let candidates: Vec<usize> = (0..MONSTERS.len())
        .filter(|&i| {
            let m = &MONSTERS[i];
            !m.gen_flags.contains(super::GenFlags::NOGEN)
                && m.frequency > 0
                && (m.difficulty as i32) >= min_diff
                && (m.difficulty as i32) <= max_diff
        })
        .collect();
    let total: u32 = candidates.iter().map(|&i| MONSTERS[i].frequency as u32).sum();
    if total == 0 {
        return None;
    }
    let mut roll = rng.rn2(total);
    for i in candidates {
        let freq = MONSTERS[i].frequency as u32;
        if roll < freq {
            return Some(i);
        }
        roll -= freq;
    }
    None
}

/// Put the starting pet next to the player
pub fn make_pet(state: &mut GameState) -> Option<MonsterId> {
    let name = match state.player.role {
        Role::Wizard => "kitten",
        Role::Samurai | Role::Barbarian => "little dog",
        _ if state.rng.one_in(2) => "kitten",
        _ => "little dog",
    };
    let race = race_by_name(name)?;
    let ctx = SpawnContext::from_player(&state.player);
    let pos = state
        .current_level
        .enexto(state.player.pos, Some(state.player.pos), &mut state.rng)?;
    let id = makemon(
        &mut state.current_level,
        race,
        pos,
        &ctx,
        MakeMonFlags::PEACEFUL | MakeMonFlags::NO_MINVENT,
        &mut state.rng,
    )?;
    if let Some(pet) = state.current_level.monster_mut(id) {
        pet.state.tame = true;
        pet.tameness = 10;
    }
    Some(id)
}

/// Periodic random spawn, out of the player's sight when possible
pub fn spawn_random_monster(state: &mut GameState) -> Option<MonsterId> {
    let level = &state.current_level;
    if level.monsters.len() >= state.options.max_monsters {
        return None;
    }
    let player_pos = state.player.pos;
    let mut pos = None;
    for _ in 0..50 {
        let Some(p) = level.random_walkable(&mut state.rng) else {
            break;
        };
        if level.is_free(p, Some(player_pos))
            && p.distmin(player_pos) > 1
            && !level.has_line_of_sight(player_pos, p)
        {
            pos = Some(p);
            break;
        }
    }
    let pos = match pos {
        Some(p) => p,
        None => level.random_walkable(&mut state.rng)?,
    };
    let race = rndmonst(level.depth, state.player.exp_level, &mut state.rng)?;
    let ctx = SpawnContext::from_player(&state.player);
    makemon(
        &mut state.current_level,
        race,
        pos,
        &ctx,
        MakeMonFlags::GROUP,
        &mut state.rng,
    )
}
