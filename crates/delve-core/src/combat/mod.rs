//! Combat
//!
//! Attack descriptions plus the resolvers for monster-vs-player (mhitu),
//! monster-vs-monster (mhitm), player-vs-monster (uhitm) and everything
//! that flies (mthrowu).

mod attack_type;
mod damage_type;
mod mhitm;
mod mhitu;
mod mthrowu;
mod uhitm;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::GameState;
use crate::consts::NATTK;
use crate::dungeon::Position;
use crate::monster::{Monster, MonsterId};
use crate::object::Object;

pub use attack_type::AttackType;
pub use damage_type::DamageType;
pub use mhitm::{MonsterFightResult, mattackm, monster_killed_by_monster};
pub use mhitu::{MonsterAttackResult, expel_player, hit_message, mattacku, miss_message};
pub use mthrowu::{
    Projectile, Ray, RayHit, ThrowSource, breamu, buzz, lined_up, m_throw, select_missile,
    spitmu, thrwmu,
};
pub use uhitm::{PlayerAttackResult, attack_monster, experience_for, player_kills_monster};

/// A single attack of a monster race
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Attack {
    pub attack_type: AttackType,
    pub damage_type: DamageType,
    pub dice_num: u8,
    pub dice_sides: u8,
}

impl Attack {
    pub const NONE: Attack = Attack {
        attack_type: AttackType::None,
        damage_type: DamageType::Physical,
        dice_num: 0,
        dice_sides: 0,
    };

    pub const fn new(
        attack_type: AttackType,
        damage_type: DamageType,
        dice_num: u8,
        dice_sides: u8,
    ) -> Self {
        Self {
            attack_type,
            damage_type,
            dice_num,
            dice_sides,
        }
    }

    pub const fn is_active(&self) -> bool {
        !matches!(self.attack_type, AttackType::None)
    }
}

/// Attack slots of a race
pub type AttackSet = [Attack; NATTK];

/// Build an attack set from up to NATTK attacks
pub const fn attacks(list: &[Attack]) -> AttackSet {
    let mut set = [Attack::NONE; NATTK];
    let mut i = 0;
    while i < list.len() && i < NATTK {
        set[i] = list[i];
        i += 1;
    }
    set
}

/// "a jackal", "an imp"
pub fn an(name: &str) -> String {
    match name.chars().next().map(|c| c.to_ascii_lowercase()) {
        Some('a' | 'e' | 'i' | 'o' | 'u') => format!("an {}", name),
        _ => format!("a {}", name),
    }
}

/// Whether the player can see what happens on a cell
pub(crate) fn player_sees(state: &GameState, pos: Position) -> bool {
    !state.player.is_blind()
        && !state.player.is_engulfed()
        && (pos == state.player.pos || state.current_level.has_line_of_sight(state.player.pos, pos))
}

/// Roll `n` dice of `sides`; zero dice or zero sides roll nothing
pub(crate) fn roll(state: &mut GameState, n: u32, sides: u32) -> i32 {
    if n == 0 || sides == 0 {
        0
    } else {
        state.rng.dice(n, sides) as i32
    }
}

/// Remove a dead monster (mondead): drop its inventory and gold, release
/// the player from it, and set off a death explosion.
pub fn mondead(state: &mut GameState, id: MonsterId) -> Option<Monster> {
    let mut mon = state.current_level.remove_monster(id)?;
    let pos = mon.pos;
    debug!(%id, name = %mon.name, %pos, "monster died");

    if state.player.swallowed_by == Some(id) {
        state.player.swallowed_by = None;
        state.message(format!("You get expelled from {}!", mon.the_name()));
    }
    if state.player.stuck_to == Some(id) {
        state.player.stuck_to = None;
    }

    if state.current_level.is_valid_pos(pos) {
        for obj in mon.inventory.drain(..) {
            state.current_level.add_object(obj, pos);
        }
        if mon.gold > 0 {
            state.current_level.add_object(Object::gold(mon.gold), pos);
            mon.gold = 0;
        }
    } else {
        warn!(%id, %pos, "dead monster was off the map; dropping nothing");
    }

    if let Some(boom) = mon.data().attack_of(AttackType::Boom) {
        explode_on_death(state, &mon, boom);
    }
    Some(mon)
}

/// A gas spore going off: everything adjacent takes the blast
fn explode_on_death(state: &mut GameState, mon: &Monster, attack: Attack) {
    let center = mon.pos;
    if player_sees(state, center) {
        state.message(format!("{} explodes!", mon.cap_name()));
    } else {
        state.message("You hear a blast.");
    }

    let victims: Vec<MonsterId> = center
        .neighbours()
        .filter_map(|p| state.current_level.monster_id_at(p))
        .collect();
    for victim in victims {
        let dmg = roll(state, attack.dice_num as u32, attack.dice_sides as u32);
        let Some(target) = state.current_level.monster_mut(victim) else {
            continue;
        };
        if target.take_damage(dmg) {
            let name = target.the_name();
            if player_sees(state, center) {
                state.message(format!("{} is caught in the explosion and dies!", capitalize(&name)));
            }
            mondead(state, victim);
        }
    }

    if state.player.pos.distmin(center) <= 1 {
        let dmg = roll(state, attack.dice_num as u32, attack.dice_sides as u32);
        state.message("You are caught in the blast!");
        if state.player.take_damage(dmg) {
            state.die(format!("killed by {}'s explosion", an(&mon.name)));
        }
    }
}

/// Upper-case the first letter of a message fragment
pub(crate) fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_articles() {
        assert_eq!(an("jackal"), "a jackal");
        assert_eq!(an("imp"), "an imp");
        assert_eq!(an("Uruk-hai"), "an Uruk-hai");
        assert_eq!(capitalize("the newt"), "The newt");
    }

    #[test]
    fn test_attack_set_padding() {
        let set = attacks(&[Attack::new(AttackType::Bite, DamageType::Physical, 1, 4)]);
        assert!(set[0].is_active());
        assert!(set[1..].iter().all(|a| !a.is_active()));
    }
}
