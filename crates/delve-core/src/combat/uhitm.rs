//! Player attacks monster (uhitm)

use tracing::{debug, info};

use super::{AttackType, DamageType, capitalize, mondead, roll};
use crate::GameState;
use crate::monster::{MONSTERS, Monster, MonsterFlags, MonsterId};
use crate::player::{Encumbrance, Property, gain_experience};

/// Outcome of a single melee swing by the player
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerAttackResult {
    pub hit: bool,
    pub killed: bool,
    pub damage: i32,
}

/// Experience awarded for killing a monster (experience)
pub fn experience_for(mon: &Monster) -> u32 {
    let data = mon.data();
    let level = mon.level as i32;
    let mut tmp = 1 + level * level;

    if mon.ac < 3 {
        let ac = mon.ac as i32;
        tmp += (7 - ac) * if ac < 0 { 2 } else { 1 };
    }
    if data.speed >= 18 {
        tmp += 5;
    } else if data.speed > 12 {
        tmp += 3;
    }

    for attack in data.attacks.iter().filter(|a| a.is_active()) {
        tmp += match attack.attack_type {
            AttackType::Magic => 10,
            AttackType::Weapon => 5,
            at if at as u8 > AttackType::Butt as u8 => 3,
            _ => 0,
        };
        tmp += match attack.damage_type {
            DamageType::DrainLife => 50,
            DamageType::Physical => 0,
            dt if (dt as u8) < DamageType::Blind as u8 => 2 * level,
            _ => level,
        };
        if attack.dice_num as i32 * attack.dice_sides as i32 > 23 {
            tmp += level;
        }
    }
    if level > 8 {
        tmp += 50;
    }
    tmp.max(1) as u32
}

/// Swing at the monster `id` with whatever is wielded (hmon)
pub fn attack_monster(state: &mut GameState, id: MonsterId) -> PlayerAttackResult {
    let mut result = PlayerAttackResult::default();
    let Some(mon) = state.current_level.monster_mut(id) else {
        return result;
    };

    if mon.state.peaceful {
        mon.state.peaceful = false;
        let msg = format!("You anger {}.", mon.the_name());
        state.message(msg);
    } else if mon.state.tame {
        mon.tameness = mon.tameness.saturating_sub(1);
        if mon.tameness == 0 {
            mon.state.tame = false;
            let msg = format!("{} turns on you!", mon.cap_name());
            state.message(msg);
        }
    }
    let Some(mon) = state.current_level.monster_mut(id) else {
        return result;
    };
    let helpless = mon.is_helpless();
    let race = mon.race;
    mon.state.sleeping = false;
    let mon_ac = mon.ac as i32;
    let mon_name = mon.the_name();

    let weapon = state
        .inventory
        .iter()
        .find(|o| o.is_wielded())
        .map(|w| (w.data().damage as u32, w.data().hit_bonus as i32, w.enchantment as i32));

    let player = &state.player;
    let mut tmp = 1
        + player.luck as i32
        + player.hit_bonus as i32
        + mon_ac
        + player.exp_level as i32;
    if helpless {
        tmp += 2;
    }
    if let Some((_, bonus, ench)) = weapon {
        tmp += bonus + ench;
    }
    match player.encumbrance {
        Encumbrance::Unencumbered => {}
        enc => tmp -= (enc as i32 * 2) - 1,
    }
    if player.utrap > 0 {
        tmp -= 3;
    }

    if tmp <= state.rng.rnd(20) as i32 {
        state.message(format!("You miss {}.", mon_name));
        passive(state, id, race, false, false);
        return result;
    }

    let base = match weapon {
        Some((sides, _, ench)) => state.rng.rnd(sides.max(1)) as i32 + ench,
        None => state.rng.rnd(2) as i32,
    };
    let dmg = (base + state.player.damage_bonus as i32).max(1);
    result.hit = true;
    result.damage = dmg;
    debug!(%id, dmg, "player hits");

    let died = state
        .current_level
        .monster_mut(id)
        .is_some_and(|m| m.take_damage(dmg));
    if died {
        result.killed = true;
        player_kills_monster(state, id);
        // passive responses still apply from a corpse
        passive(state, id, race, true, true);
    } else {
        state.message(format!("You hit {}.", mon_name));
        if let Some(mon) = state.current_level.monster_mut(id)
            && !mon.state.fleeing
            && mon.hp < mon.hp_max / 4
            && state.rng.one_in(3)
        {
            mon.monflee(state.rng.rnd(10) as u16, true);
        }
        passive(state, id, race, true, false);
    }
    result
}

/// Remove a monster the player killed and award experience (xkilled)
pub fn player_kills_monster(state: &mut GameState, id: MonsterId) {
    let Some(mon) = state.current_level.monster(id) else {
        return;
    };
    let verb = if mon.data().is_undead() || mon.data().has_flag(MonsterFlags::MINDLESS) {
        "destroy"
    } else {
        "kill"
    };
    let name = mon.the_name();
    let exp = experience_for(mon);

    mondead(state, id);
    state.message(format!("You {} {}!", verb, name));
    state.player.kills += 1;
    info!(victim = %name, exp, "player killed monster");

    for msg in gain_experience(&mut state.player, exp, &mut state.rng) {
        state.message(msg);
    }
}

/// The target's passive defence against the player (passive)
fn passive(state: &mut GameState, id: MonsterId, race: usize, hit: bool, dead: bool) {
    let data = &MONSTERS[race];
    let Some(passive) = data.passive() else {
        return;
    };
    let cancelled = state
        .current_level
        .monster(id)
        .is_some_and(|m| m.state.cancelled);
    let dice = if passive.dice_num == 0 {
        data.level as u32 / 2 + 1
    } else {
        passive.dice_num as u32
    };
    let mut dmg = roll(state, dice, passive.dice_sides as u32);

    match passive.damage_type {
        DamageType::Acid => {
            if !hit || !state.rng.one_in(2) {
                return;
            }
            if state.player.has(Property::AcidRes) {
                state.message("You are splashed by acid, but it doesn't hurt.");
                dmg = 0;
            } else {
                state.message(format!("You are splashed by the {}'s acid!", data.name));
            }
        }
        DamageType::Paralyze => {
            if dead || cancelled || !hit || state.rng.one_in(3) {
                return;
            }
            if state.player.is_blind() {
                return;
            }
            if state.player.has(Property::Reflection) {
                state.message("Its gaze is reflected away.");
                return;
            }
            let turns = roll(state, data.level as u32 + 1, 70).min(127) as u32;
            if state.player.make_helpless(Property::Paralyzed, turns) {
                state.message(format!("You are frozen by the {}'s gaze!", data.name));
            } else {
                state.message("You momentarily stiffen.");
            }
            return;
        }
        DamageType::Cold | DamageType::Fire => {
            if dead || cancelled || state.rng.one_in(3) {
                return;
            }
            let (res, hot) = if passive.damage_type == DamageType::Fire {
                (Property::FireRes, true)
            } else {
                (Property::ColdRes, false)
            };
            if state.player.has(res) {
                state.message(if hot {
                    "You feel mildly warm."
                } else {
                    "You feel a mild chill."
                });
                return;
            }
            state.message(if hot {
                "You are suddenly very hot!"
            } else {
                "You are suddenly very cold!"
            });
        }
        _ => return,
    }

    if dmg > 0 && state.player.take_damage(dmg) {
        state.die(format!("killed by {}", super::an(data.name)));
        state.message(format!("{} was fatal.", capitalize(data.name)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GameRng;
    use crate::dungeon::{Cell, Level, Position};
    use crate::monster::race_by_name;
    use crate::world::GameOptions;

    fn arena() -> GameState {
        let options = GameOptions {
            pet: false,
            ..Default::default()
        };
        let mut state = GameState::new(GameRng::new(5), options).unwrap();
        let mut level = Level::new(1);
        for x in 1..20 {
            for y in 1..10 {
                level.cells[x][y] = Cell::floor();
            }
        }
        state.current_level = level;
        state.player.pos = Position::new(5, 5);
        state
    }

    fn spawn(state: &mut GameState, name: &str, hp: i32) -> MonsterId {
        let mut mon = Monster::new(MonsterId::NONE, race_by_name(name).unwrap(), Position::new(6, 5));
        mon.hp = hp;
        mon.hp_max = hp;
        state.current_level.add_monster(mon)
    }

    #[test]
    fn test_experience_grows_with_level() {
        let newt = Monster::new(MonsterId(1), race_by_name("newt").unwrap(), Position::new(1, 1));
        let troll = Monster::new(MonsterId(2), race_by_name("troll").unwrap(), Position::new(1, 1));
        assert!(experience_for(&newt) >= 1);
        assert!(experience_for(&troll) > experience_for(&newt));
    }

    #[test]
    fn test_kill_awards_experience() {
        let mut state = arena();
        let id = spawn(&mut state, "newt", 1);
        let mut result = PlayerAttackResult::default();
        for _ in 0..50 {
            result = attack_monster(&mut state, id);
            if result.killed {
                break;
            }
        }
        assert!(result.killed);
        assert!(state.current_level.monster(id).is_none());
        assert_eq!(state.player.kills, 1);
        assert!(state.player.exp > 0);
    }

    #[test]
    fn test_attacking_peaceful_angers_it() {
        let mut state = arena();
        let id = spawn(&mut state, "gnome", 500);
        state.current_level.monster_mut(id).unwrap().state.peaceful = true;
        attack_monster(&mut state, id);
        assert!(!state.current_level.monster(id).unwrap().state.peaceful);
    }

    #[test]
    fn test_floating_eye_can_paralyze() {
        let mut state = arena();
        state.player.hp = 1000;
        let id = spawn(&mut state, "floating eye", 10_000);
        for _ in 0..100 {
            attack_monster(&mut state, id);
            if state.player.is_helpless() {
                break;
            }
        }
        assert!(state.player.is_helpless());
    }

    #[test]
    fn test_free_action_blocks_eye() {
        let mut state = arena();
        state.player.properties.grant_intrinsic(Property::FreeAction);
        let id = spawn(&mut state, "floating eye", 10_000);
        for _ in 0..100 {
            attack_monster(&mut state, id);
        }
        assert!(!state.player.is_helpless());
    }
}
