//! Trap mechanics (trap.c)

use tracing::{debug, info};

use crate::GameState;
use crate::combat::{DamageType, mondead, player_sees};
use crate::dungeon::{Position, TrapType};
use crate::monster::{MonsterId, rloc};
use crate::object::{Object, kinds};
use crate::player::{Attribute, Property};

/// Spring the trap under the player
pub fn dotrap(state: &mut GameState, pos: Position) {
    let Some(trap) = state.current_level.trap_at_mut(pos) else {
        return;
    };
    trap.seen = true;
    let kind = trap.kind;
    info!(trap = %kind, %pos, "player triggered trap");

    match kind {
        TrapType::ArrowTrap => {
            state.message("An arrow shoots out at you!");
            if state.player.armor_class as i32 + 8 <= state.rng.rnd(20) as i32 {
                state.message("You are almost hit by an arrow.");
                state.current_level.add_object(Object::new(kinds::ARROW, 1), pos);
            } else {
                let dmg = state.rng.dice(1, 6) as i32;
                hurt(state, dmg, "killed by an arrow");
            }
        }
        TrapType::DartTrap => {
            state.message("A little dart shoots out at you!");
            if state.player.armor_class as i32 + 8 <= state.rng.rnd(20) as i32 {
                state.message("You are almost hit by a little dart.");
                state.current_level.add_object(Object::new(kinds::DART, 1), pos);
                return;
            }
            let mut dmg = state.rng.dice(1, 3) as i32;
            if state.rng.one_in(6) {
                dmg += poisoned(state, "dart");
            }
            hurt(state, dmg, "killed by a little dart");
        }
        TrapType::BearTrap => {
            state.message("A bear trap closes on your foot!");
            state.player.utrap = state.rng.rn1(4, 4);
            let dmg = state.rng.dice(2, 4) as i32;
            hurt(state, dmg, "killed by a bear trap");
        }
        TrapType::SleepingGas => {
            if state.player.has(Property::SleepRes) {
                state.message("You are enveloped in a cloud of gas!");
            } else {
                state.message("A cloud of gas puts you to sleep!");
                let turns = state.rng.rnd(25);
                state.player.make_helpless(Property::Asleep, turns);
            }
        }
        TrapType::Pit => {
            state.message("You fall into a pit!");
            state.player.utrap = state.rng.rn1(6, 2);
            let dmg = state.rng.dice(1, 6) as i32;
            hurt(state, dmg, "fell into a pit");
        }
        TrapType::Teleport => {
            state.message("You feel a wrenching sensation.");
            tele(state);
        }
        TrapType::FireTrap => {
            state.message("A tower of flame erupts from the floor!");
            if state.player.has(Property::FireRes) {
                state.message("But it doesn't feel hot!");
            } else {
                let dmg = state.rng.dice(2, 4) as i32;
                hurt(state, dmg, "burned by a tower of flame");
            }
        }
    }
}

fn hurt(state: &mut GameState, dmg: i32, killer: &str) {
    if state.player.take_damage(dmg) {
        state.die(killer);
    }
}

/// Poison from a trap: usually extra damage, sometimes lost strength.
/// Returns the extra damage.
fn poisoned(state: &mut GameState, what: &str) -> i32 {
    state.message(format!("The {} was poisoned!", what));
    if state.player.has(Property::PoisonRes) {
        state.message("The poison doesn't seem to affect you.");
        return 0;
    }
    if state.rng.one_in(2) {
        if state.adjust_attribute(Attribute::Strength, -1) {
            state.message("You feel weaker!");
        }
        0
    } else {
        state.rng.rnd(6) as i32
    }
}

/// Teleport the player to a random free cell on the floor
pub fn tele(state: &mut GameState) {
    if state.player.is_engulfed() {
        debug!("teleport suppressed while engulfed");
        return;
    }
    let here = state.player.pos;
    for _ in 0..100 {
        let Some(pos) = state.current_level.random_walkable(&mut state.rng) else {
            break;
        };
        if pos == here || !state.current_level.is_free(pos, None) {
            continue;
        }
        state.player.pos = pos;
        state.player.stuck_to = None;
        state.player.utrap = 0;
        debug!(from = %here, to = %pos, "player teleported");
        return;
    }
}

/// Spring the trap under a monster (mintrap). Returns true when a trap
/// went off.
pub fn mintrap(state: &mut GameState, id: MonsterId) -> bool {
    let Some(mon) = state.current_level.monster(id) else {
        return false;
    };
    let pos = mon.pos;
    let Some(kind) = state.current_level.trap_at(pos).map(|t| t.kind) else {
        return false;
    };
    let data = mon.data();
    if data.can_fly() && kind.is_ground_trap() {
        return false;
    }
    let name = mon.cap_name();
    if let Some(mon) = state.current_level.monster_mut(id) {
        mon.learn_trap(kind);
    }
    let seen = player_sees(state, pos);
    if seen && let Some(trap) = state.current_level.trap_at_mut(pos) {
        trap.seen = true;
    }
    debug!(%id, trap = %kind, "monster triggered trap");

    let mut dmg = 0;
    let mut msg = None;
    match kind {
        TrapType::ArrowTrap => {
            dmg = state.rng.dice(1, 6) as i32;
            msg = Some(format!("{} is hit by an arrow!", name));
        }
        TrapType::DartTrap => {
            dmg = state.rng.dice(1, 3) as i32;
            if state.rng.one_in(6) && !data.resists(DamageType::DrainStrength) {
                dmg += state.rng.rnd(6) as i32;
            }
            msg = Some(format!("{} is hit by a little dart!", name));
        }
        TrapType::BearTrap => {
            let timeout = state.rng.rn1(4, 4) as u16;
            if !data.is_amorphous()
                && let Some(mon) = state.current_level.monster_mut(id)
            {
                mon.state.trapped = true;
                mon.trap_timeout = timeout;
                dmg = state.rng.dice(2, 4) as i32;
                msg = Some(format!("{} is caught in a bear trap!", name));
            }
        }
        TrapType::SleepingGas => {
            if !data.resists(DamageType::Sleep) {
                let turns = state.rng.rnd(25) as u16;
                if let Some(mon) = state.current_level.monster_mut(id) {
                    mon.set_frozen(turns);
                }
                msg = Some(format!("{} suddenly falls asleep!", name));
            }
        }
        TrapType::Pit => {
            let timeout = state.rng.rn1(6, 2) as u16;
            if let Some(mon) = state.current_level.monster_mut(id) {
                mon.state.trapped = true;
                mon.trap_timeout = timeout;
            }
            dmg = state.rng.dice(1, 6) as i32;
            msg = Some(format!("{} falls into a pit!", name));
        }
        TrapType::Teleport => {
            if rloc(state, id) {
                msg = Some(format!("{} suddenly disappears!", name));
            }
        }
        TrapType::FireTrap => {
            if data.resists(DamageType::Fire) {
                msg = Some(String::from("A tower of flame erupts from the floor!"));
            } else {
                dmg = state.rng.dice(2, 4) as i32;
                msg = Some(format!("{} is engulfed in a tower of flame!", name));
            }
        }
    }
    if seen && let Some(msg) = msg {
        state.message(msg);
    }

    let died = state
        .current_level
        .monster_mut(id)
        .is_some_and(|m| m.take_damage(dmg) && dmg > 0);
    if died {
        mondead(state, id);
        if seen {
            state.message(format!("{} is killed!", name));
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GameRng;
    use crate::dungeon::{Cell, Level};
    use crate::monster::{Monster, race_by_name};
    use crate::world::GameOptions;

    fn arena() -> GameState {
        let options = GameOptions {
            pet: false,
            ..Default::default()
        };
        let mut state = GameState::new(GameRng::new(55), options).unwrap();
        let mut level = Level::new(1);
        for x in 1..20 {
            for y in 1..10 {
                level.cells[x][y] = Cell::floor();
            }
        }
        state.current_level = level;
        state.player.pos = Position::new(5, 5);
        state.player.hp = 200;
        state.player.hp_max = 200;
        state
    }

    fn spawn(state: &mut GameState, name: &str, pos: Position, hp: i32) -> MonsterId {
        let mut mon = Monster::new(MonsterId::NONE, race_by_name(name).unwrap(), pos);
        mon.hp = hp;
        mon.hp_max = hp;
        state.current_level.add_monster(mon)
    }

    #[test]
    fn test_bear_trap_holds_player() {
        let mut state = arena();
        let pos = state.player.pos;
        state.current_level.add_trap(pos, TrapType::BearTrap);
        dotrap(&mut state, pos);
        assert!((4..=7).contains(&state.player.utrap));
        assert!(state.player.hp < 200);
        assert!(state.current_level.trap_at(pos).unwrap().seen);
    }

    #[test]
    fn test_pit_holds_and_hurts() {
        let mut state = arena();
        let pos = state.player.pos;
        state.current_level.add_trap(pos, TrapType::Pit);
        dotrap(&mut state, pos);
        assert!((2..=7).contains(&state.player.utrap));
        assert!(state.player.hp < 200);
    }

    #[test]
    fn test_sleeping_gas_respects_resistance() {
        let mut state = arena();
        let pos = state.player.pos;
        state.current_level.add_trap(pos, TrapType::SleepingGas);
        dotrap(&mut state, pos);
        assert!(state.player.is_helpless());

        let mut state = arena();
        state.player.properties.grant_intrinsic(Property::SleepRes);
        state.current_level.add_trap(pos, TrapType::SleepingGas);
        dotrap(&mut state, pos);
        assert!(!state.player.is_helpless());
    }

    #[test]
    fn test_fire_trap_can_kill() {
        let mut state = arena();
        state.player.hp = 1;
        let pos = state.player.pos;
        state.current_level.add_trap(pos, TrapType::FireTrap);
        dotrap(&mut state, pos);
        assert!(state.is_over());
        assert_eq!(state.killer.as_deref(), Some("burned by a tower of flame"));
    }

    #[test]
    fn test_teleport_trap_moves_player() {
        let mut state = arena();
        let pos = state.player.pos;
        state.current_level.add_trap(pos, TrapType::Teleport);
        dotrap(&mut state, pos);
        assert_ne!(state.player.pos, pos);
        assert!(state.current_level.is_walkable(state.player.pos));
    }

    #[test]
    fn test_monster_learns_and_is_held_by_pit() {
        let mut state = arena();
        let pos = Position::new(9, 5);
        state.current_level.add_trap(pos, TrapType::Pit);
        let id = spawn(&mut state, "jackal", pos, 100);
        assert!(mintrap(&mut state, id));
        let mon = state.current_level.monster(id).unwrap();
        assert!(mon.state.trapped);
        assert!(mon.trap_timeout >= 2);
        assert!(mon.knows_trap(TrapType::Pit));
    }

    #[test]
    fn test_flyer_skips_pit() {
        let mut state = arena();
        let pos = Position::new(9, 5);
        state.current_level.add_trap(pos, TrapType::Pit);
        let id = spawn(&mut state, "giant bat", pos, 10);
        assert!(!mintrap(&mut state, id));
        assert!(!state.current_level.monster(id).unwrap().state.trapped);
    }

    #[test]
    fn test_trap_kills_weak_monster() {
        let mut state = arena();
        let pos = Position::new(9, 5);
        state.current_level.add_trap(pos, TrapType::FireTrap);
        let id = spawn(&mut state, "newt", pos, 1);
        mintrap(&mut state, id);
        assert!(state.current_level.monster(id).is_none());
        assert!(
            state
                .current_level
                .check_invariants(state.player.pos, None)
                .is_empty()
        );
    }

    #[test]
    fn test_dart_poison_spares_resistant_monsters() {
        let dart_damage = |name: &str, seed: u64| {
            let mut state = arena();
            state.rng = GameRng::new(seed);
            let pos = Position::new(9, 5);
            state.current_level.add_trap(pos, TrapType::DartTrap);
            let id = spawn(&mut state, name, pos, 50);
            assert!(mintrap(&mut state, id));
            50 - state.current_level.monster(id).unwrap().hp
        };
        for seed in 0..100 {
            assert!(dart_damage("kobold", seed) <= 3);
        }
        assert!((0..100).any(|seed| dart_damage("jackal", seed) > 3));
    }
}
