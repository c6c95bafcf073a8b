//! Monster turn logic (dochug)

use strum::Display;
use tracing::{debug, trace};

use super::{MonsterId, PerMonst, buzzmu, castmu, dog_move, m_move};
use crate::GameState;
use crate::combat::{AttackType, breamu, mattacku, player_sees, spitmu, thrwmu};
use crate::consts::BOLT_LIM;
use crate::player::Property;

/// What a monster did with its move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum MonsterAction {
    Nothing,
    Moved,
    Attacked,
    Cast,
    Ranged,
    Died,
    Fled,
    Waited,
}

/// Run one move for a monster that has the energy for it
pub fn dochug(state: &mut GameState, id: MonsterId) -> MonsterAction {
    let Some(mon) = state.current_level.monster_mut(id) else {
        return MonsterAction::Nothing;
    };

    if mon.state.trapped {
        mon.trap_timeout = mon.trap_timeout.saturating_sub(1);
        if mon.trap_timeout == 0 {
            mon.state.trapped = false;
            trace!(%id, "monster escaped its trap");
        }
    }
    let held = mon.state.trapped;

    if mon.state.sleeping && !disturb(state, id) {
        return MonsterAction::Waited;
    }
    if state
        .current_level
        .monster(id)
        .is_none_or(|m| m.state.frozen)
    {
        return MonsterAction::Nothing;
    }

    set_apparxy(state, id);
    update_courage(state, id);

    let Some(mon) = state.current_level.monster(id) else {
        return MonsterAction::Nothing;
    };
    if mon.state.tame {
        return dog_move(state, id);
    }
    if mon.state.peaceful {
        let here = mon.pos;
        if held || !m_move(state, id, here, 0) {
            return MonsterAction::Waited;
        }
        return MonsterAction::Moved;
    }
    hostile_turn(state, id, held)
}

fn hostile_turn(state: &mut GameState, id: MonsterId, held: bool) -> MonsterAction {
    let Some(mon) = state.current_level.monster(id) else {
        return MonsterAction::Nothing;
    };
    let data: &'static PerMonst = mon.data();
    let engulfing = state.player.swallowed_by == Some(id);
    let goal = mon.believed_player;
    let nearby = engulfing || mon.pos.is_adjacent(goal);
    let fleeing = mon.state.fleeing;
    let scattered = mon.state.confused || mon.state.stunned;
    let ranged = data.has_ranged_attack();
    let mut action = MonsterAction::Waited;

    if !engulfing && (!nearby || fleeing || scattered) {
        if (!nearby || fleeing)
            && data.is_spellcaster()
            && let Some(attack) = data.attack_of(AttackType::Magic)
            && state.rng.one_in(3)
            && castmu(state, id, &attack, false, false).succeeded()
        {
            action = MonsterAction::Cast;
        }
        if state.is_over() {
            return action;
        }

        let moved = if held {
            false
        } else if state.player.stuck_to == Some(id) && !fleeing {
            false
        } else {
            if state.player.stuck_to == Some(id) {
                state.player.stuck_to = None;
                state.message("You get released!");
            }
            let appr = if fleeing {
                -1
            } else if wont_approach(state, id) {
                0
            } else {
                1
            };
            m_move(state, id, goal, appr)
        };

        let Some(mon) = state.current_level.monster(id) else {
            return MonsterAction::Died;
        };
        if moved {
            let done = if fleeing { MonsterAction::Fled } else { MonsterAction::Moved };
            // stepping on a trap can put it to sleep
            if mon.is_helpless() || nearby || !ranged {
                return done;
            }
            action = done;
        }
    }

    let Some(mon) = state.current_level.monster(id) else {
        return MonsterAction::Died;
    };
    let (pos, goal) = (mon.pos, mon.believed_player);
    if !engulfing && pos.distance_sq(goal) > BOLT_LIM * BOLT_LIM {
        return action;
    }
    if engulfing || pos.is_adjacent(goal) {
        if engulfing || goal == state.player.pos {
            let result = mattacku(state, id);
            if result.monster_died {
                return MonsterAction::Died;
            }
        } else {
            wild_miss(state, id);
        }
        return MonsterAction::Attacked;
    }
    if fire_ranged(state, id, data) {
        if state.current_level.monster(id).is_none() {
            return MonsterAction::Died;
        }
        return MonsterAction::Ranged;
    }
    action
}

/// A blinded monster, or one that cannot make out an invisible player,
/// usually wanders instead of closing in
fn wont_approach(state: &mut GameState, id: MonsterId) -> bool {
    let Some(mon) = state.current_level.monster(id) else {
        return true;
    };
    if mon.state.blinded {
        return true;
    }
    state.player.has(Property::Invisible)
        && !mon.data().sees_invisible()
        && state.rng.rn2(11) != 0
}

/// Every ranged attack the race has, in order, while the shooter lives
fn fire_ranged(state: &mut GameState, id: MonsterId, data: &'static PerMonst) -> bool {
    let mut fired = false;
    for attack in data.attacks.iter().filter(|a| a.is_active()) {
        if state.is_over() || state.current_level.monster(id).is_none() {
            break;
        }
        fired |= match attack.attack_type {
            AttackType::Weapon => thrwmu(state, id),
            AttackType::Breath => breamu(state, id, *attack),
            AttackType::Spit => spitmu(state, id, *attack),
            AttackType::Magic => buzzmu(state, id, attack),
            _ => false,
        };
    }
    fired
}

/// Melee aimed at where the monster wrongly thinks the player is
fn wild_miss(state: &mut GameState, id: MonsterId) {
    let Some(mon) = state.current_level.monster(id) else {
        return;
    };
    if mon.state.invisible || !player_sees(state, mon.pos) {
        return;
    }
    let name = mon.cap_name();
    let msg = match state.rng.rn2(3) {
        0 => format!("{} swings wildly and misses!", name),
        1 => format!("{} attacks a spot beside you.", name),
        _ => format!("{} strikes at thin air!", name),
    };
    state.message(msg);
}

/// Possibly wake a sleeping monster (disturb). Returns whether it woke.
pub fn disturb(state: &mut GameState, id: MonsterId) -> bool {
    let Some(mon) = state.current_level.monster(id) else {
        return false;
    };
    let player = &state.player;
    let close = mon.pos.distance_sq(player.pos) < 100;
    let visible = state.current_level.has_line_of_sight(mon.pos, player.pos)
        && (!player.has(Property::Invisible) || mon.data().sees_invisible());
    let wakes = player.has(Property::Aggravate)
        || (close
            && visible
            && (state.rng.one_in(3) || (!player.has(Property::Stealth) && state.rng.one_in(50))));
    if !wakes {
        return false;
    }
    if let Some(mon) = state.current_level.monster_mut(id) {
        mon.state.sleeping = false;
        debug!(%id, name = %mon.name, "monster woke up");
    }
    true
}

/// Update where the monster believes the player stands (set_apparxy)
pub fn set_apparxy(state: &mut GameState, id: MonsterId) {
    let Some(mon) = state.current_level.monster(id) else {
        return;
    };
    let level = &state.current_level;
    let target = state.player.pos;
    let unseen = mon.state.blinded
        || (state.player.has(Property::Invisible) && !mon.data().sees_invisible());
    let exact = state.player.swallowed_by == Some(id) || !unseen || state.rng.one_in(3);

    let believed = if exact {
        target
    } else {
        let disp: i8 = if mon.state.confused { 2 } else { 1 };
        let span = 2 * disp as u32 + 1;
        let mut guess = target;
        for _ in 0..200 {
            let pos = target.offset(
                state.rng.rn2(span) as i8 - disp,
                state.rng.rn2(span) as i8 - disp,
            );
            if !level.is_valid_pos(pos)
                || (disp != 2 && pos == mon.pos)
                || (pos != target && !level.is_walkable(pos))
            {
                continue;
            }
            guess = pos;
            break;
        }
        guess
    };

    if let Some(mon) = state.current_level.monster_mut(id) {
        mon.believed_player = believed;
    }
}

/// Start fleeing when badly hurt; regain courage at full health
fn update_courage(state: &mut GameState, id: MonsterId) {
    let Some(mon) = state.current_level.monster_mut(id) else {
        return;
    };
    if mon.state.fleeing {
        if mon.flee_timeout == 0 && mon.hp >= mon.hp_max && state.rng.one_in(40) {
            mon.state.fleeing = false;
            trace!(%id, "monster regained courage");
        }
    } else if mon.hp < mon.hp_max / 3 && state.rng.one_in(3) {
        let timeout = state.rng.rnd(10) as u16;
        mon.monflee(timeout, true);
        debug!(%id, timeout, "monster flees");
    }
}
