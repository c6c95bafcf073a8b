//! Monster movement (monmove, mfndpos)

use tracing::{debug, trace};

use super::{Monster, MonsterFlags, MonsterId};
use crate::GameState;
use crate::action::mintrap;
use crate::combat::player_sees;
use crate::dungeon::{DIRS8, DoorState, Level, Position};
use crate::object::ObjectClass;

const DIRS4: [(i8, i8); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

/// Whether a monster could stand on `pos` as far as terrain goes
fn terrain_allows(level: &Level, mon: &Monster, pos: Position) -> bool {
    let cell = level.cell(pos);
    let data = mon.data();
    if cell.typ.is_liquid() {
        return data.can_fly() || data.can_swim();
    }
    if !cell.typ.is_passable() {
        return false;
    }
    if cell.is_door_closed() {
        // amorphous races flow under; others with hands may open it
        return data.is_amorphous() || (data.has_hands() && !cell.is_door_locked());
    }
    true
}

/// Cells a monster may step to this turn (mfndpos). Cells holding a trap
/// the monster knows about are offered only when nothing else is.
pub fn mfndpos(level: &Level, mon: &Monster, player_pos: Position) -> Vec<Position> {
    let dirs: &[(i8, i8)] = if mon.data().nodiag() { &DIRS4 } else { &DIRS8 };
    let here = level.cell(mon.pos);
    let mut safe = Vec::new();
    let mut trapped = Vec::new();

    for &(dx, dy) in dirs {
        let pos = mon.pos.offset(dx, dy);
        if !level.is_valid_pos(pos) || pos == player_pos {
            continue;
        }
        if level.monster_id_at(pos).is_some() {
            continue;
        }
        if !terrain_allows(level, mon, pos) {
            continue;
        }
        let diagonal = dx != 0 && dy != 0;
        if diagonal && (here.blocks_diagonal() || level.cell(pos).blocks_diagonal()) {
            continue;
        }
        match level.trap_at(pos) {
            Some(trap) if mon.knows_trap(trap.kind) => trapped.push(pos),
            _ => safe.push(pos),
        }
    }
    if safe.is_empty() { trapped } else { safe }
}

/// Move one step: toward `goal` when `appr` is 1, away when -1, at random
/// when 0. Returns true if the monster moved or spent the move on a door.
pub fn m_move(state: &mut GameState, id: MonsterId, goal: Position, appr: i8) -> bool {
    let Some(mon) = state.current_level.monster(id) else {
        return false;
    };
    let candidates = mfndpos(&state.current_level, mon, state.player.pos);
    if candidates.is_empty() {
        return false;
    }
    let random = appr == 0 || mon.state.confused || mon.state.stunned;
    let amorphous = mon.data().is_amorphous();
    let name = mon.cap_name();

    let target = if random {
        state.rng.choose(&candidates).copied()
    } else {
        let score = |p: &Position| p.distance_sq(goal) * -(appr as i32);
        let best = candidates.iter().map(score).max();
        let ties: Vec<Position> = candidates
            .iter()
            .copied()
            .filter(|p| Some(score(p)) == best)
            .collect();
        state.rng.choose(&ties).copied()
    };
    let Some(target) = target else {
        return false;
    };

    let cell = *state.current_level.cell(target);
    if cell.is_door_closed() && !amorphous {
        state.current_level.cell_mut(target).door = DoorState::OPEN;
        if player_sees(state, target) {
            state.message("You see a door open.");
        }
        trace!(%id, %target, "monster opened a door");
        return true;
    }
    if cell.is_door_closed() && player_sees(state, target) {
        state.message(format!("{} oozes under the door.", name));
    }

    if !state.current_level.move_monster(id, target) {
        return false;
    }
    trace!(%id, %target, "monster moved");
    pick_up(state, id);
    mintrap(state, id);
    true
}

/// Gather what the monster likes from its new cell (mpickstuff, mpickgold)
fn pick_up(state: &mut GameState, id: MonsterId) {
    let Some(mon) = state.current_level.monster(id) else {
        return;
    };
    let pos = mon.pos;
    let likes_gold = mon.likes_gold();
    let collects = mon.likes_objects();
    let name = mon.cap_name();
    let seen = player_sees(state, pos);

    if likes_gold {
        let gold: u32 = state
            .current_level
            .take_objects_at(pos, |o| o.is_gold())
            .iter()
            .map(|o| o.quantity)
            .sum();
        if gold > 0 {
            if let Some(mon) = state.current_level.monster_mut(id) {
                mon.gold += gold;
            }
            if seen {
                state.message(format!("{} picks up some gold.", name));
            }
        }
    }

    if collects {
        let taken = state.current_level.take_objects_at(pos, |o| {
            matches!(o.class(), ObjectClass::Weapon | ObjectClass::Food)
        });
        if taken.is_empty() {
            return;
        }
        if seen {
            let what = if taken.len() == 1 {
                taken[0].doname()
            } else {
                String::from("several things")
            };
            state.message(format!("{} picks up {}.", name, what));
        }
        if let Some(mon) = state.current_level.monster_mut(id) {
            mon.inventory.extend(taken);
            if mon.data().has_flag(MonsterFlags::WEAPONS) {
                mon.wield_best();
            }
        }
    }
}

/// Move a monster to a random free cell (rloc). Engulfers stay put.
pub fn rloc(state: &mut GameState, id: MonsterId) -> bool {
    if state.player.swallowed_by == Some(id) {
        return false;
    }
    let player_pos = state.player.pos;
    for _ in 0..50 {
        let Some(pos) = state.current_level.random_walkable(&mut state.rng) else {
            break;
        };
        if !state.current_level.is_free(pos, Some(player_pos)) {
            continue;
        }
        if state.current_level.move_monster(id, pos) {
            if state.player.stuck_to == Some(id) {
                state.player.stuck_to = None;
            }
            debug!(%id, %pos, "monster relocated");
            return true;
        }
    }
    false
}
