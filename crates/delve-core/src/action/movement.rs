//! Player movement and melee (hack.c domove)

use tracing::{debug, trace};

use super::{ActionResult, Direction, autopickup, dotrap};
use crate::GameState;
use crate::combat::attack_monster;
use crate::dungeon::{CellType, DoorState, Position, TrapType};
use crate::monster::MonsterId;
use crate::player::Attribute;
use crate::world::GameError;

/// Step (or with `fight` set, only attack) in a direction
pub fn domove(
    state: &mut GameState,
    dir: Direction,
    fight: bool,
) -> Result<ActionResult, GameError> {
    if let Some(engulfer) = state.player.swallowed_by {
        attack_monster(state, engulfer);
        return Ok(ActionResult::Success);
    }

    let dir = confdir(state, dir);
    let (dx, dy) = dir.delta();
    let from = state.player.pos;
    let to = from.offset(dx, dy);
    if !state.current_level.is_valid_pos(to) {
        return Ok(ActionResult::NoTime);
    }

    if let Some(id) = state.current_level.monster_id_at(to) {
        let swap = !fight
            && state.options.safe_pet
            && state
                .current_level
                .monster(id)
                .is_some_and(|m| m.state.tame && !m.state.trapped);
        if !swap {
            attack_monster(state, id);
            return Ok(ActionResult::Success);
        }
        if state.player.stuck_to.is_none() && state.player.utrap == 0 {
            return Ok(swap_with_pet(state, id, from, to));
        }
    }

    if fight {
        state.message("You harmlessly attack thin air.");
        return Ok(ActionResult::NoTime);
    }

    if let Some(holder) = state.player.stuck_to
        && let Some(result) = try_escape(state, holder)
    {
        return Ok(result);
    }

    if state.player.utrap > 0 {
        climb_out(state);
        return Ok(ActionResult::Success);
    }

    let cell = *state.current_level.cell(to);
    if dir.is_diagonal()
        && (cell.blocks_diagonal() || state.current_level.cell(from).blocks_diagonal())
    {
        return Ok(ActionResult::Failed(String::from(
            "You cannot pass diagonally through a doorway.",
        )));
    }
    if cell.is_door_closed() {
        return Ok(open_door(state, to, cell.is_door_locked()));
    }
    if cell.typ.is_liquid() {
        let what = if cell.typ == CellType::Lava { "lava" } else { "water" };
        return Ok(ActionResult::Failed(format!("You avoid stepping into the {}.", what)));
    }
    if !cell.is_walkable() {
        let msg = if cell.typ.is_wall() {
            "It's a wall."
        } else {
            "It's solid stone."
        };
        return Ok(ActionResult::Failed(String::from(msg)));
    }

    state.player.pos = to;
    trace!(%from, %to, "player moved");
    arrive(state, to);
    Ok(ActionResult::Success)
}

/// Traps, autopickup and a look at the floor after landing on a cell
fn arrive(state: &mut GameState, pos: Position) {
    if state.current_level.trap_at(pos).is_some() {
        dotrap(state, pos);
    }
    if state.is_over() || state.player.pos != pos {
        return;
    }
    if state.options.autopickup {
        autopickup(state);
    }
    let here: Vec<String> = state
        .current_level
        .objects_at(pos)
        .into_iter()
        .map(|o| o.doname())
        .collect();
    match here.as_slice() {
        [] => {}
        [one] => state.message(format!("You see here {}.", one)),
        _ => state.message("There are several objects here."),
    }
}

/// A stunned player, or a confused one now and then, stumbles at random
fn confdir(state: &mut GameState, dir: Direction) -> Direction {
    let player = &state.player;
    if player.is_stunned() || (player.is_confused() && state.rng.one_in(5)) {
        let i = state.rng.rn2(Direction::ALL.len() as u32) as usize;
        return Direction::ALL[i];
    }
    dir
}

fn swap_with_pet(state: &mut GameState, pet: MonsterId, from: Position, to: Position) -> ActionResult {
    if !state.current_level.move_monster(pet, from) {
        return ActionResult::NoTime;
    }
    state.player.pos = to;
    if let Some(name) = state.current_level.monster(pet).map(|m| m.name.clone()) {
        state.message(format!("You swap places with your {}.", name));
    }
    debug!(%pet, "swapped with pet");
    arrive(state, to);
    ActionResult::Success
}

/// Struggle against a holding monster. `None` means the player broke
/// free and may move on.
fn try_escape(state: &mut GameState, holder: MonsterId) -> Option<ActionResult> {
    let Some(mon) = state.current_level.monster(holder) else {
        state.player.stuck_to = None;
        return None;
    };
    let name = mon.the_name();
    let odds = if mon.can_act() { 40 } else { 8 };
    if state.rng.rn2(odds) < 3 {
        state.player.stuck_to = None;
        state.message(format!("You pull free from {}.", name));
        return None;
    }
    state.message(format!("You cannot escape from {}!", name));
    Some(ActionResult::Success)
}

/// One turn of struggling in a bear trap or climbing out of a pit
fn climb_out(state: &mut GameState) {
    let kind = state.current_level.trap_at(state.player.pos).map(|t| t.kind);
    state.player.utrap -= 1;
    let msg = match (kind, state.player.utrap) {
        (Some(TrapType::Pit), 0) => "You crawl to the edge of the pit.",
        (Some(TrapType::Pit), _) => "You are still in a pit.",
        (_, 0) => "You pull free.",
        _ => "You are caught in a bear trap.",
    };
    state.message(msg);
}

/// Walk into a closed door (doopen)
fn open_door(state: &mut GameState, pos: Position, locked: bool) -> ActionResult {
    if locked {
        return ActionResult::Failed(String::from("This door is locked."));
    }
    let player = &state.player;
    let strength = (player.attr(Attribute::Strength) as i32
        + player.attr(Attribute::Dexterity) as i32
        + player.attr(Attribute::Constitution) as i32)
        / 3;
    if (state.rng.rnl(20, player.luck) as i32) < strength {
        state.current_level.cell_mut(pos).door = DoorState::OPEN;
        state.message("The door opens.");
    } else {
        state.message("The door is stuck.");
    }
    ActionResult::Success
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GameRng;
    use crate::dungeon::{Cell, Level};
    use crate::monster::{Monster, race_by_name};
    use crate::object::{Object, kinds};
    use crate::world::GameOptions;

    fn arena() -> GameState {
        let options = GameOptions {
            pet: false,
            ..Default::default()
        };
        let mut state = GameState::new(GameRng::new(66), options).unwrap();
        let mut level = Level::new(1);
        for x in 1..20 {
            for y in 1..10 {
                level.cells[x][y] = Cell::floor();
            }
        }
        for x in 0..21 {
            level.cells[x][0].typ = CellType::HWall;
            level.cells[x][10].typ = CellType::HWall;
        }
        state.current_level = level;
        state.player.pos = Position::new(5, 5);
        state
    }

    fn spawn(state: &mut GameState, name: &str, pos: Position) -> MonsterId {
        let mut mon = Monster::new(MonsterId::NONE, race_by_name(name).unwrap(), pos);
        mon.hp = 50;
        mon.hp_max = 50;
        state.current_level.add_monster(mon)
    }

    #[test]
    fn test_step_onto_floor() {
        let mut state = arena();
        let result = domove(&mut state, Direction::East, false).unwrap();
        assert_eq!(result, ActionResult::Success);
        assert_eq!(state.player.pos, Position::new(6, 5));
    }

    #[test]
    fn test_wall_costs_no_time() {
        let mut state = arena();
        state.player.pos = Position::new(5, 1);
        let result = domove(&mut state, Direction::North, false).unwrap();
        assert_eq!(result, ActionResult::Failed(String::from("It's a wall.")));
        assert_eq!(state.player.pos, Position::new(5, 1));
    }

    #[test]
    fn test_moving_into_monster_attacks() {
        let mut state = arena();
        let id = spawn(&mut state, "jackal", Position::new(6, 5));
        state.current_level.monster_mut(id).unwrap().state.peaceful = true;
        domove(&mut state, Direction::East, false).unwrap();
        assert_eq!(state.player.pos, Position::new(5, 5));
        assert!(!state.current_level.monster(id).unwrap().state.peaceful);
    }

    #[test]
    fn test_swap_with_pet() {
        let mut state = arena();
        let id = spawn(&mut state, "little dog", Position::new(6, 5));
        state.current_level.monster_mut(id).unwrap().state.tame = true;
        domove(&mut state, Direction::East, false).unwrap();
        assert_eq!(state.player.pos, Position::new(6, 5));
        assert_eq!(state.current_level.monster(id).unwrap().pos, Position::new(5, 5));
        assert!(
            state
                .current_level
                .check_invariants(state.player.pos, None)
                .is_empty()
        );
    }

    #[test]
    fn test_fight_into_air_takes_no_time() {
        let mut state = arena();
        let result = domove(&mut state, Direction::East, true).unwrap();
        assert_eq!(result, ActionResult::NoTime);
        assert_eq!(state.player.pos, Position::new(5, 5));
    }

    #[test]
    fn test_doorway_forbids_diagonals() {
        let mut state = arena();
        state.current_level.cells[6][4].typ = CellType::Door;
        state.current_level.cells[6][4].door = DoorState::OPEN;
        let result = domove(&mut state, Direction::NorthEast, false).unwrap();
        assert!(matches!(result, ActionResult::Failed(_)));
        assert_eq!(state.player.pos, Position::new(5, 5));
    }

    #[test]
    fn test_locked_door_refuses() {
        let mut state = arena();
        state.current_level.cells[6][5].typ = CellType::Door;
        state.current_level.cells[6][5].door = DoorState::LOCKED;
        let result = domove(&mut state, Direction::East, false).unwrap();
        assert_eq!(result, ActionResult::Failed(String::from("This door is locked.")));
    }

    #[test]
    fn test_closed_door_opens_eventually() {
        let mut state = arena();
        state.current_level.cells[6][5].typ = CellType::Door;
        state.current_level.cells[6][5].door = DoorState::CLOSED;
        for _ in 0..30 {
            assert_eq!(
                domove(&mut state, Direction::East, false).unwrap(),
                ActionResult::Success
            );
            if !state.current_level.cells[6][5].is_door_closed() {
                break;
            }
        }
        assert!(!state.current_level.cells[6][5].is_door_closed());
        assert_eq!(state.player.pos, Position::new(5, 5));
    }

    #[test]
    fn test_trapped_player_struggles() {
        let mut state = arena();
        state.player.utrap = 2;
        domove(&mut state, Direction::East, false).unwrap();
        assert_eq!(state.player.pos, Position::new(5, 5));
        assert_eq!(state.player.utrap, 1);
    }

    #[test]
    fn test_engulfed_player_hits_engulfer() {
        let mut state = arena();
        let id = spawn(&mut state, "fog cloud", Position::new(6, 5));
        state.current_level.move_monster(id, state.player.pos);
        state.player.swallowed_by = Some(id);
        let result = domove(&mut state, Direction::West, false).unwrap();
        assert_eq!(result, ActionResult::Success);
        assert_eq!(state.player.pos, Position::new(5, 5));
    }

    #[test]
    fn test_autopickup_gold() {
        let mut state = arena();
        state.current_level.add_object(Object::gold(25), Position::new(6, 5));
        state
            .current_level
            .add_object(Object::new(kinds::APPLE, 1), Position::new(6, 5));
        let gold = state.player.gold;
        domove(&mut state, Direction::East, false).unwrap();
        assert_eq!(state.player.gold, gold + 25);
        assert_eq!(state.current_level.objects_at(Position::new(6, 5)).len(), 1);
    }
}
