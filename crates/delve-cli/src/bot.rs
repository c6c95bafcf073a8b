//! A simple autoplay bot: heal when low, fight what is adjacent, otherwise
//! walk toward the nearest visible hostile or the down stairs.

use pathfinding::prelude::astar;
use tracing::{debug, info};

use delve_core::action::{Command, Direction};
use delve_core::dungeon::{CellType, Level, Position};
use delve_core::object::{ObjectClass, kinds};
use delve_core::player::HungerState;
use delve_core::{GameLoop, GameLoopResult, GameState};

/// Commands that cost no time still count against this many attempts per turn
const MAX_TRIES_PER_TURN: u64 = 8;

/// Play up to `turns` game turns
pub fn autoplay(game: &mut GameLoop, turns: u64) -> GameLoopResult {
    let start = game.state().turns;
    let mut attempts = turns.saturating_mul(MAX_TRIES_PER_TURN).max(1);

    while game.state().turns < start + turns && attempts > 0 {
        attempts -= 1;
        let command = choose_command(game.state());
        debug!(?command, turn = game.state().turns, "bot");
        let result = game.tick(command);
        for msg in game.state_mut().take_messages() {
            debug!(%msg, "message");
        }
        if !matches!(result, GameLoopResult::Continue) {
            return result;
        }
    }
    info!(turns = game.state().turns - start, "autoplay finished");
    GameLoopResult::Continue
}

/// Cells the bot is willing to step into
fn passable(level: &Level, pos: Position) -> bool {
    if !level.is_valid_pos(pos) {
        return false;
    }
    let cell = level.cell(pos);
    if cell.typ.is_liquid() || cell.is_door_locked() {
        return false;
    }
    cell.is_walkable() || cell.is_door_closed()
}

fn successors(level: &Level, pos: Position, goal: Position) -> Vec<(Position, u32)> {
    Direction::ALL
        .iter()
        .filter_map(|dir| {
            let (dx, dy) = dir.delta();
            let next = pos.offset(dx, dy);
            if !passable(level, next) {
                return None;
            }
            if dir.is_diagonal()
                && (level.cell(pos).blocks_diagonal() || level.cell(next).blocks_diagonal())
            {
                return None;
            }
            let blocked = next != goal && level.monster_at(next).is_some_and(|m| !m.state.tame);
            (!blocked).then_some((next, 1))
        })
        .collect()
}

/// First step of a shortest path from `from` to `goal`
pub fn first_step(level: &Level, from: Position, goal: Position) -> Option<Direction> {
    let (path, _cost) = astar(
        &from,
        |p| successors(level, *p, goal),
        |p| p.distmin(goal) as u32,
        |p| *p == goal,
    )?;
    let next = path.get(1)?;
    Direction::from_delta(next.x - from.x, next.y - from.y)
}

fn inventory_letter(state: &GameState, pred: impl Fn(usize, ObjectClass) -> bool) -> Option<char> {
    state
        .inventory
        .iter()
        .find(|o| pred(o.kind, o.class()))
        .map(|o| o.inv_letter)
}

/// Decide the next command for the current state
pub fn choose_command(state: &GameState) -> Command {
    let you = &state.player;
    let level = &state.current_level;

    if you.hp < you.hp_max / 3
        && let Some(letter) = inventory_letter(state, |kind, _| {
            kind == kinds::POT_HEALING || kind == kinds::POT_EXTRA_HEALING
        })
    {
        return Command::Quaff(letter);
    }
    if you.hunger_state >= HungerState::Hungry
        && let Some(letter) = inventory_letter(state, |_, class| class == ObjectClass::Food)
    {
        return Command::Eat(letter);
    }

    let hostile = |pos: Position| {
        level
            .monster_at(pos)
            .is_some_and(|m| m.is_hostile() && !m.state.invisible)
    };
    for dir in Direction::ALL {
        let (dx, dy) = dir.delta();
        if hostile(you.pos.offset(dx, dy)) {
            return Command::Fight(dir);
        }
    }

    let target = level
        .monsters
        .iter()
        .filter(|m| hostile(m.pos) && level.has_line_of_sight(you.pos, m.pos))
        .min_by_key(|m| you.pos.distance_sq(m.pos))
        .map(|m| m.pos);

    if target.is_none() && level.cell(you.pos).typ == CellType::DownStairs {
        return Command::GoDown;
    }
    if let Some(goal) = target.or(level.downstairs)
        && let Some(dir) = first_step(level, you.pos, goal)
    {
        return Command::Move(dir);
    }
    Command::Search
}

#[cfg(test)]
mod tests {
    use super::*;
    use delve_core::GameRng;
    use delve_core::dungeon::Cell;
    use delve_core::monster::{Monster, MonsterId, race_by_name};
    use delve_core::object::Object;
    use delve_core::world::GameOptions;

    fn arena() -> GameState {
        let options = GameOptions {
            pet: false,
            ..Default::default()
        };
        let mut state = GameState::new(GameRng::new(8), options).unwrap();
        let mut level = Level::new(1);
        for x in 1..20 {
            for y in 1..10 {
                level.cells[x][y] = Cell::floor();
            }
        }
        state.current_level = level;
        state.player.pos = Position::new(3, 5);
        state
    }

    #[test]
    fn test_path_goes_around_wall() {
        let mut level = Level::new(1);
        for x in 1..10 {
            for y in 1..6 {
                level.cells[x][y] = Cell::floor();
            }
        }
        for y in 1..5 {
            level.cells[5][y].typ = CellType::VWall;
        }
        let step = first_step(&level, Position::new(3, 1), Position::new(7, 1));
        assert!(matches!(
            step,
            Some(Direction::South | Direction::SouthEast | Direction::SouthWest)
        ));
        assert_eq!(
            first_step(&level, Position::new(3, 1), Position::new(30, 15)),
            None
        );
    }

    #[test]
    fn test_fights_adjacent_hostile() {
        let mut state = arena();
        state.current_level.add_monster(Monster::new(
            MonsterId::NONE,
            race_by_name("newt").unwrap(),
            Position::new(4, 5),
        ));
        assert_eq!(choose_command(&state), Command::Fight(Direction::East));
    }

    #[test]
    fn test_heals_when_low() {
        let mut state = arena();
        state.inventory.clear();
        let letter = state
            .add_to_inventory(Object::new(kinds::POT_HEALING, 1))
            .unwrap();
        state.player.hp = 1;
        state.player.hp_max = 20;
        assert_eq!(choose_command(&state), Command::Quaff(letter));
    }

    #[test]
    fn test_heads_for_stairs() {
        let mut state = arena();
        state.current_level.cells[10][5].typ = CellType::DownStairs;
        state.current_level.downstairs = Some(Position::new(10, 5));
        assert!(matches!(
            choose_command(&state),
            Command::Move(Direction::East | Direction::NorthEast | Direction::SouthEast)
        ));
        state.player.pos = Position::new(10, 5);
        assert_eq!(choose_command(&state), Command::GoDown);
    }

    #[test]
    fn test_autoplay_runs() {
        let state = GameState::new(GameRng::new(2024), GameOptions::default()).unwrap();
        let mut game = GameLoop::new(state);
        let result = autoplay(&mut game, 50);
        let state = game.state();
        assert!(state.turns > 0 || !matches!(result, GameLoopResult::Continue));
        assert!(state.player.hp <= state.player.hp_max);
    }
}
