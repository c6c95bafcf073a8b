//! Pet behaviour (dog_move)

use tracing::{debug, trace};

use super::{MonsterAction, MonsterFlags, MonsterId, m_move};
use crate::GameState;
use crate::combat::{DamageType, mattackm, player_sees};
use crate::dungeon::Position;
use crate::object::ObjectClass;

/// Tameness never climbs past this by feeding
const MAX_TAMENESS: u8 = 20;

/// How far a pet strays from the player before heading back
const LEASH: i32 = 2;

/// Take a tame monster's move: fight, fetch food, or follow
pub fn dog_move(state: &mut GameState, id: MonsterId) -> MonsterAction {
    if let Some(foe) = pick_foe(state, id) {
        let result = mattackm(state, id, foe);
        if result.attacker_died() {
            return MonsterAction::Died;
        }
        return MonsterAction::Attacked;
    }

    let Some(pet) = state.current_level.monster(id) else {
        return MonsterAction::Nothing;
    };
    if pet.state.trapped {
        return MonsterAction::Waited;
    }
    let here = pet.pos;
    let player_pos = state.player.pos;

    let (goal, appr) = if here.distmin(player_pos) > LEASH + 3 {
        (player_pos, 1)
    } else if let Some(food) = nearest_food(state, id) {
        (food, 1)
    } else if here.distmin(player_pos) > LEASH {
        (player_pos, 1)
    } else {
        (here, 0)
    };
    trace!(%id, %goal, appr, "pet goal");

    if !m_move(state, id, goal, appr) {
        return MonsterAction::Waited;
    }
    if state.current_level.monster(id).is_none() {
        return MonsterAction::Died;
    }
    eat_food(state, id);
    MonsterAction::Moved
}

/// An adjacent hostile the pet is willing to take on
fn pick_foe(state: &mut GameState, id: MonsterId) -> Option<MonsterId> {
    let pet = state.current_level.monster(id)?;
    let level = &state.current_level;
    let cautious = pet.can_see();
    let foes: Vec<MonsterId> = pet
        .pos
        .neighbours()
        .filter_map(|p| level.monster_at(p))
        .filter(|m| m.id != id && m.is_hostile())
        .filter(|m| m.level as i32 <= pet.level as i32 + 1)
        .filter(|m| {
            // staring into a floating eye is a mistake pets rarely make
            !(cautious
                && m.data().passive().is_some_and(|a| a.damage_type == DamageType::Paralyze)
                && !m.state.blinded)
        })
        .map(|m| m.id)
        .collect();
    state.rng.choose(&foes).copied()
}

fn likes_food(flags: MonsterFlags) -> bool {
    flags.intersects(MonsterFlags::CARNIVORE | MonsterFlags::HERBIVORE)
}

/// Closest visible food within five squares
fn nearest_food(state: &GameState, id: MonsterId) -> Option<Position> {
    let pet = state.current_level.monster(id)?;
    if !likes_food(pet.data().flags) {
        return None;
    }
    let level = &state.current_level;
    level
        .objects
        .iter()
        .filter(|o| o.class() == ObjectClass::Food)
        .map(|o| o.pos)
        .filter(|&p| p.distmin(pet.pos) <= 5 && level.has_line_of_sight(pet.pos, p))
        .min_by_key(|&p| p.distance_sq(pet.pos))
}

/// Eat one piece of food underfoot (dog_eat)
fn eat_food(state: &mut GameState, id: MonsterId) {
    let Some(pet) = state.current_level.monster(id) else {
        return;
    };
    if !likes_food(pet.data().flags) {
        return;
    }
    let pos = pet.pos;
    let name = pet.cap_name();
    let Some(food) = state
        .current_level
        .objects_at(pos)
        .into_iter()
        .find(|o| o.class() == ObjectClass::Food)
        .map(|o| o.id)
    else {
        return;
    };
    let Some(mut food) = state.current_level.remove_object(food) else {
        return;
    };
    if food.quantity > 1 {
        let rest = food.split(food.quantity - 1);
        state.current_level.add_object(rest, pos);
    }
    if player_sees(state, pos) {
        state.message(format!("{} eats {}.", name, food.doname()));
    }
    if let Some(pet) = state.current_level.monster_mut(id) {
        pet.tameness = (pet.tameness + 1).min(MAX_TAMENESS);
        debug!(%id, tameness = pet.tameness, "pet ate");
    }
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
        let mut state = GameState::new(GameRng::new(44), options).unwrap();
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

    fn spawn(state: &mut GameState, name: &str, pos: Position, tame: bool) -> MonsterId {
        let mut mon = Monster::new(MonsterId::NONE, race_by_name(name).unwrap(), pos);
        mon.hp = 30;
        mon.hp_max = 30;
        if tame {
            mon.state.tame = true;
            mon.tameness = 10;
        }
        state.current_level.add_monster(mon)
    }

    #[test]
    fn test_pet_attacks_weak_hostile() {
        let mut state = arena();
        let pet = spawn(&mut state, "little dog", Position::new(10, 5), true);
        spawn(&mut state, "newt", Position::new(11, 5), false);
        assert_eq!(dog_move(&mut state, pet), MonsterAction::Attacked);
    }

    #[test]
    fn test_pet_ignores_strong_hostile() {
        let mut state = arena();
        let pet = spawn(&mut state, "little dog", Position::new(4, 5), true);
        spawn(&mut state, "troll", Position::new(5, 5), false);
        assert_ne!(dog_move(&mut state, pet), MonsterAction::Attacked);
    }

    #[test]
    fn test_pet_follows_player() {
        let mut state = arena();
        let pet = spawn(&mut state, "kitten", Position::new(15, 5), true);
        assert_eq!(dog_move(&mut state, pet), MonsterAction::Moved);
        assert_eq!(state.current_level.monster(pet).unwrap().pos, Position::new(14, 5));
    }

    #[test]
    fn test_pet_eats_nearby_food() {
        let mut state = arena();
        let pet = spawn(&mut state, "little dog", Position::new(5, 5), true);
        state
            .current_level
            .add_object(Object::new(kinds::FOOD_RATION, 1), Position::new(6, 5));
        assert_eq!(dog_move(&mut state, pet), MonsterAction::Moved);
        let dog = state.current_level.monster(pet).unwrap();
        assert_eq!(dog.pos, Position::new(6, 5));
        assert_eq!(dog.tameness, 11);
        assert!(state.current_level.objects_at(Position::new(6, 5)).is_empty());
    }
}
