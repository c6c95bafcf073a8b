//! Eating (eat.c)

use tracing::{debug, info};

use super::ActionResult;
use crate::GameState;
use crate::object::{ObjectClass, kinds};
use crate::player::HungerState;
use crate::world::GameError;

/// Nutrition past which a satiated eater may choke
const CHOKE_LIMIT: i32 = 2000;

/// Eat a food item from the pack
pub fn doeat(state: &mut GameState, letter: char) -> Result<ActionResult, GameError> {
    let obj = state.inventory_item(letter)?;
    if obj.class() != ObjectClass::Food {
        return Err(GameError::WrongItem {
            action: "eat",
            item: obj.xname(),
        });
    }
    let kind = obj.kind;
    let name = obj.xname();
    let nutrition = obj.data().nutrition as i32;
    let was_satiated = state.player.hunger_state == HungerState::Satiated;

    if let Some(idx) = state.inventory_index(letter) {
        if state.inventory[idx].quantity > 1 {
            state.inventory[idx].quantity -= 1;
        } else {
            state.inventory.remove(idx);
        }
    }
    state.recalc();

    let msg = if kind == kinds::APPLE {
        String::from("Delicious!  Must be an apple.")
    } else {
        format!("This {} is delicious!", name)
    };
    state.message(msg);

    state.player.nutrition += nutrition;
    debug!(food = %name, nutrition = state.player.nutrition, "ate");
    if state.player.nutrition > CHOKE_LIMIT {
        if was_satiated {
            choke(state, &name);
        } else {
            state.message("You're having a hard time getting all of it down.");
        }
    }
    update_hunger(state);
    Ok(ActionResult::Success)
}

/// Eating while already full (choke)
fn choke(state: &mut GameState, food: &str) {
    if state.rng.one_in(20) {
        state.message("You stuff yourself and then vomit voluminously.");
        state.player.nutrition -= 1000;
        return;
    }
    state.message("You choke over your food.");
    info!(%food, "player choked");
    state.die(format!("choked on {}", crate::combat::an(food)));
}

fn update_hunger(state: &mut GameState) {
    let hunger = HungerState::from_nutrition(state.player.nutrition);
    if hunger != state.player.hunger_state {
        if hunger == HungerState::Hungry && state.player.hunger_state > hunger {
            state.message("You only feel hungry now.");
        }
        state.player.hunger_state = hunger;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GameRng;
    use crate::object::Object;
    use crate::world::GameOptions;

    fn game() -> GameState {
        let options = GameOptions {
            pet: false,
            ..Default::default()
        };
        let mut state = GameState::new(GameRng::new(11), options).unwrap();
        state.inventory.clear();
        state
    }

    #[test]
    fn test_eating_restores_nutrition() {
        let mut state = game();
        state.player.nutrition = 100;
        state.player.hunger_state = HungerState::Hungry;
        let letter = state
            .add_to_inventory(Object::new(kinds::FOOD_RATION, 2))
            .unwrap();
        assert_eq!(doeat(&mut state, letter).unwrap(), ActionResult::Success);
        assert_eq!(state.player.nutrition, 900);
        assert_eq!(state.player.hunger_state, HungerState::NotHungry);
        assert_eq!(state.inventory_item(letter).unwrap().quantity, 1);
    }

    #[test]
    fn test_apple() {
        let mut state = game();
        state.player.nutrition = 500;
        let letter = state.add_to_inventory(Object::new(kinds::APPLE, 1)).unwrap();
        doeat(&mut state, letter).unwrap();
        assert_eq!(state.player.nutrition, 550);
        assert!(state.inventory.is_empty());
    }

    #[test]
    fn test_overeating_when_satiated_is_dangerous() {
        let mut state = game();
        state.player.nutrition = 1500;
        state.player.hunger_state = HungerState::Satiated;
        let letter = state
            .add_to_inventory(Object::new(kinds::FOOD_RATION, 1))
            .unwrap();
        doeat(&mut state, letter).unwrap();
        assert!(state.is_over() || state.player.nutrition == 1300);
    }

    #[test]
    fn test_cannot_eat_armor() {
        let mut state = game();
        let letter = state
            .add_to_inventory(Object::new(kinds::HELMET, 1))
            .unwrap();
        assert!(matches!(
            doeat(&mut state, letter),
            Err(GameError::WrongItem { action: "eat", .. })
        ));
    }
}
