//! Picking things up and putting them down (pickup.c, do.c)

use tracing::debug;

use super::ActionResult;
use crate::GameState;
use crate::object::{Object, ObjectClass, WornMask};
use crate::world::GameError;

/// Pick up everything on the player's cell
pub fn pickup(state: &mut GameState) -> ActionResult {
    if state.player.is_engulfed() {
        return ActionResult::Failed(String::from("You cannot reach the floor."));
    }
    let pos = state.player.pos;
    if state.current_level.objects_at(pos).is_empty() {
        return ActionResult::Failed(String::from("There is nothing here to pick up."));
    }
    let taken = state.current_level.take_objects_at(pos, |_| true);
    if stow(state, taken) == 0 {
        return ActionResult::NoTime;
    }
    ActionResult::Success
}

/// Pick up the classes listed in `pickup_types` after a move
pub fn autopickup(state: &mut GameState) {
    if state.player.is_engulfed() {
        return;
    }
    let classes: Vec<ObjectClass> = state
        .options
        .pickup_types
        .chars()
        .filter_map(ObjectClass::from_symbol)
        .collect();
    let pos = state.player.pos;
    let taken = state
        .current_level
        .take_objects_at(pos, |o| classes.contains(&o.class()));
    stow(state, taken);
}

/// Move objects into the pack, reporting each one. Whatever does not fit
/// goes back on the floor. Returns how many stacks were taken.
fn stow(state: &mut GameState, objects: Vec<Object>) -> usize {
    let pos = state.player.pos;
    let mut count = 0;
    for obj in objects {
        let gold = obj.quantity;
        let name = obj.doname();
        match state.add_to_inventory(obj.clone()) {
            Ok('$') => {
                count += 1;
                state.message(format!("{} gold piece{}.", gold, if gold == 1 { "" } else { "s" }));
            }
            Ok(letter) => {
                count += 1;
                let name = state
                    .inventory_item(letter)
                    .map(Object::doname)
                    .unwrap_or(name);
                state.message(format!("{} - {}.", letter, name));
            }
            Err(err) => {
                debug!(object = %name, "no room in pack");
                state.message(err.to_string());
                state.current_level.add_object(obj, pos);
            }
        }
    }
    if count > 0 {
        state.recalc();
    }
    count
}

/// Drop an item, or all gold with `$`
pub fn dodrop(state: &mut GameState, letter: char) -> Result<ActionResult, GameError> {
    let pos = state.player.pos;
    if letter == '$' {
        if state.player.gold == 0 {
            return Ok(ActionResult::Failed(String::from("You have no gold.")));
        }
        let gold = std::mem::take(&mut state.player.gold);
        state.message(format!("You drop {} gold piece{}.", gold, if gold == 1 { "" } else { "s" }));
        drop_object(state, Object::gold(gold));
        return Ok(ActionResult::Success);
    }

    let obj = state.inventory_item(letter)?;
    if !obj.worn.difference(WornMask::WEAPON).is_empty() {
        return Ok(ActionResult::Failed(String::from(
            "You cannot drop something you are wearing.",
        )));
    }
    if obj.is_wielded() && obj.is_cursed() {
        return Ok(ActionResult::Failed(format!(
            "Your {} is welded to your hand!",
            obj.xname()
        )));
    }
    let Some(obj) = state.remove_from_inventory(letter) else {
        return Err(GameError::NoSuchItem(letter));
    };
    state.message(format!("You drop {}.", obj.doname()));
    debug!(%pos, object = %obj.xname(), "dropped");
    drop_object(state, obj);
    state.recalc();
    Ok(ActionResult::Success)
}

/// Put an object down where the player is; inside an engulfer it joins
/// the engulfer's inventory
fn drop_object(state: &mut GameState, obj: Object) {
    if let Some(id) = state.player.swallowed_by
        && let Some(mon) = state.current_level.monster_mut(id)
    {
        if obj.is_gold() {
            mon.gold += obj.quantity;
        } else {
            mon.inventory.push(obj);
        }
        return;
    }
    let pos = state.player.pos;
    state.current_level.add_object(obj, pos);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GameRng;
    use crate::dungeon::{Cell, Level, Position};
    use crate::object::{BucStatus, kinds};
    use crate::world::GameOptions;

    fn arena() -> GameState {
        let options = GameOptions {
            pet: false,
            ..Default::default()
        };
        let mut state = GameState::new(GameRng::new(77), options).unwrap();
        let mut level = Level::new(1);
        for x in 1..20 {
            for y in 1..10 {
                level.cells[x][y] = Cell::floor();
            }
        }
        state.current_level = level;
        state.player.pos = Position::new(5, 5);
        state.inventory.clear();
        state.recalc();
        state
    }

    #[test]
    fn test_pickup_everything() {
        let mut state = arena();
        let pos = state.player.pos;
        state
            .current_level
            .add_object(Object::new(kinds::FOOD_RATION, 1), pos);
        state.current_level.add_object(Object::gold(12), pos);
        let gold = state.player.gold;
        assert_eq!(pickup(&mut state), ActionResult::Success);
        assert_eq!(state.player.gold, gold + 12);
        assert_eq!(state.inventory.len(), 1);
        assert!(state.current_level.objects_at(pos).is_empty());
        assert!(state.messages.iter().any(|m| m == "a - a food ration."));
    }

    #[test]
    fn test_pickup_nothing() {
        let mut state = arena();
        assert!(matches!(pickup(&mut state), ActionResult::Failed(_)));
    }

    #[test]
    fn test_full_pack_leaves_item() {
        let mut state = arena();
        for letter in ('a'..='z').chain('A'..='Z') {
            let mut obj = Object::new(kinds::LEATHER_ARMOR, 1);
            obj.inv_letter = letter;
            state.inventory.push(obj);
        }
        let pos = state.player.pos;
        state
            .current_level
            .add_object(Object::new(kinds::HELMET, 1), pos);
        assert_eq!(pickup(&mut state), ActionResult::NoTime);
        assert_eq!(state.current_level.objects_at(pos).len(), 1);
    }

    #[test]
    fn test_autopickup_respects_types() {
        let mut state = arena();
        let pos = state.player.pos;
        state.current_level.add_object(Object::gold(3), pos);
        state.current_level.add_object(Object::new(kinds::DART, 4), pos);
        autopickup(&mut state);
        assert!(state.inventory.is_empty());
        assert_eq!(state.current_level.objects_at(pos).len(), 1);

        state.options.pickup_types = String::from(")");
        autopickup(&mut state);
        assert_eq!(state.inventory.len(), 1);
    }

    #[test]
    fn test_drop_item() {
        let mut state = arena();
        let letter = state
            .add_to_inventory(Object::new(kinds::APPLE, 1))
            .unwrap();
        assert_eq!(dodrop(&mut state, letter).unwrap(), ActionResult::Success);
        assert!(state.inventory.is_empty());
        assert_eq!(state.current_level.objects_at(state.player.pos).len(), 1);
    }

    #[test]
    fn test_drop_worn_armor_refused() {
        let mut state = arena();
        let letter = state
            .add_to_inventory(Object::new(kinds::LEATHER_ARMOR, 1))
            .unwrap();
        state.inventory[0].worn = WornMask::ARMOR;
        let result = dodrop(&mut state, letter).unwrap();
        assert!(matches!(result, ActionResult::Failed(_)));
        assert_eq!(state.inventory.len(), 1);
    }

    #[test]
    fn test_drop_cursed_weapon_refused() {
        let mut state = arena();
        let mut sword = Object::new(kinds::LONG_SWORD, 1);
        sword.buc = BucStatus::Cursed;
        let letter = state.add_to_inventory(sword).unwrap();
        state.inventory[0].worn = WornMask::WEAPON;
        let result = dodrop(&mut state, letter).unwrap();
        assert!(matches!(result, ActionResult::Failed(_)));
    }

    #[test]
    fn test_drop_gold_and_missing_letter() {
        let mut state = arena();
        state.player.gold = 40;
        assert_eq!(dodrop(&mut state, '$').unwrap(), ActionResult::Success);
        assert_eq!(state.player.gold, 0);
        let here = state.current_level.objects_at(state.player.pos);
        assert!(here[0].is_gold() && here[0].quantity == 40);
        assert_eq!(dodrop(&mut state, 'x'), Err(GameError::NoSuchItem('x')));
    }
}
