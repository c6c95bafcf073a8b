//! Throwing things (dothrow.c)

use tracing::debug;

use super::{ActionResult, Direction};
use crate::GameState;
use crate::combat::{Projectile, ThrowSource, m_throw, player_kills_monster};
use crate::monster::MonsterId;
use crate::object::{Object, WornMask, kinds};
use crate::player::Attribute;
use crate::world::GameError;

/// Throw one item from a stack in a direction
pub fn dothrow(state: &mut GameState, letter: char, dir: Direction) -> Result<ActionResult, GameError> {
    let obj = state.inventory_item(letter)?;
    if !obj.worn.difference(WornMask::WEAPON).is_empty() {
        return Ok(ActionResult::Failed(String::from(
            "You cannot throw something you are wearing.",
        )));
    }
    if obj.is_wielded() && obj.is_cursed() {
        return Ok(ActionResult::Failed(format!(
            "Your {} is welded to your hand!",
            obj.xname()
        )));
    }

    let Some(idx) = state.inventory_index(letter) else {
        return Err(GameError::NoSuchItem(letter));
    };
    let missile = if state.inventory[idx].quantity > 1 {
        state.inventory[idx].split(1)
    } else {
        state.inventory.remove(idx)
    };
    let range = throw_range(state, &missile);
    state.recalc();
    debug!(object = %missile.xname(), ?dir, range, "player throws");

    if let Some(engulfer) = state.player.swallowed_by {
        hit_engulfer(state, engulfer, missile);
        return Ok(ActionResult::Success);
    }

    let from = state.player.pos;
    m_throw(
        state,
        ThrowSource::Player,
        Projectile::Object(missile),
        from,
        dir.delta(),
        range,
    );
    Ok(ActionResult::Success)
}

/// How far the player can throw an object
fn throw_range(state: &GameState, obj: &Object) -> i32 {
    let strength = state.player.attr(Attribute::Strength) as i32;
    let mut range = strength / 2 - obj.weight() as i32 / 40;
    if obj.data().ammo {
        let has_bow = state
            .inventory
            .iter()
            .any(|o| o.kind == kinds::BOW && o.is_wielded());
        if has_bow {
            range += 1;
        } else {
            range /= 2;
        }
    }
    range.max(1)
}

/// Inside an engulfer every throw connects with its innards
fn hit_engulfer(state: &mut GameState, id: MonsterId, obj: Object) {
    let sides = obj.data().damage.max(1) as u32;
    let dmg = (state.rng.rnd(sides) as i32 + obj.enchantment as i32).max(1);
    let what = obj.xname();
    let Some(mon) = state.current_level.monster_mut(id) else {
        return;
    };
    let name = mon.the_name();
    mon.inventory.push(obj);
    let died = mon.take_damage(dmg);
    state.message(format!("The {} hits {}.", what, name));
    if died {
        player_kills_monster(state, id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GameRng;
    use crate::dungeon::{Cell, Level, Position};
    use crate::monster::{Monster, race_by_name};
    use crate::object::BucStatus;
    use crate::world::GameOptions;

    fn arena() -> GameState {
        let options = GameOptions {
            pet: false,
            ..Default::default()
        };
        let mut state = GameState::new(GameRng::new(123), options).unwrap();
        let mut level = Level::new(1);
        for x in 1..30 {
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
    fn test_thrown_dagger_lands_down_range() {
        let mut state = arena();
        let letter = state
            .add_to_inventory(Object::new(kinds::DAGGER, 3))
            .unwrap();
        assert_eq!(
            dothrow(&mut state, letter, Direction::East).unwrap(),
            ActionResult::Success
        );
        assert_eq!(state.inventory_item(letter).unwrap().quantity, 2);
        let landed: Vec<_> = state
            .current_level
            .objects
            .iter()
            .filter(|o| o.kind == kinds::DAGGER)
            .collect();
        assert_eq!(landed.len(), 1);
        assert_eq!(landed[0].pos.y, 5);
        assert!(landed[0].pos.x > 5);
    }

    #[test]
    fn test_range_depends_on_strength() {
        let mut state = arena();
        let dart = Object::new(kinds::DART, 1);
        let arrow = Object::new(kinds::ARROW, 1);
        state.player.attr_current.set(Attribute::Strength, 18);
        assert_eq!(throw_range(&state, &dart), 9);
        assert_eq!(throw_range(&state, &arrow), 4);
        state.player.attr_current.set(Attribute::Strength, 3);
        assert_eq!(throw_range(&state, &Object::new(kinds::PLATE_MAIL, 1)), 1);
    }

    #[test]
    fn test_cannot_throw_worn_or_welded() {
        let mut state = arena();
        let helmet = state.add_to_inventory(Object::new(kinds::HELMET, 1)).unwrap();
        state.inventory[0].worn = WornMask::HELM;
        assert!(matches!(
            dothrow(&mut state, helmet, Direction::East).unwrap(),
            ActionResult::Failed(_)
        ));

        let mut sword = Object::new(kinds::LONG_SWORD, 1);
        sword.buc = BucStatus::Cursed;
        let sword = state.add_to_inventory(sword).unwrap();
        let idx = state.inventory_index(sword).unwrap();
        state.inventory[idx].worn = WornMask::WEAPON;
        assert!(matches!(
            dothrow(&mut state, sword, Direction::East).unwrap(),
            ActionResult::Failed(_)
        ));
        assert_eq!(state.inventory.len(), 2);
    }

    #[test]
    fn test_throw_kills_monster() {
        let mut state = arena();
        let mut mon = Monster::new(
            MonsterId::NONE,
            race_by_name("newt").unwrap(),
            Position::new(7, 5),
        );
        mon.hp = 1;
        mon.hp_max = 1;
        mon.ac = -30;
        let id = state.current_level.add_monster(mon);
        let letter = state
            .add_to_inventory(Object::new(kinds::DAGGER, 20))
            .unwrap();
        for _ in 0..10 {
            if state.current_level.monster(id).is_none() {
                break;
            }
            dothrow(&mut state, letter, Direction::East).unwrap();
        }
        // armor class -30 is beyond reach, so the newt always survives
        assert!(state.current_level.monster(id).is_some());

        state.current_level.monster_mut(id).unwrap().ac = 20;
        dothrow(&mut state, letter, Direction::East).unwrap();
        assert!(state.current_level.monster(id).is_none());
        assert!(state.player.kills >= 1);
    }

    #[test]
    fn test_engulfed_throw_hits_engulfer() {
        let mut state = arena();
        let mut mon = Monster::new(
            MonsterId::NONE,
            race_by_name("fog cloud").unwrap(),
            state.player.pos,
        );
        mon.hp = 100;
        mon.hp_max = 100;
        let id = state.current_level.add_monster(mon);
        state.player.swallowed_by = Some(id);
        let letter = state.add_to_inventory(Object::new(kinds::DART, 1)).unwrap();
        dothrow(&mut state, letter, Direction::North).unwrap();
        let fog = state.current_level.monster(id).unwrap();
        assert!(fog.hp < 100);
        assert_eq!(fog.inventory.len(), 1);
    }
}
