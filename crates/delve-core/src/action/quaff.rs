//! Drinking potions (potion.c)

use tracing::debug;

use super::ActionResult;
use crate::GameState;
use crate::object::{BucStatus, ObjectClass, kinds};
use crate::player::Property;
use crate::world::GameError;

/// +1 blessed, 0 uncursed, -1 cursed
fn bcsign(buc: BucStatus) -> i32 {
    match buc {
        BucStatus::Blessed => 1,
        BucStatus::Uncursed => 0,
        BucStatus::Cursed => -1,
    }
}

/// Use up one item from a pack stack
fn consume_one(state: &mut GameState, letter: char) {
    if let Some(idx) = state.inventory_index(letter) {
        if state.inventory[idx].quantity > 1 {
            state.inventory[idx].quantity -= 1;
        } else {
            state.inventory.remove(idx);
        }
    }
    state.recalc();
}

/// Quaff a potion from the pack
pub fn dodrink(state: &mut GameState, letter: char) -> Result<ActionResult, GameError> {
    let obj = state.inventory_item(letter)?;
    if obj.class() != ObjectClass::Potion {
        return Err(GameError::WrongItem {
            action: "drink",
            item: obj.xname(),
        });
    }
    let kind = obj.kind;
    let buc = obj.buc;
    let name = obj.data().name;
    consume_one(state, letter);
    debug!(potion = name, ?buc, "quaffed");
    peffects(state, kind, buc);
    Ok(ActionResult::Success)
}

fn peffects(state: &mut GameState, kind: usize, buc: BucStatus) {
    let sign = bcsign(buc);
    let cursed = buc == BucStatus::Cursed;
    match kind {
        kinds::POT_HEALING => {
            let amount = state.rng.dice((6 + 2 * sign) as u32, 4) as i32;
            state.player.heal(amount, if cursed { 0 } else { 1 });
            if !cursed {
                state.player.properties.set_timeout(Property::Blinded, 0);
            }
            state.message("You feel better.");
        }
        kinds::POT_EXTRA_HEALING => {
            let amount = state.rng.dice((6 + 2 * sign) as u32, 8) as i32;
            let raise = match buc {
                BucStatus::Blessed => 5,
                BucStatus::Uncursed => 2,
                BucStatus::Cursed => 0,
            };
            state.player.heal(amount, raise);
            if !cursed {
                state.player.properties.set_timeout(Property::Blinded, 0);
            }
            state.message("You feel much better.");
        }
        kinds::POT_SPEED => {
            let turns = state.rng.rn1(10, (100 + 60 * sign) as u32);
            state.player.properties.incr_timeout(Property::VeryFast, turns);
            state.message("You are suddenly moving much faster.");
        }
        kinds::POT_CONFUSION => {
            if !state.player.is_confused() {
                state.message("Huh, What?  Where am I?");
            }
            let turns = state.rng.rn1(7, 16);
            state.player.properties.incr_timeout(Property::Confusion, turns);
        }
        kinds::POT_SLEEPING => {
            if state.player.has(Property::SleepRes) || state.player.has(Property::FreeAction) {
                state.message("You yawn.");
            } else {
                state.message("You suddenly fall asleep!");
                let turns = state.rng.rnd(10);
                state.player.make_helpless(Property::Asleep, turns);
            }
        }
        kinds::POT_BLINDNESS => {
            if !state.player.is_blind() {
                state.message("It suddenly gets dark.");
            }
            let turns = state.rng.rn1(200, (250 - 125 * sign) as u32);
            state.player.properties.incr_timeout(Property::Blinded, turns);
        }
        _ => state.message("This tastes like water."),
    }
}
