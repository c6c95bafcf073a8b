//! Armor, accessories and the wielded weapon (do_wear.c, wield.c)

use tracing::debug;

use super::ActionResult;
use crate::GameState;
use crate::object::{ArmorSlot, Object, ObjectClass, WornMask};
use crate::world::GameError;

fn failed(msg: impl Into<String>) -> Result<ActionResult, GameError> {
    Ok(ActionResult::Failed(msg.into()))
}

/// Item occupying any of the slots in `mask`
fn worn_in(state: &GameState, mask: WornMask) -> Option<&Object> {
    state.inventory.iter().find(|o| o.worn.intersects(mask))
}

/// Set the worn bits of a pack item and refresh derived stats
fn set_worn(state: &mut GameState, letter: char, worn: WornMask) -> String {
    let mut name = String::new();
    if let Some(idx) = state.inventory_index(letter) {
        let obj = &mut state.inventory[idx];
        obj.worn = worn;
        name = obj.doname();
    }
    state.recalc();
    debug!(%letter, ?worn, ac = state.player.armor_class, "equipment changed");
    name
}

/// Put on a piece of armor
pub fn dowear(state: &mut GameState, letter: char) -> Result<ActionResult, GameError> {
    let obj = state.inventory_item(letter)?;
    let Some(slot) = obj.data().slot else {
        return Err(GameError::WrongItem {
            action: "wear",
            item: obj.xname(),
        });
    };
    if obj.is_worn() {
        let msg = if obj.is_wielded() {
            "You are wielding that!"
        } else {
            "You are already wearing that!"
        };
        return failed(msg);
    }
    let mask = slot.worn_mask();
    if let Some(other) = worn_in(state, mask) {
        return failed(format!("You are already wearing {}.", other.doname()));
    }
    if slot == ArmorSlot::Body && worn_in(state, WornMask::CLOAK).is_some() {
        return failed("You are wearing a cloak.");
    }
    let name = set_worn(state, letter, mask);
    state.message(format!("You are now wearing {}.", name));
    Ok(ActionResult::Success)
}

/// Take off a worn piece of armor
pub fn dotakeoff(state: &mut GameState, letter: char) -> Result<ActionResult, GameError> {
    let obj = state.inventory_item(letter)?;
    if !obj.worn.intersects(WornMask::ANY_ARMOR) {
        return failed("You are not wearing that.");
    }
    if obj.worn.contains(WornMask::ARMOR) && worn_in(state, WornMask::CLOAK).is_some() {
        return failed("You are wearing a cloak over it.");
    }
    if obj.is_cursed() {
        return failed("You can't. It is cursed.");
    }
    let name = obj.doname();
    set_worn(state, letter, WornMask::empty());
    state.message(format!("You were wearing {}.", name));
    Ok(ActionResult::Success)
}

/// Put on a ring or an amulet
pub fn doputon(state: &mut GameState, letter: char) -> Result<ActionResult, GameError> {
    let obj = state.inventory_item(letter)?;
    let class = obj.class();
    if !matches!(class, ObjectClass::Ring | ObjectClass::Amulet) {
        return Err(GameError::WrongItem {
            action: "put on",
            item: obj.xname(),
        });
    }
    if obj.is_worn() {
        return failed("You are already wearing that!");
    }
    let mask = if class == ObjectClass::Amulet {
        if worn_in(state, WornMask::AMULET).is_some() {
            return failed("You are already wearing an amulet.");
        }
        WornMask::AMULET
    } else if worn_in(state, WornMask::RING_L).is_none() {
        WornMask::RING_L
    } else if worn_in(state, WornMask::RING_R).is_none() {
        WornMask::RING_R
    } else {
        return failed("You are already wearing two rings.");
    };
    let name = set_worn(state, letter, mask);
    let hand = if mask == WornMask::RING_L {
        " (on left hand)"
    } else if mask == WornMask::RING_R {
        " (on right hand)"
    } else {
        " (being worn)"
    };
    state.message(format!("{} - {}{}.", letter, name, hand));
    Ok(ActionResult::Success)
}

/// Take off a ring or an amulet
pub fn doremove(state: &mut GameState, letter: char) -> Result<ActionResult, GameError> {
    let obj = state.inventory_item(letter)?;
    if !obj.worn.intersects(WornMask::ANY_RING | WornMask::AMULET) {
        return failed("You are not wearing that.");
    }
    if obj.is_cursed() {
        return failed("You can't. It is cursed.");
    }
    let name = obj.doname();
    set_worn(state, letter, WornMask::empty());
    state.message(format!("You were wearing {}.", name));
    Ok(ActionResult::Success)
}

/// Wield an item, or with `None` go bare handed
pub fn dowield(state: &mut GameState, letter: Option<char>) -> Result<ActionResult, GameError> {
    if let Some(letter) = letter {
        let obj = state.inventory_item(letter)?;
        if obj.is_wielded() {
            return failed("You are already wielding that!");
        }
        if obj.is_worn() {
            return failed("You cannot wield something you are wearing.");
        }
    }
    let current = state
        .inventory
        .iter()
        .find(|o| o.is_wielded())
        .map(|o| (o.inv_letter, o.is_cursed(), o.xname()));
    if let Some((_, true, name)) = &current {
        return failed(format!("Your {} is welded to your hand!", name));
    }

    match (current, letter) {
        (None, None) => failed("You are already empty handed."),
        (Some((old, ..)), None) => {
            set_worn(state, old, WornMask::empty());
            state.message("You are empty handed.");
            Ok(ActionResult::Success)
        }
        (old, Some(letter)) => {
            if let Some((old, ..)) = old
                && let Some(idx) = state.inventory_index(old)
            {
                state.inventory[idx].worn = WornMask::empty();
            }
            let name = set_worn(state, letter, WornMask::WEAPON);
            state.message(format!("{} - {} (weapon in hand).", letter, name));
            Ok(ActionResult::Success)
        }
    }
}
