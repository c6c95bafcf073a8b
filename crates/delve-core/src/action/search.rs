//! Searching for hidden things (detect.c dosearch0)

use tracing::debug;

use super::ActionResult;
use crate::GameState;
use crate::dungeon::CellType;

/// Look for secret doors, secret corridors and unseen traps next to the
/// player. Each is found with chance 1 in 7, adjusted by luck.
pub fn dosearch(state: &mut GameState) -> ActionResult {
    if state.player.is_engulfed() {
        state.message("What are you looking for?  The exit?");
        return ActionResult::Success;
    }
    let luck = state.player.luck;
    let around: Vec<_> = state.player.pos.neighbours().collect();
    for pos in around {
        if !state.current_level.is_valid_pos(pos) {
            continue;
        }
        let typ = state.current_level.cell(pos).typ;
        match typ {
            CellType::SecretDoor if state.rng.rnl(7, luck) == 0 => {
                state.current_level.cell_mut(pos).typ = CellType::Door;
                debug!(%pos, "found secret door");
                state.message("You find a hidden door.");
            }
            CellType::SecretCorridor if state.rng.rnl(7, luck) == 0 => {
                state.current_level.cell_mut(pos).typ = CellType::Corridor;
                debug!(%pos, "found secret corridor");
                state.message("You find a hidden passage.");
            }
            _ => {}
        }
        let hidden = state
            .current_level
            .trap_at(pos)
            .is_some_and(|t| !t.seen);
        if hidden
            && state.rng.rnl(7, luck) == 0
            && let Some(trap) = state.current_level.trap_at_mut(pos)
        {
            trap.seen = true;
            let name = trap.kind.name();
            state.message(format!("You find {}.", crate::combat::an(name)));
        }
    }
    ActionResult::Success
}
