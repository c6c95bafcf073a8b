//! Taking the stairs (do.c dodown/doup)

use tracing::debug;

use super::ActionResult;
use crate::GameState;
use crate::dungeon::CellType;

fn failed(msg: &str) -> ActionResult {
    ActionResult::Failed(String::from(msg))
}

/// Reasons the player cannot leave the current cell right now
fn held_back(state: &GameState) -> Option<ActionResult> {
    if let Some(id) = state.player.swallowed_by.or(state.player.stuck_to) {
        let name = state
            .current_level
            .monster(id)
            .map(|m| m.the_name())
            .unwrap_or_else(|| String::from("something"));
        return Some(ActionResult::Failed(format!("You are held back by {}.", name)));
    }
    if state.player.utrap > 0 {
        return Some(failed("You are stuck in a trap."));
    }
    None
}

/// Climb the up stairs
pub fn go_up(state: &mut GameState) -> ActionResult {
    if state.current_level.cell(state.player.pos).typ != CellType::UpStairs {
        return failed("You can't go up here.");
    }
    if let Some(result) = held_back(state) {
        return result;
    }
    if state.current_level.depth <= 1 {
        return failed("You cannot leave the dungeon.");
    }
    if !state.change_level(-1) {
        return failed("The stairs are blocked.");
    }
    debug!(depth = state.current_level.depth, "went up");
    ActionResult::Success
}

/// Descend the down stairs
pub fn go_down(state: &mut GameState) -> ActionResult {
    if state.current_level.cell(state.player.pos).typ != CellType::DownStairs {
        return failed("You can't go down here.");
    }
    if let Some(result) = held_back(state) {
        return result;
    }
    if !state.change_level(1) {
        return failed("The stairs are blocked.");
    }
    debug!(depth = state.current_level.depth, "went down");
    ActionResult::Success
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GameRng;
    use crate::world::GameOptions;

    fn game() -> GameState {
        GameState::new(GameRng::new(5), GameOptions::default()).unwrap()
    }

    fn to_downstairs(state: &mut GameState) {
        state.player.pos = state.current_level.find_downstairs().unwrap();
    }

    #[test]
    fn test_cannot_leave_the_dungeon() {
        let mut state = game();
        assert_eq!(
            go_up(&mut state),
            ActionResult::Failed(String::from("You cannot leave the dungeon."))
        );
        assert_eq!(state.current_level.depth, 1);
    }

    #[test]
    fn test_needs_stairs() {
        let mut state = game();
        assert_eq!(
            go_down(&mut state),
            ActionResult::Failed(String::from("You can't go down here."))
        );
    }

    #[test]
    fn test_down_and_back_up() {
        let mut state = game();
        to_downstairs(&mut state);
        assert_eq!(go_down(&mut state), ActionResult::Success);
        assert_eq!(state.current_level.depth, 2);
        assert_eq!(go_up(&mut state), ActionResult::Success);
        assert_eq!(state.current_level.depth, 1);
        assert_eq!(
            Some(state.player.pos),
            state.current_level.find_downstairs()
        );
    }

    #[test]
    fn test_trapped_player_stays() {
        let mut state = game();
        to_downstairs(&mut state);
        state.player.utrap = 3;
        assert!(matches!(go_down(&mut state), ActionResult::Failed(_)));
        assert_eq!(state.current_level.depth, 1);
    }
}
