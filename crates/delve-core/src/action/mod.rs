//! Player action system
//!
//! Implements player commands and actions.

mod eat;
mod level_change;
mod movement;
mod pickup;
mod quaff;
mod search;
mod throw;
mod trap;
mod wear;

pub use eat::doeat;
pub use level_change::{go_down, go_up};
pub use movement::domove;
pub use pickup::{autopickup, dodrop, pickup};
pub use quaff::dodrink;
pub use search::dosearch;
pub use throw::dothrow;
pub use trap::{dotrap, mintrap, tele};
pub use wear::{doputon, doremove, dotakeoff, dowear, dowield};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::GameState;
use crate::world::GameError;

/// Player command types
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    Move(Direction),
    Fight(Direction),
    Rest,
    Search,

    Pickup,
    Drop(char),
    Wear(char),
    TakeOff(char),
    PutOn(char),
    Remove(char),
    /// `None` empties the hands
    Wield(Option<char>),
    Quaff(char),
    Eat(char),
    Throw(char, Direction),

    GoUp,
    GoDown,
    Quit,
}

/// Movement directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
        Direction::NorthEast,
        Direction::NorthWest,
        Direction::SouthEast,
        Direction::SouthWest,
    ];

    /// Get the delta (dx, dy) for this direction
    pub const fn delta(&self) -> (i8, i8) {
        match self {
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
            Direction::NorthEast => (1, -1),
            Direction::NorthWest => (-1, -1),
            Direction::SouthEast => (1, 1),
            Direction::SouthWest => (-1, 1),
        }
    }

    /// Direction for a unit delta (xytod)
    pub const fn from_delta(dx: i8, dy: i8) -> Option<Self> {
        match (dx, dy) {
            (0, -1) => Some(Direction::North),
            (0, 1) => Some(Direction::South),
            (1, 0) => Some(Direction::East),
            (-1, 0) => Some(Direction::West),
            (1, -1) => Some(Direction::NorthEast),
            (-1, -1) => Some(Direction::NorthWest),
            (1, 1) => Some(Direction::SouthEast),
            (-1, 1) => Some(Direction::SouthWest),
            _ => None,
        }
    }

    /// vi-keys: `hjklyubn`
    pub const fn from_key(key: char) -> Option<Self> {
        match key {
            'k' => Some(Direction::North),
            'j' => Some(Direction::South),
            'l' => Some(Direction::East),
            'h' => Some(Direction::West),
            'u' => Some(Direction::NorthEast),
            'y' => Some(Direction::NorthWest),
            'n' => Some(Direction::SouthEast),
            'b' => Some(Direction::SouthWest),
            _ => None,
        }
    }

    pub const fn is_diagonal(&self) -> bool {
        matches!(
            self,
            Direction::NorthEast
                | Direction::NorthWest
                | Direction::SouthEast
                | Direction::SouthWest
        )
    }
}

/// Result of executing a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionResult {
    /// Action completed successfully, time passes
    Success,
    /// Action completed but no time passes
    NoTime,
    /// Action failed with message
    Failed(String),
    /// Player died
    Died(String),
    /// Game should quit
    Quit,
}

impl From<GameError> for ActionResult {
    fn from(err: GameError) -> Self {
        ActionResult::Failed(err.to_string())
    }
}

/// Run one player command against the game state
pub fn execute(state: &mut GameState, command: Command) -> ActionResult {
    debug!(?command, turn = state.turns, "player command");
    let result = match command {
        Command::Move(dir) => domove(state, dir, false),
        Command::Fight(dir) => domove(state, dir, true),
        Command::Rest => Ok(ActionResult::Success),
        Command::Search => Ok(dosearch(state)),
        Command::Pickup => Ok(pickup(state)),
        Command::Drop(letter) => dodrop(state, letter),
        Command::Wear(letter) => dowear(state, letter),
        Command::TakeOff(letter) => dotakeoff(state, letter),
        Command::PutOn(letter) => doputon(state, letter),
        Command::Remove(letter) => doremove(state, letter),
        Command::Wield(letter) => dowield(state, letter),
        Command::Quaff(letter) => dodrink(state, letter),
        Command::Eat(letter) => doeat(state, letter),
        Command::Throw(letter, dir) => dothrow(state, letter, dir),
        Command::GoUp => Ok(go_up(state)),
        Command::GoDown => Ok(go_down(state)),
        Command::Quit => Ok(ActionResult::Quit),
    };
    let result = result.unwrap_or_else(ActionResult::from);
    if let ActionResult::Success = result
        && state.is_over()
    {
        let reason = state.killer.clone().unwrap_or_else(|| String::from("died"));
        return ActionResult::Died(reason);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_round_trip() {
        for dir in Direction::ALL {
            let (dx, dy) = dir.delta();
            assert_eq!(Direction::from_delta(dx, dy), Some(dir));
        }
        assert_eq!(Direction::from_delta(0, 0), None);
        assert_eq!(Direction::from_delta(2, 0), None);
    }

    #[test]
    fn test_vi_keys() {
        assert_eq!(Direction::from_key('h'), Some(Direction::West));
        assert_eq!(Direction::from_key('n'), Some(Direction::SouthEast));
        assert_eq!(Direction::from_key('x'), None);
        assert!(Direction::SouthEast.is_diagonal());
        assert!(!Direction::North.is_diagonal());
    }

    #[test]
    fn test_error_becomes_failure() {
        let result = ActionResult::from(GameError::NoSuchItem('z'));
        assert_eq!(
            result,
            ActionResult::Failed(String::from("You don't have that object: 'z'"))
        );
    }
}
