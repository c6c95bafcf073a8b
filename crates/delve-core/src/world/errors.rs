//! Library error type

use thiserror::Error;

use crate::dungeon::Position;

/// Failures of game-state operations invoked with bad input.
///
/// Ordinary rule outcomes (walking into a wall, wearing a second cloak)
/// are not errors; actions report those through `ActionResult`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("You don't have that object: '{0}'")]
    NoSuchItem(char),

    #[error("You cannot {action} that {item}")]
    WrongItem { action: &'static str, item: String },

    #[error("You cannot {0} while {1}")]
    Blocked(&'static str, &'static str),

    #[error("Invalid position {0}")]
    InvalidPosition(Position),

    #[error("Your pack is full")]
    InventoryFull,

    #[error("Unknown {kind} '{name}'")]
    UnknownName { kind: &'static str, name: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            GameError::NoSuchItem('q').to_string(),
            "You don't have that object: 'q'"
        );
        let err = GameError::WrongItem {
            action: "wear",
            item: "apple".to_string(),
        };
        assert_eq!(err.to_string(), "You cannot wear that apple");
        assert_eq!(
            GameError::Blocked("move", "stuck").to_string(),
            "You cannot move while stuck"
        );
    }
}
