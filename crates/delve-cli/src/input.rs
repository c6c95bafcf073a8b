//! Line-mode command parsing

use delve_core::action::{Command, Direction};

pub const HELP: &str = "\
Movement: h j k l y u b n (prefix F to fight, e.g. Fl)
  s search    . rest      , pick up    < > stairs    i inventory
  d<x> drop   e<x> eat    q<x> quaff   w<x> wield (w- for bare hands)
  W<x> wear   T<x> take off   P<x> put on   R<x> remove
  t<x><dir> throw item x, e.g. tal
  q quit      ? help";

/// One parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Command(Command),
    Inventory,
    Help,
    Invalid(String),
    Empty,
}

fn letter(rest: &[char], what: &str) -> Result<char, String> {
    match rest {
        [c] if c.is_ascii_alphabetic() || *c == '$' => Ok(*c),
        _ => Err(format!("{} what? (give one inventory letter)", what)),
    }
}

fn direction(c: char) -> Result<Direction, String> {
    Direction::from_key(c).ok_or_else(|| format!("'{}' is not a direction.", c))
}

/// Parse a line of input into a game command
pub fn parse_line(line: &str) -> Input {
    let chars: Vec<char> = line.trim().chars().collect();
    let Some((&first, rest)) = chars.split_first() else {
        return Input::Empty;
    };

    let parsed = match first {
        'i' if rest.is_empty() => return Input::Inventory,
        '?' if rest.is_empty() => return Input::Help,
        'q' if rest.is_empty() => Ok(Command::Quit),
        's' if rest.is_empty() => Ok(Command::Search),
        '.' if rest.is_empty() => Ok(Command::Rest),
        ',' if rest.is_empty() => Ok(Command::Pickup),
        '<' if rest.is_empty() => Ok(Command::GoUp),
        '>' if rest.is_empty() => Ok(Command::GoDown),
        c if rest.is_empty() && Direction::from_key(c).is_some() => direction(c).map(Command::Move),
        'F' => match rest {
            [c] => direction(*c).map(Command::Fight),
            _ => Err(String::from("Fight in which direction?")),
        },
        'w' if rest == ['-'] => Ok(Command::Wield(None)),
        'w' => letter(rest, "Wield").map(|c| Command::Wield(Some(c))),
        'W' => letter(rest, "Wear").map(Command::Wear),
        'T' => letter(rest, "Take off").map(Command::TakeOff),
        'P' => letter(rest, "Put on").map(Command::PutOn),
        'R' => letter(rest, "Remove").map(Command::Remove),
        'q' => letter(rest, "Drink").map(Command::Quaff),
        'e' => letter(rest, "Eat").map(Command::Eat),
        'd' => letter(rest, "Drop").map(Command::Drop),
        't' => match rest {
            [item, dir] => direction(*dir).map(|d| Command::Throw(*item, d)),
            _ => Err(String::from("Throw what, in which direction? (e.g. tal)")),
        },
        other => Err(format!("Unknown command '{}'. Type ? for help.", other)),
    };

    match parsed {
        Ok(command) => Input::Command(command),
        Err(msg) => Input::Invalid(msg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movement_keys() {
        assert_eq!(parse_line("h"), Input::Command(Command::Move(Direction::West)));
        assert_eq!(parse_line(" n "), Input::Command(Command::Move(Direction::SouthEast)));
        assert_eq!(parse_line("Fk"), Input::Command(Command::Fight(Direction::North)));
    }

    #[test]
    fn test_quit_versus_quaff() {
        assert_eq!(parse_line("q"), Input::Command(Command::Quit));
        assert_eq!(parse_line("qf"), Input::Command(Command::Quaff('f')));
    }

    #[test]
    fn test_item_commands() {
        assert_eq!(parse_line("Wc"), Input::Command(Command::Wear('c')));
        assert_eq!(parse_line("w-"), Input::Command(Command::Wield(None)));
        assert_eq!(parse_line("wa"), Input::Command(Command::Wield(Some('a'))));
        assert_eq!(parse_line("d$"), Input::Command(Command::Drop('$')));
        assert_eq!(
            parse_line("tbl"),
            Input::Command(Command::Throw('b', Direction::East))
        );
    }

    #[test]
    fn test_bad_input() {
        assert_eq!(parse_line(""), Input::Empty);
        assert_eq!(parse_line("i"), Input::Inventory);
        assert!(matches!(parse_line("tb"), Input::Invalid(_)));
        assert!(matches!(parse_line("tbx"), Input::Invalid(_)));
        assert!(matches!(parse_line("Wab"), Input::Invalid(_)));
        assert!(matches!(parse_line("Z"), Input::Invalid(_)));
    }
}
