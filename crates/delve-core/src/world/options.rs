//! Game options and the rc file format
//!
//! Options come from `OPTIONS=` lines, comma separated. A boolean is
//! negated with `!` or `no`; other options take `name:value`.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OptionsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unknown option: {0}")]
    UnknownOption(String),

    #[error("Invalid value for option '{0}': {1}")]
    InvalidValue(String, String),

    #[error("Missing value for option '{0}'")]
    MissingValue(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// User-configurable game options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameOptions {
    pub name: String,
    pub role: Option<String>,
    pub race: Option<String>,

    pub autopickup: bool,
    /// Object class symbols picked up automatically
    pub pickup_types: String,
    /// Moving into a pet swaps places instead of attacking
    pub safe_pet: bool,
    pub verbose: bool,
    pub pet: bool,

    /// A random monster appears with chance 1 in `spawn_rate` each turn
    pub spawn_rate: u32,
    /// No random spawns once a floor holds this many monsters
    pub max_monsters: usize,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self {
            name: String::from("adventurer"),
            role: None,
            race: None,
            autopickup: true,
            pickup_types: String::from("$"),
            safe_pet: true,
            verbose: true,
            pet: true,
            spawn_rate: 70,
            max_monsters: 40,
        }
    }
}

const BOOL_OPTIONS: &[&str] = &["autopickup", "safe_pet", "verbose", "pet"];

impl GameOptions {
    pub fn load_from_file(path: &Path) -> Result<Self, OptionsError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_config(&contents)
    }

    /// Parse an rc file
    pub fn parse_config(contents: &str) -> Result<Self, OptionsError> {
        let mut options = Self::default();
        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some(opts) = line.strip_prefix("OPTIONS=") {
                for opt in opts.split(',') {
                    let opt = opt.trim();
                    if !opt.is_empty() {
                        options.parse_option(opt)?;
                    }
                }
            }
        }
        Ok(options)
    }

    /// Apply a single `name`, `!name`, `noname` or `name:value` option
    pub fn parse_option(&mut self, opt: &str) -> Result<(), OptionsError> {
        if let Some((key, value)) = opt.split_once(':').or_else(|| opt.split_once('=')) {
            return self.set_option(key.trim(), value.trim());
        }
        if let Some(name) = opt.strip_prefix('!') {
            return self.set_bool_option(name, false);
        }
        if let Some(name) = opt.strip_prefix("no")
            && BOOL_OPTIONS.contains(&name)
        {
            return self.set_bool_option(name, false);
        }
        self.set_bool_option(opt, true)
    }

    fn set_bool_option(&mut self, name: &str, value: bool) -> Result<(), OptionsError> {
        match name {
            "autopickup" => self.autopickup = value,
            "safe_pet" => self.safe_pet = value,
            "verbose" => self.verbose = value,
            "pet" => self.pet = value,
            _ => return Err(OptionsError::UnknownOption(name.to_string())),
        }
        Ok(())
    }

    fn set_option(&mut self, name: &str, value: &str) -> Result<(), OptionsError> {
        if value.is_empty() {
            return Err(OptionsError::MissingValue(name.to_string()));
        }
        let invalid = || OptionsError::InvalidValue(name.to_string(), value.to_string());
        match name {
            "name" => self.name = value.to_string(),
            "role" => self.role = Some(value.to_string()),
            "race" => self.race = Some(value.to_string()),
            "pickup_types" | "autopickup_types" => self.pickup_types = value.to_string(),
            "spawn_rate" => {
                self.spawn_rate = value.parse().map_err(|_| invalid())?;
                if self.spawn_rate == 0 {
                    return Err(invalid());
                }
            }
            "max_monsters" => self.max_monsters = value.parse().map_err(|_| invalid())?,
            _ => return Err(OptionsError::UnknownOption(name.to_string())),
        }
        Ok(())
    }

    pub fn save_to_file(&self, path: &Path) -> Result<(), OptionsError> {
        std::fs::write(path, self.to_config_string())?;
        Ok(())
    }

    /// Render as rc file lines
    pub fn to_config_string(&self) -> String {
        let flag = |on: bool, name: &str| {
            if on {
                name.to_string()
            } else {
                format!("!{}", name)
            }
        };
        let mut lines = vec![String::from("# delve options"), format!("OPTIONS=name:{}", self.name)];
        if let Some(role) = &self.role {
            lines.push(format!("OPTIONS=role:{}", role));
        }
        if let Some(race) = &self.race {
            lines.push(format!("OPTIONS=race:{}", race));
        }
        lines.push(format!(
            "OPTIONS={},{},{},{}",
            flag(self.autopickup, "autopickup"),
            flag(self.safe_pet, "safe_pet"),
            flag(self.verbose, "verbose"),
            flag(self.pet, "pet"),
        ));
        if !self.pickup_types.is_empty() {
            lines.push(format!("OPTIONS=pickup_types:{}", self.pickup_types));
        }
        lines.push(format!(
            "OPTIONS=spawn_rate:{},max_monsters:{}",
            self.spawn_rate, self.max_monsters
        ));
        lines.join("\n") + "\n"
    }

    pub fn to_json(&self) -> Result<String, OptionsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, OptionsError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = GameOptions::default();
        assert!(opts.autopickup);
        assert!(opts.safe_pet);
        assert_eq!(opts.pickup_types, "$");
        assert_eq!(opts.spawn_rate, 70);
    }

    #[test]
    fn test_parse_booleans() {
        let opts = GameOptions::parse_config("# comment\nOPTIONS=!autopickup,nopet, verbose").unwrap();
        assert!(!opts.autopickup);
        assert!(!opts.pet);
        assert!(opts.verbose);
    }

    #[test]
    fn test_parse_values() {
        let opts =
            GameOptions::parse_config("OPTIONS=name:Nox,role:wizard,race=elf,spawn_rate:20").unwrap();
        assert_eq!(opts.name, "Nox");
        assert_eq!(opts.role.as_deref(), Some("wizard"));
        assert_eq!(opts.race.as_deref(), Some("elf"));
        assert_eq!(opts.spawn_rate, 20);
    }

    #[test]
    fn test_name_starting_with_no_is_a_value() {
        let opts = GameOptions::parse_config("OPTIONS=name:nobody").unwrap();
        assert_eq!(opts.name, "nobody");
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            GameOptions::parse_config("OPTIONS=color"),
            Err(OptionsError::UnknownOption(_))
        ));
        assert!(matches!(
            GameOptions::parse_config("OPTIONS=spawn_rate:often"),
            Err(OptionsError::InvalidValue(..))
        ));
        assert!(matches!(
            GameOptions::parse_config("OPTIONS=spawn_rate:0"),
            Err(OptionsError::InvalidValue(..))
        ));
        assert!(matches!(
            GameOptions::parse_config("OPTIONS=name:"),
            Err(OptionsError::MissingValue(_))
        ));
    }

    #[test]
    fn test_config_roundtrip() {
        let opts = GameOptions {
            name: String::from("Tester"),
            role: Some(String::from("rogue")),
            autopickup: false,
            pickup_types: String::from("$!"),
            max_monsters: 12,
            ..Default::default()
        };
        let parsed = GameOptions::parse_config(&opts.to_config_string()).unwrap();
        assert_eq!(parsed, opts);

        let json = opts.to_json().unwrap();
        assert_eq!(GameOptions::from_json(&json).unwrap(), opts);
    }

    #[test]
    fn test_file_roundtrip() {
        let path = std::env::temp_dir().join(format!("delverc-test-{}", std::process::id()));
        let opts = GameOptions {
            verbose: false,
            ..Default::default()
        };
        opts.save_to_file(&path).unwrap();
        let loaded = GameOptions::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded, opts);
    }
}
