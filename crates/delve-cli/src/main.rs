//! delve: a small dungeon crawler in the NetHack tradition
//!
//! Plays in line mode on stdin/stdout, or lets a bot play for a number of
//! turns with `--autoplay`.

mod bot;
mod input;
mod render;

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use delve_core::action::Command;
use delve_core::world::GameOptions;
use delve_core::{GameLoop, GameLoopResult, GameRng, GameState};

use crate::input::{Input, parse_line};

/// Explore the dungeon, one command per line
#[derive(Parser, Debug)]
#[command(name = "delve")]
#[command(author, version, about = "delve - a turn-based dungeon crawler", long_about = None)]
struct Args {
    /// RNG seed; a random one is used when absent
    #[arg(long)]
    seed: Option<u64>,

    /// Options file (OPTIONS= lines); defaults to the user config dir
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Player name
    #[arg(short = 'u', long = "name")]
    name: Option<String>,

    /// Role (e.g. Valkyrie, Wizard, Samurai)
    #[arg(short = 'p', long = "role")]
    role: Option<String>,

    /// Race (e.g. Human, Elf, Dwarf)
    #[arg(short = 'r', long = "race")]
    race: Option<String>,

    /// Let the bot play for this many turns
    #[arg(long, value_name = "TURNS")]
    autoplay: Option<u64>,

    /// Log filter, e.g. "info" or "delve_core=debug"
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Write the final game state as JSON
    #[arg(long, value_name = "PATH")]
    dump_json: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level);

    let options = load_options(&args)?;
    let rng = match args.seed {
        Some(seed) => GameRng::new(seed),
        None => GameRng::from_entropy(),
    };
    info!(seed = rng.seed(), "starting game");
    let state = GameState::new(rng, options).context("could not create a character")?;
    let mut game = GameLoop::new(state);

    let outcome = match args.autoplay {
        Some(turns) => bot::autoplay(&mut game, turns),
        None => play(&mut game)?,
    };
    print_summary(game.state(), &outcome);

    if let Some(path) = &args.dump_json {
        dump_json(game.state(), path)?;
    }
    Ok(())
}

fn init_logging(level: &str) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = log_filter(rust_log.as_deref(), level);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// RUST_LOG directives win over the `--log-level` default
fn log_filter(rust_log: Option<&str>, level: &str) -> EnvFilter {
    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .or_else(|| EnvFilter::try_new(level).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"))
}

/// Default rc file location
fn default_config_path() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("delve");
    path.push("delverc");
    path
}

/// Options from the rc file, then overridden by the command line
fn load_options(args: &Args) -> Result<GameOptions> {
    let mut options = match &args.config {
        Some(path) => GameOptions::load_from_file(path)
            .with_context(|| format!("reading options from {}", path.display()))?,
        None => {
            let path = default_config_path();
            if path.exists() {
                GameOptions::load_from_file(&path).unwrap_or_else(|err| {
                    warn!(path = %path.display(), %err, "ignoring unreadable options file");
                    GameOptions::default()
                })
            } else {
                GameOptions::default()
            }
        }
    };
    if let Some(name) = &args.name {
        options.name = name.clone();
    }
    if args.role.is_some() {
        options.role = args.role.clone();
    }
    if args.race.is_some() {
        options.race = args.race.clone();
    }
    Ok(options)
}

/// Interactive line mode
fn play(game: &mut GameLoop) -> Result<GameLoopResult> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    show(game, &mut stdout)?;

    for line in stdin.lock().lines() {
        let line = line.context("reading stdin")?;
        let command = match parse_line(&line) {
            Input::Command(command) => command,
            Input::Inventory => {
                writeln!(stdout, "{}", render::inventory(game.state()))?;
                continue;
            }
            Input::Help => {
                writeln!(stdout, "{}", input::HELP)?;
                continue;
            }
            Input::Invalid(msg) => {
                writeln!(stdout, "{}", msg)?;
                continue;
            }
            Input::Empty => continue,
        };
        let quitting = command == Command::Quit;
        let result = game.tick(command);
        show(game, &mut stdout)?;
        match result {
            GameLoopResult::Continue if !quitting => {}
            other => return Ok(other),
        }
    }
    Ok(GameLoopResult::PlayerQuit)
}

/// Print pending messages, the map and the status lines
fn show(game: &mut GameLoop, out: &mut impl Write) -> io::Result<()> {
    for msg in game.state_mut().take_messages() {
        writeln!(out, "{}", msg)?;
    }
    writeln!(out, "{}", render::map(game.state()))?;
    writeln!(out, "{}", render::status(game.state()))?;
    out.flush()
}

fn print_summary(state: &GameState, outcome: &GameLoopResult) {
    let ending = match outcome {
        GameLoopResult::PlayerDied(reason) => format!("died: {}", reason),
        GameLoopResult::PlayerQuit => String::from("quit"),
        GameLoopResult::Continue => String::from("still alive"),
    };
    println!(
        "{} the {}: {} on turn {}, depth {} (max {}), level {}, {} kills, {} gold.",
        state.player.name,
        state.player.role,
        ending,
        state.turns,
        state.current_level.depth,
        state.player.max_depth,
        state.player.exp_level,
        state.player.kills,
        state.player.gold,
    );
}

fn dump_json(state: &GameState, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(state).context("serializing game state")?;
    std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    info!(path = %path.display(), "dumped game state");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn test_rust_log_overrides_log_level() {
        let filter = log_filter(Some("debug"), "warn");
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn test_log_level_used_without_rust_log() {
        assert_eq!(
            log_filter(None, "info").max_level_hint(),
            Some(LevelFilter::INFO)
        );
        assert_eq!(
            log_filter(Some("  "), "error").max_level_hint(),
            Some(LevelFilter::ERROR)
        );
    }
}
