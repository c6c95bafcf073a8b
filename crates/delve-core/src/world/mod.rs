//! Options and error types shared by the whole game

mod errors;
mod options;

pub use errors::GameError;
pub use options::{GameOptions, OptionsError};
