//! Core game constants

/// Map dimensions
pub const COLNO: usize = 80;
pub const ROWNO: usize = 21;

/// Movement energy needed for one action
pub const NORMAL_SPEED: i16 = 12;

/// Maximum number of attacks per monster race
pub const NATTK: usize = 6;

/// Longest line along which monsters throw, spit and breathe
pub const BOLT_LIM: i32 = 8;

/// Cells a ray travels before it fizzles
pub const RAY_RANGE: i32 = 20;

/// Maximum player experience level
pub const MAXULEV: u8 = 30;

/// Base armor class (no armor)
pub const BASE_AC: i8 = 10;

/// Messages kept in the history buffer
pub const MSG_HISTORY: usize = 100;

/// Deepest generated floor
pub const MAX_DEPTH: i32 = 50;

/// Map symbols
pub const S_STONE: char = ' ';
pub const S_VWALL: char = '|';
pub const S_HWALL: char = '-';
pub const S_ROOM: char = '.';
pub const S_CORR: char = '#';
pub const S_UPSTAIR: char = '<';
pub const S_DNSTAIR: char = '>';
pub const S_FOUNTAIN: char = '{';
pub const S_POOL: char = '}';
pub const S_VODOOR: char = '|';
pub const S_NDOOR: char = '.';
pub const S_CDOOR: char = '+';
pub const S_TRAP: char = '^';
pub const S_PLAYER: char = '@';
