//! Monster system
//!
//! Contains the race table (permonst), instances (monst), generation,
//! movement and the per-turn AI.

mod ai;
mod casting;
mod data;
mod dog;
mod makemon;
mod monmove;
mod monst;
mod permonst;

pub use ai::{MonsterAction, disturb, dochug, set_apparxy};
pub use casting::{
    CastResult, ClericSpell, MageSpell, Spell, buzzmu, castmu, choose_clerical_spell,
    choose_magic_spell,
};
pub use data::{MONSTERS, race_by_name};
pub use dog::dog_move;
pub use makemon::{
    MakeMonFlags, SpawnContext, make_pet, makemon, peace_minded, rndmonst, spawn_random_monster,
};
pub use monmove::{m_move, mfndpos, rloc};
pub use monst::{Monster, MonsterId, MonsterState, SpeedState};
pub use permonst::{GenFlags, MonsterFlags, MonsterResistances, MonsterSize, PerMonst};
