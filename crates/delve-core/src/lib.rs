//! delve-core: game rules for the delve dungeon crawler
//!
//! Holds the floor model, the monster registry, the energy scheduler and
//! every attack and spell resolver. Performs no terminal I/O.

/// Serialize a bitflags type as its raw bits.
macro_rules! impl_bits_serde {
    ($ty:ty, $bits:ty) => {
        impl serde::Serialize for $ty {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serde::Serialize::serialize(&self.bits(), serializer)
            }
        }

        impl<'de> serde::Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let bits = <$bits as serde::Deserialize>::deserialize(deserializer)?;
                Ok(<$ty>::from_bits_truncate(bits))
            }
        }
    };
}

pub mod action;
pub mod combat;
pub mod dungeon;
pub mod monster;
pub mod object;
pub mod player;
pub mod world;

mod consts;
mod gameloop;
mod rng;

pub use consts::*;
pub use gameloop::{GameLoop, GameLoopResult, GameState};
pub use rng::GameRng;
