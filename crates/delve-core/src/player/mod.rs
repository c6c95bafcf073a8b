//! Player character: identity, attributes, properties and derived status

mod attributes;
mod properties;
mod role;
mod status;
mod you;

pub use attributes::{Attribute, Attributes};
pub use properties::{Property, PropertyFlags, PropertySet};
pub use role::{Race, Role};
pub use status::{
    HungerEvent, calc_encumbrance, damage_bonus, digest, exp_for_level, gain_experience,
    hit_bonus, inventory_weight, losexp, newexplevel, player_move_amount, recalc_status,
    regenerate, weight_cap,
};
pub use you::{Encumbrance, HungerState, You};
