//! Player intrinsic, extrinsic and timed properties
//!
//! A property is active when any of its sources is: an intrinsic flag,
//! a worn item, or a running timeout.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};

use crate::object::WornMask;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
#[repr(u8)]
pub enum Property {
    // Resistances
    FireRes = 0,
    ColdRes = 1,
    SleepRes = 2,
    ShockRes = 3,
    PoisonRes = 4,
    AcidRes = 5,
    DisintRes = 6,
    DrainRes = 7,

    // Abilities
    SeeInvisible = 8,
    Invisible = 9,
    Stealth = 10,
    FreeAction = 11,
    Reflection = 12,
    MagicResistance = 13,
    Regeneration = 14,
    Protection = 15,
    Fast = 16,
    VeryFast = 17,
    Aggravate = 18,

    // Ailments, always timed
    Confusion = 19,
    Stunned = 20,
    Blinded = 21,
    Paralyzed = 22,
    Asleep = 23,
    Slowed = 24,
}

impl Property {
    pub const COUNT: usize = Property::Slowed as usize + 1;

    pub const fn is_ailment(&self) -> bool {
        (*self as u8) >= Property::Confusion as u8
    }

    /// Message shown when a timed property runs out
    pub const fn expiry_message(&self) -> Option<&'static str> {
        match self {
            Property::Confusion => Some("You feel less confused now."),
            Property::Stunned => Some("You feel a bit steadier now."),
            Property::Blinded => Some("You can see again."),
            Property::Paralyzed => Some("You can move again."),
            Property::Asleep => Some("You wake up."),
            Property::Slowed => Some("You feel yourself speed up."),
            Property::VeryFast => Some("You feel yourself slowing down."),
            Property::Invisible => Some("You are no longer invisible."),
            _ => None,
        }
    }
}

bitflags! {
    /// Sources of a property
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PropertyFlags: u32 {
        const INTRINSIC = 0x0001;
        const TIMEOUT = 0x0002;
        /// Worn item sources use the item's WornMask bits shifted left by 8
        const EXTRINSIC = 0x00ff_ff00;
    }
}

impl_bits_serde!(PropertyFlags, u32);

impl PropertyFlags {
    pub fn from_worn(mask: WornMask) -> Self {
        PropertyFlags::from_bits_truncate((mask.bits() as u32) << 8)
    }
}

/// The player's property table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySet {
    flags: Vec<PropertyFlags>,
    timeouts: Vec<u32>,
}

impl Default for PropertySet {
    fn default() -> Self {
        Self {
            flags: vec![PropertyFlags::empty(); Property::COUNT],
            timeouts: vec![0; Property::COUNT],
        }
    }
}

impl PropertySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has(&self, prop: Property) -> bool {
        !self.flags[prop as usize].is_empty()
    }

    pub fn has_intrinsic(&self, prop: Property) -> bool {
        self.flags[prop as usize].contains(PropertyFlags::INTRINSIC)
    }

    pub fn has_extrinsic(&self, prop: Property) -> bool {
        self.flags[prop as usize].intersects(PropertyFlags::EXTRINSIC)
    }

    pub fn grant_intrinsic(&mut self, prop: Property) {
        self.flags[prop as usize].insert(PropertyFlags::INTRINSIC);
    }

    pub fn remove_intrinsic(&mut self, prop: Property) {
        self.flags[prop as usize].remove(PropertyFlags::INTRINSIC);
    }

    /// Replace every extrinsic source with those in `sources`
    pub fn set_extrinsics(&mut self, sources: &[(Property, WornMask)]) {
        for flags in &mut self.flags {
            flags.remove(PropertyFlags::EXTRINSIC);
        }
        for &(prop, mask) in sources {
            self.flags[prop as usize].insert(PropertyFlags::from_worn(mask));
        }
    }

    pub fn timeout(&self, prop: Property) -> u32 {
        self.timeouts[prop as usize]
    }

    pub fn set_timeout(&mut self, prop: Property, turns: u32) {
        self.timeouts[prop as usize] = turns;
        if turns > 0 {
            self.flags[prop as usize].insert(PropertyFlags::TIMEOUT);
        } else {
            self.flags[prop as usize].remove(PropertyFlags::TIMEOUT);
        }
    }

    /// Extend a running timeout (incr_itimeout)
    pub fn incr_timeout(&mut self, prop: Property, turns: u32) {
        let current = self.timeouts[prop as usize];
        self.set_timeout(prop, current.saturating_add(turns));
    }

    /// Count down every timeout; returns properties whose timer just ran out
    pub fn tick_timeouts(&mut self) -> Vec<Property> {
        let mut expired = Vec::new();
        for prop in Property::iter() {
            let i = prop as usize;
            if self.timeouts[i] > 0 {
                self.timeouts[i] -= 1;
                if self.timeouts[i] == 0 {
                    self.flags[i].remove(PropertyFlags::TIMEOUT);
                    if !self.has(prop) {
                        expired.push(prop);
                    }
                }
            }
        }
        expired
    }
}
