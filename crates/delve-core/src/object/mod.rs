//! Objects: the static kind table and item instances

mod data;
mod obj;
mod objclass;

pub use data::{ObjKind, OBJECTS, kind_by_name, kinds};
pub use obj::{BucStatus, Object, ObjectId, WornMask};
pub use objclass::{ArmorSlot, ObjectClass};
