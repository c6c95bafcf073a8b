//! Rectangular rooms

use serde::{Deserialize, Serialize};

use super::Position;
use crate::GameRng;

/// A room's interior bounds, inclusive; walls surround it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub lx: i8,
    pub ly: i8,
    pub hx: i8,
    pub hy: i8,
    pub lit: bool,
}

impl Room {
    pub fn new(lx: i8, ly: i8, hx: i8, hy: i8) -> Self {
        Self {
            lx,
            ly,
            hx,
            hy,
            lit: true,
        }
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= self.lx && pos.x <= self.hx && pos.y >= self.ly && pos.y <= self.hy
    }

    /// True when the rooms, with `margin` cells of padding, overlap
    pub fn overlaps(&self, other: &Room, margin: i8) -> bool {
        self.lx - margin <= other.hx
            && other.lx - margin <= self.hx
            && self.ly - margin <= other.hy
            && other.ly - margin <= self.hy
    }

    pub fn center(&self) -> Position {
        Position::new(
            self.lx + (self.hx - self.lx) / 2,
            self.ly + (self.hy - self.ly) / 2,
        )
    }

    /// Random interior cell (somexy)
    pub fn random_pos(&self, rng: &mut GameRng) -> Position {
        let w = (self.hx - self.lx + 1) as u32;
        let h = (self.hy - self.ly + 1) as u32;
        Position::new(
            self.lx + rng.rn2(w) as i8,
            self.ly + rng.rn2(h) as i8,
        )
    }

    pub fn area(&self) -> i32 {
        (self.hx - self.lx + 1) as i32 * (self.hy - self.ly + 1) as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_with_margin() {
        let a = Room::new(5, 5, 10, 8);
        let b = Room::new(12, 5, 15, 8);
        assert!(!a.overlaps(&b, 1));
        assert!(a.overlaps(&b, 2));
        assert!(a.overlaps(&a, 0));
    }

    #[test]
    fn test_random_pos_inside() {
        let room = Room::new(3, 4, 6, 5);
        let mut rng = GameRng::new(4);
        for _ in 0..100 {
            assert!(room.contains(room.random_pos(&mut rng)));
        }
        assert_eq!(room.area(), 8);
    }

    #[test]
    fn test_center_of_far_right_room() {
        let room = Room::new(70, 15, 78, 19);
        assert_eq!(room.center(), Position::new(74, 17));
        assert!(room.contains(room.center()));
        assert_eq!(Room::new(3, 4, 6, 5).center(), Position::new(4, 4));
    }
}
