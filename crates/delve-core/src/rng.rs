//! Seeded dice
//!
//! Every game draws from one ChaCha8 stream, so a seed replays the same game.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// The game's dice. Serializes as its seed alone; restoring one restarts
/// the stream from the beginning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "u64", into = "u64")]
pub struct GameRng {
    stream: ChaCha8Rng,
    seed: u64,
}

impl From<u64> for GameRng {
    fn from(seed: u64) -> Self {
        GameRng::new(seed)
    }
}

impl From<GameRng> for u64 {
    fn from(rng: GameRng) -> Self {
        rng.seed
    }
}

impl GameRng {
    pub fn new(seed: u64) -> Self {
        GameRng {
            stream: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Seeded from the thread RNG
    pub fn from_entropy() -> Self {
        GameRng::new(rand::random())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// 0..n; 0 for n == 0
    pub fn rn2(&mut self, n: u32) -> u32 {
        match n {
            0 => 0,
            n => self.stream.gen_range(0..n),
        }
    }

    /// 1..=n; 0 for n == 0
    pub fn rnd(&mut self, n: u32) -> u32 {
        match n {
            0 => 0,
            n => self.stream.gen_range(1..=n),
        }
    }

    /// x + rn2(y)
    pub fn rn1(&mut self, y: u32, x: u32) -> u32 {
        x + self.rn2(y)
    }

    /// Sum of `n` rolls of a `sides`-sided die
    pub fn dice(&mut self, n: u32, sides: u32) -> u32 {
        let mut total = 0;
        for _ in 0..n {
            total += self.rnd(sides);
        }
        total
    }

    /// rn2 nudged by luck: good luck pulls the result toward 0. Small
    /// ranges only feel a third of the luck.
    pub fn rnl(&mut self, n: u32, luck: i8) -> u32 {
        if n == 0 {
            return 0;
        }
        let luck = luck as i32;
        let nudge = if n <= 15 { (luck + 1) / 3 } else { luck };
        let roll = self.rn2(n) as i32;
        let roll = if nudge != 0 && !self.one_in(37 + nudge.unsigned_abs()) {
            roll - nudge
        } else {
            roll
        };
        roll.clamp(0, n as i32 - 1) as u32
    }

    pub fn one_in(&mut self, n: u32) -> bool {
        self.rn2(n) == 0
    }

    pub fn percent(&mut self, chance: u32) -> bool {
        self.rn2(100) < chance
    }

    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut self.stream)
    }

    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.stream);
    }
}

impl Default for GameRng {
    fn default() -> Self {
        GameRng::from_entropy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_same_seed_same_rolls() {
        let mut a = GameRng::new(42);
        let mut b = GameRng::new(42);
        let rolls_a: Vec<u32> = (0..64).map(|_| a.rnd(20)).collect();
        let rolls_b: Vec<u32> = (0..64).map(|_| b.rnd(20)).collect();
        assert_eq!(rolls_a, rolls_b);
    }

    #[test]
    fn test_degenerate_ranges() {
        let mut rng = GameRng::new(5);
        assert_eq!(rng.rn2(0), 0);
        assert_eq!(rng.rnd(0), 0);
        assert_eq!(rng.rnl(0, 5), 0);
        assert_eq!(rng.dice(0, 6), 0);
        assert_eq!(rng.dice(3, 0), 0);
        assert_eq!(rng.choose::<u8>(&[]), None);
    }

    #[test]
    fn test_json_holds_only_the_seed() {
        let rng = GameRng::new(1234);
        let json = serde_json::to_string(&rng).unwrap();
        assert_eq!(json, "1234");
        let back: GameRng = serde_json::from_str(&json).unwrap();
        assert_eq!(back.seed(), 1234);
    }

    #[test]
    fn test_luck_skews_rnl() {
        let mut lucky = GameRng::new(7);
        let mut unlucky = GameRng::new(7);
        let lucky_sum: u32 = (0..500).map(|_| lucky.rnl(10, 10)).sum();
        let unlucky_sum: u32 = (0..500).map(|_| unlucky.rnl(10, -10)).sum();
        assert!(lucky_sum < unlucky_sum);
    }

    #[test]
    fn test_shuffle_keeps_elements() {
        let mut rng = GameRng::new(3);
        let mut items: Vec<u32> = (0..20).collect();
        rng.shuffle(&mut items);
        items.sort_unstable();
        assert_eq!(items, (0..20).collect::<Vec<_>>());
    }

    proptest! {
        #[test]
        fn rn2_stays_below_bound(seed in any::<u64>(), n in 1u32..1000) {
            let mut rng = GameRng::new(seed);
            for _ in 0..50 {
                prop_assert!(rng.rn2(n) < n);
            }
        }

        #[test]
        fn dice_within_range(seed in any::<u64>(), n in 1u32..10, sides in 1u32..20) {
            let mut rng = GameRng::new(seed);
            let roll = rng.dice(n, sides);
            prop_assert!((n..=n * sides).contains(&roll));
        }

        #[test]
        fn rnl_within_range(seed in any::<u64>(), n in 1u32..40, luck in -13i8..=13) {
            let mut rng = GameRng::new(seed);
            prop_assert!(rng.rnl(n, luck) < n);
        }
    }
}
