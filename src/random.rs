use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const MULTIPLIER_A: i64 = 1103515245;
const INCREMENT_C: i64 = 12345;
const DEFAULT_SEED: i64 = 3819201;

/// A source of randomness injected into the search.
///
/// Expansion and playout moves are drawn from it, so a deterministic generator makes
/// a whole search reproducible.
pub trait RandomGenerator: Default {
    fn next(&mut self) -> u32;

    /// Returns a number in `from..to`, or `from` when the range is empty.
    fn next_range(&mut self, from: usize, to: usize) -> usize;

    /// Picks one element uniformly, or `None` for an empty slice.
    fn choose<'a, K>(&mut self, items: &'a [K]) -> Option<&'a K> {
        if items.is_empty() {
            return None;
        }
        items.get(self.next_range(0, items.len()))
    }
}

/// Thread-local entropy from `rand`.
#[derive(Debug, Default)]
pub struct StandardRandomGenerator;

impl RandomGenerator for StandardRandomGenerator {
    fn next(&mut self) -> u32 {
        rand::random()
    }

    fn next_range(&mut self, from: usize, to: usize) -> usize {
        if to <= from {
            return from;
        }
        rand::rng().random_range(from..to)
    }
}

/// A linear congruential generator producing the same sequence on every platform.
#[derive(Debug)]
pub struct CustomNumberGenerator {
    seed: i64,
}

impl Default for CustomNumberGenerator {
    fn default() -> Self {
        CustomNumberGenerator::new(DEFAULT_SEED)
    }
}

impl RandomGenerator for CustomNumberGenerator {
    fn next(&mut self) -> u32 {
        self.seed = (self.seed * MULTIPLIER_A + INCREMENT_C) % (i32::MAX as i64);
        self.seed as u32
    }

    fn next_range(&mut self, from: usize, to: usize) -> usize {
        if to <= from {
            return from;
        }
        (self.next() as usize) % (to - from) + from
    }
}

impl CustomNumberGenerator {
    pub const fn new(seed: i64) -> Self {
        Self { seed }
    }
}

/// `StdRng` seeded from a `u64`.
#[derive(Debug)]
pub struct SeededRandomGenerator {
    rng: StdRng,
}

impl SeededRandomGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for SeededRandomGenerator {
    fn default() -> Self {
        SeededRandomGenerator::new(DEFAULT_SEED as u64)
    }
}

impl RandomGenerator for SeededRandomGenerator {
    fn next(&mut self) -> u32 {
        self.rng.random()
    }

    fn next_range(&mut self, from: usize, to: usize) -> usize {
        if to <= from {
            return from;
        }
        self.rng.random_range(from..to)
    }
}
