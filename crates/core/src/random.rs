//! Injectable randomness. Every weighted pick and random placement in the crate
//! draws from a `RandomSource`, so a seeded ChaCha stream or a scripted
//! sequence makes runs reproducible.

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::Rng;

pub trait RandomSource {
    fn next_u64(&mut self) -> u64;

    /// Uniform float in `[0, 1)`.
    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1_u64 << 53) as f64
    }

    /// Uniform index in `0..upper`. Returns 0 when `upper` is 0.
    fn below(&mut self, upper: usize) -> usize {
        if upper == 0 {
            return 0;
        }
        (self.next_f64() * upper as f64) as usize % upper
    }

    fn chance(&mut self, probability: f64) -> bool {
        self.next_f64() < probability
    }
}

impl RandomSource for ChaCha8Rng {
    fn next_u64(&mut self) -> u64 {
        Rng::next_u64(self)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn next_u64(&mut self) -> u64 {
        (**self).next_u64()
    }
}

/// Replays a fixed list of unit floats, cycling when exhausted.
#[derive(Clone, Debug)]
pub struct SequenceRandom {
    values: Vec<f64>,
    cursor: usize,
}

impl SequenceRandom {
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        let values = values.into();
        Self { values: if values.is_empty() { vec![0.0] } else { values }, cursor: 0 }
    }
}

impl RandomSource for SequenceRandom {
    fn next_u64(&mut self) -> u64 {
        (self.next_f64() * (1_u64 << 53) as f64) as u64
    }

    fn next_f64(&mut self) -> f64 {
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value.clamp(0.0, 1.0 - f64::EPSILON)
    }
}

/// Walks a cursor over the non-negative weights. With a zero total the first
/// entry wins; `None` only for an empty slice.
pub fn weighted_pick<T: Copy>(rng: &mut dyn RandomSource, entries: &[(T, f64)]) -> Option<T> {
    let first = entries.first()?.0;
    let total: f64 = entries.iter().map(|(_, weight)| weight.max(0.0)).sum();
    if total <= 0.0 {
        return Some(first);
    }

    let mut cursor = rng.next_f64() * total;
    for &(entry, weight) in entries {
        let weight = weight.max(0.0);
        if cursor < weight {
            return Some(entry);
        }
        cursor -= weight;
    }
    entries.last().map(|(entry, _)| *entry)
}

pub fn shuffle<T>(rng: &mut dyn RandomSource, items: &mut [T]) {
    for i in (1..items.len()).rev() {
        let j = rng.below(i + 1);
        items.swap(i, j);
    }
}

/// Removes and returns a uniformly chosen element.
pub fn take_random<T>(rng: &mut dyn RandomSource, pool: &mut Vec<T>) -> Option<T> {
    if pool.is_empty() {
        return None;
    }
    let index = rng.below(pool.len());
    Some(pool.remove(index))
}

pub fn choose<T: Copy>(rng: &mut dyn RandomSource, items: &[T]) -> Option<T> {
    if items.is_empty() {
        return None;
    }
    Some(items[rng.below(items.len())])
}
