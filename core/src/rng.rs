//! Seeded random number generation.
//!
//! RULE: Nothing in the generator may call the thread RNG directly.
//! All randomness flows through StreamRng instances derived from the
//! single master seed held by the RngBank. The one exception is
//! `RngBank::from_entropy`, which draws that master seed when none is given.
//!
//! Each stream slot gets its own RNG, seeded from (master_seed XOR slot).
//! Per-kiosk streams additionally mix in the kiosk ID, so one kiosk's
//! output does not depend on which other kiosks were present or skipped.

use rand::{seq::index, Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;

const GOLDEN_GAMMA: u64 = 0x9e37_79b9_7f4a_7c15;

/// A named, seeded RNG for one stream of work.
pub struct StreamRng {
    pub name: &'static str,
    inner:    Pcg64Mcg,
}

impl StreamRng {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            name: "unnamed",
            inner: Pcg64Mcg::seed_from_u64(seed),
        }
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        self.inner.gen::<f64>()
    }

    /// Roll a u64 in [0, n).
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        assert!(n > 0, "n must be > 0");
        self.inner.gen_range(0..n)
    }

    /// Roll a u64 uniformly in [lo, hi]. Both ends inclusive.
    pub fn range_inclusive(&mut self, lo: u64, hi: u64) -> u64 {
        assert!(lo <= hi, "empty range {lo}..={hi}");
        self.inner.gen_range(lo..=hi)
    }

    /// Signed variant of `range_inclusive`, for ranges that may dip below zero.
    pub fn range_inclusive_i64(&mut self, lo: i64, hi: i64) -> i64 {
        assert!(lo <= hi, "empty range {lo}..={hi}");
        self.inner.gen_range(lo..=hi)
    }

    /// Bernoulli trial: returns true with probability p.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Draw `amount` distinct indices from [0, len), in random order.
    pub fn sample_indices(&mut self, len: usize, amount: usize) -> Vec<usize> {
        index::sample(&mut self.inner, len, amount.min(len)).into_vec()
    }

    /// Uniform pick from a slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let i = self.next_u64_below(items.len() as u64) as usize;
        items.get(i)
    }
}

/// All RNG streams for a single run, derived from one master seed.
pub struct RngBank {
    master_seed: u64,
}

impl RngBank {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    /// Seed the bank from OS entropy. The seed is logged so the run can
    /// be replayed with `RngBank::new`.
    pub fn from_entropy() -> Self {
        let seed: u64 = rand::random();
        log::info!("rng: no seed supplied, using master seed {seed}");
        Self::new(seed)
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    pub fn for_stream(&self, slot: StreamSlot) -> StreamRng {
        let seed = self.master_seed ^ (slot as u64).wrapping_mul(GOLDEN_GAMMA);
        StreamRng::from_seed(seed).with_name(slot.name())
    }

    /// A stream dedicated to one kiosk within a slot.
    pub fn for_kiosk(&self, slot: StreamSlot, kiosk_id: &str) -> StreamRng {
        let seed = self.master_seed
            ^ (slot as u64).wrapping_mul(GOLDEN_GAMMA)
            ^ fnv1a(kiosk_id.as_bytes()).rotate_left(17);
        StreamRng::from_seed(seed).with_name(slot.name())
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(0xcbf2_9ce4_8422_2325, |hash, b| {
        (hash ^ u64::from(*b)).wrapping_mul(0x0100_0000_01b3)
    })
}

/// Stable stream slot assignments.
/// NEVER reorder or remove entries; only append.
/// Reordering changes every stream's seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum StreamSlot {
    Registry = 0,
    Cohort = 1,
    Transaction = 2,
}

impl StreamSlot {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Registry => "registry",
            Self::Cohort => "cohort",
            Self::Transaction => "transaction",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let bank = RngBank::new(12345);
        let mut a = bank.for_stream(StreamSlot::Registry);
        let mut b = bank.for_stream(StreamSlot::Registry);
        for _ in 0..32 {
            assert_eq!(a.range_inclusive(0, 9999), b.range_inclusive(0, 9999));
        }
    }

    #[test]
    fn kiosk_streams_diverge() {
        let bank = RngBank::new(12345);
        let mut a = bank.for_kiosk(StreamSlot::Transaction, "0001");
        let mut b = bank.for_kiosk(StreamSlot::Transaction, "0002");
        let xs: Vec<u64> = (0..16).map(|_| a.next_u64_below(1_000_000)).collect();
        let ys: Vec<u64> = (0..16).map(|_| b.next_u64_below(1_000_000)).collect();
        assert_ne!(xs, ys);
    }

    #[test]
    fn sample_indices_are_distinct_and_in_range() {
        let mut rng = RngBank::new(7).for_stream(StreamSlot::Cohort);
        let mut picked = rng.sample_indices(50, 20);
        assert_eq!(picked.len(), 20);
        assert!(picked.iter().all(|&i| i < 50));
        picked.sort_unstable();
        picked.dedup();
        assert_eq!(picked.len(), 20);
    }

    #[test]
    fn range_inclusive_hits_both_ends() {
        let mut rng = RngBank::new(3).for_stream(StreamSlot::Transaction);
        let draws: Vec<u64> = (0..500).map(|_| rng.range_inclusive(4, 6)).collect();
        assert!(draws.contains(&4));
        assert!(draws.contains(&6));
        assert!(draws.iter().all(|d| (4..=6).contains(d)));
    }
}
