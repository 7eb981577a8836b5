//! Deterministic random number generation.
//!
//! RULE: Nothing in the generator may call any platform RNG.
//! All randomness flows through StreamRng instances derived
//! from the single master seed in GeneratorConfig.
//!
//! Each generator gets its own stream, seeded from
//! (master_seed XOR slot_index), and every injector pass gets a
//! further offset on top of its generator's slot. This means:
//!   - Adding a new pass never changes existing passes' row selections.
//!   - Each pass is fully reproducible in isolation.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

const GOLDEN_GAMMA: u64 = 0x9e37_79b9_7f4a_7c15;

/// Largest Poisson mean drawn in a single multiplication loop.
/// Bigger means are split into chunks and summed.
const POISSON_CHUNK: f64 = 500.0;

/// A named, deterministic RNG for a single generator or pass.
pub struct StreamRng {
    pub name: &'static str,
    inner: Pcg64Mcg,
}

impl StreamRng {
    /// Create a stream from the master seed and a stable stream index.
    /// The index must never change once assigned.
    pub fn new(master_seed: u64, stream_index: u64) -> Self {
        let derived_seed = master_seed ^ stream_index.wrapping_mul(GOLDEN_GAMMA);
        Self {
            name: "unnamed",
            inner: Pcg64Mcg::seed_from_u64(derived_seed),
        }
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Draw a raw u64 (full range).
    pub fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    /// Roll a u64 in [0, n).
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        assert!(n > 0, "n must be > 0");
        self.inner.next_u64() % n
    }

    /// Roll an i64 in [low, high]. Callers guarantee low <= high.
    pub fn range_inclusive(&mut self, low: i64, high: i64) -> i64 {
        assert!(low <= high, "empty range {low}..={high}");
        let offset = match (high.wrapping_sub(low) as u64).checked_add(1) {
            Some(span) => self.next_u64_below(span),
            None => self.next_u64(),
        };
        low.wrapping_add(offset as i64)
    }

    /// Bernoulli trial: returns true with probability p.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Uniform pick from a non-empty slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.next_u64_below(items.len() as u64) as usize]
    }

    /// Fill 16 bytes, used for identity tokens.
    pub fn next_bytes_16(&mut self) -> [u8; 16] {
        let mut bytes = [0u8; 16];
        self.inner.fill_bytes(&mut bytes);
        bytes
    }

    /// Sample from a normal distribution (Box-Muller).
    pub fn normal(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-12);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + z * std_dev
    }

    /// Sample from a Poisson distribution with mean `lambda`.
    /// Non-positive means always return 0.
    pub fn poisson(&mut self, lambda: f64) -> u64 {
        let mut remaining = lambda;
        let mut total = 0;
        while remaining > 0.0 {
            let chunk = remaining.min(POISSON_CHUNK);
            total += self.poisson_small(chunk);
            remaining -= chunk;
        }
        total
    }

    // Knuth's multiplication method; fine while exp(-lambda) stays normal.
    fn poisson_small(&mut self, lambda: f64) -> u64 {
        let limit = (-lambda).exp();
        let mut k = 0;
        let mut p = self.next_f64();
        while p > limit {
            k += 1;
            p *= self.next_f64();
        }
        k
    }

    /// Partial Fisher-Yates: `count` distinct indices from [0, len),
    /// in draw order. Callers guarantee count <= len.
    pub fn sample_indices(&mut self, len: usize, count: usize) -> Vec<usize> {
        assert!(count <= len, "cannot sample {count} of {len}");
        let mut pool: Vec<usize> = (0..len).collect();
        for i in 0..count {
            let j = i + self.next_u64_below((len - i) as u64) as usize;
            pool.swap(i, j);
        }
        pool.truncate(count);
        pool
    }
}

/// All streams for a single run, indexed by stable slot.
pub struct RngBank {
    master_seed: u64,
}

impl RngBank {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    pub fn for_stream(&self, slot: StreamSlot) -> StreamRng {
        StreamRng::new(self.master_seed, slot as u64).with_name(slot.name())
    }

    /// Stream for the `pass`-th injector pass of a generator.
    /// Offsets live in the upper half so they never alias a slot.
    pub fn for_pass(&self, slot: StreamSlot, pass: usize) -> StreamRng {
        let index = ((slot as u64) << 32) | (pass as u64 + 1);
        StreamRng::new(self.master_seed, index).with_name(slot.name())
    }
}

/// Stable stream slot assignments.
/// NEVER reorder or remove entries, only append.
/// Reordering changes every stream's seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum StreamSlot {
    Users = 0,
    UserDefects = 1,
    Subscriptions = 2,
    Events = 3,
    Surveys = 4,
    Experiments = 5,
    // Add new streams here, append only.
}

impl StreamSlot {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::UserDefects => "user_defects",
            Self::Subscriptions => "subscriptions",
            Self::Events => "events",
            Self::Surveys => "surveys",
            Self::Experiments => "experiments",
        }
    }
}
