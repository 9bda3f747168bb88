//! Deterministic random number generation.
//!
//! RULE: Nothing in the dashboard core may call any platform RNG.
//! Trend jitter, chart samples and the mock department summary all
//! draw from JitterRng instances derived from the master seed the
//! Dashboard was built with.
//!
//! Each slot gets its own stream, seeded from
//! (master_seed, slot index, render generation). This means:
//!   - Adding a new slot never changes existing slots' streams.
//!   - Two dashboards with the same seed render identical mock views.

use crate::types::Generation;
use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

/// A named, deterministic RNG for a single consumer.
pub struct JitterRng {
    pub name: &'static str,
    inner: Pcg64Mcg,
}

impl JitterRng {
    /// Create a jitter RNG from the master seed and a stable slot index.
    /// The index must never change once assigned.
    pub fn new(master_seed: u64, slot_index: u64) -> Self {
        let derived_seed = master_seed ^ (slot_index.wrapping_mul(0x9e37_79b9_7f4a_7c15));
        Self {
            name: "unnamed",
            inner: Pcg64Mcg::seed_from_u64(derived_seed),
        }
    }

    /// Convenience for tests and one-off callers that only need a seed.
    pub fn from_seed(seed: u64) -> Self {
        Self::new(seed, 0)
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        use rand::RngCore;
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Symmetric jitter: `(U - 0.5) * amplitude`, so the result lies in
    /// [-amplitude/2, amplitude/2).
    pub fn jitter(&mut self, amplitude: f64) -> f64 {
        (self.next_f64() - 0.5) * amplitude
    }
}

/// All jitter streams for one dashboard, indexed by stable slot.
#[derive(Debug, Clone)]
pub struct RngBank {
    master_seed: u64,
}

impl RngBank {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn seed(&self) -> u64 {
        self.master_seed
    }

    /// Stream for `slot` at a given render generation.
    pub fn for_slot(&self, slot: JitterSlot, generation: Generation) -> JitterRng {
        let seed = self
            .master_seed
            .wrapping_add(generation.wrapping_mul(0xbf58_476d_1ce4_e5b9));
        JitterRng::new(seed, slot as u64).with_name(slot.name())
    }
}

/// Stable slot assignments.
/// NEVER reorder or remove entries; only append.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum JitterSlot {
    Trend = 0,
    Chart = 1,
    DepartmentSummary = 2,
}

impl JitterSlot {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Trend => "trend",
            Self::Chart => "chart",
            Self::DepartmentSummary => "department_summary",
        }
    }
}
