//! Shared primitive types used across the dashboard core.

/// Identifier of a LAG, LEAD or WIG measure.
pub type MetricId = String;

/// Monotonic render counter. Each render draws a fresh jitter stream.
pub type Generation = u64;

/// A flat record from a worksheet, keyed by column header.
pub type RawRow = std::collections::BTreeMap<String, String>;

/// Round half up, matching the dashboard's display rounding
/// (`-2.5` rounds to `-2`, `2.5` rounds to `3`).
pub fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}
