//! Trend chart series: one point per selected month.

use crate::{period::MonthKey, rng::JitterRng};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub month: MonthKey,
    pub label: String,
    pub wig: f64,
    pub lag: f64,
    pub lead: f64,
    pub activity: f64,
}

impl ChartPoint {
    /// Bar width for the activity series, which runs on a larger scale.
    pub fn activity_bar(&self) -> f64 {
        (self.activity / 2.0).min(100.0)
    }
}

pub fn trend_series(months: &[MonthKey], rng: &mut JitterRng) -> Vec<ChartPoint> {
    months
        .iter()
        .map(|m| ChartPoint {
            month: *m,
            label: m.display(),
            wig: 75.0 + rng.next_f64() * 20.0,
            lag: 70.0 + rng.next_f64() * 25.0,
            lead: 80.0 + rng.next_f64() * 15.0,
            activity: 140.0 + rng.next_f64() * 30.0,
        })
        .collect()
}
