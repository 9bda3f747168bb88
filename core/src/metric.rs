//! The 4DX metric records: LAG measures own their LEAD measures,
//! WIG records stand alone, Activity rows are kept raw.
//!
//! Every record exposes the same derived fields through `Measure`.
//! Achievement is never clamped at the source; only the progress bar
//! value is capped at 100.

use crate::types::MetricId;
use serde::{Deserialize, Serialize};

pub const DEFAULT_DEPARTMENT: &str = "General";
pub const DEFAULT_PERIOD: &str = "Current";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Up,
    Down,
    Flat,
}

/// Derived fields shared by every measure.
pub trait Measure {
    fn value(&self) -> f64;
    fn target(&self) -> f64;
    fn trend(&self) -> f64;

    /// `value / target * 100`. `None` when the target is not positive.
    fn achievement_rate(&self) -> Option<f64> {
        let target = self.target();
        if target > 0.0 {
            Some(self.value() / target * 100.0)
        } else {
            None
        }
    }

    /// Ratio used by the health aggregate; a non-positive target counts as 0.
    fn achievement_ratio(&self) -> f64 {
        self.achievement_rate().map(|r| r / 100.0).unwrap_or(0.0)
    }

    fn is_over_target(&self) -> bool {
        self.achievement_rate().is_some_and(|r| r > 100.0)
    }

    /// Progress bar fill, capped at 100.
    fn progress_percent(&self) -> f64 {
        self.achievement_rate().unwrap_or(0.0).clamp(0.0, 100.0)
    }

    fn trend_direction(&self) -> TrendDirection {
        let t = self.trend();
        if t > 0.0 {
            TrendDirection::Up
        } else if t < 0.0 {
            TrendDirection::Down
        } else {
            TrendDirection::Flat
        }
    }

    /// Trend magnitude as shown on a badge; the sign is carried by direction.
    fn trend_magnitude(&self) -> f64 {
        self.trend().abs()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadRecord {
    pub id: MetricId,
    pub name: String,
    pub value: f64,
    pub target: f64,
    pub trend: f64,
    /// Lookup association to the parent LAG, set on the live path only.
    pub lag_id: Option<MetricId>,
    pub department: String,
    pub period: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LagRecord {
    pub id: MetricId,
    pub name: String,
    pub value: f64,
    pub target: f64,
    pub trend: f64,
    pub department: String,
    pub period: String,
    pub leads: Vec<LeadRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WigRecord {
    pub id: MetricId,
    pub name: String,
    pub value: f64,
    pub target: f64,
    pub trend: f64,
    pub department: String,
    pub period: String,
}

macro_rules! impl_measure {
    ($($ty:ty),*) => {$(
        impl Measure for $ty {
            fn value(&self) -> f64 { self.value }
            fn target(&self) -> f64 { self.target }
            fn trend(&self) -> f64 { self.trend }
        }
    )*};
}

impl_measure!(LagRecord, LeadRecord, WigRecord);

/// A value/target/trend triple for one of the four overview cards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    pub value: f64,
    pub target: f64,
    pub trend: f64,
}

impl MetricSummary {
    pub const fn new(value: f64, target: f64, trend: f64) -> Self {
        Self { value, target, trend }
    }
}

impl_measure!(MetricSummary);

/// The kind of a metric feed; one worksheet per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    Wig,
    Lag,
    Lead,
    Activity,
}

impl MetricKind {
    pub const ALL: [MetricKind; 4] = [
        MetricKind::Lag,
        MetricKind::Lead,
        MetricKind::Wig,
        MetricKind::Activity,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Wig => "wig",
            Self::Lag => "lag",
            Self::Lead => "lead",
            Self::Activity => "activity",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lag(value: f64, target: f64, trend: f64) -> LagRecord {
        LagRecord {
            id: "lag1".into(),
            name: "Test".into(),
            value,
            target,
            trend,
            department: DEFAULT_DEPARTMENT.into(),
            period: DEFAULT_PERIOD.into(),
            leads: vec![],
        }
    }

    #[test]
    fn achievement_is_not_clamped() {
        let r = lag(120.0, 100.0, 0.0);
        assert_eq!(r.achievement_rate(), Some(120.0));
        assert!(r.is_over_target());
        assert_eq!(r.progress_percent(), 100.0);
    }

    #[test]
    fn zero_target_is_guarded() {
        let r = lag(50.0, 0.0, 0.0);
        assert_eq!(r.achievement_rate(), None);
        assert_eq!(r.achievement_ratio(), 0.0);
        assert!(!r.is_over_target());
    }

    #[test]
    fn trend_sign_drives_direction() {
        assert_eq!(lag(1.0, 1.0, 3.0).trend_direction(), TrendDirection::Up);
        assert_eq!(lag(1.0, 1.0, -2.0).trend_direction(), TrendDirection::Down);
        assert_eq!(lag(1.0, 1.0, 0.0).trend_direction(), TrendDirection::Flat);
        assert_eq!(lag(1.0, 1.0, -2.0).trend_magnitude(), 2.0);
    }
}
