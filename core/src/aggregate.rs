//! Health and overview aggregates over the active record set.
//!
//! Nothing here is cached: every call recomputes from the slice it is
//! given, so a regenerated record set is reflected immediately.

use crate::{
    config::{HealthThresholds, OverviewConfig},
    generator::MOCK_OVERVIEW,
    metric::{LagRecord, LeadRecord, Measure, MetricSummary, WigRecord},
    rng::JitterRng,
    types::{round_half_up, RawRow},
};
use serde::{Deserialize, Serialize};

/// `round(mean(value / target) * 100)` over all LAG records.
/// `None` for an empty set; a record with a non-positive target counts as 0.
/// The score is floored at 0, so a negative mean (negative values) reads as 0.
pub fn health_score(lags: &[LagRecord]) -> Option<u32> {
    if lags.is_empty() {
        return None;
    }
    let mean = lags.iter().map(Measure::achievement_ratio).sum::<f64>() / lags.len() as f64;
    Some(round_half_up(mean * 100.0).max(0.0) as u32)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Excellent,
    Good,
    Fair,
    NeedsAttention,
}

impl HealthStatus {
    pub fn from_score(score: u32, t: &HealthThresholds) -> Self {
        if score >= t.excellent {
            HealthStatus::Excellent
        } else if score >= t.good {
            HealthStatus::Good
        } else if score >= t.fair {
            HealthStatus::Fair
        } else {
            HealthStatus::NeedsAttention
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HealthStatus::Excellent => "Excellent",
            HealthStatus::Good => "Good",
            HealthStatus::Fair => "Fair",
            HealthStatus::NeedsAttention => "Needs Attention",
        }
    }
}

/// Colour band of the health gauge. Coarser than HealthStatus: Fair and
/// Needs Attention share the critical band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthTier {
    Good,
    Warning,
    Critical,
}

impl HealthTier {
    pub fn from_score(score: u32, t: &HealthThresholds) -> Self {
        if score >= t.excellent {
            HealthTier::Good
        } else if score >= t.good {
            HealthTier::Warning
        } else {
            HealthTier::Critical
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    pub subject: String,
    pub score: u32,
    pub status: HealthStatus,
    pub tier: HealthTier,
}

pub fn health_report(
    subject: &str,
    lags: &[LagRecord],
    thresholds: &HealthThresholds,
) -> Option<HealthReport> {
    let score = health_score(lags)?;
    Some(HealthReport {
        subject: subject.to_string(),
        score,
        status: HealthStatus::from_score(score, thresholds),
        tier: HealthTier::from_score(score, thresholds),
    })
}

/// The four headline cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overview {
    pub wig: MetricSummary,
    pub lag: MetricSummary,
    pub lead: MetricSummary,
    pub activity: MetricSummary,
}

impl Overview {
    pub fn mock() -> Self {
        Self {
            wig: MOCK_OVERVIEW.wig,
            lag: MOCK_OVERVIEW.lag,
            lead: MOCK_OVERVIEW.lead,
            activity: MOCK_OVERVIEW.activity,
        }
    }

    /// Averages over the live records; Activity is the row count against
    /// the configured target. `leads` is every mapped LEAD row, including
    /// those enrichment could not attach to a LAG.
    pub fn live(
        wigs: &[WigRecord],
        lags: &[LagRecord],
        leads: &[LeadRecord],
        activity: &[RawRow],
        config: &OverviewConfig,
    ) -> Self {
        Self {
            wig: mean_summary(wigs.iter()),
            lag: mean_summary(lags.iter()),
            lead: mean_summary(leads.iter()),
            activity: MetricSummary::new(activity.len() as f64, config.activity_target, 0.0),
        }
    }
}

fn mean_summary<'a, M, I>(records: I) -> MetricSummary
where
    M: Measure + 'a,
    I: Iterator<Item = &'a M>,
{
    let (mut n, mut value, mut target, mut trend) = (0usize, 0.0, 0.0, 0.0);
    for r in records {
        n += 1;
        value += r.value();
        target += r.target();
        trend += r.trend();
    }
    if n == 0 {
        return MetricSummary::new(0.0, 0.0, 0.0);
    }
    let n = n as f64;
    MetricSummary::new(
        round_half_up(value / n),
        round_half_up(target / n),
        round_half_up(trend / n),
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentHealth {
    pub department: String,
    /// `None` when the department has no LAG records in the live feed.
    pub score: Option<u32>,
}

/// Per-department health from live LAG records.
pub fn department_breakdown_live(
    departments: &[String],
    lags: &[LagRecord],
) -> Vec<DepartmentHealth> {
    departments
        .iter()
        .map(|dept| {
            let owned: Vec<LagRecord> = lags
                .iter()
                .filter(|l| l.department.eq_ignore_ascii_case(dept))
                .cloned()
                .collect();
            DepartmentHealth {
                department: dept.clone(),
                score: health_score(&owned),
            }
        })
        .collect()
}

/// Placeholder department scores for the mock view, 75..=94.
pub fn department_breakdown_mock(
    departments: &[String],
    rng: &mut JitterRng,
) -> Vec<DepartmentHealth> {
    departments
        .iter()
        .map(|dept| DepartmentHealth {
            department: dept.clone(),
            score: Some(75 + (rng.next_f64() * 20.0).floor() as u32),
        })
        .collect()
}
