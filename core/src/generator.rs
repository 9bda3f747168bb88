//! Mock metric generator.
//!
//! Four fixed LAG templates, each owning two or three LEAD templates.
//! Values scale with the period multiplier; targets do not.
//! Trend is symmetric jitter of the template's amplitude, so a trend
//! always lies within ±amplitude/2.

use crate::{
    metric::{LagRecord, LeadRecord, MetricSummary},
    rng::JitterRng,
    types::round_half_up,
};

/// Department label carried by generated records.
pub const MOCK_DEPARTMENT: &str = "Organization";

#[derive(Debug, Clone, Copy)]
pub struct LeadTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub baseline: f64,
    pub target: f64,
    pub jitter: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct LagTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub baseline: f64,
    pub target: f64,
    pub jitter: f64,
    pub leads: &'static [LeadTemplate],
}

pub const LAG_TEMPLATES: [LagTemplate; 4] = [
    LagTemplate {
        id: "lag1",
        name: "Customer Satisfaction Score",
        baseline: 75.0,
        target: 85.0,
        jitter: 10.0,
        leads: &[
            LeadTemplate { id: "lead1", name: "Customer Follow-up Calls", baseline: 45.0, target: 50.0, jitter: 8.0 },
            LeadTemplate { id: "lead2", name: "Service Response Improvements", baseline: 12.0, target: 15.0, jitter: 6.0 },
            LeadTemplate { id: "lead3", name: "Staff Training Sessions", baseline: 8.0, target: 10.0, jitter: 4.0 },
        ],
    },
    LagTemplate {
        id: "lag2",
        name: "Program Beneficiaries Reached",
        baseline: 1200.0,
        target: 1500.0,
        jitter: 12.0,
        leads: &[
            LeadTemplate { id: "lead4", name: "Community Outreach Events", baseline: 18.0, target: 20.0, jitter: 8.0 },
            LeadTemplate { id: "lead5", name: "Volunteer Hours Logged", baseline: 640.0, target: 800.0, jitter: 10.0 },
        ],
    },
    LagTemplate {
        id: "lag3",
        name: "Donor Retention Rate",
        baseline: 68.0,
        target: 80.0,
        jitter: 8.0,
        leads: &[
            LeadTemplate { id: "lead6", name: "Donor Engagement Calls", baseline: 120.0, target: 150.0, jitter: 10.0 },
            LeadTemplate { id: "lead7", name: "Impact Reports Sent", baseline: 35.0, target: 40.0, jitter: 6.0 },
            LeadTemplate { id: "lead8", name: "Donor Appreciation Events", baseline: 4.0, target: 5.0, jitter: 4.0 },
        ],
    },
    LagTemplate {
        id: "lag4",
        name: "Operational Cost Efficiency",
        baseline: 82.0,
        target: 90.0,
        jitter: 6.0,
        leads: &[
            LeadTemplate { id: "lead9", name: "Process Audits Completed", baseline: 6.0, target: 8.0, jitter: 4.0 },
            LeadTemplate { id: "lead10", name: "Automation Initiatives Launched", baseline: 3.0, target: 5.0, jitter: 4.0 },
        ],
    },
];

/// Fixed overview cards shown while no live data is available.
pub const MOCK_OVERVIEW: MockOverview = MockOverview {
    wig: MetricSummary::new(85.0, 90.0, 5.0),
    lag: MetricSummary::new(78.0, 80.0, -2.0),
    lead: MetricSummary::new(92.0, 85.0, 8.0),
    activity: MetricSummary::new(156.0, 150.0, 12.0),
};

#[derive(Debug, Clone, Copy)]
pub struct MockOverview {
    pub wig: MetricSummary,
    pub lag: MetricSummary,
    pub lead: MetricSummary,
    pub activity: MetricSummary,
}

pub struct MetricGenerator {
    templates: &'static [LagTemplate],
}

impl Default for MetricGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricGenerator {
    pub fn new() -> Self {
        Self {
            templates: &LAG_TEMPLATES,
        }
    }

    pub fn templates(&self) -> &'static [LagTemplate] {
        self.templates
    }

    /// Build a fresh LAG set for `multiplier`. `period_label` is stamped
    /// on every record.
    pub fn generate(
        &self,
        multiplier: f64,
        period_label: &str,
        rng: &mut JitterRng,
    ) -> Vec<LagRecord> {
        let lags: Vec<LagRecord> = self
            .templates
            .iter()
            .map(|t| {
                let trend = round_half_up(rng.jitter(t.jitter));
                let leads = t
                    .leads
                    .iter()
                    .map(|l| LeadRecord {
                        id: l.id.to_string(),
                        name: l.name.to_string(),
                        value: round_half_up(l.baseline * multiplier),
                        target: l.target,
                        trend: round_half_up(rng.jitter(l.jitter)),
                        lag_id: Some(t.id.to_string()),
                        department: MOCK_DEPARTMENT.to_string(),
                        period: period_label.to_string(),
                    })
                    .collect();
                LagRecord {
                    id: t.id.to_string(),
                    name: t.name.to_string(),
                    value: round_half_up(t.baseline * multiplier),
                    target: t.target,
                    trend,
                    department: MOCK_DEPARTMENT.to_string(),
                    period: period_label.to_string(),
                    leads,
                }
            })
            .collect();
        log::debug!(
            "generated {} mock LAG records at multiplier {multiplier:.2}",
            lags.len()
        );
        lags
    }
}
