//! Dashboard event log.
//!
//! Every session change, period change, refresh outcome and data-path
//! switch is recorded as a DashboardEvent. Variants are appended only;
//! the `type` tag is what lands in the event_type column.

use crate::{
    auth::Role,
    dashboard::{DataPath, RefreshTrigger},
    period::PeriodSelection,
    types::{Generation, MetricId},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DashboardEvent {
    // ── Session ────────────────────────────────────
    SessionStarted {
        username: String,
        role: Role,
    },
    SessionEnded {
        username: String,
    },

    // ── Filters ────────────────────────────────────
    PeriodChanged {
        selection: PeriodSelection,
        period_count: u32,
        base_multiplier: f64,
    },

    // ── Data source ────────────────────────────────
    RefreshStarted {
        trigger: RefreshTrigger,
        source: String,
    },
    RefreshCompleted {
        source: String,
        lag_rows: usize,
        lead_rows: usize,
        wig_rows: usize,
        activity_rows: usize,
    },
    RefreshFailed {
        source: String,
        error: String,
    },
    SourceDisconnected {
        source: String,
    },
    DataPathSwitched {
        from: Option<DataPath>,
        to: DataPath,
    },

    // ── Data quality ───────────────────────────────
    DanglingLeadsDropped {
        lead_ids: Vec<MetricId>,
    },
}

impl DashboardEvent {
    /// Stable name for the event_type column.
    pub fn type_name(&self) -> &'static str {
        match self {
            DashboardEvent::SessionStarted { .. } => "session_started",
            DashboardEvent::SessionEnded { .. } => "session_ended",
            DashboardEvent::PeriodChanged { .. } => "period_changed",
            DashboardEvent::RefreshStarted { .. } => "refresh_started",
            DashboardEvent::RefreshCompleted { .. } => "refresh_completed",
            DashboardEvent::RefreshFailed { .. } => "refresh_failed",
            DashboardEvent::SourceDisconnected { .. } => "source_disconnected",
            DashboardEvent::DataPathSwitched { .. } => "data_path_switched",
            DashboardEvent::DanglingLeadsDropped { .. } => "dangling_leads_dropped",
        }
    }
}

/// A persisted event_log row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLogEntry {
    pub id: Option<i64>,
    pub generation: Generation,
    pub event_type: String,
    pub payload: String,
    pub created_at: String,
}
