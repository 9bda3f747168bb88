//! LAG → LEAD drill-down.
//!
//! At most one LAG is selected at a time. Selecting another replaces
//! it; selecting an unknown id leaves nothing selected.

use crate::{
    metric::{LagRecord, LeadRecord},
    types::MetricId,
};

/// Children of the LAG with `lag_id`, or `None` if no record matches.
pub fn resolve_leads<'a>(lag_id: &str, lags: &'a [LagRecord]) -> Option<&'a [LeadRecord]> {
    lags.iter()
        .find(|l| l.id == lag_id)
        .map(|l| l.leads.as_slice())
}

#[derive(Debug, Default, Clone)]
pub struct DrillDown {
    selected: Option<MetricId>,
}

impl DrillDown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select `lag_id` and return its LAG record. Any prior selection is
    /// dropped first.
    pub fn select<'a>(&mut self, lag_id: &str, lags: &'a [LagRecord]) -> Option<&'a LagRecord> {
        self.selected = None;
        let found = lags.iter().find(|l| l.id == lag_id)?;
        self.selected = Some(found.id.clone());
        log::debug!("drill-down opened for {lag_id} ({} leads)", found.leads.len());
        Some(found)
    }

    pub fn close(&mut self) {
        self.selected = None;
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Re-resolve the selection against a regenerated record set.
    pub fn current<'a>(&self, lags: &'a [LagRecord]) -> Option<&'a LagRecord> {
        let id = self.selected.as_deref()?;
        lags.iter().find(|l| l.id == id)
    }
}
