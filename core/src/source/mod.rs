//! Data source boundary.
//!
//! A source hands back four independent sequences of flat rows, one per
//! metric kind, keyed by the workbook's column headers. Only the
//! dashboard calls a source; mapping rows into records is the job of
//! `transform`.

pub mod graph;
pub mod static_source;

pub use graph::GraphDataSource;
pub use static_source::StaticDataSource;

use crate::{error::DashResult, metric::MetricKind, types::RawRow};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One fetch's worth of rows for every metric kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawFeeds {
    pub lag: Vec<RawRow>,
    pub lead: Vec<RawRow>,
    pub wig: Vec<RawRow>,
    pub activity: Vec<RawRow>,
}

impl RawFeeds {
    pub fn rows(&self, kind: MetricKind) -> &[RawRow] {
        match kind {
            MetricKind::Lag => &self.lag,
            MetricKind::Lead => &self.lead,
            MetricKind::Wig => &self.wig,
            MetricKind::Activity => &self.activity,
        }
    }

    pub fn rows_mut(&mut self, kind: MetricKind) -> &mut Vec<RawRow> {
        match kind {
            MetricKind::Lag => &mut self.lag,
            MetricKind::Lead => &mut self.lead,
            MetricKind::Wig => &mut self.wig,
            MetricKind::Activity => &mut self.activity,
        }
    }

    pub fn is_empty(&self) -> bool {
        MetricKind::ALL.iter().all(|k| self.rows(*k).is_empty())
    }
}

pub trait DataSource {
    /// Stable name used in logs and events.
    fn name(&self) -> &'static str;

    fn is_connected(&self) -> bool;

    fn disconnect(&mut self);

    fn fetch_sheet(&mut self, kind: MetricKind) -> DashResult<Vec<RawRow>>;

    /// Fetch every kind in a fixed order. The first failure aborts.
    fn fetch_all(&mut self) -> DashResult<RawFeeds> {
        let mut feeds = RawFeeds::default();
        for kind in MetricKind::ALL {
            *feeds.rows_mut(kind) = self.fetch_sheet(kind)?;
        }
        Ok(feeds)
    }
}

/// Cell text with spreadsheet-blank semantics: null, false, 0 and the
/// empty string all read as "".
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null | Value::Bool(false) => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) if n.as_f64() == Some(0.0) => String::new(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Header text: strings as-is, anything else by its JSON rendering.
pub fn header_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Turn a 2-D cell grid into rows keyed by the first row's headers.
/// Missing cells read as "", extra cells are ignored.
pub fn rows_from_grid(values: &[Vec<Value>]) -> Vec<RawRow> {
    let Some((header_row, body)) = values.split_first() else {
        return Vec::new();
    };
    let headers: Vec<String> = header_row.iter().map(header_text).collect();
    body.iter()
        .map(|row| {
            headers
                .iter()
                .enumerate()
                .map(|(i, h)| (h.clone(), row.get(i).map(cell_text).unwrap_or_default()))
                .collect()
        })
        .collect()
}
