//! In-process data source: fixed feeds, or JSON files on disk.
//!
//! A directory source reads `lag.json`, `lead.json`, `wig.json` and
//! `activity.json`, each an array of flat objects. A missing file is an
//! empty feed.

use super::{cell_text, DataSource, RawFeeds};
use crate::{
    error::{DashError, DashResult},
    metric::MetricKind,
    types::RawRow,
};
use serde_json::{Map, Value};
use std::path::Path;

pub struct StaticDataSource {
    feeds: RawFeeds,
    connected: bool,
    failure: Option<String>,
}

impl StaticDataSource {
    pub fn new(feeds: RawFeeds) -> Self {
        Self {
            feeds,
            connected: true,
            failure: None,
        }
    }

    /// A source that has never been connected.
    pub fn disconnected() -> Self {
        Self {
            feeds: RawFeeds::default(),
            connected: false,
            failure: None,
        }
    }

    pub fn from_dir(dir: impl AsRef<Path>) -> DashResult<Self> {
        let dir = dir.as_ref();
        let mut feeds = RawFeeds::default();
        for kind in MetricKind::ALL {
            let path = dir.join(format!("{}.json", kind.name()));
            if !path.exists() {
                log::debug!("{} not found; {} feed empty", path.display(), kind.name());
                continue;
            }
            let content = std::fs::read_to_string(&path).map_err(|e| {
                anyhow::anyhow!("Cannot read {}: {e}", path.display())
            })?;
            let objects: Vec<Map<String, Value>> = serde_json::from_str(&content)?;
            *feeds.rows_mut(kind) = objects.iter().map(row_from_object).collect();
        }
        Ok(Self::new(feeds))
    }

    pub fn connect(&mut self) {
        self.connected = true;
    }

    pub fn set_feeds(&mut self, feeds: RawFeeds) {
        self.feeds = feeds;
    }

    /// Make every subsequent fetch fail with `reason`.
    pub fn fail_with(&mut self, reason: impl Into<String>) {
        self.failure = Some(reason.into());
    }

    pub fn clear_failure(&mut self) {
        self.failure = None;
    }
}

fn row_from_object(object: &Map<String, Value>) -> RawRow {
    object
        .iter()
        .map(|(k, v)| (k.clone(), cell_text(v)))
        .collect()
}

impl DataSource for StaticDataSource {
    fn name(&self) -> &'static str {
        "static"
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn disconnect(&mut self) {
        self.connected = false;
    }

    fn fetch_sheet(&mut self, kind: MetricKind) -> DashResult<Vec<RawRow>> {
        if !self.connected {
            return Err(DashError::NotConnected {
                name: self.name().to_string(),
            });
        }
        if let Some(reason) = &self.failure {
            return Err(DashError::SourceUnavailable {
                name: self.name().to_string(),
                reason: reason.clone(),
            });
        }
        Ok(self.feeds.rows(kind).to_vec())
    }
}
