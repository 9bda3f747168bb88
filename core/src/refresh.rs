//! Refresh scheduling for the live data source.
//!
//! A periodic trigger fires every `interval`; a manual trigger may fire
//! at any time. Overlapping refreshes are not deduplicated: whichever
//! completes last replaces the feeds.

use crate::config::RefreshConfig;
use chrono::{DateTime, Duration, Utc};

#[derive(Debug, Clone)]
pub struct RefreshSchedule {
    interval: Duration,
    stale_after: Duration,
    last_fetch: Option<DateTime<Utc>>,
}

impl RefreshSchedule {
    pub fn new(config: &RefreshConfig) -> Self {
        Self {
            interval: Duration::seconds(config.interval_secs as i64),
            stale_after: Duration::seconds(config.stale_after_secs as i64),
            last_fetch: None,
        }
    }

    /// True when the periodic trigger should fire at `now`.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        match self.last_fetch {
            None => true,
            Some(t) => now - t >= self.interval,
        }
    }

    /// True when data fetched at the last refresh is older than the
    /// staleness window, or nothing has been fetched yet.
    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        match self.last_fetch {
            None => true,
            Some(t) => now - t >= self.stale_after,
        }
    }

    pub fn mark_fetched(&mut self, at: DateTime<Utc>) {
        self.last_fetch = Some(at);
    }

    pub fn last_fetch(&self) -> Option<DateTime<Utc>> {
        self.last_fetch
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Forget the last fetch, e.g. after the source disconnects.
    pub fn reset(&mut self) {
        self.last_fetch = None;
    }
}
