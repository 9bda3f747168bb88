//! The dashboard: the heart of the 4DX core.
//!
//! RENDER ORDER (fixed):
//!   1. Resolve the period selection into a scale.
//!   2. Choose the data path: live iff the source is connected AND the
//!      last fetch produced at least one LAG record; otherwise mock.
//!   3. Rebuild the LAG set wholesale for that path.
//!   4. Derive overview, health, CEO breakdown and chart from it.
//!   5. Re-resolve the drill-down selection against the new set.
//!
//! RULES:
//!   - Record sets are never patched in place; every render replaces them.
//!   - All randomness flows through the RngBank, keyed by generation.
//!   - A failing source never fails a render: the view falls back to mock.

use crate::{
    aggregate::{
        department_breakdown_live, department_breakdown_mock, health_report, DepartmentHealth,
        HealthReport, Overview,
    },
    auth::UserSession,
    chart::{trend_series, ChartPoint},
    config::DashboardConfig,
    drilldown::DrillDown,
    error::DashResult,
    event::DashboardEvent,
    generator::MetricGenerator,
    metric::{LagRecord, LeadRecord, WigRecord},
    period::{MonthKey, PeriodScale, PeriodSelection},
    refresh::RefreshSchedule,
    rng::{JitterSlot, RngBank},
    session::SessionContext,
    source::{DataSource, RawFeeds},
    store::DashStore,
    transform::{self, DroppedLead},
    types::{Generation, RawRow},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataPath {
    Mock,
    Live,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshTrigger {
    Manual,
    Periodic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SourceStatus {
    Disconnected,
    Connected { last_refresh: Option<DateTime<Utc>> },
    Error { message: String },
}

/// The live path is used only when the source is connected and its LAG
/// feed is non-empty.
pub fn choose_path(connected: bool, live_lags_non_empty: bool) -> DataPath {
    if connected && live_lags_non_empty {
        DataPath::Live
    } else {
        DataPath::Mock
    }
}

/// Records mapped from the most recent successful fetch.
#[derive(Debug, Clone, Default)]
pub struct LiveData {
    pub lags: Vec<LagRecord>,
    pub leads: Vec<LeadRecord>,
    pub wigs: Vec<WigRecord>,
    pub activity: Vec<RawRow>,
    pub dropped: Vec<DroppedLead>,
}

impl LiveData {
    pub fn from_feeds(feeds: &RawFeeds) -> Self {
        let lags: Vec<LagRecord> = feeds.lag.iter().map(transform::lag_from_row).collect();
        let leads: Vec<LeadRecord> = feeds.lead.iter().map(transform::lead_from_row).collect();
        let wigs = feeds.wig.iter().map(transform::wig_from_row).collect();
        let enriched = transform::enrich(lags, &leads);
        Self {
            lags: enriched.lags,
            leads,
            wigs,
            activity: feeds.activity.clone(),
            dropped: enriched.dropped,
        }
    }
}

/// Everything a presentation layer needs for one frame.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub generation: Generation,
    pub user: UserSession,
    pub period: PeriodSelection,
    pub period_label: String,
    pub scale: PeriodScale,
    pub path: DataPath,
    pub status: SourceStatus,
    pub overview: Overview,
    pub lags: Vec<LagRecord>,
    pub wigs: Vec<WigRecord>,
    pub health: Option<HealthReport>,
    /// Executive summary, CEO only.
    pub departments: Option<Vec<DepartmentHealth>>,
    pub chart: Vec<ChartPoint>,
    pub selected: Option<LagRecord>,
    pub dropped_leads: Vec<DroppedLead>,
}

pub struct Dashboard {
    user: UserSession,
    config: DashboardConfig,
    period: PeriodSelection,
    rng_bank: RngBank,
    generator: MetricGenerator,
    source: Box<dyn DataSource>,
    live: Option<LiveData>,
    status: SourceStatus,
    schedule: RefreshSchedule,
    drill: DrillDown,
    active_lags: Vec<LagRecord>,
    last_path: Option<DataPath>,
    generation: Generation,
    store: DashStore,
}

impl Dashboard {
    /// Open the dashboard for the signed-in user.
    /// Fails with `NotSignedIn` when the session is empty.
    pub fn open(
        session: &SessionContext,
        config: DashboardConfig,
        source: Box<dyn DataSource>,
        store: DashStore,
        seed: u64,
    ) -> DashResult<Self> {
        let user = session.require_user()?.clone();
        let status = if source.is_connected() {
            SourceStatus::Connected { last_refresh: None }
        } else {
            SourceStatus::Disconnected
        };
        log::info!(
            "dashboard opened for '{}' (seed {seed}, source {})",
            user.username,
            source.name()
        );
        Ok(Self {
            schedule: RefreshSchedule::new(&config.refresh),
            user,
            config,
            period: PeriodSelection::default(),
            rng_bank: RngBank::new(seed),
            generator: MetricGenerator::new(),
            source,
            live: None,
            status,
            drill: DrillDown::new(),
            active_lags: Vec::new(),
            last_path: None,
            generation: 0,
            store,
        })
    }

    /// Fully wired dashboard for tests: in-memory store, test config,
    /// a signed-in CEO and the given source.
    pub fn build_test(seed: u64, source: Box<dyn DataSource>) -> DashResult<Self> {
        let config = DashboardConfig::default_test();
        let auth = crate::auth::DirectoryAuthenticator::new(config.directory.clone());
        let store = DashStore::in_memory()?;
        store.migrate()?;
        let mut session = SessionContext::default();
        session.sign_in(&store, &auth, "CEO", &config.directory.shared_password)?;
        Self::open(&session, config, source, store, seed)
    }

    // ── Accessors ──────────────────────────────────────────────

    pub fn user(&self) -> &UserSession {
        &self.user
    }

    pub fn period(&self) -> &PeriodSelection {
        &self.period
    }

    pub fn status(&self) -> &SourceStatus {
        &self.status
    }

    pub fn store(&self) -> &DashStore {
        &self.store
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn live(&self) -> Option<&LiveData> {
        self.live.as_ref()
    }

    /// LAG records from the most recent render.
    pub fn active_lags(&self) -> &[LagRecord] {
        &self.active_lags
    }

    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        self.schedule.is_stale(now)
    }

    // ── Filters ────────────────────────────────────────────────

    pub fn set_period(&mut self, selection: PeriodSelection) -> DashResult<()> {
        let scale = selection.scale();
        self.store.append_event(
            self.generation,
            &DashboardEvent::PeriodChanged {
                selection: selection.clone(),
                period_count: scale.period_count,
                base_multiplier: scale.base_multiplier,
            },
        )?;
        self.period = selection;
        Ok(())
    }

    pub fn toggle_month(&mut self, month: MonthKey) -> DashResult<()> {
        let mut next = self.period.clone();
        next.toggle_month(month);
        self.set_period(next)
    }

    // ── Data source ────────────────────────────────────────────

    /// Fetch all four feeds. Source failures are absorbed: the status
    /// turns to Error and the view falls back to mock. Only store
    /// failures propagate.
    pub fn refresh(&mut self, trigger: RefreshTrigger, now: DateTime<Utc>) -> DashResult<&SourceStatus> {
        let source_name = self.source.name().to_string();
        if !self.source.is_connected() {
            log::debug!("refresh skipped: {source_name} not connected");
            self.live = None;
            self.status = SourceStatus::Disconnected;
            return Ok(&self.status);
        }

        self.store.append_event(
            self.generation,
            &DashboardEvent::RefreshStarted {
                trigger,
                source: source_name.clone(),
            },
        )?;

        match self.source.fetch_all() {
            Ok(feeds) => {
                let live = LiveData::from_feeds(&feeds);
                self.store.append_event(
                    self.generation,
                    &DashboardEvent::RefreshCompleted {
                        source: source_name,
                        lag_rows: feeds.lag.len(),
                        lead_rows: feeds.lead.len(),
                        wig_rows: feeds.wig.len(),
                        activity_rows: feeds.activity.len(),
                    },
                )?;
                if !live.dropped.is_empty() {
                    self.store.append_event(
                        self.generation,
                        &DashboardEvent::DanglingLeadsDropped {
                            lead_ids: live.dropped.iter().map(|d| d.lead_id.clone()).collect(),
                        },
                    )?;
                }
                log::info!(
                    "refresh ({trigger:?}) complete: {} LAG, {} LEAD, {} WIG, {} activity",
                    live.lags.len(),
                    live.leads.len(),
                    live.wigs.len(),
                    live.activity.len()
                );
                self.live = Some(live);
                self.status = SourceStatus::Connected {
                    last_refresh: Some(now),
                };
            }
            Err(e) => {
                log::warn!("refresh ({trigger:?}) from {source_name} failed: {e}");
                self.store.append_event(
                    self.generation,
                    &DashboardEvent::RefreshFailed {
                        source: source_name,
                        error: e.to_string(),
                    },
                )?;
                self.live = None;
                self.status = SourceStatus::Error {
                    message: e.to_string(),
                };
            }
        }
        self.schedule.mark_fetched(now);
        Ok(&self.status)
    }

    /// Periodic trigger. Returns true if a refresh ran.
    pub fn tick(&mut self, now: DateTime<Utc>) -> DashResult<bool> {
        if !self.schedule.is_due(now) {
            return Ok(false);
        }
        self.refresh(RefreshTrigger::Periodic, now)?;
        Ok(true)
    }

    /// Disconnect the source and drop every live record.
    pub fn disconnect_source(&mut self) -> DashResult<()> {
        self.source.disconnect();
        self.live = None;
        self.status = SourceStatus::Disconnected;
        self.schedule.reset();
        self.store.append_event(
            self.generation,
            &DashboardEvent::SourceDisconnected {
                source: self.source.name().to_string(),
            },
        )?;
        log::info!("{} disconnected; mock data from next render", self.source.name());
        Ok(())
    }

    // ── Drill-down ─────────────────────────────────────────────

    pub fn select_lag(&mut self, lag_id: &str) -> Option<&LagRecord> {
        self.drill.select(lag_id, &self.active_lags)
    }

    pub fn close_detail(&mut self) {
        self.drill.close();
    }

    // ── Render ─────────────────────────────────────────────────

    pub fn render(&mut self) -> DashResult<DashboardView> {
        self.generation += 1;
        let generation = self.generation;
        let scale = self.period.scale();
        let period_label = self.period.label();
        let connected = self.source.is_connected();

        let live = self
            .live
            .as_ref()
            .filter(|l| choose_path(connected, !l.lags.is_empty()) == DataPath::Live);
        let path = if live.is_some() { DataPath::Live } else { DataPath::Mock };
        let departments_wanted = self.user.is_ceo();
        let summary_departments = &self.config.overview.summary_departments;

        let (lags, wigs, overview, departments, dropped_leads) = match live {
            Some(live) => (
                live.lags.clone(),
                live.wigs.clone(),
                Overview::live(
                    &live.wigs,
                    &live.lags,
                    &live.leads,
                    &live.activity,
                    &self.config.overview,
                ),
                departments_wanted
                    .then(|| department_breakdown_live(summary_departments, &live.lags)),
                live.dropped.clone(),
            ),
            None => {
                let mut trend_rng = self.rng_bank.for_slot(JitterSlot::Trend, generation);
                let lags =
                    self.generator
                        .generate(scale.base_multiplier, &period_label, &mut trend_rng);
                let departments = departments_wanted.then(|| {
                    let mut rng = self
                        .rng_bank
                        .for_slot(JitterSlot::DepartmentSummary, generation);
                    department_breakdown_mock(summary_departments, &mut rng)
                });
                (lags, Vec::new(), Overview::mock(), departments, Vec::new())
            }
        };

        if self.last_path != Some(path) {
            self.store.append_event(
                generation,
                &DashboardEvent::DataPathSwitched {
                    from: self.last_path,
                    to: path,
                },
            )?;
            log::info!("data path now {path:?}");
            self.last_path = Some(path);
        }

        let subject = self
            .user
            .health_subject(&self.config.overview.organization_label);
        let health = health_report(&subject, &lags, &self.config.health);

        let mut chart_rng = self.rng_bank.for_slot(JitterSlot::Chart, generation);
        let chart = trend_series(&self.period.chart_months(), &mut chart_rng);

        self.active_lags = lags;
        let selected = self.drill.current(&self.active_lags).cloned();
        if selected.is_none() && self.drill.selected_id().is_some() {
            log::debug!("selected LAG no longer present; closing detail");
            self.drill.close();
        }

        Ok(DashboardView {
            generation,
            user: self.user.clone(),
            period: self.period.clone(),
            period_label,
            scale,
            path,
            status: self.status.clone(),
            overview,
            lags: self.active_lags.clone(),
            wigs,
            health,
            departments,
            chart,
            selected,
            dropped_leads,
        })
    }
}
