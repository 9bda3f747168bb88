//! Aggregator tests: health score, bands, overview and breakdown.

use fourdx_core::{
    aggregate::{
        department_breakdown_live, department_breakdown_mock, health_report, health_score,
        HealthStatus, HealthTier, Overview,
    },
    config::DashboardConfig,
    metric::{LagRecord, LeadRecord, WigRecord},
    rng::JitterRng,
    types::RawRow,
};

fn lag(id: &str, value: f64, target: f64, department: &str) -> LagRecord {
    LagRecord {
        id: id.into(),
        name: id.into(),
        value,
        target,
        trend: 0.0,
        department: department.into(),
        period: "Current".into(),
        leads: vec![],
    }
}

#[test]
fn health_is_rounded_mean_ratio() {
    let lags = vec![lag("a", 75.0, 85.0, "HR"), lag("b", 50.0, 100.0, "HR")];
    // (0.88235 + 0.5) / 2 = 0.69118
    assert_eq!(health_score(&lags), Some(69));
}

#[test]
fn health_can_exceed_one_hundred() {
    let lags = vec![lag("a", 150.0, 100.0, "HR"), lag("b", 110.0, 100.0, "HR")];
    assert_eq!(health_score(&lags), Some(130));
}

#[test]
fn empty_set_has_no_health() {
    assert_eq!(health_score(&[]), None);
    let cfg = DashboardConfig::default_test();
    assert_eq!(health_report("Organization", &[], &cfg.health), None);
}

#[test]
fn zero_target_counts_as_zero_ratio() {
    let lags = vec![lag("a", 80.0, 0.0, "HR"), lag("b", 100.0, 100.0, "HR")];
    assert_eq!(health_score(&lags), Some(50));
}

#[test]
fn negative_mean_floors_at_zero() {
    let lags = vec![lag("a", -50.0, 100.0, "HR")];
    assert_eq!(health_score(&lags), Some(0));
    let mixed = vec![lag("a", -50.0, 100.0, "HR"), lag("b", 90.0, 100.0, "HR")];
    assert_eq!(health_score(&mixed), Some(20));
}

#[test]
fn mock_baselines_score_organization_health() {
    let lags = vec![
        lag("lag1", 75.0, 85.0, "Organization"),
        lag("lag2", 1200.0, 1500.0, "Organization"),
        lag("lag3", 68.0, 80.0, "Organization"),
        lag("lag4", 82.0, 90.0, "Organization"),
    ];
    // (0.88235 + 0.8 + 0.85 + 0.91111) / 4 = 0.86087
    assert_eq!(health_score(&lags), Some(86));
}

#[test]
fn status_and_tier_bands() {
    let t = DashboardConfig::default_test().health;
    assert_eq!(HealthStatus::from_score(80, &t), HealthStatus::Excellent);
    assert_eq!(HealthStatus::from_score(79, &t), HealthStatus::Good);
    assert_eq!(HealthStatus::from_score(60, &t), HealthStatus::Good);
    assert_eq!(HealthStatus::from_score(59, &t), HealthStatus::Fair);
    assert_eq!(HealthStatus::from_score(40, &t), HealthStatus::Fair);
    assert_eq!(HealthStatus::from_score(39, &t), HealthStatus::NeedsAttention);
    assert_eq!(HealthStatus::NeedsAttention.label(), "Needs Attention");

    assert_eq!(HealthTier::from_score(80, &t), HealthTier::Good);
    assert_eq!(HealthTier::from_score(60, &t), HealthTier::Warning);
    assert_eq!(HealthTier::from_score(59, &t), HealthTier::Critical);
}

#[test]
fn live_overview_averages_records() {
    let cfg = DashboardConfig::default_test();
    let wigs = vec![WigRecord {
        id: "W-1".into(),
        name: "Reach".into(),
        value: 40.0,
        target: 50.0,
        trend: 4.0,
        department: "Organization".into(),
        period: "Current".into(),
    }];
    let mut l1 = lag("L-1", 70.0, 80.0, "HR");
    l1.trend = 2.0;
    let d1 = LeadRecord {
        id: "D-1".into(),
        name: "Calls".into(),
        value: 9.0,
        target: 10.0,
        trend: 1.0,
        lag_id: Some("L-1".into()),
        department: "HR".into(),
        period: "Current".into(),
    };
    l1.leads.push(d1.clone());
    let mut l2 = lag("L-2", 90.0, 100.0, "Finance");
    l2.trend = -4.0;
    let activity = vec![RawRow::new(), RawRow::new(), RawRow::new()];

    let overview = Overview::live(&wigs, &[l1, l2], &[d1], &activity, &cfg.overview);
    assert_eq!(overview.wig.value, 40.0);
    assert_eq!(overview.lag.value, 80.0);
    assert_eq!(overview.lag.target, 90.0);
    assert_eq!(overview.lag.trend, -1.0);
    assert_eq!(overview.lead.value, 9.0);
    assert_eq!(overview.activity.value, 3.0);
    assert_eq!(overview.activity.target, 150.0);
}

#[test]
fn live_lead_card_counts_leads_without_a_lag() {
    let cfg = DashboardConfig::default_test();
    let mut l1 = lag("L-1", 10.0, 10.0, "HR");
    let linked = LeadRecord {
        id: "D-1".into(),
        name: "Linked".into(),
        value: 10.0,
        target: 10.0,
        trend: 0.0,
        lag_id: Some("L-1".into()),
        department: "HR".into(),
        period: "Current".into(),
    };
    let dangling = LeadRecord {
        id: "D-2".into(),
        name: "Orphan".into(),
        value: 90.0,
        target: 100.0,
        trend: 4.0,
        lag_id: Some("L-999".into()),
        department: "HR".into(),
        period: "Current".into(),
    };
    l1.leads.push(linked.clone());

    let overview = Overview::live(&[], &[l1], &[linked, dangling], &[], &cfg.overview);
    assert_eq!(overview.lead.value, 50.0);
    assert_eq!(overview.lead.target, 55.0);
    assert_eq!(overview.lead.trend, 2.0);
    assert_eq!(overview.wig.value, 0.0);
}

#[test]
fn mock_overview_uses_fixed_cards() {
    let o = Overview::mock();
    assert_eq!((o.wig.value, o.wig.target, o.wig.trend), (85.0, 90.0, 5.0));
    assert_eq!((o.lag.value, o.lag.target, o.lag.trend), (78.0, 80.0, -2.0));
    assert_eq!(o.activity.value, 156.0);
}

#[test]
fn live_breakdown_groups_by_department() {
    let depts: Vec<String> = vec!["HR".into(), "Finance".into(), "Marketing".into()];
    let lags = vec![
        lag("a", 80.0, 100.0, "HR"),
        lag("b", 60.0, 100.0, "hr"),
        lag("c", 90.0, 100.0, "Finance"),
    ];
    let out = department_breakdown_live(&depts, &lags);
    assert_eq!(out[0].score, Some(70));
    assert_eq!(out[1].score, Some(90));
    assert_eq!(out[2].score, None);
}

#[test]
fn mock_breakdown_stays_in_range() {
    let depts: Vec<String> = vec!["HR".into(), "Finance".into()];
    let mut rng = JitterRng::from_seed(3);
    for _ in 0..100 {
        for d in department_breakdown_mock(&depts, &mut rng) {
            let s = d.score.unwrap();
            assert!((75..=94).contains(&s), "{}: {s}", d.department);
        }
    }
}
