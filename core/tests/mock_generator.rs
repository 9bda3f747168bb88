//! Mock generator tests. Trend is jittered, so trend assertions are
//! bounds, not exact values.

use fourdx_core::{
    generator::{MetricGenerator, LAG_TEMPLATES},
    metric::Measure,
    rng::{JitterRng, JitterSlot, RngBank},
};

#[test]
fn unit_multiplier_reproduces_baselines() {
    let mut rng = JitterRng::from_seed(1);
    let lags = MetricGenerator::new().generate(1.0, "test", &mut rng);

    assert_eq!(lags.len(), 4);
    let csat = &lags[0];
    assert_eq!(csat.id, "lag1");
    assert_eq!(csat.name, "Customer Satisfaction Score");
    assert_eq!(csat.value, 75.0);
    assert_eq!(csat.target, 85.0);
    assert_eq!(csat.leads.len(), 3);

    for (lag, template) in lags.iter().zip(LAG_TEMPLATES.iter()) {
        assert_eq!(lag.value, template.baseline);
        for (lead, lt) in lag.leads.iter().zip(template.leads.iter()) {
            assert_eq!(lead.value, lt.baseline);
            assert_eq!(lead.lag_id.as_deref(), Some(template.id));
        }
    }
}

#[test]
fn values_scale_and_round_but_targets_do_not() {
    let mut rng = JitterRng::from_seed(2);
    let lags = MetricGenerator::new().generate(1.08, "test", &mut rng);
    // 75 * 1.08 = 81
    assert_eq!(lags[0].value, 81.0);
    assert_eq!(lags[0].target, 85.0);
    // 1200 * 1.08 = 1296
    assert_eq!(lags[1].value, 1296.0);
    for lag in &lags {
        assert_eq!(lag.value.fract(), 0.0, "{} not rounded", lag.id);
    }
}

#[test]
fn trend_stays_within_half_amplitude() {
    let bank = RngBank::new(0xFEED);
    let generator = MetricGenerator::new();
    for generation in 0..200 {
        let mut rng = bank.for_slot(JitterSlot::Trend, generation);
        let lags = generator.generate(1.0, "test", &mut rng);
        for (lag, t) in lags.iter().zip(LAG_TEMPLATES.iter()) {
            assert!(lag.trend.abs() <= t.jitter / 2.0, "{}: {}", lag.id, lag.trend);
            assert_eq!(lag.trend.fract(), 0.0);
            for (lead, lt) in lag.leads.iter().zip(t.leads.iter()) {
                assert!(lead.trend.abs() <= lt.jitter / 2.0, "{}: {}", lead.id, lead.trend);
            }
        }
    }
}

#[test]
fn templates_have_two_or_three_leads_and_bounded_jitter() {
    for t in LAG_TEMPLATES.iter() {
        assert!((2..=3).contains(&t.leads.len()), "{} has {} leads", t.id, t.leads.len());
        assert!((4.0..=12.0).contains(&t.jitter));
        for l in t.leads {
            assert!((4.0..=12.0).contains(&l.jitter));
            assert!(l.target > 0.0);
        }
        assert!(t.target > 0.0);
    }
}

#[test]
fn same_stream_same_records() {
    let bank = RngBank::new(99);
    let generator = MetricGenerator::new();
    let a = generator.generate(1.0, "p", &mut bank.for_slot(JitterSlot::Trend, 5));
    let b = generator.generate(1.0, "p", &mut bank.for_slot(JitterSlot::Trend, 5));
    assert_eq!(a, b);
    assert!(a.iter().all(|l| l.achievement_rate().is_some()));
}
