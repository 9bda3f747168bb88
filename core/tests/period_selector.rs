//! Period selector tests: count and multiplier per variant.

use fourdx_core::{
    error::DashError,
    period::{available_months, MonthKey, PeriodSelection, Quarter},
};

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn two_months_give_unit_multiplier() {
    let sel = PeriodSelection::monthly(["2025-01", "2025-02"]).unwrap();
    let scale = sel.scale();
    assert_eq!(scale.period_count, 2);
    assert!(approx(scale.base_multiplier, 1.0), "got {}", scale.base_multiplier);
}

#[test]
fn cumulative_half_year() {
    let sel = PeriodSelection::cumulative("2025-01", "2025-06").unwrap();
    let scale = sel.scale();
    assert_eq!(scale.period_count, 6);
    assert!(approx(scale.base_multiplier, 1.08), "got {}", scale.base_multiplier);
}

#[test]
fn quarterly_scales_by_quarter_count() {
    let sel = PeriodSelection::quarterly(["Q1", "q3"]).unwrap();
    let scale = sel.scale();
    assert_eq!(scale.period_count, 2);
    assert!(approx(scale.base_multiplier, 1.0));
}

#[test]
fn cumulative_ignores_year_and_floors_at_one() {
    // Month components only: 03 → 02 spans nothing, floored to 1.
    let sel = PeriodSelection::cumulative("2024-03", "2025-02").unwrap();
    let scale = sel.scale();
    assert_eq!(scale.period_count, 1);
    assert!(approx(scale.base_multiplier, 0.68));
}

#[test]
fn empty_selection_uses_base_constant() {
    let monthly = PeriodSelection::monthly(Vec::<&str>::new()).unwrap().scale();
    assert_eq!(monthly.period_count, 0);
    assert!(monthly.is_degenerate());
    assert!(approx(monthly.base_multiplier, 0.8));

    let quarterly = PeriodSelection::quarterly(Vec::<&str>::new()).unwrap().scale();
    assert!(approx(quarterly.base_multiplier, 0.7));
}

#[test]
fn duplicate_months_count_once() {
    let sel = PeriodSelection::monthly(["2024-06", "2024-06"]).unwrap();
    assert_eq!(sel.scale().period_count, 1);
}

#[test]
fn invalid_inputs_are_rejected() {
    assert!(matches!(
        PeriodSelection::monthly(["2024-00"]),
        Err(DashError::InvalidMonthKey(_))
    ));
    assert!(matches!(
        PeriodSelection::quarterly(["Q5"]),
        Err(DashError::InvalidQuarter(_))
    ));
}

#[test]
fn toggle_month_adds_then_removes() {
    let mut sel = PeriodSelection::default();
    let may = MonthKey::parse("2024-05").unwrap();
    sel.toggle_month(may);
    assert_eq!(sel.scale().period_count, 2);
    sel.toggle_month(may);
    assert_eq!(sel, PeriodSelection::default());
}

#[test]
fn toggle_on_other_variant_switches_kind() {
    let mut sel = PeriodSelection::cumulative("2024-01", "2024-06").unwrap();
    sel.toggle_quarter(Quarter::Q2);
    assert_eq!(sel, PeriodSelection::quarterly(["Q2"]).unwrap());
}

#[test]
fn default_is_june_2024_and_filter_lists_six_months() {
    let sel = PeriodSelection::default();
    assert_eq!(sel.label(), "Monthly (Jun 2024)");
    assert_eq!(available_months().len(), 6);
}

#[test]
fn selection_round_trips_through_json() {
    let sel = PeriodSelection::cumulative("2024-02", "2024-05").unwrap();
    let json = serde_json::to_string(&sel).unwrap();
    assert!(json.contains("\"period\":\"cumulative\""), "{json}");
    let back: PeriodSelection = serde_json::from_str(&json).unwrap();
    assert_eq!(back, sel);
}
