//! Live path: row mapping and LAG ← LEAD enrichment.

use fourdx_core::{
    source::rows_from_grid,
    transform::{enrich, lag_from_row, lead_from_row, wig_from_row, DropReason},
    types::RawRow,
};
use serde_json::json;

fn row(pairs: &[(&str, &str)]) -> RawRow {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn lag_row_maps_named_columns() {
    let lag = lag_from_row(&row(&[
        ("Metric ID", "L-1"),
        ("Metric Name", "Volunteer Retention"),
        ("Current Value", "72"),
        ("Target Value", "80"),
        ("Trend %", "3.5%"),
        ("Department", "HR"),
        ("Period", "2024-06"),
    ]));
    assert_eq!(lag.id, "L-1");
    assert_eq!(lag.name, "Volunteer Retention");
    assert_eq!(lag.value, 72.0);
    assert_eq!(lag.target, 80.0);
    assert_eq!(lag.trend, 3.5);
    assert_eq!(lag.department, "HR");
    assert_eq!(lag.period, "2024-06");
    assert!(lag.leads.is_empty());
}

#[test]
fn missing_fields_fall_back() {
    let lag = lag_from_row(&row(&[("Current Value", "n/a")]));
    assert!(lag.id.starts_with("lag-"), "synthesized id: {}", lag.id);
    assert_eq!(lag.name, "Unknown Metric");
    assert_eq!(lag.value, 0.0);
    assert_eq!(lag.target, 0.0);
    assert_eq!(lag.department, "General");
    assert_eq!(lag.period, "Current");

    let lead = lead_from_row(&row(&[("Lead ID", ""), ("Related LAG ID", "")]));
    assert!(lead.id.starts_with("lead-"));
    assert_eq!(lead.name, "Unknown Lead");
    assert_eq!(lead.lag_id, None);

    let wig = wig_from_row(&RawRow::new());
    assert!(wig.id.starts_with("wig-"));
    assert_eq!(wig.name, "Unknown WIG");
}

#[test]
fn synthesized_ids_are_unique() {
    let a = lag_from_row(&RawRow::new());
    let b = lag_from_row(&RawRow::new());
    assert_ne!(a.id, b.id);
}

#[test]
fn leads_attach_to_matching_lag() {
    let lags = vec![
        lag_from_row(&row(&[("Metric ID", "L-1"), ("Target Value", "10")])),
        lag_from_row(&row(&[("Metric ID", "L-2"), ("Target Value", "10")])),
    ];
    let leads = vec![
        lead_from_row(&row(&[("Lead ID", "D-1"), ("Related LAG ID", "L-1")])),
        lead_from_row(&row(&[("Lead ID", "D-2"), ("Related LAG ID", "L-1")])),
        lead_from_row(&row(&[("Lead ID", "D-3"), ("Related LAG ID", "L-2")])),
    ];
    let out = enrich(lags, &leads);
    assert_eq!(out.lags[0].leads.len(), 2);
    assert_eq!(out.lags[1].leads.len(), 1);
    assert_eq!(out.lags[1].leads[0].id, "D-3");
    assert!(out.dropped.is_empty());
}

#[test]
fn dangling_lead_is_absent_from_every_lag() {
    let lags = vec![
        lag_from_row(&row(&[("Metric ID", "L-1")])),
        lag_from_row(&row(&[("Metric ID", "L-2")])),
    ];
    let leads = vec![
        lead_from_row(&row(&[("Lead ID", "D-1"), ("Related LAG ID", "L-1")])),
        lead_from_row(&row(&[("Lead ID", "D-9"), ("Related LAG ID", "L-999")])),
        lead_from_row(&row(&[("Lead ID", "D-0")])),
    ];
    let out = enrich(lags, &leads);

    for lag in &out.lags {
        assert!(
            lag.leads.iter().all(|l| l.id != "D-9" && l.id != "D-0"),
            "{} kept an orphan lead",
            lag.id
        );
    }
    assert_eq!(out.dropped.len(), 2);
    assert_eq!(out.dropped[0].lead_id, "D-9");
    assert_eq!(
        out.dropped[0].reason,
        DropReason::Dangling { lag_id: "L-999".into() }
    );
    assert_eq!(out.dropped[1].reason, DropReason::Unlinked);
}

#[test]
fn grid_uses_first_row_as_headers() {
    let grid = vec![
        vec![json!("Metric ID"), json!("Current Value"), json!("Target Value")],
        vec![json!("L-1"), json!(42.5), json!(50)],
        vec![json!("L-2"), json!(0)],
        vec![json!(null), json!(false), json!(""), json!("extra")],
    ];
    let rows = rows_from_grid(&grid);
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["Current Value"], "42.5");
    assert_eq!(rows[0]["Target Value"], "50");
    // Zero and missing cells read as blank.
    assert_eq!(rows[1]["Current Value"], "");
    assert_eq!(rows[1]["Target Value"], "");
    assert_eq!(rows[2]["Metric ID"], "");
    assert_eq!(rows[2].len(), 3);

    let lag = lag_from_row(&rows[0]);
    assert_eq!(lag.value, 42.5);
}

#[test]
fn empty_grid_has_no_rows() {
    assert!(rows_from_grid(&[]).is_empty());
    assert!(rows_from_grid(&[vec![json!("Metric ID")]]).is_empty());
}
