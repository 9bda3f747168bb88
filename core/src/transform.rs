//! Live path: flat worksheet rows into metric records.
//!
//! Column names are the human-readable headers of the 4DX workbooks.
//! Numbers are parsed leniently (leading numeric prefix, else 0).
//! Missing ids are synthesized so every record stays addressable.

use crate::{
    metric::{LagRecord, LeadRecord, WigRecord, DEFAULT_DEPARTMENT, DEFAULT_PERIOD},
    types::{MetricId, RawRow},
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub mod columns {
    pub const METRIC_ID: &str = "Metric ID";
    pub const METRIC_NAME: &str = "Metric Name";
    pub const LEAD_ID: &str = "Lead ID";
    pub const LEAD_NAME: &str = "Lead Name";
    pub const WIG_ID: &str = "WIG ID";
    pub const WIG_NAME: &str = "WIG Name";
    pub const CURRENT_VALUE: &str = "Current Value";
    pub const TARGET_VALUE: &str = "Target Value";
    pub const TREND: &str = "Trend %";
    pub const RELATED_LAG_ID: &str = "Related LAG ID";
    pub const DEPARTMENT: &str = "Department";
    pub const PERIOD: &str = "Period";
}

/// Parse the leading numeric prefix of `s`, e.g. `"12.5%"` → 12.5.
/// Anything without a numeric prefix, or non-finite, yields 0.
pub fn parse_number(s: &str) -> f64 {
    let t = s.trim_start();
    let bytes = t.as_bytes();
    let mut end = 0;

    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return 0.0;
    }
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    match t[..end].parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

fn text<'a>(row: &'a RawRow, column: &str) -> Option<&'a str> {
    row.get(column).map(String::as_str).filter(|s| !s.is_empty())
}

fn text_or(row: &RawRow, column: &str, fallback: &str) -> String {
    text(row, column).unwrap_or(fallback).to_string()
}

fn number(row: &RawRow, column: &str) -> f64 {
    text(row, column).map(parse_number).unwrap_or(0.0)
}

fn id_or_synthesized(row: &RawRow, column: &str, prefix: &str) -> MetricId {
    match text(row, column) {
        Some(id) => id.to_string(),
        None => format!("{prefix}-{}", uuid::Uuid::new_v4()),
    }
}

pub fn lag_from_row(row: &RawRow) -> LagRecord {
    LagRecord {
        id: id_or_synthesized(row, columns::METRIC_ID, "lag"),
        name: text_or(row, columns::METRIC_NAME, "Unknown Metric"),
        value: number(row, columns::CURRENT_VALUE),
        target: number(row, columns::TARGET_VALUE),
        trend: number(row, columns::TREND),
        department: text_or(row, columns::DEPARTMENT, DEFAULT_DEPARTMENT),
        period: text_or(row, columns::PERIOD, DEFAULT_PERIOD),
        leads: Vec::new(),
    }
}

pub fn lead_from_row(row: &RawRow) -> LeadRecord {
    LeadRecord {
        id: id_or_synthesized(row, columns::LEAD_ID, "lead"),
        name: text_or(row, columns::LEAD_NAME, "Unknown Lead"),
        value: number(row, columns::CURRENT_VALUE),
        target: number(row, columns::TARGET_VALUE),
        trend: number(row, columns::TREND),
        lag_id: text(row, columns::RELATED_LAG_ID).map(str::to_string),
        department: text_or(row, columns::DEPARTMENT, DEFAULT_DEPARTMENT),
        period: text_or(row, columns::PERIOD, DEFAULT_PERIOD),
    }
}

pub fn wig_from_row(row: &RawRow) -> WigRecord {
    WigRecord {
        id: id_or_synthesized(row, columns::WIG_ID, "wig"),
        name: text_or(row, columns::WIG_NAME, "Unknown WIG"),
        value: number(row, columns::CURRENT_VALUE),
        target: number(row, columns::TARGET_VALUE),
        trend: number(row, columns::TREND),
        department: text_or(row, columns::DEPARTMENT, DEFAULT_DEPARTMENT),
        period: text_or(row, columns::PERIOD, DEFAULT_PERIOD),
    }
}

/// Why a lead was left out of the enriched view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// The row carried no "Related LAG ID".
    Unlinked,
    /// The "Related LAG ID" matched no LAG record.
    Dangling { lag_id: MetricId },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DroppedLead {
    pub lead_id: MetricId,
    pub reason: DropReason,
}

#[derive(Debug, Clone, Default)]
pub struct Enrichment {
    pub lags: Vec<LagRecord>,
    pub dropped: Vec<DroppedLead>,
}

/// Attach each lead to the LAG whose id equals its `lag_id`.
/// Leads that match nothing are excluded from every LAG and reported.
pub fn enrich(lags: Vec<LagRecord>, leads: &[LeadRecord]) -> Enrichment {
    let known: HashSet<&str> = lags.iter().map(|l| l.id.as_str()).collect();

    let dropped: Vec<DroppedLead> = leads
        .iter()
        .filter_map(|lead| match &lead.lag_id {
            None => Some(DroppedLead {
                lead_id: lead.id.clone(),
                reason: DropReason::Unlinked,
            }),
            Some(id) if !known.contains(id.as_str()) => Some(DroppedLead {
                lead_id: lead.id.clone(),
                reason: DropReason::Dangling { lag_id: id.clone() },
            }),
            Some(_) => None,
        })
        .collect();

    let lags = lags
        .into_iter()
        .map(|mut lag| {
            lag.leads = leads
                .iter()
                .filter(|lead| lead.lag_id.as_deref() == Some(lag.id.as_str()))
                .cloned()
                .collect();
            lag
        })
        .collect();

    if !dropped.is_empty() {
        log::warn!(
            "{} lead measure(s) reference no known LAG and were left out",
            dropped.len()
        );
    }

    Enrichment { lags, dropped }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_number_takes_leading_prefix() {
        assert_eq!(parse_number("12.5%"), 12.5);
        assert_eq!(parse_number("  7 "), 7.0);
        assert_eq!(parse_number("-3e2x"), -300.0);
        assert_eq!(parse_number(".5"), 0.5);
        assert_eq!(parse_number("4."), 4.0);
        assert_eq!(parse_number("1e"), 1.0);
    }

    #[test]
    fn parse_number_falls_back_to_zero() {
        assert_eq!(parse_number("abc"), 0.0);
        assert_eq!(parse_number(""), 0.0);
        assert_eq!(parse_number("-"), 0.0);
        assert_eq!(parse_number("."), 0.0);
        assert_eq!(parse_number("1e999"), 0.0);
    }
}
