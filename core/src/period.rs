//! Period selection: the time scope that scales mock metric values.
//!
//! A selection resolves to a `PeriodScale { period_count, base_multiplier }`.
//! Each variant has its own base constant and per-period step:
//!
//!   Monthly     0.80 + n * 0.10
//!   Quarterly   0.70 + n * 0.15
//!   Cumulative  0.60 + n * 0.08   (n = max(1, end_month - start_month + 1))
//!
//! Cumulative only looks at the month-of-year component of each bound;
//! the year is ignored.

use crate::error::{DashError, DashResult};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Months offered by the filter panel.
pub const AVAILABLE_MONTHS: [&str; 6] = [
    "2024-01", "2024-02", "2024-03", "2024-04", "2024-05", "2024-06",
];

/// A calendar month, written `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> DashResult<Self> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(|_| Self { year, month })
            .ok_or_else(|| DashError::InvalidMonthKey(format!("{year:04}-{month:02}")))
    }

    pub fn parse(s: &str) -> DashResult<Self> {
        let trimmed = s.trim();
        let date = NaiveDate::parse_from_str(&format!("{trimmed}-01"), "%Y-%m-%d")
            .map_err(|_| DashError::InvalidMonthKey(s.to_string()))?;
        // Reject forms chrono tolerates but the key format does not, e.g. "2024-6".
        if trimmed.len() != 7 {
            return Err(DashError::InvalidMonthKey(s.to_string()));
        }
        Ok(Self {
            year: date.year(),
            month: date.month(),
        })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Month of year, 1..=12.
    pub fn month(&self) -> u32 {
        self.month
    }

    /// Short label such as "Jun 2024".
    pub fn display(&self) -> String {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .map(|d| d.format("%b %Y").to_string())
            .unwrap_or_else(|| self.to_string())
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = DashError;
    fn from_str(s: &str) -> DashResult<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for MonthKey {
    type Error = DashError;
    fn try_from(s: String) -> DashResult<Self> {
        Self::parse(&s)
    }
}

impl From<MonthKey> for String {
    fn from(key: MonthKey) -> String {
        key.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Quarter {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl Quarter {
    pub const ALL: [Quarter; 4] = [Quarter::Q1, Quarter::Q2, Quarter::Q3, Quarter::Q4];
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Quarter::Q1 => "Q1",
            Quarter::Q2 => "Q2",
            Quarter::Q3 => "Q3",
            Quarter::Q4 => "Q4",
        };
        f.write_str(tag)
    }
}

impl FromStr for Quarter {
    type Err = DashError;
    fn from_str(s: &str) -> DashResult<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "Q1" => Ok(Quarter::Q1),
            "Q2" => Ok(Quarter::Q2),
            "Q3" => Ok(Quarter::Q3),
            "Q4" => Ok(Quarter::Q4),
            _ => Err(DashError::InvalidQuarter(s.to_string())),
        }
    }
}

/// The user's chosen time scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "period", rename_all = "snake_case")]
pub enum PeriodSelection {
    Monthly { months: BTreeSet<MonthKey> },
    Quarterly { quarters: BTreeSet<Quarter> },
    Cumulative { start: MonthKey, end: MonthKey },
}

impl Default for PeriodSelection {
    fn default() -> Self {
        let mut months = BTreeSet::new();
        months.insert(MonthKey { year: 2024, month: 6 });
        PeriodSelection::Monthly { months }
    }
}

/// Normalized scaling for a selection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodScale {
    pub period_count: u32,
    pub base_multiplier: f64,
}

impl PeriodScale {
    /// True when the selection set was empty and only the base constant applies.
    pub fn is_degenerate(&self) -> bool {
        self.period_count == 0
    }
}

impl PeriodSelection {
    pub fn monthly<I, S>(months: I) -> DashResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let months = months
            .into_iter()
            .map(|m| MonthKey::parse(m.as_ref()))
            .collect::<DashResult<BTreeSet<_>>>()?;
        Ok(PeriodSelection::Monthly { months })
    }

    pub fn quarterly<I, S>(quarters: I) -> DashResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let quarters = quarters
            .into_iter()
            .map(|q| q.as_ref().parse())
            .collect::<DashResult<BTreeSet<Quarter>>>()?;
        Ok(PeriodSelection::Quarterly { quarters })
    }

    pub fn cumulative(start: &str, end: &str) -> DashResult<Self> {
        Ok(PeriodSelection::Cumulative {
            start: MonthKey::parse(start)?,
            end: MonthKey::parse(end)?,
        })
    }

    pub fn scale(&self) -> PeriodScale {
        let scale = match self {
            PeriodSelection::Monthly { months } => {
                let n = months.len() as u32;
                PeriodScale {
                    period_count: n,
                    base_multiplier: 0.8 + f64::from(n) * 0.1,
                }
            }
            PeriodSelection::Quarterly { quarters } => {
                let n = quarters.len() as u32;
                PeriodScale {
                    period_count: n,
                    base_multiplier: 0.7 + f64::from(n) * 0.15,
                }
            }
            PeriodSelection::Cumulative { start, end } => {
                if start > end {
                    log::warn!("cumulative period has start {start} after end {end}");
                }
                let span = i64::from(end.month()) - i64::from(start.month()) + 1;
                let n = span.max(1) as u32;
                PeriodScale {
                    period_count: n,
                    base_multiplier: 0.6 + f64::from(n) * 0.08,
                }
            }
        };
        if scale.is_degenerate() {
            log::warn!(
                "empty {} selection; using base multiplier {:.2}",
                self.kind_name(),
                scale.base_multiplier
            );
        }
        scale
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            PeriodSelection::Monthly { .. } => "monthly",
            PeriodSelection::Quarterly { .. } => "quarterly",
            PeriodSelection::Cumulative { .. } => "cumulative",
        }
    }

    /// Months to plot on the trend chart, in calendar order regardless of
    /// the order they were toggled on.
    pub fn chart_months(&self) -> Vec<MonthKey> {
        match self {
            PeriodSelection::Monthly { months } => months.iter().copied().collect(),
            PeriodSelection::Quarterly { .. } => Vec::new(),
            PeriodSelection::Cumulative { start, end } => {
                let mut out = Vec::new();
                let mut cursor = *start;
                while cursor <= *end {
                    out.push(cursor);
                    cursor = if cursor.month == 12 {
                        MonthKey { year: cursor.year + 1, month: 1 }
                    } else {
                        MonthKey { year: cursor.year, month: cursor.month + 1 }
                    };
                }
                out
            }
        }
    }

    /// Add the month if absent, remove it if present.
    /// Any other variant is replaced by a monthly selection of just that month.
    pub fn toggle_month(&mut self, key: MonthKey) {
        match self {
            PeriodSelection::Monthly { months } => {
                if !months.remove(&key) {
                    months.insert(key);
                }
            }
            _ => {
                *self = PeriodSelection::Monthly {
                    months: BTreeSet::from([key]),
                };
            }
        }
    }

    /// Add the quarter if absent, remove it if present.
    pub fn toggle_quarter(&mut self, quarter: Quarter) {
        match self {
            PeriodSelection::Quarterly { quarters } => {
                if !quarters.remove(&quarter) {
                    quarters.insert(quarter);
                }
            }
            _ => {
                *self = PeriodSelection::Quarterly {
                    quarters: BTreeSet::from([quarter]),
                };
            }
        }
    }

    pub fn label(&self) -> String {
        match self {
            PeriodSelection::Monthly { months } => {
                let parts: Vec<String> = months.iter().map(|m| m.display()).collect();
                format!("Monthly ({})", parts.join(", "))
            }
            PeriodSelection::Quarterly { quarters } => {
                let parts: Vec<String> = quarters.iter().map(|q| q.to_string()).collect();
                format!("Quarterly ({})", parts.join(", "))
            }
            PeriodSelection::Cumulative { start, end } => {
                format!("Cumulative ({} to {})", start.display(), end.display())
            }
        }
    }
}

/// All months the filter panel can offer, parsed.
pub fn available_months() -> Vec<MonthKey> {
    AVAILABLE_MONTHS
        .iter()
        .filter_map(|m| MonthKey::parse(m).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_key_rejects_bad_input() {
        assert!(MonthKey::parse("2024-13").is_err());
        assert!(MonthKey::parse("2024-6").is_err());
        assert!(MonthKey::parse("June").is_err());
        assert_eq!(MonthKey::parse("2024-06").unwrap().to_string(), "2024-06");
    }

    #[test]
    fn month_key_serializes_as_string() {
        let key = MonthKey::parse("2025-02").unwrap();
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"2025-02\"");
        let back: MonthKey = serde_json::from_str("\"2025-02\"").unwrap();
        assert_eq!(back, key);
    }

    #[test]
    fn chart_months_walk_year_boundary() {
        let sel = PeriodSelection::cumulative("2024-11", "2025-02").unwrap();
        let months: Vec<String> = sel.chart_months().iter().map(|m| m.to_string()).collect();
        assert_eq!(months, vec!["2024-11", "2024-12", "2025-01", "2025-02"]);
    }

    #[test]
    fn chart_months_follow_calendar_not_toggle_order() {
        let mut sel = PeriodSelection::monthly(["2024-06"]).unwrap();
        sel.toggle_month(MonthKey::parse("2024-02").unwrap());
        sel.toggle_month(MonthKey::parse("2024-04").unwrap());
        let months: Vec<String> = sel.chart_months().iter().map(|m| m.to_string()).collect();
        assert_eq!(months, vec!["2024-02", "2024-04", "2024-06"]);
    }
}
