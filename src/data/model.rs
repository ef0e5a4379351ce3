use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::ParseFailure;

// ---------------------------------------------------------------------------
// Source format – how one input file writes its numbers
// ---------------------------------------------------------------------------

/// Fractional separator used for numeric text in one input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecimalConvention {
    /// `-4,7`
    Comma,
    /// `-4.7`
    Period,
}

impl DecimalConvention {
    pub fn separator(self) -> char {
        match self {
            DecimalConvention::Comma => ',',
            DecimalConvention::Period => '.',
        }
    }
}

/// Field delimiter of one input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Delimiter {
    Semicolon,
    Comma,
}

impl Delimiter {
    pub fn as_byte(self) -> u8 {
        match self {
            Delimiter::Semicolon => b';',
            Delimiter::Comma => b',',
        }
    }
}

/// Delimiter and decimal convention, declared per source by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceFormat {
    pub delimiter: Delimiter,
    pub decimal: DecimalConvention,
}

impl SourceFormat {
    /// `;` between fields, `,` as decimal separator (energy-company exports).
    pub const EUROPEAN: SourceFormat = SourceFormat {
        delimiter: Delimiter::Semicolon,
        decimal: DecimalConvention::Comma,
    };

    /// `,` between fields, `.` as decimal separator (weather-service exports).
    pub const INTERNATIONAL: SourceFormat = SourceFormat {
        delimiter: Delimiter::Comma,
        decimal: DecimalConvention::Period,
    };

    pub const PRESETS: [SourceFormat; 2] = [SourceFormat::EUROPEAN, SourceFormat::INTERNATIONAL];
}

impl Default for SourceFormat {
    fn default() -> Self {
        SourceFormat::EUROPEAN
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let delim = match self.delimiter {
            Delimiter::Semicolon => "';'",
            Delimiter::Comma => "','",
        };
        write!(f, "{delim} fields, '{}' decimals", self.decimal.separator())
    }
}

// ---------------------------------------------------------------------------
// Raw input
// ---------------------------------------------------------------------------

/// A single input cell that may carry a temperature.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Text(String),
    Number(f64),
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

impl From<f64> for RawValue {
    fn from(v: f64) -> Self {
        RawValue::Number(v)
    }
}

/// One parsed input file: normalized headers plus the data rows as text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Build a table, normalizing every header (trimmed, whitespace runs
    /// collapsed, case preserved).
    pub fn new<H, S>(headers: H, rows: Vec<Vec<String>>) -> Self
    where
        H: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        RawTable {
            headers: headers
                .into_iter()
                .map(|h| normalize_header(h.as_ref()))
                .collect(),
            rows,
        }
    }

    /// Cell at (`row`, `col`). Missing cells of short rows read as empty.
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// `"  Daily   average temperature "` → `"Daily average temperature"`.
pub fn normalize_header(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ---------------------------------------------------------------------------
// Aggregates
// ---------------------------------------------------------------------------

/// Mean temperature of one local calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyAggregate {
    pub date: NaiveDate,
    pub mean_temperature: f64,
}

impl DailyAggregate {
    /// `2024-01-01 (Mon)`
    pub fn display_date(&self) -> String {
        self.date.format("%Y-%m-%d (%a)").to_string()
    }

    /// Two decimals, for display only.
    pub fn display_temperature(&self) -> String {
        format!("{:.2}", self.mean_temperature)
    }
}

/// The result of aggregating one file.
///
/// `days` is sorted ascending and unique per date. `dropped` lists every
/// record that did not contribute, in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct FileAggregate {
    pub days: Vec<DailyAggregate>,
    pub rows_read: usize,
    pub dropped: Vec<ParseFailure>,
    pub time_column: String,
    pub temperature_column: String,
}

impl FileAggregate {
    /// The file parsed but no record survived: a warning-level condition.
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn rows_used(&self) -> usize {
        self.rows_read - self.dropped.len()
    }
}

/// Combined daily series: sorted ascending by date, one entry per date,
/// never empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySeries {
    days: Vec<DailyAggregate>,
}

impl DailySeries {
    /// Wrap days that are already sorted and unique. Returns `None` when
    /// `days` is empty.
    pub(crate) fn from_sorted(days: Vec<DailyAggregate>) -> Option<Self> {
        debug_assert!(days.windows(2).all(|w| w[0].date < w[1].date));
        if days.is_empty() {
            None
        } else {
            Some(DailySeries { days })
        }
    }

    pub fn days(&self) -> &[DailyAggregate] {
        &self.days
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn first_date(&self) -> NaiveDate {
        self.days[0].date
    }

    pub fn last_date(&self) -> NaiveDate {
        self.days[self.days.len() - 1].date
    }

    pub fn get(&self, date: NaiveDate) -> Option<f64> {
        self.days
            .binary_search_by(|d| d.date.cmp(&date))
            .ok()
            .map(|i| self.days[i].mean_temperature)
    }

    /// (lowest, highest) daily mean in the series.
    pub fn temperature_extent(&self) -> (f64, f64) {
        self.days.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY),
            |(lo, hi), d| (lo.min(d.mean_temperature), hi.max(d.mean_temperature)),
        )
    }
}

/// Days of a series whose mean lies in `[lo, hi]`, ascending by date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterResult {
    pub lo: f64,
    pub hi: f64,
    pub days: Vec<DailyAggregate>,
}

impl FilterResult {
    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}
