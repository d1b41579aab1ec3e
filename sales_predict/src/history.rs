//! Sales history handling: wire types, date coercion and CSV loading

use crate::error::{PredictError, Result};
use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

/// One observed sales figure, as supplied by a client.
///
/// The date stays a raw string at this boundary: clients send a mix of
/// formats and the pipeline coerces anything unparseable to a missing
/// marker instead of rejecting the whole request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// Observation date as received
    #[serde(rename = "Orderdate")]
    pub date: String,
    /// Observed sales amount
    #[serde(rename = "Sales")]
    pub sales: f64,
}

/// Free-text product attributes supplied per request.
///
/// No normalization is guaranteed at this boundary; values are matched
/// against the trained vocabulary later in the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductDescriptor {
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Subcategory")]
    pub subcategory: String,
    #[serde(rename = "City")]
    pub city: String,
    #[serde(rename = "Region")]
    pub region: String,
}

impl ProductDescriptor {
    /// Attribute names paired with their raw values, in catalog order
    pub fn attributes(&self) -> [(&'static str, &str); 4] {
        [
            ("Category", self.category.as_str()),
            ("Subcategory", self.subcategory.as_str()),
            ("City", self.city.as_str()),
            ("Region", self.region.as_str()),
        ]
    }

    /// Partition key for series that must not contaminate each other
    pub fn group_key(&self) -> String {
        format!("{}|{}|{}", self.city, self.category, self.subcategory)
    }
}

/// One position in the combined, date-ordered series the feature
/// builders scan. `date` is `None` for rows whose date failed to parse;
/// `sales` is `None` for the to-be-predicted row.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesRow {
    pub date: Option<NaiveDate>,
    pub sales: Option<f64>,
}

/// Date formats accepted from clients, tried in order. ISO wins;
/// day-first forms follow.
const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%d-%m-%Y", "%d/%m/%Y", "%Y/%m/%d"];

/// Parse a client-supplied date string, returning `None` when no known
/// format matches.
///
/// A trailing time component (`2024-01-05T00:00:00` or
/// `2024-01-05 00:00:00`) is ignored.
pub fn parse_client_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    let date_part = trimmed
        .split(|c| c == 'T' || c == ' ')
        .next()
        .unwrap_or(trimmed);

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
}

/// Convert raw history records into series rows, coercing unparseable
/// dates to the missing marker. Returns the rows together with how many
/// dates failed to parse.
pub fn to_series_rows(history: &[HistoryRecord]) -> (Vec<SeriesRow>, usize) {
    let mut dropped = 0usize;
    let rows = history
        .iter()
        .map(|record| {
            let date = parse_client_date(&record.date);
            if date.is_none() {
                dropped += 1;
                debug!("unparseable history date {:?}, treating as missing", record.date);
            }
            SeriesRow {
                date,
                sales: Some(record.sales),
            }
        })
        .collect();

    (rows, dropped)
}

/// Stable sort by date with missing dates ordered last.
///
/// Stability matters: rows sharing a date (and the undated tail) keep
/// their arrival order, so the appended target row stays behind any
/// history row with the same date.
pub fn sort_rows_by_date(rows: &mut [SeriesRow]) {
    rows.sort_by(|a, b| match (a.date, b.date) {
        (Some(da), Some(db)) => da.cmp(&db),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
}

/// Loader for offline history files
#[derive(Debug)]
pub struct HistoryLoader;

impl HistoryLoader {
    /// Load history records from a CSV file with a header row.
    ///
    /// Columns are detected by name: the first header containing "date"
    /// holds the dates, the first containing "sales", "qty" or
    /// "quantity" holds the target values.
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Vec<HistoryRecord>> {
        let file = File::open(path)?;
        let mut reader = csv::Reader::from_reader(file);

        let headers = reader.headers()?.clone();
        let date_idx = Self::detect_column(&headers, &["date"])?;
        let sales_idx = Self::detect_column(&headers, &["sales", "qty", "quantity"])?;

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row?;
            let date = row
                .get(date_idx)
                .ok_or_else(|| {
                    PredictError::InvalidInput("CSV row is missing the date column".to_string())
                })?
                .to_string();
            let sales: f64 = row
                .get(sales_idx)
                .ok_or_else(|| {
                    PredictError::InvalidInput("CSV row is missing the sales column".to_string())
                })?
                .trim()
                .parse()
                .map_err(|e| {
                    PredictError::InvalidInput(format!("Non-numeric sales value: {}", e))
                })?;

            records.push(HistoryRecord { date, sales });
        }

        Ok(records)
    }

    /// Find the first header whose lowercase name contains any needle
    fn detect_column(headers: &csv::StringRecord, needles: &[&str]) -> Result<usize> {
        for (idx, name) in headers.iter().enumerate() {
            let lower = name.to_lowercase();
            if needles.iter().any(|needle| lower.contains(needle)) {
                return Ok(idx);
            }
        }

        Err(PredictError::InvalidInput(format!(
            "No column matching {:?} found in CSV header",
            needles
        )))
    }
}
