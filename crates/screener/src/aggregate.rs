//! Date-window selection and weekly resampling ahead of export.

use anomaly_watch_core::{DateRange, PriceRecord};
use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Temporal bucketing applied before export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// Flagged rows inside the range, unchanged
    Daily,
    /// Last flagged row of each week ending Monday, inside the range
    Weekly,
    /// Every flagged row, range ignored
    Unrestricted,
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Unrestricted => "all",
        };
        f.write_str(name)
    }
}

impl FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" | "day" | "d" => Ok(Self::Daily),
            "weekly" | "week" | "w" => Ok(Self::Weekly),
            "all" | "unrestricted" | "full" => Ok(Self::Unrestricted),
            other => Err(format!("unknown granularity: {other}")),
        }
    }
}

/// The Monday on or after `date`; a Monday maps to itself.
#[must_use]
pub fn week_ending_monday(date: NaiveDate) -> NaiveDate {
    let days_ahead = (7 - date.weekday().num_days_from_monday()) % 7;
    date + Duration::days(i64::from(days_ahead))
}

/// Keeps the chronologically last row of every week ending Monday.
///
/// Buckets span all tickers. The kept row is relabelled with its bucket's
/// Monday, and rows come out ordered by that Monday. Rows sharing the latest
/// date of a bucket resolve to the last one in input order.
#[must_use]
pub fn resample_weekly(records: &[PriceRecord]) -> Vec<PriceRecord> {
    let mut buckets: BTreeMap<NaiveDate, &PriceRecord> = BTreeMap::new();
    for record in records {
        let key = week_ending_monday(record.date);
        buckets
            .entry(key)
            .and_modify(|kept| {
                if record.date >= kept.date {
                    *kept = record;
                }
            })
            .or_insert(record);
    }

    buckets
        .into_iter()
        .map(|(monday, record)| {
            let mut row = record.clone();
            row.date = monday;
            row
        })
        .collect()
}

/// Applies `granularity` to an anomaly-filtered table.
///
/// `range` bounds the daily and weekly views; `None` leaves them unbounded.
/// The input is never modified.
#[must_use]
pub fn aggregate(
    anomalies: &[PriceRecord],
    range: Option<&DateRange>,
    granularity: Granularity,
) -> Vec<PriceRecord> {
    let in_range = |r: &&PriceRecord| range.map_or(true, |range| range.contains(r.date));

    let out = match granularity {
        Granularity::Unrestricted => anomalies.to_vec(),
        Granularity::Daily => anomalies.iter().filter(in_range).cloned().collect(),
        Granularity::Weekly => {
            let windowed: Vec<PriceRecord> = anomalies.iter().filter(in_range).cloned().collect();
            resample_weekly(&windowed)
        }
    };

    debug!(
        %granularity,
        input = anomalies.len(),
        output = out.len(),
        "aggregated anomalies"
    );
    out
}
