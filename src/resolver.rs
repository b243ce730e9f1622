//! Closest-snapshot time resolution
//!
//! Picks the snapshot that covers a requested recovery point: either the
//! most recent one, or the nearest snapshot taken at or after a given
//! wall-clock instant. An earlier snapshot may not contain the writes made
//! up to the target instant, so the search only ever looks forward.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::common::{Error, Result};

/// Sentinel accepted for both date and time meaning "most recent snapshot"
pub const LATEST: &str = "latest";

const DATE_FORMATS: &[&str] = &["%m-%d-%Y", "%Y-%m-%d"];
const TIME_FORMATS: &[&str] = &["%H:%M:%S", "%H:%M"];

/// One snapshot of a managed volume as listed by the appliance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ApiSnapshot", into = "ApiSnapshot")]
pub struct SnapshotRecord {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    /// Data lives only in the remote (cloud) tier
    pub cloud_resident: bool,
}

/// Wire shape of a snapshot entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiSnapshot {
    id: String,
    date: DateTime<Utc>,
    #[serde(default)]
    cloud_state: i64,
}

impl From<ApiSnapshot> for SnapshotRecord {
    fn from(api: ApiSnapshot) -> Self {
        Self {
            id: api.id,
            timestamp: api.date,
            cloud_resident: api.cloud_state == 1,
        }
    }
}

impl From<SnapshotRecord> for ApiSnapshot {
    fn from(record: SnapshotRecord) -> Self {
        Self {
            id: record.id,
            date: record.timestamp,
            cloud_state: i64::from(record.cloud_resident),
        }
    }
}

/// Which point in time the caller wants to recover
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeQuery {
    Latest,
    Exact(NaiveDate, NaiveTime),
}

impl TimeQuery {
    /// Build a query from a date/time string pair.
    ///
    /// Both values must be [`LATEST`] or both must be concrete. Dates are
    /// `MM-DD-YYYY` or `YYYY-MM-DD`, times `HH:MM` or `HH:MM:SS`.
    pub fn parse(date: &str, time: &str) -> Result<Self> {
        let date = date.trim();
        let time = time.trim();

        match (is_latest(date), is_latest(time)) {
            (true, true) => Ok(TimeQuery::Latest),
            (false, false) => Ok(TimeQuery::Exact(parse_date(date)?, parse_time(time)?)),
            _ => Err(Error::InvalidQuery(
                "the date and time arguments must both be 'latest' or a specific date and time"
                    .into(),
            )),
        }
    }

    pub fn at(target: NaiveDateTime) -> Self {
        TimeQuery::Exact(target.date(), target.time())
    }

    /// Combined wall-clock target, `None` for `Latest`
    pub fn target(&self) -> Option<NaiveDateTime> {
        match self {
            TimeQuery::Latest => None,
            TimeQuery::Exact(date, time) => Some(date.and_time(*time)),
        }
    }
}

impl std::fmt::Display for TimeQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.target() {
            None => write!(f, "{}", LATEST),
            Some(target) => write!(f, "{}", target.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

fn is_latest(s: &str) -> bool {
    s.eq_ignore_ascii_case(LATEST)
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .ok_or_else(|| {
            Error::InvalidParameter(format!("invalid date '{}', expected MM-DD-YYYY", s))
        })
}

fn parse_time(s: &str) -> Result<NaiveTime> {
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(s, fmt).ok())
        .ok_or_else(|| Error::InvalidParameter(format!("invalid time '{}', expected HH:MM", s)))
}

/// Outcome of a resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", content = "snapshot_id", rename_all = "snake_case")]
pub enum Resolution {
    Found(String),
    NotFound,
}

impl Resolution {
    pub fn id(&self) -> Option<&str> {
        match self {
            Resolution::Found(id) => Some(id),
            Resolution::NotFound => None,
        }
    }
}

/// Select the snapshot satisfying `query`.
///
/// `Latest` takes the maximum timestamp rather than trusting list order.
/// `Exact` keeps snapshots at or after the target and returns the nearest;
/// equal distances resolve to the first one in input order.
pub fn resolve(query: &TimeQuery, snapshots: &[SnapshotRecord]) -> Resolution {
    let chosen = match query.target() {
        None => snapshots.iter().max_by_key(|s| s.timestamp),
        Some(target) => {
            let target = Utc.from_utc_datetime(&target);
            snapshots
                .iter()
                .filter(|s| s.timestamp >= target)
                // non-negative after the filter; min_by_key keeps the first minimum
                .min_by_key(|s| s.timestamp - target)
        }
    };

    match chosen {
        Some(snapshot) => Resolution::Found(snapshot.id.clone()),
        None => Resolution::NotFound,
    }
}

/// Validate a date/time pair, then resolve it against `snapshots`.
pub fn resolve_parts(date: &str, time: &str, snapshots: &[SnapshotRecord]) -> Result<Resolution> {
    let query = TimeQuery::parse(date, time)?;
    Ok(resolve(&query, snapshots))
}
