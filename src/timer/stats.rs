use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::fmt;
use std::time::Duration;

/// The statistic a [`Stats`](./struct.Stats.html) listing is sorted by, always descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    Count,
    Tot,
    Max,
    #[default]
    Avg,
    AvgBefore,
    AvgAfter,
}

impl SortKey {
    /// Parses a sort key case-insensitively, `None` for an unknown one.
    pub fn parse(val: &str) -> Option<SortKey> {
        match val.to_ascii_lowercase().as_str() {
            "count" => Some(SortKey::Count),
            "tot" => Some(SortKey::Tot),
            "max" => Some(SortKey::Max),
            "avg" => Some(SortKey::Avg),
            "avg_before" => Some(SortKey::AvgBefore),
            "avg_after" => Some(SortKey::AvgAfter),
            _ => None,
        }
    }

    /// The lower-cased name, as accepted by [`parse`](#method.parse) and echoed in `sortBy`.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Count => "count",
            SortKey::Tot => "tot",
            SortKey::Max => "max",
            SortKey::Avg => "avg",
            SortKey::AvgBefore => "avg_before",
            SortKey::AvgAfter => "avg_after",
        }
    }

    fn value(&self, stat: &Stat) -> u128 {
        match self {
            SortKey::Count => u128::from(stat.count),
            SortKey::Tot => stat.tot.as_nanos(),
            SortKey::Max => stat.max.as_nanos(),
            SortKey::Avg => stat.avg.as_nanos(),
            SortKey::AvgBefore => stat.avg_before.as_nanos(),
            SortKey::AvgAfter => stat.avg_after.as_nanos(),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for SortKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Derived statistics of one route. Durations serialize as nanoseconds.
#[derive(Debug, Clone, Serialize)]
pub struct Stat {
    pub route: String,
    pub count: u64,
    #[serde(serialize_with = "as_nanos")]
    pub tot: Duration,
    #[serde(serialize_with = "as_nanos")]
    pub max: Duration,
    #[serde(serialize_with = "as_nanos")]
    pub min: Duration,
    #[serde(serialize_with = "as_nanos")]
    pub avg: Duration,
    #[serde(serialize_with = "as_nanos")]
    pub avg_before: Duration,
    #[serde(serialize_with = "as_nanos")]
    pub avg_after: Duration,
}

/// A point-in-time listing of every route counter.
#[derive(Debug, Clone, Serialize)]
pub struct Stats {
    pub generated: DateTime<Utc>,
    #[serde(rename = "upTime")]
    pub up_time: String,
    pub result: Vec<Stat>,
    #[serde(rename = "sortBy")]
    pub sort_by: SortKey,
}

impl Stats {
    pub(crate) fn sort(&mut self) {
        let key = self.sort_by;
        self.result.sort_by(|a, b| key.value(b).cmp(&key.value(a)));
    }
}

fn as_nanos<S: Serializer>(d: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(u64::try_from(d.as_nanos()).unwrap_or(u64::MAX))
}

pub(crate) fn format_uptime(d: Duration) -> String {
    let secs = d.as_secs();
    let (hours, minutes, seconds) = (secs / 3600, secs % 3600 / 60, secs % 60);
    let millis = d.subsec_millis();

    if hours > 0 {
        format!("{}h{}m{}.{:03}s", hours, minutes, seconds, millis)
    } else if minutes > 0 {
        format!("{}m{}.{:03}s", minutes, seconds, millis)
    } else {
        format!("{}.{:03}s", seconds, millis)
    }
}
