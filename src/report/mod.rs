//! Metrics engine
//!
//! Pure, deterministic functions over a caller-supplied slice of hits and an
//! explicit `now` timestamp. All functions are total: malformed input is the
//! producer's problem, the engine trusts the store's contents.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{DateTime, Datelike, Timelike, Utc};

use crate::sessions::reconstruct_sessions;
use crate::storage::Hit;

const MINUTE_MS: i64 = 60_000;

/// Headline dashboard numbers for one time-filtered slice of hits.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Kpis {
    pub visits: u64,
    pub visitors: u64,
    pub pageviews: u64,
    /// Percent of sessions with exactly one pageview
    pub bounce_rate: f64,
    pub avg_session_ms: i64,
    pub pages_per_session: f64,
}

/// `visits` and `pageviews` both count pageview hits; they are kept as two
/// fields for presentational symmetry, not because they differ.
pub fn calc_kpis(hits: &[Hit]) -> Kpis {
    let pageviews = hits.iter().filter(|h| h.is_pageview()).count() as u64;
    let visitors = hits
        .iter()
        .filter(|h| h.is_pageview())
        .map(|h| h.visitor_id.as_str())
        .collect::<HashSet<_>>()
        .len() as u64;

    let sessions = reconstruct_sessions(hits);
    let session_count = sessions.len();
    let bounces = sessions.iter().filter(|s| s.is_bounce()).count();

    let bounce_rate = if session_count > 0 {
        bounces as f64 / session_count as f64 * 100.0
    } else {
        0.0
    };
    let avg_session_ms = if session_count > 0 {
        sessions.iter().map(|s| s.duration_ms).sum::<i64>() / session_count as i64
    } else {
        0
    };
    // max(1, ...) guard: no sessions yields 0 instead of a division fault
    let pages_per_session = pageviews as f64 / session_count.max(1) as f64;

    Kpis {
        visits: pageviews,
        visitors,
        pageviews,
        bounce_rate,
        avg_session_ms,
        pages_per_session,
    }
}

/// One UTC calendar day with at least one pageview.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct DayBucket {
    /// "YYYY-MM-DD"
    pub day: String,
    pub pageviews: u64,
    pub visitors: u64,
    pub sessions: u64,
}

/// Day-bucketed time series, ascending by day. Days with zero activity are
/// omitted entirely; callers must not assume contiguous days.
pub fn group_by_day(hits: &[Hit]) -> Vec<DayBucket> {
    struct Acc<'a> {
        pageviews: u64,
        visitors: HashSet<&'a str>,
        sessions: HashSet<&'a str>,
    }

    let mut days: BTreeMap<String, Acc> = BTreeMap::new();
    for hit in hits.iter().filter(|h| h.is_pageview()) {
        let Some(dt) = DateTime::<Utc>::from_timestamp_millis(hit.ts) else {
            continue;
        };
        let day = dt.format("%Y-%m-%d").to_string();
        let acc = days.entry(day).or_insert_with(|| Acc {
            pageviews: 0,
            visitors: HashSet::new(),
            sessions: HashSet::new(),
        });
        acc.pageviews += 1;
        acc.visitors.insert(hit.visitor_id.as_str());
        acc.sessions.insert(hit.session_id.as_str());
    }

    days.into_iter()
        .map(|(day, acc)| DayBucket {
            day,
            pageviews: acc.pageviews,
            visitors: acc.visitors.len() as u64,
            sessions: acc.sessions.len() as u64,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct TopEntry {
    pub key: String,
    pub count: u64,
}

/// The `limit` most frequent distinct key values.
///
/// Hits for which `key_fn` yields no value or an empty string are excluded
/// from ranking. Ties are broken by first-encountered key.
pub fn top_by<F>(hits: &[Hit], key_fn: F, limit: usize) -> Vec<TopEntry>
where
    F: Fn(&Hit) -> Option<String>,
{
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, (usize, u64)> = HashMap::new();

    for hit in hits {
        let Some(key) = key_fn(hit) else { continue };
        if key.is_empty() {
            continue;
        }
        let next_idx = order.len();
        let entry = counts.entry(key.clone()).or_insert_with(|| {
            order.push(key);
            (next_idx, 0)
        });
        entry.1 += 1;
    }

    let mut ranked: Vec<(String, usize, u64)> = counts
        .into_iter()
        .map(|(key, (idx, count))| (key, idx, count))
        .collect();
    ranked.sort_by(|a, b| b.2.cmp(&a.2).then(a.1.cmp(&b.1)));

    ranked
        .into_iter()
        .take(limit)
        .map(|(key, _, count)| TopEntry { key, count })
        .collect()
}

/// Pageviews with `ts` in the inclusive window `[now - minutes*60000, now]`.
pub fn realtime_window<'a>(hits: &'a [Hit], minutes: i64, now: i64) -> Vec<&'a Hit> {
    let start = now - minutes * MINUTE_MS;
    hits.iter()
        .filter(|h| h.is_pageview() && h.ts >= start && h.ts <= now)
        .collect()
}

/// Distinct visitors among pageviews in the realtime window.
pub fn active_visitors(hits: &[Hit], minutes: i64, now: i64) -> u64 {
    realtime_window(hits, minutes, now)
        .iter()
        .map(|h| h.visitor_id.as_str())
        .collect::<HashSet<_>>()
        .len() as u64
}

/// Fixed-length count array; `bucket_fn` values outside `[0, buckets)` are
/// silently dropped.
pub fn histogram<F>(hits: &[Hit], bucket_fn: F, buckets: usize) -> Vec<u64>
where
    F: Fn(&Hit) -> usize,
{
    let mut out = vec![0u64; buckets];
    for hit in hits {
        let b = bucket_fn(hit);
        if b < buckets {
            out[b] += 1;
        }
    }
    out
}

/// Dashboard reporting range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeKey {
    D7,
    D30,
    D90,
}

impl RangeKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            RangeKey::D7 => "7d",
            RangeKey::D30 => "30d",
            RangeKey::D90 => "90d",
        }
    }

    /// Window length in milliseconds
    pub fn to_ms(&self) -> i64 {
        let days = match self {
            RangeKey::D7 => 7,
            RangeKey::D30 => 30,
            RangeKey::D90 => 90,
        };
        days * 24 * 60 * MINUTE_MS
    }
}

impl std::str::FromStr for RangeKey {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "7d" => Ok(RangeKey::D7),
            "30d" => Ok(RangeKey::D30),
            "90d" => Ok(RangeKey::D90),
            other => Err(format!("unknown range: '{}' (expected 7d, 30d or 90d)", other)),
        }
    }
}

impl std::fmt::Display for RangeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Host part of a referrer URL, None for empty or unparseable referrers.
pub fn referrer_host(referrer: &str) -> Option<String> {
    if referrer.is_empty() {
        return None;
    }
    url::Url::parse(referrer)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_string()))
}

/// UTC hour 0..=23 for histogram bucketing
pub fn hour_of_day(ts: i64) -> usize {
    DateTime::<Utc>::from_timestamp_millis(ts)
        .map(|dt| dt.hour() as usize)
        .unwrap_or(24) // out of range, dropped by histogram
}

/// UTC weekday, 0 = Sunday .. 6 = Saturday
pub fn day_of_week(ts: i64) -> usize {
    DateTime::<Utc>::from_timestamp_millis(ts)
        .map(|dt| dt.weekday().num_days_from_sunday() as usize)
        .unwrap_or(7)
}

/// Human-readable duration for the dashboard ("45s", "3m 10s", "1h 5m")
pub fn fmt_duration(ms: i64) -> String {
    let total_secs = ms.max(0) / 1000;
    if total_secs < 60 {
        format!("{}s", total_secs)
    } else if total_secs < 3600 {
        format!("{}m {}s", total_secs / 60, total_secs % 60)
    } else {
        format!("{}h {}m", total_secs / 3600, (total_secs % 3600) / 60)
    }
}
