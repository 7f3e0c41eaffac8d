//! Session reconstruction
//!
//! Pure functions deriving sessions and per-page navigation stats from a
//! flat, unordered slice of hits. Recomputed from scratch on every query;
//! nothing here holds state between calls.

use std::collections::{HashMap, HashSet};

use crate::storage::Hit;

/// One reconstructed session: a group of pageviews sharing a session id,
/// ordered by timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub session_id: String,
    pub visitor_id: String,
    pub started_at: i64,
    pub entry_url: String,
    pub exit_url: String,
    pub pageviews: usize,
    pub duration_ms: i64,
}

impl Session {
    /// A bounce is exactly one pageview, regardless of duration or scroll.
    pub fn is_bounce(&self) -> bool {
        self.pageviews == 1
    }
}

/// Group pageview hits into sessions.
///
/// Within a session, hits are sorted by `ts` ascending with ties keeping
/// their original arrival order (the collector does not guarantee unique
/// timestamps). Entry and exit urls are the first and last in that order.
///
/// Session duration uses the first explicit positive `duration_ms` found in
/// ts order; if none exists it is estimated as `max(0, last.ts - first.ts)`,
/// so a single-pageview session without an explicit duration reports 0.
pub fn reconstruct_sessions(hits: &[Hit]) -> Vec<Session> {
    let mut order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, Vec<&Hit>> = HashMap::new();

    for hit in hits.iter().filter(|h| h.is_pageview()) {
        groups
            .entry(hit.session_id.as_str())
            .or_insert_with(|| {
                order.push(hit.session_id.as_str());
                Vec::new()
            })
            .push(hit);
    }

    order
        .into_iter()
        .filter_map(|session_id| {
            let group = groups.get_mut(session_id)?;
            // sort_by_key is stable; ties keep arrival order
            group.sort_by_key(|h| h.ts);

            let first = group.first()?;
            let last = group.last()?;

            let duration_ms = group
                .iter()
                .find_map(|h| h.duration_ms.filter(|d| *d > 0))
                .unwrap_or_else(|| (last.ts - first.ts).max(0));

            Some(Session {
                session_id: session_id.to_string(),
                visitor_id: first.visitor_id.clone(),
                started_at: first.ts,
                entry_url: first.url.clone(),
                exit_url: last.url.clone(),
                pageviews: group.len(),
                duration_ms,
            })
        })
        .collect()
}

/// Per-URL navigation stats for the pages table.
#[derive(Debug, Clone, PartialEq)]
pub struct PageStats {
    pub url: String,
    pub views: u64,
    pub visitors: u64,
    pub avg_duration_ms: i64,
    pub avg_scroll: f64,
    pub entries: u64,
    pub exits: u64,
    /// exits / views * 100
    pub exit_rate: f64,
}

/// Per-URL breakdown over pageviews, sorted by views descending.
///
/// Entry and exit counts come from the reconstructed sessions: the number
/// of sessions whose first (resp. last) page is that URL.
pub fn page_breakdown(hits: &[Hit]) -> Vec<PageStats> {
    struct Acc<'a> {
        views: u64,
        visitors: HashSet<&'a str>,
        duration_sum: i64,
        duration_n: u64,
        scroll_sum: f64,
        scroll_n: u64,
    }

    let mut order: Vec<&str> = Vec::new();
    let mut pages: HashMap<&str, Acc> = HashMap::new();

    for hit in hits.iter().filter(|h| h.is_pageview()) {
        let acc = pages.entry(hit.url.as_str()).or_insert_with(|| {
            order.push(hit.url.as_str());
            Acc {
                views: 0,
                visitors: HashSet::new(),
                duration_sum: 0,
                duration_n: 0,
                scroll_sum: 0.0,
                scroll_n: 0,
            }
        });
        acc.views += 1;
        acc.visitors.insert(hit.visitor_id.as_str());
        if let Some(d) = hit.duration_ms.filter(|d| *d > 0) {
            acc.duration_sum += d;
            acc.duration_n += 1;
        }
        if let Some(s) = hit.scroll_max {
            acc.scroll_sum += s;
            acc.scroll_n += 1;
        }
    }

    let sessions = reconstruct_sessions(hits);
    let mut entries: HashMap<&str, u64> = HashMap::new();
    let mut exits: HashMap<&str, u64> = HashMap::new();
    for s in &sessions {
        *entries.entry(s.entry_url.as_str()).or_insert(0) += 1;
        *exits.entry(s.exit_url.as_str()).or_insert(0) += 1;
    }

    let mut rows: Vec<PageStats> = order
        .into_iter()
        .map(|url| {
            let acc = &pages[url];
            let entry_count = entries.get(url).copied().unwrap_or(0);
            let exit_count = exits.get(url).copied().unwrap_or(0);
            PageStats {
                url: url.to_string(),
                views: acc.views,
                visitors: acc.visitors.len() as u64,
                avg_duration_ms: if acc.duration_n > 0 {
                    acc.duration_sum / acc.duration_n as i64
                } else {
                    0
                },
                avg_scroll: if acc.scroll_n > 0 {
                    acc.scroll_sum / acc.scroll_n as f64
                } else {
                    0.0
                },
                entries: entry_count,
                exits: exit_count,
                exit_rate: exit_count as f64 / acc.views as f64 * 100.0,
            }
        })
        .collect();

    // Stable sort: equal view counts keep first-encountered order
    rows.sort_by(|a, b| b.views.cmp(&a.views));
    rows
}
