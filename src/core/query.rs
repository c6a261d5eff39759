//! Query engine: filter and sort a record sequence.
//!
//! Steps run in a fixed order: text search, domain, date range, then a
//! stable sort. Inputs are never modified; the result is a new sequence.
//! Records with equal sort keys keep their relative (newest-first) order
//! in both directions.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use chrono::{DateTime, Datelike, Days, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::domain::{ContentRecord, DateRange, DomainFilter, FilterCriteria, SortBy, SortOrder};

/// Filtered view with the counts the UI shows ("Showing X of Y")
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryView {
    /// Matching records, in display order
    pub items: Vec<ContentRecord>,

    /// Number of records before filtering
    pub total: usize,

    /// Whether any filter (not just the sort) was active
    pub filtered: bool,
}

impl QueryView {
    /// Number of records shown
    pub fn shown(&self) -> usize {
        self.items.len()
    }
}

/// Apply `criteria` against the local wall clock
pub fn apply(records: &[ContentRecord], criteria: &FilterCriteria) -> Vec<ContentRecord> {
    apply_at(records, criteria, &Local::now())
}

/// Apply `criteria` with an explicit "now"; date windows use `now`'s time zone
pub fn apply_at<Tz: TimeZone>(
    records: &[ContentRecord],
    criteria: &FilterCriteria,
    now: &DateTime<Tz>,
) -> Vec<ContentRecord> {
    let needle = criteria.search.to_lowercase();
    let since = cutoff(criteria.date_range, now);

    let mut matched: Vec<ContentRecord> = records
        .iter()
        .filter(|r| needle.is_empty() || matches_search(r, &needle))
        .filter(|r| match &criteria.domain {
            DomainFilter::All => true,
            DomainFilter::Exact(domain) => &r.domain == domain,
        })
        .filter(|r| since.map_or(true, |c| r.extracted_at >= c))
        .cloned()
        .collect();

    // sort_by is stable
    matched.sort_by(|a, b| {
        let ord = compare(a, b, criteria.sort_by);
        match criteria.sort_order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    });

    matched
}

/// Apply `criteria` and package the result with its counts
pub fn view(records: &[ContentRecord], criteria: &FilterCriteria) -> QueryView {
    QueryView {
        items: apply(records, criteria),
        total: records.len(),
        filtered: criteria.is_filtered(),
    }
}

/// Distinct domains, sorted, for the domain picker
pub fn available_domains(records: &[ContentRecord]) -> Vec<String> {
    records
        .iter()
        .map(|r| r.domain.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// `needle` must already be lowercase
fn matches_search(record: &ContentRecord, needle: &str) -> bool {
    record.summary.to_lowercase().contains(needle)
        || record
            .key_points
            .iter()
            .any(|p| p.to_lowercase().contains(needle))
        || record.url.to_lowercase().contains(needle)
        || record.domain.to_lowercase().contains(needle)
}

fn compare(a: &ContentRecord, b: &ContentRecord, sort_by: SortBy) -> Ordering {
    match sort_by {
        SortBy::Date => a.extracted_at.cmp(&b.extracted_at),
        SortBy::Domain => a.domain.cmp(&b.domain),
        SortBy::Length => a.summary_len().cmp(&b.summary_len()),
    }
}

/// Earliest instant a record may have to stay in the window
fn cutoff<Tz: TimeZone>(range: DateRange, now: &DateTime<Tz>) -> Option<DateTime<Utc>> {
    let cutoff = match range {
        DateRange::All => return None,
        DateRange::Today => start_of_day(now),
        DateRange::Week => now
            .clone()
            .checked_sub_days(Days::new(7))
            .unwrap_or_else(|| now.clone() - chrono::Duration::days(7)),
        DateRange::Month => month_before(now),
    };
    Some(cutoff.with_timezone(&Utc))
}

/// Local midnight of `now`'s day (or the first instant after it, across a DST gap)
fn start_of_day<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Tz> {
    let midnight = now.date_naive().and_time(chrono::NaiveTime::MIN);
    local_instant(&now.timezone(), midnight).unwrap_or_else(|| now.clone())
}

/// Same wall-clock time one month earlier.
///
/// The day of month is kept and any excess rolls into the following month,
/// so Mar 31 maps to Feb 31, which is Mar 2 (or Mar 3 outside leap years).
fn month_before<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Tz> {
    let local = now.naive_local();
    let (year, month) = match local.month() {
        1 => (local.year() - 1, 12),
        m => (local.year(), m - 1),
    };

    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first| first.checked_add_days(Days::new(u64::from(local.day() - 1))))
        .and_then(|date| local_instant(&now.timezone(), date.and_time(local.time())))
        .unwrap_or_else(|| now.clone() - chrono::Duration::days(30))
}

/// Map a wall-clock time to an instant, moving forward out of a DST gap
fn local_instant<Tz: TimeZone>(tz: &Tz, local: NaiveDateTime) -> Option<DateTime<Tz>> {
    (0..=2)
        .filter_map(|hours| {
            tz.from_local_datetime(&(local + chrono::Duration::hours(hours)))
                .earliest()
        })
        .next()
}
