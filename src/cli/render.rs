//! Terminal rendering for library records.

use chrono::{DateTime, Local, TimeZone, Utc};

use crate::core::QueryView;
use crate::domain::ContentRecord;

/// Summary characters shown before "Show more"
pub const SUMMARY_PREVIEW_CHARS: usize = 200;

/// Key points shown before "Show more"
pub const KEY_POINT_PREVIEW: usize = 3;

/// Cut `text` to `max` characters, appending "..." when shortened
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max).collect();
    format!("{}...", cut)
}

/// Key point without leading markdown bullets ("** point" -> "point")
pub fn clean_point(point: &str) -> &str {
    point.trim_start_matches('*').trim_start()
}

/// "May 1, 2024, 02:00 PM" in the local time zone
pub fn format_date(at: &DateTime<Utc>) -> String {
    format_date_in(at, &Local)
}

pub fn format_date_in<Tz: TimeZone>(at: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.with_timezone(tz).format("%b %-d, %Y, %I:%M %p").to_string()
}

/// Full card for one record
pub fn card(record: &ContentRecord, full: bool) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "[{}] {}  {}\n",
        record.id,
        record.domain,
        format_date(&record.extracted_at)
    ));
    out.push_str(&format!("  {}\n", record.url));
    if let Some(title) = &record.title {
        out.push_str(&format!("  Title: {}\n", title));
    }

    out.push_str("\n  Summary\n");
    let summary = if full {
        record.summary.clone()
    } else {
        truncate(&record.summary, SUMMARY_PREVIEW_CHARS)
    };
    out.push_str(&format!("  {}\n", summary));

    if !record.key_points.is_empty() {
        out.push_str("\n  Key Points\n");
        let shown = if full {
            record.key_points.len()
        } else {
            KEY_POINT_PREVIEW
        };
        for point in record.key_points.iter().take(shown) {
            out.push_str(&format!("  • {}\n", clean_point(point)));
        }

        let hidden = record.key_points.len().saturating_sub(shown);
        if hidden > 0 {
            out.push_str(&format!("  ({} more points, use --full)\n", hidden));
        }
    }

    out
}

/// One table row: id, domain, truncated summary
pub fn row(record: &ContentRecord) -> String {
    format!(
        "{:<15} {:<28} {:<50}",
        record.id.as_str(),
        truncate(&record.domain, 25),
        truncate(&record.summary.replace('\n', " "), 47)
    )
}

/// "Showing X of Y extracted contents", where X is what `limit` lets through
pub fn counts(view: &QueryView, limit: Option<usize>) -> String {
    let printed = limit.map_or(view.shown(), |n| n.min(view.shown()));
    let line = format!(
        "Showing {} of {} extracted contents",
        printed, view.total
    );

    match view.shown() - printed {
        0 => line,
        hidden => format!("{} ({} more match, raise --limit to see them)", line, hidden),
    }
}

/// Message for an empty result, if one applies
pub fn empty_state(has_content: bool, filtered: bool) -> Option<&'static str> {
    if filtered {
        Some("No matching results. Try adjusting your filters or search terms.")
    } else if !has_content {
        Some("No content yet. Use 'gist extract <url>' to extract and summarize a page.")
    } else {
        None
    }
}
