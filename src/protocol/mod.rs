//! Protocol generation and import
//!
//! Renders a Sitzung into the exported protocol layout and offers the
//! derived serializations (plain text, Markdown, paginated layout,
//! lossless JSON) plus the best-effort reverse parser.

mod formatter;
mod importer;
mod markdown;
mod pages;

pub use formatter::render_protocol;
pub use importer::{parse_json, parse_protocol_text};
pub use markdown::render_markdown;
pub use pages::{paginate, ProtocolPage, ProtocolPages, LINES_PER_PAGE};

use chrono::{DateTime, Datelike, NaiveDate, Timelike, Utc};
use serde::Serialize;

use crate::entity::SitzungData;

/// Progress counters shown before export.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionStats {
    pub total_items: usize,
    pub completed_items: usize,
    pub percentage: u32,
    pub has_attendance: bool,
    pub has_times: bool,
}

pub fn completion_stats(data: &SitzungData) -> CompletionStats {
    let total_items = data.agenda_items.len();
    let completed_items = data.agenda_items.iter().filter(|i| i.completed).count();
    let percentage = if total_items > 0 {
        (completed_items * 100 / total_items) as u32
    } else {
        0
    };
    CompletionStats {
        total_items,
        completed_items,
        percentage,
        has_attendance: !data.participants.is_empty(),
        has_times: data.meeting_times.opening.is_some(),
    }
}

/// A protocol can be exported once there is anyone on the attendance
/// list and at least one agenda item. An unready meeting is refused
/// upstream; the formatter itself never errors.
pub fn export_ready(data: &SitzungData) -> bool {
    let stats = completion_stats(data);
    stats.has_attendance && stats.total_items > 0
}

const WEEKDAYS_DE: [&str; 7] = [
    "Montag",
    "Dienstag",
    "Mittwoch",
    "Donnerstag",
    "Freitag",
    "Samstag",
    "Sonntag",
];

const MONTHS_DE: [&str; 12] = [
    "Januar",
    "Februar",
    "März",
    "April",
    "Mai",
    "Juni",
    "Juli",
    "August",
    "September",
    "Oktober",
    "November",
    "Dezember",
];

/// `2024-01-15` becomes `Montag, 15. Januar 2024`. Dates that do not
/// parse are passed through unchanged.
pub fn format_date_de(date: &str) -> String {
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(parsed) => format!(
            "{}, {}. {} {}",
            WEEKDAYS_DE[parsed.weekday().num_days_from_monday() as usize],
            parsed.day(),
            MONTHS_DE[parsed.month0() as usize],
            parsed.year()
        ),
        Err(_) => date.to_string(),
    }
}

/// `15.01.2024, 14:30:25`, the generation-timestamp format.
pub fn format_timestamp_de(ts: &DateTime<Utc>) -> String {
    format!(
        "{:02}.{:02}.{}, {:02}:{:02}:{:02}",
        ts.day(),
        ts.month(),
        ts.year(),
        ts.hour(),
        ts.minute(),
        ts.second()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{AgendaItem, Participant};

    #[test]
    fn test_format_date_de() {
        assert_eq!(format_date_de("2024-01-15"), "Montag, 15. Januar 2024");
        assert_eq!(format_date_de("2026-08-07"), "Freitag, 7. August 2026");
    }

    #[test]
    fn test_format_date_de_passthrough() {
        assert_eq!(format_date_de("irgendwann"), "irgendwann");
    }

    #[test]
    fn test_export_ready_requires_attendance_and_agenda() {
        let mut data = SitzungData::default();
        assert!(!export_ready(&data));

        data.participants
            .push(Participant::new("Kim".to_string(), "Mitglied".to_string()));
        assert!(!export_ready(&data));

        data.agenda_items.push(AgendaItem::new("TOP".to_string()));
        assert!(export_ready(&data));
    }

    #[test]
    fn test_completion_stats_percentage() {
        let mut data = SitzungData::default();
        for i in 0..4 {
            let mut item = AgendaItem::new(format!("TOP {}", i));
            item.completed = i < 3;
            data.agenda_items.push(item);
        }

        let stats = completion_stats(&data);
        assert_eq!(stats.total_items, 4);
        assert_eq!(stats.completed_items, 3);
        assert_eq!(stats.percentage, 75);
    }
}
