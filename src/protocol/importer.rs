//! Best-effort protocol import
//!
//! Reconstructs a partial Sitzung from previously exported text by
//! matching lines against the formatter's layout. The transform is
//! lossy and order-dependent by design: unknown lines are dropped
//! silently, and input that deviates from the expected layout degrades
//! to a partial or empty record instead of erroring. The JSON path is
//! the lossless alternative.

use regex::Regex;

use crate::entity::{AgendaItem, Participant, Pause, Sitzung, SitzungData, VotingResult};
use crate::error::Result;

struct Patterns {
    top: Regex,
    vote: Regex,
    document: Regex,
    note: Regex,
    group: Regex,
    bullet: Regex,
    opening: Regex,
    closing: Regex,
    pause: Regex,
    next_meeting: Regex,
}

impl Patterns {
    fn new() -> Self {
        Self {
            top: Regex::new(r"^TOP (\d+): (.+)$").expect("valid pattern"),
            vote: Regex::new(
                r"^Abstimmungsergebnis: (\d+) Ja, (\d+) Nein, (\d+) Enthaltungen",
            )
            .expect("valid pattern"),
            document: Regex::new(r"^Dokument: (.+)$").expect("valid pattern"),
            note: Regex::new(r"^Anmerkung: (.+)$").expect("valid pattern"),
            group: Regex::new(r"^(.+) \(\d+\):$").expect("valid pattern"),
            bullet: Regex::new(r"^• (.+)$").expect("valid pattern"),
            opening: Regex::new(r"^Eröffnung: (.+) Uhr$").expect("valid pattern"),
            closing: Regex::new(r"^Schluss: (.+) Uhr$").expect("valid pattern"),
            pause: Regex::new(r"^  (\S+) - (\S+) Uhr$").expect("valid pattern"),
            next_meeting: Regex::new(r"^NÄCHSTE SITZUNG: (.+)$").expect("valid pattern"),
        }
    }
}

/// Parse exported protocol text back into a partial meeting record.
/// Never fails; whatever does not match comes back empty.
pub fn parse_protocol_text(text: &str) -> SitzungData {
    let patterns = Patterns::new();
    let mut data = SitzungData::default();

    let lines: Vec<&str> = text.lines().collect();
    if lines.first() == Some(&"PROTOKOLL") {
        if let Some(title) = lines.get(1) {
            if !title.is_empty() {
                data.title = title.to_string();
            }
        }
    }

    let mut in_attendance = false;
    let mut in_times = false;
    let mut current_role: Option<String> = None;

    for line in &lines {
        if *line == "ANWESENHEIT:" {
            in_attendance = true;
            in_times = false;
            continue;
        }
        if line.starts_with("BESCHLUSSFÄHIGKEIT:") || *line == "TAGESORDNUNG:" {
            in_attendance = false;
            in_times = false;
            continue;
        }
        if *line == "SITZUNGSZEITEN:" {
            in_attendance = false;
            in_times = true;
            continue;
        }

        if in_attendance {
            if let Some(caps) = patterns.group.captures(line) {
                current_role = Some(caps[1].to_string());
            } else if let Some(caps) = patterns.bullet.captures(line) {
                let role = current_role.clone().unwrap_or_else(|| "Mitglied".to_string());
                let mut participant = Participant::new(caps[1].to_string(), role);
                participant.present = true;
                data.participants.push(participant);
            }
            continue;
        }

        if in_times {
            if let Some(caps) = patterns.opening.captures(line) {
                data.meeting_times.opening = Some(caps[1].to_string());
            } else if let Some(caps) = patterns.closing.captures(line) {
                data.meeting_times.closing = Some(caps[1].to_string());
            } else if let Some(caps) = patterns.pause.captures(line) {
                let end = match &caps[2] {
                    "offen" => None,
                    end => Some(end.to_string()),
                };
                data.meeting_times.pauses.push(Pause {
                    start: caps[1].to_string(),
                    end,
                });
            }
            continue;
        }

        if let Some(caps) = patterns.top.captures(line) {
            data.agenda_items.push(AgendaItem::new(caps[2].to_string()));
        } else if let Some(caps) = patterns.vote.captures(line) {
            if let Some(item) = data.agenda_items.last_mut() {
                let parse = |i: usize| caps[i].parse::<u32>().unwrap_or(0);
                item.voting_result = Some(VotingResult::new(parse(1), parse(2), parse(3)));
            }
        } else if let Some(caps) = patterns.document.captures(line) {
            if let Some(item) = data.agenda_items.last_mut() {
                item.document_name = Some(caps[1].to_string());
            }
        } else if let Some(caps) = patterns.note.captures(line) {
            if let Some(item) = data.agenda_items.last_mut() {
                item.notes = caps[1].to_string();
            }
        } else if let Some(caps) = patterns.next_meeting.captures(line) {
            data.next_meeting_date = caps[1].to_string();
        }
        // Everything else is dropped.
    }

    data
}

/// Lossless inverse of the JSON export.
pub fn parse_json(text: &str) -> Result<Sitzung> {
    Ok(serde_json::from_str(text)?)
}
