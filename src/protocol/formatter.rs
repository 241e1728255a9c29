//! Text rendering of the protocol layout
//!
//! The layout is versioned in the sense that the importer pattern-matches
//! against it line by line; changes here must stay in step with
//! `importer.rs`.

use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::entity::{AgendaItem, Antrag, AntragType, Participant, SitzungData};
use crate::protocol::{format_date_de, format_timestamp_de};
use crate::quorum;

/// Pure transform of a meeting's mutable state into the protocol text.
/// The generation timestamp is injected so rendering stays deterministic
/// for callers that need it to be.
pub fn render_protocol(data: &SitzungData, generated_at: DateTime<Utc>) -> String {
    let mut out = String::new();

    // Header block
    out.push_str("PROTOKOLL\n");
    if !data.title.is_empty() {
        writeln!(out, "{}", data.title).ok();
    }
    writeln!(out, "{}", format_date_de(&data.date)).ok();
    out.push('\n');

    render_attendance(&mut out, data);
    render_quorum(&mut out, data);
    render_times(&mut out, data);
    render_agenda(&mut out, data);

    if !data.next_meeting_date.is_empty() {
        writeln!(out, "NÄCHSTE SITZUNG: {}\n", data.next_meeting_date).ok();
    }

    if !data.documents.is_empty() {
        out.push_str("ANLAGEN:\n");
        for doc in &data.documents {
            writeln!(out, "• {}", doc.name).ok();
        }
        out.push('\n');
    }

    write!(out, "Protokoll erstellt am: {}", format_timestamp_de(&generated_at)).ok();
    out
}

/// Present participants grouped by role, role-list order first, then any
/// free-text role names that are not in the list.
fn render_attendance(out: &mut String, data: &SitzungData) {
    out.push_str("ANWESENHEIT:\n");

    let present: Vec<&Participant> = data.participants.iter().filter(|p| p.present).collect();

    let mut group_names: Vec<&str> = data.roles.iter().map(|r| r.name.as_str()).collect();
    for participant in &present {
        if !group_names.contains(&participant.role.as_str()) {
            group_names.push(participant.role.as_str());
        }
    }

    for group in group_names {
        let members: Vec<&&Participant> = present.iter().filter(|p| p.role == group).collect();
        if members.is_empty() {
            continue;
        }
        writeln!(out, "{} ({}):", group, members.len()).ok();
        for member in members {
            writeln!(out, "• {}", member.name).ok();
        }
        out.push('\n');
    }

    if present.is_empty() {
        out.push('\n');
    }
}

fn render_quorum(out: &mut String, data: &SitzungData) {
    let status = quorum::quorum_status(&data.participants, &data.roles);
    let verdict = if status.has_quorum {
        "GEGEBEN"
    } else {
        "NICHT GEGEBEN"
    };
    writeln!(out, "BESCHLUSSFÄHIGKEIT: {}\n", verdict).ok();
}

fn render_times(out: &mut String, data: &SitzungData) {
    let times = &data.meeting_times;
    let Some(opening) = &times.opening else {
        return;
    };

    out.push_str("SITZUNGSZEITEN:\n");
    writeln!(out, "Eröffnung: {} Uhr", opening).ok();

    if !times.pauses.is_empty() {
        out.push_str("Pausen:\n");
        for pause in &times.pauses {
            writeln!(
                out,
                "  {} - {} Uhr",
                pause.start,
                pause.end.as_deref().unwrap_or("offen")
            )
            .ok();
        }
    }

    if let Some(closing) = &times.closing {
        writeln!(out, "Schluss: {} Uhr", closing).ok();
    }
    if let Some(duration) = times.total_duration() {
        writeln!(out, "Gesamtdauer: {}", duration).ok();
    }
    out.push('\n');
}

fn render_agenda(out: &mut String, data: &SitzungData) {
    out.push_str("TAGESORDNUNG:\n\n");

    for (index, item) in data.agenda_items.iter().enumerate() {
        render_top(out, index + 1, item);
    }
}

fn render_top(out: &mut String, number: usize, item: &AgendaItem) {
    writeln!(out, "TOP {}: {}", number, item.title).ok();

    if let Some(result) = &item.voting_result {
        writeln!(
            out,
            "Abstimmungsergebnis: {} Ja, {} Nein, {} Enthaltungen ({} Stimmen)",
            result.ja,
            result.nein,
            result.enthaltungen,
            result.total()
        )
        .ok();
        writeln!(out, "Ergebnis: {}", result.verdict()).ok();
    }

    if let Some(name) = &item.document_name {
        writeln!(out, "Dokument: {}", name).ok();
    }

    if !item.notes.is_empty() {
        writeln!(out, "Anmerkung: {}", item.notes).ok();
    }

    // Anträge are indented so the importer's anchored patterns skip them.
    for (index, antrag) in item.antraege.iter().enumerate() {
        render_antrag(out, index + 1, antrag);
    }

    out.push('\n');
}

fn render_antrag(out: &mut String, number: usize, antrag: &Antrag) {
    writeln!(out, "  Antrag {}: {}", number, antrag.title).ok();

    match antrag.antrag_type {
        AntragType::Voting => {
            if let Some(result) = &antrag.voting_result {
                writeln!(
                    out,
                    "    Abstimmungsergebnis: {} Ja, {} Nein, {} Enthaltungen ({} Stimmen)",
                    result.ja,
                    result.nein,
                    result.enthaltungen,
                    result.total()
                )
                .ok();
                writeln!(out, "    Ergebnis: {}", result.verdict()).ok();
            }
        }
        AntragType::Input => {
            if !antrag.input_result.is_empty() {
                writeln!(out, "    Eingabe: {}", antrag.input_result).ok();
            }
        }
    }

    if !antrag.notes.is_empty() {
        writeln!(out, "    Anmerkung: {}", antrag.notes).ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{
        default_roles, AgendaItem, Document, Participant, SitzungData, VotingResult,
    };

    fn sample_data() -> SitzungData {
        let roles = default_roles();
        let mut participants = Vec::new();
        for name in ["Alex Schmidt", "Robin Weber", "Sam Fischer"] {
            let mut p = Participant::new(name.to_string(), "Mitglied".to_string());
            p.present = true;
            participants.push(p);
        }
        let mut absent = Participant::new("Kim Wagner".to_string(), "Mitglied".to_string());
        absent.present = false;
        participants.push(absent);
        let mut guest = Participant::new("Chris Meyer".to_string(), "Gast".to_string());
        guest.present = true;
        participants.push(guest);

        let mut top1 = AgendaItem::new("Genehmigung der Tagesordnung".to_string());
        top1.voting_result = Some(VotingResult::new(5, 5, 2));
        let mut top2 = AgendaItem::new("Berichte".to_string());
        top2.notes = "Bericht des Vorsitzes".to_string();
        top2.document_name = Some("bericht.pdf".to_string());

        SitzungData {
            title: "Sitzung des Studierendenparlaments".to_string(),
            date: "2024-01-15".to_string(),
            time: "14:00".to_string(),
            participants,
            agenda_items: vec![top1, top2],
            roles,
            ..Default::default()
        }
    }

    #[test]
    fn test_render_header_and_attendance() {
        let text = render_protocol(&sample_data(), Utc::now());

        assert!(text.starts_with("PROTOKOLL\n"));
        assert!(text.contains("Montag, 15. Januar 2024"));
        assert!(text.contains("ANWESENHEIT:"));
        assert!(text.contains("Mitglied (3):"));
        assert!(text.contains("• Alex Schmidt"));
        assert!(text.contains("Gast (1):"));
        // Absent participants are not listed.
        assert!(!text.contains("Kim Wagner"));
    }

    #[test]
    fn test_render_quorum_verdict() {
        let data = sample_data();
        // 3 of 4 Mitglieder present, threshold 2.
        let text = render_protocol(&data, Utc::now());
        assert!(text.contains("BESCHLUSSFÄHIGKEIT: GEGEBEN"));
    }

    #[test]
    fn test_render_tie_vote_as_rejected() {
        let text = render_protocol(&sample_data(), Utc::now());
        assert!(text.contains(
            "Abstimmungsergebnis: 5 Ja, 5 Nein, 2 Enthaltungen (12 Stimmen)"
        ));
        assert!(text.contains("Ergebnis: ABGELEHNT"));
    }

    #[test]
    fn test_render_top_details() {
        let text = render_protocol(&sample_data(), Utc::now());
        assert!(text.contains("TOP 1: Genehmigung der Tagesordnung"));
        assert!(text.contains("TOP 2: Berichte"));
        assert!(text.contains("Dokument: bericht.pdf"));
        assert!(text.contains("Anmerkung: Bericht des Vorsitzes"));
    }

    #[test]
    fn test_render_times_and_attachments() {
        let mut data = sample_data();
        data.meeting_times.open_meeting("14:00".to_string()).unwrap();
        data.meeting_times.start_pause("15:00".to_string()).unwrap();
        data.meeting_times.end_pause("15:15".to_string());
        data.meeting_times.close_meeting("16:00".to_string()).unwrap();
        data.next_meeting_date = "Montag, 22. Januar 2024, 14:00 Uhr".to_string();
        data.documents.push(Document::new("haushalt.pdf".to_string()));

        let text = render_protocol(&data, Utc::now());
        assert!(text.contains("SITZUNGSZEITEN:"));
        assert!(text.contains("Eröffnung: 14:00 Uhr"));
        assert!(text.contains("  15:00 - 15:15 Uhr"));
        assert!(text.contains("Schluss: 16:00 Uhr"));
        assert!(text.contains("Gesamtdauer: 01:45"));
        assert!(text.contains("NÄCHSTE SITZUNG: Montag, 22. Januar 2024, 14:00 Uhr"));
        assert!(text.contains("ANLAGEN:\n• haushalt.pdf"));
    }

    #[test]
    fn test_open_pause_renders_offen() {
        let mut data = sample_data();
        data.meeting_times.open_meeting("14:00".to_string()).unwrap();
        data.meeting_times.start_pause("15:00".to_string()).unwrap();

        let text = render_protocol(&data, Utc::now());
        assert!(text.contains("  15:00 - offen Uhr"));
    }

    #[test]
    fn test_generation_timestamp_trailer() {
        let generated = "2024-01-15T13:05:09Z".parse().unwrap();
        let text = render_protocol(&sample_data(), generated);
        assert!(text.ends_with("Protokoll erstellt am: 15.01.2024, 13:05:09"));
    }

    #[test]
    fn test_empty_meeting_still_renders() {
        let text = render_protocol(&SitzungData::default(), Utc::now());
        assert!(text.contains("PROTOKOLL"));
        assert!(text.contains("BESCHLUSSFÄHIGKEIT: GEGEBEN"));
        assert!(text.contains("TAGESORDNUNG:"));
    }
}
