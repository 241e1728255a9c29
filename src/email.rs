//! Invitation handoff
//!
//! Builds a mailto URI with a pre-filled invitation addressed to the
//! configured collector address. Fire-and-forget: the URI is handed to
//! the host environment; there is no delivery tracking.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::entity::{EmailSettings, SitzungData};
use crate::error::{ProtokollError, Result};
use crate::protocol::format_date_de;

// encodeURIComponent-compatible escaping.
const MAILTO_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

fn encode(text: &str) -> String {
    utf8_percent_encode(text, MAILTO_SET).to_string()
}

/// Compose the invitation mail as a mailto URI.
pub fn compose_invitation(data: &SitzungData, settings: &EmailSettings) -> Result<String> {
    settings.validate()?;
    if data.title.trim().is_empty() {
        return Err(ProtokollError::Validation(
            "Die Sitzung hat keinen Titel".to_string(),
        ));
    }

    let subject = format!("Einladung: {}", data.title);

    let participants = data
        .participants
        .iter()
        .map(|p| format!("  - {} ({})", p.name, p.role))
        .collect::<Vec<String>>()
        .join("\n");

    let body = format!(
        "Sehr geehrte Damen und Herren,\n\n\
         hiermit lade ich Sie zur folgenden Sitzung ein:\n\n\
         Titel: {}\n\
         Datum: {}\n\
         Uhrzeit: {} Uhr\n\n\
         Teilnehmer:\n{}\n\n\
         Mit freundlichen Grüßen\n{}",
        data.title,
        format_date_de(&data.date),
        data.time,
        participants,
        settings.sender_name
    );

    Ok(format!(
        "mailto:{}?subject={}&body={}",
        settings.collector_email,
        encode(&subject),
        encode(&body)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Participant;

    fn settings() -> EmailSettings {
        EmailSettings::new(
            "stupa@uni-beispiel.de".to_string(),
            "StuPa Präsidium".to_string(),
            "sammler@uni-beispiel.de".to_string(),
        )
        .unwrap()
    }

    fn data() -> SitzungData {
        let mut data = SitzungData {
            title: "3. ordentliche Sitzung".to_string(),
            date: "2024-01-15".to_string(),
            time: "14:00".to_string(),
            ..Default::default()
        };
        data.participants
            .push(Participant::new("Alex Schmidt".to_string(), "Mitglied".to_string()));
        data
    }

    #[test]
    fn test_compose_targets_collector() {
        let uri = compose_invitation(&data(), &settings()).unwrap();
        assert!(uri.starts_with("mailto:sammler@uni-beispiel.de?subject="));
    }

    #[test]
    fn test_compose_encodes_subject_and_body() {
        let uri = compose_invitation(&data(), &settings()).unwrap();
        assert!(uri.contains("subject=Einladung%3A%203.%20ordentliche%20Sitzung"));
        // Participant list with encoded newlines.
        assert!(uri.contains("%0A%20%20-%20Alex%20Schmidt%20(Mitglied)"));
        // Formatted German date.
        assert!(uri.contains("Montag"));
    }

    #[test]
    fn test_compose_requires_title() {
        let mut data = data();
        data.title = String::new();
        assert!(compose_invitation(&data, &settings()).is_err());
    }
}
