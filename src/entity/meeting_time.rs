use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::error::{ProtokollError, Result};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Pause {
    pub start: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
}

/// Wall-clock log of a meeting. Times are `HH:MM` strings as entered or
/// captured; at most one pause may be open at a time.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MeetingTime {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opening: Option<String>,
    #[serde(default)]
    pub pauses: Vec<Pause>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closing: Option<String>,
}

impl MeetingTime {
    pub fn open_pause(&self) -> Option<&Pause> {
        self.pauses.iter().find(|p| p.end.is_none())
    }

    pub fn open_meeting(&mut self, time: String) -> Result<()> {
        if self.opening.is_some() {
            return Err(ProtokollError::Validation(
                "Die Sitzung ist bereits eröffnet".to_string(),
            ));
        }
        self.opening = Some(time);
        Ok(())
    }

    pub fn start_pause(&mut self, time: String) -> Result<()> {
        if self.opening.is_none() || self.closing.is_some() {
            return Err(ProtokollError::Validation(
                "Pausen sind nur während einer laufenden Sitzung möglich".to_string(),
            ));
        }
        if self.open_pause().is_some() {
            return Err(ProtokollError::Validation(
                "Es läuft bereits eine Pause".to_string(),
            ));
        }
        self.pauses.push(Pause {
            start: time,
            end: None,
        });
        Ok(())
    }

    /// Close the running pause. No-op when none is open.
    pub fn end_pause(&mut self, time: String) {
        if let Some(pause) = self.pauses.iter_mut().find(|p| p.end.is_none()) {
            pause.end = Some(time);
        }
    }

    /// Close the meeting, force-closing any open pause first.
    pub fn close_meeting(&mut self, time: String) -> Result<()> {
        if self.opening.is_none() {
            return Err(ProtokollError::Validation(
                "Die Sitzung wurde noch nicht eröffnet".to_string(),
            ));
        }
        if self.closing.is_some() {
            return Err(ProtokollError::Validation(
                "Die Sitzung ist bereits beendet".to_string(),
            ));
        }
        self.end_pause(time.clone());
        self.closing = Some(time);
        Ok(())
    }

    /// Net duration (`closing - opening - pauses`) formatted as `HH:MM`.
    /// Returns None while the meeting is not fully bracketed or when a
    /// time string does not parse.
    pub fn total_duration(&self) -> Option<String> {
        let start = parse_hhmm(self.opening.as_deref()?)?;
        let end = parse_hhmm(self.closing.as_deref()?)?;

        let mut minutes = (end - start).num_minutes();
        for pause in &self.pauses {
            let pause_start = parse_hhmm(&pause.start)?;
            let pause_end = parse_hhmm(pause.end.as_deref()?)?;
            minutes -= (pause_end - pause_start).num_minutes();
        }

        if minutes < 0 {
            return None;
        }
        Some(format!("{:02}:{:02}", minutes / 60, minutes % 60))
    }
}

fn parse_hhmm(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M").ok()
}
