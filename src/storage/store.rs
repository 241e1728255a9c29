use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::entity::{
    builtin_templates, is_builtin_template, AgendaItem, Document, EmailSettings, MeetingTime,
    Participant, Role, Sitzung, SitzungData, SitzungStatus, SitzungTemplate,
};
use crate::error::{ProtokollError, Result};
use crate::storage::StorageBackend;

const SITZUNGEN_KEY: &str = "sitzungen";
const TEMPLATES_KEY: &str = "sitzung-templates";
const SETTINGS_KEY: &str = "globalEmailSettings";

/// Current layout version of persisted blobs. Blobs written by older
/// versions of the app carry no envelope and are accepted as-is.
const SCHEMA_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Envelope<T> {
    schema_version: u32,
    data: T,
}

/// Update payload for a Sitzung. Whole-field replacement per field; a
/// `None` leaves the stored value untouched.
#[derive(Default)]
pub struct SitzungUpdate {
    pub title: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub status: Option<SitzungStatus>,
    pub participants: Option<Vec<Participant>>,
    pub agenda_items: Option<Vec<AgendaItem>>,
    pub meeting_times: Option<MeetingTime>,
    pub next_meeting_date: Option<String>,
    pub documents: Option<Vec<Document>>,
    pub roles: Option<Vec<Role>>,
}

impl SitzungUpdate {
    /// An update that replaces every mutable field, as used by snapshot
    /// restore.
    pub fn from_data(data: SitzungData) -> Self {
        Self {
            title: Some(data.title),
            date: Some(data.date),
            time: Some(data.time),
            status: Some(data.status),
            participants: Some(data.participants),
            agenda_items: Some(data.agenda_items),
            meeting_times: Some(data.meeting_times),
            next_meeting_date: Some(data.next_meeting_date),
            documents: Some(data.documents),
            roles: Some(data.roles),
        }
    }
}

/// The one shared store: CRUD over the meeting collection plus the
/// sibling blobs (templates, global settings, per-meeting version
/// histories). Constructed once with an injected backend and passed by
/// reference to whoever needs it.
pub struct Store {
    backend: Box<dyn StorageBackend>,
}

impl Store {
    pub fn new(backend: Box<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    /// Load a keyed blob. Missing keys, unparsable payloads and blobs
    /// from a newer schema all come back as `None`; persisted state is a
    /// convenience, not authoritative data, so corruption falls back to
    /// the empty default at the call site instead of failing the caller.
    pub(crate) fn load_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.backend.load(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(key, error = %e, "failed to read blob, falling back to default");
                return None;
            }
        };

        if let Ok(envelope) = serde_json::from_str::<Envelope<T>>(&raw) {
            if envelope.schema_version > SCHEMA_VERSION {
                warn!(
                    key,
                    version = envelope.schema_version,
                    "blob written by a newer schema, falling back to default"
                );
                return None;
            }
            return Some(envelope.data);
        }

        // Legacy blob without envelope (schema v0).
        match serde_json::from_str::<T>(&raw) {
            Ok(data) => Some(data),
            Err(e) => {
                warn!(key, error = %e, "corrupt blob, falling back to default");
                None
            }
        }
    }

    pub(crate) fn save_json<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let envelope = Envelope {
            schema_version: SCHEMA_VERSION,
            data: value,
        };
        self.backend.save(key, &serde_json::to_string_pretty(&envelope)?)
    }

    // --- Meetings -------------------------------------------------------

    pub fn list_sitzungen(&self) -> Vec<Sitzung> {
        self.load_json(SITZUNGEN_KEY).unwrap_or_default()
    }

    pub fn get_sitzung(&self, id: &Uuid) -> Option<Sitzung> {
        self.list_sitzungen().into_iter().find(|s| &s.id == id)
    }

    /// Create a Sitzung, substituting the default role set when none was
    /// supplied, and return it.
    pub fn create_sitzung(&self, data: SitzungData) -> Result<Sitzung> {
        let sitzung = Sitzung::new(data);

        let mut sitzungen = self.list_sitzungen();
        sitzungen.push(sitzung.clone());
        self.save_json(SITZUNGEN_KEY, &sitzungen)?;

        Ok(sitzung)
    }

    /// Merge the given fields into an existing record and refresh its
    /// update timestamp.
    pub fn update_sitzung(&self, id: &Uuid, updates: SitzungUpdate) -> Result<Sitzung> {
        let mut sitzungen = self.list_sitzungen();
        let sitzung = sitzungen
            .iter_mut()
            .find(|s| &s.id == id)
            .ok_or_else(|| ProtokollError::SitzungNotFound(id.to_string()))?;

        if let Some(title) = updates.title {
            sitzung.data.title = title;
        }
        if let Some(date) = updates.date {
            sitzung.data.date = date;
        }
        if let Some(time) = updates.time {
            sitzung.data.time = time;
        }
        if let Some(status) = updates.status {
            sitzung.data.status = status;
        }
        if let Some(participants) = updates.participants {
            sitzung.data.participants = participants;
        }
        if let Some(agenda_items) = updates.agenda_items {
            sitzung.data.agenda_items = agenda_items;
        }
        if let Some(meeting_times) = updates.meeting_times {
            sitzung.data.meeting_times = meeting_times;
        }
        if let Some(next_meeting_date) = updates.next_meeting_date {
            sitzung.data.next_meeting_date = next_meeting_date;
        }
        if let Some(documents) = updates.documents {
            sitzung.data.documents = documents;
        }
        if let Some(roles) = updates.roles {
            sitzung.data.roles = roles;
        }
        sitzung.updated_at = Utc::now();

        let updated = sitzung.clone();
        self.save_json(SITZUNGEN_KEY, &sitzungen)?;
        Ok(updated)
    }

    /// Insert a complete record as-is, preserving its id and
    /// timestamps. Used by the lossless JSON import; the only check is
    /// id uniqueness.
    pub fn import_sitzung(&self, sitzung: Sitzung) -> Result<()> {
        let mut sitzungen = self.list_sitzungen();
        if sitzungen.iter().any(|s| s.id == sitzung.id) {
            return Err(ProtokollError::Validation(format!(
                "Sitzung {} existiert bereits",
                sitzung.id
            )));
        }
        sitzungen.push(sitzung);
        self.save_json(SITZUNGEN_KEY, &sitzungen)
    }

    /// Remove a record. No-op when absent.
    pub fn delete_sitzung(&self, id: &Uuid) -> Result<()> {
        let mut sitzungen = self.list_sitzungen();
        sitzungen.retain(|s| &s.id != id);
        self.save_json(SITZUNGEN_KEY, &sitzungen)
    }

    // --- Templates ------------------------------------------------------

    /// Stored templates, seeded with the built-in set on first read.
    pub fn list_templates(&self) -> Vec<SitzungTemplate> {
        self.load_json(TEMPLATES_KEY)
            .unwrap_or_else(builtin_templates)
    }

    pub fn get_template(&self, id: &str) -> Option<SitzungTemplate> {
        self.list_templates().into_iter().find(|t| t.id == id)
    }

    pub fn add_template(&self, template: SitzungTemplate) -> Result<()> {
        let mut templates = self.list_templates();
        if templates.iter().any(|t| t.id == template.id) {
            return Err(ProtokollError::Validation(format!(
                "Vorlage '{}' existiert bereits",
                template.id
            )));
        }
        templates.push(template);
        self.save_json(TEMPLATES_KEY, &templates)
    }

    /// Built-in templates cannot be deleted.
    pub fn delete_template(&self, id: &str) -> Result<()> {
        if is_builtin_template(id) {
            return Err(ProtokollError::Validation(format!(
                "Vorlage '{}' ist eine Standardvorlage und kann nicht gelöscht werden",
                id
            )));
        }
        let mut templates = self.list_templates();
        templates.retain(|t| t.id != id);
        self.save_json(TEMPLATES_KEY, &templates)
    }

    // --- Global settings ------------------------------------------------

    pub fn email_settings(&self) -> Option<EmailSettings> {
        self.load_json(SETTINGS_KEY)
    }

    pub fn set_email_settings(&self, settings: &EmailSettings) -> Result<()> {
        settings.validate()?;
        self.save_json(SETTINGS_KEY, settings)
    }
}
