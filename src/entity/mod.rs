mod agenda;
mod meeting_time;
mod participant;
mod role;
mod settings;
mod template;

pub use agenda::{AgendaItem, Antrag, AntragType, VotingResult};
pub use meeting_time::{MeetingTime, Pause};
pub use participant::Participant;
pub use role::{default_roles, Role, RoleColor, ALLOWED_ROLE_NAMES};
pub use settings::EmailSettings;
pub use template::{builtin_templates, is_builtin_template, SitzungTemplate, TemplateAgendaItem};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SitzungStatus {
    #[default]
    Planned,
    Ongoing,
    Completed,
}

impl std::fmt::Display for SitzungStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SitzungStatus::Planned => write!(f, "planned"),
            SitzungStatus::Ongoing => write!(f, "ongoing"),
            SitzungStatus::Completed => write!(f, "completed"),
        }
    }
}

impl std::str::FromStr for SitzungStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "planned" => Ok(SitzungStatus::Planned),
            "ongoing" => Ok(SitzungStatus::Ongoing),
            "completed" => Ok(SitzungStatus::Completed),
            _ => Err(format!("Invalid status: {}", s)),
        }
    }
}

/// An attached document. Only the name is tracked; the file payload
/// itself stays wherever the user keeps it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: Uuid,
    pub name: String,
}

impl Document {
    pub fn new(name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
        }
    }
}

/// The mutable field set of a Sitzung. This is both the live working
/// state and the payload frozen into version snapshots.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SitzungData {
    pub title: String,
    pub date: String,
    pub time: String,
    pub status: SitzungStatus,
    pub participants: Vec<Participant>,
    pub agenda_items: Vec<AgendaItem>,
    pub meeting_times: MeetingTime,
    #[serde(default)]
    pub next_meeting_date: String,
    pub documents: Vec<Document>,
    pub roles: Vec<Role>,
}

/// A meeting record, the root aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sitzung {
    pub id: Uuid,
    #[serde(flatten)]
    pub data: SitzungData,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Sitzung {
    /// Create a new Sitzung. If the supplied data carries no roles, the
    /// fixed default role set is substituted.
    pub fn new(mut data: SitzungData) -> Self {
        let now = Utc::now();
        if data.roles.is_empty() {
            data.roles = default_roles();
        }
        Self {
            id: Uuid::new_v4(),
            data,
            created_at: now,
            updated_at: now,
        }
    }
}
