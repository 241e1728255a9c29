use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A meeting participant. `role` is a free-text reference into the
/// Sitzung's role list, not a strict foreign key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: Uuid,
    pub name: String,
    pub role: String,
    pub present: bool,
}

impl Participant {
    pub fn new(name: String, role: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            role,
            present: false,
        }
    }

    pub fn toggle_presence(&mut self) {
        self.present = !self.present;
    }
}
