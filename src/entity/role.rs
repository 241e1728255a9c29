use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ProtokollError, Result};

/// Role names accepted for user-created roles. The default set created
/// with a new Sitzung is broader but cannot be added to by hand.
pub const ALLOWED_ROLE_NAMES: [&str; 2] = ["Mitglied", "Gast"];

/// Cosmetic badge color for a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RoleColor {
    Primary,
    Secondary,
    Accent,
    Success,
    Warning,
    Destructive,
    #[default]
    Muted,
}

impl std::fmt::Display for RoleColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoleColor::Primary => write!(f, "primary"),
            RoleColor::Secondary => write!(f, "secondary"),
            RoleColor::Accent => write!(f, "accent"),
            RoleColor::Success => write!(f, "success"),
            RoleColor::Warning => write!(f, "warning"),
            RoleColor::Destructive => write!(f, "destructive"),
            RoleColor::Muted => write!(f, "muted"),
        }
    }
}

impl std::str::FromStr for RoleColor {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "primary" => Ok(RoleColor::Primary),
            "secondary" => Ok(RoleColor::Secondary),
            "accent" => Ok(RoleColor::Accent),
            "success" => Ok(RoleColor::Success),
            "warning" => Ok(RoleColor::Warning),
            "destructive" => Ok(RoleColor::Destructive),
            "muted" => Ok(RoleColor::Muted),
            _ => Err(format!("Invalid color: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: Uuid,
    pub name: String,
    pub color: RoleColor,
    pub can_vote: bool,
    pub is_default: bool,
}

impl Role {
    /// Create a user-defined role. The name must be one of
    /// [`ALLOWED_ROLE_NAMES`]; voting eligibility is bound from the name
    /// here and nowhere else ("Mitglied" votes, everyone else does not).
    pub fn new(name: &str, color: RoleColor) -> Result<Self> {
        let name = name.trim();
        if !ALLOWED_ROLE_NAMES.contains(&name) {
            return Err(ProtokollError::Validation(format!(
                "Nur 'Mitglied' und 'Gast' sind erlaubte Rollen (got '{}')",
                name
            )));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            color,
            can_vote: name == "Mitglied",
            is_default: false,
        })
    }

    /// Rename a role, re-binding the voting flag from the new name.
    /// Default roles keep their seeded name.
    pub fn rename(&mut self, name: &str) -> Result<()> {
        let name = name.trim();
        if self.is_default {
            return Err(ProtokollError::Validation(
                "Standardrollen können nicht umbenannt werden".to_string(),
            ));
        }
        if !ALLOWED_ROLE_NAMES.contains(&name) {
            return Err(ProtokollError::Validation(format!(
                "Nur 'Mitglied' und 'Gast' sind erlaubte Rollen (got '{}')",
                name
            )));
        }
        self.name = name.to_string();
        self.can_vote = name == "Mitglied";
        Ok(())
    }
}

/// The fixed role set substituted when a Sitzung is created without
/// roles. Note that these carry voting flags outside the user-creatable
/// name set; they are seeded once, never re-derived.
pub fn default_roles() -> Vec<Role> {
    let seed = [
        ("Referent", RoleColor::Primary, true),
        ("Mitglied", RoleColor::Secondary, true),
        ("Gast", RoleColor::Muted, false),
        ("Ehrenmitglied", RoleColor::Accent, false),
    ];
    seed.iter()
        .map(|(name, color, can_vote)| Role {
            id: Uuid::new_v4(),
            name: name.to_string(),
            color: *color,
            can_vote: *can_vote,
            is_default: true,
        })
        .collect()
}
