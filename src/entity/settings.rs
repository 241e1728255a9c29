use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{ProtokollError, Result};

/// Global e-mail identities used when composing invitations. Invitations
/// go to a central collector address rather than to each participant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmailSettings {
    pub sender_email: String,
    pub sender_name: String,
    pub collector_email: String,
}

impl EmailSettings {
    pub fn new(sender_email: String, sender_name: String, collector_email: String) -> Result<Self> {
        let settings = Self {
            sender_email,
            sender_name,
            collector_email,
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.sender_name.trim().is_empty() {
            return Err(ProtokollError::Validation(
                "Absender Name darf nicht leer sein".to_string(),
            ));
        }
        validate_email(&self.sender_email)?;
        validate_email(&self.collector_email)?;
        Ok(())
    }
}

/// Address check: local part, `@`, and a dotted domain. Deliberately
/// shallow; delivery is out of scope.
pub fn validate_email(address: &str) -> Result<()> {
    let pattern = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s.]+$").expect("valid email pattern");
    if !pattern.is_match(address) {
        return Err(ProtokollError::Validation(format!(
            "Ungültige E-Mail-Adresse: '{}'",
            address
        )));
    }
    Ok(())
}
