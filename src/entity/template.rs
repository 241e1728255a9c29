use serde::{Deserialize, Serialize};

use super::agenda::{AgendaItem, VotingResult};
use super::role::Role;

/// An agenda line in a template. A zeroed voting result marks items that
/// expect a vote once instantiated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateAgendaItem {
    pub title: String,
    #[serde(default)]
    pub voting_result: Option<VotingResult>,
}

impl TemplateAgendaItem {
    fn plain(title: &str) -> Self {
        Self {
            title: title.to_string(),
            voting_result: None,
        }
    }

    fn voted(title: &str) -> Self {
        Self {
            title: title.to_string(),
            voting_result: Some(VotingResult::default()),
        }
    }
}

/// A reusable agenda blueprint. Built-in templates use slug ids and are
/// protected from deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SitzungTemplate {
    pub id: String,
    pub name: String,
    pub description: String,
    pub agenda_items: Vec<TemplateAgendaItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<Role>>,
}

impl SitzungTemplate {
    /// Instantiate the template's agenda as fresh items with new ids.
    pub fn instantiate_agenda(&self) -> Vec<AgendaItem> {
        self.agenda_items
            .iter()
            .map(|entry| {
                let mut item = AgendaItem::new(entry.title.clone());
                item.voting_result = entry.voting_result;
                item
            })
            .collect()
    }
}

/// The shipped template set.
pub fn builtin_templates() -> Vec<SitzungTemplate> {
    vec![
        SitzungTemplate {
            id: "standard-weekly".to_string(),
            name: "Standard Wochensitzung".to_string(),
            description: "Reguläre wöchentliche StuPa-Sitzung mit Standardtagesordnung"
                .to_string(),
            agenda_items: vec![
                TemplateAgendaItem::plain("Eröffnung und Begrüßung"),
                TemplateAgendaItem::plain("Feststellung der Beschlussfähigkeit"),
                TemplateAgendaItem::voted("Genehmigung der Tagesordnung"),
                TemplateAgendaItem::voted("Genehmigung des letzten Protokolls"),
                TemplateAgendaItem::plain("Berichte"),
                TemplateAgendaItem::plain("Anträge und Beschlüsse"),
                TemplateAgendaItem::plain("Verschiedenes"),
                TemplateAgendaItem::plain("Festlegung des nächsten Sitzungstermins"),
                TemplateAgendaItem::plain("Schließung der Sitzung"),
            ],
            roles: None,
        },
        SitzungTemplate {
            id: "finance-session".to_string(),
            name: "Finanzsitzung".to_string(),
            description: "Sitzung mit Fokus auf Haushalts- und Finanzfragen".to_string(),
            agenda_items: vec![
                TemplateAgendaItem::plain("Eröffnung und Begrüßung"),
                TemplateAgendaItem::plain("Feststellung der Beschlussfähigkeit"),
                TemplateAgendaItem::voted("Genehmigung der Tagesordnung"),
                TemplateAgendaItem::plain("Bericht des Finanzreferats"),
                TemplateAgendaItem::voted("Haushaltsplanung"),
                TemplateAgendaItem::voted("Finanzanträge"),
                TemplateAgendaItem::voted("Mittelfreigaben"),
                TemplateAgendaItem::plain("Verschiedenes"),
                TemplateAgendaItem::plain("Festlegung des nächsten Sitzungstermins"),
                TemplateAgendaItem::plain("Schließung der Sitzung"),
            ],
            roles: None,
        },
        SitzungTemplate {
            id: "special-election".to_string(),
            name: "Wahlsitzung".to_string(),
            description: "Sitzung für Wahlen und Besetzungen".to_string(),
            agenda_items: vec![
                TemplateAgendaItem::plain("Eröffnung und Begrüßung"),
                TemplateAgendaItem::plain("Feststellung der Beschlussfähigkeit"),
                TemplateAgendaItem::voted("Genehmigung der Tagesordnung"),
                TemplateAgendaItem::plain("Vorstellung der Kandidat*innen"),
                TemplateAgendaItem::voted("Wahl der Referatsleitung"),
                TemplateAgendaItem::voted("Bestätigung der Wahl"),
                TemplateAgendaItem::plain("Verschiedenes"),
                TemplateAgendaItem::plain("Schließung der Sitzung"),
            ],
            roles: None,
        },
        SitzungTemplate {
            id: "blank".to_string(),
            name: "Leere Sitzung".to_string(),
            description: "Beginnen Sie mit einer leeren Tagesordnung".to_string(),
            agenda_items: Vec::new(),
            roles: None,
        },
    ]
}

/// Whether the id belongs to a shipped template.
pub fn is_builtin_template(id: &str) -> bool {
    matches!(
        id,
        "standard-weekly" | "finance-session" | "special-election" | "blank"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_templates_present() {
        let templates = builtin_templates();
        assert_eq!(templates.len(), 4);
        assert!(templates.iter().any(|t| t.id == "blank"));
        assert!(templates.iter().all(|t| is_builtin_template(&t.id)));
    }

    #[test]
    fn test_instantiate_agenda_assigns_fresh_ids() {
        let templates = builtin_templates();
        let weekly = templates.iter().find(|t| t.id == "standard-weekly").unwrap();

        let first = weekly.instantiate_agenda();
        let second = weekly.instantiate_agenda();
        assert_eq!(first.len(), 9);
        assert_ne!(first[0].id, second[0].id);

        let approval = first
            .iter()
            .find(|i| i.title == "Genehmigung der Tagesordnung")
            .unwrap();
        assert_eq!(approval.voting_result, Some(VotingResult::default()));
        assert!(!approval.completed);
    }
}
