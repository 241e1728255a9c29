use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Tally of a single vote.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct VotingResult {
    pub ja: u32,
    pub nein: u32,
    pub enthaltungen: u32,
}

impl VotingResult {
    pub fn new(ja: u32, nein: u32, enthaltungen: u32) -> Self {
        Self {
            ja,
            nein,
            enthaltungen,
        }
    }

    pub fn total(&self) -> u32 {
        self.ja + self.nein + self.enthaltungen
    }

    /// Strict majority: a tie is a rejection, not an error.
    pub fn accepted(&self) -> bool {
        self.ja > self.nein
    }

    /// The verdict string used in the exported protocol.
    pub fn verdict(&self) -> &'static str {
        if self.accepted() {
            "ANGENOMMEN"
        } else {
            "ABGELEHNT"
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AntragType {
    #[default]
    Voting,
    Input,
}

impl std::fmt::Display for AntragType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AntragType::Voting => write!(f, "voting"),
            AntragType::Input => write!(f, "input"),
        }
    }
}

impl std::str::FromStr for AntragType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "voting" => Ok(AntragType::Voting),
            "input" => Ok(AntragType::Input),
            _ => Err(format!("Invalid antrag type: {}", s)),
        }
    }
}

/// A motion nested under an agenda item. Depending on its type it is
/// resolved either by a vote or by a free-text answer; recording a
/// result clears the field of the other type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Antrag {
    pub id: Uuid,
    pub title: String,
    #[serde(rename = "type")]
    pub antrag_type: AntragType,
    pub voting_result: Option<VotingResult>,
    pub input_result: String,
    pub notes: String,
    pub completed: bool,
}

impl Antrag {
    pub fn new(title: String, antrag_type: AntragType) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            antrag_type,
            voting_result: None,
            input_result: String::new(),
            notes: String::new(),
            completed: false,
        }
    }

    pub fn record_vote(&mut self, result: VotingResult) {
        self.voting_result = Some(result);
        self.input_result = String::new();
        self.completed = true;
    }

    pub fn record_input(&mut self, input: String) {
        self.input_result = input;
        self.voting_result = None;
        self.completed = true;
    }
}

/// A Tagesordnungspunkt. When flagged as the Anträge section it carries
/// nested motions and is completed once all of them are.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgendaItem {
    pub id: Uuid,
    pub title: String,
    pub voting_result: Option<VotingResult>,
    pub notes: String,
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_name: Option<String>,
    #[serde(default)]
    pub antraege: Vec<Antrag>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_antraege_section: bool,
}

impl AgendaItem {
    pub fn new(title: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            voting_result: None,
            notes: String::new(),
            completed: false,
            document_name: None,
            antraege: Vec::new(),
            is_antraege_section: false,
        }
    }

    /// Recompute the completed flag from the nested Anträge. Only
    /// meaningful for the Anträge section; other items are completed
    /// explicitly.
    pub fn sync_completed_from_antraege(&mut self) {
        if self.is_antraege_section {
            self.completed = !self.antraege.is_empty() && self.antraege.iter().all(|a| a.completed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voting_result_majority() {
        assert!(VotingResult::new(5, 3, 1).accepted());
        assert!(!VotingResult::new(3, 5, 1).accepted());
    }

    #[test]
    fn test_tie_is_rejected() {
        let result = VotingResult::new(5, 5, 2);
        assert!(!result.accepted());
        assert_eq!(result.verdict(), "ABGELEHNT");
        assert_eq!(result.total(), 12);
    }

    #[test]
    fn test_antrag_results_are_mutually_exclusive() {
        let mut antrag = Antrag::new("Haushaltsplan".to_string(), AntragType::Voting);
        antrag.record_input("vertagt".to_string());
        assert!(antrag.voting_result.is_none());
        assert!(antrag.completed);

        antrag.record_vote(VotingResult::new(4, 1, 0));
        assert!(antrag.input_result.is_empty());
        assert_eq!(antrag.voting_result.unwrap().ja, 4);
    }

    #[test]
    fn test_antraege_section_completion() {
        let mut item = AgendaItem::new("Anträge".to_string());
        item.is_antraege_section = true;
        item.antraege.push(Antrag::new("A".to_string(), AntragType::Voting));
        item.antraege.push(Antrag::new("B".to_string(), AntragType::Input));

        item.sync_completed_from_antraege();
        assert!(!item.completed);

        for antrag in &mut item.antraege {
            antrag.completed = true;
        }
        item.sync_completed_from_antraege();
        assert!(item.completed);
    }

    #[test]
    fn test_empty_antraege_section_is_not_completed() {
        let mut item = AgendaItem::new("Anträge".to_string());
        item.is_antraege_section = true;
        item.sync_completed_from_antraege();
        assert!(!item.completed);
    }
}
