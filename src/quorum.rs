//! Derived attendance state
//!
//! Pure functions recomputed on every read; nothing here is cached.
//! `total` counts participants whose role name is voting-eligible,
//! `present` the subset of those marked present. The quorum threshold is
//! half of `total`, rounded up, which makes an empty voting body
//! vacuously quorate (0 >= 0); the export path relies on exactly that
//! boundary.

use std::collections::HashSet;

use serde::Serialize;

use crate::entity::{Participant, Role};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuorumStatus {
    pub has_quorum: bool,
    pub present: usize,
    pub total: usize,
}

fn voting_role_names(roles: &[Role]) -> HashSet<&str> {
    roles
        .iter()
        .filter(|r| r.can_vote)
        .map(|r| r.name.as_str())
        .collect()
}

pub fn quorum_status(participants: &[Participant], roles: &[Role]) -> QuorumStatus {
    let voting_roles = voting_role_names(roles);

    let total = participants
        .iter()
        .filter(|p| voting_roles.contains(p.role.as_str()))
        .count();
    let present = participants
        .iter()
        .filter(|p| voting_roles.contains(p.role.as_str()) && p.present)
        .count();

    QuorumStatus {
        has_quorum: present >= total.div_ceil(2),
        present,
        total,
    }
}

/// Present, voting-eligible participants. Exposed separately because
/// vote recording cross-checks entered tallies against it.
pub fn eligible_voters(participants: &[Participant], roles: &[Role]) -> usize {
    quorum_status(participants, roles).present
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::RoleColor;
    use uuid::Uuid;

    fn role(name: &str, can_vote: bool) -> Role {
        Role {
            id: Uuid::new_v4(),
            name: name.to_string(),
            color: RoleColor::Muted,
            can_vote,
            is_default: false,
        }
    }

    fn participant(role: &str, present: bool) -> Participant {
        Participant {
            id: Uuid::new_v4(),
            name: "P".to_string(),
            role: role.to_string(),
            present,
        }
    }

    #[test]
    fn test_quorum_counts_only_voting_roles() {
        let roles = vec![role("Mitglied", true), role("Gast", false)];
        let participants = vec![
            participant("Mitglied", true),
            participant("Mitglied", true),
            participant("Mitglied", true),
            participant("Mitglied", false),
            participant("Gast", true),
            participant("Gast", true),
        ];

        let status = quorum_status(&participants, &roles);
        assert_eq!(status.total, 4);
        assert_eq!(status.present, 3);
        assert!(status.has_quorum);
    }

    #[test]
    fn test_quorum_threshold_rounds_up() {
        let roles = vec![role("Mitglied", true)];
        let mut participants = vec![
            participant("Mitglied", true),
            participant("Mitglied", false),
            participant("Mitglied", false),
        ];

        // 1 of 3 present, threshold ceil(3/2) = 2
        assert!(!quorum_status(&participants, &roles).has_quorum);

        participants[1].present = true;
        assert!(quorum_status(&participants, &roles).has_quorum);
    }

    #[test]
    fn test_empty_voting_body_is_vacuously_quorate() {
        let roles = vec![role("Gast", false)];
        let participants = vec![participant("Gast", true)];

        let status = quorum_status(&participants, &roles);
        assert_eq!(status.total, 0);
        assert_eq!(status.present, 0);
        assert!(status.has_quorum);
    }

    #[test]
    fn test_present_never_exceeds_total() {
        let roles = vec![role("Mitglied", true)];
        let participants = vec![
            participant("Mitglied", true),
            participant("Mitglied", true),
        ];

        let status = quorum_status(&participants, &roles);
        assert!(status.present <= status.total);
    }

    #[test]
    fn test_eligible_voters_matches_present() {
        let roles = vec![role("Mitglied", true), role("Gast", false)];
        let participants = vec![
            participant("Mitglied", true),
            participant("Mitglied", false),
            participant("Gast", true),
        ];

        assert_eq!(eligible_voters(&participants, &roles), 1);
    }

    #[test]
    fn test_unknown_role_name_does_not_count() {
        let roles = vec![role("Mitglied", true)];
        let participants = vec![participant("Vorstand", true)];

        let status = quorum_status(&participants, &roles);
        assert_eq!(status.total, 0);
    }
}
