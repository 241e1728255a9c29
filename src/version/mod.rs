//! Version history
//!
//! Point-in-time copies of a Sitzung's mutable fields, bounded per
//! meeting. Manual checkpoints and periodic auto-saves share one list;
//! the retention policy trims routine auto-saves before named
//! checkpoints. History is a convenience feature: a corrupt persisted
//! history reinitializes to empty instead of surfacing an error.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::entity::SitzungData;
use crate::error::{ProtokollError, Result};
use crate::storage::{SitzungUpdate, Store};

pub const MAX_SNAPSHOTS: usize = 10;
pub const AUTO_SAVE_LABEL: &str = "Auto-Save";

const VERSIONS_KEY_PREFIX: &str = "sitzung_versions";

fn history_key(sitzung_id: &Uuid) -> String {
    format!("{}_{}", VERSIONS_KEY_PREFIX, sitzung_id)
}

/// A frozen copy of a Sitzung's mutable fields. Never mutated after
/// creation; only deleted or used as a restore source.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SitzungSnapshot {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub label: String,
    pub data: SitzungData,
    pub auto_save: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionHistory {
    pub sitzung_id: Uuid,
    pub snapshots: Vec<SitzungSnapshot>,
    pub max_snapshots: usize,
}

impl VersionHistory {
    pub fn new(sitzung_id: Uuid) -> Self {
        Self {
            sitzung_id,
            snapshots: Vec::new(),
            max_snapshots: MAX_SNAPSHOTS,
        }
    }

    /// Insert at the head (most-recent-first), then enforce the bound.
    pub fn insert(&mut self, snapshot: SitzungSnapshot) {
        self.snapshots.insert(0, snapshot);
        if self.snapshots.len() > self.max_snapshots {
            self.trim();
        }
    }

    /// Retention: keep the first `floor(max/2)` auto-saves in list order
    /// (the list is most-recent-first, so the newest ones survive) and
    /// fill the remaining budget from the manual subset in the same
    /// order, then re-sort the union newest-first. Named checkpoints are
    /// never evicted by routine auto-saves as long as budget remains.
    fn trim(&mut self) {
        let auto_budget = self.max_snapshots / 2;

        let autos: Vec<SitzungSnapshot> = self
            .snapshots
            .iter()
            .filter(|s| s.auto_save)
            .take(auto_budget)
            .cloned()
            .collect();
        let manual_budget = self.max_snapshots - autos.len();
        let mut kept: Vec<SitzungSnapshot> = self
            .snapshots
            .iter()
            .filter(|s| !s.auto_save)
            .take(manual_budget)
            .cloned()
            .collect();
        kept.extend(autos);
        kept.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        debug!(
            sitzung = %self.sitzung_id,
            kept = kept.len(),
            dropped = self.snapshots.len() - kept.len(),
            "trimmed version history"
        );
        self.snapshots = kept;
    }
}

/// Per-meeting snapshot manager over the shared store.
pub struct VersionManager<'a> {
    store: &'a Store,
    sitzung_id: Uuid,
}

impl<'a> VersionManager<'a> {
    pub fn new(store: &'a Store, sitzung_id: Uuid) -> Self {
        Self { store, sitzung_id }
    }

    /// The persisted history, reinitialized to empty when missing or
    /// unreadable (fail closed).
    pub fn history(&self) -> VersionHistory {
        self.store
            .load_json(&history_key(&self.sitzung_id))
            .unwrap_or_else(|| VersionHistory::new(self.sitzung_id))
    }

    fn save_history(&self, history: &VersionHistory) -> Result<()> {
        self.store.save_json(&history_key(&self.sitzung_id), history)
    }

    /// Capture the meeting's current mutable fields as a snapshot and
    /// apply the retention policy.
    pub fn create_snapshot(&self, label: &str, auto_save: bool) -> Result<SitzungSnapshot> {
        let sitzung = self
            .store
            .get_sitzung(&self.sitzung_id)
            .ok_or_else(|| ProtokollError::SitzungNotFound(self.sitzung_id.to_string()))?;

        let snapshot = SitzungSnapshot {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            label: label.to_string(),
            data: sitzung.data.clone(),
            auto_save,
        };

        let mut history = self.history();
        history.insert(snapshot.clone());
        self.save_history(&history)?;

        Ok(snapshot)
    }

    /// Remove a snapshot by id. Idempotent.
    pub fn delete_snapshot(&self, id: &Uuid) -> Result<()> {
        let mut history = self.history();
        history.snapshots.retain(|s| &s.id != id);
        self.save_history(&history)
    }

    /// Overwrite the meeting's mutable fields with the snapshot's frozen
    /// data via the store (id and creation timestamp survive). Whether
    /// to checkpoint beforehand is the caller's decision.
    pub fn restore(&self, snapshot: &SitzungSnapshot) -> Result<()> {
        self.store
            .update_sitzung(&self.sitzung_id, SitzungUpdate::from_data(snapshot.data.clone()))?;
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        self.save_history(&VersionHistory::new(self.sitzung_id))
    }
}

/// Cooperative auto-save schedule: a fixed 5-minute period polled from
/// the owning event loop, cancelled when the view working on the
/// meeting goes away. No background thread is involved.
pub struct AutoSaver {
    interval: Duration,
    last_save: DateTime<Utc>,
    cancelled: bool,
}

impl AutoSaver {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self::with_interval(now, Duration::minutes(5))
    }

    pub fn with_interval(now: DateTime<Utc>, interval: Duration) -> Self {
        Self {
            interval,
            last_save: now,
            cancelled: false,
        }
    }

    /// Returns true when an auto-save is due; the schedule then restarts
    /// from `now`.
    pub fn poll(&mut self, now: DateTime<Utc>) -> bool {
        if self.cancelled || now - self.last_save < self.interval {
            return false;
        }
        self.last_save = now;
        true
    }

    /// Stop the schedule for good (view teardown).
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }
}
