//! Party Store
//!
//! Durable CRUD over the saved party collection and the current-party
//! pointer. The collection is one JSON array under one key: every read
//! parses the whole thing, every write reserializes the whole thing.
//! Guest claim updates rely on the full rewrite being idempotent and
//! last-write-wins, so keep that contract intact.

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use log::warn;
use tokio::sync::Mutex;

use crate::domain::{DomainError, DomainResult, Entity, Party};

use super::traits::KeyValueStorage;

/// Storage key for the serialized party collection
pub const PARTIES_KEY: &str = "partyplus.parties.v1";

/// Storage key for the current-party pointer
pub const CURRENT_PARTY_KEY: &str = "partyplus.currentPartyId.v1";

/// Current time in the stored timestamp shape: UTC, millisecond
/// precision, `Z` suffix
fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Store for Party records and the current-party pointer.
///
/// All operations are async but sequential from the caller's view:
/// await each call before relying on its result. Upserts take a single
/// in-process mutex across their read-modify-write, so concurrent
/// writers through the same store serialize; across separate stores the
/// last write still wins.
pub struct PartyStore {
    storage: Arc<dyn KeyValueStorage>,
    write_lock: Mutex<()>,
}

impl PartyStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            storage,
            write_lock: Mutex::new(()),
        }
    }

    /// Load the saved party collection.
    ///
    /// Absent data is an empty collection. So is stored data that no
    /// longer parses as a JSON array of parties: that fallback is part
    /// of the contract, not an error, and gets logged so it is visible.
    pub async fn get_parties(&self) -> DomainResult<Vec<Party>> {
        let Some(raw) = self.storage.get(PARTIES_KEY).await? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str::<Vec<Party>>(&raw) {
            Ok(parties) => Ok(parties),
            Err(e) => {
                warn!("stored party collection unreadable, starting empty: {}", e);
                Ok(Vec::new())
            }
        }
    }

    /// Overwrite the stored collection with `parties`. Whole-collection
    /// rewrite; there are no partial or append writes.
    pub async fn save_parties(&self, parties: &[Party]) -> DomainResult<()> {
        let json = serde_json::to_string(parties)
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        self.storage.set(PARTIES_KEY, &json).await
    }

    /// Insert or replace a party by id.
    ///
    /// An existing record is replaced in place (position preserved); a
    /// new one goes to the front so unsorted listings show it first.
    /// `created_at` is kept when the incoming record already has one,
    /// stamped otherwise; `updated_at` is always restamped.
    pub async fn upsert_party(&self, party: &Party) -> DomainResult<()> {
        let _guard = self.write_lock.lock().await;

        let mut parties = self.get_parties().await?;

        let now = now_iso();
        let mut updated = party.clone();
        if updated.created_at.is_none() {
            updated.created_at = Some(now.clone());
        }
        updated.updated_at = Some(now);

        match parties.iter().position(|p| p.id() == party.id()) {
            Some(index) => parties[index] = updated,
            None => parties.insert(0, updated),
        }

        self.save_parties(&parties).await
    }

    /// First party matching `id`, or `None`. Absence is an expected
    /// outcome, not an error.
    pub async fn get_party_by_id(&self, id: &str) -> DomainResult<Option<Party>> {
        let parties = self.get_parties().await?;
        Ok(parties.into_iter().find(|p| p.id() == id))
    }

    /// The saved parties ordered newest-first by `updated_at` (missing
    /// timestamps sort last). This is what list screens render.
    pub async fn parties_by_recency(&self) -> DomainResult<Vec<Party>> {
        let mut parties = self.get_parties().await?;
        parties.sort_by(|a, b| {
            let a = a.updated_at.as_deref().unwrap_or("");
            let b = b.updated_at.as_deref().unwrap_or("");
            b.cmp(a)
        });
        Ok(parties)
    }

    /// Record which party the share/claim view targets
    pub async fn set_current_party_id(&self, id: &str) -> DomainResult<()> {
        self.storage.set(CURRENT_PARTY_KEY, id).await
    }

    /// The current-party pointer; absent until first set
    pub async fn get_current_party_id(&self) -> DomainResult<Option<String>> {
        self.storage.get(CURRENT_PARTY_KEY).await
    }

    /// Drop the pointer (the user started a new, unsaved party)
    pub async fn clear_current_party_id(&self) -> DomainResult<()> {
        self.storage.remove(CURRENT_PARTY_KEY).await
    }
}
