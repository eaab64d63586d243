//! Party Store Integration Tests
//!
//! Runs the store against the in-memory backend, plus SQLite contract
//! and durability checks.

#[cfg(test)]
mod tests {
    use crate::domain::{toggle_claim, Party, PartyItem};
    use crate::repository::{
        KeyValueStorage, MemoryStorage, PartyStore, SqliteStorage, CURRENT_PARTY_KEY, PARTIES_KEY,
    };
    use std::sync::Arc;
    use std::time::Duration;

    fn setup_store() -> (Arc<MemoryStorage>, PartyStore) {
        let storage = Arc::new(MemoryStorage::new());
        (storage.clone(), PartyStore::new(storage))
    }

    fn party(id: &str, title: &str) -> Party {
        Party::new(id.to_string(), title.to_string())
    }

    #[tokio::test]
    async fn test_empty_store_defaults() {
        let (_, store) = setup_store();

        assert!(store.get_parties().await.unwrap().is_empty());
        assert!(store.get_current_party_id().await.unwrap().is_none());
        assert!(store.get_party_by_id("anything").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_upsert_inserts_new_at_front() {
        let (_, store) = setup_store();

        store.upsert_party(&party("1", "First")).await.unwrap();
        store.upsert_party(&party("2", "Second")).await.unwrap();

        let parties = store.get_parties().await.unwrap();
        assert_eq!(parties.len(), 2);
        assert_eq!(parties[0].id, "2");
        assert_eq!(parties[1].id, "1");
    }

    #[tokio::test]
    async fn test_upsert_replaces_in_place() {
        let (_, store) = setup_store();

        store.upsert_party(&party("1", "First")).await.unwrap();
        store.upsert_party(&party("2", "Second")).await.unwrap();
        store.upsert_party(&party("3", "Third")).await.unwrap();

        store.upsert_party(&party("2", "Second, renamed")).await.unwrap();

        let parties = store.get_parties().await.unwrap();
        assert_eq!(parties.len(), 3);
        assert_eq!(parties[1].id, "2");
        assert_eq!(parties[1].title, "Second, renamed");
    }

    #[tokio::test]
    async fn test_first_save_stamps_matching_timestamps() {
        let (_, store) = setup_store();

        store
            .upsert_party(&party("1", "Fin's Birthday"))
            .await
            .unwrap();

        let saved = store.get_party_by_id("1").await.unwrap().unwrap();
        assert_eq!(saved.title, "Fin's Birthday");
        assert!(saved.items.is_empty());
        assert!(saved.created_at.is_some());
        assert_eq!(saved.created_at, saved.updated_at);
    }

    #[tokio::test]
    async fn test_resave_preserves_created_at_and_bumps_updated_at() {
        let (_, store) = setup_store();

        store.upsert_party(&party("1", "BBQ")).await.unwrap();
        let first = store.get_party_by_id("1").await.unwrap().unwrap();

        // Millisecond timestamps; make sure the clock moves.
        tokio::time::sleep(Duration::from_millis(10)).await;

        let mut edited = first.clone();
        edited.title = "BBQ at the camp".to_string();
        store.upsert_party(&edited).await.unwrap();

        let second = store.get_party_by_id("1").await.unwrap().unwrap();
        assert_eq!(second.created_at, first.created_at);
        assert!(second.updated_at.as_deref() > first.updated_at.as_deref());
    }

    #[tokio::test]
    async fn test_incoming_created_at_wins() {
        let (_, store) = setup_store();

        let mut p = party("1", "BBQ");
        p.created_at = Some("2020-06-01T12:00:00.000Z".to_string());
        store.upsert_party(&p).await.unwrap();

        let saved = store.get_party_by_id("1").await.unwrap().unwrap();
        assert_eq!(
            saved.created_at.as_deref(),
            Some("2020-06-01T12:00:00.000Z")
        );
        assert_ne!(saved.updated_at, saved.created_at);
    }

    #[tokio::test]
    async fn test_get_party_by_id_roundtrip() {
        let (_, store) = setup_store();

        let mut p = party("77", "Housewarming");
        p.items.push(PartyItem::new("a".to_string(), "Chips".to_string()));
        store.upsert_party(&p).await.unwrap();

        let found = store.get_party_by_id("77").await.unwrap().unwrap();
        assert_eq!(found.title, "Housewarming");
        assert_eq!(found.items.len(), 1);

        assert!(store.get_party_by_id("78").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_then_reload_is_idempotent() {
        let (storage, store) = setup_store();

        let mut p = party("1", "BBQ");
        p.items.push(PartyItem {
            id: "a".to_string(),
            name: "Chips".to_string(),
            qty: Some("2 bags".to_string()),
            claimed_by: Some("Alice".to_string()),
            created_by: None,
        });
        store.upsert_party(&p).await.unwrap();
        store.upsert_party(&party("2", "Housewarming")).await.unwrap();

        let before = storage.get(PARTIES_KEY).await.unwrap().unwrap();

        let reloaded = store.get_parties().await.unwrap();
        store.save_parties(&reloaded).await.unwrap();

        let after = storage.get(PARTIES_KEY).await.unwrap().unwrap();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_malformed_collection_recovers_empty() {
        for bad in ["not json", "{}", "42", "{\"id\":\"1\"}", "[1,2,3]"] {
            let (storage, store) = setup_store();
            storage.set(PARTIES_KEY, bad).await.unwrap();

            assert!(store.get_parties().await.unwrap().is_empty());

            // A later upsert starts a fresh collection.
            store.upsert_party(&party("1", "BBQ")).await.unwrap();
            assert_eq!(store.get_parties().await.unwrap().len(), 1);
        }
    }

    #[tokio::test]
    async fn test_tolerant_decode_of_stored_records() {
        let (storage, store) = setup_store();

        // An older record: no items, no timestamps, an unknown field.
        storage
            .set(
                PARTIES_KEY,
                r#"[{"id":"1","title":"BBQ","legacyFlag":true}]"#,
            )
            .await
            .unwrap();

        let parties = store.get_parties().await.unwrap();
        assert_eq!(parties.len(), 1);
        assert_eq!(parties[0].title, "BBQ");
        assert!(parties[0].items.is_empty());
        assert!(parties[0].created_at.is_none());
    }

    #[tokio::test]
    async fn test_current_pointer_lifecycle() {
        let (storage, store) = setup_store();

        store.set_current_party_id("42").await.unwrap();
        assert_eq!(
            store.get_current_party_id().await.unwrap().as_deref(),
            Some("42")
        );
        assert_eq!(
            storage.get(CURRENT_PARTY_KEY).await.unwrap().as_deref(),
            Some("42")
        );

        store.clear_current_party_id().await.unwrap();
        assert!(store.get_current_party_id().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_parties_by_recency_orders_newest_first() {
        let (_, store) = setup_store();

        let mut a = party("1", "Oldest");
        a.updated_at = Some("2026-01-01T00:00:00.000Z".to_string());
        let mut b = party("2", "Newest");
        b.updated_at = Some("2026-03-01T00:00:00.000Z".to_string());
        let mut c = party("3", "Middle");
        c.updated_at = Some("2026-02-01T00:00:00.000Z".to_string());

        // Straight to save_parties so the stamps stay as written.
        store.save_parties(&[a, b, c]).await.unwrap();

        let sorted = store.parties_by_recency().await.unwrap();
        let ids: Vec<&str> = sorted.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["2", "3", "1"]);
    }

    #[tokio::test]
    async fn test_claim_flow_persists_through_store() {
        let (_, store) = setup_store();

        let mut p = party("1", "BBQ");
        p.items.push(PartyItem::new("a".to_string(), "Chips".to_string()));
        store.upsert_party(&p).await.unwrap();

        // The share screen's flow: load, merge the toggle, save back.
        let loaded = store.get_party_by_id("1").await.unwrap().unwrap();
        let claimed = toggle_claim(&loaded, "a", "Alice");
        store.upsert_party(&claimed).await.unwrap();

        let reloaded = store.get_party_by_id("1").await.unwrap().unwrap();
        assert_eq!(reloaded.items[0].claimed_by.as_deref(), Some("Alice"));
        assert_eq!(reloaded.created_at, loaded.created_at);
    }

    #[tokio::test]
    async fn test_memory_storage_contract() {
        let storage = MemoryStorage::new();

        assert!(storage.get("k").await.unwrap().is_none());

        storage.set("k", "v1").await.unwrap();
        storage.set("k", "v2").await.unwrap();
        assert_eq!(storage.get("k").await.unwrap().as_deref(), Some("v2"));

        storage.remove("k").await.unwrap();
        storage.remove("k").await.unwrap();
        assert!(storage.get("k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_sqlite_storage_contract() {
        let storage = SqliteStorage::open(":memory:").unwrap();

        assert!(storage.get("k").await.unwrap().is_none());

        storage.set("k", "v1").await.unwrap();
        assert_eq!(storage.get("k").await.unwrap().as_deref(), Some("v1"));

        storage.set("k", "v2").await.unwrap();
        assert_eq!(storage.get("k").await.unwrap().as_deref(), Some("v2"));

        storage.remove("k").await.unwrap();
        assert!(storage.get("k").await.unwrap().is_none());

        // Removing an absent key is fine.
        storage.remove("k").await.unwrap();
    }

    #[tokio::test]
    async fn test_sqlite_storage_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("partyplus.db");

        {
            let storage = Arc::new(SqliteStorage::open(&db_path).unwrap());
            let store = PartyStore::new(storage);
            store.upsert_party(&party("1", "BBQ")).await.unwrap();
            store.set_current_party_id("1").await.unwrap();
        }

        let storage = Arc::new(SqliteStorage::open(&db_path).unwrap());
        let store = PartyStore::new(storage);

        let found = store.get_party_by_id("1").await.unwrap().unwrap();
        assert_eq!(found.title, "BBQ");
        assert_eq!(
            store.get_current_party_id().await.unwrap().as_deref(),
            Some("1")
        );
    }

    #[tokio::test]
    async fn test_store_over_sqlite_backend() {
        let storage = Arc::new(SqliteStorage::open(":memory:").unwrap());
        let store = PartyStore::new(storage);

        store.upsert_party(&party("1", "First")).await.unwrap();
        store.upsert_party(&party("2", "Second")).await.unwrap();

        let parties = store.get_parties().await.unwrap();
        assert_eq!(parties.len(), 2);
        assert_eq!(parties[0].id, "2");
    }
}
