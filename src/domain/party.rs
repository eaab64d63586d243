//! Party Entity
//!
//! The canonical Party/PartyItem schema, plus the pure helpers the
//! create/edit flow uses to assemble a draft before handing it to the
//! store. Wire format is camelCase JSON; decoding is tolerant so older
//! records (missing timestamps, extra fields) still load.

use chrono::{DateTime, Local, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::entity::Entity;

/// Something to bring to a party.
///
/// `claimed_by` is the claimant's self-reported name; absent or empty
/// means unclaimed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyItem {
    /// Unique within one party's item list
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Free-text quantity ("2 bags", "enough for 10")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qty: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claimed_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
}

impl PartyItem {
    pub fn new(id: String, name: String) -> Self {
        Self {
            id,
            name,
            qty: None,
            claimed_by: None,
            created_by: None,
        }
    }

    /// An item counts as claimed only when a non-empty name is recorded
    pub fn is_claimed(&self) -> bool {
        self.claimed_by.as_deref().is_some_and(|c| !c.is_empty())
    }
}

impl Entity for PartyItem {
    type Id = str;

    fn id(&self) -> &str {
        &self.id
    }
}

/// A single planned event with metadata and a list of items to bring.
///
/// `id` is unique across the whole store and doubles as the deep-link
/// identifier. `created_at` is stamped once at first save and preserved
/// on every later save; `updated_at` is restamped on every save. Both
/// are set by the store, not by callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Party {
    pub id: String,
    #[serde(default)]
    pub title: String,
    /// ISO-8601 timestamp; absent means "not scheduled"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    /// Insertion order is display order
    #[serde(default)]
    pub items: Vec<PartyItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Party {
    pub fn new(id: String, title: String) -> Self {
        Self {
            id,
            title,
            date: None,
            location: None,
            notes: None,
            theme: None,
            items: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }
}

impl Entity for Party {
    type Id = str;

    fn id(&self) -> &str {
        &self.id
    }
}

/// Mint a fresh party id: Unix-epoch milliseconds as a decimal string
pub fn generate_party_id() -> String {
    Utc::now().timestamp_millis().to_string()
}

/// Normalize a free-text date entry to an ISO-8601 UTC timestamp.
///
/// Empty input means "not scheduled" (`None`). Unparsable input also
/// yields `None` so a bad timestamp is never persisted; the caller is
/// expected to tell the user before saving. Accepted shapes: RFC 3339,
/// `2026-01-25T16:00`, and `1/25/2026 4:00 PM` (the latter two read as
/// local time).
pub fn normalize_date_input(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(
            dt.with_timezone(&Utc)
                .to_rfc3339_opts(SecondsFormat::Millis, true),
        );
    }

    for fmt in ["%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M", "%m/%d/%Y %I:%M %p"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            if let Some(local) = Local.from_local_datetime(&naive).earliest() {
                return Some(
                    local
                        .with_timezone(&Utc)
                        .to_rfc3339_opts(SecondsFormat::Millis, true),
                );
            }
        }
    }

    None
}

/// Rebuild a party's item list from an ordered list of display names.
///
/// The edit screen works with plain names, so items are paired by index:
/// where an item already exists at that index all of its fields survive
/// (including `claimed_by`) and only the name is replaced. Names beyond
/// the existing list become brand-new unclaimed items.
pub fn rebuild_items(existing: &[PartyItem], names: &[String]) -> Vec<PartyItem> {
    let now = Utc::now().timestamp_millis();

    names
        .iter()
        .enumerate()
        .map(|(index, name)| match existing.get(index) {
            Some(prev) => {
                let mut item = prev.clone();
                item.name = name.clone();
                item
            }
            None => PartyItem {
                id: format!("{}-{}", index, now),
                name: name.clone(),
                qty: Some(String::new()),
                claimed_by: None,
                created_by: None,
            },
        })
        .collect()
}
