//! PartyPlus Core
//!
//! Layered architecture:
//! - domain: Party entities, claim merge, and the invite link codec
//! - repository: Key-value storage backends and the party store
//!
//! The UI is an external collaborator: it assembles Party values with the
//! domain helpers, persists them through [`PartyStore`], and renders what
//! the store returns. Nothing in here blocks; all storage access is async.

pub mod domain;
pub mod repository;

pub use domain::{
    format_when, generate_party_id, invite_link, normalize_date_input, rebuild_items,
    share_message, toggle_claim, DomainError, DomainResult, InvitePayload, Party, PartyItem,
    INVITE_BASE_URL,
};
pub use repository::{
    KeyValueStorage, MemoryStorage, PartyStore, SqliteStorage, CURRENT_PARTY_KEY, PARTIES_KEY,
};
