//! Domain Layer
//!
//! Contains all domain entities and the pure party logic (claim merge,
//! draft assembly, invite codec). Nothing in this layer touches storage.

mod claim;
mod entity;
mod invite;
mod party;

pub use claim::toggle_claim;
pub use entity::{DomainError, DomainResult, Entity};
pub use invite::{
    format_when, invite_link, share_message, InvitePayload, INVITE_BASE_URL,
};
pub use party::{generate_party_id, normalize_date_input, rebuild_items, Party, PartyItem};
