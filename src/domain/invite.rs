//! Invite Link Codec
//!
//! Builds the compact payload embedded in a shareable invite link, plus
//! the friendly share-message text. The wire format must stay
//! byte-compatible with the receiving web client:
//! JSON -> percent-encode -> URL-safe base64 (padding stripped).

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::DateTime;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

use super::entity::{DomainError, DomainResult};
use super::party::Party;

/// Host serving the guest-facing invite pages
pub const INVITE_BASE_URL: &str = "https://partyplus-invite.netlify.app";

/// Characters left intact by JavaScript's encodeURIComponent; the
/// receiving client percent-decodes with the same set.
const COMPONENT_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// The reduced field set a guest's client needs to render an invite.
///
/// String fields are empty (not omitted) when the party has no value;
/// decoders treat empty as "no value". Coordinates are JSON null when
/// unknown. Field order is fixed: t, dt, l, a, la, ln.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvitePayload {
    /// Title
    pub t: String,
    /// Date/time string
    pub dt: String,
    /// Location name
    pub l: String,
    /// Address
    pub a: String,
    /// Latitude
    pub la: Option<f64>,
    /// Longitude
    pub ln: Option<f64>,
}

impl InvitePayload {
    /// Project a party onto the invite payload.
    ///
    /// The canonical schema carries no address or coordinates, so those
    /// slots ride along empty/null for the receiving client.
    pub fn from_party(party: &Party) -> Self {
        Self {
            t: party.title.clone(),
            dt: party.date.clone().unwrap_or_default(),
            l: party.location.clone().unwrap_or_default(),
            a: String::new(),
            la: None,
            ln: None,
        }
    }

    /// Encode for embedding in a link: JSON, percent-encoded, then
    /// URL-safe base64 with padding stripped.
    pub fn encode(&self) -> DomainResult<String> {
        let json =
            serde_json::to_string(self).map_err(|e| DomainError::Internal(e.to_string()))?;
        let encoded = utf8_percent_encode(&json, COMPONENT_SET).to_string();
        Ok(URL_SAFE_NO_PAD.encode(encoded))
    }

    /// Exact inverse of [`encode`](Self::encode). The host app never
    /// decodes in production; this exists so the link format is testable
    /// against what a receiving client does.
    pub fn decode(data: &str) -> DomainResult<Self> {
        let bytes = URL_SAFE_NO_PAD
            .decode(data)
            .map_err(|e| DomainError::InvalidInput(format!("bad base64: {}", e)))?;
        let encoded = String::from_utf8(bytes)
            .map_err(|e| DomainError::InvalidInput(format!("bad utf-8: {}", e)))?;
        let json = percent_decode_str(&encoded)
            .decode_utf8()
            .map_err(|e| DomainError::InvalidInput(format!("bad percent-encoding: {}", e)))?;
        serde_json::from_str(&json)
            .map_err(|e| DomainError::InvalidInput(format!("bad payload: {}", e)))
    }
}

/// Build the shareable invite link: `{base}/i/{party.id}?d={payload}`
pub fn invite_link(party: &Party, base_url: &str) -> DomainResult<String> {
    let d = InvitePayload::from_party(party).encode()?;
    Ok(format!(
        "{}/i/{}?d={}",
        base_url.trim_end_matches('/'),
        party.id,
        d
    ))
}

/// Render a stored ISO timestamp the way invites show it, e.g.
/// `Sun, Jan 25, 2026, 4:00 PM` (in the timestamp's own offset).
/// Anything unparsable is shown as-is rather than erroring.
pub fn format_when(iso: &str) -> String {
    match DateTime::parse_from_rfc3339(iso) {
        Ok(dt) => dt.format("%a, %b %-d, %Y, %-I:%M %p").to_string(),
        Err(_) => iso.to_string(),
    }
}

/// The friendly multi-line invite text for the share sheet/clipboard.
/// Only lines with content survive; a blank title falls back to "Party".
pub fn share_message(party: &Party, link: &str) -> String {
    let title = match party.title.trim() {
        "" => "Party",
        t => t,
    };

    let when = party
        .date
        .as_deref()
        .filter(|d| !d.is_empty())
        .map(|d| format!("When: {}", format_when(d)))
        .unwrap_or_default();
    let where_ = party
        .location
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(|l| format!("Where: {}", l))
        .unwrap_or_default();
    let notes = party
        .notes
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(|n| format!("Notes: {}", n))
        .unwrap_or_default();

    let lines = [
        format!("🎉 You're invited: {}", title),
        when,
        where_,
        notes,
        link.to_string(),
    ];

    lines
        .iter()
        .filter(|l| !l.is_empty())
        .cloned()
        .collect::<Vec<_>>()
        .join("\n")
}
