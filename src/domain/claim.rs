//! Claim Merge Logic
//!
//! Pure transformation of a party's item list when a guest claims or
//! unclaims an item. The input party is never mutated; persisting the
//! returned value through the store is the caller's follow-up step, and
//! that save is also what refreshes `updated_at`.

use super::entity::Entity;
use super::party::Party;

/// Merge a claim toggle into `party` and return the updated copy.
///
/// Rules, applied to the item matching `item_id`:
/// - unclaimed (absent or empty) -> claimed by the trimmed name
/// - claimed by the same name (case-sensitive) -> unclaimed again
/// - claimed by someone else -> unchanged; first claimant wins
///
/// A blank `claimant_name` makes the whole call a no-op; the caller is
/// responsible for asking the guest to enter a name first. Unknown
/// `item_id` also leaves everything unchanged.
pub fn toggle_claim(party: &Party, item_id: &str, claimant_name: &str) -> Party {
    let me = claimant_name.trim();
    if me.is_empty() {
        return party.clone();
    }

    let items = party
        .items
        .iter()
        .map(|item| {
            if item.id() != item_id {
                return item.clone();
            }

            let mut next = item.clone();
            match item.claimed_by.as_deref() {
                None | Some("") => next.claimed_by = Some(me.to_string()),
                Some(current) if current == me => next.claimed_by = None,
                Some(_) => {}
            }
            next
        })
        .collect();

    Party {
        items,
        ..party.clone()
    }
}
