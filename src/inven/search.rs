//! Case-insensitive substring matching across an item's fields and its
//! resolved location text. No ranking, no tokenization, no fuzziness:
//! exact containment only, OR-combined, designed to run on every keystroke
//! over collections of hundreds, not millions.

use crate::model::{Item, Snapshot};
use crate::resolve;

/// Does `needle` (already lowercased by the caller) occur in the item's
/// name, description, any tag, or its resolved location text?
///
/// The empty needle matches everything; whether that means "no filter" is
/// the caller's call.
pub fn matches(snapshot: &Snapshot, item: &Item, needle: &str) -> bool {
    item.name.to_lowercase().contains(needle)
        || item.description.to_lowercase().contains(needle)
        || item.tags.iter().any(|tag| tag.to_lowercase().contains(needle))
        || resolve::location_search_text(snapshot, &item.location).contains(needle)
}
