//! Location resolution: turning id references into human-readable path
//! strings. Missing references degrade to empty segments, never errors;
//! an item pointing at a deleted shelf still renders, just with holes.

use crate::model::{Location, Snapshot};
use uuid::Uuid;

/// Human-readable path for a shelf: `"{rack name} {rack number} - Shelf
/// {shelf number}"`. Returns the empty string when the shelf is unknown;
/// a missing rack leaves its segments empty.
pub fn shelf_location(snapshot: &Snapshot, shelf_id: Uuid) -> String {
    let Some(shelf) = snapshot.shelves.iter().find(|s| s.id == shelf_id) else {
        return String::new();
    };

    match snapshot.racks.iter().find(|r| r.id == shelf.rack_id) {
        Some(rack) => format!("{} {} - Shelf {}", rack.name, rack.number, shelf.number),
        None => format!("  - Shelf {}", shelf.number),
    }
}

/// The case-folded text the search engine matches location queries
/// against: rack name, rack number, shelf number, and the name of
/// whichever sub-container the location references, space-joined.
/// Missing references contribute empty segments.
pub fn location_search_text(snapshot: &Snapshot, location: &Location) -> String {
    let shelf = snapshot.shelves.iter().find(|s| s.id == location.shelf_id);
    let rack = shelf.and_then(|s| snapshot.racks.iter().find(|r| r.id == s.rack_id));

    let rack_name = rack.map(|r| r.name.as_str()).unwrap_or_default();
    let rack_number = rack.map(|r| r.number.to_string()).unwrap_or_default();
    let shelf_number = shelf.map(|s| s.number.to_string()).unwrap_or_default();
    let holder_name = holder_name(snapshot, location).unwrap_or_default();

    format!(
        "{} {} {} {}",
        rack_name, rack_number, shelf_number, holder_name
    )
    .to_lowercase()
}

fn holder_name<'a>(snapshot: &'a Snapshot, location: &Location) -> Option<&'a str> {
    if let Some(id) = location.carton_id {
        return snapshot
            .cartons
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.name.as_str());
    }
    if let Some(id) = location.binder_id {
        return snapshot
            .binders
            .iter()
            .find(|b| b.id == id)
            .map(|b| b.name.as_str());
    }
    if let Some(id) = location.container_id {
        return snapshot
            .containers
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.name.as_str());
    }
    None
}
