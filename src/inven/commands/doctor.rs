//! Dangling-reference scan. Cascade deletes never touch items, so an item
//! can outlive its shelf indefinitely; the same goes for sub-containers
//! recreated against ids that no longer exist. `doctor` surfaces that
//! state and stops there: it repairs, re-homes, and deletes nothing, so
//! running it never changes what the rest of the system observes.

use crate::commands::{CmdMessage, CmdResult};
use crate::model::Snapshot;
use std::collections::HashSet;
use uuid::Uuid;

/// Counts from one scan over the snapshot.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ReferenceReport {
    pub shelves_without_rack: usize,
    pub cartons_without_shelf: usize,
    pub binders_without_shelf: usize,
    pub containers_without_shelf: usize,
    /// Items whose `location.shelf_id` no longer resolves.
    pub items_with_dead_shelf: usize,
    /// Items whose sub-container is gone or sits on a different shelf.
    pub items_with_dead_holder: usize,
}

impl ReferenceReport {
    pub fn is_clean(&self) -> bool {
        *self == Self::default()
    }
}

pub fn scan(snapshot: &Snapshot) -> ReferenceReport {
    let rack_ids: HashSet<Uuid> = snapshot.racks.iter().map(|r| r.id).collect();
    let shelf_ids: HashSet<Uuid> = snapshot.shelves.iter().map(|s| s.id).collect();

    let mut report = ReferenceReport {
        shelves_without_rack: snapshot
            .shelves
            .iter()
            .filter(|s| !rack_ids.contains(&s.rack_id))
            .count(),
        cartons_without_shelf: snapshot
            .cartons
            .iter()
            .filter(|c| !shelf_ids.contains(&c.shelf_id))
            .count(),
        binders_without_shelf: snapshot
            .binders
            .iter()
            .filter(|b| !shelf_ids.contains(&b.shelf_id))
            .count(),
        containers_without_shelf: snapshot
            .containers
            .iter()
            .filter(|c| !shelf_ids.contains(&c.shelf_id))
            .count(),
        ..Default::default()
    };

    for item in &snapshot.items {
        if !shelf_ids.contains(&item.location.shelf_id) {
            report.items_with_dead_shelf += 1;
        }
        if !holder_is_live(snapshot, item) {
            report.items_with_dead_holder += 1;
        }
    }

    report
}

/// A populated sub-container reference must point at a live record of that
/// kind sitting on the item's own shelf. Unpopulated references are fine.
fn holder_is_live(snapshot: &Snapshot, item: &crate::model::Item) -> bool {
    let location = &item.location;
    if let Some(id) = location.carton_id {
        return snapshot
            .cartons
            .iter()
            .any(|c| c.id == id && c.shelf_id == location.shelf_id);
    }
    if let Some(id) = location.binder_id {
        return snapshot
            .binders
            .iter()
            .any(|b| b.id == id && b.shelf_id == location.shelf_id);
    }
    if let Some(id) = location.container_id {
        return snapshot
            .containers
            .iter()
            .any(|c| c.id == id && c.shelf_id == location.shelf_id);
    }
    true
}

pub fn run(snapshot: &Snapshot) -> CmdResult {
    let report = scan(snapshot);
    let mut result = CmdResult::default();

    if report.is_clean() {
        result.add_message(CmdMessage::success("No dangling references found."));
        return result;
    }

    result.add_message(CmdMessage::warning("Dangling references found:"));
    let lines = [
        (report.shelves_without_rack, "shelf/shelves with a deleted rack"),
        (report.cartons_without_shelf, "carton(s) with a deleted shelf"),
        (report.binders_without_shelf, "binder(s) with a deleted shelf"),
        (
            report.containers_without_shelf,
            "container(s) with a deleted shelf",
        ),
        (report.items_with_dead_shelf, "item(s) on a deleted shelf"),
        (
            report.items_with_dead_holder,
            "item(s) in a missing or relocated sub-container",
        ),
    ];
    for (count, what) in lines {
        if count > 0 {
            result.add_message(CmdMessage::info(format!("  - {} {}", count, what)));
        }
    }
    result.add_message(CmdMessage::info(
        "Nothing was changed. Edit the affected records to re-home them.",
    ));

    result
}
