//! The inventory state container: single source of truth for every entity
//! collection and the sole mutation surface.
//!
//! Mutations follow one uniform contract:
//!
//! - `add_*` assigns a fresh id (items also get their timestamps), appends,
//!   and returns the new id. Foreign keys are not validated; the form layer
//!   offers only keys that exist.
//! - `update_*` merges the given patch into the matching record and is a
//!   silent no-op when the id is unknown. Item updates refresh `updated_at`.
//! - `delete_*` removes the matching record. Deleting a rack cascades to
//!   its shelves and transitively to every carton/binder/container on
//!   them; deleting a shelf cascades to its cartons/binders/containers.
//!   Items are never cascaded; they keep their (now dangling) location.
//!
//! After every mutation the whole snapshot is written through the store and
//! subscribers are notified, in that order. Memory stays authoritative even
//! if the mirror write fails.

use crate::error::Result;
use crate::model::{
    Binder, BinderPatch, Carton, CartonPatch, Container, ContainerPatch, Item, ItemPatch,
    Location, Rack, RackPatch, Shelf, ShelfPatch, Snapshot,
};
use crate::resolve;
use crate::search;
use crate::store::DataStore;
use chrono::Utc;
use std::collections::HashSet;
use uuid::Uuid;

/// Handle returned by [`Inventory::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn Fn(&Snapshot)>;

pub struct Inventory<S: DataStore> {
    snapshot: Snapshot,
    store: S,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl<S: DataStore> Inventory<S> {
    /// Rehydrate the container from whatever the store last saved.
    pub fn load(store: S) -> Result<Self> {
        let snapshot = store.load()?;
        Ok(Self {
            snapshot,
            store,
            subscribers: Vec::new(),
            next_subscription: 0,
        })
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn items(&self) -> &[Item] {
        &self.snapshot.items
    }

    pub fn racks(&self) -> &[Rack] {
        &self.snapshot.racks
    }

    pub fn shelves(&self) -> &[Shelf] {
        &self.snapshot.shelves
    }

    pub fn cartons(&self) -> &[Carton] {
        &self.snapshot.cartons
    }

    pub fn binders(&self) -> &[Binder] {
        &self.snapshot.binders
    }

    pub fn containers(&self) -> &[Container] {
        &self.snapshot.containers
    }

    // --- Subscriptions ---

    /// Register a callback invoked with the post-mutation snapshot after
    /// every committed change.
    pub fn subscribe(&mut self, subscriber: impl Fn(&Snapshot) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    /// Remove a subscription. Unknown ids are ignored.
    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.subscribers.retain(|(sid, _)| *sid != id);
    }

    // --- Racks ---

    pub fn add_rack(
        &mut self,
        number: u32,
        name: String,
        description: Option<String>,
    ) -> Result<Uuid> {
        let rack = Rack::new(number, name, description);
        let id = rack.id;
        self.snapshot.racks.push(rack);
        self.commit()?;
        Ok(id)
    }

    pub fn update_rack(&mut self, id: Uuid, patch: RackPatch) -> Result<()> {
        if let Some(rack) = self.snapshot.racks.iter_mut().find(|r| r.id == id) {
            if let Some(number) = patch.number {
                rack.number = number;
            }
            if let Some(name) = patch.name {
                rack.name = name;
            }
            if let Some(description) = patch.description {
                rack.description = Some(description);
            }
        }
        self.commit()
    }

    /// Cascades: removes the rack's shelves and, transitively, every
    /// carton/binder/container on those shelves. Items are left alone.
    pub fn delete_rack(&mut self, id: Uuid) -> Result<()> {
        self.snapshot.racks.retain(|r| r.id != id);

        let doomed: HashSet<Uuid> = self
            .snapshot
            .shelves
            .iter()
            .filter(|s| s.rack_id == id)
            .map(|s| s.id)
            .collect();
        self.snapshot.shelves.retain(|s| s.rack_id != id);
        remove_shelf_children(&mut self.snapshot, &doomed);

        self.commit()
    }

    // --- Shelves ---

    pub fn add_shelf(
        &mut self,
        rack_id: Uuid,
        number: u32,
        description: Option<String>,
    ) -> Result<Uuid> {
        let shelf = Shelf::new(rack_id, number, description);
        let id = shelf.id;
        self.snapshot.shelves.push(shelf);
        self.commit()?;
        Ok(id)
    }

    pub fn update_shelf(&mut self, id: Uuid, patch: ShelfPatch) -> Result<()> {
        if let Some(shelf) = self.snapshot.shelves.iter_mut().find(|s| s.id == id) {
            if let Some(rack_id) = patch.rack_id {
                shelf.rack_id = rack_id;
            }
            if let Some(number) = patch.number {
                shelf.number = number;
            }
            if let Some(description) = patch.description {
                shelf.description = Some(description);
            }
        }
        self.commit()
    }

    /// Cascades to the shelf's cartons/binders/containers. Items stay.
    pub fn delete_shelf(&mut self, id: Uuid) -> Result<()> {
        self.snapshot.shelves.retain(|s| s.id != id);

        let doomed: HashSet<Uuid> = std::iter::once(id).collect();
        remove_shelf_children(&mut self.snapshot, &doomed);

        self.commit()
    }

    // --- Cartons ---

    pub fn add_carton(
        &mut self,
        shelf_id: Uuid,
        number: u32,
        name: String,
        description: Option<String>,
        color: Option<String>,
    ) -> Result<Uuid> {
        let carton = Carton::new(shelf_id, number, name, description, color);
        let id = carton.id;
        self.snapshot.cartons.push(carton);
        self.commit()?;
        Ok(id)
    }

    pub fn update_carton(&mut self, id: Uuid, patch: CartonPatch) -> Result<()> {
        if let Some(carton) = self.snapshot.cartons.iter_mut().find(|c| c.id == id) {
            if let Some(shelf_id) = patch.shelf_id {
                carton.shelf_id = shelf_id;
            }
            if let Some(number) = patch.number {
                carton.number = number;
            }
            if let Some(name) = patch.name {
                carton.name = name;
            }
            if let Some(description) = patch.description {
                carton.description = Some(description);
            }
            if let Some(color) = patch.color {
                carton.color = Some(color);
            }
        }
        self.commit()
    }

    pub fn delete_carton(&mut self, id: Uuid) -> Result<()> {
        self.snapshot.cartons.retain(|c| c.id != id);
        self.commit()
    }

    // --- Binders ---

    pub fn add_binder(
        &mut self,
        shelf_id: Uuid,
        number: u32,
        name: String,
        description: Option<String>,
        color: Option<String>,
    ) -> Result<Uuid> {
        let binder = Binder::new(shelf_id, number, name, description, color);
        let id = binder.id;
        self.snapshot.binders.push(binder);
        self.commit()?;
        Ok(id)
    }

    pub fn update_binder(&mut self, id: Uuid, patch: BinderPatch) -> Result<()> {
        if let Some(binder) = self.snapshot.binders.iter_mut().find(|b| b.id == id) {
            if let Some(shelf_id) = patch.shelf_id {
                binder.shelf_id = shelf_id;
            }
            if let Some(number) = patch.number {
                binder.number = number;
            }
            if let Some(name) = patch.name {
                binder.name = name;
            }
            if let Some(description) = patch.description {
                binder.description = Some(description);
            }
            if let Some(color) = patch.color {
                binder.color = Some(color);
            }
        }
        self.commit()
    }

    pub fn delete_binder(&mut self, id: Uuid) -> Result<()> {
        self.snapshot.binders.retain(|b| b.id != id);
        self.commit()
    }

    // --- Containers ---

    pub fn add_container(
        &mut self,
        shelf_id: Uuid,
        number: u32,
        name: String,
        kind: String,
        description: Option<String>,
        color: Option<String>,
    ) -> Result<Uuid> {
        let container = Container::new(shelf_id, number, name, kind, description, color);
        let id = container.id;
        self.snapshot.containers.push(container);
        self.commit()?;
        Ok(id)
    }

    pub fn update_container(&mut self, id: Uuid, patch: ContainerPatch) -> Result<()> {
        if let Some(container) = self.snapshot.containers.iter_mut().find(|c| c.id == id) {
            if let Some(shelf_id) = patch.shelf_id {
                container.shelf_id = shelf_id;
            }
            if let Some(number) = patch.number {
                container.number = number;
            }
            if let Some(name) = patch.name {
                container.name = name;
            }
            if let Some(kind) = patch.kind {
                container.kind = kind;
            }
            if let Some(description) = patch.description {
                container.description = Some(description);
            }
            if let Some(color) = patch.color {
                container.color = Some(color);
            }
        }
        self.commit()
    }

    pub fn delete_container(&mut self, id: Uuid) -> Result<()> {
        self.snapshot.containers.retain(|c| c.id != id);
        self.commit()
    }

    // --- Items ---

    pub fn add_item(
        &mut self,
        name: String,
        description: String,
        tags: Vec<String>,
        images: Vec<String>,
        location: Location,
    ) -> Result<Uuid> {
        let item = Item::new(name, description, tags, images, location);
        let id = item.id;
        self.snapshot.items.push(item);
        self.commit()?;
        Ok(id)
    }

    pub fn update_item(&mut self, id: Uuid, patch: ItemPatch) -> Result<()> {
        if let Some(item) = self.snapshot.items.iter_mut().find(|i| i.id == id) {
            if let Some(name) = patch.name {
                item.name = name;
            }
            if let Some(description) = patch.description {
                item.description = description;
            }
            if let Some(tags) = patch.tags {
                item.tags = tags;
            }
            if let Some(images) = patch.images {
                item.images = images;
            }
            if let Some(location) = patch.location {
                item.location = location;
            }
            item.updated_at = Utc::now();
        }
        self.commit()
    }

    pub fn delete_item(&mut self, id: Uuid) -> Result<()> {
        self.snapshot.items.retain(|i| i.id != id);
        self.commit()
    }

    pub fn item(&self, id: Uuid) -> Option<&Item> {
        self.snapshot.items.iter().find(|i| i.id == id)
    }

    // --- Derived queries ---

    /// Order-preserving subsequence of items matching `query`
    /// case-insensitively in name, description, any tag, or resolved
    /// location text. The empty query matches everything.
    pub fn search_items<'a>(&'a self, query: &str) -> impl Iterator<Item = &'a Item> + 'a {
        let needle = query.to_lowercase();
        let snapshot = &self.snapshot;
        snapshot
            .items
            .iter()
            .filter(move |item| search::matches(snapshot, item, &needle))
    }

    /// Items whose location matches `location` exactly, all four fields
    /// included: an item directly on a shelf does not match a carton on
    /// that shelf and vice versa. Feeds occupancy counts.
    pub fn items_by_location<'a>(
        &'a self,
        location: &Location,
    ) -> impl Iterator<Item = &'a Item> + 'a {
        let location = location.clone();
        self.snapshot
            .items
            .iter()
            .filter(move |item| item.location == location)
    }

    /// Human-readable path for a shelf; empty string when unknown.
    pub fn shelf_location(&self, shelf_id: Uuid) -> String {
        resolve::shelf_location(&self.snapshot, shelf_id)
    }

    /// Persist the snapshot and let subscribers know. Runs after every
    /// mutation, matched or not; the mirror and the observers always
    /// track the current snapshot.
    fn commit(&mut self) -> Result<()> {
        self.store.save(&self.snapshot)?;
        self.notify();
        Ok(())
    }

    fn notify(&self) {
        for (_, subscriber) in &self.subscribers {
            subscriber(&self.snapshot);
        }
    }
}

fn remove_shelf_children(snapshot: &mut Snapshot, shelf_ids: &HashSet<Uuid>) {
    remove_children(&mut snapshot.cartons, shelf_ids, |c| c.shelf_id);
    remove_children(&mut snapshot.binders, shelf_ids, |b| b.shelf_id);
    remove_children(&mut snapshot.containers, shelf_ids, |c| c.shelf_id);
}

/// One uniform pass: drop every record whose foreign key points into
/// `parents`. All four child kinds go through here so the cascade rule
/// can't drift between them.
fn remove_children<T, F: Fn(&T) -> Uuid>(
    records: &mut Vec<T>,
    parents: &HashSet<Uuid>,
    foreign_key: F,
) {
    records.retain(|record| !parents.contains(&foreign_key(record)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::Warehouse;
    use crate::store::memory::InMemoryStore;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn deleting_rack_cascades_to_shelves_and_their_children() {
        let mut fixture = Warehouse::new();
        fixture.inventory.delete_rack(fixture.rack).unwrap();

        assert!(fixture.inventory.racks().is_empty());
        assert!(fixture.inventory.shelves().is_empty());
        assert!(fixture.inventory.cartons().is_empty());
        assert!(fixture.inventory.binders().is_empty());
        assert!(fixture.inventory.containers().is_empty());
    }

    #[test]
    fn deleting_rack_leaves_items_dangling() {
        let mut fixture = Warehouse::new();
        fixture.inventory.delete_rack(fixture.rack).unwrap();

        // Both items survive, still pointing at the deleted shelf.
        assert_eq!(fixture.inventory.items().len(), 2);
        let widget = fixture.inventory.item(fixture.widget).unwrap();
        assert_eq!(widget.location.shelf_id, fixture.shelf);
        assert_eq!(fixture.inventory.shelf_location(fixture.shelf), "");
    }

    #[test]
    fn deleting_shelf_cascades_to_children_only() {
        let mut fixture = Warehouse::new();
        fixture.inventory.delete_shelf(fixture.shelf).unwrap();

        assert_eq!(fixture.inventory.racks().len(), 1);
        assert!(fixture.inventory.shelves().is_empty());
        assert!(fixture.inventory.cartons().is_empty());
        assert!(fixture.inventory.binders().is_empty());
        assert!(fixture.inventory.containers().is_empty());
        assert_eq!(fixture.inventory.items().len(), 2);
    }

    #[test]
    fn deleting_unknown_rack_still_sweeps_shelves_pointing_at_it() {
        let mut fixture = Warehouse::new();
        fixture.inventory.delete_rack(fixture.rack).unwrap();

        // Re-create a shelf referencing the dead rack, then delete the
        // dead rack id again: the sweep runs regardless of a rack match.
        fixture.inventory.add_shelf(fixture.rack, 9, None).unwrap();
        assert_eq!(fixture.inventory.shelves().len(), 1);
        fixture.inventory.delete_rack(fixture.rack).unwrap();
        assert!(fixture.inventory.shelves().is_empty());
    }

    #[test]
    fn unknown_id_mutations_are_silent_noops() {
        let mut fixture = Warehouse::new();
        let bogus = Uuid::new_v4();

        fixture
            .inventory
            .update_rack(
                bogus,
                RackPatch {
                    name: Some("Nope".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        fixture.inventory.delete_item(bogus).unwrap();
        fixture.inventory.delete_carton(bogus).unwrap();

        assert_eq!(fixture.inventory.racks().len(), 1);
        assert_eq!(fixture.inventory.items().len(), 2);
        assert_eq!(fixture.inventory.cartons().len(), 1);
        assert_eq!(fixture.inventory.racks()[0].name, "A");
    }

    #[test]
    fn empty_search_returns_everything_in_insertion_order() {
        let fixture = Warehouse::new();
        let names: Vec<_> = fixture
            .inventory
            .search_items("")
            .map(|i| i.name.as_str())
            .collect();
        assert_eq!(names, vec!["Widget", "Lamp"]);
    }

    #[test]
    fn search_is_case_insensitive() {
        let fixture = Warehouse::new();
        let upper: Vec<_> = fixture.inventory.search_items("LAMP").map(|i| i.id).collect();
        let lower: Vec<_> = fixture.inventory.search_items("lamp").map(|i| i.id).collect();
        assert_eq!(upper, vec![fixture.lamp]);
        assert_eq!(upper, lower);
    }

    #[test]
    fn add_then_read_back_round_trips() {
        let mut fixture = Warehouse::new();
        let location = Location::shelf(fixture.shelf);
        let id = fixture
            .inventory
            .add_item(
                "Tape".into(),
                "Duct tape".into(),
                vec!["adhesive".into(), "repair".into()],
                vec!["https://example.com/tape.jpg".into()],
                location.clone(),
            )
            .unwrap();

        let item = fixture.inventory.item(id).unwrap();
        assert_eq!(item.name, "Tape");
        assert_eq!(item.description, "Duct tape");
        assert_eq!(item.tags, vec!["adhesive", "repair"]);
        assert_eq!(item.images, vec!["https://example.com/tape.jpg"]);
        assert_eq!(item.location, location);
        assert_eq!(item.created_at, item.updated_at);
    }

    #[test]
    fn update_advances_updated_at_but_not_created_at() {
        let mut fixture = Warehouse::new();
        let created_at = fixture.inventory.item(fixture.widget).unwrap().created_at;

        // Coarse clocks exist; make the tick unambiguous.
        thread::sleep(Duration::from_millis(5));
        fixture
            .inventory
            .update_item(
                fixture.widget,
                ItemPatch {
                    description: Some("A slightly bigger widget".into()),
                    ..Default::default()
                },
            )
            .unwrap();

        let item = fixture.inventory.item(fixture.widget).unwrap();
        assert_eq!(item.created_at, created_at);
        assert!(item.updated_at > item.created_at);
        assert_eq!(item.description, "A slightly bigger widget");
        assert_eq!(item.name, "Widget");
    }

    #[test]
    fn items_by_location_is_an_exact_tuple_filter() {
        let fixture = Warehouse::new();

        // Shelf-only query: the lamp sits on the shelf, the widget sits
        // in a carton on that shelf and must NOT match.
        let on_shelf: Vec<_> = fixture
            .inventory
            .items_by_location(&Location::shelf(fixture.shelf))
            .map(|i| i.id)
            .collect();
        assert_eq!(on_shelf, vec![fixture.lamp]);

        let in_carton: Vec<_> = fixture
            .inventory
            .items_by_location(&Location::in_carton(fixture.shelf, fixture.carton))
            .map(|i| i.id)
            .collect();
        assert_eq!(in_carton, vec![fixture.widget]);
    }

    #[test]
    fn every_mutation_writes_through_to_the_store() {
        let mut fixture = Warehouse::new();
        fixture.inventory.add_rack(2, "B".into(), None).unwrap();

        let saved = fixture.inventory.store().saved().unwrap();
        assert_eq!(saved.racks.len(), 2);
        assert_eq!(saved.items.len(), 2);
    }

    #[test]
    fn rehydrates_from_seeded_store() {
        let fixture = Warehouse::new();
        let saved = fixture.inventory.store().saved().unwrap().clone();

        let reloaded = Inventory::load(InMemoryStore::seeded(saved)).unwrap();
        assert_eq!(reloaded.items().len(), 2);
        assert_eq!(reloaded.racks().len(), 1);
        assert_eq!(reloaded.shelf_location(fixture.shelf), "A 1 - Shelf 1");
    }

    #[test]
    fn subscribers_see_post_mutation_state_until_unsubscribed() {
        let mut inventory = Inventory::load(InMemoryStore::new()).unwrap();
        let counts: Rc<RefCell<Vec<usize>>> = Rc::new(RefCell::new(Vec::new()));

        let sink = Rc::clone(&counts);
        let subscription = inventory.subscribe(move |snapshot| {
            sink.borrow_mut().push(snapshot.racks.len());
        });

        inventory.add_rack(1, "A".into(), None).unwrap();
        inventory.add_rack(2, "B".into(), None).unwrap();
        inventory.unsubscribe(subscription);
        inventory.add_rack(3, "C".into(), None).unwrap();

        assert_eq!(*counts.borrow(), vec![1, 2]);
    }

    #[test]
    fn full_shelf_to_search_scenario() {
        // Rack "A" #1 → shelf #1 → carton "X" #1 → item "Widget".
        let mut inventory = Inventory::load(InMemoryStore::new()).unwrap();
        let rack = inventory.add_rack(1, "A".into(), None).unwrap();
        let shelf = inventory.add_shelf(rack, 1, None).unwrap();
        let carton = inventory
            .add_carton(shelf, 1, "X".into(), None, None)
            .unwrap();
        let widget = inventory
            .add_item(
                "Widget".into(),
                String::new(),
                vec![],
                vec![],
                Location::in_carton(shelf, carton),
            )
            .unwrap();

        let by_name: Vec<_> = inventory.search_items("Widget").map(|i| i.id).collect();
        assert_eq!(by_name, vec![widget]);

        // Location-string fragment: "a 1 1 x" contains "a 1".
        let by_location: Vec<_> = inventory.search_items("A 1").map(|i| i.id).collect();
        assert_eq!(by_location, vec![widget]);

        inventory.delete_rack(rack).unwrap();
        let item = inventory.item(widget).unwrap();
        assert_eq!(item.location.shelf_id, shelf);
        assert!(inventory.shelves().is_empty());
    }
}
