//! # API Facade
//!
//! The API layer is a **thin facade** over the inventory core. It serves as
//! the single entry point for all inven operations, regardless of the UI
//! being used.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Normalizes inputs** (full UUIDs or unique hex prefixes → UUIDs)
//! - **Dispatches** to the inventory container and command modules
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! Unknown or ambiguous identifiers produce a warning message and a no-op,
//! never an error: a stale reference typed at the prompt must not crash
//! anything, matching the core's own silent-no-op contract.
//!
//! ## Generic Over DataStore
//!
//! `InvenApi<S: DataStore>` is generic over the storage backend:
//! - Production: `InvenApi<FileStore>`
//! - Testing: `InvenApi<InMemoryStore>`

use crate::commands;
use crate::config::InvenConfig;
use crate::error::Result;
use crate::inventory::{Inventory, SubscriptionId};
use crate::model::{
    CartonPatch, ContainerPatch, Item, ItemPatch, Location, RackPatch, ShelfPatch, Snapshot,
};
use crate::search;
use crate::store::DataStore;
use std::path::PathBuf;
use uuid::Uuid;

/// First eight hex digits, the way ids are shown in listings.
pub fn short_id(id: Uuid) -> String {
    id.simple().to_string()[..8].to_string()
}

/// A sub-container reference as typed by the user.
#[derive(Debug, Clone)]
pub enum HolderRef {
    Carton(String),
    Binder(String),
    Container(String),
}

/// Hierarchically composed location filters for item listings: rack is
/// resolved through shelf back-references, the rest match the location
/// tuple directly. All present filters must hold.
#[derive(Debug, Clone, Default)]
pub struct ItemFilter {
    pub rack_id: Option<Uuid>,
    pub shelf_id: Option<Uuid>,
    pub carton_id: Option<Uuid>,
    pub binder_id: Option<Uuid>,
    pub container_id: Option<Uuid>,
}

/// The main API facade for inven operations.
///
/// All UI clients (CLI, web, etc.) should interact through this API.
pub struct InvenApi<S: DataStore> {
    inventory: Inventory<S>,
    config: InvenConfig,
    config_dir: PathBuf,
}

type Resolved = std::result::Result<Uuid, CmdMessage>;

impl<S: DataStore> InvenApi<S> {
    pub fn new(inventory: Inventory<S>, config: InvenConfig, config_dir: PathBuf) -> Self {
        Self {
            inventory,
            config,
            config_dir,
        }
    }

    pub fn inventory(&self) -> &Inventory<S> {
        &self.inventory
    }

    pub fn subscribe(&mut self, subscriber: impl Fn(&Snapshot) + 'static) -> SubscriptionId {
        self.inventory.subscribe(subscriber)
    }

    // --- Identifier resolution ---

    pub fn resolve_rack(&self, ident: &str) -> Resolved {
        resolve_in(
            self.inventory.racks().iter().map(|r| r.id),
            ident,
            "rack",
        )
    }

    pub fn resolve_shelf(&self, ident: &str) -> Resolved {
        resolve_in(
            self.inventory.shelves().iter().map(|s| s.id),
            ident,
            "shelf",
        )
    }

    pub fn resolve_carton(&self, ident: &str) -> Resolved {
        resolve_in(
            self.inventory.cartons().iter().map(|c| c.id),
            ident,
            "carton",
        )
    }

    pub fn resolve_binder(&self, ident: &str) -> Resolved {
        resolve_in(
            self.inventory.binders().iter().map(|b| b.id),
            ident,
            "binder",
        )
    }

    pub fn resolve_container(&self, ident: &str) -> Resolved {
        resolve_in(
            self.inventory.containers().iter().map(|c| c.id),
            ident,
            "container",
        )
    }

    pub fn resolve_item(&self, ident: &str) -> Resolved {
        resolve_in(self.inventory.items().iter().map(|i| i.id), ident, "item")
    }

    // --- Racks ---

    pub fn add_rack(
        &mut self,
        number: u32,
        name: String,
        description: Option<String>,
    ) -> Result<CmdResult> {
        let id = self.inventory.add_rack(number, name.clone(), description)?;
        Ok(success(format!("Rack added ({}): {}", short_id(id), name)))
    }

    pub fn update_rack(&mut self, ident: &str, patch: RackPatch) -> Result<CmdResult> {
        let id = match self.resolve_rack(ident) {
            Ok(id) => id,
            Err(message) => return Ok(warned(message)),
        };
        self.inventory.update_rack(id, patch)?;
        Ok(success(format!("Rack updated ({})", short_id(id))))
    }

    pub fn delete_rack(&mut self, ident: &str) -> Result<CmdResult> {
        let id = match self.resolve_rack(ident) {
            Ok(id) => id,
            Err(message) => return Ok(warned(message)),
        };
        let shelf_count = self
            .inventory
            .shelves()
            .iter()
            .filter(|s| s.rack_id == id)
            .count();
        self.inventory.delete_rack(id)?;
        Ok(success(format!(
            "Rack deleted ({}) along with {} shelf/shelves",
            short_id(id),
            shelf_count
        )))
    }

    // --- Shelves ---

    pub fn add_shelf(
        &mut self,
        rack_ident: &str,
        number: u32,
        description: Option<String>,
    ) -> Result<CmdResult> {
        let rack_id = match self.resolve_rack(rack_ident) {
            Ok(id) => id,
            Err(message) => return Ok(warned(message)),
        };
        let id = self.inventory.add_shelf(rack_id, number, description)?;
        Ok(success(format!("Shelf added ({})", short_id(id))))
    }

    pub fn update_shelf(&mut self, ident: &str, patch: ShelfPatch) -> Result<CmdResult> {
        let id = match self.resolve_shelf(ident) {
            Ok(id) => id,
            Err(message) => return Ok(warned(message)),
        };
        self.inventory.update_shelf(id, patch)?;
        Ok(success(format!("Shelf updated ({})", short_id(id))))
    }

    pub fn delete_shelf(&mut self, ident: &str) -> Result<CmdResult> {
        let id = match self.resolve_shelf(ident) {
            Ok(id) => id,
            Err(message) => return Ok(warned(message)),
        };
        self.inventory.delete_shelf(id)?;
        Ok(success(format!("Shelf deleted ({})", short_id(id))))
    }

    // --- Cartons ---

    pub fn add_carton(
        &mut self,
        shelf_ident: &str,
        number: u32,
        name: String,
        description: Option<String>,
        color: Option<String>,
    ) -> Result<CmdResult> {
        let shelf_id = match self.resolve_shelf(shelf_ident) {
            Ok(id) => id,
            Err(message) => return Ok(warned(message)),
        };
        let id = self
            .inventory
            .add_carton(shelf_id, number, name.clone(), description, color)?;
        Ok(success(format!("Carton added ({}): {}", short_id(id), name)))
    }

    pub fn update_carton(&mut self, ident: &str, patch: CartonPatch) -> Result<CmdResult> {
        let id = match self.resolve_carton(ident) {
            Ok(id) => id,
            Err(message) => return Ok(warned(message)),
        };
        self.inventory.update_carton(id, patch)?;
        Ok(success(format!("Carton updated ({})", short_id(id))))
    }

    pub fn delete_carton(&mut self, ident: &str) -> Result<CmdResult> {
        let id = match self.resolve_carton(ident) {
            Ok(id) => id,
            Err(message) => return Ok(warned(message)),
        };
        self.inventory.delete_carton(id)?;
        Ok(success(format!("Carton deleted ({})", short_id(id))))
    }

    // --- Binders ---

    pub fn add_binder(
        &mut self,
        shelf_ident: &str,
        number: u32,
        name: String,
        description: Option<String>,
        color: Option<String>,
    ) -> Result<CmdResult> {
        let shelf_id = match self.resolve_shelf(shelf_ident) {
            Ok(id) => id,
            Err(message) => return Ok(warned(message)),
        };
        let id = self
            .inventory
            .add_binder(shelf_id, number, name.clone(), description, color)?;
        Ok(success(format!("Binder added ({}): {}", short_id(id), name)))
    }

    pub fn update_binder(&mut self, ident: &str, patch: CartonPatch) -> Result<CmdResult> {
        let id = match self.resolve_binder(ident) {
            Ok(id) => id,
            Err(message) => return Ok(warned(message)),
        };
        self.inventory.update_binder(id, patch)?;
        Ok(success(format!("Binder updated ({})", short_id(id))))
    }

    pub fn delete_binder(&mut self, ident: &str) -> Result<CmdResult> {
        let id = match self.resolve_binder(ident) {
            Ok(id) => id,
            Err(message) => return Ok(warned(message)),
        };
        self.inventory.delete_binder(id)?;
        Ok(success(format!("Binder deleted ({})", short_id(id))))
    }

    // --- Containers ---

    pub fn add_container(
        &mut self,
        shelf_ident: &str,
        number: u32,
        name: String,
        kind: String,
        description: Option<String>,
        color: Option<String>,
    ) -> Result<CmdResult> {
        let shelf_id = match self.resolve_shelf(shelf_ident) {
            Ok(id) => id,
            Err(message) => return Ok(warned(message)),
        };
        let id = self
            .inventory
            .add_container(shelf_id, number, name.clone(), kind, description, color)?;
        Ok(success(format!(
            "Container added ({}): {}",
            short_id(id),
            name
        )))
    }

    pub fn update_container(&mut self, ident: &str, patch: ContainerPatch) -> Result<CmdResult> {
        let id = match self.resolve_container(ident) {
            Ok(id) => id,
            Err(message) => return Ok(warned(message)),
        };
        self.inventory.update_container(id, patch)?;
        Ok(success(format!("Container updated ({})", short_id(id))))
    }

    pub fn delete_container(&mut self, ident: &str) -> Result<CmdResult> {
        let id = match self.resolve_container(ident) {
            Ok(id) => id,
            Err(message) => return Ok(warned(message)),
        };
        self.inventory.delete_container(id)?;
        Ok(success(format!("Container deleted ({})", short_id(id))))
    }

    // --- Items ---

    pub fn add_item(
        &mut self,
        name: String,
        description: String,
        tags: Vec<String>,
        images: Vec<String>,
        shelf_ident: &str,
        holder: Option<HolderRef>,
    ) -> Result<CmdResult> {
        let location = match self.resolve_location(shelf_ident, holder) {
            Ok(location) => location,
            Err(message) => return Ok(warned(message)),
        };
        let id = self
            .inventory
            .add_item(name.clone(), description, tags, images, location)?;
        Ok(success(format!("Item added ({}): {}", short_id(id), name)))
    }

    pub fn update_item(
        &mut self,
        ident: &str,
        mut patch: ItemPatch,
        move_to: Option<(String, Option<HolderRef>)>,
    ) -> Result<CmdResult> {
        let id = match self.resolve_item(ident) {
            Ok(id) => id,
            Err(message) => return Ok(warned(message)),
        };
        if let Some((shelf_ident, holder)) = move_to {
            match self.resolve_location(&shelf_ident, holder) {
                Ok(location) => patch.location = Some(location),
                Err(message) => return Ok(warned(message)),
            }
        }
        self.inventory.update_item(id, patch)?;
        Ok(success(format!("Item updated ({})", short_id(id))))
    }

    pub fn delete_item(&mut self, ident: &str) -> Result<CmdResult> {
        let id = match self.resolve_item(ident) {
            Ok(id) => id,
            Err(message) => return Ok(warned(message)),
        };
        self.inventory.delete_item(id)?;
        Ok(success(format!("Item deleted ({})", short_id(id))))
    }

    /// Build a full location tuple from user references. The sub-container
    /// must be of the named kind and sit on the named shelf; the core
    /// trusts its caller on that, so it gets enforced here.
    fn resolve_location(
        &self,
        shelf_ident: &str,
        holder: Option<HolderRef>,
    ) -> std::result::Result<Location, CmdMessage> {
        let shelf_id = self.resolve_shelf(shelf_ident)?;

        match holder {
            None => Ok(Location::shelf(shelf_id)),
            Some(HolderRef::Carton(ident)) => {
                let id = self.resolve_carton(&ident)?;
                let on_shelf = self
                    .inventory
                    .cartons()
                    .iter()
                    .any(|c| c.id == id && c.shelf_id == shelf_id);
                if !on_shelf {
                    return Err(CmdMessage::warning(format!(
                        "Carton {} is not on shelf {}",
                        ident, shelf_ident
                    )));
                }
                Ok(Location::in_carton(shelf_id, id))
            }
            Some(HolderRef::Binder(ident)) => {
                let id = self.resolve_binder(&ident)?;
                let on_shelf = self
                    .inventory
                    .binders()
                    .iter()
                    .any(|b| b.id == id && b.shelf_id == shelf_id);
                if !on_shelf {
                    return Err(CmdMessage::warning(format!(
                        "Binder {} is not on shelf {}",
                        ident, shelf_ident
                    )));
                }
                Ok(Location::in_binder(shelf_id, id))
            }
            Some(HolderRef::Container(ident)) => {
                let id = self.resolve_container(&ident)?;
                let on_shelf = self
                    .inventory
                    .containers()
                    .iter()
                    .any(|c| c.id == id && c.shelf_id == shelf_id);
                if !on_shelf {
                    return Err(CmdMessage::warning(format!(
                        "Container {} is not on shelf {}",
                        ident, shelf_ident
                    )));
                }
                Ok(Location::in_container(shelf_id, id))
            }
        }
    }

    // --- Listings ---

    /// The inventory-view listing: optional search term plus the
    /// hierarchical location filters, AND-combined.
    pub fn list_items(&self, term: Option<&str>, filter: &ItemFilter) -> Vec<&Item> {
        let needle = term.map(|t| t.to_lowercase());
        let snapshot = self.inventory.snapshot();

        self.inventory
            .items()
            .iter()
            .filter(|item| match &needle {
                Some(needle) => search::matches(snapshot, item, needle),
                None => true,
            })
            .filter(|item| self.item_passes(item, filter))
            .collect()
    }

    fn item_passes(&self, item: &Item, filter: &ItemFilter) -> bool {
        if let Some(rack_id) = filter.rack_id {
            let shelf = self
                .inventory
                .shelves()
                .iter()
                .find(|s| s.id == item.location.shelf_id);
            if !matches!(shelf, Some(shelf) if shelf.rack_id == rack_id) {
                return false;
            }
        }
        if let Some(shelf_id) = filter.shelf_id {
            if item.location.shelf_id != shelf_id {
                return false;
            }
        }
        if let Some(id) = filter.carton_id {
            if item.location.carton_id != Some(id) {
                return false;
            }
        }
        if let Some(id) = filter.binder_id {
            if item.location.binder_id != Some(id) {
                return false;
            }
        }
        if let Some(id) = filter.container_id {
            if item.location.container_id != Some(id) {
                return false;
            }
        }
        true
    }

    // --- Workflow commands ---

    pub fn export(&self) -> Result<CmdResult> {
        commands::export::run(self.inventory.snapshot(), &self.config.backup_prefix)
    }

    pub fn doctor(&self) -> CmdResult {
        commands::doctor::run(self.inventory.snapshot())
    }

    pub fn config(&self, action: ConfigAction) -> Result<CmdResult> {
        commands::config::run(&self.config_dir, action)
    }
}

fn resolve_in<I: Iterator<Item = Uuid>>(ids: I, ident: &str, what: &str) -> Resolved {
    let needle = ident.to_lowercase();
    let ids: Vec<Uuid> = ids.collect();

    if let Ok(full) = Uuid::parse_str(&needle) {
        if ids.contains(&full) {
            return Ok(full);
        }
        return Err(CmdMessage::warning(format!(
            "No {} matches {}",
            what, ident
        )));
    }

    let matched: Vec<Uuid> = ids
        .into_iter()
        .filter(|id| {
            id.to_string().starts_with(&needle) || id.simple().to_string().starts_with(&needle)
        })
        .collect();

    match matched.as_slice() {
        [id] => Ok(*id),
        [] => Err(CmdMessage::warning(format!(
            "No {} matches {}",
            what, ident
        ))),
        _ => Err(CmdMessage::warning(format!(
            "{} is ambiguous: {} {}s match",
            ident,
            matched.len(),
            what
        ))),
    }
}

fn success(content: String) -> CmdResult {
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(content));
    result
}

fn warned(message: CmdMessage) -> CmdResult {
    let mut result = CmdResult::default();
    result.add_message(message);
    result
}

pub use crate::commands::config::ConfigAction;
pub use crate::commands::{CmdMessage, CmdResult, MessageLevel};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Rack, Snapshot};
    use crate::store::memory::fixtures::Warehouse;
    use crate::store::memory::InMemoryStore;

    fn api_from(fixture: Warehouse) -> InvenApi<InMemoryStore> {
        InvenApi::new(
            fixture.inventory,
            InvenConfig::default(),
            std::env::temp_dir(),
        )
    }

    #[test]
    fn resolves_unique_prefix() {
        let fixture = Warehouse::new();
        let rack = fixture.rack;
        let api = api_from(fixture);

        let prefix = short_id(rack);
        assert_eq!(api.resolve_rack(&prefix).unwrap(), rack);
        assert_eq!(api.resolve_rack(&rack.to_string()).unwrap(), rack);
    }

    #[test]
    fn ambiguous_prefix_warns() {
        let mut snapshot = Snapshot::default();
        let mut a = Rack::new(1, "A".into(), None);
        a.id = Uuid::parse_str("aaaaaaaa-0000-4000-8000-000000000001").unwrap();
        let mut b = Rack::new(2, "B".into(), None);
        b.id = Uuid::parse_str("aaaaaaaa-0000-4000-8000-000000000002").unwrap();
        snapshot.racks.push(a);
        snapshot.racks.push(b);

        let inventory = Inventory::load(InMemoryStore::seeded(snapshot)).unwrap();
        let api = InvenApi::new(inventory, InvenConfig::default(), std::env::temp_dir());

        let err = api.resolve_rack("aaaa").unwrap_err();
        assert!(err.content.contains("ambiguous"));
    }

    #[test]
    fn unknown_ident_is_a_warning_noop() {
        let fixture = Warehouse::new();
        let mut api = api_from(fixture);

        let result = api.delete_rack("ffffffff").unwrap();
        assert!(matches!(result.messages[0].level, MessageLevel::Warning));
        assert_eq!(api.inventory().racks().len(), 1);
    }

    #[test]
    fn add_shelf_to_unknown_rack_is_a_warning_noop() {
        let fixture = Warehouse::new();
        let mut api = api_from(fixture);

        let result = api.add_shelf("deadbeef", 2, None).unwrap();
        assert!(matches!(result.messages[0].level, MessageLevel::Warning));
        assert_eq!(api.inventory().shelves().len(), 1);
    }

    #[test]
    fn item_in_carton_from_another_shelf_is_rejected() {
        let fixture = Warehouse::new();
        let rack = fixture.rack;
        let carton = fixture.carton;
        let mut api = api_from(fixture);

        // A second, empty shelf; the fixture carton is on shelf 1.
        let result = api.add_shelf(&short_id(rack), 2, None).unwrap();
        assert!(matches!(result.messages[0].level, MessageLevel::Success));
        let other_shelf = api.inventory().shelves()[1].id;

        let result = api
            .add_item(
                "Screws".into(),
                String::new(),
                vec![],
                vec![],
                &short_id(other_shelf),
                Some(HolderRef::Carton(short_id(carton))),
            )
            .unwrap();
        assert!(matches!(result.messages[0].level, MessageLevel::Warning));
        assert_eq!(api.inventory().items().len(), 2);
    }

    #[test]
    fn list_items_composes_search_and_filters() {
        let fixture = Warehouse::new();
        let rack = fixture.rack;
        let shelf = fixture.shelf;
        let carton = fixture.carton;
        let api = api_from(fixture);

        let all = api.list_items(None, &ItemFilter::default());
        assert_eq!(all.len(), 2);

        let by_rack = api.list_items(
            None,
            &ItemFilter {
                rack_id: Some(rack),
                ..Default::default()
            },
        );
        assert_eq!(by_rack.len(), 2);

        let in_carton = api.list_items(
            None,
            &ItemFilter {
                carton_id: Some(carton),
                ..Default::default()
            },
        );
        assert_eq!(in_carton.len(), 1);
        assert_eq!(in_carton[0].name, "Widget");

        let searched = api.list_items(
            Some("lamp"),
            &ItemFilter {
                shelf_id: Some(shelf),
                ..Default::default()
            },
        );
        assert_eq!(searched.len(), 1);
        assert_eq!(searched[0].name, "Lamp");

        let none = api.list_items(
            Some("widget"),
            &ItemFilter {
                binder_id: Some(carton),
                ..Default::default()
            },
        );
        assert!(none.is_empty());
    }

    #[test]
    fn update_item_can_relocate() {
        let fixture = Warehouse::new();
        let widget = fixture.widget;
        let shelf = fixture.shelf;
        let binder = fixture.binder;
        let mut api = api_from(fixture);

        let result = api
            .update_item(
                &short_id(widget),
                ItemPatch::default(),
                Some((
                    short_id(shelf),
                    Some(HolderRef::Binder(short_id(binder))),
                )),
            )
            .unwrap();
        assert!(matches!(result.messages[0].level, MessageLevel::Success));

        let item = api.inventory().item(widget).unwrap();
        assert_eq!(item.location, Location::in_binder(shelf, binder));
    }
}
