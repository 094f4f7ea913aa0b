use super::DataStore;
use crate::error::Result;
use crate::model::Snapshot;

/// In-memory storage for testing and development.
/// Does NOT persist data.
#[derive(Default)]
pub struct InMemoryStore {
    saved: Option<Snapshot>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start pre-populated, as if a previous session had saved `snapshot`.
    pub fn seeded(snapshot: Snapshot) -> Self {
        Self {
            saved: Some(snapshot),
        }
    }

    /// The last snapshot written through [`DataStore::save`], if any.
    pub fn saved(&self) -> Option<&Snapshot> {
        self.saved.as_ref()
    }
}

impl DataStore for InMemoryStore {
    fn load(&self) -> Result<Snapshot> {
        Ok(self.saved.clone().unwrap_or_default())
    }

    fn save(&mut self, snapshot: &Snapshot) -> Result<()> {
        self.saved = Some(snapshot.clone());
        Ok(())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::inventory::Inventory;
    use crate::model::Location;
    use uuid::Uuid;

    /// A small populated warehouse: one rack ("A" #1) with one shelf (#1)
    /// holding a carton ("X" #1), a binder ("Manuals" #1), and a container
    /// ("Bag" #1, kind "bag"); a "Widget" item in the carton and a "Lamp"
    /// item directly on the shelf.
    pub struct Warehouse {
        pub inventory: Inventory<InMemoryStore>,
        pub rack: Uuid,
        pub shelf: Uuid,
        pub carton: Uuid,
        pub binder: Uuid,
        pub container: Uuid,
        pub widget: Uuid,
        pub lamp: Uuid,
    }

    impl Warehouse {
        pub fn new() -> Self {
            let mut inventory = Inventory::load(InMemoryStore::new()).unwrap();
            let rack = inventory.add_rack(1, "A".into(), None).unwrap();
            let shelf = inventory.add_shelf(rack, 1, None).unwrap();
            let carton = inventory
                .add_carton(shelf, 1, "X".into(), None, None)
                .unwrap();
            let binder = inventory
                .add_binder(shelf, 1, "Manuals".into(), None, None)
                .unwrap();
            let container = inventory
                .add_container(shelf, 1, "Bag".into(), "bag".into(), None, None)
                .unwrap();
            let widget = inventory
                .add_item(
                    "Widget".into(),
                    "A small widget".into(),
                    vec!["hardware".into()],
                    vec![],
                    Location::in_carton(shelf, carton),
                )
                .unwrap();
            let lamp = inventory
                .add_item(
                    "Lamp".into(),
                    "Desk lamp".into(),
                    vec!["light".into()],
                    vec![],
                    Location::shelf(shelf),
                )
                .unwrap();

            Self {
                inventory,
                rack,
                shelf,
                carton,
                binder,
                container,
                widget,
                lamp,
            }
        }
    }

    impl Default for Warehouse {
        fn default() -> Self {
            Self::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Rack;

    #[test]
    fn load_before_any_save_is_empty() {
        let store = InMemoryStore::new();
        assert!(store.load().unwrap().racks.is_empty());
    }

    #[test]
    fn save_is_observable() {
        let mut store = InMemoryStore::new();
        let mut snapshot = Snapshot::default();
        snapshot.racks.push(Rack::new(1, "A".into(), None));

        store.save(&snapshot).unwrap();
        assert_eq!(store.saved().unwrap().racks.len(), 1);
        assert_eq!(store.load().unwrap().racks.len(), 1);
    }
}
