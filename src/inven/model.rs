use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Top-level storage furniture unit, numbered and named.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rack {
    pub id: Uuid,
    pub number: u32,
    pub name: String,
    pub description: Option<String>,
    // Always empty in practice; ownership flows through Shelf.rack_id.
    // Kept to match the persisted layout.
    #[serde(default)]
    pub shelves: Vec<Shelf>,
}

impl Rack {
    pub fn new(number: u32, name: String, description: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            number,
            name,
            description,
            shelves: Vec::new(),
        }
    }
}

/// A tier within a rack, identified by number.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shelf {
    pub id: Uuid,
    pub rack_id: Uuid,
    pub number: u32,
    pub description: Option<String>,
}

impl Shelf {
    pub fn new(rack_id: Uuid, number: u32, description: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            rack_id,
            number,
            description,
        }
    }
}

/// A cardboard box placed on a shelf.
///
/// Named `Carton` rather than `Box` so the type doesn't shadow
/// `std::boxed::Box`; the CLI still accepts `box`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Carton {
    pub id: Uuid,
    pub shelf_id: Uuid,
    pub number: u32,
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
}

impl Carton {
    pub fn new(
        shelf_id: Uuid,
        number: u32,
        name: String,
        description: Option<String>,
        color: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            shelf_id,
            number,
            name,
            description,
            color,
        }
    }
}

/// A ring binder placed on a shelf.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Binder {
    pub id: Uuid,
    pub shelf_id: Uuid,
    pub number: u32,
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
}

impl Binder {
    pub fn new(
        shelf_id: Uuid,
        number: u32,
        name: String,
        description: Option<String>,
        color: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            shelf_id,
            number,
            name,
            description,
            color,
        }
    }
}

/// Any other kind of sub-container on a shelf, with a free-text category
/// label ("bag", "folder", ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Container {
    pub id: Uuid,
    pub shelf_id: Uuid,
    pub number: u32,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: Option<String>,
    pub color: Option<String>,
}

impl Container {
    pub fn new(
        shelf_id: Uuid,
        number: u32,
        name: String,
        kind: String,
        description: Option<String>,
        color: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            shelf_id,
            number,
            name,
            kind,
            description,
            color,
        }
    }
}

/// Where an item physically sits: a shelf, plus at most one of the three
/// sub-container kinds. The store trusts its caller on that "at most one";
/// the form layer picks from current valid options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub shelf_id: Uuid,
    pub carton_id: Option<Uuid>,
    pub binder_id: Option<Uuid>,
    pub container_id: Option<Uuid>,
}

impl Location {
    /// Directly on a shelf, no sub-container.
    pub fn shelf(shelf_id: Uuid) -> Self {
        Self {
            shelf_id,
            carton_id: None,
            binder_id: None,
            container_id: None,
        }
    }

    pub fn in_carton(shelf_id: Uuid, carton_id: Uuid) -> Self {
        Self {
            carton_id: Some(carton_id),
            ..Self::shelf(shelf_id)
        }
    }

    pub fn in_binder(shelf_id: Uuid, binder_id: Uuid) -> Self {
        Self {
            binder_id: Some(binder_id),
            ..Self::shelf(shelf_id)
        }
    }

    pub fn in_container(shelf_id: Uuid, container_id: Uuid) -> Self {
        Self {
            container_id: Some(container_id),
            ..Self::shelf(shelf_id)
        }
    }
}

/// The inventoried object itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    /// Order-preserving, duplicates weeded out on insert by the form layer.
    pub tags: Vec<String>,
    /// Opaque image references: external URLs or embedded data URLs.
    pub images: Vec<String>,
    pub location: Location,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Item {
    pub fn new(
        name: String,
        description: String,
        tags: Vec<String>,
        images: Vec<String>,
        location: Location,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            description,
            tags,
            images,
            location,
            created_at: now,
            updated_at: now,
        }
    }
}

/// The whole persisted state, serialized wholesale on every mutation and
/// rehydrated wholesale at startup. No schema version field; schema
/// evolution is out of scope.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub racks: Vec<Rack>,
    #[serde(default)]
    pub shelves: Vec<Shelf>,
    #[serde(default)]
    pub cartons: Vec<Carton>,
    #[serde(default)]
    pub binders: Vec<Binder>,
    #[serde(default)]
    pub containers: Vec<Container>,
}

// --- Partial updates ---
//
// One patch type per entity. `Some` sets the field, `None` leaves it
// untouched. Foreign keys are not re-validated on update.

#[derive(Debug, Clone, Default)]
pub struct RackPatch {
    pub number: Option<u32>,
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ShelfPatch {
    pub rack_id: Option<Uuid>,
    pub number: Option<u32>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CartonPatch {
    pub shelf_id: Option<Uuid>,
    pub number: Option<u32>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
}

pub type BinderPatch = CartonPatch;

#[derive(Debug, Clone, Default)]
pub struct ContainerPatch {
    pub shelf_id: Option<Uuid>,
    pub number: Option<u32>,
    pub name: Option<String>,
    pub kind: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
    pub location: Option<Location>,
}
