//! Passive objects: vegetables and the closed [`Object`] sum type.
//!
//! An object never runs a task. Its only mutation is being eaten, and the
//! alive flag is an atomic so that concurrent gatherers race on it without
//! a lock: whichever [`Vegetable::consume`] lands first wins.

use std::sync::atomic::{AtomicBool, Ordering};

use habitat_types::{BoundingBox, EntityId, ObjectView, Position, VegetableKind};
use habitat_world::Occupant;

/// Side length of a vegetable footprint.
pub const PLANT_SIZE: f64 = 16.0;

/// Name given to every spawned vegetable.
pub const PLANT_NAME: &str = "Plant";

/// An edible plant.
#[derive(Debug)]
pub struct Vegetable {
    id: EntityId,
    name: String,
    kind: VegetableKind,
    footprint: BoundingBox,
    alive: AtomicBool,
}

impl Vegetable {
    /// A fresh, uneaten vegetable with its top-left corner at `(x, y)`.
    pub fn new(kind: VegetableKind, x: f64, y: f64) -> Self {
        Self {
            id: EntityId::UNASSIGNED,
            name: String::from(PLANT_NAME),
            kind,
            footprint: BoundingBox::new(x, y, PLANT_SIZE, PLANT_SIZE),
            alive: AtomicBool::new(true),
        }
    }

    /// Species.
    pub const fn kind(&self) -> VegetableKind {
        self.kind
    }

    /// Hunger removed by eating it.
    pub const fn nutrition(&self) -> u32 {
        self.kind.nutrition()
    }

    /// Eat the vegetable. Returns `true` only for the call that actually
    /// flipped it from alive to eaten.
    pub fn consume(&self) -> bool {
        self.alive.swap(false, Ordering::AcqRel)
    }
}

/// Anything passive standing in the world.
#[derive(Debug)]
pub enum Object {
    /// An edible plant.
    Vegetable(Vegetable),
}

impl Object {
    /// Identifier issued on admission.
    pub const fn id(&self) -> EntityId {
        match self {
            Self::Vegetable(v) => v.id,
        }
    }

    /// Display name.
    pub fn name(&self) -> &str {
        match self {
            Self::Vegetable(v) => &v.name,
        }
    }

    /// Footprint.
    pub const fn footprint(&self) -> BoundingBox {
        match self {
            Self::Vegetable(v) => v.footprint,
        }
    }

    /// Whether the object is still present.
    pub fn is_alive(&self) -> bool {
        match self {
            Self::Vegetable(v) => v.alive.load(Ordering::Acquire),
        }
    }

    /// Assign the identifier. Called once, on admission.
    pub const fn set_id(&mut self, id: EntityId) {
        match self {
            Self::Vegetable(v) => v.id = id,
        }
    }

    /// The vegetable inside, if this object is one.
    pub const fn as_vegetable(&self) -> Option<&Vegetable> {
        match self {
            Self::Vegetable(v) => Some(v),
        }
    }

    /// Read-only telemetry copy.
    pub fn view(&self) -> ObjectView {
        match self {
            Self::Vegetable(v) => ObjectView {
                id: v.id,
                name: v.name.clone(),
                kind: v.kind,
                alive: self.is_alive(),
                footprint: v.footprint,
            },
        }
    }
}

impl From<Vegetable> for Object {
    fn from(vegetable: Vegetable) -> Self {
        Self::Vegetable(vegetable)
    }
}

impl Occupant for Object {
    fn occupant_id(&self) -> EntityId {
        self.id()
    }

    fn is_alive(&self) -> bool {
        Self::is_alive(self)
    }

    fn center(&self) -> Position {
        self.footprint().center()
    }
}
