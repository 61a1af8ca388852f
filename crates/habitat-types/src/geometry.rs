//! Planar geometry: positions, displacement vectors, and axis-aligned boxes.
//!
//! All types are small `Copy` values. Operations return new values rather
//! than mutating in place, so a [`BoundingBox`] held by an agent only
//! changes when the agent's movement is accepted.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A point in world coordinates. The origin is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Position {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Position {
    /// Create a position from its coordinates.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance_to(self, other: Self) -> f64 {
        self.vector_to(other).length()
    }

    /// Displacement leading from `self` to `other`.
    pub const fn vector_to(self, other: Self) -> Vector {
        Vector::new(other.x - self.x, other.y - self.y)
    }

    /// This position moved by `v`.
    #[must_use]
    pub const fn translated(self, v: Vector) -> Self {
        Self::new(self.x + v.dx, self.y + v.dy)
    }
}

/// A displacement in world units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector {
    /// Horizontal component.
    pub dx: f64,
    /// Vertical component.
    pub dy: f64,
}

impl Vector {
    /// The null displacement.
    pub const ZERO: Self = Self { dx: 0.0, dy: 0.0 };

    /// Create a vector from its components.
    pub const fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    /// Euclidean length.
    pub fn length(self) -> f64 {
        self.dx.hypot(self.dy)
    }

    /// Same direction, rescaled to `length`. A zero vector has no
    /// direction and yields `None`.
    pub fn with_length(self, length: f64) -> Option<Self> {
        let current = self.length();
        if current > 0.0 {
            Some(Self::new(
                self.dx / current * length,
                self.dy / current * length,
            ))
        } else {
            None
        }
    }

    /// Component-wise sum.
    #[must_use]
    pub const fn plus(self, other: Self) -> Self {
        Self::new(self.dx + other.dx, self.dy + other.dy)
    }
}

/// Axis-aligned footprint of an entity: top-left corner plus extent.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct BoundingBox {
    /// Top-left corner.
    pub origin: Position,
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl BoundingBox {
    /// Create a box from its top-left corner and extent.
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            origin: Position::new(x, y),
            width,
            height,
        }
    }

    /// Geometric center of the box.
    pub const fn center(&self) -> Position {
        Position::new(
            self.origin.x + self.width / 2.0,
            self.origin.y + self.height / 2.0,
        )
    }

    /// This box moved by `v`.
    #[must_use]
    pub const fn translated(&self, v: Vector) -> Self {
        Self {
            origin: self.origin.translated(v),
            ..*self
        }
    }

    /// Whether the box lies entirely inside `[0, width] x [0, height]`.
    pub const fn fits_within(&self, width: f64, height: f64) -> bool {
        self.origin.x >= 0.0
            && self.origin.y >= 0.0
            && self.origin.x + self.width <= width
            && self.origin.y + self.height <= height
    }

    /// Whether two boxes touch or overlap. Edges in contact count as
    /// overlapping.
    pub const fn overlaps(&self, other: &Self) -> bool {
        !(self.origin.x + self.width < other.origin.x
            || self.origin.x > other.origin.x + other.width
            || self.origin.y + self.height < other.origin.y
            || self.origin.y > other.origin.y + other.height)
    }
}
