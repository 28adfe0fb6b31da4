// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Building elements: walls, doors, windows, slabs, staircases.
//!
//! Openings reference their host wall by id. Walls carry a [`WallRole`] and
//! doors a [`DoorClass`], both derived exactly once during
//! [`crate::Building::finalize`] so that analysis code never re-parses
//! element names.

use serde::{Deserialize, Serialize};

use crate::geometry::{Point2D, Polygon2D};
use crate::{ModelError, Result};

/// Functional role of a wall, derived from structured naming at ingest.
///
/// Replaces repeated keyword scanning over wall names: the classification
/// happens once per story and every consumer reads the enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WallRole {
    /// Wall bounding the building-level corridor.
    Corridor,
    /// Ground-floor entrance lobby wall.
    Lobby,
    /// Core vestibule wall.
    Vestibule,
    /// Elevator shaft wall.
    Elevator,
    /// Interior divider within the vertical core.
    CoreDivider,
    /// Staircase enclosure wall.
    Staircase,
    /// Ordinary partition (apartment or room wall).
    Partition,
}

impl WallRole {
    /// Derives the role from a wall name. Prefix rules take priority over
    /// substring rules, matching how the groups are synthesized into zones.
    pub fn from_name(name: &str) -> Self {
        let lower = name.to_lowercase();
        if lower.starts_with("corridor") {
            WallRole::Corridor
        } else if lower.starts_with("lobby") {
            WallRole::Lobby
        } else if lower.contains("vestibule") {
            WallRole::Vestibule
        } else if lower.starts_with("elevator") {
            WallRole::Elevator
        } else if lower.starts_with("core divider") {
            WallRole::CoreDivider
        } else if lower.contains("staircase") {
            WallRole::Staircase
        } else if lower.contains("elevator") {
            WallRole::Elevator
        } else if lower.contains("core") || lower.contains("divider") {
            WallRole::CoreDivider
        } else {
            WallRole::Partition
        }
    }

    /// Part of the vertical core (fire-rated enclosure).
    pub fn is_core(&self) -> bool {
        matches!(
            self,
            WallRole::Elevator | WallRole::CoreDivider | WallRole::Staircase | WallRole::Vestibule
        )
    }

    /// Any common-area wall (core, corridor, or lobby).
    pub fn is_common(&self) -> bool {
        self.is_core() || matches!(self, WallRole::Corridor | WallRole::Lobby)
    }
}

/// A wall defined by start/end centerline points, height, and thickness.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wall {
    pub id: String,
    pub name: String,
    /// Short drawing label ("W1"), assigned by the tagging pass.
    pub tag: String,
    pub start: Point2D,
    pub end: Point2D,
    pub height: f64,
    pub thickness: f64,
    pub load_bearing: bool,
    pub is_external: bool,
    pub role: WallRole,
}

impl Wall {
    /// Creates a wall, rejecting coincident endpoints and non-finite
    /// coordinates. The role is derived from the name.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        start: Point2D,
        end: Point2D,
        height: f64,
        thickness: f64,
    ) -> Result<Self> {
        let id = id.into();
        let name = name.into();
        if !start.is_finite() || !end.is_finite() {
            return Err(ModelError::NonFiniteCoordinate(id));
        }
        if start == end {
            return Err(ModelError::DegenerateWall(id));
        }
        let role = WallRole::from_name(&name);
        Ok(Self {
            id,
            name,
            tag: String::new(),
            start,
            end,
            height,
            thickness,
            load_bearing: false,
            is_external: false,
            role,
        })
    }

    /// Centerline length.
    pub fn length(&self) -> f64 {
        self.start.distance_to(&self.end)
    }

    /// Unit direction vector from start to end.
    pub fn direction(&self) -> (f64, f64) {
        let dx = self.end.x - self.start.x;
        let dy = self.end.y - self.start.y;
        let len = (dx * dx + dy * dy).sqrt();
        if len < 1e-9 {
            return (0.0, 0.0);
        }
        (dx / len, dy / len)
    }

    /// Unit left-hand perpendicular of the direction vector.
    pub fn normal(&self) -> (f64, f64) {
        let (dx, dy) = self.direction();
        if dx == 0.0 && dy == 0.0 {
            return (0.0, 1.0);
        }
        (-dy, dx)
    }

    /// World-space point at a given centerline offset from the start.
    pub fn point_at_offset(&self, offset: f64) -> Point2D {
        let len = self.length();
        if len < 1e-9 {
            return self.start;
        }
        let t = offset / len;
        Point2D::new(
            self.start.x + (self.end.x - self.start.x) * t,
            self.start.y + (self.end.y - self.start.y) * t,
        )
    }

    pub fn midpoint(&self) -> Point2D {
        Point2D::new(
            (self.start.x + self.end.x) / 2.0,
            (self.start.y + self.end.y) / 2.0,
        )
    }
}

/// Door class for width minimums, derived from the name at ingest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DoorClass {
    /// Main building entrance ("Building Entry", "Main Entry").
    BuildingEntry,
    /// Apartment entry door from the corridor.
    ApartmentEntry,
    /// Ordinary room door.
    Room,
}

impl DoorClass {
    pub fn from_name(name: &str) -> Self {
        let lower = name.to_lowercase();
        if lower.contains("building") || lower.contains("main entry") {
            DoorClass::BuildingEntry
        } else if lower.contains("entry") {
            DoorClass::ApartmentEntry
        } else {
            DoorClass::Room
        }
    }
}

/// A door hosted in a wall. Position is the offset along the wall
/// centerline from its start point to the door's near edge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Door {
    pub id: String,
    pub name: String,
    pub tag: String,
    pub wall_id: String,
    pub position: f64,
    pub width: f64,
    pub height: f64,
    pub class: DoorClass,
}

impl Door {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        wall_id: impl Into<String>,
        position: f64,
        width: f64,
        height: f64,
    ) -> Self {
        let name = name.into();
        let class = DoorClass::from_name(&name);
        Self {
            id: id.into(),
            name,
            tag: String::new(),
            wall_id: wall_id.into(),
            position,
            width,
            height,
            class,
        }
    }
}

/// A window hosted in a wall. Sill height is measured from the story floor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Window {
    pub id: String,
    pub name: String,
    pub tag: String,
    pub wall_id: String,
    pub position: f64,
    pub width: f64,
    pub height: f64,
    pub sill_height: f64,
}

impl Window {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        wall_id: impl Into<String>,
        position: f64,
        width: f64,
        height: f64,
        sill_height: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            tag: String::new(),
            wall_id: wall_id.into(),
            position,
            width,
            height,
            sill_height,
        }
    }
}

/// A horizontal slab defined by its outline polygon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slab {
    pub id: String,
    pub name: String,
    pub outline: Polygon2D,
    pub thickness: f64,
    pub is_floor: bool,
}

impl Slab {
    pub fn area(&self) -> f64 {
        self.outline.area()
    }
}

/// A staircase, represented by its footprint outline plus flight
/// parameters used by the code-compliance validators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Staircase {
    pub id: String,
    pub name: String,
    pub tag: String,
    pub outline: Polygon2D,
    /// Clear flight width in meters.
    pub width: f64,
    pub riser_height: f64,
    pub tread_length: f64,
}

impl Staircase {
    pub fn area(&self) -> f64 {
        self.outline.area()
    }

    pub fn centroid(&self) -> Point2D {
        self.outline.centroid()
    }
}
