// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Spaces and apartments: the logical/spatial overlay on top of walls.
//!
//! A [`Space`] is a bounded room area; an [`Apartment`] groups spaces into a
//! dwelling unit. Space boundaries align with wall centerlines — they do not
//! replace walls.

use serde::{Deserialize, Serialize};

use crate::geometry::Polygon2D;

/// Room type classification for residential buildings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomType {
    Living,
    Bedroom,
    Kitchen,
    Bathroom,
    /// Separate WC.
    Toilet,
    /// Apartment entry hall (Vorraum).
    Hallway,
    Storage,
    Balcony,
    /// Building-level corridor.
    Corridor,
    Staircase,
    Elevator,
    Utility,
    Office,
    NotDefined,
}

impl RoomType {
    /// Habitable main rooms — these cannot serve as thoroughfares and are
    /// subject to daylight/dimension rules.
    pub fn is_habitable(&self) -> bool {
        matches!(
            self,
            RoomType::Living | RoomType::Bedroom | RoomType::Kitchen | RoomType::Office
        )
    }

    /// Wet rooms sharing installation shafts.
    pub fn is_wet(&self) -> bool {
        matches!(self, RoomType::Bathroom | RoomType::Toilet | RoomType::Kitchen)
    }

    /// Minimum room area in m² (Austrian residential norms as baseline),
    /// or `None` when no minimum applies.
    pub fn min_area(&self) -> Option<f64> {
        match self {
            RoomType::Living => Some(14.0),
            RoomType::Bedroom => Some(10.0),
            RoomType::Kitchen => Some(6.0),
            RoomType::Bathroom => Some(4.0),
            RoomType::Toilet => Some(1.5),
            RoomType::Hallway => Some(3.0),
            RoomType::Storage => Some(1.0),
            _ => None,
        }
    }

    /// Lower-case label used as the connectivity-graph node type tag.
    pub fn label(&self) -> &'static str {
        match self {
            RoomType::Living => "living",
            RoomType::Bedroom => "bedroom",
            RoomType::Kitchen => "kitchen",
            RoomType::Bathroom => "bathroom",
            RoomType::Toilet => "toilet",
            RoomType::Hallway => "hallway",
            RoomType::Storage => "storage",
            RoomType::Balcony => "balcony",
            RoomType::Corridor => "corridor",
            RoomType::Staircase => "staircase",
            RoomType::Elevator => "elevator",
            RoomType::Utility => "utility",
            RoomType::Office => "office",
            RoomType::NotDefined => "notdefined",
        }
    }
}

/// A bounded room area within a story or apartment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Space {
    pub id: String,
    pub name: String,
    pub tag: String,
    pub room_type: RoomType,
    /// Boundary polygon aligned with wall centerlines.
    pub boundary: Polygon2D,
}

impl Space {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        room_type: RoomType,
        boundary: Polygon2D,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            tag: String::new(),
            room_type,
            boundary,
        }
    }

    pub fn area(&self) -> f64 {
        self.boundary.area()
    }

    pub fn perimeter(&self) -> f64 {
        self.boundary.perimeter()
    }
}

/// A dwelling unit: a logical grouping of spaces with an outer boundary.
/// Not itself walled — purely a spatial overlay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Apartment {
    pub id: String,
    pub name: String,
    pub tag: String,
    pub boundary: Polygon2D,
    pub spaces: Vec<Space>,
}

impl Apartment {
    pub fn new(id: impl Into<String>, name: impl Into<String>, boundary: Polygon2D) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            tag: String::new(),
            boundary,
            spaces: Vec::new(),
        }
    }

    pub fn area(&self) -> f64 {
        self.boundary.area()
    }

    pub fn spaces_of_type(&self, room_type: RoomType) -> Vec<&Space> {
        self.spaces
            .iter()
            .filter(|s| s.room_type == room_type)
            .collect()
    }

    pub fn has_bathroom(&self) -> bool {
        self.spaces
            .iter()
            .any(|s| matches!(s.room_type, RoomType::Bathroom | RoomType::Toilet))
    }

    pub fn has_kitchen(&self) -> bool {
        self.spaces.iter().any(|s| s.room_type == RoomType::Kitchen)
    }
}
