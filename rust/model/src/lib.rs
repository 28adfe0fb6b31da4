// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # planlint Model
//!
//! Building model and 2D geometry kernel for floor-plan analysis.
//!
//! A [`Building`] owns stories sorted by elevation; each [`Story`] owns flat
//! vectors of walls, openings, slabs, staircases, spaces, and apartments.
//! Elements reference each other by stable string id (a door stores its host
//! wall's id), never by owning pointers. [`Building::finalize`] runs a
//! one-time tagging and classification pass: it assigns drawing tags
//! (`W1`, `D1`, `R1`, …), builds the id lookup index, and derives
//! [`WallRole`] / [`DoorClass`] from element names so downstream analysis
//! never re-parses free text.

pub mod building;
pub mod elements;
pub mod geometry;
pub mod spaces;

pub use building::{Building, Story};
pub use elements::{Door, DoorClass, Slab, Staircase, Wall, WallRole, Window};
pub use geometry::{
    point_in_polygon, point_in_polygon_with_tolerance, point_to_segment_distance,
    project_onto_segment, Point2D, Polygon2D, Rect,
};
pub use spaces::{Apartment, RoomType, Space};

/// Result type alias for model construction.
pub type Result<T> = std::result::Result<T, ModelError>;

/// Errors raised when constructing model elements from invalid input.
///
/// These are programmer-contract violations; relationship-level problems
/// (a door referencing a missing wall, overlapping openings) are reported
/// as findings by the analysis crate instead.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// Wall start and end points coincide.
    #[error("wall '{0}' start and end points must differ")]
    DegenerateWall(String),

    /// A polygon needs at least 3 vertices.
    #[error("polygon must have at least 3 vertices, got {0}")]
    DegeneratePolygon(usize),

    /// NaN or infinite coordinate in input geometry.
    #[error("non-finite coordinate in '{0}'")]
    NonFiniteCoordinate(String),
}
