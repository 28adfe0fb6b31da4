// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Vertical consistency across adjacent stories.
//!
//! Load-bearing walls must stack: an upper bearing wall without a
//! matching bearing wall below cannot transfer loads to the foundation.
//! Staircases must land on top of each other, and wet rooms should share
//! an installation shaft (a softer warning-level check).

use planlint_model::{Point2D, Staircase, Story, Wall};
use planlint_model::{Building, RoomType};

use crate::config::AnalysisConfig;
use crate::finding::Finding;

pub fn validate_vertical_alignment(
    building: &Building,
    config: &AnalysisConfig,
) -> Vec<Finding> {
    let mut findings = Vec::new();
    let stories = &building.stories;
    if stories.len() < 2 {
        return findings;
    }
    let tolerance = config.alignment_tolerance;

    for pair in stories.windows(2) {
        let (lower, upper) = (&pair[0], &pair[1]);

        let lower_bearing: Vec<&Wall> =
            lower.walls.iter().filter(|w| w.load_bearing).collect();
        for wall in upper.walls.iter().filter(|w| w.load_bearing) {
            if !has_aligned_wall(wall, &lower_bearing, tolerance) {
                findings.push(Finding::error(
                    "Wall",
                    wall.id.clone(),
                    format!(
                        "Load-bearing wall '{}' on '{}' has no aligned bearing wall below on '{}'. Wall at ({:.1},{:.1})->({:.1},{:.1})",
                        wall.name,
                        upper.name,
                        lower.name,
                        wall.start.x,
                        wall.start.y,
                        wall.end.x,
                        wall.end.y
                    ),
                ));
            }
        }

        for st_u in &upper.staircases {
            if lower.staircases.is_empty() {
                continue;
            }
            let aligned = lower
                .staircases
                .iter()
                .any(|st_l| staircases_aligned(st_u, st_l, tolerance));
            if !aligned {
                findings.push(Finding::error(
                    "Staircase",
                    st_u.id.clone(),
                    format!(
                        "Staircase '{}' on '{}' is not aligned with staircase on '{}'.",
                        st_u.name, upper.name, lower.name
                    ),
                ));
            }
        }
    }

    // Wet-room shaft alignment runs with a coarser 1.0 m tolerance since
    // plumbing can jog within a shaft.
    for pair in stories.windows(2) {
        let (lower, upper) = (&pair[0], &pair[1]);
        let lower_wet = wet_room_positions(lower);
        if lower_wet.is_empty() {
            continue;
        }
        for pos_u in wet_room_positions(upper) {
            let matched = lower_wet
                .iter()
                .any(|pos_l| (pos_u.x - pos_l.x).abs() < 1.0 && (pos_u.y - pos_l.y).abs() < 1.0);
            if !matched {
                findings.push(Finding::warning(
                    "Story",
                    upper.name.clone(),
                    format!(
                        "Wet room at ({:.1}, {:.1}) on '{}' has no aligned wet room below on '{}' — installation shaft misalignment.",
                        pos_u.x, pos_u.y, upper.name, lower.name
                    ),
                ));
            }
        }
    }

    findings
}

/// Endpoints may be given in either direction.
fn has_aligned_wall(wall: &Wall, candidates: &[&Wall], tolerance: f64) -> bool {
    candidates.iter().any(|other| {
        (wall.start.distance_to(&other.start) <= tolerance
            && wall.end.distance_to(&other.end) <= tolerance)
            || (wall.start.distance_to(&other.end) <= tolerance
                && wall.end.distance_to(&other.start) <= tolerance)
    })
}

fn staircases_aligned(a: &Staircase, b: &Staircase, tolerance: f64) -> bool {
    a.centroid().distance_to(&b.centroid()) <= tolerance
}

fn wet_room_positions(story: &Story) -> Vec<Point2D> {
    let mut positions = Vec::new();
    for apt in &story.apartments {
        for space in &apt.spaces {
            if matches!(
                space.room_type,
                RoomType::Bathroom | RoomType::Toilet | RoomType::Kitchen
            ) {
                positions.push(space.boundary.centroid());
            }
        }
    }
    positions
}
