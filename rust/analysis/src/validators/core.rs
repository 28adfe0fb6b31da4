// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Core shaft integrity and door sizing.
//!
//! The stair and elevator shafts are fire compartments: openings in
//! their walls are restricted to normal-sized fire doors, and windows
//! are not allowed at all.

use planlint_model::{Building, DoorClass};

use crate::config::AnalysisConfig;
use crate::finding::Finding;

pub fn validate_core_integrity(building: &Building, config: &AnalysisConfig) -> Vec<Finding> {
    let mut findings = Vec::new();

    for story in &building.stories {
        for door in &story.doors {
            let Some(wall) = story.wall(&door.wall_id) else {
                continue; // host existence is the structural validator's concern
            };

            if wall.role.is_core() && door.width > config.max_core_opening + 0.01 {
                findings.push(Finding::error(
                    "Door",
                    door.id.clone(),
                    format!(
                        "Door '{}' on core wall '{}' is {:.2}m wide — max {:.2}m to keep the shaft intact.",
                        door.name, wall.name, door.width, config.max_core_opening
                    ),
                ));
            } else if door.width > config.max_door_width_warning + 0.01 {
                findings.push(Finding::warning(
                    "Door",
                    door.id.clone(),
                    format!(
                        "Door '{}' is {:.2}m wide — unusually wide for an interior door.",
                        door.name, door.width
                    ),
                ));
            }

            let min_width = match door.class {
                DoorClass::BuildingEntry => 1.00,
                DoorClass::ApartmentEntry => 0.90,
                DoorClass::Room => 0.80,
            };
            if door.width < min_width - 0.01 {
                findings.push(Finding::error(
                    "Door",
                    door.id.clone(),
                    format!(
                        "Door '{}' is {:.2}m wide — minimum is {:.2}m for its use.",
                        door.name, door.width, min_width
                    ),
                ));
            }
        }

        for window in &story.windows {
            let Some(wall) = story.wall(&window.wall_id) else {
                continue;
            };
            if wall.role.is_core() {
                findings.push(Finding::error(
                    "Window",
                    window.id.clone(),
                    format!(
                        "Window '{}' sits on core wall '{}' — shaft walls must be unbroken.",
                        window.name, wall.name
                    ),
                ));
            }
        }
    }

    findings
}
