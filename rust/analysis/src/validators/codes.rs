// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Building-code compliance: clear heights, slabs, stair geometry,
//! escape distances, and area efficiency.

use planlint_model::{Building, DoorClass, Rect, Story, WallRole};

use crate::config::AnalysisConfig;
use crate::finding::Finding;

pub fn validate_building_codes(building: &Building, config: &AnalysisConfig) -> Vec<Finding> {
    let mut findings = Vec::new();

    for story in &building.stories {
        check_clear_height(story, config, &mut findings);
        check_slabs(story, &mut findings);
        check_core_access(story, &mut findings);
        check_staircase_geometry(story, config, &mut findings);
        check_fire_escape(story, config, &mut findings);
        check_core_share(story, config, &mut findings);
    }

    check_vertical_circulation(building, &mut findings);
    check_building_entrance(building, &mut findings);

    findings
}

/// Clear height is the story height minus the floor build-up (screed,
/// impact insulation, finish).
fn check_clear_height(story: &Story, config: &AnalysisConfig, findings: &mut Vec<Finding>) {
    let clear = story.height - config.floor_structure;
    if clear < config.min_clear_height - 0.01 {
        findings.push(Finding::error(
            "Story",
            story.name.clone(),
            format!(
                "Story '{}' clear height is {:.2}m — minimum is {:.2}m.",
                story.name, clear, config.min_clear_height
            ),
        ));
    } else if (clear - config.target_clear_height).abs() > 0.01 {
        findings.push(Finding::warning(
            "Story",
            story.name.clone(),
            format!(
                "Story '{}' clear height is {:.2}m — target is {:.2}m.",
                story.name, clear, config.target_clear_height
            ),
        ));
    }
}

fn check_slabs(story: &Story, findings: &mut Vec<Finding>) {
    if story.walls.is_empty() {
        return;
    }
    if !story.slabs.iter().any(|s| s.is_floor) {
        findings.push(Finding::error(
            "Story",
            story.name.clone(),
            format!("Story '{}' has no floor slab.", story.name),
        ));
    }
}

/// Multi-story buildings need a staircase on every story below the top
/// one, or the upper stories are unreachable.
fn check_vertical_circulation(building: &Building, findings: &mut Vec<Finding>) {
    if building.stories.len() < 2 {
        return;
    }
    for story in &building.stories[..building.stories.len() - 1] {
        if story.staircases.is_empty() {
            findings.push(Finding::error(
                "Story",
                story.name.clone(),
                format!(
                    "Story '{}' has no staircase — upper stories are unreachable.",
                    story.name
                ),
            ));
        }
    }
}

/// Every story needs at least one door into the core (staircase or
/// lobby access).
fn check_core_access(story: &Story, findings: &mut Vec<Finding>) {
    if story.walls.is_empty() || story.staircases.is_empty() {
        return;
    }
    let has_core_door = story.doors.iter().any(|d| {
        let lower = d.name.to_lowercase();
        lower.contains("core") || lower.contains("lobby") || lower.contains("staircase door")
    }) || story
        .doors
        .iter()
        .any(|d| story.wall(&d.wall_id).is_some_and(|w| w.role.is_core()));
    if !has_core_door {
        findings.push(Finding::error(
            "Story",
            story.name.clone(),
            format!(
                "Story '{}' has no door into the core — apartments cannot reach the staircase.",
                story.name
            ),
        ));
    }
}

fn check_building_entrance(building: &Building, findings: &mut Vec<Finding>) {
    let Some(ground) = building.stories.first() else {
        return;
    };
    if ground.walls.is_empty() {
        return;
    }
    if !ground
        .doors
        .iter()
        .any(|d| d.class == DoorClass::BuildingEntry)
    {
        findings.push(Finding::error(
            "Story",
            ground.name.clone(),
            format!(
                "Ground story '{}' has no building entrance door.",
                ground.name
            ),
        ));
    }
}

fn check_staircase_geometry(story: &Story, config: &AnalysisConfig, findings: &mut Vec<Finding>) {
    for st in &story.staircases {
        if st.width < config.min_stair_width - 0.01 {
            findings.push(Finding::error(
                "Staircase",
                st.id.clone(),
                format!(
                    "Staircase '{}' flight width is {:.2}m — minimum is {:.2}m.",
                    st.name, st.width, config.min_stair_width
                ),
            ));
        }
        if st.riser_height > config.max_riser_height + 0.001 {
            findings.push(Finding::warning(
                "Staircase",
                st.id.clone(),
                format!(
                    "Staircase '{}' riser height is {:.3}m — maximum is {:.2}m.",
                    st.name, st.riser_height, config.max_riser_height
                ),
            ));
        }
        if st.tread_length < config.min_tread_length - 0.001 {
            findings.push(Finding::warning(
                "Staircase",
                st.id.clone(),
                format!(
                    "Staircase '{}' tread length is {:.3}m — minimum is {:.2}m.",
                    st.name, st.tread_length, config.min_tread_length
                ),
            ));
        }
        // Comfort formula 2h + g, target band 0.59..0.65.
        let stride = 2.0 * st.riser_height + st.tread_length;
        if !(0.59..=0.65).contains(&stride) {
            findings.push(Finding::warning(
                "Staircase",
                st.id.clone(),
                format!(
                    "Staircase '{}' stride (2h+g) is {:.3}m — comfortable range is 0.59-0.65m.",
                    st.name, stride
                ),
            ));
        }
    }
}

/// Straight-line distance from each apartment center to the nearest
/// staircase. A coarse stand-in for the walking route.
fn check_fire_escape(story: &Story, config: &AnalysisConfig, findings: &mut Vec<Finding>) {
    if story.staircases.is_empty() {
        return;
    }
    for apt in &story.apartments {
        let c = apt.boundary.centroid();
        let distance = story
            .staircases
            .iter()
            .map(|st| st.centroid().distance_to(&c))
            .fold(f64::INFINITY, f64::min);
        if distance > config.max_fire_escape_distance {
            findings.push(Finding::error(
                "Apartment",
                apt.id.clone(),
                format!(
                    "Apartment '{}' is {:.1}m from the nearest staircase — maximum escape distance is {:.0}m.",
                    apt.name, distance, config.max_fire_escape_distance
                ),
            ));
        }
    }
}

/// Core footprint (staircases plus the elevator shaft box) as a share
/// of the story footprint. A fat core eats rentable area.
fn check_core_share(story: &Story, config: &AnalysisConfig, findings: &mut Vec<Finding>) {
    let footprint = story.floor_area();
    if footprint <= 0.0 || story.apartments.is_empty() {
        return;
    }
    let mut core_area: f64 = story.staircases.iter().map(|st| st.area()).sum();
    let elevator = story.walls_with_role(WallRole::Elevator);
    if !elevator.is_empty() {
        let mut rect = Rect::empty();
        for w in &elevator {
            rect.expand(&w.start);
            rect.expand(&w.end);
        }
        core_area += rect.area();
    }
    let share = core_area / footprint;
    if share > config.max_core_share {
        findings.push(Finding::warning(
            "Story",
            story.name.clone(),
            format!(
                "Story '{}' core takes {:.1}% of the footprint ({:.1}m² of {:.1}m²) — target is ≤ {:.0}%.",
                story.name,
                share * 100.0,
                core_area,
                footprint,
                config.max_core_share * 100.0
            ),
        ));
    }
}
