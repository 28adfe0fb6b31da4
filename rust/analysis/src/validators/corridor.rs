// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Corridor checks: clear width, continuity, length, dead ends.
//!
//! Corridors are modeled as paired south/north wall runs along the x
//! axis. Wall names carry positional metadata ("Corridor South West"):
//! the south/north token selects the side and the trailing token pairs
//! matching segments. Continuity works on merged x-intervals: the core
//! and every apartment entry must land on the same maximal run.

use planlint_model::{Building, Door, DoorClass, Story, Wall, WallRole};

use crate::config::AnalysisConfig;
use crate::finding::Finding;

pub fn validate_corridors(building: &Building, config: &AnalysisConfig) -> Vec<Finding> {
    let mut findings = Vec::new();

    for story in &building.stories {
        let corridor_walls: Vec<&Wall> = story
            .walls
            .iter()
            .filter(|w| w.role == WallRole::Corridor)
            .collect();

        if corridor_walls.is_empty() {
            if !story.apartments.is_empty() {
                findings.push(Finding::error(
                    "Story",
                    story.name.clone(),
                    format!(
                        "Story '{}' has apartments but no corridor walls for access.",
                        story.name
                    ),
                ));
            }
            continue;
        }

        check_clear_width(story, &corridor_walls, config, &mut findings);
        check_entry_doors(story, &mut findings);
        check_length(story, &corridor_walls, &mut findings);
        check_continuity(story, &corridor_walls, config, &mut findings);
        check_dead_ends(story, &corridor_walls, &mut findings);
    }

    findings
}

fn suffix(name: &str) -> String {
    name.split_whitespace()
        .last()
        .unwrap_or("")
        .to_lowercase()
}

/// Clear width between paired south/north runs, minus half-thicknesses.
fn check_clear_width(
    story: &Story,
    corridor_walls: &[&Wall],
    config: &AnalysisConfig,
    findings: &mut Vec<Finding>,
) {
    let south: Vec<&&Wall> = corridor_walls
        .iter()
        .filter(|w| w.name.to_lowercase().contains("south"))
        .collect();
    let north: Vec<&&Wall> = corridor_walls
        .iter()
        .filter(|w| w.name.to_lowercase().contains("north"))
        .collect();

    for sw in &south {
        for nw in &north {
            let sw_suffix = suffix(&sw.name);
            if sw_suffix != suffix(&nw.name) {
                continue;
            }
            let sy = (sw.start.y + sw.end.y) / 2.0;
            let ny = (nw.start.y + nw.end.y) / 2.0;
            let clear_width = (ny - sy).abs() - sw.thickness / 2.0 - nw.thickness / 2.0;
            if clear_width < config.min_corridor_width - 0.01 {
                findings.push(Finding::error(
                    "Corridor",
                    sw.id.clone(),
                    format!(
                        "Corridor on '{}' ({}) has clear width {:.2}m — minimum is {:.2}m.",
                        story.name, sw_suffix, clear_width, config.min_corridor_width
                    ),
                ));
            }
        }
    }
}

fn apartment_entry_doors<'a>(story: &'a Story, apartment_name: &str) -> Vec<&'a Door> {
    let needle = apartment_name.to_lowercase();
    story
        .doors
        .iter()
        .filter(|d| {
            d.class == DoorClass::ApartmentEntry && d.name.to_lowercase().contains(&needle)
        })
        .collect()
}

fn check_entry_doors(story: &Story, findings: &mut Vec<Finding>) {
    for apt in &story.apartments {
        if apartment_entry_doors(story, &apt.name).is_empty() {
            findings.push(Finding::error(
                "Apartment",
                apt.id.clone(),
                format!(
                    "Apartment '{}' on '{}' has no entry door from the corridor.",
                    apt.name, story.name
                ),
            ));
        }
    }
}

/// Corridor noticeably longer than the building is wide.
fn check_length(story: &Story, corridor_walls: &[&Wall], findings: &mut Vec<Finding>) {
    let total_length: f64 = corridor_walls.iter().map(|w| w.length()).sum::<f64>() / 2.0;
    if total_length <= 0.0 {
        return;
    }
    let building_width = story
        .walls
        .iter()
        .map(|w| w.start.x.max(w.end.x))
        .fold(0.0_f64, f64::max);
    if total_length > building_width * 1.2 {
        findings.push(Finding::warning(
            "Story",
            story.name.clone(),
            format!(
                "Corridor on '{}' total length {:.1}m may be longer than necessary.",
                story.name, total_length
            ),
        ));
    }
}

/// Merges corridor wall x-ranges into maximal runs and verifies the core
/// and every apartment entry share one run.
fn check_continuity(
    story: &Story,
    corridor_walls: &[&Wall],
    config: &AnalysisConfig,
    findings: &mut Vec<Finding>,
) {
    if story.apartments.is_empty() {
        return;
    }

    let mut intervals: Vec<(f64, f64)> = corridor_walls
        .iter()
        .map(|w| (w.start.x.min(w.end.x), w.start.x.max(w.end.x)))
        .filter(|(lo, hi)| hi - lo > 0.01) // skip vertical terminators
        .collect();
    if intervals.is_empty() {
        return;
    }
    intervals.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mut merged: Vec<(f64, f64)> = vec![intervals[0]];
    for (lo, hi) in intervals.into_iter().skip(1) {
        let last = merged.last_mut().unwrap();
        if lo <= last.1 + config.interval_merge_tolerance {
            last.1 = last.1.max(hi);
        } else {
            merged.push((lo, hi));
        }
    }

    // The core may sit slightly beside the corridor, hence the slack.
    let core_run = story.staircases.first().map(|st| st.centroid().x).and_then(|core_x| {
        merged.iter().position(|(lo, hi)| {
            lo - config.core_interval_slack <= core_x && core_x <= hi + config.core_interval_slack
        })
    });

    for apt in &story.apartments {
        for door in apartment_entry_doors(story, &apt.name) {
            let Some(host) = story.wall(&door.wall_id) else {
                continue;
            };
            if host.role != WallRole::Corridor {
                continue;
            }
            let door_x = host.point_at_offset(door.position).x;
            let door_run = merged
                .iter()
                .position(|(lo, hi)| lo - 0.1 <= door_x && door_x <= hi + 0.1);

            match (door_run, core_run) {
                (None, _) => findings.push(Finding::error(
                    "Apartment",
                    apt.id.clone(),
                    format!(
                        "Apartment '{}' entry door '{}' on '{}' at x={:.1}m is outside all corridor segments — unreachable.",
                        apt.name, door.name, story.name, door_x
                    ),
                )),
                (Some(d), Some(c)) if d != c => findings.push(Finding::error(
                    "Apartment",
                    apt.id.clone(),
                    format!(
                        "Apartment '{}' entry door '{}' on '{}' at x={:.1}m is on corridor segment [{:.1}-{:.1}] disconnected from the core (segment [{:.1}-{:.1}]).",
                        apt.name,
                        door.name,
                        story.name,
                        door_x,
                        merged[d].0,
                        merged[d].1,
                        merged[c].0,
                        merged[c].1
                    ),
                )),
                _ => {}
            }
        }
    }
}

/// Corridor runs extending more than a meter past the first or last
/// entry door waste area that could be annexed to an apartment.
fn check_dead_ends(story: &Story, corridor_walls: &[&Wall], findings: &mut Vec<Finding>) {
    for cw in corridor_walls {
        if cw.name.to_lowercase().contains("core") {
            continue; // the core segment connects to the core, not apartments
        }
        let length = cw.length();
        if length < 0.01 {
            continue;
        }

        let door_xs: Vec<f64> = story
            .doors
            .iter()
            .filter(|d| d.wall_id == cw.id && d.class == DoorClass::ApartmentEntry)
            .map(|d| cw.point_at_offset(d.position).x)
            .collect();
        if door_xs.is_empty() {
            continue;
        }

        let wall_x_min = cw.start.x.min(cw.end.x);
        let wall_x_max = cw.start.x.max(cw.end.x);
        let first_door = door_xs.iter().cloned().fold(f64::INFINITY, f64::min);
        let last_door = door_xs.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

        let dead_start = first_door - wall_x_min;
        if dead_start > 1.0 {
            findings.push(Finding::optimization(
                "Wall",
                cw.id.clone(),
                format!(
                    "Dead-end corridor on '{}': {:.1}m before first door (~{:.1}m² wasted). Could be annexed to adjacent apartment.",
                    cw.name,
                    dead_start,
                    dead_start * 1.5
                ),
            ));
        }
        // Account for the door leaf itself.
        let dead_end = wall_x_max - (last_door + 0.9);
        if dead_end > 1.0 {
            findings.push(Finding::optimization(
                "Wall",
                cw.id.clone(),
                format!(
                    "Dead-end corridor on '{}': {:.1}m after last door (~{:.1}m² wasted). Could be annexed to adjacent apartment.",
                    cw.name,
                    dead_end,
                    dead_end * 1.5
                ),
            ));
        }
    }
}
