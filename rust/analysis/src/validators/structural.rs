// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Cross-element structural consistency within a story.
//!
//! Checks relationships single-element constructors cannot see: openings
//! referencing and fitting their host walls, overlapping openings on one
//! wall, openings crossed by other walls, and partition walls cutting
//! through the vertical core.

use rustc_hash::FxHashMap;

use planlint_model::{Building, Rect, Story, Wall};

use crate::config::AnalysisConfig;
use crate::finding::Finding;

pub fn validate_structure(building: &Building, config: &AnalysisConfig) -> Vec<Finding> {
    let mut findings = Vec::new();
    for story in &building.stories {
        validate_story(story, config, &mut findings);
    }
    findings
}

fn validate_story(story: &Story, _config: &AnalysisConfig, findings: &mut Vec<Finding>) {
    // Door host checks.
    for door in &story.doors {
        match story.wall(&door.wall_id) {
            None => findings.push(Finding::error(
                "Door",
                door.id.clone(),
                format!("Door references non-existent wall {}", door.wall_id),
            )),
            Some(wall) => {
                if door.position + door.width > wall.length() + 1e-6 {
                    findings.push(Finding::error(
                        "Door",
                        door.id.clone(),
                        format!(
                            "Door extends past wall end (pos {} + width {} > wall length {:.2})",
                            door.position,
                            door.width,
                            wall.length()
                        ),
                    ));
                }
                if door.height > wall.height + 1e-6 {
                    findings.push(Finding::error(
                        "Door",
                        door.id.clone(),
                        format!(
                            "Door height {}m exceeds wall height {}m",
                            door.height, wall.height
                        ),
                    ));
                }
            }
        }
    }

    // Window host checks.
    for window in &story.windows {
        match story.wall(&window.wall_id) {
            None => findings.push(Finding::error(
                "Window",
                window.id.clone(),
                format!("Window references non-existent wall {}", window.wall_id),
            )),
            Some(wall) => {
                if window.position + window.width > wall.length() + 1e-6 {
                    findings.push(Finding::error(
                        "Window",
                        window.id.clone(),
                        format!(
                            "Window extends past wall end (pos {} + width {} > wall length {:.2})",
                            window.position,
                            window.width,
                            wall.length()
                        ),
                    ));
                }
                if window.sill_height + window.height > wall.height + 1e-6 {
                    findings.push(Finding::error(
                        "Window",
                        window.id.clone(),
                        format!(
                            "Window top ({}m) exceeds wall height ({}m)",
                            window.sill_height + window.height,
                            wall.height
                        ),
                    ));
                }
            }
        }
    }

    check_overlapping_openings(story, findings);
    check_openings_cross_walls(story, findings);
    check_walls_cross_core(story, findings);
}

/// Pairs of openings on one wall whose spans overlap by more than 1 cm.
fn check_overlapping_openings(story: &Story, findings: &mut Vec<Finding>) {
    let mut doors_by_wall: FxHashMap<&str, Vec<usize>> = FxHashMap::default();
    for (i, door) in story.doors.iter().enumerate() {
        if story.wall(&door.wall_id).is_some() {
            doors_by_wall.entry(door.wall_id.as_str()).or_default().push(i);
        }
    }
    let mut windows_by_wall: FxHashMap<&str, Vec<usize>> = FxHashMap::default();
    for (i, window) in story.windows.iter().enumerate() {
        if story.wall(&window.wall_id).is_some() {
            windows_by_wall
                .entry(window.wall_id.as_str())
                .or_default()
                .push(i);
        }
    }

    let wall_name = |wid: &str| -> String {
        story
            .wall(wid)
            .map(|w| w.name.clone())
            .unwrap_or_else(|| wid.to_string())
    };
    let overlap = |s1: f64, w1: f64, s2: f64, w2: f64| -> f64 {
        (s1 + w1).min(s2 + w2) - s1.max(s2)
    };

    // Iterate in story order so output is deterministic.
    for door in &story.doors {
        let Some(indices) = doors_by_wall.get(door.wall_id.as_str()) else {
            continue;
        };
        for (a, &i) in indices.iter().enumerate() {
            if story.doors[i].id != door.id {
                continue;
            }
            for &j in &indices[a + 1..] {
                let d2 = &story.doors[j];
                let ov = overlap(door.position, door.width, d2.position, d2.width);
                if ov > 0.01 {
                    findings.push(Finding::error(
                        "Door",
                        door.id.clone(),
                        format!(
                            "Door '{}' overlaps with '{}' by {:.2}m on wall '{}'",
                            door.name,
                            d2.name,
                            ov,
                            wall_name(&door.wall_id)
                        ),
                    ));
                }
            }
        }
    }

    for window in &story.windows {
        let Some(indices) = windows_by_wall.get(window.wall_id.as_str()) else {
            continue;
        };
        for (a, &i) in indices.iter().enumerate() {
            if story.windows[i].id != window.id {
                continue;
            }
            for &j in &indices[a + 1..] {
                let w2 = &story.windows[j];
                let ov = overlap(window.position, window.width, w2.position, w2.width);
                if ov > 0.01 {
                    findings.push(Finding::error(
                        "Window",
                        window.id.clone(),
                        format!(
                            "Window '{}' overlaps with '{}' by {:.2}m on wall '{}'",
                            window.name,
                            w2.name,
                            ov,
                            wall_name(&window.wall_id)
                        ),
                    ));
                }
            }
        }
    }

    for door in &story.doors {
        let Some(window_indices) = windows_by_wall.get(door.wall_id.as_str()) else {
            continue;
        };
        for &j in window_indices {
            let window = &story.windows[j];
            let ov = overlap(door.position, door.width, window.position, window.width);
            if ov > 0.01 {
                findings.push(Finding::error(
                    "Door",
                    door.id.clone(),
                    format!(
                        "Door '{}' overlaps with window '{}' by {:.2}m on wall '{}'",
                        door.name,
                        window.name,
                        ov,
                        wall_name(&door.wall_id)
                    ),
                ));
            }
        }
    }
}

fn point_on_segment(
    px: f64,
    py: f64,
    sx: f64,
    sy: f64,
    ex: f64,
    ey: f64,
    tol: f64,
) -> bool {
    let (min_x, max_x) = (sx.min(ex) - tol, sx.max(ex) + tol);
    let (min_y, max_y) = (sy.min(ey) - tol, sy.max(ey) + tol);
    if !(min_x <= px && px <= max_x && min_y <= py && py <= max_y) {
        return false;
    }
    let (dx, dy) = (ex - sx, ey - sy);
    let length = (dx * dx + dy * dy).sqrt();
    if length < 1e-6 {
        return ((px - sx).powi(2) + (py - sy).powi(2)).sqrt() < tol;
    }
    (dy * px - dx * py + ex * sy - ey * sx).abs() / length < tol
}

/// An opening in a wall cannot exist where another wall's endpoint lands
/// inside its span.
fn check_openings_cross_walls(story: &Story, findings: &mut Vec<Finding>) {
    let mut check = |element_type: &str,
                     id: &str,
                     name: &str,
                     wall_id: &str,
                     position: f64,
                     width: f64,
                     findings: &mut Vec<Finding>| {
        let Some(host) = story.wall(wall_id) else {
            return;
        };
        let p_start = host.point_at_offset(position);
        let p_end = host.point_at_offset(position + width);

        for other in &story.walls {
            if other.id == host.id {
                continue;
            }
            for (label, pt) in [("start", other.start), ("end", other.end)] {
                if point_on_segment(pt.x, pt.y, p_start.x, p_start.y, p_end.x, p_end.y, 0.05) {
                    findings.push(Finding::error(
                        element_type,
                        id.to_string(),
                        format!(
                            "{element_type} '{}' opening crosses wall '{}' ({} at {:.1},{:.1}) on host wall '{}'",
                            name, other.name, label, pt.x, pt.y, host.name
                        ),
                    ));
                }
            }
        }
    };

    for door in &story.doors {
        check(
            "Door",
            &door.id,
            &door.name,
            &door.wall_id,
            door.position,
            door.width,
            findings,
        );
    }
    for window in &story.windows {
        check(
            "Window",
            &window.id,
            &window.name,
            &window.wall_id,
            window.position,
            window.width,
            findings,
        );
    }
}

fn wall_bbox(walls: &[&Wall]) -> Rect {
    let mut rect = Rect::empty();
    for w in walls {
        rect.expand(&w.start);
        rect.expand(&w.end);
    }
    rect
}

/// Partition and lobby walls must not cut through the elevator shaft,
/// the staircase, or the overall core box.
fn check_walls_cross_core(story: &Story, findings: &mut Vec<Finding>) {
    const MARGIN: f64 = 0.05;

    let core_walls: Vec<&Wall> = story.walls.iter().filter(|w| w.role.is_core()).collect();
    if core_walls.is_empty() {
        return;
    }

    let mut zones: Vec<(&str, Rect)> = Vec::new();
    let elev: Vec<&Wall> = story
        .walls
        .iter()
        .filter(|w| w.role == planlint_model::WallRole::Elevator)
        .collect();
    if !elev.is_empty() {
        zones.push(("elevator", wall_bbox(&elev)));
    }
    let stairs: Vec<&Wall> = story
        .walls
        .iter()
        .filter(|w| w.role == planlint_model::WallRole::Staircase)
        .collect();
    if !stairs.is_empty() {
        zones.push(("staircase", wall_bbox(&stairs)));
    }
    zones.push(("core", wall_bbox(&core_walls)));

    // Corridor walls border the core; vestibule walls are part of it.
    let checked: Vec<&Wall> = story
        .walls
        .iter()
        .filter(|w| {
            matches!(
                w.role,
                planlint_model::WallRole::Partition | planlint_model::WallRole::Lobby
            )
        })
        .collect();

    for wall in checked {
        let (wx_min, wx_max) = (wall.start.x.min(wall.end.x), wall.start.x.max(wall.end.x));
        let (wy_min, wy_max) = (wall.start.y.min(wall.end.y), wall.start.y.max(wall.end.y));
        let is_vertical = (wall.start.x - wall.end.x).abs() < 0.01;
        let is_horizontal = (wall.start.y - wall.end.y).abs() < 0.01;

        for (zone_name, z) in &zones {
            let x_overlap = wx_max > z.min_x + MARGIN && wx_min < z.max_x - MARGIN;
            let y_overlap = wy_max > z.min_y + MARGIN && wy_min < z.max_y - MARGIN;
            if !(x_overlap && y_overlap) {
                continue;
            }
            // Axis-aligned walls only flag when their own axis coordinate is
            // strictly inside the zone, so walls on the zone boundary pass.
            if is_vertical && !(z.min_x + MARGIN < wall.start.x && wall.start.x < z.max_x - MARGIN)
            {
                continue;
            }
            if is_horizontal
                && !(z.min_y + MARGIN < wall.start.y && wall.start.y < z.max_y - MARGIN)
            {
                continue;
            }

            findings.push(Finding::error(
                "Wall",
                wall.id.clone(),
                format!(
                    "Wall '{}' crosses through {} area ({:.1},{:.1})->({:.1},{:.1})",
                    wall.name, zone_name, z.min_x, z.min_y, z.max_x, z.max_y
                ),
            ));
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planlint_model::Point2D;

    fn base_building() -> Building {
        let mut b = Building::new("Test");
        b.add_story("Ground", 3.0);
        b.add_wall(
            "Ground",
            "South",
            Point2D::new(0.0, 0.0),
            Point2D::new(10.0, 0.0),
            2.8,
            0.3,
            true,
            true,
        )
        .unwrap();
        b
    }

    #[test]
    fn door_past_wall_end_is_error() {
        let mut b = base_building();
        let wall = b.story("Ground").unwrap().walls[0].id.clone();
        b.add_door("Ground", "Big Door", &wall, 9.5, 1.0, 2.1);
        b.finalize();
        let findings = validate_structure(&b, &AnalysisConfig::default());
        assert!(findings
            .iter()
            .any(|f| f.message.contains("extends past wall end")));
    }

    #[test]
    fn missing_host_wall_is_error_not_panic() {
        let mut b = base_building();
        b.add_door("Ground", "Orphan", "w99", 1.0, 0.9, 2.1);
        b.finalize();
        let findings = validate_structure(&b, &AnalysisConfig::default());
        assert!(findings
            .iter()
            .any(|f| f.message.contains("non-existent wall")));
    }

    #[test]
    fn overlapping_doors_reported_once() {
        let mut b = base_building();
        let wall = b.story("Ground").unwrap().walls[0].id.clone();
        b.add_door("Ground", "Door A", &wall, 1.0, 1.0, 2.1);
        b.add_door("Ground", "Door B", &wall, 1.5, 1.0, 2.1);
        b.finalize();
        let findings = validate_structure(&b, &AnalysisConfig::default());
        let overlaps: Vec<_> = findings
            .iter()
            .filter(|f| f.message.contains("overlaps with"))
            .collect();
        assert_eq!(overlaps.len(), 1);
        assert!(overlaps[0].message.contains("0.50m"));
    }

    #[test]
    fn opening_crossed_by_wall_endpoint() {
        let mut b = base_building();
        let wall = b.story("Ground").unwrap().walls[0].id.clone();
        b.add_door("Ground", "Door", &wall, 4.0, 1.0, 2.1);
        // A partition whose endpoint lands inside the door span.
        b.add_wall(
            "Ground",
            "Partition",
            Point2D::new(4.5, 0.0),
            Point2D::new(4.5, 3.0),
            2.8,
            0.12,
            false,
            false,
        )
        .unwrap();
        b.finalize();
        let findings = validate_structure(&b, &AnalysisConfig::default());
        assert!(findings
            .iter()
            .any(|f| f.message.contains("opening crosses wall")));
    }

    #[test]
    fn partition_through_elevator_shaft_is_error() {
        let mut b = base_building();
        for (name, s, e) in [
            ("Elevator West", (4.0, 1.0), (4.0, 3.0)),
            ("Elevator East", (6.0, 1.0), (6.0, 3.0)),
            ("Elevator North", (4.0, 3.0), (6.0, 3.0)),
            ("Elevator South", (4.0, 1.0), (6.0, 1.0)),
        ] {
            b.add_wall(
                "Ground",
                name,
                Point2D::new(s.0, s.1),
                Point2D::new(e.0, e.1),
                2.8,
                0.25,
                true,
                false,
            )
            .unwrap();
        }
        b.add_wall(
            "Ground",
            "Bathroom Wall",
            Point2D::new(5.0, 0.5),
            Point2D::new(5.0, 3.5),
            2.8,
            0.12,
            false,
            false,
        )
        .unwrap();
        b.finalize();
        let findings = validate_structure(&b, &AnalysisConfig::default());
        assert!(findings
            .iter()
            .any(|f| f.message.contains("crosses through elevator area")));
    }

    #[test]
    fn clean_story_has_no_findings() {
        let mut b = base_building();
        let wall = b.story("Ground").unwrap().walls[0].id.clone();
        b.add_door("Ground", "Entry", &wall, 2.0, 1.0, 2.1);
        b.add_window("Ground", "Window", &wall, 6.0, 1.2, 1.4, 0.9);
        b.finalize();
        let findings = validate_structure(&b, &AnalysisConfig::default());
        assert!(findings.is_empty());
    }
}
