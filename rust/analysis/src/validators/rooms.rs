// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Apartment and room rules: required rooms, dimensions, ratios,
//! enclosure.
//!
//! Dimension rules approximate rooms by their bounding boxes, which is
//! exact for the rectangular rooms the generators produce and a safe
//! overestimate for L-shaped ones.

use planlint_model::{Apartment, Building, Rect, RoomType, Space, Story, Wall};

use crate::config::AnalysisConfig;
use crate::finding::Finding;

pub fn validate_rooms(building: &Building, config: &AnalysisConfig) -> Vec<Finding> {
    let mut findings = Vec::new();

    for story in &building.stories {
        let building_depth = story
            .walls
            .iter()
            .filter(|w| w.is_external)
            .map(|w| w.start.y.max(w.end.y))
            .fold(0.0_f64, f64::max);
        let building_width = story
            .walls
            .iter()
            .filter(|w| w.is_external)
            .map(|w| w.start.x.max(w.end.x))
            .fold(0.0_f64, f64::max);

        for apt in &story.apartments {
            check_required_rooms(story, apt, &mut findings);
            check_rooms_inside_boundary(apt, &mut findings);
            check_apartment_shape(apt, config, &mut findings);
            check_bedrooms(apt, config, &mut findings);
            check_facade_access(story, apt, building_depth, &mut findings);
            check_vorraum_share(apt, config, &mut findings);
            check_wet_room_shaft(apt, &mut findings);
            check_room_dimensions(apt, config, &mut findings);
            check_bathroom_enclosure(story, apt, config, &mut findings);
            check_room_doors(story, apt, &mut findings);
            check_alcoves(apt, &mut findings);
        }

        check_living_share(story, building_width * building_depth, config, &mut findings);
    }

    findings
}

fn bbox(space: &Space) -> Rect {
    space.boundary.bounding_box()
}

fn check_required_rooms(story: &Story, apt: &Apartment, findings: &mut Vec<Finding>) {
    if !apt.has_kitchen() {
        findings.push(Finding::error(
            "Apartment",
            apt.id.clone(),
            format!("Apartment '{}' has no kitchen.", apt.name),
        ));
    }
    if !apt.has_bathroom() {
        findings.push(Finding::error(
            "Apartment",
            apt.id.clone(),
            format!("Apartment '{}' has no bathroom.", apt.name),
        ));
    }
    if apt.spaces_of_type(RoomType::Living).is_empty() {
        findings.push(Finding::error(
            "Apartment",
            apt.id.clone(),
            format!(
                "Apartment '{}' has no living room. Every dwelling needs at least one habitable main room.",
                apt.name
            ),
        ));
    }
    if !apt.spaces.iter().any(|s| s.room_type.is_habitable()) {
        let kinds: Vec<&str> = apt.spaces.iter().map(|s| s.room_type.label()).collect();
        findings.push(Finding::error(
            "Apartment",
            apt.id.clone(),
            format!(
                "Apartment '{}' has no habitable rooms — only service rooms ({}). This is not a dwelling.",
                apt.name,
                kinds.join(", ")
            ),
        ));
    }
    // Two or more bedrooms require a separate WC.
    let bedrooms = apt.spaces_of_type(RoomType::Bedroom).len();
    if bedrooms >= 2 && apt.spaces_of_type(RoomType::Toilet).is_empty() {
        findings.push(Finding::error(
            "Apartment",
            apt.id.clone(),
            format!(
                "Apartment '{}' on '{}' has {} bedrooms but no separate WC. Mandatory for 2+ bedroom apartments.",
                apt.name, story.name, bedrooms
            ),
        ));
    }
}

/// A room whose center lies outside the apartment box (0.3 m slack for
/// wall thickness) is physically disconnected from it.
fn check_rooms_inside_boundary(apt: &Apartment, findings: &mut Vec<Finding>) {
    let b = apt.boundary.bounding_box();
    for space in &apt.spaces {
        let c = space.boundary.centroid();
        if !b.contains_with_margin(c.x, c.y, 0.3) {
            findings.push(Finding::error(
                "Space",
                space.id.clone(),
                format!(
                    "Room '{}' ({}) center at ({:.1},{:.1}) is outside apartment '{}' boundary (x={:.1}->{:.1}, y={:.1}->{:.1}). Room is physically disconnected from apartment.",
                    space.name,
                    space.room_type.label(),
                    c.x,
                    c.y,
                    apt.name,
                    b.min_x,
                    b.max_x,
                    b.min_y,
                    b.max_y
                ),
            ));
        }
    }
}

fn check_apartment_shape(apt: &Apartment, config: &AnalysisConfig, findings: &mut Vec<Finding>) {
    let b = apt.boundary.bounding_box();
    let width = b.width();
    let depth = b.height();

    // Studios are exempt from the facade minimum.
    let is_studio = apt.spaces_of_type(RoomType::Bedroom).is_empty();
    if !is_studio && width < config.min_facade_width - 0.01 {
        findings.push(Finding::error(
            "Apartment",
            apt.id.clone(),
            format!(
                "Apartment '{}' has {:.2}m facade — minimum for 2-room apartment is {:.2}m.",
                apt.name, width, config.min_facade_width
            ),
        ));
    }

    if width > 0.0 {
        let ratio = depth / width;
        if ratio > config.max_room_ratio {
            findings.push(Finding::warning(
                "Apartment",
                apt.id.clone(),
                format!(
                    "Apartment '{}' depth:width ratio is {:.2} (max {}) — 'tunnel' apartment.",
                    apt.name, ratio, config.max_room_ratio
                ),
            ));
        }
    }
}

fn check_bedrooms(apt: &Apartment, config: &AnalysisConfig, findings: &mut Vec<Finding>) {
    for (i, br) in apt.spaces_of_type(RoomType::Bedroom).into_iter().enumerate() {
        let b = bbox(br);
        let is_master = i == 0 || br.name.to_lowercase().contains("master");
        let (min_width, min_area, label) = if is_master {
            (
                config.master_bedroom_min_width,
                config.master_bedroom_min_area,
                "master",
            )
        } else {
            (
                config.child_bedroom_min_width,
                config.child_bedroom_min_area,
                "child",
            )
        };

        // Width measured along the facade (x axis).
        if b.width() < min_width - 0.01 {
            findings.push(Finding::error(
                "Space",
                br.id.clone(),
                format!(
                    "Bedroom '{}' width is {:.2}m — minimum is {}m ({label}).",
                    br.name,
                    b.width(),
                    min_width
                ),
            ));
        }
        if br.area() < min_area - 0.01 {
            findings.push(Finding::error(
                "Space",
                br.id.clone(),
                format!(
                    "Bedroom '{}' area is {:.1}m² — minimum is {}m² ({label}).",
                    br.name,
                    br.area(),
                    min_area
                ),
            ));
        }
    }
}

/// Habitable rooms need windows, so they must touch the south or north
/// facade. Dark rooms (bath, WC, hallway, storage) are exempt.
fn check_facade_access(
    story: &Story,
    apt: &Apartment,
    building_depth: f64,
    findings: &mut Vec<Finding>,
) {
    for space in &apt.spaces {
        if matches!(
            space.room_type,
            RoomType::Bathroom
                | RoomType::Toilet
                | RoomType::Hallway
                | RoomType::Corridor
                | RoomType::Storage
        ) {
            continue;
        }
        let b = bbox(space);
        let touches_facade =
            b.min_y.abs() < 0.01 || (b.max_y - building_depth).abs() < 0.01;
        if !touches_facade {
            findings.push(Finding::error(
                "Space",
                space.id.clone(),
                format!(
                    "Room '{}' ({}) on '{}' has no facade access — habitable rooms need windows.",
                    space.name,
                    space.room_type.label(),
                    story.name
                ),
            ));
        }
    }
}

fn check_vorraum_share(apt: &Apartment, config: &AnalysisConfig, findings: &mut Vec<Finding>) {
    let vorraum_area: f64 = apt
        .spaces_of_type(RoomType::Hallway)
        .iter()
        .map(|s| s.area())
        .sum();
    let apt_area = apt.area();
    if apt_area > 0.0 && vorraum_area > apt_area * config.max_vorraum_share + 0.01 {
        findings.push(Finding::warning(
            "Apartment",
            apt.id.clone(),
            format!(
                "Apartment '{}' Vorraum area {:.1}m² is {:.1}% of apartment area — target is ≤ {:.0}%.",
                apt.name,
                vorraum_area,
                vorraum_area / apt_area * 100.0,
                config.max_vorraum_share * 100.0
            ),
        ));
    }
}

/// Kitchen and bathroom should share an installation shaft, meaning
/// their boxes share an edge coordinate on either axis.
fn check_wet_room_shaft(apt: &Apartment, findings: &mut Vec<Finding>) {
    let kitchens = apt.spaces_of_type(RoomType::Kitchen);
    let bathrooms = apt.spaces_of_type(RoomType::Bathroom);
    let (Some(kitchen), Some(bathroom)) = (kitchens.first(), bathrooms.first()) else {
        return;
    };
    let k = bbox(kitchen);
    let b = bbox(bathroom);

    let close = |a: f64, b: f64| (a - b).abs() < 0.1;
    let shared_x = close(k.max_x, b.max_x)
        || close(k.min_x, b.min_x)
        || close(k.max_x, b.min_x)
        || close(k.min_x, b.max_x);
    let shared_y = close(k.max_y, b.max_y)
        || close(k.min_y, b.min_y)
        || close(k.max_y, b.min_y)
        || close(k.min_y, b.max_y);

    if !(shared_x || shared_y) {
        findings.push(Finding::optimization(
            "Apartment",
            apt.id.clone(),
            format!(
                "Apartment '{}' wet rooms (kitchen + bathroom) are not on the same installation shaft.",
                apt.name
            ),
        ));
    }
}

fn check_room_dimensions(apt: &Apartment, config: &AnalysisConfig, findings: &mut Vec<Finding>) {
    let bedroom_count = apt.spaces_of_type(RoomType::Bedroom).len();

    for space in &apt.spaces {
        let b = bbox(space);
        let (w, h) = (b.width(), b.height());

        // Tunnel check applies to habitable main rooms only; service
        // rooms are naturally narrow.
        if !matches!(
            space.room_type,
            RoomType::Hallway
                | RoomType::Corridor
                | RoomType::Storage
                | RoomType::Toilet
                | RoomType::Bathroom
                | RoomType::Kitchen
        ) && w > 0.0
            && h > 0.0
        {
            let ratio = w.max(h) / w.min(h);
            let narrow = w.min(h);
            if ratio > config.max_room_ratio && narrow < config.tunnel_exemption_width {
                findings.push(Finding::warning(
                    "Space",
                    space.id.clone(),
                    format!(
                        "Room '{}' aspect ratio is {:.2} (max {}) — tunnel-shaped room.",
                        space.name, ratio, config.max_room_ratio
                    ),
                ));
            }
        }

        match space.room_type {
            RoomType::Living => {
                let facade_width = w.max(h);
                let min_width = if bedroom_count >= 2 { 4.00 } else { 3.60 };
                let label = if bedroom_count >= 2 { "3+ room" } else { "2-room" };
                if facade_width < min_width - 0.01 {
                    findings.push(Finding::warning(
                        "Space",
                        space.id.clone(),
                        format!(
                            "Living room '{}' facade width is {:.2}m — minimum {:.2}m for {label} apartment.",
                            space.name, facade_width, min_width
                        ),
                    ));
                }
            }
            RoomType::Kitchen => {
                // Two 60 cm counters plus a 1 m passage.
                if w.min(h) < 2.20 - 0.01 {
                    findings.push(Finding::warning(
                        "Space",
                        space.id.clone(),
                        format!(
                            "Kitchen '{}' width is {:.2}m — minimum 2.20m for two-counter layout.",
                            space.name,
                            w.min(h)
                        ),
                    ));
                }
            }
            RoomType::Toilet => {
                if w.min(h) < 0.90 - 0.01 {
                    findings.push(Finding::warning(
                        "Space",
                        space.id.clone(),
                        format!(
                            "WC '{}' width is {:.2}m — minimum 0.90m.",
                            space.name,
                            w.min(h)
                        ),
                    ));
                }
            }
            _ => {}
        }

        if let Some(min_area) = space.room_type.min_area() {
            if space.area() < min_area - 0.01 && space.room_type != RoomType::Bedroom {
                // Bedrooms have their own master/child minimums.
                findings.push(Finding::warning(
                    "Space",
                    space.id.clone(),
                    format!(
                        "Room '{}' ({}) area is {:.1}m² — minimum is {}m².",
                        space.name,
                        space.room_type.label(),
                        space.area(),
                        min_area
                    ),
                ));
            }
        }
    }

    for bath in apt.spaces_of_type(RoomType::Bathroom) {
        if bath.area() < config.min_bathroom_area - 0.01 {
            findings.push(Finding::warning(
                "Space",
                bath.id.clone(),
                format!(
                    "Bathroom '{}' area is {:.1}m² — minimum for adaptable housing is {}m².",
                    bath.name,
                    bath.area(),
                    config.min_bathroom_area
                ),
            ));
        }
    }
}

/// A wall "covers" a box edge when its centerline lies within tolerance
/// of the edge coordinate and spans at least half the edge length.
fn edge_has_wall(
    walls: &[Wall],
    coord: f64,
    start: f64,
    end: f64,
    horizontal: bool,
    tolerance: f64,
) -> bool {
    let edge_length = end - start;
    if edge_length <= 0.0 {
        return false;
    }
    walls.iter().any(|wall| {
        let (axis_mid, lo, hi) = if horizontal {
            (
                (wall.start.y + wall.end.y) / 2.0,
                wall.start.x.min(wall.end.x),
                wall.start.x.max(wall.end.x),
            )
        } else {
            (
                (wall.start.x + wall.end.x) / 2.0,
                wall.start.y.min(wall.end.y),
                wall.start.y.max(wall.end.y),
            )
        };
        if (axis_mid - coord).abs() > tolerance {
            return false;
        }
        let overlap = hi.min(end) - lo.max(start);
        overlap / edge_length >= 0.5
    })
}

fn check_bathroom_enclosure(
    story: &Story,
    apt: &Apartment,
    config: &AnalysisConfig,
    findings: &mut Vec<Finding>,
) {
    for bath in apt.spaces_of_type(RoomType::Bathroom) {
        let b = bbox(bath);
        let tol = config.enclosure_tolerance;
        let edges = [
            ("south", b.min_y, b.min_x, b.max_x, true),
            ("north", b.max_y, b.min_x, b.max_x, true),
            ("west", b.min_x, b.min_y, b.max_y, false),
            ("east", b.max_x, b.min_y, b.max_y, false),
        ];
        let missing: Vec<&str> = edges
            .iter()
            .filter(|(_, coord, start, end, horizontal)| {
                !edge_has_wall(&story.walls, *coord, *start, *end, *horizontal, tol)
            })
            .map(|(name, ..)| *name)
            .collect();
        if !missing.is_empty() {
            findings.push(Finding::error(
                "Space",
                bath.id.clone(),
                format!(
                    "Bathroom '{}' on '{}' is not fully enclosed — missing wall(s) on: {}. Bathrooms must be walled off for privacy/plumbing.",
                    bath.name,
                    story.name,
                    missing.join(", ")
                ),
            ));
        }
    }
}

/// Bedrooms, bathrooms, and WCs must have a door; matched by room type
/// or the room name's last token appearing in a door name belonging to
/// the apartment.
fn check_room_doors(story: &Story, apt: &Apartment, findings: &mut Vec<Finding>) {
    let apt_needle = apt.name.to_lowercase();
    let door_names: Vec<String> = story
        .doors
        .iter()
        .filter(|d| d.name.to_lowercase().contains(&apt_needle))
        .map(|d| d.name.to_lowercase())
        .collect();

    for space in &apt.spaces {
        if !matches!(
            space.room_type,
            RoomType::Bedroom | RoomType::Bathroom | RoomType::Toilet
        ) {
            continue;
        }
        let type_label = space.room_type.label();
        let room_token = space
            .name
            .to_lowercase()
            .split_whitespace()
            .last()
            .unwrap_or_default()
            .to_string();
        let has_door = door_names
            .iter()
            .any(|name| name.contains(type_label) || name.contains(&room_token));
        if !has_door {
            findings.push(Finding::error(
                "Space",
                space.id.clone(),
                format!(
                    "Room '{}' ({}) on '{}' has no door. Every enclosed room needs a door for access.",
                    space.name, type_label, story.name
                ),
            ));
        }
    }
}

/// L-shaped habitable rooms whose alcove likely lacks daylight.
fn check_alcoves(apt: &Apartment, findings: &mut Vec<Finding>) {
    for space in &apt.spaces {
        if !matches!(space.room_type, RoomType::Living | RoomType::Bedroom) {
            continue;
        }
        let verts = space.boundary.vertices();
        if verts.len() <= 4 {
            continue; // rectangle, no alcove
        }
        let b = bbox(space);
        let bbox_area = b.area();
        let actual = space.area();
        if actual < bbox_area * 0.95 {
            let alcove = bbox_area - actual;
            findings.push(Finding::optimization(
                "Space",
                space.id.clone(),
                format!(
                    "L-shaped room '{}' in '{}' ({} vertices, {:.1}m² of {:.1}m² bbox). Alcove ~{:.1}m² may lack natural light. Consider converting to storage or redesigning layout.",
                    space.name,
                    apt.name,
                    verts.len(),
                    actual,
                    bbox_area,
                    alcove
                ),
            ));
        }
    }
}

fn check_living_share(
    story: &Story,
    building_area: f64,
    config: &AnalysisConfig,
    findings: &mut Vec<Finding>,
) {
    if building_area <= 0.0 || story.apartments.is_empty() {
        return;
    }
    let living_area: f64 = story.apartments.iter().map(|a| a.area()).sum();
    let ratio = living_area / building_area;
    if ratio < config.min_living_share {
        findings.push(Finding::warning(
            "Story",
            story.name.clone(),
            format!(
                "Story '{}' living-area/BGF is {:.2} ({:.1}m² / {:.1}m²) — target is ≥ {:.2}.",
                story.name, ratio, living_area, building_area, config.min_living_share
            ),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planlint_model::{Point2D, Polygon2D};

    fn building_with_apartment() -> (Building, String) {
        let mut b = Building::new("Test");
        b.add_story("Ground", 3.0);
        for (name, s, e) in [
            ("South", (0.0, 0.0), (10.0, 0.0)),
            ("East", (10.0, 0.0), (10.0, 8.0)),
            ("North", (10.0, 8.0), (0.0, 8.0)),
            ("West", (0.0, 8.0), (0.0, 0.0)),
        ] {
            b.add_wall(
                "Ground",
                name,
                Point2D::new(s.0, s.1),
                Point2D::new(e.0, e.1),
                2.8,
                0.3,
                true,
                true,
            )
            .unwrap();
        }
        let apt = b.add_apartment("Ground", "Apt A", Polygon2D::rectangle(0.0, 0.0, 10.0, 8.0));
        (b, apt)
    }

    #[test]
    fn missing_kitchen_and_bathroom_are_errors() {
        let (mut b, apt) = building_with_apartment();
        b.add_apartment_space(
            "Ground",
            &apt,
            "Apt A Living",
            RoomType::Living,
            Polygon2D::rectangle(0.0, 0.0, 5.0, 4.0),
        );
        b.finalize();
        let findings = validate_rooms(&b, &AnalysisConfig::default());
        assert!(findings.iter().any(|f| f.message.contains("no kitchen")));
        assert!(findings.iter().any(|f| f.message.contains("no bathroom")));
    }

    #[test]
    fn undersized_master_bedroom_flags_width_and_area() {
        let (mut b, apt) = building_with_apartment();
        b.add_apartment_space(
            "Ground",
            &apt,
            "Apt A Bedroom",
            RoomType::Bedroom,
            Polygon2D::rectangle(0.0, 0.0, 2.5, 3.0),
        );
        b.finalize();
        let findings = validate_rooms(&b, &AnalysisConfig::default());
        assert!(findings
            .iter()
            .any(|f| f.message.contains("width is 2.50m")));
        assert!(findings.iter().any(|f| f.message.contains("area is 7.5m²")));
    }

    #[test]
    fn tunnel_room_warned_unless_wide() {
        let (mut b, apt) = building_with_apartment();
        // 6.0 x 2.0: ratio 3.0, narrow dim 2.0 < exemption.
        b.add_apartment_space(
            "Ground",
            &apt,
            "Apt A Living",
            RoomType::Living,
            Polygon2D::rectangle(0.0, 0.0, 6.0, 2.0),
        );
        // 6.0 x 3.2: ratio 1.88 but narrow dim over the exemption floor.
        b.add_apartment_space(
            "Ground",
            &apt,
            "Apt A Bedroom",
            RoomType::Bedroom,
            Polygon2D::rectangle(0.0, 4.8, 6.0, 8.0),
        );
        b.finalize();
        let findings = validate_rooms(&b, &AnalysisConfig::default());
        let tunnels: Vec<_> = findings
            .iter()
            .filter(|f| f.message.contains("tunnel-shaped"))
            .collect();
        assert_eq!(tunnels.len(), 1);
        assert!(tunnels[0].message.contains("Apt A Living"));
    }

    #[test]
    fn interior_bathroom_allowed_but_interior_bedroom_flagged() {
        let (mut b, apt) = building_with_apartment();
        b.add_apartment_space(
            "Ground",
            &apt,
            "Apt A Bathroom",
            RoomType::Bathroom,
            Polygon2D::rectangle(3.0, 3.0, 5.5, 5.0),
        );
        b.add_apartment_space(
            "Ground",
            &apt,
            "Apt A Bedroom",
            RoomType::Bedroom,
            Polygon2D::rectangle(6.0, 3.0, 9.5, 6.5),
        );
        b.finalize();
        let findings = validate_rooms(&b, &AnalysisConfig::default());
        let facade: Vec<_> = findings
            .iter()
            .filter(|f| f.message.contains("no facade access"))
            .collect();
        assert_eq!(facade.len(), 1);
        assert!(facade[0].message.contains("Apt A Bedroom"));
    }

    #[test]
    fn bathroom_enclosure_names_missing_sides() {
        let (mut b, apt) = building_with_apartment();
        b.add_apartment_space(
            "Ground",
            &apt,
            "Apt A Bathroom",
            RoomType::Bathroom,
            Polygon2D::rectangle(0.0, 0.0, 2.5, 2.2),
        );
        // Walls on south (exterior), west (exterior), and north only.
        b.add_wall(
            "Ground",
            "Bath North",
            Point2D::new(0.0, 2.2),
            Point2D::new(2.5, 2.2),
            2.8,
            0.12,
            false,
            false,
        )
        .unwrap();
        // A door so the no-door rule stays quiet.
        let north_id = b
            .story("Ground")
            .unwrap()
            .wall_by_name("Bath North")
            .unwrap()
            .id
            .clone();
        b.add_door("Ground", "Apt A Bathroom Door", &north_id, 0.8, 0.8, 2.1);
        b.finalize();
        let findings = validate_rooms(&b, &AnalysisConfig::default());
        let enclosure: Vec<_> = findings
            .iter()
            .filter(|f| f.message.contains("not fully enclosed"))
            .collect();
        assert_eq!(enclosure.len(), 1);
        assert!(enclosure[0].message.contains("east"));
        assert!(!enclosure[0].message.contains("west"));
    }

    #[test]
    fn bedroom_without_door_is_error() {
        let (mut b, apt) = building_with_apartment();
        b.add_apartment_space(
            "Ground",
            &apt,
            "Apt A Bedroom",
            RoomType::Bedroom,
            Polygon2D::rectangle(0.0, 4.0, 4.0, 8.0),
        );
        b.finalize();
        let findings = validate_rooms(&b, &AnalysisConfig::default());
        assert!(findings
            .iter()
            .any(|f| f.message.contains("has no door")));
    }

    #[test]
    fn l_shaped_room_gets_alcove_hint() {
        let (mut b, apt) = building_with_apartment();
        let l_shape = Polygon2D::new(vec![
            Point2D::new(0.0, 0.0),
            Point2D::new(6.0, 0.0),
            Point2D::new(6.0, 2.0),
            Point2D::new(3.0, 2.0),
            Point2D::new(3.0, 5.0),
            Point2D::new(0.0, 5.0),
        ])
        .unwrap();
        b.add_apartment_space("Ground", &apt, "Apt A Living", RoomType::Living, l_shape);
        b.finalize();
        let findings = validate_rooms(&b, &AnalysisConfig::default());
        assert!(findings
            .iter()
            .any(|f| f.message.contains("L-shaped room 'Apt A Living'")));
    }
}
