// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Internal apartment connectivity.
//!
//! Starting from the entry rooms (the Vorraum, or failing that any room
//! with a door to the corridor or lobby), every other room must be
//! reachable without leaving the apartment. Rooms connect through door
//! edges or, for open-plan layouts, through overlapping boundaries.

use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;

use planlint_model::{Apartment, Building, RoomType};

use crate::config::AnalysisConfig;
use crate::finding::Finding;
use crate::graph::{build_connectivity_graph, ConnectivityGraph};

pub fn validate_apartment_connectivity(
    building: &Building,
    config: &AnalysisConfig,
) -> Vec<Finding> {
    let mut findings = Vec::new();

    for story in &building.stories {
        if story.apartments.is_empty() || story.doors.is_empty() {
            continue;
        }
        let Ok(graph) = build_connectivity_graph(building, &story.name, config) else {
            continue;
        };
        for apt in &story.apartments {
            check_apartment(apt, &graph, &mut findings);
        }
    }

    findings
}

fn check_apartment(apt: &Apartment, graph: &ConnectivityGraph, findings: &mut Vec<Finding>) {
    if apt.spaces.len() < 2 {
        return;
    }
    let room_names: FxHashSet<&str> = apt.spaces.iter().map(|s| s.name.as_str()).collect();

    // Internal adjacency: door edges between two rooms of this
    // apartment, plus boundary overlap for open-plan connections.
    let mut adjacency: FxHashMap<&str, Vec<&str>> = FxHashMap::default();
    for edge in &graph.edges {
        let (a, b) = (edge.from_node.as_str(), edge.to_node.as_str());
        if room_names.contains(a) && room_names.contains(b) {
            adjacency.entry(a).or_default().push(b);
            adjacency.entry(b).or_default().push(a);
        }
    }
    for (i, left) in apt.spaces.iter().enumerate() {
        let lb = left.boundary.bounding_box();
        for right in &apt.spaces[i + 1..] {
            let rb = right.boundary.bounding_box();
            if lb.overlaps(&rb, 0.01) {
                adjacency
                    .entry(left.name.as_str())
                    .or_default()
                    .push(right.name.as_str());
                adjacency
                    .entry(right.name.as_str())
                    .or_default()
                    .push(left.name.as_str());
            }
        }
    }

    // Entry rooms: the Vorraum, or any room with a door to circulation.
    let mut entries: Vec<&str> = apt
        .spaces
        .iter()
        .filter(|s| s.room_type == RoomType::Hallway)
        .map(|s| s.name.as_str())
        .collect();
    if entries.is_empty() {
        let circulation: FxHashSet<&str> = graph
            .nodes
            .values()
            .filter(|n| n.node_type == "corridor" || n.node_type == "lobby")
            .map(|n| n.name.as_str())
            .collect();
        entries = graph
            .edges
            .iter()
            .filter_map(|e| {
                let (a, b) = (e.from_node.as_str(), e.to_node.as_str());
                if room_names.contains(a) && circulation.contains(b) {
                    Some(a)
                } else if room_names.contains(b) && circulation.contains(a) {
                    Some(b)
                } else {
                    None
                }
            })
            .collect();
    }
    if entries.is_empty() {
        // Missing entry door is the corridor validator's finding.
        return;
    }

    let mut reached: FxHashSet<&str> = FxHashSet::default();
    let mut queue: VecDeque<&str> = VecDeque::new();
    for entry in entries {
        if reached.insert(entry) {
            queue.push_back(entry);
        }
    }
    while let Some(current) = queue.pop_front() {
        if let Some(neighbors) = adjacency.get(current) {
            for &n in neighbors {
                if reached.insert(n) {
                    queue.push_back(n);
                }
            }
        }
    }

    let mut unreached: Vec<&str> = room_names.difference(&reached).copied().collect();
    unreached.sort_unstable();
    for name in unreached {
        findings.push(Finding::error(
            "Space",
            name.to_string(),
            format!(
                "Room '{}' in apartment '{}' is not reachable from the apartment entry.",
                name, apt.name
            ),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planlint_model::{Point2D, Polygon2D};

    fn building_with_rooms(with_bedroom_door: bool) -> Building {
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
        // Hallway and living overlap (open plan); the bedroom is walled
        // off behind the partition at x=6.
        b.add_apartment_space(
            "Ground",
            &apt,
            "Apt A Hallway",
            RoomType::Hallway,
            Polygon2D::rectangle(0.0, 0.0, 3.0, 8.0),
        );
        b.add_apartment_space(
            "Ground",
            &apt,
            "Apt A Living",
            RoomType::Living,
            Polygon2D::rectangle(2.9, 0.0, 6.0, 8.0),
        );
        b.add_apartment_space(
            "Ground",
            &apt,
            "Apt A Bedroom",
            RoomType::Bedroom,
            Polygon2D::rectangle(6.2, 0.0, 10.0, 8.0),
        );
        let partition = b
            .add_wall(
                "Ground",
                "Apt A Partition",
                Point2D::new(6.1, 0.0),
                Point2D::new(6.1, 8.0),
                2.8,
                0.12,
                false,
                false,
            )
            .unwrap();
        if with_bedroom_door {
            b.add_door("Ground", "Apt A Bedroom Door", &partition, 4.0, 0.8, 2.1);
        }
        b.finalize();
        b
    }

    #[test]
    fn door_and_open_plan_adjacency_connect_all_rooms() {
        let b = building_with_rooms(true);
        let findings = validate_apartment_connectivity(&b, &AnalysisConfig::default());
        assert!(findings.is_empty());
    }

    #[test]
    fn walled_off_bedroom_without_door_is_unreachable() {
        let b = building_with_rooms(false);
        let findings = validate_apartment_connectivity(&b, &AnalysisConfig::default());
        assert_eq!(findings.len(), 1);
        assert!(findings[0]
            .message
            .contains("'Apt A Bedroom' in apartment 'Apt A' is not reachable"));
    }
}
