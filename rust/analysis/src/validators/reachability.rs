// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Reachability over the connectivity graph.
//!
//! Builds the door graph per story and checks that nothing is stranded:
//! no isolated rooms, the staircase reachable from the entrance, every
//! apartment reachable from a corridor, and no habitable room that
//! can only be entered through another habitable room.

use rustc_hash::FxHashSet;

use planlint_model::Building;

use crate::config::AnalysisConfig;
use crate::finding::Finding;
use crate::graph::{build_connectivity_graph, ConnectivityGraph, EXTERIOR_NODE};

const HABITABLE_TYPES: [&str; 4] = ["living", "bedroom", "kitchen", "office"];

pub fn validate_reachability(building: &Building, config: &AnalysisConfig) -> Vec<Finding> {
    let mut findings = Vec::new();

    for story in &building.stories {
        if story.doors.is_empty() {
            continue;
        }
        let Ok(graph) = build_connectivity_graph(building, &story.name, config) else {
            continue;
        };

        check_isolated(&graph, &mut findings);
        check_staircase_access(&graph, &mut findings);
        check_corridor_serves_apartments(building, &graph, &mut findings);
        check_walk_through_rooms(&graph, &mut findings);
    }

    findings
}

fn check_isolated(graph: &ConnectivityGraph, findings: &mut Vec<Finding>) {
    for node in graph.isolated_nodes() {
        findings.push(Finding::error(
            "Space",
            node.name.clone(),
            format!(
                "'{}' ({}) on '{}' is isolated — no door connects it to the rest of the plan.",
                node.name, node.node_type, node.story
            ),
        ));
    }
}

/// The access set is everything one step from outside plus the common
/// circulation areas. Each staircase must be reachable from it.
fn access_set(graph: &ConnectivityGraph) -> Vec<String> {
    let mut set: Vec<String> = vec![EXTERIOR_NODE.to_string()];
    for (neighbor, _) in graph.neighbors(EXTERIOR_NODE) {
        set.push(neighbor.to_string());
    }
    for node_type in ["corridor", "lobby"] {
        for node in graph.nodes_of_type(node_type) {
            set.push(node.name.clone());
        }
    }
    set
}

fn check_staircase_access(graph: &ConnectivityGraph, findings: &mut Vec<Finding>) {
    let staircases = graph.nodes_of_type("staircase");
    if staircases.is_empty() {
        return;
    }
    let access = access_set(graph);
    for st in staircases {
        let reachable = access.iter().any(|a| graph.has_path(a, &st.name));
        if !reachable {
            findings.push(Finding::error(
                "Staircase",
                st.name.clone(),
                format!(
                    "Staircase '{}' on '{}' cannot be reached from the entrance or common areas.",
                    st.name, st.story
                ),
            ));
        }
    }
}

fn check_corridor_serves_apartments(
    building: &Building,
    graph: &ConnectivityGraph,
    findings: &mut Vec<Finding>,
) {
    let Some(story) = building.story(&graph.story) else {
        return;
    };
    if story.apartments.is_empty() {
        return;
    }
    let corridors = graph.nodes_of_type("corridor");
    if corridors.is_empty() {
        return;
    }
    let mut reachable: FxHashSet<String> = FxHashSet::default();
    for corridor in &corridors {
        reachable.extend(graph.reachable_from(&corridor.name));
    }

    for apt in &story.apartments {
        let served = apt.spaces.iter().any(|s| reachable.contains(&s.name));
        if !served {
            findings.push(Finding::error(
                "Apartment",
                apt.id.clone(),
                format!(
                    "Apartment '{}' on '{}' has no room reachable from a corridor.",
                    apt.name, graph.story
                ),
            ));
        }
    }
}

/// A habitable room whose only access runs through another habitable
/// room is a walk-through room (privacy defect, not a hard error).
fn check_walk_through_rooms(graph: &ConnectivityGraph, findings: &mut Vec<Finding>) {
    let avoid: FxHashSet<&str> = HABITABLE_TYPES.iter().copied().collect();
    let starts = access_set(graph);

    let mut direct: FxHashSet<String> = FxHashSet::default();
    for start in &starts {
        direct.extend(graph.reachable_avoiding(start, &avoid));
    }
    if direct.is_empty() {
        return;
    }

    for ty in HABITABLE_TYPES {
        for node in graph.nodes_of_type(ty) {
            if direct.contains(&node.name) {
                continue;
            }
            // Unreachable entirely: that is the isolation check's call.
            let connected = starts.iter().any(|s| graph.has_path(s, &node.name));
            if connected {
                findings.push(Finding::warning(
                    "Space",
                    node.name.clone(),
                    format!(
                        "Room '{}' ({}) on '{}' is only accessible through another habitable room — walk-through layout.",
                        node.name, node.node_type, node.story
                    ),
                ));
            }
        }
    }
}
