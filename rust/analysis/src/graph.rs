// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Room connectivity graph: nodes are zones, edges are doors.
//!
//! The hard part is deciding which two regions a door connects. The
//! builder steps a fixed offset to both sides of the host wall along its
//! normal and resolves each probe point to a zone; a probe outside the
//! building envelope resolves to the "Exterior" pseudo-node.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::debug;

use planlint_model::geometry::point_in_polygon;
use planlint_model::{Building, Rect, Story};

use crate::config::AnalysisConfig;
use crate::error::{Error, Result};
use crate::zones::{collect_zones, resolve_zone};

pub const EXTERIOR_NODE: &str = "Exterior";

/// A node in the connectivity graph (a room, common area, or Exterior).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphNode {
    pub name: String,
    /// Room type or special tag: "corridor", "lobby", "vestibule",
    /// "elevator", "staircase", "exterior", "unknown".
    pub node_type: String,
    pub area: f64,
    pub story: String,
}

/// An edge in the connectivity graph (a door connecting two nodes).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphEdge {
    pub door_name: String,
    pub door_width: f64,
    pub from_node: String,
    pub to_node: String,
}

/// Room connectivity graph for one story. Undirected: edges store both
/// endpoints and traversal treats them symmetrically.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConnectivityGraph {
    pub story: String,
    pub nodes: FxHashMap<String, GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl ConnectivityGraph {
    pub fn new(story: impl Into<String>) -> Self {
        Self {
            story: story.into(),
            nodes: FxHashMap::default(),
            edges: Vec::new(),
        }
    }

    /// All neighbors of a node together with the connecting edge.
    pub fn neighbors<'a>(&'a self, node: &str) -> Vec<(&'a str, &'a GraphEdge)> {
        let mut result = Vec::new();
        for edge in &self.edges {
            if edge.from_node == node {
                result.push((edge.to_node.as_str(), edge));
            } else if edge.to_node == node {
                result.push((edge.from_node.as_str(), edge));
            }
        }
        result
    }

    /// BFS path existence, trivially true for `start == end`.
    pub fn has_path(&self, start: &str, end: &str) -> bool {
        if !self.nodes.contains_key(start) || !self.nodes.contains_key(end) {
            return false;
        }
        if start == end {
            return true;
        }
        let mut visited = FxHashSet::default();
        visited.insert(start);
        let mut queue = VecDeque::from([start]);
        while let Some(current) = queue.pop_front() {
            for (neighbor, _) in self.neighbors(current) {
                if neighbor == end {
                    return true;
                }
                if visited.insert(neighbor) {
                    queue.push_back(neighbor);
                }
            }
        }
        false
    }

    /// All nodes reachable from `start`, including `start` itself.
    pub fn reachable_from(&self, start: &str) -> FxHashSet<String> {
        let mut visited = FxHashSet::default();
        if !self.nodes.contains_key(start) {
            return visited;
        }
        visited.insert(start.to_string());
        let mut queue = VecDeque::from([start.to_string()]);
        while let Some(current) = queue.pop_front() {
            for (neighbor, _) in self.neighbors(&current) {
                if !visited.contains(neighbor) {
                    visited.insert(neighbor.to_string());
                    queue.push_back(neighbor.to_string());
                }
            }
        }
        visited
    }

    /// BFS that may reach a node whose type is in `avoid_types` but will
    /// not traverse through it to further nodes. Used to detect rooms
    /// only reachable by walking through another room of an avoided
    /// type.
    pub fn reachable_avoiding(
        &self,
        start: &str,
        avoid_types: &FxHashSet<&str>,
    ) -> FxHashSet<String> {
        let mut visited = FxHashSet::default();
        if !self.nodes.contains_key(start) {
            return visited;
        }
        visited.insert(start.to_string());
        let mut queue = VecDeque::from([start.to_string()]);
        while let Some(current) = queue.pop_front() {
            for (neighbor, _) in self.neighbors(&current) {
                if visited.contains(neighbor) {
                    continue;
                }
                visited.insert(neighbor.to_string());
                let traversable = self
                    .nodes
                    .get(neighbor)
                    .map(|n| !avoid_types.contains(n.node_type.as_str()))
                    .unwrap_or(false);
                if traversable {
                    queue.push_back(neighbor.to_string());
                }
            }
        }
        visited
    }

    /// Node names appearing in no edge. The Exterior anchor is exempt:
    /// it is considered connected by convention.
    pub fn isolated_nodes(&self) -> Vec<&GraphNode> {
        let mut connected: FxHashSet<&str> = FxHashSet::default();
        for edge in &self.edges {
            connected.insert(edge.from_node.as_str());
            connected.insert(edge.to_node.as_str());
        }
        let mut isolated: Vec<&GraphNode> = self
            .nodes
            .values()
            .filter(|n| n.name != EXTERIOR_NODE && !connected.contains(n.name.as_str()))
            .collect();
        isolated.sort_by(|a, b| a.name.cmp(&b.name));
        isolated
    }

    /// Node names of a given type, sorted for deterministic iteration.
    pub fn nodes_of_type(&self, node_type: &str) -> Vec<&GraphNode> {
        let mut nodes: Vec<&GraphNode> = self
            .nodes
            .values()
            .filter(|n| n.node_type == node_type)
            .collect();
        nodes.sort_by(|a, b| a.name.cmp(&b.name));
        nodes
    }
}

/// True when the probe point lies outside the building footprint,
/// judged by the exterior-wall bounding box with a 1 cm margin, falling
/// back to floor slab outlines when no exterior walls exist.
fn is_outside_building(px: f64, py: f64, story: &Story) -> bool {
    let mut bbox = Rect::empty();
    let mut has_exterior = false;
    for w in story.walls.iter().filter(|w| w.is_external) {
        has_exterior = true;
        bbox.expand(&w.start);
        bbox.expand(&w.end);
    }
    if has_exterior {
        return !bbox.contains_with_margin(px, py, 0.01);
    }

    for slab in story.slabs.iter().filter(|s| s.is_floor) {
        if point_in_polygon(px, py, slab.outline.vertices()) {
            return false;
        }
    }
    true
}

/// Builds the room connectivity graph for one story.
///
/// Every zone becomes a node up front, plus the Exterior pseudo-node.
/// Each door then contributes at most one edge: doors whose host wall is
/// missing, whose probes land in the same zone, or whose probes both
/// stay unresolved are skipped.
pub fn build_connectivity_graph(
    building: &Building,
    story_name: &str,
    config: &AnalysisConfig,
) -> Result<ConnectivityGraph> {
    let story = building
        .story(story_name)
        .ok_or_else(|| Error::StoryNotFound(story_name.to_string()))?;

    let zones = collect_zones(story);
    let mut graph = ConnectivityGraph::new(story_name);

    for zone in &zones {
        graph.nodes.insert(
            zone.name.clone(),
            GraphNode {
                name: zone.name.clone(),
                node_type: zone.kind.label().to_string(),
                area: zone.area,
                story: story_name.to_string(),
            },
        );
    }
    graph.nodes.insert(
        EXTERIOR_NODE.to_string(),
        GraphNode {
            name: EXTERIOR_NODE.to_string(),
            node_type: "exterior".to_string(),
            area: 0.0,
            story: story_name.to_string(),
        },
    );

    for door in &story.doors {
        let Some(wall) = story.wall(&door.wall_id) else {
            debug!(door = %door.tag, wall = %door.wall_id, "door host wall missing, skipped");
            continue;
        };

        let center = wall.point_at_offset(door.position + door.width / 2.0);
        let normal = wall.normal();
        let step = config.probe_step;
        let side_a = (center.x + normal.0 * step, center.y + normal.1 * step);
        let side_b = (center.x - normal.0 * step, center.y - normal.1 * step);

        // Doors on common-area walls bias overlap resolution toward the
        // common-area zone rather than an overlapping apartment room.
        let prefer_common = wall.role.is_common();

        let zone_a = resolve_zone(
            side_a.0,
            side_a.1,
            &zones,
            config.zone_edge_tolerance,
            prefer_common,
        )
        .map(|z| z.name.clone());
        let zone_b = resolve_zone(
            side_b.0,
            side_b.1,
            &zones,
            config.zone_edge_tolerance,
            prefer_common,
        )
        .map(|z| z.name.clone());

        let resolve_side = |zone: Option<String>, point: (f64, f64)| -> Option<String> {
            zone.or_else(|| {
                is_outside_building(point.0, point.1, story).then(|| EXTERIOR_NODE.to_string())
            })
        };
        let from_node = resolve_side(zone_a, side_a);
        let to_node = resolve_side(zone_b, side_b);

        let (Some(from_node), Some(to_node)) = (from_node, to_node) else {
            debug!(door = %door.tag, "both probe sides unresolved, edge skipped");
            continue;
        };
        if from_node == to_node {
            // Door opens into the same region on both sides.
            continue;
        }

        for name in [&from_node, &to_node] {
            if !graph.nodes.contains_key(name) {
                graph.nodes.insert(
                    name.clone(),
                    GraphNode {
                        name: name.clone(),
                        node_type: "unknown".to_string(),
                        area: 0.0,
                        story: story_name.to_string(),
                    },
                );
            }
        }

        graph.edges.push(GraphEdge {
            door_name: if door.name.is_empty() {
                door.tag.clone()
            } else {
                door.name.clone()
            },
            door_width: door.width,
            from_node,
            to_node,
        });
    }

    debug!(
        story = story_name,
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        "connectivity graph built"
    );
    Ok(graph)
}
