// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Zone synthesis: turning a story into a flat list of closed regions.
//!
//! Declared rooms become zones directly from their boundaries. Common
//! areas (corridor, lobby, vestibule, elevator core) have no declared
//! boundary, only named walls, so their zones are synthesized as the
//! axis-aligned bounding box of each role group's wall endpoints. The
//! boxes are deliberately coarse; the overlap resolution in
//! [`resolve_zone`] exists to bias ambiguous probes toward the most
//! specific region.

use planlint_model::geometry::{point_in_polygon, point_in_polygon_with_tolerance};
use planlint_model::{Point2D, Rect, RoomType, Story, Wall, WallRole};

/// What kind of region a zone represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneKind {
    Room(RoomType),
    Corridor,
    Lobby,
    Vestibule,
    Elevator,
    Staircase,
}

impl ZoneKind {
    /// Common-area kinds are preferred during overlap resolution for
    /// doors hosted on common-area walls.
    pub fn is_common(&self) -> bool {
        matches!(
            self,
            ZoneKind::Corridor
                | ZoneKind::Lobby
                | ZoneKind::Vestibule
                | ZoneKind::Elevator
                | ZoneKind::Staircase
        )
    }

    /// Graph node type tag.
    pub fn label(&self) -> &'static str {
        match self {
            ZoneKind::Room(rt) => rt.label(),
            ZoneKind::Corridor => "corridor",
            ZoneKind::Lobby => "lobby",
            ZoneKind::Vestibule => "vestibule",
            ZoneKind::Elevator => "elevator",
            ZoneKind::Staircase => "staircase",
        }
    }
}

/// A closed region used for probe-point containment. Created fresh per
/// run, never written back into the model.
#[derive(Debug, Clone)]
pub struct Zone {
    pub name: String,
    pub kind: ZoneKind,
    pub vertices: Vec<Point2D>,
    pub area: f64,
}

impl Zone {
    fn from_rect(name: &str, kind: ZoneKind, rect: Rect) -> Self {
        Zone {
            name: name.to_string(),
            kind,
            vertices: rect.corners(),
            area: rect.area(),
        }
    }
}

fn wall_group_bbox(walls: &[&Wall]) -> Rect {
    let mut rect = Rect::empty();
    for w in walls {
        rect.expand(&w.start);
        rect.expand(&w.end);
    }
    rect
}

/// Bounding-box zone for a role group; degenerate boxes under 1 cm in
/// either dimension are dropped.
fn zone_from_walls(walls: &[&Wall], name: &str, kind: ZoneKind) -> Option<Zone> {
    if walls.is_empty() {
        return None;
    }
    let rect = wall_group_bbox(walls);
    if rect.width() < 0.01 || rect.height() < 0.01 {
        return None;
    }
    Some(Zone::from_rect(name, kind, rect))
}

/// Synthesizes common-area zones from wall role groups plus one zone per
/// staircase outline.
pub fn synthesize_common_zones(story: &Story) -> Vec<Zone> {
    let mut zones = Vec::new();

    let corridor = story.walls_with_role(WallRole::Corridor);
    if let Some(zone) = zone_from_walls(&corridor, "Corridor", ZoneKind::Corridor) {
        zones.push(zone);
    }

    // Lobby walls may not close at the building's south edge, so the
    // box is widened down to y = 0.
    let lobby = story.walls_with_role(WallRole::Lobby);
    if !lobby.is_empty() {
        let mut rect = wall_group_bbox(&lobby);
        rect.min_y = 0.0;
        if rect.width() >= 0.01 && rect.height() >= 0.01 {
            zones.push(Zone::from_rect("Lobby", ZoneKind::Lobby, rect));
        }
    }

    let vestibule = story.walls_with_role(WallRole::Vestibule);
    if let Some(zone) = zone_from_walls(&vestibule, "Core Vestibule", ZoneKind::Vestibule) {
        zones.push(zone);
    }

    // The elevator shaft is bounded by elevator walls plus the core
    // divider walls separating it from the vestibule.
    if !story.walls_with_role(WallRole::Elevator).is_empty() {
        let elevator: Vec<&Wall> = story
            .walls
            .iter()
            .filter(|w| matches!(w.role, WallRole::Elevator | WallRole::CoreDivider))
            .collect();
        if let Some(zone) = zone_from_walls(&elevator, "Elevator", ZoneKind::Elevator) {
            zones.push(zone);
        }
    }

    for st in &story.staircases {
        zones.push(Zone {
            name: if st.name.is_empty() {
                "Staircase".to_string()
            } else {
                st.name.clone()
            },
            kind: ZoneKind::Staircase,
            vertices: st.outline.vertices().to_vec(),
            area: st.area(),
        });
    }

    zones
}

/// Collects every zone for one story: apartment rooms, story-level
/// spaces, synthesized common areas, staircase outlines.
pub fn collect_zones(story: &Story) -> Vec<Zone> {
    let mut zones = Vec::new();

    for apt in &story.apartments {
        for space in &apt.spaces {
            zones.push(Zone {
                name: space.name.clone(),
                kind: ZoneKind::Room(space.room_type),
                vertices: space.boundary.vertices().to_vec(),
                area: space.boundary.area(),
            });
        }
    }

    for space in &story.spaces {
        zones.push(Zone {
            name: space.name.clone(),
            kind: ZoneKind::Room(space.room_type),
            vertices: space.boundary.vertices().to_vec(),
            area: space.boundary.area(),
        });
    }

    zones.extend(synthesize_common_zones(story));
    zones
}

/// Resolves a probe point to a zone, handling overlapping zones.
///
/// Exact containment matches are collected first; only when none exist
/// does the search fall back to tolerance-inclusive (edge-adjacent)
/// matches. A single match wins outright. Among multiple matches, doors
/// on common-area walls (`prefer_common`) pick the smallest common-area
/// zone when one matched; otherwise the smallest zone wins, so a room
/// boundary beats the coarse core bounding box that overlaps it.
pub fn resolve_zone<'a>(
    px: f64,
    py: f64,
    zones: &'a [Zone],
    tolerance: f64,
    prefer_common: bool,
) -> Option<&'a Zone> {
    let mut matches: Vec<&Zone> = zones
        .iter()
        .filter(|z| point_in_polygon(px, py, &z.vertices))
        .collect();

    if matches.is_empty() {
        matches = zones
            .iter()
            .filter(|z| point_in_polygon_with_tolerance(px, py, &z.vertices, tolerance))
            .collect();
    }

    match matches.len() {
        0 => None,
        1 => Some(matches[0]),
        _ => {
            if prefer_common {
                if let Some(zone) = smallest(matches.iter().copied().filter(|z| z.kind.is_common()))
                {
                    return Some(zone);
                }
            }
            smallest(matches.into_iter())
        }
    }
}

fn smallest<'a>(zones: impl Iterator<Item = &'a Zone>) -> Option<&'a Zone> {
    zones.min_by(|a, b| a.area.partial_cmp(&b.area).unwrap_or(std::cmp::Ordering::Equal))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use planlint_model::{Building, Point2D, Polygon2D};

    fn add_wall(b: &mut Building, name: &str, s: (f64, f64), e: (f64, f64)) {
        b.add_wall(
            "Ground",
            name,
            Point2D::new(s.0, s.1),
            Point2D::new(e.0, e.1),
            2.8,
            0.2,
            false,
            false,
        )
        .unwrap();
    }

    #[test]
    fn corridor_zone_is_wall_bounding_box() {
        let mut b = Building::new("Test");
        b.add_story("Ground", 3.0);
        add_wall(&mut b, "Corridor South", (0.0, 4.0), (12.0, 4.0));
        add_wall(&mut b, "Corridor North", (0.0, 5.6), (12.0, 5.6));
        b.finalize();

        let zones = synthesize_common_zones(b.story("Ground").unwrap());
        assert_eq!(zones.len(), 1);
        assert_eq!(zones[0].name, "Corridor");
        assert_eq!(zones[0].kind, ZoneKind::Corridor);
        assert_relative_eq!(zones[0].area, 12.0 * 1.6, epsilon = 1e-9);
    }

    #[test]
    fn lobby_zone_extends_to_ground_edge() {
        let mut b = Building::new("Test");
        b.add_story("Ground", 3.0);
        add_wall(&mut b, "Lobby West", (4.0, 2.0), (4.0, 6.0));
        add_wall(&mut b, "Lobby East", (8.0, 2.0), (8.0, 6.0));
        b.finalize();

        let zones = synthesize_common_zones(b.story("Ground").unwrap());
        assert_eq!(zones[0].name, "Lobby");
        let min_y = zones[0]
            .vertices
            .iter()
            .map(|v| v.y)
            .fold(f64::INFINITY, f64::min);
        assert_relative_eq!(min_y, 0.0);
    }

    #[test]
    fn degenerate_group_dropped() {
        let mut b = Building::new("Test");
        b.add_story("Ground", 3.0);
        // Collinear corridor walls produce a box with zero height.
        add_wall(&mut b, "Corridor A", (0.0, 4.0), (6.0, 4.0));
        add_wall(&mut b, "Corridor B", (6.0, 4.0), (12.0, 4.0));
        b.finalize();

        let zones = synthesize_common_zones(b.story("Ground").unwrap());
        assert!(zones.is_empty());
    }

    #[test]
    fn elevator_group_includes_core_dividers() {
        let mut b = Building::new("Test");
        b.add_story("Ground", 3.0);
        add_wall(&mut b, "Elevator West", (10.0, 2.0), (10.0, 4.0));
        add_wall(&mut b, "Elevator East", (12.0, 2.0), (12.0, 4.0));
        add_wall(&mut b, "Core Divider", (10.0, 5.0), (12.0, 5.0));
        b.finalize();

        let zones = synthesize_common_zones(b.story("Ground").unwrap());
        let elevator = zones.iter().find(|z| z.name == "Elevator").unwrap();
        // Divider at y=5 stretches the box beyond the shaft walls.
        let max_y = elevator
            .vertices
            .iter()
            .map(|v| v.y)
            .fold(f64::NEG_INFINITY, f64::max);
        assert_relative_eq!(max_y, 5.0);
    }

    #[test]
    fn smallest_zone_wins_overlap() {
        let zones = vec![
            Zone {
                name: "Big".into(),
                kind: ZoneKind::Corridor,
                vertices: Polygon2D::rectangle(0.0, 0.0, 10.0, 10.0)
                    .vertices()
                    .to_vec(),
                area: 100.0,
            },
            Zone {
                name: "Small".into(),
                kind: ZoneKind::Room(RoomType::Bathroom),
                vertices: Polygon2D::rectangle(1.0, 1.0, 3.0, 3.0).vertices().to_vec(),
                area: 4.0,
            },
        ];
        let hit = resolve_zone(2.0, 2.0, &zones, 0.15, false).unwrap();
        assert_eq!(hit.name, "Small");
    }

    #[test]
    fn prefer_common_picks_common_zone() {
        let zones = vec![
            Zone {
                name: "Vestibule".into(),
                kind: ZoneKind::Vestibule,
                vertices: Polygon2D::rectangle(0.0, 0.0, 6.0, 6.0).vertices().to_vec(),
                area: 36.0,
            },
            Zone {
                name: "Apt Hallway".into(),
                kind: ZoneKind::Room(RoomType::Hallway),
                vertices: Polygon2D::rectangle(1.0, 1.0, 4.0, 4.0).vertices().to_vec(),
                area: 9.0,
            },
        ];
        let common = resolve_zone(2.0, 2.0, &zones, 0.15, true).unwrap();
        assert_eq!(common.name, "Vestibule");
        let specific = resolve_zone(2.0, 2.0, &zones, 0.15, false).unwrap();
        assert_eq!(specific.name, "Apt Hallway");
    }

    #[test]
    fn tolerance_fallback_catches_edge_adjacent_point() {
        let zones = vec![Zone {
            name: "Room".into(),
            kind: ZoneKind::Room(RoomType::Living),
            vertices: Polygon2D::rectangle(0.0, 0.0, 4.0, 4.0).vertices().to_vec(),
            area: 16.0,
        }];
        assert!(resolve_zone(-0.1, 2.0, &zones, 0.15, false).is_some());
        assert!(resolve_zone(-0.5, 2.0, &zones, 0.15, false).is_none());
    }
}
