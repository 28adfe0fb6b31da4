// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wall endpoint topology: connection detection and snapping.
//!
//! Both operations search, for every wall endpoint, the nearest other
//! endpoint (L-junction) or wall body (T-junction). Connection detection is
//! read-only and reports gaps; snapping is the engine's one mutating
//! operation, a data-repair pre-pass that merges near-coincident endpoints
//! before validation runs.

use serde::{Deserialize, Serialize};

use planlint_model::geometry::{point_to_segment_distance, project_onto_segment};
use planlint_model::{Point2D, Story};

use crate::finding::Finding;

/// Which part of the other wall an endpoint attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachPoint {
    Start,
    End,
    /// Perpendicular foot strictly inside the other wall (T-junction).
    Body,
}

impl std::fmt::Display for AttachPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttachPoint::Start => write!(f, "start"),
            AttachPoint::End => write!(f, "end"),
            AttachPoint::Body => write!(f, "body"),
        }
    }
}

/// A detected connection between two walls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WallConnection {
    pub wall_tag: String,
    pub wall_end: AttachPoint,
    pub other_tag: String,
    pub other_end: AttachPoint,
    /// Gap distance; 0.0 means an exact match.
    pub distance: f64,
}

/// Audit record of one snapped endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapRecord {
    pub wall_tag: String,
    pub end: AttachPoint,
    pub old: (f64, f64),
    pub new: (f64, f64),
    pub target_tag: String,
    pub target_end: AttachPoint,
}

/// Finds wall-to-wall connections and reports gap warnings.
///
/// Every endpoint gets its single best (nearest) candidate recorded, even
/// when the candidate is farther than the tolerance — in that case a
/// warning finding names the nearest-but-too-far neighbor so a disconnected
/// wall is always diagnosable.
pub fn find_connections(
    story: &Story,
    tolerance: f64,
) -> (Vec<WallConnection>, Vec<Finding>) {
    let walls = &story.walls;
    let mut connections = Vec::new();
    let mut findings = Vec::new();

    for (i, wall) in walls.iter().enumerate() {
        for (end, endpoint) in [(AttachPoint::Start, wall.start), (AttachPoint::End, wall.end)] {
            let mut best_dist = f64::INFINITY;
            let mut best: Option<WallConnection> = None;

            for (j, other) in walls.iter().enumerate() {
                if i == j {
                    continue;
                }
                for (other_end, other_point) in
                    [(AttachPoint::Start, other.start), (AttachPoint::End, other.end)]
                {
                    let d = endpoint.distance_to(&other_point);
                    if d < best_dist {
                        best_dist = d;
                        best = Some(WallConnection {
                            wall_tag: wall.tag.clone(),
                            wall_end: end,
                            other_tag: other.tag.clone(),
                            other_end,
                            distance: d,
                        });
                    }
                }
                let d_body =
                    point_to_segment_distance(endpoint.x, endpoint.y, &other.start, &other.end);
                if d_body < best_dist {
                    best_dist = d_body;
                    best = Some(WallConnection {
                        wall_tag: wall.tag.clone(),
                        wall_end: end,
                        other_tag: other.tag.clone(),
                        other_end: AttachPoint::Body,
                        distance: d_body,
                    });
                }
            }

            match best {
                Some(conn) if best_dist <= tolerance => connections.push(conn),
                Some(conn) => findings.push(Finding::warning(
                    "Wall",
                    wall.id.clone(),
                    format!(
                        "{} {} ({:.2}, {:.2}) has no connection — nearest is {} {} at {:.3}m",
                        wall.tag, end, endpoint.x, endpoint.y, conn.other_tag, conn.other_end,
                        best_dist
                    ),
                )),
                None => {}
            }
        }
    }

    (connections, findings)
}

/// Read-only connectivity validation: just the gap warnings.
pub fn validate_connectivity(story: &Story, tolerance: f64) -> Vec<Finding> {
    find_connections(story, tolerance).1
}

/// Snaps wall endpoints within `tolerance` of another wall's endpoint or
/// body, mutating the story in place.
///
/// Exact matches (distance ≤ 1e-10) are skipped — they are already
/// connected. Body candidates are only accepted when the projection
/// parameter lies strictly inside (0.01, 0.99), so endpoint matches are
/// never re-triggered as T-junctions. Running snap twice with the same
/// tolerance yields zero further snaps.
pub fn snap_endpoints(story: &mut Story, tolerance: f64) -> Vec<SnapRecord> {
    let mut snaps = Vec::new();
    let wall_count = story.walls.len();

    for i in 0..wall_count {
        for end in [AttachPoint::Start, AttachPoint::End] {
            let endpoint = match end {
                AttachPoint::Start => story.walls[i].start,
                AttachPoint::End => story.walls[i].end,
                AttachPoint::Body => unreachable!(),
            };

            let mut best_dist = f64::INFINITY;
            let mut best: Option<(Point2D, String, AttachPoint)> = None;

            for (j, other) in story.walls.iter().enumerate() {
                if i == j {
                    continue;
                }
                for (other_end, other_point) in
                    [(AttachPoint::Start, other.start), (AttachPoint::End, other.end)]
                {
                    let d = endpoint.distance_to(&other_point);
                    if d > 1e-10 && d < best_dist {
                        best_dist = d;
                        best = Some((other_point, other.tag.clone(), other_end));
                    }
                }
                if let Some((foot, t)) = project_onto_segment(&endpoint, &other.start, &other.end)
                {
                    if t > 0.01 && t < 0.99 {
                        let d = endpoint.distance_to(&foot);
                        if d > 1e-10 && d < best_dist {
                            best_dist = d;
                            best = Some((foot, other.tag.clone(), AttachPoint::Body));
                        }
                    }
                }
            }

            if let Some((target, target_tag, target_end)) = best {
                if best_dist < tolerance {
                    let wall = &mut story.walls[i];
                    let old = (endpoint.x, endpoint.y);
                    match end {
                        AttachPoint::Start => wall.start = Point2D::new(target.x, target.y),
                        AttachPoint::End => wall.end = Point2D::new(target.x, target.y),
                        AttachPoint::Body => unreachable!(),
                    }
                    snaps.push(SnapRecord {
                        wall_tag: wall.tag.clone(),
                        end,
                        old,
                        new: (target.x, target.y),
                        target_tag,
                        target_end,
                    });
                }
            }
        }
    }

    snaps
}

#[cfg(test)]
mod tests {
    use super::*;
    use planlint_model::{Building, Point2D};

    fn story_with_walls(walls: &[(&str, (f64, f64), (f64, f64))]) -> Building {
        let mut b = Building::new("Test");
        b.add_story("Ground", 3.0);
        for (name, s, e) in walls {
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
        b.finalize();
        b
    }

    #[test]
    fn closed_square_has_no_gap_warnings() {
        let b = story_with_walls(&[
            ("South", (0.0, 0.0), (10.0, 0.0)),
            ("East", (10.0, 0.0), (10.0, 8.0)),
            ("North", (10.0, 8.0), (0.0, 8.0)),
            ("West", (0.0, 8.0), (0.0, 0.0)),
        ]);
        let story = b.story("Ground").unwrap();
        let (connections, findings) = find_connections(story, 0.02);
        assert_eq!(findings.len(), 0);
        assert_eq!(connections.len(), 8);
    }

    #[test]
    fn gap_reports_nearest_neighbor() {
        let b = story_with_walls(&[
            ("South", (0.0, 0.0), (10.0, 0.0)),
            ("East", (10.0, 0.5), (10.0, 8.0)),
        ]);
        let story = b.story("Ground").unwrap();
        let findings = validate_connectivity(story, 0.02);
        // South end and East start are each 0.5m from their nearest match;
        // the two far ends are also unconnected.
        assert!(findings.len() >= 2);
        assert!(findings.iter().any(|f| f.message.contains("0.500m")));
    }

    #[test]
    fn t_junction_counts_as_connection() {
        let b = story_with_walls(&[
            ("Long", (0.0, 0.0), (10.0, 0.0)),
            ("Stem", (5.0, 0.0), (5.0, 4.0)),
        ]);
        let story = b.story("Ground").unwrap();
        let (connections, _) = find_connections(story, 0.02);
        assert!(connections
            .iter()
            .any(|c| c.wall_tag == "W2" && c.other_end == AttachPoint::Body));
    }

    #[test]
    fn snap_closes_small_gap_and_is_idempotent() {
        let mut b = story_with_walls(&[
            ("South", (0.0, 0.0), (10.0, 0.0)),
            ("East", (10.005, 0.005), (10.0, 8.0)),
        ]);
        let story = b.story_mut("Ground").unwrap();

        // The first wall reached in iteration order moves onto the other.
        let snaps = snap_endpoints(story, 0.02);
        assert_eq!(snaps.len(), 1);
        assert_eq!(snaps[0].wall_tag, "W1");
        assert_eq!(snaps[0].end, AttachPoint::End);
        assert_eq!(story.walls[0].end, story.walls[1].start);

        let again = snap_endpoints(story, 0.02);
        assert_eq!(again.len(), 0);
    }

    #[test]
    fn snap_to_body_uses_projection_foot() {
        let mut b = story_with_walls(&[
            ("Long", (0.0, 0.0), (10.0, 0.0)),
            ("Stem", (5.0, 0.01), (5.0, 4.0)),
        ]);
        let story = b.story_mut("Ground").unwrap();
        let snaps = snap_endpoints(story, 0.02);
        assert_eq!(snaps.len(), 1);
        assert_eq!(snaps[0].target_end, AttachPoint::Body);
        assert_eq!(story.walls[1].start, Point2D::new(5.0, 0.0));
        assert!(snap_endpoints(story, 0.02).is_empty());
    }

    #[test]
    fn exact_duplicates_never_snap() {
        let mut b = story_with_walls(&[
            ("A", (0.0, 0.0), (5.0, 0.0)),
            ("B", (5.0, 0.0), (5.0, 5.0)),
        ]);
        let story = b.story_mut("Ground").unwrap();
        assert!(snap_endpoints(story, 0.02).is_empty());
    }
}
