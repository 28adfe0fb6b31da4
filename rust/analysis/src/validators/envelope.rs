// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Exterior envelope closure.
//!
//! Exterior walls must form a closed perimeter: every exterior endpoint
//! needs another exterior endpoint within tolerance. Stories with fewer
//! than three exterior walls cannot close at all and get a single
//! warning instead of per-endpoint errors.

use planlint_model::{Building, Wall};

use crate::config::AnalysisConfig;
use crate::finding::Finding;

pub fn validate_wall_closure(building: &Building, config: &AnalysisConfig) -> Vec<Finding> {
    let mut findings = Vec::new();
    let tolerance = config.closure_tolerance;

    for story in &building.stories {
        let external: Vec<&Wall> = story.walls.iter().filter(|w| w.is_external).collect();
        if external.len() < 3 {
            if !external.is_empty() {
                findings.push(Finding::warning(
                    "Story",
                    story.name.clone(),
                    format!(
                        "Story '{}' has only {} external walls — not enough for a closed perimeter.",
                        story.name,
                        external.len()
                    ),
                ));
            }
            continue;
        }

        let endpoints: Vec<(planlint_model::Point2D, &str, &str)> = external
            .iter()
            .flat_map(|w| {
                [
                    (w.start, w.name.as_str(), "start"),
                    (w.end, w.name.as_str(), "end"),
                ]
            })
            .collect();

        for (point, wall_name, end_type) in &endpoints {
            let connected = endpoints.iter().any(|(other, other_name, other_end)| {
                !(wall_name == other_name && end_type == other_end)
                    && point.distance_to(other) <= tolerance
            });
            if !connected {
                findings.push(Finding::error(
                    "Wall",
                    wall_name.to_string(),
                    format!(
                        "External wall '{}' {} endpoint ({:.2}, {:.2}) is not connected to any other external wall on '{}'.",
                        wall_name, end_type, point.x, point.y, story.name
                    ),
                ));
            }
        }
    }

    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use planlint_model::Point2D;

    fn building_with_exterior(walls: &[(&str, (f64, f64), (f64, f64))]) -> Building {
        let mut b = Building::new("Test");
        b.add_story("Ground", 3.0);
        for (name, s, e) in walls {
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
        b.finalize();
        b
    }

    #[test]
    fn closed_rectangle_has_no_errors() {
        let b = building_with_exterior(&[
            ("South", (0.0, 0.0), (10.0, 0.0)),
            ("East", (10.0, 0.0), (10.0, 8.0)),
            ("North", (10.0, 8.0), (0.0, 8.0)),
            ("West", (0.0, 8.0), (0.0, 0.0)),
        ]);
        assert!(validate_wall_closure(&b, &AnalysisConfig::default()).is_empty());
    }

    #[test]
    fn open_c_shape_reports_unconnected_endpoints() {
        // South, east, north only: the west side is missing.
        let b = building_with_exterior(&[
            ("South", (0.0, 0.0), (10.0, 0.0)),
            ("East", (10.0, 0.0), (10.0, 8.0)),
            ("North", (10.0, 8.0), (0.0, 8.0)),
        ]);
        let findings = validate_wall_closure(&b, &AnalysisConfig::default());
        let errors: Vec<_> = findings
            .iter()
            .filter(|f| f.message.contains("not connected"))
            .collect();
        // South start and North end hang loose at x=0.
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn two_walls_get_single_warning() {
        let b = building_with_exterior(&[
            ("South", (0.0, 0.0), (10.0, 0.0)),
            ("East", (10.0, 0.0), (10.0, 8.0)),
        ]);
        let findings = validate_wall_closure(&b, &AnalysisConfig::default());
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.contains("not enough for a closed perimeter"));
    }
}
