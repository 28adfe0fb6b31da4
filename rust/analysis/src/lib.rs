// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Spatial reasoning and validation engine for floor plans.
//!
//! Takes a [`planlint_model::Building`] and produces a flat list of
//! [`Finding`]s: code violations, structural defects, and layout
//! optimization hints. The engine itself never mutates the model; the
//! one exception is the opt-in endpoint snapping pass in [`walls`].
//!
//! ```no_run
//! use planlint_model::Building;
//! use planlint_analysis::{validate_building, AnalysisConfig};
//!
//! # fn load() -> Building { Building::new("demo") }
//! let building = load();
//! let findings = validate_building(&building, &AnalysisConfig::default()).unwrap();
//! for f in &findings {
//!     println!("{:?}: {}", f.severity, f.message);
//! }
//! ```

pub mod config;
pub mod error;
pub mod finding;
pub mod graph;
pub mod validators;
pub mod walls;
pub mod zones;

pub use config::AnalysisConfig;
pub use error::{Error, Result};
pub use finding::{Finding, Severity};
pub use graph::{build_connectivity_graph, ConnectivityGraph, GraphEdge, GraphNode, EXTERIOR_NODE};
pub use walls::{snap_endpoints, SnapRecord, WallConnection};
pub use zones::{Zone, ZoneKind};

use planlint_model::Building;
use tracing::debug;

/// Runs every validator over the whole building.
///
/// Findings come back in a fixed order: by validator table position,
/// then in each validator's own emission order. Two runs over the same
/// building yield identical output.
pub fn validate_building(building: &Building, config: &AnalysisConfig) -> Result<Vec<Finding>> {
    config.validate()?;
    debug!(building = %building.name, stories = building.stories.len(), "validation start");
    let findings = validators::run_all(building, config);
    debug!(count = findings.len(), "validation done");
    Ok(findings)
}

/// Runs the validator table against a single story.
///
/// Cross-story checks (vertical alignment, circulation) see only the
/// requested story and stay quiet; everything else behaves as in
/// [`validate_building`].
pub fn validate_story(
    building: &Building,
    story_name: &str,
    config: &AnalysisConfig,
) -> Result<Vec<Finding>> {
    config.validate()?;
    if building.story(story_name).is_none() {
        return Err(Error::StoryNotFound(story_name.to_string()));
    }
    let mut filtered = building.clone();
    filtered.stories.retain(|s| s.name == story_name);
    Ok(validators::run_all(&filtered, config))
}

/// Snaps near-miss wall endpoints on every story in place and returns
/// the applied moves. Running it twice changes nothing the second time.
pub fn snap_building(building: &mut Building, config: &AnalysisConfig) -> Vec<SnapRecord> {
    let mut records = Vec::new();
    for story in &mut building.stories {
        records.extend(walls::snap_endpoints(story, config.endpoint_tolerance));
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use planlint_model::Point2D;

    #[test]
    fn unknown_story_is_an_error() {
        let b = Building::new("Test");
        let err = validate_story(&b, "Penthouse", &AnalysisConfig::default()).unwrap_err();
        assert!(matches!(err, Error::StoryNotFound(name) if name == "Penthouse"));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let b = Building::new("Test");
        let config = AnalysisConfig {
            endpoint_tolerance: -1.0,
            ..AnalysisConfig::default()
        };
        assert!(validate_building(&b, &config).is_err());
    }

    #[test]
    fn snap_building_covers_all_stories() {
        let mut b = Building::new("Test");
        b.add_story("Ground", 3.0);
        b.add_story("First", 3.0);
        for story in ["Ground", "First"] {
            b.add_wall(
                story,
                "A",
                Point2D::new(0.0, 0.0),
                Point2D::new(5.0, 0.0),
                2.8,
                0.2,
                false,
                false,
            )
            .unwrap();
            b.add_wall(
                story,
                "B",
                Point2D::new(5.01, 0.0),
                Point2D::new(5.01, 4.0),
                2.8,
                0.2,
                false,
                false,
            )
            .unwrap();
        }
        b.finalize();
        let records = snap_building(&mut b, &AnalysisConfig::default());
        assert_eq!(records.len(), 2);
        assert!(snap_building(&mut b, &AnalysisConfig::default()).is_empty());
    }
}
