// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Analysis configuration: every tolerance and code constant as data.
//!
//! The heuristic constants (probe step, grid step, zone edge tolerance,
//! minimum orphan cluster area) are tuned values, not derived ones — they
//! are exposed here rather than hard-coded so callers can adjust them, but
//! the defaults should not be second-guessed.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Tunable parameters for the full analysis suite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Max endpoint gap still considered connected (walls.rs). Default 0.02 m.
    pub endpoint_tolerance: f64,
    /// Distance to step from a door to each side of its host wall when
    /// probing for the containing zone. Default 0.3 m.
    pub probe_step: f64,
    /// Edge tolerance for zone containment fallback. Default 0.15 m.
    pub zone_edge_tolerance: f64,
    /// Max endpoint offset for vertical bearing-wall/staircase alignment.
    /// Default 0.1 m.
    pub alignment_tolerance: f64,
    /// Max gap between exterior-wall endpoints for perimeter closure.
    /// Default 0.05 m.
    pub closure_tolerance: f64,
    /// Minimum corridor clear width (OIB RL 4). Default 1.20 m.
    pub min_corridor_width: f64,
    /// Gap tolerance when merging corridor x-intervals. Default 0.1 m.
    pub interval_merge_tolerance: f64,
    /// Slack when locating the core on a corridor run. Default 1.0 m.
    pub core_interval_slack: f64,
    /// Sampling resolution for the unassigned-area detector. Default 0.5 m.
    pub grid_step: f64,
    /// Margin around coverage zones when testing grid samples. Default 0.05 m.
    pub coverage_margin: f64,
    /// Minimum cluster area reported as unassigned. Default 1.0 m².
    pub min_orphan_area: f64,
    /// Wall-span tolerance for the room-enclosure check. Default 0.2 m.
    pub enclosure_tolerance: f64,
    /// Maximum opening width in fire-rated core walls. Default 1.20 m.
    pub max_core_opening: f64,
    /// Doors wider than this draw a warning. Default 1.20 m.
    pub max_door_width_warning: f64,
    /// Minimum clear height for habitable rooms (OIB RL 3). Default 2.50 m.
    pub min_clear_height: f64,
    /// Target clear height with tolerance buffer. Default 2.52 m.
    pub target_clear_height: f64,
    /// Floor build-up subtracted from floor-to-floor height. Default 0.37 m.
    pub floor_structure: f64,
    /// Minimum staircase flight width. Default 1.20 m.
    pub min_stair_width: f64,
    /// Maximum riser height. Default 0.20 m.
    pub max_riser_height: f64,
    /// Minimum tread depth (going). Default 0.23 m.
    pub min_tread_length: f64,
    /// Max walking distance from apartment to nearest staircase (fire
    /// escape). Default 35.0 m.
    pub max_fire_escape_distance: f64,
    /// Minimum façade width for a 2+ room apartment. Default 6.50 m.
    pub min_facade_width: f64,
    /// Master bedroom minimums. Defaults 2.80 m / 12.0 m².
    pub master_bedroom_min_width: f64,
    pub master_bedroom_min_area: f64,
    /// Child bedroom minimums. Defaults 2.60 m / 10.0 m².
    pub child_bedroom_min_width: f64,
    pub child_bedroom_min_area: f64,
    /// Max room/apartment aspect ratio before the "tunnel" warning.
    /// Default 1.5.
    pub max_room_ratio: f64,
    /// Narrow-dimension floor exempting wide rooms from the tunnel rule.
    /// Default 3.0 m.
    pub tunnel_exemption_width: f64,
    /// Vorraum share of apartment area before a warning. Default 0.10.
    pub max_vorraum_share: f64,
    /// Minimum bathroom area for adaptable housing. Default 5.0 m².
    pub min_bathroom_area: f64,
    /// Core area share of BGF before a warning. Default 0.15.
    pub max_core_share: f64,
    /// Minimum living-area/BGF ratio. Default 0.65.
    pub min_living_share: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            endpoint_tolerance: 0.02,
            probe_step: 0.3,
            zone_edge_tolerance: 0.15,
            alignment_tolerance: 0.1,
            closure_tolerance: 0.05,
            min_corridor_width: 1.20,
            interval_merge_tolerance: 0.1,
            core_interval_slack: 1.0,
            grid_step: 0.5,
            coverage_margin: 0.05,
            min_orphan_area: 1.0,
            enclosure_tolerance: 0.2,
            max_core_opening: 1.20,
            max_door_width_warning: 1.20,
            min_clear_height: 2.50,
            target_clear_height: 2.52,
            floor_structure: 0.37,
            min_stair_width: 1.20,
            max_riser_height: 0.20,
            min_tread_length: 0.23,
            max_fire_escape_distance: 35.0,
            min_facade_width: 6.50,
            master_bedroom_min_width: 2.80,
            master_bedroom_min_area: 12.0,
            child_bedroom_min_width: 2.60,
            child_bedroom_min_area: 10.0,
            max_room_ratio: 1.5,
            tunnel_exemption_width: 3.0,
            max_vorraum_share: 0.10,
            min_bathroom_area: 5.0,
            max_core_share: 0.15,
            min_living_share: 0.65,
        }
    }
}

impl AnalysisConfig {
    /// Rejects configurations that would make the analysis ill-defined.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("grid_step", self.grid_step),
            ("probe_step", self.probe_step),
            ("min_corridor_width", self.min_corridor_width),
        ];
        for (name, value) in positive {
            if !(value > 0.0) {
                return Err(Error::InvalidConfiguration(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        let non_negative = [
            ("endpoint_tolerance", self.endpoint_tolerance),
            ("zone_edge_tolerance", self.zone_edge_tolerance),
            ("alignment_tolerance", self.alignment_tolerance),
            ("closure_tolerance", self.closure_tolerance),
            ("interval_merge_tolerance", self.interval_merge_tolerance),
            ("coverage_margin", self.coverage_margin),
            ("min_orphan_area", self.min_orphan_area),
            ("enclosure_tolerance", self.enclosure_tolerance),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidConfiguration(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }
        Ok(())
    }
}
