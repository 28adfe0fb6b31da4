// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The validator table.
//!
//! Validators are pure functions over the building model: they never
//! mutate it and report everything as findings. They run in parallel
//! but the output order is fixed by the table, so two runs over the
//! same building produce identical reports. A panicking validator is
//! caught and reported as a finding against its own name rather than
//! taking the whole run down.

use rayon::prelude::*;
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::debug;

use planlint_model::Building;

use crate::config::AnalysisConfig;
use crate::finding::Finding;
use crate::walls;

pub mod apartment;
pub mod codes;
pub mod core;
pub mod corridor;
pub mod coverage;
pub mod envelope;
pub mod reachability;
pub mod rooms;
pub mod structural;
pub mod vertical;

type ValidatorFn = fn(&Building, &AnalysisConfig) -> Vec<Finding>;

const VALIDATORS: &[(&str, ValidatorFn)] = &[
    ("structure", structural::validate_structure),
    ("wall_connectivity", validate_wall_connectivity),
    ("wall_closure", envelope::validate_wall_closure),
    ("vertical_alignment", vertical::validate_vertical_alignment),
    ("corridors", corridor::validate_corridors),
    ("coverage", coverage::validate_coverage),
    ("rooms", rooms::validate_rooms),
    ("core_integrity", core::validate_core_integrity),
    ("building_codes", codes::validate_building_codes),
    ("reachability", reachability::validate_reachability),
    (
        "apartment_connectivity",
        apartment::validate_apartment_connectivity,
    ),
];

fn validate_wall_connectivity(building: &Building, config: &AnalysisConfig) -> Vec<Finding> {
    building
        .stories
        .iter()
        .flat_map(|story| walls::validate_connectivity(story, config.endpoint_tolerance))
        .collect()
}

/// Runs the full validator table over a building. Findings come back
/// in table order regardless of which validator finishes first.
pub fn run_all(building: &Building, config: &AnalysisConfig) -> Vec<Finding> {
    let per_validator: Vec<Vec<Finding>> = VALIDATORS
        .par_iter()
        .map(|(name, validator)| {
            let result = catch_unwind(AssertUnwindSafe(|| validator(building, config)));
            match result {
                Ok(findings) => {
                    debug!(validator = name, count = findings.len(), "validator done");
                    findings
                }
                Err(_) => vec![Finding::error(
                    "Validator",
                    name.to_string(),
                    format!("Validator '{name}' panicked and was skipped."),
                )],
            }
        })
        .collect();

    per_validator.into_iter().flatten().collect()
}
