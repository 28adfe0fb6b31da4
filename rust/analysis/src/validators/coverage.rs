// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Unassigned floor area detection.
//!
//! Every square meter of a story must belong to an apartment, the
//! corridor, the core, or the lobby. The detector samples the footprint
//! on a uniform grid against coarse bounding-box zones, flood-fills the
//! uncovered samples into 4-connected clusters, and reports clusters
//! above the minimum area. Grid-resolution-dependent by design; exact
//! polygon differencing would be fragile against irregular common-area
//! shapes.

use rustc_hash::FxHashSet;
use std::collections::VecDeque;

use planlint_model::{Building, Rect, Story, Wall, WallRole};

use crate::config::AnalysisConfig;
use crate::finding::Finding;

pub fn validate_coverage(building: &Building, config: &AnalysisConfig) -> Vec<Finding> {
    let mut findings = Vec::new();
    for story in &building.stories {
        check_story(story, config, &mut findings);
    }
    findings
}

fn group_bbox<'a>(walls: impl Iterator<Item = &'a Wall>) -> Option<Rect> {
    let mut rect = Rect::empty();
    let mut any = false;
    for w in walls {
        any = true;
        rect.expand(&w.start);
        rect.expand(&w.end);
    }
    any.then_some(rect)
}

fn coverage_zones(story: &Story) -> Vec<Rect> {
    let mut zones = Vec::new();

    for apt in &story.apartments {
        zones.push(apt.boundary.bounding_box());
    }

    // Corridor strip between the south and north wall runs.
    let corridor: Vec<&Wall> = story
        .walls
        .iter()
        .filter(|w| w.role == WallRole::Corridor)
        .collect();
    let south: Vec<&&Wall> = corridor
        .iter()
        .filter(|w| w.name.to_lowercase().contains("south"))
        .collect();
    let north: Vec<&&Wall> = corridor
        .iter()
        .filter(|w| w.name.to_lowercase().contains("north"))
        .collect();
    let mut corridor_north_y = None;
    if !south.is_empty() && !north.is_empty() {
        let y_south = south
            .iter()
            .map(|w| w.start.y.min(w.end.y))
            .fold(f64::INFINITY, f64::min);
        let y_north = north
            .iter()
            .map(|w| w.start.y.max(w.end.y))
            .fold(f64::NEG_INFINITY, f64::max);
        let x_min = south
            .iter()
            .chain(north.iter())
            .map(|w| w.start.x.min(w.end.x))
            .fold(f64::INFINITY, f64::min);
        let x_max = south
            .iter()
            .chain(north.iter())
            .map(|w| w.start.x.max(w.end.x))
            .fold(f64::NEG_INFINITY, f64::max);
        corridor_north_y = Some(y_north);
        zones.push(Rect {
            min_x: x_min,
            min_y: y_south,
            max_x: x_max,
            max_y: y_north,
        });
    }

    for st in &story.staircases {
        zones.push(st.outline.bounding_box());
    }

    // Lobby: from the building origin up to the lobby walls, extended to
    // the corridor's north edge where one exists (vestibule connection).
    let lobby = story.walls_with_role(WallRole::Lobby);
    if !lobby.is_empty() {
        let x_max = lobby
            .iter()
            .map(|w| w.start.x.max(w.end.x))
            .fold(f64::NEG_INFINITY, f64::max);
        let mut y_max = lobby
            .iter()
            .map(|w| w.start.y.max(w.end.y))
            .fold(f64::NEG_INFINITY, f64::max);
        if let Some(cy) = corridor_north_y {
            y_max = y_max.max(cy);
        }
        zones.push(Rect {
            min_x: 0.0,
            min_y: 0.0,
            max_x: x_max,
            max_y: y_max,
        });
    }

    if let Some(core) = group_bbox(story.walls.iter().filter(|w| w.role.is_core())) {
        zones.push(core);
    }

    zones
}

fn check_story(story: &Story, config: &AnalysisConfig, findings: &mut Vec<Finding>) {
    if story.apartments.is_empty() {
        return;
    }
    let exterior: Vec<&Wall> = story.walls.iter().filter(|w| w.is_external).collect();
    let building_width = exterior
        .iter()
        .map(|w| w.start.x.max(w.end.x))
        .fold(0.0_f64, f64::max);
    let building_depth = exterior
        .iter()
        .map(|w| w.start.y.max(w.end.y))
        .fold(0.0_f64, f64::max);
    if building_width * building_depth <= 0.0 {
        return;
    }

    let zones = coverage_zones(story);
    let step = config.grid_step;
    let margin = config.coverage_margin;
    let nx = (building_width / step) as i64;
    let ny = (building_depth / step) as i64;

    // Uncovered samples keyed by grid index so flood fill is exact.
    let mut uncovered: FxHashSet<(i64, i64)> = FxHashSet::default();
    let mut order: Vec<(i64, i64)> = Vec::new();
    for ix in 0..nx {
        let px = ix as f64 * step + step / 2.0;
        for iy in 0..ny {
            let py = iy as f64 * step + step / 2.0;
            let covered = zones.iter().any(|z| z.contains_with_margin(px, py, margin));
            if !covered {
                uncovered.insert((ix, iy));
                order.push((ix, iy));
            }
        }
    }

    let cell_area = step * step;
    let mut visited: FxHashSet<(i64, i64)> = FxHashSet::default();
    for seed in order {
        if visited.contains(&seed) {
            continue;
        }
        let mut cluster = Vec::new();
        let mut queue = VecDeque::from([seed]);
        visited.insert(seed);
        while let Some((cx, cy)) = queue.pop_front() {
            cluster.push((cx, cy));
            for (dx, dy) in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
                let nb = (cx + dx, cy + dy);
                if uncovered.contains(&nb) && visited.insert(nb) {
                    queue.push_back(nb);
                }
            }
        }

        let cluster_area = cluster.len() as f64 * cell_area;
        if cluster_area >= config.min_orphan_area {
            let xs: Vec<f64> = cluster.iter().map(|(ix, _)| *ix as f64 * step + step / 2.0).collect();
            let ys: Vec<f64> = cluster.iter().map(|(_, iy)| *iy as f64 * step + step / 2.0).collect();
            let x_lo = xs.iter().cloned().fold(f64::INFINITY, f64::min);
            let x_hi = xs.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            let y_lo = ys.iter().cloned().fold(f64::INFINITY, f64::min);
            let y_hi = ys.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            findings.push(Finding::error(
                "Story",
                story.name.clone(),
                format!(
                    "Unassigned floor area on '{}': ~{:.1}m² at x={:.1}-{:.1}, y={:.1}-{:.1} belongs to no apartment, corridor, or core.",
                    story.name, cluster_area, x_lo, x_hi, y_lo, y_hi
                ),
            ));
        }
    }
}
