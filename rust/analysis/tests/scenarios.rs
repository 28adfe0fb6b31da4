// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end scenarios over the public API: whole-suite behavior on
//! small hand-built plans.

use planlint_analysis::{
    build_connectivity_graph, snap_building, validate_building, AnalysisConfig, Finding,
    Severity,
};
use planlint_model::geometry::{point_in_polygon, point_in_polygon_with_tolerance};
use planlint_model::{Building, Point2D, Polygon2D, RoomType};

fn add_shell(b: &mut Building, story: &str, width: f64, depth: f64) {
    for (name, s, e) in [
        ("Exterior South", (0.0, 0.0), (width, 0.0)),
        ("Exterior East", (width, 0.0), (width, depth)),
        ("Exterior North", (width, depth), (0.0, depth)),
        ("Exterior West", (0.0, depth), (0.0, 0.0)),
    ] {
        b.add_wall(
            story,
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
    b.add_slab(
        story,
        "Floor",
        Polygon2D::rectangle(0.0, 0.0, width, depth),
        0.25,
        true,
    );
}

fn errors<'a>(findings: &'a [Finding], needle: &str) -> Vec<&'a Finding> {
    findings
        .iter()
        .filter(|f| f.severity == Severity::Error && f.message.contains(needle))
        .collect()
}

#[test]
fn open_c_shell_reports_closure_errors_and_closed_shell_none() {
    let config = AnalysisConfig::default();

    let mut open = Building::new("Open");
    open.add_story("Ground", 2.89);
    for (name, s, e) in [
        ("Exterior South", (0.0, 0.0), (10.0, 0.0)),
        ("Exterior East", (10.0, 0.0), (10.0, 8.0)),
        ("Exterior North", (10.0, 8.0), (0.0, 8.0)),
    ] {
        open.add_wall(
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
    open.finalize();
    let findings = validate_building(&open, &config).unwrap();
    assert!(!errors(&findings, "not connected to any other external wall").is_empty());

    let mut closed = Building::new("Closed");
    closed.add_story("Ground", 2.89);
    add_shell(&mut closed, "Ground", 10.0, 8.0);
    closed.finalize();
    let findings = validate_building(&closed, &config).unwrap();
    assert!(errors(&findings, "not connected to any other external wall").is_empty());
}

#[test]
fn shifted_bearing_wall_is_exactly_one_error_and_reversed_none() {
    let config = AnalysisConfig::default();

    let build = |upper_start: (f64, f64), upper_end: (f64, f64)| {
        let mut b = Building::new("Bearing");
        b.add_story("Ground", 2.89);
        b.add_story("First", 2.89);
        b.add_wall(
            "Ground",
            "Bearing",
            Point2D::new(0.0, 0.0),
            Point2D::new(10.0, 0.0),
            2.8,
            0.3,
            true,
            false,
        )
        .unwrap();
        b.add_wall(
            "First",
            "Bearing",
            Point2D::new(upper_start.0, upper_start.1),
            Point2D::new(upper_end.0, upper_end.1),
            2.8,
            0.3,
            true,
            false,
        )
        .unwrap();
        b.finalize();
        b
    };

    let shifted = build((0.0, 2.0), (10.0, 2.0));
    let findings = validate_building(&shifted, &config).unwrap();
    assert_eq!(errors(&findings, "no aligned bearing wall").len(), 1);

    let reversed = build((10.0, 0.0), (0.0, 0.0));
    let findings = validate_building(&reversed, &config).unwrap();
    assert!(errors(&findings, "no aligned bearing wall").is_empty());
}

#[test]
fn split_corridor_disconnects_only_the_far_apartment() {
    let mut b = Building::new("Corridor");
    b.add_story("Ground", 2.89);
    add_shell(&mut b, "Ground", 20.0, 10.0);

    // Two corridor runs x in [0,8] and [14,20]; core on the first run.
    for (suffix, x0, x1) in [("West", 0.0, 8.0), ("East", 14.0, 20.0)] {
        for (side, y) in [("South", 4.0), ("North", 5.6)] {
            b.add_wall(
                "Ground",
                &format!("Corridor {side} {suffix}"),
                Point2D::new(x0, y),
                Point2D::new(x1, y),
                2.8,
                0.2,
                false,
                false,
            )
            .unwrap();
        }
    }
    b.add_staircase(
        "Ground",
        "Staircase",
        Polygon2D::rectangle(1.0, 6.0, 3.0, 9.0),
        1.2,
    );

    for (name, door_x, wall_name) in [
        ("Apt A", 4.0, "Corridor South West"),
        ("Apt B", 17.0, "Corridor South East"),
    ] {
        b.add_apartment(
            "Ground",
            name,
            Polygon2D::rectangle(door_x - 2.0, 0.0, door_x + 2.0, 4.0),
        );
        let (host, x_min) = {
            let w = b.story("Ground").unwrap().wall_by_name(wall_name).unwrap();
            (w.id.clone(), w.start.x.min(w.end.x))
        };
        b.add_door("Ground", &format!("{name} Entry"), &host, door_x - x_min, 0.9, 2.1);
    }
    b.finalize();

    let findings = validate_building(&b, &AnalysisConfig::default()).unwrap();
    let disconnected = errors(&findings, "disconnected from the core");
    assert_eq!(disconnected.len(), 1);
    assert!(disconnected[0].message.contains("Apt B"));
    assert!(errors(&findings, "Apt A' entry door").is_empty());
}

#[test]
fn door_inside_one_zone_produces_no_edge() {
    let mut b = Building::new("SameZone");
    b.add_story("Ground", 2.89);
    add_shell(&mut b, "Ground", 10.0, 8.0);
    let apt = b.add_apartment("Ground", "Apt A", Polygon2D::rectangle(0.0, 0.0, 10.0, 8.0));
    b.add_apartment_space(
        "Ground",
        &apt,
        "Apt A Living",
        RoomType::Living,
        Polygon2D::rectangle(0.0, 0.0, 10.0, 8.0),
    );
    // A stub wall fully inside the living room with a door in it: both
    // probe points land in the same zone.
    let stub = b
        .add_wall(
            "Ground",
            "Apt A Partition",
            Point2D::new(4.0, 3.0),
            Point2D::new(6.0, 3.0),
            2.8,
            0.12,
            false,
            false,
        )
        .unwrap();
    b.add_door("Ground", "Apt A Closet Door", &stub, 0.5, 0.8, 2.1);
    b.finalize();

    let graph =
        build_connectivity_graph(&b, "Ground", &AnalysisConfig::default()).unwrap();
    assert!(graph.edges.is_empty());
}

#[test]
fn snapping_twice_changes_nothing() {
    let mut b = Building::new("Snap");
    b.add_story("Ground", 2.89);
    b.add_wall(
        "Ground",
        "A",
        Point2D::new(0.0, 0.0),
        Point2D::new(10.0, 0.0),
        2.8,
        0.2,
        false,
        false,
    )
    .unwrap();
    b.add_wall(
        "Ground",
        "B",
        Point2D::new(10.012, 0.008),
        Point2D::new(10.0, 8.0),
        2.8,
        0.2,
        false,
        false,
    )
    .unwrap();
    b.finalize();

    let config = AnalysisConfig::default();
    let first = snap_building(&mut b, &config);
    assert_eq!(first.len(), 1);
    let story = b.story("Ground").unwrap();
    assert_eq!(story.walls[0].end, story.walls[1].start);
    assert!(snap_building(&mut b, &config).is_empty());
}

#[test]
fn full_suite_output_is_stable_across_runs() {
    let mut b = Building::new("Stable");
    b.add_story("Ground", 2.89);
    add_shell(&mut b, "Ground", 20.0, 10.0);
    for (side, y) in [("South", 4.0), ("North", 5.6)] {
        b.add_wall(
            "Ground",
            &format!("Corridor {side} West"),
            Point2D::new(0.0, y),
            Point2D::new(20.0, y),
            2.8,
            0.2,
            false,
            false,
        )
        .unwrap();
    }
    b.add_staircase(
        "Ground",
        "Staircase",
        Polygon2D::rectangle(1.0, 6.0, 3.0, 9.0),
        1.2,
    );
    let apt = b.add_apartment("Ground", "Apt A", Polygon2D::rectangle(4.0, 0.0, 14.0, 4.0));
    b.add_apartment_space(
        "Ground",
        &apt,
        "Apt A Living",
        RoomType::Living,
        Polygon2D::rectangle(4.0, 0.0, 14.0, 4.0),
    );
    b.finalize();

    let config = AnalysisConfig::default();
    let first = validate_building(&b, &config).unwrap();
    let second = validate_building(&b, &config).unwrap();
    assert_eq!(first, second);
    // Deliberately incomplete plan: it must produce findings, stably.
    assert!(!first.is_empty());
}

#[test]
fn point_in_polygon_tolerance_admits_near_misses() {
    let square = [
        Point2D::new(0.0, 0.0),
        Point2D::new(1.0, 0.0),
        Point2D::new(1.0, 1.0),
        Point2D::new(0.0, 1.0),
    ];
    assert!(point_in_polygon(0.5, 0.5, &square));
    assert!(!point_in_polygon(1.5, 0.5, &square));
    assert!(!point_in_polygon(0.5, -0.05, &square));
    assert!(point_in_polygon_with_tolerance(0.5, -0.05, &square, 0.1));
    assert!(!point_in_polygon_with_tolerance(0.5, -0.5, &square, 0.1));
}

#[test]
fn adding_a_door_never_shrinks_reachability() {
    let mut b = Building::new("Mono");
    b.add_story("Ground", 2.89);
    add_shell(&mut b, "Ground", 12.0, 8.0);
    let apt = b.add_apartment("Ground", "Apt A", Polygon2D::rectangle(0.0, 0.0, 12.0, 8.0));
    for (name, ty, x0, x1) in [
        ("Apt A Hallway", RoomType::Hallway, 0.0, 4.0),
        ("Apt A Living", RoomType::Living, 4.0, 8.0),
        ("Apt A Bedroom", RoomType::Bedroom, 8.0, 12.0),
    ] {
        b.add_apartment_space(
            "Ground",
            &apt,
            name,
            ty,
            Polygon2D::rectangle(x0, 0.0, x1, 8.0),
        );
    }
    let p1 = b
        .add_wall(
            "Ground",
            "Apt A Partition West",
            Point2D::new(4.0, 0.0),
            Point2D::new(4.0, 8.0),
            2.8,
            0.12,
            false,
            false,
        )
        .unwrap();
    let p2 = b
        .add_wall(
            "Ground",
            "Apt A Partition East",
            Point2D::new(8.0, 0.0),
            Point2D::new(8.0, 8.0),
            2.8,
            0.12,
            false,
            false,
        )
        .unwrap();
    b.add_door("Ground", "Apt A Living Door", &p1, 3.5, 0.8, 2.1);
    b.finalize();

    let config = AnalysisConfig::default();
    let before = build_connectivity_graph(&b, "Ground", &config).unwrap();
    let reachable_before = before.reachable_from("Apt A Hallway");

    b.add_door("Ground", "Apt A Bedroom Door", &p2, 3.5, 0.8, 2.1);
    b.finalize();
    let after = build_connectivity_graph(&b, "Ground", &config).unwrap();
    let reachable_after = after.reachable_from("Apt A Hallway");

    assert!(reachable_before.is_subset(&reachable_after));
    assert!(reachable_after.contains("Apt A Bedroom"));
}
