mod common;

use common::synthetic_sections::{horizontal_section, split_stroke, straight_stroke};
use staff_filaments::{FilamentArena, FilamentError, Orientation, Run, Scale, Section, SectionId};
use std::sync::Arc;

fn scale() -> Scale {
    Scale::new(20.0, 4.0).expect("valid scale")
}

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn single_straight_filament() {
    init_logger();
    let mut arena = FilamentArena::new(scale());
    let id = arena.create(Orientation::Horizontal);
    for section in split_stroke(0, 0, 100, 3, 50.0, 4) {
        arena.add_section(id, section).expect("distinct sections");
    }
    let fil = arena.get(id).expect("filament");
    assert_eq!(fil.members().len(), 3);
    let pos = fil.position_at(50.0).expect("geometry");
    let slope = fil.slope_at(50.0).expect("geometry");
    let thickness = fil.thickness_at(50.0).expect("geometry");
    assert!((pos - 50.0).abs() < 0.25, "position={pos}");
    assert!(slope.abs() < 1e-3, "slope={slope}");
    assert!((thickness - 4.0).abs() < 0.25, "thickness={thickness}");
    assert_eq!(fil.start_point().expect("start"), [0.0, 50.0]);
    assert_eq!(fil.stop_coord(), Ok(100));
    assert!(fil.mean_distance().expect("fit") < 1e-6);
}

#[test]
fn close_fragments_are_good_merge_candidates() {
    init_logger();
    let mut arena = FilamentArena::new(scale());
    let a = arena
        .seed(straight_stroke(0, 0, 50, 50.0, 4))
        .expect("seed a");
    // Centers alternate between 50 and 51: y = 50.5 +/- 0.5.
    let b = arena
        .seed(horizontal_section(1, 51, 100, |x| {
            Run::new(if x % 2 == 0 { 48 } else { 49 }, 4)
        }))
        .expect("seed b");

    let metric = arena.resulting_thickness_at(a, b, 50.0).expect("metric");
    assert!((4.0..=4.6).contains(&metric), "metric={metric}");

    let weight_a = arena.get(a).expect("a").weight();
    let weight_b = arena.get(b).expect("b").weight();
    arena.include(a, b).expect("merge");
    let merged = arena.get(a).expect("a");
    let expected = ((weight_a + weight_b) as f64 / scale().main_fore).round() as i64;
    assert_eq!(merged.true_length(), expected);
    assert_eq!(arena.ancestor(b), Ok(a));
}

#[test]
fn unrelated_filaments_are_poor_merge_candidates() {
    let mut arena = FilamentArena::new(scale());
    let a = arena.seed(straight_stroke(0, 0, 100, 50.0, 4)).expect("seed");
    let c = arena.seed(straight_stroke(1, 0, 100, 200.0, 4)).expect("seed");
    let metric = arena.resulting_thickness_at(a, c, 25.0).expect("metric");
    assert!(metric >= 150.0, "metric={metric}");
}

#[test]
fn merge_metric_is_symmetric() {
    let mut arena = FilamentArena::new(scale());
    let a = arena
        .seed(horizontal_section(0, 0, 120, |x| Run::new(40 + x / 30, 3)))
        .expect("seed");
    let b = arena
        .seed(horizontal_section(1, 30, 160, |x| Run::new(44 - x / 40, 5)))
        .expect("seed");
    for c in (30..=120).step_by(7) {
        let ab = arena.resulting_thickness_at(a, b, c as f64).expect("metric");
        let ba = arena.resulting_thickness_at(b, a, c as f64).expect("metric");
        assert!((ab - ba).abs() < 1e-9, "asymmetric at {c}: {ab} vs {ba}");
    }
}

#[test]
fn membership_keeps_call_order_across_queries() {
    let mut arena = FilamentArena::new(scale());
    let id = arena.create(Orientation::Horizontal);
    let sections = split_stroke(10, 0, 199, 8, 80.0, 3);
    let order = [5usize, 0, 7, 2, 2, 6, 1, 3, 4, 0];
    let mut expected = Vec::new();
    for &i in &order {
        let section = sections[i].clone();
        let sid = section.id;
        match arena.add_section(id, section) {
            Ok(()) => expected.push(sid),
            Err(FilamentError::DuplicateMember { section, .. }) => assert_eq!(section, sid),
            Err(other) => panic!("unexpected error {other}"),
        }
        // Interleaved geometric queries must not disturb membership.
        let fil = arena.get(id).expect("filament");
        fil.position_at(100.0).expect("geometry");
        fil.thickness_at(3.0).expect("geometry");
    }
    let got: Vec<SectionId> = arena.get(id).expect("filament").member_ids().collect();
    assert_eq!(got, expected);
    assert_eq!(got.len(), 8);
}

#[test]
fn merge_conserves_sections() {
    let mut arena = FilamentArena::new(scale());
    let a = arena.create(Orientation::Horizontal);
    let b = arena.create(Orientation::Horizontal);
    for s in split_stroke(0, 0, 59, 3, 50.0, 4) {
        arena.add_section(a, s).expect("add");
    }
    for s in split_stroke(10, 60, 119, 2, 50.0, 4) {
        arena.add_section(b, s).expect("add");
    }
    let mut before: Vec<SectionId> = arena.get(a).expect("a").member_ids().collect();
    before.extend(arena.get(b).expect("b").member_ids());

    arena.include(a, b).expect("merge");
    let after: Vec<SectionId> = arena.get(a).expect("a").member_ids().collect();
    assert_eq!(after, before);
    assert_eq!(arena.ancestor(b), Ok(a));
    assert_eq!(arena.get(a).expect("a").stop_coord(), Ok(119));
}

#[test]
fn reference_distance_is_invalidated_by_mutations() {
    let mut arena = FilamentArena::new(scale());
    let a = arena.seed(straight_stroke(0, 0, 40, 50.0, 4)).expect("seed");
    let b = arena.seed(straight_stroke(1, 41, 80, 50.0, 4)).expect("seed");

    arena.set_ref_distance(a, 10.0).expect("set");
    arena
        .add_section(a, straight_stroke(2, 81, 90, 50.0, 4))
        .expect("add");
    assert_eq!(arena.get(a).expect("a").ref_distance(), None);

    arena.set_ref_distance(a, 11.0).expect("set");
    arena.include(a, b).expect("merge");
    assert_eq!(arena.get(a).expect("a").ref_distance(), None);
}

#[test]
fn vertical_filament_reports_x_positions() {
    let runs = vec![Run::new(300, 3); 200];
    let section = Arc::new(Section::new(SectionId(0), Orientation::Vertical, 100, runs));
    let mut arena = FilamentArena::new(scale());
    let id = arena.seed(section).expect("seed");
    let fil = arena.get(id).expect("filament");
    let start = fil.start_point().expect("start");
    let stop = fil.stop_point().expect("stop");
    assert!((start[0] - 301.5).abs() < 1e-9 && start[1] == 100.0, "{start:?}");
    assert!((stop[0] - 301.5).abs() < 1e-9 && stop[1] == 299.0, "{stop:?}");
}

#[test]
fn warped_line_is_followed_along_its_length() {
    // Staff line on warped paper: y = 100 + 6 * sin(x / 120).
    let curve = |x: i32| 100.0 + 6.0 * (x as f64 / 120.0).sin();
    let sections: Vec<Arc<Section>> = (0..6)
        .map(|k| {
            horizontal_section(k, k as i32 * 100, k as i32 * 100 + 99, |x| {
                Run::new((curve(x) - 1.5).round() as i32, 3)
            })
        })
        .collect();
    let mut arena = FilamentArena::new(scale());
    let id = arena.create(Orientation::Horizontal);
    for s in sections {
        arena.add_section(id, s).expect("add");
    }
    let fil = arena.get(id).expect("filament");
    for x in (20..580).step_by(40) {
        let pos = fil.position_at(x as f64).expect("geometry");
        assert!((pos - curve(x)).abs() < 1.0, "x={x}: {pos} vs {}", curve(x));
    }
    let rising = fil.slope_at(30.0).expect("slope");
    let falling = fil.slope_at(400.0).expect("slope");
    assert!(rising > 0.0 && falling < 0.0, "slopes {rising} / {falling}");
    // Beyond its end the filament is extended linearly.
    let last = fil.position_at(599.0).expect("geometry");
    let end_slope = fil.slope_at(599.0).expect("geometry");
    let beyond = fil.position_at(619.0).expect("geometry");
    assert!((beyond - (last + 20.0 * end_slope)).abs() < 0.5);
}
