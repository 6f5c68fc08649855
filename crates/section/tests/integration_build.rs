//! Integration tests for the compile pipeline.
//!
//! Tests end-to-end: model + defaults -> AssemblyCompiler::build -> scene layout.

use section_lib::build::{default_element, effective_thickness, resolve_defaults};
use section_lib::fixtures::*;
use section_lib::validation::LayoutValidator;
use section_lib::{build, AssemblyCompiler, CompileError, CompileWarning};
use shared::{AssemblyFile, Defaults, ElementKind, ElementSpec, Layer, ParameterValues};

fn assert_layout_valid(scene: &section_lib::SceneGroup) {
    let errors = LayoutValidator::new(scene).validate_all();
    assert!(errors.is_empty(), "Layout errors: {:?}", errors);
}

#[test]
fn test_two_sheets_floor_and_centers() {
    let scene = build(&[thickness_only(10.0), thickness_only(2.0)], &defaults_500()).unwrap();
    assert_layout_valid(&scene);

    let solids = scene.solids();
    assert_eq!(solids.len(), 2);
    assert_eq!(solids[0].center.z, 5.0);
    assert_eq!(solids[1].center.z, 12.5);
    assert_eq!(scene.span, 15.0);
    // Sheet keeps its declared depth inside the floored slot
    assert_eq!(solids[1].size.z, 2.0);
    assert_eq!(solids[0].size.x, 500.0);
    assert_eq!(solids[0].size.y, 500.0);
}

#[test]
fn test_unit_grid_two_by_two() {
    let scene = build(&[unit("tile", 250.0, 250.0, 10.0)], &defaults_500()).unwrap();
    assert_layout_valid(&scene);

    let solids = scene.solids();
    assert_eq!(solids.len(), 4);
    let mut xy: Vec<(f64, f64)> = solids.iter().map(|s| (s.center.x, s.center.y)).collect();
    xy.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert_eq!(
        xy,
        vec![(-125.0, -125.0), (-125.0, 125.0), (125.0, -125.0), (125.0, 125.0)]
    );
    for s in &solids {
        assert_eq!(s.center.z, 5.0);
    }
}

#[test]
fn test_composite_takes_thicker_member() {
    let layer = composite(vec![sheet("a", 3.0), sheet("b", 8.0)]);
    let base = default_element(&defaults_500(), &ParameterValues::default()).unwrap();
    let resolved = resolve_defaults(&[layer.clone()], &base, &ParameterValues::default()).unwrap();
    assert_eq!(effective_thickness(&resolved[0]), 8.0);

    let scene = build(&[layer], &defaults_500()).unwrap();
    assert_eq!(scene.span, 8.0);
    assert_eq!(scene.solid_count(), 2);
    for s in scene.solids() {
        assert_eq!(s.center.z, 4.0);
    }
}

#[test]
fn test_void_advances_stack_without_geometry() {
    let model = vec![sheet("inner", 10.0), void("gap", 20.0), sheet("outer", 10.0)];
    let scene = build(&model, &defaults_500()).unwrap();
    assert_layout_valid(&scene);

    assert_eq!(scene.solid_count(), 2);
    assert_eq!(scene.slots[1].start, 10.0);
    assert_eq!(scene.slots[1].thickness, 20.0);
    assert_eq!(scene.solids()[1].center.z, 35.0);
    assert_eq!(scene.span, 40.0);
}

#[test]
fn test_void_without_thickness_uses_default() {
    let model: Vec<Layer> = vec![ElementSpec::default().with_kind(ElementKind::Void).into()];
    let scene = build(&model, &defaults_500()).unwrap();
    assert_eq!(scene.span, 10.0);
    assert_eq!(scene.solid_count(), 0);
}

#[test]
fn test_stacking_contiguity_many_layers() {
    let thicknesses = [12.5, 1.0, 89.0, 0.0, 25.0, 4.9, 140.0];
    // zero-depth sheets are degenerate, so the empty slot is a void
    let model: Vec<Layer> = thicknesses
        .iter()
        .map(|&t| if t > 0.0 { thickness_only(t) } else { void("gap", t) })
        .collect();
    let scene = build(&model, &defaults_500()).unwrap();
    assert_layout_valid(&scene);

    let effective: Vec<f64> = thicknesses.iter().map(|t| t.max(5.0)).collect();
    let mut start = 0.0;
    for (slot, t) in scene.slots.iter().zip(&effective) {
        assert!((slot.start - start).abs() < 1e-9);
        assert!((slot.center - (start + t / 2.0)).abs() < 1e-9);
        start += t;
    }
    assert!((scene.span - effective.iter().sum::<f64>()).abs() < 1e-9);
}

#[test]
fn test_grid_coverage_count_and_centering() {
    for (w, h) in [(100.0, 100.0), (230.0, 76.0), (300.0, 499.0), (1000.0, 40.0)] {
        let scene = build(&[unit("u", w, h, 10.0)], &defaults_500()).unwrap();
        let expected = (500.0_f64 / w).ceil() as usize * (500.0_f64 / h).ceil() as usize;
        assert_eq!(scene.solid_count(), expected, "unit {w}x{h}");

        let (lo, hi) = scene.bounds().unwrap();
        assert!((lo.x + hi.x).abs() < 1e-6, "x not centered for {w}x{h}");
        assert!((lo.y + hi.y).abs() < 1e-6, "y not centered for {w}x{h}");
    }
}

#[test]
fn test_idempotent_builds() {
    let model = brick_veneer_wall();
    let defaults = defaults_500();
    let compiler = AssemblyCompiler::default();
    let a = compiler.build(&model, &defaults).unwrap();
    let b = compiler.build(&model.clone(), &defaults.clone()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_brick_veneer_wall() {
    let scene = build(&brick_veneer_wall(), &defaults_500()).unwrap();
    assert_layout_valid(&scene);

    assert_eq!(scene.slots.len(), 5);
    assert_eq!(scene.span, 12.5 + 89.0 + 11.0 + 25.0 + 90.0);
    // 3 columns x 7 rows of bricks
    assert_eq!(scene.layer(4).unwrap().solid_count(), 21);
    assert_eq!(scene.solid_count(), 1 + 2 + 1 + 21);

    let brick = scene
        .solids()
        .into_iter()
        .find(|s| s.path.starts_with("assembly/brick/"))
        .unwrap();
    assert_eq!(brick.size.x, 220.0);
    assert_eq!(brick.size.y, 71.0);
    assert_eq!(brick.size.z, 90.0);
}

#[test]
fn test_parametric_roof_file() {
    let scene = AssemblyCompiler::default()
        .build_file(&parametric_roof())
        .unwrap();
    assert_layout_valid(&scene);
    assert_eq!(scene.span, 5.0 + 200.0 + 25.0 + 15.0);
    assert_eq!(scene.layer(3).unwrap().solid_count(), 16);
}

#[test]
fn test_model_from_json() {
    let json = r##"{
        "defaults": { "width": 500, "height": 500, "thickness": 10, "color": "#999999" },
        "layers": [
            { "thickness": 10 },
            { "thickness": 2 },
            [ { "name": "studs", "thickness": 3 }, { "name": "batts", "thickness": 8 } ],
            { "type": "unit", "width": 250, "height": 250 },
            { "type": "void", "thickness": 20 },
            { "type": "membrane", "thickness": 1 }
        ]
    }"##;
    let file: AssemblyFile = serde_json::from_str(json).unwrap();
    let scene = AssemblyCompiler::default().build_file(&file).unwrap();
    assert_layout_valid(&scene);

    let centers: Vec<f64> = scene.slots.iter().map(|s| s.center).collect();
    assert_eq!(centers, vec![5.0, 12.5, 19.0, 28.0, 43.0, 55.5]);
    assert_eq!(scene.solid_count(), 2 + 2 + 4);
    assert_eq!(
        scene.warnings,
        vec![CompileWarning::UnsupportedLayerType {
            path: "layers[5]".to_string(),
            tag: "membrane".to_string(),
        }]
    );
}

#[test]
fn test_zero_unit_width_is_configuration_error() {
    let err = build(&[unit("tile", 0.0, 100.0, 10.0)], &defaults_500()).unwrap_err();
    match err {
        CompileError::Configuration { path, .. } => assert_eq!(path, "layers[0]"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_unit_in_composite_error_path() {
    let model = vec![composite(vec![sheet("a", 10.0), unit("b", 100.0, -1.0, 10.0)])];
    let err = build(&model, &defaults_500()).unwrap_err();
    assert!(err.to_string().contains("layers[0][1]"), "{err}");
}

#[test]
fn test_frame_stub() {
    let scene = build(&[frame("studs", 89.0), sheet("osb", 11.0)], &defaults_500()).unwrap();
    assert_eq!(scene.solid_count(), 1);
    assert_eq!(scene.slots[1].start, 89.0);
    assert!(matches!(
        scene.warnings.as_slice(),
        [CompileWarning::FrameNotImplemented { .. }]
    ));
}

#[test]
fn test_default_kind_unit_from_defaults() {
    let defaults = Defaults {
        kind: ElementKind::Unit,
        width: 500.0.into(),
        height: 500.0.into(),
        ..Default::default()
    };
    // unit size comes from the defaults too, so one cell covers everything
    let scene = build(&[thickness_only(20.0)], &defaults).unwrap();
    assert_eq!(scene.solid_count(), 1);
}

#[test]
fn test_fractional_formula_thickness() {
    let json = r#"{
        "defaults": { "width": 500, "height": 500 },
        "layers": [ { "thickness": "25 / 2" }, { "thickness": 10 } ]
    }"#;
    let file: AssemblyFile = serde_json::from_str(json).unwrap();
    let scene = AssemblyCompiler::default().build_file(&file).unwrap();
    assert_eq!(scene.slots[0].thickness, 12.5);
    assert_eq!(scene.slots[1].start, 12.5);
    assert_eq!(scene.span, 22.5);
}
