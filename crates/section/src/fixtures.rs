//! Factory functions for building test models.
//!
//! Provides helpers to construct `Layer`, `ElementSpec`, `Defaults` and whole
//! `AssemblyFile` values used in tests and demos.

use shared::*;

// ── Defaults ────────────────────────────────────────────────────

/// Square coverage footprint with a 10-unit default thickness.
pub fn defaults_square(size: f64) -> Defaults {
    Defaults {
        width: Dimension::Number(size),
        height: Dimension::Number(size),
        thickness: Dimension::Number(10.0),
        ..Default::default()
    }
}

/// 500 × 500 footprint.
pub fn defaults_500() -> Defaults {
    defaults_square(500.0)
}

// ── Layers ──────────────────────────────────────────────────────

/// Unnamed sheet with only a thickness.
pub fn thickness_only(thickness: f64) -> Layer {
    ElementSpec::default().with_thickness(thickness).into()
}

pub fn sheet(name: &str, thickness: f64) -> Layer {
    ElementSpec::named(name).with_thickness(thickness).into()
}

pub fn unit(name: &str, width: f64, height: f64, thickness: f64) -> Layer {
    ElementSpec::named(name)
        .with_kind(ElementKind::Unit)
        .with_size(width, height)
        .with_thickness(thickness)
        .into()
}

pub fn void(name: &str, thickness: f64) -> Layer {
    ElementSpec::named(name)
        .with_kind(ElementKind::Void)
        .with_thickness(thickness)
        .into()
}

pub fn frame(name: &str, thickness: f64) -> Layer {
    ElementSpec::named(name)
        .with_kind(ElementKind::Frame)
        .with_thickness(thickness)
        .into()
}

pub fn composite(members: Vec<Layer>) -> Layer {
    Layer::Composite(members)
}

// ── Assemblies ──────────────────────────────────────────────────

/// Brick-veneer stud wall, interior to exterior.
pub fn brick_veneer_wall() -> Vec<Layer> {
    vec![
        ElementSpec::named("gypsum board")
            .with_thickness(12.5)
            .with_color("#f2f2f2")
            .into(),
        composite(vec![
            ElementSpec::named("studs")
                .with_thickness(89.0)
                .with_color("#c8a165")
                .into(),
            ElementSpec::named("mineral wool")
                .with_thickness(89.0)
                .with_color("#e8d44d")
                .into(),
        ]),
        ElementSpec::named("osb sheathing")
            .with_thickness(11.0)
            .with_color("#b5894f")
            .into(),
        void("air gap", 25.0),
        ElementSpec::named("brick")
            .with_kind(ElementKind::Unit)
            .with_size(230.0, 76.0)
            .with_thickness(90.0)
            .with_color("#a0422a")
            .with_offset(Offset {
                top: 5.0,
                right: 10.0,
                ..Default::default()
            })
            .into(),
    ]
}

/// Parametric roof build-up as an assembly file.
pub fn parametric_roof() -> AssemblyFile {
    let mut parameters = Parameters::new();
    parameters.insert("rafter", Parameter::Number { value: 200.0 });
    parameters.insert(
        "counter_batten",
        Parameter::Formula {
            expression: "rafter / 8".to_string(),
        },
    );

    AssemblyFile {
        parameters,
        defaults: Defaults {
            width: Dimension::Number(1200.0),
            height: Dimension::Number(1000.0),
            ..Default::default()
        },
        layers: vec![
            ElementSpec::named("vapour control").with_thickness(1.0).into(),
            ElementSpec::named("insulation").with_thickness("rafter").into(),
            ElementSpec::named("ventilation")
                .with_kind(ElementKind::Void)
                .with_thickness("counter_batten")
                .into(),
            ElementSpec::named("tiles")
                .with_kind(ElementKind::Unit)
                .with_size(300.0, 250.0)
                .with_thickness(15.0)
                .into(),
        ],
    }
}
