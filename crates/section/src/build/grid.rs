//! Grid tiling of unit-type layers.

use glam::DVec3;

use super::defaults::Element;
use crate::error::{CompileError, CompileResult};
use crate::material::Material;
use crate::scene::{Group, Solid, Volume};

/// Width and height every layer must cover
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footprint {
    pub width: f64,
    pub height: f64,
}

impl Footprint {
    pub fn new(width: f64, height: f64) -> CompileResult<Self> {
        for (name, value) in [("width", width), ("height", height)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(CompileError::configuration(
                    "defaults",
                    format!("coverage {name} must be positive, got {value}"),
                ));
            }
        }
        Ok(Self { width, height })
    }
}

/// Rows and columns needed to cover `footprint` with `width` × `height` units
pub fn grid_dimensions(footprint: Footprint, width: f64, height: f64) -> (usize, usize) {
    let rows = (footprint.height / height).ceil() as usize;
    let cols = (footprint.width / width).ceil() as usize;
    (rows, cols)
}

/// Lay out one unit per cell and center the grid on local X/Y.
/// Z is left to the stacking pass.
pub fn materialize_unit_grid(
    element: &Element,
    footprint: Footprint,
    material: &Material,
    max_cells: usize,
    path: &str,
) -> CompileResult<Group> {
    let (w, h) = (element.width, element.height);
    for (name, value) in [("width", w), ("height", h)] {
        if !value.is_finite() || value <= 0.0 {
            return Err(CompileError::configuration(
                path,
                format!("unit {name} must be positive, got {value}"),
            ));
        }
    }

    let (rows, cols) = grid_dimensions(footprint, w, h);
    let cells = rows.saturating_mul(cols);
    if cells > max_cells {
        return Err(CompileError::configuration(
            path,
            format!("{rows}x{cols} grid exceeds the limit of {max_cells} units"),
        ));
    }

    let offset = &element.offset;
    let size = DVec3::new(
        w - offset.horizontal(),
        h - offset.vertical(),
        element.thickness - offset.depth(),
    );
    if !size.is_finite() || size.min_element() <= 0.0 {
        return Err(CompileError::configuration(
            path,
            format!("unit size after offsets is degenerate: {size}"),
        ));
    }

    let name = element.name.clone().unwrap_or_else(|| path.to_string());
    let mut units = Vec::with_capacity(cells);
    for row in 0..rows {
        for col in 0..cols {
            units.push(Volume::Solid(Solid {
                name: format!("{name}[{row},{col}]"),
                position: DVec3::new(col as f64 * w, row as f64 * h, 0.0),
                size,
                material: material.clone(),
            }));
        }
    }

    let mut group = Group::new(name, units);
    group.position = DVec3::new(
        -(cols as f64 * w) / 2.0 + w / 2.0,
        -(rows as f64 * h) / 2.0 + h / 2.0,
        0.0,
    );

    tracing::debug!("{path}: {rows}x{cols} unit grid");
    Ok(group)
}
