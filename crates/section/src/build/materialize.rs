//! Layer to volume conversion, dispatched on element kind.

use glam::DVec3;
use shared::ElementKind;

use super::defaults::{Element, ResolvedLayer};
use super::grid::{materialize_unit_grid, Footprint};
use crate::error::{CompileError, CompileResult, CompileWarning};
use crate::material::{resolve_material, Material, TextureLoader};
use crate::scene::{Group, Solid, Volume};

/// Per-build materialization state; collects non-fatal warnings
pub struct Materializer<'a> {
    footprint: Footprint,
    loader: &'a dyn TextureLoader,
    max_grid_cells: usize,
    warnings: Vec<CompileWarning>,
}

impl<'a> Materializer<'a> {
    pub fn new(footprint: Footprint, loader: &'a dyn TextureLoader, max_grid_cells: usize) -> Self {
        Self {
            footprint,
            loader,
            max_grid_cells,
            warnings: Vec::new(),
        }
    }

    pub fn into_warnings(self) -> Vec<CompileWarning> {
        self.warnings
    }

    /// Build the volume for one layer, centered on the local origin in X/Y.
    /// Composite members are overlaid without clipping.
    pub fn materialize(&mut self, layer: &ResolvedLayer, path: &str) -> CompileResult<Volume> {
        match layer {
            ResolvedLayer::Composite(members) => {
                let children = members
                    .iter()
                    .enumerate()
                    .map(|(i, m)| self.materialize(m, &format!("{path}[{i}]")))
                    .collect::<CompileResult<Vec<_>>>()?;
                Ok(Volume::Group(Group::new(path, children)))
            }
            ResolvedLayer::Element(element) => self.materialize_element(element, path),
        }
    }

    fn materialize_element(&mut self, element: &Element, path: &str) -> CompileResult<Volume> {
        let name = element.name.clone().unwrap_or_else(|| path.to_string());

        match &element.kind {
            ElementKind::Sheet => {
                let material = self.material(element, path)?;
                Ok(Volume::Solid(self.sheet(element, name, material, path)?))
            }
            ElementKind::Unit => {
                let material = self.material(element, path)?;
                let group = materialize_unit_grid(
                    element,
                    self.footprint,
                    &material,
                    self.max_grid_cells,
                    path,
                )?;
                Ok(Volume::Group(group))
            }
            ElementKind::Void => Ok(Volume::Group(Group::empty(name))),
            // TODO: build stud/joist geometry once frame spacing is part of the element model
            ElementKind::Frame => {
                tracing::warn!("{path}: frame layers are not built yet");
                self.warnings.push(CompileWarning::FrameNotImplemented {
                    path: path.to_string(),
                });
                Ok(Volume::Group(Group::empty(name)))
            }
            ElementKind::Unsupported(tag) => {
                tracing::warn!("{path}: unsupported layer type '{tag}'");
                self.warnings.push(CompileWarning::UnsupportedLayerType {
                    path: path.to_string(),
                    tag: tag.clone(),
                });
                Ok(Volume::Group(Group::empty(name)))
            }
        }
    }

    fn material(&mut self, element: &Element, path: &str) -> CompileResult<Material> {
        let mut material =
            resolve_material(&element.material_spec(), self.loader, path, &mut self.warnings)?;
        if element.transparency {
            material.transparent = true;
        }
        Ok(material)
    }

    /// Sheets always span the full footprint, not the element's own size
    fn sheet(
        &self,
        element: &Element,
        name: String,
        material: Material,
        path: &str,
    ) -> CompileResult<Solid> {
        let depth = element.thickness - element.offset.depth();
        if !depth.is_finite() || depth <= 0.0 {
            return Err(CompileError::configuration(
                path,
                format!(
                    "sheet depth must be positive, got {depth} (thickness {} minus front/back offsets)",
                    element.thickness
                ),
            ));
        }

        Ok(Solid {
            name,
            position: DVec3::ZERO,
            size: DVec3::new(self.footprint.width, self.footprint.height, depth),
            material,
        })
    }
}
