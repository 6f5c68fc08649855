//! Assembly layout compilation: defaults, thickness, materialization, stacking.
//!
//! Layers stack along +Z from the construction plane at z = 0, in model order.
//! Each layer's volume is centered in its slot; slots never overlap.

mod defaults;
mod grid;
mod materialize;
mod thickness;

pub use defaults::{default_element, resolve_defaults, Element, ResolvedLayer};
pub use grid::{grid_dimensions, materialize_unit_grid, Footprint};
pub use materialize::Materializer;
pub use thickness::{apply_floor, declared_thickness, effective_thickness, THICKNESS_FLOOR};

use glam::DVec3;
use shared::{AssemblyFile, Defaults, Layer, ParameterValues};

use crate::error::{CompileError, CompileResult};
use crate::events::{CompileEvent, EventBus, EventKind, UnknownEvent};
use crate::material::{FsTextureLoader, TextureLoader};
use crate::scene::{Group, LayerSlot, SceneGroup};
use crate::settings::CompilerSettings;

/// Compiles layer models into scene groups. Holds no per-build state.
pub struct AssemblyCompiler {
    settings: CompilerSettings,
    loader: Box<dyn TextureLoader + Send + Sync>,
    events: EventBus,
}

impl Default for AssemblyCompiler {
    fn default() -> Self {
        Self::new(CompilerSettings::default())
    }
}

impl AssemblyCompiler {
    /// Compiler reading textures from `settings.texture_root`
    pub fn new(settings: CompilerSettings) -> Self {
        let loader = FsTextureLoader::new(&settings.texture_root, settings.max_texture_bytes);
        Self::with_loader(settings, loader)
    }

    pub fn with_loader(
        settings: CompilerSettings,
        loader: impl TextureLoader + Send + Sync + 'static,
    ) -> Self {
        Self {
            settings,
            loader: Box::new(loader),
            events: EventBus::new(),
        }
    }

    pub fn settings(&self) -> &CompilerSettings {
        &self.settings
    }

    /// Subscribe to `"compiled"`, `"error"` or `"warning"`
    pub fn on<F>(&mut self, event: &str, handler: F) -> Result<(), UnknownEvent>
    where
        F: Fn(&CompileEvent<'_>) + Send + Sync + 'static,
    {
        self.events.on(event, handler)
    }

    pub fn subscribe<F>(&mut self, kind: EventKind, handler: F)
    where
        F: Fn(&CompileEvent<'_>) + Send + Sync + 'static,
    {
        self.events.subscribe(kind, handler)
    }

    /// Compile a model against a defaults record. Inputs are not modified.
    pub fn build(&self, model: &[Layer], defaults: &Defaults) -> CompileResult<SceneGroup> {
        self.finish(self.compile(model, defaults, &ParameterValues::default()))
    }

    /// Compile an assembly file, evaluating its parameters first
    pub fn build_file(&self, file: &AssemblyFile) -> CompileResult<SceneGroup> {
        let result = file
            .parameters
            .evaluate_all()
            .map_err(|source| CompileError::Parameter {
                path: "parameters".to_string(),
                source,
            })
            .and_then(|values| self.compile(&file.layers, &file.defaults, &values));
        self.finish(result)
    }

    fn finish(&self, result: CompileResult<SceneGroup>) -> CompileResult<SceneGroup> {
        match &result {
            Ok(scene) => {
                for warning in &scene.warnings {
                    self.events.emit(&CompileEvent::Warning(warning));
                }
                tracing::info!(
                    "Compiled {} layers into {} solids (span {})",
                    scene.slots.len(),
                    scene.solid_count(),
                    scene.span
                );
                self.events.emit(&CompileEvent::Compiled(scene));
            }
            Err(e) => {
                tracing::error!("Compile failed: {e}");
                self.events.emit(&CompileEvent::Error(e));
            }
        }
        result
    }

    fn compile(
        &self,
        model: &[Layer],
        defaults: &Defaults,
        values: &ParameterValues,
    ) -> CompileResult<SceneGroup> {
        let base = default_element(defaults, values)?;
        let footprint = Footprint::new(base.width, base.height)?;
        let resolved = resolve_defaults(model, &base, values)?;

        let mut materializer =
            Materializer::new(footprint, self.loader.as_ref(), self.settings.max_grid_cells);
        let mut root = Group::empty("assembly");
        let mut slots = Vec::with_capacity(resolved.len());
        let mut offset = 0.0;

        for (index, layer) in resolved.iter().enumerate() {
            let path = format!("layers[{index}]");
            let thickness = effective_thickness(layer);
            let mut volume = materializer.materialize(layer, &path)?;

            let center = offset + thickness / 2.0;
            volume.translate(DVec3::new(0.0, 0.0, center));
            tracing::debug!("{path}: slot [{offset}, {}) center {center}", offset + thickness);

            slots.push(LayerSlot {
                index,
                name: volume.name().to_string(),
                start: offset,
                thickness,
                center,
            });
            root.children.push(volume);
            offset += thickness;
        }

        Ok(SceneGroup {
            root,
            slots,
            span: offset,
            warnings: materializer.into_warnings(),
        })
    }
}

impl std::fmt::Debug for AssemblyCompiler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssemblyCompiler")
            .field("settings", &self.settings)
            .field("events", &self.events)
            .finish_non_exhaustive()
    }
}

/// Compile with default settings and no subscribers
pub fn build(model: &[Layer], defaults: &Defaults) -> CompileResult<SceneGroup> {
    AssemblyCompiler::default().build(model, defaults)
}
