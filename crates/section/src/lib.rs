// Library crate: the layout compiler plus renderer-facing helpers.
// The CLI in main.rs is a thin wrapper over `build::AssemblyCompiler`.

pub mod build;
pub mod error;
pub mod events;
pub mod fixtures;
pub mod material;
pub mod scene;
pub mod settings;
pub mod validation;

/// Mesh flattening and ray picking for the rendering side.
pub mod viewport {
    pub mod mesh;
    pub mod picking;
}

pub use build::{build, AssemblyCompiler};
pub use error::{CompileError, CompileResult, CompileWarning};
pub use scene::SceneGroup;
pub use settings::CompilerSettings;
