//! Material resolution: texture with solid-color fallback.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use shared::MaterialSpec;

use crate::error::{CompileError, CompileResult, CompileWarning, ResourceLoadError};

/// Neutral gray used when a material names no color at all
pub const NEUTRAL_COLOR: [f32; 3] = [0.8, 0.8, 0.8];

/// Loaded texture image, still encoded
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Texture {
    pub path: String,
    pub byte_len: u64,
    #[serde(skip)]
    pub bytes: Arc<Vec<u8>>,
}

/// Render-ready material
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Material {
    pub color: [f32; 3],
    pub opacity: f32,
    pub transparent: bool,
    pub double_sided: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub texture: Option<Texture>,
}

impl Material {
    pub fn solid(color: [f32; 3], opacity: f32) -> Self {
        Self {
            color,
            opacity,
            transparent: true,
            double_sided: false,
            texture: None,
        }
    }

    pub fn textured(texture: Texture, opacity: f32) -> Self {
        Self {
            color: [1.0, 1.0, 1.0],
            opacity,
            transparent: opacity < 1.0,
            double_sided: true,
            texture: Some(texture),
        }
    }
}

/// Source of texture data. Implementations must not block indefinitely.
pub trait TextureLoader {
    fn load(&self, path: &str) -> Result<Texture, ResourceLoadError>;
}

/// Reads textures from disk below a root directory, refusing oversized files
pub struct FsTextureLoader {
    root: PathBuf,
    max_bytes: u64,
}

impl FsTextureLoader {
    pub fn new(root: impl Into<PathBuf>, max_bytes: u64) -> Self {
        Self {
            root: root.into(),
            max_bytes,
        }
    }
}

impl TextureLoader for FsTextureLoader {
    fn load(&self, path: &str) -> Result<Texture, ResourceLoadError> {
        let fail = |reason: String| ResourceLoadError {
            path: path.to_string(),
            reason,
        };

        if !is_relative_below(Path::new(path)) {
            return Err(fail("path escapes the texture root".to_string()));
        }
        let full = self.root.join(path);
        let meta = std::fs::metadata(&full).map_err(|e| fail(e.to_string()))?;
        if !meta.is_file() {
            return Err(fail("not a file".to_string()));
        }
        if meta.len() > self.max_bytes {
            return Err(fail(format!(
                "{} bytes exceeds limit of {}",
                meta.len(),
                self.max_bytes
            )));
        }
        let bytes = std::fs::read(&full).map_err(|e| fail(e.to_string()))?;

        Ok(Texture {
            path: path.to_string(),
            byte_len: bytes.len() as u64,
            bytes: Arc::new(bytes),
        })
    }
}

/// Only plain relative paths; no root, prefix or `..` components
fn is_relative_below(path: &Path) -> bool {
    path.components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

/// Parse `#rrggbb`, `#rgb`, `rrggbb` or `0xrrggbb` into linear 0..1 RGB
pub fn parse_color(input: &str) -> Option<[f32; 3]> {
    let hex = input.trim();
    let hex = hex
        .strip_prefix('#')
        .or_else(|| hex.strip_prefix("0x"))
        .unwrap_or(hex);
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let channel = |s: &str| u8::from_str_radix(s, 16).ok().map(|v| v as f32 / 255.0);

    match hex.len() {
        6 => Some([
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        ]),
        3 => {
            let mut rgb = [0.0; 3];
            for (i, c) in hex.chars().enumerate() {
                rgb[i] = channel(&format!("{c}{c}"))?;
            }
            Some(rgb)
        }
        _ => None,
    }
}

/// Zero or unset opacity means fully opaque
fn effective_opacity(opacity: Option<f64>) -> f32 {
    match opacity {
        Some(o) if o.is_finite() && o > 0.0 => o.min(1.0) as f32,
        _ => 1.0,
    }
}

/// Resolve a material spec. Texture failures are recorded in `warnings`
/// and fall back to the solid-color path.
pub fn resolve_material(
    spec: &MaterialSpec,
    loader: &dyn TextureLoader,
    path: &str,
    warnings: &mut Vec<CompileWarning>,
) -> CompileResult<Material> {
    let opacity = effective_opacity(spec.opacity);

    if let Some(texture_path) = &spec.texture {
        match loader.load(texture_path) {
            Ok(texture) => return Ok(Material::textured(texture, opacity)),
            Err(e) => {
                tracing::warn!("{path}: {e}; falling back to solid color");
                warnings.push(CompileWarning::ResourceLoad {
                    path: path.to_string(),
                    message: e.to_string(),
                });
            }
        }
    }

    let color = match &spec.color {
        Some(c) => parse_color(c).ok_or_else(|| {
            CompileError::configuration(path, format!("invalid color '{c}'"))
        })?,
        None => NEUTRAL_COLOR,
    };

    Ok(Material::solid(color, opacity))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoTextures;

    impl TextureLoader for NoTextures {
        fn load(&self, path: &str) -> Result<Texture, ResourceLoadError> {
            Err(ResourceLoadError {
                path: path.to_string(),
                reason: "offline".to_string(),
            })
        }
    }

    fn spec(color: Option<&str>, texture: Option<&str>, opacity: Option<f64>) -> MaterialSpec {
        MaterialSpec {
            texture: texture.map(str::to_string),
            color: color.map(str::to_string),
            opacity,
        }
    }

    #[test]
    fn test_parse_color_forms() {
        assert_eq!(parse_color("#ff0000"), Some([1.0, 0.0, 0.0]));
        assert_eq!(parse_color("00ff00"), Some([0.0, 1.0, 0.0]));
        assert_eq!(parse_color("0x0000ff"), Some([0.0, 0.0, 1.0]));
        assert_eq!(parse_color("#fff"), Some([1.0, 1.0, 1.0]));
        assert_eq!(parse_color("#12345"), None);
        assert_eq!(parse_color("#gg0000"), None);
        assert_eq!(parse_color("#+f+f+f"), None);
        assert_eq!(parse_color("+f+f+f"), None);
    }

    #[test]
    fn test_solid_material_always_transparent() {
        let mut warnings = Vec::new();
        let m = resolve_material(&spec(Some("#808080"), None, None), &NoTextures, "l", &mut warnings)
            .unwrap();
        assert!(m.transparent);
        assert_eq!(m.opacity, 1.0);
        assert!(m.texture.is_none());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_zero_opacity_means_opaque() {
        let mut warnings = Vec::new();
        let m = resolve_material(&spec(Some("#808080"), None, Some(0.0)), &NoTextures, "l", &mut warnings)
            .unwrap();
        assert_eq!(m.opacity, 1.0);
        let m = resolve_material(&spec(Some("#808080"), None, Some(0.4)), &NoTextures, "l", &mut warnings)
            .unwrap();
        assert!((m.opacity - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_texture_failure_falls_back_to_color() {
        let mut warnings = Vec::new();
        let m = resolve_material(
            &spec(Some("#ff0000"), Some("brick.png"), None),
            &NoTextures,
            "layers[0]",
            &mut warnings,
        )
        .unwrap();
        assert_eq!(m.color, [1.0, 0.0, 0.0]);
        assert!(m.texture.is_none());
        assert_eq!(warnings.len(), 1);
        assert!(matches!(&warnings[0], CompileWarning::ResourceLoad { path, .. } if path == "layers[0]"));
    }

    #[test]
    fn test_missing_color_uses_neutral() {
        let mut warnings = Vec::new();
        let m = resolve_material(&spec(None, None, None), &NoTextures, "l", &mut warnings).unwrap();
        assert_eq!(m.color, NEUTRAL_COLOR);
    }

    #[test]
    fn test_invalid_color_is_configuration_error() {
        let mut warnings = Vec::new();
        let err = resolve_material(&spec(Some("brick-red"), None, None), &NoTextures, "l", &mut warnings)
            .unwrap_err();
        assert!(matches!(err, CompileError::Configuration { .. }));
    }

    #[test]
    fn test_fs_loader_reads_texture() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("osb.png"), [1u8, 2, 3, 4]).unwrap();
        let loader = FsTextureLoader::new(dir.path(), 1024);

        let mut warnings = Vec::new();
        let m = resolve_material(&spec(None, Some("osb.png"), None), &loader, "l", &mut warnings)
            .unwrap();
        let texture = m.texture.expect("texture");
        assert_eq!(texture.byte_len, 4);
        assert!(m.double_sided);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_fs_loader_refuses_oversized() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("big.png"), vec![0u8; 64]).unwrap();
        let loader = FsTextureLoader::new(dir.path(), 16);
        let err = loader.load("big.png").unwrap_err();
        assert!(err.reason.contains("exceeds limit"));
    }

    #[test]
    fn test_fs_loader_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let loader = FsTextureLoader::new(dir.path(), 1024);
        assert!(loader.load("nope.png").is_err());
    }

    #[test]
    fn test_fs_loader_stays_below_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("textures");
        std::fs::create_dir(&root).unwrap();
        std::fs::create_dir(root.join("wood")).unwrap();
        std::fs::write(dir.path().join("secret.txt"), b"0123456789").unwrap();
        std::fs::write(root.join("wood/oak.png"), [7u8; 5]).unwrap();
        let loader = FsTextureLoader::new(&root, 1024);

        assert_eq!(loader.load("wood/oak.png").unwrap().byte_len, 5);
        assert_eq!(loader.load("./wood/oak.png").unwrap().byte_len, 5);

        let err = loader.load("../secret.txt").unwrap_err();
        assert!(err.reason.contains("escapes"));
        assert!(loader.load("wood/../../secret.txt").is_err());
        let absolute = dir.path().join("secret.txt");
        assert!(loader.load(absolute.to_str().unwrap()).is_err());
    }

    #[test]
    fn test_escaping_texture_falls_back_to_color() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("secret.txt"), b"0123456789").unwrap();
        let root = dir.path().join("textures");
        std::fs::create_dir(&root).unwrap();
        let loader = FsTextureLoader::new(&root, 1024);

        let mut warnings = Vec::new();
        let m = resolve_material(
            &spec(Some("#336699"), Some("../secret.txt"), None),
            &loader,
            "layers[0]",
            &mut warnings,
        )
        .unwrap();
        assert!(m.texture.is_none());
        assert_eq!(warnings.len(), 1);
    }
}
