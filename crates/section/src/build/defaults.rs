//! Default resolution: partial model layers to fully populated elements.
//!
//! The input model is only borrowed; a new tree is produced.

use shared::{Defaults, Dimension, ElementKind, ElementSpec, Layer, MaterialSpec, Offset, ParameterValues};

use crate::error::{CompileError, CompileResult};

/// An element with every defaults field populated
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: Option<String>,
    pub height: f64,
    pub width: f64,
    pub thickness: f64,
    pub color: String,
    pub opacity: f64,
    pub material: Option<MaterialSpec>,
    pub transparency: bool,
    pub kind: ElementKind,
    pub offset: Offset,
}

impl Element {
    /// Explicit material, or one built from the element's own color and opacity
    pub fn material_spec(&self) -> MaterialSpec {
        self.material.clone().unwrap_or_else(|| MaterialSpec {
            texture: None,
            color: Some(self.color.clone()),
            opacity: Some(self.opacity),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedLayer {
    Element(Element),
    Composite(Vec<ResolvedLayer>),
}

impl ResolvedLayer {
    /// Every leaf element, depth first
    pub fn elements(&self) -> Vec<&Element> {
        match self {
            ResolvedLayer::Element(e) => vec![e],
            ResolvedLayer::Composite(members) => {
                members.iter().flat_map(ResolvedLayer::elements).collect()
            }
        }
    }
}

fn dimension(d: &Dimension, values: &ParameterValues, path: &str, field: &str) -> CompileResult<f64> {
    d.resolve(values).map_err(|source| CompileError::Parameter {
        path: format!("{path}.{field}"),
        source,
    })
}

/// Evaluate the defaults record into the element every field falls back to
pub fn default_element(defaults: &Defaults, values: &ParameterValues) -> CompileResult<Element> {
    let path = "defaults";
    Ok(Element {
        name: None,
        height: dimension(&defaults.height, values, path, "height")?,
        width: dimension(&defaults.width, values, path, "width")?,
        thickness: dimension(&defaults.thickness, values, path, "thickness")?,
        color: defaults.color.clone(),
        opacity: defaults.opacity,
        material: defaults.material.clone(),
        transparency: defaults.transparency,
        kind: defaults.kind.clone(),
        offset: defaults.offset,
    })
}

/// Fill missing fields of one element; presence is checked per field
pub fn resolve_element(
    spec: &ElementSpec,
    base: &Element,
    values: &ParameterValues,
    path: &str,
) -> CompileResult<Element> {
    let number = |d: &Option<Dimension>, fallback: f64, field: &str| match d {
        Some(d) => dimension(d, values, path, field),
        None => Ok(fallback),
    };

    Ok(Element {
        name: spec.name.clone(),
        height: number(&spec.height, base.height, "height")?,
        width: number(&spec.width, base.width, "width")?,
        thickness: number(&spec.thickness, base.thickness, "thickness")?,
        color: spec.color.clone().unwrap_or_else(|| base.color.clone()),
        opacity: spec.opacity.unwrap_or(base.opacity),
        material: spec.material.clone().or_else(|| base.material.clone()),
        transparency: spec.transparency.unwrap_or(base.transparency),
        kind: spec.kind.clone().unwrap_or_else(|| base.kind.clone()),
        offset: spec.offset.unwrap_or(base.offset),
    })
}

/// Resolve one layer; composites recurse, they take no defaults themselves
pub fn resolve_layer(
    layer: &Layer,
    base: &Element,
    values: &ParameterValues,
    path: &str,
) -> CompileResult<ResolvedLayer> {
    match layer {
        Layer::Element(spec) => Ok(ResolvedLayer::Element(resolve_element(
            spec, base, values, path,
        )?)),
        Layer::Composite(members) => members
            .iter()
            .enumerate()
            .map(|(i, m)| resolve_layer(m, base, values, &format!("{path}[{i}]")))
            .collect::<CompileResult<Vec<_>>>()
            .map(ResolvedLayer::Composite),
    }
}

/// Resolve a whole model against one defaults element
pub fn resolve_defaults(
    model: &[Layer],
    base: &Element,
    values: &ParameterValues,
) -> CompileResult<Vec<ResolvedLayer>> {
    model
        .iter()
        .enumerate()
        .map(|(i, layer)| resolve_layer(layer, base, values, &format!("layers[{i}]")))
        .collect()
}
