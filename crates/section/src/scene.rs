//! Compiled scene graph: positioned solids and groups.
//!
//! Positions are relative to the parent group. A solid's position is its
//! center. The construction axis is +Z.

use glam::DVec3;
use serde::Serialize;

use crate::error::CompileWarning;
use crate::material::Material;

/// Axis-aligned box with a material
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Solid {
    pub name: String,
    pub position: DVec3,
    pub size: DVec3,
    pub material: Material,
}

/// Container of volumes sharing a translation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Group {
    pub name: String,
    pub position: DVec3,
    pub children: Vec<Volume>,
}

impl Group {
    pub fn new(name: impl Into<String>, children: Vec<Volume>) -> Self {
        Self {
            name: name.into(),
            position: DVec3::ZERO,
            children,
        }
    }

    pub fn empty(name: impl Into<String>) -> Self {
        Self::new(name, Vec::new())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Volume {
    Solid(Solid),
    Group(Group),
}

impl Volume {
    pub fn name(&self) -> &str {
        match self {
            Volume::Solid(s) => &s.name,
            Volume::Group(g) => &g.name,
        }
    }

    pub fn position(&self) -> DVec3 {
        match self {
            Volume::Solid(s) => s.position,
            Volume::Group(g) => g.position,
        }
    }

    pub fn translate(&mut self, offset: DVec3) {
        match self {
            Volume::Solid(s) => s.position += offset,
            Volume::Group(g) => g.position += offset,
        }
    }

    /// Number of solids at or below this node
    pub fn solid_count(&self) -> usize {
        match self {
            Volume::Solid(_) => 1,
            Volume::Group(g) => g.children.iter().map(Volume::solid_count).sum(),
        }
    }

    fn collect<'a>(&'a self, parent: DVec3, prefix: &str, out: &mut Vec<PlacedSolid<'a>>) {
        let path = if prefix.is_empty() {
            self.name().to_string()
        } else {
            format!("{prefix}/{}", self.name())
        };
        match self {
            Volume::Solid(s) => out.push(PlacedSolid {
                path,
                center: parent + s.position,
                size: s.size,
                material: &s.material,
            }),
            Volume::Group(g) => {
                for child in &g.children {
                    child.collect(parent + g.position, &path, out);
                }
            }
        }
    }
}

impl From<Solid> for Volume {
    fn from(solid: Solid) -> Self {
        Volume::Solid(solid)
    }
}

impl From<Group> for Volume {
    fn from(group: Group) -> Self {
        Volume::Group(group)
    }
}

/// A solid with its world-space center
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedSolid<'a> {
    /// Slash-joined names from the root, e.g. `assembly/brick/brick[0,1]`
    pub path: String,
    pub center: DVec3,
    pub size: DVec3,
    pub material: &'a Material,
}

impl PlacedSolid<'_> {
    pub fn min(&self) -> DVec3 {
        self.center - self.size * 0.5
    }

    pub fn max(&self) -> DVec3 {
        self.center + self.size * 0.5
    }
}

/// Stacking slot taken by one top-level layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerSlot {
    pub index: usize,
    pub name: String,
    pub start: f64,
    pub thickness: f64,
    pub center: f64,
}

impl LayerSlot {
    pub fn end(&self) -> f64 {
        self.start + self.thickness
    }
}

/// Output of one `build()` call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneGroup {
    pub root: Group,
    pub slots: Vec<LayerSlot>,
    /// Total extent of the stack along Z
    pub span: f64,
    pub warnings: Vec<CompileWarning>,
}

impl SceneGroup {
    /// Every solid in world space, depth first in stacking order
    pub fn solids(&self) -> Vec<PlacedSolid<'_>> {
        let mut out = Vec::new();
        for child in &self.root.children {
            child.collect(self.root.position, &self.root.name, &mut out);
        }
        out
    }

    pub fn solid_count(&self) -> usize {
        self.root.children.iter().map(Volume::solid_count).sum()
    }

    /// The top-level volume of layer `index`
    pub fn layer(&self, index: usize) -> Option<&Volume> {
        self.root.children.get(index)
    }

    /// World-space bounds of all solids, `None` for an empty scene
    pub fn bounds(&self) -> Option<(DVec3, DVec3)> {
        self.solids().iter().fold(None, |acc, s| match acc {
            None => Some((s.min(), s.max())),
            Some((lo, hi)) => Some((lo.min(s.min()), hi.max(s.max()))),
        })
    }
}
