//! Validation utilities for compiled scenes and flattened meshes.
//!
//! `LayoutValidator` checks stacking invariants of a `SceneGroup`;
//! `MeshValidator` checks buffer integrity of `MeshData`.

use crate::build::THICKNESS_FLOOR;
use crate::scene::SceneGroup;
use crate::viewport::mesh::MeshData;
use crate::viewport::picking::Aabb;

const EPSILON: f64 = 1e-9;

/// Validator for stacking invariants of a compiled scene.
pub struct LayoutValidator<'a> {
    scene: &'a SceneGroup,
}

impl<'a> LayoutValidator<'a> {
    pub fn new(scene: &'a SceneGroup) -> Self {
        Self { scene }
    }

    /// Slots start at zero and each begins where the previous ends.
    pub fn is_contiguous(&self) -> bool {
        let mut expected = 0.0;
        for slot in &self.scene.slots {
            if (slot.start - expected).abs() > EPSILON {
                return false;
            }
            expected = slot.end();
        }
        (self.scene.span - expected).abs() <= EPSILON
    }

    /// Every slot honors the thickness floor.
    pub fn are_thicknesses_floored(&self) -> bool {
        self.scene
            .slots
            .iter()
            .all(|s| s.thickness >= THICKNESS_FLOOR)
    }

    /// Each layer volume sits at the middle of its slot.
    pub fn are_layers_centered(&self) -> bool {
        self.scene.slots.iter().all(|slot| {
            (slot.center - (slot.start + slot.thickness / 2.0)).abs() <= EPSILON
                && self
                    .scene
                    .layer(slot.index)
                    .is_some_and(|v| (v.position().z - slot.center).abs() <= EPSILON)
        })
    }

    /// All solids have strictly positive, finite size.
    pub fn are_sizes_positive(&self) -> bool {
        self.scene
            .solids()
            .iter()
            .all(|s| s.size.is_finite() && s.size.min_element() > 0.0)
    }

    /// Run all checks; an empty list means the layout is valid.
    pub fn validate_all(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if !self.is_contiguous() {
            errors.push(format!(
                "Slots are not contiguous: {:?}",
                self.scene
                    .slots
                    .iter()
                    .map(|s| (s.start, s.end()))
                    .collect::<Vec<_>>()
            ));
        }
        if !self.are_thicknesses_floored() {
            errors.push(format!("Some slots are thinner than {THICKNESS_FLOOR}"));
        }
        if !self.are_layers_centered() {
            errors.push("Some layer volumes are not centered in their slots".to_string());
        }
        if !self.are_sizes_positive() {
            errors.push("Some solids have degenerate size".to_string());
        }
        errors
    }
}

/// Validator for `MeshData` integrity checks.
pub struct MeshValidator<'a> {
    mesh: &'a MeshData,
}

impl<'a> MeshValidator<'a> {
    pub fn new(mesh: &'a MeshData) -> Self {
        Self { mesh }
    }

    /// Check that the vertex buffer length is a multiple of 9 (the stride).
    pub fn is_stride_valid(&self) -> bool {
        self.mesh.vertices.len() % 9 == 0
    }

    /// Check that the index buffer length is a multiple of 3.
    pub fn is_index_stride_valid(&self) -> bool {
        self.mesh.indices.len() % 3 == 0
    }

    /// Check that all indices are within the valid vertex range.
    pub fn are_indices_in_range(&self) -> bool {
        let max_idx = self.mesh.vertex_count() as u32;
        self.mesh.indices.iter().all(|&i| i < max_idx)
    }

    /// Check that all vertex normals have unit length (within epsilon).
    pub fn are_normals_normalized(&self, epsilon: f32) -> bool {
        self.mesh.vertices.chunks_exact(9).all(|v| {
            let len = (v[3] * v[3] + v[4] * v[4] + v[5] * v[5]).sqrt();
            (len - 1.0).abs() <= epsilon
        })
    }

    /// Dimensions (width, height, depth) of the mesh bounding box.
    pub fn dimensions(&self) -> [f32; 3] {
        Aabb::from_mesh(self.mesh).size().to_array()
    }

    /// Run all validation checks and return a list of error messages.
    pub fn validate_all(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !self.is_stride_valid() {
            errors.push(format!(
                "Vertex buffer length {} is not a multiple of 9",
                self.mesh.vertices.len()
            ));
        }
        if !self.is_index_stride_valid() {
            errors.push(format!(
                "Index buffer length {} is not a multiple of 3",
                self.mesh.indices.len()
            ));
        }
        if !self.are_indices_in_range() {
            errors.push(format!(
                "Indices out of range (vertex_count={})",
                self.mesh.vertex_count()
            ));
        }
        if self.mesh.vertex_count() > 0 && !self.are_normals_normalized(0.1) {
            errors.push("Some normals are not unit-length (epsilon=0.1)".to_string());
        }

        errors
    }
}
