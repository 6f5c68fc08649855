use glam::Vec3;

use super::mesh::MeshData;
use crate::scene::{PlacedSolid, SceneGroup};

/// A ray in world space
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

/// Axis-aligned bounding box
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Compute AABB from MeshData (9 floats per vertex: pos+normal+color)
    pub fn from_mesh(data: &MeshData) -> Self {
        let mut min = Vec3::splat(f32::MAX);
        let mut max = Vec3::splat(f32::MIN);

        for v in data.vertices.chunks_exact(9) {
            let p = Vec3::new(v[0], v[1], v[2]);
            min = min.min(p);
            max = max.max(p);
        }

        Self { min, max }
    }

    pub fn from_solid(solid: &PlacedSolid<'_>) -> Self {
        Self {
            min: solid.min().as_vec3(),
            max: solid.max().as_vec3(),
        }
    }

    /// Center of the bounding box
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}

/// Slab test, axis by axis. A ray parallel to a slab hits only when its
/// origin lies inside that slab, faces included. Returns the entry distance,
/// or the exit distance when the origin is inside the box.
pub fn ray_aabb(ray: &Ray, aabb: &Aabb) -> Option<f32> {
    let origin = ray.origin.to_array();
    let direction = ray.direction.to_array();
    let (min, max) = (aabb.min.to_array(), aabb.max.to_array());

    let mut near = f32::NEG_INFINITY;
    let mut far = f32::INFINITY;
    for axis in 0..3 {
        if direction[axis] == 0.0 {
            if origin[axis] < min[axis] || origin[axis] > max[axis] {
                return None;
            }
            continue;
        }
        let a = (min[axis] - origin[axis]) / direction[axis];
        let b = (max[axis] - origin[axis]) / direction[axis];
        near = near.max(a.min(b));
        far = far.min(a.max(b));
        if near > far {
            return None;
        }
    }

    if far < 0.0 {
        return None;
    }
    Some(if near < 0.0 { far } else { near })
}

/// Pick the nearest entry whose AABB is intersected by the ray.
pub fn pick_nearest<'a>(ray: &Ray, aabbs: &'a [(String, Aabb)]) -> Option<&'a str> {
    let mut best: Option<(&str, f32)> = None;

    for (id, aabb) in aabbs {
        if let Some(dist) = ray_aabb(ray, aabb) {
            if best.is_none_or(|(_, d)| dist < d) {
                best = Some((id.as_str(), dist));
            }
        }
    }

    best.map(|(id, _)| id)
}

/// Path of the solid under the ray, for hover highlighting
pub fn pick_solid(ray: &Ray, scene: &SceneGroup) -> Option<String> {
    let aabbs: Vec<(String, Aabb)> = scene
        .solids()
        .iter()
        .map(|s| (s.path.clone(), Aabb::from_solid(s)))
        .collect();
    pick_nearest(ray, &aabbs).map(str::to_string)
}
