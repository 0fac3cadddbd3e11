//! Ground collision: keeping a bounding sphere standing on a landscape
//!
//! The ground is found by casting a ray along the ground direction through
//! the landscape's AABB tree. The ray starts one radius "above" the sphere
//! center (against the ground direction) so a sphere that sank slightly
//! into the terrain during a frame still finds the surface it belongs on.

use collide3d_math::{Aabb, Plane, Polygon3, Ray3, Sphere, Vec3};

use crate::AabbTree;

/// Downward ground direction used when none is given
pub const DEFAULT_GROUND_DIR: Vec3 = Vec3::new(0.0, -1.0, 0.0);

/// Hits this far behind the ray origin still count
const GROUND_RAY_TOLERANCE: f32 = 1.0e-4;

/// The ground found below a sphere
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundHit {
    /// Y coordinate the sphere center must have to stand on the ground
    pub pos_y: f32,
    /// Point where the ground ray meets the polygon
    pub point: Vec3,
    pub polygon: Polygon3,
    /// Polygon plane, facing against the ground direction
    pub plane: Plane,
}

/// Find the ground below `sphere` in `tree`.
///
/// Returns `None` when the ray meets no polygon, including for an empty tree.
/// A zero `ground_dir` falls back to [`DEFAULT_GROUND_DIR`].
pub fn ground_pos_y(sphere: &Sphere, tree: &AabbTree, ground_dir: Vec3) -> Option<GroundHit> {
    if tree.is_empty() {
        return None;
    }

    let dir = match ground_dir.normalized() {
        d if d == Vec3::ZERO => DEFAULT_GROUND_DIR,
        d => d,
    };

    let ray = Ray3::new(sphere.center - dir * sphere.radius, dir);
    let hit = tree.raycast(&ray, -GROUND_RAY_TOLERANCE)?;

    let mut plane = hit.polygon.plane();
    if plane.normal.dot(dir) > 0.0 {
        plane = plane.flipped();
    }

    let standing = hit.point - dir * sphere.radius;
    log::trace!("Ground hit at {:?}, standing y {}", hit.point, standing.y);

    Some(GroundHit {
        pos_y: standing.y,
        point: hit.point,
        polygon: hit.polygon,
        plane,
    })
}

/// Keep a moving point inside the landscape footprint.
///
/// Each of X and Z reverts to its previous value independently when the
/// candidate leaves `bounds`, so the point slides along the border instead
/// of stopping dead. Y is left untouched.
pub fn clamp_to_bounds(previous: Vec3, candidate: Vec3, bounds: &Aabb) -> Vec3 {
    let mut out = candidate;
    if candidate.x < bounds.min.x || candidate.x > bounds.max.x {
        out.x = previous.x;
    }
    if candidate.z < bounds.min.z || candidate.z > bounds.max.z {
        out.z = previous.z;
    }
    out
}

/// Position of a sphere of `radius` slid along `plane` from `position`.
///
/// The sphere is put back on the side of the plane its center is on,
/// exactly touching it.
pub fn sliding_point(plane: &Plane, position: Vec3, radius: f32) -> Vec3 {
    let plane = if plane.signed_distance(position) < 0.0 {
        plane.flipped()
    } else {
        *plane
    };
    plane.project_point(position) + plane.normal * radius
}
