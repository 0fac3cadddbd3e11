//! Triangle polygon type

use serde::{Deserialize, Serialize};

use crate::{mat4, Aabb, Mat4, Plane, Ray3, Vec3};

/// Barycentric slack so rays through a shared edge hit at least one neighbour
const EDGE_TOLERANCE: f32 = 1.0e-6;

/// A triangle in 3D space
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Polygon3 {
    pub vertices: [Vec3; 3],
}

impl Polygon3 {
    pub const fn new(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Self { vertices: [a, b, c] }
    }

    /// Average of the three vertices
    pub fn centroid(&self) -> Vec3 {
        let [a, b, c] = self.vertices;
        (a + b + c) / 3.0
    }

    /// Unit normal following the winding order, zero for degenerate triangles
    pub fn normal(&self) -> Vec3 {
        let [a, b, c] = self.vertices;
        (b - a).cross(c - a).normalized()
    }

    /// Supporting plane of the triangle
    pub fn plane(&self) -> Plane {
        let [a, b, c] = self.vertices;
        Plane::from_points(a, b, c)
    }

    /// Tight bounds of the three vertices
    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(&self.vertices)
    }

    /// True when the triangle has (near) zero area
    pub fn is_degenerate(&self) -> bool {
        let [a, b, c] = self.vertices;
        (b - a).cross(c - a).length_squared() <= f32::EPSILON * f32::EPSILON
    }

    /// Triangle with every vertex transformed by `m`
    pub fn transformed(&self, m: Mat4) -> Self {
        let [a, b, c] = self.vertices;
        Self::new(
            mat4::transform_point(m, a),
            mat4::transform_point(m, b),
            mat4::transform_point(m, c),
        )
    }

    /// Ray parameter of the intersection with this triangle (double sided).
    ///
    /// The parameter may be negative when the triangle lies behind the ray
    /// origin; callers decide which range they accept.
    pub fn intersect_ray(&self, ray: &Ray3) -> Option<f32> {
        let [a, b, c] = self.vertices;
        let e1 = b - a;
        let e2 = c - a;

        let p = ray.direction.cross(e2);
        let det = e1.dot(p);
        if det.abs() <= f32::EPSILON {
            return None;
        }
        let inv_det = 1.0 / det;

        let s = ray.origin - a;
        let u = s.dot(p) * inv_det;
        if !(-EDGE_TOLERANCE..=1.0 + EDGE_TOLERANCE).contains(&u) {
            return None;
        }

        let q = s.cross(e1);
        let v = ray.direction.dot(q) * inv_det;
        if v < -EDGE_TOLERANCE || u + v > 1.0 + EDGE_TOLERANCE {
            return None;
        }

        Some(e2.dot(q) * inv_det)
    }
}
