//! Lightweight geometric primitives: rays, segments, spheres and planes

use serde::{Deserialize, Serialize};

use crate::{mat4, Mat4, Vec3};

/// A half-infinite ray with a unit direction
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ray3 {
    pub origin: Vec3,
    /// Unit direction
    pub direction: Vec3,
}

impl Ray3 {
    /// Create a ray; the direction is normalized
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalized(),
        }
    }

    /// Point at parameter `t` along the ray
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Ray moved into the space described by `m`
    pub fn transformed(&self, m: Mat4) -> Self {
        Self::new(
            mat4::transform_point(m, self.origin),
            mat4::transform_vector(m, self.direction),
        )
    }
}

/// A finite line segment
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Segment3 {
    pub start: Vec3,
    pub end: Vec3,
}

impl Segment3 {
    pub fn new(start: Vec3, end: Vec3) -> Self {
        Self { start, end }
    }

    /// Closest point on the segment to `p`
    pub fn closest_point(&self, p: Vec3) -> Vec3 {
        let ab = self.end - self.start;
        let len_sq = ab.length_squared();
        if len_sq <= f32::EPSILON {
            return self.start;
        }
        let t = ((p - self.start).dot(ab) / len_sq).clamp(0.0, 1.0);
        self.start + ab * t
    }

    pub fn length(&self) -> f32 {
        (self.end - self.start).length()
    }
}

/// A sphere defined by center and radius
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
}

impl Sphere {
    /// Create a new sphere at the given center with the given radius
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Check if a point is inside or on the sphere
    pub fn contains(&self, point: Vec3) -> bool {
        (point - self.center).length_squared() <= self.radius * self.radius
    }
}

/// An infinite plane
///
/// The plane equation is: normal · point = distance
/// Points with normal · point > distance are "above" the plane (positive side)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    /// Unit normal vector pointing to the positive side
    pub normal: Vec3,
    /// Signed distance from origin along the normal
    pub distance: f32,
}

impl Plane {
    /// Create a new plane from a normal and distance; the normal is normalized
    pub fn new(normal: Vec3, distance: f32) -> Self {
        let len = normal.length();
        if len > 0.0 {
            Self {
                normal: normal / len,
                distance: distance / len,
            }
        } else {
            Self { normal: Vec3::Y, distance: 0.0 }
        }
    }

    /// Plane passing through `point` with the given normal
    pub fn from_point_normal(point: Vec3, normal: Vec3) -> Self {
        let n = normal.normalized();
        Self {
            normal: n,
            distance: n.dot(point),
        }
    }

    /// Plane through three points, wound counter-clockwise around the normal
    pub fn from_points(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Self::from_point_normal(a, (b - a).cross(c - a))
    }

    /// Signed distance from a point to the plane (positive = above)
    #[inline]
    pub fn signed_distance(&self, point: Vec3) -> f32 {
        self.normal.dot(point) - self.distance
    }

    /// Project a point onto the plane
    pub fn project_point(&self, point: Vec3) -> Vec3 {
        point - self.normal * self.signed_distance(point)
    }

    /// Same plane seen from the other side
    pub fn flipped(&self) -> Self {
        Self {
            normal: -self.normal,
            distance: -self.distance,
        }
    }

    /// Parameter along the ray where it crosses the plane, if it does so in front
    pub fn intersect_ray(&self, ray: &Ray3) -> Option<f32> {
        let denom = self.normal.dot(ray.direction);
        if denom.abs() <= f32::EPSILON {
            return None;
        }
        let t = (self.distance - self.normal.dot(ray.origin)) / denom;
        (t >= 0.0).then_some(t)
    }
}
