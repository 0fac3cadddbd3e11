//! Convex colliders for the GJK narrow phase
//!
//! A collider is a lightweight proxy shape attached to a scene item. Shapes
//! are described in their local frame (Y up, axis through the origin) and
//! placed in the world by a position plus a rotation+scale matrix.

use collide3d_math::{mat4, Aabb, Mat4, Vec3};
use serde::{Deserialize, Serialize};

use crate::CollisionError;

/// Convex shape in collider-local space
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum ColliderShape {
    /// Sphere centered on the local origin
    Sphere { radius: f32 },
    /// Capsule along the local Y axis, spanning `bottom_y..=top_y` including
    /// its rounded caps
    Capsule { radius: f32, top_y: f32, bottom_y: f32 },
    /// Box between two local corners
    Box { min: Vec3, max: Vec3 },
    /// Cylinder along the local Y axis with flat caps at `bottom_y` and `top_y`
    Cylinder { radius: f32, top_y: f32, bottom_y: f32 },
}

impl ColliderShape {
    /// Check that every extent is finite and non-degenerate
    pub fn validate(&self) -> Result<(), CollisionError> {
        fn radius_ok(r: f32) -> Result<(), CollisionError> {
            if r.is_finite() && r > 0.0 {
                Ok(())
            } else {
                Err(CollisionError::DegenerateCollider(format!("radius must be positive, got {}", r)))
            }
        }
        fn span_ok(top: f32, bottom: f32) -> Result<(), CollisionError> {
            if top.is_finite() && bottom.is_finite() && top > bottom {
                Ok(())
            } else {
                Err(CollisionError::DegenerateCollider(format!(
                    "top {} must be above bottom {}",
                    top, bottom
                )))
            }
        }

        match *self {
            ColliderShape::Sphere { radius } => radius_ok(radius),
            ColliderShape::Capsule { radius, top_y, bottom_y }
            | ColliderShape::Cylinder { radius, top_y, bottom_y } => {
                radius_ok(radius)?;
                span_ok(top_y, bottom_y)
            }
            ColliderShape::Box { min, max } => {
                let ok = min.is_finite()
                    && max.is_finite()
                    && max.x > min.x
                    && max.y > min.y
                    && max.z > min.z;
                if ok {
                    Ok(())
                } else {
                    Err(CollisionError::DegenerateCollider(format!(
                        "box max {:?} must exceed min {:?} on every axis",
                        max, min
                    )))
                }
            }
        }
    }

    /// Farthest local point along a local direction
    fn support_local(&self, d: Vec3) -> Vec3 {
        match *self {
            ColliderShape::Sphere { radius } => d.normalized() * radius,
            ColliderShape::Capsule { radius, top_y, bottom_y } => {
                let (low, high) = capsule_cap_centers(radius, top_y, bottom_y);
                let cap = if d.y >= 0.0 { high } else { low };
                Vec3::new(0.0, cap, 0.0) + d.normalized() * radius
            }
            ColliderShape::Box { min, max } => Vec3::new(
                if d.x >= 0.0 { max.x } else { min.x },
                if d.y >= 0.0 { max.y } else { min.y },
                if d.z >= 0.0 { max.z } else { min.z },
            ),
            ColliderShape::Cylinder { radius, top_y, bottom_y } => {
                let radial = Vec3::new(d.x, 0.0, d.z).normalized() * radius;
                let y = if d.y >= 0.0 { top_y } else { bottom_y };
                Vec3::new(radial.x, y, radial.z)
            }
        }
    }

    /// Local center of the shape's volume
    fn local_center(&self) -> Vec3 {
        match *self {
            ColliderShape::Sphere { .. } => Vec3::ZERO,
            ColliderShape::Capsule { top_y, bottom_y, .. } | ColliderShape::Cylinder { top_y, bottom_y, .. } => {
                Vec3::new(0.0, (top_y + bottom_y) * 0.5, 0.0)
            }
            ColliderShape::Box { min, max } => (min + max) * 0.5,
        }
    }

    fn contains_local(&self, p: Vec3) -> bool {
        match *self {
            ColliderShape::Sphere { radius } => p.length_squared() <= radius * radius,
            ColliderShape::Capsule { radius, top_y, bottom_y } => {
                let (low, high) = capsule_cap_centers(radius, top_y, bottom_y);
                let axis_y = p.y.clamp(low, high);
                (p - Vec3::new(0.0, axis_y, 0.0)).length_squared() <= radius * radius
            }
            ColliderShape::Box { min, max } => Aabb { min, max }.contains_point(p),
            ColliderShape::Cylinder { radius, top_y, bottom_y } => {
                p.y >= bottom_y && p.y <= top_y && p.x * p.x + p.z * p.z <= radius * radius
            }
        }
    }
}

/// Y of the bottom and top cap sphere centers; short capsules collapse to
/// a sphere at their middle
fn capsule_cap_centers(radius: f32, top_y: f32, bottom_y: f32) -> (f32, f32) {
    let low = bottom_y + radius;
    let high = top_y - radius;
    if high < low {
        let mid = (top_y + bottom_y) * 0.5;
        (mid, mid)
    } else {
        (low, high)
    }
}

/// A sphere or capsule seen as every point within `radius` of a segment.
/// Spheres have `start == end`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoundedCore {
    pub start: Vec3,
    pub end: Vec3,
    pub radius: f32,
}

/// Scale factor when the rotation+scale matrix keeps shapes round
fn uniform_scale(rs: &Mat4) -> Option<f32> {
    let axes = [0usize, 1, 2].map(|i| Vec3::new(rs[i][0], rs[i][1], rs[i][2]));
    let [x, y, z] = axes.map(Vec3::length);
    let tol = 1e-4 * x * x;
    let equal = (x * x - y * y).abs() <= tol && (x * x - z * z).abs() <= tol;
    let orthogonal = axes[0].dot(axes[1]).abs() <= tol
        && axes[0].dot(axes[2]).abs() <= tol
        && axes[1].dot(axes[2]).abs() <= tol;
    (equal && orthogonal).then_some(x)
}

/// Whether a collider moves and gets resolved
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColliderState {
    /// Never moved by collision resolution
    #[default]
    Static,
    /// Tested against every other collider and moved by the resulting MTV
    Dynamic,
}

/// A placed convex collider
///
/// `mat_rs` and `mat_rs_inv` are always mutual inverses; they can only be
/// changed together through [`Collider::set_rs`] or [`Collider::set_transform`].
#[derive(Clone, Debug, PartialEq)]
pub struct Collider {
    shape: ColliderShape,
    state: ColliderState,
    position: Vec3,
    mat_rs: Mat4,
    mat_rs_inv: Mat4,
}

impl Collider {
    /// Create a collider at the origin with no rotation or scale
    pub fn new(shape: ColliderShape, state: ColliderState) -> Result<Self, CollisionError> {
        shape.validate()?;
        Ok(Self {
            shape,
            state,
            position: Vec3::ZERO,
            mat_rs: mat4::IDENTITY,
            mat_rs_inv: mat4::IDENTITY,
        })
    }

    /// Sphere of the given radius
    pub fn sphere(radius: f32, state: ColliderState) -> Result<Self, CollisionError> {
        Self::new(ColliderShape::Sphere { radius }, state)
    }

    /// Capsule standing on the local origin, `height` tall including caps
    pub fn capsule(radius: f32, height: f32, state: ColliderState) -> Result<Self, CollisionError> {
        Self::new(
            ColliderShape::Capsule {
                radius,
                top_y: height,
                bottom_y: 0.0,
            },
            state,
        )
    }

    /// Cylinder standing on the local origin
    pub fn cylinder(radius: f32, height: f32, state: ColliderState) -> Result<Self, CollisionError> {
        Self::new(
            ColliderShape::Cylinder {
                radius,
                top_y: height,
                bottom_y: 0.0,
            },
            state,
        )
    }

    /// Box between two local corners
    pub fn cuboid(min: Vec3, max: Vec3, state: ColliderState) -> Result<Self, CollisionError> {
        Self::new(ColliderShape::Box { min, max }, state)
    }

    /// Set the world position (builder pattern)
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Set the rotation+scale matrix (builder pattern)
    pub fn with_rs(mut self, rs: Mat4) -> Result<Self, CollisionError> {
        self.set_rs(rs)?;
        Ok(self)
    }

    pub fn shape(&self) -> &ColliderShape {
        &self.shape
    }

    pub fn state(&self) -> ColliderState {
        self.state
    }

    pub fn is_dynamic(&self) -> bool {
        self.state == ColliderState::Dynamic
    }

    pub fn set_state(&mut self, state: ColliderState) {
        self.state = state;
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn mat_rs(&self) -> &Mat4 {
        &self.mat_rs
    }

    pub fn mat_rs_inv(&self) -> &Mat4 {
        &self.mat_rs_inv
    }

    /// Replace the rotation+scale matrix; any translation in `rs` is ignored.
    ///
    /// Fails without changing the collider when `rs` is singular.
    pub fn set_rs(&mut self, rs: Mat4) -> Result<(), CollisionError> {
        let rs = mat4::without_translation(rs);
        let inv = mat4::inverse(rs).ok_or(CollisionError::SingularMatrix)?;
        self.mat_rs = rs;
        self.mat_rs_inv = inv;
        Ok(())
    }

    /// Take position and rotation+scale from an affine model matrix
    pub fn set_transform(&mut self, model: Mat4) -> Result<(), CollisionError> {
        self.set_rs(model)?;
        self.position = mat4::get_translation(model);
        Ok(())
    }

    /// World-space point of the shape farthest along `direction`.
    ///
    /// The direction reaches local space through the transpose of `mat_rs`,
    /// which is the exact mapping of support directions under rotation and
    /// (non-uniform) scale alike.
    pub fn support(&self, direction: Vec3) -> Vec3 {
        let local_dir = mat4::transform_vector(mat4::transpose(self.mat_rs), direction);
        let local = self.shape.support_local(local_dir);
        self.position + mat4::transform_vector(self.mat_rs, local)
    }

    /// World-space core of a sphere or capsule.
    ///
    /// `None` for boxes, cylinders and shapes stretched by a non-uniform scale.
    pub fn rounded_core(&self) -> Option<RoundedCore> {
        let (radius, low, high) = match self.shape {
            ColliderShape::Sphere { radius } => (radius, 0.0, 0.0),
            ColliderShape::Capsule { radius, top_y, bottom_y } => {
                let (low, high) = capsule_cap_centers(radius, top_y, bottom_y);
                (radius, low, high)
            }
            ColliderShape::Box { .. } | ColliderShape::Cylinder { .. } => return None,
        };
        let scale = uniform_scale(&self.mat_rs)?;
        Some(RoundedCore {
            start: self.position + mat4::transform_vector(self.mat_rs, Vec3::new(0.0, low, 0.0)),
            end: self.position + mat4::transform_vector(self.mat_rs, Vec3::new(0.0, high, 0.0)),
            radius: radius * scale,
        })
    }

    /// World-space center of the shape's volume
    pub fn center(&self) -> Vec3 {
        self.position + mat4::transform_vector(self.mat_rs, self.shape.local_center())
    }

    /// Map a world point into the collider's local frame
    pub fn to_local(&self, world: Vec3) -> Vec3 {
        mat4::transform_vector(self.mat_rs_inv, world - self.position)
    }

    /// Check if a world point is inside or on the collider
    pub fn contains_point(&self, world: Vec3) -> bool {
        self.shape.contains_local(self.to_local(world))
    }

    /// World-space bounds, exact for every shape
    pub fn bounds(&self) -> Aabb {
        let max = Vec3::new(
            self.support(Vec3::X).x,
            self.support(Vec3::Y).y,
            self.support(Vec3::Z).z,
        );
        let min = Vec3::new(
            self.support(-Vec3::X).x,
            self.support(-Vec3::Y).y,
            self.support(-Vec3::Z).z,
        );
        Aabb { min, max }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    const EPSILON: f32 = 0.0001;

    #[test]
    fn test_sphere_support() {
        let s = Collider::sphere(2.0, ColliderState::Static)
            .unwrap()
            .with_position(Vec3::new(1.0, 0.0, 0.0));
        let p = s.support(Vec3::new(0.0, 5.0, 0.0));
        assert!(p.approx_eq(Vec3::new(1.0, 2.0, 0.0), EPSILON));
    }

    #[test]
    fn test_capsule_support_picks_cap() {
        let c = Collider::capsule(0.2, 0.85, ColliderState::Dynamic).unwrap();
        let top = c.support(Vec3::Y);
        assert!((top.y - 0.85).abs() < EPSILON);
        let bottom = c.support(-Vec3::Y);
        assert!(bottom.y.abs() < EPSILON);
        let side = c.support(Vec3::new(1.0, 0.1, 0.0));
        // Top cap center at 0.65
        assert!(side.x > 0.19 && side.y > 0.65);
    }

    #[test]
    fn test_short_capsule_is_a_sphere() {
        let c = Collider::new(
            ColliderShape::Capsule { radius: 1.0, top_y: 1.0, bottom_y: 0.0 },
            ColliderState::Static,
        )
        .unwrap();
        let p = c.support(Vec3::Y);
        assert!((p.y - 1.5).abs() < EPSILON);
    }

    #[test]
    fn test_box_support_corner() {
        let b = Collider::cuboid(Vec3::splat(-1.0), Vec3::new(1.0, 2.0, 3.0), ColliderState::Static).unwrap();
        assert_eq!(b.support(Vec3::new(1.0, -1.0, 1.0)), Vec3::new(1.0, -1.0, 3.0));
    }

    #[test]
    fn test_rotated_box_support() {
        let b = Collider::cuboid(Vec3::new(-2.0, -0.5, -0.5), Vec3::new(2.0, 0.5, 0.5), ColliderState::Static)
            .unwrap()
            .with_rs(mat4::rotation_y(FRAC_PI_2))
            .unwrap();
        // Long axis now lies along Z
        let p = b.support(Vec3::Z);
        assert!((p.z - 2.0).abs() < EPSILON);
        let p = b.support(Vec3::X);
        assert!((p.x - 0.5).abs() < EPSILON);
    }

    #[test]
    fn test_scaled_sphere_support_is_exact() {
        let s = Collider::sphere(1.0, ColliderState::Static)
            .unwrap()
            .with_rs(mat4::scale(Vec3::new(2.0, 1.0, 1.0)))
            .unwrap();
        // Ellipsoid extent along X is 2
        assert!((s.support(Vec3::X).x - 2.0).abs() < EPSILON);
        let b = s.bounds();
        assert!(b.max.approx_eq(Vec3::new(2.0, 1.0, 1.0), EPSILON));
    }

    #[test]
    fn test_cylinder_support() {
        let c = Collider::cylinder(0.3, 1.0, ColliderState::Static)
            .unwrap()
            .with_position(Vec3::new(0.0, 0.0, -1.0));
        let p = c.support(Vec3::new(0.0, 1.0, 1.0));
        assert!(p.approx_eq(Vec3::new(0.0, 1.0, -0.7), EPSILON));
        let p = c.support(-Vec3::Y);
        assert!(p.y.abs() < EPSILON);
    }

    #[test]
    fn test_set_transform_keeps_inverse() {
        let mut c = Collider::sphere(1.0, ColliderState::Dynamic).unwrap();
        let model = mat4::mul(
            mat4::translation(Vec3::new(1.0, 2.0, 3.0)),
            mat4::mul(mat4::rotation_x(0.3), mat4::scale(Vec3::new(1.0, 2.0, 0.5))),
        );
        c.set_transform(model).unwrap();
        assert_eq!(c.position(), Vec3::new(1.0, 2.0, 3.0));
        let product = mat4::mul(*c.mat_rs(), *c.mat_rs_inv());
        for (i, col) in product.iter().enumerate() {
            for (j, v) in col.iter().enumerate() {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((v - expected).abs() < EPSILON);
            }
        }
    }

    #[test]
    fn test_singular_rs_rejected() {
        let mut c = Collider::sphere(1.0, ColliderState::Static).unwrap();
        let before = c.clone();
        let err = c.set_rs(mat4::scale(Vec3::new(1.0, 0.0, 1.0))).unwrap_err();
        assert_eq!(err, CollisionError::SingularMatrix);
        assert_eq!(c, before);
    }

    #[test]
    fn test_degenerate_shapes_rejected() {
        assert!(Collider::sphere(0.0, ColliderState::Static).is_err());
        assert!(Collider::sphere(f32::NAN, ColliderState::Static).is_err());
        assert!(Collider::capsule(0.2, 0.0, ColliderState::Static).is_err());
        assert!(Collider::cylinder(-1.0, 1.0, ColliderState::Static).is_err());
        assert!(Collider::cuboid(Vec3::ZERO, Vec3::new(1.0, 0.0, 1.0), ColliderState::Static).is_err());
    }

    #[test]
    fn test_contains_point() {
        let c = Collider::capsule(0.5, 2.0, ColliderState::Static)
            .unwrap()
            .with_position(Vec3::new(3.0, 0.0, 0.0));
        assert!(c.contains_point(Vec3::new(3.0, 1.0, 0.0)));
        assert!(!c.contains_point(Vec3::new(3.4, 1.9, 0.0)));
        assert!(!c.contains_point(Vec3::ZERO));
    }

    #[test]
    fn test_rounded_core() {
        let c = Collider::capsule(0.2, 1.0, ColliderState::Dynamic)
            .unwrap()
            .with_position(Vec3::new(1.0, 0.0, 0.0))
            .with_rs(mat4::scale(Vec3::splat(2.0)))
            .unwrap();
        let core = c.rounded_core().unwrap();
        assert!(core.start.approx_eq(Vec3::new(1.0, 0.4, 0.0), EPSILON));
        assert!(core.end.approx_eq(Vec3::new(1.0, 1.6, 0.0), EPSILON));
        assert!((core.radius - 0.4).abs() < EPSILON);

        let s = Collider::sphere(1.0, ColliderState::Static)
            .unwrap()
            .with_rs(mat4::rotation_x(0.8))
            .unwrap();
        let core = s.rounded_core().unwrap();
        assert_eq!(core.start, core.end);

        // Ellipsoids and flat-sided shapes have no rounded core
        let stretched = s.with_rs(mat4::scale(Vec3::new(2.0, 1.0, 1.0))).unwrap();
        assert!(stretched.rounded_core().is_none());
        let cylinder = Collider::cylinder(1.0, 1.0, ColliderState::Static).unwrap();
        assert!(cylinder.rounded_core().is_none());
    }

    #[test]
    fn test_center() {
        let c = Collider::cylinder(1.0, 2.0, ColliderState::Static)
            .unwrap()
            .with_position(Vec3::new(0.0, 5.0, 0.0));
        assert!(c.center().approx_eq(Vec3::new(0.0, 6.0, 0.0), EPSILON));
    }
}
