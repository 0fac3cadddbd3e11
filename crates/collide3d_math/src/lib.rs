//! 3D Mathematics Library
//!
//! This crate provides the vector, matrix and geometry value types used by
//! the collide3d collision core.
//!
//! ## Core Types
//!
//! - [`Vec3`] - 3D vector with x, y, z components
//! - [`Mat4`] - 4x4 column-major matrix for affine transformations
//!
//! ## Geometry Types
//!
//! - [`Polygon3`] - A triangle
//! - [`Aabb`] - An axis-aligned bounding box
//! - [`Ray3`], [`Segment3`], [`Sphere`], [`Plane`] - Query primitives

mod vec3;
mod aabb;
mod polygon;
mod primitives;
pub mod mat4;

pub use vec3::Vec3;
pub use mat4::Mat4;
pub use aabb::Aabb;
pub use polygon::Polygon3;
pub use primitives::{Plane, Ray3, Segment3, Sphere};
