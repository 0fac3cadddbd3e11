//! Collision core for collide3d
//!
//! This crate provides the per-mesh and per-collider collision algorithms:
//!
//! - [`mesh`] - Triangle extraction from raw vertex buffers
//! - [`AabbTree`] - Bounding-volume hierarchy over a mesh's polygons
//! - [`ground`] - Ground height resolution, border clamping and sliding
//! - [`Collider`] - Sphere, capsule, box and cylinder proxies with support functions
//! - [`gjk`] - GJK overlap test with EPA penetration depth
//!
//! ## Example
//!
//! ```
//! use collide3d_collision::{gjk, Collider, ColliderState, GjkConfig};
//! use collide3d_math::Vec3;
//!
//! let a = Collider::sphere(1.0, ColliderState::Dynamic).unwrap();
//! let b = Collider::sphere(1.0, ColliderState::Static)
//!     .unwrap()
//!     .with_position(Vec3::new(1.5, 0.0, 0.0));
//!
//! let hit = gjk::intersect(&a, &b, &GjkConfig::default()).unwrap();
//! assert!((hit.mtv().length() - 0.5).abs() < 0.01);
//! ```

mod error;
mod aabb_tree;
mod collider;
pub mod mesh;
pub mod ground;
pub mod gjk;

pub use error::CollisionError;
pub use aabb_tree::{AabbNode, AabbTree, RayHit, TreeConfig};
pub use collider::{Collider, ColliderShape, ColliderState, RoundedCore};
pub use ground::{clamp_to_bounds, ground_pos_y, sliding_point, GroundHit, DEFAULT_GROUND_DIR};
pub use gjk::{GjkConfig, Penetration};
pub use mesh::{Mesh, Topology};
