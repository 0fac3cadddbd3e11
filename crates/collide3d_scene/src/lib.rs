//! Scene-level collision for collide3d
//!
//! A [`Scene`] owns [`SceneItem`]s (a mesh with its AABB tree, a model
//! matrix and an optional convex collider) under generational [`ItemKey`]s.
//! Once per frame, after every transform has been updated,
//! [`Scene::detect_collision`] answers a [`CollisionInput`] with a
//! [`CollisionOutput`]: the ground height below the point of view, the
//! polygons under the mouse ray and the colliding convex pairs.
//!
//! ```
//! use collide3d_math::{Polygon3, Sphere, Vec3};
//! use collide3d_scene::{CollisionFlags, CollisionInput, Scene, SceneItem};
//!
//! let mut scene = Scene::new();
//! scene.add_item(
//!     SceneItem::new("floor")
//!         .with_polygons(vec![Polygon3::new(
//!             Vec3::new(-5.0, 0.0, -5.0),
//!             Vec3::new(-5.0, 0.0, 5.0),
//!             Vec3::new(5.0, 0.0, -5.0),
//!         )])
//!         .with_flags(CollisionFlags::GROUND),
//! );
//!
//! let input = CollisionInput::new(Sphere::new(Vec3::new(-1.0, 2.0, -1.0), 0.5));
//! let output = scene.detect_collision(&input);
//! assert!((output.ground_y.unwrap() - 0.5).abs() < 1e-4);
//! ```

mod error;
mod item;
mod query;
mod scene;

pub use error::SceneError;
pub use item::{CollisionFlags, ItemKey, SceneItem};
pub use query::{CollidingPair, CollisionInput, CollisionOutput, PickHit};
pub use scene::{Scene, SceneConfig};
