//! SceneBuilder - Declarative demo scene construction
//!
//! Provides a fluent API for building collision scenes: a landscape to walk
//! on, a dynamic player capsule and static obstacles.

use collide3d_collision::{Collider, ColliderState, Mesh, Topology};
use collide3d_math::{mat4, Mat4, Vec3};
use collide3d_scene::{CollisionFlags, ItemKey, Scene, SceneConfig, SceneError, SceneItem};

/// Builder for constructing demo scenes
///
/// # Example
/// ```ignore
/// let builder = SceneBuilder::new()
///     .add_landscape(10.0, 16, 0.3)?
///     .add_player(Vec3::new(0.0, 2.0, 0.0), 0.2, 0.85)?
///     .add_gjk_showcase()?;
/// let player = builder.player();
/// let scene = builder.build();
/// ```
pub struct SceneBuilder {
    scene: Scene,
    player: Option<ItemKey>,
}

impl SceneBuilder {
    /// Create a new scene builder
    pub fn new() -> Self {
        Self::with_config(SceneConfig::default())
    }

    pub fn with_config(config: SceneConfig) -> Self {
        Self {
            scene: Scene::with_config(config),
            player: None,
        }
    }

    /// Add a square rolling landscape centered on the origin
    ///
    /// The surface is `y = amplitude * sin(0.6 x) * cos(0.4 z)`; an amplitude
    /// of zero gives a flat floor at y = 0.
    pub fn add_landscape(
        mut self,
        half_size: f32,
        subdivisions: u32,
        amplitude: f32,
    ) -> Result<Self, SceneError> {
        let mesh = landscape_mesh(half_size, subdivisions.max(1), amplitude);
        self.scene.add_item(
            SceneItem::new("landscape")
                .with_mesh(&mesh)?
                .with_flags(CollisionFlags::GROUND | CollisionFlags::MOUSE),
        );
        Ok(self)
    }

    /// Add the player: a dynamic capsule standing at `position`
    pub fn add_player(mut self, position: Vec3, radius: f32, height: f32) -> Result<Self, SceneError> {
        let key = self.scene.add_item(
            SceneItem::new("player")
                .with_flags(CollisionFlags::GJK)
                .with_model(mat4::translation(position))?
                .with_collider(Collider::capsule(radius, height, ColliderState::Dynamic)?)?,
        );
        self.player = Some(key);
        Ok(self)
    }

    /// Add a static obstacle placed by `model`
    pub fn add_obstacle(mut self, name: &str, collider: Collider, model: Mat4) -> Result<Self, SceneError> {
        self.scene.add_item(
            SceneItem::new(name)
                .with_flags(CollisionFlags::GJK)
                .with_model(model)?
                .with_collider(collider)?,
        );
        Ok(self)
    }

    /// One obstacle of each collider shape around the origin
    pub fn add_gjk_showcase(self) -> Result<Self, SceneError> {
        let rotated_box = mat4::mul(
            mat4::translation(Vec3::new(-5.0, 0.0, 3.5)),
            mat4::mul(mat4::rotation_y(std::f32::consts::FRAC_PI_4), mat4::rotation_z(0.15 * std::f32::consts::PI)),
        );

        self.add_obstacle(
            "capsule",
            Collider::capsule(0.17, 0.85, ColliderState::Static)?,
            mat4::translation(Vec3::new(5.0, 0.0, -2.0)),
        )?
        .add_obstacle(
            "box",
            Collider::cuboid(Vec3::new(-0.4, -1.7, -1.3), Vec3::new(0.4, 1.7, 1.3), ColliderState::Static)?,
            rotated_box,
        )?
        .add_obstacle(
            "sphere",
            Collider::sphere(1.2, ColliderState::Static)?,
            mat4::translation(Vec3::new(-5.0, 0.2, -3.5)),
        )?
        .add_obstacle(
            "cylinder",
            Collider::cylinder(2.1, 1.5, ColliderState::Static)?,
            mat4::translation(Vec3::new(5.0, 0.2, 4.1)),
        )
    }

    /// Key of the player item, if one was added
    pub fn player(&self) -> Option<ItemKey> {
        self.player
    }

    /// Build the scene
    pub fn build(self) -> Scene {
        self.scene
    }
}

impl Default for SceneBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Indexed grid mesh of the rolling landscape
fn landscape_mesh(half_size: f32, subdivisions: u32, amplitude: f32) -> Mesh {
    let n = subdivisions;
    let cell = 2.0 * half_size / n as f32;

    let mut vertices = Vec::with_capacity(((n + 1) * (n + 1) * 3) as usize);
    for row in 0..=n {
        for col in 0..=n {
            let x = -half_size + col as f32 * cell;
            let z = -half_size + row as f32 * cell;
            let y = amplitude * (0.6 * x).sin() * (0.4 * z).cos();
            vertices.extend_from_slice(&[x, y, z]);
        }
    }

    let mut indices = Vec::with_capacity((n * n * 6) as usize);
    for row in 0..n {
        for col in 0..n {
            let i0 = row * (n + 1) + col;
            let i1 = i0 + n + 1;
            let i2 = i0 + 1;
            let i3 = i1 + 1;
            indices.extend_from_slice(&[i0, i1, i2, i2, i1, i3]);
        }
    }

    Mesh::new(vertices, 3, Topology::Triangles).with_indices(indices)
}
