//! Per-frame collision detection over a scene
//!
//! A query names the families it wants (ground, mouse picking, GJK) and the
//! scene answers in a single [`CollisionOutput`]. Each family only looks at
//! items that declare it in their [`CollisionFlags`].

use collide3d_collision::{clamp_to_bounds, gjk, ground_pos_y, DEFAULT_GROUND_DIR};
use collide3d_math::{mat4, Plane, Polygon3, Ray3, Sphere, Vec3};

use crate::{CollisionFlags, ItemKey, Scene, SceneItem};

/// What to look for this frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CollisionInput {
    /// Last valid position of the point of view and its radius
    pub bounding_sphere: Sphere,
    /// Candidate position for this frame
    pub check_pos: Vec3,
    /// Ground direction; `None` uses the scene's configured one
    pub ground_dir: Option<Vec3>,
    pub families: CollisionFlags,
    /// World-space pick ray, required for [`CollisionFlags::MOUSE`]
    pub mouse_ray: Option<Ray3>,
}

impl CollisionInput {
    /// Query every family for a sphere that stays where it is
    pub fn new(bounding_sphere: Sphere) -> Self {
        Self {
            bounding_sphere,
            check_pos: bounding_sphere.center,
            ground_dir: None,
            families: CollisionFlags::ALL,
            mouse_ray: None,
        }
    }

    pub fn with_check_pos(mut self, check_pos: Vec3) -> Self {
        self.check_pos = check_pos;
        self
    }

    pub fn with_families(mut self, families: CollisionFlags) -> Self {
        self.families = families;
        self
    }

    pub fn with_ground_dir(mut self, dir: Vec3) -> Self {
        self.ground_dir = Some(dir);
        self
    }

    pub fn with_mouse_ray(mut self, ray: Ray3) -> Self {
        self.mouse_ray = Some(ray);
        self
    }
}

/// A polygon under the mouse ray
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PickHit {
    pub item: ItemKey,
    /// World-space distance from the ray origin
    pub distance: f32,
    pub point: Vec3,
    /// World-space polygon
    pub polygon: Polygon3,
}

/// A dynamic collider overlapping another collider
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CollidingPair {
    pub dynamic: ItemKey,
    pub other: ItemKey,
    /// Displacement of the dynamic item that separates the pair
    pub mtv: Vec3,
}

/// Everything a query found
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CollisionOutput {
    /// Families that produced at least one result
    pub collisions: CollisionFlags,
    /// Y the sphere center must take to stand on the ground
    pub ground_y: Option<f32>,
    /// Ground plane, facing against the ground direction
    pub ground_plane: Option<Plane>,
    pub ground_item: Option<ItemKey>,
    /// Picked polygons, nearest first
    pub picked: Vec<PickHit>,
    pub pairs: Vec<CollidingPair>,
    /// Sum of the MTVs against static colliders; zero when nothing collides.
    ///
    /// Two dynamic colliders report each other with opposite MTVs, so their
    /// pairs are listed but left out of the sum.
    pub min_trans_vec: Vec3,
    /// Check position kept inside the first ground item when it left every ground
    pub clamped_pos: Option<Vec3>,
}

impl CollisionOutput {
    #[inline]
    pub fn has(&self, family: CollisionFlags) -> bool {
        self.collisions.contains(family)
    }
}

impl Scene {
    /// Run the requested collision families against every item.
    ///
    /// Holds no state between calls: the same scene and input always give
    /// the same output.
    pub fn detect_collision(&self, input: &CollisionInput) -> CollisionOutput {
        let mut output = CollisionOutput::default();

        if input.families.contains(CollisionFlags::GROUND) {
            self.detect_ground(input, &mut output);
        }
        if input.families.contains(CollisionFlags::MOUSE) {
            if let Some(ray) = input.mouse_ray {
                self.detect_mouse(&ray, &mut output);
            }
        }
        if input.families.contains(CollisionFlags::GJK) {
            self.detect_gjk(&mut output);
        }

        log::trace!(
            "Collision query: {:?}, {} picks, {} pairs",
            output.collisions,
            output.picked.len(),
            output.pairs.len()
        );
        output
    }

    fn items_with(&self, family: CollisionFlags) -> impl Iterator<Item = (ItemKey, &SceneItem)> {
        self.iter().filter(move |(_, item)| item.flags.contains(family))
    }

    fn detect_ground(&self, input: &CollisionInput, output: &mut CollisionOutput) {
        let dir = match input.ground_dir.unwrap_or(self.config().ground_dir).normalized() {
            d if d == Vec3::ZERO => DEFAULT_GROUND_DIR,
            d => d,
        };
        let radius = input.bounding_sphere.radius;

        let mut first_ground: Option<&SceneItem> = None;
        for (key, item) in self.items_with(CollisionFlags::GROUND) {
            first_ground.get_or_insert(item);

            let model = *item.model_matrix();
            let inv = *item.model_matrix_inv();

            // Scaling the radius by the local length of the direction keeps
            // the ray origin exact under scaled models
            let local_dir = mat4::transform_vector(inv, dir);
            let local_sphere = Sphere::new(
                mat4::transform_point(inv, input.check_pos),
                radius * local_dir.length(),
            );

            if let Some(hit) = ground_pos_y(&local_sphere, item.tree(), local_dir) {
                let standing = mat4::transform_point(model, hit.point) - dir * radius;
                if output.ground_y.map_or(true, |y| standing.y > y) {
                    let mut plane = hit.polygon.transformed(model).plane();
                    if plane.normal.dot(dir) > 0.0 {
                        plane = plane.flipped();
                    }
                    output.ground_y = Some(standing.y);
                    output.ground_plane = Some(plane);
                    output.ground_item = Some(key);
                }
            }
        }

        if output.ground_y.is_some() {
            output.collisions |= CollisionFlags::GROUND;
        } else if let Some(item) = first_ground {
            if let Some(bounds) = item.local_bounds() {
                let inv = *item.model_matrix_inv();
                let previous = mat4::transform_point(inv, input.bounding_sphere.center);
                let candidate = mat4::transform_point(inv, input.check_pos);
                let clamped = clamp_to_bounds(previous, candidate, &bounds);
                output.clamped_pos = Some(mat4::transform_point(*item.model_matrix(), clamped));
            }
        }
    }

    fn detect_mouse(&self, ray: &Ray3, output: &mut CollisionOutput) {
        for (key, item) in self.items_with(CollisionFlags::MOUSE) {
            let model = *item.model_matrix();
            let local_ray = ray.transformed(*item.model_matrix_inv());

            for polygon in item.tree().resolve(&local_ray) {
                let t = match polygon.intersect_ray(&local_ray) {
                    Some(t) if t >= 0.0 => t,
                    _ => continue,
                };
                let point = mat4::transform_point(model, local_ray.at(t));
                output.picked.push(PickHit {
                    item: key,
                    distance: point.distance(ray.origin),
                    point,
                    polygon: polygon.transformed(model),
                });
            }
        }

        if !output.picked.is_empty() {
            output.picked.sort_by(|a, b| a.distance.total_cmp(&b.distance));
            output.collisions |= CollisionFlags::MOUSE;
        }
    }

    fn detect_gjk(&self, output: &mut CollisionOutput) {
        let gjk_config = self.config().gjk;

        for (dynamic_key, dynamic_item) in self.items_with(CollisionFlags::GJK) {
            let dynamic = match dynamic_item.collider() {
                Some(c) if c.is_dynamic() => c,
                _ => continue,
            };
            let dynamic_bounds = dynamic.bounds();

            for (other_key, other_item) in self.items_with(CollisionFlags::GJK) {
                if other_key == dynamic_key {
                    continue;
                }
                let other = match other_item.collider() {
                    Some(c) => c,
                    None => continue,
                };
                if !dynamic_bounds.intersects(&other.bounds()) {
                    continue;
                }

                if let Some(hit) = gjk::intersect(dynamic, other, &gjk_config) {
                    let mtv = hit.mtv();
                    output.pairs.push(CollidingPair {
                        dynamic: dynamic_key,
                        other: other_key,
                        mtv,
                    });
                    if !other.is_dynamic() {
                        output.min_trans_vec += mtv;
                    }
                }
            }
        }

        if !output.pairs.is_empty() {
            output.collisions |= CollisionFlags::GJK;
        }
    }
}
