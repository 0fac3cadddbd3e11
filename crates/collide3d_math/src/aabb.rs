//! Axis-aligned bounding box

use serde::{Deserialize, Serialize};

use crate::{Polygon3, Ray3, Vec3};

/// An axis-aligned bounding box
///
/// Invariant: `min` is component-wise less than or equal to `max`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Minimum corner (all components are minimums)
    pub min: Vec3,
    /// Maximum corner (all components are maximums)
    pub max: Vec3,
}

impl Aabb {
    /// Create a new box from two corners, ordering their components
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min_components(b),
            max: a.max_components(b),
        }
    }

    /// Create a box centered at a position with given half-extents
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        Self::new(center - half_extents, center + half_extents)
    }

    /// Tight bounds of a point set; a zero box at the origin for no points
    pub fn from_points(points: &[Vec3]) -> Self {
        let mut iter = points.iter();
        let Some(&first) = iter.next() else {
            return Self::new(Vec3::ZERO, Vec3::ZERO);
        };
        iter.fold(Self { min: first, max: first }, |b, &p| b.extended(p))
    }

    /// Tight bounds of every vertex of the polygons, `None` when empty
    pub fn from_polygons(polygons: &[Polygon3]) -> Option<Self> {
        let (first, rest) = polygons.split_first()?;
        Some(rest.iter().fold(first.bounds(), |b, p| b.union(&p.bounds())))
    }

    /// Box grown to include `p`
    pub fn extended(&self, p: Vec3) -> Self {
        Self {
            min: self.min.min_components(p),
            max: self.max.max_components(p),
        }
    }

    /// Smallest box containing both boxes
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.min_components(other.min),
            max: self.max.max_components(other.max),
        }
    }

    /// Get the center of the box
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the full size in each dimension
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Index of the longest axis (0=X, 1=Y, 2=Z); ties prefer the lower index
    pub fn longest_axis(&self) -> usize {
        let s = self.size();
        if s.x >= s.y && s.x >= s.z {
            0
        } else if s.y >= s.z {
            1
        } else {
            2
        }
    }

    /// Check if a point is inside or on the box
    pub fn contains_point(&self, p: Vec3) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    /// Check if `other` lies entirely inside or on this box
    pub fn contains(&self, other: &Self) -> bool {
        self.contains_point(other.min) && self.contains_point(other.max)
    }

    /// Check if two boxes overlap (touching counts)
    pub fn intersects(&self, other: &Self) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// Slab test: the `(enter, exit)` ray parameters, `None` on a miss.
    ///
    /// `enter` is negative when the origin is inside the box. Boxes that lie
    /// entirely behind the origin are a miss.
    pub fn intersect_ray(&self, ray: &Ray3) -> Option<(f32, f32)> {
        let mut t_enter = f32::NEG_INFINITY;
        let mut t_exit = f32::INFINITY;

        for axis in 0..3 {
            let o = ray.origin.axis(axis);
            let d = ray.direction.axis(axis);
            let lo = self.min.axis(axis);
            let hi = self.max.axis(axis);

            if d.abs() <= f32::EPSILON {
                // Parallel to this slab: must already be between its faces
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / d;
            let mut t0 = (lo - o) * inv;
            let mut t1 = (hi - o) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_enter = t_enter.max(t0);
            t_exit = t_exit.min(t1);
            if t_enter > t_exit {
                return None;
            }
        }

        (t_exit >= 0.0).then_some((t_enter, t_exit))
    }
}
