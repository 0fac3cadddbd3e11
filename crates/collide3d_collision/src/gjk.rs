//! GJK overlap test with EPA penetration refinement
//!
//! Both stages only query the colliders through their support functions,
//! so every pair of shapes goes through the same code. GJK searches the
//! Minkowski difference `A - B` for a tetrahedron enclosing the origin; EPA
//! then grows that tetrahedron toward the boundary of `A - B` until the
//! face nearest the origin stops moving, which gives the penetration
//! normal and depth.
//!
//! Pairs of spheres and capsules skip both stages: their penetration
//! follows from the closest points of their core segments. The boundary
//! of `A - B` is fully curved for them, which EPA only approaches slowly.

use collide3d_math::Vec3;
use serde::{Deserialize, Serialize};

use crate::{Collider, RoundedCore};

const EPSILON: f32 = 1e-6;

/// Iteration caps and tolerances of the narrow phase
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GjkConfig {
    /// GJK refinement steps before giving up (reported as no overlap)
    pub gjk_max_iterations: usize,
    /// EPA expansion steps before giving up (reported as no overlap)
    pub epa_max_iterations: usize,
    /// EPA stops when a new support point gains less than this, relative to
    /// the current depth (absolute below a depth of 1)
    pub epa_tolerance: f32,
    /// Penetrations not deeper than this count as touching
    pub touch_tolerance: f32,
}

impl Default for GjkConfig {
    fn default() -> Self {
        Self {
            gjk_max_iterations: 32,
            epa_max_iterations: 255,
            epa_tolerance: 1e-3,
            touch_tolerance: 1e-4,
        }
    }
}

/// How deep two colliders interpenetrate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Penetration {
    /// Unit normal of the `A - B` boundary nearest the origin
    pub normal: Vec3,
    pub depth: f32,
}

impl Penetration {
    /// Minimum translation vector: the displacement to apply to `A` so the
    /// two colliders stop overlapping
    pub fn mtv(&self) -> Vec3 {
        -self.normal * self.depth
    }
}

/// Test two colliders and compute how to separate them.
///
/// Returns `None` when the colliders are apart, only touch, or when the
/// refinement fails to converge within the configured caps.
pub fn intersect(a: &Collider, b: &Collider, config: &GjkConfig) -> Option<Penetration> {
    let penetration = match (a.rounded_core(), b.rounded_core()) {
        (Some(core_a), Some(core_b)) => rounded_penetration(&core_a, &core_b)?,
        _ => {
            let tetrahedron = gjk(a, b, config)?;
            epa(a, b, tetrahedron, config)?
        }
    };
    if penetration.depth <= config.touch_tolerance {
        return None;
    }
    Some(penetration)
}

/// Boolean GJK test without penetration refinement
pub fn overlaps(a: &Collider, b: &Collider, config: &GjkConfig) -> bool {
    gjk(a, b, config).is_some()
}

/// Exact penetration of two rounded cores, `None` when apart
fn rounded_penetration(a: &RoundedCore, b: &RoundedCore) -> Option<Penetration> {
    let (on_a, on_b) = closest_points_on_segments(a.start, a.end, b.start, b.end);
    let reach = a.radius + b.radius;
    let between = on_b - on_a;
    let distance = between.length();
    if distance >= reach {
        return None;
    }

    let normal = if distance > EPSILON {
        between / distance
    } else {
        coincident_axis(a, b)
    };
    Some(Penetration {
        normal,
        depth: reach - distance,
    })
}

/// Separating axis for cores that cross: perpendicular to both segments,
/// along which `A - B` is only as thick as the two radii
fn coincident_axis(a: &RoundedCore, b: &RoundedCore) -> Vec3 {
    let da = a.end - a.start;
    let db = b.end - b.start;
    let both = da.cross(db);
    if both.length_squared() > EPSILON {
        return both.normalized();
    }
    let axis = if da.length_squared() > EPSILON { da } else { db };
    if axis.length_squared() > EPSILON {
        axis.any_perpendicular()
    } else {
        Vec3::Y
    }
}

/// Closest points between segments `p1 q1` and `p2 q2`; either may be a point
fn closest_points_on_segments(p1: Vec3, q1: Vec3, p2: Vec3, q2: Vec3) -> (Vec3, Vec3) {
    let d1 = q1 - p1;
    let d2 = q2 - p2;
    let r = p1 - p2;
    let a = d1.dot(d1);
    let e = d2.dot(d2);
    let f = d2.dot(r);

    if a <= EPSILON && e <= EPSILON {
        return (p1, p2);
    }
    let (s, t) = if a <= EPSILON {
        (0.0, (f / e).clamp(0.0, 1.0))
    } else {
        let c = d1.dot(r);
        if e <= EPSILON {
            ((-c / a).clamp(0.0, 1.0), 0.0)
        } else {
            let b = d1.dot(d2);
            let denom = a * e - b * b;
            // Parallel segments: any s works, start from p1
            let s = if denom > EPSILON {
                ((b * f - c * e) / denom).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let t = (b * s + f) / e;
            if t < 0.0 {
                ((-c / a).clamp(0.0, 1.0), 0.0)
            } else if t > 1.0 {
                (((b - c) / a).clamp(0.0, 1.0), 1.0)
            } else {
                (s, t)
            }
        }
    };
    (p1 + d1 * s, p2 + d2 * t)
}

#[inline]
fn support_diff(a: &Collider, b: &Collider, dir: Vec3) -> Vec3 {
    a.support(dir) - b.support(-dir)
}

fn initial_direction(a: &Collider, b: &Collider) -> Vec3 {
    let dir = a.center() - b.center();
    if dir.length_squared() <= EPSILON {
        Vec3::X
    } else {
        dir
    }
}

/// A tetrahedron of `A - B` enclosing the origin, or `None` when apart
fn gjk(a: &Collider, b: &Collider, config: &GjkConfig) -> Option<[Vec3; 4]> {
    let mut dir = initial_direction(a, b);
    let mut simplex: Vec<Vec3> = Vec::with_capacity(4);

    let first = support_diff(a, b, dir);
    simplex.push(first);
    dir = -first;

    for _ in 0..config.gjk_max_iterations {
        if dir.length_squared() <= EPSILON {
            // Origin lies on the current simplex: grow it to full dimension
            // and let the tetrahedron test pick the next feature
            if !complete_tetrahedron(&mut simplex, a, b) {
                return None;
            }
            if handle_tetrahedron(&mut simplex, &mut dir) {
                return tetrahedron(&simplex);
            }
            continue;
        }

        let support = support_diff(a, b, dir);
        if support.dot(dir) <= 0.0 {
            return None;
        }
        if simplex.iter().any(|p| (*p - support).length_squared() <= EPSILON) {
            return None;
        }

        simplex.push(support);
        if handle_simplex(&mut simplex, &mut dir) {
            return tetrahedron(&simplex);
        }
    }

    log::trace!("GJK hit its iteration cap of {}", config.gjk_max_iterations);
    None
}

/// Checked conversion of a 4-point simplex; flat ones are rejected
fn tetrahedron(simplex: &[Vec3]) -> Option<[Vec3; 4]> {
    let [d, c, b, a]: [Vec3; 4] = simplex.try_into().ok()?;
    let volume = (b - a).cross(c - a).dot(d - a).abs();
    if volume <= EPSILON * EPSILON {
        log::trace!("GJK produced a flat tetrahedron, treated as touching");
        return None;
    }
    Some([d, c, b, a])
}

/// Add support points to a simplex whose affine hull contains the origin
/// until it has four affinely independent points.
///
/// Each new point must lie strictly beyond the origin along a direction
/// orthogonal to the current hull, which also makes it independent. When no
/// such point exists the shapes only touch.
fn complete_tetrahedron(simplex: &mut Vec<Vec3>, a: &Collider, b: &Collider) -> bool {
    while simplex.len() < 4 {
        let mut added = false;
        'dir_search: for d in expansion_directions(simplex) {
            let d = d.normalized();
            if d == Vec3::ZERO {
                continue;
            }
            for query_dir in [d, -d] {
                let support = support_diff(a, b, query_dir);
                if support.dot(query_dir) > EPSILON {
                    simplex.push(support);
                    added = true;
                    break 'dir_search;
                }
            }
        }
        if !added {
            return false;
        }
    }
    true
}

fn expansion_directions(simplex: &[Vec3]) -> Vec<Vec3> {
    match simplex.len() {
        0 | 1 => vec![Vec3::X, Vec3::Y, Vec3::Z],
        2 => {
            let edge = simplex[1] - simplex[0];
            let perp = edge.any_perpendicular();
            vec![perp, edge.cross(perp)]
        }
        _ => {
            let a = simplex[2];
            let b = simplex[1];
            let c = simplex[0];
            let normal = (b - a).cross(c - a);
            if normal.length_squared() <= EPSILON {
                vec![(b - a).any_perpendicular()]
            } else {
                vec![normal]
            }
        }
    }
}

/// Reduce the simplex to the feature closest to the origin and point `dir`
/// at the origin from it. Returns true once a tetrahedron encloses the origin.
fn handle_simplex(simplex: &mut Vec<Vec3>, dir: &mut Vec3) -> bool {
    match simplex.len() {
        2 => handle_line(simplex, dir),
        3 => handle_triangle(simplex, dir),
        4 => handle_tetrahedron(simplex, dir),
        _ => false,
    }
}

fn handle_line(simplex: &mut Vec<Vec3>, dir: &mut Vec3) -> bool {
    let a = simplex[1];
    let b = simplex[0];
    let ab = b - a;
    let ab_len_sq = ab.length_squared();
    if ab_len_sq <= EPSILON {
        *dir = -a;
        return false;
    }

    let t = (-a).dot(ab) / ab_len_sq;
    if t <= 0.0 {
        *simplex = vec![a];
        *dir = -a;
        return false;
    }
    if t >= 1.0 {
        *simplex = vec![b];
        *dir = -b;
        return false;
    }

    *dir = -(a + ab * t);
    if dir.length_squared() <= EPSILON {
        *dir = Vec3::ZERO;
    }
    false
}

fn handle_triangle(simplex: &mut Vec<Vec3>, dir: &mut Vec3) -> bool {
    let a = simplex[2];
    let b = simplex[1];
    let c = simplex[0];

    let ab = b - a;
    let ac = c - a;

    // Voronoi regions of the triangle, vertex A first
    let d1 = ab.dot(-a);
    let d2 = ac.dot(-a);
    if d1 <= 0.0 && d2 <= 0.0 {
        *simplex = vec![a];
        *dir = -a;
        return false;
    }

    let d3 = ab.dot(-b);
    let d4 = ac.dot(-b);
    if d3 >= 0.0 && d4 <= d3 {
        *simplex = vec![b];
        *dir = -b;
        return false;
    }

    let vc = d1 * d4 - d3 * d2;
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        let v = d1 / (d1 - d3);
        *simplex = vec![b, a];
        *dir = -(a + ab * v);
        return false;
    }

    let d5 = ab.dot(-c);
    let d6 = ac.dot(-c);
    if d6 >= 0.0 && d5 <= d6 {
        *simplex = vec![c];
        *dir = -c;
        return false;
    }

    let vb = d5 * d2 - d1 * d6;
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        let w = d2 / (d2 - d6);
        *simplex = vec![c, a];
        *dir = -(a + ac * w);
        return false;
    }

    let va = d3 * d6 - d5 * d4;
    if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
        let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
        *simplex = vec![c, b];
        *dir = -(b + (c - b) * w);
        return false;
    }

    // Inside the triangle: head for the origin from its closest point
    let denom = 1.0 / (va + vb + vc);
    let closest = a + ab * (vb * denom) + ac * (vc * denom);
    *dir = -closest;
    if dir.length_squared() <= EPSILON {
        *dir = Vec3::ZERO;
    }
    false
}

fn handle_tetrahedron(simplex: &mut Vec<Vec3>, dir: &mut Vec3) -> bool {
    let a = simplex[3];
    let b = simplex[2];
    let c = simplex[1];
    let d = simplex[0];

    // Only faces touching the newest point A can face the origin
    for (p, q, opposite) in [(b, c, d), (c, d, b), (d, b, c)] {
        if let Some(normal) = face_toward_origin(a, p, q, opposite) {
            *simplex = vec![q, p, a];
            *dir = normal;
            return false;
        }
    }
    true
}

/// Outward normal of face (a, b, c) when the origin lies in front of it
fn face_toward_origin(a: Vec3, b: Vec3, c: Vec3, opposite: Vec3) -> Option<Vec3> {
    let mut normal = (b - a).cross(c - a);
    if normal.dot(opposite - a) > 0.0 {
        normal = -normal;
    }
    (normal.dot(-a) > 0.0).then_some(normal)
}

#[derive(Debug, Clone, Copy)]
struct Face {
    idx: [usize; 3],
    normal: Vec3,
    distance: f32,
}

/// Face wound so its normal points away from `interior`; `None` if flat
fn make_face(points: &[Vec3], mut idx: [usize; 3], interior: Vec3) -> Option<Face> {
    let [a, b, c] = idx.map(|i| points[i]);
    let n = (b - a).cross(c - a);
    let len = n.length();
    if len <= 1e-10 {
        return None;
    }
    let mut normal = n / len;
    if normal.dot(a - interior) < 0.0 {
        normal = -normal;
        idx.swap(1, 2);
    }
    Some(Face {
        idx,
        normal,
        distance: normal.dot(a),
    })
}

/// Record a horizon edge; the reversed edge of a neighbouring removed face
/// cancels it
fn add_edge(edges: &mut Vec<[usize; 2]>, a: usize, b: usize) {
    if let Some(pos) = edges.iter().position(|e| e[0] == b && e[1] == a) {
        edges.swap_remove(pos);
    } else {
        edges.push([a, b]);
    }
}

fn epa(a: &Collider, b: &Collider, tetrahedron: [Vec3; 4], config: &GjkConfig) -> Option<Penetration> {
    // Stays inside the polytope as it grows
    let interior = (tetrahedron[0] + tetrahedron[1] + tetrahedron[2] + tetrahedron[3]) / 4.0;
    let mut points = tetrahedron.to_vec();
    let mut faces: Vec<Face> = [[0, 1, 2], [0, 3, 1], [0, 2, 3], [1, 3, 2]]
        .into_iter()
        .filter_map(|idx| make_face(&points, idx, interior))
        .collect();
    if faces.len() < 4 {
        return None;
    }

    for _ in 0..config.epa_max_iterations {
        let closest = *faces
            .iter()
            .min_by(|f, g| f.distance.total_cmp(&g.distance))?;

        let support = support_diff(a, b, closest.normal);
        let gain = support.dot(closest.normal) - closest.distance;
        let known = points.iter().any(|p| (*p - support).length_squared() <= EPSILON);
        if gain < config.epa_tolerance * closest.distance.max(1.0) || known {
            return Some(Penetration {
                normal: closest.normal,
                depth: closest.distance.max(0.0),
            });
        }

        let new_idx = points.len();
        points.push(support);

        let mut edges: Vec<[usize; 2]> = Vec::new();
        faces.retain(|f| {
            let visible = f.normal.dot(support - points[f.idx[0]]) > EPSILON;
            if visible {
                add_edge(&mut edges, f.idx[0], f.idx[1]);
                add_edge(&mut edges, f.idx[1], f.idx[2]);
                add_edge(&mut edges, f.idx[2], f.idx[0]);
            }
            !visible
        });

        for [e0, e1] in edges {
            if let Some(face) = make_face(&points, [e0, e1, new_idx], interior) {
                faces.push(face);
            }
        }
        if faces.is_empty() {
            return None;
        }
    }

    log::warn!(
        "EPA did not converge within {} iterations, reporting no overlap",
        config.epa_max_iterations
    );
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ColliderState;
    use collide3d_math::mat4;

    fn sphere_at(radius: f32, p: Vec3) -> Collider {
        Collider::sphere(radius, ColliderState::Static).unwrap().with_position(p)
    }

    fn cube_at(half: f32, p: Vec3) -> Collider {
        Collider::cuboid(Vec3::splat(-half), Vec3::splat(half), ColliderState::Static)
            .unwrap()
            .with_position(p)
    }

    #[test]
    fn test_spheres_overlapping() {
        let a = sphere_at(1.0, Vec3::ZERO);
        let b = sphere_at(1.0, Vec3::new(1.5, 0.0, 0.0));
        let pen = intersect(&a, &b, &GjkConfig::default()).expect("Should overlap");
        let mtv = pen.mtv();
        assert!((mtv.length() - 0.5).abs() < 0.01, "mtv {:?}", mtv);
        assert!(mtv.x < -0.49);
        assert!(mtv.y.abs() < 0.05 && mtv.z.abs() < 0.05);
    }

    #[test]
    fn test_spheres_apart() {
        let a = sphere_at(1.0, Vec3::ZERO);
        let b = sphere_at(1.0, Vec3::new(3.0, 0.0, 0.0));
        assert!(intersect(&a, &b, &GjkConfig::default()).is_none());
        assert!(!overlaps(&a, &b, &GjkConfig::default()));
    }

    #[test]
    fn test_spheres_touching() {
        let a = sphere_at(1.0, Vec3::ZERO);
        let b = sphere_at(1.0, Vec3::new(2.0, 0.0, 0.0));
        assert!(intersect(&a, &b, &GjkConfig::default()).is_none());
    }

    #[test]
    fn test_default_tuning() {
        let config = GjkConfig::default();
        assert_eq!(config.gjk_max_iterations, 32);
        assert_eq!(config.epa_max_iterations, 255);
        assert_eq!(config.epa_tolerance, 1e-3);
        assert_eq!(config.touch_tolerance, 1e-4);
    }

    #[test]
    fn test_coincident_centers() {
        let config = GjkConfig::default();
        let a = sphere_at(1.0, Vec3::new(2.0, 1.0, 0.0));
        let b = sphere_at(1.0, Vec3::new(2.0, 1.0, 0.0));
        assert!(overlaps(&a, &b, &config));
        let pen = intersect(&a, &b, &config).expect("Should overlap");
        assert!((pen.depth - 2.0).abs() < 0.0001);
        assert!((pen.mtv().length() - 2.0).abs() < 0.0001);

        let a = cube_at(1.0, Vec3::new(2.0, 1.0, 0.0));
        let b = cube_at(1.0, Vec3::new(2.0, 1.0, 0.0));
        let pen = intersect(&a, &b, &config).expect("Should overlap");
        assert!((pen.depth - 2.0).abs() < 0.001);
    }

    #[test]
    fn test_deep_sphere_overlaps() {
        let config = GjkConfig::default();
        for d in [0.0, 0.01, 0.05, 0.08] {
            let a = sphere_at(1.0, Vec3::ZERO);
            let b = sphere_at(1.0, Vec3::new(d, 0.0, 0.0));
            let pen = intersect(&a, &b, &config).unwrap_or_else(|| panic!("d = {} should overlap", d));
            assert!((pen.depth - (2.0 - d)).abs() < 0.0001, "d = {}: depth {}", d, pen.depth);
            if d > 0.0 {
                assert!(pen.mtv().approx_eq(Vec3::new(d - 2.0, 0.0, 0.0), 0.0001));
            }
        }
    }

    #[test]
    fn test_crossing_capsules() {
        let upright = Collider::capsule(0.2, 2.0, ColliderState::Dynamic)
            .unwrap()
            .with_position(Vec3::new(0.0, -1.0, 0.0));
        // Lying along X, its middle on the origin
        let rs = mat4::rotation_z(std::f32::consts::FRAC_PI_2);
        let lying = Collider::capsule(0.2, 2.0, ColliderState::Static)
            .unwrap()
            .with_position(-mat4::transform_vector(rs, Vec3::Y))
            .with_rs(rs)
            .unwrap();

        let pen = intersect(&upright, &lying, &GjkConfig::default()).expect("Should overlap");
        assert!((pen.depth - 0.4).abs() < 0.0001);
        assert!((pen.normal.z.abs() - 1.0).abs() < 0.0001);
    }

    #[test]
    fn test_capsule_sunk_in_cylinder() {
        // Coaxial, with the capsule spanning y 0.1..0.95 inside a 1 tall cylinder
        let capsule = Collider::capsule(0.2, 0.85, ColliderState::Dynamic)
            .unwrap()
            .with_position(Vec3::new(0.0, 0.1, 0.0));
        let cylinder = Collider::cylinder(1.0, 1.0, ColliderState::Static).unwrap();

        let pen = intersect(&capsule, &cylinder, &GjkConfig::default()).expect("Should overlap");
        // Out through the top: 1.0 - 0.1
        assert!((pen.depth - 0.9).abs() < 0.01, "depth {}", pen.depth);
        let mtv = pen.mtv();
        assert!(mtv.y > 0.89 && mtv.x.abs() < 0.01 && mtv.z.abs() < 0.01, "mtv {:?}", mtv);
    }

    #[test]
    fn test_box_box_symmetry() {
        let a = cube_at(1.0, Vec3::ZERO);
        let b = cube_at(1.0, Vec3::new(1.5, 0.3, 0.2));
        let config = GjkConfig::default();

        let ab = intersect(&a, &b, &config).expect("Should overlap");
        let ba = intersect(&b, &a, &config).expect("Should overlap");

        assert!(ab.mtv().approx_eq(Vec3::new(-0.5, 0.0, 0.0), 0.001), "{:?}", ab.mtv());
        assert!((ab.mtv() + ba.mtv()).length() < 0.001);
        assert!((ab.depth - ba.depth).abs() < 0.001);
    }

    #[test]
    fn test_box_box_apart_both_ways() {
        let a = cube_at(1.0, Vec3::ZERO);
        let b = cube_at(1.0, Vec3::new(0.0, 2.5, 0.0));
        let config = GjkConfig::default();
        assert!(intersect(&a, &b, &config).is_none());
        assert!(intersect(&b, &a, &config).is_none());
    }

    #[test]
    fn test_rotated_box_against_sphere() {
        // Box rotated 45 degrees around Y: its corner reaches sqrt(2) along X
        let b = cube_at(1.0, Vec3::ZERO)
            .with_rs(mat4::rotation_y(std::f32::consts::FRAC_PI_4))
            .unwrap();
        let near = sphere_at(0.5, Vec3::new(1.8, 0.0, 0.0));
        let far = sphere_at(0.5, Vec3::new(2.0, 0.0, 0.0));
        let config = GjkConfig::default();
        assert!(intersect(&near, &b, &config).is_some());
        assert!(intersect(&far, &b, &config).is_none());
    }

    #[test]
    fn test_sphere_inside_box() {
        let big = cube_at(5.0, Vec3::ZERO);
        let small = sphere_at(0.5, Vec3::new(1.0, 0.0, 0.0));
        let pen = intersect(&small, &big, &GjkConfig::default()).expect("Should overlap");
        // Shortest way out is +X: 4 to the wall plus the radius
        assert!((pen.depth - 4.5).abs() < 0.01);
        assert!(pen.mtv().x > 4.4);
    }

    #[test]
    fn test_capsule_approaching_cylinder() {
        let cylinder = Collider::cylinder(0.3, 1.0, ColliderState::Static)
            .unwrap()
            .with_position(Vec3::new(0.0, 0.0, -1.0));
        let mut capsule = Collider::capsule(0.2, 0.85, ColliderState::Dynamic).unwrap();
        let config = GjkConfig::default();

        capsule.set_position(Vec3::new(0.0, 0.0, -0.4));
        assert!(intersect(&capsule, &cylinder, &config).is_none());

        capsule.set_position(Vec3::new(0.0, 0.0, -0.6));
        let pen = intersect(&capsule, &cylinder, &config).expect("Should overlap");
        let mtv = pen.mtv();
        assert!(mtv.z > 0.0);
        assert!((mtv.z - 0.1).abs() < 0.01, "mtv {:?}", mtv);
    }

    #[test]
    fn test_mtv_separates() {
        let a = sphere_at(1.0, Vec3::new(0.2, 0.3, 0.0));
        let b = cube_at(1.0, Vec3::new(1.2, 0.0, 0.4));
        let config = GjkConfig::default();
        let pen = intersect(&a, &b, &config).expect("Should overlap");

        let mut moved = a.clone();
        moved.set_position(a.position() + pen.mtv() * 1.05);
        assert!(intersect(&moved, &b, &config).is_none());
    }

    #[test]
    fn test_iteration_cap_reports_no_overlap() {
        let a = cube_at(1.0, Vec3::ZERO);
        let b = cube_at(1.0, Vec3::new(1.5, 0.0, 0.0));
        let config = GjkConfig {
            epa_max_iterations: 0,
            ..GjkConfig::default()
        };
        assert!(intersect(&a, &b, &config).is_none());
        // The boolean stage alone still sees the overlap
        assert!(overlaps(&a, &b, &config));
    }

    #[test]
    fn test_closest_points_on_segments() {
        // Skew segments: closest points in the middle of both
        let (p, q) = closest_points_on_segments(
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, -1.0, 1.0),
            Vec3::new(0.0, 1.0, 1.0),
        );
        assert!(p.approx_eq(Vec3::ZERO, 0.0001));
        assert!(q.approx_eq(Vec3::new(0.0, 0.0, 1.0), 0.0001));

        // Point against segment, clamped to the far end
        let (p, q) = closest_points_on_segments(Vec3::new(3.0, 1.0, 0.0), Vec3::new(3.0, 1.0, 0.0), Vec3::ZERO, Vec3::X);
        assert_eq!(p, Vec3::new(3.0, 1.0, 0.0));
        assert!(q.approx_eq(Vec3::X, 0.0001));
    }

    #[test]
    fn test_add_edge_cancels_shared() {
        let mut edges = Vec::new();
        add_edge(&mut edges, 0, 1);
        add_edge(&mut edges, 1, 2);
        add_edge(&mut edges, 1, 0);
        assert_eq!(edges, vec![[1, 2]]);
    }
}
