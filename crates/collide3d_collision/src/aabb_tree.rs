//! AABB tree over a mesh's polygons
//!
//! The tree is built once per mesh and is read-only afterwards. Nodes own
//! their children through `Box`, so dropping the tree releases everything.
//!
//! Building splits each node on the longest axis of its bounds, sending a
//! polygon left when its centroid lies below the box midpoint. When every
//! centroid falls on the same side the polygons are split evenly by index
//! instead, and a hard depth cap turns whatever remains into an oversized
//! leaf, so coplanar or coincident input always terminates.

use collide3d_math::{Aabb, Polygon3, Ray3, Vec3};
use serde::{Deserialize, Serialize};

/// Configuration for tree building
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Maximum polygons in a leaf before it is split
    pub leaf_polygons: usize,
    /// Maximum depth; nodes at this depth become leaves regardless of size
    pub max_depth: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            leaf_polygons: 2,
            max_depth: 32,
        }
    }
}

/// A node of the tree
#[derive(Debug, Clone, PartialEq)]
pub enum AabbNode {
    /// Never empty; `bounds` tightly encloses the polygons
    Leaf { bounds: Aabb, polygons: Vec<Polygon3> },
    /// `bounds` is the union of both children
    Branch {
        bounds: Aabb,
        left: Box<AabbNode>,
        right: Box<AabbNode>,
    },
}

impl AabbNode {
    pub fn bounds(&self) -> &Aabb {
        match self {
            AabbNode::Leaf { bounds, .. } | AabbNode::Branch { bounds, .. } => bounds,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, AabbNode::Leaf { .. })
    }
}

/// Nearest polygon hit along a ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Ray parameter of the hit
    pub t: f32,
    pub point: Vec3,
    pub polygon: Polygon3,
}

/// An AABB tree; empty when built from no polygons
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AabbTree {
    root: Option<Box<AabbNode>>,
    polygon_count: usize,
    config: TreeConfig,
}

impl AabbTree {
    /// Tree with no root. Every query on it finds nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a tree over `polygons`
    pub fn build(polygons: Vec<Polygon3>, config: &TreeConfig) -> Self {
        let polygon_count = polygons.len();
        if polygons.is_empty() {
            log::debug!("AABB tree requested for an empty polygon list");
            return Self {
                config: *config,
                ..Self::empty()
            };
        }

        let mut capped = 0usize;
        let root = build_node(polygons, 0, config, &mut capped);
        if capped > 0 {
            log::debug!(
                "AABB tree depth cap {} reached {} time(s), oversized leaves kept",
                config.max_depth,
                capped
            );
        }

        let tree = Self {
            root: Some(Box::new(root)),
            polygon_count,
            config: *config,
        };
        log::debug!(
            "Built AABB tree: {} polygons, {} leaves, depth {}",
            polygon_count,
            tree.leaf_count(),
            tree.depth()
        );
        tree
    }

    /// Rebuild over the same polygons, or keep the tree when it was
    /// already built with `config`
    pub fn rebuilt(self, config: &TreeConfig) -> Self {
        if self.config == *config {
            return self;
        }
        Self::build(self.into_polygons(), config)
    }

    /// Configuration the tree was built with
    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Every stored polygon, leaves in depth-first order
    pub fn polygons(&self) -> Vec<&Polygon3> {
        let mut out = Vec::with_capacity(self.polygon_count);
        self.visit(|node, _| {
            if let AabbNode::Leaf { polygons, .. } = node {
                out.extend(polygons.iter());
            }
        });
        out
    }

    /// Take the polygons back out of the tree
    pub fn into_polygons(self) -> Vec<Polygon3> {
        let mut out = Vec::with_capacity(self.polygon_count);
        let mut stack: Vec<AabbNode> = self.root.map(|r| *r).into_iter().collect();
        while let Some(node) = stack.pop() {
            match node {
                AabbNode::Leaf { polygons, .. } => out.extend(polygons),
                AabbNode::Branch { left, right, .. } => {
                    stack.push(*right);
                    stack.push(*left);
                }
            }
        }
        out
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn root(&self) -> Option<&AabbNode> {
        self.root.as_deref()
    }

    /// Bounds of the whole mesh
    pub fn root_bounds(&self) -> Option<Aabb> {
        self.root().map(|n| *n.bounds())
    }

    /// Number of polygons stored in the tree
    pub fn polygon_count(&self) -> usize {
        self.polygon_count
    }

    /// Number of node levels (0 for an empty tree, 1 for a single leaf)
    pub fn depth(&self) -> usize {
        let mut max = 0;
        self.visit(|_, d| max = max.max(d + 1));
        max
    }

    pub fn leaf_count(&self) -> usize {
        let mut count = 0;
        self.visit(|node, _| {
            if node.is_leaf() {
                count += 1;
            }
        });
        count
    }

    /// Depth-first visit of every node with its depth (root = 0)
    pub fn visit<'a, F: FnMut(&'a AabbNode, usize)>(&'a self, mut f: F) {
        let mut stack: Vec<(&'a AabbNode, usize)> = self.root().map(|r| (r, 0)).into_iter().collect();
        while let Some((node, depth)) = stack.pop() {
            f(node, depth);
            if let AabbNode::Branch { left, right, .. } = node {
                stack.push((right, depth + 1));
                stack.push((left, depth + 1));
            }
        }
    }

    /// Every polygon stored in a leaf whose box the ray crosses.
    ///
    /// These are candidates only; confirm with an exact ray/polygon test.
    pub fn resolve(&self, ray: &Ray3) -> Vec<&Polygon3> {
        let mut out = Vec::new();
        let mut stack: Vec<&AabbNode> = self.root().into_iter().collect();
        while let Some(node) = stack.pop() {
            if node.bounds().intersect_ray(ray).is_none() {
                continue;
            }
            match node {
                AabbNode::Leaf { polygons, .. } => out.extend(polygons.iter()),
                AabbNode::Branch { left, right, .. } => {
                    stack.push(right);
                    stack.push(left);
                }
            }
        }
        out
    }

    /// Nearest polygon hit along the ray with a parameter of at least `min_t`.
    ///
    /// Only children whose box the ray crosses are descended, and boxes
    /// starting beyond the current best hit are skipped.
    pub fn raycast(&self, ray: &Ray3, min_t: f32) -> Option<RayHit> {
        let root = self.root()?;
        let mut best: Option<RayHit> = None;
        raycast_node(root, ray, min_t, &mut best);
        best
    }
}

fn build_node(
    polygons: Vec<Polygon3>,
    depth: usize,
    config: &TreeConfig,
    capped: &mut usize,
) -> AabbNode {
    // Callers never pass an empty list
    let bounds = Aabb::from_polygons(&polygons).unwrap_or_else(|| Aabb::new(Vec3::ZERO, Vec3::ZERO));

    if polygons.len() <= config.leaf_polygons.max(1) {
        return AabbNode::Leaf { bounds, polygons };
    }
    if depth >= config.max_depth {
        *capped += 1;
        return AabbNode::Leaf { bounds, polygons };
    }

    let axis = bounds.longest_axis();
    let mid = bounds.center().axis(axis);
    let (mut left, mut right): (Vec<_>, Vec<_>) =
        polygons.into_iter().partition(|p| p.centroid().axis(axis) < mid);

    if left.is_empty() || right.is_empty() {
        // Every centroid on one side: split evenly by index
        let mut all = if left.is_empty() { right } else { left };
        right = all.split_off(all.len() / 2);
        left = all;
    }

    let left = build_node(left, depth + 1, config, capped);
    let right = build_node(right, depth + 1, config, capped);
    AabbNode::Branch {
        bounds: left.bounds().union(right.bounds()),
        left: Box::new(left),
        right: Box::new(right),
    }
}

fn raycast_node(node: &AabbNode, ray: &Ray3, min_t: f32, best: &mut Option<RayHit>) {
    let Some((enter, _)) = node.bounds().intersect_ray(ray) else {
        return;
    };
    if let Some(hit) = best {
        if enter > hit.t {
            return;
        }
    }

    match node {
        AabbNode::Leaf { polygons, .. } => {
            for polygon in polygons {
                let Some(t) = polygon.intersect_ray(ray) else {
                    continue;
                };
                if t < min_t || matches!(best, Some(b) if b.t <= t) {
                    continue;
                }
                *best = Some(RayHit {
                    t,
                    point: ray.at(t),
                    polygon: *polygon,
                });
            }
        }
        AabbNode::Branch { left, right, .. } => {
            raycast_node(left, ray, min_t, best);
            raycast_node(right, ray, min_t, best);
        }
    }
}
