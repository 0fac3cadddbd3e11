//! Scene items: a mesh, its model matrix and its collision roles

use bitflags::bitflags;
use collide3d_collision::{AabbTree, Collider, ColliderState, CollisionError, Mesh, TreeConfig};
use collide3d_math::{mat4, Aabb, Mat4, Polygon3};
use slotmap::new_key_type;

use crate::SceneError;

new_key_type! {
    /// Generational key of an item stored in a [`Scene`](crate::Scene)
    pub struct ItemKey;
}

bitflags! {
    /// Collision families an item takes part in
    ///
    /// The same flags select which families a query runs and report which
    /// families produced a result.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct CollisionFlags: u8 {
        /// Walkable landscape (ground height and edge clamping)
        const GROUND = 1 << 0;
        /// Pickable with the mouse ray
        const MOUSE = 1 << 1;
        /// Convex collider tested with GJK
        const GJK = 1 << 2;
        /// Every family
        const ALL = Self::GROUND.bits() | Self::MOUSE.bits() | Self::GJK.bits();
    }
}

/// An object of the scene as seen by collision detection
///
/// Polygons are kept in model space inside the tree, which is rebuilt with
/// the scene's tuning once the item is added and whenever the mesh is replaced.
#[derive(Clone, Debug)]
pub struct SceneItem {
    pub name: String,
    pub flags: CollisionFlags,
    tree: AabbTree,
    model: Mat4,
    model_inv: Mat4,
    collider: Option<Collider>,
}

impl SceneItem {
    /// Create an item with no mesh, no flags and an identity model matrix
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            flags: CollisionFlags::empty(),
            tree: AabbTree::empty(),
            model: mat4::IDENTITY,
            model_inv: mat4::IDENTITY,
            collider: None,
        }
    }

    pub fn with_flags(mut self, flags: CollisionFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Use these model-space polygons as the item's mesh
    pub fn with_polygons(mut self, polygons: Vec<Polygon3>) -> Self {
        self.tree = AabbTree::build(polygons, self.tree.config());
        self
    }

    /// Extract the item's polygons from a raw vertex buffer
    pub fn with_mesh(mut self, mesh: &Mesh) -> Result<Self, SceneError> {
        self.tree = AabbTree::build(mesh.polygons()?, self.tree.config());
        Ok(self)
    }

    pub fn with_model(mut self, model: Mat4) -> Result<Self, SceneError> {
        self.set_model_matrix(model)?;
        Ok(self)
    }

    /// Attach a collider expressed in the item's model space.
    ///
    /// The collider takes its transform from the item's model matrix.
    pub fn with_collider(mut self, collider: Collider) -> Result<Self, SceneError> {
        self.set_collider(Some(collider))?;
        Ok(self)
    }

    /// Model-space polygons of the mesh
    pub fn polygons(&self) -> Vec<&Polygon3> {
        self.tree.polygons()
    }

    pub fn tree(&self) -> &AabbTree {
        &self.tree
    }

    pub fn model_matrix(&self) -> &Mat4 {
        &self.model
    }

    pub fn model_matrix_inv(&self) -> &Mat4 {
        &self.model_inv
    }

    pub fn collider(&self) -> Option<&Collider> {
        self.collider.as_ref()
    }

    /// Switch the collider between static and dynamic.
    ///
    /// The collider's placement only changes through the model matrix.
    /// Returns false when the item has no collider.
    pub fn set_collider_state(&mut self, state: ColliderState) -> bool {
        match self.collider.as_mut() {
            Some(collider) => {
                collider.set_state(state);
                true
            }
            None => false,
        }
    }

    /// Root box of the tree in model space, `None` for an empty mesh
    pub fn local_bounds(&self) -> Option<Aabb> {
        self.tree.root_bounds()
    }

    /// Replace the model matrix, refreshing its inverse and the collider transform.
    ///
    /// A singular matrix is rejected and nothing changes.
    pub fn set_model_matrix(&mut self, model: Mat4) -> Result<(), SceneError> {
        let inv = mat4::inverse(model).ok_or(CollisionError::SingularMatrix)?;
        if let Some(collider) = self.collider.as_mut() {
            collider.set_transform(model)?;
        }
        self.model = model;
        self.model_inv = inv;
        Ok(())
    }

    /// Attach or detach the collider
    pub fn set_collider(&mut self, collider: Option<Collider>) -> Result<(), SceneError> {
        self.collider = match collider {
            Some(mut c) => {
                c.set_transform(self.model)?;
                Some(c)
            }
            None => None,
        };
        Ok(())
    }

    /// Replace the mesh and rebuild the tree over it
    pub fn set_polygons(&mut self, polygons: Vec<Polygon3>, config: &TreeConfig) {
        self.tree = AabbTree::build(polygons, config);
    }

    pub(crate) fn rebuild_tree(&mut self, config: &TreeConfig) {
        self.tree = std::mem::take(&mut self.tree).rebuilt(config);
    }
}
