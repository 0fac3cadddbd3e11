//! Scene container for collision items

use collide3d_collision::{Collider, GjkConfig, TreeConfig, DEFAULT_GROUND_DIR};
use collide3d_math::{Mat4, Polygon3, Vec3};
use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

use crate::{ItemKey, SceneError, SceneItem};

/// Tuning shared by every item and query of a scene
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub tree: TreeConfig,
    pub gjk: GjkConfig,
    /// Ground direction used when a query does not give one
    pub ground_dir: Vec3,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            tree: TreeConfig::default(),
            gjk: GjkConfig::default(),
            ground_dir: DEFAULT_GROUND_DIR,
        }
    }
}

/// The set of items collision queries run against
///
/// Mutation (`&mut self`) and detection (`&self`) never overlap, so a
/// frame updates transforms first and queries afterwards.
pub struct Scene {
    items: SlotMap<ItemKey, SceneItem>,
    config: SceneConfig,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Create an empty scene with default tuning
    pub fn new() -> Self {
        Self::with_config(SceneConfig::default())
    }

    pub fn with_config(config: SceneConfig) -> Self {
        Self {
            items: SlotMap::with_key(),
            config,
        }
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Add an item, building its tree, and return its key
    pub fn add_item(&mut self, mut item: SceneItem) -> ItemKey {
        item.rebuild_tree(&self.config.tree);
        log::debug!(
            "Added item '{}' ({} polygons, flags {:?})",
            item.name,
            item.tree().polygon_count(),
            item.flags
        );
        self.items.insert(item)
    }

    /// Remove an item; the key is dead afterwards
    pub fn remove_item(&mut self, key: ItemKey) -> Option<SceneItem> {
        self.items.remove(key)
    }

    pub fn get(&self, key: ItemKey) -> Option<&SceneItem> {
        self.items.get(key)
    }

    pub fn get_mut(&mut self, key: ItemKey) -> Option<&mut SceneItem> {
        self.items.get_mut(key)
    }

    pub fn contains(&self, key: ItemKey) -> bool {
        self.items.contains_key(key)
    }

    /// Move an item; its inverse matrix and collider follow
    pub fn set_model_matrix(&mut self, key: ItemKey, model: Mat4) -> Result<(), SceneError> {
        self.item_mut(key)?.set_model_matrix(model)
    }

    /// Replace an item's mesh and rebuild its tree
    pub fn set_mesh(&mut self, key: ItemKey, polygons: Vec<Polygon3>) -> Result<(), SceneError> {
        let tree_config = self.config.tree;
        self.item_mut(key)?.set_polygons(polygons, &tree_config);
        Ok(())
    }

    pub fn set_collider(&mut self, key: ItemKey, collider: Option<Collider>) -> Result<(), SceneError> {
        self.item_mut(key)?.set_collider(collider)
    }

    /// Key of the first item with this name
    pub fn find_by_name(&self, name: &str) -> Option<ItemKey> {
        self.items
            .iter()
            .find(|(_, item)| item.name == name)
            .map(|(key, _)| key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ItemKey, &SceneItem)> {
        self.items.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    fn item_mut(&mut self, key: ItemKey) -> Result<&mut SceneItem, SceneError> {
        self.items.get_mut(key).ok_or(SceneError::ItemNotFound(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CollisionFlags;
    use collide3d_math::mat4;

    fn triangle() -> Polygon3 {
        Polygon3::new(Vec3::ZERO, Vec3::X, Vec3::Z)
    }

    #[test]
    fn test_add_and_get() {
        let mut scene = Scene::new();
        let key = scene.add_item(
            SceneItem::new("floor")
                .with_polygons(vec![triangle()])
                .with_flags(CollisionFlags::GROUND),
        );

        let item = scene.get(key).expect("Item should exist");
        assert_eq!(item.name, "floor");
        assert_eq!(item.tree().polygon_count(), 1);
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn test_removed_key_is_not_found() {
        let mut scene = Scene::new();
        let key = scene.add_item(SceneItem::new("temp"));
        assert!(scene.remove_item(key).is_some());

        assert!(scene.get(key).is_none());
        assert!(!scene.contains(key));
        assert_eq!(
            scene.set_model_matrix(key, mat4::IDENTITY),
            Err(SceneError::ItemNotFound(key))
        );
        assert!(scene.remove_item(key).is_none());
    }

    #[test]
    fn test_stale_key_does_not_alias_new_item() {
        let mut scene = Scene::new();
        let old = scene.add_item(SceneItem::new("old"));
        scene.remove_item(old);
        let new = scene.add_item(SceneItem::new("new"));

        assert_ne!(old, new);
        assert!(scene.get(old).is_none());
    }

    #[test]
    fn test_set_mesh_rebuilds_tree() {
        let mut scene = Scene::new();
        let key = scene.add_item(SceneItem::new("terrain"));
        assert!(scene.get(key).unwrap().tree().is_empty());

        scene.set_mesh(key, vec![triangle(); 5]).unwrap();
        let tree = scene.get(key).unwrap().tree();
        assert_eq!(tree.polygon_count(), 5);
        assert!(tree.leaf_count() >= 2);
    }

    #[test]
    fn test_find_by_name() {
        let mut scene = Scene::new();
        scene.add_item(SceneItem::new("a"));
        let b = scene.add_item(SceneItem::new("b"));

        assert_eq!(scene.find_by_name("b"), Some(b));
        assert_eq!(scene.find_by_name("missing"), None);
    }

    #[test]
    fn test_config_defaults() {
        let config = SceneConfig::default();
        assert_eq!(config.ground_dir, DEFAULT_GROUND_DIR);
        assert_eq!(config.tree, TreeConfig::default());
    }
}
