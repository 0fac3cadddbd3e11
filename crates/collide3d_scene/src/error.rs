//! Scene error type

use std::fmt;

use collide3d_collision::CollisionError;

use crate::ItemKey;

/// Errors from scene set-up operations
#[derive(Debug, Clone, PartialEq)]
pub enum SceneError {
    /// No item is stored under the key (it was never added or has been removed)
    ItemNotFound(ItemKey),
    /// A collision-level set-up step failed
    Collision(CollisionError),
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneError::ItemNotFound(key) => write!(f, "No scene item for key {:?}", key),
            SceneError::Collision(err) => write!(f, "Collision set-up failed: {}", err),
        }
    }
}

impl std::error::Error for SceneError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SceneError::Collision(err) => Some(err),
            SceneError::ItemNotFound(_) => None,
        }
    }
}

impl From<CollisionError> for SceneError {
    fn from(err: CollisionError) -> Self {
        SceneError::Collision(err)
    }
}
