//! Collision error types
//!
//! Errors are only produced while setting up colliders and meshes. The
//! per-frame query path reports "nothing found" through `Option` instead.

use std::fmt;

/// Error type for collision set-up operations
#[derive(Debug, Clone, PartialEq)]
pub enum CollisionError {
    /// A collider extent is zero, negative or not finite
    DegenerateCollider(String),
    /// A rotation+scale matrix has no inverse
    SingularMatrix,
    /// A vertex or index buffer does not match its declared layout
    InvalidVertexBuffer(String),
}

impl fmt::Display for CollisionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollisionError::DegenerateCollider(msg) => write!(f, "Degenerate collider: {}", msg),
            CollisionError::SingularMatrix => write!(f, "Collider matrix is singular"),
            CollisionError::InvalidVertexBuffer(msg) => write!(f, "Invalid vertex buffer: {}", msg),
        }
    }
}

impl std::error::Error for CollisionError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degenerate_display() {
        let err = CollisionError::DegenerateCollider("radius must be positive".to_string());
        let msg = format!("{}", err);
        assert!(msg.contains("Degenerate collider"));
        assert!(msg.contains("radius must be positive"));
    }

    #[test]
    fn test_singular_display() {
        assert!(format!("{}", CollisionError::SingularMatrix).contains("singular"));
    }

    #[test]
    fn test_vertex_buffer_display() {
        let err = CollisionError::InvalidVertexBuffer("stride 2".to_string());
        let msg = format!("{}", err);
        assert!(msg.contains("vertex buffer"));
        assert!(msg.contains("stride 2"));
    }

    #[test]
    fn test_error_source_is_none() {
        use std::error::Error;
        assert!(CollisionError::SingularMatrix.source().is_none());
    }
}
