//! 4x4 Matrix utilities for 3D affine transformations
//!
//! Matrices are column-major: `m[column][row]`. Composition follows the
//! usual convention where `mul(a, b)` applies `b` first, so a model matrix
//! built as `mul(translation(p), mul(rotation(axis, a), scale(s)))` scales,
//! then rotates, then translates.

use crate::Vec3;

/// 4x4 matrix type (column-major)
pub type Mat4 = [[f32; 4]; 4];

/// Identity matrix
pub const IDENTITY: Mat4 = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

/// Pivot magnitude below which a matrix is treated as singular
const SINGULAR_EPSILON: f32 = 1.0e-8;

/// Multiply two 4x4 matrices: result = a * b
///
/// In column-major convention, this applies b first, then a.
#[allow(clippy::needless_range_loop)]
pub fn mul(a: Mat4, b: Mat4) -> Mat4 {
    let mut result = [[0.0f32; 4]; 4];

    for i in 0..4 {
        for j in 0..4 {
            for k in 0..4 {
                result[i][j] += a[k][j] * b[i][k];
            }
        }
    }

    result
}

/// Translation matrix
pub fn translation(t: Vec3) -> Mat4 {
    let mut m = IDENTITY;
    m[3][0] = t.x;
    m[3][1] = t.y;
    m[3][2] = t.z;
    m
}

/// Non-uniform scale matrix
pub fn scale(s: Vec3) -> Mat4 {
    let mut m = IDENTITY;
    m[0][0] = s.x;
    m[1][1] = s.y;
    m[2][2] = s.z;
    m
}

/// Right-handed rotation of `angle` radians around `axis`.
///
/// The axis does not need to be normalized. A zero axis yields identity.
///
/// # Example
/// ```
/// use collide3d_math::{mat4, Vec3};
/// let m = mat4::rotation(Vec3::Z, std::f32::consts::FRAC_PI_2);
/// let v = mat4::transform_vector(m, Vec3::X);
/// assert!(v.approx_eq(Vec3::Y, 1.0e-6));
/// ```
pub fn rotation(axis: Vec3, angle: f32) -> Mat4 {
    let a = axis.normalized();
    if a == Vec3::ZERO {
        return IDENTITY;
    }

    let (s, c) = angle.sin_cos();
    let t = 1.0 - c;
    let (x, y, z) = (a.x, a.y, a.z);

    let mut m = IDENTITY;
    // column 0
    m[0][0] = t * x * x + c;
    m[0][1] = t * x * y + s * z;
    m[0][2] = t * x * z - s * y;
    // column 1
    m[1][0] = t * x * y - s * z;
    m[1][1] = t * y * y + c;
    m[1][2] = t * y * z + s * x;
    // column 2
    m[2][0] = t * x * z + s * y;
    m[2][1] = t * y * z - s * x;
    m[2][2] = t * z * z + c;
    m
}

/// Rotation around the X axis
pub fn rotation_x(angle: f32) -> Mat4 {
    rotation(Vec3::X, angle)
}

/// Rotation around the Y axis
pub fn rotation_y(angle: f32) -> Mat4 {
    rotation(Vec3::Y, angle)
}

/// Rotation around the Z axis
pub fn rotation_z(angle: f32) -> Mat4 {
    rotation(Vec3::Z, angle)
}

/// Transform a point (w = 1)
pub fn transform_point(m: Mat4, p: Vec3) -> Vec3 {
    Vec3::new(
        m[0][0] * p.x + m[1][0] * p.y + m[2][0] * p.z + m[3][0],
        m[0][1] * p.x + m[1][1] * p.y + m[2][1] * p.z + m[3][1],
        m[0][2] * p.x + m[1][2] * p.y + m[2][2] * p.z + m[3][2],
    )
}

/// Transform a direction (w = 0), ignoring translation
pub fn transform_vector(m: Mat4, v: Vec3) -> Vec3 {
    Vec3::new(
        m[0][0] * v.x + m[1][0] * v.y + m[2][0] * v.z,
        m[0][1] * v.x + m[1][1] * v.y + m[2][1] * v.z,
        m[0][2] * v.x + m[1][2] * v.y + m[2][2] * v.z,
    )
}

/// Translation part of an affine matrix
pub fn get_translation(m: Mat4) -> Vec3 {
    Vec3::new(m[3][0], m[3][1], m[3][2])
}

/// Copy of `m` with its translation removed (the rotation+scale part)
pub fn without_translation(m: Mat4) -> Mat4 {
    let mut r = m;
    r[3] = [0.0, 0.0, 0.0, 1.0];
    r
}

/// Transpose
#[allow(clippy::needless_range_loop)]
pub fn transpose(m: Mat4) -> Mat4 {
    let mut r = [[0.0f32; 4]; 4];
    for i in 0..4 {
        for j in 0..4 {
            r[i][j] = m[j][i];
        }
    }
    r
}

/// Inverse by Gauss-Jordan elimination with partial pivoting.
///
/// Returns `None` when the matrix is singular.
#[allow(clippy::needless_range_loop)]
pub fn inverse(m: Mat4) -> Option<Mat4> {
    // Work row-major so rows can be swapped as whole arrays
    let mut a = transpose(m);
    let mut inv = IDENTITY;

    for col in 0..4 {
        let mut pivot = col;
        for row in (col + 1)..4 {
            if a[row][col].abs() > a[pivot][col].abs() {
                pivot = row;
            }
        }
        if a[pivot][col].abs() < SINGULAR_EPSILON {
            return None;
        }
        a.swap(col, pivot);
        inv.swap(col, pivot);

        let p = a[col][col];
        for k in 0..4 {
            a[col][k] /= p;
            inv[col][k] /= p;
        }

        for row in 0..4 {
            if row == col {
                continue;
            }
            let f = a[row][col];
            if f == 0.0 {
                continue;
            }
            for k in 0..4 {
                a[row][k] -= f * a[col][k];
                inv[row][k] -= f * inv[col][k];
            }
        }
    }

    Some(transpose(inv))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    const EPSILON: f32 = 1e-5;

    fn approx_eq_mat(a: Mat4, b: Mat4) -> bool {
        for i in 0..4 {
            for j in 0..4 {
                if (a[i][j] - b[i][j]).abs() > EPSILON {
                    return false;
                }
            }
        }
        true
    }

    #[test]
    fn test_identity_transform() {
        let p = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(transform_point(IDENTITY, p), p);
    }

    #[test]
    fn test_translation_moves_points_not_vectors() {
        let m = translation(Vec3::new(1.0, -2.0, 3.0));
        assert_eq!(transform_point(m, Vec3::ZERO), Vec3::new(1.0, -2.0, 3.0));
        assert_eq!(transform_vector(m, Vec3::X), Vec3::X);
        assert_eq!(get_translation(m), Vec3::new(1.0, -2.0, 3.0));
    }

    #[test]
    fn test_rotation_y_quarter_turn() {
        // Right-handed: +X goes to -Z around +Y
        let v = transform_vector(rotation_y(FRAC_PI_2), Vec3::X);
        assert!(v.approx_eq(Vec3::new(0.0, 0.0, -1.0), EPSILON));
    }

    #[test]
    fn test_rotation_x_quarter_turn() {
        let v = transform_vector(rotation_x(FRAC_PI_2), Vec3::Y);
        assert!(v.approx_eq(Vec3::Z, EPSILON));
    }

    #[test]
    fn test_mul_order() {
        // Scale first, then translate
        let m = mul(translation(Vec3::new(5.0, 0.0, 0.0)), scale(Vec3::splat(2.0)));
        let p = transform_point(m, Vec3::new(1.0, 1.0, 1.0));
        assert!(p.approx_eq(Vec3::new(7.0, 2.0, 2.0), EPSILON));
    }

    #[test]
    fn test_inverse_roundtrip() {
        let m = mul(
            translation(Vec3::new(3.0, -1.0, 2.0)),
            mul(rotation(Vec3::new(1.0, 1.0, 0.0), 0.7), scale(Vec3::new(2.0, 0.5, 1.5))),
        );
        let inv = inverse(m).expect("matrix should be invertible");
        assert!(approx_eq_mat(mul(m, inv), IDENTITY));
        assert!(approx_eq_mat(mul(inv, m), IDENTITY));
    }

    #[test]
    fn test_inverse_singular() {
        assert!(inverse(scale(Vec3::new(1.0, 0.0, 1.0))).is_none());
    }

    #[test]
    fn test_without_translation() {
        let m = mul(translation(Vec3::new(1.0, 2.0, 3.0)), scale(Vec3::splat(2.0)));
        let rs = without_translation(m);
        assert_eq!(get_translation(rs), Vec3::ZERO);
        assert_eq!(rs[0][0], 2.0);
    }
}
