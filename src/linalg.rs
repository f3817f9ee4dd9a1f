//! Basic linear algebra for basis construction and rotations.
//!
//! These helpers back the legacy 3D frame model in [`crate::frames`] and the
//! grazing-angle computation in [`crate::affine::find_rotation`].

use nalgebra::{Matrix3, Vector2, Vector3};

use super::error::LinalgError;

/// Return the unit vector of v.
///
/// Fails if v has zero (or non-finite) length rather than producing NaN.
pub fn norm_vector(v: &Vector3<f64>) -> Result<Vector3<f64>, LinalgError> {
    let n = v.norm();
    if n <= f64::EPSILON || !n.is_finite() {
        return Err(LinalgError::ZeroVector);
    }
    Ok(v / n)
}

/// Find the unit vector normal to v1 and v2.
pub fn find_orthonormal(
    v1: &Vector3<f64>,
    v2: &Vector3<f64>,
) -> Result<Vector3<f64>, LinalgError> {
    norm_vector(&v1.cross(v2))
}

/// Construct an orthonormal basis from three points.
///
/// `p1` is the origin, `p2` defines the y basis vector, and `p3` defines the
/// plane of the x basis vector:
///
/// - `n2` (the "y" vector) is `p2 - p1`, normalized
/// - `n3` (the "z" vector) is orthonormal to `n2` and `p3 - p1`
/// - `n1` (the "x" vector) is then uniquely orthonormal to `n2` and `n3`
///
/// Collinear or coincident points are a [`LinalgError::DegenerateBasis`]
/// error.
pub fn construct_basis(
    p1: &Vector3<f64>,
    p2: &Vector3<f64>,
    p3: &Vector3<f64>,
) -> Result<(Vector3<f64>, Vector3<f64>, Vector3<f64>), LinalgError> {
    let v1 = p3 - p1;
    let v2 = p2 - p1;
    let n2 = norm_vector(&v2).map_err(|_| LinalgError::DegenerateBasis)?;
    let n3 = find_orthonormal(&v1, &n2).map_err(|_| LinalgError::DegenerateBasis)?;
    let n1 = find_orthonormal(&n2, &n3).map_err(|_| LinalgError::DegenerateBasis)?;
    Ok((n1, n2, n3))
}

/// Change-of-basis matrix with n1, n2, n3 as its columns.
pub fn change_basis_matrix(
    n1: &Vector3<f64>,
    n2: &Vector3<f64>,
    n3: &Vector3<f64>,
) -> Matrix3<f64> {
    Matrix3::from_columns(&[*n1, *n2, *n3])
}

/// Right-handed rotation matrix about the z axis. Theta in radians.
pub fn rotz_mat(theta: f64) -> Matrix3<f64> {
    let (s, c) = theta.sin_cos();
    Matrix3::new(c, -s, 0.0, s, c, 0.0, 0.0, 0.0, 1.0)
}

/// Rotate a vector by theta around the z axis.
pub fn rotz(theta: f64, v: &Vector3<f64>) -> Vector3<f64> {
    rotz_mat(theta) * v
}

/// Signed angle that rotates v1 onto v2, normalized into `[0, 2*pi)`.
pub fn angle_between_vectors_2d(v1: &Vector2<f64>, v2: &Vector2<f64>) -> f64 {
    let angle = v2.y.atan2(v2.x) - v1.y.atan2(v1.x);
    angle.rem_euclid(std::f64::consts::TAU)
}
