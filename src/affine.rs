//! N-dimensional affine coordinate frames.
//!
//! A [`Frame`] is defined by a set of unit [`Axis`] directions and an origin,
//! expressed relative to a parent frame. Internally each frame holds a
//! homogeneous (dim+1)x(dim+1) transform and its inverse, built once at
//! construction. Frames form immutable, reference-counted trees rooted in a
//! [`NullFrame`], which stands in for the unrooted global (lab) system.
//!
//! Coordinates can be pushed up to the parent or the global frame, pulled
//! back down, or moved sideways to any frame that shares the same root.

use std::sync::Arc;

use nalgebra::{DMatrix, DVector, Vector2};

use super::error::FrameError;
use super::linalg::angle_between_vectors_2d;

/// A unit-length direction vector defining one axis of a frame.
///
/// The coordinates are normalized at construction; a zero-length input is a
/// [`FrameError::DegenerateAxis`] error.
#[derive(Debug, Clone)]
pub struct Axis {
    coords: DVector<f64>,
}

impl Axis {
    /// Create an Axis from coordinates, normalizing them.
    pub fn new(coords: &[f64]) -> Result<Self, FrameError> {
        let v = DVector::from_column_slice(coords);
        let norm = v.norm();
        if norm <= f64::EPSILON || !norm.is_finite() {
            return Err(FrameError::DegenerateAxis);
        }
        Ok(Axis { coords: v / norm })
    }

    /// The unit axis along coordinate `index` in a space of dimension `dim`.
    pub fn unit(dim: usize, index: usize) -> Result<Self, FrameError> {
        if index >= dim {
            return Err(FrameError::AxisOutOfRange { axis: index, dim });
        }
        let mut coords = vec![0.0; dim];
        coords[index] = 1.0;
        Axis::new(&coords)
    }

    pub fn dim(&self) -> usize {
        self.coords.len()
    }

    pub fn coords(&self) -> &DVector<f64> {
        &self.coords
    }
}

/// The terminal identity frame at the root of every frame tree.
///
/// Conversions through a NullFrame are no-ops. Two frames belong to the same
/// global system iff they resolve to the *same* NullFrame allocation, so the
/// root's pointer identity is what [`Frame::to_frame`] validates.
#[derive(Debug)]
pub struct NullFrame {
    dim: usize,
}

impl NullFrame {
    pub fn new(dim: usize) -> Arc<Self> {
        Arc::new(NullFrame { dim })
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Create a frame parented directly to the given root.
    ///
    /// An empty axis list means the identity basis.
    pub fn make_child_frame(
        root: &Arc<Self>,
        axes: Vec<Axis>,
        origin: &[f64],
    ) -> Result<Arc<Frame>, FrameError> {
        Frame::new(axes, origin, ParentLink::Root(Arc::clone(root)))
    }
}

/// Link from a frame to its parent: either another frame or the root.
#[derive(Debug, Clone)]
pub enum ParentLink {
    Root(Arc<NullFrame>),
    Frame(Arc<Frame>),
}

impl ParentLink {
    fn dim(&self) -> usize {
        match self {
            ParentLink::Root(root) => root.dim(),
            ParentLink::Frame(frame) => frame.dim(),
        }
    }
}

/// An N-dimensional affine coordinate frame.
#[derive(Debug)]
pub struct Frame {
    axes: Vec<Axis>,
    origin: DVector<f64>,
    dim: usize,
    a: DMatrix<f64>,
    ainv: DMatrix<f64>,
    parent: ParentLink,
}

impl Frame {
    /// Create a frame from axes and an origin, parented to `parent`.
    ///
    /// An empty axis list means the identity basis of the origin's
    /// dimension. The axis count, every axis dimension, the origin length,
    /// and the parent dimension must all agree.
    pub fn new(
        axes: Vec<Axis>,
        origin: &[f64],
        parent: ParentLink,
    ) -> Result<Arc<Self>, FrameError> {
        let dim = origin.len();
        let axes = if axes.is_empty() {
            (0..dim)
                .map(|i| Axis::unit(dim, i))
                .collect::<Result<Vec<_>, _>>()?
        } else {
            axes
        };
        if axes.len() != dim {
            return Err(FrameError::DimensionMismatch {
                context: "axis count",
                expected: dim,
                found: axes.len(),
            });
        }
        for axis in &axes {
            if axis.dim() != dim {
                return Err(FrameError::DimensionMismatch {
                    context: "axis coordinates",
                    expected: dim,
                    found: axis.dim(),
                });
            }
        }
        if parent.dim() != dim {
            return Err(FrameError::DimensionMismatch {
                context: "parent frame",
                expected: dim,
                found: parent.dim(),
            });
        }

        // Homogeneous forward transform: axis columns with a trailing 0,
        // then the origin column with a trailing 1.
        let mut a = DMatrix::zeros(dim + 1, dim + 1);
        for (j, axis) in axes.iter().enumerate() {
            for i in 0..dim {
                a[(i, j)] = axis.coords()[i];
            }
        }
        for i in 0..dim {
            a[(i, dim)] = origin[i];
        }
        a[(dim, dim)] = 1.0;
        let ainv = a.clone().try_inverse().ok_or(FrameError::SingularTransform)?;

        Ok(Arc::new(Frame {
            axes,
            origin: DVector::from_column_slice(origin),
            dim,
            a,
            ainv,
            parent,
        }))
    }

    /// Create an identity root frame at `origin`, anchored to a fresh
    /// [`NullFrame`] of the same dimension.
    pub fn anchored(origin: &[f64]) -> Result<Arc<Self>, FrameError> {
        Frame::new(
            Vec::new(),
            origin,
            ParentLink::Root(NullFrame::new(origin.len())),
        )
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn origin(&self) -> &DVector<f64> {
        &self.origin
    }

    pub fn axes(&self) -> &[Axis] {
        &self.axes
    }

    pub fn parent(&self) -> &ParentLink {
        &self.parent
    }

    /// The root NullFrame this frame ultimately resolves to.
    pub fn global_root(&self) -> &Arc<NullFrame> {
        match &self.parent {
            ParentLink::Root(root) => root,
            ParentLink::Frame(frame) => frame.global_root(),
        }
    }

    fn check_dim(&self, coords: &[f64]) -> Result<(), FrameError> {
        if coords.len() != self.dim {
            return Err(FrameError::DimensionMismatch {
                context: "coordinates",
                expected: self.dim,
                found: coords.len(),
            });
        }
        Ok(())
    }

    fn apply(matrix: &DMatrix<f64>, coords: &[f64]) -> Vec<f64> {
        let dim = coords.len();
        let mut homogeneous = DVector::zeros(dim + 1);
        for (i, &c) in coords.iter().enumerate() {
            homogeneous[i] = c;
        }
        homogeneous[dim] = 1.0;
        let out = matrix * homogeneous;
        out.as_slice()[..dim].to_vec()
    }

    /// Express local coordinates in the parent frame.
    pub fn to_parent(&self, coords: &[f64]) -> Result<Vec<f64>, FrameError> {
        self.check_dim(coords)?;
        Ok(Self::apply(&self.a, coords))
    }

    /// Express parent-frame coordinates locally. Exact inverse of
    /// [`Frame::to_parent`].
    pub fn from_parent(&self, coords: &[f64]) -> Result<Vec<f64>, FrameError> {
        self.check_dim(coords)?;
        Ok(Self::apply(&self.ainv, coords))
    }

    /// Express local coordinates in the global frame, composing up the
    /// parent chain.
    pub fn to_global(&self, coords: &[f64]) -> Result<Vec<f64>, FrameError> {
        let parent_coords = self.to_parent(coords)?;
        match &self.parent {
            ParentLink::Root(_) => Ok(parent_coords),
            ParentLink::Frame(frame) => frame.to_global(&parent_coords),
        }
    }

    /// Express global coordinates locally, unwinding from the root down.
    pub fn from_global(&self, coords: &[f64]) -> Result<Vec<f64>, FrameError> {
        let parent_coords = match &self.parent {
            ParentLink::Root(_) => coords.to_vec(),
            ParentLink::Frame(frame) => frame.from_global(coords)?,
        };
        self.from_parent(&parent_coords)
    }

    /// Express local coordinates in another frame's local system.
    ///
    /// Both frames must resolve to the same root; otherwise this is a
    /// [`FrameError::FrameMismatch`] error.
    pub fn to_frame(&self, coords: &[f64], other: &Frame) -> Result<Vec<f64>, FrameError> {
        if !Arc::ptr_eq(self.global_root(), other.global_root()) {
            return Err(FrameError::FrameMismatch);
        }
        other.from_global(&self.to_global(coords)?)
    }

    /// Create a new frame parented to `parent`. Does not mutate the parent.
    ///
    /// An empty axis list means the identity basis.
    pub fn make_child_frame(
        parent: &Arc<Self>,
        axes: Vec<Axis>,
        origin: &[f64],
    ) -> Result<Arc<Frame>, FrameError> {
        Frame::new(axes, origin, ParentLink::Frame(Arc::clone(parent)))
    }

    /// Rotate local coordinates by `phi` radians within the plane spanned by
    /// axis indices `ax1` and `ax2`, leaving other components unchanged.
    ///
    /// With `ax1 = 0, ax2 = 1` in three dimensions this is a z-axis
    /// rotation.
    pub fn rotate_in_plane(
        &self,
        coords: &[f64],
        phi: f64,
        ax1: usize,
        ax2: usize,
    ) -> Result<Vec<f64>, FrameError> {
        self.check_dim(coords)?;
        for axis in [ax1, ax2] {
            if axis >= self.dim {
                return Err(FrameError::AxisOutOfRange {
                    axis,
                    dim: self.dim,
                });
            }
        }
        let (s, c) = phi.sin_cos();
        let mut out = coords.to_vec();
        out[ax1] = c * coords[ax1] - s * coords[ax2];
        out[ax2] = s * coords[ax1] + c * coords[ax2];
        Ok(out)
    }
}

/// Angle (radians, in `[0, 2*pi)`) about `around_ax` between a child-frame
/// direction and a fixed direction in the parent frame.
///
/// `child_ax` is transformed from `child` into `parent` coordinates as a
/// direction; the `around_ax` component is dropped from both it and
/// `parent_ax`, and the signed 2D angle between the remainders is returned.
///
/// This assumes a single rotation axis, which only makes sense for frames of
/// dimension 3.
pub fn find_rotation(
    child: &Frame,
    child_ax: &[f64],
    parent: &Frame,
    parent_ax: &[f64],
    around_ax: usize,
) -> Result<f64, FrameError> {
    if child.dim() != 3 || parent.dim() != 3 {
        return Err(FrameError::DimensionMismatch {
            context: "find_rotation frames",
            expected: 3,
            found: child.dim().max(parent.dim()),
        });
    }
    if parent_ax.len() != 3 {
        return Err(FrameError::DimensionMismatch {
            context: "find_rotation parent axis",
            expected: 3,
            found: parent_ax.len(),
        });
    }
    if around_ax >= 3 {
        return Err(FrameError::AxisOutOfRange {
            axis: around_ax,
            dim: 3,
        });
    }

    let tip = child.to_frame(child_ax, parent)?;
    let base = child.to_frame(&[0.0; 3], parent)?;
    let direction: Vec<f64> = tip.iter().zip(&base).map(|(t, b)| t - b).collect();

    let drop_axis = |v: &[f64]| -> Vector2<f64> {
        let kept: Vec<f64> = v
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != around_ax)
            .map(|(_, &c)| c)
            .collect();
        Vector2::new(kept[0], kept[1])
    };

    Ok(angle_between_vectors_2d(
        &drop_axis(&direction),
        &drop_axis(parent_ax),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn assert_vec_eq(left: &[f64], right: &[f64]) {
        assert_eq!(left.len(), right.len());
        for (l, r) in left.iter().zip(right) {
            assert_relative_eq!(*l, *r, epsilon = 1e-9, max_relative = 1e-9);
        }
    }

    #[test]
    fn test_axis_normalizes() {
        let axis = Axis::new(&[3.0, 0.0, 4.0]).unwrap();
        assert_relative_eq!(axis.coords().norm(), 1.0, epsilon = 1e-12);
        assert!(matches!(
            Axis::new(&[0.0, 0.0, 0.0]),
            Err(FrameError::DegenerateAxis)
        ));
    }

    #[test]
    fn test_default_axes_are_identity() {
        let frame = Frame::anchored(&[1.0, 2.0, 3.0]).unwrap();
        assert_vec_eq(&frame.to_parent(&[0.0, 0.0, 0.0]).unwrap(), &[1.0, 2.0, 3.0]);
        assert_vec_eq(&frame.to_parent(&[1.0, 0.0, 0.0]).unwrap(), &[2.0, 2.0, 3.0]);
    }

    #[test]
    fn test_dimension_mismatch() {
        let axes = vec![Axis::new(&[1.0, 0.0]).unwrap()];
        let result = Frame::new(axes, &[0.0, 0.0], ParentLink::Root(NullFrame::new(2)));
        assert!(matches!(
            result,
            Err(FrameError::DimensionMismatch { .. })
        ));

        let parent = Frame::anchored(&[0.0, 0.0, 0.0]).unwrap();
        let result = Frame::make_child_frame(&parent, Vec::new(), &[0.0, 0.0]);
        assert!(matches!(
            result,
            Err(FrameError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_parent_round_trip() {
        let axes = vec![
            Axis::new(&[0.0, 1.0, 0.0]).unwrap(),
            Axis::new(&[-1.0, 0.0, 0.0]).unwrap(),
            Axis::new(&[0.0, 0.0, 1.0]).unwrap(),
        ];
        let frame = Frame::new(
            axes,
            &[5.0, -2.0, 0.5],
            ParentLink::Root(NullFrame::new(3)),
        )
        .unwrap();
        let p = [1.2, -3.4, 5.6];
        let round = frame.from_parent(&frame.to_parent(&p).unwrap()).unwrap();
        assert_vec_eq(&round, &p);
    }

    #[test]
    fn test_global_round_trip_deep_chain() {
        let root = Frame::anchored(&[10.0, 0.0, 0.0]).unwrap();
        let axes = vec![
            Axis::new(&[0.0, 1.0, 0.0]).unwrap(),
            Axis::new(&[-1.0, 0.0, 0.0]).unwrap(),
            Axis::new(&[0.0, 0.0, 1.0]).unwrap(),
        ];
        let child = Frame::make_child_frame(&root, axes, &[1.0, 2.0, 3.0]).unwrap();
        let grandchild = Frame::make_child_frame(&child, Vec::new(), &[-4.0, 0.0, 2.0]).unwrap();

        let p = [0.7, 0.8, 0.9];
        let global = grandchild.to_global(&p).unwrap();
        let round = grandchild.from_global(&global).unwrap();
        assert_vec_eq(&round, &p);

        // The chain composes: origin of the grandchild in global coordinates
        // is the child transform applied to its origin, plus the root offset.
        let origin_global = grandchild.to_global(&[0.0, 0.0, 0.0]).unwrap();
        let expected = child.to_parent(&[-4.0, 0.0, 2.0]).unwrap();
        assert_vec_eq(
            &origin_global,
            &[expected[0] + 10.0, expected[1], expected[2]],
        );
    }

    #[test]
    fn test_to_frame_shared_root() {
        let root = Frame::anchored(&[0.0, 0.0, 0.0]).unwrap();
        let a = Frame::make_child_frame(&root, Vec::new(), &[1.0, 0.0, 0.0]).unwrap();
        let b = Frame::make_child_frame(&root, Vec::new(), &[0.0, 1.0, 0.0]).unwrap();
        let in_b = a.to_frame(&[0.0, 0.0, 0.0], &b).unwrap();
        assert_vec_eq(&in_b, &[1.0, -1.0, 0.0]);
    }

    #[test]
    fn test_to_frame_mismatched_roots() {
        let a = Frame::anchored(&[0.0, 0.0, 0.0]).unwrap();
        let b = Frame::anchored(&[0.0, 0.0, 0.0]).unwrap();
        assert!(matches!(
            a.to_frame(&[1.0, 0.0, 0.0], &b),
            Err(FrameError::FrameMismatch)
        ));
    }

    #[test]
    fn test_rotate_in_plane_matches_z_rotation() {
        let frame = Frame::anchored(&[0.0, 0.0, 0.0]).unwrap();
        let rotated = frame
            .rotate_in_plane(&[1.0, 0.0, 7.0], FRAC_PI_2, 0, 1)
            .unwrap();
        assert_vec_eq(&rotated, &[0.0, 1.0, 7.0]);
        let back = frame
            .rotate_in_plane(&rotated, -FRAC_PI_2, 0, 1)
            .unwrap();
        assert_vec_eq(&back, &[1.0, 0.0, 7.0]);
    }

    #[test]
    fn test_find_rotation() {
        let manip = Frame::anchored(&[0.0, 0.0, 0.0]).unwrap();
        // Child frame whose x-axis points along the parent's +y.
        let axes = vec![
            Axis::new(&[0.0, 1.0, 0.0]).unwrap(),
            Axis::new(&[-1.0, 0.0, 0.0]).unwrap(),
            Axis::new(&[0.0, 0.0, 1.0]).unwrap(),
        ];
        let child = Frame::make_child_frame(&manip, axes, &[3.0, 0.0, 0.0]).unwrap();

        let angle = find_rotation(&child, &[1.0, 0.0, 0.0], &manip, &[0.0, -1.0, 0.0], 2).unwrap();
        assert_relative_eq!(angle, PI, epsilon = 1e-12);

        let angle = find_rotation(&child, &[1.0, 0.0, 0.0], &manip, &[0.0, 1.0, 0.0], 2).unwrap();
        assert_relative_eq!(angle, 0.0, epsilon = 1e-12);
    }
}
