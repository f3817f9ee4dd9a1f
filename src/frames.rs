//! Legacy 3D sample frames with a single rotation axis.
//!
//! This model predates the general [`crate::affine`] frames and bakes in the
//! four-axis manipulator picture: a frame is built from three points, carries
//! a rotation offset `r0` measured in the global x-y plane, and converts
//! between frame coordinates and the manipulator coordinates that put a point
//! into the beam. The beam is the global y axis, with positions measured at
//! the global origin.
//!
//! All rotation arguments and offsets are in degrees.

use std::sync::Arc;

use nalgebra::{Vector2, Vector3};

use super::constants::{DEFAULT_PANEL_HEIGHT, DEFAULT_PANEL_WIDTH};
use super::error::FrameError;
use super::linalg::{change_basis_matrix, construct_basis, rotz, rotz_mat};
use super::polygons::{is_in_poly, min_dist};

/// How a rotation argument is interpreted: relative to the frame's own
/// zero-rotation reference, or already in the global system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    Frame,
    Global,
}

/// Which point of a bounded frame its coordinates are measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Edge,
    Center,
}

/// A 3D frame defined by three points in its parent system.
///
/// `p1` is the origin, `p2` defines the frame's y basis vector, and `p3`
/// defines the plane of the x basis vector. The basis is orthonormal, so the
/// inverse transform is the transpose.
#[derive(Debug)]
pub struct Frame {
    p0: Vector3<f64>,
    a: nalgebra::Matrix3<f64>,
    ainv: nalgebra::Matrix3<f64>,
    parent: Option<Arc<Frame>>,
    rot_meas_axis: usize,
    r0: f64,
}

impl Frame {
    /// Build a frame from three points, measuring rotation about
    /// `rot_meas_axis` (2, the frame z axis, for beamline samples).
    pub fn new(
        p1: &Vector3<f64>,
        p2: &Vector3<f64>,
        p3: &Vector3<f64>,
        parent: Option<Arc<Frame>>,
        rot_meas_axis: usize,
    ) -> Result<Arc<Self>, FrameError> {
        if rot_meas_axis >= 3 {
            return Err(FrameError::AxisOutOfRange {
                axis: rot_meas_axis,
                dim: 3,
            });
        }
        let (n1, n2, n3) = construct_basis(p1, p2, p3)?;
        let a = change_basis_matrix(&n1, &n2, &n3);
        let mut frame = Frame {
            p0: *p1,
            a,
            ainv: a.transpose(),
            parent,
            rot_meas_axis,
            r0: 0.0,
        };
        frame.r0 = frame.r_offset().to_degrees();
        Ok(Arc::new(frame))
    }

    /// Rotation offset relative to the global frame, in degrees.
    pub fn r0(&self) -> f64 {
        self.r0
    }

    pub fn p0(&self) -> &Vector3<f64> {
        &self.p0
    }

    pub fn parent(&self) -> Option<&Arc<Frame>> {
        self.parent.as_ref()
    }

    /// Rotation offset relative to the global frame (not the parent), in
    /// radians.
    ///
    /// Rotation is the angle the `rot_meas_axis` direction makes in the
    /// global x-y plane. This only makes sense with a single rotation axis,
    /// which is exactly the four-axis manipulator case this model serves.
    fn r_offset(&self) -> f64 {
        let mut axis = Vector3::zeros();
        axis[self.rot_meas_axis] = 1.0;
        let zero = Vector3::zeros();
        let n3 = self.frame_to_global(&axis, &zero, 0.0, Rotation::Global)
            - self.frame_to_global(&zero, &zero, 0.0, Rotation::Global);
        let x = n3[0];
        let y = n3[1];
        if y == 0.0 {
            return 0.0;
        }
        let theta = (y / x).atan();
        if x >= 0.0 && y >= 0.0 {
            theta
        } else if x < 0.0 && y >= 0.0 {
            theta + std::f64::consts::PI
        } else if x <= 0.0 && y < 0.0 {
            theta + std::f64::consts::PI
        } else {
            theta + std::f64::consts::TAU
        }
    }

    fn to_parent_vec(&self, v: &Vector3<f64>) -> Vector3<f64> {
        self.a * v + self.p0
    }

    fn from_parent_vec(&self, v: &Vector3<f64>) -> Vector3<f64> {
        self.ainv * (v - self.p0)
    }

    fn manip_to_global(&self, v_manip: &Vector3<f64>, manip: &Vector3<f64>, r: f64) -> Vector3<f64> {
        rotz(r.to_radians(), v_manip) + manip
    }

    fn global_to_manip(&self, v_global: &Vector3<f64>, manip: &Vector3<f64>, r: f64) -> Vector3<f64> {
        rotz(-r.to_radians(), &(v_global - manip))
    }

    /// Global coordinates of a frame point, given the manipulator position
    /// and rotation.
    ///
    /// With [`Rotation::Frame`], `r` is relative to the frame's reference
    /// (0 is grazing incidence, 90 is normal); with [`Rotation::Global`] it
    /// is applied as-is.
    pub fn frame_to_global(
        &self,
        v_frame: &Vector3<f64>,
        manip: &Vector3<f64>,
        r: f64,
        rotation: Rotation,
    ) -> Vector3<f64> {
        let rg = match rotation {
            Rotation::Frame => r - self.r0,
            Rotation::Global => r,
        };
        let v_parent = self.to_parent_vec(v_frame);
        match &self.parent {
            Some(parent) => parent.frame_to_global(&v_parent, manip, rg, Rotation::Global),
            None => self.manip_to_global(&v_parent, manip, rg),
        }
    }

    /// Frame coordinates of a global point, given the manipulator position
    /// and rotation.
    pub fn global_to_frame(
        &self,
        v_global: &Vector3<f64>,
        manip: &Vector3<f64>,
        r: f64,
    ) -> Vector3<f64> {
        let v_parent = match &self.parent {
            Some(parent) => parent.global_to_frame(v_global, manip, r),
            None => self.global_to_manip(v_global, manip, r),
        };
        self.from_parent_vec(&v_parent)
    }

    /// Manipulator position and rotation that put a frame coordinate into
    /// the beam path.
    pub fn frame_to_beam(&self, fx: f64, fy: f64, fz: f64, fr: f64) -> (f64, f64, f64, f64) {
        let v_frame = Vector3::new(fx, fy, fz);
        let v_global = -self.frame_to_global(&v_frame, &Vector3::zeros(), fr, Rotation::Frame);
        (v_global[0], v_global[1], v_global[2], fr - self.r0)
    }

    /// Beam intersection position and incidence angle in frame coordinates,
    /// given the manipulator position and rotation.
    pub fn beam_to_frame(&self, gx: f64, gy: f64, gz: f64, gr: f64) -> (f64, f64, f64, f64) {
        let manip = Vector3::new(gx, gy, gz);
        let v_frame = self.origin_to_frame(&manip, gr);
        (v_frame[0], v_frame[1], v_frame[2], gr + self.r0)
    }

    /// The global origin (the beam position) in frame coordinates.
    pub fn origin_to_frame(&self, manip: &Vector3<f64>, r: f64) -> Vector3<f64> {
        self.global_to_frame(&Vector3::zeros(), manip, r)
    }

    /// Intersection of the beam line with the frame's x-y plane, in frame
    /// coordinates.
    pub fn project_beam_to_frame_xy(&self, manip: &Vector3<f64>, r: f64) -> Vector3<f64> {
        let op = self.origin_to_frame(manip, r);
        let vp = self.ainv * (rotz_mat(-r.to_radians()) * Vector3::new(0.0, 1.0, 0.0));
        let a = op[2] / vp[2];
        op - a * vp
    }

    /// Distance from the beam (the global y axis) to the frame origin,
    /// given the manipulator position.
    pub fn distance_to_beam(&self, gx: f64, gy: f64, gz: f64, gr: f64) -> f64 {
        let manip = Vector3::new(gx, gy, gz);
        let op = self.frame_to_global(&Vector3::zeros(), &manip, gr, Rotation::Frame);
        (op[0] * op[0] + op[2] * op[2]).sqrt()
    }
}

/// A [`Frame`] with rectangular boundaries.
///
/// The panel spans `[0, width]` x `[0, height]` in its own x-y plane.
#[derive(Debug)]
pub struct Panel {
    frame: Arc<Frame>,
    width: f64,
    height: f64,
    edges: [Vector3<f64>; 4],
}

impl Panel {
    pub fn new(
        p1: &Vector3<f64>,
        p2: &Vector3<f64>,
        p3: &Vector3<f64>,
        width: f64,
        height: f64,
        parent: Option<Arc<Frame>>,
    ) -> Result<Self, FrameError> {
        let frame = Frame::new(p1, p2, p3, parent, 2)?;
        Ok(Panel {
            frame,
            width,
            height,
            edges: [
                Vector3::new(0.0, 0.0, 0.0),
                Vector3::new(width, 0.0, 0.0),
                Vector3::new(width, height, 0.0),
                Vector3::new(0.0, height, 0.0),
            ],
        })
    }

    /// A panel with the standard sample-paddle dimensions.
    pub fn standard(
        p1: &Vector3<f64>,
        p2: &Vector3<f64>,
        p3: &Vector3<f64>,
        parent: Option<Arc<Frame>>,
    ) -> Result<Self, FrameError> {
        Panel::new(p1, p2, p3, DEFAULT_PANEL_WIDTH, DEFAULT_PANEL_HEIGHT, parent)
    }

    pub fn frame(&self) -> &Arc<Frame> {
        &self.frame
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Manipulator position and rotation that put a panel coordinate into
    /// the beam, measured from the panel edge or center.
    pub fn frame_to_beam(
        &self,
        fx: f64,
        fy: f64,
        fz: f64,
        fr: f64,
        origin: Origin,
    ) -> (f64, f64, f64, f64) {
        let (fx, fy) = match origin {
            Origin::Center => (fx + self.width / 2.0, fy + self.height / 2.0),
            Origin::Edge => (fx, fy),
        };
        self.frame.frame_to_beam(fx, fy, fz, fr)
    }

    /// Beam position in panel coordinates, measured from the panel edge or
    /// center.
    pub fn beam_to_frame(
        &self,
        gx: f64,
        gy: f64,
        gz: f64,
        gr: f64,
        origin: Origin,
    ) -> (f64, f64, f64, f64) {
        let (fx, fy, fz, fr) = self.frame.beam_to_frame(gx, gy, gz, gr);
        match origin {
            Origin::Center => (fx - self.width / 2.0, fy - self.height / 2.0, fz, fr),
            Origin::Edge => (fx, fy, fz, fr),
        }
    }

    /// Panel vertices in the global system, given the manipulator position.
    pub fn real_edges(&self, manip: &Vector3<f64>, r_manip: f64) -> [Vector3<f64>; 4] {
        self.edges
            .map(|edge| self.frame.frame_to_global(&edge, manip, r_manip, Rotation::Global))
    }

    /// Panel vertices projected onto the global x-z plane.
    pub fn project_real_edges(&self, manip: &Vector3<f64>, r_manip: f64) -> Vec<Vector2<f64>> {
        self.real_edges(manip, r_manip)
            .iter()
            .map(|edge| Vector2::new(edge[0], edge[2]))
            .collect()
    }

    /// Distance from the beam to the closest panel edge, given the
    /// manipulator position. Negative when the beam is inside the panel.
    pub fn distance_to_beam(&self, x: f64, y: f64, z: f64, r: f64) -> f64 {
        let manip = Vector3::new(x, y, z);
        let projected = self.project_real_edges(&manip, r);
        let beam = Vector2::new(0.0, 0.0);
        let distance = min_dist(&beam, &projected);
        if is_in_poly(&beam, &projected) {
            -distance
        } else {
            distance
        }
    }

    /// Child panel covering the rectangle `(x1, y1)` to `(x2, y2)` at
    /// thickness `t` above this panel's surface.
    pub fn make_sample_frame(&self, position: [f64; 4], t: f64) -> Result<Panel, FrameError> {
        let [x1, y1, x2, y2] = position;
        Panel::new(
            &Vector3::new(x1, y1, t),
            &Vector3::new(x1, y2, t),
            &Vector3::new(x2, y1, t),
            x2 - x1,
            y2 - y1,
            Some(Arc::clone(&self.frame)),
        )
    }
}

/// A 1D coordinate axis with an offset, a scale, and an optional parent.
#[derive(Debug, Clone)]
pub struct Axis {
    x0: f64,
    scale: f64,
    parent: Option<Arc<Axis>>,
}

impl Axis {
    pub fn new(x0: f64, scale: f64, parent: Option<Arc<Axis>>) -> Self {
        Axis { x0, scale, parent }
    }

    pub fn frame_to_parent(&self, x: f64) -> f64 {
        x * self.scale + self.x0
    }

    // Not the algebraic inverse of frame_to_parent when scale != 1; kept for
    // compatibility with existing axis calibrations.
    pub fn parent_to_frame(&self, x: f64) -> f64 {
        x * self.scale - self.x0
    }

    pub fn frame_to_global(&self, x_frame: f64) -> f64 {
        let x_parent = self.frame_to_parent(x_frame);
        match &self.parent {
            Some(parent) => parent.frame_to_global(x_parent),
            None => x_parent,
        }
    }

    pub fn global_to_frame(&self, x_global: f64) -> f64 {
        let x_parent = match &self.parent {
            Some(parent) => parent.global_to_frame(x_global),
            None => x_global,
        };
        self.parent_to_frame(x_parent)
    }

    pub fn frame_to_beam(&self, x_frame: f64) -> f64 {
        self.frame_to_global(x_frame)
    }

    pub fn beam_to_frame(&self, x_global: f64) -> f64 {
        self.global_to_frame(x_global)
    }

    /// Axis coordinate of the beam, given its global position.
    pub fn distance_to_beam(&self, x_beam_global: f64) -> f64 {
        self.global_to_frame(x_beam_global)
    }
}

/// An [`Axis`] with a finite length.
#[derive(Debug, Clone)]
pub struct Interval {
    axis: Axis,
    length: f64,
}

impl Interval {
    pub fn new(x0: f64, length: f64, scale: f64, parent: Option<Arc<Axis>>) -> Self {
        Interval {
            axis: Axis::new(x0, scale, parent),
            length,
        }
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn frame_to_global(&self, x: f64, origin: Origin) -> f64 {
        let x = match origin {
            Origin::Center => x + self.length / 2.0,
            Origin::Edge => x,
        };
        self.axis.frame_to_global(x)
    }

    pub fn global_to_frame(&self, x: f64, origin: Origin) -> f64 {
        let x = self.axis.global_to_frame(x);
        match origin {
            Origin::Center => x - self.length / 2.0,
            Origin::Edge => x,
        }
    }

    pub fn frame_to_beam(&self, x_frame: f64, origin: Origin) -> f64 {
        self.frame_to_global(x_frame, origin)
    }

    pub fn beam_to_frame(&self, x_global: f64, origin: Origin) -> f64 {
        self.global_to_frame(x_global, origin)
    }

    /// Distance from the beam to the nearest interval endpoint. Negative
    /// when the beam is inside the interval.
    pub fn distance_to_beam(&self, x_beam_global: f64) -> f64 {
        let x = self.axis.global_to_frame(x_beam_global);
        let d1 = x.abs();
        let d2 = (x - self.length).abs();
        if d1 < self.length && d2 < self.length {
            -d1.min(d2)
        } else {
            d1.min(d2)
        }
    }

    /// Child interval covering `[x1, x2]` of this interval.
    pub fn make_sample_frame(&self, position: [f64; 2]) -> Interval {
        let [x1, x2] = position;
        Interval::new(x1, x2 - x1, 1.0, Some(Arc::new(self.axis.clone())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn assert_vec3_eq(left: &Vector3<f64>, right: &Vector3<f64>) {
        assert_relative_eq!(*left, *right, epsilon = 1e-9);
    }

    fn unit_frame() -> Arc<Frame> {
        Frame::new(
            &Vector3::new(1.0, 0.0, 0.0),
            &Vector3::new(1.0, 0.0, 1.0),
            &Vector3::new(1.0, 1.0, 0.0),
            None,
            2,
        )
        .unwrap()
    }

    fn unit_frame90() -> Arc<Frame> {
        Frame::new(
            &Vector3::new(1.0, 1.0, 0.0),
            &Vector3::new(1.0, 1.0, 1.0),
            &Vector3::new(0.0, 1.0, 0.0),
            None,
            2,
        )
        .unwrap()
    }

    fn compound_frame() -> Arc<Frame> {
        let parent = Frame::new(
            &Vector3::new(1.0, 1.0, 0.0),
            &Vector3::new(1.0, 1.0, 1.0),
            &Vector3::new(1.0, 2.0, 0.0),
            None,
            2,
        )
        .unwrap();
        Frame::new(
            &Vector3::new(0.0, 0.0, 0.0),
            &Vector3::new(0.0, 1.0, 0.0),
            &Vector3::new(0.0, 0.0, -1.0),
            Some(parent),
            2,
        )
        .unwrap()
    }

    #[test]
    fn test_unit_frame_roffset() {
        assert_relative_eq!(unit_frame().r0(), 0.0, epsilon = 1e-9);
        assert_relative_eq!(unit_frame90().r0(), 90.0, epsilon = 1e-9);
    }

    #[test]
    fn test_frame_to_global() {
        let frame = unit_frame();
        let zero = Vector3::zeros();

        assert_vec3_eq(
            &frame.frame_to_global(&zero, &zero, 0.0, Rotation::Global),
            &Vector3::new(1.0, 0.0, 0.0),
        );
        assert_vec3_eq(
            &frame.frame_to_global(&Vector3::new(1.0, 0.0, 0.0), &zero, 0.0, Rotation::Global),
            &Vector3::new(1.0, 1.0, 0.0),
        );
        // At r=90 in the frame's own reference the origin swings onto +y
        assert_vec3_eq(
            &frame.frame_to_global(&zero, &zero, 90.0, Rotation::Frame),
            &Vector3::new(0.0, 1.0, 0.0),
        );
    }

    #[test]
    fn test_translated_frame() {
        let parent = unit_frame();
        for &xoffset in &[-1.0, 0.0, 1.0] {
            for &yoffset in &[-1.0, 0.0, 1.0] {
                for &zoffset in &[-1.0, 0.0, 1.0] {
                    let offset = Vector3::new(xoffset, yoffset, zoffset);
                    let compound = Frame::new(
                        &offset,
                        &(Vector3::new(0.0, 1.0, 0.0) + offset),
                        &(Vector3::new(1.0, 0.0, 0.0) + offset),
                        Some(Arc::clone(&parent)),
                        2,
                    )
                    .unwrap();
                    let zero = Vector3::zeros();
                    let parent_vec =
                        parent.frame_to_global(&offset, &zero, 90.0, Rotation::Global);
                    let trans_vec =
                        compound.frame_to_global(&zero, &zero, 90.0, Rotation::Frame);
                    assert_vec3_eq(&trans_vec, &parent_vec);
                }
            }
        }
    }

    #[test]
    fn test_compound_frame_matches_equivalent_simple_frame() {
        let simple = unit_frame90();
        let compound = compound_frame();
        let zero = Vector3::zeros();
        let v = Vector3::new(0.3, 0.7, 0.2);
        let r = 37.0;
        let manip = Vector3::new(0.1, 0.5, 0.9);

        assert_vec3_eq(
            &simple.frame_to_global(&zero, &zero, 0.0, Rotation::Global),
            &compound.frame_to_global(&zero, &zero, 0.0, Rotation::Global),
        );
        assert_vec3_eq(
            &simple.frame_to_global(&v, &zero, 0.0, Rotation::Global),
            &compound.frame_to_global(&v, &zero, 0.0, Rotation::Global),
        );
        assert_vec3_eq(
            &simple.frame_to_global(&v, &zero, r, Rotation::Frame),
            &compound.frame_to_global(&v, &zero, r, Rotation::Frame),
        );
        assert_vec3_eq(
            &simple.global_to_frame(&v, &zero, r),
            &compound.global_to_frame(&v, &zero, r),
        );
        assert_vec3_eq(
            &simple.global_to_frame(&v, &manip, r),
            &compound.global_to_frame(&v, &manip, r),
        );
    }

    #[test]
    fn test_beam_round_trip() {
        let frame = unit_frame();
        let (gx, gy, gz, gr) = frame.frame_to_beam(0.5, 2.0, 0.0, 30.0);
        let (fx, fy, fz, fr) = frame.beam_to_frame(gx, gy, gz, gr);
        assert_relative_eq!(fx, 0.5, epsilon = 1e-9);
        assert_relative_eq!(fy, 2.0, epsilon = 1e-9);
        assert_relative_eq!(fz, 0.0, epsilon = 1e-9);
        assert_relative_eq!(fr, 30.0, epsilon = 1e-9);
    }

    fn test_panel() -> Panel {
        Panel::new(
            &Vector3::new(-1.0, 0.0, 0.0),
            &Vector3::new(-1.0, 0.0, 1.0),
            &Vector3::new(0.0, 0.0, 0.0),
            2.0,
            10.0,
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_panel_distance_sign() {
        let panel = test_panel();
        // Panel below the beam: closest edge is one unit away
        assert_relative_eq!(panel.distance_to_beam(0.0, 0.0, 1.0, 0.0), 1.0, epsilon = 1e-9);
        // Beam inside the panel
        assert_relative_eq!(panel.distance_to_beam(0.0, 0.0, -1.0, 0.0), -1.0, epsilon = 1e-9);
        // Still inside; the side edges are now the nearest
        assert_relative_eq!(panel.distance_to_beam(0.0, 0.0, -3.0, 0.0), -1.0, epsilon = 1e-9);
        // Exactly on the bottom edge
        assert_relative_eq!(panel.distance_to_beam(0.0, 0.0, 0.0, 0.0), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_standard_panel_dimensions() {
        let panel = Panel::standard(
            &Vector3::new(0.0, 0.0, 0.0),
            &Vector3::new(0.0, 0.0, 1.0),
            &Vector3::new(1.0, 0.0, 0.0),
            None,
        )
        .unwrap();
        assert_relative_eq!(panel.width(), 19.5, epsilon = 1e-12);
        assert_relative_eq!(panel.height(), 130.0, epsilon = 1e-12);
    }

    #[test]
    fn test_panel_center_origin() {
        let panel = test_panel();
        let edge = panel.frame_to_beam(1.0, 5.0, 0.0, 0.0, Origin::Edge);
        let center = panel.frame_to_beam(0.0, 0.0, 0.0, 0.0, Origin::Center);
        assert_relative_eq!(edge.0, center.0, epsilon = 1e-9);
        assert_relative_eq!(edge.1, center.1, epsilon = 1e-9);
        assert_relative_eq!(edge.2, center.2, epsilon = 1e-9);

        let (fx, fy, _, _) = panel.beam_to_frame(center.0, center.1, center.2, center.3, Origin::Center);
        assert_relative_eq!(fx, 0.0, epsilon = 1e-9);
        assert_relative_eq!(fy, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_panel_sample_frame_is_offset_child() {
        let panel = test_panel();
        let sample = panel.make_sample_frame([0.5, 1.0, 1.5, 9.0], 0.0).unwrap();
        assert_relative_eq!(sample.width(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(sample.height(), 8.0, epsilon = 1e-12);
        // The sample origin maps to the same global point as the parent
        // coordinate it was carved from
        let from_sample = sample.frame_to_beam(0.0, 0.0, 0.0, 0.0, Origin::Edge);
        let from_panel = panel.frame_to_beam(0.5, 1.0, 0.0, 0.0, Origin::Edge);
        assert_relative_eq!(from_sample.0, from_panel.0, epsilon = 1e-9);
        assert_relative_eq!(from_sample.1, from_panel.1, epsilon = 1e-9);
        assert_relative_eq!(from_sample.2, from_panel.2, epsilon = 1e-9);
    }

    #[test]
    fn test_axis_chain() {
        let parent = Arc::new(Axis::new(10.0, 1.0, None));
        let child = Axis::new(2.0, 1.0, Some(parent));
        assert_relative_eq!(child.frame_to_global(1.0), 13.0, epsilon = 1e-12);
        assert_relative_eq!(child.global_to_frame(13.0), 1.0, epsilon = 1e-12);
        assert_relative_eq!(child.beam_to_frame(child.frame_to_beam(4.2)), 4.2, epsilon = 1e-12);
    }

    #[test]
    fn test_interval_distance_sign() {
        let interval = Interval::new(5.0, 10.0, 1.0, None);
        // Beam at global 7 is at interval coordinate 2, inside
        assert_relative_eq!(interval.distance_to_beam(7.0), -2.0, epsilon = 1e-12);
        // Beam at global 18 is at interval coordinate 13, outside
        assert_relative_eq!(interval.distance_to_beam(18.0), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_interval_center_origin() {
        let interval = Interval::new(5.0, 10.0, 1.0, None);
        assert_relative_eq!(
            interval.frame_to_global(0.0, Origin::Center),
            10.0,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            interval.global_to_frame(10.0, Origin::Center),
            0.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_interval_sample_frame() {
        let interval = Interval::new(5.0, 10.0, 1.0, None);
        let sample = interval.make_sample_frame([2.0, 6.0]);
        assert_relative_eq!(sample.length(), 4.0, epsilon = 1e-12);
        assert_relative_eq!(sample.frame_to_beam(0.0, Origin::Edge), 7.0, epsilon = 1e-12);
        assert_relative_eq!(sample.beam_to_frame(7.0, Origin::Edge), 0.0, epsilon = 1e-12);
    }
}
