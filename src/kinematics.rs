//! Manipulator forward and inverse kinematics.
//!
//! A manipulator converts pseudo positions (coordinates in the currently
//! selected sample frame, plus a rotation relative to grazing incidence)
//! into real motor positions, and back. The rotation axis is a single motor
//! axis; sample rotations are measured from the grazing orientation, where
//! the selected frame's surface x axis points into the beam.

use super::affine::{find_rotation, Frame};
use super::constants::{BEAM_DIRECTION, DEFAULT_SAMPLE_COORDS, ROTATION_AXIS};
use super::error::KinematicsError;
use super::holder::SampleHolder;
use super::sample::SampleFrame;

/// Position in the selected sample frame: coordinates plus a rotation (in
/// degrees) relative to grazing incidence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PseudoPosition {
    pub sx: f64,
    pub sy: f64,
    pub sz: f64,
    pub sr: f64,
}

/// Real motor position of the four-axis manipulator. Rotation in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RealPosition {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub r: f64,
}

/// Per-axis overrides for [`Manipulator4Ax::get_sample_position`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PositionOverrides {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
    pub r: Option<f64>,
}

/// An x, y, z, r sample manipulator.
pub struct Manipulator4Ax {
    holder: SampleHolder,
    beam_direction: [f64; 3],
    rotation_ax: usize,
    ax1: usize,
    ax2: usize,
    default_coords: [f64; 4],
}

impl Manipulator4Ax {
    /// Create a manipulator whose holder attachment point sits at the given
    /// motor coordinates, with the default beam direction and rotation axis.
    pub fn new(attachment_point: [f64; 3]) -> Result<Self, KinematicsError> {
        Self::with_beam(attachment_point, BEAM_DIRECTION, ROTATION_AXIS)
    }

    pub fn with_beam(
        attachment_point: [f64; 3],
        beam_direction: [f64; 3],
        rotation_ax: usize,
    ) -> Result<Self, KinematicsError> {
        let holder = SampleHolder::new(&attachment_point)?;
        Ok(Manipulator4Ax {
            holder,
            beam_direction,
            rotation_ax,
            ax1: (rotation_ax + 1) % 3,
            ax2: (rotation_ax + 2) % 3,
            default_coords: DEFAULT_SAMPLE_COORDS,
        })
    }

    pub fn holder(&self) -> &SampleHolder {
        &self.holder
    }

    /// Rotation (degrees) of the frame's surface x axis away from the beam,
    /// about the rotation axis. Zero is grazing incidence.
    ///
    /// Assumes the frame's z axis is the surface normal.
    fn grazing_deg(&self, frame: &Frame) -> Result<f64, KinematicsError> {
        let angle = find_rotation(
            frame,
            &[1.0, 0.0, 0.0],
            self.holder.manip_frame(),
            &self.beam_direction,
            self.rotation_ax,
        )?;
        Ok(angle.to_degrees())
    }

    /// Convert a rotation relative to the selected sample's grazing
    /// orientation into a real rotation-motor angle.
    pub fn sample_rotation_to_manip_rotation(&self, r: f64) -> Result<f64, KinematicsError> {
        match self.holder.current_frame() {
            SampleFrame::Resolved(frame) => Ok(self.grazing_deg(&frame)? + r),
            SampleFrame::Absolute(_) => Ok(r),
        }
    }

    /// Convert a real rotation-motor angle into a rotation relative to the
    /// selected sample's grazing orientation.
    pub fn manip_rotation_to_sample_rotation(&self, r: f64) -> Result<f64, KinematicsError> {
        match self.holder.current_frame() {
            SampleFrame::Resolved(frame) => Ok(r - self.grazing_deg(&frame)?),
            SampleFrame::Absolute(_) => Ok(r),
        }
    }

    /// Convert a position in the selected sample frame into real motor
    /// coordinates.
    pub fn forward(&self, pp: PseudoPosition) -> Result<RealPosition, KinematicsError> {
        if !self.holder.has_holder() {
            return Ok(RealPosition {
                x: pp.sx,
                y: pp.sy,
                z: pp.sz,
                r: pp.sr,
            });
        }
        match self.holder.current_frame() {
            SampleFrame::Resolved(frame) => {
                let manip = self.holder.manip_frame();
                let in_manip = frame.to_frame(&[pp.sx, pp.sy, pp.sz], manip)?;
                let r = self.grazing_deg(&frame)? + pp.sr;
                let rotated =
                    manip.rotate_in_plane(&in_manip, r.to_radians(), self.ax1, self.ax2)?;
                Ok(RealPosition {
                    x: rotated[0],
                    y: rotated[1],
                    z: rotated[2],
                    r,
                })
            }
            SampleFrame::Absolute(coords) => {
                let offset = |i: usize| coords.get(i).copied().unwrap_or(0.0);
                Ok(RealPosition {
                    x: pp.sx + offset(0),
                    y: pp.sy + offset(1),
                    z: pp.sz + offset(2),
                    r: pp.sr + offset(3),
                })
            }
        }
    }

    /// Convert real motor coordinates into a position in the selected
    /// sample frame.
    pub fn inverse(&self, rp: RealPosition) -> Result<PseudoPosition, KinematicsError> {
        if !self.holder.has_holder() {
            return Ok(PseudoPosition {
                sx: rp.x,
                sy: rp.y,
                sz: rp.z,
                sr: rp.r,
            });
        }
        match self.holder.current_frame() {
            SampleFrame::Resolved(frame) => {
                let manip = self.holder.manip_frame();
                let sr = rp.r - self.grazing_deg(&frame)?;
                let unrotated = manip.rotate_in_plane(
                    &[rp.x, rp.y, rp.z],
                    -rp.r.to_radians(),
                    self.ax1,
                    self.ax2,
                )?;
                let in_frame = manip.to_frame(&unrotated, &frame)?;
                Ok(PseudoPosition {
                    sx: in_frame[0],
                    sy: in_frame[1],
                    sz: in_frame[2],
                    sr,
                })
            }
            SampleFrame::Absolute(coords) => {
                let offset = |i: usize| coords.get(i).copied().unwrap_or(0.0);
                Ok(PseudoPosition {
                    sx: rp.x - offset(0),
                    sy: rp.y - offset(1),
                    sz: rp.z - offset(2),
                    sr: rp.r - offset(3),
                })
            }
        }
    }

    /// Select a sample (if an id is given) and return the pseudo position
    /// to move to, starting from the defaults and applying any overrides.
    pub fn get_sample_position(
        &self,
        sample_id: Option<&str>,
        overrides: PositionOverrides,
    ) -> Result<PseudoPosition, KinematicsError> {
        if let Some(sample_id) = sample_id {
            self.holder.set_sample(sample_id)?;
        }
        let frame_selected = self.holder.has_holder()
            && matches!(self.holder.current_frame(), SampleFrame::Resolved(_));
        let base = if frame_selected {
            self.default_coords
        } else {
            [0.0; 4]
        };
        Ok(PseudoPosition {
            sx: overrides.x.unwrap_or(base[0]),
            sy: overrides.y.unwrap_or(base[1]),
            sz: overrides.z.unwrap_or(base[2]),
            sr: overrides.r.unwrap_or(base[3]),
        })
    }

    /// Register the current real position as an absolute sample.
    pub fn add_current_position_as_sample(
        &self,
        sample_id: &str,
        name: &str,
        description: Option<&str>,
        real_position: RealPosition,
    ) -> Result<(), KinematicsError> {
        self.holder
            .add_current_position_as_sample(
                sample_id,
                name,
                description,
                &[real_position.x, real_position.y, real_position.z, real_position.r],
            )
            .map_err(KinematicsError::from)
    }
}

/// A single-axis sample manipulator.
pub struct Manipulator1Ax {
    holder: SampleHolder,
}

impl Manipulator1Ax {
    pub fn new(origin: f64) -> Result<Self, KinematicsError> {
        Ok(Manipulator1Ax {
            holder: SampleHolder::new(&[origin])?,
        })
    }

    pub fn holder(&self) -> &SampleHolder {
        &self.holder
    }

    /// Convert a position along the selected sample frame into the real
    /// motor coordinate.
    pub fn forward(&self, sx: f64) -> Result<f64, KinematicsError> {
        if !self.holder.has_holder() {
            return Ok(sx);
        }
        match self.holder.current_frame() {
            SampleFrame::Resolved(frame) => {
                let position = frame.to_frame(&[sx], self.holder.manip_frame())?;
                Ok(position[0])
            }
            SampleFrame::Absolute(coords) => {
                Ok(sx + coords.first().copied().unwrap_or(0.0))
            }
        }
    }

    /// Convert the real motor coordinate into a position along the selected
    /// sample frame.
    pub fn inverse(&self, x: f64) -> Result<f64, KinematicsError> {
        if !self.holder.has_holder() {
            return Ok(x);
        }
        match self.holder.current_frame() {
            SampleFrame::Resolved(frame) => {
                let position = self.holder.manip_frame().to_frame(&[x], &frame)?;
                Ok(position[0])
            }
            SampleFrame::Absolute(coords) => {
                Ok(x - coords.first().copied().unwrap_or(0.0))
            }
        }
    }

    /// Select a sample (if an id is given) and return the position to move
    /// to along its frame.
    pub fn get_sample_position(
        &self,
        sample_id: Option<&str>,
        position: f64,
    ) -> Result<f64, KinematicsError> {
        if let Some(sample_id) = sample_id {
            self.holder.set_sample(sample_id)?;
        }
        Ok(position)
    }
}
