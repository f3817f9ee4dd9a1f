//! Sample-holder bar geometries.
//!
//! A holder geometry turns a declared sample position into a concrete child
//! frame of the manipulator's attachment frame. The attachment frame sits at
//! the holder mounting point; [`Standard4SidedBar`] hangs a bar frame below
//! it and puts one outward-facing frame on each of its four sides.

use std::path::Path;
use std::sync::Arc;

use fxhash::FxHashMap;

use super::affine::{Axis, Frame};
use super::error::{FrameError, SampleError, SampleFileError};
use super::sample::{
    read_sample_csv, read_sample_yaml, Sample, SampleFrame, SampleMap, SamplePosition, SampleSpec,
};

/// Geometry of a sample holder mounted on a manipulator.
pub trait HolderGeometry: Send {
    /// Build the holder's frames as children of the attachment frame.
    /// Called when the holder is mounted, and again if it is remounted.
    fn generate_geometry(&mut self, attachment: &Arc<Frame>) -> Result<(), FrameError>;

    /// Resolve a declared sample position to a frame in the manipulator
    /// tree.
    fn make_sample_frame(&self, position: &SamplePosition) -> Result<SampleFrame, SampleError>;

    /// Findable targets the holder itself provides (such as bar sides),
    /// in addition to any registered samples.
    fn holder_targets(&self) -> (FxHashMap<String, Sample>, FxHashMap<String, SampleFrame>) {
        (FxHashMap::default(), FxHashMap::default())
    }

    /// Number of selectable sides, 0 for holders without sides.
    fn sides(&self) -> usize {
        0
    }

    /// Read a sample definition file in a format this holder understands.
    fn read_sample_file(&self, path: &Path) -> Result<SampleMap, SampleFileError> {
        match extension_of(path).as_deref() {
            Some("yaml") | Some("yml") => read_sample_yaml(path),
            ext => Err(SampleFileError::UnsupportedFileFormat(
                ext.unwrap_or("").to_string(),
            )),
        }
    }
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
}

/// A four-sided sample bar hanging below the attachment point.
///
/// The bar frame's y axis runs up the bar toward the attachment point and
/// its origin is at the bottom. Each side frame has x along the bar width,
/// y up the bar, and z as the outward surface normal, with its origin at the
/// bottom corner of that side.
pub struct Standard4SidedBar {
    width: f64,
    length: f64,
    bar_frame: Option<Arc<Frame>>,
    side_frames: Vec<Arc<Frame>>,
}

impl Standard4SidedBar {
    pub const SIDES: usize = 4;

    pub fn new(width: f64, length: f64) -> Self {
        Standard4SidedBar {
            width,
            length,
            bar_frame: None,
            side_frames: Vec::new(),
        }
    }

    pub fn side_frames(&self) -> &[Arc<Frame>] {
        &self.side_frames
    }

    fn axes(coords: [[f64; 3]; 3]) -> Result<Vec<Axis>, FrameError> {
        coords.iter().map(|c| Axis::new(c)).collect()
    }
}

impl HolderGeometry for Standard4SidedBar {
    fn generate_geometry(&mut self, attachment: &Arc<Frame>) -> Result<(), FrameError> {
        let bar_axes = Self::axes([[1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, -1.0, 0.0]])?;
        let bar_frame = Frame::make_child_frame(attachment, bar_axes, &[0.0, 0.0, -self.length])?;

        let side_axes = [
            [[0.0, 0.0, 1.0], [0.0, 1.0, 0.0], [-1.0, 0.0, 0.0]],
            [[-1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, -1.0]],
            [[0.0, 0.0, -1.0], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0]],
            [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
        ];
        let hw = self.width / 2.0;
        let side_origins = [
            [-hw, 0.0, -hw],
            [hw, 0.0, -hw],
            [hw, 0.0, hw],
            [-hw, 0.0, hw],
        ];
        let mut side_frames = Vec::with_capacity(Self::SIDES);
        for (axes, origin) in side_axes.into_iter().zip(side_origins) {
            side_frames.push(Frame::make_child_frame(&bar_frame, Self::axes(axes)?, &origin)?);
        }
        self.bar_frame = Some(bar_frame);
        self.side_frames = side_frames;
        Ok(())
    }

    fn make_sample_frame(&self, position: &SamplePosition) -> Result<SampleFrame, SampleError> {
        let side = position
            .side
            .ok_or(SampleError::MissingPositionField("side"))?;
        if side < 1 || side > Self::SIDES {
            return Err(SampleError::UnknownSide {
                side,
                sides: Self::SIDES,
            });
        }
        if self.side_frames.is_empty() {
            return Err(SampleError::NotAttached);
        }
        if position.coordinates.len() != 4 {
            return Err(SampleError::BadCoordinates {
                expected: 4,
                found: position.coordinates.len(),
            });
        }
        let [x1, y1, x2, y2] = [
            position.coordinates[0],
            position.coordinates[1],
            position.coordinates[2],
            position.coordinates[3],
        ];
        let origin = [
            0.5 * (x1 + x2),
            0.5 * (y1 + y2),
            position.thickness.unwrap_or(0.0),
        ];
        let frame = Frame::make_child_frame(&self.side_frames[side - 1], Vec::new(), &origin)?;
        Ok(SampleFrame::Resolved(frame))
    }

    fn holder_targets(&self) -> (FxHashMap<String, Sample>, FxHashMap<String, SampleFrame>) {
        let mut targets = FxHashMap::default();
        let mut frames = FxHashMap::default();
        for (n, frame) in self.side_frames.iter().enumerate() {
            // Humans one-index sides
            let side_id = format!("side{}", n + 1);
            targets.insert(
                side_id.clone(),
                Sample::from_spec(
                    &side_id,
                    SampleSpec {
                        name: side_id.clone(),
                        ..SampleSpec::default()
                    },
                ),
            );
            frames.insert(side_id, SampleFrame::Resolved(Arc::clone(frame)));
        }
        (targets, frames)
    }

    fn sides(&self) -> usize {
        Self::SIDES
    }

    fn read_sample_file(&self, path: &Path) -> Result<SampleMap, SampleFileError> {
        match extension_of(path).as_deref() {
            Some("csv") => read_sample_csv(path),
            Some("yaml") | Some("yml") => read_sample_yaml(path),
            ext => Err(SampleFileError::UnsupportedFileFormat(
                ext.unwrap_or("").to_string(),
            )),
        }
    }
}

/// A one-dimensional holder: samples sit at offsets along a single axis.
pub struct Bar1d {
    attachment: Option<Arc<Frame>>,
}

impl Bar1d {
    pub fn new() -> Self {
        Bar1d { attachment: None }
    }
}

impl Default for Bar1d {
    fn default() -> Self {
        Bar1d::new()
    }
}

impl HolderGeometry for Bar1d {
    fn generate_geometry(&mut self, attachment: &Arc<Frame>) -> Result<(), FrameError> {
        self.attachment = Some(Arc::clone(attachment));
        Ok(())
    }

    fn make_sample_frame(&self, position: &SamplePosition) -> Result<SampleFrame, SampleError> {
        let attachment = self.attachment.as_ref().ok_or(SampleError::NotAttached)?;
        if position.coordinates.len() != 1 {
            return Err(SampleError::BadCoordinates {
                expected: 1,
                found: position.coordinates.len(),
            });
        }
        let frame = Frame::make_child_frame(attachment, Vec::new(), &position.coordinates)?;
        Ok(SampleFrame::Resolved(frame))
    }
}

/// A pass-through holder for samples declared in raw manipulator
/// coordinates.
pub struct AbsoluteBar;

impl HolderGeometry for AbsoluteBar {
    fn generate_geometry(&mut self, _attachment: &Arc<Frame>) -> Result<(), FrameError> {
        Ok(())
    }

    fn make_sample_frame(&self, position: &SamplePosition) -> Result<SampleFrame, SampleError> {
        Ok(SampleFrame::Absolute(position.coordinates.clone()))
    }
}
