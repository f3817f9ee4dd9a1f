use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum LinalgError {
    #[error("Cannot construct a basis from collinear or coincident points")]
    DegenerateBasis,
    #[error("Cannot normalize a zero-length vector")]
    ZeroVector,
}

#[derive(Debug, Clone, Error)]
pub enum FrameError {
    #[error("Cannot create an Axis from a zero-length vector")]
    DegenerateAxis,
    #[error("Frame axes are linearly dependent; the transform is not invertible")]
    SingularTransform,
    #[error("Dimension mismatch in {context}; expected {expected}, found {found}")]
    DimensionMismatch {
        context: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("Axis index {axis} is out of range for dimension {dim}")]
    AxisOutOfRange { axis: usize, dim: usize },
    #[error("Frames do not share the same global frame")]
    FrameMismatch,
    #[error("Frame basis construction failed: {0}")]
    BadBasis(#[from] LinalgError),
}

#[derive(Debug, Clone, Error)]
pub enum SampleError {
    #[error("Sample id {0:?} was not found in the sample or holder registries")]
    UnknownSample(String),
    #[error("No holder is attached; cannot resolve a holder-relative sample position")]
    NoHolder,
    #[error("Holder geometry has not been attached to a manipulator frame")]
    NotAttached,
    #[error("Sample position is missing its {0:?} field")]
    MissingPositionField(&'static str),
    #[error("Sample position references side {side}, but the holder has {sides} sides")]
    UnknownSide { side: usize, sides: usize },
    #[error("Sample position has {found} coordinates; expected {expected}")]
    BadCoordinates { expected: usize, found: usize },
    #[error("Sample frame construction failed: {0}")]
    Frame(#[from] FrameError),
}

#[derive(Debug, Error)]
pub enum SampleFileError {
    #[error("Could not load samples because file {0:?} does not exist")]
    BadFilePath(PathBuf),
    #[error("No sample reader is implemented for files with extension {0:?}")]
    UnsupportedFileFormat(String),
    #[error("Sample file is missing the required column {0:?}")]
    MissingColumn(&'static str),
    #[error("Sample file row {line} has no value for {column:?}")]
    MissingValue { line: usize, column: &'static str },
    #[error("Sample file failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Sample file failed to parse a number: {0}")]
    ParsingError(#[from] std::num::ParseFloatError),
    #[error("Sample file failed to parse an integer: {0}")]
    IntParsingError(#[from] std::num::ParseIntError),
    #[error("Sample file failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

#[derive(Debug, Error)]
pub enum HolderError {
    #[error("Sample holder failed due to frame error: {0}")]
    Frame(#[from] FrameError),
    #[error("Sample holder failed due to sample error: {0}")]
    Sample(#[from] SampleError),
    #[error("Sample holder failed due to sample file error: {0}")]
    File(#[from] SampleFileError),
}

#[derive(Debug, Error)]
pub enum KinematicsError {
    #[error("Kinematics failed due to frame error: {0}")]
    Frame(#[from] FrameError),
    #[error("Kinematics failed due to sample error: {0}")]
    Sample(#[from] SampleError),
    #[error("Kinematics failed due to holder error: {0}")]
    Holder(#[from] HolderError),
}
