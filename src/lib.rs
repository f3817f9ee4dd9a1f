//! Sample geometry for beamline manipulators.
//!
//! This crate models where samples are in a synchrotron endstation: affine
//! coordinate frames chained from the manipulator down to individual
//! samples, sample-holder bar geometries that turn declared sample positions
//! into frames, and the forward/inverse kinematics that move a four-axis
//! (x, y, z, r) manipulator so that a chosen sample point sits in the beam.
//!
//! Conventions: the beam travels along the global -y axis and passes through
//! the global origin; the manipulator rotation axis is z; rotations are in
//! degrees, with 0 meaning grazing incidence on the selected sample surface
//! and 90 meaning normal incidence.
//!
//! - [`affine`]: N-dimensional frames with homogeneous transforms
//! - [`frames`]: the legacy 3D frame/panel model and 1D axes/intervals
//! - [`linalg`] and [`polygons`]: the small geometry toolbox behind both
//! - [`sample`]: sample metadata and CSV/YAML sample definition files
//! - [`bars`]: holder geometries (4-sided bars, 1D bars, absolute holders)
//! - [`holder`]: the sample registry and selection state
//! - [`kinematics`]: manipulator forward and inverse kinematics

pub mod affine;
pub mod bars;
pub mod constants;
pub mod error;
pub mod frames;
pub mod holder;
pub mod kinematics;
pub mod linalg;
pub mod polygons;
pub mod sample;
