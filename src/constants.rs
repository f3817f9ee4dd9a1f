/// Default width (mm) of the standard sample paddle.
pub const DEFAULT_PANEL_WIDTH: f64 = 19.5;
/// Default height (mm) of the standard sample paddle.
pub const DEFAULT_PANEL_HEIGHT: f64 = 130.0;
/// Direction of beam travel in the lab frame.
pub const BEAM_DIRECTION: [f64; 3] = [0.0, -1.0, 0.0];
/// Index of the manipulator rotation axis (z).
pub const ROTATION_AXIS: usize = 2;
/// Default pseudo coordinates when moving to a frame-resolved sample.
/// The 45 degree rotation is a safe default incidence angle.
pub const DEFAULT_SAMPLE_COORDS: [f64; 4] = [0.0, 0.0, 0.0, 45.0];
/// Absolute tolerance for treating two vertices as coincident.
pub const COINCIDENCE_TOLERANCE: f64 = 1e-8;
