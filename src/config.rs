use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, TAU};

// ============================================
// Membrane Animation Parameters
// ============================================

/// Radius of the animated membrane (m)
pub const MEMBRANE_RADIUS: f64 = 1.0;

/// Angular mode number (nodal diameters)
pub const ANGULAR_MODE: i32 = 2;

/// Radial mode number (nodal circles, counting the rim)
pub const RADIAL_MODE: i32 = 5;

/// Membrane tension (N/m)
pub const TENSION: f64 = 100.0;

/// Surface mass density (kg/m²)
pub const SURFACE_DENSITY: f64 = 0.01;

/// Number of animation frames before the sequence loops
pub const FRAME_COUNT: u32 = 100;

/// Animation frame rate
pub const FRAMES_PER_SECOND: u32 = 40;

/// Samples along both the radial and angular grid axes
pub const GRID_RESOLUTION: usize = 100;

// ============================================
// Laser Reflection Parameters
// ============================================

/// Radius of the reflecting drum head (m)
pub const DRUM_RADIUS: f64 = 0.04;

/// Distance from the membrane to the projection screen (m)
pub const SCREEN_DISTANCE: f64 = 2.0;

/// Radial coordinate of the reflection point (0 < r0 <= R)
pub const REFLECTION_RADIUS: f64 = 0.02;

/// Angular coordinate of the reflection point (radians)
pub const REFLECTION_ANGLE: f64 = FRAC_PI_4;

/// Length of the traced time window
pub const TIME_SPAN: f64 = TAU;

/// Number of time samples along the trace
pub const TIME_SAMPLES: usize = 1000;

/// Mode table used by the laser program
pub const DEFAULT_LASER_PRESET: LaserPreset = LaserPreset::Ensemble;

/// Literal description of one vibration mode, validated into a `MembraneMode`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModeSpec {
    /// Angular mode number m (nodal diameters)
    pub m: i32,
    /// Radial mode number n (nodal circles)
    pub n: i32,
    /// Amplitude (m)
    pub amplitude: f64,
    /// Angular frequency (rad/s)
    pub angular_frequency: f64,
    /// Angular phase offset (radians)
    pub angular_phase: f64,
    /// Temporal phase offset (radians)
    pub temporal_phase: f64,
}

impl ModeSpec {
    pub const fn new(m: i32, n: i32, amplitude: f64, angular_frequency: f64) -> Self {
        Self {
            m,
            n,
            amplitude,
            angular_frequency,
            angular_phase: 0.0,
            temporal_phase: 0.0,
        }
    }

    pub const fn with_phases(mut self, angular_phase: f64, temporal_phase: f64) -> Self {
        self.angular_phase = angular_phase;
        self.temporal_phase = temporal_phase;
        self
    }
}

/// Five superposed modes producing a dense Lissajous figure
pub const ENSEMBLE_MODES: [ModeSpec; 5] = [
    ModeSpec::new(1, 1, 0.001, 50.0),
    ModeSpec::new(2, 6, 0.005, 80.0).with_phases(FRAC_PI_2, 0.0),
    ModeSpec::new(2, 1, 0.005, 80.0).with_phases(FRAC_PI_2, 0.0),
    ModeSpec::new(1, 5, 0.005, 80.0).with_phases(FRAC_PI_2, 0.0),
    ModeSpec::new(2, 3, 0.005, 80.0).with_phases(FRAC_PI_2, 0.0),
];

/// A single large (2,2) mode
pub const SINGLE_MODES: [ModeSpec; 1] = [ModeSpec::new(2, 2, 0.1, 5.0)];

/// Selectable mode tables for the laser program
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LaserPreset {
    Ensemble,
    Single,
}

impl LaserPreset {
    pub fn modes(self) -> &'static [ModeSpec] {
        match self {
            LaserPreset::Ensemble => &ENSEMBLE_MODES,
            LaserPreset::Single => &SINGLE_MODES,
        }
    }
}

// ============================================
// Pipeline Configuration
// ============================================

/// Inputs of the single-mode resonance animation
#[derive(Clone, Debug, PartialEq)]
pub struct ResonanceConfig {
    pub radius: f64,
    pub angular_mode: i32,
    pub radial_mode: i32,
    pub tension: f64,
    pub surface_density: f64,
    pub frame_count: u32,
    pub frames_per_second: u32,
    pub grid_resolution: usize,
}

impl Default for ResonanceConfig {
    fn default() -> Self {
        Self {
            radius: MEMBRANE_RADIUS,
            angular_mode: ANGULAR_MODE,
            radial_mode: RADIAL_MODE,
            tension: TENSION,
            surface_density: SURFACE_DENSITY,
            frame_count: FRAME_COUNT,
            frames_per_second: FRAMES_PER_SECOND,
            grid_resolution: GRID_RESOLUTION,
        }
    }
}

/// Inputs of the multi-mode laser reflection trace
#[derive(Clone, Debug, PartialEq)]
pub struct ReflectionConfig {
    pub radius: f64,
    pub reflection_radius: f64,
    pub reflection_angle: f64,
    pub screen_distance: f64,
    pub modes: Vec<ModeSpec>,
    pub time_span: f64,
    pub time_samples: usize,
}

impl ReflectionConfig {
    pub fn from_preset(preset: LaserPreset) -> Self {
        Self {
            radius: DRUM_RADIUS,
            reflection_radius: REFLECTION_RADIUS,
            reflection_angle: REFLECTION_ANGLE,
            screen_distance: SCREEN_DISTANCE,
            modes: preset.modes().to_vec(),
            time_span: TIME_SPAN,
            time_samples: TIME_SAMPLES,
        }
    }
}

impl Default for ReflectionConfig {
    fn default() -> Self {
        Self::from_preset(DEFAULT_LASER_PRESET)
    }
}

// ============================================
// Surface Rendering
// ============================================

/// Initial window size in logical pixels
pub const WINDOW_SIZE: u32 = 900;

/// Displacement axis limits (±)
pub const Z_LIMIT: f32 = 1.0;

/// Vertical exaggeration applied after clamping to Z_LIMIT
pub const Z_SCALE: f32 = 0.5;

/// Draw a wireframe line every N grid lines
pub const WIRE_STRIDE: usize = 4;

/// Default camera orbit (radians) and distance (membrane radii)
pub const DEFAULT_CAMERA_AZIMUTH: f32 = -1.0;
pub const DEFAULT_CAMERA_ELEVATION: f32 = 0.52;
pub const DEFAULT_CAMERA_DISTANCE: f32 = 3.2;

/// Camera rotation per key press (radians)
pub const CAMERA_ROTATE_SPEED: f32 = 0.08;

/// Camera zoom factor per key press
pub const CAMERA_ZOOM_SPEED: f32 = 1.1;

// ============================================
// Trace Rendering
// ============================================

/// Trajectory colour (RGBA)
pub const TRACE_COLOR: [f32; 4] = [0.12, 0.47, 0.71, 1.0];

/// Background grid colour (RGBA)
pub const GRID_COLOR: [f32; 4] = [0.82, 0.82, 0.82, 1.0];

/// Approximate number of grid divisions across the larger data extent
pub const GRID_DIVISIONS: f64 = 8.0;

/// Fraction of clip space left empty around the trace
pub const TRACE_MARGIN: f32 = 0.1;

/// Points revealed per frame in progressive tracing mode
pub const TRACE_POINTS_PER_FRAME: usize = 4;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_reflection_point_inside_drum() {
        let config = ReflectionConfig::default();
        assert!(config.reflection_radius > 0.0);
        assert!(config.reflection_radius <= config.radius);
        assert_eq!(config.modes.len(), ENSEMBLE_MODES.len());
    }

    #[test]
    fn test_presets() {
        assert_eq!(LaserPreset::Single.modes(), &SINGLE_MODES);
        let ensemble = LaserPreset::Ensemble.modes();
        assert_eq!((ensemble[1].m, ensemble[1].n), (2, 6));
        assert_eq!(ensemble[1].angular_phase, FRAC_PI_2);
        assert_eq!(ensemble[0].angular_phase, 0.0);
    }

    #[test]
    fn test_resonance_defaults() {
        let config = ResonanceConfig::default();
        assert_eq!((config.angular_mode, config.radial_mode), (2, 5));
        assert_eq!(config.frame_count, 100);
        assert_eq!(config.frames_per_second, 40);
    }
}
