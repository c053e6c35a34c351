use crate::config::ReflectionConfig;
use crate::error::{require_positive, Result};
use crate::simulation::bessel::{bessel_j, bessel_j_prime};
use crate::simulation::grid::TimeSamples;
use crate::simulation::mode::{MembraneGeometry, MembraneMode};

/// Surface slope components at the reflection point, one pair per time sample
#[derive(Clone, Debug, PartialEq)]
pub struct GradientSeries {
    pub dz_dx: Vec<f64>,
    pub dz_dy: Vec<f64>,
}

impl GradientSeries {
    pub fn zeros(len: usize) -> Self {
        Self {
            dz_dx: vec![0.0; len],
            dz_dy: vec![0.0; len],
        }
    }

    /// Add one mode's slope oscillation on top of this series
    fn superpose(self, slope: &ModeSlope, times: &[f64]) -> Self {
        let (dz_dx, dz_dy): (Vec<f64>, Vec<f64>) = self
            .dz_dx
            .into_iter()
            .zip(self.dz_dy)
            .zip(times)
            .map(|((x, y), &t)| {
                let temporal = slope.temporal(t);
                (x + slope.x * temporal, y + slope.y * temporal)
            })
            .unzip();
        Self { dz_dx, dz_dy }
    }
}

/// Laser spot positions on the screen
#[derive(Clone, Debug, PartialEq)]
pub struct ScreenTrajectory {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl ScreenTrajectory {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }

    /// (min_x, min_y, max_x, max_y), or None when empty
    pub fn bounds(&self) -> Option<[f64; 4]> {
        self.points().fold(None, |bounds, (x, y)| {
            Some(match bounds {
                None => [x, y, x, y],
                Some([x0, y0, x1, y1]) => [x0.min(x), y0.min(y), x1.max(x), y1.max(y)],
            })
        })
    }
}

/// Time-independent slope of one mode at the reflection point.
///
/// The Cartesian gradient of the mode is `(x, y)·cos(ωt + ψ)`.
#[derive(Clone, Copy, Debug, PartialEq)]
struct ModeSlope {
    x: f64,
    y: f64,
    angular_frequency: f64,
    temporal_phase: f64,
}

impl ModeSlope {
    fn new(mode: &MembraneMode, geometry: &MembraneGeometry) -> Self {
        let order = mode.angular_number() as i32;
        let m = mode.angular_number() as f64;
        let alpha = mode.radial_eigenvalue();
        let (r0, theta0) = (geometry.reflection_radius(), geometry.reflection_angle());

        let arg = alpha * r0 / geometry.radius();
        let j = bessel_j(order, arg);
        let dj = bessel_j_prime(order, arg);

        let phase = m * theta0 + mode.angular_phase();
        let dz_dr = mode.amplitude() * (alpha / geometry.radius()) * dj * phase.cos();
        let dz_dtheta = -mode.amplitude() * j * m * phase.sin();

        // Chain rule at fixed (r0, θ0)
        let (sin0, cos0) = theta0.sin_cos();
        Self {
            x: dz_dr * cos0 - dz_dtheta * sin0 / r0,
            y: dz_dr * sin0 + dz_dtheta * cos0 / r0,
            angular_frequency: mode.angular_frequency(),
            temporal_phase: mode.temporal_phase(),
        }
    }

    fn temporal(&self, t: f64) -> f64 {
        (self.angular_frequency * t + self.temporal_phase).cos()
    }
}

/// Laser reflected off a superposition of modes at a fixed point.
#[derive(Clone, Debug, PartialEq)]
pub struct MultiModeReflectionModel {
    geometry: MembraneGeometry,
    modes: Vec<MembraneMode>,
    slopes: Vec<ModeSlope>,
}

impl MultiModeReflectionModel {
    pub fn new(geometry: MembraneGeometry, modes: Vec<MembraneMode>) -> Self {
        let slopes = modes.iter().map(|mode| ModeSlope::new(mode, &geometry)).collect();
        Self { geometry, modes, slopes }
    }

    /// Validate a literal configuration and build the model plus its time vector
    pub fn from_config(config: &ReflectionConfig) -> Result<(Self, TimeSamples)> {
        let geometry = MembraneGeometry::new(
            config.radius,
            config.reflection_radius,
            config.reflection_angle,
            config.screen_distance,
        )?;
        let modes = config
            .modes
            .iter()
            .map(MembraneMode::from_spec)
            .collect::<Result<Vec<_>>>()?;
        let time_span = require_positive("time_span", config.time_span)?;
        let times = TimeSamples::linspace(0.0, time_span, config.time_samples)?;
        Ok((Self::new(geometry, modes), times))
    }

    pub fn geometry(&self) -> &MembraneGeometry {
        &self.geometry
    }

    pub fn modes(&self) -> &[MembraneMode] {
        &self.modes
    }

    /// Cartesian slope at the reflection point for every time sample
    pub fn gradient(&self, times: &[f64]) -> GradientSeries {
        self.slopes
            .iter()
            .fold(GradientSeries::zeros(times.len()), |series, slope| {
                series.superpose(slope, times)
            })
    }

    /// Small-angle reflection: the spot moves by −2L times the slope
    pub fn trajectory(&self, times: &[f64]) -> ScreenTrajectory {
        let scale = -2.0 * self.geometry.screen_distance();
        let gradient = self.gradient(times);
        ScreenTrajectory {
            x: gradient.dz_dx.into_iter().map(|g| scale * g).collect(),
            y: gradient.dz_dy.into_iter().map(|g| scale * g).collect(),
        }
    }

    /// "(1,1), (2,6), ..." for titles and logs
    pub fn mode_labels(&self) -> String {
        self.modes
            .iter()
            .map(|mode| format!("({},{})", mode.angular_number(), mode.radial_number()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
