use std::f64::consts::TAU;

use crate::config::ResonanceConfig;
use crate::error::{require_positive, Result};
use crate::simulation::bessel::bessel_j;
use crate::simulation::grid::{PolarGrid, TimeSamples};
use crate::simulation::mode::{radial_eigenvalue, validate_mode_numbers};

/// Single (m, n) standing wave on a clamped membrane of radius R.
#[derive(Clone, Debug, PartialEq)]
pub struct ModeResonanceModel {
    radius: f64,
    angular_number: u32,
    radial_number: u32,
    wavenumber: f64,
    wave_speed: f64,
}

impl ModeResonanceModel {
    pub fn new(config: &ResonanceConfig) -> Result<Self> {
        let (angular_number, radial_number) =
            validate_mode_numbers(config.angular_mode, config.radial_mode)?;
        let radius = require_positive("radius", config.radius)?;
        let tension = require_positive("tension", config.tension)?;
        let surface_density = require_positive("surface_density", config.surface_density)?;

        Ok(Self {
            radius,
            angular_number,
            radial_number,
            wavenumber: radial_eigenvalue(angular_number, radial_number)? / radius,
            wave_speed: (tension / surface_density).sqrt(),
        })
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn angular_number(&self) -> u32 {
        self.angular_number
    }

    pub fn radial_number(&self) -> u32 {
        self.radial_number
    }

    /// k = α_mn / R, so that J_m(kR) = 0
    pub fn radial_eigenvalue(&self) -> f64 {
        self.wavenumber
    }

    /// f = (k / 2π)·sqrt(T/σ)
    pub fn resonant_frequency(&self) -> f64 {
        self.wavenumber / TAU * self.wave_speed
    }

    /// ω = 2πf
    pub fn angular_frequency(&self) -> f64 {
        TAU * self.resonant_frequency()
    }

    /// J_m(k r)·cos(mθ)·cos(ωt)
    pub fn displacement(&self, r: f64, theta: f64, t: f64) -> f64 {
        self.radial_profile(r) * self.angular_profile(theta) * (self.angular_frequency() * t).cos()
    }

    /// Displacement over a whole grid at time `t`, row-major like the grid
    pub fn displacement_grid(&self, grid: &PolarGrid, t: f64) -> Vec<f64> {
        let temporal = (self.angular_frequency() * t).cos();
        self.mode_shape(grid).into_iter().map(|z| z * temporal).collect()
    }

    /// Restartable frame sequence for an animation driver
    pub fn animate(
        &self,
        grid: &PolarGrid,
        frame_count: u32,
        frames_per_second: u32,
    ) -> Result<ModeAnimation> {
        let times = TimeSamples::frame_times(frame_count, frames_per_second)?;
        Ok(ModeAnimation {
            shape: self.mode_shape(grid),
            angular_frequency: self.angular_frequency(),
            times,
            frames_per_second,
        })
    }

    fn radial_profile(&self, r: f64) -> f64 {
        bessel_j(self.angular_number as i32, self.wavenumber * r)
    }

    fn angular_profile(&self, theta: f64) -> f64 {
        (self.angular_number as f64 * theta).cos()
    }

    /// Separable shape J_m(k r)·cos(mθ), evaluated once per radius and angle
    fn mode_shape(&self, grid: &PolarGrid) -> Vec<f64> {
        let radial: Vec<f64> = grid.radii().iter().map(|&r| self.radial_profile(r)).collect();
        grid.angles()
            .iter()
            .flat_map(|&theta| {
                let angular = self.angular_profile(theta);
                radial.iter().map(move |&j| j * angular)
            })
            .collect()
    }
}

/// Displacement frames of one mode. Frame i is the mode shape scaled by
/// cos(ω·i/fps); no frame depends on another. Indices past the last frame
/// wrap around to the start of the loop.
#[derive(Clone, Debug, PartialEq)]
pub struct ModeAnimation {
    shape: Vec<f64>,
    angular_frequency: f64,
    times: TimeSamples,
    frames_per_second: u32,
}

impl ModeAnimation {
    pub fn frame_count(&self) -> u32 {
        self.times.len() as u32
    }

    pub fn frames_per_second(&self) -> u32 {
        self.frames_per_second
    }

    /// Time of frame `index` in seconds
    pub fn time_of(&self, index: u32) -> f64 {
        let times = self.times.as_slice();
        times[index as usize % times.len()]
    }

    /// Displacement grid of frame `index`
    pub fn frame(&self, index: u32) -> Vec<f64> {
        let temporal = (self.angular_frequency * self.time_of(index)).cos();
        self.shape.iter().map(|z| z * temporal).collect()
    }

    /// Fresh iterator over all frames
    pub fn frames(&self) -> Frames<'_> {
        Frames { animation: self, next: 0 }
    }
}

pub struct Frames<'a> {
    animation: &'a ModeAnimation,
    next: u32,
}

impl Iterator for Frames<'_> {
    type Item = Vec<f64>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.animation.frame_count() {
            return None;
        }
        let frame = self.animation.frame(self.next);
        self.next += 1;
        Some(frame)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.animation.frame_count() - self.next) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Frames<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MembraneError;
    use std::f64::consts::PI;

    const J_2_5: f64 = 17.959_819_494_987_826;

    fn model(m: i32, n: i32) -> ModeResonanceModel {
        ModeResonanceModel::new(&ResonanceConfig {
            angular_mode: m,
            radial_mode: n,
            ..ResonanceConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_default_mode_eigenvalue() {
        let model = ModeResonanceModel::new(&ResonanceConfig::default()).unwrap();
        assert!(((model.radial_eigenvalue() - J_2_5) / J_2_5).abs() < 1e-9);
    }

    #[test]
    fn test_eigenvalue_scales_with_radius() {
        let config = ResonanceConfig { radius: 0.5, ..ResonanceConfig::default() };
        let model = ModeResonanceModel::new(&config).unwrap();
        assert!((model.radial_eigenvalue() * 0.5 - J_2_5).abs() < 1e-9 * J_2_5);
    }

    #[test]
    fn test_frequencies() {
        let model = model(2, 5);
        // sqrt(100 / 0.01) = 100
        let expected_f = J_2_5 / (2.0 * PI) * 100.0;
        assert!((model.resonant_frequency() - expected_f).abs() < 1e-9 * expected_f);
        assert!((model.angular_frequency() - J_2_5 * 100.0).abs() < 1e-9 * J_2_5 * 100.0);
    }

    #[test]
    fn test_invalid_configuration() {
        let config = ResonanceConfig { radial_mode: 0, ..ResonanceConfig::default() };
        assert_eq!(
            ModeResonanceModel::new(&config),
            Err(MembraneError::InvalidMode { angular: 2, radial: 0 })
        );

        let config = ResonanceConfig { angular_mode: -3, ..ResonanceConfig::default() };
        assert!(matches!(
            ModeResonanceModel::new(&config),
            Err(MembraneError::InvalidMode { .. })
        ));

        let config = ResonanceConfig { tension: 0.0, ..ResonanceConfig::default() };
        assert!(matches!(
            ModeResonanceModel::new(&config),
            Err(MembraneError::InvalidPhysicalParameter { name: "tension", .. })
        ));

        let config = ResonanceConfig { surface_density: -0.01, ..ResonanceConfig::default() };
        assert!(matches!(
            ModeResonanceModel::new(&config),
            Err(MembraneError::InvalidPhysicalParameter { name: "surface_density", .. })
        ));
    }

    #[test]
    fn test_clamped_boundary() {
        for (m, n) in [(0, 1), (1, 3), (2, 5), (4, 2)] {
            let model = model(m, n);
            for &theta in &[0.0, 0.4, 1.9, 3.3, 5.8] {
                for &t in &[0.0, 0.013, 0.25, 1.7] {
                    let z = model.displacement(model.radius(), theta, t);
                    assert!(z.abs() < 1e-13, "(m={}, n={}) z(R)={:e}", m, n, z);
                }
            }
        }
    }

    #[test]
    fn test_angular_symmetry() {
        let model = model(3, 2);
        let period = 2.0 * PI / 3.0;
        for &r in &[0.1, 0.35, 0.8] {
            for &theta in &[0.0, 0.5, 1.2] {
                let base = model.displacement(r, theta, 0.0);
                for k in 1..4 {
                    let shifted = model.displacement(r, theta + period * k as f64, 0.0);
                    assert!((base - shifted).abs() < 1e-12);
                }
            }
        }
    }

    #[test]
    fn test_grid_matches_pointwise() {
        let model = model(2, 5);
        let grid = PolarGrid::new(1.0, 12, 9).unwrap();
        let t = 0.075;
        let values = model.displacement_grid(&grid, t);
        assert_eq!(values.len(), grid.len());
        for (value, (r, theta)) in values.iter().zip(grid.polar_points()) {
            assert!((value - model.displacement(r, theta, t)).abs() < 1e-14);
        }
    }

    #[test]
    fn test_animation_is_stateless() {
        let model = model(2, 5);
        let grid = PolarGrid::new(1.0, 20, 16).unwrap();
        let animation = model.animate(&grid, 100, 40).unwrap();

        let sequential: Vec<Vec<f64>> = animation.frames().collect();
        assert_eq!(sequential.len(), 100);
        assert_eq!(animation.frames().len(), 100);

        // Out-of-order access and restarts reproduce the same frames.
        assert_eq!(animation.frame(37), sequential[37]);
        assert_eq!(animation.frames().nth(5), Some(sequential[5].clone()));
        assert_eq!(animation.time_of(37), 37.0 / 40.0);

        let direct = model.displacement_grid(&grid, animation.time_of(37));
        for (a, b) in direct.iter().zip(&sequential[37]) {
            assert!((a - b).abs() < 1e-15);
        }
    }

    #[test]
    fn test_frame_index_wraps() {
        let model = model(2, 5);
        let grid = PolarGrid::new(1.0, 8, 8).unwrap();
        let animation = model.animate(&grid, 10, 40).unwrap();
        assert_eq!(animation.time_of(9), 9.0 / 40.0);
        assert_eq!(animation.time_of(13), animation.time_of(3));
        assert_eq!(animation.frame(10), animation.frame(0));
    }

    #[test]
    fn test_high_radial_number_eigenvalue() {
        // j_{0,300}
        let expected = 941.692_530_653;
        let model = model(0, 300);
        assert!(((model.radial_eigenvalue() - expected) / expected).abs() < 1e-9);
    }

    #[test]
    fn test_first_frame_is_mode_shape() {
        let model = model(1, 2);
        let grid = PolarGrid::new(1.0, 8, 8).unwrap();
        let animation = model.animate(&grid, 4, 40).unwrap();
        assert_eq!(animation.frame(0), model.displacement_grid(&grid, 0.0));
    }

    #[test]
    fn test_animation_rejects_zero_rate() {
        let model = model(2, 5);
        let grid = PolarGrid::new(1.0, 8, 8).unwrap();
        assert!(model.animate(&grid, 100, 0).is_err());
        assert!(model.animate(&grid, 0, 40).is_err());
    }
}
