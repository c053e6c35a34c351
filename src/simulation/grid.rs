use std::f64::consts::TAU;

use crate::error::{require_finite, require_positive, MembraneError, Result};

/// `count` evenly spaced values from `start` to `end`, both endpoints included.
pub fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as f64;
            (0..count)
                .map(|i| if i == count - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// Ordered time values at which a model is evaluated
#[derive(Clone, Debug, PartialEq)]
pub struct TimeSamples {
    values: Vec<f64>,
}

impl TimeSamples {
    /// Dense samples over `[start, end]`
    pub fn linspace(start: f64, end: f64, count: usize) -> Result<Self> {
        let start = require_finite("time_start", start)?;
        let end = require_finite("time_end", end)?;
        if count < 2 {
            return Err(MembraneError::InvalidSampling { name: "time_samples", count });
        }
        Ok(Self { values: linspace(start, end, count) })
    }

    /// One sample per animation frame, t = frame / fps
    pub fn frame_times(frame_count: u32, frames_per_second: u32) -> Result<Self> {
        if frame_count == 0 {
            return Err(MembraneError::InvalidSampling { name: "frame_count", count: 0 });
        }
        if frames_per_second == 0 {
            return Err(MembraneError::InvalidSampling { name: "frames_per_second", count: 0 });
        }
        let fps = frames_per_second as f64;
        Ok(Self {
            values: (0..frame_count).map(|frame| frame as f64 / fps).collect(),
        })
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Polar sampling of the membrane and its Cartesian image.
///
/// Values are stored row-major with one row per angle, so the sample at
/// `(angle_index, radius_index)` lives at `angle_index * radii.len() + radius_index`.
#[derive(Clone, Debug, PartialEq)]
pub struct PolarGrid {
    radius: f64,
    radii: Vec<f64>,
    angles: Vec<f64>,
}

impl PolarGrid {
    /// Radii on [0, R] and angles on [0, 2π)
    pub fn new(radius: f64, radial_samples: usize, angular_samples: usize) -> Result<Self> {
        let radius = require_positive("radius", radius)?;
        if radial_samples < 2 {
            return Err(MembraneError::InvalidSampling {
                name: "radial_samples",
                count: radial_samples,
            });
        }
        if angular_samples < 3 {
            return Err(MembraneError::InvalidSampling {
                name: "angular_samples",
                count: angular_samples,
            });
        }

        let angle_step = TAU / angular_samples as f64;
        Ok(Self {
            radius,
            radii: linspace(0.0, radius, radial_samples),
            angles: (0..angular_samples).map(|i| i as f64 * angle_step).collect(),
        })
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn radii(&self) -> &[f64] {
        &self.radii
    }

    pub fn angles(&self) -> &[f64] {
        &self.angles
    }

    /// Total number of grid points
    pub fn len(&self) -> usize {
        self.radii.len() * self.angles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// (r, θ) of every grid point, row-major
    pub fn polar_points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.angles
            .iter()
            .flat_map(move |&theta| self.radii.iter().map(move |&r| (r, theta)))
    }

    /// (X, Y) = (r cos θ, r sin θ) of every grid point, row-major
    pub fn cartesian(&self) -> Vec<[f64; 2]> {
        self.polar_points()
            .map(|(r, theta)| [r * theta.cos(), r * theta.sin()])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linspace_endpoints() {
        let values = linspace(0.0, TAU, 1000);
        assert_eq!(values.len(), 1000);
        assert_eq!(values[0], 0.0);
        assert_eq!(values[999], TAU);
        assert!(values.windows(2).all(|w| w[1] > w[0]));
        assert_eq!(linspace(3.0, 5.0, 1), vec![3.0]);
        assert!(linspace(3.0, 5.0, 0).is_empty());
    }

    #[test]
    fn test_frame_times() {
        let times = TimeSamples::frame_times(100, 40).unwrap();
        assert_eq!(times.len(), 100);
        assert_eq!(times.as_slice()[0], 0.0);
        assert_eq!(times.as_slice()[10], 0.25);
        assert!(TimeSamples::frame_times(0, 40).is_err());
        assert!(TimeSamples::frame_times(10, 0).is_err());
    }

    #[test]
    fn test_time_samples_need_two_points() {
        assert_eq!(
            TimeSamples::linspace(0.0, 1.0, 1),
            Err(MembraneError::InvalidSampling { name: "time_samples", count: 1 })
        );
    }

    #[test]
    fn test_time_samples_reject_non_finite_bounds() {
        assert!(matches!(
            TimeSamples::linspace(0.0, f64::NAN, 1000),
            Err(MembraneError::InvalidPhysicalParameter { name: "time_end", .. })
        ));
        assert!(matches!(
            TimeSamples::linspace(f64::NEG_INFINITY, 1.0, 1000),
            Err(MembraneError::InvalidPhysicalParameter { name: "time_start", .. })
        ));
    }

    #[test]
    fn test_grid_creation() {
        let grid = PolarGrid::new(1.0, 100, 100).unwrap();
        assert_eq!(grid.len(), 10000);
        assert_eq!(grid.radii()[0], 0.0);
        assert_eq!(grid.radii()[99], 1.0);
        assert_eq!(grid.angles()[0], 0.0);
        assert!(*grid.angles().last().unwrap() < TAU);
        assert_eq!(grid.cartesian().len(), 10000);
    }

    #[test]
    fn test_grid_layout_is_row_per_angle() {
        let grid = PolarGrid::new(2.0, 5, 4).unwrap();
        let points = grid.cartesian();

        // angle index 1 is π/2, radius index 4 is the rim
        let [x, y] = points[5 + 4];
        assert!(x.abs() < 1e-12);
        assert!((y - 2.0).abs() < 1e-12);

        let polar: Vec<_> = grid.polar_points().collect();
        assert_eq!(polar[2 * 5 + 3], (grid.radii()[3], grid.angles()[2]));
    }

    #[test]
    fn test_grid_rejects_bad_input() {
        assert!(PolarGrid::new(0.0, 10, 10).is_err());
        assert!(PolarGrid::new(1.0, 1, 10).is_err());
        assert!(PolarGrid::new(1.0, 10, 2).is_err());
    }
}
