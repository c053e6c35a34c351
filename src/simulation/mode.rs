use crate::config::ModeSpec;
use crate::error::{require_finite, require_positive, MembraneError, Result};
use crate::simulation::bessel::{bessel_j, bessel_j_zero};

/// Check mode numbers and convert them to unsigned form.
pub(crate) fn validate_mode_numbers(m: i32, n: i32) -> Result<(u32, u32)> {
    if m < 0 || n < 1 {
        return Err(MembraneError::InvalidMode { angular: m, radial: n });
    }
    Ok((m as u32, n as u32))
}

/// n-th positive zero of J_m, the dimensionless radial eigenvalue α_mn.
pub(crate) fn radial_eigenvalue(m: u32, n: u32) -> Result<f64> {
    bessel_j_zero(m, n).ok_or(MembraneError::InvalidMode {
        angular: m as i32,
        radial: n as i32,
    })
}

/// One vibration mode of a clamped circular membrane.
///
/// The eigenvalue α is derived from (m, n) at construction; a mode with
/// different mode numbers is a new value.
#[derive(Clone, Debug, PartialEq)]
pub struct MembraneMode {
    angular_number: u32,
    radial_number: u32,
    amplitude: f64,
    angular_frequency: f64,
    angular_phase: f64,
    temporal_phase: f64,
    radial_eigenvalue: f64,
}

impl MembraneMode {
    pub fn new(
        m: i32,
        n: i32,
        amplitude: f64,
        angular_frequency: f64,
        angular_phase: f64,
        temporal_phase: f64,
    ) -> Result<Self> {
        let (angular_number, radial_number) = validate_mode_numbers(m, n)?;
        let amplitude = require_finite("amplitude", amplitude)?;
        if !(angular_frequency.is_finite() && angular_frequency >= 0.0) {
            return Err(MembraneError::InvalidPhysicalParameter {
                name: "angular_frequency",
                value: angular_frequency,
                reason: "must be finite and non-negative",
            });
        }
        let angular_phase = require_finite("angular_phase", angular_phase)?;
        let temporal_phase = require_finite("temporal_phase", temporal_phase)?;

        Ok(Self {
            angular_number,
            radial_number,
            amplitude,
            angular_frequency,
            angular_phase,
            temporal_phase,
            radial_eigenvalue: radial_eigenvalue(angular_number, radial_number)?,
        })
    }

    pub fn from_spec(spec: &ModeSpec) -> Result<Self> {
        Self::new(
            spec.m,
            spec.n,
            spec.amplitude,
            spec.angular_frequency,
            spec.angular_phase,
            spec.temporal_phase,
        )
    }

    /// Same mode with a different amplitude
    pub fn with_amplitude(&self, amplitude: f64) -> Result<Self> {
        let amplitude = require_finite("amplitude", amplitude)?;
        Ok(Self { amplitude, ..self.clone() })
    }

    pub fn angular_number(&self) -> u32 {
        self.angular_number
    }

    pub fn radial_number(&self) -> u32 {
        self.radial_number
    }

    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }

    pub fn angular_frequency(&self) -> f64 {
        self.angular_frequency
    }

    pub fn angular_phase(&self) -> f64 {
        self.angular_phase
    }

    pub fn temporal_phase(&self) -> f64 {
        self.temporal_phase
    }

    /// α_mn, the n-th positive zero of J_m
    pub fn radial_eigenvalue(&self) -> f64 {
        self.radial_eigenvalue
    }

    /// A·J_m(α r/R)·cos(mθ + φ)·cos(ωt + ψ)
    pub fn displacement(&self, radius: f64, r: f64, theta: f64, t: f64) -> f64 {
        let m = self.angular_number as f64;
        self.amplitude
            * bessel_j(self.angular_number as i32, self.radial_eigenvalue * r / radius)
            * (m * theta + self.angular_phase).cos()
            * (self.angular_frequency * t + self.temporal_phase).cos()
    }
}

/// Drum size, laser reflection point and screen placement.
#[derive(Clone, Debug, PartialEq)]
pub struct MembraneGeometry {
    radius: f64,
    reflection_radius: f64,
    reflection_angle: f64,
    screen_distance: f64,
}

impl MembraneGeometry {
    /// Rejects r0 = 0, where the polar-to-Cartesian gradient is undefined.
    pub fn new(
        radius: f64,
        reflection_radius: f64,
        reflection_angle: f64,
        screen_distance: f64,
    ) -> Result<Self> {
        let radius = require_positive("radius", radius)?;
        let screen_distance = require_positive("screen_distance", screen_distance)?;
        let reflection_angle = require_finite("reflection_angle", reflection_angle)?;

        if reflection_radius == 0.0 {
            return Err(MembraneError::SingularReflectionPoint);
        }
        if !(reflection_radius > 0.0 && reflection_radius <= radius) {
            return Err(MembraneError::InvalidPhysicalParameter {
                name: "reflection_radius",
                value: reflection_radius,
                reason: "must lie within (0, radius]",
            });
        }

        Ok(Self {
            radius,
            reflection_radius,
            reflection_angle,
            screen_distance,
        })
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn reflection_radius(&self) -> f64 {
        self.reflection_radius
    }

    pub fn reflection_angle(&self) -> f64 {
        self.reflection_angle
    }

    pub fn screen_distance(&self) -> f64 {
        self.screen_distance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_4;

    #[test]
    fn test_mode_derives_eigenvalue() {
        let mode = MembraneMode::new(1, 1, 0.001, 50.0, 0.0, 0.0).unwrap();
        assert!((mode.radial_eigenvalue() - 3.831_705_970_207_512).abs() < 1e-12);
        assert_eq!(mode.angular_number(), 1);
        assert_eq!(mode.radial_number(), 1);
    }

    #[test]
    fn test_invalid_mode_numbers() {
        assert_eq!(
            MembraneMode::new(-1, 1, 1.0, 1.0, 0.0, 0.0),
            Err(MembraneError::InvalidMode { angular: -1, radial: 1 })
        );
        assert_eq!(
            MembraneMode::new(2, 0, 1.0, 1.0, 0.0, 0.0),
            Err(MembraneError::InvalidMode { angular: 2, radial: 0 })
        );
    }

    #[test]
    fn test_negative_frequency_rejected() {
        let err = MembraneMode::new(1, 1, 1.0, -5.0, 0.0, 0.0).unwrap_err();
        assert!(matches!(
            err,
            MembraneError::InvalidPhysicalParameter { name: "angular_frequency", .. }
        ));
    }

    #[test]
    fn test_with_amplitude_keeps_eigenvalue() {
        let mode = MembraneMode::new(2, 3, 0.005, 80.0, 0.5, 0.0).unwrap();
        let louder = mode.with_amplitude(0.01).unwrap();
        assert_eq!(louder.amplitude(), 0.01);
        assert_eq!(louder.radial_eigenvalue(), mode.radial_eigenvalue());
        assert_eq!(louder.angular_phase(), 0.5);
    }

    #[test]
    fn test_mode_displacement_vanishes_at_rim() {
        let mode = MembraneMode::new(2, 6, 0.005, 80.0, 1.0, 0.3).unwrap();
        for &theta in &[0.0, 0.7, 2.1, 4.0] {
            assert!(mode.displacement(0.04, 0.04, theta, 0.37).abs() < 1e-15);
        }
    }

    #[test]
    fn test_geometry_validation() {
        assert!(MembraneGeometry::new(0.04, 0.02, FRAC_PI_4, 2.0).is_ok());
        assert_eq!(
            MembraneGeometry::new(0.04, 0.0, FRAC_PI_4, 2.0),
            Err(MembraneError::SingularReflectionPoint)
        );
        assert!(MembraneGeometry::new(0.04, 0.05, FRAC_PI_4, 2.0).is_err());
        assert!(MembraneGeometry::new(0.04, -0.01, FRAC_PI_4, 2.0).is_err());
        assert!(MembraneGeometry::new(-0.04, 0.02, FRAC_PI_4, 2.0).is_err());
        assert!(MembraneGeometry::new(0.04, 0.02, FRAC_PI_4, 0.0).is_err());
    }

    #[test]
    fn test_rim_reflection_point_allowed() {
        let geometry = MembraneGeometry::new(0.04, 0.04, 0.0, 2.0).unwrap();
        assert_eq!(geometry.reflection_radius(), geometry.radius());
    }
}
