use thiserror::Error;

/// Configuration errors raised while building a membrane model.
///
/// All of these are fatal: the models either compute a full result or
/// refuse to be constructed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MembraneError {
    /// Angular number below zero or radial number below one
    #[error("invalid mode (m={angular}, n={radial}): m must be >= 0 and n must be >= 1")]
    InvalidMode { angular: i32, radial: i32 },

    /// A physical input outside its admissible range
    #[error("invalid physical parameter '{name}' = {value}: {reason}")]
    InvalidPhysicalParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// Reflection point placed at the membrane centre
    #[error("reflection point r0 = 0 is singular: the Cartesian slope divides by r0")]
    SingularReflectionPoint,

    /// Too few samples to build a grid, time vector or animation
    #[error("invalid sample count for '{name}': {count}")]
    InvalidSampling { name: &'static str, count: usize },
}

/// Errors raised while bringing up the window and GPU.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("failed to create rendering surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable GPU adapter found")]
    NoAdapter,

    #[error("failed to create GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("surface is not supported by adapter '{0}'")]
    UnsupportedSurface(String),
}

pub type Result<T> = std::result::Result<T, MembraneError>;

/// Require a strictly positive, finite value.
pub(crate) fn require_positive(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(MembraneError::InvalidPhysicalParameter {
            name,
            value,
            reason: "must be finite and greater than zero",
        })
    }
}

/// Require a finite value.
pub(crate) fn require_finite(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(MembraneError::InvalidPhysicalParameter {
            name,
            value,
            reason: "must be finite",
        })
    }
}
