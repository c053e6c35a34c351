pub mod bessel;
mod grid;
mod mode;
mod reflection;
mod resonance;

pub use grid::{linspace, PolarGrid, TimeSamples};
pub use mode::{MembraneGeometry, MembraneMode};
pub use reflection::{GradientSeries, MultiModeReflectionModel, ScreenTrajectory};
pub use resonance::{Frames, ModeAnimation, ModeResonanceModel};
