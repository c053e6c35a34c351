//! Vibration modes of an ideal clamped circular membrane.
//!
//! Two programs share this library: `membrane-animation` renders one (m, n)
//! mode as an animated 3-D surface, and `laser-pattern` traces the spot of a
//! laser reflected off a superposition of modes onto a distant screen.

pub mod app;
pub mod config;
pub mod error;
pub mod gpu;
pub mod simulation;

pub use error::{MembraneError, RenderError, Result};
