#![deny(unsafe_code)]
//! Dot motion and aperture-wraparound engine for random dot kinematograms.
//!
//! A [`DotField`] holds a fixed population of [`Dot`]s, a controlled fraction
//! of which move coherently (Signal) while the rest random-walk (Noise), all
//! inside a circular [`Aperture`]. A [`MotionStepper`] advances the field once
//! per host frame; renderers read a [`Snapshot`] and never touch the dots.
//!
//! Randomness is injected as a seed, so every run is reproducible.

pub mod aperture;
pub mod config;
pub mod dot;
pub mod error;
pub mod field;
pub mod motion;
pub mod params;
pub mod prng;
pub mod run_spec;
pub mod snapshot;
pub mod stats;
pub mod stepper;

pub use aperture::Aperture;
pub use config::TrialConfig;
pub use dot::{Dot, DotKind, DotParams};
pub use error::RdkError;
pub use field::DotField;
pub use motion::MotionField;
pub use prng::Xorshift64;
pub use run_spec::RunSpec;
pub use snapshot::{DotState, Snapshot};
pub use stats::{DensitySummary, DensityTracker};
pub use stepper::MotionStepper;
