//! Reproducible record of a single motion run.
//!
//! A [`RunSpec`] captures everything needed to replay a trial's trajectory:
//! the configuration params, the PRNG seed, and the number of ticks. Two
//! identical specs fed to the same engine build produce bit-identical
//! snapshots.

use crate::error::RdkError;
use crate::field::DotField;
use crate::stepper::MotionStepper;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Reproducible specification for a motion run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunSpec {
    pub params: Value,
    pub seed: u64,
    pub ticks: u64,
}

impl RunSpec {
    /// Creates a spec from a params object.
    pub fn new(params: Value, seed: u64, ticks: u64) -> Self {
        Self {
            params,
            seed,
            ticks,
        }
    }

    /// Parses and validates the params without running anything.
    pub fn validate(&self) -> Result<(), RdkError> {
        crate::config::TrialConfig::from_json(&self.params).map(|_| ())
    }

    /// Builds the field and a stepper at frame 0.
    pub fn stepper(&self) -> Result<MotionStepper, RdkError> {
        Ok(MotionStepper::new(DotField::from_json(
            &self.params,
            self.seed,
        )?))
    }

    /// Builds the field and advances it `ticks` times.
    pub fn replay(&self) -> Result<MotionStepper, RdkError> {
        let mut stepper = self.stepper()?;
        stepper.run(self.ticks);
        Ok(stepper)
    }
}
