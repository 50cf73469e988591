//! The per-frame tick driver.
//!
//! The host calls [`MotionStepper::tick`] once per rendered frame. The stepper
//! owns a monotonically increasing frame counter and hands it to the field,
//! which uses it to schedule noise perturbations. Variable frame rates change
//! apparent speed; normalising by elapsed time is the host's job.

use crate::field::DotField;
use crate::motion::MotionField;
use crate::snapshot::Snapshot;
use crate::stats::DensityTracker;
use tracing::debug;

/// Drives a [`MotionField`] one frame at a time.
#[derive(Debug, Clone)]
pub struct MotionStepper<F = DotField> {
    field: F,
    frame: u64,
}

impl<F: MotionField> MotionStepper<F> {
    /// Wraps a freshly built field. The counter starts at 0.
    pub fn new(field: F) -> Self {
        Self { field, frame: 0 }
    }

    /// Increments the frame counter, then advances the field with it.
    pub fn tick(&mut self) {
        self.frame += 1;
        self.field.tick(self.frame);
    }

    /// Ticks `ticks` times.
    pub fn run(&mut self, ticks: u64) {
        for _ in 0..ticks {
            self.tick();
        }
    }

    /// Ticks `ticks` times, recording the visible count after each tick.
    pub fn run_tracked(&mut self, ticks: u64, tracker: &mut DensityTracker) {
        for _ in 0..ticks {
            self.tick();
            tracker.record_snapshot(&self.field.snapshot());
        }
    }

    /// Frames advanced since construction or the last reset.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Current render snapshot of the driven field.
    pub fn snapshot(&self) -> Snapshot {
        self.field.snapshot()
    }

    /// Zeroes the counter and returns every dot to its initial state,
    /// ready for another presentation of the same trial.
    pub fn reset(&mut self) {
        debug!(frames = self.frame, "motion stepper reset");
        self.frame = 0;
        self.field.reset_all();
    }

    /// Read-only access to the field.
    pub fn field(&self) -> &F {
        &self.field
    }

    /// Mutable access to the field.
    pub fn field_mut(&mut self) -> &mut F {
        &mut self.field
    }

    /// Consumes the stepper, returning the field.
    pub fn into_field(self) -> F {
        self.field
    }
}
