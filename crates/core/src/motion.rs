//! The `MotionField` trait driven once per host frame by a
//! [`MotionStepper`](crate::MotionStepper).
//!
//! The trait is object-safe so hosts can hold `Box<dyn MotionField>`.

use crate::snapshot::Snapshot;
use serde_json::Value;

/// A collection of independently moving elements advanced in lockstep.
pub trait MotionField {
    /// Advance every element exactly once. Must not fail.
    fn tick(&mut self, frame_index: u64);

    /// Current state of every element, in a stable order. Read-only.
    fn snapshot(&self) -> Snapshot;

    /// Return every element to its initial state.
    fn reset_all(&mut self);

    /// Number of elements.
    fn len(&self) -> usize;

    /// True when the field holds no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Configuration the field was built from, as a JSON object.
    fn params(&self) -> Value;
}

impl<F: MotionField + ?Sized> MotionField for Box<F> {
    fn tick(&mut self, frame_index: u64) {
        (**self).tick(frame_index);
    }

    fn snapshot(&self) -> Snapshot {
        (**self).snapshot()
    }

    fn reset_all(&mut self) {
        (**self).reset_all();
    }

    fn len(&self) -> usize {
        (**self).len()
    }

    fn params(&self) -> Value {
        (**self).params()
    }
}
