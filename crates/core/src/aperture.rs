//! Circular viewing aperture centred on the field-local origin.

use serde::{Deserialize, Serialize};

/// A circular aperture of `radius` around (0, 0), with a fixed slack `margin`.
///
/// Pure value; provides only the inside/outside predicates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aperture {
    radius: f64,
    margin: f64,
}

impl Aperture {
    /// Creates an aperture. `margin` is an absolute distance in scene units.
    pub fn new(radius: f64, margin: f64) -> Self {
        Self { radius, margin }
    }

    /// Aperture radius.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Slack beyond the radius before a dot counts as having left.
    pub fn margin(&self) -> f64 {
        self.margin
    }

    /// Radius plus margin.
    pub fn bound(&self) -> f64 {
        self.radius + self.margin
    }

    /// Strict test used by the recycle rule: `|p| < radius + margin`.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x.hypot(y) < self.bound()
    }

    /// Inclusive test used for visibility: `|p| <= radius + margin`.
    pub fn shows(&self, x: f64, y: f64) -> bool {
        x.hypot(y) <= self.bound()
    }
}
