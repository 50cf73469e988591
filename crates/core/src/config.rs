//! Trial configuration handed to the engine once per trial.
//!
//! Every field is required. The named tuning constants below record the
//! values seen in deployed stimuli; the engine never falls back to them.

use crate::error::RdkError;
use crate::params::{optional_f64, require_f64, require_u64};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::f64::consts::PI;

/// Recycle margin of one eighth of the dot radius.
pub const RECYCLE_MARGIN_EIGHTH: f64 = 0.125;
/// Recycle margin of half the dot radius.
pub const RECYCLE_MARGIN_HALF: f64 = 0.5;
/// Noise headings perturbed every 6 ticks.
pub const PERTURB_PERIOD_SHORT: u64 = 6;
/// Noise headings perturbed every 10 ticks.
pub const PERTURB_PERIOD_LONG: u64 = 10;
/// Maximum heading perturbation of π/4.
pub const PERTURB_MAGNITUDE_WIDE: f64 = PI / 4.0;
/// Maximum heading perturbation of π/8.
pub const PERTURB_MAGNITUDE_NARROW: f64 = PI / 8.0;

/// Frozen per-trial motion configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrialConfig {
    /// Fraction of dots assigned as Signal, in [0, 1].
    pub coherence: f64,
    /// Signal heading in radians.
    pub direction: f64,
    /// Speed in scene units per tick.
    pub velocity: f64,
    /// Radius of the circular aperture.
    pub aperture_radius: f64,
    /// Rendered dot radius.
    pub dot_radius: f64,
    /// Number of dots in the field.
    pub dot_count: usize,
    /// Noise headings are perturbed on ticks where `frame % perturb_period == 0`.
    pub perturb_period: u64,
    /// Upper bound of a single heading perturbation, in radians.
    pub perturb_magnitude: f64,
    /// Aperture slack as a fraction of `dot_radius`.
    pub recycle_margin: f64,
    /// Fixed starting heading for Noise dots; uniform random when `None`.
    pub noise_heading: Option<f64>,
}

impl TrialConfig {
    /// Parses a configuration from a JSON object, rejecting missing keys.
    ///
    /// The result is validated before being returned.
    pub fn from_json(params: &Value) -> Result<Self, RdkError> {
        let dot_count = require_u64(params, "dot_count")?;
        let config = Self {
            coherence: require_f64(params, "coherence")?,
            direction: require_f64(params, "direction")?,
            velocity: require_f64(params, "velocity")?,
            aperture_radius: require_f64(params, "aperture_radius")?,
            dot_radius: require_f64(params, "dot_radius")?,
            dot_count: usize::try_from(dot_count).map_err(|_| RdkError::OutOfRange {
                field: "dot_count",
                value: dot_count as f64,
                min: 1.0,
                max: usize::MAX as f64,
            })?,
            perturb_period: require_u64(params, "perturb_period")?,
            perturb_magnitude: require_f64(params, "perturb_magnitude")?,
            recycle_margin: require_f64(params, "recycle_margin")?,
            noise_heading: optional_f64(params, "noise_heading")?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks every field against its domain. Nothing is clamped.
    pub fn validate(&self) -> Result<(), RdkError> {
        finite("coherence", self.coherence)?;
        if !(0.0..=1.0).contains(&self.coherence) {
            return Err(RdkError::OutOfRange {
                field: "coherence",
                value: self.coherence,
                min: 0.0,
                max: 1.0,
            });
        }
        finite("direction", self.direction)?;
        non_negative("velocity", self.velocity)?;
        positive("aperture_radius", self.aperture_radius)?;
        if self.velocity >= self.aperture_radius {
            return Err(RdkError::TooFast {
                velocity: self.velocity,
                aperture_radius: self.aperture_radius,
            });
        }
        positive("dot_radius", self.dot_radius)?;
        if self.dot_count == 0 {
            return Err(RdkError::ZeroCount("dot_count"));
        }
        if self.perturb_period == 0 {
            return Err(RdkError::ZeroCount("perturb_period"));
        }
        non_negative("perturb_magnitude", self.perturb_magnitude)?;
        non_negative("recycle_margin", self.recycle_margin)?;
        if let Some(heading) = self.noise_heading {
            finite("noise_heading", heading)?;
        }
        Ok(())
    }

    /// Absolute distance beyond the aperture radius at which a dot counts as outside.
    pub fn margin(&self) -> f64 {
        self.recycle_margin * self.dot_radius
    }

    /// Number of Signal dots: `round(coherence * dot_count)`.
    pub fn signal_count(&self) -> usize {
        let n = (self.coherence * self.dot_count as f64).round() as usize;
        n.min(self.dot_count)
    }

    /// Current values as a JSON object, in the shape [`from_json`](Self::from_json) accepts.
    pub fn params(&self) -> Value {
        json!({
            "coherence": self.coherence,
            "direction": self.direction,
            "velocity": self.velocity,
            "aperture_radius": self.aperture_radius,
            "dot_radius": self.dot_radius,
            "dot_count": self.dot_count,
            "perturb_period": self.perturb_period,
            "perturb_magnitude": self.perturb_magnitude,
            "recycle_margin": self.recycle_margin,
            "noise_heading": self.noise_heading,
        })
    }

    /// Schema describing every configuration field, its type and bounds.
    pub fn schema() -> Value {
        json!({
            "coherence": {
                "type": "number",
                "required": true,
                "min": 0.0,
                "max": 1.0,
                "description": "Fraction of dots moving coherently (Signal)"
            },
            "direction": {
                "type": "number",
                "required": true,
                "description": "Signal heading in radians (0 = +x, counter-clockwise)"
            },
            "velocity": {
                "type": "number",
                "required": true,
                "min": 0.0,
                "description": "Dot speed in scene units per tick, below aperture_radius"
            },
            "aperture_radius": {
                "type": "number",
                "required": true,
                "exclusive_min": 0.0,
                "description": "Radius of the circular aperture"
            },
            "dot_radius": {
                "type": "number",
                "required": true,
                "exclusive_min": 0.0,
                "description": "Rendered dot radius"
            },
            "dot_count": {
                "type": "integer",
                "required": true,
                "min": 1,
                "description": "Number of dots in the field"
            },
            "perturb_period": {
                "type": "integer",
                "required": true,
                "min": 1,
                "description": "Ticks between Noise heading perturbations"
            },
            "perturb_magnitude": {
                "type": "number",
                "required": true,
                "min": 0.0,
                "description": "Maximum heading change per perturbation, radians"
            },
            "recycle_margin": {
                "type": "number",
                "required": true,
                "min": 0.0,
                "description": "Aperture slack as a fraction of dot_radius"
            },
            "noise_heading": {
                "type": "number",
                "required": false,
                "description": "Fixed initial heading for Noise dots (random when absent)"
            }
        })
    }
}

fn finite(field: &'static str, value: f64) -> Result<(), RdkError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(RdkError::NotFinite { field, value })
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), RdkError> {
    finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(RdkError::NonPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), RdkError> {
    finite(field, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(RdkError::Negative { field, value })
    }
}
