//! The fixed-size dot population of one trial.
//!
//! A [`DotField`] is built from a validated [`TrialConfig`] and a seed. Dot
//! kinds are assigned once at construction: the first
//! `round(coherence * dot_count)` dots are Signal, the rest Noise. Dots never
//! interact, so the order in which a tick visits them does not matter.

use crate::aperture::Aperture;
use crate::config::TrialConfig;
use crate::dot::{Dot, DotKind, DotParams};
use crate::error::RdkError;
use crate::motion::MotionField;
use crate::prng::Xorshift64;
use crate::snapshot::Snapshot;
use serde_json::Value;
use tracing::debug;

/// Owned collection of dots for a single trial.
#[derive(Debug, Clone)]
pub struct DotField {
    config: TrialConfig,
    aperture: Aperture,
    seed: u64,
    dots: Vec<Dot>,
}

impl DotField {
    /// Builds a field, rejecting invalid configurations.
    ///
    /// Positions are sampled uniformly inside the aperture from the `seed`
    /// stream; dot `i` perturbs its heading from its own derived stream.
    pub fn new(config: TrialConfig, seed: u64) -> Result<Self, RdkError> {
        config.validate()?;

        let aperture = Aperture::new(config.aperture_radius, config.margin());
        let params = DotParams {
            velocity: config.velocity,
            radius: config.dot_radius,
            aperture,
            perturb_period: config.perturb_period,
            perturb_magnitude: config.perturb_magnitude,
        };
        let signal = config.signal_count();
        let mut rng = Xorshift64::new(seed);

        let dots = (0..config.dot_count)
            .map(|i| {
                let [x, y] = sample_disc(&mut rng, config.aperture_radius);
                let (kind, heading) = if i < signal {
                    (DotKind::Signal, config.direction)
                } else {
                    let heading = match config.noise_heading {
                        Some(h) => h,
                        None => rng.next_angle(),
                    };
                    (DotKind::Noise, heading)
                };
                Dot::new(
                    kind,
                    [x, y, 0.0],
                    heading,
                    params,
                    Xorshift64::stream(seed, i as u64),
                )
            })
            .collect();

        debug!(
            dots = config.dot_count,
            signal,
            coherence = config.coherence,
            seed,
            "dot field constructed"
        );

        Ok(Self {
            config,
            aperture,
            seed,
            dots,
        })
    }

    /// Creates a field from a JSON params object.
    pub fn from_json(params: &Value, seed: u64) -> Result<Self, RdkError> {
        Self::new(TrialConfig::from_json(params)?, seed)
    }

    /// Steps every dot once.
    pub fn tick(&mut self, frame_index: u64) {
        for dot in &mut self.dots {
            dot.step(frame_index);
        }
    }

    /// Position, visibility, and kind of every dot, in field order.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.dots.iter().map(Dot::state).collect())
    }

    /// Restores every dot to its creation-time position and heading.
    pub fn reset_all(&mut self) {
        for dot in &mut self.dots {
            dot.reset_position();
        }
        debug!(dots = self.dots.len(), "dot field reset");
    }

    /// The configuration this field was built from.
    pub fn config(&self) -> &TrialConfig {
        &self.config
    }

    /// The shared aperture.
    pub fn aperture(&self) -> Aperture {
        self.aperture
    }

    /// Seed the field was built with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Read-only access to the dots.
    pub fn dots(&self) -> &[Dot] {
        &self.dots
    }

    /// Number of Signal dots.
    pub fn signal_count(&self) -> usize {
        self.dots
            .iter()
            .filter(|d| d.kind() == DotKind::Signal)
            .count()
    }

    /// Number of dots currently visible.
    pub fn visible_count(&self) -> usize {
        self.dots.iter().filter(|d| d.is_visible()).count()
    }

    /// Recycle events summed over all dots.
    pub fn total_recycles(&self) -> u64 {
        self.dots.iter().map(Dot::recycles).sum()
    }
}

impl MotionField for DotField {
    fn tick(&mut self, frame_index: u64) {
        DotField::tick(self, frame_index);
    }

    fn snapshot(&self) -> Snapshot {
        DotField::snapshot(self)
    }

    fn reset_all(&mut self) {
        DotField::reset_all(self);
    }

    fn len(&self) -> usize {
        self.dots.len()
    }

    fn params(&self) -> Value {
        self.config.params()
    }
}

/// Uniform sample inside a disc of `radius` by rejection from the bounding square.
fn sample_disc(rng: &mut Xorshift64, radius: f64) -> [f64; 2] {
    loop {
        let x = rng.next_range(-radius, radius);
        let y = rng.next_range(-radius, radius);
        if x.hypot(y) <= radius {
            return [x, y];
        }
    }
}
