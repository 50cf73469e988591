//! The atomic motion element and its per-tick stepping rules.
//!
//! A [`Dot`] is either [`DotKind::Signal`], travelling along the trial
//! direction, or [`DotKind::Noise`], whose heading takes a periodic random
//! walk. Each tick a dot may be recycled before it advances:
//!
//! - Signal dots that have left the aperture are translated by
//!   `-2 * radius` along their heading, re-entering on the far side without
//!   any change in velocity.
//! - Noise dots that have left the aperture turn around (heading + π).
//!
//! Both rules fire only while the dot is moving outward, and a one-tick
//! latch stops a freshly recycled dot from recycling again before its
//! visibility has caught up. A Signal dot that is still outside and outbound
//! after one jump keeps jumping, so the latch never lets it get further away.

use crate::aperture::Aperture;
use crate::prng::Xorshift64;
use crate::snapshot::DotState;
use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};
use tracing::trace;

/// Upper bound on antipodal jumps in one recycle, for hand-built dots with a
/// zero-width aperture.
const MAX_JUMPS: f64 = 4096.0;

/// Whether a dot carries the coherent motion signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DotKind {
    /// Moves along the trial direction.
    Signal,
    /// Random walk with periodically perturbed heading.
    Noise,
}

/// Motion constants shared by every dot of a field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DotParams {
    /// Speed in scene units per tick.
    pub velocity: f64,
    /// Rendered radius.
    pub radius: f64,
    /// Containing aperture, margin included.
    pub aperture: Aperture,
    /// Ticks between Noise heading perturbations. Zero disables perturbation.
    pub perturb_period: u64,
    /// Maximum size of one perturbation, in radians.
    pub perturb_magnitude: f64,
}

/// A single moving dot.
#[derive(Debug, Clone)]
pub struct Dot {
    position: [f64; 3],
    initial_position: [f64; 3],
    kind: DotKind,
    heading: f64,
    initial_heading: f64,
    params: DotParams,
    visible: bool,
    just_recycled: bool,
    recycles: u64,
    rng: Xorshift64,
}

impl Dot {
    /// Creates a dot at `position` travelling along `heading`.
    ///
    /// `rng` is the dot's private stream for heading perturbations.
    pub fn new(
        kind: DotKind,
        position: [f64; 3],
        heading: f64,
        params: DotParams,
        rng: Xorshift64,
    ) -> Self {
        let visible = params.aperture.shows(position[0], position[1]);
        Self {
            position,
            initial_position: position,
            kind,
            heading,
            initial_heading: heading,
            params,
            visible,
            just_recycled: false,
            recycles: 0,
            rng,
        }
    }

    /// Advances the dot by exactly one tick.
    pub fn step(&mut self, frame_index: u64) {
        if self.kind == DotKind::Noise
            && frame_index.checked_rem(self.params.perturb_period) == Some(0)
        {
            self.perturb();
        }

        if self.just_recycled {
            self.just_recycled = false;
        } else if self.is_leaving() {
            self.recycle(frame_index);
        }

        let v = self.params.velocity;
        self.position[0] += v * self.heading.cos();
        self.position[1] += v * self.heading.sin();
        self.visible = self
            .params
            .aperture
            .shows(self.position[0], self.position[1]);
    }

    /// Restores the creation-time position and heading.
    ///
    /// The private random stream is not rewound, so a replayed presentation
    /// gets fresh noise.
    pub fn reset_position(&mut self) {
        self.position = self.initial_position;
        self.heading = self.initial_heading;
        self.visible = self
            .params
            .aperture
            .shows(self.position[0], self.position[1]);
        self.just_recycled = false;
        self.recycles = 0;
    }

    fn perturb(&mut self) {
        let delta = self.params.perturb_magnitude * self.rng.next_f64();
        if self.rng.next_bool() {
            self.heading -= delta;
        } else {
            self.heading += delta;
        }
        self.heading = self.heading.rem_euclid(TAU);
    }

    /// Outside the aperture and still heading away from the origin.
    fn is_leaving(&self) -> bool {
        let [x, y, _] = self.position;
        let outward = x * self.heading.cos() + y * self.heading.sin() > 0.0;
        outward && !self.params.aperture.contains(x, y)
    }

    fn recycle(&mut self, frame_index: u64) {
        match self.kind {
            DotKind::Signal => {
                let jump = 2.0 * self.params.aperture.radius();
                let (cos, sin) = (self.heading.cos(), self.heading.sin());
                let outward = self.position[0] * cos + self.position[1] * sin;
                // Each jump takes `jump` off the outward distance, so this many
                // always turn the dot inward. Stop early once it is back inside.
                let jumps = (outward / jump).ceil().clamp(1.0, MAX_JUMPS) as u32;
                for _ in 0..jumps {
                    self.position[0] -= jump * cos;
                    self.position[1] -= jump * sin;
                    if !self.is_leaving() {
                        break;
                    }
                }
            }
            DotKind::Noise => {
                self.heading = (self.heading + PI).rem_euclid(TAU);
            }
        }
        self.just_recycled = true;
        self.recycles += 1;
        trace!(
            frame = frame_index,
            kind = ?self.kind,
            x = self.position[0],
            y = self.position[1],
            "dot recycled"
        );
    }

    /// Current (x, y, z) position.
    pub fn position(&self) -> [f64; 3] {
        self.position
    }

    /// Position captured at creation.
    pub fn initial_position(&self) -> [f64; 3] {
        self.initial_position
    }

    /// Signal or Noise.
    pub fn kind(&self) -> DotKind {
        self.kind
    }

    /// Current heading in radians.
    pub fn heading(&self) -> f64 {
        self.heading
    }

    /// Shared motion constants.
    pub fn params(&self) -> &DotParams {
        &self.params
    }

    /// Whether the dot lies within the aperture bound.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether the dot was recycled on its most recent step.
    pub fn just_recycled(&self) -> bool {
        self.just_recycled
    }

    /// Recycle events since creation or the last reset.
    pub fn recycles(&self) -> u64 {
        self.recycles
    }

    /// Render-facing projection of this dot.
    pub fn state(&self) -> DotState {
        let [x, y, z] = self.position;
        DotState {
            x,
            y,
            z,
            visible: self.visible,
            kind: self.kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn params(velocity: f64, aperture_radius: f64, margin: f64) -> DotParams {
        DotParams {
            velocity,
            radius: 0.5,
            aperture: Aperture::new(aperture_radius, margin),
            perturb_period: 10,
            perturb_magnitude: PI / 8.0,
        }
    }

    fn dot(kind: DotKind, x: f64, y: f64, heading: f64, p: DotParams) -> Dot {
        Dot::new(kind, [x, y, 0.0], heading, p, Xorshift64::new(1))
    }

    /// Signed smallest difference between two angles.
    fn angle_diff(a: f64, b: f64) -> f64 {
        (a - b + PI).rem_euclid(TAU) - PI
    }

    #[test]
    fn new_dot_visibility_follows_aperture() {
        let p = params(1.0, 10.0, 0.0);
        assert!(dot(DotKind::Signal, 3.0, 4.0, 0.0, p).is_visible());
        assert!(!dot(DotKind::Signal, 30.0, 0.0, 0.0, p).is_visible());
    }

    #[test]
    fn signal_dot_moves_in_straight_line() {
        let direction = 0.7;
        let p = params(0.3, 1000.0, 0.0);
        let mut d = dot(DotKind::Signal, 1.0, -2.0, direction, p);
        let k = 250;
        for frame in 1..=k {
            d.step(frame);
        }
        let [x, y, z] = d.position();
        let expected_x = 1.0 + k as f64 * 0.3 * direction.cos();
        let expected_y = -2.0 + k as f64 * 0.3 * direction.sin();
        assert!((x - expected_x).abs() < 1e-6, "x = {x}, expected {expected_x}");
        assert!((y - expected_y).abs() < 1e-6, "y = {y}, expected {expected_y}");
        assert_eq!(z, 0.0);
        assert_eq!(d.recycles(), 0);
        assert!((d.heading() - direction).abs() < EPS);
    }

    #[test]
    fn signal_dot_reenters_antipodally() {
        let p = params(1.0, 10.0, 0.25);
        let mut d = dot(DotKind::Signal, 9.5, 0.0, 0.0, p);

        d.step(1);
        assert!((d.position()[0] - 10.5).abs() < EPS);
        assert!(!d.is_visible(), "dot beyond the bound must be hidden");

        let before = d.position();
        d.step(2);
        let after = d.position();
        let expected_x = before[0] - 2.0 * 10.0 + 1.0;
        assert!((after[0] - expected_x).abs() < EPS, "x = {}", after[0]);
        assert!(after[1].abs() < EPS);
        assert!(d.is_visible(), "re-entered dot must be visible");
        assert!(d.just_recycled());
        assert_eq!(d.recycles(), 1);
        assert!((d.heading() - 0.0).abs() < EPS, "signal heading must not change");
    }

    #[test]
    fn signal_dot_faster_than_aperture_stays_bounded() {
        let p = params(12.0, 10.0, 0.25);
        let mut d = dot(DotKind::Signal, 0.0, 0.0, 0.0, p);

        let xs: Vec<f64> = (1..=12)
            .map(|frame| {
                d.step(frame);
                d.position()[0]
            })
            .collect();
        // Frame 12 starts at x = 32, so one jump still leaves it outbound.
        assert_eq!(
            xs,
            vec![12.0, 4.0, 16.0, 8.0, 20.0, 12.0, 24.0, 16.0, 28.0, 20.0, 32.0, 4.0]
        );
        assert!(d.is_visible());

        let mut shown = 0;
        for frame in 13..=1000 {
            d.step(frame);
            let [x, y, _] = d.position();
            assert!(x.abs() <= 32.0 + EPS, "dot escaped to x = {x} on frame {frame}");
            assert!(y.abs() < EPS);
            if frame > 900 && d.is_visible() {
                shown += 1;
            }
        }
        assert!(shown > 0, "fast dot never came back into view");
    }

    #[test]
    fn signal_dot_reenters_along_any_direction() {
        let direction = PI / 2.0;
        let p = params(1.0, 10.0, 0.0);
        let mut d = dot(DotKind::Signal, 0.0, 9.5, direction, p);
        d.step(1);
        assert!(!d.is_visible());
        d.step(2);
        let [x, y, _] = d.position();
        assert!(x.abs() < 1e-9);
        assert!((y - (10.5 - 20.0 + 1.0)).abs() < 1e-9, "y = {y}");
        assert!(d.is_visible());
    }

    #[test]
    fn latch_blocks_recycle_on_following_tick() {
        let p = params(1.0, 10.0, 0.0);
        // Far outside and heading outward: one translation is not enough to re-enter.
        let mut d = dot(DotKind::Signal, 35.0, 0.0, 0.0, p);
        d.step(1);
        assert_eq!(d.recycles(), 1);
        assert!(d.just_recycled());
        d.step(2);
        assert_eq!(d.recycles(), 1, "latched tick must not recycle");
        assert!(!d.just_recycled());
        d.step(3);
        assert_eq!(d.recycles(), 2);
    }

    #[test]
    fn noise_dot_reverses_at_boundary() {
        let mut p = params(1.0, 10.0, 0.0);
        p.perturb_period = 0;
        let mut d = dot(DotKind::Noise, 9.9, 0.0, 0.0, p);
        d.step(1);
        assert!(!d.is_visible());
        d.step(2);
        assert!((angle_diff(d.heading(), PI)).abs() < EPS, "heading = {}", d.heading());
        assert!((d.position()[0] - 9.9).abs() < 1e-9);
        assert!(d.is_visible());
        assert_eq!(d.recycles(), 1);
    }

    #[test]
    fn noise_dot_heading_inward_is_not_reversed() {
        let mut p = params(1.0, 10.0, 0.0);
        p.perturb_period = 0;
        let mut d = dot(DotKind::Noise, 12.0, 0.0, PI, p);
        d.step(1);
        assert_eq!(d.recycles(), 0);
        assert!((d.heading() - PI).abs() < EPS);
        assert!((d.position()[0] - 11.0).abs() < 1e-9);
    }

    #[test]
    fn noise_heading_perturbed_only_on_period_frames() {
        let p = params(0.0, 10.0, 0.0);
        let mut d = dot(DotKind::Noise, 0.0, 0.0, 1.0, p);
        for frame in 1..10 {
            d.step(frame);
            assert!((d.heading() - 1.0).abs() < EPS, "perturbed on frame {frame}");
        }
        d.step(10);
        let diff = angle_diff(d.heading(), 1.0);
        assert!(diff.abs() <= PI / 8.0 + EPS, "perturbation {diff} exceeds magnitude");
    }

    #[test]
    fn signal_heading_never_perturbed() {
        let p = params(0.0, 10.0, 0.0);
        let mut d = dot(DotKind::Signal, 0.0, 0.0, 1.0, p);
        for frame in 0..100 {
            d.step(frame);
        }
        assert!((d.heading() - 1.0).abs() < EPS);
    }

    #[test]
    fn zero_velocity_dot_is_stationary() {
        let p = params(0.0, 10.0, 0.0);
        let mut d = dot(DotKind::Noise, 2.0, 3.0, 0.3, p);
        for frame in 0..200 {
            d.step(frame);
        }
        assert_eq!(d.position(), [2.0, 3.0, 0.0]);
        assert!(d.is_visible());
    }

    #[test]
    fn zero_perturb_period_does_not_panic() {
        let mut p = params(1.0, 10.0, 0.0);
        p.perturb_period = 0;
        let mut d = dot(DotKind::Noise, 0.0, 0.0, 0.0, p);
        for frame in 0..50 {
            d.step(frame);
        }
    }

    #[test]
    fn reset_restores_initial_state() {
        let p = params(1.0, 10.0, 0.0);
        let mut d = dot(DotKind::Noise, 1.0, 1.0, 0.5, p);
        for frame in 1..=37 {
            d.step(frame);
        }
        d.reset_position();
        assert_eq!(d.position(), d.initial_position());
        assert_eq!(d.position(), [1.0, 1.0, 0.0]);
        assert!((d.heading() - 0.5).abs() < EPS);
        assert!(d.is_visible());
        assert!(!d.just_recycled());
        assert_eq!(d.recycles(), 0);
    }

    #[test]
    fn z_is_constant() {
        let p = params(1.0, 10.0, 0.0);
        let mut d = Dot::new(DotKind::Noise, [0.0, 0.0, -3.5], 0.0, p, Xorshift64::new(5));
        for frame in 0..300 {
            d.step(frame);
            assert_eq!(d.position()[2], -3.5);
        }
    }

    #[test]
    fn state_projects_position_visibility_and_kind() {
        let p = params(1.0, 10.0, 0.0);
        let d = Dot::new(DotKind::Signal, [1.0, 2.0, 3.0], 0.0, p, Xorshift64::new(5));
        let s = d.state();
        assert_eq!((s.x, s.y, s.z), (1.0, 2.0, 3.0));
        assert!(s.visible);
        assert_eq!(s.kind, DotKind::Signal);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn visible_dot_always_within_bound(
                seed: u64,
                r in 0.0_f64..1.0,
                theta in 0.0_f64..TAU,
                heading in 0.0_f64..TAU,
                velocity in 0.0_f64..30.0,
                noise: bool,
            ) {
                let p = DotParams {
                    velocity,
                    radius: 0.5,
                    aperture: Aperture::new(10.0, 0.25),
                    perturb_period: 6,
                    perturb_magnitude: PI / 4.0,
                };
                let kind = if noise { DotKind::Noise } else { DotKind::Signal };
                let start = [10.0 * r * theta.cos(), 10.0 * r * theta.sin(), 0.0];
                let mut d = Dot::new(kind, start, heading, p, Xorshift64::new(seed));
                for frame in 1..=300 {
                    d.step(frame);
                    let [x, y, _] = d.position();
                    if d.is_visible() {
                        prop_assert!(x.hypot(y) <= 10.25 + 1e-9);
                    }
                    // Signal dots keep their start offset across the heading and
                    // overshoot by at most two steps along it. Noise dots turn
                    // back within a few steps of the rim.
                    let limit = match kind {
                        DotKind::Signal => 10.25 + 10.0 + 2.0 * velocity,
                        DotKind::Noise => 2.0 * 10.25 + 5.0 * velocity,
                    };
                    prop_assert!(x.hypot(y) <= limit,
                        "dot escaped to ({x}, {y}) on frame {frame}");
                }
            }
        }
    }
}
