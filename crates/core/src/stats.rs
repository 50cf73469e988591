//! Running statistics of how many dots are visible per tick.
//!
//! Recycling exists to keep dot density inside the aperture constant; a
//! [`DensityTracker`] fed once per tick makes that checkable.

use crate::snapshot::Snapshot;
use serde::{Deserialize, Serialize};

/// Accumulates visible-dot counts over a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DensityTracker {
    dot_count: usize,
    samples: u64,
    min_visible: Option<usize>,
    max_visible: usize,
    sum_visible: u64,
}

/// Summary of a tracked run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DensitySummary {
    pub dot_count: usize,
    pub samples: u64,
    pub min_visible: usize,
    pub max_visible: usize,
    pub mean_visible: f64,
    pub mean_fraction: f64,
}

impl DensityTracker {
    /// Tracker for a field of `dot_count` dots.
    pub fn new(dot_count: usize) -> Self {
        Self {
            dot_count,
            ..Self::default()
        }
    }

    /// Records one tick's visible count.
    pub fn record(&mut self, visible: usize) {
        self.samples += 1;
        self.sum_visible += visible as u64;
        self.max_visible = self.max_visible.max(visible);
        self.min_visible = Some(self.min_visible.map_or(visible, |m| m.min(visible)));
    }

    /// Records the visible count of a snapshot.
    pub fn record_snapshot(&mut self, snapshot: &Snapshot) {
        self.record(snapshot.visible_count());
    }

    /// Number of recorded ticks.
    pub fn samples(&self) -> u64 {
        self.samples
    }

    /// Mean visible count, or 0 before any sample.
    pub fn mean_visible(&self) -> f64 {
        if self.samples == 0 {
            0.0
        } else {
            self.sum_visible as f64 / self.samples as f64
        }
    }

    /// Mean fraction of the field that was visible.
    pub fn mean_fraction(&self) -> f64 {
        if self.dot_count == 0 {
            0.0
        } else {
            self.mean_visible() / self.dot_count as f64
        }
    }

    /// Snapshot of the accumulated statistics.
    pub fn summary(&self) -> DensitySummary {
        DensitySummary {
            dot_count: self.dot_count,
            samples: self.samples,
            min_visible: self.min_visible.unwrap_or(0),
            max_visible: self.max_visible,
            mean_visible: self.mean_visible(),
            mean_fraction: self.mean_fraction(),
        }
    }
}
