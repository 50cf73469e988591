//! Render-facing view of a field.
//!
//! A [`Snapshot`] is an ordered sequence of [`DotState`] tuples, one per dot,
//! indexed the same way as the field's dots. Renderers key their drawables by
//! that index; the engine holds no rendering handles.

use crate::dot::DotKind;
use serde::{Deserialize, Serialize};

/// Position, visibility, and kind of one dot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DotState {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub visible: bool,
    pub kind: DotKind,
}

/// The state of every dot at one instant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    dots: Vec<DotState>,
}

impl Snapshot {
    /// Wraps an ordered list of dot states.
    pub fn new(dots: Vec<DotState>) -> Self {
        Self { dots }
    }

    /// All dot states, in field order.
    pub fn dots(&self) -> &[DotState] {
        &self.dots
    }

    /// Number of dots.
    pub fn len(&self) -> usize {
        self.dots.len()
    }

    /// True when the snapshot holds no dots.
    pub fn is_empty(&self) -> bool {
        self.dots.is_empty()
    }

    /// Iterates over dot states in field order.
    pub fn iter(&self) -> std::slice::Iter<'_, DotState> {
        self.dots.iter()
    }

    /// Iterates over the dots that should be drawn, with their field index.
    pub fn visible(&self) -> impl Iterator<Item = (usize, &DotState)> {
        self.dots.iter().enumerate().filter(|(_, d)| d.visible)
    }

    /// Number of dots currently inside the aperture.
    pub fn visible_count(&self) -> usize {
        self.dots.iter().filter(|d| d.visible).count()
    }

    /// Number of Signal dots.
    pub fn signal_count(&self) -> usize {
        self.dots
            .iter()
            .filter(|d| d.kind == DotKind::Signal)
            .count()
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = &'a DotState;
    type IntoIter = std::slice::Iter<'a, DotState>;

    fn into_iter(self) -> Self::IntoIter {
        self.dots.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(x: f64, visible: bool, kind: DotKind) -> DotState {
        DotState {
            x,
            y: 0.0,
            z: 0.0,
            visible,
            kind,
        }
    }

    #[test]
    fn counts_visible_and_signal() {
        let snap = Snapshot::new(vec![
            state(0.0, true, DotKind::Signal),
            state(1.0, false, DotKind::Noise),
            state(2.0, true, DotKind::Noise),
        ]);
        assert_eq!(snap.len(), 3);
        assert_eq!(snap.visible_count(), 2);
        assert_eq!(snap.signal_count(), 1);
    }

    #[test]
    fn visible_iterator_keeps_field_index() {
        let snap = Snapshot::new(vec![
            state(0.0, false, DotKind::Signal),
            state(1.0, true, DotKind::Noise),
        ]);
        let idx: Vec<usize> = snap.visible().map(|(i, _)| i).collect();
        assert_eq!(idx, vec![1]);
    }

    #[test]
    fn empty_snapshot() {
        let snap = Snapshot::default();
        assert!(snap.is_empty());
        assert_eq!(snap.visible_count(), 0);
    }

    #[test]
    fn serializes_as_tuple_sequence() {
        let snap = Snapshot::new(vec![state(1.5, true, DotKind::Noise)]);
        let v = serde_json::to_value(&snap).unwrap();
        let first = &v.as_array().unwrap()[0];
        assert_eq!(first["x"], 1.5);
        assert_eq!(first["visible"], true);
        assert_eq!(first["kind"], "noise");
    }
}
