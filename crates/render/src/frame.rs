//! PNG output of a rasterized frame.
//!
//! Feature-gated behind `png` (default on) so embedded hosts can depend on
//! this crate without pulling in the `image` crate.

use rdk_core::{RdkError, Snapshot};
use std::path::Path;

use crate::pixel::{rasterize, Style, Viewport};

/// Rasterizes `snapshot` and writes it to `path` as a PNG.
///
/// Returns `RdkError::Io` on buffer mismatch or write failure.
pub fn write_png(
    snapshot: &Snapshot,
    dot_radius: f64,
    aperture_radius: f64,
    viewport: &Viewport,
    style: &Style,
    path: &Path,
) -> Result<(), RdkError> {
    let rgba = rasterize(snapshot, dot_radius, aperture_radius, viewport, style);
    let img = image::RgbaImage::from_raw(viewport.width(), viewport.height(), rgba)
        .ok_or_else(|| RdkError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path).map_err(|e| RdkError::Io(e.to_string()))
}
