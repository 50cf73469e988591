//! Pure-computation RGBA rasterization of a dot [`Snapshot`].
//!
//! Always available (no feature gate) so hosts that upload textures directly
//! can share the conversion with the PNG path.

use rdk_core::{DotKind, RdkError, Snapshot};

/// Maps scene units to pixels. The aperture origin sits at the image centre
/// and scene y points up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    width: u32,
    height: u32,
    scale: f64,
}

impl Viewport {
    /// Creates a viewport of `width x height` pixels at `scale` pixels per unit.
    pub fn new(width: u32, height: u32, scale: f64) -> Result<Self, RdkError> {
        if width == 0 {
            return Err(RdkError::ZeroCount("width"));
        }
        if height == 0 {
            return Err(RdkError::ZeroCount("height"));
        }
        if !scale.is_finite() {
            return Err(RdkError::NotFinite {
                field: "scale",
                value: scale,
            });
        }
        if scale <= 0.0 {
            return Err(RdkError::NonPositive {
                field: "scale",
                value: scale,
            });
        }
        Ok(Self {
            width,
            height,
            scale,
        })
    }

    /// Square viewport of `size` pixels framing an aperture of `radius` with a
    /// small border.
    pub fn fit(size: u32, radius: f64) -> Result<Self, RdkError> {
        if radius.is_nan() || radius <= 0.0 {
            return Err(RdkError::NonPositive {
                field: "aperture_radius",
                value: radius,
            });
        }
        Self::new(size, size, f64::from(size) / (2.2 * radius))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Scene coordinates to continuous pixel coordinates.
    pub fn to_pixel(&self, x: f64, y: f64) -> (f64, f64) {
        (
            f64::from(self.width) / 2.0 + x * self.scale,
            f64::from(self.height) / 2.0 - y * self.scale,
        )
    }
}

/// Colours used when drawing a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    pub background: [u8; 3],
    pub dot: [u8; 3],
    /// Distinct colour for Signal dots. Leave `None` for real stimuli:
    /// observers must not be able to tell the kinds apart.
    pub signal: Option<[u8; 3]>,
    /// Draws the aperture rim when set.
    pub outline: Option<[u8; 3]>,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            background: [0, 0, 0],
            dot: [255, 255, 255],
            signal: None,
            outline: None,
        }
    }
}

/// Draws every visible dot as a filled disc of `dot_radius` scene units.
///
/// Returns an RGBA8 buffer of `width * height * 4` bytes. `aperture_radius`
/// is only used for the optional outline.
pub fn rasterize(
    snapshot: &Snapshot,
    dot_radius: f64,
    aperture_radius: f64,
    viewport: &Viewport,
    style: &Style,
) -> Vec<u8> {
    let w = viewport.width as usize;
    let h = viewport.height as usize;
    let [r, g, b] = style.background;
    let mut buf = [r, g, b, 255u8].repeat(w * h);

    if let Some(rim) = style.outline {
        let r_px = aperture_radius * viewport.scale;
        let (cx, cy) = viewport.to_pixel(0.0, 0.0);
        for py in 0..h {
            for px in 0..w {
                let dx = px as f64 + 0.5 - cx;
                let dy = py as f64 + 0.5 - cy;
                if (dx.hypot(dy) - r_px).abs() <= 0.5 {
                    put(&mut buf, w, px, py, rim);
                }
            }
        }
    }

    let r_px = (dot_radius * viewport.scale).max(0.5);
    for (_, dot) in snapshot.visible() {
        let color = match (dot.kind, style.signal) {
            (DotKind::Signal, Some(c)) => c,
            _ => style.dot,
        };
        let (cx, cy) = viewport.to_pixel(dot.x, dot.y);
        let x0 = (cx - r_px).floor().max(0.0) as usize;
        let y0 = (cy - r_px).floor().max(0.0) as usize;
        let x1 = ((cx + r_px).ceil().max(0.0) as usize).min(w);
        let y1 = ((cy + r_px).ceil().max(0.0) as usize).min(h);
        for py in y0..y1 {
            for px in x0..x1 {
                let dx = px as f64 + 0.5 - cx;
                let dy = py as f64 + 0.5 - cy;
                if dx * dx + dy * dy <= r_px * r_px {
                    put(&mut buf, w, px, py, color);
                }
            }
        }
    }

    buf
}

fn put(buf: &mut [u8], width: usize, x: usize, y: usize, rgb: [u8; 3]) {
    let i = (y * width + x) * 4;
    buf[i..i + 3].copy_from_slice(&rgb);
}
