use std::{collections::HashMap, sync::Arc};

use crate::{
    foundation::color::Rgba8,
    foundation::error::{ArtError, ArtResult},
    raster::surface::Surface,
};

/// Parameters of a vertical gradient overlay.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientSpec {
    /// Raster width.
    pub width: u32,
    /// Raster height.
    pub height: u32,
    /// Color of row 0.
    pub start: Rgba8,
    /// Color reached at the end of the interpolated band and used below it.
    pub end: Rgba8,
    /// Fraction of the height, in `(0, 1]`, over which colors are interpolated.
    pub fraction: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct GradientKey {
    width: u32,
    height: u32,
    start: Rgba8,
    end: Rgba8,
    fraction_bits: u32,
}

impl From<&GradientSpec> for GradientKey {
    fn from(spec: &GradientSpec) -> Self {
        Self {
            width: spec.width,
            height: spec.height,
            start: spec.start,
            end: spec.end,
            fraction_bits: spec.fraction.to_bits(),
        }
    }
}

/// Render the gradient described by `spec`.
///
/// Row `y < floor(height * fraction)` is `start + (y / band) * (end - start)` per channel,
/// truncated toward zero; every later row is `end`.
pub fn generate_gradient(spec: &GradientSpec) -> ArtResult<Surface> {
    if !spec.fraction.is_finite() || spec.fraction <= 0.0 || spec.fraction > 1.0 {
        return Err(ArtError::invalid_geometry(format!(
            "gradient fraction must be in (0, 1], got {}",
            spec.fraction
        )));
    }
    if spec.start == spec.end {
        return Surface::filled(spec.width, spec.height, spec.end);
    }

    let mut out = Surface::new(spec.width, spec.height)?;
    let band = (f64::from(spec.height) * f64::from(spec.fraction)) as u32;
    let end_px = spec.end.premul();
    let (s, e) = (spec.start, spec.end);
    let lerp = |a: u8, b: u8, t: f64| -> u8 {
        (f64::from(a) + t * (f64::from(b) - f64::from(a))) as u8
    };

    for y in 0..spec.height {
        let px = if y < band {
            let t = f64::from(y) / f64::from(band);
            Rgba8::rgba(
                lerp(s.r, e.r, t),
                lerp(s.g, e.g, t),
                lerp(s.b, e.b, t),
                lerp(s.a, e.a, t),
            )
            .premul()
        } else {
            end_px
        };
        out.fill_row(y, px);
    }
    Ok(out)
}

/// Gradients memoized for the lifetime of one pipeline run.
#[derive(Debug, Default)]
pub struct GradientCache {
    entries: HashMap<GradientKey, Arc<Surface>>,
}

impl GradientCache {
    /// Empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached gradient for `spec`, generating it on first use.
    pub fn get_or_generate(&mut self, spec: &GradientSpec) -> ArtResult<Arc<Surface>> {
        let key = GradientKey::from(spec);
        if let Some(hit) = self.entries.get(&key) {
            return Ok(Arc::clone(hit));
        }
        let surface = Arc::new(generate_gradient(spec)?);
        self.entries.insert(key, Arc::clone(&surface));
        Ok(surface)
    }

    /// Number of distinct gradients generated so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing has been generated yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/gradient.rs"]
mod tests;
