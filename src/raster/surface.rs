use std::path::Path;

use anyhow::Context;

use crate::{
    foundation::color::{Rgba8, unpremul_rgba8},
    foundation::error::{ArtError, ArtResult},
    raster::composite,
};

/// Owned raster in premultiplied RGBA8, row-major.
#[derive(Clone, PartialEq, Eq)]
pub struct Surface {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("data_len", &self.data.len())
            .finish()
    }
}

fn byte_len(width: u32, height: u32) -> ArtResult<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| ArtError::invalid_geometry("surface size overflow"))
}

impl Surface {
    /// Fully transparent surface.
    pub fn new(width: u32, height: u32) -> ArtResult<Self> {
        if width == 0 || height == 0 {
            return Err(ArtError::invalid_geometry(format!(
                "surface must be non-empty, got {width}x{height}"
            )));
        }
        Ok(Self {
            width,
            height,
            data: vec![0; byte_len(width, height)?],
        })
    }

    /// Surface filled with one straight color.
    pub fn filled(width: u32, height: u32, color: Rgba8) -> ArtResult<Self> {
        let mut s = Self::new(width, height)?;
        let px = color.premul();
        for chunk in s.data.chunks_exact_mut(4) {
            chunk.copy_from_slice(&px);
        }
        Ok(s)
    }

    /// Wrap existing premultiplied bytes.
    pub fn from_premul(width: u32, height: u32, data: Vec<u8>) -> ArtResult<Self> {
        if width == 0 || height == 0 {
            return Err(ArtError::invalid_geometry(format!(
                "surface must be non-empty, got {width}x{height}"
            )));
        }
        if data.len() != byte_len(width, height)? {
            return Err(ArtError::validation(
                "surface bytes must match width*height*4",
            ));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Premultiplied bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable premultiplied bytes.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Premultiplied pixel at `(x, y)`; panics when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = ((y as usize) * (self.width as usize) + x as usize) * 4;
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    /// Overwrite one full row with a single premultiplied pixel value.
    pub fn fill_row(&mut self, y: u32, px: [u8; 4]) {
        let stride = self.width as usize * 4;
        let start = y as usize * stride;
        for chunk in self.data[start..start + stride].chunks_exact_mut(4) {
            chunk.copy_from_slice(&px);
        }
    }

    /// Source-over `src` with its top-left corner at `(x, y)`, clipped to this surface.
    pub fn draw_over(&mut self, src: &Surface, x: i64, y: i64) -> ArtResult<()> {
        let dst_w = i64::from(self.width);
        let dst_h = i64::from(self.height);
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + i64::from(src.width)).min(dst_w);
        let y1 = (y + i64::from(src.height)).min(dst_h);
        if x0 >= x1 || y0 >= y1 {
            return Ok(());
        }

        let span = ((x1 - x0) * 4) as usize;
        let dst_stride = self.width as usize * 4;
        let src_stride = src.width as usize * 4;
        for dy in y0..y1 {
            let sy = (dy - y) as usize;
            let sx = (x0 - x) as usize;
            let d_start = dy as usize * dst_stride + x0 as usize * 4;
            let s_start = sy * src_stride + sx * 4;
            composite::over_row(
                &mut self.data[d_start..d_start + span],
                &src.data[s_start..s_start + span],
            )?;
        }
        Ok(())
    }

    /// Multiply RGB by `factor` in `[0, 1]`; alpha is untouched.
    pub fn scale_brightness(&mut self, factor: f32) {
        let f = factor.clamp(0.0, 1.0);
        if f >= 1.0 {
            return;
        }
        for px in self.data.chunks_exact_mut(4) {
            for c in &mut px[..3] {
                *c = (f32::from(*c) * f).round().min(255.0) as u8;
            }
        }
    }

    /// Solid `color` shaped by this surface's alpha channel, with `pad` transparent pixels
    /// added on every side.
    pub fn alpha_silhouette(&self, color: Rgba8, pad: u32) -> ArtResult<Surface> {
        let w = self
            .width
            .checked_add(pad * 2)
            .ok_or_else(|| ArtError::invalid_geometry("silhouette width overflow"))?;
        let h = self
            .height
            .checked_add(pad * 2)
            .ok_or_else(|| ArtError::invalid_geometry("silhouette height overflow"))?;
        let mut out = Surface::new(w, h)?;
        let out_stride = w as usize * 4;
        for y in 0..self.height {
            for x in 0..self.width {
                let a = self.pixel(x, y)[3];
                if a == 0 {
                    continue;
                }
                let scaled = ((u16::from(color.a) * u16::from(a) + 127) / 255) as u8;
                let px = Rgba8::rgba(color.r, color.g, color.b, scaled).premul();
                let i = (y + pad) as usize * out_stride + (x + pad) as usize * 4;
                out.data[i..i + 4].copy_from_slice(&px);
            }
        }
        Ok(out)
    }

    /// Lanczos3 resample to `width` x `height`.
    pub fn resized(&self, width: u32, height: u32) -> ArtResult<Surface> {
        if width == self.width && height == self.height {
            return Ok(self.clone());
        }
        if width == 0 || height == 0 {
            return Err(ArtError::invalid_geometry(format!(
                "cannot resize to {width}x{height}"
            )));
        }
        let src = image::RgbaImage::from_raw(self.width, self.height, self.data.clone())
            .ok_or_else(|| ArtError::validation("surface bytes do not form an image"))?;
        let out =
            image::imageops::resize(&src, width, height, image::imageops::FilterType::Lanczos3);
        let mut data = out.into_raw();
        // Lanczos ringing can push color above alpha, which is invalid premultiplied data.
        for px in data.chunks_exact_mut(4) {
            let a = px[3];
            for c in &mut px[..3] {
                *c = (*c).min(a);
            }
        }
        Surface::from_premul(width, height, data)
    }

    /// Straight-alpha copy suitable for encoding.
    pub fn to_rgba_image(&self) -> image::RgbaImage {
        let mut raw = self.data.clone();
        for px in raw.chunks_exact_mut(4) {
            let u = unpremul_rgba8([px[0], px[1], px[2], px[3]]);
            px.copy_from_slice(&u);
        }
        image::RgbaImage::from_raw(self.width, self.height, raw)
            .unwrap_or_else(|| image::RgbaImage::new(self.width, self.height))
    }

    /// Encode as PNG at `path`, creating parent directories.
    pub fn save_png(&self, path: &Path) -> ArtResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
        self.to_rgba_image()
            .save_with_format(path, image::ImageFormat::Png)
            .with_context(|| format!("write png '{}'", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/surface.rs"]
mod tests;
