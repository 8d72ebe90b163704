//! Title art: a platform icon scaled into a box, or the category name as wrapped text, both
//! finished with a blurred drop shadow and centered on a transparent canvas.

use std::path::{Path, PathBuf};

use crate::{
    foundation::color::Rgba8,
    foundation::error::{ArtError, ArtResult, AssetKind},
    raster::{blur, decode, surface::Surface},
    render::text::TextRasterizer,
};

/// Platform identifier meaning "no icon; draw the name as text".
pub const DEFAULT_PLATFORM: &str = "default";

/// Reference render width the text and shadow constants are tuned for.
const REFERENCE_WIDTH: f32 = 1440.0;

/// What to draw as a category's title art.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LogoSpec {
    /// Pre-made icon image.
    Icon {
        /// Icon file.
        path: PathBuf,
    },
    /// Text rendered with the configured font.
    Text {
        /// Source string, usually the category's display name.
        text: String,
    },
}

impl LogoSpec {
    /// `<logos_dir>/<platform>.png` for known platforms, text of `display_name` otherwise.
    pub fn resolve(display_name: &str, platform: &str, logos_dir: &Path) -> Self {
        if platform == DEFAULT_PLATFORM {
            Self::Text {
                text: display_name.to_string(),
            }
        } else {
            Self::Icon {
                path: logos_dir.join(format!("{platform}.png")),
            }
        }
    }
}

/// Bounding box the logo must fit in, in render-space pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LogoBox {
    /// Maximum width.
    pub max_width: f64,
    /// Maximum height.
    pub max_height: f64,
}

impl LogoBox {
    fn validate(&self) -> ArtResult<()> {
        let ok = |v: f64| v.is_finite() && v > 0.0;
        if !ok(self.max_width) || !ok(self.max_height) {
            return Err(ArtError::invalid_geometry(format!(
                "logo box must be positive, got {}x{}",
                self.max_width, self.max_height
            )));
        }
        Ok(())
    }
}

/// Text and shadow parameters for one render resolution.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LogoStyle {
    /// Initial font size for text logos.
    pub font_size_px: f32,
    /// Vertical gap between wrapped lines.
    pub line_gap_px: f32,
    /// Text fill color.
    pub text_color: Rgba8,
    /// Gaussian sigma of the drop shadow.
    pub shadow_sigma: f32,
    /// How many times the shadow is composited under the logo.
    pub shadow_strength: u32,
}

impl LogoStyle {
    /// Constants scaled from the 1440px-wide reference render.
    pub fn for_render_width(render_width: u32, text_color: Rgba8, shadow_strength: u32) -> Self {
        let k = render_width as f32 / REFERENCE_WIDTH;
        Self {
            font_size_px: 150.0 * k,
            line_gap_px: 10.0 * k,
            text_color,
            shadow_sigma: 20.0 * k,
            shadow_strength,
        }
    }
}

/// Estimated characters per line: `floor(chars * max_width / measured_width)`, at least 1.
///
/// A non-positive measurement means the text has no extent, so it never needs wrapping.
pub fn estimate_max_chars(char_count: usize, max_width: f64, measured_width: f64) -> usize {
    if measured_width <= 0.0 || !measured_width.is_finite() {
        return char_count.max(1);
    }
    ((char_count as f64 * max_width / measured_width).floor() as usize).max(1)
}

/// Greedy word wrap by character count.
///
/// Text that already fits is returned as one line. Otherwise whitespace-separated words are
/// packed while `line + ' ' + word` stays within `max_chars`; a word longer than `max_chars`
/// is cut into `max_chars`-sized chunks, each on its own line.
pub fn wrap_words(text: &str, max_chars: usize) -> Vec<String> {
    let max = max_chars.max(1);
    let trimmed = text.trim();
    if trimmed.chars().count() <= max {
        return vec![trimmed.to_string()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;
    for word in trimmed.split_whitespace() {
        let word_len = word.chars().count();
        if word_len > max {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let chars: Vec<char> = word.chars().collect();
            lines.extend(chars.chunks(max).map(|c| c.iter().collect::<String>()));
            continue;
        }
        if current.is_empty() {
            current.push_str(word);
            current_len = word_len;
        } else if current_len + 1 + word_len <= max {
            current.push(' ');
            current.push_str(word);
            current_len += 1 + word_len;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
            current_len = word_len;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// One measured line of a text logo.
#[derive(Clone, Debug, PartialEq)]
pub struct TextLine {
    /// Line content.
    pub text: String,
    /// Advance width at the block's font size.
    pub width: f32,
}

/// Wrapped, measured text ready to rasterize.
#[derive(Clone, Debug, PartialEq)]
pub struct TextBlock {
    /// Lines top to bottom.
    pub lines: Vec<TextLine>,
    /// Font size the lines were measured at.
    pub font_size_px: f32,
    /// Ascent + descent.
    pub line_height: f32,
    /// Gap between consecutive lines.
    pub line_gap: f32,
}

impl TextBlock {
    /// Width of the widest line.
    pub fn width(&self) -> f32 {
        self.lines.iter().map(|l| l.width).fold(0.0, f32::max)
    }

    /// Total stacked height including gaps.
    pub fn height(&self) -> f32 {
        let n = self.lines.len() as f32;
        n * self.line_height + (n - 1.0).max(0.0) * self.line_gap
    }
}

fn measure_block(
    lines: &[String],
    font_size_px: f32,
    line_gap: f32,
    rasterizer: &mut dyn TextRasterizer,
) -> ArtResult<TextBlock> {
    let (ascent, descent) = rasterizer.vertical_metrics(font_size_px)?;
    let mut measured = Vec::with_capacity(lines.len());
    for line in lines {
        measured.push(TextLine {
            text: line.clone(),
            width: rasterizer.measure(line, font_size_px)?,
        });
    }
    Ok(TextBlock {
        lines: measured,
        font_size_px,
        line_height: ascent + descent,
        line_gap,
    })
}

/// Wrap `text` for `bbox` and shrink the font if the wrapped block still overflows it.
pub fn layout_text_block(
    text: &str,
    bbox: &LogoBox,
    style: &LogoStyle,
    rasterizer: &mut dyn TextRasterizer,
) -> ArtResult<TextBlock> {
    bbox.validate()?;
    if text.trim().is_empty() {
        return Err(ArtError::validation("text logo needs a non-blank name"));
    }

    let measured = rasterizer.measure(text.trim(), style.font_size_px)?;
    let max_chars = estimate_max_chars(
        text.trim().chars().count(),
        bbox.max_width,
        f64::from(measured),
    );
    let lines = wrap_words(text, max_chars);
    let block = measure_block(&lines, style.font_size_px, style.line_gap_px, rasterizer)?;

    let (w, h) = (f64::from(block.width()), f64::from(block.height()));
    if w <= 0.0 || h <= 0.0 {
        return Ok(block);
    }
    let factor = (bbox.max_width / w).min(bbox.max_height / h);
    if factor >= 1.0 {
        return Ok(block);
    }
    let factor = factor as f32;
    measure_block(
        &lines,
        style.font_size_px * factor,
        style.line_gap_px * factor,
        rasterizer,
    )
}

/// Rasterize a block with every line horizontally centered.
pub fn render_text_block(
    block: &TextBlock,
    color: Rgba8,
    rasterizer: &mut dyn TextRasterizer,
) -> ArtResult<Surface> {
    let width = block.width().ceil().max(1.0) as u32;
    let height = block.height().ceil().max(1.0) as u32;
    let mut out = Surface::new(width, height)?;
    for (i, line) in block.lines.iter().enumerate() {
        let raster = rasterizer.rasterize_line(&line.text, block.font_size_px, color)?;
        let x = (i64::from(width) - i64::from(raster.width())) / 2;
        let y = (i as f32 * (block.line_height + block.line_gap)).round() as i64;
        out.draw_over(&raster, x, y)?;
    }
    Ok(out)
}

/// Uniformly scale `icon` so it fits entirely inside `bbox`.
pub fn fit_icon(icon: &Surface, bbox: &LogoBox) -> ArtResult<Surface> {
    bbox.validate()?;
    let (w, h) = (f64::from(icon.width()), f64::from(icon.height()));
    let scale = (bbox.max_height / h).min(bbox.max_width / w);
    let new_w = ((w * scale) as u32).max(1);
    let new_h = ((h * scale) as u32).max(1);
    icon.resized(new_w, new_h)
}

/// Center `logo` on a transparent `width` x `height` canvas over `strength` layers of blurred
/// black silhouette.
pub fn compose_with_shadow(
    logo: &Surface,
    width: u32,
    height: u32,
    shadow_sigma: f32,
    strength: u32,
) -> ArtResult<Surface> {
    let mut canvas = Surface::new(width, height)?;
    let x = (i64::from(width) - i64::from(logo.width())) / 2;
    let y = (i64::from(height) - i64::from(logo.height())) / 2;

    if strength > 0 {
        // The blur only needs the logo's neighborhood, not the whole canvas.
        let pad = blur::radius_for_sigma(shadow_sigma);
        let silhouette = logo.alpha_silhouette(Rgba8::BLACK, pad)?;
        let shadow = blur::gaussian_blur(&silhouette, shadow_sigma)?;
        let offset = i64::from(pad);
        for _ in 0..strength {
            canvas.draw_over(&shadow, x - offset, y - offset)?;
        }
    }
    canvas.draw_over(logo, x, y)?;
    Ok(canvas)
}

/// Produces shadowed title art for categories.
pub struct LogoLayoutEngine<R> {
    rasterizer: R,
    style: LogoStyle,
}

impl<R: TextRasterizer> LogoLayoutEngine<R> {
    /// Engine drawing text with `rasterizer`.
    pub fn new(rasterizer: R, style: LogoStyle) -> Self {
        Self { rasterizer, style }
    }

    /// Active style.
    pub fn style(&self) -> &LogoStyle {
        &self.style
    }

    /// Bare logo raster (no shadow), fitted to `bbox`.
    pub fn logo_raster(&mut self, spec: &LogoSpec, bbox: &LogoBox) -> ArtResult<Surface> {
        match spec {
            LogoSpec::Icon { path } => {
                let icon = decode::load_surface(path, AssetKind::Icon)?;
                fit_icon(&icon, bbox)
            }
            LogoSpec::Text { text } => {
                let block = layout_text_block(text, bbox, &self.style, &mut self.rasterizer)?;
                tracing::debug!(
                    text = %text,
                    lines = block.lines.len(),
                    font_size_px = block.font_size_px,
                    "laid out text logo"
                );
                render_text_block(&block, self.style.text_color, &mut self.rasterizer)
            }
        }
    }

    /// Shadowed logo centered on a transparent `width` x `height` canvas.
    pub fn render(
        &mut self,
        spec: &LogoSpec,
        bbox: &LogoBox,
        width: u32,
        height: u32,
    ) -> ArtResult<Surface> {
        let logo = self.logo_raster(spec, bbox)?;
        compose_with_shadow(
            &logo,
            width,
            height,
            self.style.shadow_sigma,
            self.style.shadow_strength,
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/logo.rs"]
mod tests;
