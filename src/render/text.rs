use std::path::Path;

use anyhow::Context;

use crate::{
    foundation::color::Rgba8,
    foundation::error::{ArtError, ArtResult, AssetKind},
    raster::surface::Surface,
};

/// Text measurement and single-line rasterization used by the logo engine.
pub trait TextRasterizer {
    /// Advance width of `text` laid out on one line at `size_px`.
    fn measure(&mut self, text: &str, size_px: f32) -> ArtResult<f32>;

    /// Font ascent and descent (both positive) at `size_px`.
    fn vertical_metrics(&mut self, size_px: f32) -> ArtResult<(f32, f32)>;

    /// One line of `text`, `ceil(width)` by `ceil(ascent + descent)` pixels, baseline at ascent.
    fn rasterize_line(&mut self, text: &str, size_px: f32, color: Rgba8) -> ArtResult<Surface>;
}

/// [`TextRasterizer`] backed by a single font file, shaped with Parley and drawn with `vello_cpu`.
pub struct FontRasterizer {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<Rgba8>,
    family_name: String,
    font: vello_cpu::peniko::FontData,
}

impl std::fmt::Debug for FontRasterizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontRasterizer")
            .field("family_name", &self.family_name)
            .finish()
    }
}

impl FontRasterizer {
    /// Load the font at `path`.
    pub fn from_file(path: &Path) -> ArtResult<Self> {
        if !path.is_file() {
            return Err(ArtError::missing_asset(AssetKind::Font, path));
        }
        let bytes =
            std::fs::read(path).with_context(|| format!("read font '{}'", path.display()))?;
        Self::from_bytes(bytes)
    }

    /// Register raw font bytes (TTF/OTF).
    pub fn from_bytes(bytes: Vec<u8>) -> ArtResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(bytes.clone()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| ArtError::validation("no font families registered from font bytes"))?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| ArtError::validation("registered font family has no name"))?
            .to_string();

        let font = vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(bytes), 0);
        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
            font,
        })
    }

    /// Family name the font registered under.
    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    fn layout(&mut self, text: &str, size_px: f32, color: Rgba8) -> ArtResult<parley::Layout<Rgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(ArtError::invalid_geometry(format!(
                "font size must be finite and > 0, got {size_px}"
            )));
        }
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(color));

        let mut layout: parley::Layout<Rgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}

impl TextRasterizer for FontRasterizer {
    fn measure(&mut self, text: &str, size_px: f32) -> ArtResult<f32> {
        Ok(self.layout(text, size_px, Rgba8::WHITE)?.width())
    }

    fn vertical_metrics(&mut self, size_px: f32) -> ArtResult<(f32, f32)> {
        let layout = self.layout("Hg", size_px, Rgba8::WHITE)?;
        let line = layout
            .lines()
            .next()
            .ok_or_else(|| ArtError::validation("font produced no line for metrics probe"))?;
        let m = line.metrics();
        Ok((m.ascent, m.descent.abs()))
    }

    fn rasterize_line(&mut self, text: &str, size_px: f32, color: Rgba8) -> ArtResult<Surface> {
        let (ascent, descent) = self.vertical_metrics(size_px)?;
        let layout = self.layout(text, size_px, color)?;

        let width = layout.width().ceil().max(1.0) as u32;
        let height = (ascent + descent).ceil().max(1.0) as u32;
        let w16: u16 = width
            .try_into()
            .map_err(|_| ArtError::invalid_geometry("text line width exceeds u16"))?;
        let h16: u16 = height
            .try_into()
            .map_err(|_| ArtError::invalid_geometry("text line height exceeds u16"))?;

        let mut ctx = vello_cpu::RenderContext::new(w16, h16);
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        for line in layout.lines() {
            // Put the baseline at `ascent` regardless of any leading Parley adds above it.
            let metrics = line.metrics();
            let y_shift = metrics.baseline - metrics.ascent;
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let brush = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y - y_shift,
                });
                ctx.glyph_run(&self.font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        ctx.flush();

        let mut pixmap = vello_cpu::Pixmap::new(w16, h16);
        ctx.render_to_pixmap(&mut pixmap);
        Surface::from_premul(width, height, pixmap.data_as_u8_slice().to_vec())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
