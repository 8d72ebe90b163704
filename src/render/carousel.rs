use std::sync::Arc;

use crate::{
    foundation::color::Rgba8,
    foundation::error::{ArtError, ArtResult},
    foundation::math::{ceil_div, wrap_index},
    raster::surface::Surface,
};

/// First-row alpha above which a sample panel pixel counts as part of the visible strip.
pub const PANEL_ALPHA_THRESHOLD: u8 = 200;

/// Pixel constants for one target resolution, derived from a sample panel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutGeometry {
    /// Device screen width.
    pub screen_width: u32,
    /// Device screen height.
    pub screen_height: u32,
    /// Render-space pixels per device pixel.
    pub render_multiplier: f64,
    /// Width of the canvas everything is composed on before downsampling.
    pub render_width: u32,
    /// Height of the render canvas.
    pub render_height: u32,
    /// Width of the panel image including transparent margins.
    pub panel_width: u32,
    /// Width of the opaque strip inside a panel image.
    pub real_panel_width: u32,
    /// Horizontal distance between adjacent panel origins.
    pub pitch: u32,
    /// `ceil(render_width / pitch) + 1`.
    pub panels_per_screen: u32,
    /// `ceil((panels_per_screen - 1) / 2)`.
    pub panels_each_side: u32,
}

impl LayoutGeometry {
    /// Derive geometry from the screen size, a sample panel's dimensions and the device gap.
    pub fn derive(
        screen_width: u32,
        screen_height: u32,
        panel_width: u32,
        panel_height: u32,
        real_panel_width: u32,
        gap_px: u32,
    ) -> ArtResult<Self> {
        if screen_width == 0 || screen_height == 0 {
            return Err(ArtError::invalid_geometry(format!(
                "screen must be non-empty, got {screen_width}x{screen_height}"
            )));
        }
        if panel_width == 0 || panel_height == 0 {
            return Err(ArtError::invalid_geometry(format!(
                "sample panel must be non-empty, got {panel_width}x{panel_height}"
            )));
        }

        let render_multiplier = (f64::from(panel_height) / f64::from(screen_height))
            .max(f64::from(panel_width) / f64::from(screen_width));
        let render_width = (f64::from(screen_width) * render_multiplier) as u32;
        let render_height = (f64::from(screen_height) * render_multiplier) as u32;
        let pitch = (f64::from(real_panel_width) + f64::from(gap_px) * render_multiplier) as u32;
        if pitch == 0 {
            return Err(ArtError::invalid_geometry(
                "panel pitch is zero (no opaque strip in the sample panel and no gap)",
            ));
        }
        if render_width == 0 || render_height == 0 {
            return Err(ArtError::invalid_geometry("render canvas collapsed to zero"));
        }

        let panels_per_screen = ceil_div(render_width, pitch) + 1;
        let panels_each_side = ceil_div(panels_per_screen - 1, 2);

        Ok(Self {
            screen_width,
            screen_height,
            render_multiplier,
            render_width,
            render_height,
            panel_width,
            real_panel_width,
            pitch,
            panels_per_screen,
            panels_each_side,
        })
    }

    /// Derive geometry from a decoded sample panel (usually `_default.png`).
    pub fn from_sample(
        screen_width: u32,
        screen_height: u32,
        sample: &Surface,
        gap_px: u32,
    ) -> ArtResult<Self> {
        Self::derive(
            screen_width,
            screen_height,
            sample.width(),
            sample.height(),
            measure_real_panel_width(sample),
            gap_px,
        )
    }
}

/// Count of first-row pixels whose alpha exceeds [`PANEL_ALPHA_THRESHOLD`].
pub fn measure_real_panel_width(sample: &Surface) -> u32 {
    (0..sample.width())
        .filter(|&x| sample.pixel(x, 0)[3] > PANEL_ALPHA_THRESHOLD)
        .count() as u32
}

/// One panel drawn on the carousel canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    /// Index into the panel sequence, always in `[0, len)`.
    pub index: usize,
    /// Signed slot relative to the focus (0 = focus, +k right, -k left).
    pub slot: i64,
    /// Left edge of the panel image on the canvas.
    pub x: i64,
    /// Whether the panel is brightness-scaled.
    pub dimmed: bool,
}

/// Placements for a carousel focused on `focus`, in draw order: focus, right side, left side.
///
/// `panel_width` is the width of the focus image; every slot is offset from its centered position.
pub fn plan_carousel(
    focus: usize,
    len: usize,
    canvas_width: u32,
    panel_width: u32,
    pitch: u32,
) -> ArtResult<Vec<Placement>> {
    if len == 0 {
        return Err(ArtError::validation("carousel needs at least one panel"));
    }
    if pitch == 0 {
        return Err(ArtError::invalid_geometry("carousel pitch must be > 0"));
    }
    if focus >= len {
        return Err(ArtError::validation(format!(
            "focus index {focus} out of range for {len} panels"
        )));
    }

    let middle_x = (i64::from(canvas_width) - i64::from(panel_width)) / 2;
    let mut out = vec![Placement {
        index: focus,
        slot: 0,
        x: middle_x,
        dimmed: false,
    }];
    if len == 1 {
        return Ok(out);
    }

    let per_screen = ceil_div(canvas_width, pitch) + 1;
    let each_side = i64::from(ceil_div(per_screen - 1, 2));
    let pitch = i64::from(pitch);
    let focus = focus as i64;
    for side in [1i64, -1] {
        for k in 1..=each_side {
            let slot = side * k;
            out.push(Placement {
                index: wrap_index(focus + slot, len),
                slot,
                x: middle_x + slot * pitch,
                dimmed: true,
            });
        }
    }
    Ok(out)
}

/// Source of decoded panel images by sequence index.
pub trait PanelLookup {
    /// Number of panels in the sequence.
    fn len(&self) -> usize;

    /// True when the sequence is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Decoded panel at `index` (in `[0, len)`).
    fn panel(&mut self, index: usize) -> ArtResult<Arc<Surface>>;
}

/// Settings for composing one carousel background.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CarouselStyle {
    /// Canvas fill before any panel is drawn.
    pub background: Rgba8,
    /// RGB multiplier in `[0, 1]` for every panel except the focus.
    pub deselected_brightness: f32,
}

/// Compose the carousel background for `focus` on a render-resolution canvas.
pub fn compose_carousel(
    focus: usize,
    lookup: &mut dyn PanelLookup,
    geometry: &LayoutGeometry,
    style: &CarouselStyle,
) -> ArtResult<Surface> {
    if lookup.is_empty() {
        return Err(ArtError::validation("carousel needs at least one panel"));
    }
    if focus >= lookup.len() {
        return Err(ArtError::validation(format!(
            "focus index {focus} out of range for {} panels",
            lookup.len()
        )));
    }
    // Centering follows the focus image, which may differ from the sample panel.
    let focus_panel = lookup.panel(focus)?;
    let plan = plan_carousel(
        focus,
        lookup.len(),
        geometry.render_width,
        focus_panel.width(),
        geometry.pitch,
    )?;

    let mut canvas = Surface::filled(
        geometry.render_width,
        geometry.render_height,
        style.background,
    )?;
    for placement in &plan {
        let panel = if placement.slot == 0 {
            Arc::clone(&focus_panel)
        } else {
            lookup.panel(placement.index)?
        };
        if placement.dimmed && style.deselected_brightness < 1.0 {
            let mut dimmed = panel.as_ref().clone();
            dimmed.scale_brightness(style.deselected_brightness);
            canvas.draw_over(&dimmed, placement.x, 0)?;
        } else {
            canvas.draw_over(&panel, placement.x, 0)?;
        }
    }
    Ok(canvas)
}

#[cfg(test)]
#[path = "../../tests/unit/render/carousel.rs"]
mod tests;
