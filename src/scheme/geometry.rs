//! Pixel constants of the launcher skin, derived from the screen size alone.
//!
//! Proportions are tuned against a 640x480 reference screen: a 480px-tall screen gets the
//! reference values exactly and other sizes scale from them.

use crate::foundation::{
    color::Rgba8,
    error::{ArtError, ArtResult},
    math::round_to_nearest_odd,
};

/// Reference screen height the proportions below are expressed against.
pub const REFERENCE_HEIGHT: u32 = 480;
/// Reference screen width for horizontal padding.
pub const REFERENCE_WIDTH: u32 = 640;

const HEADER_AT_REFERENCE: u32 = 44;
const FOOTER_AT_REFERENCE: u32 = 55;
const ITEMS_AT_REFERENCE: u32 = 9;
const PADDING_AT_REFERENCE: u32 = 10;
const PROGRESS_BAR_AT_REFERENCE: u32 = 8;

/// Layout constants for one screen resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SchemeGeometry {
    /// Screen width.
    pub screen_width: u32,
    /// Screen height.
    pub screen_height: u32,
    /// `floor(44 * h / 480)`.
    pub header_height: u32,
    /// `floor(55 * h / 480)`.
    pub footer_height: u32,
    /// Odd number of list rows: 9 at 480px, else `round_to_nearest_odd(9 * h / 480)`.
    pub content_item_count: u32,
    /// `h - header - footer`.
    pub content_height: u32,
    /// `floor(content_height / content_item_count)`.
    pub content_item_height: u32,
    /// `floor(10 * w / 640)`, at least 1.
    pub content_padding_left: u32,
    /// Width of list rows: `w - 2 * padding`.
    pub content_width: u32,
    /// `floor(0.75 * h)`.
    pub boot_text_y: u32,
    /// `floor(0.85 * h)`.
    pub progress_bar_y: u32,
    /// `max(1, ceil(8 * h / 480))`.
    pub progress_bar_height: u32,
    /// `floor(0.8 * w)`.
    pub progress_bar_width: u32,
    /// Left edge that centers the progress bar.
    pub progress_bar_x: u32,
}

impl SchemeGeometry {
    /// Compute every constant for a `width` x `height` screen.
    pub fn for_screen(width: u32, height: u32) -> ArtResult<Self> {
        if width == 0 || height == 0 {
            return Err(ArtError::invalid_geometry(format!(
                "scheme geometry needs a non-empty screen, got {width}x{height}"
            )));
        }
        let (w, h) = (u64::from(width), u64::from(height));
        let scale_h = |v: u32| (u64::from(v) * h / u64::from(REFERENCE_HEIGHT)) as u32;

        let header_height = scale_h(HEADER_AT_REFERENCE);
        let footer_height = scale_h(FOOTER_AT_REFERENCE);
        let content_item_count = if height == REFERENCE_HEIGHT {
            ITEMS_AT_REFERENCE
        } else {
            let raw = f64::from(ITEMS_AT_REFERENCE) * f64::from(height) / f64::from(REFERENCE_HEIGHT);
            u32::try_from(round_to_nearest_odd(raw).max(1))
                .map_err(|_| ArtError::invalid_geometry("content item count out of range"))?
        };
        let content_height = height - header_height - footer_height;
        let content_item_height = content_height / content_item_count;
        if content_item_height == 0 {
            return Err(ArtError::invalid_geometry(format!(
                "screen height {height} leaves no room for {content_item_count} list rows"
            )));
        }

        let content_padding_left =
            ((u64::from(PADDING_AT_REFERENCE) * w / u64::from(REFERENCE_WIDTH)) as u32).max(1);
        let content_width = width.saturating_sub(2 * content_padding_left);
        let progress_bar_width = (w * 4 / 5) as u32;

        Ok(Self {
            screen_width: width,
            screen_height: height,
            header_height,
            footer_height,
            content_item_count,
            content_height,
            content_item_height,
            content_padding_left,
            content_width,
            boot_text_y: (h * 3 / 4) as u32,
            progress_bar_y: (h * 85 / 100) as u32,
            progress_bar_height: (u64::from(PROGRESS_BAR_AT_REFERENCE) * h)
                .div_ceil(u64::from(REFERENCE_HEIGHT))
                .max(1) as u32,
            progress_bar_width,
            progress_bar_x: (width - progress_bar_width) / 2,
        })
    }
}

/// Theme colors plus the two highlight shades blended toward the accent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SchemePalette {
    /// Background color.
    pub base: Rgba8,
    /// Accent color.
    pub accent: Rgba8,
    /// Text color.
    pub text: Rgba8,
    /// Halfway from base to accent.
    pub blend_50: Rgba8,
    /// A quarter of the way from base to accent.
    pub blend_25: Rgba8,
}

impl SchemePalette {
    /// Palette for the given base, accent and text colors.
    pub fn new(base: Rgba8, accent: Rgba8, text: Rgba8) -> Self {
        Self {
            base,
            accent,
            text,
            blend_50: base.blend(accent, 0.5),
            blend_25: base.blend(accent, 0.25),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scheme/geometry.rs"]
mod tests;
