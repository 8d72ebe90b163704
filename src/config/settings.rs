use std::path::{Path, PathBuf};

use crate::foundation::{
    color::Rgba8,
    error::{ArtError, ArtResult},
};

/// Largest accepted number of stacked shadow passes.
pub const MAX_SHADOW_STRENGTH: u32 = 5;

/// Everything one folder-art run needs, fixed at construction.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    /// Directory whose sub-folders are the categories.
    pub roms_dir: PathBuf,
    /// Output directory for `<folder>.png`.
    pub box_art_dir: PathBuf,
    /// Panel images, including `_default.png`.
    pub slides_dir: PathBuf,
    /// Platform icons, `<platform>.png`.
    pub logos_dir: PathBuf,
    /// Per-folder `core.cfg` tree.
    pub core_info_dir: PathBuf,
    /// Platform to panel image JSON map.
    pub system_map: PathBuf,
    /// Optional list of valid platform names for mapping verification.
    pub valid_names: Option<PathBuf>,
    /// Optional JSON list of ordered platform overrides.
    pub overrides: Option<PathBuf>,
    /// Font used for text logos.
    pub font: PathBuf,
    /// Device screen width.
    pub screen_width: u32,
    /// Device screen height.
    pub screen_height: u32,
    /// Canvas fill behind the panels.
    pub background: Rgba8,
    /// Gap between panels in device pixels.
    pub gap_between_slides: u32,
    /// Icon box height as a fraction of the screen height.
    pub icon_height_percent: f64,
    /// Icon box width as a fraction of the screen width.
    pub icon_width_percent: f64,
    /// RGB multiplier for unfocused panels.
    pub deselected_brightness: f32,
    /// Shadow passes under the logo.
    pub shadow_strength: u32,
    /// Alpha at the top of the darkening gradient.
    pub gradient_intensity: u8,
}

fn check_dir(path: &Path, what: &str) -> ArtResult<()> {
    if !path.is_dir() {
        return Err(ArtError::validation(format!(
            "{what} '{}' is not a directory",
            path.display()
        )));
    }
    Ok(())
}

fn check_file(path: &Path, what: &str) -> ArtResult<()> {
    if !path.is_file() {
        return Err(ArtError::validation(format!(
            "{what} '{}' is not a file",
            path.display()
        )));
    }
    Ok(())
}

fn check_screen(width: u32, height: u32) -> ArtResult<()> {
    if width == 0 || height == 0 {
        return Err(ArtError::validation(format!(
            "screen size must be non-zero, got {width}x{height}"
        )));
    }
    Ok(())
}

impl Settings {
    /// Reject degenerate values and missing inputs before anything is rendered.
    pub fn validate(&self) -> ArtResult<()> {
        check_screen(self.screen_width, self.screen_height)?;
        for (v, name) in [
            (self.icon_height_percent, "icon height percent"),
            (self.icon_width_percent, "icon width percent"),
        ] {
            if !(v.is_finite() && v > 0.0 && v <= 1.0) {
                return Err(ArtError::validation(format!(
                    "{name} must be in (0, 1], got {v}"
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.deselected_brightness) {
            return Err(ArtError::validation(format!(
                "deselected brightness must be in [0, 1], got {}",
                self.deselected_brightness
            )));
        }
        if self.shadow_strength > MAX_SHADOW_STRENGTH {
            return Err(ArtError::validation(format!(
                "shadow strength must be at most {MAX_SHADOW_STRENGTH}, got {}",
                self.shadow_strength
            )));
        }

        check_dir(&self.roms_dir, "roms dir")?;
        check_dir(&self.slides_dir, "slides dir")?;
        check_dir(&self.logos_dir, "logos dir")?;
        check_dir(&self.core_info_dir, "core info dir")?;
        check_file(&self.system_map, "system map")?;
        check_file(&self.font, "font")?;
        if let Some(p) = &self.valid_names {
            check_file(p, "valid names list")?;
        }
        if let Some(p) = &self.overrides {
            check_file(p, "platform overrides")?;
        }
        Ok(())
    }

    /// Icon box in device pixels (`screen * percent`), before the render multiplier.
    pub fn icon_box_screen(&self) -> (f64, f64) {
        (
            f64::from(self.screen_width) * self.icon_width_percent,
            f64::from(self.screen_height) * self.icon_height_percent,
        )
    }

    /// Log the resolved settings once at startup.
    pub fn log(&self) {
        let (icon_w, icon_h) = self.icon_box_screen();
        tracing::info!(
            roms_dir = %self.roms_dir.display(),
            box_art_dir = %self.box_art_dir.display(),
            slides_dir = %self.slides_dir.display(),
            logos_dir = %self.logos_dir.display(),
            core_info_dir = %self.core_info_dir.display(),
            font = %self.font.display(),
            "folder art inputs"
        );
        tracing::info!(
            screen = %format!("{}x{}", self.screen_width, self.screen_height),
            background = %self.background.to_hex_rgb(),
            gap = self.gap_between_slides,
            icon_max_w = icon_w,
            icon_max_h = icon_h,
            deselected_brightness = self.deselected_brightness,
            shadow_strength = self.shadow_strength,
            gradient_intensity = self.gradient_intensity,
            "folder art style"
        );
    }
}

/// Inputs of one theme build: scheme filling, menu rasters and packaging.
#[derive(Clone, Debug, PartialEq)]
pub struct ThemeSettings {
    /// Scheme template with `{token}` placeholders.
    pub template: PathBuf,
    /// Directory copied verbatim into the output before anything is written.
    pub shell_dir: PathBuf,
    /// Theme output directory.
    pub out_dir: PathBuf,
    /// Font for menu titles.
    pub font: PathBuf,
    /// Device screen width.
    pub screen_width: u32,
    /// Device screen height.
    pub screen_height: u32,
    /// Base background color.
    pub background: Rgba8,
    /// Accent color that highlights blend toward.
    pub accent: Rgba8,
    /// Text color.
    pub text: Rgba8,
    /// Zip the output directory to this path when set.
    pub archive: Option<PathBuf>,
}

impl ThemeSettings {
    /// Reject degenerate values and missing inputs.
    pub fn validate(&self) -> ArtResult<()> {
        check_screen(self.screen_width, self.screen_height)?;
        check_file(&self.template, "scheme template")?;
        check_dir(&self.shell_dir, "theme shell dir")?;
        check_file(&self.font, "font")?;
        if self.out_dir.starts_with(&self.shell_dir) {
            return Err(ArtError::validation(format!(
                "output dir '{}' must not be inside the theme shell dir '{}'",
                self.out_dir.display(),
                self.shell_dir.display()
            )));
        }
        if let Some(archive) = &self.archive
            && archive.starts_with(&self.out_dir)
        {
            return Err(ArtError::validation(format!(
                "archive '{}' must not be inside the output dir '{}'",
                archive.display(),
                self.out_dir.display()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/settings.rs"]
mod tests;
