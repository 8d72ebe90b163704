use std::path::{Path, PathBuf};

use crate::{
    catalog::{
        categories::{Category, PlatformOverrides, load_categories},
        panels::{DEFAULT_PANEL, FsPanelLookup, PanelSet},
        system_map::{SystemMap, load_valid_names, verify_mapping},
    },
    config::settings::Settings,
    foundation::{
        color::Rgba8,
        error::{ArtError, ArtResult, AssetKind},
    },
    raster::{decode, surface::Surface},
    render::{
        carousel::{CarouselStyle, LayoutGeometry, PanelLookup, compose_carousel},
        gradient::{GradientCache, GradientSpec, generate_gradient},
        logo::{LogoBox, LogoLayoutEngine, LogoSpec, LogoStyle},
        text::{FontRasterizer, TextRasterizer},
    },
};

/// Fraction of the height the darkening gradient fades over.
pub const GRADIENT_FRACTION: f32 = 0.75;

/// Alpha at the top of the menu wallpaper gradient.
pub const MENU_GRADIENT_INTENSITY: u8 = 235;

/// Fixed-name menu wallpapers and the title drawn on each.
pub const MENU_WALLS: [(&str, &str); 4] = [
    ("muxlaunch", "Main Menu"),
    ("muxapp", "Applications"),
    ("muxconfig", "Configuration"),
    ("muxinfo", "Information"),
];

/// The darkening overlay: `(0,0,0,intensity)` at the top fading to transparent.
pub fn darkening_gradient(width: u32, height: u32, intensity: u8) -> GradientSpec {
    GradientSpec {
        width,
        height,
        start: Rgba8::rgba(0, 0, 0, intensity),
        end: Rgba8::TRANSPARENT,
        fraction: GRADIENT_FRACTION,
    }
}

/// Per-run knobs of the folder art pipeline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PipelineOptions {
    /// Background fill and dimming of unfocused panels.
    pub carousel: CarouselStyle,
    /// Alpha at the top of the darkening gradient.
    pub gradient_intensity: u8,
    /// Logo box in device pixels; scaled by the render multiplier before use.
    pub icon_box_screen: (f64, f64),
}

/// Outcome of a batch run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Written images, in category order.
    pub rendered: Vec<PathBuf>,
    /// Categories that failed, with the error message.
    pub failed: Vec<(String, String)>,
}

/// Renders the carousel art of every category at the device resolution.
pub struct AssetPipeline<P, R> {
    categories: Vec<Category>,
    panels: P,
    logos: LogoLayoutEngine<R>,
    gradients: GradientCache,
    geometry: LayoutGeometry,
    options: PipelineOptions,
    logos_dir: PathBuf,
}

impl AssetPipeline<FsPanelLookup, FontRasterizer> {
    /// Load catalogs, sample geometry and the font described by `settings`.
    pub fn from_settings(settings: &Settings) -> ArtResult<Self> {
        settings.validate()?;
        settings.log();

        let map = SystemMap::load(&settings.system_map)?;
        if let Some(path) = &settings.valid_names {
            let names = load_valid_names(path)?;
            let issues = verify_mapping(&map, &names, &settings.slides_dir)?;
            if !issues.is_empty() {
                tracing::warn!(count = issues.len(), "system map has problems");
            }
        }
        let overrides = match &settings.overrides {
            Some(path) => PlatformOverrides::load(path)?,
            None => PlatformOverrides::new(),
        };

        let categories = load_categories(&settings.roms_dir, &settings.core_info_dir, &overrides)?;
        for c in &categories {
            tracing::info!(folder = %c.name, platform = %c.platform, "folder association");
        }

        let sample = decode::load_surface(&settings.slides_dir.join(DEFAULT_PANEL), AssetKind::Panel)?;
        let geometry = LayoutGeometry::from_sample(
            settings.screen_width,
            settings.screen_height,
            &sample,
            settings.gap_between_slides,
        )?;
        tracing::info!(
            render = %format!("{}x{}", geometry.render_width, geometry.render_height),
            multiplier = geometry.render_multiplier,
            pitch = geometry.pitch,
            panels_per_screen = geometry.panels_per_screen,
            "carousel geometry"
        );

        let panels = FsPanelLookup::new(PanelSet::resolve(&settings.slides_dir, &categories, &map));
        let style = LogoStyle::for_render_width(
            geometry.render_width,
            Rgba8::WHITE,
            settings.shadow_strength,
        );
        let logos = LogoLayoutEngine::new(FontRasterizer::from_file(&settings.font)?, style);

        Ok(Self::new(
            categories,
            panels,
            logos,
            geometry,
            PipelineOptions {
                carousel: CarouselStyle {
                    background: settings.background,
                    deselected_brightness: settings.deselected_brightness,
                },
                gradient_intensity: settings.gradient_intensity,
                icon_box_screen: settings.icon_box_screen(),
            },
            settings.logos_dir.clone(),
        ))
    }
}

impl<P: PanelLookup, R: TextRasterizer> AssetPipeline<P, R> {
    /// Assemble a pipeline from already-loaded parts.
    pub fn new(
        categories: Vec<Category>,
        panels: P,
        logos: LogoLayoutEngine<R>,
        geometry: LayoutGeometry,
        options: PipelineOptions,
        logos_dir: PathBuf,
    ) -> Self {
        Self {
            categories,
            panels,
            logos,
            gradients: GradientCache::new(),
            geometry,
            options,
            logos_dir,
        }
    }

    /// Categories in carousel order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Geometry every render uses.
    pub fn geometry(&self) -> &LayoutGeometry {
        &self.geometry
    }

    /// Logo box in render-space pixels.
    pub fn logo_box(&self) -> LogoBox {
        let (w, h) = self.options.icon_box_screen;
        LogoBox {
            max_width: w * self.geometry.render_multiplier,
            max_height: h * self.geometry.render_multiplier,
        }
    }

    /// Background, gradient and logo for category `focus`, at render resolution.
    pub fn compose_category(&mut self, focus: usize) -> ArtResult<Surface> {
        let category = self.categories.get(focus).ok_or_else(|| {
            ArtError::validation(format!(
                "category index {focus} out of range for {} categories",
                self.categories.len()
            ))
        })?;
        let logo_spec = LogoSpec::resolve(&category.name, &category.platform, &self.logos_dir);
        let bbox = self.logo_box();

        let g = &self.geometry;
        let mut canvas = compose_carousel(focus, &mut self.panels, g, &self.options.carousel)?;

        let gradient = self.gradients.get_or_generate(&darkening_gradient(
            g.render_width,
            g.render_height,
            self.options.gradient_intensity,
        ))?;
        canvas.draw_over(&gradient, 0, 0)?;

        let logo = self
            .logos
            .render(&logo_spec, &bbox, g.render_width, g.render_height)?;
        canvas.draw_over(&logo, 0, 0)?;
        Ok(canvas)
    }

    /// [`Self::compose_category`] downsampled to the device resolution.
    #[tracing::instrument(skip(self))]
    pub fn render_category(&mut self, focus: usize) -> ArtResult<Surface> {
        let canvas = self.compose_category(focus)?;
        canvas.resized(self.geometry.screen_width, self.geometry.screen_height)
    }

    /// Render every category to `<out_dir>/<folder>.png`. A failing category is logged and
    /// recorded; the rest still render.
    pub fn run(&mut self, out_dir: &Path) -> ArtResult<RunReport> {
        let mut report = RunReport::default();
        for focus in 0..self.categories.len() {
            let name = self.categories[focus].name.clone();
            let out = out_dir.join(format!("{name}.png"));
            match self
                .render_category(focus)
                .and_then(|img| img.save_png(&out))
            {
                Ok(()) => {
                    tracing::info!(folder = %name, path = %out.display(), "generated folder image");
                    report.rendered.push(out);
                }
                Err(e) => {
                    tracing::error!(folder = %name, error = %e, "failed to generate folder image");
                    report.failed.push((name, e.to_string()));
                }
            }
        }
        tracing::info!(
            rendered = report.rendered.len(),
            failed = report.failed.len(),
            "folder art done"
        );
        Ok(report)
    }
}

/// Background, gradient and a shadowed title for one menu, at screen resolution.
pub fn render_menu_wall<R: TextRasterizer>(
    title: &str,
    width: u32,
    height: u32,
    background: Rgba8,
    logos: &mut LogoLayoutEngine<R>,
) -> ArtResult<Surface> {
    let mut canvas = Surface::filled(width, height, background)?;
    let gradient = generate_gradient(&darkening_gradient(
        width,
        height,
        MENU_GRADIENT_INTENSITY,
    ))?;
    canvas.draw_over(&gradient, 0, 0)?;

    let bbox = LogoBox {
        max_width: f64::from(width) * 0.7,
        max_height: f64::from(height) * 0.5,
    };
    let spec = LogoSpec::Text {
        text: title.to_string(),
    };
    let logo = logos.render(&spec, &bbox, width, height)?;
    canvas.draw_over(&logo, 0, 0)?;
    Ok(canvas)
}

/// Write every [`MENU_WALLS`] entry to `<out_dir>/image/wall/<name>.png`.
pub fn write_menu_walls<R: TextRasterizer>(
    out_dir: &Path,
    width: u32,
    height: u32,
    background: Rgba8,
    logos: &mut LogoLayoutEngine<R>,
) -> ArtResult<Vec<PathBuf>> {
    let wall_dir = out_dir.join("image").join("wall");
    let mut written = Vec::with_capacity(MENU_WALLS.len());
    for (name, title) in MENU_WALLS {
        let path = wall_dir.join(format!("{name}.png"));
        render_menu_wall(title, width, height, background, logos)?.save_png(&path)?;
        tracing::debug!(menu = name, path = %path.display(), "wrote menu wallpaper");
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
