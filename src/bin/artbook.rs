use std::{fs::File, path::PathBuf, sync::Mutex};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(name = "artbook", version)]
struct Cli {
    /// Also write logs (without colors) to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render carousel art for every launcher folder.
    Folders(FoldersArgs),
    /// Fill scheme templates, render menu wallpapers and package the theme.
    Theme(ThemeArgs),
    /// Build glyph binaries for a font (requires `lv_font_conv`).
    FontBins(FontBinsArgs),
}

#[derive(Parser, Debug)]
struct FoldersArgs {
    /// Directory whose sub-folders are the categories.
    #[arg(long)]
    roms_dir: PathBuf,

    /// Output directory for `<folder>.png`.
    #[arg(long)]
    box_art_dir: PathBuf,

    /// Panel images, including `_default.png`.
    #[arg(long)]
    slides_dir: PathBuf,

    /// Platform icons, `<platform>.png`.
    #[arg(long)]
    logos_dir: PathBuf,

    /// Per-folder `core.cfg` tree.
    #[arg(long)]
    core_info_dir: PathBuf,

    /// JSON map from platform name to panel image.
    #[arg(long)]
    system_map: PathBuf,

    /// Valid platform names, one per line; enables mapping verification.
    #[arg(long)]
    valid_names: Option<PathBuf>,

    /// JSON list of `{pattern, platform}` overrides, checked in order.
    #[arg(long)]
    overrides: Option<PathBuf>,

    /// Font for text logos.
    #[arg(long)]
    font: PathBuf,

    #[arg(long)]
    screen_width: u32,

    #[arg(long)]
    screen_height: u32,

    #[arg(long, default_value = "#000000")]
    background_hex: artbook::Rgba8,

    /// Gap between panels in device pixels.
    #[arg(long, default_value_t = 7)]
    gap_between_slides: u32,

    #[arg(long, default_value_t = 0.5)]
    icon_height_percent: f64,

    #[arg(long, default_value_t = 0.7)]
    icon_width_percent: f64,

    /// RGB multiplier for unfocused panels.
    #[arg(long, default_value_t = 0.4)]
    deselected_brightness: f32,

    /// Shadow passes under the logo (0..=5).
    #[arg(long, default_value_t = 1)]
    shadow_strength: u32,

    /// Alpha at the top of the darkening gradient.
    #[arg(long, default_value_t = 235)]
    gradient_intensity: u8,
}

#[derive(Parser, Debug)]
struct ThemeArgs {
    /// Scheme template with `{token}` placeholders.
    #[arg(long)]
    template: PathBuf,

    /// Directory copied into the output before anything is generated.
    #[arg(long)]
    shell_dir: PathBuf,

    #[arg(long)]
    out_dir: PathBuf,

    /// Font for menu titles.
    #[arg(long)]
    font: PathBuf,

    #[arg(long)]
    screen_width: u32,

    #[arg(long)]
    screen_height: u32,

    #[arg(long, default_value = "#000000")]
    background_hex: artbook::Rgba8,

    #[arg(long, default_value = "#ffffff")]
    accent_hex: artbook::Rgba8,

    #[arg(long, default_value = "#ffffff")]
    text_hex: artbook::Rgba8,

    /// Zip the finished output directory to this path.
    #[arg(long)]
    archive: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct FontBinsArgs {
    /// Font file to convert.
    font: PathBuf,

    /// Directory for `<font>-<size>.bin`.
    out_dir: PathBuf,

    /// Pixel sizes as `min-max`.
    size_range: String,

    #[arg(long, default_value_t = 1)]
    step_size: u32,

    /// Unicode block list.
    #[arg(long, default_value = "ranges.txt")]
    ranges_file: PathBuf,

    /// Supported-range cache, keyed by font hash.
    #[arg(long, default_value = "font_ranges_cache.json")]
    cache_file: PathBuf,

    #[arg(long, default_value = "lv_font_conv")]
    lv_font_conv: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_ref())?;
    match cli.cmd {
        Command::Folders(args) => cmd_folders(args),
        Command::Theme(args) => cmd_theme(args),
        Command::FontBins(args) => cmd_font_bins(args),
    }
}

fn init_logging(log_file: Option<&PathBuf>) -> anyhow::Result<()> {
    let file_layer = match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("create log file '{}'", path.display()))?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .try_init()
        .context("install log subscriber")?;
    Ok(())
}

fn cmd_folders(args: FoldersArgs) -> anyhow::Result<()> {
    let settings = artbook::Settings {
        roms_dir: args.roms_dir,
        box_art_dir: args.box_art_dir,
        slides_dir: args.slides_dir,
        logos_dir: args.logos_dir,
        core_info_dir: args.core_info_dir,
        system_map: args.system_map,
        valid_names: args.valid_names,
        overrides: args.overrides,
        font: args.font,
        screen_width: args.screen_width,
        screen_height: args.screen_height,
        background: args.background_hex,
        gap_between_slides: args.gap_between_slides,
        icon_height_percent: args.icon_height_percent,
        icon_width_percent: args.icon_width_percent,
        deselected_brightness: args.deselected_brightness,
        shadow_strength: args.shadow_strength,
        gradient_intensity: args.gradient_intensity,
    };

    let mut pipeline = artbook::AssetPipeline::from_settings(&settings)?;
    std::fs::create_dir_all(&settings.box_art_dir).with_context(|| {
        format!(
            "create output dir '{}'",
            settings.box_art_dir.display()
        )
    })?;
    let report = pipeline.run(&settings.box_art_dir)?;
    if !report.failed.is_empty() {
        eprintln!(
            "{} of {} folders failed",
            report.failed.len(),
            pipeline.categories().len()
        );
    }
    Ok(())
}

fn cmd_theme(args: ThemeArgs) -> anyhow::Result<()> {
    let settings = artbook::ThemeSettings {
        template: args.template,
        shell_dir: args.shell_dir,
        out_dir: args.out_dir,
        font: args.font,
        screen_width: args.screen_width,
        screen_height: args.screen_height,
        background: args.background_hex,
        accent: args.accent_hex,
        text: args.text_hex,
        archive: args.archive,
    };
    settings.validate()?;

    let copied = artbook::copy_tree(&settings.shell_dir, &settings.out_dir)?;
    tracing::info!(files = copied, out = %settings.out_dir.display(), "copied theme shell");

    let geometry = artbook::SchemeGeometry::for_screen(settings.screen_width, settings.screen_height)?;
    let palette = artbook::SchemePalette::new(settings.background, settings.accent, settings.text);
    artbook::SchemeFiller::from_file(&settings.template, &geometry, &palette)?
        .write_all(&settings.out_dir)?;

    let style = artbook::LogoStyle::for_render_width(settings.screen_width, settings.text, 1);
    let mut logos =
        artbook::LogoLayoutEngine::new(artbook::FontRasterizer::from_file(&settings.font)?, style);
    artbook::write_menu_walls(
        &settings.out_dir,
        settings.screen_width,
        settings.screen_height,
        settings.background,
        &mut logos,
    )?;

    if let Some(archive) = &settings.archive {
        artbook::write_archive(&settings.out_dir, archive)?;
    }
    Ok(())
}

fn cmd_font_bins(args: FontBinsArgs) -> anyhow::Result<()> {
    let sizes = artbook::SizeRange::parse(&args.size_range, args.step_size)?;
    let blocks = artbook::load_blocks(&args.ranges_file)?;
    let mut cache = artbook::RangeCache::load(&args.cache_file)?;

    let mut conv = artbook::LvFontConv::new(&args.lv_font_conv);
    if !conv.is_available() {
        anyhow::bail!(
            "'{}' is not runnable; install lv_font_conv or pass --lv-font-conv",
            args.lv_font_conv.display()
        );
    }

    let ranges = artbook::supported_ranges(&mut conv, &args.font, &blocks, &mut cache)?;
    tracing::info!(supported = ranges.len(), total = blocks.len(), "supported ranges");
    let report = artbook::generate_font_bins(&mut conv, &args.font, &args.out_dir, sizes, &ranges)?;
    if !report.failed.is_empty() {
        eprintln!("failed sizes: {:?}", report.failed);
    }
    Ok(())
}
