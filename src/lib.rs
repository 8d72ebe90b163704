//! artbook renders the artwork of a carousel-style launcher theme.
//!
//! Three independent jobs share one imaging core:
//!
//! 1. **Folder art**: for every launcher folder, compose a horizontally scrolling carousel of
//!    panel images around that folder, darken it with a gradient, draw the folder's title art
//!    (platform icon or word-wrapped text) with a drop shadow, and downsample to the device
//!    resolution.
//! 2. **Theme build**: derive skin geometry from the screen size, fill `{token}` scheme
//!    templates for every launcher screen, render the fixed menu wallpapers and package the
//!    result as a zip archive.
//! 3. **Font binaries**: probe which Unicode blocks a font covers (cached by content hash) and
//!    drive an external converter to produce one glyph blob per pixel size.
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Premultiplied RGBA8** surfaces throughout; straight alpha only at PNG boundaries.
//! - **Sequential**: categories render one after another; a failing category is logged and
//!   skipped while global setup errors stop the run.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod catalog;
mod config;
mod fonts;
mod foundation;
mod package;
mod raster;
mod render;
mod scheme;

pub use catalog::categories::{
    Category, PlatformOverrides, core_cfg_path, list_category_folders, load_categories,
    read_core_platform,
};
pub use catalog::panels::{DEFAULT_PANEL, FsPanelLookup, PanelSet, resolve_panel};
pub use catalog::system_map::{MappingIssue, SystemMap, load_valid_names, verify_mapping};
pub use config::settings::{MAX_SHADOW_STRENGTH, Settings, ThemeSettings};
pub use fonts::cache::{CacheEntry, RangeCache, font_hash, sha256_hex};
pub use fonts::generator::{
    FontBinReport, GlyphBlobGenerator, LvFontConv, PROBE_SIZE_PX, SizeRange, generate_font_bins,
    probe_supported_ranges, supported_ranges,
};
pub use fonts::ranges::{UnicodeBlock, load_blocks, parse_blocks, range_key, range_key_start};
pub use foundation::color::{Rgba8, premul_rgba8, unpremul_rgba8};
pub use foundation::error::{ArtError, ArtResult, AssetKind};
pub use foundation::math::{ceil_div, round_to_nearest_odd, wrap_index};
pub use package::archive::{copy_tree, entry_name, list_files, write_archive};
pub use raster::blur::{gaussian_blur, radius_for_sigma};
pub use raster::composite::{PremulRgba8, over, over_row};
pub use raster::decode::{decode_image, load_surface, surface_from_rgba};
pub use raster::surface::Surface;
pub use render::carousel::{
    CarouselStyle, LayoutGeometry, PANEL_ALPHA_THRESHOLD, PanelLookup, Placement,
    compose_carousel, measure_real_panel_width, plan_carousel,
};
pub use render::gradient::{GradientCache, GradientSpec, generate_gradient};
pub use render::logo::{
    DEFAULT_PLATFORM, LogoBox, LogoLayoutEngine, LogoSpec, LogoStyle, TextBlock, TextLine,
    compose_with_shadow, estimate_max_chars, fit_icon, layout_text_block, render_text_block,
    wrap_words,
};
pub use render::pipeline::{
    AssetPipeline, GRADIENT_FRACTION, MENU_GRADIENT_INTENSITY, MENU_WALLS, PipelineOptions,
    RunReport, darkening_gradient, render_menu_wall, write_menu_walls,
};
pub use render::text::{FontRasterizer, TextRasterizer};
pub use scheme::geometry::{REFERENCE_HEIGHT, REFERENCE_WIDTH, SchemeGeometry, SchemePalette};
pub use scheme::template::{
    Alignment, SchemeContext, SchemeFiller, TokenTable, default_table, scan_tokens, substitute,
};
