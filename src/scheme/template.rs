//! `{token}` scheme templates: discovery, per-screen value tables, validation and filling.
//!
//! Templates are treated as bytes. Only ASCII `{identifier}` runs are touched, so anything
//! else in the file passes through unchanged.

use std::{
    borrow::Cow,
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
};

use anyhow::Context;
use regex::bytes::{Captures, Regex};

use crate::{
    foundation::error::{ArtError, ArtResult},
    scheme::geometry::{SchemeGeometry, SchemePalette},
};

const TOKEN_PATTERN: &str = r"\{([A-Za-z_][A-Za-z0-9_]*)\}";

fn token_regex() -> ArtResult<Regex> {
    Regex::new(TOKEN_PATTERN)
        .map_err(|e| ArtError::validation(format!("token pattern failed to compile: {e}")))
}

/// Every distinct placeholder name in `template`, sorted.
pub fn scan_tokens(template: &[u8]) -> ArtResult<BTreeSet<String>> {
    let re = token_regex()?;
    Ok(re
        .captures_iter(template)
        .filter_map(|c| c.get(1))
        .map(|m| String::from_utf8_lossy(m.as_bytes()).into_owned())
        .collect())
}

/// Text alignment as the launcher encodes it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Alignment {
    /// 0
    Left,
    /// 1
    Centre,
    /// 2
    Right,
}

impl Alignment {
    /// Integer written into scheme files.
    pub fn value(self) -> u8 {
        match self {
            Self::Left => 0,
            Self::Centre => 1,
            Self::Right => 2,
        }
    }
}

/// Token name to substituted text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TokenTable {
    values: BTreeMap<String, String>,
}

impl TokenTable {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set or replace one value.
    pub fn set(&mut self, name: &str, value: impl ToString) {
        self.values.insert(name.to_string(), value.to_string());
    }

    /// Value of `name`, if set.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Whether `name` has a value.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Copy of `self` with every entry of `overrides` applied on top.
    pub fn overridden_by(&self, overrides: &TokenTable) -> TokenTable {
        let mut out = self.clone();
        for (k, v) in &overrides.values {
            out.values.insert(k.clone(), v.clone());
        }
        out
    }

    /// Names in `tokens` without a value, sorted.
    pub fn missing<'a>(&self, tokens: impl IntoIterator<Item = &'a String>) -> Vec<String> {
        tokens
            .into_iter()
            .filter(|t| !self.contains(t))
            .cloned()
            .collect()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when nothing is set.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Values shared by every output context.
pub fn default_table(geometry: &SchemeGeometry, palette: &SchemePalette) -> TokenTable {
    let g = geometry;
    let mut t = TokenTable::new();

    t.set("background_hex", palette.base.to_hex_rgb());
    t.set("accent_hex", palette.accent.to_hex_rgb());
    t.set("text_hex", palette.text.to_hex_rgb());
    t.set("highlight_hex", palette.blend_50.to_hex_rgb());
    t.set("highlight_soft_hex", palette.blend_25.to_hex_rgb());

    t.set("screen_width", g.screen_width);
    t.set("screen_height", g.screen_height);
    t.set("header_height", g.header_height);
    t.set("footer_height", g.footer_height);
    t.set("content_height", g.content_height);
    t.set("content_width", g.content_width);
    t.set("content_item_count", g.content_item_count);
    t.set("content_item_height", g.content_item_height);
    t.set("content_padding_left", g.content_padding_left);
    t.set("boot_text_y", g.boot_text_y);
    t.set("progress_bar_x", g.progress_bar_x);
    t.set("progress_bar_y", g.progress_bar_y);
    t.set("progress_bar_width", g.progress_bar_width);
    t.set("progress_bar_height", g.progress_bar_height);

    t.set("header_text_align", Alignment::Centre.value());
    t.set("content_text_align", Alignment::Left.value());
    t.set("footer_text_align", Alignment::Right.value());

    t.set("content_background_alpha", 255);
    t.set("content_image_alpha", 255);
    t.set("grid_enabled", 0);
    t.set("grid_columns", 0);
    t.set("grid_rows", 0);
    t.set("grid_cell_width", 0);
    t.set("grid_cell_height", 0);
    t.set("grid_location_x", 0);
    t.set("grid_location_y", 0);
    t
}

/// Launcher screens that get their own filled scheme file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SchemeContext {
    /// Baseline used by every screen without a dedicated file.
    Default,
    /// Main menu: one full-screen item at a time.
    Launch,
    /// Content browser, drawn as a text-only grid.
    Explore,
    /// Play history list.
    History,
    /// Favourites list.
    Favourite,
}

impl SchemeContext {
    /// Every context, in the order files are written.
    pub const ALL: [SchemeContext; 5] = [
        Self::Default,
        Self::Launch,
        Self::Explore,
        Self::History,
        Self::Favourite,
    ];

    /// File stem of the context's scheme file.
    pub fn name(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Launch => "muxlaunch",
            Self::Explore => "muxplore",
            Self::History => "muxhistory",
            Self::Favourite => "muxfavourite",
        }
    }

    /// Values this context changes relative to [`default_table`].
    pub fn overrides(self, g: &SchemeGeometry) -> TokenTable {
        let mut t = TokenTable::new();
        match self {
            Self::Default => {}
            Self::Launch => {
                t.set("content_item_count", 1);
                t.set("content_height", g.screen_height);
                t.set("content_item_height", g.screen_height);
                t.set("content_width", g.screen_width);
                t.set("content_padding_left", 0);
                t.set("content_text_align", Alignment::Centre.value());
                t.set("content_background_alpha", 0);
            }
            Self::Explore => {
                const COLUMNS: u32 = 4;
                const ROWS: u32 = 2;
                t.set("grid_enabled", 1);
                t.set("grid_columns", COLUMNS);
                t.set("grid_rows", ROWS);
                t.set("grid_cell_width", g.content_width / COLUMNS);
                t.set("grid_cell_height", g.content_height / ROWS);
                t.set("grid_location_x", g.content_padding_left);
                t.set("grid_location_y", g.header_height);
                t.set("content_item_count", COLUMNS * ROWS);
                t.set("content_text_align", Alignment::Centre.value());
                t.set("content_background_alpha", 0);
                t.set("content_image_alpha", 0);
            }
            Self::History | Self::Favourite => {
                t.set("content_width", g.screen_width / 2);
            }
        }
        t
    }
}

/// Replace every `{name}` whose name is in `table`; anything else is left as is.
pub fn substitute(template: &[u8], table: &TokenTable) -> ArtResult<Vec<u8>> {
    let re = token_regex()?;
    let out = re.replace_all(template, |caps: &Captures<'_>| -> Vec<u8> {
        let name = caps
            .get(1)
            .map(|m| String::from_utf8_lossy(m.as_bytes()))
            .unwrap_or(Cow::Borrowed(""));
        match table.get(&name) {
            Some(v) => v.as_bytes().to_vec(),
            None => caps[0].to_vec(),
        }
    });
    Ok(out.into_owned())
}

/// A template checked against the default table, ready to fill for any context.
#[derive(Clone, Debug)]
pub struct SchemeFiller {
    template: Vec<u8>,
    tokens: BTreeSet<String>,
    defaults: TokenTable,
    geometry: SchemeGeometry,
}

impl SchemeFiller {
    /// Scan `template` and fail with every token the default table cannot resolve.
    pub fn new(
        template: Vec<u8>,
        geometry: &SchemeGeometry,
        palette: &SchemePalette,
    ) -> ArtResult<Self> {
        let tokens = scan_tokens(&template)?;
        let defaults = default_table(geometry, palette);
        let missing = defaults.missing(&tokens);
        if !missing.is_empty() {
            return Err(ArtError::incomplete_template(missing));
        }
        Ok(Self {
            template,
            tokens,
            defaults,
            geometry: *geometry,
        })
    }

    /// Read the template at `path` and check it.
    pub fn from_file(
        path: &Path,
        geometry: &SchemeGeometry,
        palette: &SchemePalette,
    ) -> ArtResult<Self> {
        let template = std::fs::read(path)
            .with_context(|| format!("read scheme template '{}'", path.display()))?;
        Self::new(template, geometry, palette)
    }

    /// Placeholders the template uses.
    pub fn tokens(&self) -> &BTreeSet<String> {
        &self.tokens
    }

    /// Default values with `context`'s overrides applied.
    pub fn table_for(&self, context: SchemeContext) -> TokenTable {
        self.defaults
            .overridden_by(&context.overrides(&self.geometry))
    }

    /// Filled template bytes for `context`.
    pub fn fill(&self, context: SchemeContext) -> ArtResult<Vec<u8>> {
        substitute(&self.template, &self.table_for(context))
    }

    /// Write `<out_dir>/scheme/<context>.txt` for every context.
    #[tracing::instrument(skip(self), fields(tokens = self.tokens.len()))]
    pub fn write_all(&self, out_dir: &Path) -> ArtResult<Vec<PathBuf>> {
        let scheme_dir = out_dir.join("scheme");
        std::fs::create_dir_all(&scheme_dir)
            .with_context(|| format!("create scheme dir '{}'", scheme_dir.display()))?;

        let mut written = Vec::with_capacity(SchemeContext::ALL.len());
        for context in SchemeContext::ALL {
            let path = scheme_dir.join(format!("{}.txt", context.name()));
            std::fs::write(&path, self.fill(context)?)
                .with_context(|| format!("write scheme '{}'", path.display()))?;
            tracing::debug!(context = context.name(), path = %path.display(), "wrote scheme");
            written.push(path);
        }
        Ok(written)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scheme/template.rs"]
mod tests;
