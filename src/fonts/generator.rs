//! Bitmap font binaries built by an external converter, limited to the Unicode blocks the font
//! actually covers.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use anyhow::Context;

use crate::{
    fonts::{
        cache::{CacheEntry, RangeCache, font_hash},
        ranges::{UnicodeBlock, range_key_start},
    },
    foundation::error::{ArtError, ArtResult},
};

/// Pixel size used when probing whether a font covers a range.
pub const PROBE_SIZE_PX: u32 = 20;

/// Something that turns a font, a pixel size and Unicode ranges into a glyph blob file.
pub trait GlyphBlobGenerator {
    /// Write the blob for `ranges` (`0xXXXX-0xYYYY` keys) at `size_px` to `out`.
    fn generate(
        &mut self,
        font: &Path,
        size_px: u32,
        ranges: &[String],
        out: &Path,
    ) -> ArtResult<()>;
}

/// [`GlyphBlobGenerator`] backed by the `lv_font_conv` command line tool.
#[derive(Clone, Debug)]
pub struct LvFontConv {
    binary: PathBuf,
}

impl LvFontConv {
    /// Use the converter at `binary` (a bare name is looked up on `PATH`).
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Whether `<binary> --help` runs and exits successfully.
    pub fn is_available(&self) -> bool {
        Command::new(&self.binary)
            .arg("--help")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    fn command(&self, font: &Path, size_px: u32, ranges: &[String], out: &Path) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.args(["--bpp", "4", "--size"])
            .arg(size_px.to_string())
            .arg("--font")
            .arg(font)
            .arg("-r")
            .arg(ranges.join(","))
            .args(["--format", "bin", "--no-compress", "--no-prefilter", "-o"])
            .arg(out)
            .stdin(Stdio::null());
        cmd
    }
}

impl GlyphBlobGenerator for LvFontConv {
    fn generate(
        &mut self,
        font: &Path,
        size_px: u32,
        ranges: &[String],
        out: &Path,
    ) -> ArtResult<()> {
        let output = self
            .command(font, size_px, ranges, out)
            .output()
            .map_err(|e| {
                ArtError::external_tool(format!(
                    "failed to run '{}': {e}",
                    self.binary.display()
                ))
            })?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ArtError::external_tool(format!(
                "{} exited with status {}: {}",
                self.binary.display(),
                output.status,
                stderr.trim()
            )));
        }
        Ok(())
    }
}

/// Probe every block once; blocks the generator rejects are logged and left out.
pub fn probe_supported_ranges(
    generator: &mut dyn GlyphBlobGenerator,
    font: &Path,
    blocks: &[UnicodeBlock],
    scratch: &Path,
) -> BTreeMap<String, String> {
    let mut supported = BTreeMap::new();
    for block in blocks {
        let key = block.key();
        match generator.generate(font, PROBE_SIZE_PX, std::slice::from_ref(&key), scratch) {
            Ok(()) => {
                supported.insert(key, block.name.clone());
            }
            Err(e) => {
                tracing::info!(range = %key, block = %block.name, error = %e, "range unsupported");
            }
        }
    }
    std::fs::remove_file(scratch).ok();
    supported
}

/// Supported ranges of `font`, from `cache` when the font's content hash is known, otherwise
/// probed and stored back.
pub fn supported_ranges(
    generator: &mut dyn GlyphBlobGenerator,
    font: &Path,
    blocks: &[UnicodeBlock],
    cache: &mut RangeCache,
) -> ArtResult<BTreeMap<String, String>> {
    let hash = font_hash(font)?;
    if let Some(entry) = cache.get(&hash) {
        tracing::info!(font = %font.display(), "using cached ranges");
        return Ok(entry.supported_ranges.clone());
    }

    tracing::info!(font = %font.display(), blocks = blocks.len(), "probing supported ranges");
    let scratch = std::env::temp_dir().join(format!("artbook-probe-{}.bin", std::process::id()));
    let supported = probe_supported_ranges(generator, font, blocks, &scratch);
    cache.insert(
        hash,
        CacheEntry {
            font_name: font
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            supported_ranges: supported.clone(),
        },
    );
    cache.save()?;
    Ok(supported)
}

/// Inclusive pixel sizes `min..=max` visited every `step`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SizeRange {
    /// First size.
    pub min: u32,
    /// Last size, inclusive.
    pub max: u32,
    /// Increment, at least 1.
    pub step: u32,
}

impl SizeRange {
    /// Parse `min-max`.
    pub fn parse(text: &str, step: u32) -> ArtResult<Self> {
        let bad = || ArtError::validation(format!("size range must look like 'min-max', got '{text}'"));
        let (min, max) = text.split_once('-').ok_or_else(bad)?;
        let min: u32 = min.trim().parse().map_err(|_| bad())?;
        let max: u32 = max.trim().parse().map_err(|_| bad())?;
        if min > max {
            return Err(ArtError::validation(format!(
                "size range min {min} is greater than max {max}"
            )));
        }
        if step == 0 {
            return Err(ArtError::validation("size step must be at least 1"));
        }
        Ok(Self { min, max, step })
    }

    /// Sizes in order.
    pub fn sizes(self) -> impl Iterator<Item = u32> {
        (self.min..=self.max).step_by(self.step as usize)
    }
}

/// Outcome of [`generate_font_bins`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FontBinReport {
    /// Blobs written.
    pub written: Vec<PathBuf>,
    /// Sizes the generator failed on.
    pub failed: Vec<u32>,
}

/// Write `<out_dir>/<font stem>-<size>.bin` for every size, using only `ranges`.
/// A failing size is logged and skipped.
pub fn generate_font_bins(
    generator: &mut dyn GlyphBlobGenerator,
    font: &Path,
    out_dir: &Path,
    sizes: SizeRange,
    ranges: &BTreeMap<String, String>,
) -> ArtResult<FontBinReport> {
    if ranges.is_empty() {
        return Err(ArtError::validation(format!(
            "font '{}' supports none of the requested ranges",
            font.display()
        )));
    }
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("create font output dir '{}'", out_dir.display()))?;

    let mut keys: Vec<String> = ranges.keys().cloned().collect();
    keys.sort_by_key(|k| range_key_start(k).unwrap_or(u32::MAX));
    let stem = font
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "font".to_string());

    let mut report = FontBinReport::default();
    for size in sizes.sizes() {
        let out = out_dir.join(format!("{stem}-{size}.bin"));
        match generator.generate(font, size, &keys, &out) {
            Ok(()) => {
                tracing::info!(size, path = %out.display(), "generated font binary");
                report.written.push(out);
            }
            Err(e) => {
                tracing::error!(size, error = %e, "failed to generate font binary");
                report.failed.push(size);
            }
        }
    }
    Ok(report)
}

#[cfg(test)]
#[path = "../../tests/unit/fonts/generator.rs"]
mod tests;
