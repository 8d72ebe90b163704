use std::path::Path;

use anyhow::Context;
use regex::Regex;

use crate::foundation::error::{ArtError, ArtResult};

const ROW_MARKER: &str = "{{Unicode blocks/row";

/// One named Unicode block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnicodeBlock {
    /// First code point.
    pub start: u32,
    /// Last code point, inclusive.
    pub end: u32,
    /// Block name, e.g. `Basic Latin`.
    pub name: String,
}

impl UnicodeBlock {
    /// Range argument form: `0xXXXX-0xYYYY` (at least four upper-case hex digits).
    pub fn key(&self) -> String {
        range_key(self.start, self.end)
    }
}

/// `0x{start:04X}-0x{end:04X}`.
pub fn range_key(start: u32, end: u32) -> String {
    format!("0x{start:04X}-0x{end:04X}")
}

/// Start code point of a [`range_key`] string.
pub fn range_key_start(key: &str) -> Option<u32> {
    let (start, _) = key.split_once('-')?;
    u32::from_str_radix(start.strip_prefix("0x")?, 16).ok()
}

/// Parse a wiki-markup block table: every `{{Unicode blocks/row` section carrying both a
/// `range=U+XXXX..U+YYYY` and a `name=[[...` field becomes one block. Sections missing either
/// are skipped; a repeated range keeps its first position and the latest name.
pub fn parse_blocks(text: &str) -> ArtResult<Vec<UnicodeBlock>> {
    let range_re = Regex::new(r"range=U\+([0-9A-F]+)\.\.U\+([0-9A-F]+)")
        .map_err(|e| ArtError::validation(format!("range pattern: {e}")))?;
    let name_re = Regex::new(r"name=\[\[([^|\]]+)")
        .map_err(|e| ArtError::validation(format!("name pattern: {e}")))?;

    let mut out: Vec<UnicodeBlock> = Vec::new();
    for section in text.split(ROW_MARKER) {
        let (Some(range), Some(name)) = (range_re.captures(section), name_re.captures(section))
        else {
            continue;
        };
        let parse = |i: usize| u32::from_str_radix(&range[i], 16);
        let (Ok(start), Ok(end)) = (parse(1), parse(2)) else {
            tracing::warn!(range = &range[0], "skipping unparsable block range");
            continue;
        };
        let block = UnicodeBlock {
            start,
            end,
            name: name[1].to_string(),
        };
        match out.iter_mut().find(|b| b.start == start && b.end == end) {
            Some(existing) => existing.name = block.name,
            None => out.push(block),
        }
    }
    Ok(out)
}

/// Read and parse a block table file.
pub fn load_blocks(path: &Path) -> ArtResult<Vec<UnicodeBlock>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read unicode ranges '{}'", path.display()))?;
    parse_blocks(&text)
}

#[cfg(test)]
#[path = "../../tests/unit/fonts/ranges.rs"]
mod tests;
