//! Launcher folders and the platform each one belongs to.

use std::path::{Path, PathBuf};

use anyhow::Context;
use regex::Regex;
use serde::Deserialize;

use crate::foundation::error::{ArtError, ArtResult};
use crate::render::logo::DEFAULT_PLATFORM;

/// One launcher folder in carousel order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Category {
    /// Folder name as it appears on disk; also the display name.
    pub name: String,
    /// Platform identifier (`default` when unknown).
    pub platform: String,
    /// Position in the category sequence.
    pub ordinal: usize,
}

/// Sub-directories of `roms_dir` that are not hidden (`.`) or disabled (`_`), in byte order.
pub fn list_category_folders(roms_dir: &Path) -> ArtResult<Vec<String>> {
    let entries = std::fs::read_dir(roms_dir)
        .with_context(|| format!("list folders in '{}'", roms_dir.display()))?;

    let mut out = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("read entry in '{}'", roms_dir.display()))?;
        let Ok(name) = entry.file_name().into_string() else {
            tracing::warn!(path = %entry.path().display(), "skipping non-UTF-8 folder name");
            continue;
        };
        if name.starts_with('.') || name.starts_with('_') {
            continue;
        }
        if entry.path().is_dir() {
            out.push(name);
        }
    }
    out.sort_unstable();
    Ok(out)
}

/// Path of the association file for `folder`: `<core_info_dir>/<folder lowercased>/core.cfg`.
pub fn core_cfg_path(core_info_dir: &Path, folder: &str) -> PathBuf {
    core_info_dir.join(folder.to_lowercase()).join("core.cfg")
}

/// Platform named on the second line of the folder's `core.cfg`, or `default`.
pub fn read_core_platform(core_info_dir: &Path, folder: &str) -> ArtResult<String> {
    let path = core_cfg_path(core_info_dir, folder);
    if !path.is_file() {
        return Ok(DEFAULT_PLATFORM.to_string());
    }
    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("read core association '{}'", path.display()))?;
    Ok(text
        .lines()
        .nth(1)
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .unwrap_or(DEFAULT_PLATFORM)
        .to_string())
}

#[derive(Debug, Deserialize)]
struct OverrideEntry {
    pattern: String,
    platform: String,
}

/// Ordered folder-name patterns that force a platform; the first match wins.
#[derive(Clone, Debug, Default)]
pub struct PlatformOverrides {
    rules: Vec<(Regex, String)>,
}

impl PlatformOverrides {
    /// No overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule after the existing ones.
    pub fn push(&mut self, pattern: &str, platform: impl Into<String>) -> ArtResult<()> {
        let re = Regex::new(pattern).map_err(|e| {
            ArtError::validation(format!("invalid override pattern '{pattern}': {e}"))
        })?;
        self.rules.push((re, platform.into()));
        Ok(())
    }

    /// Parse a JSON list of `{"pattern": .., "platform": ..}` objects, keeping list order.
    pub fn from_json(json: &str) -> ArtResult<Self> {
        let entries: Vec<OverrideEntry> =
            serde_json::from_str(json).context("parse platform override list")?;
        let mut out = Self::new();
        for e in entries {
            out.push(&e.pattern, e.platform)?;
        }
        Ok(out)
    }

    /// Load [`Self::from_json`] from a file.
    pub fn load(path: &Path) -> ArtResult<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("read platform overrides '{}'", path.display()))?;
        Self::from_json(&json)
    }

    /// Platform of the first rule whose pattern matches `folder`.
    pub fn lookup(&self, folder: &str) -> Option<&str> {
        self.rules
            .iter()
            .find(|(re, _)| re.is_match(folder))
            .map(|(_, platform)| platform.as_str())
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True when there are no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Enumerate folders under `roms_dir` and resolve each one's platform.
pub fn load_categories(
    roms_dir: &Path,
    core_info_dir: &Path,
    overrides: &PlatformOverrides,
) -> ArtResult<Vec<Category>> {
    let folders = list_category_folders(roms_dir)?;
    let mut out = Vec::with_capacity(folders.len());
    for (ordinal, name) in folders.into_iter().enumerate() {
        let platform = match overrides.lookup(&name) {
            Some(p) => p.to_string(),
            None => read_core_platform(core_info_dir, &name)?,
        };
        out.push(Category {
            name,
            platform,
            ordinal,
        });
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/catalog/categories.rs"]
mod tests;
