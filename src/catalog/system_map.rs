use std::{
    collections::{BTreeMap, BTreeSet},
    path::Path,
};

use anyhow::Context;

use crate::foundation::error::{ArtError, ArtResult};

/// Platform identifier to panel image file name (e.g. `"Nintendo SNES-SFC" -> "snes.png"`).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SystemMap {
    entries: BTreeMap<String, String>,
}

impl SystemMap {
    /// Parse a flat JSON object of string values.
    pub fn from_json(json: &str) -> ArtResult<Self> {
        let entries: BTreeMap<String, String> =
            serde_json::from_str(json).context("parse system map")?;
        Ok(Self { entries })
    }

    /// Read and parse a system map file.
    pub fn load(path: &Path) -> ArtResult<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("read system map '{}'", path.display()))?;
        Self::from_json(&json).map_err(|e| match e {
            ArtError::Other(err) => {
                err.context(format!("in '{}'", path.display())).into()
            }
            other => other,
        })
    }

    /// Panel image file name for `platform`.
    pub fn image_for(&self, platform: &str) -> Option<&str> {
        self.entries.get(platform).map(String::as_str)
    }

    /// Entries sorted by platform.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of mapped platforms.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is mapped.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, String)> for SystemMap {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Platform names one per line, blank lines ignored.
pub fn load_valid_names(path: &Path) -> ArtResult<Vec<String>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read valid platform names '{}'", path.display()))?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect())
}

/// A problem found while cross-checking the map, the name list and the slides directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MappingIssue {
    /// A valid platform with no map entry.
    Unmapped(String),
    /// A map key that is not a valid platform name.
    UnknownPlatform(String),
    /// A mapped image missing from the slides directory.
    MissingSlide {
        /// Map key.
        platform: String,
        /// Image file the key points at.
        image: String,
    },
}

impl std::fmt::Display for MappingIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unmapped(p) => write!(f, "no mapping for platform '{p}'"),
            Self::UnknownPlatform(p) => write!(f, "mapped platform '{p}' is not a valid name"),
            Self::MissingSlide { platform, image } => {
                write!(f, "slide '{image}' for platform '{platform}' not found")
            }
        }
    }
}

/// Every issue between `map`, `valid_names` and the files in `slides_dir`. Nothing is fatal;
/// each issue is logged as a warning and returned.
pub fn verify_mapping(
    map: &SystemMap,
    valid_names: &[String],
    slides_dir: &Path,
) -> ArtResult<Vec<MappingIssue>> {
    let slides: BTreeSet<String> = std::fs::read_dir(slides_dir)
        .with_context(|| format!("list slides in '{}'", slides_dir.display()))?
        .filter_map(|e| e.ok())
        .filter_map(|e| e.file_name().into_string().ok())
        .collect();
    let valid: BTreeSet<&str> = valid_names.iter().map(String::as_str).collect();

    let mut issues = Vec::new();
    for name in valid_names {
        if map.image_for(name).is_none() {
            issues.push(MappingIssue::Unmapped(name.clone()));
        }
    }
    for (platform, image) in map.iter() {
        if !valid.contains(platform) {
            issues.push(MappingIssue::UnknownPlatform(platform.to_string()));
        }
        if !slides.contains(image) {
            issues.push(MappingIssue::MissingSlide {
                platform: platform.to_string(),
                image: image.to_string(),
            });
        }
    }

    for issue in &issues {
        tracing::warn!(%issue, "system map check");
    }
    if issues.is_empty() {
        tracing::info!(platforms = map.len(), "system map covers every platform");
    }
    Ok(issues)
}

#[cfg(test)]
#[path = "../../tests/unit/catalog/system_map.rs"]
mod tests;
