use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use sha2::Digest as _;

use crate::foundation::error::ArtResult;

/// What is known about one font file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// File name the font had when it was probed.
    pub font_name: String,
    /// Supported range key (`0xXXXX-0xYYYY`) to block name.
    pub supported_ranges: BTreeMap<String, String>,
}

/// Lowercase hex SHA-256 of `bytes`.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let digest = sha2::Sha256::digest(bytes);
    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest {
        out.push_str(&format!("{b:02x}"));
    }
    out
}

/// SHA-256 of the file at `path`.
pub fn font_hash(path: &Path) -> ArtResult<String> {
    let bytes = std::fs::read(path).with_context(|| format!("read font '{}'", path.display()))?;
    Ok(sha256_hex(&bytes))
}

/// JSON file mapping font content hashes to their probed ranges.
#[derive(Debug)]
pub struct RangeCache {
    path: PathBuf,
    entries: BTreeMap<String, CacheEntry>,
}

impl RangeCache {
    /// Load the cache at `path`; a missing file is an empty cache.
    pub fn load(path: &Path) -> ArtResult<Self> {
        let entries = if path.is_file() {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("read range cache '{}'", path.display()))?;
            serde_json::from_str(&json)
                .with_context(|| format!("parse range cache '{}'", path.display()))?
        } else {
            BTreeMap::new()
        };
        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }

    /// Entry for a font hash.
    pub fn get(&self, hash: &str) -> Option<&CacheEntry> {
        self.entries.get(hash)
    }

    /// Insert or replace the entry for `hash`.
    pub fn insert(&mut self, hash: String, entry: CacheEntry) {
        self.entries.insert(hash, entry);
    }

    /// Number of fonts cached.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no font is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write the cache back to the file it was loaded from.
    pub fn save(&self) -> ArtResult<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create cache dir '{}'", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(&self.entries).context("serialize range cache")?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("write range cache '{}'", self.path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/fonts/cache.rs"]
mod tests;
