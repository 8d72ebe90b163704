use std::{
    collections::{HashMap, VecDeque},
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::{
    catalog::{categories::Category, system_map::SystemMap},
    foundation::error::{ArtError, ArtResult, AssetKind},
    raster::{decode, surface::Surface},
    render::carousel::PanelLookup,
};

/// Sample panel every unmapped category falls back to; also the geometry reference.
pub const DEFAULT_PANEL: &str = "_default.png";

/// Panel image for `category`: `<name>.png`, then `auto-<name>.png`, then the system map entry
/// for the category's own platform, then [`DEFAULT_PANEL`].
pub fn resolve_panel(slides_dir: &Path, category: &Category, map: &SystemMap) -> PathBuf {
    for candidate in [
        format!("{}.png", category.name),
        format!("auto-{}.png", category.name),
    ] {
        let path = slides_dir.join(candidate);
        if path.is_file() {
            return path;
        }
    }
    slides_dir.join(map.image_for(&category.platform).unwrap_or(DEFAULT_PANEL))
}

/// Resolved panel image per category, in category order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PanelSet {
    paths: Vec<PathBuf>,
}

impl PanelSet {
    /// Resolve every category once.
    pub fn resolve(slides_dir: &Path, categories: &[Category], map: &SystemMap) -> Self {
        Self {
            paths: categories
                .iter()
                .map(|c| resolve_panel(slides_dir, c, map))
                .collect(),
        }
    }

    /// Use already-resolved paths.
    pub fn from_paths(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }

    /// Panel path for the category at `index`.
    pub fn path(&self, index: usize) -> Option<&Path> {
        self.paths.get(index).map(PathBuf::as_path)
    }

    /// Number of panels.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// True when there are no panels.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// [`PanelLookup`] that decodes panels from disk and keeps the most recently used ones.
pub struct FsPanelLookup {
    set: PanelSet,
    cache: HashMap<PathBuf, Arc<Surface>>,
    lru: VecDeque<PathBuf>,
    capacity: usize,
}

impl FsPanelLookup {
    /// Lookup over `set`; cache size comes from `ARTBOOK_PANEL_CACHE_CAPACITY` (default 32).
    pub fn new(set: PanelSet) -> Self {
        let capacity = std::env::var("ARTBOOK_PANEL_CACHE_CAPACITY")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|&n| n > 0)
            .unwrap_or(32);
        Self::with_capacity(set, capacity)
    }

    /// Lookup keeping at most `capacity` decoded panels.
    pub fn with_capacity(set: PanelSet, capacity: usize) -> Self {
        Self {
            set,
            cache: HashMap::new(),
            lru: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    /// Underlying panel paths.
    pub fn set(&self) -> &PanelSet {
        &self.set
    }

    /// Decoded panels currently held.
    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    fn touch(&mut self, key: &Path) {
        if let Some(pos) = self.lru.iter().position(|k| k == key) {
            self.lru.remove(pos);
        }
        self.lru.push_back(key.to_path_buf());
    }

    fn insert(&mut self, key: PathBuf, surface: Arc<Surface>) {
        self.cache.insert(key.clone(), surface);
        self.touch(&key);
        while self.lru.len() > self.capacity {
            if let Some(old) = self.lru.pop_front() {
                self.cache.remove(&old);
            }
        }
    }
}

impl PanelLookup for FsPanelLookup {
    fn len(&self) -> usize {
        self.set.len()
    }

    fn panel(&mut self, index: usize) -> ArtResult<Arc<Surface>> {
        let Some(path) = self.set.path(index).map(Path::to_path_buf) else {
            return Err(ArtError::validation(format!(
                "panel index {index} out of range for {} panels",
                self.set.len()
            )));
        };
        if let Some(hit) = self.cache.get(&path).cloned() {
            self.touch(&path);
            return Ok(hit);
        }
        let surface = Arc::new(decode::load_surface(&path, AssetKind::Panel)?);
        tracing::debug!(path = %path.display(), "decoded panel");
        self.insert(path, Arc::clone(&surface));
        Ok(surface)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/catalog/panels.rs"]
mod tests;
