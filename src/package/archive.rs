use std::{
    fs::File,
    io::Write as _,
    path::{Component, Path, PathBuf},
};

use anyhow::Context;
use zip::{ZipWriter, write::SimpleFileOptions};

use crate::foundation::error::{ArtError, ArtResult};

/// Copy every file under `src` into `dst`, creating directories as needed. Existing files are
/// overwritten. Returns the number of files copied.
pub fn copy_tree(src: &Path, dst: &Path) -> ArtResult<usize> {
    let mut copied = 0;
    for path in list_files(src)? {
        let rel = path
            .strip_prefix(src)
            .with_context(|| format!("'{}' is outside '{}'", path.display(), src.display()))?;
        let target = dst.join(rel);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create dir '{}'", parent.display()))?;
        }
        std::fs::copy(&path, &target).with_context(|| {
            format!("copy '{}' to '{}'", path.display(), target.display())
        })?;
        copied += 1;
    }
    Ok(copied)
}

/// Files under `root`, recursively, sorted by path.
pub fn list_files(root: &Path) -> ArtResult<Vec<PathBuf>> {
    let mut out = Vec::new();
    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        let entries =
            std::fs::read_dir(&dir).with_context(|| format!("list '{}'", dir.display()))?;
        for entry in entries {
            let entry = entry.with_context(|| format!("read entry in '{}'", dir.display()))?;
            let path = entry.path();
            if path.is_dir() {
                pending.push(path);
            } else if path.is_file() {
                out.push(path);
            }
        }
    }
    out.sort();
    Ok(out)
}

/// Archive entry name of `path` relative to `root`, `/`-separated. Anything that could land
/// outside the extraction directory is rejected.
pub fn entry_name(root: &Path, path: &Path) -> ArtResult<String> {
    let rel = path.strip_prefix(root).map_err(|_| {
        ArtError::validation(format!(
            "'{}' is not inside '{}'",
            path.display(),
            root.display()
        ))
    })?;
    let mut parts = Vec::new();
    for c in rel.components() {
        match c {
            Component::Normal(p) => parts.push(p.to_string_lossy().into_owned()),
            Component::CurDir => {}
            _ => {
                return Err(ArtError::validation(format!(
                    "unsafe archive path '{}'",
                    rel.display()
                )));
            }
        }
    }
    let name = parts.join("/");
    if name.is_empty() || name.contains('\\') {
        return Err(ArtError::validation(format!(
            "unsafe archive path '{}'",
            rel.display()
        )));
    }
    Ok(name)
}

/// Zip every file under `src_dir` into `zip_path` with Deflate. Returns the entry names.
pub fn write_archive(src_dir: &Path, zip_path: &Path) -> ArtResult<Vec<String>> {
    if let Some(parent) = zip_path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create archive dir '{}'", parent.display()))?;
    }
    let file = File::create(zip_path)
        .with_context(|| format!("create archive '{}'", zip_path.display()))?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated)
        .unix_permissions(0o644);

    let mut names = Vec::new();
    for path in list_files(src_dir)? {
        let name = entry_name(src_dir, &path)?;
        let bytes = std::fs::read(&path).with_context(|| format!("read '{}'", path.display()))?;
        zip.start_file(name.as_str(), options)
            .with_context(|| format!("start archive entry '{name}'"))?;
        zip.write_all(&bytes)
            .with_context(|| format!("write archive entry '{name}'"))?;
        names.push(name);
    }
    zip.finish()
        .with_context(|| format!("finish archive '{}'", zip_path.display()))?;
    tracing::info!(path = %zip_path.display(), entries = names.len(), "wrote theme archive");
    Ok(names)
}

#[cfg(test)]
#[path = "../../tests/unit/package/archive.rs"]
mod tests;
