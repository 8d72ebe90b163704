use std::path::PathBuf;

/// Convenience result type used across artbook.
pub type ArtResult<T> = Result<T, ArtError>;

/// Kind of on-disk asset a render depends on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssetKind {
    /// Carousel panel ("slide") image.
    Panel,
    /// Platform icon used as a logo.
    Icon,
    /// Font file used for text logos.
    Font,
}

impl std::fmt::Display for AssetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Panel => "panel",
            Self::Icon => "icon",
            Self::Font => "font",
        })
    }
}

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum ArtError {
    /// Invalid user-provided settings or input data.
    #[error("validation error: {0}")]
    Validation(String),

    /// A referenced panel, icon or font file does not exist.
    #[error("missing {kind} asset: '{}'", path.display())]
    MissingAsset {
        /// What the file was supposed to be.
        kind: AssetKind,
        /// Path that was looked up.
        path: PathBuf,
    },

    /// Template placeholders with no value in the default table.
    #[error("incomplete template: unresolved tokens [{}]", missing.join(", "))]
    IncompleteTemplate {
        /// Every unresolved token name, sorted.
        missing: Vec<String>,
    },

    /// Degenerate geometry inputs that would make a division undefined.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// An external collaborator process failed.
    #[error("external tool failure: {0}")]
    ExternalTool(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ArtError {
    /// Build an [`ArtError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build an [`ArtError::MissingAsset`] value.
    pub fn missing_asset(kind: AssetKind, path: impl Into<PathBuf>) -> Self {
        Self::MissingAsset {
            kind,
            path: path.into(),
        }
    }

    /// Build an [`ArtError::IncompleteTemplate`] value; the list is sorted and deduplicated.
    pub fn incomplete_template(mut missing: Vec<String>) -> Self {
        missing.sort();
        missing.dedup();
        Self::IncompleteTemplate { missing }
    }

    /// Build an [`ArtError::InvalidGeometry`] value.
    pub fn invalid_geometry(msg: impl Into<String>) -> Self {
        Self::InvalidGeometry(msg.into())
    }

    /// Build an [`ArtError::ExternalTool`] value.
    pub fn external_tool(msg: impl Into<String>) -> Self {
        Self::ExternalTool(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
