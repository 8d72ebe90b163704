use std::path::Path;

use anyhow::Context;

use crate::{
    foundation::error::{ArtError, ArtResult, AssetKind},
    raster::surface::Surface,
};

/// Decode any `image`-supported bytes into a premultiplied surface.
pub fn decode_image(bytes: &[u8]) -> ArtResult<Surface> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    surface_from_rgba(dyn_img.to_rgba8())
}

/// Convert a straight-alpha `image` buffer into a premultiplied surface.
pub fn surface_from_rgba(rgba: image::RgbaImage) -> ArtResult<Surface> {
    let (width, height) = rgba.dimensions();
    let mut data = rgba.into_raw();
    premultiply_rgba8_in_place(&mut data);
    Surface::from_premul(width, height, data)
}

/// Read and decode the file at `path`; a missing file is reported as
/// [`ArtError::MissingAsset`] of the given kind.
pub fn load_surface(path: &Path, kind: AssetKind) -> ArtResult<Surface> {
    if !path.is_file() {
        return Err(ArtError::missing_asset(kind, path));
    }
    let bytes =
        std::fs::read(path).with_context(|| format!("read {kind} image '{}'", path.display()))?;
    decode_image(&bytes).map_err(|e| match e {
        ArtError::Other(err) => {
            ArtError::Other(err.context(format!("decode {kind} image '{}'", path.display())))
        }
        other => other,
    })
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 255 {
            continue;
        }
        if a == 0 {
            px[..3].fill(0);
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * a + 127) / 255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/decode.rs"]
mod tests;
