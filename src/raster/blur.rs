use crate::{
    foundation::error::{ArtError, ArtResult},
    raster::surface::Surface,
};

/// Kernel half-width covering three standard deviations.
pub fn radius_for_sigma(sigma: f32) -> u32 {
    if !sigma.is_finite() || sigma <= 0.0 {
        return 0;
    }
    (sigma * 3.0).ceil() as u32
}

/// Separable Gaussian blur of a premultiplied surface; edges clamp.
pub fn gaussian_blur(src: &Surface, sigma: f32) -> ArtResult<Surface> {
    let radius = radius_for_sigma(sigma);
    if radius == 0 {
        return Ok(src.clone());
    }

    let kernel = gaussian_kernel_q16(radius, sigma)?;
    let (w, h) = (src.width() as usize, src.height() as usize);
    let mut tmp = vec![0u8; src.data().len()];
    let mut out = vec![0u8; src.data().len()];

    // Horizontal: `h` lines of `w` pixels, step 1 pixel. Vertical: `w` lines of `h`, step `w`.
    convolve(src.data(), &mut tmp, h, w, w, 1, &kernel);
    convolve(&tmp, &mut out, w, h, 1, w, &kernel);
    Surface::from_premul(src.width(), src.height(), out)
}

fn gaussian_kernel_q16(radius: u32, sigma: f32) -> ArtResult<Vec<u32>> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(ArtError::validation("blur sigma must be > 0"));
    }

    let r = radius as i32;
    let denom = 2.0 * f64::from(sigma) * f64::from(sigma);
    let weights_f: Vec<f64> = (-r..=r)
        .map(|i| (-(f64::from(i) * f64::from(i)) / denom).exp())
        .collect();
    let sum: f64 = weights_f.iter().sum();
    if sum <= 0.0 {
        return Err(ArtError::validation("gaussian kernel sum is zero"));
    }

    let mut weights: Vec<u32> = weights_f
        .iter()
        .map(|wf| ((wf / sum) * 65536.0).round().clamp(0.0, 65536.0) as u32)
        .collect();

    // Rounding drift goes into the center tap so the kernel sums to exactly 1.0 in Q16.
    let acc: i64 = weights.iter().map(|&q| i64::from(q)).sum();
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        weights[mid] = (i64::from(weights[mid]) + delta).clamp(0, 65536) as u32;
    }
    Ok(weights)
}

/// One 1D pass over `lines` independent lines of `len` pixels.
///
/// Line `l` starts at pixel `l * line_step`; consecutive pixels in a line are `px_step` apart.
fn convolve(
    src: &[u8],
    dst: &mut [u8],
    lines: usize,
    len: usize,
    line_step: usize,
    px_step: usize,
    k: &[u32],
) {
    let radius = (k.len() / 2) as i64;
    let last = len as i64 - 1;
    for l in 0..lines {
        let base = l * line_step;
        for p in 0..len {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let sp = (p as i64 + ki as i64 - radius).clamp(0, last) as usize;
                let idx = (base + sp * px_step) * 4;
                for c in 0..4 {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = (base + p * px_step) * 4;
            for c in 0..4 {
                dst[out_idx + c] = (((acc[c] + 32768) >> 16).min(255)) as u8;
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/blur.rs"]
mod tests;
