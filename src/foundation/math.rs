/// `ceil(num / den)` for positive integers; `den` must be non-zero.
pub fn ceil_div(num: u32, den: u32) -> u32 {
    num.div_ceil(den)
}

/// Normalize a possibly negative index into `[0, len)`.
///
/// `len` must be non-zero.
pub fn wrap_index(index: i64, len: usize) -> usize {
    let n = len as i64;
    index.rem_euclid(n) as usize
}

/// The odd integer nearest `x`; when `x` sits exactly between two odd integers the higher one wins.
pub fn round_to_nearest_odd(x: f64) -> i64 {
    let lower = 2.0 * ((x - 1.0) / 2.0).floor() + 1.0;
    let upper = lower + 2.0;
    if x - lower < upper - x {
        lower as i64
    } else {
        upper as i64
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
