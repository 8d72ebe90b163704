use super::*;
use crate::foundation::color::Rgba8;

#[test]
fn zero_sigma_is_identity() {
    let s = Surface::filled(3, 2, Rgba8::rgba(1, 2, 3, 4)).unwrap();
    assert_eq!(gaussian_blur(&s, 0.0).unwrap(), s);
}

#[test]
fn constant_image_is_unchanged() {
    let s = Surface::filled(5, 4, Rgba8::rgba(10, 20, 30, 255)).unwrap();
    assert_eq!(gaussian_blur(&s, 1.5).unwrap(), s);
}

#[test]
fn blur_spreads_energy_from_single_pixel() {
    let mut s = Surface::new(9, 9).unwrap();
    let center = ((4 * 9 + 4) * 4) as usize;
    s.data_mut()[center..center + 4].copy_from_slice(&[0, 0, 0, 255]);

    let out = gaussian_blur(&s, 1.0).unwrap();
    let nonzero = out.data().chunks_exact(4).filter(|px| px[3] != 0).count();
    assert!(nonzero > 1);

    let sum_a: u32 = out.data().chunks_exact(4).map(|px| u32::from(px[3])).sum();
    assert!((sum_a as i32 - 255).abs() <= 10);
}

#[test]
fn radius_covers_three_sigma() {
    assert_eq!(radius_for_sigma(20.0), 60);
    assert_eq!(radius_for_sigma(0.4), 2);
    assert_eq!(radius_for_sigma(-1.0), 0);
}
