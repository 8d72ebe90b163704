use super::*;

#[test]
fn hex_parsing_accepts_hash_and_bare_forms() {
    assert_eq!(
        Rgba8::from_hex("#FF8000").unwrap(),
        Rgba8::rgba(255, 128, 0, 255)
    );
    assert_eq!(
        Rgba8::from_hex("ff800080").unwrap(),
        Rgba8::rgba(255, 128, 0, 128)
    );
    assert!(Rgba8::from_hex("#12345").is_err());
    assert!(Rgba8::from_hex("#zz0000").is_err());
}

#[test]
fn hex_output_is_lowercase_rgb() {
    assert_eq!(Rgba8::rgba(0xAB, 0x01, 0xFF, 10).to_hex_rgb(), "ab01ff");
}

#[test]
fn blend_endpoints_and_midpoint() {
    let base = Rgba8::rgba(0, 0, 0, 255);
    let accent = Rgba8::rgba(200, 100, 50, 255);
    assert_eq!(base.blend(accent, 0.0), base);
    assert_eq!(base.blend(accent, 1.0), accent);
    assert_eq!(base.blend(accent, 0.5), Rgba8::rgba(100, 50, 25, 255));
    assert_eq!(base.blend(accent, 0.25), Rgba8::rgba(50, 25, 13, 255));
}

#[test]
fn premul_roundtrips_opaque_and_transparent() {
    assert_eq!(premul_rgba8(10, 20, 30, 255), [10, 20, 30, 255]);
    assert_eq!(premul_rgba8(10, 20, 30, 0), [0, 0, 0, 0]);
    assert_eq!(unpremul_rgba8([0, 0, 0, 0]), [0, 0, 0, 0]);
    let p = premul_rgba8(200, 100, 50, 128);
    let u = unpremul_rgba8(p);
    for c in 0..3 {
        assert!((i32::from(u[c]) - i32::from([200u8, 100, 50][c])).abs() <= 2);
    }
}

#[test]
fn deserializes_from_hex_string() {
    let c: Rgba8 = serde_json::from_str("\"#000000\"").unwrap();
    assert_eq!(c, Rgba8::BLACK);
}
