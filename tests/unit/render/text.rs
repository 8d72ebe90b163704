use super::*;

fn test_font() -> Option<FontRasterizer> {
    let candidates = [
        std::env::var("ARTBOOK_TEST_FONT").unwrap_or_default(),
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf".to_string(),
        "/usr/share/fonts/TTF/DejaVuSans.ttf".to_string(),
        "/usr/share/fonts/dejavu/DejaVuSans.ttf".to_string(),
        "/System/Library/Fonts/Supplemental/Arial.ttf".to_string(),
    ];
    candidates
        .iter()
        .filter(|p| !p.is_empty())
        .find_map(|p| FontRasterizer::from_file(Path::new(p)).ok())
}

#[test]
fn missing_font_is_missing_asset() {
    let err = FontRasterizer::from_file(Path::new("/nonexistent/font.ttf")).unwrap_err();
    assert!(matches!(
        err,
        ArtError::MissingAsset {
            kind: AssetKind::Font,
            ..
        }
    ));
}

#[test]
fn garbage_bytes_register_no_family() {
    assert!(FontRasterizer::from_bytes(b"definitely not a font".to_vec()).is_err());
}

#[test]
fn measure_grows_with_text_and_size() {
    let Some(mut font) = test_font() else {
        eprintln!("skipping: no test font available");
        return;
    };
    let short = font.measure("NES", 40.0).unwrap();
    let long = font.measure("NES NES NES", 40.0).unwrap();
    let big = font.measure("NES", 80.0).unwrap();
    assert!(short > 0.0);
    assert!(long > short * 2.0);
    assert!((big / short - 2.0).abs() < 0.1);
}

#[test]
fn rasterized_line_has_ink_and_metric_height() {
    let Some(mut font) = test_font() else {
        eprintln!("skipping: no test font available");
        return;
    };
    let (ascent, descent) = font.vertical_metrics(48.0).unwrap();
    let line = font.rasterize_line("Arcade", 48.0, Rgba8::WHITE).unwrap();
    assert_eq!(line.height(), (ascent + descent).ceil() as u32);
    assert!(line.data().chunks_exact(4).any(|px| px[3] > 0));
}

#[test]
fn non_positive_size_is_invalid_geometry() {
    let Some(mut font) = test_font() else {
        eprintln!("skipping: no test font available");
        return;
    };
    assert!(matches!(
        font.measure("x", 0.0),
        Err(ArtError::InvalidGeometry(_))
    ));
}
