use super::*;
use crate::foundation::color::Rgba8;

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "artbook_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

fn reference() -> (SchemeGeometry, SchemePalette) {
    (
        SchemeGeometry::for_screen(640, 480).unwrap(),
        SchemePalette::new(
            Rgba8::BLACK,
            Rgba8::rgba(0xff, 0x80, 0x00, 0xff),
            Rgba8::WHITE,
        ),
    )
}

#[test]
fn scan_finds_distinct_identifier_tokens() {
    let tokens = scan_tokens(b"[a]\nX={header_height}\nY={header_height} {bad-token} {9x} {_ok1}\n{}")
        .unwrap();
    let got: Vec<&str> = tokens.iter().map(String::as_str).collect();
    assert_eq!(got, vec!["_ok1", "header_height"]);
}

#[test]
fn alignment_values() {
    assert_eq!(Alignment::Left.value(), 0);
    assert_eq!(Alignment::Centre.value(), 1);
    assert_eq!(Alignment::Right.value(), 2);
}

#[test]
fn default_table_uses_bare_hex_and_geometry() {
    let (g, p) = reference();
    let t = default_table(&g, &p);
    assert_eq!(t.get("background_hex"), Some("000000"));
    assert_eq!(t.get("accent_hex"), Some("ff8000"));
    assert_eq!(t.get("highlight_hex"), Some("804000"));
    assert_eq!(t.get("highlight_soft_hex"), Some("402000"));
    assert_eq!(t.get("content_item_count"), Some("9"));
    assert_eq!(t.get("header_text_align"), Some("1"));
    assert_eq!(t.get("grid_enabled"), Some("0"));
}

#[test]
fn unresolved_tokens_are_reported_together() {
    let (g, p) = reference();
    let err = SchemeFiller::new(b"{zeta} {header_height} {alpha} {zeta}".to_vec(), &g, &p)
        .unwrap_err();
    match &err {
        ArtError::IncompleteTemplate { missing } => {
            assert_eq!(missing, &vec!["alpha".to_string(), "zeta".to_string()]);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(
        err.to_string(),
        "incomplete template: unresolved tokens [alpha, zeta]"
    );
}

#[test]
fn explore_context_is_text_only_grid() {
    let (g, p) = reference();
    let filler = SchemeFiller::new(b"{grid_enabled}".to_vec(), &g, &p).unwrap();
    let t = filler.table_for(SchemeContext::Explore);
    assert_eq!(t.get("grid_enabled"), Some("1"));
    assert_eq!(t.get("grid_columns"), Some("4"));
    assert_eq!(t.get("grid_cell_width"), Some("155"));
    assert_eq!(t.get("grid_location_y"), Some("44"));
    assert_eq!(t.get("content_image_alpha"), Some("0"));
    assert_eq!(t.get("content_background_alpha"), Some("0"));
    // Untouched values fall through from the defaults.
    assert_eq!(t.get("footer_height"), Some("55"));
}

#[test]
fn launch_context_fills_the_screen_with_one_item() {
    let (g, p) = reference();
    let filler = SchemeFiller::new(Vec::new(), &g, &p).unwrap();
    let t = filler.table_for(SchemeContext::Launch);
    assert_eq!(t.get("content_item_count"), Some("1"));
    assert_eq!(t.get("content_item_height"), Some("480"));
    assert_eq!(t.get("content_height"), Some("480"));
    assert_eq!(t.get("content_width"), Some("640"));
    assert_eq!(t.get("grid_enabled"), Some("0"));
}

#[test]
fn every_context_override_changes_its_default() {
    let (g, p) = reference();
    let defaults = default_table(&g, &p);
    for ctx in SchemeContext::ALL {
        let overrides = ctx.overrides(&g);
        for (name, value) in &overrides.values {
            assert_ne!(
                defaults.get(name),
                Some(value.as_str()),
                "{ctx:?} repeats the default for {name}"
            );
        }
    }
    let history = SchemeContext::History.overrides(&g);
    assert_eq!(history.len(), 1);
    assert_eq!(history.get("content_width"), Some("320"));
}

#[test]
fn fill_leaves_no_known_tokens_and_keeps_other_bytes() {
    let (g, p) = reference();
    let mut template = b"[background]\nBACKGROUND={background_hex}\n".to_vec();
    template.extend_from_slice(&[0xff, 0x00, b'{', b'x', b'-', b'}', b'\n']);
    template.extend_from_slice(b"ITEMS={content_item_count}\nH={content_item_height}\n");
    let filler = SchemeFiller::new(template, &g, &p).unwrap();

    for ctx in SchemeContext::ALL {
        let out = filler.fill(ctx).unwrap();
        let remaining = scan_tokens(&out).unwrap();
        assert!(
            remaining.iter().all(|t| !filler.table_for(ctx).contains(t)),
            "{ctx:?}: {remaining:?}"
        );
        assert!(out.windows(6).any(|w| w == [0xff, 0x00, b'{', b'x', b'-', b'}']));
    }
    let default = String::from_utf8_lossy(&filler.fill(SchemeContext::Default).unwrap()).into_owned();
    assert!(default.contains("BACKGROUND=000000\n"));
    assert!(default.contains("ITEMS=9\nH=42\n"));
    let launch = String::from_utf8_lossy(&filler.fill(SchemeContext::Launch).unwrap()).into_owned();
    assert!(launch.contains("ITEMS=1\nH=480\n"));
}

#[test]
fn substitute_leaves_unknown_tokens() {
    let mut t = TokenTable::new();
    t.set("a", 1);
    assert_eq!(substitute(b"{a}{b}{a}", &t).unwrap(), b"1{b}1".to_vec());
}

#[test]
fn write_all_emits_one_file_per_context() {
    let (g, p) = reference();
    let dir = temp_dir("scheme_write");
    let filler = SchemeFiller::new(b"W={screen_width}\n".to_vec(), &g, &p).unwrap();
    let written = filler.write_all(&dir).unwrap();
    let names: Vec<String> = written
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        vec![
            "default.txt",
            "muxlaunch.txt",
            "muxplore.txt",
            "muxhistory.txt",
            "muxfavourite.txt"
        ]
    );
    for path in &written {
        assert_eq!(std::fs::read_to_string(path).unwrap(), "W=640\n");
        assert_eq!(path.parent().unwrap(), dir.join("scheme"));
    }
    std::fs::remove_dir_all(&dir).ok();
}
