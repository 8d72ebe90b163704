use super::*;

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

#[test]
fn folders_skip_hidden_disabled_and_files() {
    let root = temp_dir("folders");
    for d in ["SNES", "Arcade", ".hidden", "_disabled", "gba", "NES"] {
        std::fs::create_dir_all(root.join(d)).unwrap();
    }
    std::fs::write(root.join("readme.txt"), "x").unwrap();

    let folders = list_category_folders(&root).unwrap();
    assert_eq!(folders, vec!["Arcade", "NES", "SNES", "gba"]);
    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn missing_roms_dir_is_an_error() {
    let root = temp_dir("no_roms");
    assert!(list_category_folders(&root).is_err());
}

#[test]
fn core_cfg_second_line_names_platform() {
    let core = temp_dir("core_cfg");
    std::fs::create_dir_all(core.join("snes")).unwrap();
    std::fs::write(
        core.join("snes").join("core.cfg"),
        "snes9x\n  Nintendo SNES-SFC  \nsnes\n",
    )
    .unwrap();
    std::fs::create_dir_all(core.join("short")).unwrap();
    std::fs::write(core.join("short").join("core.cfg"), "only-one-line\n").unwrap();

    assert_eq!(read_core_platform(&core, "SNES").unwrap(), "Nintendo SNES-SFC");
    assert_eq!(read_core_platform(&core, "Short").unwrap(), DEFAULT_PLATFORM);
    assert_eq!(read_core_platform(&core, "Absent").unwrap(), DEFAULT_PLATFORM);
    std::fs::remove_dir_all(&core).ok();
}

#[test]
fn overrides_first_match_wins() {
    let overrides = PlatformOverrides::from_json(
        r#"[
            {"pattern": "(?i)^gb", "platform": "Nintendo Game Boy"},
            {"pattern": "(?i)^gba$", "platform": "Nintendo Game Boy Advance"}
        ]"#,
    )
    .unwrap();
    assert_eq!(overrides.len(), 2);
    assert_eq!(overrides.lookup("GBA"), Some("Nintendo Game Boy"));
    assert_eq!(overrides.lookup("NES"), None);
}

#[test]
fn bad_override_pattern_is_validation_error() {
    let mut overrides = PlatformOverrides::new();
    assert!(matches!(
        overrides.push("(unclosed", "x"),
        Err(ArtError::Validation(_))
    ));
    assert!(overrides.is_empty());
}

#[test]
fn load_categories_combines_overrides_and_core_cfg() {
    let root = temp_dir("load_roms");
    let core = temp_dir("load_core");
    for d in ["Arcade", "NES", "SNES"] {
        std::fs::create_dir_all(root.join(d)).unwrap();
    }
    std::fs::create_dir_all(core.join("nes")).unwrap();
    std::fs::write(core.join("nes").join("core.cfg"), "fceumm\nNintendo NES-Famicom\n").unwrap();
    std::fs::create_dir_all(core.join("snes")).unwrap();
    std::fs::write(core.join("snes").join("core.cfg"), "snes9x\nNintendo SNES-SFC\n").unwrap();

    let mut overrides = PlatformOverrides::new();
    overrides.push("^SNES$", "Forced").unwrap();

    let cats = load_categories(&root, &core, &overrides).unwrap();
    let got: Vec<(&str, &str, usize)> = cats
        .iter()
        .map(|c| (c.name.as_str(), c.platform.as_str(), c.ordinal))
        .collect();
    assert_eq!(
        got,
        vec![
            ("Arcade", "default", 0),
            ("NES", "Nintendo NES-Famicom", 1),
            ("SNES", "Forced", 2),
        ]
    );
    std::fs::remove_dir_all(&root).ok();
    std::fs::remove_dir_all(&core).ok();
}
