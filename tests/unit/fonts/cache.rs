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
fn sha256_of_known_input() {
    assert_eq!(
        sha256_hex(b"abc"),
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
}

#[test]
fn font_hash_depends_on_content_only() {
    let dir = temp_dir("font_hash");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("a.ttf"), b"same").unwrap();
    std::fs::write(dir.join("b.ttf"), b"same").unwrap();
    std::fs::write(dir.join("c.ttf"), b"other").unwrap();
    let a = font_hash(&dir.join("a.ttf")).unwrap();
    assert_eq!(a, font_hash(&dir.join("b.ttf")).unwrap());
    assert_ne!(a, font_hash(&dir.join("c.ttf")).unwrap());
    assert!(font_hash(&dir.join("missing.ttf")).is_err());
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn missing_cache_file_is_empty_and_save_round_trips() {
    let dir = temp_dir("range_cache");
    let path = dir.join("nested").join("cache.json");
    let mut cache = RangeCache::load(&path).unwrap();
    assert!(cache.is_empty());

    let mut ranges = BTreeMap::new();
    ranges.insert("0x0000-0x007F".to_string(), "Basic Latin".to_string());
    cache.insert(
        "deadbeef".to_string(),
        CacheEntry {
            font_name: "Font.ttf".to_string(),
            supported_ranges: ranges.clone(),
        },
    );
    cache.save().unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["deadbeef"]["font_name"], "Font.ttf");
    assert_eq!(
        json["deadbeef"]["supported_ranges"]["0x0000-0x007F"],
        "Basic Latin"
    );

    let reloaded = RangeCache::load(&path).unwrap();
    assert_eq!(reloaded.len(), 1);
    assert_eq!(reloaded.get("deadbeef").unwrap().supported_ranges, ranges);
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn corrupt_cache_is_an_error() {
    let dir = temp_dir("range_cache_bad");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("cache.json");
    std::fs::write(&path, "not json").unwrap();
    assert!(RangeCache::load(&path).is_err());
    std::fs::remove_dir_all(&dir).ok();
}
