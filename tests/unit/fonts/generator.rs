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

/// Records calls; rejects any range in `unsupported` and any size in `bad_sizes`.
#[derive(Default)]
struct FakeConverter {
    unsupported: Vec<String>,
    bad_sizes: Vec<u32>,
    calls: Vec<(u32, Vec<String>)>,
}

impl GlyphBlobGenerator for FakeConverter {
    fn generate(
        &mut self,
        _font: &Path,
        size_px: u32,
        ranges: &[String],
        out: &Path,
    ) -> ArtResult<()> {
        self.calls.push((size_px, ranges.to_vec()));
        if ranges.iter().any(|r| self.unsupported.contains(r)) {
            return Err(ArtError::external_tool("unsupported range"));
        }
        if self.bad_sizes.contains(&size_px) {
            return Err(ArtError::external_tool("bad size"));
        }
        std::fs::write(out, format!("{size_px}")).unwrap();
        Ok(())
    }
}

fn blocks() -> Vec<UnicodeBlock> {
    vec![
        UnicodeBlock {
            start: 0x0000,
            end: 0x007F,
            name: "Basic Latin".to_string(),
        },
        UnicodeBlock {
            start: 0x0400,
            end: 0x04FF,
            name: "Cyrillic".to_string(),
        },
        UnicodeBlock {
            start: 0x10000,
            end: 0x1007F,
            name: "Linear B Syllabary".to_string(),
        },
    ]
}

#[test]
fn size_range_parsing() {
    let r = SizeRange::parse("10-16", 3).unwrap();
    assert_eq!(r.sizes().collect::<Vec<_>>(), vec![10, 13, 16]);
    assert_eq!(SizeRange::parse("8-8", 1).unwrap().sizes().count(), 1);
    assert!(matches!(SizeRange::parse("16-10", 1), Err(ArtError::Validation(_))));
    assert!(matches!(SizeRange::parse("abc", 1), Err(ArtError::Validation(_))));
    assert!(matches!(SizeRange::parse("1-2", 0), Err(ArtError::Validation(_))));
}

#[test]
fn probing_drops_rejected_ranges() {
    let dir = temp_dir("probe");
    std::fs::create_dir_all(&dir).unwrap();
    let mut conv = FakeConverter {
        unsupported: vec!["0x0400-0x04FF".to_string()],
        ..Default::default()
    };
    let supported = probe_supported_ranges(&mut conv, Path::new("f.ttf"), &blocks(), &dir.join("probe.bin"));
    assert_eq!(
        supported.keys().cloned().collect::<Vec<_>>(),
        vec!["0x0000-0x007F".to_string(), "0x10000-0x1007F".to_string()]
    );
    assert!(conv.calls.iter().all(|(size, r)| *size == PROBE_SIZE_PX && r.len() == 1));
    assert!(!dir.join("probe.bin").exists());
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn cached_font_is_not_probed_again() {
    let dir = temp_dir("probe_cache");
    std::fs::create_dir_all(&dir).unwrap();
    let font = dir.join("Font.ttf");
    std::fs::write(&font, b"font bytes").unwrap();
    let cache_path = dir.join("cache.json");

    let mut conv = FakeConverter::default();
    let mut cache = RangeCache::load(&cache_path).unwrap();
    let first = supported_ranges(&mut conv, &font, &blocks(), &mut cache).unwrap();
    assert_eq!(first.len(), 3);
    assert_eq!(conv.calls.len(), 3);

    // Same content under another name hits the cache.
    let copy = dir.join("Copy.ttf");
    std::fs::write(&copy, b"font bytes").unwrap();
    let mut cache = RangeCache::load(&cache_path).unwrap();
    let second = supported_ranges(&mut conv, &copy, &blocks(), &mut cache).unwrap();
    assert_eq!(second, first);
    assert_eq!(conv.calls.len(), 3);
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn bins_skip_failing_sizes() {
    let dir = temp_dir("font_bins");
    let mut conv = FakeConverter {
        bad_sizes: vec![12],
        ..Default::default()
    };
    let mut ranges = BTreeMap::new();
    ranges.insert("0x10000-0x1007F".to_string(), "Linear B Syllabary".to_string());
    ranges.insert("0x0000-0x007F".to_string(), "Basic Latin".to_string());

    let report = generate_font_bins(
        &mut conv,
        Path::new("/fonts/MyFont.otf"),
        &dir,
        SizeRange::parse("10-14", 2).unwrap(),
        &ranges,
    )
    .unwrap();
    assert_eq!(
        report.written,
        vec![dir.join("MyFont-10.bin"), dir.join("MyFont-14.bin")]
    );
    assert_eq!(report.failed, vec![12]);
    assert!(dir.join("MyFont-14.bin").is_file());
    // Ranges are passed in code point order, not string order.
    assert_eq!(
        conv.calls[0].1,
        vec!["0x0000-0x007F".to_string(), "0x10000-0x1007F".to_string()]
    );
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn no_supported_ranges_is_an_error() {
    let mut conv = FakeConverter::default();
    let err = generate_font_bins(
        &mut conv,
        Path::new("f.ttf"),
        &temp_dir("font_bins_empty"),
        SizeRange::parse("1-2", 1).unwrap(),
        &BTreeMap::new(),
    );
    assert!(matches!(err, Err(ArtError::Validation(_))));
    assert!(conv.calls.is_empty());
}

#[test]
fn lv_font_conv_command_line() {
    let conv = LvFontConv::new("lv_font_conv");
    let cmd = conv.command(
        Path::new("Font.ttf"),
        18,
        &["0x0000-0x007F".to_string(), "0x0080-0x00FF".to_string()],
        Path::new("out.bin"),
    );
    let args: Vec<String> = cmd
        .get_args()
        .map(|a| a.to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        args,
        vec![
            "--bpp",
            "4",
            "--size",
            "18",
            "--font",
            "Font.ttf",
            "-r",
            "0x0000-0x007F,0x0080-0x00FF",
            "--format",
            "bin",
            "--no-compress",
            "--no-prefilter",
            "-o",
            "out.bin"
        ]
    );
}

#[test]
fn missing_binary_is_external_tool_error() {
    let mut conv = LvFontConv::new("/nonexistent/lv_font_conv_binary");
    assert!(!conv.is_available());
    let err = conv.generate(
        Path::new("f.ttf"),
        10,
        &["0x0000-0x007F".to_string()],
        Path::new("out.bin"),
    );
    assert!(matches!(err, Err(ArtError::ExternalTool(_))));
}
