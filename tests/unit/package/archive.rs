use std::io::Read as _;

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

fn write(path: &Path, bytes: &[u8]) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, bytes).unwrap();
}

#[test]
fn entry_names_are_relative_with_forward_slashes() {
    let root = Path::new("/theme");
    assert_eq!(
        entry_name(root, &root.join("image").join("wall").join("muxlaunch.png")).unwrap(),
        "image/wall/muxlaunch.png"
    );
    assert!(matches!(
        entry_name(root, Path::new("/elsewhere/x")),
        Err(ArtError::Validation(_))
    ));
    assert!(matches!(
        entry_name(root, &root.join("a").join("..").join("..").join("x")),
        Err(ArtError::Validation(_))
    ));
    assert!(entry_name(root, root).is_err());
}

#[test]
fn copy_tree_mirrors_nested_files() {
    let src = temp_dir("copy_src");
    let dst = temp_dir("copy_dst");
    write(&src.join("credits.txt"), b"me");
    write(&src.join("font").join("default.bin"), b"\x00\x01");
    write(&dst.join("credits.txt"), b"old");

    assert_eq!(copy_tree(&src, &dst).unwrap(), 2);
    assert_eq!(std::fs::read(dst.join("credits.txt")).unwrap(), b"me");
    assert_eq!(std::fs::read(dst.join("font").join("default.bin")).unwrap(), b"\x00\x01");
    std::fs::remove_dir_all(&src).ok();
    std::fs::remove_dir_all(&dst).ok();
}

#[test]
fn archive_contains_every_file() {
    let src = temp_dir("zip_src");
    let out = temp_dir("zip_out");
    write(&src.join("scheme").join("default.txt"), b"W=640\n");
    write(&src.join("image").join("wall").join("muxapp.png"), b"png");
    write(&src.join("version.txt"), b"1");

    let zip_path = out.join("theme.zip");
    let names = write_archive(&src, &zip_path).unwrap();
    assert_eq!(
        names,
        vec!["image/wall/muxapp.png", "scheme/default.txt", "version.txt"]
    );

    let mut archive = zip::ZipArchive::new(File::open(&zip_path).unwrap()).unwrap();
    assert_eq!(archive.len(), 3);
    let mut entry = archive.by_name("scheme/default.txt").unwrap();
    assert_eq!(entry.compression(), zip::CompressionMethod::Deflated);
    let mut text = String::new();
    entry.read_to_string(&mut text).unwrap();
    assert_eq!(text, "W=640\n");
    std::fs::remove_dir_all(&src).ok();
    std::fs::remove_dir_all(&out).ok();
}

#[test]
fn missing_source_dir_is_an_error() {
    let out = temp_dir("zip_missing");
    assert!(write_archive(&out.join("nope"), &out.join("x.zip")).is_err());
    std::fs::remove_dir_all(&out).ok();
}
