use super::*;

fn fixture_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data/fonts")
}

#[test]
fn lookups_are_case_insensitive_and_follow_aliases() {
    let mut book = FontBook::new();
    book.register_bytes("Open Sans", vec![1, 2, 3], &["Sans"]);
    assert_eq!(book.resolve("open sans").unwrap().family(), "Open Sans");
    assert_eq!(book.resolve("SANS").unwrap().family(), "Open Sans");
    assert!(book.contains("OPEN SANS"));
}

#[test]
fn unknown_family_falls_back_to_default() {
    let mut book = FontBook::new();
    book.register_bytes("A", vec![1], &[]);
    book.register_bytes("B", vec![2], &[]);
    assert_eq!(book.resolve("nope").unwrap().family(), "A");
    book.set_default("b").unwrap();
    assert_eq!(book.resolve("nope").unwrap().family(), "B");
    assert_eq!(book.default_family(), Some("B"));
}

#[test]
fn empty_book_resolves_nothing() {
    let book = FontBook::new();
    assert!(book.resolve("Anything").is_none());
    assert!(book.default_face().is_none());
}

#[test]
fn set_default_requires_a_registered_family() {
    let mut book = FontBook::new();
    assert!(book.set_default("Missing").is_err());
}

#[test]
fn register_dir_names_families_after_file_stems() {
    let mut book = FontBook::new();
    let n = book.register_dir(fixture_dir()).unwrap();
    assert!(n >= 1);
    let face = book.resolve("dejavusans").unwrap();
    assert_eq!(face.family(), "DejaVuSans");
    assert!(face.bytes().unwrap().len() > 1000);
}

#[test]
fn register_file_fails_for_missing_paths() {
    let mut book = FontBook::new();
    let err = book
        .register_file("X", fixture_dir().join("missing.ttf"), &[])
        .unwrap_err();
    assert!(err.to_string().contains("asset error:"));
}
