use archdiagram::inspect::{DEFAULT_DPI, InspectError, inspect};
use image::{ImageFormat, RgbImage};
use pretty_assertions::assert_eq;
use std::fs;

#[test]
fn reports_size_and_aspect_ratio_of_fixture() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fixture.png");
    RgbImage::new(800, 600).save(&path).unwrap();

    let report = inspect(&path).unwrap();
    assert_eq!(report.width, 800);
    assert_eq!(report.height, 600);
    assert_eq!(format!("{:.2}", report.aspect_ratio()), "1.33");
    assert_eq!(report.format, Some(ImageFormat::Png));
    assert_eq!(report.dpi, DEFAULT_DPI);
    assert!(!report.dpi_embedded);

    let text = report.to_string();
    assert!(text.contains("size: 800 x 600 pixels"), "{text}");
    assert!(text.contains("aspect ratio: 1.33"), "{text}");
    assert!(text.contains("dpi: 72 x 72 (default)"), "{text}");
}

#[test]
fn missing_file_reports_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nestjs-hannibal-3-architecture-20250806_150950.png");

    match inspect(&path) {
        Err(InspectError::NotFound(p)) => assert_eq!(p, path),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[test]
fn garbage_is_a_decode_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.png");
    fs::write(&path, b"this is not an image").unwrap();

    assert!(matches!(inspect(&path), Err(InspectError::Decode { .. })));
}
