use archdiagram::cache_buster::update_file;
use pretty_assertions::assert_eq;
use std::fs;

const REF: &str = "docs/architecture/diagrams/latest.png";

#[test]
fn inserts_then_replaces() {
    let dir = tempfile::tempdir().unwrap();
    let readme = dir.path().join("README.md");
    fs::write(
        &readme,
        "## Architecture\n\n<img src=\"docs/architecture/diagrams/latest.png\" width=\"800\">\n",
    )
    .unwrap();

    assert_eq!(update_file(&readme, REF, "20250806150950").unwrap(), 1);
    assert_eq!(
        fs::read_to_string(&readme).unwrap(),
        "## Architecture\n\n<img src=\"docs/architecture/diagrams/latest.png?v=20250806150950\" width=\"800\">\n"
    );

    assert_eq!(update_file(&readme, REF, "20250807000000").unwrap(), 1);
    let text = fs::read_to_string(&readme).unwrap();
    assert!(text.contains("latest.png?v=20250807000000\""));
    assert_eq!(text.matches("?v=").count(), 1);
}

#[test]
fn every_reference_is_updated() {
    let dir = tempfile::tempdir().unwrap();
    let readme = dir.path().join("README.md");
    fs::write(
        &readme,
        "![a](docs/architecture/diagrams/latest.png?v=1)\n[full size](docs/architecture/diagrams/latest.png)\n",
    )
    .unwrap();

    assert_eq!(update_file(&readme, REF, "42").unwrap(), 2);
    assert_eq!(
        fs::read_to_string(&readme).unwrap(),
        "![a](docs/architecture/diagrams/latest.png?v=42)\n[full size](docs/architecture/diagrams/latest.png?v=42)\n"
    );
}

#[test]
fn no_reference_leaves_file_alone() {
    let dir = tempfile::tempdir().unwrap();
    let readme = dir.path().join("README.md");
    fs::write(&readme, "nothing to see\n").unwrap();

    assert_eq!(update_file(&readme, REF, "42").unwrap(), 0);
    assert_eq!(fs::read_to_string(&readme).unwrap(), "nothing to see\n");
}

#[test]
fn missing_file_is_an_error_naming_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let readme = dir.path().join("README.md");
    let err = update_file(&readme, REF, "42").unwrap_err();
    assert!(format!("{err:#}").contains("README.md"));
}
