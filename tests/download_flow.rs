mod support;

use metad2a_data::dataset::{Dataset, FgvcAircraft, Split};
use metad2a_data::download::ArchiveSource;
use metad2a_data::error::{DatasetError, DownloadError};
use sha2::{Digest, Sha256};
use support::fixtures::{ROWS, archive_entries, tar_gz};
use support::http::serve_once;
use tempfile::tempdir;

const DATA_DIR: &str = "fgvc-aircraft-2013b";

fn source(url: String, sha256: Option<String>) -> ArchiveSource {
    ArchiveSource { url, sha256 }
}

#[test]
fn download_extracts_and_removes_archive() {
    let temp = tempdir().unwrap();
    let archive = tar_gz(&archive_entries(DATA_DIR, ROWS));
    let base = serve_once("200 OK", archive);

    let dataset = FgvcAircraft::builder(temp.path())
        .split(Split::Val)
        .download(true)
        .archive(source(format!("{base}/archives/{DATA_DIR}.tar.gz"), None))
        .build()
        .unwrap();

    assert_eq!(dataset.len(), ROWS.len());
    assert!(temp.path().join(DATA_DIR).join("data/images").is_dir());
    assert!(!temp.path().join(format!("{DATA_DIR}.tar.gz")).exists());
    assert!(!temp.path().join(format!("{DATA_DIR}.tar.gz.part")).exists());
}

#[test]
fn download_renames_differently_named_folder() {
    let temp = tempdir().unwrap();
    let archive = tar_gz(&archive_entries("aircraft-mirror", ROWS));
    let digest = format!("{:x}", Sha256::digest(&archive));
    let base = serve_once("200 OK", archive);

    let dataset = FgvcAircraft::builder(temp.path())
        .download(true)
        .archive(source(format!("{base}/aircraft-mirror.tgz"), Some(digest)))
        .build()
        .unwrap();

    assert_eq!(dataset.len(), ROWS.len());
    assert!(!temp.path().join("aircraft-mirror").exists());
    assert!(temp.path().join(DATA_DIR).join("data/images").is_dir());
    assert!(!temp.path().join("aircraft-mirror.tgz").exists());
}

#[test]
fn http_error_status_propagates() {
    let temp = tempdir().unwrap();
    let base = serve_once("404 Not Found", Vec::new());

    let err = FgvcAircraft::builder(temp.path())
        .download(true)
        .archive(source(format!("{base}/{DATA_DIR}.tar.gz"), None))
        .build()
        .err()
        .unwrap();

    match err {
        DatasetError::Download(DownloadError::Http { reason, .. }) => {
            assert_eq!(reason, "HTTP 404");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn checksum_mismatch_keeps_archive_for_inspection() {
    let temp = tempdir().unwrap();
    let base = serve_once("200 OK", tar_gz(&archive_entries(DATA_DIR, ROWS)));

    let err = FgvcAircraft::builder(temp.path())
        .download(true)
        .archive(source(
            format!("{base}/{DATA_DIR}.tar.gz"),
            Some("0".repeat(64)),
        ))
        .build()
        .err()
        .unwrap();

    assert!(matches!(
        err,
        DatasetError::Download(DownloadError::ChecksumMismatch { .. })
    ));
    assert!(temp.path().join(format!("{DATA_DIR}.tar.gz")).exists());
    assert!(!temp.path().join(DATA_DIR).exists());
}

#[test]
fn archive_without_expected_folder_is_reported() {
    let temp = tempdir().unwrap();
    let base = serve_once("200 OK", tar_gz(&archive_entries("unrelated", ROWS)));

    let err = FgvcAircraft::builder(temp.path())
        .download(true)
        .archive(source(format!("{base}/{DATA_DIR}.tar.gz"), None))
        .build()
        .err()
        .unwrap();

    assert!(matches!(
        err,
        DatasetError::Download(DownloadError::MissingExtracted(_))
    ));
}
