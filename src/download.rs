//! Fetch and unpack the FGVC-Aircraft archive next to the dataset root.

use std::{
    fs::{self, File},
    io::{self, BufReader, Read, Write},
    path::{Path, PathBuf},
};

use flate2::read::GzDecoder;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use url::Url;

use crate::error::DownloadError;
use crate::http_client;

/// Upstream location of the 2013b release.
pub const DEFAULT_ARCHIVE_URL: &str =
    "http://www.robots.ox.ac.uk/~vgg/data/fgvc-aircraft/archives/fgvc-aircraft-2013b.tar.gz";
const MAX_ARCHIVE_BYTES: u64 = 8 * 1024 * 1024 * 1024;
const MAX_ARCHIVE_ENTRIES: usize = 100_000;

/// Where the archive comes from and how to verify it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveSource {
    pub url: String,
    /// Optional SHA-256 (hex) of the downloaded archive.
    #[serde(default)]
    pub sha256: Option<String>,
}

impl Default for ArchiveSource {
    fn default() -> Self {
        Self {
            url: DEFAULT_ARCHIVE_URL.to_string(),
            sha256: None,
        }
    }
}

/// True when the image directory and the requested index file are both present.
pub fn check_exists(root: &Path, classes_file: &Path) -> bool {
    root.join("data").join("images").exists() && classes_file.exists()
}

/// Download, extract and move the archive into `root` unless the data is already there.
///
/// The archive is written next to `root`, extracted there, renamed to `root`
/// if its top-level folder has a different name, and then deleted.
pub fn ensure_archive(
    root: &Path,
    classes_file: &Path,
    source: &ArchiveSource,
) -> Result<(), DownloadError> {
    if check_exists(root, classes_file) {
        tracing::debug!("Dataset already present at {}", root.display());
        return Ok(());
    }

    let tar_name = archive_file_name(&source.url)?;
    let expected_sha256 = source.sha256.as_deref().map(normalize_sha256).transpose()?;
    let root = std::path::absolute(root).map_err(DownloadError::io(root))?;
    let parent_dir = root.parent().map(Path::to_path_buf).ok_or_else(|| {
        let source = io::Error::new(io::ErrorKind::InvalidInput, "root has no parent directory");
        DownloadError::io(&root)(source)
    })?;
    fs::create_dir_all(&parent_dir).map_err(DownloadError::io(&parent_dir))?;
    let tar_path = parent_dir.join(&tar_name);

    tracing::info!("Downloading {} ... (may take a few minutes)", source.url);
    let bytes = download_to_path(&source.url, &tar_path)?;
    tracing::debug!("Wrote {bytes} bytes to {}", tar_path.display());

    if let Some(expected) = expected_sha256 {
        let actual = sha256_file(&tar_path)?;
        if actual != expected {
            return Err(DownloadError::ChecksumMismatch {
                path: tar_path,
                expected,
                actual,
            });
        }
    }

    let data_folder = parent_dir.join(archive_stem(&tar_name));
    tracing::info!(
        "Extracting {} to {} ... (may take a few minutes)",
        tar_path.display(),
        data_folder.display()
    );
    let entries = extract_tar_gz(&tar_path, &parent_dir, MAX_ARCHIVE_ENTRIES)?;
    tracing::debug!("Extracted {entries} archive entries");

    if !data_folder.exists() {
        return Err(DownloadError::MissingExtracted(data_folder));
    }
    if data_folder != root {
        tracing::info!(
            "Renaming {} to {} ...",
            data_folder.display(),
            root.display()
        );
        fs::rename(&data_folder, &root).map_err(DownloadError::io(&data_folder))?;
    }

    tracing::info!("Deleting {} ...", tar_path.display());
    fs::remove_file(&tar_path).map_err(DownloadError::io(&tar_path))?;

    tracing::info!("Done!");
    Ok(())
}

/// Validate the archive URL and return its final path segment.
fn archive_file_name(url: &str) -> Result<String, DownloadError> {
    let invalid = |reason: &str| DownloadError::InvalidUrl {
        url: url.to_string(),
        reason: reason.to_string(),
    };
    let parsed = Url::parse(url).map_err(|err| invalid(&err.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https"));
    }
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(invalid("missing host"));
    }
    parsed
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .ok_or_else(|| invalid("missing archive file name"))
}

/// Name of the folder the archive is expected to unpack into.
fn archive_stem(tar_name: &str) -> &str {
    [".tar.gz", ".tgz", ".tar"]
        .iter()
        .find_map(|suffix| tar_name.strip_suffix(suffix))
        .unwrap_or(tar_name)
}

fn download_to_path(url: &str, dest: &Path) -> Result<u64, DownloadError> {
    let response = http_client::agent().get(url).call().map_err(|err| {
        let reason = match err {
            ureq::Error::Status(code, _) => format!("HTTP {code}"),
            other => other.to_string(),
        };
        DownloadError::Http {
            url: url.to_string(),
            reason,
        }
    })?;
    let mut tmp_name = dest.as_os_str().to_owned();
    tmp_name.push(".part");
    let tmp = PathBuf::from(tmp_name);
    let mut file = File::create(&tmp).map_err(DownloadError::io(&tmp))?;
    let written = http_client::copy_response_to_writer(response, &mut file, MAX_ARCHIVE_BYTES)
        .map_err(DownloadError::io(&tmp))?;
    file.flush().map_err(DownloadError::io(&tmp))?;
    drop(file);
    fs::rename(&tmp, dest).map_err(DownloadError::io(dest))?;
    Ok(written)
}

/// Unpack a gzip-compressed tarball into `dest_dir`.
///
/// Entries whose paths would land outside `dest_dir` are skipped.
fn extract_tar_gz(
    archive_path: &Path,
    dest_dir: &Path,
    max_entries: usize,
) -> Result<usize, DownloadError> {
    let extract_err = |err: std::io::Error| DownloadError::Extract {
        archive: archive_path.to_path_buf(),
        reason: err.to_string(),
    };
    let file = File::open(archive_path).map_err(DownloadError::io(archive_path))?;
    let mut archive = tar::Archive::new(GzDecoder::new(BufReader::new(file)));
    let mut count = 0usize;
    for entry in archive.entries().map_err(extract_err)? {
        let mut entry = entry.map_err(extract_err)?;
        count += 1;
        if count > max_entries {
            return Err(DownloadError::Extract {
                archive: archive_path.to_path_buf(),
                reason: format!("archive has more than {max_entries} entries"),
            });
        }
        if !entry.unpack_in(dest_dir).map_err(extract_err)? {
            tracing::warn!(
                "Skipped archive entry outside {}: {}",
                dest_dir.display(),
                String::from_utf8_lossy(&entry.path_bytes())
            );
        }
    }
    Ok(count)
}

fn normalize_sha256(value: &str) -> Result<String, DownloadError> {
    let trimmed = value.trim();
    if trimmed.len() != 64 || !trimmed.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(DownloadError::InvalidChecksum(trimmed.to_string()));
    }
    Ok(trimmed.to_ascii_lowercase())
}

fn sha256_file(path: &Path) -> Result<String, DownloadError> {
    let mut file = File::open(path).map_err(DownloadError::io(path))?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 64 * 1024];
    loop {
        let read = file.read(&mut buf).map_err(DownloadError::io(path))?;
        if read == 0 {
            break;
        }
        hasher.update(&buf[..read]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}
