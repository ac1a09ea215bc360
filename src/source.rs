//! Where a keypoint document comes from: an HTTP(S) URL or a local path.

use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::foundation::error::{ReelError, ReelResult};
use crate::model::AnimationRecord;

/// File name a remote document is stored under inside the work directory.
pub const DOWNLOADED_JSON: &str = "downloaded_keypoints.json";

const CONNECT_TIMEOUT_SECS: u64 = 30;
const BODY_TIMEOUT_SECS: u64 = 300;

/// A parsed `json_file_path` value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputSource {
    /// HTTP(S) URL, fetched with a GET.
    Remote(String),
    /// Filesystem path, read in place.
    Local(PathBuf),
}

impl InputSource {
    /// Anything starting with `http://` or `https://` is remote; everything else is a path.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            Self::Remote(trimmed.to_string())
        } else {
            Self::Local(PathBuf::from(raw))
        }
    }

    /// `true` for [`InputSource::Remote`].
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }

    /// Resolve to a local file, downloading remote documents into `work_dir`.
    pub fn fetch(&self, work_dir: &Path) -> ReelResult<PathBuf> {
        match self {
            Self::Local(path) => {
                if !path.exists() {
                    return Err(ReelError::input_source(format!(
                        "JSON file not found: '{}'",
                        path.display()
                    )));
                }
                Ok(path.clone())
            }
            Self::Remote(url) => {
                let dest = work_dir.join(DOWNLOADED_JSON);
                download(url, &dest)?;
                Ok(dest)
            }
        }
    }

    /// Fetch and parse in one step.
    pub fn load(&self, work_dir: &Path) -> ReelResult<AnimationRecord> {
        let path = self.fetch(work_dir)?;
        AnimationRecord::from_path(path)
    }
}

impl std::fmt::Display for InputSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Remote(url) => f.write_str(url),
            Self::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Stream `url` into `dest` through a `.part` file, renamed into place on success.
fn download(url: &str, dest: &Path) -> ReelResult<()> {
    let config = ureq::Agent::config_builder()
        .timeout_connect(Some(Duration::from_secs(CONNECT_TIMEOUT_SECS)))
        .timeout_recv_body(Some(Duration::from_secs(BODY_TIMEOUT_SECS)))
        .build();
    let agent = ureq::Agent::new_with_config(config);

    tracing::info!(%url, "downloading keypoint JSON");
    let response = agent.get(url).call().map_err(|e| {
        let msg = match &e {
            ureq::Error::StatusCode(code) => {
                format!("failed to download JSON from URL {url}: HTTP status {code}")
            }
            ureq::Error::Timeout(_) => format!("connection timed out while downloading {url}"),
            ureq::Error::Io(io_err) => format!("network error downloading {url}: {io_err}"),
            _ => format!("failed to download JSON from URL {url}: {e}"),
        };
        ReelError::input_source(msg)
    })?;

    if let Some(parent) = dest.parent() {
        use anyhow::Context as _;
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create work directory '{}'", parent.display()))?;
    }

    let temp_path = dest.with_extension("part");
    let _ = fs::remove_file(&temp_path);

    let result = (|| -> ReelResult<u64> {
        let temp_file = File::create(&temp_path).map_err(|e| {
            ReelError::input_source(format!(
                "failed to create temp file {}: {e}",
                temp_path.display()
            ))
        })?;
        let mut writer = BufWriter::new(temp_file);
        let mut reader = response.into_body().into_reader();
        let mut buffer = [0u8; 65536];
        let mut downloaded = 0u64;
        loop {
            let n = reader.read(&mut buffer).map_err(|e| {
                ReelError::input_source(format!("failed to read from network: {e}"))
            })?;
            if n == 0 {
                break;
            }
            writer.write_all(&buffer[..n]).map_err(|e| {
                ReelError::input_source(format!("failed to write to temp file: {e}"))
            })?;
            downloaded += n as u64;
        }
        writer
            .flush()
            .map_err(|e| ReelError::input_source(format!("failed to flush temp file: {e}")))?;
        Ok(downloaded)
    })();

    let downloaded = match result {
        Ok(n) => n,
        Err(e) => {
            let _ = fs::remove_file(&temp_path);
            return Err(e);
        }
    };

    fs::rename(&temp_path, dest).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        ReelError::input_source(format!(
            "failed to move download into place at {}: {e}",
            dest.display()
        ))
    })?;
    tracing::debug!(bytes = downloaded, dest = %dest.display(), "download complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_distinguishes_urls_from_paths() {
        assert!(InputSource::parse("https://example.com/a.json").is_remote());
        assert!(InputSource::parse("http://localhost:9/a.json").is_remote());
        assert_eq!(
            InputSource::parse("data/a.json"),
            InputSource::Local(PathBuf::from("data/a.json"))
        );
        assert!(!InputSource::parse("ftp://host/a.json").is_remote());
    }

    #[test]
    fn missing_local_path_is_input_source_error() {
        let src = InputSource::parse("target/no/such/keypoints.json");
        let err = src.fetch(Path::new("target")).unwrap_err();
        assert!(matches!(err, ReelError::InputSource(_)));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn display_round_trips_the_input() {
        let raw = "https://example.com/k.json";
        assert_eq!(InputSource::parse(raw).to_string(), raw);
    }
}
