//! One visualization request from start to finish.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Context as _;

use crate::foundation::error::ReelResult;
use crate::pipeline::{RenderOpts, render_to_mp4};
use crate::source::InputSource;

/// File name of the video inside a request directory, also used as the download name.
pub const OUTPUT_FILENAME: &str = "keypoints_visualization.mp4";

static REQUEST_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Body of `POST /visualize-keypoints/`.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct VisualizeRequest {
    /// HTTP(S) URL or local path of the keypoint JSON.
    pub json_file_path: String,
}

/// Scratch directory owned by one run, removed with everything in it on drop.
#[derive(Debug)]
pub struct RequestDir {
    path: PathBuf,
}

impl RequestDir {
    /// Create `<parent>/<pid>-<nanos>-<seq>/`, a name no other run in any process shares.
    pub fn create(parent: &Path) -> ReelResult<Self> {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default();
        let seq = REQUEST_COUNTER.fetch_add(1, Ordering::Relaxed);
        let path = parent.join(format!("{}-{nanos}-{seq}", std::process::id()));
        std::fs::create_dir_all(&path).with_context(|| {
            format!("failed to create request directory '{}'", path.display())
        })?;
        Ok(Self { path })
    }

    /// Directory path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for RequestDir {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_dir_all(&self.path) {
            tracing::warn!(
                dir = %self.path.display(),
                error = %e,
                "failed to remove request directory"
            );
        }
    }
}

/// A finished video. The file lives until this value is dropped.
#[derive(Debug)]
pub struct RenderedVideo {
    _dir: RequestDir,
    path: PathBuf,
    /// Frames encoded into the video.
    pub frames: u64,
}

impl RenderedVideo {
    /// MP4 file inside the request directory.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Turns requests into videos under `output_dir`, one fresh subdirectory per request.
#[derive(Clone, Debug)]
pub struct Visualizer {
    output_dir: PathBuf,
    opts: RenderOpts,
}

impl Visualizer {
    /// Create a visualizer writing under `output_dir`.
    pub fn new(output_dir: impl Into<PathBuf>, opts: RenderOpts) -> Self {
        Self {
            output_dir: output_dir.into(),
            opts,
        }
    }

    /// Run one request: resolve the source, parse, render and encode.
    ///
    /// On error the request directory is already gone.
    #[tracing::instrument(skip(self), fields(input = %req.json_file_path))]
    pub fn visualize(&self, req: &VisualizeRequest) -> ReelResult<RenderedVideo> {
        let source = InputSource::parse(&req.json_file_path);
        let dir = RequestDir::create(&self.output_dir)?;
        let record = source.load(dir.path())?;
        tracing::info!(
            source = %source,
            remote = source.is_remote(),
            frames = record.len(),
            dir = %dir.path().display(),
            "keypoints loaded"
        );

        let path = dir.path().join(OUTPUT_FILENAME);
        let stats = render_to_mp4(&record, &path, &self.opts)?;
        Ok(RenderedVideo {
            _dir: dir,
            path,
            frames: stats.frames_total,
        })
    }
}
