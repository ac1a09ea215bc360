//! JSON-facing animation model.
//!
//! Documents look like `{"frames": [{"keypoints": [[x, y], ...]}, ...]}`. Parsing is split in two
//! stages so syntax errors ([`ReelError::MalformedInput`]) and shape errors
//! ([`ReelError::Structural`]) stay distinguishable.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::foundation::error::{ReelError, ReelResult};
use crate::segment::CoordinatePolicy;
use crate::skeleton::KEYPOINTS_PER_FRAME;

/// One normalized landmark. `y` is stored inverted (`1 - y`) in input documents.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Keypoint {
    /// Horizontal, 0 at the left edge.
    pub x: f64,
    /// Vertical.
    pub y: f64,
}

impl Keypoint {
    /// Keypoint from raw coordinates.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Undo the stored vertical inversion.
    pub fn flipped(self) -> Self {
        Self {
            x: self.x,
            y: 1.0 - self.y,
        }
    }

    /// Both coordinates in `[0, 1]`.
    pub fn is_normalized(self) -> bool {
        (0.0..=1.0).contains(&self.x) && (0.0..=1.0).contains(&self.y)
    }
}

impl From<[f64; 2]> for Keypoint {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Keypoint> for [f64; 2] {
    fn from(k: Keypoint) -> Self {
        [k.x, k.y]
    }
}

/// A single time step: keypoints ordered pose, left hand, right hand.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameDef {
    /// At least 57 points; extra ones are ignored.
    pub keypoints: Vec<Keypoint>,
}

/// Top-level parsed document. Frame order is video frame order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimationRecord {
    /// Frames in playback order.
    pub frames: Vec<FrameDef>,
}

impl AnimationRecord {
    /// Parse a document held in memory.
    pub fn from_slice(bytes: &[u8]) -> ReelResult<Self> {
        let value: serde_json::Value = serde_json::from_slice(bytes)
            .map_err(|e| ReelError::malformed(format!("invalid JSON file: {e}")))?;
        serde_json::from_value(value).map_err(|e| {
            ReelError::structural(format!("unexpected keypoint document shape: {e}"))
        })
    }

    /// Read the whole stream, then parse it like [`AnimationRecord::from_slice`].
    pub fn from_reader<R: Read>(mut r: R) -> ReelResult<Self> {
        let mut bytes = Vec::new();
        r.read_to_end(&mut bytes).context("read keypoint JSON")?;
        Self::from_slice(&bytes)
    }

    /// Parse a document from disk. A missing file is an input-source error.
    pub fn from_path(path: impl AsRef<Path>) -> ReelResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ReelError::input_source(format!(
                "JSON file not found: '{}'",
                path.display()
            )));
        }
        let f = File::open(path)
            .with_context(|| format!("open keypoint JSON '{}'", path.display()))?;
        Self::from_reader(BufReader::new(f))
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// `true` for a document without frames.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Check every frame before anything is drawn.
    ///
    /// Each frame needs [`KEYPOINTS_PER_FRAME`] keypoints; with [`CoordinatePolicy::Reject`] every
    /// used keypoint must also lie in `[0, 1]`.
    pub fn validate(&self, policy: CoordinatePolicy) -> ReelResult<()> {
        for (frame_idx, frame) in self.frames.iter().enumerate() {
            let n = frame.keypoints.len();
            if n < KEYPOINTS_PER_FRAME {
                return Err(ReelError::structural(format!(
                    "frame {frame_idx} has {n} keypoints, expected at least {KEYPOINTS_PER_FRAME}"
                )));
            }
            if policy == CoordinatePolicy::Reject {
                let used = &frame.keypoints[..KEYPOINTS_PER_FRAME];
                if let Some(kp_idx) = used.iter().position(|k| !k.is_normalized()) {
                    let k = used[kp_idx];
                    return Err(ReelError::structural(format!(
                        "frame {frame_idx} keypoint {kp_idx} is outside [0, 1]: ({}, {})",
                        k.x, k.y
                    )));
                }
            }
        }
        Ok(())
    }
}
