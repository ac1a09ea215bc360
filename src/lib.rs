//! keypoint-reel renders 2D pose and hand keypoint animations into skeleton videos.
//!
//! A document holds frames of 57 normalized keypoints (15 pose, 21 left hand, 21 right hand).
//!
//! # Pipeline overview
//!
//! 1. **Load**: URL or path -> [`AnimationRecord`] ([`InputSource`])
//! 2. **Normalize**: flip `y` and apply the [`CoordinatePolicy`], then split into a [`PoseFrame`]
//! 3. **Render**: [`PoseFrame`] -> [`RenderedFrame`] (CPU raster, `image` + `imageproc`)
//! 4. **Encode**: stream frames into a [`FrameSink`]; [`FfmpegSink`] writes MP4 via system `ffmpeg`
//!
//! The HTTP front end in [`server`] wraps the same pipeline behind `POST /visualize-keypoints/`.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub mod config;
/// Encoding sinks.
pub mod encode;
pub mod model;
pub mod pipeline;
/// CPU rendering of skeleton frames.
pub mod render;
pub mod segment;
pub mod server;
pub mod service;
/// Landmark layout and connection tables.
pub mod skeleton;
pub mod source;

pub use crate::foundation::core::{Canvas, Fps, FrameIndex, Rgb8};
pub use crate::foundation::error::{ReelError, ReelResult};

pub use crate::config::ServerConfig;
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, VideoCodec, is_ffmpeg_on_path};
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::model::{AnimationRecord, FrameDef, Keypoint};
pub use crate::pipeline::{RenderOpts, RenderStats, render_frame, render_frames, render_to_mp4};
pub use crate::render::{RenderedFrame, SkeletonStyle, compose_frame};
pub use crate::segment::{CoordinatePolicy, PoseFrame, normalize_keypoints};
pub use crate::service::{
    OUTPUT_FILENAME, RenderedVideo, RequestDir, VisualizeRequest, Visualizer,
};
pub use crate::source::{DOWNLOADED_JSON, InputSource};

/// Crate version reported by `/health`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
