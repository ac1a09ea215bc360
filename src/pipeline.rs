//! Render entry points: one frame, a record into any sink, or a record into an MP4.

use std::path::PathBuf;

use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, VideoCodec};
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Canvas, Fps, FrameIndex};
use crate::foundation::error::{ReelError, ReelResult};
use crate::model::{AnimationRecord, FrameDef};
use crate::render::{RenderedFrame, SkeletonStyle, compose_frame};
use crate::segment::{CoordinatePolicy, PoseFrame};

/// Options shared by every render entry point.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RenderOpts {
    /// Output size, 640x480 by default.
    pub canvas: Canvas,
    /// Output frame rate, 30 by default.
    pub fps: Fps,
    /// MP4 encoder.
    pub codec: VideoCodec,
    /// Handling of coordinates outside `[0, 1]`.
    pub coordinates: CoordinatePolicy,
    /// Colors and stroke sizes.
    pub style: SkeletonStyle,
}

impl RenderOpts {
    /// Reject empty canvases, zero frame rates and negative radii.
    pub fn validate(&self) -> ReelResult<()> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(ReelError::validation("canvas width/height must be non-zero"));
        }
        Fps::new(self.fps.num, self.fps.den)?;
        if self.style.point_radius < 0 {
            return Err(ReelError::validation("point radius must be >= 0"));
        }
        Ok(())
    }

    fn sink_config(&self) -> SinkConfig {
        SinkConfig {
            canvas: self.canvas,
            fps: self.fps,
        }
    }
}

/// Summary of a finished render.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Frames pushed into the sink.
    pub frames_total: u64,
}

/// Normalize, partition and paint a single input frame.
pub fn render_frame(frame: &FrameDef, opts: &RenderOpts) -> ReelResult<RenderedFrame> {
    opts.validate()?;
    let pose = PoseFrame::from_frame(frame, opts.coordinates)?;
    Ok(compose_frame(&pose, opts.canvas, &opts.style))
}

/// Render every frame of `record` into `sink`, in input order.
///
/// The whole record is validated before `begin`, so a bad frame never opens the sink. `end` is
/// called for empty records too.
#[tracing::instrument(skip(record, opts, sink), fields(frames = record.len()))]
pub fn render_frames(
    record: &AnimationRecord,
    opts: &RenderOpts,
    sink: &mut dyn FrameSink,
) -> ReelResult<RenderStats> {
    opts.validate()?;
    record.validate(opts.coordinates)?;

    let mut stats = RenderStats::default();
    sink.begin(opts.sink_config())?;
    for (i, frame) in record.frames.iter().enumerate() {
        let pose = PoseFrame::from_frame(frame, opts.coordinates)?;
        let rendered = compose_frame(&pose, opts.canvas, &opts.style);
        sink.push_frame(FrameIndex(i as u64), &rendered)?;
        stats.frames_total += 1;
    }
    sink.end()?;

    tracing::info!(frames = stats.frames_total, "render finished");
    Ok(stats)
}

/// Render `record` to an MP4 by invoking the system `ffmpeg` binary.
///
/// `ffmpeg` must be installed and on `PATH`; otherwise an [`ReelError::Encode`] is returned once
/// the record has passed validation.
#[tracing::instrument(skip(record, out_path, opts))]
pub fn render_to_mp4(
    record: &AnimationRecord,
    out_path: impl Into<PathBuf>,
    opts: &RenderOpts,
) -> ReelResult<RenderStats> {
    let out_path = out_path.into();
    tracing::info!(out = %out_path.display(), codec = ?opts.codec, "encoding mp4");
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(out_path).with_codec(opts.codec));
    render_frames(record, opts, &mut sink)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::sink::InMemorySink;
    use crate::model::Keypoint;
    use crate::skeleton::KEYPOINTS_PER_FRAME;

    fn frame(n: usize) -> FrameDef {
        FrameDef {
            keypoints: vec![Keypoint::new(0.5, 0.5); n],
        }
    }

    #[test]
    fn default_opts_are_valid() {
        RenderOpts::default().validate().unwrap();
    }

    #[test]
    fn zero_canvas_or_fps_is_rejected() {
        let mut opts = RenderOpts::default();
        opts.canvas.width = 0;
        assert!(matches!(opts.validate(), Err(ReelError::Validation(_))));

        let opts = RenderOpts {
            fps: Fps { num: 30, den: 0 },
            ..RenderOpts::default()
        };
        assert!(opts.validate().is_err());
    }

    #[test]
    fn renders_each_frame_into_sink() {
        let record = AnimationRecord {
            frames: vec![frame(KEYPOINTS_PER_FRAME); 3],
        };
        let mut sink = InMemorySink::new();
        let stats = render_frames(&record, &RenderOpts::default(), &mut sink).unwrap();
        assert_eq!(stats.frames_total, 3);
        assert_eq!(sink.frames().len(), 3);
        assert!(sink.is_finished());
    }

    #[test]
    fn short_frame_fails_before_sink_begins() {
        let record = AnimationRecord {
            frames: vec![frame(KEYPOINTS_PER_FRAME), frame(10)],
        };
        let mut sink = InMemorySink::new();
        let err = render_frames(&record, &RenderOpts::default(), &mut sink).unwrap_err();
        assert!(matches!(err, ReelError::Structural(_)));
        assert!(sink.config().is_none());
        assert!(sink.frames().is_empty());
    }

    #[test]
    fn render_frame_paints_center() {
        let out = render_frame(&frame(KEYPOINTS_PER_FRAME), &RenderOpts::default()).unwrap();
        assert_ne!(out.pixel(320, 240), Some(crate::foundation::core::Rgb8::BLACK));
    }
}
