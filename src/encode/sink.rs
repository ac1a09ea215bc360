//! The sink contract and an in-memory implementation.

use crate::foundation::core::{Canvas, Fps, FrameIndex};
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::frame::RenderedFrame;

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    /// Size every pushed frame must have.
    pub canvas: Canvas,
    /// Output frame rate.
    pub fps: Fps,
}

/// Sink contract for consuming rendered frames in order.
///
/// `begin` is called exactly once, then `push_frame` with strictly increasing indices, then `end`
/// exactly once, also when no frames were pushed.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> ReelResult<()>;
    /// Push one frame in strictly increasing order.
    fn push_frame(&mut self, idx: FrameIndex, frame: &RenderedFrame) -> ReelResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> ReelResult<()>;
}

/// Tracks where a sink is in its `begin`/`push_frame`/`end` lifecycle.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SinkState {
    #[default]
    Idle,
    Open {
        cfg: SinkConfig,
        last: Option<FrameIndex>,
    },
    Finished,
}

impl SinkState {
    pub(crate) fn begin(&mut self, cfg: SinkConfig) -> ReelResult<()> {
        match self {
            Self::Idle => {
                *self = Self::Open { cfg, last: None };
                Ok(())
            }
            Self::Open { .. } => Err(ReelError::validation("sink already started")),
            Self::Finished => Err(ReelError::validation("sink is already finalized")),
        }
    }

    /// Check ordering and size for one frame and record its index.
    pub(crate) fn accept(&mut self, idx: FrameIndex, frame: &RenderedFrame) -> ReelResult<()> {
        match self {
            Self::Idle => Err(ReelError::validation("sink received a frame before begin")),
            Self::Finished => Err(ReelError::validation("sink is already finalized")),
            Self::Open { cfg, last } => {
                if let Some(prev) = *last
                    && idx <= prev
                {
                    return Err(ReelError::validation(format!(
                        "sink received out-of-order frame index {} after {}",
                        idx.0, prev.0
                    )));
                }
                if frame.canvas() != cfg.canvas {
                    return Err(ReelError::validation(format!(
                        "frame size mismatch: got {}x{}, expected {}x{}",
                        frame.width(),
                        frame.height(),
                        cfg.canvas.width,
                        cfg.canvas.height
                    )));
                }
                *last = Some(idx);
                Ok(())
            }
        }
    }

    pub(crate) fn finish(&mut self) -> ReelResult<()> {
        match self {
            Self::Open { .. } => {
                *self = Self::Finished;
                Ok(())
            }
            Self::Idle => Err(ReelError::validation("sink not started")),
            Self::Finished => Err(ReelError::validation("sink is already finalized")),
        }
    }
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    state: SinkState,
    frames: Vec<(FrameIndex, RenderedFrame)>,
}

impl InMemorySink {
    /// Empty, not yet begun.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the sink configuration captured in `begin`, if still open.
    pub fn config(&self) -> Option<SinkConfig> {
        match self.state {
            SinkState::Open { cfg, .. } => Some(cfg),
            _ => None,
        }
    }

    /// `true` once `end` succeeded.
    pub fn is_finished(&self) -> bool {
        self.state == SinkState::Finished
    }

    /// Frames in push order.
    pub fn frames(&self) -> &[(FrameIndex, RenderedFrame)] {
        &self.frames
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> ReelResult<()> {
        self.state.begin(cfg)?;
        self.frames.clear();
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &RenderedFrame) -> ReelResult<()> {
        self.state.accept(idx, frame)?;
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> ReelResult<()> {
        self.state.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::core::Rgb8;

    fn cfg() -> SinkConfig {
        SinkConfig {
            canvas: Canvas {
                width: 4,
                height: 4,
            },
            fps: Fps::default(),
        }
    }

    fn frame() -> RenderedFrame {
        RenderedFrame::blank(cfg().canvas, Rgb8::BLACK)
    }

    #[test]
    fn captures_frames_in_order() {
        let mut sink = InMemorySink::new();
        sink.begin(cfg()).unwrap();
        sink.push_frame(FrameIndex(0), &frame()).unwrap();
        sink.push_frame(FrameIndex(1), &frame()).unwrap();
        assert_eq!(sink.config(), Some(cfg()));
        sink.end().unwrap();
        assert!(sink.is_finished());
        let idx: Vec<u64> = sink.frames().iter().map(|(i, _)| i.0).collect();
        assert_eq!(idx, vec![0, 1]);
    }

    #[test]
    fn rejects_out_of_order_and_duplicate_indices() {
        let mut sink = InMemorySink::new();
        sink.begin(cfg()).unwrap();
        sink.push_frame(FrameIndex(3), &frame()).unwrap();
        assert!(sink.push_frame(FrameIndex(3), &frame()).is_err());
        assert!(sink.push_frame(FrameIndex(2), &frame()).is_err());
    }

    #[test]
    fn rejects_frames_after_end() {
        let mut sink = InMemorySink::new();
        sink.begin(cfg()).unwrap();
        sink.end().unwrap();
        let err = sink.push_frame(FrameIndex(0), &frame()).unwrap_err();
        assert!(err.to_string().contains("already finalized"));
        assert!(sink.end().is_err());
    }

    #[test]
    fn rejects_frames_before_begin_and_wrong_sizes() {
        let mut sink = InMemorySink::new();
        assert!(sink.push_frame(FrameIndex(0), &frame()).is_err());
        sink.begin(cfg()).unwrap();
        let big = RenderedFrame::blank(Canvas::default(), Rgb8::BLACK);
        let err = sink.push_frame(FrameIndex(0), &big).unwrap_err();
        assert!(err.to_string().contains("frame size mismatch"));
    }

    #[test]
    fn empty_range_still_finishes() {
        let mut sink = InMemorySink::new();
        sink.begin(cfg()).unwrap();
        sink.end().unwrap();
        assert!(sink.frames().is_empty());
        assert!(sink.is_finished());
    }
}
