//! Keypoint normalization and the split into body, left hand and right hand.

use serde::{Deserialize, Serialize};

use crate::foundation::error::{ReelError, ReelResult};
use crate::model::{FrameDef, Keypoint};
use crate::skeleton::{
    HAND_POINTS, KEYPOINTS_PER_FRAME, LEFT_HAND_START, POSE_POINTS, RIGHT_HAND_START,
};

/// What to do with coordinates outside `[0, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum CoordinatePolicy {
    /// Draw anyway; anything landing off-canvas is clipped away.
    #[default]
    Clip,
    /// Clamp both coordinates into `[0, 1]` after the vertical flip.
    Clamp,
    /// Fail validation with a structural error.
    Reject,
}

impl CoordinatePolicy {
    fn apply(self, k: Keypoint) -> Keypoint {
        match self {
            Self::Clamp => Keypoint::new(k.x.clamp(0.0, 1.0), k.y.clamp(0.0, 1.0)),
            Self::Clip | Self::Reject => k,
        }
    }
}

/// Flip every keypoint back into image orientation (`y' = 1 - y`).
pub fn normalize_keypoints(raw: &[Keypoint], policy: CoordinatePolicy) -> Vec<Keypoint> {
    raw.iter().map(|k| policy.apply(k.flipped())).collect()
}

/// One frame's keypoints split by anatomical role.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PoseFrame {
    /// Indices `[0, 15)`.
    pub pose: [Keypoint; POSE_POINTS],
    /// Indices `[15, 36)`.
    pub left_hand: [Keypoint; HAND_POINTS],
    /// Indices `[36, 57)`.
    pub right_hand: [Keypoint; HAND_POINTS],
}

impl PoseFrame {
    /// Slice an already normalized keypoint list into its three segments.
    ///
    /// Points past [`KEYPOINTS_PER_FRAME`] are ignored.
    pub fn partition(normalized: &[Keypoint]) -> ReelResult<Self> {
        if normalized.len() < KEYPOINTS_PER_FRAME {
            return Err(ReelError::structural(format!(
                "frame has {} keypoints, expected at least {KEYPOINTS_PER_FRAME}",
                normalized.len()
            )));
        }
        Ok(Self {
            pose: segment(normalized, 0)?,
            left_hand: segment(normalized, LEFT_HAND_START)?,
            right_hand: segment(normalized, RIGHT_HAND_START)?,
        })
    }

    /// Normalize and partition one raw frame.
    pub fn from_frame(frame: &FrameDef, policy: CoordinatePolicy) -> ReelResult<Self> {
        let extra = frame.keypoints.len().saturating_sub(KEYPOINTS_PER_FRAME);
        if extra > 0 {
            tracing::debug!(extra, "ignoring keypoints past the right hand");
        }
        Self::partition(&normalize_keypoints(&frame.keypoints, policy))
    }
}

fn segment<const N: usize>(points: &[Keypoint], start: usize) -> ReelResult<[Keypoint; N]> {
    points
        .get(start..start + N)
        .and_then(|s| <[Keypoint; N]>::try_from(s).ok())
        .ok_or_else(|| {
            ReelError::structural(format!(
                "keypoints [{start}, {}) are missing",
                start + N
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(n: usize) -> Vec<Keypoint> {
        (0..n).map(|i| Keypoint::new(i as f64, 0.0)).collect()
    }

    #[test]
    fn normalize_flips_only_y() {
        let out = normalize_keypoints(&[Keypoint::new(0.25, 0.3)], CoordinatePolicy::Clip);
        assert_eq!(out[0].x, 0.25);
        assert!((out[0].y - 0.7).abs() < 1e-12);
    }

    #[test]
    fn clip_keeps_out_of_range_values() {
        let out = normalize_keypoints(&[Keypoint::new(1.5, 1.2)], CoordinatePolicy::Clip);
        assert_eq!(out[0].x, 1.5);
        assert!((out[0].y + 0.2).abs() < 1e-12);
    }

    #[test]
    fn clamp_applies_after_flip() {
        let out = normalize_keypoints(
            &[Keypoint::new(1.5, 1.2), Keypoint::new(-0.5, -3.0)],
            CoordinatePolicy::Clamp,
        );
        assert_eq!(out, vec![Keypoint::new(1.0, 0.0), Keypoint::new(0.0, 1.0)]);
    }

    #[test]
    fn partition_splits_by_position() {
        let pts = ramp(KEYPOINTS_PER_FRAME);
        let pf = PoseFrame::partition(&pts).unwrap();
        assert_eq!(pf.pose[0].x, 0.0);
        assert_eq!(pf.pose[14].x, 14.0);
        assert_eq!(pf.left_hand[0].x, 15.0);
        assert_eq!(pf.left_hand[20].x, 35.0);
        assert_eq!(pf.right_hand[0].x, 36.0);
        assert_eq!(pf.right_hand[20].x, 56.0);
    }

    #[test]
    fn partition_ignores_trailing_points() {
        let pts = ramp(KEYPOINTS_PER_FRAME + 4);
        let pf = PoseFrame::partition(&pts).unwrap();
        assert_eq!(pf.right_hand[20].x, 56.0);
    }

    #[test]
    fn partition_rejects_short_frames() {
        let err = PoseFrame::partition(&ramp(10)).unwrap_err();
        assert!(matches!(err, ReelError::Structural(_)));
        assert!(err.to_string().contains("10 keypoints"));

        assert!(PoseFrame::partition(&ramp(KEYPOINTS_PER_FRAME - 1)).is_err());
    }

    #[test]
    fn from_frame_flips_before_partition() {
        let frame = FrameDef {
            keypoints: vec![Keypoint::new(0.5, 0.25); KEYPOINTS_PER_FRAME],
        };
        let pf = PoseFrame::from_frame(&frame, CoordinatePolicy::Clip).unwrap();
        assert_eq!(pf.right_hand[3], Keypoint::new(0.5, 0.75));
    }
}
