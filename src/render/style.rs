use crate::foundation::core::Rgb8;

/// How a skeleton is painted.
///
/// `Default` is green body, blue left hand, red right hand, radius-5 points and 2 px lines on
/// black.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SkeletonStyle {
    /// Fill behind everything.
    pub background: Rgb8,
    /// Body points and lines.
    pub pose: Rgb8,
    /// Left hand points and lines.
    pub left_hand: Rgb8,
    /// Right hand points and lines.
    pub right_hand: Rgb8,
    /// Color of the two wrist-to-hand connector lines.
    pub connector: Rgb8,
    /// Filled circle radius in pixels.
    pub point_radius: i32,
    /// Line width in pixels.
    pub line_thickness: u32,
}

impl Default for SkeletonStyle {
    fn default() -> Self {
        Self {
            background: Rgb8::BLACK,
            pose: Rgb8::GREEN,
            left_hand: Rgb8::BLUE,
            right_hand: Rgb8::RED,
            connector: Rgb8::GREEN,
            point_radius: 5,
            line_thickness: 2,
        }
    }
}

impl SkeletonStyle {
    /// Radius of the round brush a line of `line_thickness` is stamped with.
    pub(crate) fn brush_radius(&self) -> i32 {
        (self.line_thickness / 2) as i32
    }
}
