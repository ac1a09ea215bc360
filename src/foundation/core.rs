use crate::foundation::error::{ReelError, ReelResult};

/// Absolute 0-based frame index in output video order.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Frames-per-second represented as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32, // must be > 0
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> ReelResult<Self> {
        if den == 0 {
            return Err(ReelError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(ReelError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }
}

impl Default for Fps {
    fn default() -> Self {
        Self { num: 30, den: 1 }
    }
}

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Map a normalized coordinate to a pixel position, truncating toward zero.
    ///
    /// Values far outside the canvas saturate at the `i32` bounds.
    pub fn to_pixel(self, x: f64, y: f64) -> (i32, i32) {
        (
            (x * f64::from(self.width)) as i32,
            (y * f64::from(self.height)) as i32,
        )
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
        }
    }
}

/// Straight RGB8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgb8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb8 {
    /// Background.
    pub const BLACK: Rgb8 = Rgb8::new(0, 0, 0);
    /// Pose segment.
    pub const GREEN: Rgb8 = Rgb8::new(0, 255, 0);
    /// Left hand.
    pub const BLUE: Rgb8 = Rgb8::new(0, 0, 255);
    /// Right hand.
    pub const RED: Rgb8 = Rgb8::new(255, 0, 0);

    /// Color from channel values.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Convert to an `image` pixel.
    pub fn to_pixel(self) -> image::Rgb<u8> {
        image::Rgb([self.r, self.g, self.b])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fps_rejects_zero_parts() {
        assert!(Fps::new(0, 1).is_err());
        assert!(Fps::new(30, 0).is_err());
        assert_eq!(Fps::new(30, 1).unwrap(), Fps::default());
    }

    #[test]
    fn to_pixel_truncates_toward_zero() {
        let canvas = Canvas::default();
        assert_eq!(canvas.to_pixel(0.5, 0.5), (320, 240));
        assert_eq!(canvas.to_pixel(0.9999, 0.0), (639, 0));
        assert_eq!(canvas.to_pixel(-0.0001, 1.0 - 0.3), (0, 336));
    }

    #[test]
    fn to_pixel_saturates_on_huge_values() {
        let canvas = Canvas::default();
        assert_eq!(canvas.to_pixel(1e12, -1e12), (i32::MAX, i32::MIN));
    }
}
