use image::{Rgb, RgbImage};

use crate::foundation::core::{Canvas, Rgb8};

/// A rendered frame as tightly packed RGB8 pixels, row-major.
///
/// Created fresh for every input frame and handed to a sink; never reused.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderedFrame {
    image: RgbImage,
}

impl RenderedFrame {
    /// Allocate a frame filled with `background`.
    pub fn blank(canvas: Canvas, background: Rgb8) -> Self {
        Self {
            image: RgbImage::from_pixel(canvas.width, canvas.height, background.to_pixel()),
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Dimensions as a [`Canvas`].
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width(),
            height: self.height(),
        }
    }

    /// Pixel at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb8> {
        self.image
            .get_pixel_checked(x, y)
            .map(|&Rgb([r, g, b])| Rgb8::new(r, g, b))
    }

    /// Raw `rgb24` bytes, `width * height * 3` long.
    pub fn data(&self) -> &[u8] {
        self.image.as_raw()
    }

    /// Underlying image buffer.
    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub(crate) fn image_mut(&mut self) -> &mut RgbImage {
        &mut self.image
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_frame_is_black_rgb24() {
        let f = RenderedFrame::blank(Canvas::default(), Rgb8::BLACK);
        assert_eq!((f.width(), f.height()), (640, 480));
        assert_eq!(f.data().len(), 640 * 480 * 3);
        assert!(f.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn pixel_outside_is_none() {
        let f = RenderedFrame::blank(Canvas { width: 4, height: 2 }, Rgb8::RED);
        assert_eq!(f.pixel(3, 1), Some(Rgb8::RED));
        assert_eq!(f.pixel(4, 0), None);
    }
}
