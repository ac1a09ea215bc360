use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut};

use crate::foundation::core::{Canvas, Rgb8};
use crate::model::Keypoint;
use crate::render::frame::RenderedFrame;
use crate::render::style::SkeletonStyle;
use crate::segment::PoseFrame;
use crate::skeleton::{HAND_CONNECTIONS, HAND_ROOT, LEFT_WRIST, POSE_CONNECTIONS, RIGHT_WRIST};

/// Paint one frame.
///
/// Draw order is fixed and later draws win on shared pixels: pose points and lines, left hand,
/// right hand, then the two wrist connectors.
pub fn compose_frame(frame: &PoseFrame, canvas: Canvas, style: &SkeletonStyle) -> RenderedFrame {
    let mut out = RenderedFrame::blank(canvas, style.background);
    let img = out.image_mut();

    let segments: [(&[Keypoint], &[[usize; 2]], Rgb8); 3] = [
        (&frame.pose, &POSE_CONNECTIONS, style.pose),
        (&frame.left_hand, &HAND_CONNECTIONS, style.left_hand),
        (&frame.right_hand, &HAND_CONNECTIONS, style.right_hand),
    ];
    for (points, table, color) in segments {
        draw_points(img, canvas, points, color, style.point_radius);
        draw_connections(img, canvas, points, table, color, style.brush_radius());
    }

    let connectors = [
        (frame.pose[RIGHT_WRIST], frame.right_hand[HAND_ROOT]),
        (frame.pose[LEFT_WRIST], frame.left_hand[HAND_ROOT]),
    ];
    for (a, b) in connectors {
        draw_thick_line(
            img,
            canvas.to_pixel(a.x, a.y),
            canvas.to_pixel(b.x, b.y),
            style.connector.to_pixel(),
            style.brush_radius(),
        );
    }

    out
}

/// Filled circle for every point.
pub fn draw_points(
    img: &mut RgbImage,
    canvas: Canvas,
    points: &[Keypoint],
    color: Rgb8,
    radius: i32,
) {
    let color = color.to_pixel();
    for k in points {
        let (cx, cy) = canvas.to_pixel(k.x, k.y);
        if !near_canvas(canvas, cx, cy, radius) {
            continue;
        }
        draw_filled_circle_mut(img, (cx, cy), radius, color);
    }
}

/// Lines for every table entry whose indices both exist in `points`; other entries are skipped.
pub fn draw_connections(
    img: &mut RgbImage,
    canvas: Canvas,
    points: &[Keypoint],
    table: &[[usize; 2]],
    color: Rgb8,
    brush_radius: i32,
) {
    let color = color.to_pixel();
    for &[a, b] in table {
        let (Some(pa), Some(pb)) = (points.get(a), points.get(b)) else {
            continue;
        };
        draw_thick_line(
            img,
            canvas.to_pixel(pa.x, pa.y),
            canvas.to_pixel(pb.x, pb.y),
            color,
            brush_radius,
        );
    }
}

fn near_canvas(canvas: Canvas, x: i32, y: i32, margin: i32) -> bool {
    let (x, y, m) = (i64::from(x), i64::from(y), i64::from(margin));
    x >= -m && y >= -m && x < i64::from(canvas.width) + m && y < i64::from(canvas.height) + m
}

/// Stamp a round brush of `brush_radius` along the segment by offsetting 1 px lines.
fn draw_thick_line(
    img: &mut RgbImage,
    start: (i32, i32),
    end: (i32, i32),
    color: Rgb<u8>,
    brush_radius: i32,
) {
    let canvas = Canvas {
        width: img.width(),
        height: img.height(),
    };
    let Some((s, e)) = clip_segment(canvas, start, end, f64::from(brush_radius)) else {
        return;
    };
    let r = brush_radius;
    for dy in -r..=r {
        for dx in -r..=r {
            if dx * dx + dy * dy > r * r {
                continue;
            }
            let (dx, dy) = (dx as f32, dy as f32);
            draw_line_segment_mut(img, (s.0 + dx, s.1 + dy), (e.0 + dx, e.1 + dy), color);
        }
    }
}

type PointF = (f32, f32);

/// Liang-Barsky clip of a pixel segment against the canvas grown by `margin`.
///
/// Segments fully inside come back unchanged; segments fully outside return `None`.
fn clip_segment(
    canvas: Canvas,
    start: (i32, i32),
    end: (i32, i32),
    margin: f64,
) -> Option<(PointF, PointF)> {
    let (x0, y0) = (f64::from(start.0), f64::from(start.1));
    let (x1, y1) = (f64::from(end.0), f64::from(end.1));
    let (min_x, min_y) = (-margin, -margin);
    let max_x = f64::from(canvas.width) - 1.0 + margin;
    let max_y = f64::from(canvas.height) - 1.0 + margin;

    let (dx, dy) = (x1 - x0, y1 - y0);
    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;
    for (p, q) in [
        (-dx, x0 - min_x),
        (dx, max_x - x0),
        (-dy, y0 - min_y),
        (dy, max_y - y0),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            if t > t1 {
                return None;
            }
            t0 = t0.max(t);
        } else {
            if t < t0 {
                return None;
            }
            t1 = t1.min(t);
        }
    }

    let at = |t: f64| ((x0 + t * dx) as f32, (y0 + t * dy) as f32);
    Some((at(t0), at(t1)))
}
