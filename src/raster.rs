//! Raster canvas backed by an RGBA image buffer.
//!
//! Executes draw commands with `imageproc` primitives under source-over
//! alpha blending, so a composited frame can be written to disk.

use crate::camera::VideoFrame;
use crate::draw::{Canvas, Point2, Segment};
use crate::utils::color::Color;
use crate::utils::safe_cast::{f32_to_i32_clamp, unit_to_u8};
use crate::Result;
use image::imageops::{self, FilterType};
use image::{Pixel, Rgba, RgbaImage};
use imageproc::drawing::{draw_line_segment_mut, draw_polygon_mut, Blend};
use imageproc::point::Point;
use std::path::Path;

/// Coordinates are clamped to this magnitude before rasterization
const COORD_LIMIT: i32 = 1 << 20;

/// Strokes at or below this width are drawn as single-pixel lines
const HAIRLINE_WIDTH: f32 = 1.5;

/// Canvas that rasterizes into an owned [`RgbaImage`]
pub struct ImageCanvas {
    target: Blend<RgbaImage>,
}

impl std::fmt::Debug for ImageCanvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageCanvas")
            .field("width", &self.target.0.width())
            .field("height", &self.target.0.height())
            .finish()
    }
}

impl Default for ImageCanvas {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

impl ImageCanvas {
    /// Transparent canvas of the given size
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            target: Blend(RgbaImage::new(width, height)),
        }
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.target.0.width()
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.target.0.height()
    }

    #[must_use]
    pub fn image(&self) -> &RgbaImage {
        &self.target.0
    }

    #[must_use]
    pub fn into_image(self) -> RgbaImage {
        self.target.0
    }

    /// Write the canvas to an image file; the format follows the extension
    ///
    /// # Errors
    ///
    /// Returns an error if the image cannot be encoded or written.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.target.0.save(path)?;
        Ok(())
    }

    fn to_pixel(point: Point2) -> (i32, i32) {
        (
            f32_to_i32_clamp(point.x, -COORD_LIMIT, COORD_LIMIT),
            f32_to_i32_clamp(point.y, -COORD_LIMIT, COORD_LIMIT),
        )
    }

    fn stroke_segment(&mut self, segment: &Segment, color: Color, width: f32) {
        let pixel: Rgba<u8> = color.into();
        let (dx, dy) = (segment.to.x - segment.from.x, segment.to.y - segment.from.y);
        let length = dx.hypot(dy);

        if !length.is_finite() || length <= f32::EPSILON {
            self.disc(segment.from, width / 2.0, color);
            return;
        }

        if width <= HAIRLINE_WIDTH {
            self.hairline(segment, pixel);
            return;
        }

        // Quad around the segment, offset by half the width along the normal
        let (nx, ny) = (-dy / length * width / 2.0, dx / length * width / 2.0);
        let corners = [
            segment.from.offset(nx, ny),
            segment.to.offset(nx, ny),
            segment.to.offset(-nx, -ny),
            segment.from.offset(-nx, -ny),
        ];
        let mut polygon: Vec<Point<i32>> = Vec::with_capacity(corners.len());
        for corner in corners {
            let (x, y) = Self::to_pixel(corner);
            let point = Point::new(x, y);
            if polygon.last() != Some(&point) {
                polygon.push(point);
            }
        }
        while polygon.len() > 1 && polygon.first() == polygon.last() {
            polygon.pop();
        }

        if polygon.len() < 3 {
            self.hairline(segment, pixel);
        } else {
            draw_polygon_mut(&mut self.target, &polygon, pixel);
        }
    }

    fn hairline(&mut self, segment: &Segment, pixel: Rgba<u8>) {
        let (x0, y0) = Self::to_pixel(segment.from);
        let (x1, y1) = Self::to_pixel(segment.to);
        draw_line_segment_mut(&mut self.target, (x0 as f32, y0 as f32), (x1 as f32, y1 as f32), pixel);
    }

    /// Solid disc; each covered pixel is blended exactly once
    fn disc(&mut self, center: Point2, radius: f32, color: Color) {
        if !(radius.is_finite() && radius > 0.0) {
            return;
        }
        self.shade_radial(center, radius, color, |distance| if distance <= radius { 1.0 } else { 0.0 });
    }

    /// Blend `color` into every pixel in the bounding box of a circle,
    /// weighted by `coverage(distance_from_center)`
    fn shade_radial<F>(&mut self, center: Point2, extent: f32, color: Color, coverage: F)
    where
        F: Fn(f32) -> f32,
    {
        let (width, height) = (self.width(), self.height());
        if width == 0 || height == 0 || !(extent.is_finite() && extent > 0.0) {
            return;
        }

        let max_x = f32_to_i32_clamp(width as f32 - 1.0, 0, COORD_LIMIT);
        let max_y = f32_to_i32_clamp(height as f32 - 1.0, 0, COORD_LIMIT);
        let x0 = f32_to_i32_clamp((center.x - extent).floor(), 0, max_x);
        let x1 = f32_to_i32_clamp((center.x + extent).ceil(), 0, max_x);
        let y0 = f32_to_i32_clamp((center.y - extent).floor(), 0, max_y);
        let y1 = f32_to_i32_clamp((center.y + extent).ceil(), 0, max_y);

        let base_alpha = color.opacity();
        for y in y0..=y1 {
            for x in x0..=x1 {
                let distance = (x as f32 + 0.5 - center.x).hypot(y as f32 + 0.5 - center.y);
                let weight = coverage(distance);
                if weight <= 0.0 {
                    continue;
                }
                let mut source: Rgba<u8> = color.into();
                source.0[3] = unit_to_u8(base_alpha * weight);
                // Both coordinates are clamped into the buffer above
                #[allow(clippy::cast_sign_loss)]
                self.target.0.get_pixel_mut(x as u32, y as u32).blend(&source);
            }
        }
    }
}

impl Canvas for ImageCanvas {
    fn clear(&mut self, width: u32, height: u32) {
        if self.width() == width && self.height() == height {
            for pixel in self.target.0.pixels_mut() {
                *pixel = Rgba([0, 0, 0, 0]);
            }
        } else {
            self.target.0 = RgbaImage::new(width, height);
        }
    }

    fn draw_video(&mut self, frame: &VideoFrame, mirrored: bool) {
        if frame.is_empty() || self.width() == 0 || self.height() == 0 {
            return;
        }

        let mut image = if frame.width() == self.width() && frame.height() == self.height() {
            frame.image().clone()
        } else {
            imageops::resize(frame.image(), self.width(), self.height(), FilterType::Triangle)
        };
        if mirrored {
            imageops::flip_horizontal_in_place(&mut image);
        }
        self.target.0 = image;
    }

    fn stroke_connectors(&mut self, segments: &[Segment], color: Color, width: f32) {
        for segment in segments {
            self.stroke_segment(segment, color, width);
        }
    }

    fn fill_circle(&mut self, center: Point2, radius: f32, color: Color) {
        self.disc(center, radius, color);
    }

    fn stroke_circle(&mut self, center: Point2, radius: f32, color: Color, width: f32) {
        let half = (width / 2.0).max(0.5);
        self.shade_radial(center, radius + half, color, |distance| {
            if (distance - radius).abs() <= half {
                1.0
            } else {
                0.0
            }
        });
    }

    fn radial_glow(&mut self, center: Point2, radius: f32, color: Color) {
        self.shade_radial(center, radius, color, |distance| (1.0 - distance / radius).max(0.0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn red() -> Color {
        Color::rgb(255, 0, 0)
    }

    #[test]
    fn test_clear_resizes_and_resets() {
        let mut canvas = ImageCanvas::new(4, 4);
        canvas.fill_circle(Point2::new(2.0, 2.0), 2.0, red());
        canvas.clear(4, 4);
        assert!(canvas.image().pixels().all(|p| p.0[3] == 0));

        canvas.clear(8, 6);
        assert_eq!((canvas.width(), canvas.height()), (8, 6));
    }

    #[test]
    fn test_video_blit_mirrors() {
        let mut image = RgbaImage::new(2, 1);
        image.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        image.put_pixel(1, 0, Rgba([0, 0, 255, 255]));
        let frame = VideoFrame::new(image);

        let mut canvas = ImageCanvas::new(2, 1);
        canvas.draw_video(&frame, true);
        assert_eq!(canvas.image().get_pixel(0, 0), &Rgba([0, 0, 255, 255]));
        assert_eq!(canvas.image().get_pixel(1, 0), &Rgba([255, 0, 0, 255]));

        canvas.draw_video(&frame, false);
        assert_eq!(canvas.image().get_pixel(0, 0), &Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_video_blit_scales_to_buffer() {
        let frame = VideoFrame::blank(16, 8);
        let mut canvas = ImageCanvas::new(4, 2);
        canvas.draw_video(&frame, true);
        assert_eq!((canvas.width(), canvas.height()), (4, 2));
    }

    #[test]
    fn test_thick_stroke_covers_midpoint() {
        let mut canvas = ImageCanvas::new(20, 20);
        let segment = Segment {
            from: Point2::new(2.0, 10.0),
            to: Point2::new(18.0, 10.0),
        };
        canvas.stroke_connectors(&[segment], red(), 4.0);
        assert_eq!(canvas.image().get_pixel(10, 10).0[0], 255);
        assert_eq!(canvas.image().get_pixel(10, 1).0[3], 0);
    }

    #[test]
    fn test_degenerate_segments_do_not_panic() {
        let mut canvas = ImageCanvas::new(10, 10);
        let point = Point2::new(5.0, 5.0);
        let tiny = Segment {
            from: point,
            to: point.offset(0.01, 0.0),
        };
        let zero = Segment { from: point, to: point };
        let far = Segment {
            from: Point2::new(f32::NAN, 0.0),
            to: Point2::new(1e30, -1e30),
        };
        canvas.stroke_connectors(&[tiny, zero, far], red(), 3.0);
        let long = Segment {
            from: Point2::new(-1e9, 5.0),
            to: Point2::new(1e9, 5.0),
        };
        canvas.stroke_connectors(&[tiny, zero, long], red(), 1.0);
    }

    #[test]
    fn test_translucent_fill_blends() {
        let mut canvas = ImageCanvas::new(9, 9);
        canvas.draw_video(&VideoFrame::new(RgbaImage::from_pixel(9, 9, Rgba([0, 0, 0, 255]))), false);
        canvas.fill_circle(Point2::new(4.5, 4.5), 3.0, Color::rgba(255, 255, 255, 0x80));
        let center = canvas.image().get_pixel(4, 4);
        assert!(center.0[0] > 100 && center.0[0] < 160, "got {:?}", center);
        assert_eq!(center.0[3], 255);
    }

    #[test]
    fn test_glow_fades_with_distance() {
        let mut canvas = ImageCanvas::new(21, 21);
        canvas.radial_glow(Point2::new(10.5, 10.5), 8.0, Color::rgba(255, 255, 0, 204));
        let center = canvas.image().get_pixel(10, 10).0[3];
        let edge = canvas.image().get_pixel(16, 10).0[3];
        let outside = canvas.image().get_pixel(0, 0).0[3];
        assert!(center > edge);
        assert_eq!(outside, 0);
    }

    #[test]
    fn test_stroke_circle_leaves_center_empty() {
        let mut canvas = ImageCanvas::new(21, 21);
        canvas.stroke_circle(Point2::new(10.5, 10.5), 6.0, red(), 1.0);
        assert_eq!(canvas.image().get_pixel(10, 10).0[3], 0);
        assert!(canvas.image().get_pixel(16, 10).0[3] > 0);
    }

    #[test]
    fn test_drawing_on_empty_canvas_is_noop() {
        let mut canvas = ImageCanvas::default();
        canvas.radial_glow(Point2::new(0.0, 0.0), 5.0, red());
        canvas.stroke_circle(Point2::new(0.0, 0.0), 5.0, red(), 2.0);
        canvas.draw_video(&VideoFrame::blank(4, 4), true);
        assert_eq!(canvas.width(), 0);
    }
}
