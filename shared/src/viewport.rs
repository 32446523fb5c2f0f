use serde::{Deserialize, Serialize};

use crate::{Point, Size};

pub const MIN_SCALE: f64 = 0.5;
pub const MAX_SCALE: f64 = 5.0;

/// Clamps a requested zoom into `[MIN_SCALE, MAX_SCALE]`; NaN maps to `MIN_SCALE`.
pub fn clamp_scale(scale: f64) -> f64 {
    if scale.is_nan() {
        return MIN_SCALE;
    }
    scale.clamp(MIN_SCALE, MAX_SCALE)
}

/// Affine map `canvas = image * scale + offset`.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub scale: f64,
    pub offset: Point,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset: Point::ORIGIN,
        }
    }
}

impl Viewport {
    pub fn new(scale: f64, offset: Point) -> Self {
        Self { scale, offset }
    }

    pub fn image_to_canvas(&self, point: Point) -> Point {
        point * self.scale + self.offset
    }

    pub fn canvas_to_image(&self, point: Point) -> Point {
        (point - self.offset) / self.scale
    }

    /// Converts a canvas-space displacement into image space.
    pub fn canvas_delta_to_image(&self, delta: Point) -> Point {
        delta / self.scale
    }

    /// Returns the viewport rescaled so the image point under `anchor` stays put.
    pub fn zoomed_at(&self, scale: f64, anchor: Point) -> Viewport {
        let scale = clamp_scale(scale);
        let image_point = self.canvas_to_image(anchor);
        Viewport {
            scale,
            offset: anchor - image_point * scale,
        }
    }

    pub fn zoom_at_point(&mut self, scale: f64, anchor: Point) {
        *self = self.zoomed_at(scale, anchor);
    }

    /// The largest scale showing all of `image` inside `canvas`, centred.
    ///
    /// The fit scale is deliberately not clamped: a huge photo on a small
    /// canvas must still fit without cropping.
    pub fn fit(canvas: Size, image: Size) -> Option<Viewport> {
        if canvas.is_empty() || image.is_empty() {
            return None;
        }
        let h_ratio = canvas.width / image.width;
        let v_ratio = canvas.height / image.height;
        let scale = h_ratio.min(v_ratio);
        Some(Viewport {
            scale,
            offset: Point::new(
                (canvas.width - image.width * scale) / 2.0,
                (canvas.height - image.height * scale) / 2.0,
            ),
        })
    }

    /// Fits the image into the canvas. Returns false and leaves the viewport
    /// untouched when there is no image or either size is degenerate.
    pub fn reset_to_fit(&mut self, canvas: Size, image: Option<Size>) -> bool {
        match image.and_then(|image| Viewport::fit(canvas, image)) {
            Some(fitted) => {
                *self = fitted;
                true
            }
            None => false,
        }
    }

    pub fn pan_by(&mut self, delta: Point) {
        self.offset = self.offset + delta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
    }

    #[test]
    fn maps_both_directions() {
        let viewport = Viewport::new(2.0, Point::new(10.0, -4.0));
        assert_eq!(viewport.image_to_canvas(Point::new(3.0, 5.0)), Point::new(16.0, 6.0));
        assert_eq!(viewport.canvas_to_image(Point::new(16.0, 6.0)), Point::new(3.0, 5.0));
    }

    #[test]
    fn zoom_clamps_to_limits() {
        let mut viewport = Viewport::default();
        viewport.zoom_at_point(12.0, Point::new(50.0, 50.0));
        assert_eq!(viewport.scale, MAX_SCALE);
        viewport.zoom_at_point(0.01, Point::new(50.0, 50.0));
        assert_eq!(viewport.scale, MIN_SCALE);
        viewport.zoom_at_point(f64::NAN, Point::new(50.0, 50.0));
        assert_eq!(viewport.scale, MIN_SCALE);
    }

    #[test]
    fn zoom_keeps_anchor_fixed() {
        let mut viewport = Viewport::new(1.3, Point::new(-40.0, 25.0));
        let anchor = Point::new(320.0, 140.0);
        let before = viewport.canvas_to_image(anchor);
        viewport.zoom_at_point(3.7, anchor);
        assert!(close(viewport.canvas_to_image(anchor), before));
    }

    #[test]
    fn fit_landscape_image_into_smaller_canvas() {
        let viewport = Viewport::fit(Size::new(800.0, 600.0), Size::new(1600.0, 1200.0)).unwrap();
        assert_eq!(viewport.scale, 0.5);
        assert_eq!(viewport.offset, Point::ORIGIN);
    }

    #[test]
    fn fit_letterboxes_the_short_axis() {
        let viewport = Viewport::fit(Size::new(800.0, 600.0), Size::new(400.0, 400.0)).unwrap();
        assert_eq!(viewport.scale, 1.5);
        assert_eq!(viewport.offset, Point::new(100.0, 0.0));
    }

    #[test]
    fn reset_without_image_is_a_no_op() {
        let mut viewport = Viewport::new(2.0, Point::new(3.0, 4.0));
        assert!(!viewport.reset_to_fit(Size::new(800.0, 600.0), None));
        assert!(!viewport.reset_to_fit(Size::new(0.0, 600.0), Some(Size::new(10.0, 10.0))));
        assert_eq!(viewport, Viewport::new(2.0, Point::new(3.0, 4.0)));
    }

    #[test]
    fn pan_moves_offset_in_canvas_space() {
        let mut viewport = Viewport::new(4.0, Point::new(1.0, 1.0));
        viewport.pan_by(Point::new(10.0, -5.0));
        assert_eq!(viewport.offset, Point::new(11.0, -4.0));
        assert_eq!(viewport.scale, 4.0);
    }
}
