use std::ops::{Add, Div, Mul, Sub};

use serde::{Deserialize, Serialize};

mod catalog;
mod config;
mod controller;
mod editor;
mod error;
mod hit;
mod image_load;
mod render;
mod scene;
mod viewport;

pub use catalog::{Catalog, Graphic, ItemDefinition, ItemId, Shape, RASTER_ITEM_COUNT};
pub use config::{EditorConfig, HitTest, SliderRange};
pub use controller::{Changes, Gesture};
pub use editor::{Editor, SelectionView};
pub use error::EditorError;
pub use hit::{find_topmost_at, find_topmost_with};
pub use image_load::{probe_image, BackgroundImage, ImageLoader, LoadOutcome, LoadState, LoadTicket};
pub use render::{AssetSource, DrawOp, Frame, NoAssets, HIGHLIGHT_COLOR, PLACEHOLDER_COLOR};
pub use scene::{ItemField, PlacedItem, Scene};
pub use viewport::{clamp_scale, Viewport, MAX_SCALE, MIN_SCALE};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn distance_to(self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f64> for Point {
    type Output = Point;

    fn div(self, rhs: f64) -> Point {
        Point::new(self.x / rhs, self.y / rhs)
    }
}

/// Width and height of a drawing surface or raster, in its own pixels.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_empty(self) -> bool {
        !(self.width > 0.0 && self.height > 0.0) || !self.width.is_finite() || !self.height.is_finite()
    }

    pub fn center(self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}
