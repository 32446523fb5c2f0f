use serde::{Deserialize, Serialize};

use crate::error::EditorError;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum HitTest {
    /// Circle of diameter `max(size, length)` around the item position.
    #[default]
    BoundingCircle,
    /// The item's rotated `length x size` rectangle.
    OrientedBox,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct SliderRange {
    pub min: i32,
    pub max: i32,
    pub value: i32,
}

impl SliderRange {
    pub const fn new(min: i32, max: i32, value: i32) -> Self {
        Self { min, max, value }
    }

    /// Only meaningful on a validated range, where `min <= max`.
    pub fn clamp(&self, value: i32) -> i32 {
        value.max(self.min).min(self.max)
    }

    fn check(&self, name: &str) -> Result<(), EditorError> {
        if self.min > self.max {
            return Err(EditorError::InvalidConfig {
                reason: format!("{name} range {}..{} is empty", self.min, self.max),
            });
        }
        if self.clamp(self.value) != self.value {
            return Err(EditorError::InvalidConfig {
                reason: format!(
                    "{name} value {} lies outside {}..{}",
                    self.value, self.min, self.max
                ),
            });
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct EditorConfig {
    /// Scale change per wheel `deltaY` unit.
    pub wheel_sensitivity: f64,
    pub size: SliderRange,
    pub length: SliderRange,
    pub rotation: SliderRange,
    /// Canvas pixels between an item's bounds and its selection outline.
    pub selection_padding: f64,
    pub hit_test: HitTest,
    pub placeholder: String,
    pub export_file_name: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            wheel_sensitivity: 0.001,
            size: SliderRange::new(10, 200, 40),
            length: SliderRange::new(10, 300, 60),
            rotation: SliderRange::new(-180, 180, 0),
            selection_padding: 5.0,
            hit_test: HitTest::BoundingCircle,
            placeholder: "Upload an image to begin".to_string(),
            export_file_name: "piercing-design.png".to_string(),
        }
    }
}

impl EditorConfig {
    pub fn from_json(text: &str) -> Result<Self, EditorError> {
        let config: EditorConfig =
            serde_json::from_str(text).map_err(|err| EditorError::InvalidConfig {
                reason: err.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), EditorError> {
        if !(self.wheel_sensitivity.is_finite() && self.wheel_sensitivity > 0.0) {
            return Err(EditorError::InvalidConfig {
                reason: format!("wheel_sensitivity must be positive, got {}", self.wheel_sensitivity),
            });
        }
        for (name, range) in [("size", self.size), ("length", self.length)] {
            if range.min < 1 {
                return Err(EditorError::InvalidConfig {
                    reason: format!("{name} range {}..{} is not a positive span", range.min, range.max),
                });
            }
        }
        self.size.check("size")?;
        self.length.check("length")?;
        self.rotation.check("rotation")?;
        if self.selection_padding < 0.0 {
            return Err(EditorError::InvalidConfig {
                reason: "selection_padding must not be negative".to_string(),
            });
        }
        Ok(())
    }
}
