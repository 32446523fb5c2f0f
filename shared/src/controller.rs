use std::ops::{BitOr, BitOrAssign};

use crate::editor::Editor;
use crate::hit::find_topmost_with;
use crate::scene::ItemField;
use crate::Point;

/// What an editor call touched, so the UI only resyncs the widgets it must.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Changes {
    pub redraw: bool,
    pub selection: bool,
    pub palette: bool,
    pub zoom: bool,
    pub background: bool,
}

impl Changes {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn redraw() -> Self {
        Self {
            redraw: true,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl BitOr for Changes {
    type Output = Changes;

    fn bitor(self, rhs: Changes) -> Changes {
        Changes {
            redraw: self.redraw || rhs.redraw,
            selection: self.selection || rhs.selection,
            palette: self.palette || rhs.palette,
            zoom: self.zoom || rhs.zoom,
            background: self.background || rhs.background,
        }
    }
}

impl BitOrAssign for Changes {
    fn bitor_assign(&mut self, rhs: Changes) {
        *self = *self | rhs;
    }
}

/// Pointer gesture in progress. Anchors are canvas-space.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    Panning { anchor: Point },
    Dragging { anchor: Point },
}

impl Editor {
    /// Pointer or touch start at canvas point `at`.
    pub fn pointer_down(&mut self, at: Point) -> Changes {
        if !at.is_finite() {
            return Changes::none();
        }
        let image_point = self.viewport.canvas_to_image(at);
        let hit = find_topmost_with(image_point, self.scene.items(), self.config.hit_test);

        if let Some(index) = hit {
            if self.scene.select(index).is_err() {
                return Changes::none();
            }
            self.adopt_selected_into_sliders();
            self.gesture = Gesture::Dragging { anchor: at };
            return Changes {
                redraw: true,
                selection: true,
                ..Changes::default()
            };
        }

        if let Some(definition) = self.armed.take() {
            let index = self.scene.place(
                definition,
                image_point,
                self.slider_size,
                self.slider_length,
            );
            tracing::debug!(index, "placed item from palette");
            self.gesture = Gesture::Idle;
            return Changes {
                redraw: true,
                selection: true,
                palette: true,
                ..Changes::default()
            };
        }

        let had_selection = self.scene.selected_index().is_some();
        self.scene.deselect();
        self.gesture = Gesture::Panning { anchor: at };
        Changes {
            redraw: had_selection,
            selection: had_selection,
            ..Changes::default()
        }
    }

    pub fn pointer_move(&mut self, at: Point) -> Changes {
        if !at.is_finite() {
            return Changes::none();
        }
        match self.gesture {
            Gesture::Idle => Changes::none(),
            Gesture::Dragging { anchor } => {
                let delta = self.viewport.canvas_delta_to_image(at - anchor);
                self.gesture = Gesture::Dragging { anchor: at };
                if self.scene.move_selected(delta) {
                    Changes::redraw()
                } else {
                    Changes::none()
                }
            }
            Gesture::Panning { anchor } => {
                self.viewport.pan_by(at - anchor);
                self.gesture = Gesture::Panning { anchor: at };
                Changes::redraw()
            }
        }
    }

    /// Pointer up, leave or cancel.
    pub fn pointer_up(&mut self) -> Changes {
        self.gesture = Gesture::Idle;
        Changes::none()
    }

    /// Wheel zoom anchored at the pointer. Ignored until a photo is loaded.
    pub fn wheel(&mut self, delta_y: f64, at: Point) -> Changes {
        if self.background().is_none() || !delta_y.is_finite() || !at.is_finite() {
            return Changes::none();
        }
        let scale = self.viewport.scale - delta_y * self.config.wheel_sensitivity;
        self.zoom_to(scale, at)
    }

    /// Zoom slider input, anchored at the canvas centre.
    pub fn zoom_slider(&mut self, scale: f64) -> Changes {
        if self.background().is_none() || !scale.is_finite() {
            return Changes::none();
        }
        let center = self.canvas.center();
        self.zoom_to(scale, center)
    }

    fn zoom_to(&mut self, scale: f64, anchor: Point) -> Changes {
        self.viewport.zoom_at_point(scale, anchor);
        Changes {
            redraw: true,
            zoom: true,
            ..Changes::default()
        }
    }

    /// Slider inputs are clamped to the configured slider range.
    pub fn input_size(&mut self, value: i32) -> Changes {
        let value = self.config.size.clamp(value);
        self.slider_size = value.max(1) as u32;
        self.update_selected(ItemField::Size, value)
    }

    pub fn input_length(&mut self, value: i32) -> Changes {
        let value = self.config.length.clamp(value);
        self.slider_length = value.max(1) as u32;
        self.update_selected(ItemField::Length, value)
    }

    pub fn input_rotation(&mut self, value: i32) -> Changes {
        let value = self.config.rotation.clamp(value);
        self.update_selected(ItemField::Rotation, value)
    }

    fn update_selected(&mut self, field: ItemField, value: i32) -> Changes {
        if self.scene.update_selected(field, value) {
            Changes::redraw()
        } else {
            Changes::none()
        }
    }

    /// Escape key: drop the armed item and the selection.
    pub fn escape(&mut self) -> Changes {
        let mut changes = self.disarm();
        if self.scene.selected_index().is_some() {
            self.scene.deselect();
            changes |= Changes {
                redraw: true,
                selection: true,
                ..Changes::default()
            };
        }
        changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, ItemId};
    use crate::config::EditorConfig;
    use crate::image_load::BackgroundImage;
    use crate::Size;

    fn editor_with_photo() -> Editor {
        let mut editor = Editor::new(EditorConfig::default(), Catalog::builtin());
        editor.resize(Size::new(800.0, 600.0));
        let ticket = editor.begin_load();
        editor
            .finish_load(ticket, BackgroundImage::new(1600, 1200))
            .unwrap();
        editor
    }

    #[test]
    fn click_on_empty_canvas_starts_panning() {
        let mut editor = editor_with_photo();
        let changes = editor.pointer_down(Point::new(10.0, 10.0));
        assert_eq!(editor.gesture(), Gesture::Panning { anchor: Point::new(10.0, 10.0) });
        assert!(!changes.selection);
        editor.pointer_move(Point::new(30.0, 5.0));
        assert_eq!(editor.viewport().offset, Point::new(20.0, -5.0));
        editor.pointer_up();
        assert_eq!(editor.gesture(), Gesture::Idle);
    }

    #[test]
    fn armed_item_is_placed_at_image_point_and_disarmed() {
        let mut editor = editor_with_photo();
        editor.arm(&ItemId::new("earring_03")).unwrap();
        editor.input_size(50);
        let changes = editor.pointer_down(Point::new(100.0, 50.0));
        assert!(changes.palette && changes.selection);
        assert!(editor.armed().is_none());
        assert_eq!(editor.gesture(), Gesture::Idle);
        let item = editor.scene().selected().unwrap();
        assert_eq!(item.position, Point::new(200.0, 100.0));
        assert_eq!((item.size(), item.length()), (50, 50));
    }

    #[test]
    fn scalable_item_takes_length_slider() {
        let mut editor = editor_with_photo();
        editor.input_size(20);
        editor.input_length(90);
        editor.arm(&ItemId::new("barbell")).unwrap();
        editor.pointer_down(Point::new(100.0, 100.0));
        let item = editor.scene().selected().unwrap();
        assert_eq!((item.size(), item.length()), (20, 90));
    }

    #[test]
    fn dragging_converts_canvas_delta_to_image_space() {
        let mut editor = editor_with_photo();
        editor.arm(&ItemId::new("stud")).unwrap();
        editor.pointer_down(Point::new(100.0, 100.0));
        editor.pointer_up();
        editor.pointer_down(Point::new(100.0, 100.0));
        assert!(matches!(editor.gesture(), Gesture::Dragging { .. }));
        editor.pointer_move(Point::new(110.0, 95.0));
        editor.pointer_move(Point::new(120.0, 100.0));
        let item = editor.scene().selected().unwrap();
        assert_eq!(item.position, Point::new(240.0, 200.0));
        assert_eq!(editor.viewport().offset, Point::ORIGIN);
    }

    #[test]
    fn hit_takes_priority_over_armed_palette() {
        let mut editor = editor_with_photo();
        editor.arm(&ItemId::new("stud")).unwrap();
        editor.pointer_down(Point::new(100.0, 100.0));
        editor.pointer_up();
        editor.arm(&ItemId::new("hoop")).unwrap();
        editor.pointer_down(Point::new(100.0, 100.0));
        assert_eq!(editor.scene().len(), 1);
        assert_eq!(editor.armed(), Some(&ItemId::new("hoop")));
    }

    #[test]
    fn selecting_pushes_item_values_into_sliders() {
        let mut editor = editor_with_photo();
        editor.input_size(70);
        editor.arm(&ItemId::new("stud")).unwrap();
        editor.pointer_down(Point::new(100.0, 100.0));
        editor.pointer_up();
        editor.deselect();
        editor.input_size(30);
        assert_eq!(editor.scene().items()[0].size(), 70);
        editor.pointer_down(Point::new(100.0, 100.0));
        assert_eq!(editor.slider_size(), 70);
    }

    #[test]
    fn slider_inputs_are_clamped_to_configured_ranges() {
        let mut editor = editor_with_photo();
        editor.input_size(500);
        editor.input_length(-3);
        assert_eq!((editor.slider_size(), editor.slider_length()), (200, 10));
        editor.arm(&ItemId::new("stud")).unwrap();
        editor.pointer_down(Point::new(100.0, 100.0));
        editor.input_rotation(720);
        assert_eq!(editor.scene().selected().unwrap().rotation, 180);
    }

    #[test]
    fn wheel_needs_a_photo() {
        let mut editor = Editor::new(EditorConfig::default(), Catalog::builtin());
        editor.resize(Size::new(800.0, 600.0));
        assert!(editor.wheel(-100.0, Point::new(10.0, 10.0)).is_empty());
        assert!(editor.zoom_slider(2.0).is_empty());
        assert_eq!(editor.viewport().scale, 1.0);
    }

    #[test]
    fn wheel_up_zooms_in_around_pointer() {
        let mut editor = editor_with_photo();
        let at = Point::new(200.0, 150.0);
        let before = editor.viewport().canvas_to_image(at);
        let changes = editor.wheel(-500.0, at);
        assert!(changes.zoom);
        assert!((editor.viewport().scale - 1.0).abs() < 1e-12);
        let after = editor.viewport().canvas_to_image(at);
        assert!((before.x - after.x).abs() < 1e-9 && (before.y - after.y).abs() < 1e-9);
    }

    #[test]
    fn slider_zoom_anchors_at_canvas_centre() {
        let mut editor = editor_with_photo();
        let center = Point::new(400.0, 300.0);
        let before = editor.viewport().canvas_to_image(center);
        editor.zoom_slider(3.0);
        assert_eq!(editor.viewport().scale, 3.0);
        let after = editor.viewport().canvas_to_image(center);
        assert!((before.x - after.x).abs() < 1e-9 && (before.y - after.y).abs() < 1e-9);
    }

    #[test]
    fn escape_disarms_and_deselects() {
        let mut editor = editor_with_photo();
        editor.arm(&ItemId::new("stud")).unwrap();
        editor.pointer_down(Point::new(100.0, 100.0));
        editor.arm(&ItemId::new("hoop")).unwrap();
        let changes = editor.escape();
        assert!(changes.palette && changes.selection);
        assert!(editor.armed().is_none());
        assert!(editor.scene().selected_index().is_none());
    }
}
