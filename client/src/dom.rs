use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlCanvasElement, Window};

use earboard_shared::{Changes, Editor, Gesture, Point, Size};

use crate::state::State;

pub fn get_element<T: JsCast>(document: &Document, id: &str) -> Result<T, JsValue> {
    let element = document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("Missing element: {id}")))?;
    element
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("Invalid element type: {id}")))
}

pub fn debug_enabled(window: &Window) -> bool {
    let search = window.location().search().ok().unwrap_or_default();
    search.contains("debug=1") || search.contains("debug=true")
}

/// Cursor hint for the next click: place, drag or pan.
pub fn set_canvas_cursor(canvas: &HtmlCanvasElement, editor: &Editor) {
    let cursor = match editor.gesture() {
        Gesture::Panning { .. } | Gesture::Dragging { .. } => "grabbing",
        Gesture::Idle if editor.armed().is_some() => "copy",
        Gesture::Idle if editor.background().is_some() => "grab",
        Gesture::Idle => "default",
    };
    let _ = canvas.style().set_property("cursor", cursor);
}

pub fn set_hidden(element: &Element, hidden: bool) {
    let classes = element.class_list();
    let _ = if hidden {
        classes.add_1("hidden")
    } else {
        classes.remove_1("hidden")
    };
}

/// Sizes the backing store for the device pixel ratio; drawing stays in CSS pixels.
pub fn resize_canvas(window: &Window, state: &mut State) -> Changes {
    let rect = state.canvas.get_bounding_client_rect();
    let dpr = window.device_pixel_ratio();
    state.canvas.set_width((rect.width() * dpr) as u32);
    state.canvas.set_height((rect.height() * dpr) as u32);
    let _ = state.ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0);
    state.log(&format!(
        "Resizing canvas to {}x{} (dpr {dpr})",
        rect.width(),
        rect.height()
    ));
    // Resizing wipes the bitmap, so always repaint.
    state.editor.resize(Size::new(rect.width(), rect.height())) | Changes::redraw()
}

/// Client coordinates to canvas-space CSS pixels.
pub fn canvas_point(canvas: &HtmlCanvasElement, client_x: f64, client_y: f64) -> Option<Point> {
    let rect = canvas.get_bounding_client_rect();
    if rect.width() <= 0.0 || rect.height() <= 0.0 {
        return None;
    }
    let point = Point::new(client_x - rect.left(), client_y - rect.top());
    point.is_finite().then_some(point)
}
