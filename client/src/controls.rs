use wasm_bindgen::JsValue;
use web_sys::{Document, Element, HtmlElement, HtmlInputElement, HtmlSpanElement};

use earboard_shared::{Changes, Editor, EditorConfig, SliderRange, MAX_SCALE, MIN_SCALE};

use crate::dom::{get_element, set_hidden};
use crate::palette::render_palette;
use crate::render::redraw;
use crate::state::State;

/// Sidebar widgets that mirror editor state.
pub struct Controls {
    pub document: Document,
    pub palette: HtmlElement,
    pub image_input: HtmlInputElement,
    pub image_adjust: Element,
    pub zoom_slider: HtmlInputElement,
    pub item_controls: Element,
    pub size_slider: HtmlInputElement,
    pub length_container: Element,
    pub length_slider: HtmlInputElement,
    pub rotation_slider: HtmlInputElement,
    pub status: HtmlSpanElement,
}

fn configure_slider(input: &HtmlInputElement, range: SliderRange) {
    input.set_min(&range.min.to_string());
    input.set_max(&range.max.to_string());
    input.set_value(&range.value.to_string());
}

impl Controls {
    pub fn from_document(document: &Document) -> Result<Self, JsValue> {
        Ok(Self {
            document: document.clone(),
            palette: get_element(document, "jewelry-palette")?,
            image_input: get_element(document, "imageLoader")?,
            image_adjust: get_element(document, "image-adjust-section")?,
            zoom_slider: get_element(document, "zoom-slider")?,
            item_controls: get_element(document, "jewelry-controls-section")?,
            size_slider: get_element(document, "size-slider")?,
            length_container: get_element(document, "length-slider-container")?,
            length_slider: get_element(document, "length-slider")?,
            rotation_slider: get_element(document, "rotation-slider")?,
            status: get_element(document, "upload-status")?,
        })
    }

    pub fn configure(&self, config: &EditorConfig) {
        configure_slider(&self.size_slider, config.size);
        configure_slider(&self.length_slider, config.length);
        configure_slider(&self.rotation_slider, config.rotation);
        self.zoom_slider.set_min(&MIN_SCALE.to_string());
        self.zoom_slider.set_max(&MAX_SCALE.to_string());
        self.zoom_slider.set_step("0.01");
    }

    pub fn set_status(&self, text: &str) {
        self.status.set_text_content(Some(text));
    }

    pub fn sync(&self, editor: &Editor, changes: Changes) {
        if changes.selection {
            match editor.selection_view() {
                Some(view) => {
                    set_hidden(&self.item_controls, false);
                    self.size_slider.set_value(&view.size.to_string());
                    self.rotation_slider.set_value(&view.rotation.to_string());
                    if view.scalable_length {
                        self.length_slider.set_value(&view.length.to_string());
                    }
                    set_hidden(&self.length_container, !view.scalable_length);
                }
                None => {
                    set_hidden(&self.item_controls, true);
                    set_hidden(&self.length_container, true);
                }
            }
        }
        if changes.palette {
            render_palette(&self.document, &self.palette, editor.catalog(), editor.armed());
        }
        if changes.zoom {
            self.zoom_slider.set_value(&editor.scale().to_string());
        }
        if changes.background {
            let loaded = editor.background().is_some();
            set_hidden(&self.image_adjust, !loaded);
            if !loaded {
                self.image_input.set_value("");
            }
        }
    }
}

/// Repaints if needed and pushes the touched state into the widgets.
pub fn apply(state: &State, controls: &Controls, changes: Changes) {
    if changes.redraw {
        redraw(state);
    }
    controls.sync(&state.editor, changes);
}
