use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlAnchorElement};

use crate::render::redraw;
use crate::state::State;

/// Downloads the canvas as a PNG without the selection outline.
pub fn download_png(document: &Document, state: &mut State) -> Result<(), JsValue> {
    let saved = state.editor.begin_export();
    redraw(state);
    let data_url = state.canvas.to_data_url_with_type("image/png");
    let changes = state.editor.end_export(saved);
    if changes.redraw {
        redraw(state);
    }
    let data_url = data_url?;

    let anchor = document
        .create_element("a")?
        .dyn_into::<HtmlAnchorElement>()?;
    anchor.set_href(&data_url);
    anchor.set_download(&state.editor.config().export_file_name);
    anchor.click();
    state.log(&format!(
        "Exported {} ({} items)",
        state.editor.config().export_file_name,
        state.editor.scene().len()
    ));
    Ok(())
}
