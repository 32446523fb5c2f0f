use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    AddEventListenerOptions, CanvasRenderingContext2d, Event, HtmlButtonElement,
    HtmlCanvasElement, HtmlInputElement, KeyboardEvent, PointerEvent, WheelEvent,
};

use earboard_shared::{Catalog, Changes, Editor, EditorConfig};

use crate::assets::AssetCache;
use crate::controls::{apply, Controls};
use crate::dom::{canvas_point, debug_enabled, get_element, resize_canvas, set_canvas_cursor};
use crate::export::download_png;
use crate::logging::init_logging;
use crate::palette::palette_index_from_event;
use crate::render::redraw;
use crate::state::State;
use crate::upload::start_upload;

const EVERYTHING: Changes = Changes {
    redraw: true,
    selection: true,
    palette: true,
    zoom: true,
    background: true,
};

fn load_config(document: &web_sys::Document) -> EditorConfig {
    let Some(text) = document
        .get_element_by_id("editor-config")
        .and_then(|element| element.text_content())
    else {
        return EditorConfig::default();
    };
    if text.trim().is_empty() {
        return EditorConfig::default();
    }
    match EditorConfig::from_json(&text) {
        Ok(config) => config,
        Err(err) => {
            web_sys::console::warn_1(&format!("Ignoring editor config: {err}").into());
            EditorConfig::default()
        }
    }
}

fn slider_int(input: &HtmlInputElement) -> Option<i32> {
    input
        .value()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .map(|value| value.round() as i32)
}

#[wasm_bindgen(start)]
pub fn run() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("Missing window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("Missing document"))?;
    let started = Rc::new(Cell::new(false));

    if document.ready_state() == "complete" {
        started.set(true);
        return start_app();
    }

    let onload_started = started.clone();
    let onload = Closure::<dyn FnMut(Event)>::new(move |_| {
        if onload_started.replace(true) {
            return;
        }
        if let Err(err) = start_app() {
            web_sys::console::error_1(&err);
        }
    });
    window.add_event_listener_with_callback("load", onload.as_ref().unchecked_ref())?;
    onload.forget();

    Ok(())
}

fn start_app() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("Missing window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("Missing document"))?;

    let debug = debug_enabled(&window);
    init_logging(debug);
    if debug {
        let href = window.location().href().ok().unwrap_or_default();
        web_sys::console::log_1(&format!("Earboard debug enabled href={href}").into());
    }

    let canvas: HtmlCanvasElement = get_element(&document, "canvas")?;
    let ctx = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("Missing canvas context"))?
        .dyn_into::<CanvasRenderingContext2d>()?;

    let reset_button: HtmlButtonElement = get_element(&document, "reset-view-btn")?;
    let delete_button: HtmlButtonElement = get_element(&document, "delete-btn")?;
    let download_button: HtmlButtonElement = get_element(&document, "download-btn")?;
    let clear_button: HtmlButtonElement = get_element(&document, "clear-btn")?;
    let controls = Rc::new(Controls::from_document(&document)?);

    let config = load_config(&document);
    controls.configure(&config);
    let editor = Editor::new(config, Catalog::builtin());

    let state = Rc::new(RefCell::new(State {
        canvas: canvas.clone(),
        ctx,
        editor,
        assets: AssetCache::default(),
        background: None,
        upload: None,
        debug,
    }));

    {
        let asset_state = state.clone();
        let onsettled = Closure::<dyn FnMut(Event)>::new(move |_| {
            if let Ok(state) = asset_state.try_borrow() {
                redraw(&state);
            }
        });
        let assets = {
            let state = state.borrow();
            AssetCache::preload(state.editor.catalog(), onsettled.as_ref().unchecked_ref())?
        };
        let mut state = state.borrow_mut();
        state.log(&format!("Preloading {} item images", assets.pending()));
        state.assets = assets;
        onsettled.forget();
    }

    {
        let mut state = state.borrow_mut();
        let changes = resize_canvas(&window, &mut state) | EVERYTHING;
        apply(&state, &controls, changes);
        set_canvas_cursor(&state.canvas, &state.editor);
    }

    {
        let resize_state = state.clone();
        let resize_controls = controls.clone();
        let window_cb = window.clone();
        let onresize = Closure::<dyn FnMut()>::new(move || {
            let mut state = resize_state.borrow_mut();
            let changes = resize_canvas(&window_cb, &mut state);
            apply(&state, &resize_controls, changes);
        });
        window.add_event_listener_with_callback("resize", onresize.as_ref().unchecked_ref())?;
        onresize.forget();
    }

    {
        let down_state = state.clone();
        let down_controls = controls.clone();
        let down_canvas = canvas.clone();
        let ondown = Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
            if event.button() != 0 || !event.is_primary() {
                return;
            }
            let Some(point) = canvas_point(
                &down_canvas,
                event.client_x() as f64,
                event.client_y() as f64,
            ) else {
                return;
            };
            event.prevent_default();
            let mut state = down_state.borrow_mut();
            let changes = state.editor.pointer_down(point);
            let _ = down_canvas.set_pointer_capture(event.pointer_id());
            set_canvas_cursor(&down_canvas, &state.editor);
            apply(&state, &down_controls, changes);
        });
        canvas.add_event_listener_with_callback("pointerdown", ondown.as_ref().unchecked_ref())?;
        ondown.forget();
    }

    {
        let move_state = state.clone();
        let move_controls = controls.clone();
        let move_canvas = canvas.clone();
        let onmove = Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
            if !event.is_primary() {
                return;
            }
            let Some(point) = canvas_point(
                &move_canvas,
                event.client_x() as f64,
                event.client_y() as f64,
            ) else {
                return;
            };
            let mut state = move_state.borrow_mut();
            let changes = state.editor.pointer_move(point);
            if !changes.is_empty() {
                event.prevent_default();
                apply(&state, &move_controls, changes);
            }
        });
        canvas.add_event_listener_with_callback("pointermove", onmove.as_ref().unchecked_ref())?;
        onmove.forget();
    }

    {
        let up_state = state.clone();
        let up_controls = controls.clone();
        let up_canvas = canvas.clone();
        let onup = Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
            if !event.is_primary() {
                return;
            }
            let mut state = up_state.borrow_mut();
            let changes = state.editor.pointer_up();
            if up_canvas.has_pointer_capture(event.pointer_id()) {
                let _ = up_canvas.release_pointer_capture(event.pointer_id());
            }
            set_canvas_cursor(&up_canvas, &state.editor);
            apply(&state, &up_controls, changes);
        });
        for name in ["pointerup", "pointercancel", "pointerleave"] {
            canvas.add_event_listener_with_callback(name, onup.as_ref().unchecked_ref())?;
        }
        onup.forget();
    }

    {
        let wheel_state = state.clone();
        let wheel_controls = controls.clone();
        let wheel_canvas = canvas.clone();
        let onwheel = Closure::<dyn FnMut(WheelEvent)>::new(move |event: WheelEvent| {
            let Some(point) = canvas_point(
                &wheel_canvas,
                event.client_x() as f64,
                event.client_y() as f64,
            ) else {
                return;
            };
            let mut state = wheel_state.borrow_mut();
            if state.editor.background().is_none() {
                return;
            }
            event.prevent_default();
            let changes = state.editor.wheel(event.delta_y(), point);
            apply(&state, &wheel_controls, changes);
        });
        let options = AddEventListenerOptions::new();
        options.set_passive(false);
        canvas.add_event_listener_with_callback_and_add_event_listener_options(
            "wheel",
            onwheel.as_ref().unchecked_ref(),
            &options,
        )?;
        onwheel.forget();
    }

    {
        let key_state = state.clone();
        let key_controls = controls.clone();
        let onkeydown = Closure::<dyn FnMut(KeyboardEvent)>::new(move |event: KeyboardEvent| {
            if event.meta_key() || event.ctrl_key() || event.alt_key() {
                return;
            }
            let mut state = key_state.borrow_mut();
            let changes = match event.key().as_str() {
                "Delete" | "Backspace" => {
                    if state.editor.scene().selected_index().is_none() {
                        return;
                    }
                    state.editor.delete_selected()
                }
                "Escape" => state.editor.escape(),
                _ => return,
            };
            event.prevent_default();
            set_canvas_cursor(&state.canvas, &state.editor);
            apply(&state, &key_controls, changes);
        });
        window.add_event_listener_with_callback("keydown", onkeydown.as_ref().unchecked_ref())?;
        onkeydown.forget();
    }

    {
        let zoom_state = state.clone();
        let zoom_controls = controls.clone();
        let oninput = Closure::<dyn FnMut(Event)>::new(move |_| {
            let Ok(scale) = zoom_controls.zoom_slider.value().parse::<f64>() else {
                return;
            };
            let mut state = zoom_state.borrow_mut();
            let changes = state.editor.zoom_slider(scale);
            apply(&state, &zoom_controls, changes);
        });
        controls
            .zoom_slider
            .add_event_listener_with_callback("input", oninput.as_ref().unchecked_ref())?;
        oninput.forget();
    }

    {
        let size_state = state.clone();
        let size_controls = controls.clone();
        let oninput = Closure::<dyn FnMut(Event)>::new(move |_| {
            let Some(value) = slider_int(&size_controls.size_slider) else {
                return;
            };
            let mut state = size_state.borrow_mut();
            let changes = state.editor.input_size(value);
            apply(&state, &size_controls, changes);
        });
        controls
            .size_slider
            .add_event_listener_with_callback("input", oninput.as_ref().unchecked_ref())?;
        oninput.forget();
    }

    {
        let length_state = state.clone();
        let length_controls = controls.clone();
        let oninput = Closure::<dyn FnMut(Event)>::new(move |_| {
            let Some(value) = slider_int(&length_controls.length_slider) else {
                return;
            };
            let mut state = length_state.borrow_mut();
            let changes = state.editor.input_length(value);
            apply(&state, &length_controls, changes);
        });
        controls
            .length_slider
            .add_event_listener_with_callback("input", oninput.as_ref().unchecked_ref())?;
        oninput.forget();
    }

    {
        let rotation_state = state.clone();
        let rotation_controls = controls.clone();
        let oninput = Closure::<dyn FnMut(Event)>::new(move |_| {
            let Some(value) = slider_int(&rotation_controls.rotation_slider) else {
                return;
            };
            let mut state = rotation_state.borrow_mut();
            let changes = state.editor.input_rotation(value);
            apply(&state, &rotation_controls, changes);
        });
        controls
            .rotation_slider
            .add_event_listener_with_callback("input", oninput.as_ref().unchecked_ref())?;
        oninput.forget();
    }

    {
        let reset_state = state.clone();
        let reset_controls = controls.clone();
        let onclick = Closure::<dyn FnMut(Event)>::new(move |_| {
            let mut state = reset_state.borrow_mut();
            let changes = state.editor.reset_view();
            apply(&state, &reset_controls, changes);
        });
        reset_button.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }

    {
        let delete_state = state.clone();
        let delete_controls = controls.clone();
        let onclick = Closure::<dyn FnMut(Event)>::new(move |_| {
            let mut state = delete_state.borrow_mut();
            let changes = state.editor.delete_selected();
            apply(&state, &delete_controls, changes);
        });
        delete_button
            .add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }

    {
        let clear_state = state.clone();
        let clear_controls = controls.clone();
        let onclick = Closure::<dyn FnMut(Event)>::new(move |_| {
            let mut state = clear_state.borrow_mut();
            state.cancel_upload();
            state.background = None;
            let changes = state.editor.clear_all();
            state.log("Cleared photo and items");
            clear_controls.set_status("");
            set_canvas_cursor(&state.canvas, &state.editor);
            apply(&state, &clear_controls, changes);
        });
        clear_button.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }

    {
        let download_state = state.clone();
        let document = document.clone();
        let onclick = Closure::<dyn FnMut(Event)>::new(move |_| {
            let mut state = download_state.borrow_mut();
            if let Err(err) = download_png(&document, &mut state) {
                web_sys::console::error_2(&"Export failed".into(), &err);
            }
        });
        download_button
            .add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }

    {
        let palette_state = state.clone();
        let palette_controls = controls.clone();
        let onclick = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            let Some(index) = palette_index_from_event(&event) else {
                return;
            };
            let mut state = palette_state.borrow_mut();
            let Some(id) = state
                .editor
                .catalog()
                .get_index(index)
                .map(|definition| definition.id.clone())
            else {
                return;
            };
            // A second click on the armed entry puts it back.
            let changes = if state.editor.armed() == Some(&id) {
                Ok(state.editor.disarm())
            } else {
                state.editor.arm(&id)
            };
            match changes {
                Ok(changes) => {
                    set_canvas_cursor(&state.canvas, &state.editor);
                    apply(&state, &palette_controls, changes);
                }
                Err(err) => web_sys::console::warn_1(&err.to_string().into()),
            }
        });
        controls
            .palette
            .add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }

    {
        let upload_state = state.clone();
        let upload_controls = controls.clone();
        let onchange = Closure::<dyn FnMut(Event)>::new(move |_| {
            let Some(file) = upload_controls
                .image_input
                .files()
                .and_then(|list| list.get(0))
            else {
                return;
            };
            if let Err(err) = start_upload(&upload_state, &upload_controls, file) {
                web_sys::console::error_2(&"Upload could not start".into(), &err);
            }
        });
        controls
            .image_input
            .add_event_listener_with_callback("change", onchange.as_ref().unchecked_ref())?;
        onchange.forget();
    }

    Ok(())
}
