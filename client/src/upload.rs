use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Uint8Array;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, File, FileReader, HtmlImageElement, ProgressEvent, Url};

use earboard_shared::{BackgroundImage, EditorError, LoadTicket};

use crate::controls::{apply, Controls};
use crate::state::{State, Upload};

fn read_bytes(event: &ProgressEvent) -> Option<Vec<u8>> {
    let reader: FileReader = event.target()?.dyn_into().ok()?;
    let buffer = reader.result().ok()?.dyn_into::<js_sys::ArrayBuffer>().ok()?;
    Some(Uint8Array::new(&buffer).to_vec())
}

fn is_current(state: &State, ticket: LoadTicket) -> bool {
    state.upload.as_ref().map(|upload| upload.ticket) == Some(ticket)
}

fn settle(state: &mut State) {
    if let Some(upload) = state.upload.as_mut() {
        upload.settle();
    }
}

fn report_failure(state: &mut State, controls: &Controls, err: &EditorError) {
    web_sys::console::warn_1(&format!("Upload failed: {err}").into());
    controls.set_status(&err.to_string());
    settle(state);
}

/// Fails the upload behind `ticket` unless a newer one replaced it.
fn fail_upload(state: &mut State, controls: &Controls, ticket: LoadTicket, reason: &str) {
    if !is_current(state, ticket) {
        return;
    }
    let err = EditorError::decode(reason);
    let _ = state.editor.finish_load(ticket, Err(err.clone()));
    report_failure(state, controls, &err);
}

/// Reads the chosen file, probes it, then lets the browser decode it.
/// Starting a new upload cancels whatever the previous one was doing.
pub fn start_upload(
    state_rc: &Rc<RefCell<State>>,
    controls: &Rc<Controls>,
    file: File,
) -> Result<(), JsValue> {
    let reader = FileReader::new()?;
    let ticket = state_rc.borrow_mut().editor.begin_load();

    let onload_state = state_rc.clone();
    let onload_controls = controls.clone();
    let onload_file = file.clone();
    let onload = Closure::<dyn FnMut(ProgressEvent)>::new(move |event: ProgressEvent| {
        let Some(bytes) = read_bytes(&event) else {
            let mut state = onload_state.borrow_mut();
            fail_upload(&mut state, &onload_controls, ticket, "file could not be read");
            return;
        };
        if let Err(err) = decode_upload(&onload_state, &onload_controls, ticket, &onload_file, &bytes)
        {
            web_sys::console::error_1(&err);
        }
    });
    reader.set_onload(Some(onload.as_ref().unchecked_ref()));

    let onerror_state = state_rc.clone();
    let onerror_controls = controls.clone();
    let onerror = Closure::<dyn FnMut(ProgressEvent)>::new(move |_| {
        let mut state = onerror_state.borrow_mut();
        fail_upload(&mut state, &onerror_controls, ticket, "file could not be read");
    });
    reader.set_onerror(Some(onerror.as_ref().unchecked_ref()));

    {
        let mut state = state_rc.borrow_mut();
        state.log(&format!(
            "Upload {} started name={:?} bytes={}",
            ticket.id(),
            file.name(),
            file.size()
        ));
        let mut upload = Upload::new(ticket);
        upload.reader = Some(reader.clone());
        upload.reader_onload = Some(onload);
        upload.reader_onerror = Some(onerror);
        state.replace_upload(upload);
    }
    controls.set_status("Loading image...");
    if let Err(err) = reader.read_as_array_buffer(&file) {
        let mut state = state_rc.borrow_mut();
        fail_upload(&mut state, controls, ticket, "file could not be read");
        return Err(err);
    }
    Ok(())
}

fn decode_upload(
    state_rc: &Rc<RefCell<State>>,
    controls: &Rc<Controls>,
    ticket: LoadTicket,
    file: &File,
    bytes: &[u8],
) -> Result<(), JsValue> {
    let mut state = state_rc.borrow_mut();
    if !is_current(&state, ticket) {
        return Ok(());
    }
    match state.editor.probe_upload(ticket, bytes) {
        Ok(Some(probed)) => state.log(&format!(
            "Upload {} probed {}x{}",
            ticket.id(),
            probed.width,
            probed.height
        )),
        Ok(None) => state.log(&format!(
            "Upload {} has no native decoder, trying the browser",
            ticket.id()
        )),
        Err(err) => {
            report_failure(&mut state, controls, &err);
            return Ok(());
        }
    }

    let url = Url::create_object_url_with_blob(file)?;
    let image = HtmlImageElement::new()?;

    let loaded_state = state_rc.clone();
    let loaded_controls = controls.clone();
    let onload = Closure::<dyn FnMut(Event)>::new(move |_| {
        image_loaded(&loaded_state, &loaded_controls, ticket);
    });
    let failed_state = state_rc.clone();
    let failed_controls = controls.clone();
    let onerror = Closure::<dyn FnMut(Event)>::new(move |_| {
        let mut state = failed_state.borrow_mut();
        fail_upload(&mut state, &failed_controls, ticket, "browser could not decode the image");
    });
    image.set_onload(Some(onload.as_ref().unchecked_ref()));
    image.set_onerror(Some(onerror.as_ref().unchecked_ref()));
    image.set_src(&url);

    if let Some(upload) = state.upload.as_mut() {
        upload.image = Some(image);
        upload.object_url = Some(url);
        upload.image_onload = Some(onload);
        upload.image_onerror = Some(onerror);
    }
    Ok(())
}

fn image_loaded(state_rc: &Rc<RefCell<State>>, controls: &Controls, ticket: LoadTicket) {
    let mut state = state_rc.borrow_mut();
    let Some(image) = state
        .upload
        .as_ref()
        .filter(|upload| upload.ticket == ticket)
        .and_then(|upload| upload.image.clone())
    else {
        return;
    };
    let result = BackgroundImage::new(image.natural_width(), image.natural_height());
    match state.editor.finish_load(ticket, result) {
        Ok(changes) => {
            if changes.background {
                state.background = Some(image);
            }
            settle(&mut state);
            state.log(&format!("Upload {} ready", ticket.id()));
            controls.set_status("");
            apply(&state, controls, changes);
        }
        Err(err) => report_failure(&mut state, controls, &err),
    }
}
