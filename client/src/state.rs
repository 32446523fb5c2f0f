use wasm_bindgen::prelude::Closure;
use web_sys::{CanvasRenderingContext2d, Event, FileReader, HtmlCanvasElement, HtmlImageElement, ProgressEvent};

use earboard_shared::{Editor, LoadTicket};

use crate::assets::AssetCache;

/// An upload in flight. Holding the closures keeps the JS callbacks alive
/// until the load settles or a newer upload cancels it.
pub struct Upload {
    pub ticket: LoadTicket,
    pub reader: Option<FileReader>,
    pub reader_onload: Option<Closure<dyn FnMut(ProgressEvent)>>,
    pub reader_onerror: Option<Closure<dyn FnMut(ProgressEvent)>>,
    pub image: Option<HtmlImageElement>,
    pub object_url: Option<String>,
    pub image_onload: Option<Closure<dyn FnMut(Event)>>,
    pub image_onerror: Option<Closure<dyn FnMut(Event)>>,
}

impl Upload {
    pub fn new(ticket: LoadTicket) -> Self {
        Self {
            ticket,
            reader: None,
            reader_onload: None,
            reader_onerror: None,
            image: None,
            object_url: None,
            image_onload: None,
            image_onerror: None,
        }
    }

    /// Detaches the JS callbacks. The closures stay owned here until the
    /// upload is dropped, which never happens from inside one of them.
    pub fn settle(&mut self) {
        if let Some(reader) = &self.reader {
            reader.set_onload(None);
            reader.set_onerror(None);
        }
        if let Some(image) = &self.image {
            image.set_onload(None);
            image.set_onerror(None);
        }
        self.revoke_url();
    }

    pub fn cancel(&mut self) {
        if let Some(reader) = &self.reader {
            if reader.ready_state() == FileReader::LOADING {
                reader.abort();
            }
        }
        self.settle();
    }

    pub fn revoke_url(&mut self) {
        if let Some(url) = self.object_url.take() {
            let _ = web_sys::Url::revoke_object_url(&url);
        }
    }
}

pub struct State {
    pub canvas: HtmlCanvasElement,
    pub ctx: CanvasRenderingContext2d,
    pub editor: Editor,
    pub assets: AssetCache,
    /// Decoded photo matching `editor.background()`.
    pub background: Option<HtmlImageElement>,
    pub upload: Option<Upload>,
    pub debug: bool,
}

impl State {
    pub fn log(&self, message: &str) {
        if self.debug {
            web_sys::console::log_1(&message.into());
        }
    }

    pub fn replace_upload(&mut self, upload: Upload) {
        if let Some(mut previous) = self.upload.replace(upload) {
            self.log(&format!(
                "Upload {} superseded by {}",
                previous.ticket.id(),
                self.upload.as_ref().map(|u| u.ticket.id()).unwrap_or_default()
            ));
            previous.cancel();
        }
    }

    pub fn cancel_upload(&mut self) {
        if let Some(mut upload) = self.upload.take() {
            upload.cancel();
        }
    }
}
