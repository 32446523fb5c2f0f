use std::sync::Arc;

use crate::catalog::{Catalog, ItemDefinition, ItemId};
use crate::config::EditorConfig;
use crate::controller::{Changes, Gesture};
use crate::error::EditorError;
use crate::image_load::{probe_image, BackgroundImage, ImageLoader, LoadOutcome, LoadState, LoadTicket};
use crate::render::{AssetSource, Frame};
use crate::scene::Scene;
use crate::viewport::Viewport;
use crate::Size;

/// Slider-facing snapshot of the selected item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelectionView {
    pub index: usize,
    pub size: u32,
    pub length: u32,
    pub rotation: i32,
    pub scalable_length: bool,
}

/// The whole application state: photo, view, placed items and the pointer
/// controller that edits them.
pub struct Editor {
    pub(crate) config: EditorConfig,
    catalog: Catalog,
    pub(crate) viewport: Viewport,
    pub(crate) scene: Scene,
    loader: ImageLoader,
    pub(crate) canvas: Size,
    pub(crate) gesture: Gesture,
    pub(crate) armed: Option<Arc<ItemDefinition>>,
    pub(crate) slider_size: u32,
    pub(crate) slider_length: u32,
}

impl Editor {
    pub fn new(config: EditorConfig, catalog: Catalog) -> Self {
        let slider_size = config.size.value.max(1) as u32;
        let slider_length = config.length.value.max(1) as u32;
        Self {
            config,
            catalog,
            viewport: Viewport::default(),
            scene: Scene::new(),
            loader: ImageLoader::new(),
            canvas: Size::default(),
            gesture: Gesture::Idle,
            armed: None,
            slider_size,
            slider_length,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn scale(&self) -> f64 {
        self.viewport.scale
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn canvas_size(&self) -> Size {
        self.canvas
    }

    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    pub fn background(&self) -> Option<BackgroundImage> {
        self.loader.current()
    }

    pub fn load_state(&self) -> &LoadState {
        self.loader.state()
    }

    pub fn armed(&self) -> Option<&ItemId> {
        self.armed.as_ref().map(|definition| &definition.id)
    }

    pub fn slider_size(&self) -> u32 {
        self.slider_size
    }

    pub fn slider_length(&self) -> u32 {
        self.slider_length
    }

    pub fn selection_view(&self) -> Option<SelectionView> {
        let index = self.scene.selected_index()?;
        let item = self.scene.selected()?;
        Some(SelectionView {
            index,
            size: item.size(),
            length: item.length(),
            rotation: item.rotation,
            scalable_length: item.definition().scalable_length,
        })
    }

    /// The canvas element changed size. The view is kept, not refitted.
    pub fn resize(&mut self, canvas: Size) -> Changes {
        if self.canvas == canvas {
            return Changes::none();
        }
        self.canvas = canvas;
        Changes::redraw()
    }

    /// Fits the photo into the canvas. No-op without a photo.
    pub fn reset_view(&mut self) -> Changes {
        let image = self.background().map(|image| image.size());
        if self.viewport.reset_to_fit(self.canvas, image) {
            Changes {
                redraw: true,
                zoom: true,
                ..Changes::default()
            }
        } else {
            Changes::none()
        }
    }

    pub fn begin_load(&mut self) -> LoadTicket {
        self.loader.begin()
    }

    /// Checks the bytes of an upload before the browser decodes them.
    /// Broken bytes fail the load at once and keep the current photo;
    /// `Ok(None)` means the format is left to the browser decode.
    pub fn probe_upload(
        &mut self,
        ticket: LoadTicket,
        bytes: &[u8],
    ) -> Result<Option<BackgroundImage>, EditorError> {
        probe_image(bytes).map_err(|err| {
            self.loader.finish(ticket, Err(err.clone()));
            err
        })
    }

    /// Completes a load. A stale ticket reports no changes; a fresh image
    /// replaces the background and refits the view.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<BackgroundImage, EditorError>,
    ) -> Result<Changes, EditorError> {
        match self.loader.finish(ticket, result) {
            LoadOutcome::Stale => Ok(Changes::none()),
            LoadOutcome::Failed(err) => Err(err),
            LoadOutcome::Loaded(_) => {
                let changes = self.reset_view();
                Ok(changes
                    | Changes {
                        redraw: true,
                        background: true,
                        ..Changes::default()
                    })
            }
        }
    }

    pub fn select(&mut self, index: usize) -> Result<Changes, EditorError> {
        self.scene.select(index)?;
        self.adopt_selected_into_sliders();
        Ok(Changes {
            redraw: true,
            selection: true,
            ..Changes::default()
        })
    }

    pub fn deselect(&mut self) -> Changes {
        if self.scene.selected_index().is_none() {
            return Changes::none();
        }
        self.scene.deselect();
        Changes {
            redraw: true,
            selection: true,
            ..Changes::default()
        }
    }

    pub(crate) fn adopt_selected_into_sliders(&mut self) {
        if let Some(item) = self.scene.selected() {
            self.slider_size = item.size();
            if item.definition().scalable_length {
                self.slider_length = item.length();
            }
        }
    }

    pub fn delete_selected(&mut self) -> Changes {
        match self.scene.delete_selected() {
            Some(_) => Changes {
                redraw: true,
                selection: true,
                ..Changes::default()
            },
            None => Changes::none(),
        }
    }

    /// Arms a catalog entry so the next click on empty canvas places it.
    pub fn arm(&mut self, id: &ItemId) -> Result<Changes, EditorError> {
        let definition = self.catalog.get(id)?.clone();
        self.armed = Some(definition);
        Ok(Changes {
            palette: true,
            ..Changes::default()
        })
    }

    pub fn disarm(&mut self) -> Changes {
        if self.armed.take().is_some() {
            Changes {
                palette: true,
                ..Changes::default()
            }
        } else {
            Changes::none()
        }
    }

    /// Drops the photo and every placed item and returns to the default view.
    pub fn clear_all(&mut self) -> Changes {
        self.loader.clear();
        self.scene.clear();
        self.viewport = Viewport::default();
        self.gesture = Gesture::Idle;
        Changes {
            redraw: true,
            selection: true,
            zoom: true,
            background: true,
            ..Changes::default()
        }
    }

    /// Hides the selection for a capture. Pair with [`Editor::end_export`].
    pub fn begin_export(&mut self) -> Option<usize> {
        let saved = self.scene.selected_index();
        self.scene.deselect();
        saved
    }

    /// Restores the selection hidden by `begin_export` if it is still valid.
    pub fn end_export(&mut self, saved: Option<usize>) -> Changes {
        match saved {
            Some(index) if self.scene.select(index).is_ok() => Changes::redraw(),
            _ => Changes::none(),
        }
    }

    pub fn frame(&self, assets: &dyn AssetSource) -> Frame {
        Frame::build(self, assets)
    }
}
