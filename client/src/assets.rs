use std::collections::HashMap;

use js_sys::Function;
use wasm_bindgen::JsValue;
use web_sys::HtmlImageElement;

use earboard_shared::{AssetSource, Catalog, Graphic, ItemId, Size};

/// Raster item graphics, requested once at startup.
#[derive(Default)]
pub struct AssetCache {
    images: HashMap<ItemId, HtmlImageElement>,
}

impl AssetCache {
    /// Starts loading every raster in the catalog. `on_settled` fires as each
    /// image loads or fails, so the canvas can redraw with it or its fallback.
    pub fn preload(catalog: &Catalog, on_settled: &Function) -> Result<Self, JsValue> {
        let mut images = HashMap::new();
        for definition in catalog.iter() {
            let Graphic::Raster { url } = &definition.graphic else {
                continue;
            };
            let image = HtmlImageElement::new()?;
            image.set_cross_origin(Some("anonymous"));
            image.set_onload(Some(on_settled));
            image.set_onerror(Some(on_settled));
            image.set_src(url);
            images.insert(definition.id.clone(), image);
        }
        Ok(Self { images })
    }

    pub fn image(&self, id: &ItemId) -> Option<&HtmlImageElement> {
        self.images
            .get(id)
            .filter(|image| image.complete() && image.natural_width() > 0)
    }

    pub fn pending(&self) -> usize {
        self.images.values().filter(|image| !image.complete()).count()
    }
}

impl AssetSource for AssetCache {
    fn raster_size(&self, id: &ItemId) -> Option<Size> {
        self.image(id).map(|image| {
            Size::new(image.natural_width() as f64, image.natural_height() as f64)
        })
    }
}
