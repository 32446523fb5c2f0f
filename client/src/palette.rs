use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, Element, Event, HtmlCanvasElement, HtmlElement};

use earboard_shared::{Catalog, Frame, Graphic, ItemDefinition, ItemId, NoAssets, Point};

use crate::assets::AssetCache;
use crate::render::draw_frame;

const ICON_SIZE: u32 = 40;
const ICON_GRAPHIC_SIZE: f64 = 30.0;

/// Procedural items get a thumbnail painted through the canvas renderer.
fn procedural_icon_url(document: &Document, definition: &ItemDefinition) -> Option<String> {
    let canvas = document
        .create_element("canvas")
        .ok()?
        .dyn_into::<HtmlCanvasElement>()
        .ok()?;
    canvas.set_width(ICON_SIZE);
    canvas.set_height(ICON_SIZE);
    let ctx = canvas
        .get_context("2d")
        .ok()??
        .dyn_into::<CanvasRenderingContext2d>()
        .ok()?;
    let half = ICON_SIZE as f64 / 2.0;
    let frame = Frame::graphic(definition, Point::new(half, half), ICON_GRAPHIC_SIZE, &NoAssets);
    draw_frame(&ctx, &frame, &AssetCache::default(), None);
    canvas.to_data_url().ok()
}

fn icon_url(document: &Document, definition: &ItemDefinition) -> Option<String> {
    match &definition.graphic {
        Graphic::Raster { url } => Some(url.clone()),
        Graphic::Procedural { .. } => procedural_icon_url(document, definition),
    }
}

pub fn render_palette(
    document: &Document,
    palette_el: &HtmlElement,
    catalog: &Catalog,
    armed: Option<&ItemId>,
) {
    palette_el.set_inner_html("");
    for (index, definition) in catalog.iter().enumerate() {
        let Ok(element) = document.create_element("div") else {
            continue;
        };
        let Ok(item) = element.dyn_into::<HtmlElement>() else {
            continue;
        };
        let class_name = if armed == Some(&definition.id) {
            "jewelry-item selected"
        } else {
            "jewelry-item"
        };
        let _ = item.set_attribute("class", class_name);
        let _ = item.set_attribute("data-index", &index.to_string());
        let _ = item.set_attribute("role", "button");
        let _ = item.set_attribute("title", &definition.label);
        let _ = item.set_attribute("aria-label", &format!("Place {}", definition.label));
        if let Some(url) = icon_url(document, definition) {
            let _ = item
                .style()
                .set_property("background-image", &format!("url('{url}')"));
        }
        let _ = palette_el.append_child(&item);
    }
}

/// Catalog index of the palette entry under the event target.
pub fn palette_index_from_event(event: &Event) -> Option<usize> {
    let mut current = event
        .target()
        .and_then(|target| target.dyn_into::<Element>().ok());
    while let Some(element) = current {
        if let Some(index) = element.get_attribute("data-index") {
            return index.parse::<usize>().ok();
        }
        current = element.parent_element();
    }
    None
}
