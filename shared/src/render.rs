use crate::catalog::{Graphic, ItemDefinition, ItemId, Shape};
use crate::editor::Editor;
use crate::{Point, Size};

pub const HIGHLIGHT_COLOR: &str = "#3b82f6";
pub const PLACEHOLDER_COLOR: &str = "#9ca3af";
const PLACEHOLDER_FONT: &str = "16px Inter";
const FALLBACK_FILL: &str = "#f0f0f0";
const FALLBACK_STROKE: &str = "#ccc";
const FALLBACK_TEXT: &str = "#999";
const FALLBACK_FONT: &str = "10px Arial";
const GOLD: &str = "#d4af37";
const GOLD_SHINE: &str = "#fff6d5";
const STEEL: &str = "#b8bcc2";

/// Reports natural sizes of raster assets that have finished loading.
pub trait AssetSource {
    fn raster_size(&self, id: &ItemId) -> Option<Size>;
}

/// Every raster counts as missing, so items draw their fallback.
pub struct NoAssets;

impl AssetSource for NoAssets {
    fn raster_size(&self, _id: &ItemId) -> Option<Size> {
        None
    }
}

/// One 2D context call. Captions are centred on `(x, y)`.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Clear { width: f64, height: f64 },
    Save,
    Restore,
    Translate { x: f64, y: f64 },
    Scale { factor: f64 },
    Rotate { radians: f64 },
    Background { width: f64, height: f64 },
    Caption { text: String, x: f64, y: f64, font: &'static str, color: &'static str },
    Raster { item: ItemId, x: f64, y: f64, width: f64, height: f64 },
    FillRect { x: f64, y: f64, width: f64, height: f64, color: &'static str },
    StrokeRect { x: f64, y: f64, width: f64, height: f64, color: &'static str, line_width: f64 },
    FillCircle { center: Point, radius: f64, color: &'static str },
    StrokeCircle { center: Point, radius: f64, color: &'static str, line_width: f64 },
    Line { from: Point, to: Point, color: &'static str, line_width: f64 },
}

/// Display list for one full redraw.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Frame {
    ops: Vec<DrawOp>,
}

impl Frame {
    pub fn build(editor: &Editor, assets: &dyn AssetSource) -> Frame {
        let mut ops = Vec::new();
        let canvas = editor.canvas_size();
        let viewport = editor.viewport();
        ops.push(DrawOp::Clear {
            width: canvas.width,
            height: canvas.height,
        });

        let background = editor.background();
        if background.is_none() {
            let center = canvas.center();
            ops.push(DrawOp::Caption {
                text: editor.config().placeholder.clone(),
                x: center.x,
                y: center.y,
                font: PLACEHOLDER_FONT,
                color: PLACEHOLDER_COLOR,
            });
        }
        ops.push(DrawOp::Save);
        ops.push(DrawOp::Translate {
            x: viewport.offset.x,
            y: viewport.offset.y,
        });
        ops.push(DrawOp::Scale {
            factor: viewport.scale,
        });
        if let Some(image) = background {
            ops.push(DrawOp::Background {
                width: image.width as f64,
                height: image.height as f64,
            });
        }

        for item in editor.scene().items() {
            ops.push(DrawOp::Save);
            ops.push(DrawOp::Translate {
                x: item.position.x,
                y: item.position.y,
            });
            ops.push(DrawOp::Rotate {
                radians: item.rotation_radians(),
            });
            push_graphic(
                &mut ops,
                item.definition(),
                item.size() as f64,
                item.length() as f64,
                assets,
            );
            ops.push(DrawOp::Restore);
        }
        ops.push(DrawOp::Restore);

        if let Some(item) = editor.scene().selected() {
            let pad = editor.config().selection_padding;
            let width = item.length() as f64 * viewport.scale;
            let height = item.size() as f64 * viewport.scale;
            let center = viewport.image_to_canvas(item.position);
            ops.push(DrawOp::Save);
            ops.push(DrawOp::Translate {
                x: center.x,
                y: center.y,
            });
            ops.push(DrawOp::Rotate {
                radians: item.rotation_radians(),
            });
            ops.push(DrawOp::StrokeRect {
                x: -width / 2.0 - pad,
                y: -height / 2.0 - pad,
                width: width + pad * 2.0,
                height: height + pad * 2.0,
                color: HIGHLIGHT_COLOR,
                line_width: 2.0,
            });
            ops.push(DrawOp::Restore);
        }

        Frame { ops }
    }

    /// An item graphic alone, centred at `center`; used for palette icons.
    pub fn graphic(
        definition: &ItemDefinition,
        center: Point,
        size: f64,
        assets: &dyn AssetSource,
    ) -> Frame {
        let mut ops = vec![
            DrawOp::Save,
            DrawOp::Translate {
                x: center.x,
                y: center.y,
            },
        ];
        push_graphic(&mut ops, definition, size, size, assets);
        ops.push(DrawOp::Restore);
        Frame { ops }
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn has_selection_outline(&self) -> bool {
        self.ops.iter().any(|op| {
            matches!(
                op,
                DrawOp::StrokeRect {
                    color: HIGHLIGHT_COLOR,
                    ..
                }
            )
        })
    }
}

impl<'a> IntoIterator for &'a Frame {
    type Item = &'a DrawOp;
    type IntoIter = std::slice::Iter<'a, DrawOp>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.iter()
    }
}

/// Graphic centred on the current origin inside a `length x size` box.
fn push_graphic(
    ops: &mut Vec<DrawOp>,
    definition: &ItemDefinition,
    size: f64,
    length: f64,
    assets: &dyn AssetSource,
) {
    match &definition.graphic {
        Graphic::Raster { .. } => match assets.raster_size(&definition.id) {
            Some(natural) if !natural.is_empty() => {
                let ratio = (length / natural.width).min(size / natural.height);
                let width = natural.width * ratio;
                let height = natural.height * ratio;
                ops.push(DrawOp::Raster {
                    item: definition.id.clone(),
                    x: -width / 2.0,
                    y: -height / 2.0,
                    width,
                    height,
                });
            }
            _ => push_fallback(ops, &definition.label, size, length),
        },
        Graphic::Procedural { shape } => push_shape(ops, *shape, size, length),
    }
}

fn push_fallback(ops: &mut Vec<DrawOp>, label: &str, size: f64, length: f64) {
    ops.push(DrawOp::FillRect {
        x: -length / 2.0,
        y: -size / 2.0,
        width: length,
        height: size,
        color: FALLBACK_FILL,
    });
    ops.push(DrawOp::StrokeRect {
        x: -length / 2.0,
        y: -size / 2.0,
        width: length,
        height: size,
        color: FALLBACK_STROKE,
        line_width: 2.0,
    });
    ops.push(DrawOp::Caption {
        text: label.to_string(),
        x: 0.0,
        y: 0.0,
        font: FALLBACK_FONT,
        color: FALLBACK_TEXT,
    });
}

fn push_shape(ops: &mut Vec<DrawOp>, shape: Shape, size: f64, length: f64) {
    let radius = size / 2.0;
    match shape {
        Shape::Stud => {
            ops.push(DrawOp::FillCircle {
                center: Point::ORIGIN,
                radius,
                color: GOLD,
            });
            ops.push(DrawOp::FillCircle {
                center: Point::new(-size * 0.15, -size * 0.15),
                radius: size * 0.15,
                color: GOLD_SHINE,
            });
        }
        Shape::Hoop => {
            let line_width = (size * 0.12).max(1.0);
            ops.push(DrawOp::StrokeCircle {
                center: Point::ORIGIN,
                radius: (radius - line_width / 2.0).max(0.5),
                color: GOLD,
                line_width,
            });
        }
        Shape::Barbell => {
            let ball = radius * 0.6;
            let reach = (length / 2.0 - ball).max(0.0);
            ops.push(DrawOp::Line {
                from: Point::new(-reach, 0.0),
                to: Point::new(reach, 0.0),
                color: STEEL,
                line_width: (size * 0.25).max(1.0),
            });
            for x in [-reach, reach] {
                ops.push(DrawOp::FillCircle {
                    center: Point::new(x, 0.0),
                    radius: ball,
                    color: STEEL,
                });
            }
        }
    }
}
