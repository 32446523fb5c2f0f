use web_sys::CanvasRenderingContext2d;

use earboard_shared::{DrawOp, Frame};

use crate::assets::AssetCache;
use crate::state::State;

pub fn draw_frame(
    ctx: &CanvasRenderingContext2d,
    frame: &Frame,
    assets: &AssetCache,
    background: Option<&web_sys::HtmlImageElement>,
) {
    for op in frame {
        draw_op(ctx, op, assets, background);
    }
}

fn draw_op(
    ctx: &CanvasRenderingContext2d,
    op: &DrawOp,
    assets: &AssetCache,
    background: Option<&web_sys::HtmlImageElement>,
) {
    match op {
        DrawOp::Clear { width, height } => ctx.clear_rect(0.0, 0.0, *width, *height),
        DrawOp::Save => ctx.save(),
        DrawOp::Restore => ctx.restore(),
        DrawOp::Translate { x, y } => {
            let _ = ctx.translate(*x, *y);
        }
        DrawOp::Scale { factor } => {
            let _ = ctx.scale(*factor, *factor);
        }
        DrawOp::Rotate { radians } => {
            let _ = ctx.rotate(*radians);
        }
        DrawOp::Background { .. } => {
            if let Some(image) = background {
                let _ = ctx.draw_image_with_html_image_element(image, 0.0, 0.0);
            }
        }
        DrawOp::Caption {
            text,
            x,
            y,
            font,
            color,
        } => {
            ctx.set_fill_style_str(color);
            ctx.set_text_align("center");
            ctx.set_text_baseline("middle");
            ctx.set_font(font);
            let _ = ctx.fill_text(text, *x, *y);
        }
        DrawOp::Raster {
            item,
            x,
            y,
            width,
            height,
        } => {
            if let Some(image) = assets.image(item) {
                let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(
                    image, *x, *y, *width, *height,
                );
            }
        }
        DrawOp::FillRect {
            x,
            y,
            width,
            height,
            color,
        } => {
            ctx.set_fill_style_str(color);
            ctx.fill_rect(*x, *y, *width, *height);
        }
        DrawOp::StrokeRect {
            x,
            y,
            width,
            height,
            color,
            line_width,
        } => {
            ctx.set_stroke_style_str(color);
            ctx.set_line_width(*line_width);
            ctx.stroke_rect(*x, *y, *width, *height);
        }
        DrawOp::FillCircle {
            center,
            radius,
            color,
        } => {
            ctx.set_fill_style_str(color);
            ctx.begin_path();
            let _ = ctx.arc(center.x, center.y, *radius, 0.0, std::f64::consts::PI * 2.0);
            ctx.fill();
        }
        DrawOp::StrokeCircle {
            center,
            radius,
            color,
            line_width,
        } => {
            ctx.set_stroke_style_str(color);
            ctx.set_line_width(*line_width);
            ctx.begin_path();
            let _ = ctx.arc(center.x, center.y, *radius, 0.0, std::f64::consts::PI * 2.0);
            ctx.stroke();
        }
        DrawOp::Line {
            from,
            to,
            color,
            line_width,
        } => {
            ctx.set_stroke_style_str(color);
            ctx.set_line_width(*line_width);
            ctx.set_line_cap("round");
            ctx.begin_path();
            ctx.move_to(from.x, from.y);
            ctx.line_to(to.x, to.y);
            ctx.stroke();
        }
    }
}

pub fn redraw(state: &State) {
    let frame = state.editor.frame(&state.assets);
    draw_frame(&state.ctx, &frame, &state.assets, state.background.as_ref());
}
