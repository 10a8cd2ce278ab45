//! Canvas 2D backend

use std::f64::consts::TAU;

use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::surface::{DrawCommand, Surface};

/// Draws into a `<canvas>` through its 2D context
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement, ctx: CanvasRenderingContext2d) -> Self {
        Self { canvas, ctx }
    }
}

impl Surface for CanvasSurface {
    fn size(&self) -> (u32, u32) {
        (self.canvas.width(), self.canvas.height())
    }

    fn measure_text(&self, text: &str, font: &str) -> f32 {
        self.ctx.save();
        self.ctx.set_font(font);
        let width = self
            .ctx
            .measure_text(text)
            .map(|metrics| metrics.width() as f32)
            .unwrap_or_default();
        self.ctx.restore();
        width
    }

    fn draw(&mut self, command: DrawCommand) {
        let ctx = &self.ctx;
        match command {
            DrawCommand::Clear => {
                ctx.clear_rect(0.0, 0.0, self.canvas.width() as f64, self.canvas.height() as f64);
            }
            DrawCommand::FillRect {
                min,
                size,
                color,
                alpha,
            } => {
                ctx.save();
                ctx.set_global_alpha(alpha as f64);
                ctx.set_fill_style_str(&color);
                ctx.fill_rect(min.x as f64, min.y as f64, size.x as f64, size.y as f64);
                ctx.restore();
            }
            DrawCommand::StrokeRect {
                min,
                size,
                width,
                color,
                alpha,
            } => {
                ctx.save();
                ctx.set_global_alpha(alpha as f64);
                ctx.set_stroke_style_str(&color);
                ctx.set_line_width(width as f64);
                ctx.stroke_rect(min.x as f64, min.y as f64, size.x as f64, size.y as f64);
                ctx.restore();
            }
            DrawCommand::FillCircle {
                center,
                radius,
                color,
                alpha,
            } => {
                ctx.save();
                ctx.set_global_alpha(alpha as f64);
                ctx.set_fill_style_str(&color);
                ctx.begin_path();
                ctx.arc(center.x as f64, center.y as f64, radius as f64, 0.0, TAU).ok();
                ctx.fill();
                ctx.restore();
            }
            DrawCommand::StrokeCircle {
                center,
                radius,
                width,
                color,
                alpha,
            } => {
                ctx.save();
                ctx.set_global_alpha(alpha as f64);
                ctx.set_stroke_style_str(&color);
                ctx.set_line_width(width as f64);
                ctx.begin_path();
                ctx.arc(center.x as f64, center.y as f64, radius as f64, 0.0, TAU).ok();
                ctx.stroke();
                ctx.restore();
            }
            DrawCommand::FillText {
                text,
                center,
                font,
                color,
                alpha,
                shadow,
            } => {
                ctx.save();
                ctx.set_global_alpha(alpha as f64);
                ctx.set_font(&font);
                ctx.set_text_align("center");
                ctx.set_text_baseline("middle");
                if let Some(shadow) = shadow {
                    ctx.set_shadow_offset_x(shadow.offset.x as f64);
                    ctx.set_shadow_offset_y(shadow.offset.y as f64);
                    ctx.set_shadow_color(&shadow.color);
                    ctx.set_shadow_blur(shadow.blur as f64);
                }
                ctx.set_fill_style_str(&color);
                ctx.fill_text(&text, center.x as f64, center.y as f64).ok();
                ctx.restore();
            }
        }
    }
}
