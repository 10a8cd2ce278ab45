//! Scene-to-command translation

use glam::Vec2;

use super::surface::{DrawCommand, Surface};
use crate::display::{GameObject, ObjectState, Shape};
use crate::scene::SceneContext;

/// Draw one frame: clear, then every visible object of every active scene
/// in activation order
pub fn render_frame(surface: &mut dyn Surface, scenes: &[SceneContext]) {
    surface.draw(DrawCommand::Clear);
    for ctx in scenes {
        for object in ctx.add.objects() {
            draw_object(surface, &object);
        }
    }
}

fn draw_object(surface: &mut dyn Surface, object: &GameObject) {
    object.with_state(|state| {
        if !state.visible {
            return;
        }
        match &state.shape {
            Shape::Rectangle { fill, .. } => {
                let bounds = state.bounds();
                let size = bounds.max - bounds.min;
                surface.draw(DrawCommand::FillRect {
                    min: bounds.min,
                    size,
                    color: fill.to_css(),
                    alpha: state.alpha,
                });
                if let Some(stroke) = state.stroke {
                    surface.draw(DrawCommand::StrokeRect {
                        min: bounds.min,
                        size,
                        width: stroke.width,
                        color: stroke.color.to_css(),
                        alpha: stroke.alpha,
                    });
                }
            }
            Shape::Circle { radius, fill } => {
                let center = state.bounds().center();
                surface.draw(DrawCommand::FillCircle {
                    center,
                    radius: *radius,
                    color: fill.to_css(),
                    alpha: state.alpha,
                });
                if let Some(stroke) = state.stroke {
                    surface.draw(DrawCommand::StrokeCircle {
                        center,
                        radius: *radius,
                        width: stroke.width,
                        color: stroke.color.to_css(),
                        alpha: stroke.alpha,
                    });
                }
            }
            Shape::Text { .. } => draw_text(surface, state),
        }
    });
}

fn draw_text(surface: &mut dyn Surface, state: &ObjectState) {
    let Shape::Text {
        content,
        style,
        shadow,
    } = &state.shape
    else {
        return;
    };

    let font = style.font();
    let padding = style.padding.unwrap_or_default();
    let box_size = Vec2::new(
        surface.measure_text(content, &font) + padding.x * 2.0,
        style.font_px() + padding.y * 2.0,
    );
    let min = state.position - box_size * state.origin;
    let center = min + box_size * 0.5;

    if let Some(background) = &style.background_color {
        surface.draw(DrawCommand::FillRect {
            min,
            size: box_size,
            color: background.clone(),
            alpha: state.alpha,
        });
    }
    surface.draw(DrawCommand::FillText {
        text: content.clone(),
        center,
        font,
        color: style.fill_color().to_string(),
        alpha: state.alpha,
        shadow: shadow.clone(),
    });
}
