//! Drawing targets

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;

use crate::display::style::font_px;
use crate::display::Shadow;

/// One immediate-mode drawing operation. Colors are CSS strings.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Wipe the whole surface
    Clear,
    FillRect {
        min: Vec2,
        size: Vec2,
        color: String,
        alpha: f32,
    },
    StrokeRect {
        min: Vec2,
        size: Vec2,
        width: f32,
        color: String,
        alpha: f32,
    },
    FillCircle {
        center: Vec2,
        radius: f32,
        color: String,
        alpha: f32,
    },
    StrokeCircle {
        center: Vec2,
        radius: f32,
        width: f32,
        color: String,
        alpha: f32,
    },
    /// Text centred on `center`
    FillText {
        text: String,
        center: Vec2,
        font: String,
        color: String,
        alpha: f32,
        shadow: Option<Shadow>,
    },
}

/// Something the renderer can draw into
pub trait Surface {
    /// Pixel size
    fn size(&self) -> (u32, u32);

    /// Advance width of `text` in `font` (CSS shorthand)
    fn measure_text(&self, text: &str, font: &str) -> f32;

    fn draw(&mut self, command: DrawCommand);
}

#[derive(Default)]
struct Recording {
    width: u32,
    height: u32,
    frame: Vec<DrawCommand>,
    frames: u64,
}

/// Surface that keeps the commands of the latest frame
///
/// Clones share the same recording, so a test can hand one clone to the
/// engine and inspect the other.
#[derive(Clone)]
pub struct RecordingSurface {
    inner: Rc<RefCell<Recording>>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Recording {
                width,
                height,
                ..Default::default()
            })),
        }
    }

    /// Commands issued since the last `Clear`
    pub fn last_frame(&self) -> Vec<DrawCommand> {
        self.inner.borrow().frame.clone()
    }

    /// Number of frames started
    pub fn frame_count(&self) -> u64 {
        self.inner.borrow().frames
    }

    /// Text drawn in the latest frame, in draw order
    pub fn texts(&self) -> Vec<String> {
        self.inner
            .borrow()
            .frame
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::FillText { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> (u32, u32) {
        let inner = self.inner.borrow();
        (inner.width, inner.height)
    }

    fn measure_text(&self, text: &str, font: &str) -> f32 {
        text.chars().count() as f32 * font_px(font) * 0.6
    }

    fn draw(&mut self, command: DrawCommand) {
        let mut inner = self.inner.borrow_mut();
        if command == DrawCommand::Clear {
            inner.frame.clear();
            inner.frames += 1;
        }
        inner.frame.push(command);
    }
}
