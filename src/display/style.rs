//! Fill, stroke and text styling

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Font size used when a text style does not set one
pub const DEFAULT_FONT_PX: f32 = 20.0;
/// Approximate advance per character used for text bounds
pub const APPROX_CHAR_WIDTH: f32 = 14.0;
/// Extra height added to the font size for text bounds
pub const TEXT_BOX_PADDING: f32 = 8.0;

/// 24-bit RGB color, `0xRRGGBB`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color(pub u32);

impl Color {
    pub const WHITE: Color = Color(0xffffff);
    pub const BLACK: Color = Color(0x000000);

    /// CSS hex form, e.g. `#0b1221`
    pub fn to_css(self) -> String {
        format!("#{:06x}", self.0 & 0x00ff_ffff)
    }
}

impl From<u32> for Color {
    fn from(rgb: u32) -> Self {
        Color(rgb)
    }
}

/// Outline drawn around a shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub width: f32,
    pub color: Color,
    pub alpha: f32,
}

/// Inner spacing of a text background box
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Padding {
    pub x: f32,
    pub y: f32,
}

/// Drop shadow behind text
#[derive(Debug, Clone, PartialEq)]
pub struct Shadow {
    pub offset: Vec2,
    pub color: String,
    pub blur: f32,
}

/// Text style. Every field is optional so a style doubles as a patch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextStyle {
    /// CSS size, e.g. `"22px"`
    pub font_size: Option<String>,
    pub font_family: Option<String>,
    /// CSS style/weight prefix, e.g. `"bold"`
    pub font_style: Option<String>,
    /// CSS color of the glyphs
    pub color: Option<String>,
    /// CSS color of the box behind the text
    pub background_color: Option<String>,
    pub padding: Option<Padding>,
}

impl TextStyle {
    pub fn sized(font_size: &str, color: &str) -> Self {
        Self {
            font_size: Some(font_size.to_string()),
            color: Some(color.to_string()),
            ..Default::default()
        }
    }

    pub fn family(mut self, family: &str) -> Self {
        self.font_family = Some(family.to_string());
        self
    }

    pub fn bold(mut self) -> Self {
        self.font_style = Some("bold".to_string());
        self
    }

    pub fn background(mut self, color: &str, padding: Padding) -> Self {
        self.background_color = Some(color.to_string());
        self.padding = Some(padding);
        self
    }

    /// Shallow merge: fields set in `patch` replace ours, the rest stay
    pub fn merge(&mut self, patch: &TextStyle) {
        if patch.font_size.is_some() {
            self.font_size = patch.font_size.clone();
        }
        if patch.font_family.is_some() {
            self.font_family = patch.font_family.clone();
        }
        if patch.font_style.is_some() {
            self.font_style = patch.font_style.clone();
        }
        if patch.color.is_some() {
            self.color = patch.color.clone();
        }
        if patch.background_color.is_some() {
            self.background_color = patch.background_color.clone();
        }
        if patch.padding.is_some() {
            self.padding = patch.padding;
        }
    }

    /// Font size in pixels: the leading integer of `font_size`
    pub fn font_px(&self) -> f32 {
        self.font_size.as_deref().map_or(DEFAULT_FONT_PX, font_px)
    }

    /// CSS font shorthand
    pub fn font(&self) -> String {
        let parts = [
            self.font_style.as_deref().unwrap_or(""),
            self.font_size.as_deref().unwrap_or("20px"),
            self.font_family.as_deref().unwrap_or("sans-serif"),
        ];
        parts
            .iter()
            .filter(|p| !p.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn fill_color(&self) -> &str {
        self.color.as_deref().unwrap_or("#fff")
    }
}

/// Pixel size named in a CSS font value, e.g. `22` in `"22px"` or `"bold 22px Inter"`
pub fn font_px(font: &str) -> f32 {
    font.split_whitespace()
        .find_map(|part| part.strip_suffix("px")?.parse::<f32>().ok())
        .unwrap_or(DEFAULT_FONT_PX)
}

/// Approximate text box used for hit-testing and bodies
pub fn approx_text_size(content: &str, style: &TextStyle) -> Vec2 {
    Vec2::new(
        content.chars().count() as f32 * APPROX_CHAR_WIDTH,
        style.font_px() + TEXT_BOX_PADDING,
    )
}
