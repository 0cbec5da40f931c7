use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::foundation::color::Color;
use crate::foundation::core::Canvas;
use crate::foundation::error::{ThumbError, ThumbResult};
use crate::layout::units::Length;
use crate::text::fonts::FontWeight;

/// Runtime content merged into a layout for one render.
///
/// Constructed fresh per render; it carries no identity beyond that pass. Entries are joined to
/// layout elements by `id`, and element ids without an entry are simply not drawn.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContentConfig {
    /// Output dimensions (usually taken from a preset).
    pub canvas: Canvas,
    #[serde(default)]
    pub background: BackgroundSpec,
    #[serde(default)]
    pub texts: Vec<TextContent>,
    #[serde(default)]
    pub images: Vec<ImageContent>,
    #[serde(default)]
    pub overlays: Vec<OverlayContent>,
}

/// Text for one text element, with optional style overrides.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextContent {
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub color: Option<Color>,
    #[serde(default)]
    pub font_size: Option<Length>,
    #[serde(default)]
    pub font_family: Option<String>,
    #[serde(default)]
    pub font_weight: Option<FontWeight>,
}

/// Per-instance parameters of an image element. The decoded pixels travel separately in
/// [`crate::ResolvedAssets`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImageContent {
    pub id: String,
    /// Blit opacity, `0..=1`.
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    /// Size multiplier in percent (`100` = the element's base size).
    #[serde(default = "default_scale")]
    pub scale: f64,
    /// Where the caller loads the image from; not read by the render pass.
    #[serde(default)]
    pub source: Option<String>,
}

/// Per-instance override of an overlay element's fill.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OverlayContent {
    pub id: String,
    #[serde(default)]
    pub fill: Option<Color>,
    #[serde(default)]
    pub opacity: Option<f64>,
}

/// Base fill of the canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackgroundKind {
    /// Two-stop diagonal gradient looked up by id.
    #[default]
    Gradient,
    /// Single color.
    Solid,
    /// Leave the cleared canvas untouched.
    None,
}

/// How the optional background image is sized.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageFit {
    /// Width is `image_scale` percent of the canvas width; centered; never cropped.
    #[default]
    Scale,
    /// Uniformly scaled to cover the whole canvas; centered, overflow cropped by the canvas.
    Cover,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BackgroundSpec {
    #[serde(rename = "type", default)]
    pub kind: BackgroundKind,
    #[serde(default)]
    pub gradient_id: Option<String>,
    #[serde(default)]
    pub solid_color: Option<Color>,
    /// Source of the background image; the image is drawn only when this is set and a decoded
    /// handle was resolved.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Percent of canvas width, default `100`.
    #[serde(default)]
    pub image_scale: Option<f64>,
    #[serde(default)]
    pub image_fit: ImageFit,
}

fn default_opacity() -> f64 {
    1.0
}

fn default_scale() -> f64 {
    100.0
}

impl ContentConfig {
    /// Empty content for `canvas` with the default background.
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            background: BackgroundSpec::default(),
            texts: Vec::new(),
            images: Vec::new(),
            overlays: Vec::new(),
        }
    }

    /// Parse content from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> ThumbResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| ThumbError::serde(format!("parse content JSON: {e}")))
    }

    /// Parse content from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> ThumbResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            ThumbError::validation(format!("open content JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    pub fn text(&self, id: &str) -> Option<&TextContent> {
        self.texts.iter().find(|t| t.id == id)
    }

    pub fn image(&self, id: &str) -> Option<&ImageContent> {
        self.images.iter().find(|i| i.id == id)
    }

    pub fn overlay(&self, id: &str) -> Option<&OverlayContent> {
        self.overlays.iter().find(|o| o.id == id)
    }

    /// Builder-style helper: add or replace the text for `id`.
    pub fn with_text(mut self, id: impl Into<String>, content: impl Into<String>) -> Self {
        let id = id.into();
        self.texts.retain(|t| t.id != id);
        self.texts.push(TextContent::new(id, content));
        self
    }
}

impl TextContent {
    /// Text with no style overrides.
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            color: None,
            font_size: None,
            font_family: None,
            font_weight: None,
        }
    }
}

impl ImageContent {
    /// Full opacity, 100% scale, no source.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            opacity: default_opacity(),
            scale: default_scale(),
            source: None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/content/config.rs"]
mod tests;
