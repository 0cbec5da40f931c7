use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::foundation::color::Color;
use crate::foundation::error::{ThumbError, ThumbResult};
use crate::layout::anchor::Anchor;
use crate::layout::units::{Length, VerticalPosition};
use crate::text::fonts::FontWeight;

/// A named, ordered set of element placement rules, independent of any content.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayoutDefinition {
    /// Stable identifier used to select the layout.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Short description for pickers.
    #[serde(default)]
    pub description: String,
    /// Elements in drawing order.
    pub elements: Vec<LayoutElement>,
}

/// One placement rule of a layout.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LayoutElement {
    /// Wrapped text joined to [`crate::TextContent`] by id.
    Text(TextElementDef),
    /// Raster image joined to [`crate::ImageContent`] and a resolved asset by id.
    Image(ImageElementDef),
    /// Filled rectangle drawn from styling, optionally overridden by [`crate::OverlayContent`].
    Overlay(OverlayElementDef),
}

/// Where an element's anchor point sits on the canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Resolved against canvas width.
    #[serde(default)]
    pub x: Length,
    /// Resolved against canvas height, or `"auto"`.
    #[serde(default)]
    pub y: VerticalPosition,
    /// Which point of the element's box `(x, y)` names.
    #[serde(default)]
    pub anchor: Anchor,
}

/// Horizontal alignment of wrapped lines inside a text box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    /// Lines start at the box's left edge.
    #[default]
    #[serde(alias = "start")]
    Left,
    /// Lines are centered on the box's center.
    Center,
    /// Lines end at the box's right edge.
    #[serde(alias = "end")]
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextSizing {
    /// Wrap width, resolved against canvas width.
    pub max_width: Length,
    /// Font size, resolved against canvas width.
    pub font_size: Length,
    /// Line box height as a multiple of the font size.
    #[serde(default = "default_line_height")]
    pub line_height: f64,
}

fn default_line_height() -> f64 {
    1.2
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextStyling {
    /// Family key or name, see [`crate::resolve_font_family`].
    #[serde(default = "default_font_family")]
    pub font_family: String,
    #[serde(default)]
    pub font_weight: FontWeight,
    /// Default fill; white when neither content nor styling sets one.
    #[serde(default)]
    pub color: Option<Color>,
    #[serde(default)]
    pub align: TextAlign,
}

fn default_font_family() -> String {
    "sans".to_owned()
}

impl Default for TextStyling {
    fn default() -> Self {
        Self {
            font_family: default_font_family(),
            font_weight: FontWeight::default(),
            color: None,
            align: TextAlign::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextElementDef {
    pub id: String,
    #[serde(default)]
    pub position: Position,
    pub sizing: TextSizing,
    #[serde(default)]
    pub styling: TextStyling,
    #[serde(default)]
    pub z_index: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImageSizing {
    /// Base size resolved against canvas width; the drawn height is this times the content
    /// scale.
    pub max_width: Length,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImageElementDef {
    pub id: String,
    #[serde(default)]
    pub position: Position,
    pub sizing: ImageSizing,
    #[serde(default)]
    pub z_index: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OverlaySizing {
    /// Resolved against canvas width.
    pub width: Length,
    /// Resolved against canvas height.
    pub height: Length,
}

/// Direction of a two-stop overlay gradient across the overlay box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradientDirection {
    /// Top edge to bottom edge.
    #[default]
    Vertical,
    /// Left edge to right edge.
    Horizontal,
    /// Top-left corner to bottom-right corner.
    Diagonal,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OverlayGradient {
    pub from: Color,
    pub to: Color,
    #[serde(default)]
    pub direction: GradientDirection,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OverlayStyling {
    #[serde(default)]
    pub fill: Option<Color>,
    /// Takes precedence over `fill` when both are set.
    #[serde(default)]
    pub gradient: Option<OverlayGradient>,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
}

fn default_opacity() -> f64 {
    1.0
}

impl Default for OverlayStyling {
    fn default() -> Self {
        Self {
            fill: None,
            gradient: None,
            opacity: default_opacity(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OverlayElementDef {
    pub id: String,
    #[serde(default)]
    pub position: Position,
    pub sizing: OverlaySizing,
    #[serde(default)]
    pub styling: OverlayStyling,
    #[serde(default)]
    pub z_index: i32,
}

impl LayoutElement {
    /// Element id, unique within its layout.
    pub fn id(&self) -> &str {
        match self {
            Self::Text(e) => &e.id,
            Self::Image(e) => &e.id,
            Self::Overlay(e) => &e.id,
        }
    }

    pub fn position(&self) -> &Position {
        match self {
            Self::Text(e) => &e.position,
            Self::Image(e) => &e.position,
            Self::Overlay(e) => &e.position,
        }
    }

    /// Presentation ordering hint. Not used by the render pass.
    pub fn z_index(&self) -> i32 {
        match self {
            Self::Text(e) => e.z_index,
            Self::Image(e) => e.z_index,
            Self::Overlay(e) => e.z_index,
        }
    }

    /// `"text"`, `"image"` or `"overlay"`.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Image(_) => "image",
            Self::Overlay(_) => "overlay",
        }
    }
}

impl LayoutDefinition {
    /// Check structural invariants: non-empty ids, unique element ids, sane line heights and
    /// opacities.
    pub fn validate(&self) -> ThumbResult<()> {
        if self.id.trim().is_empty() {
            return Err(ThumbError::validation("layout id must be non-empty"));
        }

        let mut seen = BTreeSet::new();
        for el in &self.elements {
            let id = el.id();
            if id.trim().is_empty() {
                return Err(ThumbError::validation(format!(
                    "layout '{}' has an element with an empty id",
                    self.id
                )));
            }
            if !seen.insert(id) {
                return Err(ThumbError::validation(format!(
                    "layout '{}' has duplicate element id '{id}'",
                    self.id
                )));
            }
            match el {
                LayoutElement::Text(t) => {
                    let lh = t.sizing.line_height;
                    if !lh.is_finite() || lh <= 0.0 {
                        return Err(ThumbError::validation(format!(
                            "layout '{}' element '{id}' line_height must be finite and > 0",
                            self.id
                        )));
                    }
                }
                LayoutElement::Overlay(o) => {
                    if !(0.0..=1.0).contains(&o.styling.opacity) {
                        return Err(ThumbError::validation(format!(
                            "layout '{}' element '{id}' opacity must be within 0..=1",
                            self.id
                        )));
                    }
                }
                LayoutElement::Image(_) => {}
            }
        }
        Ok(())
    }

    /// Look up an element by id.
    pub fn element(&self, id: &str) -> Option<&LayoutElement> {
        self.elements.iter().find(|e| e.id() == id)
    }

    /// Elements stably sorted by `z_index`, for presentation surfaces such as an editor's
    /// schematic preview. Rendering always uses declaration order.
    pub fn elements_by_z_index(&self) -> Vec<&LayoutElement> {
        let mut out: Vec<&LayoutElement> = self.elements.iter().collect();
        out.sort_by_key(|e| e.z_index());
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/model.rs"]
mod tests;
