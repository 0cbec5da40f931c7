use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::content::config::{
    BackgroundKind, BackgroundSpec, ContentConfig, ImageContent, ImageFit, OverlayContent,
    TextContent,
};
use crate::content::gradients::GradientCatalog;
use crate::content::presets::PresetCatalog;
use crate::foundation::color::Color;
use crate::foundation::core::Canvas;
use crate::foundation::error::{ThumbError, ThumbResult};
use crate::layout::catalog::LayoutCatalog;
use crate::layout::units::Length;
use crate::request::encode::OutputFormat;
use crate::text::fonts::FontWeight;

/// Longest accepted text content, in characters.
pub const MAX_TEXT_CHARS: usize = 280;

/// Accepted range for image and background scale percentages.
pub const SCALE_PERCENT_RANGE: std::ops::RangeInclusive<f64> = 1.0..=1000.0;

/// Raw render parameters as received from a client.
///
/// Colors are plain strings here (`#RGB`, `#RGBA`, `#RRGGBB` or `#RRGGBBAA`); everything is
/// checked by [`validate_request`] before it reaches the render pass.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RenderRequest {
    #[serde(default)]
    pub layout: Option<String>,
    #[serde(default)]
    pub preset: Option<String>,
    /// Explicit output size; both must be given and they override the preset.
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    /// `png` (default) or `jpeg`.
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub quality: Option<i64>,
    #[serde(default)]
    pub background: BackgroundRequest,
    #[serde(default)]
    pub texts: Vec<TextRequest>,
    #[serde(default)]
    pub images: Vec<ImageRequest>,
    #[serde(default)]
    pub overlays: Vec<OverlayRequest>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BackgroundRequest {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub gradient_id: Option<String>,
    #[serde(default)]
    pub solid_color: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub image_scale: Option<f64>,
    #[serde(default)]
    pub image_fit: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TextRequest {
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub font_size: Option<Length>,
    #[serde(default)]
    pub font_family: Option<String>,
    #[serde(default)]
    pub font_weight: Option<FontWeight>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImageRequest {
    pub id: String,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub opacity: Option<f64>,
    #[serde(default)]
    pub scale: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OverlayRequest {
    pub id: String,
    #[serde(default)]
    pub fill: Option<String>,
    #[serde(default)]
    pub opacity: Option<f64>,
}

/// A request that passed validation: exactly what one render pass and encode need.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidatedRequest {
    pub content: ContentConfig,
    pub layout_id: String,
    pub format: OutputFormat,
}

/// Catalogs a request is checked against.
#[derive(Clone, Copy, Debug)]
pub struct Catalogs<'a> {
    pub layouts: &'a LayoutCatalog,
    pub presets: &'a PresetCatalog,
    pub gradients: &'a GradientCatalog,
}

impl RenderRequest {
    pub fn from_json_str(s: &str) -> ThumbResult<Self> {
        serde_json::from_str(s).map_err(|e| ThumbError::serde(format!("parse request JSON: {e}")))
    }
}

/// Check `req` and turn it into render input.
///
/// Unknown layout/preset/gradient ids, malformed colors, oversized text, out-of-range numbers
/// and unknown formats are all [`ThumbError::Validation`].
#[tracing::instrument(skip_all)]
pub fn validate_request(req: &RenderRequest, catalogs: Catalogs<'_>) -> ThumbResult<ValidatedRequest> {
    let layout_id = match req.layout.as_deref() {
        Some(id) if catalogs.layouts.contains(id) => id.to_owned(),
        Some(id) => return Err(ThumbError::validation(format!("unknown layout '{id}'"))),
        None => catalogs.layouts.default_id().to_owned(),
    };

    let canvas = resolve_canvas(req, catalogs.presets)?;
    let background = validate_background(&req.background, catalogs.gradients)?;

    let mut seen = BTreeSet::new();
    let mut texts = Vec::with_capacity(req.texts.len());
    for t in &req.texts {
        check_unique(&mut seen, "text", &t.id)?;
        let chars = t.content.chars().count();
        if chars > MAX_TEXT_CHARS {
            return Err(ThumbError::validation(format!(
                "text '{}' is {chars} characters, max {MAX_TEXT_CHARS}",
                t.id
            )));
        }
        if let Some(size) = t.font_size
            && !(size.resolve(canvas.width_f64()) > 0.0)
        {
            return Err(ThumbError::validation(format!(
                "text '{}' font_size must resolve to > 0",
                t.id
            )));
        }
        texts.push(TextContent {
            id: t.id.clone(),
            content: t.content.clone(),
            color: t.color.as_deref().map(parse_color).transpose()?,
            font_size: t.font_size,
            font_family: t.font_family.clone(),
            font_weight: t.font_weight,
        });
    }

    let mut images = Vec::with_capacity(req.images.len());
    for i in &req.images {
        check_unique(&mut seen, "image", &i.id)?;
        let mut image = ImageContent::new(i.id.clone());
        image.source = i.source.clone();
        if let Some(o) = i.opacity {
            image.opacity = check_opacity(&i.id, o)?;
        }
        if let Some(s) = i.scale {
            image.scale = check_scale(&format!("image '{}' scale", i.id), s)?;
        }
        images.push(image);
    }

    let mut overlays = Vec::with_capacity(req.overlays.len());
    for o in &req.overlays {
        check_unique(&mut seen, "overlay", &o.id)?;
        overlays.push(OverlayContent {
            id: o.id.clone(),
            fill: o.fill.as_deref().map(parse_color).transpose()?,
            opacity: o.opacity.map(|v| check_opacity(&o.id, v)).transpose()?,
        });
    }

    let format = OutputFormat::parse(req.format.as_deref().unwrap_or("png"), req.quality)?;

    Ok(ValidatedRequest {
        content: ContentConfig {
            canvas,
            background,
            texts,
            images,
            overlays,
        },
        layout_id,
        format,
    })
}

/// Expand `#RGB` / `#RGBA` shorthand to the long form, keeping a leading `#`.
pub fn expand_hex_color(s: &str) -> ThumbResult<String> {
    let hex = s.trim();
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ThumbError::validation(format!("invalid hex color '{s}'")));
    }
    match hex.len() {
        3 | 4 => Ok(std::iter::once('#')
            .chain(hex.chars().flat_map(|c| [c, c]))
            .collect()),
        6 | 8 => Ok(format!("#{hex}")),
        _ => Err(ThumbError::validation(format!("invalid hex color '{s}'"))),
    }
}

/// Parse a client color, accepting shorthand forms.
pub fn parse_color(s: &str) -> ThumbResult<Color> {
    Color::parse_hex(&expand_hex_color(s)?)
        .map_err(|_| ThumbError::validation(format!("invalid hex color '{s}'")))
}

fn resolve_canvas(req: &RenderRequest, presets: &PresetCatalog) -> ThumbResult<Canvas> {
    match (req.width, req.height) {
        (Some(w), Some(h)) => Canvas::new(w, h),
        (None, None) => {
            let preset = match req.preset.as_deref() {
                Some(id) => presets
                    .get(id)
                    .ok_or_else(|| ThumbError::validation(format!("unknown preset '{id}'")))?,
                None => presets.default_preset(),
            };
            preset.canvas()
        }
        _ => Err(ThumbError::validation(
            "width and height must be given together",
        )),
    }
}

fn validate_background(
    bg: &BackgroundRequest,
    gradients: &GradientCatalog,
) -> ThumbResult<BackgroundSpec> {
    let kind = match bg.kind.as_deref().map(str::trim) {
        None | Some("gradient") => BackgroundKind::Gradient,
        Some("solid") => BackgroundKind::Solid,
        Some("none") => BackgroundKind::None,
        Some(other) => {
            return Err(ThumbError::validation(format!(
                "unknown background type '{other}'"
            )));
        }
    };
    if let Some(id) = bg.gradient_id.as_deref()
        && gradients.get(id).is_none()
    {
        return Err(ThumbError::validation(format!("unknown gradient '{id}'")));
    }
    let image_fit = match bg.image_fit.as_deref().map(str::trim) {
        None | Some("scale") => ImageFit::Scale,
        Some("cover") => ImageFit::Cover,
        Some(other) => {
            return Err(ThumbError::validation(format!(
                "unknown background image_fit '{other}'"
            )));
        }
    };
    Ok(BackgroundSpec {
        kind,
        gradient_id: bg.gradient_id.clone(),
        solid_color: bg.solid_color.as_deref().map(parse_color).transpose()?,
        image_url: bg.image_url.clone(),
        image_scale: bg
            .image_scale
            .map(|s| check_scale("background image_scale", s))
            .transpose()?,
        image_fit,
    })
}

fn check_unique<'a>(seen: &mut BTreeSet<&'a str>, kind: &str, id: &'a str) -> ThumbResult<()> {
    if id.is_empty() {
        return Err(ThumbError::validation(format!("{kind} id must be non-empty")));
    }
    if !seen.insert(id) {
        return Err(ThumbError::validation(format!("duplicate content id '{id}'")));
    }
    Ok(())
}

fn check_opacity(id: &str, v: f64) -> ThumbResult<f64> {
    if (0.0..=1.0).contains(&v) {
        Ok(v)
    } else {
        Err(ThumbError::validation(format!(
            "'{id}' opacity must be within 0..=1, got {v}"
        )))
    }
}

fn check_scale(what: &str, v: f64) -> ThumbResult<f64> {
    if SCALE_PERCENT_RANGE.contains(&v) {
        Ok(v)
    } else {
        Err(ThumbError::validation(format!(
            "{what} must be within {}..={} percent, got {v}",
            SCALE_PERCENT_RANGE.start(),
            SCALE_PERCENT_RANGE.end()
        )))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/request/validate.rs"]
mod tests;
