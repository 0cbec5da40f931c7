use std::sync::Arc;

use crate::assets::store::ResolvedAssets;
use crate::content::config::ContentConfig;
use crate::content::gradients::GradientCatalog;
use crate::foundation::color::Color;
use crate::foundation::core::{Canvas, Point, Rect, Size};
use crate::foundation::error::ThumbResult;
use crate::layout::catalog::LayoutCatalog;
use crate::layout::model::{
    GradientDirection, ImageElementDef, LayoutDefinition, LayoutElement, OverlayElementDef,
    Position, TextAlign, TextElementDef,
};
use crate::layout::units::VerticalPosition;
use crate::render::background::paint_background;
use crate::render::surface::{FontSpec, Paint, Surface, TextStyle};
use crate::text::fonts::resolve_font_family;
use crate::text::wrap::wrap_text;

/// Gap inserted above an `"auto"` element, as a fraction of the canvas width.
pub const AUTO_FLOW_GAP: f64 = 0.01;

/// Final pixel box of one drawn element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ElementBounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ElementBounds {
    pub fn rect(&self) -> Rect {
        Rect::from_origin_size((self.x, self.y), (self.width, self.height))
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// Bounds recorded during one render pass, in recording order.
///
/// Re-recording an id replaces its entry and makes it the most recent one.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BoundsMap {
    entries: Vec<(String, ElementBounds)>,
}

impl BoundsMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, bounds: ElementBounds) {
        let id = id.into();
        self.entries.retain(|(k, _)| *k != id);
        self.entries.push((id, bounds));
    }

    pub fn get(&self, id: &str) -> Option<&ElementBounds> {
        self.entries.iter().find(|(k, _)| k == id).map(|(_, b)| b)
    }

    /// Most recently recorded element.
    pub fn last(&self) -> Option<(&str, &ElementBounds)> {
        self.entries.last().map(|(k, b)| (k.as_str(), b))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ElementBounds)> {
        self.entries.iter().map(|(k, b)| (k.as_str(), b))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Interprets layout definitions against content onto a [`Surface`].
///
/// Holds only read-only catalogs, so one engine can serve concurrent renders; every pass owns
/// its own [`BoundsMap`].
#[derive(Clone, Debug)]
pub struct LayoutEngine {
    layouts: Arc<LayoutCatalog>,
    gradients: Arc<GradientCatalog>,
}

impl LayoutEngine {
    pub fn new(layouts: Arc<LayoutCatalog>, gradients: Arc<GradientCatalog>) -> Self {
        Self { layouts, gradients }
    }

    /// Engine over the built-in layout and gradient catalogs.
    pub fn builtin() -> ThumbResult<Self> {
        Ok(Self::new(
            Arc::new(LayoutCatalog::builtin()?),
            Arc::new(GradientCatalog::builtin()?),
        ))
    }

    pub fn layouts(&self) -> &LayoutCatalog {
        &self.layouts
    }

    pub fn gradients(&self) -> &GradientCatalog {
        &self.gradients
    }

    /// Render `content` with the layout named `layout_id` (or the default layout) at the
    /// content's own canvas size.
    pub fn render_by_id<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        content: &ContentConfig,
        layout_id: &str,
        assets: &ResolvedAssets,
    ) -> ThumbResult<BoundsMap> {
        let layout = self.layouts.get_or_default(layout_id);
        self.render(surface, content.canvas, content, layout, assets)
    }

    /// One full render pass: clear, background, then every element in declaration order.
    ///
    /// Elements without content (or, for images, without a resolved asset) are skipped and
    /// leave no bounds. An `"auto"` y places the element below the most recently recorded one.
    /// Returns the bounds recorded during this pass.
    #[tracing::instrument(
        skip_all,
        fields(layout = %layout.id, width = canvas.width, height = canvas.height)
    )]
    pub fn render<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        canvas: Canvas,
        content: &ContentConfig,
        layout: &LayoutDefinition,
        assets: &ResolvedAssets,
    ) -> ThumbResult<BoundsMap> {
        surface.clear(canvas)?;

        // Every pass starts from opaque, smoothed drawing; the caller's state comes back after.
        let prev_alpha = surface.global_alpha();
        let prev_smoothing = surface.image_smoothing();
        surface.set_global_alpha(1.0);
        surface.set_image_smoothing(true);
        let drawn = self.draw_pass(surface, canvas, content, layout, assets);
        surface.set_global_alpha(prev_alpha);
        surface.set_image_smoothing(prev_smoothing);
        drawn
    }

    fn draw_pass<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        canvas: Canvas,
        content: &ContentConfig,
        layout: &LayoutDefinition,
        assets: &ResolvedAssets,
    ) -> ThumbResult<BoundsMap> {
        let mut bounds = BoundsMap::new();

        paint_background(
            surface,
            canvas,
            &content.background,
            &self.gradients,
            assets.background(),
        )?;

        for element in &layout.elements {
            let drawn = match element {
                LayoutElement::Text(def) => draw_text(surface, canvas, content, def, &bounds)?,
                LayoutElement::Image(def) => {
                    draw_image(surface, canvas, content, assets, def, &bounds)?
                }
                LayoutElement::Overlay(def) => {
                    Some(draw_overlay(surface, canvas, content, def, &bounds)?)
                }
            };
            match drawn {
                Some(b) => bounds.insert(element.id(), b),
                None => tracing::debug!(
                    element = element.id(),
                    kind = element.kind_name(),
                    "skipped element without content"
                ),
            }
        }

        Ok(bounds)
    }
}

/// Resolve an element's y, applying auto-flow against the last recorded element.
fn resolve_y(y: VerticalPosition, canvas: Canvas, bounds: &BoundsMap) -> f64 {
    match y {
        VerticalPosition::At(len) => len.resolve(canvas.height_f64()),
        VerticalPosition::Auto => match bounds.last() {
            Some((_, prev)) => prev.bottom() + AUTO_FLOW_GAP * canvas.width_f64(),
            None => 0.0,
        },
    }
}

fn anchor_point(pos: &Position, canvas: Canvas, bounds: &BoundsMap) -> Point {
    Point::new(
        pos.x.resolve(canvas.width_f64()),
        resolve_y(pos.y, canvas, bounds),
    )
}

fn draw_text<S: Surface + ?Sized>(
    surface: &mut S,
    canvas: Canvas,
    content: &ContentConfig,
    def: &TextElementDef,
    bounds: &BoundsMap,
) -> ThumbResult<Option<ElementBounds>> {
    let Some(text) = content.text(&def.id) else {
        return Ok(None);
    };
    let cw = canvas.width_f64();
    let at = anchor_point(&def.position, canvas, bounds);

    let font_px = text.font_size.unwrap_or(def.sizing.font_size).resolve(cw);
    let max_width = def.sizing.max_width.resolve(cw);
    let family = text
        .font_family
        .as_deref()
        .unwrap_or(def.styling.font_family.as_str());
    let font = FontSpec {
        family: resolve_font_family(family),
        weight: text.font_weight.unwrap_or(def.styling.font_weight),
        size_px: font_px,
    };

    let lines = wrap_text(&text.content, max_width, &mut |s: &str| {
        surface.measure_text(s, &font)
    });
    let line_px = font_px * def.sizing.line_height;
    let size = Size::new(max_width, lines.len() as f64 * line_px);
    let origin = def.position.anchor.apply(at, size);

    let align = def.styling.align;
    let line_x = match align {
        TextAlign::Left => origin.x,
        TextAlign::Center => origin.x + max_width / 2.0,
        TextAlign::Right => origin.x + max_width,
    };
    let style = TextStyle {
        font,
        color: text.color.or(def.styling.color).unwrap_or(Color::WHITE),
        align,
        line_height_px: line_px,
    };
    for (i, line) in lines.iter().enumerate() {
        let top = origin.y + i as f64 * line_px;
        surface.fill_text(line, Point::new(line_x, top), &style)?;
    }

    Ok(Some(ElementBounds {
        x: origin.x,
        y: origin.y,
        width: size.width,
        height: size.height,
    }))
}

fn draw_image<S: Surface + ?Sized>(
    surface: &mut S,
    canvas: Canvas,
    content: &ContentConfig,
    assets: &ResolvedAssets,
    def: &ImageElementDef,
    bounds: &BoundsMap,
) -> ThumbResult<Option<ElementBounds>> {
    let (Some(params), Some(handle)) = (content.image(&def.id), assets.image(&def.id)) else {
        return Ok(None);
    };
    let at = anchor_point(&def.position, canvas, bounds);

    // Height is driven by the base size; width follows the intrinsic aspect ratio.
    let height = def.sizing.max_width.resolve(canvas.width_f64()) * (params.scale / 100.0);
    let width = height * handle.aspect_ratio();
    let origin = def.position.anchor.apply(at, Size::new(width, height));

    let prev_alpha = surface.global_alpha();
    let prev_smoothing = surface.image_smoothing();
    surface.set_image_smoothing(false);
    surface.set_global_alpha(unit_interval(params.opacity));
    let drawn = surface.draw_image(
        handle,
        Rect::from_origin_size(origin, Size::new(width, height)),
    );
    surface.set_global_alpha(prev_alpha);
    surface.set_image_smoothing(prev_smoothing);
    drawn?;

    Ok(Some(ElementBounds {
        x: origin.x,
        y: origin.y,
        width,
        height,
    }))
}

fn draw_overlay<S: Surface + ?Sized>(
    surface: &mut S,
    canvas: Canvas,
    content: &ContentConfig,
    def: &OverlayElementDef,
    bounds: &BoundsMap,
) -> ThumbResult<ElementBounds> {
    let at = anchor_point(&def.position, canvas, bounds);
    let size = Size::new(
        def.sizing.width.resolve(canvas.width_f64()),
        def.sizing.height.resolve(canvas.height_f64()),
    );
    let origin = def.position.anchor.apply(at, size);
    let rect = Rect::from_origin_size(origin, size);

    let over = content.overlay(&def.id);
    let paint = match (over.and_then(|o| o.fill), &def.styling.gradient) {
        (Some(fill), _) => Some(Paint::Solid(fill)),
        (None, Some(g)) => {
            let end = match g.direction {
                GradientDirection::Vertical => Point::new(rect.x0, rect.y1),
                GradientDirection::Horizontal => Point::new(rect.x1, rect.y0),
                GradientDirection::Diagonal => Point::new(rect.x1, rect.y1),
            };
            Some(Paint::LinearGradient {
                start: origin,
                end,
                from: g.from,
                to: g.to,
            })
        }
        (None, None) => def.styling.fill.map(Paint::Solid),
    };

    if let Some(paint) = paint {
        let opacity = over
            .and_then(|o| o.opacity)
            .unwrap_or(def.styling.opacity);
        let prev_alpha = surface.global_alpha();
        surface.set_global_alpha(unit_interval(opacity));
        let drawn = surface.fill_rect(rect, &paint);
        surface.set_global_alpha(prev_alpha);
        drawn?;
    }

    Ok(ElementBounds {
        x: origin.x,
        y: origin.y,
        width: size.width,
        height: size.height,
    })
}

fn unit_interval(v: f64) -> f64 {
    if v.is_finite() { v.clamp(0.0, 1.0) } else { 1.0 }
}

#[cfg(test)]
#[path = "../../tests/unit/render/engine.rs"]
mod tests;
