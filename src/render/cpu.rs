use std::borrow::Cow;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;

use crate::assets::decode::ImageHandle;
use crate::foundation::color::Color;
use crate::foundation::core::{Canvas, Point, Rect};
use crate::foundation::error::{ThumbError, ThumbResult};
use crate::layout::model::TextAlign;
use crate::render::surface::{FontSpec, FrameRGBA, Paint, Surface, TextStyle};
use crate::text::fonts::font_files_in_dir;

/// Environment variable naming a directory of extra `.ttf`/`.otf` files.
pub const FONT_DIR_ENV: &str = "THUMBKIT_FONT_DIR";

const GRADIENT_CACHE_CAPACITY: usize = 16;

/// Options for [`CpuSurface`].
#[derive(Clone, Debug, Default)]
pub struct CpuSurfaceOpts {
    /// Font files registered in addition to system fonts.
    pub font_files: Vec<PathBuf>,
    /// Family appended to every font stack as the last resort.
    pub default_family: Option<String>,
}

impl CpuSurfaceOpts {
    /// Options with every font file found in `$THUMBKIT_FONT_DIR`, if set.
    pub fn from_env() -> ThumbResult<Self> {
        let mut opts = Self::default();
        if let Some(dir) = std::env::var_os(FONT_DIR_ENV) {
            opts.font_files = font_files_in_dir(std::path::Path::new(&dir))?;
        }
        Ok(opts)
    }

    pub fn with_font_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.font_files.push(path.into());
        self
    }

    pub fn with_default_family(mut self, family: impl Into<String>) -> Self {
        self.default_family = Some(family.into());
        self
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct TextBrushRgba8 {
    r: u8,
    g: u8,
    b: u8,
    a: u8,
}

impl From<Color> for TextBrushRgba8 {
    fn from(c: Color) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct GradientKey {
    from: [u8; 4],
    to: [u8; 4],
    /// Gradient endpoints relative to the raster origin, in 1/8 px.
    start: (i64, i64),
    end: (i64, i64),
    w: u32,
    h: u32,
}

/// Parley shaping state plus the families registered from font files.
struct TextEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    fallback_families: Vec<String>,
}

impl TextEngine {
    fn new(opts: &CpuSurfaceOpts) -> ThumbResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let mut fallback_families = Vec::new();
        for path in &opts.font_files {
            let bytes = std::fs::read(path)
                .with_context(|| format!("read font file '{}'", path.display()))?;
            let families = font_ctx
                .collection
                .register_fonts(parley::fontique::Blob::from(bytes), None);
            if families.is_empty() {
                return Err(ThumbError::validation(format!(
                    "no font families registered from '{}'",
                    path.display()
                )));
            }
            for (id, _) in families {
                if let Some(name) = font_ctx.collection.family_name(id) {
                    let name = format!("\"{name}\"");
                    if !fallback_families.contains(&name) {
                        tracing::debug!(family = %name, "registered font family");
                        fallback_families.push(name);
                    }
                }
            }
        }
        if let Some(family) = &opts.default_family {
            fallback_families.push(format!("\"{family}\""));
        }
        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            fallback_families,
        })
    }

    fn font_stack(&self, family: &str) -> String {
        if self.fallback_families.is_empty() {
            return family.to_owned();
        }
        format!("{family}, {}", self.fallback_families.join(", "))
    }

    /// Shape `text` as a single unbroken line.
    fn layout_line(
        &mut self,
        text: &str,
        font: &FontSpec,
        brush: TextBrushRgba8,
    ) -> parley::Layout<TextBrushRgba8> {
        let stack = self.font_stack(&font.family);
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(stack)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(
            font.size_px as f32,
        ));
        builder.push_default(parley::style::StyleProperty::FontWeight(
            parley::style::FontWeight::new(font.weight.as_f32()),
        ));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        layout
    }
}

/// [`Surface`] rasterizing with `vello_cpu`, shaping text with `parley`.
///
/// Draw calls are recorded into a `vello_cpu` render context and rasterized by
/// [`CpuSurface::finish`].
pub struct CpuSurface {
    canvas: Option<Canvas>,
    ctx: Option<vello_cpu::RenderContext>,
    text: TextEngine,
    alpha: f64,
    smoothing: bool,
    gradient_cache: HashMap<GradientKey, vello_cpu::Image>,
    font_cache: HashMap<(u64, u32), vello_cpu::peniko::FontData>,
}

impl CpuSurface {
    pub fn new(opts: CpuSurfaceOpts) -> ThumbResult<Self> {
        Ok(Self {
            canvas: None,
            ctx: None,
            text: TextEngine::new(&opts)?,
            alpha: 1.0,
            smoothing: true,
            gradient_cache: HashMap::new(),
            font_cache: HashMap::new(),
        })
    }

    /// Rasterize everything drawn since the last [`Surface::clear`].
    #[tracing::instrument(skip(self))]
    pub fn finish(&mut self) -> ThumbResult<FrameRGBA> {
        let canvas = self.canvas.ok_or_else(not_cleared)?;
        let ctx = self.ctx.as_mut().ok_or_else(not_cleared)?;
        let (w, h) = canvas_u16(canvas)?;
        ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        ctx.render_to_pixmap(&mut pixmap);
        Ok(FrameRGBA {
            width: canvas.width,
            height: canvas.height,
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }

    fn gradient_paint(
        &mut self,
        bounds: Rect,
        start: Point,
        end: Point,
        from: Color,
        to: Color,
    ) -> ThumbResult<vello_cpu::Image> {
        let w = bounds.width().max(1.0) as u32;
        let h = bounds.height().max(1.0) as u32;
        let eighths = |v: f64| (v * 8.0).round() as i64;
        let key = GradientKey {
            from: from.to_premul_rgba8(),
            to: to.to_premul_rgba8(),
            start: (eighths(start.x - bounds.x0), eighths(start.y - bounds.y0)),
            end: (eighths(end.x - bounds.x0), eighths(end.y - bounds.y0)),
            w,
            h,
        };
        if let Some(img) = self.gradient_cache.get(&key).cloned() {
            return Ok(img);
        }

        let bytes = rasterize_linear_gradient(&key);
        let img = rgba_premul_to_image(&bytes, w, h)?;
        if self.gradient_cache.len() >= GRADIENT_CACHE_CAPACITY {
            self.gradient_cache.clear();
        }
        self.gradient_cache.insert(key, img.clone());
        Ok(img)
    }

    fn cpu_font(&mut self, blob_id: u64, index: u32, bytes: &[u8]) -> vello_cpu::peniko::FontData {
        self.font_cache
            .entry((blob_id, index))
            .or_insert_with(|| {
                vello_cpu::peniko::FontData::new(
                    vello_cpu::peniko::Blob::from(bytes.to_vec()),
                    index,
                )
            })
            .clone()
    }
}

impl Surface for CpuSurface {
    fn clear(&mut self, canvas: Canvas) -> ThumbResult<()> {
        let (w, h) = canvas_u16(canvas)?;
        match (&mut self.ctx, self.canvas) {
            (Some(ctx), Some(prev)) if prev == canvas => ctx.reset(),
            _ => self.ctx = Some(vello_cpu::RenderContext::new(w, h)),
        }
        self.canvas = Some(canvas);
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, paint: &Paint) -> ThumbResult<()> {
        let alpha = self.alpha;
        match *paint {
            Paint::Solid(c) => {
                let ctx = self.ctx.as_mut().ok_or_else(not_cleared)?;
                ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
                ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a));
                with_opacity(ctx, alpha, |ctx| ctx.fill_rect(&rect_to_cpu(rect)));
            }
            Paint::LinearGradient {
                start,
                end,
                from,
                to,
            } => {
                // Only the on-canvas part is rasterized; endpoints stay in canvas space.
                let canvas = self.canvas.ok_or_else(not_cleared)?;
                let visible = rect.intersect(canvas.rect());
                if !(visible.width() > 0.0 && visible.height() > 0.0) {
                    return Ok(());
                }
                let bounds = Rect::new(
                    visible.x0.floor(),
                    visible.y0.floor(),
                    visible.x1.ceil(),
                    visible.y1.ceil(),
                );
                let img = self.gradient_paint(bounds, start, end, from, to)?;
                let ctx = self.ctx.as_mut().ok_or_else(not_cleared)?;
                ctx.set_transform(vello_cpu::kurbo::Affine::translate((bounds.x0, bounds.y0)));
                ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
                ctx.set_paint(img);
                let local = visible - crate::foundation::core::Vec2::new(bounds.x0, bounds.y0);
                with_opacity(ctx, alpha, |ctx| ctx.fill_rect(&rect_to_cpu(local)));
            }
        }
        Ok(())
    }

    fn draw_image(&mut self, image: &ImageHandle, dest: Rect) -> ThumbResult<()> {
        if dest.width() <= 0.0 || dest.height() <= 0.0 {
            return Ok(());
        }
        let pixmap = pixmap_from_premul_bytes(&image.rgba8_premul, image.width, image.height)?;
        let mut sampler = vello_cpu::peniko::ImageSampler::default();
        if !self.smoothing {
            sampler.quality = vello_cpu::peniko::ImageQuality::Low;
        }
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler,
        };
        let (iw, ih) = (f64::from(image.width), f64::from(image.height));
        let transform = vello_cpu::kurbo::Affine::translate((dest.x0, dest.y0))
            * vello_cpu::kurbo::Affine::scale_non_uniform(dest.width() / iw, dest.height() / ih);

        let alpha = self.alpha;
        let ctx = self.ctx.as_mut().ok_or_else(not_cleared)?;
        ctx.set_transform(transform);
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(paint);
        with_opacity(ctx, alpha, |ctx| {
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, iw, ih));
        });
        Ok(())
    }

    fn measure_text(&mut self, text: &str, font: &FontSpec) -> f64 {
        if text.is_empty() || !(font.size_px > 0.0) {
            return 0.0;
        }
        let layout = self
            .text
            .layout_line(text, font, TextBrushRgba8::default());
        f64::from(layout.width())
    }

    fn fill_text(&mut self, text: &str, origin: Point, style: &TextStyle) -> ThumbResult<()> {
        if text.is_empty() || !(style.font.size_px > 0.0) {
            return Ok(());
        }
        let layout = self
            .text
            .layout_line(text, &style.font, TextBrushRgba8::from(style.color));
        let width = f64::from(layout.width());
        let x = match style.align {
            TextAlign::Left => origin.x,
            TextAlign::Center => origin.x - width / 2.0,
            TextAlign::Right => origin.x - width,
        };
        // Center the shaped line inside its line box.
        let y = origin.y + (style.line_height_px - f64::from(layout.height())) / 2.0;

        let mut runs = Vec::new();
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let f = run.run().font();
                let font = self.cpu_font(f.data.id(), f.index, f.data.data());
                let brush = run.style().brush;
                let glyphs: Vec<vello_cpu::Glyph> = run
                    .positioned_glyphs()
                    .map(|g| vello_cpu::Glyph {
                        id: g.id,
                        x: g.x,
                        y: g.y,
                    })
                    .collect();
                runs.push((font, run.run().font_size(), brush, glyphs));
            }
        }

        let alpha = self.alpha;
        let ctx = self.ctx.as_mut().ok_or_else(not_cleared)?;
        ctx.set_transform(vello_cpu::kurbo::Affine::translate((x, y)));
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        with_opacity(ctx, alpha, |ctx| {
            for (font, size, brush, glyphs) in runs {
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));
                ctx.glyph_run(&font)
                    .font_size(size)
                    .fill_glyphs(glyphs.into_iter());
            }
        });
        Ok(())
    }

    fn global_alpha(&self) -> f64 {
        self.alpha
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.alpha = if alpha.is_finite() {
            alpha.clamp(0.0, 1.0)
        } else {
            1.0
        };
    }

    fn image_smoothing(&self) -> bool {
        self.smoothing
    }

    fn set_image_smoothing(&mut self, enabled: bool) {
        self.smoothing = enabled;
    }
}

fn not_cleared() -> ThumbError {
    ThumbError::render("surface used before clear()")
}

fn canvas_u16(canvas: Canvas) -> ThumbResult<(u16, u16)> {
    let w: u16 = canvas
        .width
        .try_into()
        .map_err(|_| ThumbError::render("surface width exceeds u16"))?;
    let h: u16 = canvas
        .height
        .try_into()
        .map_err(|_| ThumbError::render("surface height exceeds u16"))?;
    if w == 0 || h == 0 {
        return Err(ThumbError::render("surface width/height must be > 0"));
    }
    Ok((w, h))
}

fn with_opacity(
    ctx: &mut vello_cpu::RenderContext,
    alpha: f64,
    draw: impl FnOnce(&mut vello_cpu::RenderContext),
) {
    let layered = alpha < 1.0;
    if layered {
        ctx.push_opacity_layer(alpha as f32);
    }
    draw(ctx);
    if layered {
        ctx.pop_layer();
    }
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

/// Premultiplied RGBA8 raster of a clamped two-stop gradient, sampled at pixel centers.
fn rasterize_linear_gradient(key: &GradientKey) -> Vec<u8> {
    let (w, h) = (key.w as usize, key.h as usize);
    let mut bytes = vec![0u8; w.saturating_mul(h).saturating_mul(4)];
    let (sx, sy) = (key.start.0 as f64 / 8.0, key.start.1 as f64 / 8.0);
    let (dx, dy) = (key.end.0 as f64 / 8.0 - sx, key.end.1 as f64 / 8.0 - sy);
    let len2 = dx * dx + dy * dy;

    for y in 0..h {
        for x in 0..w {
            let t = if len2 <= f64::EPSILON {
                0.0
            } else {
                let (px, py) = (x as f64 + 0.5 - sx, y as f64 + 0.5 - sy);
                ((px * dx + py * dy) / len2).clamp(0.0, 1.0)
            };
            let idx = (y * w + x) * 4;
            for c in 0..4 {
                let a = f64::from(key.from[c]);
                let b = f64::from(key.to[c]);
                bytes[idx + c] = (a + (b - a) * t).round().clamp(0.0, 255.0) as u8;
            }
        }
    }
    bytes
}

fn pixmap_from_premul_bytes(
    bytes_premul: &[u8],
    width: u32,
    height: u32,
) -> ThumbResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| ThumbError::render("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| ThumbError::render("image height exceeds u16"))?;
    if bytes_premul.len() != (width as usize) * (height as usize) * 4 {
        return Err(ThumbError::render("image byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity((width as usize) * (height as usize));
    for px in bytes_premul.chunks_exact(4) {
        may_have_opacities |= px[3] != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8::from_u8_array([
            px[0], px[1], px[2], px[3],
        ]));
    }
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

fn rgba_premul_to_image(
    bytes_premul: &[u8],
    width: u32,
    height: u32,
) -> ThumbResult<vello_cpu::Image> {
    let pixmap = pixmap_from_premul_bytes(bytes_premul, width, height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
