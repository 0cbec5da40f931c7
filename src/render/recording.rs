use crate::assets::decode::ImageHandle;
use crate::foundation::core::{Canvas, Point, Rect};
use crate::foundation::error::ThumbResult;
use crate::render::surface::{FontSpec, Paint, Surface, TextStyle};

/// One call received by a [`RecordingSurface`], with the state it was drawn under.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Clear(Canvas),
    FillRect {
        rect: Rect,
        paint: Paint,
        alpha: f64,
    },
    DrawImage {
        dest: Rect,
        width: u32,
        height: u32,
        alpha: f64,
        smoothing: bool,
    },
    FillText {
        text: String,
        origin: Point,
        style: TextStyle,
        alpha: f64,
    },
}

/// A [`Surface`] that draws nothing and logs every call.
///
/// Text is measured as if monospaced: `chars * char_width * font size`. Useful for previews that
/// only need geometry and for exercising the render pass without fonts.
#[derive(Clone, Debug)]
pub struct RecordingSurface {
    ops: Vec<DrawOp>,
    canvas: Option<Canvas>,
    char_width: f64,
    alpha: f64,
    smoothing: bool,
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self {
            ops: Vec::new(),
            canvas: None,
            char_width: 0.5,
            alpha: 1.0,
            smoothing: true,
        }
    }

    /// Override the per-character advance, as a fraction of the font size.
    pub fn with_char_width(mut self, em_fraction: f64) -> Self {
        self.char_width = em_fraction;
        self
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Canvas passed to the last [`Surface::clear`].
    pub fn canvas(&self) -> Option<Canvas> {
        self.canvas
    }

    /// Drawn text lines in order, with their origins.
    pub fn text_lines(&self) -> Vec<(&str, Point)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::FillText { text, origin, .. } => Some((text.as_str(), *origin)),
                _ => None,
            })
            .collect()
    }

    pub fn take_ops(&mut self) -> Vec<DrawOp> {
        std::mem::take(&mut self.ops)
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self, canvas: Canvas) -> ThumbResult<()> {
        self.ops.clear();
        self.canvas = Some(canvas);
        self.ops.push(DrawOp::Clear(canvas));
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, paint: &Paint) -> ThumbResult<()> {
        self.ops.push(DrawOp::FillRect {
            rect,
            paint: *paint,
            alpha: self.alpha,
        });
        Ok(())
    }

    fn draw_image(&mut self, image: &ImageHandle, dest: Rect) -> ThumbResult<()> {
        self.ops.push(DrawOp::DrawImage {
            dest,
            width: image.width,
            height: image.height,
            alpha: self.alpha,
            smoothing: self.smoothing,
        });
        Ok(())
    }

    fn measure_text(&mut self, text: &str, font: &FontSpec) -> f64 {
        text.chars().count() as f64 * self.char_width * font.size_px
    }

    fn fill_text(&mut self, text: &str, origin: Point, style: &TextStyle) -> ThumbResult<()> {
        self.ops.push(DrawOp::FillText {
            text: text.to_owned(),
            origin,
            style: style.clone(),
            alpha: self.alpha,
        });
        Ok(())
    }

    fn global_alpha(&self) -> f64 {
        self.alpha
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.alpha = alpha;
    }

    fn image_smoothing(&self) -> bool {
        self.smoothing
    }

    fn set_image_smoothing(&mut self, enabled: bool) {
        self.smoothing = enabled;
    }
}
