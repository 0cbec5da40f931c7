use crate::assets::decode::ImageHandle;
use crate::foundation::color::Color;
use crate::foundation::core::{Canvas, Point, Rect};
use crate::foundation::error::ThumbResult;
use crate::layout::model::TextAlign;
use crate::text::fonts::FontWeight;

/// Fill source for [`Surface::fill_rect`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Paint {
    Solid(Color),
    /// Two-stop linear gradient between absolute canvas points, clamped outside the segment.
    LinearGradient {
        start: Point,
        end: Point,
        from: Color,
        to: Color,
    },
}

/// Font selection for measuring and drawing one line.
#[derive(Clone, Debug, PartialEq)]
pub struct FontSpec {
    /// CSS-style family stack, usually from [`crate::resolve_font_family`].
    pub family: String,
    pub weight: FontWeight,
    pub size_px: f64,
}

/// Everything needed to draw one line of text.
#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle {
    pub font: FontSpec,
    pub color: Color,
    /// Which point of the line the draw origin names horizontally.
    pub align: TextAlign,
    /// Height of the line box whose top edge is the draw origin's `y`.
    pub line_height_px: f64,
}

/// A rendered frame as RGBA8 pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Pixel at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Convert to straight (non-premultiplied) alpha in place.
    pub fn into_straight_alpha(mut self) -> Self {
        if self.premultiplied {
            for px in self.data.chunks_exact_mut(4) {
                let a = u16::from(px[3]);
                if a == 0 || a == 255 {
                    continue;
                }
                for c in &mut px[..3] {
                    *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
                }
            }
            self.premultiplied = false;
        }
        self
    }
}

/// Immediate-mode 2D drawing target used by the render pass.
///
/// Mirrors the small subset of a canvas-style context the layout engine needs: rectangles,
/// image blits, single-line text with measurement, plus global alpha and image smoothing state.
/// State set through the setters persists until changed; the engine restores what it changes.
pub trait Surface {
    /// Resize to `canvas` and reset every pixel to fully transparent.
    fn clear(&mut self, canvas: Canvas) -> ThumbResult<()>;

    fn fill_rect(&mut self, rect: Rect, paint: &Paint) -> ThumbResult<()>;

    /// Draw the whole image scaled into `dest`.
    fn draw_image(&mut self, image: &ImageHandle, dest: Rect) -> ThumbResult<()>;

    /// Advance width of `text` on a single line.
    fn measure_text(&mut self, text: &str, font: &FontSpec) -> f64;

    /// Draw one line. `origin.y` is the top of the line box; `origin.x` is the left edge, center
    /// or right edge of the line depending on `style.align`.
    fn fill_text(&mut self, text: &str, origin: Point, style: &TextStyle) -> ThumbResult<()>;

    fn global_alpha(&self) -> f64;

    fn set_global_alpha(&mut self, alpha: f64);

    fn image_smoothing(&self) -> bool;

    fn set_image_smoothing(&mut self, enabled: bool);
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
