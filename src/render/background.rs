use crate::assets::decode::ImageHandle;
use crate::content::config::{BackgroundKind, BackgroundSpec, ImageFit};
use crate::content::gradients::GradientCatalog;
use crate::foundation::color::Color;
use crate::foundation::core::{Canvas, Point, Rect};
use crate::foundation::error::ThumbResult;
use crate::render::surface::{Paint, Surface};

/// Paint the base fill, then the optional background image.
///
/// The image is drawn only when the background names one (`image_url`) and a decoded handle is
/// supplied; otherwise the base fill stands alone.
pub fn paint_background<S: Surface + ?Sized>(
    surface: &mut S,
    canvas: Canvas,
    spec: &BackgroundSpec,
    gradients: &GradientCatalog,
    image: Option<&ImageHandle>,
) -> ThumbResult<()> {
    let full = canvas.rect();
    match spec.kind {
        BackgroundKind::Gradient => {
            let g = gradients.get_or_default(spec.gradient_id.as_deref());
            surface.fill_rect(
                full,
                &Paint::LinearGradient {
                    start: Point::ORIGIN,
                    end: Point::new(full.x1, full.y1),
                    from: g.from,
                    to: g.to,
                },
            )?;
        }
        BackgroundKind::Solid => {
            surface.fill_rect(full, &Paint::Solid(spec.solid_color.unwrap_or(Color::BLACK)))?;
        }
        BackgroundKind::None => {}
    }

    if let (Some(_), Some(image)) = (spec.image_url.as_deref(), image) {
        let dest = match spec.image_fit {
            ImageFit::Scale => scaled_image_rect(canvas, image, spec.image_scale.unwrap_or(100.0)),
            ImageFit::Cover => cover_image_rect(canvas, image),
        };
        surface.draw_image(image, dest)?;
    }
    Ok(())
}

/// Centered rect `scale_percent` of the canvas width wide, keeping the image's aspect ratio.
pub fn scaled_image_rect(canvas: Canvas, image: &ImageHandle, scale_percent: f64) -> Rect {
    let (cw, ch) = (canvas.width_f64(), canvas.height_f64());
    let w = cw * (scale_percent / 100.0);
    let h = w / image.aspect_ratio();
    Rect::from_origin_size(((cw - w) / 2.0, (ch - h) / 2.0), (w, h))
}

/// Centered rect covering the whole canvas at the image's aspect ratio.
pub fn cover_image_rect(canvas: Canvas, image: &ImageHandle) -> Rect {
    let (cw, ch) = (canvas.width_f64(), canvas.height_f64());
    let scale = (cw / f64::from(image.width)).max(ch / f64::from(image.height));
    let (w, h) = (f64::from(image.width) * scale, f64::from(image.height) * scale);
    Rect::from_origin_size(((cw - w) / 2.0, (ch - h) / 2.0), (w, h))
}

#[cfg(test)]
#[path = "../../tests/unit/render/background.rs"]
mod tests;
