use super::*;
use crate::text::fonts::FontWeight;

fn surface(w: u32, h: u32) -> CpuSurface {
    let mut s = CpuSurface::new(CpuSurfaceOpts::default()).unwrap();
    s.clear(Canvas::new(w, h).unwrap()).unwrap();
    s
}

fn font(size_px: f64) -> FontSpec {
    FontSpec {
        family: crate::text::fonts::resolve_font_family("sans"),
        weight: FontWeight::BOLD,
        size_px,
    }
}

#[test]
fn cleared_surface_is_transparent() {
    let mut s = surface(3, 2);
    let frame = s.finish().unwrap();
    assert_eq!((frame.width, frame.height), (3, 2));
    assert!(frame.premultiplied);
    assert!(frame.data.iter().all(|&b| b == 0));
}

#[test]
fn drawing_before_clear_is_a_render_error() {
    let mut s = CpuSurface::new(CpuSurfaceOpts::default()).unwrap();
    let err = s
        .fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), &Paint::Solid(Color::WHITE))
        .unwrap_err();
    assert!(matches!(err, ThumbError::Render(_)));
    assert!(s.finish().is_err());
}

#[test]
fn solid_fill_covers_rect() {
    let mut s = surface(4, 4);
    s.fill_rect(
        Rect::new(0.0, 0.0, 2.0, 4.0),
        &Paint::Solid(Color::rgb(255, 0, 0)),
    )
    .unwrap();
    let frame = s.finish().unwrap();
    assert_eq!(frame.pixel(1, 1), Some([255, 0, 0, 255]));
    assert_eq!(frame.pixel(3, 1), Some([0, 0, 0, 0]));
}

#[test]
fn global_alpha_scales_coverage() {
    let mut s = surface(2, 2);
    s.set_global_alpha(0.5);
    assert_eq!(s.global_alpha(), 0.5);
    s.fill_rect(Rect::new(0.0, 0.0, 2.0, 2.0), &Paint::Solid(Color::WHITE))
        .unwrap();
    let px = s.finish().unwrap().pixel(0, 0).unwrap();
    assert!((120..=136).contains(&px[3]), "alpha {}", px[3]);
}

#[test]
fn linear_gradient_runs_between_stops() {
    let mut s = surface(100, 1);
    s.fill_rect(
        Rect::new(0.0, 0.0, 100.0, 1.0),
        &Paint::LinearGradient {
            start: Point::new(0.0, 0.0),
            end: Point::new(100.0, 0.0),
            from: Color::BLACK,
            to: Color::WHITE,
        },
    )
    .unwrap();
    let frame = s.finish().unwrap();
    let left = frame.pixel(0, 0).unwrap();
    let mid = frame.pixel(50, 0).unwrap();
    let right = frame.pixel(99, 0).unwrap();
    assert!(left[0] < 10);
    assert!((110..=150).contains(&mid[0]), "mid {}", mid[0]);
    assert!(right[0] > 245);
    assert_eq!(mid[3], 255);
}

#[test]
fn gradient_raster_is_cached_per_geometry() {
    let mut s = surface(10, 10);
    let paint = Paint::LinearGradient {
        start: Point::new(0.0, 0.0),
        end: Point::new(10.0, 10.0),
        from: Color::BLACK,
        to: Color::WHITE,
    };
    s.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0), &paint).unwrap();
    s.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0), &paint).unwrap();
    assert_eq!(s.gradient_cache.len(), 1);
}

#[test]
fn gradient_larger_than_canvas_is_clipped() {
    let mut s = surface(64, 64);
    s.fill_rect(
        Rect::new(-6.4, 0.0, 69_993.6, 64.0),
        &Paint::LinearGradient {
            start: Point::new(-6.4, 0.0),
            end: Point::new(69_993.6, 0.0),
            from: Color::BLACK,
            to: Color::WHITE,
        },
    )
    .unwrap();
    let key = s.gradient_cache.keys().next().copied().unwrap();
    assert_eq!((key.w, key.h), (64, 64));

    let frame = s.finish().unwrap();
    let px = frame.pixel(63, 32).unwrap();
    assert_eq!(px[3], 255);
    assert!(px[0] < 5, "{px:?}");
}

#[test]
fn gradient_entirely_off_canvas_draws_nothing() {
    let mut s = surface(8, 8);
    s.fill_rect(
        Rect::new(20.0, 20.0, 40.0, 40.0),
        &Paint::LinearGradient {
            start: Point::new(20.0, 20.0),
            end: Point::new(40.0, 40.0),
            from: Color::WHITE,
            to: Color::WHITE,
        },
    )
    .unwrap();
    assert!(s.gradient_cache.is_empty());
    assert!(s.finish().unwrap().data.iter().all(|&b| b == 0));
}

#[test]
fn nearest_sampling_when_smoothing_disabled() {
    let image =
        ImageHandle::from_premul_rgba8(2, 1, vec![255, 0, 0, 255, 0, 0, 255, 255]).unwrap();
    let mut s = surface(4, 1);
    s.set_image_smoothing(false);
    s.draw_image(&image, Rect::new(0.0, 0.0, 4.0, 1.0)).unwrap();
    let frame = s.finish().unwrap();
    assert_eq!(frame.pixel(0, 0), Some([255, 0, 0, 255]));
    assert_eq!(frame.pixel(3, 0), Some([0, 0, 255, 255]));
}

#[test]
fn clear_discards_previous_drawing() {
    let mut s = surface(2, 2);
    s.fill_rect(Rect::new(0.0, 0.0, 2.0, 2.0), &Paint::Solid(Color::WHITE))
        .unwrap();
    s.clear(Canvas::new(2, 2).unwrap()).unwrap();
    assert!(s.finish().unwrap().data.iter().all(|&b| b == 0));
}

#[test]
fn text_measures_and_draws_when_fonts_exist() {
    let mut s = surface(200, 60);
    let spec = font(32.0);
    let w = s.measure_text("Hello", &spec);
    if w <= 0.0 {
        // No usable fonts on this machine.
        return;
    }
    assert!(s.measure_text("Hello world", &spec) > w);
    assert_eq!(s.measure_text("", &spec), 0.0);

    let style = TextStyle {
        font: spec,
        color: Color::WHITE,
        align: TextAlign::Left,
        line_height_px: 40.0,
    };
    s.fill_text("Hello", Point::new(10.0, 10.0), &style).unwrap();
    let frame = s.finish().unwrap();
    assert!(frame.data.chunks_exact(4).any(|px| px[3] > 0));
}
