use super::*;

fn frame() -> FrameRGBA {
    // One opaque red pixel, one half-transparent white pixel (premultiplied).
    FrameRGBA {
        width: 2,
        height: 1,
        data: vec![255, 0, 0, 255, 128, 128, 128, 128],
        premultiplied: true,
    }
}

#[test]
fn parse_formats_and_quality() {
    assert_eq!(OutputFormat::parse("PNG", None).unwrap(), OutputFormat::Png);
    assert_eq!(
        OutputFormat::parse("jpg", None).unwrap(),
        OutputFormat::Jpeg {
            quality: DEFAULT_JPEG_QUALITY
        }
    );
    assert_eq!(
        OutputFormat::parse("jpeg", Some(40)).unwrap(),
        OutputFormat::Jpeg { quality: 40 }
    );
    assert!(OutputFormat::parse("gif", None).unwrap_err().is_client_error());
    assert!(OutputFormat::parse("jpeg", Some(0)).is_err());
    assert!(OutputFormat::parse("jpeg", Some(101)).is_err());
    assert_eq!(OutputFormat::from_extension("JPG").unwrap().extension(), "jpg");
    assert_eq!(OutputFormat::Png.mime_type(), "image/png");
    assert!(OutputFormat::from_extension("bmp").is_none());
}

#[test]
fn png_round_trips_straight_alpha() {
    let bytes = encode_frame(&frame(), OutputFormat::Png).unwrap();
    let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (2, 1));
    assert_eq!(decoded.get_pixel(0, 0).0, [255, 0, 0, 255]);
    assert_eq!(decoded.get_pixel(1, 0).0, [255, 255, 255, 128]);
}

#[test]
fn jpeg_flattens_onto_black() {
    let half_white = FrameRGBA {
        width: 2,
        height: 2,
        data: [128u8; 16].to_vec(),
        premultiplied: true,
    };
    let bytes = encode_frame(&half_white, OutputFormat::Jpeg { quality: 100 }).unwrap();
    assert_eq!(&bytes[..2], &[0xff, 0xd8]);
    let decoded = image::load_from_memory(&bytes).unwrap().to_rgb8();
    let grey = decoded.get_pixel(1, 1).0;
    assert!(grey.iter().all(|&c| (100..=160).contains(&c)), "{grey:?}");
}

#[test]
fn mismatched_frame_is_rejected() {
    let mut f = frame();
    f.data.pop();
    assert!(encode_frame(&f, OutputFormat::Png).is_err());
}
