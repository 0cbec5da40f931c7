use super::*;

struct Fixture {
    layouts: LayoutCatalog,
    presets: PresetCatalog,
    gradients: GradientCatalog,
}

impl Fixture {
    fn new() -> Self {
        Self {
            layouts: LayoutCatalog::builtin().unwrap(),
            presets: PresetCatalog::builtin().unwrap(),
            gradients: GradientCatalog::builtin().unwrap(),
        }
    }

    fn catalogs(&self) -> Catalogs<'_> {
        Catalogs {
            layouts: &self.layouts,
            presets: &self.presets,
            gradients: &self.gradients,
        }
    }

    fn check(&self, json: &str) -> ThumbResult<ValidatedRequest> {
        validate_request(&RenderRequest::from_json_str(json)?, self.catalogs())
    }
}

fn rejected(fx: &Fixture, json: &str) -> String {
    let err = fx.check(json).unwrap_err();
    assert!(err.is_client_error(), "{err}");
    err.to_string()
}

#[test]
fn empty_request_uses_defaults() {
    let fx = Fixture::new();
    let v = fx.check("{}").unwrap();
    assert_eq!(v.layout_id, "classic");
    assert_eq!(v.format, OutputFormat::Png);
    assert_eq!(v.content.canvas, Canvas::new(1280, 720).unwrap());
    assert_eq!(v.content.background.kind, BackgroundKind::Gradient);
    assert!(v.content.texts.is_empty());
}

#[test]
fn full_request_maps_into_content() {
    let fx = Fixture::new();
    let v = fx
        .check(
            r##"{
                "layout": "subtitle",
                "preset": "instagram-square",
                "format": "jpeg",
                "quality": 70,
                "background": { "type": "solid", "solid_color": "#0f0", "image_fit": "cover" },
                "texts": [
                    { "id": "title", "content": "Hello", "color": "#fff8", "font_size": "3rem", "font_weight": "bold" }
                ],
                "images": [ { "id": "logo", "source": "logo.png", "opacity": 0.5, "scale": 150 } ],
                "overlays": [ { "id": "shade", "fill": "#000000", "opacity": 0.25 } ]
            }"##,
        )
        .unwrap();

    assert_eq!(v.layout_id, "subtitle");
    assert_eq!(v.format, OutputFormat::Jpeg { quality: 70 });
    assert_eq!(v.content.canvas, Canvas::new(1080, 1080).unwrap());
    assert_eq!(v.content.background.kind, BackgroundKind::Solid);
    assert_eq!(v.content.background.image_fit, ImageFit::Cover);
    assert_eq!(
        v.content.background.solid_color,
        Some(Color::rgb(0, 255, 0))
    );

    let title = v.content.text("title").unwrap();
    assert_eq!(title.color, Some(Color::rgba(255, 255, 255, 0x88)));
    assert_eq!(title.font_size, Some(Length::Rem(3.0)));
    assert_eq!(title.font_weight, Some(FontWeight::BOLD));

    let logo = v.content.image("logo").unwrap();
    assert_eq!(logo.opacity, 0.5);
    assert_eq!(logo.scale, 150.0);
    assert_eq!(logo.source.as_deref(), Some("logo.png"));

    let shade = v.content.overlay("shade").unwrap();
    assert_eq!(shade.fill, Some(Color::BLACK));
    assert_eq!(shade.opacity, Some(0.25));
}

#[test]
fn explicit_size_overrides_preset() {
    let fx = Fixture::new();
    let v = fx
        .check(r#"{ "preset": "twitter", "width": 640, "height": 360 }"#)
        .unwrap();
    assert_eq!(v.content.canvas, Canvas::new(640, 360).unwrap());

    rejected(&fx, r#"{ "width": 640 }"#);
    rejected(&fx, r#"{ "width": 0, "height": 10 }"#);
}

#[test]
fn unknown_catalog_ids_are_rejected() {
    let fx = Fixture::new();
    assert!(rejected(&fx, r#"{ "layout": "nope" }"#).contains("unknown layout 'nope'"));
    assert!(rejected(&fx, r#"{ "preset": "myspace" }"#).contains("unknown preset"));
    assert!(
        rejected(&fx, r#"{ "background": { "gradient_id": "rainbow" } }"#)
            .contains("unknown gradient")
    );
    assert!(
        rejected(&fx, r#"{ "background": { "type": "video" } }"#)
            .contains("unknown background type")
    );
    assert!(
        rejected(&fx, r#"{ "background": { "image_fit": "stretch" } }"#).contains("image_fit")
    );
}

#[test]
fn malformed_colors_are_rejected() {
    let fx = Fixture::new();
    rejected(&fx, r##"{ "texts": [ { "id": "t", "content": "x", "color": "#12" } ] }"##);
    rejected(&fx, r##"{ "overlays": [ { "id": "o", "fill": "#gggggg" } ] }"##);
    rejected(&fx, r#"{ "background": { "solid_color": "red" } }"#);
}

#[test]
fn text_limits_and_duplicate_ids() {
    let fx = Fixture::new();
    let long = "a".repeat(MAX_TEXT_CHARS + 1);
    let msg = rejected(
        &fx,
        &format!(r#"{{ "texts": [ {{ "id": "title", "content": "{long}" }} ] }}"#),
    );
    assert!(msg.contains("max"), "{msg}");

    let exact = "é".repeat(MAX_TEXT_CHARS);
    fx.check(&format!(
        r#"{{ "texts": [ {{ "id": "title", "content": "{exact}" }} ] }}"#
    ))
    .unwrap();

    let msg = rejected(
        &fx,
        r#"{ "texts": [ { "id": "a", "content": "x" } ], "overlays": [ { "id": "a" } ] }"#,
    );
    assert!(msg.contains("duplicate content id 'a'"), "{msg}");
    rejected(&fx, r#"{ "texts": [ { "id": "", "content": "x" } ] }"#);
    rejected(
        &fx,
        r#"{ "texts": [ { "id": "t", "content": "x", "font_size": "0px" } ] }"#,
    );
}

#[test]
fn numeric_ranges_are_enforced() {
    let fx = Fixture::new();
    rejected(&fx, r#"{ "images": [ { "id": "i", "opacity": 1.5 } ] }"#);
    rejected(&fx, r#"{ "images": [ { "id": "i", "scale": 0.5 } ] }"#);
    rejected(&fx, r#"{ "overlays": [ { "id": "o", "opacity": -0.1 } ] }"#);
    rejected(&fx, r#"{ "background": { "image_scale": 5000 } }"#);
    rejected(&fx, r#"{ "format": "jpeg", "quality": 0 }"#);
    rejected(&fx, r#"{ "format": "webp" }"#);

    let v = fx
        .check(r#"{ "images": [ { "id": "i", "opacity": 0, "scale": 1000 } ] }"#)
        .unwrap();
    assert_eq!(v.content.image("i").unwrap().opacity, 0.0);
}

#[test]
fn unknown_fields_are_a_parse_error() {
    let err = RenderRequest::from_json_str(r#"{ "layuot": "classic" }"#).unwrap_err();
    assert!(err.is_client_error());
    assert!(err.to_string().contains("parse request JSON"));
}

#[test]
fn hex_shorthand_expands() {
    assert_eq!(expand_hex_color("#abc").unwrap(), "#aabbcc");
    assert_eq!(expand_hex_color("abcd").unwrap(), "#aabbccdd");
    assert_eq!(expand_hex_color(" #A1B2C3 ").unwrap(), "#A1B2C3");
    assert!(expand_hex_color("#abcde").is_err());
    assert!(expand_hex_color("#ab-").is_err());
    assert_eq!(parse_color("#f00").unwrap(), Color::rgb(255, 0, 0));
}
