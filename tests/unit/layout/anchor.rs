use super::*;

#[test]
fn parses_all_nine_forms() {
    let cases = [
        ("top-left", HAnchor::Left, VAnchor::Top),
        ("top-center", HAnchor::Center, VAnchor::Top),
        ("top-right", HAnchor::Right, VAnchor::Top),
        ("center-left", HAnchor::Left, VAnchor::Center),
        ("center", HAnchor::Center, VAnchor::Center),
        ("center-right", HAnchor::Right, VAnchor::Center),
        ("bottom-left", HAnchor::Left, VAnchor::Bottom),
        ("bottom-center", HAnchor::Center, VAnchor::Bottom),
        ("bottom-right", HAnchor::Right, VAnchor::Bottom),
    ];
    for (s, h, v) in cases {
        let a: Anchor = s.parse().unwrap();
        assert_eq!(a, Anchor::new(h, v), "{s}");
        assert_eq!(a.to_string(), s);
    }
}

#[test]
fn token_order_does_not_matter() {
    assert_eq!("left-top".parse::<Anchor>().unwrap(), Anchor::TOP_LEFT);
    assert_eq!("right-bottom".parse::<Anchor>().unwrap(), Anchor::BOTTOM_RIGHT);
    assert_eq!(
        "left-center".parse::<Anchor>().unwrap(),
        Anchor::new(HAnchor::Left, VAnchor::Center)
    );
}

#[test]
fn rejects_unknown_tokens() {
    assert!("upper-left".parse::<Anchor>().is_err());
    assert!(serde_json::from_str::<Anchor>("\"top-middle-ish\"").is_err());
}

#[test]
fn center_subtracts_half_size() {
    let size = Size::new(200.0, 80.0);
    let p = Anchor::CENTER.apply(Point::new(500.0, 300.0), size);
    assert_eq!(p, Point::new(400.0, 260.0));
}

#[test]
fn bottom_right_subtracts_full_size() {
    let size = Size::new(120.0, 60.0);
    let p = Anchor::BOTTOM_RIGHT.apply(Point::new(1000.0, 700.0), size);
    assert_eq!(p, Point::new(880.0, 640.0));
}

#[test]
fn top_left_is_identity() {
    let p = Anchor::default().apply(Point::new(12.0, 34.0), Size::new(999.0, 999.0));
    assert_eq!(p, Point::new(12.0, 34.0));
}

#[test]
fn single_axis_center_only_shifts_that_axis() {
    let size = Size::new(100.0, 40.0);
    let top_center: Anchor = "top-center".parse().unwrap();
    assert_eq!(top_center.offset(size), (-50.0, 0.0));
    let center_left: Anchor = "center-left".parse().unwrap();
    assert_eq!(center_left.offset(size), (0.0, -20.0));
}
