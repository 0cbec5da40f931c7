use super::*;
use serde_json::json;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn percent_scales_reference() {
    for (p, d) in [(10.0, 1000.0), (33.5, 1280.0), (0.0, 720.0), (150.0, 64.0)] {
        let s = format!("{p}%");
        assert!(close(resolve_length_str(&s, d), d * p / 100.0), "{s} of {d}");
    }
}

#[test]
fn px_ignores_reference() {
    for d in [0.0, 100.0, 1920.0] {
        assert!(close(resolve_length_str("48px", d), 48.0));
        assert!(close(resolve_length_str("-12.5px", d), -12.5));
    }
}

#[test]
fn numbers_pass_through() {
    let l: Length = serde_json::from_value(json!(120)).unwrap();
    assert_eq!(l, Length::Px(120.0));
    assert!(close(l.resolve(9999.0), 120.0));
}

#[test]
fn rem_uses_fixed_root_size() {
    assert!(close(resolve_length_str("3rem", 1000.0), 48.0));
    assert!(close(resolve_length_str("0.5rem", 10.0), 8.0));
}

#[test]
fn best_effort_parse_takes_numeric_prefix() {
    assert!(close(resolve_length_str("42", 1000.0), 42.0));
    assert!(close(resolve_length_str("  7.25 ", 1000.0), 7.25));
    assert!(close(resolve_length_str("12abc", 1000.0), 12.0));
    assert!(close(resolve_length_str("1e2", 1000.0), 100.0));
    assert!(close(resolve_length_str("3e", 1000.0), 3.0));
    assert!(close(resolve_length_str(".5", 1000.0), 0.5));
}

#[test]
fn malformed_resolves_to_zero() {
    for s in ["", "abc", "px", "%", "--1", ".", "auto", "NaN", "1e999"] {
        assert_eq!(resolve_length_str(s, 500.0), 0.0, "input {s:?}");
    }
}

#[test]
fn vertical_position_recognizes_auto() {
    let v: VerticalPosition = serde_json::from_value(json!("auto")).unwrap();
    assert!(v.is_auto());
    let v: VerticalPosition = serde_json::from_value(json!(" AUTO ")).unwrap();
    assert!(v.is_auto());
    let v: VerticalPosition = serde_json::from_value(json!("10%")).unwrap();
    assert_eq!(v, VerticalPosition::At(Length::Percent(10.0)));
    let v: VerticalPosition = serde_json::from_value(json!(5)).unwrap();
    assert_eq!(v, VerticalPosition::At(Length::Px(5.0)));
}

#[test]
fn serialization_keeps_units() {
    assert_eq!(serde_json::to_value(Length::Percent(5.0)).unwrap(), json!("5%"));
    assert_eq!(serde_json::to_value(Length::Rem(2.0)).unwrap(), json!("2rem"));
    assert_eq!(serde_json::to_value(Length::Px(3.0)).unwrap(), json!(3.0));
    assert_eq!(
        serde_json::to_value(VerticalPosition::Auto).unwrap(),
        json!("auto")
    );
}
