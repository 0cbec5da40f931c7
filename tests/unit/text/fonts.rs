use super::*;
use serde_json::json;

#[test]
fn weight_keywords_and_numbers() {
    assert_eq!(FontWeight::parse("bold").unwrap(), FontWeight::BOLD);
    assert_eq!(FontWeight::parse(" Black ").unwrap(), FontWeight(900));
    assert_eq!(FontWeight::parse("600").unwrap(), FontWeight(600));
    assert!(FontWeight::parse("heavier").is_err());
    assert!(FontWeight::parse("0").is_err());

    let w: FontWeight = serde_json::from_value(json!(800)).unwrap();
    assert_eq!(w, FontWeight(800));
    let w: FontWeight = serde_json::from_value(json!("semibold")).unwrap();
    assert_eq!(w, FontWeight(600));
    assert!(serde_json::from_value::<FontWeight>(json!(5000)).is_err());
}

#[test]
fn family_keys_map_to_stacks() {
    assert!(resolve_font_family("sans").ends_with("sans-serif"));
    assert!(resolve_font_family("serif").ends_with(", serif"));
    assert!(resolve_font_family("MONO").ends_with("monospace"));
    assert_eq!(resolve_font_family("Bebas Neue"), "Bebas Neue, sans-serif");
}

#[test]
fn font_dir_listing_filters_extensions() {
    let tmp = std::env::temp_dir().join(format!(
        "thumbkit_font_dir_test_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    std::fs::create_dir_all(&tmp).unwrap();
    std::fs::write(tmp.join("b.TTF"), b"x").unwrap();
    std::fs::write(tmp.join("a.otf"), b"x").unwrap();
    std::fs::write(tmp.join("readme.txt"), b"x").unwrap();

    let files = font_files_in_dir(&tmp).unwrap();
    let names: Vec<_> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["a.otf".to_string(), "b.TTF".to_string()]);

    assert!(font_files_in_dir(&tmp.join("missing")).is_err());
    std::fs::remove_dir_all(&tmp).ok();
}
