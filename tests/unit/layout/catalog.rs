use super::*;
use crate::layout::model::LayoutElement;
use crate::layout::units::VerticalPosition;

fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "thumbkit_catalog_{name}_{}_{}.json",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

#[test]
fn builtin_catalog_loads_and_validates() {
    let catalog = LayoutCatalog::builtin().unwrap();
    assert_eq!(catalog.default_id(), "classic");
    let ids: Vec<_> = catalog.iter().map(|l| l.id.as_str()).collect();
    assert_eq!(
        ids,
        vec!["classic", "centered", "split", "bold-banner", "minimal"]
    );
    assert!(!catalog.is_empty());
}

#[test]
fn unknown_id_falls_back_to_default() {
    let catalog = LayoutCatalog::builtin().unwrap();
    assert_eq!(catalog.get_or_default("nope").id, "classic");
    assert_eq!(catalog.get_or_default("split").id, "split");
    assert!(catalog.get("nope").is_none());
    assert!(catalog.contains("minimal"));
}

#[test]
fn builtin_subtitles_flow_below_titles() {
    let catalog = LayoutCatalog::builtin().unwrap();
    let classic = catalog.get("classic").unwrap();
    let LayoutElement::Text(sub) = classic.element("subtitle").unwrap() else {
        panic!("subtitle should be text");
    };
    assert_eq!(sub.position.y, VerticalPosition::Auto);
}

#[test]
fn catalog_requires_known_default() {
    let err = LayoutCatalog::from_json_str(r#"{"default": "x", "layouts": []}"#).unwrap_err();
    assert!(err.to_string().contains("default layout 'x'"));

    let err = LayoutCatalog::from_json_str(r#"{"layouts": []}"#).unwrap_err();
    assert!(err.to_string().contains("must name a default"));

    assert!(LayoutCatalog::from_json_str("not json").unwrap_err().is_client_error());
}

#[test]
fn catalog_rejects_duplicate_layout_ids() {
    let json = r#"{
        "default": "a",
        "layouts": [
            {"id": "a", "name": "A", "elements": []},
            {"id": "a", "name": "A again", "elements": []}
        ]
    }"#;
    let err = LayoutCatalog::from_json_str(json).unwrap_err();
    assert!(err.to_string().contains("duplicate layout id 'a'"));
}

#[test]
fn with_file_merges_and_replaces() {
    let path = temp_path("merge");
    std::fs::write(
        &path,
        r#"{
            "layouts": [
                {"id": "minimal", "name": "Minimal v2", "elements": []},
                {"id": "custom", "name": "Custom", "elements": []}
            ]
        }"#,
    )
    .unwrap();

    let catalog = LayoutCatalog::builtin().unwrap().with_file(&path).unwrap();
    assert_eq!(catalog.len(), 6);
    assert_eq!(catalog.get("minimal").unwrap().name, "Minimal v2");
    assert!(catalog.contains("custom"));
    assert_eq!(catalog.default_id(), "classic");

    std::fs::remove_file(&path).ok();
}

#[test]
fn from_path_reports_missing_file() {
    let err = LayoutCatalog::from_path(temp_path("missing")).unwrap_err();
    assert!(err.to_string().contains("open layout catalog"));
}
