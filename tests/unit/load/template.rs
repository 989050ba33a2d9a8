use super::*;
use crate::foundation::core::{Point, Rgba8};
use serde_json::json;

fn vars() -> Variables {
    let mut v = Variables::new();
    v.insert("title".into(), json!("Hello"));
    v.insert("count".into(), json!(999));
    v.insert("accent".into(), json!("#ff0000"));
    v.insert("spot".into(), json!([10, 20]));
    v
}

#[test]
fn whole_placeholder_keeps_the_bound_type() {
    assert_eq!(substitute_str("--${count}--", &vars(), "p").unwrap(), json!(999));
    assert_eq!(substitute_str("--${spot}--", &vars(), "p").unwrap(), json!([10, 20]));
}

#[test]
fn embedded_placeholders_are_interpolated() {
    let v = substitute_str("Say --${title}-- x--${count}--!", &vars(), "p").unwrap();
    assert_eq!(v, json!("Say Hello x999!"));
}

#[test]
fn malformed_placeholders_stay_literal() {
    for s in ["--${}--", "--${title", "--${title}-", "plain"] {
        assert_eq!(substitute_str(s, &vars(), "p").unwrap(), json!(s));
    }
}

#[test]
fn unbound_variables_name_the_field_path() {
    let err = substitute(&json!({"a": ["x", "--${nope}--"]}), &vars(), "values").unwrap_err();
    match err {
        PosterError::UndefinedVariable { name, path } => {
            assert_eq!(name, "nope");
            assert_eq!(path, "values.a.1");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn color_and_point_keys_are_normalized() {
    let doc = json!({
        "fill": "--${accent}--",
        "outline": null,
        "position": "--${spot}--",
        "offset": {"y": "50%"},
        "nested": {"color": [0, 0, 255]},
        "items": ["#00ff00", "--${title}--"],
        "text": "--${count}--"
    });
    let m = normalize_map(&doc, &vars(), "values").unwrap();
    assert_eq!(m["fill"], ParamValue::Color(Rgba8::rgb(255, 0, 0)));
    assert_eq!(m["outline"], ParamValue::Null);
    assert_eq!(m["position"], ParamValue::Point(Point::new(10.0, 20.0)));
    assert_eq!(m["offset"], ParamValue::Point(Point::new(0.0, 0.5)));
    let ParamValue::Map(nested) = &m["nested"] else {
        panic!("nested should stay a map");
    };
    assert_eq!(nested["color"], ParamValue::Color(Rgba8::rgb(0, 0, 255)));
    assert_eq!(
        m["items"],
        ParamValue::List(vec![
            ParamValue::Str("#00ff00".into()),
            ParamValue::Str("Hello".into())
        ])
    );
    assert_eq!(m["text"], ParamValue::Number(999.0));
}

#[test]
fn invalid_colors_and_points_carry_paths() {
    let err = normalize_map(&json!({"fill": "#12"}), &vars(), "v").unwrap_err();
    assert!(matches!(err, PosterError::InvalidColor { ref path, .. } if path == "v.fill"));

    let err = normalize_map(&json!({"anchor": true}), &vars(), "v").unwrap_err();
    assert!(matches!(err, PosterError::InvalidPoint { ref path, .. } if path == "v.anchor"));
}

#[test]
fn normalize_map_rejects_non_maps() {
    assert!(normalize_map(&json!(null), &vars(), "v").unwrap().is_empty());
    assert!(normalize_map(&json!([1]), &vars(), "v").is_err());
    assert!(normalize_map(&json!("--${title}--"), &vars(), "v").is_err());
}

#[test]
fn bound_values_are_not_expanded_twice() {
    let mut v = vars();
    v.insert("literal".into(), json!("--${b}--"));
    let doc = json!({"params": {"inner": {"label": "--${literal}--"}}});
    let m = normalize_map(&doc, &v, "op").unwrap();
    let ParamValue::Map(params) = &m["params"] else {
        panic!("map expected");
    };
    let ParamValue::Map(inner) = &params["inner"] else {
        panic!("map expected");
    };
    assert_eq!(inner["label"].as_str(), Some("--${b}--"));

    let top = normalize(Some("label"), &json!("--${literal}--"), &v, "op.label").unwrap();
    assert_eq!(top.as_str(), Some("--${b}--"));
}
