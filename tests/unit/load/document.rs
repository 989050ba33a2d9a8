use super::*;
use serde_json::json;

fn no_vars() -> Variables {
    Variables::new()
}

#[test]
fn schema_gate_accepts_missing_string_and_numeric_versions() {
    assert!(check_schema(&json!({})).is_ok());
    assert!(check_schema(&json!({"schema": "1.0"})).is_ok());
    assert!(check_schema(&json!({"schema": 1.0})).is_ok());

    let err = check_schema(&json!({"schema": "2.0"})).unwrap_err();
    assert!(matches!(err, PosterError::UnsupportedSchema { ref found, .. } if found == "2.0"));
}

#[test]
fn settings_fall_back_to_defaults() {
    let spec = parse_spec(&json!({}), &no_vars()).unwrap();
    assert_eq!(spec.settings.width, 1080);
    assert_eq!(spec.settings.height, 1350);
    assert_eq!(spec.settings.background, Rgba8::WHITE);
    assert!(spec.layers.is_empty());
}

#[test]
fn unknown_settings_keys_are_rejected() {
    let err = parse_spec(&json!({"settings": {"widht": 10}}), &no_vars()).unwrap_err();
    assert!(err.to_string().contains("settings.widht"));
}

#[test]
fn layers_and_elements_keep_document_order() {
    let doc = json!({
        "layers": {
            "back": {"settings": {"opacity": 4}, "elements": {
                "z": {"type": "rectangle"},
                "a": {"type": "rectangle", "groups": ["g1", "g2"]}
            }},
            "front": {}
        }
    });
    let spec = parse_spec(&doc, &no_vars()).unwrap();
    let names: Vec<&str> = spec.layers.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, vec!["back", "front"]);
    assert_eq!(spec.layers[0].settings.opacity, 1.0);
    let ids: Vec<&str> = spec.layers[0].elements.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["z", "a"]);
    assert_eq!(spec.layers[0].elements[1].groups, vec!["g1", "g2"]);
    assert_eq!(spec.layers[0].elements[1].path, "layers.back.elements.a");
    assert_eq!(spec.layers[0].elements[0].position, PositionSpec::default());
}

#[test]
fn operations_carry_their_document_path() {
    let doc = json!({"layers": {"l": {"elements": {"e": {
        "type": "image",
        "operations": {"resize": {"width": 10}, "apply_hue_shift": {"degrees": 90}}
    }}}}});
    let spec = parse_spec(&doc, &no_vars()).unwrap();
    let ops = &spec.layers[0].elements[0].operations;
    assert_eq!(ops[0].name, "resize");
    assert_eq!(ops[1].name, "apply_hue_shift");
    assert_eq!(ops[1].path, "layers.l.elements.e.operations.apply_hue_shift");
}

#[test]
fn rel_position_sources_are_parsed() {
    let mut vars = no_vars();
    vars.insert("where".into(), json!("logo"));
    let doc = json!({"layers": {"l": {"elements": {
        "a": {"type": "rectangle", "rel_position": {"source": "anchor", "value": "top", "offset": [5, 6]}},
        "b": {"type": "rectangle", "rel_position": {"source": "element", "id": "--${where}--"}},
        "c": {"type": "rectangle", "rel_position": {"source": "alignment", "value": {"x_align": "center"}, "parent": "b"}},
        "d": {"type": "rectangle", "position": "3,4"}
    }}}});
    let spec = parse_spec(&doc, &vars).unwrap();
    let pos: Vec<&PositionSpec> = spec.layers[0].elements.iter().map(|e| &e.position).collect();
    assert_eq!(*pos[0], PositionSpec::anchor("top", Vec2::new(5.0, 6.0)));
    assert_eq!(*pos[1], PositionSpec::element("logo", Vec2::ZERO));
    assert_eq!(
        *pos[2],
        PositionSpec::Alignment {
            align: crate::value::PartialPoint { x: Some(0.5), y: None },
            parent: Some("b".into()),
            offset: Vec2::ZERO,
        }
    );
    assert_eq!(*pos[3], PositionSpec::absolute(3.0, 4.0));
}

#[test]
fn alignment_values_must_be_point_like() {
    let doc = json!({"layers": {"l": {"elements": {
        "a": {"type": "rectangle", "rel_position": {"source": "alignment", "value": 0.5}}
    }}}});
    let err = parse_spec(&doc, &no_vars()).unwrap_err();
    assert!(matches!(
        err,
        PosterError::InvalidAlignment { ref path, .. }
            if path == "layers.l.elements.a.rel_position.value"
    ));
}

#[test]
fn unsupported_sources_and_fields_are_rejected() {
    let bad_source = json!({"layers": {"l": {"elements": {
        "a": {"type": "rectangle", "rel_position": {"source": "grid", "value": "x"}}
    }}}});
    assert!(parse_spec(&bad_source, &no_vars()).is_err());

    let bad_field = json!({"layers": {"l": {"elements": {"a": {"type": "text", "colour": 1}}}}});
    let err = parse_spec(&bad_field, &no_vars()).unwrap_err();
    assert!(err.to_string().contains("layers.l.elements.a.colour"));

    let missing_type = json!({"layers": {"l": {"elements": {"a": {"values": {}}}}}});
    assert!(parse_spec(&missing_type, &no_vars()).is_err());
}

#[test]
fn anchors_accept_every_point_form() {
    let doc = json!({"anchors": {"a": {"x": 1}, "b": [2, 3], "c": "4,5"}});
    let spec = parse_spec(&doc, &no_vars()).unwrap();
    assert_eq!(
        spec.anchors,
        vec![
            ("a".to_owned(), Point::new(1.0, 0.0)),
            ("b".to_owned(), Point::new(2.0, 3.0)),
            ("c".to_owned(), Point::new(4.0, 5.0)),
        ]
    );
}
