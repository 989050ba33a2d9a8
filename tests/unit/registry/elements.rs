use super::*;
use crate::element::{Drawable, ElementKind};
use crate::text::FontBook;
use crate::value::{ParamMap, ParamValue};

fn values(entries: &[(&str, ParamValue)]) -> ParamMap {
    entries
        .iter()
        .map(|(k, v)| ((*k).to_owned(), v.clone()))
        .collect()
}

fn build(kind: &str, map: &ParamMap, fonts: &FontBook) -> PosterResult<Element> {
    let ctx = BuildContext {
        element: "e1",
        fonts,
        assets_root: None,
    };
    ElementFactory::with_builtins().create(kind, &Params::new(map, "values"), &ctx)
}

#[test]
fn builtins_are_registered() {
    let f = ElementFactory::with_builtins();
    assert_eq!(
        f.registered_types(),
        vec!["circle", "ellipse", "image", "rectangle", "text"]
    );
    assert!(f.is_registered("text"));
    assert!(!f.is_registered("triangle"));
}

#[test]
fn unknown_type_names_element_and_type() {
    let err = build("triangle", &ParamMap::new(), &FontBook::new()).unwrap_err();
    match err {
        PosterError::UnknownElementType { element, kind, registered } => {
            assert_eq!(element, "e1");
            assert_eq!(kind, "triangle");
            assert!(registered.contains("rectangle"));
        }
        other => panic!("unexpected error {other}"),
    }
}

#[test]
fn rectangle_reads_size_and_colors() {
    let map = values(&[
        ("width", ParamValue::Number(30.0)),
        ("height", ParamValue::Str("20".into())),
        ("fill", ParamValue::Color(Rgba8::rgb(1, 2, 3))),
        ("border_radius", ParamValue::Number(4.0)),
    ]);
    let e = build("rectangle", &map, &FontBook::new()).unwrap();
    assert_eq!(e.kind(), ElementKind::Rectangle);
    assert_eq!(e.size(), (30, 20));
    let r = e.as_rectangle().unwrap();
    assert_eq!(r.style.fill, Some(Rgba8::rgb(1, 2, 3)));
    assert_eq!(r.style.outline_width, 1.0);
    assert_eq!(r.border_radius, 4.0);
}

#[test]
fn circle_is_a_square_ellipse() {
    let map = values(&[
        ("radius", ParamValue::Number(15.0)),
        ("background", ParamValue::Color(Rgba8::WHITE)),
    ]);
    let e = build("circle", &map, &FontBook::new()).unwrap();
    assert_eq!(e.kind(), ElementKind::Ellipse);
    assert_eq!(e.size(), (30, 30));
    assert_eq!(e.as_ellipse().unwrap().style.fill, Some(Rgba8::WHITE));
}

#[test]
fn unknown_value_keys_are_rejected() {
    let map = values(&[("colour", ParamValue::Str("red".into()))]);
    let err = build("ellipse", &map, &FontBook::new()).unwrap_err();
    assert!(err.to_string().contains("values.colour"));
}

#[test]
fn image_without_path_is_not_ready() {
    let e = build("image", &ParamMap::new(), &FontBook::new()).unwrap();
    assert!(!e.is_ready());
}

#[test]
fn text_uses_default_font_and_style_defaults() {
    let mut fonts = FontBook::new();
    fonts
        .register_file(
            "DejaVu Sans",
            std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data/fonts/DejaVuSans.ttf"),
            &[],
        )
        .unwrap();
    let map = values(&[("text", ParamValue::Str("Hello".into()))]);
    let e = build("text", &map, &fonts).unwrap();
    let t = e.as_text().unwrap();
    assert!(e.is_ready());
    assert_eq!(t.style().font_family, "DejaVu Sans");
    assert_eq!(t.style().font_size, 20.0);
    assert_eq!(t.style().fill, Rgba8::BLACK);
    let (w, h) = e.size();
    assert!(w > 0 && h > 0);
}

#[test]
fn text_rejects_unknown_alignment() {
    let map = values(&[
        ("text", ParamValue::Str("x".into())),
        ("text_alignment", ParamValue::Str("justify".into())),
    ]);
    assert!(build("text", &map, &FontBook::new()).is_err());
}
