use super::*;
use crate::element::{ImageElement, RectangleElement, ShapeStyle};
use crate::foundation::core::Rgba8;
use crate::text::FontBook;
use crate::value::ParamValue;

fn spec(name: &str, entries: &[(&str, ParamValue)]) -> OperationSpec {
    OperationSpec::new(
        name,
        entries
            .iter()
            .map(|(k, v)| ((*k).to_owned(), v.clone()))
            .collect(),
    )
}

fn run(element: &mut Element, op: &OperationSpec) -> PosterResult<bool> {
    let fonts = FontBook::new();
    let ctx = OperationContext {
        element: "el",
        fonts: &fonts,
        assets_root: None,
    };
    OperationRegistry::with_builtins().apply(element, op, &ctx)
}

fn red_image() -> Element {
    ImageElement::from_rgba(RgbaImage::from_pixel(2, 2, image::Rgba([255, 0, 0, 200]))).into()
}

#[test]
fn hsv_round_trips_primary_colors() {
    for (r, g, b) in [(255, 0, 0), (0, 255, 0), (0, 0, 255), (12, 200, 99), (128, 128, 128)] {
        let (h, s, v) = rgb_to_hsv(r, g, b);
        assert_eq!(hsv_to_rgb(h, s, v), (r, g, b));
    }
}

#[test]
fn hue_shift_rotates_and_keeps_alpha() {
    let mut e = red_image();
    assert!(run(&mut e, &spec("apply_hue_shift", &[("degrees", ParamValue::Number(120.0))])).unwrap());
    let px = e.as_image().unwrap().pixels().get_pixel(0, 0).0;
    assert_eq!(px, [0, 255, 0, 200]);
}

#[test]
fn set_hue_from_hex_replaces_hue_only() {
    let mut e = red_image();
    let op = spec("set_hue_from_hex", &[("hex_color", ParamValue::Str("#0000ff".into()))]);
    assert!(run(&mut e, &op).unwrap());
    let px = e.as_image().unwrap().pixels().get_pixel(1, 1).0;
    assert_eq!(px, [0, 0, 255, 200]);
}

#[test]
fn unregistered_or_unsupported_operations_are_skipped() {
    let mut rect: Element = RectangleElement::new(4, 4, ShapeStyle::default()).into();
    assert!(!run(&mut rect, &spec("sparkle", &[])).unwrap());
    assert!(!run(&mut rect, &spec("apply_hue_shift", &[("degrees", ParamValue::Number(1.0))])).unwrap());
}

#[test]
fn malformed_parameters_are_fatal() {
    let mut e = red_image();
    let err = run(
        &mut e,
        &spec("apply_hue_shift", &[("degrees", ParamValue::Str("lots".into()))]),
    )
    .unwrap_err();
    assert!(err.to_string().contains("operations.apply_hue_shift.degrees"));
    assert!(run(&mut e, &spec("apply_hue_shift", &[])).is_err());
}

#[test]
fn translate_and_fill_apply_to_shapes() {
    let mut rect: Element = RectangleElement::new(4, 4, ShapeStyle::default()).into();
    run(
        &mut rect,
        &spec(
            "translate",
            &[("dx", ParamValue::Number(5.0)), ("dy", ParamValue::Number(-2.4))],
        ),
    )
    .unwrap();
    run(
        &mut rect,
        &spec("set_fill", &[("color", ParamValue::Color(Rgba8::rgb(9, 8, 7)))]),
    )
    .unwrap();
    assert_eq!(rect.position(), (5, -2));
    assert_eq!(rect.as_rectangle().unwrap().style.fill, Some(Rgba8::rgb(9, 8, 7)));
}

#[test]
fn resize_operation_changes_image_size() {
    let mut e = red_image();
    run(&mut e, &spec("resize", &[("width", ParamValue::Number(4.0))])).unwrap();
    assert_eq!(e.size(), (4, 4));
}

#[test]
fn support_table_is_queryable() {
    let r = OperationRegistry::with_builtins();
    assert!(r.supports("set_fill", ElementKind::Ellipse));
    assert!(!r.supports("set_fill", ElementKind::Image));
    assert!(r.get("translate").is_some());
    assert!(r.registered_names().contains(&"set_hue_from_hex"));
}
