use super::*;
use crate::element::{RectangleElement, ShapeStyle};

fn rect(w: u32, h: u32) -> Element {
    RectangleElement::new(
        w,
        h,
        ShapeStyle {
            fill: Some(Rgba8::BLACK),
            ..ShapeStyle::default()
        },
    )
    .into()
}

fn small() -> Canvas {
    Canvas::new(CanvasSettings {
        width: 100,
        height: 80,
        background: Rgba8::WHITE,
    })
}

fn sample() -> Canvas {
    let mut c = small();
    c.add_element("title", rect(10, 10), "foreground", ["text"]).unwrap();
    c.add_element("photo", rect(10, 10), "background", ["media"]).unwrap();
    c.add_element("caption", rect(10, 10), "foreground", ["text", "media"])
        .unwrap();
    c
}

fn ids(found: Vec<(&str, &Element)>) -> Vec<String> {
    found.into_iter().map(|(id, _)| id.to_owned()).collect()
}

#[test]
fn duplicate_ids_are_rejected_and_leave_registry_unchanged() {
    let mut c = sample();
    let err = c
        .add_element("title", rect(1, 1), "other", ["x"])
        .unwrap_err();
    assert!(matches!(err, PosterError::DuplicateIdentifier(ref id) if id == "title"));
    assert_eq!(c.len(), 3);
    assert!(c.layer("other").is_none());
    assert!(c.group("x").is_none());
}

#[test]
fn add_element_creates_layers_and_groups() {
    let c = sample();
    let names: Vec<&str> = c.layers().iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, vec!["foreground", "background"]);
    assert_eq!(c.layer("foreground").unwrap().elements, vec!["title", "caption"]);
    assert_eq!(c.group("media").unwrap().len(), 2);
}

#[test]
fn add_layer_updates_settings_in_place() {
    let mut c = sample();
    c.add_layer("foreground", LayerSettings::with_opacity(0.25));
    assert_eq!(c.layers()[0].name, "foreground");
    assert_eq!(c.layers()[0].settings.opacity, 0.25);
    assert_eq!(c.layers()[0].elements.len(), 2);
}

#[test]
fn remove_elements_cleans_every_index() {
    let mut c = sample();
    c.attach_position("caption", PositionSpec::absolute(1.0, 1.0))
        .unwrap();
    c.remove_elements(["caption", "missing"]);
    assert!(!c.contains("caption"));
    assert_eq!(c.layer("foreground").unwrap().elements, vec!["title"]);
    assert!(!c.group("text").unwrap().contains("caption"));
    assert!(!c.group("media").unwrap().contains("caption"));
    assert!(c.pending_position("caption").is_none());
    assert_eq!(c.element_ids().collect::<Vec<_>>(), vec!["title", "photo"]);
}

#[test]
fn clear_layer_and_group_remove_members_and_record() {
    let mut c = sample();
    c.clear_group("media");
    assert!(c.group("media").is_none());
    assert_eq!(c.element_ids().collect::<Vec<_>>(), vec!["title"]);
    c.clear_layer("foreground");
    assert!(c.layer("foreground").is_none());
    assert!(c.is_empty());
    c.clear_layer("nope");
    c.clear_group("nope");
}

#[test]
fn query_any_unions_and_all_intersects() {
    let c = sample();
    let any = ElementQuery::all().groups(["text"]).layers(["background"]);
    assert_eq!(ids(c.get_elements(&any)), vec!["title", "photo", "caption"]);

    let all = ElementQuery::all()
        .groups(["text"])
        .layers(["foreground"])
        .require_all(true);
    assert_eq!(ids(c.get_elements(&all)), vec!["title", "caption"]);

    let narrow = ElementQuery::all()
        .identifiers(["caption", "photo"])
        .groups(["text"])
        .require_all(true);
    assert_eq!(ids(c.get_elements(&narrow)), vec!["caption"]);
}

#[test]
fn unfiltered_query_returns_everything_in_insertion_order() {
    let c = sample();
    assert_eq!(
        ids(c.get_elements(&ElementQuery::all())),
        vec!["title", "photo", "caption"]
    );
    let first = c.first_element(&ElementQuery::all().groups(["media"]));
    assert_eq!(first.map(|(id, _)| id), Some("photo"));
    assert!(c.get_elements(&ElementQuery::all().groups(["unknown"])).is_empty());
}

#[test]
fn attach_position_requires_a_registered_element() {
    let mut c = small();
    assert!(c.attach_position("ghost", PositionSpec::default()).is_err());
}

#[test]
fn crop_drops_outside_elements_and_shifts_the_rest() {
    let mut c = small();
    c.add_element("inside", rect(10, 10), "l", Vec::<String>::new())
        .unwrap();
    c.add_element("outside", rect(10, 10), "l", Vec::<String>::new())
        .unwrap();
    c.get_element_mut("inside").unwrap().set_position(30, 30);
    c.get_element_mut("outside").unwrap().set_position(80, 0);
    c.set_anchor("mark", Point::new(40.0, 50.0));

    c.crop(20, 20, 60, 60).unwrap();

    assert_eq!((c.width(), c.height()), (40, 40));
    assert!(!c.contains("outside"));
    assert_eq!(c.get_element("inside").unwrap().position(), (10, 10));
    assert_eq!(c.anchor("mark"), Some(Point::new(20.0, 30.0)));
    assert_eq!(c.backing().width(), 40);
}

#[test]
fn crop_rejects_boxes_outside_the_canvas() {
    let mut c = small();
    assert!(c.crop(0, 0, 101, 10).is_err());
    assert!(c.crop(10, 10, 10, 20).is_err());
    assert_eq!(c.width(), 100);
}

#[test]
fn crop_matches_the_region_of_the_full_render() {
    let mut c = small();
    c.add_element("a", rect(30, 20), "l", ["g"]).unwrap();
    c.get_element_mut("a").unwrap().set_position(25, 15);
    let full = c.render().unwrap();
    let expected = full.cropped(10, 10, 50, 40).unwrap();

    c.crop(10, 10, 50, 40).unwrap();
    assert_eq!(c.render().unwrap(), expected);
}

#[test]
fn render_is_repeatable_and_clear_resets() {
    let mut c = sample();
    let a = c.render().unwrap();
    let b = c.render().unwrap();
    assert_eq!(a, b);
    c.clear();
    assert!(c.is_empty());
    assert!(c.layers().is_empty());
    assert_eq!(c.render().unwrap(), Surface::new(100, 80, Rgba8::WHITE));
}
