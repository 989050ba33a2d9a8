use super::*;
use serde_json::json;

#[test]
fn parses_hex_forms() {
    assert_eq!(parse_color(&json!("#ff0000")).unwrap(), Rgba8::rgb(255, 0, 0));
    assert_eq!(parse_color(&json!("00ff00")).unwrap(), Rgba8::rgb(0, 255, 0));
    assert_eq!(parse_color(&json!("#fff")).unwrap(), Rgba8::WHITE);
    assert_eq!(
        parse_color(&json!("#0000ff80")).unwrap(),
        Rgba8::rgba(0, 0, 255, 128)
    );
}

#[test]
fn parses_lists_with_default_alpha() {
    assert_eq!(
        parse_color(&json!([10, 20, 30])).unwrap(),
        Rgba8::rgba(10, 20, 30, 255)
    );
    assert_eq!(
        parse_color(&json!([10, 20, 30, 40])).unwrap(),
        Rgba8::rgba(10, 20, 30, 40)
    );
}

#[test]
fn parses_short_and_long_maps() {
    assert_eq!(
        parse_color(&json!({"r": 1, "g": 2, "b": 3})).unwrap(),
        Rgba8::rgba(1, 2, 3, 255)
    );
    assert_eq!(
        parse_color(&json!({"red": 1, "green": 2, "blue": 3, "alpha": 4})).unwrap(),
        Rgba8::rgba(1, 2, 3, 4)
    );
}

#[test]
fn rejects_malformed_literals() {
    assert!(parse_color(&json!("#12345")).is_err());
    assert!(parse_color(&json!("#gggggg")).is_err());
    assert!(parse_color(&json!([1, 2])).is_err());
    assert!(parse_color(&json!([1, 2, 300])).is_err());
    assert!(parse_color(&json!({"r": 1, "g": 2})).is_err());
    assert!(parse_color(&json!(true)).is_err());
}
