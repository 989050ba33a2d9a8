use super::*;
use crate::text::fonts::FontBook;

fn dejavu() -> Arc<FontFace> {
    let mut book = FontBook::new();
    book.register_file(
        "DejaVu Sans",
        std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data/fonts/DejaVuSans.ttf"),
        &[],
    )
    .unwrap();
    book.resolve("DejaVu Sans").unwrap()
}

#[test]
fn measure_grows_with_text_and_size() {
    let face = dejavu();
    let mut engine = TextLayoutEngine::new();
    let (w1, h1) = engine.measure("Hi", &face, 20.0).unwrap();
    let (w2, _) = engine.measure("Hi there", &face, 20.0).unwrap();
    let (w3, h3) = engine.measure("Hi", &face, 40.0).unwrap();
    assert!(w1 > 0.0 && h1 > 0.0);
    assert!(w2 > w1);
    assert!(w3 > w1 && h3 > h1);
}

#[test]
fn empty_line_has_height_but_no_width() {
    let face = dejavu();
    let mut engine = TextLayoutEngine::new();
    let (w, h) = engine.measure("", &face, 20.0).unwrap();
    assert_eq!(w, 0.0);
    assert!(h > 0.0);
}

#[test]
fn rejects_non_positive_sizes() {
    let face = dejavu();
    let mut engine = TextLayoutEngine::new();
    assert!(engine.layout_line("x", &face, 0.0, Rgba8::BLACK).is_err());
}

#[test]
fn block_wraps_to_max_width() {
    let face = dejavu();
    let mut engine = TextLayoutEngine::new();
    let one = engine
        .layout_block("alpha beta gamma", &face, 20.0, WrapStyle::Word, None)
        .unwrap();
    assert_eq!(one.lines.len(), 1);

    let (alpha_w, _) = engine.measure("alpha beta", &face, 20.0).unwrap();
    let wrapped = engine
        .layout_block("alpha beta gamma", &face, 20.0, WrapStyle::Word, Some(alpha_w + 1.0))
        .unwrap();
    assert_eq!(wrapped.joined(), "alpha beta\ngamma");
    assert!(wrapped.width <= alpha_w + 1.0);
    assert!(wrapped.height > one.height);
}

#[test]
fn draw_block_paints_glyph_pixels() {
    let face = dejavu();
    let mut engine = TextLayoutEngine::new();
    let block = engine
        .layout_block("HH", &face, 32.0, WrapStyle::None, None)
        .unwrap();
    let img = engine
        .draw_block(&block, &face, 32.0, Rgba8::rgb(255, 0, 0), TextAlign::Left)
        .unwrap();
    assert_eq!((img.width(), img.height()), block.pixel_size());
    assert!(img.pixels().any(|p| p.0[3] == 255 && p.0[0] == 255));
    assert!(img.pixels().any(|p| p.0[3] == 0));
}
