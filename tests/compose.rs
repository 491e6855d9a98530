use image::{ImageFormat, Rgba, RgbaImage};
use photo_annotator::draw::{BLACK, BLUE, ComposeError, CompositionEngine, FontDescriptor, RED};
use photo_annotator::editor::{CanvasSize, EditorDocument, InkLayer, Offset, StrokeCanvas};
use std::io::Cursor;

fn png(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
    let mut bytes = Vec::new();
    RgbaImage::from_pixel(width, height, Rgba(color))
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

fn document(width: u32, height: u32) -> EditorDocument {
    let mut doc = EditorDocument::new();
    assert!(doc.set_base_image(png(width, height, [0, 0, 0, 255])));
    doc
}

fn commit(doc: &mut EditorDocument, text: &str, color: photo_annotator::draw::Color, at: Offset) {
    let index = doc.add_overlay();
    doc.set_text(index, text).unwrap();
    doc.set_color(index, color).unwrap();
    doc.commit_text(index).unwrap();
    doc.begin_drag(index).unwrap();
    doc.update_drag_position(index, at).unwrap();
    doc.commit_drag_position(index).unwrap();
}

fn blank_ink(doc: &EditorDocument) -> RgbaImage {
    let size = doc.effective_canvas_size().unwrap();
    RgbaImage::new(size.width, size.height)
}

fn decode(bytes: &[u8]) -> RgbaImage {
    image::load_from_memory(bytes).unwrap().to_rgba8()
}

#[test]
fn flatten_is_idempotent() {
    let mut doc = document(120, 80);
    commit(&mut doc, "Hello", RED, Offset::new(10.0, 10.0));
    let engine = CompositionEngine::default();
    let ink = blank_ink(&doc);

    let first = engine.flatten(&doc, &ink).unwrap();
    let second = engine.flatten(&doc, &ink).unwrap();
    assert_eq!(first, second);
}

#[test]
fn drafts_never_reach_the_output() {
    let mut doc = document(120, 80);
    commit(&mut doc, "Kept", RED, Offset::new(5.0, 5.0));
    let engine = CompositionEngine::default();
    let ink = blank_ink(&doc);
    let without_draft = engine.flatten(&doc, &ink).unwrap();

    let draft = doc.add_overlay();
    doc.set_text(draft, "DRAFT").unwrap();
    doc.update_drag_position(draft, Offset::new(40.0, 40.0)).unwrap();
    let with_draft = engine.flatten(&doc, &ink).unwrap();

    assert_eq!(without_draft, with_draft);
}

#[test]
fn empty_committed_overlay_draws_nothing() {
    let doc = document(60, 40);
    let engine = CompositionEngine::default();
    let ink = blank_ink(&doc);
    let plain = engine.flatten(&doc, &ink).unwrap();

    let mut with_empty = doc.clone();
    let index = with_empty.add_overlay();
    with_empty.commit_text(index).unwrap();
    let overlay = with_empty.overlay(index).unwrap();
    assert_eq!(overlay.text, "");
    assert!(overlay.is_committed());

    assert_eq!(engine.flatten(&with_empty, &ink).unwrap(), plain);
}

#[test]
fn later_overlay_covers_earlier_one() {
    let mut doc = document(200, 80);
    commit(&mut doc, "MMMM", RED, Offset::new(10.0, 10.0));
    commit(&mut doc, "MMMM", BLUE, Offset::new(10.0, 10.0));

    let engine = CompositionEngine::new(FontDescriptor::new("Sans", 30.0), BLACK);
    let output = decode(&engine.flatten(&doc, &blank_ink(&doc)).unwrap());

    let mut saw_blue = false;
    for pixel in output.pixels() {
        let [r, _, b, _] = pixel.0;
        assert!(r <= b.saturating_add(2), "red shows through: {:?}", pixel.0);
        saw_blue |= b > 200;
    }
    assert!(saw_blue, "blue overlay was not drawn");
}

#[test]
fn ink_is_layered_over_photo() {
    let doc = document(50, 50);
    let mut ink = StrokeCanvas::new(RED, 6.0);
    ink.set_first_responder(true);
    assert!(ink.begin_stroke(5, 25));
    ink.extend_stroke(45, 25);
    ink.end_stroke();

    let size = doc.effective_canvas_size().unwrap();
    let raster = ink.snapshot(size).unwrap();
    let output = decode(&CompositionEngine::default().flatten(&doc, &raster).unwrap());

    assert_eq!(output.get_pixel(25, 25).0, [255, 0, 0, 255]);
    assert_eq!(output.get_pixel(25, 5).0, [0, 0, 0, 255]);
}

#[test]
fn photo_is_aspect_fit_with_letterbox() {
    let mut doc = EditorDocument::new();
    assert!(doc.set_base_image(png(40, 20, [0, 255, 0, 255])));
    assert!(doc.set_canvas_size(CanvasSize::new(40, 40)));
    let ink = blank_ink(&doc);

    let boxed = decode(
        &CompositionEngine::new(FontDescriptor::default(), BLACK)
            .flatten(&doc, &ink)
            .unwrap(),
    );
    assert_eq!((boxed.width(), boxed.height()), (40, 40));
    assert_eq!(boxed.get_pixel(20, 2).0, [0, 0, 0, 255]);
    assert_eq!(boxed.get_pixel(20, 20).0, [0, 255, 0, 255]);
    assert_eq!(boxed.get_pixel(20, 37).0, [0, 0, 0, 255]);

    let clear = decode(&CompositionEngine::default().flatten(&doc, &ink).unwrap());
    assert_eq!(clear.get_pixel(20, 2).0[3], 0);
    assert_eq!(clear.get_pixel(20, 20).0, [0, 255, 0, 255]);
}

#[test]
fn flatten_without_photo_fails() {
    let doc = EditorDocument::new();
    let err = CompositionEngine::default()
        .flatten(&doc, &RgbaImage::new(1, 1))
        .unwrap_err();
    assert!(matches!(err, ComposeError::NoBaseImage));
}

#[test]
fn mismatched_ink_is_rejected() {
    let doc = document(20, 10);
    let err = CompositionEngine::default()
        .flatten(&doc, &RgbaImage::new(5, 5))
        .unwrap_err();
    assert!(matches!(
        err,
        ComposeError::InkSizeMismatch {
            expected_width: 20,
            expected_height: 10,
            ..
        }
    ));
}
