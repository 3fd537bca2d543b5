//! Integration tests for layout export (folio-renderer).
//!
//! Exports run at a small raster scale so full-size pages stay fast.

#![cfg(feature = "export")]

use folio_core::{
    builtin_template, DocumentState, Element, ElementStore, PaperSize, Point, Rect, ShapeKind,
    Size, StudyDetails,
};
use folio_renderer::{
    save_raw, DocumentKind, ExportConfig, ExportFormat, ExportOutcome, LayoutExporter,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const SCALE: f32 = 0.1;

fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}

fn fast_exporter() -> LayoutExporter {
    init_tracing();
    LayoutExporter::new(ExportConfig {
        raster_scale: SCALE,
        ..ExportConfig::default()
    })
    .expect("exporter")
}

/// Red square under a blue square that was brought to the front.
fn overlapping_squares() -> ElementStore {
    let mut store = ElementStore::default();
    let blue = store.add_element(Element::shape(
        ShapeKind::Rect,
        "#0000ff",
        Rect::new(1000.0, 1000.0, 1000.0, 1000.0),
    ));
    store.add_element(Element::shape(
        ShapeKind::Rect,
        "#ff0000",
        Rect::new(500.0, 500.0, 1000.0, 1000.0),
    ));
    store.bring_to_front(blue);
    store
}

fn pixel_at(png: &[u8], canvas_x: f32, canvas_y: f32) -> [u8; 4] {
    let img = image::load_from_memory(png).expect("decode png").to_rgba8();
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let (x, y) = ((canvas_x * SCALE) as u32, (canvas_y * SCALE) as u32);
    img.get_pixel(x, y).0
}

// ==========================================================================
// Raster output
// ==========================================================================

#[test]
fn test_png_preserves_positions_and_z_order() {
    let store = overlapping_squares();
    let exporter = fast_exporter();
    let png = exporter
        .export(store.document(), PaperSize::Letter.pixels(), ExportFormat::Png)
        .expect("png");

    assert_eq!(&png[0..4], &[137, 80, 78, 71]);
    let img = image::load_from_memory(&png).expect("decode").to_rgba8();
    assert_eq!(img.dimensions(), (255, 330));

    // Overlap paints blue because blue is on top.
    assert_eq!(pixel_at(&png, 1200.0, 1200.0), [0, 0, 255, 255]);
    assert_eq!(pixel_at(&png, 700.0, 700.0), [255, 0, 0, 255]);
    // Page background.
    assert_eq!(pixel_at(&png, 100.0, 100.0), [255, 255, 255, 255]);
}

#[test]
fn test_selection_overlay_not_exported() {
    let mut store = ElementStore::default();
    let id = store.add_element(Element::shape(
        ShapeKind::Rect,
        "#ff0000",
        Rect::new(500.0, 500.0, 500.0, 500.0),
    ));
    store.select(Some(id));

    let exporter = fast_exporter();
    let svg = exporter.render_to_svg(store.document(), PaperSize::Letter.pixels());
    assert!(!svg.contains(folio_renderer::surface::SELECTION_COLOR));
}

#[test]
fn test_jpeg_export_produces_valid_bytes() {
    let store = overlapping_squares();
    let jpeg = fast_exporter()
        .export(store.document(), PaperSize::Letter.pixels(), ExportFormat::Jpeg)
        .expect("jpeg");
    assert_eq!(jpeg[0], 0xFF);
    assert_eq!(jpeg[1], 0xD8);
}

#[test]
fn test_template_thumbnail_data_uri() {
    let template = builtin_template("clinical-modern").expect("template");
    let page = PaperSize::Letter.pixels();
    let study = StudyDetails::new().with("title", "ASPIRE-2");
    let elements = template.instantiate(page, &study).expect("instantiate");
    let document = DocumentState::from_elements(elements).expect("document");

    let uri = fast_exporter()
        .png_data_uri(&document, page)
        .expect("data uri");
    assert!(uri.starts_with("data:image/png;base64,"));
    assert!(uri.len() > 100);
}

// ==========================================================================
// PDF output
// ==========================================================================

#[test]
fn test_pdf_export_produces_valid_bytes() {
    let store = overlapping_squares();
    let exporter = fast_exporter();
    let outcome = exporter.try_export(
        store.document(),
        DocumentKind::Poster,
        &PaperSize::Letter,
        ExportFormat::Pdf,
    );

    match outcome {
        ExportOutcome::Exported { file_name, bytes } => {
            assert_eq!(file_name, "poster-letter.pdf");
            assert_eq!(&bytes[0..5], b"%PDF-");
        }
        ExportOutcome::Failed(note) => panic!("export failed: {note:?}"),
    }
}

#[test]
fn test_brochure_pdf_name() {
    let exporter = fast_exporter();
    let outcome = exporter.try_export(
        &DocumentState::default(),
        DocumentKind::Brochure,
        &PaperSize::TriFold,
        ExportFormat::Pdf,
    );
    assert!(
        matches!(outcome, ExportOutcome::Exported { ref file_name, .. } if file_name == "brochure-trifold.pdf")
    );
}

// ==========================================================================
// Failure handling and raw save
// ==========================================================================

#[test]
fn test_failed_export_notifies_and_keeps_document() {
    init_tracing();
    let mut store = ElementStore::default();
    store.add_element(Element::text("Keep me", Point::new(10.0, 10.0)));
    let before = store.document().clone();
    let history = store.history_len();

    // Far beyond the raster limit at full scale.
    let huge = PaperSize::Custom {
        width: 40_000.0,
        height: 40_000.0,
    };
    let exporter = LayoutExporter::with_defaults().expect("exporter");
    let outcome = exporter.try_export(store.document(), DocumentKind::Poster, &huge, ExportFormat::Png);

    match outcome {
        ExportOutcome::Failed(note) => assert_eq!(note.title, "Export failed"),
        ExportOutcome::Exported { .. } => panic!("expected failure"),
    }
    assert_eq!(store.document(), &before);
    assert_eq!(store.history_len(), history);
    assert!(store.can_undo());
}

#[test]
fn test_raw_save_then_svg_agree() {
    let store = overlapping_squares();
    let mut saved = Vec::new();
    save_raw(store.document(), |elements| saved.extend_from_slice(elements));
    assert_eq!(saved.len(), 2);

    let restored = DocumentState::from_elements(saved).expect("document");
    let exporter = fast_exporter();
    let page = Size::new(2550.0, 3300.0);
    assert_eq!(
        exporter.render_to_svg(&restored, page),
        exporter.render_to_svg(store.document(), page)
    );
}
