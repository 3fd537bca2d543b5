//! End-to-end editing flows across the store, controller, templates and
//! generated content.

use folio_core::{
    builtin_brochure_template, builtin_template, BrochureContent, Element, ElementKind, ElementStore, GenerationTracker, Generated,
    InputEvent, MemoryStorage, PaperSize, Point, PointerPhase, PosterContent, Rect, ShapeKind,
    Size, StudyDetails, StudySession, TransformController, ViewState, Viewport,
};
use tracing_subscriber::EnvFilter;

/// Route store and controller logs to the test output; `RUST_LOG=debug` shows commits.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn view_at(zoom: f32) -> ViewState {
    ViewState {
        viewport: Viewport::with_zoom(zoom),
        ..ViewState::default()
    }
}

fn click(
    controller: &mut TransformController,
    store: &mut ElementStore,
    view: &ViewState,
    x: f32,
    y: f32,
) {
    controller.handle(store, view, &InputEvent::pointer(PointerPhase::Down, x, y));
    controller.handle(store, view, &InputEvent::pointer(PointerPhase::Up, x, y));
}

// ============================================================================
// Store scenarios
// ============================================================================

#[test]
fn test_add_add_duplicate_yields_three_elements() {
    let mut store = ElementStore::default();
    let first = store.add_element(Element::text("Title", Point::new(10.0, 10.0)));
    store.add_element(Element::image(
        "logo.png",
        Point::new(50.0, 50.0),
        Size::new(200.0, 100.0),
    ));

    let copy = store.duplicate_element(first).expect("duplicate");

    assert_eq!(store.elements().len(), 3);
    assert_ne!(copy, first);
    let copied = store.get(copy).expect("copy exists");
    assert_ne!(copied.position, Point::new(10.0, 10.0));
    assert_eq!(copied.position, Point::new(30.0, 30.0));
}

#[test]
fn test_delete_selected_clears_selection() {
    let mut store = ElementStore::default();
    let a = store.add_element(Element::text("A", Point::new(0.0, 0.0)));
    let b = store.add_element(Element::text("B", Point::new(0.0, 200.0)));
    store.select(Some(b));

    store.delete_element(a);
    assert_eq!(store.selected_id(), Some(b));

    store.delete_element(b);
    assert_eq!(store.selected_id(), None);
}

// ============================================================================
// Controller scenarios
// ============================================================================

#[test]
fn test_click_on_overlap_selects_topmost() {
    let mut store = ElementStore::default();
    let a = store.add_element(Element::shape(
        ShapeKind::Rect,
        "#ff0000",
        Rect::new(0.0, 0.0, 200.0, 200.0),
    ));
    let b = store.add_element(Element::shape(
        ShapeKind::Ellipse,
        "#00ff00",
        Rect::new(50.0, 50.0, 200.0, 200.0),
    ));
    // A paints above B.
    store.bring_to_front(a);
    assert!(store.get(a).expect("a").z_index > store.get(b).expect("b").z_index);

    let mut controller = TransformController::default();
    let view = view_at(0.5);
    // Canvas (100, 100) is inside both.
    click(&mut controller, &mut store, &view, 50.0, 50.0);
    assert_eq!(store.selected_id(), Some(a));
}

#[test]
fn test_drag_commit_rounds_to_grid() {
    let mut store = ElementStore::default();
    let id = store.add_element(Element::shape(
        ShapeKind::Rect,
        "#000000",
        Rect::new(0.0, 0.0, 100.0, 100.0),
    ));
    let mut controller = TransformController::default();
    let view = view_at(1.0);
    let grid = view.grid.size;

    controller.handle(&mut store, &view, &InputEvent::pointer(PointerPhase::Down, 10.0, 10.0));
    controller.handle(&mut store, &view, &InputEvent::pointer(PointerPhase::Move, 40.0, 45.0));
    controller.handle(&mut store, &view, &InputEvent::pointer(PointerPhase::Up, 57.0, 39.0));

    // Raw position (47, 29).
    let expected = Point::new((47.0 / grid).round() * grid, (29.0 / grid).round() * grid);
    assert_eq!(store.get(id).map(|e| e.position), Some(expected));
}

#[test]
fn test_drag_without_snap_keeps_raw_position() {
    let mut store = ElementStore::default();
    let id = store.add_element(Element::text("Free", Point::new(0.0, 0.0)));
    let mut controller = TransformController::default();
    let mut view = view_at(1.0);
    view.set_snap(false);

    controller.handle(&mut store, &view, &InputEvent::pointer(PointerPhase::Down, 5.0, 5.0));
    controller.handle(&mut store, &view, &InputEvent::pointer(PointerPhase::Up, 18.0, 9.0));
    assert_eq!(store.get(id).map(|e| e.position), Some(Point::new(13.0, 4.0)));
}

#[test]
fn test_resize_never_stores_non_positive_size() {
    let mut store = ElementStore::default();
    let id = store.add_element(Element::shape(
        ShapeKind::Rect,
        "#000000",
        Rect::new(100.0, 100.0, 40.0, 40.0),
    ));
    store.select(Some(id));
    let mut controller = TransformController::default();
    let view = view_at(1.0);

    // Bottom-right handle dragged up and left past the origin.
    controller.handle(&mut store, &view, &InputEvent::pointer(PointerPhase::Down, 140.0, 140.0));
    controller.handle(&mut store, &view, &InputEvent::pointer(PointerPhase::Up, 20.0, 20.0));

    let size = store.get(id).and_then(|e| e.size).expect("size");
    assert_eq!(size, Size::new(5.0, 5.0));
    assert_eq!(store.get(id).map(|e| e.position), Some(Point::new(100.0, 100.0)));
}

// ============================================================================
// Templates, study session and generated content
// ============================================================================

#[test]
fn test_apply_template_is_one_undoable_snapshot() {
    init_tracing();
    let mut session = StudySession::open(MemoryStorage::default());
    session
        .set(StudyDetails::new().with("title", "ASPIRE-2"))
        .expect("set study");

    let mut store = ElementStore::default();
    store.add_element(Element::text("Scratch", Point::new(0.0, 0.0)));
    let before = store.document().clone();
    let len = store.history_len();

    let template = builtin_template("medical-professional").expect("template");
    store
        .apply_template(&template, PaperSize::Letter.pixels(), &session.get_or_default())
        .expect("apply");

    assert_eq!(store.history_len(), len + 1);
    assert!(store.elements().iter().any(|e| matches!(
        &e.kind,
        ElementKind::Text { content, .. } if content == "ASPIRE-2"
    )));
    let sidebar = store
        .elements()
        .iter()
        .find(|e| e.locked)
        .map(|e| e.id)
        .expect("sidebar");
    assert!(!store.delete_element(sidebar));

    store.undo();
    assert_eq!(store.document(), &before);
}

#[test]
fn test_stale_generation_is_not_applied() {
    init_tracing();
    let study = StudyDetails::new().with("title", "ASPIRE-2");
    let page = PaperSize::Letter.pixels();
    let mut store = ElementStore::default();
    let mut tracker = GenerationTracker::new();

    let first = tracker.begin();
    let second = tracker.begin();

    let slow = PosterContent::from_response(
        r#"{"title":"Old","keyPoints":["one"]}"#,
        &study,
    );
    assert!(tracker.complete(first, slow).is_none());

    let fresh = PosterContent::from_response("not json at all", &study);
    let accepted = tracker.complete(second, fresh).expect("latest accepted");
    assert!(matches!(accepted, Generated::Fallback(_)));

    let elements = accepted.into_value().expect("content").to_elements(page);
    store.replace_elements(elements);
    assert!(store.elements().iter().any(|e| matches!(
        &e.kind,
        ElementKind::Text { content, .. } if content == "ASPIRE-2"
    )));
    assert!(store.undo());
    assert!(store.elements().is_empty());
}

#[test]
fn test_brochure_template_then_generated_copy() {
    init_tracing();
    let study = StudyDetails::new()
        .with("title", "BREATHE-3")
        .with("keyPoints", vec!["Adults 18-70"]);
    let template = builtin_brochure_template("trifold-clinical").expect("template");
    let page = template.paper().pixels();
    let mut store = ElementStore::default();

    store
        .apply_brochure_template(&template, page, &study)
        .expect("apply");
    let templated = store.document().clone();
    assert!(store.elements().iter().any(|e| matches!(
        &e.kind,
        ElementKind::Text { content, .. } if content == "BREATHE-3"
    )));

    let generated = BrochureContent::from_response("```json\n{\"panels\": {}}\n```", &study);
    assert!(generated.is_fallback());
    let elements = generated.into_value().expect("content").to_elements(page);
    store.replace_elements(elements);
    assert!(store
        .elements()
        .iter()
        .all(|e| e.bounds().right() <= page.width + 1e-3));

    assert!(store.undo());
    assert_eq!(store.document(), &templated);
    assert!(store.undo());
    assert!(store.elements().is_empty());
}
