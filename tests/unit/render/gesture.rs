use super::*;
use crate::edit::controller::OverlayController;
use crate::edit::input::FontSizeInputPolicy;
use crate::edit::overlay::OverlayDefaults;
use crate::render::metrics::ApproxMetrics;
use crate::foundation::core::Rect;
use crate::render::scene::{ComposeInput, SceneStyle, compose};

/// "Click to edit" at 50px: 390x50 at (50, 50) under `ApproxMetrics`.
fn scene(selected: bool) -> Scene {
    scene_with(
        OverlayDefaults {
            content: "Click to edit".to_owned(),
            ..OverlayDefaults::default()
        },
        selected,
    )
}

fn scene_with(defaults: OverlayDefaults, selected: bool) -> Scene {
    let mut c = OverlayController::new(defaults, FontSizeInputPolicy::Reject);
    if selected {
        c.activate();
        c.blur();
    }
    compose(
        &SceneStyle::default(),
        ComposeInput {
            overlay: c.overlay(),
            selected: c.is_selected(),
            background: None,
            preview: GesturePreview::None,
        },
        &mut ApproxMetrics,
    )
}

#[test]
fn press_and_release_in_place_is_an_activation() {
    let s = scene(false);
    let mut t = GestureTracker::new(0.0, 30.0);
    let p = s.text.as_ref().unwrap().bounds().center();
    assert_eq!(t.pointer_down(&s, p), Some(HitTarget::Text));
    assert!(t.is_active());
    assert_eq!(t.pointer_up(p), Some(GestureReport::Activated));
    assert!(!t.is_active());
}

#[test]
fn press_outside_the_node_starts_nothing() {
    let s = scene(false);
    let mut t = GestureTracker::new(0.0, 30.0);
    assert_eq!(t.pointer_down(&s, Point::new(1000.0, 1000.0)), None);
    t.pointer_move(Point::new(10.0, 10.0));
    assert_eq!(t.pointer_up(Point::new(10.0, 10.0)), None);
}

#[test]
fn drag_reports_origin_plus_pointer_delta() {
    let s = scene(false);
    let mut t = GestureTracker::new(0.0, 30.0);
    let start = Point::new(60.0, 60.0);
    t.pointer_down(&s, start);
    t.pointer_move(Point::new(80.0, 90.0));
    assert_eq!(
        t.preview(),
        GesturePreview::Drag {
            offset: Vec2::new(20.0, 30.0)
        }
    );
    let report = t.pointer_up(Point::new(110.0, 210.0));
    assert_eq!(
        report,
        Some(GestureReport::DragEnded {
            position: Point::new(100.0, 200.0)
        })
    );
    assert_eq!(t.preview(), GesturePreview::None);
}

#[test]
fn small_moves_below_drag_distance_still_click() {
    let s = scene(false);
    let mut t = GestureTracker::new(3.0, 30.0);
    t.pointer_down(&s, Point::new(60.0, 60.0));
    t.pointer_move(Point::new(61.0, 61.0));
    assert_eq!(t.preview(), GesturePreview::None);
    assert_eq!(t.pointer_up(Point::new(61.0, 60.0)), Some(GestureReport::Activated));
}

#[test]
fn right_anchor_resize_scales_width_and_keeps_origin() {
    let s = scene(true);
    let node = s.text.clone().unwrap();
    let b = node.bounds();
    let mut t = GestureTracker::new(0.0, 30.0);
    let grab = Point::new(b.x1, b.center().y);
    assert_eq!(t.pointer_down(&s, grab), Some(HitTarget::Anchor(Anchor::Right)));

    let target_width = node.size.width * 1.5;
    let report = t.pointer_up(Point::new(b.x0 + target_width, grab.y)).unwrap();
    let GestureReport::ResizeEnded { scale_x, position } = report else {
        panic!("expected resize, got {report:?}");
    };
    assert!((scale_x - 1.5).abs() < 1e-9);
    assert_eq!(position, node.origin);
}

#[test]
fn left_anchor_resize_keeps_the_right_edge_fixed() {
    let s = scene(true);
    let node = s.text.clone().unwrap();
    let b = node.bounds();
    let mut t = GestureTracker::new(0.0, 30.0);
    t.pointer_down(&s, Point::new(b.x0, b.center().y));
    t.pointer_move(Point::new(b.x0 + 100.0, b.center().y));
    let GesturePreview::Resize { scale_x, origin } = t.preview() else {
        panic!("expected resize preview");
    };
    assert!((origin.x - (b.x0 + 100.0)).abs() < 1e-9);
    assert!((origin.x + node.size.width * scale_x - b.x1).abs() < 1e-9);
}

#[test]
fn resize_never_goes_below_min_width() {
    // 2 chars at 50px measure 60 wide, so a 30px floor maps to 25px text.
    let s = scene_with(
        OverlayDefaults {
            content: "ab".to_owned(),
            ..OverlayDefaults::default()
        },
        true,
    );
    let node = s.text.clone().unwrap();
    let b = node.bounds();
    let mut t = GestureTracker::new(0.0, 30.0);
    t.pointer_down(&s, Point::new(b.x1, b.center().y));
    let Some(GestureReport::ResizeEnded { scale_x, .. }) = t.pointer_up(Point::new(-500.0, 0.0))
    else {
        panic!("expected resize");
    };
    assert!((node.size.width * scale_x - 30.0).abs() < 1e-9);
}

#[test]
fn resize_stops_at_the_smallest_font_size() {
    let s = scene(true);
    let node = s.text.clone().unwrap();
    let b = node.bounds();
    let mut t = GestureTracker::new(0.0, 30.0);
    t.pointer_down(&s, Point::new(b.x1, b.center().y));
    t.pointer_move(Point::new(-500.0, 0.0));
    let GesturePreview::Resize { scale_x, .. } = t.preview() else {
        panic!("expected resize preview");
    };
    // 50px text cannot shrink below 10px.
    assert!((scale_x - 0.2).abs() < 1e-9);
}

fn left_resize_to(x: f64) -> (f64, Point, Rect) {
    let s = scene(true);
    let node = s.text.clone().unwrap();
    let b = node.bounds();
    let mut t = GestureTracker::new(0.0, 30.0);
    assert_eq!(
        t.pointer_down(&s, Point::new(b.x0, b.center().y)),
        Some(HitTarget::Anchor(Anchor::Left))
    );
    t.pointer_move(Point::new(x, b.center().y));
    let GesturePreview::Resize { scale_x, origin } = t.preview() else {
        panic!("expected resize preview");
    };
    assert!((origin.x + node.size.width * scale_x - b.x1).abs() < 1e-9);
    let Some(GestureReport::ResizeEnded { scale_x, position }) =
        t.pointer_up(Point::new(x, b.center().y))
    else {
        panic!("expected resize");
    };
    (scale_x, position, b)
}

#[test]
fn left_resize_clamped_at_the_font_floor_keeps_the_right_edge() {
    let (scale_x, position, b) = left_resize_to(430.0);
    assert!((scale_x - 0.2).abs() < 1e-9);
    assert!((position.x - 362.0).abs() < 1e-9);
    assert!((position.x + b.width() * scale_x - b.x1).abs() < 1e-9);
}

#[test]
fn left_resize_clamped_at_the_font_ceiling_keeps_the_right_edge() {
    let (scale_x, position, b) = left_resize_to(-560.0);
    assert!((scale_x - 2.0).abs() < 1e-9);
    assert!((position.x + 340.0).abs() < 1e-9);
    assert!((position.x + b.width() * scale_x - b.x1).abs() < 1e-9);
}

#[test]
fn released_scale_snaps_to_a_whole_font_size() {
    let s = scene(true);
    let node = s.text.clone().unwrap();
    let b = node.bounds();
    let mut t = GestureTracker::new(0.0, 30.0);
    t.pointer_down(&s, Point::new(b.x0, b.center().y));
    let Some(GestureReport::ResizeEnded { scale_x, position }) =
        t.pointer_up(Point::new(b.x0 + 100.0, b.center().y))
    else {
        panic!("expected resize");
    };
    let px = 50.0 * scale_x;
    assert!((px - px.round()).abs() < 1e-9);
    assert!((position.x + node.size.width * scale_x - b.x1).abs() < 1e-9);
}

#[test]
fn cancel_drops_the_gesture_silently() {
    let s = scene(false);
    let mut t = GestureTracker::new(0.0, 30.0);
    t.pointer_down(&s, Point::new(60.0, 60.0));
    t.pointer_move(Point::new(70.0, 60.0));
    t.cancel();
    assert!(!t.is_active());
    assert_eq!(t.pointer_up(Point::new(90.0, 60.0)), None);
}
