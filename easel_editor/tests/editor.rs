// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end flows through the editor facade.

use easel_editor::{Editor, EditorError};
use easel_scene::{ObjectKind, ShapeKind};
use kurbo::{Point, Size};

const EPS: f64 = 1e-9;

fn editor_with_background() -> Editor {
    let mut editor = Editor::new(Size::new(400.0, 400.0));
    let ticket = editor.begin_load_background("img://photo");
    editor
        .complete_load_background(ticket, Size::new(1000.0, 500.0))
        .unwrap();
    editor
}

/// Natural-space position of the object at z-order `index`.
fn natural_position(editor: &Editor, index: usize) -> Point {
    let placement = editor.scene().background().unwrap().placement;
    placement.to_natural(editor.scene().objects()[index].position)
}

#[test]
fn load_aspect_fits_the_background() {
    let editor = editor_with_background();
    let background = editor.scene().background().unwrap();
    assert!((background.placement.scale - 0.4).abs() < EPS);
    assert!((background.placement.offset.x - 0.0).abs() < EPS);
    assert!((background.placement.offset.y - 100.0).abs() < EPS);
}

#[test]
fn stale_load_completion_is_discarded() {
    let mut editor = Editor::new(Size::new(400.0, 400.0));
    let first = editor.begin_load_background("img://slow");
    let second = editor.begin_load_background("img://fast");

    editor
        .complete_load_background(second, Size::new(800.0, 800.0))
        .unwrap();
    assert_eq!(
        editor.scene().background().unwrap().source_url,
        "img://fast"
    );

    // The slow load finishes late; its result must not clobber the scene.
    let applied = editor
        .complete_load_background(first, Size::new(1000.0, 500.0))
        .unwrap();
    assert!(!applied);
    assert_eq!(
        editor.scene().background().unwrap().source_url,
        "img://fast"
    );
}

#[test]
fn failed_load_keeps_the_previous_scene() {
    let mut editor = editor_with_background();
    editor.add_shape(ShapeKind::Rectangle, "#000000", None);

    let ticket = editor.begin_load_background("img://broken");
    let result = editor.fail_load_background(ticket);
    assert!(matches!(
        result,
        Err(EditorError::BackgroundLoadFailed { ref source_url }) if source_url == "img://broken"
    ));
    assert_eq!(
        editor.scene().background().unwrap().source_url,
        "img://photo"
    );
    assert_eq!(editor.scene().len(), 1);

    // A failure for an already superseded request is not worth reporting.
    let stale = editor.begin_load_background("img://a");
    let _ = editor.begin_load_background("img://b");
    assert!(editor.fail_load_background(stale).is_ok());
}

#[test]
fn degenerate_load_size_is_rejected_and_retryable() {
    let mut editor = editor_with_background();
    let ticket = editor.begin_load_background("img://broken");
    assert!(editor
        .complete_load_background(ticket, Size::new(0.0, 100.0))
        .is_err());
    assert_eq!(
        editor.scene().background().unwrap().source_url,
        "img://photo"
    );
}

#[test]
fn added_objects_become_the_sole_selection() {
    let mut editor = editor_with_background();
    let a = editor
        .add_shape(ShapeKind::Rectangle, "#000000", Some("#ff0000".into()))
        .unwrap();
    let b = editor.add_text("#0000ff", "note").unwrap();
    assert_eq!(editor.scene().selection().items(), &[b]);
    assert_eq!(editor.scene().z_order(a), Some(0));
    assert_eq!(editor.scene().z_order(b), Some(1));
}

#[test]
fn stroke_color_applies_to_selection_and_brush() {
    let mut editor = editor_with_background();
    editor.add_shape(ShapeKind::Line, "#000000", None);
    editor.set_stroke_color("#ff8800");

    assert_eq!(editor.scene().objects()[0].stroke_color, "#ff8800");
    assert_eq!(editor.brush_color(), "#ff8800");

    // With nothing selected the brush still updates.
    let mut empty = Editor::new(Size::new(100.0, 100.0));
    empty.set_stroke_color("#112233");
    assert_eq!(empty.brush_color(), "#112233");
}

#[test]
fn reorder_commands_act_on_the_selection() {
    let mut editor = editor_with_background();
    let a = editor.add_shape(ShapeKind::Rectangle, "#000000", None).unwrap();
    let _b = editor.add_shape(ShapeKind::Circle, "#000000", None).unwrap();
    let _c = editor.add_shape(ShapeKind::Triangle, "#000000", None).unwrap();

    editor.select(&[a]);
    editor.bring_to_front();
    assert_eq!(editor.scene().z_order(a), Some(2));

    editor.send_to_back();
    assert_eq!(editor.scene().z_order(a), Some(0));
}

#[test]
fn group_collapses_the_selection() {
    let mut editor = editor_with_background();
    let a = editor.add_shape(ShapeKind::Rectangle, "#000000", None).unwrap();
    let b = editor.add_shape(ShapeKind::Circle, "#000000", None).unwrap();
    editor.select(&[a, b]);

    let group = editor.group().unwrap();
    assert_eq!(editor.scene().len(), 1);
    assert_eq!(editor.scene().selection().items(), &[group]);

    // Grouping a single object is refused before any undo stash happens.
    let c = editor.add_shape(ShapeKind::Line, "#000000", None).unwrap();
    editor.select(&[c]);
    assert!(editor.group().is_none());
}

#[test]
fn delete_then_undo_restores_the_object() {
    let mut editor = editor_with_background();
    editor.add_shape(ShapeKind::Rectangle, "#ff0000", Some("#00ff00".into()));
    editor.delete_selection();
    assert!(editor.scene().is_empty());

    assert!(editor.undo().unwrap());
    assert_eq!(editor.scene().len(), 1);
    let obj = &editor.scene().objects()[0];
    assert_eq!(obj.stroke_color, "#ff0000");
    assert_eq!(obj.fill_color.as_deref(), Some("#00ff00"));

    // Single-step undo toggles: the next undo re-deletes.
    assert!(editor.undo().unwrap());
    assert!(editor.scene().is_empty());
}

#[test]
fn undo_with_empty_slot_reports_false() {
    let mut editor = Editor::new(Size::new(400.0, 400.0));
    assert!(!editor.undo().unwrap());
}

#[test]
fn crop_commit_keeps_objects_anchored_to_the_image() {
    let mut editor = editor_with_background();
    let id = editor.add_shape(ShapeKind::Cross, "#000000", None).unwrap();
    editor.set_position(id, Point::new(220.0, 180.0));
    let before = natural_position(&editor, 0);

    editor.begin_crop();
    assert!(editor.is_cropping());
    editor.pointer_down(Point::new(100.0, 100.0));
    editor.pointer_move(Point::new(300.0, 250.0));
    editor.pointer_up(Point::new(300.0, 250.0));

    assert!(!editor.is_cropping());
    // 400x400 against a 200x150 rect fits by width: factor 2.
    assert!((editor.viewport().width - 400.0).abs() < EPS);
    assert!((editor.viewport().height - 300.0).abs() < EPS);

    let after = natural_position(&editor, 0);
    assert!((after.x - before.x).abs() < EPS);
    assert!((after.y - before.y).abs() < EPS);
}

#[test]
fn degenerate_crop_gesture_cancels_silently() {
    let mut editor = editor_with_background();
    editor.add_shape(ShapeKind::Rectangle, "#000000", None);
    let before = editor.scene().objects().to_vec();

    editor.begin_crop();
    editor.pointer_down(Point::new(50.0, 50.0));
    // Only a vertical drag; the rectangle never opens an area.
    editor.pointer_move(Point::new(50.0, 200.0));
    editor.pointer_up(Point::new(50.0, 200.0));

    assert!(!editor.is_cropping());
    assert_eq!(editor.scene().objects(), &before[..]);
    assert!((editor.viewport().width - 400.0).abs() < EPS);
}

#[test]
fn commands_are_ignored_while_cropping() {
    let mut editor = editor_with_background();
    let a = editor.add_shape(ShapeKind::Rectangle, "#000000", None).unwrap();

    editor.begin_crop();
    assert!(editor.scene().selection().is_empty());
    assert!(editor.add_shape(ShapeKind::Circle, "#000000", None).is_none());
    assert!(editor.add_text("#000000", "x").is_none());
    editor.select(&[a]);
    assert!(editor.scene().selection().is_empty());
    assert_eq!(editor.scene().len(), 1);

    editor.cancel_crop();
    assert!(editor.add_shape(ShapeKind::Circle, "#000000", None).is_some());
}

#[test]
fn undo_after_crop_restores_precrop_geometry() {
    let mut editor = editor_with_background();
    let id = editor.add_shape(ShapeKind::Rectangle, "#000000", None).unwrap();
    editor.set_position(id, Point::new(220.0, 180.0));
    let natural_before = natural_position(&editor, 0);

    editor.begin_crop();
    editor.pointer_down(Point::new(100.0, 100.0));
    editor.pointer_move(Point::new(300.0, 250.0));
    editor.pointer_up(Point::new(300.0, 250.0));

    assert!(editor.undo().unwrap());
    // The viewport keeps its cropped size; the scene is refit to it with
    // its pre-crop natural geometry.
    let natural_after = natural_position(&editor, 0);
    assert!((natural_after.x - natural_before.x).abs() < 1e-6);
    assert!((natural_after.y - natural_before.y).abs() < 1e-6);
}

#[test]
fn viewport_resize_cancels_an_active_crop() {
    let mut editor = editor_with_background();
    editor.begin_crop();
    editor.pointer_down(Point::new(10.0, 10.0));
    editor.pointer_move(Point::new(200.0, 200.0));

    editor.set_viewport(Size::new(800.0, 600.0)).unwrap();
    assert!(!editor.is_cropping());
    assert_eq!(editor.viewport(), Size::new(800.0, 600.0));
}

#[test]
fn snapshot_roundtrip_through_the_editor() {
    let mut editor = editor_with_background();
    let id = editor.add_shape(ShapeKind::Triangle, "#000000", None).unwrap();
    editor.set_position(id, Point::new(200.0, 200.0));
    let natural_before = natural_position(&editor, 0);
    let snapshot = editor.capture_snapshot();

    let mut other = Editor::new(Size::new(800.0, 600.0));
    other.apply_snapshot(&snapshot).unwrap();
    assert_eq!(other.scene().len(), 1);
    let natural_after = natural_position(&other, 0);
    assert!((natural_after.x - natural_before.x).abs() < 1e-6);
    assert!((natural_after.y - natural_before.y).abs() < 1e-6);
    assert!(matches!(
        other.scene().objects()[0].kind,
        ObjectKind::Shape(ShapeKind::Triangle)
    ));
}

#[test]
fn revision_moves_only_when_the_scene_changes() {
    let mut editor = editor_with_background();
    let a = editor.add_shape(ShapeKind::Rectangle, "#000000", None).unwrap();
    let rev = editor.revision();

    // Re-selecting the already sole-selected object changes nothing.
    editor.select(&[a]);
    assert_eq!(editor.revision(), rev);

    editor.select(&[]);
    assert!(editor.revision() > rev);
}

#[test]
fn free_drawing_mode_toggles_with_brush_state() {
    let mut editor = Editor::new(Size::new(400.0, 400.0));
    assert!(!editor.is_free_drawing());
    editor.toggle_free_drawing();
    assert!(editor.is_free_drawing());
    editor.set_brush_color("#ff00ff");
    assert_eq!(editor.brush_color(), "#ff00ff");
    assert!(editor.brush_width() > 0.0);
    editor.toggle_free_drawing();
    assert!(!editor.is_free_drawing());
}

#[test]
fn resolved_only_when_no_crop_or_load_pending() {
    let mut editor = editor_with_background();
    assert!(editor.is_resolved());

    editor.begin_crop();
    assert!(!editor.is_resolved());
    editor.cancel_crop();

    let ticket = editor.begin_load_background("img://next");
    assert!(!editor.is_resolved());
    editor
        .complete_load_background(ticket, Size::new(100.0, 100.0))
        .unwrap();
    assert!(editor.is_resolved());
}
