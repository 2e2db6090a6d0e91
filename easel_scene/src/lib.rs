// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Easel Scene: the single source of truth for an annotation session.
//!
//! A [`Scene`] owns three things:
//! - An ordered sequence of [`SceneObject`]s. The sequence order **is** the
//!   paint order: index 0 paints first (back), the last index paints on top
//!   (front). Z-order is therefore always dense and unique.
//! - An optional [`Background`]: the image being annotated, together with the
//!   [`Placement`](easel_geometry::Placement) that maps its natural pixel
//!   space into the current viewport.
//! - A [`Selection`]: the set of object ids the user is currently acting on.
//!
//! The scene knows nothing about rendering. An external surface draws
//! whatever the scene contains; higher layers (viewport fit, crop, snapshot)
//! transform the scene's geometry between coordinate spaces.
//!
//! All mutating operations are synchronous and atomic: the scene is in a
//! consistent, fully-computed state whenever a call returns. Operations that
//! reference ids no longer present simply skip them without mutating
//! anything else; a stale selection between queued UI events is normal, not
//! an error.
//!
//! ## Minimal example
//!
//! ```rust
//! use easel_scene::{Scene, ShapeKind};
//!
//! let mut scene = Scene::new();
//! let rect = scene.add_shape(ShapeKind::Rectangle, "#000000", Some("#ff0000".into()));
//! let circle = scene.add_shape(ShapeKind::Circle, "#000000", None);
//!
//! // The most recently added object is frontmost and solely selected.
//! assert_eq!(scene.z_order(circle), Some(1));
//! assert_eq!(scene.selection().items(), &[circle]);
//!
//! scene.bring_to_front(&[rect]);
//! assert_eq!(scene.z_order(rect), Some(1));
//! ```

mod object;
mod scene;
mod selection;

pub use object::{ObjectId, ObjectKind, SceneObject, ShapeKind};
pub use scene::{Background, Scene};
pub use selection::Selection;

/// Default geometry and styling for newly inserted objects.
///
/// New shapes appear at a fixed spot near the top-left of the viewport with a
/// modest size, matching the behavior of dropping a shape onto the canvas and
/// then moving it into place.
pub mod defaults {
    use kurbo::{Point, Size};

    /// Insertion position for new shapes and text, in viewport coordinates.
    pub const INSERT_POSITION: Point = Point::new(50.0, 100.0);
    /// Default size for sized shapes (rectangle, triangle, image icons).
    pub const SHAPE_SIZE: Size = Size::new(100.0, 100.0);
    /// Default circle radius.
    pub const CIRCLE_RADIUS: f64 = 50.0;
    /// Default line length (lines ignore their `size`; this spans endpoints).
    pub const LINE_LENGTH: f64 = 100.0;
    /// Stroke width for shape outlines.
    pub const STROKE_WIDTH: f64 = 5.0;
    /// Brush width for free drawing.
    pub const BRUSH_WIDTH: f64 = 5.0;
}
