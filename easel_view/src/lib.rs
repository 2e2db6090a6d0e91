// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Easel View: fits a scene's background into a viewport and keeps every
//! object anchored to the image across viewport changes.
//!
//! The [`View`] owns the logical viewport size. Whenever the viewport or the
//! background changes, it recomputes the background's aspect-fit
//! [`Placement`](easel_geometry::Placement) and remaps every object so that
//! its position **in the background's natural pixel space** is preserved
//! exactly. Objects stay glued to the same point on the underlying image,
//! not to the same point on screen.
//!
//! Without a background there is nothing to anchor to, so viewport changes
//! leave object geometry untouched.
//!
//! ## Minimal example
//!
//! ```rust
//! use easel_scene::{Scene, ShapeKind};
//! use easel_view::View;
//! use kurbo::{Point, Size};
//!
//! let mut scene = Scene::new();
//! let mut view = View::new(Size::new(400.0, 400.0));
//! view.load_background(&mut scene, "img://photo", Size::new(1000.0, 500.0)).unwrap();
//!
//! // A marker at the viewport center sits on the image center.
//! let id = scene.add_shape(ShapeKind::Cross, "#000000", None);
//! scene.objects_mut()[0].position = Point::new(200.0, 200.0);
//!
//! // After resizing, the marker still sits on the image center.
//! view.set_viewport(&mut scene, Size::new(800.0, 600.0)).unwrap();
//! let placement = scene.background().unwrap().placement;
//! let natural = placement.to_natural(scene.object(id).unwrap().position);
//! assert!((natural.x - 500.0).abs() < 1e-9);
//! assert!((natural.y - 250.0).abs() < 1e-9);
//! ```

use kurbo::Size;

use easel_geometry::{aspect_fit, GeometryError, Placement};
use easel_scene::{Background, Scene};

/// Logical viewport over a scene.
///
/// Tracks the viewport size and drives the refitting of the scene whenever
/// that size or the background changes. Painting and input handling live in
/// higher layers.
#[derive(Clone, Copy, Debug)]
pub struct View {
    viewport: Size,
}

impl View {
    /// Creates a view with the given viewport size.
    #[must_use]
    pub const fn new(viewport: Size) -> Self {
        Self { viewport }
    }

    /// Returns the current logical viewport size.
    #[must_use]
    pub const fn viewport(&self) -> Size {
        self.viewport
    }

    /// Resizes the viewport and refits the scene.
    ///
    /// With a background present, its placement is recomputed for the new
    /// size and every object is remapped through
    /// old-placement → natural space → new-placement, preserving its
    /// natural-space position exactly. Without a background the viewport
    /// size changes but object geometry is untouched.
    ///
    /// # Errors
    ///
    /// [`GeometryError::InvalidGeometry`] when `new_size` has non-positive
    /// dimensions; the scene is left unmodified.
    pub fn set_viewport(&mut self, scene: &mut Scene, new_size: Size) -> Result<(), GeometryError> {
        let Some(background) = scene.background() else {
            self.viewport = new_size;
            return Ok(());
        };
        let old = background.placement;
        let new = aspect_fit(new_size, background.natural_size)?;

        remap_scene(scene, old, new);
        if let Some(background) = scene.background_mut() {
            background.placement = new;
        }
        self.viewport = new_size;
        Ok(())
    }

    /// Replaces the background image, discarding all prior annotations.
    ///
    /// The new image is aspect-fitted to the current viewport. The previous
    /// background and every object are dropped (loading a new image starts a
    /// fresh composition).
    ///
    /// # Errors
    ///
    /// [`GeometryError::InvalidGeometry`] when `natural_size` has
    /// non-positive dimensions; the scene keeps its previous state.
    pub fn load_background(
        &mut self,
        scene: &mut Scene,
        source_url: impl Into<String>,
        natural_size: Size,
    ) -> Result<(), GeometryError> {
        let placement = aspect_fit(self.viewport, natural_size)?;
        scene.replace_background(Background {
            source_url: source_url.into(),
            natural_size,
            placement,
        });
        Ok(())
    }

    /// Sets the logical viewport size without refitting the scene.
    ///
    /// Crop commit performs its own remap with the crop factor and then
    /// declares the resulting extent as the new viewport; everything else
    /// should go through [`View::set_viewport`].
    pub fn resize(&mut self, size: Size) {
        self.viewport = size;
    }
}

/// Remaps every top-level object from `old` placement space to `new`.
///
/// Each object's viewport position is pulled back to natural space through
/// `old` and pushed out through `new`; its accumulated scale is multiplied by
/// the placement scale ratio. Group members are group-local and follow their
/// group implicitly.
pub fn remap_scene(scene: &mut Scene, old: Placement, new: Placement) {
    let ratio = new.scale / old.scale;
    for obj in scene.objects_mut() {
        let natural = old.to_natural(obj.position);
        obj.position = new.to_view(natural);
        obj.scale = obj.scale * ratio;
    }
}
