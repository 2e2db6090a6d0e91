// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Easel Crop: the interactive crop state machine and its commit transform.
//!
//! A [`CropSession`] walks `Idle → Selecting → Idle`. While selecting, raw
//! pointer positions shape an ephemeral [`CropRegion`]; drags that have not
//! yet opened up a real area (zero width or height) are ignored rather than
//! reported as errors. Committing consumes the region and re-derives a whole
//! new coordinate space:
//!
//! 1. Compute the aspect-fit scale of the current viewport against the crop
//!    rectangle's size.
//! 2. Translate every object by the rectangle's negated origin, **then**
//!    multiply position and scale by that factor.
//! 3. Apply the identical translate-then-scale to the background placement.
//! 4. Resize the logical viewport to the scaled rectangle.
//!
//! One factor, one order, for everything: objects, background, viewport.
//! Mixing the translate/scale order between objects and the background makes
//! annotations drift off the image, which is exactly the bug class this
//! module exists to prevent.
//!
//! ## Usage
//!
//! 1) [`CropSession::begin`] on the crop command; the caller disables object
//!    selection for the duration.
//! 2) Forward raw pointer events to [`CropSession::pointer_down`] and
//!    [`CropSession::pointer_move`].
//! 3) On pointer-up, call [`CropSession::commit`]; on abort,
//!    [`CropSession::cancel`]. Both return the session to `Idle`.

use kurbo::{Point, Rect, Size};

use easel_geometry::{aspect_fit, drag_rect, GeometryError};
use easel_scene::Scene;
use easel_view::View;

/// Where the crop session currently is in its lifecycle.
///
/// The commit transition is synchronous, so no separate "committing" phase
/// is ever observable from outside.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum CropPhase {
    /// No crop in progress; scene selection behaves normally.
    #[default]
    Idle,
    /// A crop rectangle is being dragged out.
    Selecting,
}

/// The ephemeral crop rectangle.
///
/// Created on pointer-down, reshaped on every pointer-move, and consumed by
/// commit or cancel. Never outlives the gesture.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CropRegion {
    /// The pointer-down position the drag is measured from.
    pub anchor: Point,
    /// Normalized rectangle between the anchor and the latest pointer
    /// position, in viewport coordinates.
    pub rect: Rect,
    /// Whether the rectangle has opened up a real area yet. Stays `false`
    /// until the first non-degenerate drag update.
    pub visible: bool,
}

/// Errors from crop commit.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CropError {
    /// Commit was requested outside an active crop gesture.
    #[error("no crop gesture in progress")]
    NotSelecting,
    /// The crop rectangle never opened up a real area; there is nothing to
    /// crop to. Callers should treat this as a silent cancel.
    #[error("crop rectangle has zero area")]
    DegenerateRegion,
    /// The viewport or rectangle could not produce a valid fit.
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// Interactive crop state machine.
#[derive(Clone, Debug, Default)]
pub struct CropSession {
    phase: CropPhase,
    region: Option<CropRegion>,
}

impl CropSession {
    /// Creates an idle session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current phase.
    #[must_use]
    pub fn phase(&self) -> CropPhase {
        self.phase
    }

    /// Returns `true` while a crop gesture is in progress.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.phase == CropPhase::Selecting
    }

    /// Returns the crop region, if a gesture has started.
    #[must_use]
    pub fn region(&self) -> Option<&CropRegion> {
        self.region.as_ref()
    }

    /// Starts a crop gesture. Returns `false` if one is already active.
    ///
    /// The region starts absent; it materializes on the first pointer-down.
    pub fn begin(&mut self) -> bool {
        if self.phase == CropPhase::Selecting {
            return false;
        }
        self.phase = CropPhase::Selecting;
        self.region = None;
        true
    }

    /// Anchors the crop rectangle at the pointer-down position.
    ///
    /// Ignored while idle. A second pointer-down restarts the rectangle from
    /// the new anchor.
    pub fn pointer_down(&mut self, point: Point) {
        if self.phase != CropPhase::Selecting {
            return;
        }
        self.region = Some(CropRegion {
            anchor: point,
            rect: Rect::from_origin_size(point, Size::ZERO),
            visible: false,
        });
    }

    /// Reshapes the crop rectangle toward the current pointer position.
    ///
    /// Degenerate drags (the normalized rectangle would have zero width or
    /// height) are ignored entirely: the previous rectangle and visibility
    /// are left as they were.
    pub fn pointer_move(&mut self, point: Point) {
        if self.phase != CropPhase::Selecting {
            return;
        }
        let Some(region) = self.region.as_mut() else {
            return;
        };
        if let Some(rect) = drag_rect(region.anchor, point) {
            region.rect = rect;
            region.visible = true;
        }
    }

    /// Abandons the gesture without touching the scene.
    pub fn cancel(&mut self) {
        self.phase = CropPhase::Idle;
        self.region = None;
    }

    /// Commits the crop, remapping the scene into the cropped space.
    ///
    /// Performs the translate-then-scale sequence described in the [crate
    /// docs](crate) and resizes `view` to the new logical viewport, which is
    /// also returned. The session returns to idle. On any error the scene
    /// and view are left untouched and the session **stays** in `Selecting`,
    /// leaving the caller free to cancel or retry.
    ///
    /// # Errors
    ///
    /// - [`CropError::NotSelecting`] outside a gesture.
    /// - [`CropError::DegenerateRegion`] when the rectangle never became
    ///   visible.
    /// - [`CropError::Geometry`] when no valid fit exists for the rectangle.
    pub fn commit(&mut self, scene: &mut Scene, view: &mut View) -> Result<Size, CropError> {
        if self.phase != CropPhase::Selecting {
            return Err(CropError::NotSelecting);
        }
        let rect = match self.region {
            Some(region) if region.visible => region.rect,
            _ => return Err(CropError::DegenerateRegion),
        };

        // Everything fallible happens before any mutation.
        let factor = aspect_fit(view.viewport(), rect.size())?.scale;
        let origin = rect.origin().to_vec2();

        for obj in scene.objects_mut() {
            obj.position = ((obj.position.to_vec2() - origin) * factor).to_point();
            obj.scale = obj.scale * factor;
        }
        if let Some(background) = scene.background_mut() {
            background.placement.offset = (background.placement.offset - origin) * factor;
            background.placement.scale *= factor;
        }

        let new_viewport = Size::new(rect.width() * factor, rect.height() * factor);
        view.resize(new_viewport);

        self.phase = CropPhase::Idle;
        self.region = None;
        Ok(new_viewport)
    }
}
