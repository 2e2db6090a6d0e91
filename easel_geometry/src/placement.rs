// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Affine, Point, Rect, Vec2};

/// Uniform scale + offset mapping natural-image space into viewport space.
///
/// `view = natural * scale + offset`. The scale is uniform on both axes; the
/// offset centers the underfilled axis of an aspect fit. The invariant
/// `scale > 0` is maintained by every constructor in this workspace
/// ([`crate::aspect_fit`] rejects degenerate sizes).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    /// Uniform natural→viewport scale factor. Always positive.
    pub scale: f64,
    /// Viewport-space offset of the natural origin.
    pub offset: Vec2,
}

impl Placement {
    /// The identity placement: natural space and viewport space coincide.
    ///
    /// Used as the canonical base when a scene has no background image, so
    /// that snapshots of background-less scenes are still well defined.
    pub const IDENTITY: Self = Self {
        scale: 1.0,
        offset: Vec2::ZERO,
    };

    /// Creates a placement from a scale and offset.
    #[must_use]
    pub const fn new(scale: f64, offset: Vec2) -> Self {
        Self { scale, offset }
    }

    /// Maps a natural-space point into viewport space.
    #[must_use]
    pub fn to_view(&self, natural: Point) -> Point {
        (natural.to_vec2() * self.scale + self.offset).to_point()
    }

    /// Maps a viewport-space point back into natural space.
    #[must_use]
    pub fn to_natural(&self, view: Point) -> Point {
        ((view.to_vec2() - self.offset) / self.scale).to_point()
    }

    /// Maps a viewport-space rectangle into natural space.
    #[must_use]
    pub fn rect_to_natural(&self, rect: Rect) -> Rect {
        Rect::from_points(
            self.to_natural(rect.origin()),
            self.to_natural(Point::new(rect.x1, rect.y1)),
        )
    }

    /// Returns the natural→viewport transform as an affine.
    ///
    /// Translate-by-offset composed after uniform scale; the same shape as
    /// the viewport transforms used by the renderer.
    #[must_use]
    pub fn to_affine(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.scale)
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self::IDENTITY
    }
}
