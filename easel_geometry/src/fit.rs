// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Rect, Size, Vec2};

use crate::{GeometryError, Placement};

/// Computes the aspect-fit placement of `natural` into `viewport`.
///
/// The image's relatively longer axis exactly fills the viewport; the other
/// axis falls short and is centered via the offset, leaving symmetric
/// margins. The whole image is always visible and never distorted.
///
/// With `va = viewport aspect` and `na = natural aspect`:
/// - `va <= na` (viewport relatively taller/narrower than the image): scale
///   by width, center vertically.
/// - otherwise: scale by height, center horizontally.
///
/// # Errors
///
/// Returns [`GeometryError::InvalidGeometry`] when either size has a
/// non-positive width or height.
pub fn aspect_fit(viewport: Size, natural: Size) -> Result<Placement, GeometryError> {
    if natural.width <= 0.0 || natural.height <= 0.0 {
        return Err(GeometryError::InvalidGeometry {
            width: natural.width,
            height: natural.height,
        });
    }
    if viewport.width <= 0.0 || viewport.height <= 0.0 {
        return Err(GeometryError::InvalidGeometry {
            width: viewport.width,
            height: viewport.height,
        });
    }

    let viewport_aspect = viewport.width / viewport.height;
    let natural_aspect = natural.width / natural.height;

    let placement = if viewport_aspect <= natural_aspect {
        let scale = viewport.width / natural.width;
        let offset_y = -(natural.height * scale - viewport.height) / 2.0;
        Placement::new(scale, Vec2::new(0.0, offset_y))
    } else {
        let scale = viewport.height / natural.height;
        let offset_x = -(natural.width * scale - viewport.width) / 2.0;
        Placement::new(scale, Vec2::new(offset_x, 0.0))
    };
    Ok(placement)
}

/// Normalizes two pointer positions into an axis-aligned rectangle.
///
/// Returns `None` when the rectangle would have zero width or height. That is
/// not an error: it models a crop gesture whose pointer has not yet moved far
/// enough to define an area, and callers must treat it as "no rectangle yet".
#[must_use]
pub fn drag_rect(start: Point, current: Point) -> Option<Rect> {
    let rect = Rect::from_points(start, current);
    if rect.width() == 0.0 || rect.height() == 0.0 {
        return None;
    }
    Some(rect)
}
