// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Easel Geometry: pure geometry helpers for the canvas scene engine.
//!
//! This crate distinguishes two coordinate spaces and provides the mapping
//! between them:
//! - **Natural-image space**: the background image's own unscaled pixel
//!   dimensions, independent of any viewport.
//! - **Viewport space**: the on-screen pixel area the scene is currently
//!   fitted to.
//!
//! A [`Placement`] is the uniform scale + offset that maps natural space into
//! viewport space. [`aspect_fit`] computes the placement that fits an image
//! inside a viewport without distortion, centering the axis that falls
//! short. [`drag_rect`] normalizes two pointer positions into an
//! axis-aligned rectangle, treating zero-area drags as "not yet a rectangle".
//!
//! Everything here is stateless; the scene store and crop engine own all
//! mutable state.
//!
//! ## Minimal example
//!
//! ```rust
//! use easel_geometry::aspect_fit;
//! use kurbo::{Point, Size};
//!
//! // A 1000x500 image fitted into a square 400x400 viewport.
//! let placement = aspect_fit(Size::new(400.0, 400.0), Size::new(1000.0, 500.0)).unwrap();
//! assert_eq!(placement.scale, 0.4);
//!
//! // The image center lands on the viewport center.
//! let center = placement.to_view(Point::new(500.0, 250.0));
//! assert_eq!(center, Point::new(200.0, 200.0));
//! ```

mod fit;
mod placement;

pub use fit::{aspect_fit, drag_rect};
pub use placement::Placement;

/// Errors produced by geometry computations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryError {
    /// A size with a non-positive width or height was passed where a positive
    /// area is required (for example a background image's natural size).
    #[error("invalid geometry: size {width}x{height} must have positive dimensions")]
    InvalidGeometry {
        /// Offending width.
        width: f64,
        /// Offending height.
        height: f64,
    },
}
