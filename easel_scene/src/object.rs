// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Size, Vec2};

/// Identifier for an object in a [`Scene`](crate::Scene).
///
/// Ids are allocated from a per-scene monotonic counter and never reused, so
/// a stale id can never alias a different live object. Operations given a
/// stale id treat it as a no-op.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ObjectId(pub(crate) u64);

impl ObjectId {
    /// Returns the raw id value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// The geometric shape variants a user can add from the shape menu.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ShapeKind {
    /// Axis-aligned rectangle.
    Rectangle,
    /// Circle (rendered inside the object's bounding square).
    Circle,
    /// Upward-pointing triangle.
    Triangle,
    /// Horizontal line segment. Has no fill; `size` is ignored.
    Line,
    /// A cross made of one horizontal and one vertical segment. No fill;
    /// `size` is ignored.
    Cross,
}

impl ShapeKind {
    /// Whether this shape variant has a fillable interior.
    #[must_use]
    pub const fn has_fill(self) -> bool {
        !matches!(self, Self::Line | Self::Cross)
    }
}

/// Polymorphic payload of a [`SceneObject`].
#[derive(Clone, Debug, PartialEq)]
pub enum ObjectKind {
    /// A plain geometric shape.
    Shape(ShapeKind),
    /// Editable text. The text color is the object's stroke color.
    Text {
        /// Text content.
        content: String,
    },
    /// A pasted image or pictogram.
    Image {
        /// Opaque identity used by the rendering surface to (re)load pixels.
        source_url: String,
    },
    /// A group of objects frozen relative to the group's bounding origin.
    ///
    /// The group exclusively owns its members' top-level z-order slots:
    /// member geometry is expressed in group-local coordinates and only the
    /// group itself occupies a slot in the scene's paint order. Member data
    /// (ids included) is preserved inside the group.
    Group {
        /// Member objects in their original relative paint order, with
        /// positions rebased to the group origin.
        members: Vec<SceneObject>,
    },
}

impl ObjectKind {
    /// Whether objects of this kind have a fillable interior.
    #[must_use]
    pub fn has_fill(&self) -> bool {
        match self {
            Self::Shape(kind) => kind.has_fill(),
            Self::Text { .. } | Self::Image { .. } => true,
            // Color changes recurse into members instead.
            Self::Group { .. } => false,
        }
    }
}

/// One drawable object in a scene.
///
/// `position` and `size` are in viewport coordinates; `scale` accumulates the
/// uniform refit/crop factors applied since insertion, so the renderer draws
/// the object at `size * scale` around `position`. For [`ObjectKind::Group`]
/// members, `position` is group-local instead.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneObject {
    /// Stable identity within the owning scene.
    pub id: ObjectId,
    /// Variant payload.
    pub kind: ObjectKind,
    /// Top-left anchor in viewport coordinates.
    pub position: Point,
    /// Unscaled extent. Ignored by the renderer for lines and crosses.
    pub size: Size,
    /// Per-axis scale factors applied on top of `size`.
    pub scale: Vec2,
    /// Outline color (also the text color for text objects). Opaque CSS
    /// color string; the core never interprets it.
    pub stroke_color: String,
    /// Interior color, for kinds that have a fillable interior.
    pub fill_color: Option<String>,
}

impl SceneObject {
    /// The object's scaled extent in its own coordinate space.
    #[must_use]
    pub fn scaled_size(&self) -> Size {
        Size::new(self.size.width * self.scale.x, self.size.height * self.scale.y)
    }
}
