// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Easel Snapshot: viewport-independent scene serialization.
//!
//! A [`Snapshot`] stores every object's geometry in **natural-image space**:
//! positions pulled back through the background's placement, scales divided
//! by the placement scale. Nothing in the snapshot depends on the viewport
//! that produced it, which is what makes a snapshot replayable at any other
//! viewport size without distortion. Scenes without a background are
//! captured against the identity placement (the canonical unit mapping).
//!
//! The schema is deliberately plain `f64` fields with an explicit `version`,
//! decoupled from any rendering library's internal object dump, so it can
//! evolve independently of the in-memory types.
//!
//! The defining correctness property: for a scene `s` fitted to any viewport,
//! `restore(&capture(&s), v)` reproduces `s`'s natural-space geometry at
//! viewport `v`, for every `v`. Round-tripping through different viewports
//! must agree up to floating-point tolerance.

use kurbo::{Point, Size, Vec2};
use serde::{Deserialize, Serialize};

use easel_geometry::{aspect_fit, GeometryError, Placement};
use easel_scene::{ObjectKind, Scene, SceneObject, ShapeKind};

/// Current snapshot schema version.
pub const FORMAT_VERSION: u32 = 1;

/// Errors from encoding or decoding snapshots.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// The JSON payload could not be read or written.
    #[error("snapshot serialization failed: {0}")]
    Json(#[from] serde_json::Error),
    /// The snapshot's background or the target viewport has a degenerate
    /// size, so no placement can be derived.
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    /// The snapshot was produced by an unknown schema version.
    #[error("unsupported snapshot version {0}, expected {FORMAT_VERSION}")]
    UnsupportedVersion(u32),
}

/// Background record in natural units.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SnapshotBackground {
    /// Opaque identity for reloading pixels.
    pub source_url: String,
    /// Natural width in image pixels.
    pub natural_width: f64,
    /// Natural height in image pixels.
    pub natural_height: f64,
}

/// Kind tag plus kind-specific payload of a serialized object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SnapshotKind {
    /// Axis-aligned rectangle.
    Rectangle,
    /// Circle.
    Circle,
    /// Triangle.
    Triangle,
    /// Horizontal line.
    Line,
    /// Cross of two lines.
    Cross,
    /// Text with its content.
    Text {
        /// Text content.
        content: String,
    },
    /// Pasted image.
    Image {
        /// Opaque identity for reloading pixels.
        source_url: String,
    },
    /// Group of members in group-local coordinates.
    Group {
        /// Member objects. Their geometry is group-local (frozen at group
        /// time) and is serialized verbatim; the group's own scale carries
        /// all viewport dependence.
        members: Vec<SnapshotObject>,
    },
}

/// One serialized object.
///
/// `x`/`y` and `scale_x`/`scale_y` are in natural-image units for top-level
/// objects, and group-local units for group members. `width`/`height` are
/// the object's unscaled intrinsic extent, which no transform ever touches.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SnapshotObject {
    /// Kind tag and payload (flattened into the object record).
    #[serde(flatten)]
    pub kind: SnapshotKind,
    /// Natural-space x position.
    pub x: f64,
    /// Natural-space y position.
    pub y: f64,
    /// Intrinsic width.
    pub width: f64,
    /// Intrinsic height.
    pub height: f64,
    /// Natural-space x scale.
    pub scale_x: f64,
    /// Natural-space y scale.
    pub scale_y: f64,
    /// Outline / text color.
    pub stroke_color: String,
    /// Interior color, when the kind has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<String>,
    /// Paint-order index (0 = backmost).
    pub z_order: u64,
}

/// A complete serialized scene.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Schema version; see [`FORMAT_VERSION`].
    pub version: u32,
    /// Background record, if an image was loaded.
    pub background: Option<SnapshotBackground>,
    /// Objects in paint order.
    pub objects: Vec<SnapshotObject>,
}

impl Snapshot {
    /// Encodes the snapshot as JSON.
    ///
    /// # Errors
    ///
    /// [`SnapshotError::Json`] when serialization fails.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decodes a snapshot from JSON.
    ///
    /// # Errors
    ///
    /// [`SnapshotError::Json`] for malformed payloads,
    /// [`SnapshotError::UnsupportedVersion`] for unknown schema versions.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: Self = serde_json::from_str(json)?;
        if snapshot.version != FORMAT_VERSION {
            return Err(SnapshotError::UnsupportedVersion(snapshot.version));
        }
        Ok(snapshot)
    }
}

/// Captures a scene into a viewport-independent snapshot.
///
/// Top-level geometry is re-based from viewport space to natural-image space
/// through the background's placement (or the identity placement when there
/// is no background). The current selection is transient UI state and is not
/// captured.
#[must_use]
pub fn capture(scene: &Scene) -> Snapshot {
    let base = scene
        .background()
        .map_or(Placement::IDENTITY, |background| background.placement);

    let background = scene.background().map(|background| SnapshotBackground {
        source_url: background.source_url.clone(),
        natural_width: background.natural_size.width,
        natural_height: background.natural_size.height,
    });

    let objects = scene
        .objects()
        .iter()
        .enumerate()
        .map(|(z, obj)| encode_object(obj, z as u64, Some(base)))
        .collect();

    Snapshot {
        version: FORMAT_VERSION,
        background,
        objects,
    }
}

/// Restores a snapshot into a scene fitted to `viewport`.
///
/// A fresh aspect-fit placement is computed for the snapshot's background
/// against `viewport`, and every object is pushed from natural space out
/// into the new viewport space. The restored scene has an empty selection.
///
/// # Errors
///
/// [`SnapshotError::Geometry`] when the background or viewport size is
/// degenerate, [`SnapshotError::UnsupportedVersion`] for foreign versions.
pub fn restore(snapshot: &Snapshot, viewport: Size) -> Result<Scene, SnapshotError> {
    if snapshot.version != FORMAT_VERSION {
        return Err(SnapshotError::UnsupportedVersion(snapshot.version));
    }

    let mut scene = Scene::new();
    let base = match &snapshot.background {
        Some(background) => {
            let natural_size = Size::new(background.natural_width, background.natural_height);
            let placement = aspect_fit(viewport, natural_size)?;
            scene.replace_background(easel_scene::Background {
                source_url: background.source_url.clone(),
                natural_size,
                placement,
            });
            placement
        }
        None => Placement::IDENTITY,
    };

    let mut ordered: Vec<&SnapshotObject> = snapshot.objects.iter().collect();
    ordered.sort_by_key(|obj| obj.z_order);

    for record in ordered {
        let object = decode_object(&mut scene, record, Some(base));
        let id = scene.insert(
            object.kind,
            object.position,
            object.size,
            object.scale,
            object.stroke_color,
            object.fill_color,
        );
        let _ = id;
    }
    scene.selection_mut().clear();
    Ok(scene)
}

/// Encodes one object. `base` is `Some` for top-level objects (normalize to
/// natural space) and `None` for group members (serialize group-local
/// geometry verbatim).
fn encode_object(obj: &SceneObject, z_order: u64, base: Option<Placement>) -> SnapshotObject {
    let (position, scale) = match base {
        Some(base) => (
            base.to_natural(obj.position),
            obj.scale / base.scale,
        ),
        None => (obj.position, obj.scale),
    };

    let kind = match &obj.kind {
        ObjectKind::Shape(ShapeKind::Rectangle) => SnapshotKind::Rectangle,
        ObjectKind::Shape(ShapeKind::Circle) => SnapshotKind::Circle,
        ObjectKind::Shape(ShapeKind::Triangle) => SnapshotKind::Triangle,
        ObjectKind::Shape(ShapeKind::Line) => SnapshotKind::Line,
        ObjectKind::Shape(ShapeKind::Cross) => SnapshotKind::Cross,
        ObjectKind::Text { content } => SnapshotKind::Text {
            content: content.clone(),
        },
        ObjectKind::Image { source_url } => SnapshotKind::Image {
            source_url: source_url.clone(),
        },
        ObjectKind::Group { members } => SnapshotKind::Group {
            members: members
                .iter()
                .enumerate()
                .map(|(z, member)| encode_object(member, z as u64, None))
                .collect(),
        },
    };

    SnapshotObject {
        kind,
        x: position.x,
        y: position.y,
        width: obj.size.width,
        height: obj.size.height,
        scale_x: scale.x,
        scale_y: scale.y,
        stroke_color: obj.stroke_color.clone(),
        fill_color: obj.fill_color.clone(),
        z_order,
    }
}

/// Decodes one record into a scene object (not yet inserted). `base` follows
/// the same convention as [`encode_object`].
fn decode_object(scene: &mut Scene, record: &SnapshotObject, base: Option<Placement>) -> SceneObject {
    let natural = Point::new(record.x, record.y);
    let (position, scale) = match base {
        Some(base) => (
            base.to_view(natural),
            Vec2::new(record.scale_x * base.scale, record.scale_y * base.scale),
        ),
        None => (natural, Vec2::new(record.scale_x, record.scale_y)),
    };

    let kind = match &record.kind {
        SnapshotKind::Rectangle => ObjectKind::Shape(ShapeKind::Rectangle),
        SnapshotKind::Circle => ObjectKind::Shape(ShapeKind::Circle),
        SnapshotKind::Triangle => ObjectKind::Shape(ShapeKind::Triangle),
        SnapshotKind::Line => ObjectKind::Shape(ShapeKind::Line),
        SnapshotKind::Cross => ObjectKind::Shape(ShapeKind::Cross),
        SnapshotKind::Text { content } => ObjectKind::Text {
            content: content.clone(),
        },
        SnapshotKind::Image { source_url } => ObjectKind::Image {
            source_url: source_url.clone(),
        },
        SnapshotKind::Group { members } => {
            let mut ordered: Vec<&SnapshotObject> = members.iter().collect();
            ordered.sort_by_key(|member| member.z_order);
            ObjectKind::Group {
                members: ordered
                    .into_iter()
                    .map(|member| decode_object(scene, member, None))
                    .collect(),
            }
        }
    };

    SceneObject {
        id: scene.allocate_id(),
        kind,
        position,
        size: Size::new(record.width, record.height),
        scale,
        stroke_color: record.stroke_color.clone(),
        fill_color: record.fill_color.clone(),
    }
}
