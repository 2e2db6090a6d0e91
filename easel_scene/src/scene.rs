// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Size, Vec2};

use easel_geometry::Placement;

use crate::defaults;
use crate::{ObjectId, ObjectKind, SceneObject, Selection, ShapeKind};

/// The background image being annotated.
#[derive(Clone, Debug, PartialEq)]
pub struct Background {
    /// Opaque identity used by the rendering surface to (re)load pixels.
    pub source_url: String,
    /// The image's own unscaled pixel dimensions.
    pub natural_size: Size,
    /// Mapping from natural space into the current viewport.
    pub placement: Placement,
}

/// Ordered drawable objects, optional background, and the current selection.
///
/// See the [crate docs](crate) for the ownership and ordering model. All
/// mutating operations are atomic; ids that no longer resolve are skipped
/// without touching the rest of the scene.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    objects: Vec<SceneObject>,
    background: Option<Background>,
    selection: Selection,
    next_id: u64,
}

impl Scene {
    /// Creates an empty scene with no background.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the objects in paint order (index 0 is backmost).
    #[must_use]
    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    /// Returns the objects mutably, for geometry remapping.
    ///
    /// The slice cannot change length, so identity and z-order invariants
    /// are preserved even through this access.
    pub fn objects_mut(&mut self) -> &mut [SceneObject] {
        &mut self.objects
    }

    /// Returns the background record, if an image is loaded.
    #[must_use]
    pub fn background(&self) -> Option<&Background> {
        self.background.as_ref()
    }

    /// Returns the background record mutably.
    pub fn background_mut(&mut self) -> Option<&mut Background> {
        self.background.as_mut()
    }

    /// Returns the current selection.
    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Returns the current selection mutably.
    pub fn selection_mut(&mut self) -> &mut Selection {
        &mut self.selection
    }

    /// Returns the number of objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns `true` if the scene has no objects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Looks up an object by id.
    #[must_use]
    pub fn object(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.iter().find(|obj| obj.id == id)
    }

    /// Returns the z-order of `id`: its index in the paint order.
    #[must_use]
    pub fn z_order(&self, id: ObjectId) -> Option<usize> {
        self.objects.iter().position(|obj| obj.id == id)
    }

    /// Removes every object and the background. The selection empties.
    pub fn clear(&mut self) {
        self.objects.clear();
        self.background = None;
        self.selection.clear();
    }

    /// Replaces the background wholesale, discarding all prior annotations.
    ///
    /// Loading a new image invalidates every existing object's coordinates,
    /// so the object list and selection are cleared along with the old
    /// background.
    pub fn replace_background(&mut self, background: Background) {
        self.objects.clear();
        self.selection.clear();
        self.background = Some(background);
    }

    /// Inserts an object at the top of the paint order.
    ///
    /// The new object becomes the sole selection and its id is returned.
    pub fn insert(
        &mut self,
        kind: ObjectKind,
        position: Point,
        size: Size,
        scale: Vec2,
        stroke_color: String,
        fill_color: Option<String>,
    ) -> ObjectId {
        let id = self.allocate_id();
        let fill_color = if kind.has_fill() { fill_color } else { None };
        self.objects.push(SceneObject {
            id,
            kind,
            position,
            size,
            scale,
            stroke_color,
            fill_color,
        });
        self.selection.select_only(id);
        id
    }

    /// Adds a geometric shape with the default insertion geometry.
    pub fn add_shape(
        &mut self,
        shape: ShapeKind,
        stroke_color: impl Into<String>,
        fill_color: Option<String>,
    ) -> ObjectId {
        let size = match shape {
            ShapeKind::Circle => Size::new(
                defaults::CIRCLE_RADIUS * 2.0,
                defaults::CIRCLE_RADIUS * 2.0,
            ),
            ShapeKind::Line | ShapeKind::Cross => {
                Size::new(defaults::LINE_LENGTH, defaults::LINE_LENGTH)
            }
            ShapeKind::Rectangle | ShapeKind::Triangle => defaults::SHAPE_SIZE,
        };
        self.insert(
            ObjectKind::Shape(shape),
            defaults::INSERT_POSITION,
            size,
            Vec2::new(1.0, 1.0),
            stroke_color.into(),
            fill_color,
        )
    }

    /// Adds a text object. The color doubles as stroke and fill.
    pub fn add_text(&mut self, color: impl Into<String>, content: impl Into<String>) -> ObjectId {
        let color = color.into();
        self.insert(
            ObjectKind::Text {
                content: content.into(),
            },
            defaults::INSERT_POSITION,
            defaults::SHAPE_SIZE,
            Vec2::new(1.0, 1.0),
            color.clone(),
            Some(color),
        )
    }

    /// Adds an image object at its natural size.
    pub fn add_image(&mut self, source_url: impl Into<String>, natural_size: Size) -> ObjectId {
        self.insert(
            ObjectKind::Image {
                source_url: source_url.into(),
            },
            defaults::INSERT_POSITION,
            natural_size,
            Vec2::new(1.0, 1.0),
            String::new(),
            None,
        )
    }

    /// Removes the given objects. Ids that do not resolve are skipped.
    ///
    /// The selection drops any removed id, so it can never go stale.
    pub fn remove_objects(&mut self, ids: &[ObjectId]) {
        if ids.is_empty() {
            return;
        }
        self.objects.retain(|obj| !ids.contains(&obj.id));
        let objects = &self.objects;
        self.selection
            .retain(|id| objects.iter().any(|obj| obj.id == id));
    }

    /// Replaces the selection with the live subset of `ids`.
    pub fn select(&mut self, ids: &[ObjectId]) {
        let live: Vec<ObjectId> = ids
            .iter()
            .copied()
            .filter(|&id| self.z_order(id).is_some())
            .collect();
        self.selection.replace_with(live);
    }

    /// Selects the object at the given z-order index, if it exists.
    pub fn select_item(&mut self, index: usize) {
        if let Some(obj) = self.objects.get(index) {
            let id = obj.id;
            self.selection.select_only(id);
        }
    }

    /// Moves the given objects to the top of the paint order.
    ///
    /// The moved objects keep their relative order among themselves; so do
    /// the objects left behind. After the call every moved object paints
    /// above every unmoved one.
    pub fn bring_to_front(&mut self, ids: &[ObjectId]) {
        self.reorder(ids, true);
    }

    /// Moves the given objects to the bottom of the paint order.
    ///
    /// The mirror image of [`Scene::bring_to_front`].
    pub fn send_to_back(&mut self, ids: &[ObjectId]) {
        self.reorder(ids, false);
    }

    fn reorder(&mut self, ids: &[ObjectId], to_front: bool) {
        if ids.is_empty() || !self.objects.iter().any(|obj| ids.contains(&obj.id)) {
            return;
        }
        let (mut moved, mut kept): (Vec<SceneObject>, Vec<SceneObject>) = self
            .objects
            .drain(..)
            .partition(|obj| ids.contains(&obj.id));
        if to_front {
            kept.append(&mut moved);
            self.objects = kept;
        } else {
            moved.append(&mut kept);
            self.objects = moved;
        }
    }

    /// Collapses the given objects into a single group object.
    ///
    /// Members leave the top-level paint order and are frozen in group-local
    /// coordinates relative to the group's bounding origin. The group is
    /// appended at the top and becomes the sole selection. Returns the group
    /// id, or `None` (a no-op) when fewer than two ids resolve.
    pub fn group(&mut self, ids: &[ObjectId]) -> Option<ObjectId> {
        let member_indices: Vec<usize> = self
            .objects
            .iter()
            .enumerate()
            .filter(|(_, obj)| ids.contains(&obj.id))
            .map(|(idx, _)| idx)
            .collect();
        if member_indices.len() < 2 {
            return None;
        }

        // Bounding box over the members' scaled extents.
        let mut min = Point::new(f64::INFINITY, f64::INFINITY);
        let mut max = Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
        for &idx in &member_indices {
            let obj = &self.objects[idx];
            let extent = obj.scaled_size();
            min.x = min.x.min(obj.position.x);
            min.y = min.y.min(obj.position.y);
            max.x = max.x.max(obj.position.x + extent.width);
            max.y = max.y.max(obj.position.y + extent.height);
        }

        let member_ids: Vec<ObjectId> = member_indices
            .iter()
            .map(|&idx| self.objects[idx].id)
            .collect();
        let mut members: Vec<SceneObject> = Vec::with_capacity(member_ids.len());
        let mut remaining: Vec<SceneObject> = Vec::with_capacity(self.objects.len());
        for obj in self.objects.drain(..) {
            if member_ids.contains(&obj.id) {
                let mut member = obj;
                member.position = member.position - min.to_vec2();
                members.push(member);
            } else {
                remaining.push(obj);
            }
        }
        self.objects = remaining;

        let id = self.insert(
            ObjectKind::Group { members },
            min,
            Size::new(max.x - min.x, max.y - min.y),
            Vec2::new(1.0, 1.0),
            String::new(),
            None,
        );
        Some(id)
    }

    /// Sets the stroke color of the given objects.
    ///
    /// Text objects treat this as their text color; groups recurse into
    /// their members.
    pub fn set_stroke_color(&mut self, ids: &[ObjectId], color: &str) {
        for obj in self.objects.iter_mut().filter(|obj| ids.contains(&obj.id)) {
            set_stroke(obj, color);
        }
    }

    /// Sets the fill color of the given objects.
    ///
    /// A no-op (not an error) for variants without a fillable interior,
    /// such as lines and crosses.
    pub fn set_fill_color(&mut self, ids: &[ObjectId], color: &str) {
        for obj in self.objects.iter_mut().filter(|obj| ids.contains(&obj.id)) {
            set_fill(obj, color);
        }
    }

    /// Allocates a fresh object id without inserting anything.
    ///
    /// For codecs that rebuild nested structures (group members) and need
    /// ids minted by the scene so uniqueness is preserved.
    pub fn allocate_id(&mut self) -> ObjectId {
        self.next_id += 1;
        ObjectId(self.next_id)
    }
}

fn set_stroke(obj: &mut SceneObject, color: &str) {
    if let ObjectKind::Group { members } = &mut obj.kind {
        for member in members {
            set_stroke(member, color);
        }
        return;
    }
    obj.stroke_color = color.to_owned();
    // Text renders entirely in its color.
    if let ObjectKind::Text { .. } = obj.kind {
        obj.fill_color = Some(color.to_owned());
    }
}

fn set_fill(obj: &mut SceneObject, color: &str) {
    if let ObjectKind::Group { members } = &mut obj.kind {
        for member in members {
            set_fill(member, color);
        }
        return;
    }
    if obj.kind.has_fill() {
        obj.fill_color = Some(color.to_owned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn black() -> String {
        "#000000".to_owned()
    }

    #[test]
    fn insert_appends_at_top_and_selects() {
        let mut scene = Scene::new();
        let a = scene.add_shape(ShapeKind::Rectangle, black(), None);
        let b = scene.add_shape(ShapeKind::Circle, black(), None);
        assert_eq!(scene.z_order(a), Some(0));
        assert_eq!(scene.z_order(b), Some(1));
        assert_eq!(scene.selection().items(), &[b]);
    }

    #[test]
    fn remove_prunes_selection() {
        let mut scene = Scene::new();
        let a = scene.add_shape(ShapeKind::Rectangle, black(), None);
        let b = scene.add_shape(ShapeKind::Circle, black(), None);
        scene.select(&[a, b]);
        scene.remove_objects(&[b]);
        assert_eq!(scene.selection().items(), &[a]);
        assert!(scene.object(b).is_none());
    }

    #[test]
    fn stale_ids_are_ignored_without_mutation() {
        let mut scene = Scene::new();
        let a = scene.add_shape(ShapeKind::Rectangle, black(), None);
        scene.remove_objects(&[a]);

        let before = scene.clone();
        scene.remove_objects(&[a]);
        scene.bring_to_front(&[a]);
        scene.set_stroke_color(&[a], "#ff0000");
        assert_eq!(scene.objects(), before.objects());
        assert_eq!(scene.selection().items(), before.selection().items());
    }

    #[test]
    fn bring_to_front_is_monotonic_and_order_preserving() {
        let mut scene = Scene::new();
        let a = scene.add_shape(ShapeKind::Rectangle, black(), None);
        let b = scene.add_shape(ShapeKind::Circle, black(), None);
        let c = scene.add_shape(ShapeKind::Triangle, black(), None);
        let d = scene.add_shape(ShapeKind::Line, black(), None);

        scene.bring_to_front(&[a, c]);

        // Moved ids keep their relative order and beat every unmoved id.
        assert!(scene.z_order(a).unwrap() < scene.z_order(c).unwrap());
        for moved in [a, c] {
            for unmoved in [b, d] {
                assert!(scene.z_order(moved).unwrap() > scene.z_order(unmoved).unwrap());
            }
        }
    }

    #[test]
    fn send_to_back_mirrors_bring_to_front() {
        let mut scene = Scene::new();
        let a = scene.add_shape(ShapeKind::Rectangle, black(), None);
        let b = scene.add_shape(ShapeKind::Circle, black(), None);
        let c = scene.add_shape(ShapeKind::Triangle, black(), None);

        scene.send_to_back(&[c, b]);
        assert!(scene.z_order(b).unwrap() < scene.z_order(c).unwrap());
        assert!(scene.z_order(c).unwrap() < scene.z_order(a).unwrap());
    }

    #[test]
    fn group_freezes_members_relative_to_bounding_origin() {
        let mut scene = Scene::new();
        let a = scene.add_shape(ShapeKind::Rectangle, black(), None);
        let b = scene.add_shape(ShapeKind::Circle, black(), None);
        scene.objects_mut()[0].position = Point::new(10.0, 20.0);
        scene.objects_mut()[1].position = Point::new(110.0, 70.0);

        let group = scene.group(&[a, b]).unwrap();
        assert_eq!(scene.len(), 1);
        assert_eq!(scene.selection().items(), &[group]);

        let group_obj = scene.object(group).unwrap();
        assert_eq!(group_obj.position, Point::new(10.0, 20.0));
        let ObjectKind::Group { members } = &group_obj.kind else {
            panic!("expected a group");
        };
        assert_eq!(members.len(), 2);
        assert_eq!(members[0].id, a);
        assert_eq!(members[0].position, Point::new(0.0, 0.0));
        assert_eq!(members[1].position, Point::new(100.0, 50.0));
        // Extent spans the circle's far corner: 110 + 100 - 10 = 200.
        assert_eq!(group_obj.size, Size::new(200.0, 150.0));
    }

    #[test]
    fn group_of_one_is_a_no_op() {
        let mut scene = Scene::new();
        let a = scene.add_shape(ShapeKind::Rectangle, black(), None);
        assert!(scene.group(&[a]).is_none());
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn fill_color_is_a_no_op_for_lines() {
        let mut scene = Scene::new();
        let line = scene.add_shape(ShapeKind::Line, black(), None);
        scene.set_fill_color(&[line], "#00ff00");
        assert_eq!(scene.object(line).unwrap().fill_color, None);

        scene.set_stroke_color(&[line], "#00ff00");
        assert_eq!(scene.object(line).unwrap().stroke_color, "#00ff00");
    }

    #[test]
    fn text_color_tracks_stroke() {
        let mut scene = Scene::new();
        let text = scene.add_text(black(), "hello");
        scene.set_stroke_color(&[text], "#0000ff");
        let obj = scene.object(text).unwrap();
        assert_eq!(obj.stroke_color, "#0000ff");
        assert_eq!(obj.fill_color.as_deref(), Some("#0000ff"));
    }

    #[test]
    fn replace_background_discards_annotations() {
        let mut scene = Scene::new();
        scene.add_shape(ShapeKind::Rectangle, black(), None);
        scene.replace_background(Background {
            source_url: "img://one".to_owned(),
            natural_size: Size::new(1000.0, 500.0),
            placement: Placement::IDENTITY,
        });
        assert!(scene.is_empty());
        assert!(scene.selection().is_empty());
        assert!(scene.background().is_some());
    }

    #[test]
    fn ids_are_never_reused() {
        let mut scene = Scene::new();
        let a = scene.add_shape(ShapeKind::Rectangle, black(), None);
        scene.remove_objects(&[a]);
        let b = scene.add_shape(ShapeKind::Circle, black(), None);
        assert_ne!(a, b);
    }
}
