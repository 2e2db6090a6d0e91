// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Easel Editor: the command facade a UI layer drives.
//!
//! [`Editor`] owns the whole editing session: the scene store, the viewport
//! fit engine, the crop session, a single-step undo slot, and the
//! bookkeeping for asynchronous background loads. UI glue forwards discrete
//! commands ("add rectangle", "set stroke color", raw pointer coordinates)
//! and redraws from [`Editor::scene`] whenever [`Editor::revision`] has
//! moved.
//!
//! ## Command model
//!
//! Every command executes synchronously on the caller's thread and leaves
//! the scene in a consistent, fully-computed state. Commands that cannot
//! apply (a stale selection, a degenerate crop, a command issued mid-crop)
//! are ignored rather than surfaced: the user-visible contract is that the
//! last good scene keeps showing. The revision counter bumps only when the
//! scene actually changed.
//!
//! ## Background loading
//!
//! Fetching image bytes is the one inherently asynchronous operation. It is
//! modeled as a ticket: [`Editor::begin_load_background`] hands out a
//! [`LoadTicket`] and invalidates any outstanding one; the eventual
//! completion is applied only if its ticket is still current, so a slow old
//! load can never clobber a newer background. A failed load leaves the
//! prior scene fully intact and selectable.
//!
//! ## Minimal example
//!
//! ```rust
//! use easel_editor::Editor;
//! use easel_scene::ShapeKind;
//! use kurbo::Size;
//!
//! let mut editor = Editor::new(Size::new(400.0, 400.0));
//! let ticket = editor.begin_load_background("img://photo");
//! editor.complete_load_background(ticket, Size::new(1000.0, 500.0)).unwrap();
//!
//! editor.add_shape(ShapeKind::Rectangle, "#000000", Some("#ff0000".into()));
//! assert_eq!(editor.scene().len(), 1);
//! ```

use kurbo::{Point, Size};
use tracing::{debug, warn};

use easel_crop::CropSession;
use easel_geometry::GeometryError;
use easel_scene::{defaults, ObjectId, Scene, ShapeKind};
use easel_snapshot::{capture, restore, Snapshot, SnapshotError};
use easel_view::View;

/// Errors surfaced by editor commands.
///
/// Most command-level misuse (stale ids, degenerate crops) is absorbed as a
/// no-op; what remains are genuine failures the UI should report.
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    /// A size with non-positive dimensions was supplied.
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    /// Snapshot encode/decode failed.
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    /// A background load reported failure. The previous scene is still
    /// valid; the load can be retried.
    #[error("background load failed for {source_url}")]
    BackgroundLoadFailed {
        /// The URL whose load failed.
        source_url: String,
    },
}

/// Handle for one background load request.
///
/// Only the most recently issued ticket is honored at completion time.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct LoadTicket(u64);

#[derive(Clone, Debug)]
struct PendingLoad {
    generation: u64,
    source_url: String,
}

/// The editing session facade.
///
/// See the [crate docs](crate) for the command model.
#[derive(Debug)]
pub struct Editor {
    scene: Scene,
    view: View,
    crop: CropSession,
    free_drawing: bool,
    brush_color: String,
    undo_slot: Option<Snapshot>,
    pending_load: Option<PendingLoad>,
    load_generation: u64,
    revision: u64,
}

impl Editor {
    /// Creates an editor with an empty scene at the given viewport size.
    #[must_use]
    pub fn new(viewport: Size) -> Self {
        Self {
            scene: Scene::new(),
            view: View::new(viewport),
            crop: CropSession::new(),
            free_drawing: false,
            brush_color: "#000000".to_owned(),
            undo_slot: None,
            pending_load: None,
            load_generation: 0,
            revision: 0,
        }
    }

    /// Returns the current scene, for rendering and persistence.
    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Returns the current logical viewport size.
    #[must_use]
    pub fn viewport(&self) -> Size {
        self.view.viewport()
    }

    /// Returns the scene revision counter.
    ///
    /// Bumps after every command that changed the scene; the UI's cue to
    /// redraw and, if it persists continuously, to re-capture a snapshot.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Returns `true` while a crop gesture is in progress.
    #[must_use]
    pub fn is_cropping(&self) -> bool {
        self.crop.is_active()
    }

    /// Returns `true` while free-drawing mode is on.
    #[must_use]
    pub fn is_free_drawing(&self) -> bool {
        self.free_drawing
    }

    /// Returns the current free-drawing brush color.
    #[must_use]
    pub fn brush_color(&self) -> &str {
        &self.brush_color
    }

    /// Returns the brush width the rendering surface should draw with.
    #[must_use]
    pub fn brush_width(&self) -> f64 {
        defaults::BRUSH_WIDTH
    }

    /// Whether the scene is fully resolved: no pending crop, no pending
    /// load. Exporters should only rasterize a resolved scene.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        !self.crop.is_active() && self.pending_load.is_none()
    }

    // ---- object commands -------------------------------------------------

    /// Adds a geometric shape; it becomes the sole selection.
    ///
    /// Ignored mid-crop (returns `None`).
    pub fn add_shape(
        &mut self,
        shape: ShapeKind,
        stroke_color: impl Into<String>,
        fill_color: Option<String>,
    ) -> Option<ObjectId> {
        if self.reject_while_cropping("add_shape") {
            return None;
        }
        let id = self.scene.add_shape(shape, stroke_color, fill_color);
        debug!(?shape, ?id, "added shape");
        self.touch();
        Some(id)
    }

    /// Adds a text object; it becomes the sole selection.
    pub fn add_text(
        &mut self,
        color: impl Into<String>,
        content: impl Into<String>,
    ) -> Option<ObjectId> {
        if self.reject_while_cropping("add_text") {
            return None;
        }
        let id = self.scene.add_text(color, content);
        debug!(?id, "added text");
        self.touch();
        Some(id)
    }

    /// Adds an image or pictogram at its natural size.
    ///
    /// The caller resolves the URL to pixel dimensions first; only the
    /// fetch is asynchronous, not this command.
    pub fn add_image(
        &mut self,
        source_url: impl Into<String>,
        natural_size: Size,
    ) -> Option<ObjectId> {
        if self.reject_while_cropping("add_image") {
            return None;
        }
        let id = self.scene.add_image(source_url, natural_size);
        debug!(?id, "added image");
        self.touch();
        Some(id)
    }

    /// Moves an object, as reported by the rendering surface after a drag.
    ///
    /// Stale ids are ignored.
    pub fn set_position(&mut self, id: ObjectId, position: Point) {
        let Some(obj) = self
            .scene
            .objects_mut()
            .iter_mut()
            .find(|obj| obj.id == id)
        else {
            return;
        };
        obj.position = position;
        self.touch();
    }

    /// Sets the stroke color of the selection and the free-drawing brush.
    pub fn set_stroke_color(&mut self, color: &str) {
        self.brush_color = color.to_owned();
        let ids = self.scene.selection().items().to_vec();
        if ids.is_empty() {
            return;
        }
        self.scene.set_stroke_color(&ids, color);
        self.touch();
    }

    /// Sets the fill color of the selection.
    ///
    /// A no-op for selected variants without a fillable interior.
    pub fn set_fill_color(&mut self, color: &str) {
        let ids = self.scene.selection().items().to_vec();
        if ids.is_empty() {
            return;
        }
        self.scene.set_fill_color(&ids, color);
        self.touch();
    }

    /// Moves the selection to the top of the paint order.
    pub fn bring_to_front(&mut self) {
        let ids = self.scene.selection().items().to_vec();
        if ids.is_empty() {
            return;
        }
        self.scene.bring_to_front(&ids);
        self.touch();
    }

    /// Moves the selection to the bottom of the paint order.
    pub fn send_to_back(&mut self) {
        let ids = self.scene.selection().items().to_vec();
        if ids.is_empty() {
            return;
        }
        self.scene.send_to_back(&ids);
        self.touch();
    }

    /// Collapses the selection into a single group object.
    pub fn group(&mut self) -> Option<ObjectId> {
        let ids = self.scene.selection().items().to_vec();
        if ids.len() < 2 {
            return None;
        }
        self.stash_undo();
        let group = self.scene.group(&ids);
        if group.is_some() {
            self.touch();
        }
        group
    }

    /// Deletes the selected objects.
    pub fn delete_selection(&mut self) {
        let ids = self.scene.selection().items().to_vec();
        if ids.is_empty() {
            return;
        }
        self.stash_undo();
        self.scene.remove_objects(&ids);
        debug!(count = ids.len(), "deleted selection");
        self.touch();
    }

    /// Replaces the selection with the live subset of `ids`.
    ///
    /// Ignored mid-crop: object selection is disabled for the duration of a
    /// crop gesture.
    pub fn select(&mut self, ids: &[ObjectId]) {
        if self.reject_while_cropping("select") {
            return;
        }
        let before = self.scene.selection().revision();
        self.scene.select(ids);
        if self.scene.selection().revision() != before {
            self.touch();
        }
    }

    /// Selects the object at the given z-order index.
    pub fn select_item(&mut self, index: usize) {
        if self.reject_while_cropping("select_item") {
            return;
        }
        let before = self.scene.selection().revision();
        self.scene.select_item(index);
        if self.scene.selection().revision() != before {
            self.touch();
        }
    }

    /// Toggles free-drawing mode.
    ///
    /// The mode and brush state live here; stroke geometry is produced by
    /// the external rendering surface while the mode is on.
    pub fn toggle_free_drawing(&mut self) {
        self.free_drawing = !self.free_drawing;
        debug!(on = self.free_drawing, "toggled free drawing");
    }

    /// Sets the free-drawing brush color directly.
    pub fn set_brush_color(&mut self, color: &str) {
        self.brush_color = color.to_owned();
    }

    // ---- crop ------------------------------------------------------------

    /// Starts a crop gesture.
    ///
    /// Snapshots the scene into the undo slot, clears and disables object
    /// selection, and arms the crop session for pointer events.
    pub fn begin_crop(&mut self) {
        if !self.crop.begin() {
            return;
        }
        self.stash_undo();
        self.scene.selection_mut().clear();
        debug!("crop started");
        self.touch();
    }

    /// Forwards a raw pointer-down to the active crop gesture.
    pub fn pointer_down(&mut self, point: Point) {
        if self.crop.is_active() {
            self.crop.pointer_down(point);
            self.touch();
        }
    }

    /// Forwards a raw pointer-move to the active crop gesture.
    pub fn pointer_move(&mut self, point: Point) {
        if self.crop.is_active() {
            self.crop.pointer_move(point);
            self.touch();
        }
    }

    /// Ends the crop gesture, committing if a real area was selected.
    ///
    /// A degenerate gesture (no area ever dragged out) cancels silently:
    /// the scene geometry is guaranteed untouched either way the commit
    /// cannot proceed.
    pub fn pointer_up(&mut self, _point: Point) {
        if !self.crop.is_active() {
            return;
        }
        match self.crop.commit(&mut self.scene, &mut self.view) {
            Ok(viewport) => {
                debug!(?viewport, "crop committed");
            }
            Err(err) => {
                warn!(%err, "crop rejected, cancelling");
                self.crop.cancel();
            }
        }
        self.touch();
    }

    /// Abandons the crop gesture without touching the scene.
    pub fn cancel_crop(&mut self) {
        if !self.crop.is_active() {
            return;
        }
        self.crop.cancel();
        debug!("crop cancelled");
        self.touch();
    }

    // ---- undo / snapshots -------------------------------------------------

    /// Restores the previously stashed scene, if any.
    ///
    /// Single-step: the pre-undo scene moves into the slot, so a second
    /// `undo` toggles back. Returns `false` when there is nothing to undo.
    ///
    /// # Errors
    ///
    /// [`EditorError::Snapshot`] when the stashed snapshot cannot be
    /// refitted to the current viewport; the scene is left unchanged.
    pub fn undo(&mut self) -> Result<bool, EditorError> {
        let Some(snapshot) = self.undo_slot.take() else {
            return Ok(false);
        };
        let restored = match restore(&snapshot, self.view.viewport()) {
            Ok(scene) => scene,
            Err(err) => {
                self.undo_slot = Some(snapshot);
                return Err(err.into());
            }
        };
        self.crop.cancel();
        self.undo_slot = Some(capture(&self.scene));
        self.scene = restored;
        debug!("undo applied");
        self.touch();
        Ok(true)
    }

    /// Captures the scene as a viewport-independent snapshot.
    #[must_use]
    pub fn capture_snapshot(&self) -> Snapshot {
        capture(&self.scene)
    }

    /// Replaces the scene with a restored snapshot at the current viewport.
    ///
    /// # Errors
    ///
    /// [`EditorError::Snapshot`] when the snapshot cannot be decoded or
    /// refitted; the scene is left unchanged.
    pub fn apply_snapshot(&mut self, snapshot: &Snapshot) -> Result<(), EditorError> {
        let restored = restore(snapshot, self.view.viewport())?;
        self.stash_undo();
        self.crop.cancel();
        self.scene = restored;
        debug!("snapshot applied");
        self.touch();
        Ok(())
    }

    // ---- viewport and background ------------------------------------------

    /// Resizes the viewport, refitting the scene to it.
    ///
    /// An active crop gesture is cancelled first: its rectangle was
    /// expressed in the old viewport's coordinates.
    ///
    /// # Errors
    ///
    /// [`EditorError::Geometry`] for degenerate sizes; nothing changes.
    pub fn set_viewport(&mut self, size: Size) -> Result<(), EditorError> {
        if self.crop.is_active() {
            self.crop.cancel();
        }
        self.view.set_viewport(&mut self.scene, size)?;
        debug!(?size, "viewport resized");
        self.touch();
        Ok(())
    }

    /// Requests a background load, invalidating any outstanding request.
    ///
    /// The returned ticket must accompany the eventual completion. Issuing
    /// a new request makes every older ticket stale; a stale completion is
    /// discarded rather than applied.
    pub fn begin_load_background(&mut self, source_url: impl Into<String>) -> LoadTicket {
        self.load_generation += 1;
        let source_url = source_url.into();
        debug!(%source_url, generation = self.load_generation, "background load requested");
        self.pending_load = Some(PendingLoad {
            generation: self.load_generation,
            source_url,
        });
        LoadTicket(self.load_generation)
    }

    /// Applies a finished background load.
    ///
    /// Returns `Ok(true)` when the background was replaced, `Ok(false)`
    /// when the ticket was stale and the result discarded.
    ///
    /// # Errors
    ///
    /// [`EditorError::Geometry`] for a degenerate image size; the previous
    /// scene stays valid and the load may be retried.
    pub fn complete_load_background(
        &mut self,
        ticket: LoadTicket,
        natural_size: Size,
    ) -> Result<bool, EditorError> {
        let Some(pending) = self.pending_load.as_ref() else {
            warn!(?ticket, "load completion with no pending load, discarding");
            return Ok(false);
        };
        if pending.generation != ticket.0 {
            warn!(?ticket, current = pending.generation, "stale load completion discarded");
            return Ok(false);
        }
        let source_url = pending.source_url.clone();

        let undo = capture(&self.scene);
        self.view
            .load_background(&mut self.scene, source_url, natural_size)?;
        self.undo_slot = Some(undo);
        self.pending_load = None;
        self.crop.cancel();
        debug!("background replaced");
        self.touch();
        Ok(true)
    }

    /// Records a failed background load.
    ///
    /// The prior scene remains valid and selectable.
    ///
    /// # Errors
    ///
    /// [`EditorError::BackgroundLoadFailed`] when the ticket was current
    /// (so the UI can offer a retry); stale failures are silently dropped.
    pub fn fail_load_background(&mut self, ticket: LoadTicket) -> Result<(), EditorError> {
        match self.pending_load.as_ref() {
            Some(pending) if pending.generation == ticket.0 => {
                let source_url = pending.source_url.clone();
                self.pending_load = None;
                warn!(%source_url, "background load failed");
                Err(EditorError::BackgroundLoadFailed { source_url })
            }
            _ => Ok(()),
        }
    }

    // ---- internals --------------------------------------------------------

    fn stash_undo(&mut self) {
        self.undo_slot = Some(capture(&self.scene));
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    fn reject_while_cropping(&self, command: &str) -> bool {
        if self.crop.is_active() {
            warn!(command, "command ignored during crop gesture");
            return true;
        }
        false
    }
}
