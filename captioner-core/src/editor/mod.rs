//! # Editor
//!
//! The single owner of the live [`Document`] and its [`History`]. Every change goes through
//! here, in one of three flavors:
//!
//! * **Committed** writes are undoable. A history checkpoint is taken before the change is
//!   applied, and `present` is brought up to date afterwards.
//! * **Live** writes stream transient gesture updates. They only touch the live document,
//!   so a following commit records the state from before the whole gesture.
//! * **Untracked** writes (selection, custom fonts, and locks by default) change the live
//!   document and `present` without adding an undo step.
//!
//! Observers subscribe with [`Editor::listen`] and are told what kind of change happened,
//! after it happened.

pub mod config;
pub mod writer;

use std::sync::Arc;

pub use config::{EditorConfig, LockPolicy};
pub use writer::DocumentWriter;

use crate::{
    history::History,
    id::LayerID,
    state::{
        document::{CanvasDimensions, CustomFont, Document},
        layer::{create_default_layer, LayerPatch, TextLayer},
    },
};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EditorMessage {
    /// A gesture streamed a transient change. Nothing was recorded.
    Live,
    /// An undoable change was recorded.
    Committed,
    /// Selection, fonts, or lock state changed without being recorded.
    Untracked,
    Undo,
    Redo,
    /// Everything was discarded and the editor is empty.
    Reset,
}

/// Proof that an image load was started, to be handed back when it finishes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ImageLoadTicket(u64);

/// A decoded background image, ready to be installed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageSource {
    pub data_url: Arc<str>,
    pub dimensions: CanvasDimensions,
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageLoadError {
    #[error("image load superseded by a newer load or reset")]
    Stale,
    #[error("image has no pixels")]
    Empty,
}

pub struct Editor {
    document: Document,
    history: History,
    config: EditorConfig,
    /// One-shot request for the renderer to start dragging a freshly selected layer.
    start_drag: Option<LayerID>,
    /// The live document holds gesture updates that `present` doesn't have yet.
    live_pending: bool,
    image_generation: u64,
    on_change: bus::Bus<EditorMessage>,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl std::fmt::Debug for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("document", &self.document)
            .field("history", &self.history.counts())
            .field("config", &self.config)
            .field("start_drag", &self.start_drag)
            .finish_non_exhaustive()
    }
}

impl Editor {
    #[must_use]
    pub fn new(config: EditorConfig) -> Self {
        Self::restore(Document::default(), History::default(), config)
    }
    /// Resume from a previously saved document and history.
    #[must_use]
    ///
    /// Saved state may have been edited by hand, so every layer is brought back into its
    /// valid ranges, repeated IDs are replaced, and a dangling selection is dropped. The
    /// same goes for every history snapshot.
    pub fn restore(mut document: Document, mut history: History, config: EditorConfig) -> Self {
        let fixes = document.sanitize();
        if fixes > 0 {
            log::warn!("repaired {fixes} problems in restored document");
        }
        let fixes: usize = history.documents_mut().map(Document::sanitize).sum();
        if fixes > 0 {
            log::warn!("repaired {fixes} problems in restored history");
        }
        history.set_depth(config.history_depth);
        history.sync(&document);
        Self {
            document,
            history,
            config,
            start_drag: None,
            live_pending: false,
            image_generation: 0,
            on_change: bus::Bus::new(256),
        }
    }
    /// The live, currently rendered document.
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }
    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }
    #[must_use]
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }
    pub fn set_config(&mut self, config: EditorConfig) {
        self.history.set_depth(config.history_depth);
        self.config = config;
    }
    /// Get notified after every change. Messages are dropped for readers that lag too far
    /// behind, so a reader should only use them as a hint to go look at the editor.
    pub fn listen(&mut self) -> bus::BusReader<EditorMessage> {
        self.on_change.add_rx()
    }
    fn notify(&mut self, message: EditorMessage) {
        if self.on_change.try_broadcast(message).is_err() {
            log::warn!("change listener full, dropped {message:?}");
        }
    }
    fn settle(&mut self) {
        if self
            .start_drag
            .is_some_and(|id| self.document.layer(id).is_none())
        {
            self.start_drag = None;
        }
    }
    /// Perform an undoable change. Writes in one closure form a single undo step named
    /// `label`. If the closure changes nothing, nothing is recorded.
    pub fn commit_with<T>(
        &mut self,
        label: &str,
        write: impl FnOnce(&mut DocumentWriter<'_>) -> T,
    ) -> T {
        let mut writer = DocumentWriter::recording(&mut self.document, &mut self.history, label);
        let result = write(&mut writer);
        if writer.changed() {
            self.history.sync(&self.document);
            self.live_pending = false;
            self.settle();
            log::trace!("committed {label:?}, {} layers", self.document.layers.len());
            self.notify(EditorMessage::Committed);
        }
        result
    }
    /// Perform a change that is not recorded in history.
    pub fn write_untracked<T>(&mut self, write: impl FnOnce(&mut DocumentWriter<'_>) -> T) -> T {
        let mut writer = DocumentWriter::unrecorded(&mut self.document);
        let result = write(&mut writer);
        if writer.changed() {
            if self.live_pending {
                // Keep the gesture's starting point as the state its commit will record.
                self.history.sync_untracked(&self.document);
            } else {
                self.history.sync(&self.document);
            }
            self.settle();
            self.notify(EditorMessage::Untracked);
        }
        result
    }
    /// Transient update from an in-progress gesture.
    pub fn update_live(&mut self, patch: &LayerPatch) -> bool {
        let changed = DocumentWriter::unrecorded(&mut self.document).patch(patch);
        if changed {
            self.live_pending = true;
            self.notify(EditorMessage::Live);
        }
        changed
    }
    /// Undoable update of one layer.
    pub fn update(&mut self, patch: &LayerPatch) -> bool {
        self.update_labelled(patch, "edit")
    }
    pub fn update_labelled(&mut self, patch: &LayerPatch, label: &str) -> bool {
        self.commit_with(label, |writer| writer.patch(patch))
    }
    /// Add a default layer on top, cascaded from the default origin, and select it.
    pub fn add_layer(&mut self) -> LayerID {
        let id = LayerID::new();
        let layer = create_default_layer(id, self.config.add_offset(self.document.layers.len()));
        self.commit_with("add layer", |writer| {
            writer.push_layer(layer);
            writer.select(Some(id));
        });
        id
    }
    /// Copy the selected layer on top, offset from its source, select it and ask the
    /// renderer to start dragging it.
    pub fn duplicate_selected(&mut self) -> Option<LayerID> {
        let source = self.document.selected_layer()?;
        let id = LayerID::new();
        let offset = self.config.duplicate_offset;
        let copy = TextLayer {
            id,
            x: source.x + offset,
            y: source.y + offset,
            ..source.clone()
        };
        let draggable = !copy.locked;
        self.commit_with("duplicate layer", |writer| {
            writer.push_layer(copy);
            writer.select(Some(id));
        });
        if draggable {
            self.start_drag = Some(id);
        }
        Some(id)
    }
    /// Remove the selected layer. The layer that slides into its z-index (or the new top
    /// layer, if it was on top) becomes selected.
    pub fn delete_selected(&mut self) -> Option<TextLayer> {
        let id = self.document.selected_layer_id?;
        self.commit_with("delete layer", |writer| {
            let (index, removed) = writer.remove_layer(id)?;
            let next = writer
                .layers
                .get(index.min(writer.layers.len().saturating_sub(1)))
                .map(|layer| layer.id);
            writer.select(next);
            Some(removed)
        })
    }
    /// Rearrange the z-order, back to front. See [`DocumentWriter::reorder`].
    pub fn reorder(&mut self, order: &[LayerID]) -> bool {
        self.commit_with("reorder layers", |writer| writer.reorder(order))
    }
    /// Drop `dragged` onto `target`'s place in the layer list.
    pub fn move_layer_onto(&mut self, dragged: LayerID, target: LayerID) -> bool {
        let Some(index) = self.document.index_of(target) else {
            return false;
        };
        self.commit_with("reorder layers", |writer| writer.move_layer(dragged, index))
    }
    /// Move a layer one step towards the top.
    pub fn bring_forward(&mut self, id: LayerID) -> bool {
        let Some(index) = self.document.index_of(id) else {
            return false;
        };
        self.commit_with("bring forward", |writer| writer.move_layer(id, index + 1))
    }
    /// Move a layer one step towards the bottom.
    pub fn send_backward(&mut self, id: LayerID) -> bool {
        match self.document.index_of(id) {
            Some(index) if index > 0 => {
                self.commit_with("send backward", |writer| writer.move_layer(id, index - 1))
            }
            _ => false,
        }
    }
    pub fn toggle_bold(&mut self, id: LayerID) -> bool {
        let Some(layer) = self.document.layer(id) else {
            return false;
        };
        let patch = LayerPatch::new(id).font_style(layer.font_style.toggle_bold());
        self.update(&patch)
    }
    pub fn toggle_italic(&mut self, id: LayerID) -> bool {
        let Some(layer) = self.document.layer(id) else {
            return false;
        };
        let patch = LayerPatch::new(id).font_style(layer.font_style.toggle_italic());
        self.update(&patch)
    }
    pub fn toggle_lock(&mut self, id: LayerID) -> bool {
        match self.document.layer(id) {
            Some(layer) => self.set_lock(id, !layer.locked),
            None => false,
        }
    }
    /// Lock or unlock a layer, recorded or not according to [`LockPolicy`].
    pub fn set_lock(&mut self, id: LayerID, locked: bool) -> bool {
        if self.document.layer(id).map(|layer| layer.locked) != Some(!locked) {
            return false;
        }
        let patch = LayerPatch::new(id).locked(locked);
        if locked && self.start_drag == Some(id) {
            self.start_drag = None;
        }
        match self.config.lock_policy {
            LockPolicy::Untracked => self.write_untracked(|writer| writer.patch(&patch)),
            LockPolicy::Undoable => {
                let label = if locked { "lock layer" } else { "unlock layer" };
                self.commit_with(label, |writer| writer.patch(&patch))
            }
        }
    }
    /// Select a layer, or clear the selection with `None`. Unknown IDs are ignored.
    pub fn select(&mut self, id: Option<LayerID>) -> bool {
        self.write_untracked(|writer| writer.select(id))
    }
    /// Select a layer and ask the renderer to start dragging it right away, as when
    /// a pointer goes down on an unselected layer.
    pub fn select_and_prime_drag(&mut self, id: LayerID) -> bool {
        let Some(layer) = self.document.layer(id) else {
            return false;
        };
        if !layer.locked {
            self.start_drag = Some(id);
        }
        self.select(Some(id));
        true
    }
    /// The pending drag request, if any, without consuming it.
    #[must_use]
    pub fn start_drag(&self) -> Option<LayerID> {
        self.start_drag
    }
    /// Consume the pending drag request. Yields each request at most once.
    pub fn take_start_drag(&mut self) -> Option<LayerID> {
        self.start_drag.take()
    }
    /// Register a custom font. Fonts are assets of the document rather than edits, so this
    /// is not recorded and survives undo.
    pub fn add_custom_font(&mut self, font: CustomFont) -> bool {
        log::info!("adding custom font {:?}", font.family);
        self.write_untracked(|writer| writer.insert_font(font))
    }
    /// Start replacing the background image. Any load started earlier is superseded.
    pub fn begin_image_load(&mut self) -> ImageLoadTicket {
        self.image_generation += 1;
        ImageLoadTicket(self.image_generation)
    }
    /// Install a decoded image together with its dimensions, as one undoable step.
    pub fn finish_image_load(
        &mut self,
        ticket: ImageLoadTicket,
        source: ImageSource,
    ) -> Result<(), ImageLoadError> {
        if ticket.0 != self.image_generation {
            log::warn!("discarding stale image load {ticket:?}");
            return Err(ImageLoadError::Stale);
        }
        if source.dimensions.is_empty() {
            return Err(ImageLoadError::Empty);
        }
        self.commit_with("replace image", |writer| {
            writer.set_image(source.data_url, source.dimensions);
        });
        Ok(())
    }
    pub fn clear_image(&mut self) -> bool {
        self.image_generation += 1;
        self.commit_with("remove image", |writer| writer.clear_image())
    }
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }
    /// `(undo steps, redo steps)`
    #[must_use]
    pub fn history_counts(&self) -> (usize, usize) {
        self.history.counts()
    }
    #[must_use]
    pub fn undo_label(&self) -> Option<&str> {
        self.history.undo_label()
    }
    #[must_use]
    pub fn redo_label(&self) -> Option<&str> {
        self.history.redo_label()
    }
    pub fn undo(&mut self) -> bool {
        if !self.history.undo() {
            return false;
        }
        self.load_present(EditorMessage::Undo);
        true
    }
    pub fn redo(&mut self) -> bool {
        if !self.history.redo() {
            return false;
        }
        self.load_present(EditorMessage::Redo);
        true
    }
    /// Make the history's `present` live, keeping the current fonts, and the current lock
    /// flags too unless locking is undoable.
    fn load_present(&mut self, message: EditorMessage) {
        let previous = std::mem::replace(&mut self.document, self.history.present().clone());
        self.document.custom_fonts = previous.custom_fonts;
        if self.config.lock_policy == LockPolicy::Untracked {
            for layer in &mut self.document.layers {
                if let Some(current) = previous.layers.iter().find(|old| old.id == layer.id) {
                    layer.locked = current.locked;
                }
            }
        }
        self.history.sync(&self.document);
        self.live_pending = false;
        self.start_drag = None;
        log::debug!("{message:?} to {} layers", self.document.layers.len());
        self.notify(message);
    }
    /// Discard the document and all history. In-flight image loads are abandoned.
    pub fn reset(&mut self) {
        self.document = Document::default();
        self.history.clear(Document::default());
        self.start_drag = None;
        self.live_pending = false;
        self.image_generation += 1;
        log::debug!("editor reset");
        self.notify(EditorMessage::Reset);
    }
}
