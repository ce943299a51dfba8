//! # Autosave
//!
//! Restores the editor from a [`KeyValueStore`] at startup, then writes it back whenever it
//! changes. Failing to save is never fatal: the user gets a warning and keeps editing, and
//! the next change tries again.

use super::{
    persist::{self, PersistedRecord, STORAGE_KEY},
    storage::{KeyValueStore, StorageError},
};
use crate::editor::{Editor, EditorConfig, EditorMessage};

/// Something the user should be told about a failed save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutosaveWarning {
    pub message: String,
    /// Size of the state that failed to save.
    pub bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Nothing changed since the last save.
    Idle,
    Saved { bytes: u64 },
    Failed(AutosaveWarning),
}

/// Restore the editor saved under [`STORAGE_KEY`], or start empty if there is nothing
/// usable there.
pub fn load_editor<S: KeyValueStore + ?Sized>(store: &S, config: EditorConfig) -> Editor {
    let json = match store.get(STORAGE_KEY) {
        Ok(Some(json)) => json,
        Ok(None) => {
            log::info!("no saved state, starting empty");
            return Editor::new(config);
        }
        Err(err) => {
            log::warn!("couldn't read saved state, starting empty: {err}");
            return Editor::new(config);
        }
    };
    match PersistedRecord::from_json(&json) {
        Ok(record) => {
            log::info!(
                "restored {} layers and {} undo steps",
                record.document.layers.len(),
                record.history.counts().0
            );
            record.into_editor(config)
        }
        Err(err) => {
            log::warn!("discarding saved state: {err}");
            Editor::new(config)
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn quota_warning(bytes: u64) -> String {
    format!(
        "Autosave paused: the current image and layers ({}) are too large to save. \
         Editing still works. To resume saving, use a smaller image, a smaller canvas, \
         or fewer layers.",
        human_bytes::human_bytes(bytes as f64)
    )
}

pub struct Autosave<S: KeyValueStore> {
    store: S,
    listener: bus::BusReader<EditorMessage>,
    paused: bool,
}

impl<S: KeyValueStore> Autosave<S> {
    /// Start watching `editor` for changes to write into `store`.
    pub fn attach(store: S, editor: &mut Editor) -> Self {
        Self {
            store,
            listener: editor.listen(),
            paused: false,
        }
    }
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }
    /// Whether the last save attempt failed.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }
    /// Drain change notifications and save at most once if any warrant it. Transient
    /// gesture updates alone don't, the commit that ends the gesture will.
    pub fn pump(&mut self, editor: &Editor) -> SaveOutcome {
        let mut dirty = false;
        while let Ok(message) = self.listener.try_recv() {
            dirty |= message != EditorMessage::Live;
        }
        if dirty {
            self.save_now(editor)
        } else {
            SaveOutcome::Idle
        }
    }
    /// Save unconditionally.
    pub fn save_now(&mut self, editor: &Editor) -> SaveOutcome {
        let json = match persist::to_json(editor) {
            Ok(json) => json,
            Err(err) => {
                log::error!("couldn't serialize editor state: {err}");
                self.paused = true;
                return SaveOutcome::Failed(AutosaveWarning {
                    message: format!("Autosave failed: {err}"),
                    bytes: 0,
                });
            }
        };
        let bytes = u64::try_from(json.len()).unwrap_or(u64::MAX);
        match self.store.set(STORAGE_KEY, &json) {
            Ok(()) => {
                if self.paused {
                    log::info!("autosave resumed");
                }
                self.paused = false;
                log::trace!("saved {bytes} bytes");
                SaveOutcome::Saved { bytes }
            }
            Err(err) => {
                log::warn!("autosave failed: {err}");
                self.paused = true;
                let message = if err.is_quota() {
                    quota_warning(bytes)
                } else {
                    format!("Autosave failed: {err}")
                };
                SaveOutcome::Failed(AutosaveWarning { message, bytes })
            }
        }
    }
    /// Start the editor over and forget the saved state. Storage stays empty until the
    /// next change.
    ///
    /// The editor is reset even if the store can't remove the saved state. That error is
    /// returned afterwards, to be shown as a warning.
    pub fn reset(&mut self, editor: &mut Editor) -> Result<(), StorageError> {
        let removed = self.store.remove(STORAGE_KEY);
        editor.reset();
        while self.listener.try_recv().is_ok() {}
        self.paused = false;
        if let Err(err) = &removed {
            log::warn!("couldn't remove saved state: {err}");
        }
        removed
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{io::storage::MemoryStore, state::layer::LayerPatch};

    #[test]
    fn saves_on_change_and_restores() {
        let store = MemoryStore::new();
        let mut editor = load_editor(&store, EditorConfig::default());
        let mut autosave = Autosave::attach(&store, &mut editor);
        assert_eq!(autosave.pump(&editor), SaveOutcome::Idle);

        let id = editor.add_layer();
        editor.update(&LayerPatch::new(id).text("Hello"));
        assert!(matches!(autosave.pump(&editor), SaveOutcome::Saved { .. }));
        assert_eq!(autosave.pump(&editor), SaveOutcome::Idle);

        let restored = load_editor(&store, EditorConfig::default());
        assert_eq!(restored.document(), editor.document());
        assert_eq!(restored.history_counts(), (2, 0));
    }
    #[test]
    fn live_updates_alone_dont_save() {
        let store = MemoryStore::new();
        let mut editor = Editor::default();
        let id = editor.add_layer();
        let mut autosave = Autosave::attach(&store, &mut editor);
        editor.update_live(&LayerPatch::new(id).x(5.0));
        assert_eq!(autosave.pump(&editor), SaveOutcome::Idle);
    }
    #[test]
    fn quota_is_a_warning() {
        let store = MemoryStore::with_quota(64);
        let mut editor = Editor::default();
        let mut autosave = Autosave::attach(&store, &mut editor);
        let id = editor.add_layer();

        let SaveOutcome::Failed(warning) = autosave.pump(&editor) else {
            panic!("expected the save to fail");
        };
        assert!(warning.message.contains("smaller image"), "{}", warning.message);
        assert!(autosave.is_paused());

        // Editing carries on.
        assert!(editor.update(&LayerPatch::new(id).text("still editing")));
        assert!(matches!(autosave.pump(&editor), SaveOutcome::Failed(_)));
        assert_eq!(editor.document().layers[0].text, "still editing");
    }
    #[test]
    fn version_mismatch_starts_empty() {
        let store = MemoryStore::new();
        store
            .set(STORAGE_KEY, r#"{"version": 99, "layers": [1, 2, 3]}"#)
            .unwrap();
        let editor = load_editor(&store, EditorConfig::default());
        assert!(editor.document().layers.is_empty());
        assert_eq!(editor.history_counts(), (0, 0));
    }
    #[test]
    fn garbage_starts_empty() {
        let store = MemoryStore::new();
        store.set(STORAGE_KEY, "<html>").unwrap();
        let editor = load_editor(&store, EditorConfig::default());
        assert_eq!(editor.document(), &crate::state::document::Document::default());
    }
    #[test]
    fn reset_clears_storage() {
        let store = MemoryStore::new();
        let mut editor = Editor::default();
        let mut autosave = Autosave::attach(&store, &mut editor);
        editor.add_layer();
        autosave.pump(&editor);
        assert!(store.get(STORAGE_KEY).unwrap().is_some());

        autosave.reset(&mut editor).unwrap();
        assert!(store.get(STORAGE_KEY).unwrap().is_none());
        assert!(editor.document().layers.is_empty());
        assert_eq!(autosave.pump(&editor), SaveOutcome::Idle);

        editor.add_layer();
        assert!(matches!(autosave.pump(&editor), SaveOutcome::Saved { .. }));
    }
    /// Refuses to forget anything.
    struct StuckStore(MemoryStore);
    impl KeyValueStore for StuckStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.0.get(key)
        }
        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            self.0.set(key, value)
        }
        fn remove(&self, _: &str) -> Result<(), StorageError> {
            Err(std::io::Error::from(std::io::ErrorKind::PermissionDenied).into())
        }
    }
    #[test]
    fn reset_survives_storage_failure() {
        let store = StuckStore(MemoryStore::new());
        let mut editor = Editor::default();
        let mut autosave = Autosave::attach(&store, &mut editor);
        editor.add_layer();
        autosave.pump(&editor);

        assert!(autosave.reset(&mut editor).is_err());
        assert!(editor.document().layers.is_empty());
        assert_eq!(editor.history_counts(), (0, 0));
        assert!(!autosave.is_paused());

        editor.add_layer();
        assert!(matches!(autosave.pump(&editor), SaveOutcome::Saved { .. }));
    }
    #[test]
    fn hand_edited_record_is_repaired() {
        let store = MemoryStore::new();
        let mut editor = Editor::default();
        editor.add_layer();
        editor.add_layer();
        let mut record: serde_json::Value =
            serde_json::from_str(&persist::to_json(&editor).unwrap()).unwrap();
        let layers = record["layers"].as_array_mut().unwrap();
        layers[0]["width"] = 1.into();
        layers[0]["height"] = 1.into();
        layers[0]["opacity"] = 7.into();
        layers[1]["id"] = layers[0]["id"].clone();
        store.set(STORAGE_KEY, &record.to_string()).unwrap();

        let restored = load_editor(&store, EditorConfig::default());
        let layers = &restored.document().layers;
        assert_eq!(layers.len(), 2);
        assert_eq!((layers[0].width, layers[0].height), (20.0, 20.0));
        assert_eq!(layers[0].opacity, 1.0);
        assert_ne!(layers[0].id, layers[1].id);
    }
}
