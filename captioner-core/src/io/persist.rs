//! # Saved editor state
//!
//! One JSON record under [`STORAGE_KEY`], holding the document fields at the top level
//! alongside a `version` tag and the full undo history:
//!
//! ```json
//! {
//!   "version": 1,
//!   "imageDataUrl": "data:image/png;base64,...",
//!   "canvasDimensions": { "width": 800, "height": 600 },
//!   "layers": [ ... ],
//!   "selectedLayerId": "...",
//!   "customFonts": [ { "family": "...", "url": "..." } ],
//!   "history": { "past": [ { "snap": { ... }, "label": "..." } ], "present": { ... }, "future": [] }
//! }
//! ```
//!
//! Records of any other version are not migrated.

use crate::{editor::Editor, history::History, state::document::Document};

pub const STORAGE_KEY: &str = "image-editor-state";
pub const SCHEMA_VERSION: u32 = 1;

#[derive(thiserror::Error, Debug)]
pub enum PersistError {
    #[error("saved state has version {found}, expected {SCHEMA_VERSION}")]
    UnsupportedVersion { found: u32 },
    #[error("saved state is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Borrowed view for writing, to avoid cloning the whole editor state per save.
#[derive(serde::Serialize)]
struct RecordRef<'a> {
    version: u32,
    #[serde(flatten)]
    document: &'a Document,
    history: &'a History,
}

#[derive(serde::Deserialize)]
struct VersionOnly {
    version: u32,
}

/// A restored record.
#[derive(serde::Deserialize, Debug)]
pub struct PersistedRecord {
    pub version: u32,
    #[serde(flatten)]
    pub document: Document,
    #[serde(default)]
    pub history: History,
}

impl PersistedRecord {
    /// Parse a record, refusing any version other than [`SCHEMA_VERSION`].
    pub fn from_json(json: &str) -> Result<Self, PersistError> {
        // Check the version first, so a future format that fails to parse as this one
        // reports as a version mismatch rather than as garbage.
        let VersionOnly { version } = serde_json::from_str(json)?;
        if version != SCHEMA_VERSION {
            return Err(PersistError::UnsupportedVersion { found: version });
        }
        Ok(serde_json::from_str(json)?)
    }
    /// Build an editor resuming from this record.
    #[must_use]
    pub fn into_editor(self, config: crate::editor::EditorConfig) -> Editor {
        Editor::restore(self.document, self.history, config)
    }
}

/// Serialize the editor's current document and history.
pub fn to_json(editor: &Editor) -> Result<String, PersistError> {
    let record = RecordRef {
        version: SCHEMA_VERSION,
        document: editor.document(),
        history: editor.history(),
    };
    Ok(serde_json::to_string(&record)?)
}
