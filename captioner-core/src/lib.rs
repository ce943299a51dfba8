//! Editor state for placing and styling text layers on top of a single raster image.
//!
//! The [`Editor`] is the only writer of document state. Renderers, panels and the
//! persistence layer observe it, and feed gestures back in through [`interaction`] and
//! [`actions`].

pub mod actions;
pub mod color;
pub mod derive;
pub mod editor;
pub mod history;
pub mod id;
pub mod interaction;
pub mod io;
pub mod state;
pub mod util;

pub use editor::{Editor, EditorConfig, EditorMessage, LockPolicy};
pub use id::LayerID;
pub use state::document::{CanvasDimensions, CustomFont, Document};
pub use state::layer::{Align, FontStyle, LayerPatch, TextLayer};
