//! # IO
//!
//! Everything that crosses the boundary between the editor and the outside world: validating
//! uploads, packing images into data URLs, and saving and restoring editor state.

pub mod autosave;
pub mod data_url;
pub mod persist;
pub mod storage;
pub mod upload;
