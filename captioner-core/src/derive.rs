//! # Derived runtime objects
//!
//! The document only carries the background image as a data URL. Something paintable has to
//! be decoded from it, which is slow, can't be serialized, and must be redone whenever the
//! URL changes: on load, on image replacement, and after undo/redo.
//!
//! [`RuntimeCache`] tracks which image the document currently wants and accepts decoded
//! handles for it, rejecting results that arrive after the document moved on. Decoding
//! itself is up to the caller, on whatever thread it likes.

use std::sync::Arc;

use crate::{io::data_url, state::document::Document};

/// Identifies an image by content, so an undo back to an identical image reuses the handle.
#[derive(Clone, Copy, Hash, PartialEq, Eq)]
pub struct ImageKey([u8; 32]);

impl ImageKey {
    #[must_use]
    pub fn of(data_url: &str) -> Self {
        Self(*blake3::hash(data_url.as_bytes()).as_bytes())
    }
}

impl std::fmt::Debug for ImageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ImageKey(")?;
        for byte in &self.0[..8] {
            write!(f, "{byte:02x}")?;
        }
        write!(f, ")")
    }
}

/// What the caller needs to do after the document changed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeriveRequest {
    /// The current handle (or lack of one) still applies.
    Unchanged,
    /// The document has no image anymore. The old handle was dropped.
    Clear,
    /// Decode this URL and [`RuntimeCache::install`] the result under `key`.
    Decode { key: ImageKey, data_url: Arc<str> },
}

#[derive(thiserror::Error, Debug)]
pub enum DeriveError<E> {
    #[error(transparent)]
    DataUrl(#[from] data_url::DataUrlError),
    #[error("decoding image: {0}")]
    Decode(E),
}

/// Holds the decoded form `H` of the document's background image.
pub struct RuntimeCache<H> {
    wanted: Option<ImageKey>,
    /// Last URL seen, to skip rehashing when the document still shares it.
    last_url: Option<Arc<str>>,
    current: Option<(ImageKey, H)>,
}

impl<H> Default for RuntimeCache<H> {
    fn default() -> Self {
        Self {
            wanted: None,
            last_url: None,
            current: None,
        }
    }
}

impl<H> RuntimeCache<H> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    /// Compare against the document's image and say what, if anything, needs decoding.
    pub fn request(&mut self, document: &Document) -> DeriveRequest {
        let Some(url) = &document.image_data_url else {
            self.last_url = None;
            let had_image = self.wanted.take().is_some() | self.current.take().is_some();
            return if had_image {
                DeriveRequest::Clear
            } else {
                DeriveRequest::Unchanged
            };
        };
        if self
            .last_url
            .as_ref()
            .is_some_and(|last| Arc::ptr_eq(last, url))
        {
            return DeriveRequest::Unchanged;
        }
        self.last_url = Some(Arc::clone(url));
        let key = ImageKey::of(url);
        if self.wanted == Some(key) {
            return DeriveRequest::Unchanged;
        }
        self.wanted = Some(key);
        if self.current.as_ref().is_some_and(|(have, _)| *have == key) {
            return DeriveRequest::Unchanged;
        }
        log::debug!("image changed, decode {key:?}");
        DeriveRequest::Decode {
            key,
            data_url: Arc::clone(url),
        }
    }
    /// Accept a decoded handle. Returns false and drops it if the document no longer wants
    /// that image.
    pub fn install(&mut self, key: ImageKey, handle: H) -> bool {
        if self.wanted != Some(key) {
            log::debug!("dropping stale decode {key:?}");
            return false;
        }
        self.current = Some((key, handle));
        true
    }
    /// The handle for the image the document currently wants, if decoded.
    #[must_use]
    pub fn image(&self) -> Option<&H> {
        match &self.current {
            Some((key, handle)) if Some(*key) == self.wanted => Some(handle),
            _ => None,
        }
    }
    /// Bring the cache up to date on the calling thread.
    pub fn derive<E>(
        &mut self,
        document: &Document,
        decode: impl FnOnce(data_url::DataUrl) -> Result<H, E>,
    ) -> Result<Option<&H>, DeriveError<E>> {
        if let DeriveRequest::Decode { key, data_url } = self.request(document) {
            let url = data_url::decode(&data_url)?;
            let handle = decode(url).map_err(DeriveError::Decode)?;
            self.install(key, handle);
        }
        Ok(self.image())
    }
}
