//! # Font faces
//!
//! System fonts come from `fontdb`. Custom fonts are carried inside the document as data URLs
//! and are decoded here on first sight. Families that can't be found fall back to the
//! system sans-serif, so a caption always renders in *something*.

use std::sync::Arc;

use captioner_core::{io::data_url, state::document::Document, FontStyle};

/// Families offered in the font picker regardless of what's installed.
pub const BUILTIN_FAMILIES: &[&str] = &[
    "Inter",
    "Arial",
    "Helvetica",
    "Georgia",
    "Times New Roman",
    "Courier New",
    "Verdana",
    "Impact",
];

#[derive(thiserror::Error, Debug)]
pub enum FontError {
    #[error(transparent)]
    DataUrl(#[from] data_url::DataUrlError),
    #[error("font {0:?} could not be parsed")]
    BadFace(String),
}

pub struct FontBook {
    db: fontdb::Database,
    /// Raw font files by family. Shared so faces can borrow without holding the map.
    custom: hashbrown::HashMap<String, Arc<Vec<u8>>>,
}
impl FontBook {
    /// A book of just the fonts installed on this system.
    #[must_use]
    pub fn new_system() -> Self {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        log::info!("found {} system font faces", db.len());
        Self {
            db,
            custom: hashbrown::HashMap::new(),
        }
    }
    #[must_use]
    pub fn empty() -> Self {
        Self {
            db: fontdb::Database::new(),
            custom: hashbrown::HashMap::new(),
        }
    }
    /// Register a custom font's data, replacing any earlier font of the same family.
    pub fn add_custom(&mut self, family: &str, data: Vec<u8>) -> Result<(), FontError> {
        if rustybuzz::Face::from_slice(&data, 0).is_none() {
            return Err(FontError::BadFace(family.to_owned()));
        }
        self.custom.insert(family.to_owned(), Arc::new(data));
        Ok(())
    }
    /// Decode any custom fonts of the document not seen yet. Fonts that fail are logged and
    /// skipped, leaving their layers to the fallback face.
    pub fn sync(&mut self, document: &Document) {
        for font in &document.custom_fonts {
            if self.custom.contains_key(&font.family) {
                continue;
            }
            let loaded = data_url::decode(&font.url)
                .map_err(FontError::from)
                .and_then(|url| self.add_custom(&font.family, url.bytes));
            match loaded {
                Ok(()) => log::debug!("loaded custom font {:?}", font.family),
                Err(e) => log::warn!("custom font {:?} unavailable: {e}", font.family),
            }
        }
    }
    #[must_use]
    pub fn has_custom(&self, family: &str) -> bool {
        self.custom.contains_key(family)
    }
    /// Run `f` with the best face for `family` in `style`. Custom fonts win over system ones.
    /// `None` if no face at all could be found.
    pub fn with_face<R>(
        &self,
        family: &str,
        style: FontStyle,
        f: impl FnOnce(&rustybuzz::Face) -> R,
    ) -> Option<R> {
        if let Some(data) = self.custom.get(family) {
            let face = rustybuzz::Face::from_slice(data, 0)?;
            return Some(f(&face));
        }
        let query = fontdb::Query {
            families: &[fontdb::Family::Name(family), fontdb::Family::SansSerif],
            weight: if style.is_bold() {
                fontdb::Weight::BOLD
            } else {
                fontdb::Weight::NORMAL
            },
            style: if style.is_italic() {
                fontdb::Style::Italic
            } else {
                fontdb::Style::Normal
            },
            ..fontdb::Query::default()
        };
        let Some(id) = self.db.query(&query) else {
            log::warn!("no face for {family:?} or any fallback");
            return None;
        };
        self.db
            .with_face_data(id, |data, index| {
                rustybuzz::Face::from_slice(data, index).map(|face| f(&face))
            })
            .flatten()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use captioner_core::CustomFont;

    #[test]
    fn garbage_is_refused() {
        let mut book = FontBook::empty();
        assert!(matches!(
            book.add_custom("Nope", b"not a font".to_vec()),
            Err(FontError::BadFace(_))
        ));
        assert!(!book.has_custom("Nope"));
    }
    #[test]
    fn sync_skips_broken_fonts() {
        let mut book = FontBook::empty();
        let document = Document {
            custom_fonts: vec![
                CustomFont {
                    family: "Broken".into(),
                    url: data_url::encode("font/ttf", b"junk"),
                },
                CustomFont {
                    family: "NotAUrl".into(),
                    url: "blob:1234".into(),
                },
            ],
            ..Document::default()
        };
        book.sync(&document);
        assert!(!book.has_custom("Broken"));
        assert!(!book.has_custom("NotAUrl"));
    }
    #[test]
    fn nothing_in_an_empty_book() {
        let book = FontBook::empty();
        assert_eq!(book.with_face("Inter", FontStyle::Normal, |_| ()), None);
    }
}
