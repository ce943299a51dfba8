use std::sync::Arc;

use crate::{id::LayerID, state::layer::TextLayer};

/// Pixel size of the canvas. Always matches the background image once one is loaded.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct CanvasDimensions {
    pub width: u32,
    pub height: u32,
}
impl CanvasDimensions {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// A user-supplied font face, addressable by family name from any layer.
#[derive(Clone, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
pub struct CustomFont {
    pub family: String,
    /// Where the face data lives. Resolved by the host.
    pub url: String,
}

/// Everything a single editing session owns.
#[derive(Clone, PartialEq, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Self-contained background image. Shared between the live document and every
    /// history snapshot, as it is by far the largest field.
    #[serde(default)]
    pub image_data_url: Option<Arc<str>>,
    #[serde(default)]
    pub canvas_dimensions: CanvasDimensions,
    /// Back to front.
    #[serde(default)]
    pub layers: Vec<TextLayer>,
    #[serde(default)]
    pub selected_layer_id: Option<LayerID>,
    #[serde(default)]
    pub custom_fonts: Vec<CustomFont>,
}

impl Document {
    #[must_use]
    pub fn layer(&self, id: LayerID) -> Option<&TextLayer> {
        self.layers.iter().find(|layer| layer.id == id)
    }
    #[must_use]
    pub fn layer_mut(&mut self, id: LayerID) -> Option<&mut TextLayer> {
        self.layers.iter_mut().find(|layer| layer.id == id)
    }
    /// Z-index of the layer, where 0 is the bottom-most.
    #[must_use]
    pub fn index_of(&self, id: LayerID) -> Option<usize> {
        self.layers.iter().position(|layer| layer.id == id)
    }
    #[must_use]
    pub fn selected_layer(&self) -> Option<&TextLayer> {
        self.selected_layer_id.and_then(|id| self.layer(id))
    }
    #[must_use]
    pub fn has_image(&self) -> bool {
        self.image_data_url.is_some()
    }
    /// Every family a layer may use: `builtin` first, then custom fonts, without repeats.
    #[must_use]
    pub fn font_families<'a>(&'a self, builtin: &'a [&'a str]) -> Vec<&'a str> {
        let mut families: Vec<&str> = Vec::with_capacity(builtin.len() + self.custom_fonts.len());
        let all = builtin
            .iter()
            .copied()
            .chain(self.custom_fonts.iter().map(|font| font.family.as_str()));
        for family in all {
            if !families.contains(&family) {
                families.push(family);
            }
        }
        families
    }
    /// Add a font, replacing any existing font of the same family in place.
    pub fn insert_font(&mut self, font: CustomFont) {
        match self
            .custom_fonts
            .iter_mut()
            .find(|existing| existing.family == font.family)
        {
            Some(existing) => *existing = font,
            None => self.custom_fonts.push(font),
        }
    }
    /// True if the selection names a layer that exists, or is empty.
    #[must_use]
    pub fn selection_is_valid(&self) -> bool {
        self.selected_layer_id
            .map_or(true, |id| self.layer(id).is_some())
    }
    /// Repair a document that came from outside the editor: clamp layer values, give
    /// repeated IDs fresh ones, and drop a dangling selection. Returns the number of fixes.
    pub fn sanitize(&mut self) -> usize {
        let mut fixes = 0;
        let mut seen = hashbrown::HashSet::with_capacity(self.layers.len());
        for layer in &mut self.layers {
            if layer.sanitize() {
                fixes += 1;
            }
            if !seen.insert(layer.id) {
                layer.id = LayerID::new();
                seen.insert(layer.id);
                fixes += 1;
            }
        }
        if !self.selection_is_valid() {
            self.selected_layer_id = None;
            fixes += 1;
        }
        fixes
    }
    /// Copy the state that changes without being recorded (selection, fonts, and lock
    /// flags) from `live`, leaving everything else as it is.
    pub fn carry_untracked_from(&mut self, live: &Document) {
        self.custom_fonts.clone_from(&live.custom_fonts);
        self.selected_layer_id = live
            .selected_layer_id
            .filter(|&id| self.layer(id).is_some());
        for layer in &mut self.layers {
            if let Some(current) = live.layer(layer.id) {
                layer.locked = current.locked;
            }
        }
    }
}
