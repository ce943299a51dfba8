use std::sync::Arc;

use crate::{
    history::History,
    id::LayerID,
    state::{
        document::{CanvasDimensions, CustomFont, Document},
        layer::{apply_patch, LayerPatch, TextLayer},
    },
};

/// Records a history checkpoint before the first write.
struct Checkpoint<'a> {
    history: &'a mut History,
    label: &'a str,
}

/// Write access to the live document, handed out by [`super::Editor`].
///
/// Every method checks its preconditions first and leaves the document untouched if they
/// fail. For a recorded write, the history checkpoint is taken right before the first
/// successful change, so a closure that ends up changing nothing records nothing.
pub struct DocumentWriter<'a> {
    document: &'a mut Document,
    checkpoint: Option<Checkpoint<'a>>,
    changed: bool,
}

impl std::ops::Deref for DocumentWriter<'_> {
    type Target = Document;
    fn deref(&self) -> &Self::Target {
        &*self.document
    }
}

impl<'a> DocumentWriter<'a> {
    pub(super) fn recording(
        document: &'a mut Document,
        history: &'a mut History,
        label: &'a str,
    ) -> Self {
        Self {
            document,
            checkpoint: Some(Checkpoint { history, label }),
            changed: false,
        }
    }
    pub(super) fn unrecorded(document: &'a mut Document) -> Self {
        Self {
            document,
            checkpoint: None,
            changed: false,
        }
    }
    #[must_use]
    pub fn changed(&self) -> bool {
        self.changed
    }
    fn begin_change(&mut self) -> &mut Document {
        if let Some(Checkpoint { history, label }) = self.checkpoint.take() {
            history.push(&*self.document, Some(label));
        }
        self.changed = true;
        &mut *self.document
    }
    /// Merge a patch into the layer it names.
    pub fn patch(&mut self, patch: &LayerPatch) -> bool {
        if patch.is_empty() || self.document.layer(patch.id()).is_none() {
            return false;
        }
        apply_patch(&mut self.begin_change().layers, patch)
    }
    /// Place a layer on top of all others.
    pub fn push_layer(&mut self, layer: TextLayer) -> bool {
        if self.document.layer(layer.id).is_some() {
            log::warn!("refusing to add duplicate layer {:?}", layer.id);
            return false;
        }
        self.begin_change().layers.push(layer);
        true
    }
    /// Remove a layer, returning its former index and value. Clears the selection
    /// if it pointed at the removed layer.
    pub fn remove_layer(&mut self, id: LayerID) -> Option<(usize, TextLayer)> {
        let index = self.document.index_of(id)?;
        let document = self.begin_change();
        let removed = document.layers.remove(index);
        if document.selected_layer_id == Some(id) {
            document.selected_layer_id = None;
        }
        Some((index, removed))
    }
    /// Select a layer, or clear the selection with `None`. Unknown IDs are refused.
    pub fn select(&mut self, id: Option<LayerID>) -> bool {
        if id.is_some_and(|id| self.document.layer(id).is_none()) {
            return false;
        }
        if self.document.selected_layer_id == id {
            return false;
        }
        self.begin_change().selected_layer_id = id;
        true
    }
    /// Rearrange layers to follow `order`, back to front. Unknown and repeated IDs are
    /// skipped, and layers missing from `order` keep their relative order above it.
    pub fn reorder(&mut self, order: &[LayerID]) -> bool {
        let mut remaining: Vec<Option<TextLayer>> =
            self.document.layers.iter().cloned().map(Some).collect();
        let mut reordered = Vec::with_capacity(remaining.len());
        for &id in order {
            let Some(index) = self.document.index_of(id) else {
                log::warn!("reorder: skipping unknown layer {id:?}");
                continue;
            };
            if let Some(layer) = remaining[index].take() {
                reordered.push(layer);
            }
        }
        reordered.extend(remaining.into_iter().flatten());
        let unchanged = reordered
            .iter()
            .map(|layer| layer.id)
            .eq(self.document.layers.iter().map(|layer| layer.id));
        if unchanged {
            return false;
        }
        self.begin_change().layers = reordered;
        true
    }
    /// Move a layer to `index`, as counted before it was removed from its old spot.
    pub fn move_layer(&mut self, id: LayerID, index: usize) -> bool {
        let Some(from) = self.document.index_of(id) else {
            return false;
        };
        let to = index.min(self.document.layers.len() - 1);
        if from == to {
            return false;
        }
        let layers = &mut self.begin_change().layers;
        let layer = layers.remove(from);
        layers.insert(to, layer);
        true
    }
    /// Replace the background image and the canvas size together.
    pub fn set_image(&mut self, data_url: Arc<str>, dimensions: CanvasDimensions) {
        let document = self.begin_change();
        document.image_data_url = Some(data_url);
        document.canvas_dimensions = dimensions;
    }
    pub fn clear_image(&mut self) -> bool {
        if !self.document.has_image() && self.document.canvas_dimensions.is_empty() {
            return false;
        }
        let document = self.begin_change();
        document.image_data_url = None;
        document.canvas_dimensions = CanvasDimensions::default();
        true
    }
    /// Add a font, replacing an existing font of the same family.
    pub fn insert_font(&mut self, font: CustomFont) -> bool {
        if self.document.custom_fonts.contains(&font) {
            return false;
        }
        self.begin_change().insert_font(font);
        true
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::state::layer::create_default_layer;

    fn ids(doc: &Document) -> Vec<u128> {
        doc.layers
            .iter()
            .map(|l| l.id.to_string().replace('-', ""))
            .map(|s| u128::from_str_radix(&s, 16).unwrap())
            .collect()
    }
    fn doc_with(n: u128) -> Document {
        let mut doc = Document::default();
        for i in 1..=n {
            doc.layers.push(create_default_layer(LayerID::from_u128(i), 0.0));
        }
        doc
    }

    #[test]
    fn checkpoint_only_on_change() {
        let mut doc = doc_with(1);
        let mut history = History::default();
        {
            let mut writer = DocumentWriter::recording(&mut doc, &mut history, "edit");
            assert!(!writer.patch(&LayerPatch::new(LayerID::from_u128(9)).text("x")));
            assert!(!writer.select(Some(LayerID::from_u128(9))));
            assert!(!writer.changed());
        }
        assert!(!history.can_undo());
        {
            let mut writer = DocumentWriter::recording(&mut doc, &mut history, "edit");
            assert!(writer.patch(&LayerPatch::new(LayerID::from_u128(1)).text("a")));
            assert!(writer.patch(&LayerPatch::new(LayerID::from_u128(1)).text("b")));
        }
        // Two writes, one checkpoint, holding the state from before either.
        assert_eq!(history.counts(), (1, 0));
        assert_eq!(history.present().layers[0].text, "Double-click to edit");
        assert_eq!(doc.layers[0].text, "b");
    }
    #[test]
    fn reorder_keeps_every_layer() {
        let mut doc = doc_with(4);
        let mut writer = DocumentWriter::unrecorded(&mut doc);
        assert!(writer.reorder(&[
            LayerID::from_u128(3),
            LayerID::from_u128(99),
            LayerID::from_u128(1),
            LayerID::from_u128(3),
        ]));
        assert_eq!(ids(&doc), [3, 1, 2, 4]);
    }
    #[test]
    fn reorder_same_order_is_noop() {
        let mut doc = doc_with(3);
        let mut writer = DocumentWriter::unrecorded(&mut doc);
        assert!(!writer.reorder(&[LayerID::from_u128(1), LayerID::from_u128(2)]));
        assert!(!writer.changed());
    }
    #[test]
    fn move_layer_onto_index() {
        let mut doc = doc_with(4);
        let mut writer = DocumentWriter::unrecorded(&mut doc);
        assert!(writer.move_layer(LayerID::from_u128(1), 2));
        assert_eq!(ids(&writer), [2, 3, 1, 4]);
        assert!(writer.move_layer(LayerID::from_u128(4), 0));
        assert_eq!(ids(&writer), [4, 2, 3, 1]);
        assert!(!writer.move_layer(LayerID::from_u128(4), 0));
        assert!(writer.move_layer(LayerID::from_u128(4), 100));
        assert_eq!(ids(&writer), [2, 3, 1, 4]);
    }
    #[test]
    fn remove_clears_selection() {
        let mut doc = doc_with(2);
        doc.selected_layer_id = Some(LayerID::from_u128(2));
        let mut writer = DocumentWriter::unrecorded(&mut doc);
        let (index, removed) = writer.remove_layer(LayerID::from_u128(2)).unwrap();
        assert_eq!(index, 1);
        assert_eq!(removed.id, LayerID::from_u128(2));
        assert_eq!(writer.selected_layer_id, None);
    }
    #[test]
    fn image_and_size_together() {
        let mut doc = Document::default();
        let mut writer = DocumentWriter::unrecorded(&mut doc);
        writer.set_image(
            Arc::from("data:image/png;base64,AAAA"),
            CanvasDimensions {
                width: 4,
                height: 3,
            },
        );
        assert!(writer.has_image());
        assert!(writer.clear_image());
        assert!(!writer.clear_image());
        assert!(writer.canvas_dimensions.is_empty());
    }
}
