//! # Interaction
//!
//! Turns raw renderer events into editor calls. Implemented as a small state machine, with at
//! most one gesture in progress at a time.
//!
//! Pointer moves arrive far more often than frames are drawn, so a drag only remembers the
//! latest position. Each [`Interaction::frame`] flushes that as one live update. Releasing
//! the pointer commits the final geometry as a single undo step.

use crate::{editor::Editor, id::LayerID, state::layer::LayerPatch, state::transform::TransformEnd};

#[derive(Clone, Copy, Debug, PartialEq)]
enum Gesture {
    Idle,
    Dragging {
        layer: LayerID,
        /// Whether any movement was seen. A press and release in place records nothing.
        moved: bool,
    },
}

#[derive(Debug)]
pub struct Interaction {
    gesture: Gesture,
    /// Latest position of the current drag, not yet shown.
    pending: Option<[f32; 2]>,
}

impl Default for Interaction {
    fn default() -> Self {
        Self {
            gesture: Gesture::Idle,
            pending: None,
        }
    }
}

impl Interaction {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    /// The layer being dragged, if any.
    #[must_use]
    pub fn dragging(&self) -> Option<LayerID> {
        match self.gesture {
            Gesture::Dragging { layer, .. } => Some(layer),
            Gesture::Idle => None,
        }
    }
    /// Abandon the current gesture without committing. Live changes already shown stay
    /// in the live document until the next commit or undo.
    fn end_gesture(&mut self) {
        if let Gesture::Dragging { layer, moved: true } = self.gesture {
            log::debug!("abandoning drag of {layer:?}");
        }
        self.gesture = Gesture::Idle;
        self.pending = None;
    }
    /// The pointer went down on a layer. Selects it, and starts dragging unless it's locked.
    pub fn pointer_down(&mut self, editor: &mut Editor, id: LayerID) -> bool {
        let Some(layer) = editor.document().layer(id) else {
            return false;
        };
        let locked = layer.locked;
        self.end_gesture();
        if editor.document().selected_layer_id != Some(id) {
            editor.select(Some(id));
        }
        if !locked {
            self.gesture = Gesture::Dragging {
                layer: id,
                moved: false,
            };
        }
        true
    }
    /// Pointer moved during a drag. Only the latest position is kept until the next frame.
    pub fn drag_move(&mut self, x: f32, y: f32) {
        if let Gesture::Dragging { moved, .. } = &mut self.gesture {
            *moved = true;
            self.pending = Some([x, y]);
        }
    }
    /// A frame is about to be drawn. Shows the latest drag position, as at most one live
    /// update.
    pub fn frame(&mut self, editor: &mut Editor) -> bool {
        let (Gesture::Dragging { layer, .. }, Some([x, y])) = (self.gesture, self.pending.take())
        else {
            return false;
        };
        editor.update_live(&LayerPatch::new(layer).position(x, y))
    }
    /// The drag finished at `(x, y)`. Commits the move as one undo step.
    pub fn drag_end(&mut self, editor: &mut Editor, x: f32, y: f32) -> bool {
        let Gesture::Dragging { layer, moved } = self.gesture else {
            return false;
        };
        self.end_gesture();
        if !moved {
            return false;
        }
        editor.update_labelled(&LayerPatch::new(layer).position(x, y), "move")
    }
    /// A resize/rotate handle was released. The reported scale is folded into the layer size.
    pub fn transform_end(&mut self, editor: &mut Editor, id: LayerID, end: TransformEnd) -> bool {
        self.end_gesture();
        let patch = match editor.document().layer(id) {
            Some(layer) if !layer.locked => end.normalize(layer),
            Some(_) => {
                log::debug!("ignoring transform of locked layer {id:?}");
                return false;
            }
            None => return false,
        };
        editor.update_labelled(&patch, "transform")
    }
    /// Clicked on empty canvas.
    pub fn background_click(&mut self, editor: &mut Editor) -> bool {
        self.end_gesture();
        editor.select(None)
    }
    /// Called by the renderer once per render pass. Picks up a pending drag request from the
    /// editor, starting a drag of that layer as if the pointer went down on it.
    pub fn render_pass(&mut self, editor: &mut Editor) -> Option<LayerID> {
        let id = editor.take_start_drag()?;
        if editor.document().layer(id).map_or(true, |layer| layer.locked) {
            return None;
        }
        self.end_gesture();
        self.gesture = Gesture::Dragging {
            layer: id,
            moved: false,
        };
        Some(id)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn position(editor: &Editor, id: LayerID) -> (f32, f32) {
        let layer = editor.document().layer(id).unwrap();
        (layer.x, layer.y)
    }

    #[test]
    fn many_moves_one_live_update_per_frame() {
        let mut editor = Editor::default();
        let id = editor.add_layer();
        let mut rx = editor.listen();
        let mut interaction = Interaction::new();

        interaction.pointer_down(&mut editor, id);
        for i in 0..50 {
            interaction.drag_move(i as f32, i as f32);
        }
        assert!(interaction.frame(&mut editor));
        assert!(!interaction.frame(&mut editor));
        assert_eq!(position(&editor, id), (49.0, 49.0));

        let messages: Vec<_> = std::iter::from_fn(|| rx.try_recv().ok()).collect();
        assert_eq!(messages, [crate::editor::EditorMessage::Live]);
    }
    #[test]
    fn drag_commits_once() {
        let mut editor = Editor::default();
        let id = editor.add_layer();
        let mut interaction = Interaction::new();
        interaction.pointer_down(&mut editor, id);
        for i in 0..5 {
            interaction.drag_move(100.0 + i as f32, 100.0);
            interaction.frame(&mut editor);
        }
        assert_eq!(editor.history_counts(), (1, 0));
        assert!(interaction.drag_end(&mut editor, 120.0, 90.0));
        assert_eq!(editor.history_counts(), (2, 0));
        assert_eq!(editor.undo_label(), Some("move"));
        assert_eq!(position(&editor, id), (120.0, 90.0));
        editor.undo();
        assert_eq!(position(&editor, id), (60.0, 60.0));
        assert_eq!(interaction.dragging(), None);
    }
    #[test]
    fn click_without_move_records_nothing() {
        let mut editor = Editor::default();
        let id = editor.add_layer();
        let mut interaction = Interaction::new();
        interaction.pointer_down(&mut editor, id);
        assert!(!interaction.drag_end(&mut editor, 60.0, 60.0));
        assert_eq!(editor.history_counts(), (1, 0));
    }
    #[test]
    fn locked_layers_select_but_dont_drag() {
        let mut editor = Editor::default();
        let id = editor.add_layer();
        editor.select(None);
        editor.set_lock(id, true);
        let mut interaction = Interaction::new();
        assert!(interaction.pointer_down(&mut editor, id));
        assert_eq!(editor.document().selected_layer_id, Some(id));
        assert_eq!(interaction.dragging(), None);
        interaction.drag_move(0.0, 0.0);
        assert!(!interaction.frame(&mut editor));
        let end = TransformEnd {
            x: 0.0,
            y: 0.0,
            rotation: 45.0,
            scale_x: 2.0,
            scale_y: 2.0,
        };
        assert!(!interaction.transform_end(&mut editor, id, end));
    }
    #[test]
    fn transform_commits_normalized_size() {
        let mut editor = Editor::default();
        let id = editor.add_layer();
        let mut interaction = Interaction::new();
        let end = TransformEnd {
            x: 10.0,
            y: 12.0,
            rotation: 30.0,
            scale_x: 0.01,
            scale_y: 3.0,
        };
        assert!(interaction.transform_end(&mut editor, id, end));
        let layer = editor.document().layer(id).unwrap();
        assert_eq!(layer.width, crate::state::layer::MIN_SIZE);
        assert_eq!(layer.height, 180.0);
        assert_eq!(layer.rotation, 30.0);
        assert_eq!(editor.undo_label(), Some("transform"));
    }
    #[test]
    fn duplicate_then_render_pass_starts_drag() {
        let mut editor = Editor::default();
        editor.add_layer();
        let copy = editor.duplicate_selected().unwrap();
        let mut interaction = Interaction::new();
        assert_eq!(interaction.render_pass(&mut editor), Some(copy));
        assert_eq!(interaction.render_pass(&mut editor), None);
        assert_eq!(interaction.dragging(), Some(copy));
        interaction.drag_move(200.0, 200.0);
        interaction.frame(&mut editor);
        interaction.drag_end(&mut editor, 200.0, 200.0);
        assert_eq!(editor.undo_label(), Some("move"));
    }
    #[test]
    fn background_click_deselects() {
        let mut editor = Editor::default();
        editor.add_layer();
        let mut interaction = Interaction::new();
        assert!(interaction.background_click(&mut editor));
        assert_eq!(editor.document().selected_layer_id, None);
        assert!(!interaction.background_click(&mut editor));
    }
    #[test]
    fn new_press_abandons_old_drag() {
        let mut editor = Editor::default();
        let a = editor.add_layer();
        let b = editor.add_layer();
        let mut interaction = Interaction::new();
        interaction.pointer_down(&mut editor, a);
        interaction.drag_move(0.0, 0.0);
        interaction.pointer_down(&mut editor, b);
        assert!(!interaction.frame(&mut editor));
        assert_eq!(interaction.dragging(), Some(b));
        assert_eq!(editor.document().selected_layer_id, Some(b));
    }
}
