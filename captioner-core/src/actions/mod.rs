//! # Actions API
//!
//! Keyboard shortcuts resolve to an [`Action`], which is then performed against the editor.
//! Hotkeys are only consulted when no text input has focus, so typing into a property field
//! never deletes or nudges a layer.

pub mod defaults;
pub mod hotkeys;

use crate::{editor::Editor, state::layer::LayerPatch};

#[derive(
    serde::Serialize,
    serde::Deserialize,
    Hash,
    PartialEq,
    Eq,
    strum::AsRefStr,
    strum::EnumIter,
    Clone,
    Copy,
    Debug,
)]
pub enum Action {
    Undo,
    Redo,

    DeleteSelected,
    DuplicateSelected,

    NudgeUp,
    NudgeDown,
    NudgeLeft,
    NudgeRight,
    NudgeUpLarge,
    NudgeDownLarge,
    NudgeLeftLarge,
    NudgeRightLarge,

    BringForward,
    SendBackward,
}

impl Action {
    /// Direction and whether it's the large step, for nudges.
    fn nudge(self) -> Option<([f32; 2], bool)> {
        Some(match self {
            Self::NudgeUp => ([0.0, -1.0], false),
            Self::NudgeDown => ([0.0, 1.0], false),
            Self::NudgeLeft => ([-1.0, 0.0], false),
            Self::NudgeRight => ([1.0, 0.0], false),
            Self::NudgeUpLarge => ([0.0, -1.0], true),
            Self::NudgeDownLarge => ([0.0, 1.0], true),
            Self::NudgeLeftLarge => ([-1.0, 0.0], true),
            Self::NudgeRightLarge => ([1.0, 0.0], true),
            _ => return None,
        })
    }
}

/// Perform `action` against the editor. Returns whether anything changed.
pub fn perform(editor: &mut Editor, action: Action) -> bool {
    if let Some(([dx, dy], large)) = action.nudge() {
        let step = if large {
            editor.config().nudge_step_large
        } else {
            editor.config().nudge_step
        };
        let patch = match editor.document().selected_layer() {
            Some(layer) if !layer.locked => {
                LayerPatch::new(layer.id).position(layer.x + dx * step, layer.y + dy * step)
            }
            _ => return false,
        };
        return editor.update_labelled(&patch, "nudge");
    }
    let selected = editor.document().selected_layer_id;
    match action {
        Action::Undo => editor.undo(),
        Action::Redo => editor.redo(),
        Action::DeleteSelected => editor.delete_selected().is_some(),
        Action::DuplicateSelected => editor.duplicate_selected().is_some(),
        Action::BringForward => selected.is_some_and(|id| editor.bring_forward(id)),
        Action::SendBackward => selected.is_some_and(|id| editor.send_backward(id)),
        // Handled above.
        Action::NudgeUp
        | Action::NudgeDown
        | Action::NudgeLeft
        | Action::NudgeRight
        | Action::NudgeUpLarge
        | Action::NudgeDownLarge
        | Action::NudgeLeftLarge
        | Action::NudgeRightLarge => false,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn nudges() {
        let mut editor = Editor::default();
        let id = editor.add_layer();
        assert!(perform(&mut editor, Action::NudgeRight));
        assert!(perform(&mut editor, Action::NudgeUpLarge));
        let layer = editor.document().layer(id).unwrap();
        assert_eq!((layer.x, layer.y), (61.0, 50.0));
        assert_eq!(editor.undo_label(), Some("nudge"));
        assert_eq!(editor.history_counts(), (3, 0));
    }
    #[test]
    fn locked_layers_dont_nudge() {
        let mut editor = Editor::default();
        let id = editor.add_layer();
        editor.set_lock(id, true);
        assert!(!perform(&mut editor, Action::NudgeLeft));
        assert_eq!(editor.document().layer(id).map(|l| l.x), Some(60.0));
    }
    #[test]
    fn nothing_selected() {
        let mut editor = Editor::default();
        for action in [
            Action::NudgeDown,
            Action::DeleteSelected,
            Action::DuplicateSelected,
            Action::BringForward,
            Action::Undo,
        ] {
            assert!(!perform(&mut editor, action), "{action:?}");
        }
    }
    #[test]
    fn delete_and_undo() {
        let mut editor = Editor::default();
        editor.add_layer();
        assert!(perform(&mut editor, Action::DeleteSelected));
        assert!(editor.document().layers.is_empty());
        assert!(perform(&mut editor, Action::Undo));
        assert_eq!(editor.document().layers.len(), 1);
        assert!(perform(&mut editor, Action::Redo));
        assert!(editor.document().layers.is_empty());
    }
}
