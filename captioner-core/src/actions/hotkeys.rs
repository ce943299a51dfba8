//! Keyboard hotkeys.
//!
//! Actions can have potentially many hotkeys bound to them, and hotkeys can be bound to at most one action.
//! Mapping in both directions is useful, but for disk storage the one-to-many relation of Actions to keys is
//! easier to edit for the end user. Thus, the reverse many-to-one mapping of keys to actions is built dynamically.

use super::Action;

/// Physical key, named after its US-layout position like `KeyboardEvent.code`.
#[derive(
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Debug,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
pub enum Key {
    Backspace,
    Delete,
    Enter,
    Escape,
    Space,
    Tab,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    BracketLeft,
    BracketRight,
    Home,
    End,
    PageUp,
    PageDown,
    Digit0,
    Digit1,
    Digit2,
    Digit3,
    Digit4,
    Digit5,
    Digit6,
    Digit7,
    Digit8,
    Digit9,
    KeyA,
    KeyB,
    KeyC,
    KeyD,
    KeyE,
    KeyF,
    KeyG,
    KeyH,
    KeyI,
    KeyJ,
    KeyK,
    KeyL,
    KeyM,
    KeyN,
    KeyO,
    KeyP,
    KeyQ,
    KeyR,
    KeyS,
    KeyT,
    KeyU,
    KeyV,
    KeyW,
    KeyX,
    KeyY,
    KeyZ,
}

#[derive(Hash, PartialEq, Eq, Clone, Debug, Copy)]
pub struct KeyboardHotkey {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub key: Key,
}
impl serde::Serialize for KeyboardHotkey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Human-readable in the config file.
        serializer.serialize_str(&self.to_string())
    }
}
impl<'de> serde::Deserialize<'de> for KeyboardHotkey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        // Delegate to FromStr from a borrowed or owned string, depending on capabilities of deserializer.
        let str =
            <std::borrow::Cow<'de, str> as serde::Deserialize<'de>>::deserialize(deserializer)?;
        str.parse().map_err(serde::de::Error::custom)
    }
}
impl KeyboardHotkey {
    #[must_use]
    pub const fn plain(key: Key) -> Self {
        Self {
            ctrl: false,
            alt: false,
            shift: false,
            key,
        }
    }
    #[must_use]
    pub const fn ctrl(key: Key) -> Self {
        Self {
            ctrl: true,
            alt: false,
            shift: false,
            key,
        }
    }
    #[must_use]
    pub const fn shift(key: Key) -> Self {
        Self {
            ctrl: false,
            alt: false,
            shift: true,
            key,
        }
    }
}
/// Formatted as `[ctrl+][alt+][shift+]<key name>`, the same syntax [`std::str::FromStr`] accepts.
impl std::fmt::Display for KeyboardHotkey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut components = smallvec::SmallVec::<[&str; 4]>::new();
        if self.ctrl {
            components.push("ctrl");
        }
        if self.alt {
            components.push("alt");
        }
        if self.shift {
            components.push("shift");
        };
        components.push(self.key.as_ref());
        f.write_str(&components.join("+"))
    }
}
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum KeyboardHotkeyFromStrError {
    #[error("unrecognized key name {0:?}")]
    InvalidKeyName(String),
}
/// Parse from syntax `[ctrl+][alt+][shift+]<key name>`, case-sensitive.
impl std::str::FromStr for KeyboardHotkey {
    type Err = KeyboardHotkeyFromStrError;
    fn from_str(mut str: &str) -> Result<Self, Self::Err> {
        let mut take_if_has = |prefix: &str| -> bool {
            if let Some(new_str) = str.strip_prefix(prefix) {
                str = new_str;
                true
            } else {
                false
            }
        };
        let ctrl = take_if_has("ctrl+");
        let alt = take_if_has("alt+");
        let shift = take_if_has("shift+");
        // str now contains only the key name.
        let key = str
            .parse()
            .map_err(|_| KeyboardHotkeyFromStrError::InvalidKeyName(str.to_owned()))?;

        Ok(Self {
            ctrl,
            alt,
            shift,
            key,
        })
    }
}

/// A key press as reported by the platform.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct KeyEvent {
    pub key: Key,
    pub ctrl: bool,
    /// Command on mac, treated the same as ctrl.
    pub meta: bool,
    pub alt: bool,
    pub shift: bool,
}
impl From<KeyEvent> for KeyboardHotkey {
    fn from(event: KeyEvent) -> Self {
        Self {
            ctrl: event.ctrl || event.meta,
            alt: event.alt,
            shift: event.shift,
            key: event.key,
        }
    }
}
impl From<KeyboardHotkey> for KeyEvent {
    fn from(hotkey: KeyboardHotkey) -> Self {
        Self {
            key: hotkey.key,
            ctrl: hotkey.ctrl,
            meta: false,
            alt: hotkey.alt,
            shift: hotkey.shift,
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, Default)]
pub struct HotkeyCollection {
    #[serde(default)]
    pub keyboard: Vec<KeyboardHotkey>,
}

/// Maps each action onto potentially many hotkeys.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug)]
pub struct ActionsToKeys(hashbrown::HashMap<Action, HotkeyCollection>);
impl Default for ActionsToKeys {
    fn default() -> Self {
        let mut keys_map = hashbrown::HashMap::with_capacity(super::defaults::KEYBOARD.len());
        // Collect the keys from the defaults array
        for (action, keys) in super::defaults::KEYBOARD {
            keys_map.insert(
                *action,
                HotkeyCollection {
                    keyboard: keys.to_vec(),
                },
            );
        }

        let new = Self(keys_map);
        // Make sure we didn't accidentally bind a single key twice
        debug_assert!(TryInto::<KeysToActions>::try_into(&new).is_ok());
        new
    }
}
impl ActionsToKeys {
    #[must_use]
    pub fn keys_of(&self, action: Action) -> &[KeyboardHotkey] {
        self.0
            .get(&action)
            .map(|collection| collection.keyboard.as_slice())
            .unwrap_or_default()
    }
}

/// Derived from [`ActionsToKeys`], maps each hotkey onto at most one action.
#[derive(Clone, Debug)]
pub struct KeysToActions(hashbrown::HashMap<KeyboardHotkey, Action>);
#[derive(thiserror::Error, Debug)]
pub enum KeysToActionsError {
    /// A single key was bound to multiple actions.
    /// Only the first two encountered (in arbitrary order) are reported.
    #[error("hotkey {key} used for more than one action: {actions:?}")]
    DuplicateBinding {
        key: KeyboardHotkey,
        actions: [Action; 2],
    },
}
impl TryFrom<&ActionsToKeys> for KeysToActions {
    type Error = KeysToActionsError;
    fn try_from(value: &ActionsToKeys) -> Result<Self, Self::Error> {
        let mut new = KeysToActions(hashbrown::HashMap::default());

        for (action, keys) in &value.0 {
            for &key in &keys.keyboard {
                let old = new.0.insert(key, *action);
                // The slot wasn't empty!
                if let Some(old) = old {
                    if old != *action {
                        return Err(KeysToActionsError::DuplicateBinding {
                            key,
                            actions: [*action, old],
                        });
                    }
                }
            }
        }

        Ok(new)
    }
}
impl KeysToActions {
    #[must_use]
    pub fn action_of(&self, key: impl Into<KeyboardHotkey>) -> Option<Action> {
        self.0.get(&key.into()).copied()
    }
    /// Resolve and perform a key press. Nothing happens while a text input has focus.
    /// Returns the action if one was bound.
    pub fn dispatch(
        &self,
        editor: &mut crate::editor::Editor,
        event: KeyEvent,
        text_input_focused: bool,
    ) -> Option<Action> {
        if text_input_focused {
            return None;
        }
        let action = self.action_of(event)?;
        let changed = super::perform(editor, action);
        log::trace!("{} -> {action:?} (changed: {changed})", KeyboardHotkey::from(event));
        Some(action)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::editor::Editor;
    use strum::IntoEnumIterator;

    fn event(key: Key) -> KeyEvent {
        KeyboardHotkey::plain(key).into()
    }

    #[test]
    fn parse_and_format() {
        let hotkey: KeyboardHotkey = "ctrl+shift+KeyZ".parse().unwrap();
        assert_eq!(
            hotkey,
            KeyboardHotkey {
                ctrl: true,
                alt: false,
                shift: true,
                key: Key::KeyZ
            }
        );
        assert_eq!(hotkey.to_string(), "ctrl+shift+KeyZ");
        for key in Key::iter() {
            let plain = KeyboardHotkey::plain(key);
            assert_eq!(plain.to_string().parse::<KeyboardHotkey>(), Ok(plain));
        }
    }
    #[test]
    fn parse_errors() {
        assert!("ctrl+".parse::<KeyboardHotkey>().is_err());
        assert!("shift+ctrl+KeyZ".parse::<KeyboardHotkey>().is_err());
        assert!("keyz".parse::<KeyboardHotkey>().is_err());
    }
    #[test]
    fn defaults_reversible() {
        let keys = ActionsToKeys::default();
        let reverse = KeysToActions::try_from(&keys).unwrap();
        for action in Action::iter() {
            assert!(!keys.keys_of(action).is_empty(), "{action:?} unbound");
            for &key in keys.keys_of(action) {
                assert_eq!(reverse.action_of(key), Some(action));
            }
        }
    }
    #[test]
    fn duplicate_rejected() {
        let mut keys = ActionsToKeys::default();
        keys.0.insert(
            Action::Undo,
            HotkeyCollection {
                keyboard: vec![KeyboardHotkey::plain(Key::Delete)],
            },
        );
        assert!(matches!(
            KeysToActions::try_from(&keys),
            Err(KeysToActionsError::DuplicateBinding { .. })
        ));
    }
    #[test]
    fn meta_acts_as_ctrl() {
        let reverse = KeysToActions::try_from(&ActionsToKeys::default()).unwrap();
        let cmd_d = KeyEvent {
            key: Key::KeyD,
            ctrl: false,
            meta: true,
            alt: false,
            shift: false,
        };
        assert_eq!(reverse.action_of(cmd_d), Some(Action::DuplicateSelected));
    }
    #[test]
    fn typing_suppresses_dispatch() {
        let reverse = KeysToActions::try_from(&ActionsToKeys::default()).unwrap();
        let mut editor = Editor::default();
        editor.add_layer();
        assert_eq!(reverse.dispatch(&mut editor, event(Key::Backspace), true), None);
        assert_eq!(editor.document().layers.len(), 1);
        assert_eq!(
            reverse.dispatch(&mut editor, event(Key::Backspace), false),
            Some(Action::DeleteSelected)
        );
        assert!(editor.document().layers.is_empty());
    }
    #[test]
    fn shift_arrow_is_large() {
        let reverse = KeysToActions::try_from(&ActionsToKeys::default()).unwrap();
        let mut editor = Editor::default();
        let id = editor.add_layer();
        reverse.dispatch(&mut editor, KeyboardHotkey::shift(Key::ArrowRight).into(), false);
        reverse.dispatch(&mut editor, event(Key::ArrowDown), false);
        let layer = editor.document().layer(id).unwrap();
        assert_eq!((layer.x, layer.y), (70.0, 61.0));
    }
    #[test]
    fn toml_shape() {
        let keys = ActionsToKeys::default();
        let text = toml::to_string(&keys).unwrap();
        let back: ActionsToKeys = toml::from_str(&text).unwrap();
        assert_eq!(back.keys_of(Action::Redo), keys.keys_of(Action::Redo));
    }
}
