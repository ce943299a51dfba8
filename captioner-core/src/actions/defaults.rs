use super::hotkeys::{Key, KeyboardHotkey};
use super::Action;

pub const KEYBOARD: &[(Action, &[KeyboardHotkey])] = &[
    (Action::Undo, &[KeyboardHotkey::ctrl(Key::KeyZ)]),
    (
        Action::Redo,
        &[
            KeyboardHotkey::ctrl(Key::KeyY),
            KeyboardHotkey {
                alt: false,
                ctrl: true,
                shift: true,
                key: Key::KeyZ,
            },
        ],
    ),
    (
        Action::DeleteSelected,
        &[
            KeyboardHotkey::plain(Key::Delete),
            KeyboardHotkey::plain(Key::Backspace),
        ],
    ),
    (
        Action::DuplicateSelected,
        &[KeyboardHotkey::ctrl(Key::KeyD)],
    ),
    (Action::NudgeUp, &[KeyboardHotkey::plain(Key::ArrowUp)]),
    (Action::NudgeDown, &[KeyboardHotkey::plain(Key::ArrowDown)]),
    (Action::NudgeLeft, &[KeyboardHotkey::plain(Key::ArrowLeft)]),
    (Action::NudgeRight, &[KeyboardHotkey::plain(Key::ArrowRight)]),
    (Action::NudgeUpLarge, &[KeyboardHotkey::shift(Key::ArrowUp)]),
    (
        Action::NudgeDownLarge,
        &[KeyboardHotkey::shift(Key::ArrowDown)],
    ),
    (
        Action::NudgeLeftLarge,
        &[KeyboardHotkey::shift(Key::ArrowLeft)],
    ),
    (
        Action::NudgeRightLarge,
        &[KeyboardHotkey::shift(Key::ArrowRight)],
    ),
    (
        Action::BringForward,
        &[KeyboardHotkey::ctrl(Key::BracketRight)],
    ),
    (
        Action::SendBackward,
        &[KeyboardHotkey::ctrl(Key::BracketLeft)],
    ),
];
