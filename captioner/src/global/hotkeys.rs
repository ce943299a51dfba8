use captioner_core::actions::hotkeys::{ActionsToKeys, KeysToActions};

const DOCUMENTATION: &str = r#"# Captioner hotkeys. You may edit this file, but be aware that formatting and comments will not
# be preserved, and all keys and values are case sensitive.

# Available actions are specified here in [brackets]:
# Undo, Redo, DeleteSelected, DuplicateSelected, BringForward, SendBackward,
# NudgeUp, NudgeDown, NudgeLeft, NudgeRight, NudgeUpLarge, NudgeDownLarge, NudgeLeftLarge, NudgeRightLarge
# Keyboard hotkeys, specified by the "keyboard" field of an action, are written `[ctrl+][alt+][shift+]<key code>`,
# where the key code is named like a browser's `KeyboardEvent.code`. Cmd on mac counts as ctrl.
# Each action may have many hotkeys associated with it, but each hotkey should only be used at most once.

# Examples:
# [Undo]
# keyboard = ["ctrl+KeyZ"]
# [Redo]
# keyboard = ["ctrl+KeyY", "ctrl+shift+KeyZ"]

"#;

pub struct Hotkeys {
    failed_to_load: bool,
    pub actions_to_keys: ActionsToKeys,
    pub keys_to_actions: KeysToActions,
}
impl Hotkeys {
    const FILENAME: &'static str = "hotkeys.toml";
    /// Shared global hotkeys, saved and loaded from user preferences.
    /// (Or defaulted, if unavailable for some reason)
    #[must_use]
    pub fn get() -> &'static Self {
        static GLOBAL_HOTKEYS: std::sync::OnceLock<Hotkeys> = std::sync::OnceLock::new();

        GLOBAL_HOTKEYS.get_or_init(|| match super::preferences_dir() {
            None => Self::no_path(),
            Some(mut dir) => {
                dir.push(Self::FILENAME);
                Self::load_or_default(&dir)
            }
        })
    }
    #[must_use]
    pub fn no_path() -> Self {
        log::warn!("Hotkeys weren't available, defaulting.");
        Self {
            failed_to_load: true,
            ..Self::default()
        }
    }
    fn parse(string: &str) -> anyhow::Result<Self> {
        let actions_to_keys: ActionsToKeys = toml::from_str(string)?;
        let keys_to_actions: KeysToActions = (&actions_to_keys).try_into()?;
        Ok(Self {
            failed_to_load: false,
            actions_to_keys,
            keys_to_actions,
        })
    }
    #[must_use]
    fn load_or_default(path: &std::path::Path) -> Self {
        let hotkeys: anyhow::Result<Self> = try_block::try_block! {
            let string = std::fs::read_to_string(path)?;
            Self::parse(&string)
        };

        match hotkeys {
            Ok(hotkeys) => hotkeys,
            Err(e) => {
                log::warn!("Failed to load {}: {e:#}", path.display());
                Self::no_path()
            }
        }
    }
    /// Return true if loading user's settings failed. This can be useful for
    /// displaying a warning.
    #[must_use]
    pub fn did_fail_to_load(&self) -> bool {
        self.failed_to_load
    }
    pub fn to_toml(&self) -> anyhow::Result<String> {
        let string = toml::ser::to_string_pretty(&self.actions_to_keys)?;
        // Prefix some documentation.
        Ok(DOCUMENTATION.to_owned() + &string)
    }
    pub fn save(&self) -> anyhow::Result<()> {
        super::save_preference(Self::FILENAME, &self.to_toml()?)
    }
}
impl Default for Hotkeys {
    fn default() -> Self {
        let actions_to_keys = ActionsToKeys::default();
        // Default action map is reversable - this is checked by the default impl when debugging.
        let keys_to_actions = (&actions_to_keys)
            .try_into()
            .unwrap_or_else(|_| unreachable!("default hotkeys bind a key twice"));
        Self {
            failed_to_load: false,
            actions_to_keys,
            keys_to_actions,
        }
    }
}
