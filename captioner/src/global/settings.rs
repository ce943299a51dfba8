use captioner_core::{io::upload::DEFAULT_MAX_UPLOAD_BYTES, EditorConfig};

const DOCUMENTATION: &str = r#"# Captioner settings. You may edit this file, but be aware that formatting and comments will not
# be preserved. Missing fields take their default value.

# max_upload_bytes: largest background image accepted.
# storage_quota_bytes: largest saved editor state. Saving pauses with a warning past this.
# storage_dir: where the editor state is saved. Defaults to the platform's local data directory.
#
# [editor]
# history_depth: number of undo steps kept.
# lock_policy: "untracked" (locking is not undoable) or "undoable".
# nudge_step, nudge_step_large: pixels moved by arrow keys, without and with shift.
# duplicate_offset: how far a duplicate is placed from its source.
# add_offset_step, add_offset_cap: new layers cascade by step per existing layer, up to cap steps.

"#;

/// Browsers allow around this much local storage per site.
pub const DEFAULT_STORAGE_QUOTA_BYTES: u64 = 5 * 1024 * 1024;

#[derive(serde::Serialize, serde::Deserialize, Clone, PartialEq, Debug)]
#[serde(default)]
pub struct Settings {
    pub max_upload_bytes: u64,
    pub storage_quota_bytes: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_dir: Option<std::path::PathBuf>,
    pub editor: EditorConfig,
}
impl Default for Settings {
    fn default() -> Self {
        Self {
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            storage_quota_bytes: DEFAULT_STORAGE_QUOTA_BYTES,
            storage_dir: None,
            editor: EditorConfig::default(),
        }
    }
}
impl Settings {
    const FILENAME: &'static str = "settings.toml";
    /// Shared global settings, loaded from user preferences or defaulted.
    #[must_use]
    pub fn get() -> &'static Self {
        static GLOBAL_SETTINGS: std::sync::OnceLock<Settings> = std::sync::OnceLock::new();

        GLOBAL_SETTINGS.get_or_init(|| match super::preferences_dir() {
            None => {
                log::warn!("Settings weren't available, defaulting.");
                Self::default()
            }
            Some(mut dir) => {
                dir.push(Self::FILENAME);
                Self::load_or_default(&dir)
            }
        })
    }
    fn load_or_default(path: &std::path::Path) -> Self {
        let settings: anyhow::Result<Self> = try_block::try_block! {
            let string = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&string)?)
        };
        settings.unwrap_or_else(|e| {
            log::warn!("Failed to load {}, defaulting: {e:#}", path.display());
            Self::default()
        })
    }
    /// Directory holding the saved editor state.
    #[must_use]
    pub fn storage_dir(&self) -> Option<std::path::PathBuf> {
        self.storage_dir.clone().or_else(|| {
            let mut dir = dirs::data_local_dir()?;
            dir.push(env!("CARGO_PKG_NAME"));
            Some(dir)
        })
    }
    pub fn to_toml(&self) -> anyhow::Result<String> {
        let string = toml::ser::to_string_pretty(self)?;
        Ok(DOCUMENTATION.to_owned() + &string)
    }
    pub fn save(&self) -> anyhow::Result<()> {
        super::save_preference(Self::FILENAME, &self.to_toml()?)
    }
}
