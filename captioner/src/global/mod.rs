//! Global singletons.

pub mod hotkeys;
pub mod settings;

/// Where user-editable configuration lives. Not created if missing.
#[must_use]
pub fn preferences_dir() -> Option<std::path::PathBuf> {
    let mut base_dir = dirs::preference_dir()?;
    base_dir.push(env!("CARGO_PKG_NAME"));
    Some(base_dir)
}

/// Write `contents` to `file_name` in the preferences directory.
fn save_preference(file_name: &str, contents: &str) -> anyhow::Result<()> {
    let mut preferences =
        preferences_dir().ok_or_else(|| anyhow::anyhow!("No preferences dir found"))?;
    // Explicity do *not* create recursively. If not found, the user probably has a good reason.
    // Ignore errors (could already exist). Any real errors will be emitted by file access below.
    let _ = std::fs::DirBuilder::new().create(&preferences);

    preferences.push(file_name);
    std::fs::write(preferences, contents)?;
    Ok(())
}
