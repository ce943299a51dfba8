#![warn(clippy::pedantic)]

pub mod decode;
pub mod export;
pub mod fonts;
pub mod global;
pub mod shell;
pub mod storage;

use anyhow::Result as AnyResult;

fn main() -> AnyResult<()> {
    let has_term = std::io::IsTerminal::is_terminal(&std::io::stdin());
    // Log to a terminal, if available. Else, log to "log.out" in the working directory.
    if has_term {
        env_logger::builder()
            .filter_level(log::LevelFilter::Debug)
            .parse_default_env()
            .init();
    } else {
        let _ = simple_logging::log_to_file("log.out", log::LevelFilter::Debug);
    }

    let settings = global::settings::Settings::get();
    if let Err(e) = settings.save() {
        log::warn!("Failed to save settings:\n{e:?}");
    }
    let hotkeys = global::hotkeys::Hotkeys::get();
    if hotkeys.did_fail_to_load() {
        log::info!("Writing default hotkeys");
    }
    if let Err(e) = hotkeys.save() {
        log::warn!("Failed to save hotkey config:\n{e:?}");
    }

    let storage_dir = settings
        .storage_dir()
        .ok_or_else(|| anyhow::anyhow!("No local data directory to save into"))?;
    log::info!("Saving state to {}", storage_dir.display());
    let store = storage::FileStore::new(storage_dir, Some(settings.storage_quota_bytes));
    let editor = captioner_core::io::autosave::load_editor(&store, settings.editor.clone());

    let decoder = decode::Decoder::spawn()?;
    let fonts = fonts::FontBook::new_system();

    let mut shell = shell::Shell::new(
        editor,
        store,
        fonts,
        decoder,
        hotkeys.keys_to_actions.clone(),
        settings.max_upload_bytes,
    );
    shell.run(std::io::stdin().lock(), std::io::stdout().lock())
}
