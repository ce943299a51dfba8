//! # Command shell
//!
//! A line-oriented stand-in for a canvas UI. Each command maps onto what a pointer gesture,
//! property field, or shortcut would do, so the whole editor can be driven from a terminal
//! or a script.
//!
//! Between commands the shell settles: finished decodes are applied, the runtime image is
//! re-derived if the document's changed, custom fonts are loaded, and autosave runs.

use std::{io::Write, sync::Arc};

use anyhow::Context;
use captioner_core::{
    actions::hotkeys::{KeyEvent, KeyboardHotkey, KeysToActions},
    derive::{DeriveRequest, RuntimeCache},
    interaction::Interaction,
    io::{
        autosave::{Autosave, SaveOutcome},
        data_url,
        storage::KeyValueStore,
        upload,
    },
    state::{layer::LayerField, transform::TransformEnd},
    CustomFont, Editor, LayerID, LayerPatch,
};

use crate::{
    decode::{Decoder, Done, Job},
    export,
    fonts::{FontBook, BUILTIN_FAMILIES},
};

/// How long to wait on the decoder before giving up.
const DECODE_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

#[derive(Copy, Clone, PartialEq, Eq, Debug, strum::EnumString, strum::EnumIter, strum::AsRefStr)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
enum Command {
    Help,
    Image,
    Font,
    Fonts,
    Add,
    Select,
    Deselect,
    List,
    Show,
    Set,
    Drag,
    Transform,
    Key,
    #[strum(serialize = "dup", serialize = "duplicate")]
    Duplicate,
    Delete,
    Move,
    Raise,
    Lower,
    Lock,
    Bold,
    Italic,
    Undo,
    Redo,
    History,
    Export,
    Reset,
    #[strum(serialize = "quit", serialize = "exit")]
    Quit,
}
impl Command {
    fn usage(self) -> &'static str {
        match self {
            Self::Help => "help                      this list",
            Self::Image => "image <path> | clear      replace or remove the background PNG",
            Self::Font => "font <path> [family]      add a custom font",
            Self::Fonts => "fonts                     list font families",
            Self::Add => "add                       add a text layer",
            Self::Select => "select <layer>            select by index or id prefix",
            Self::Deselect => "deselect                  click on empty canvas",
            Self::List => "list                      layers, back to front",
            Self::Show => "show                      the selected layer in full",
            Self::Set => "set <field> <value>       edit the selected layer",
            Self::Drag => "drag <x> <y> [<x> <y>...] drag the selected layer through points",
            Self::Transform => "transform <x> <y> <deg> <sx> <sy>  finish a resize/rotate",
            Self::Key => "key <hotkey>              press a key, like ctrl+KeyZ",
            Self::Duplicate => "dup                       duplicate the selected layer",
            Self::Delete => "delete                    delete the selected layer",
            Self::Move => "move <layer> <target>     drop a layer onto another's place",
            Self::Raise => "raise                     bring the selected layer forward",
            Self::Lower => "lower                     send the selected layer backward",
            Self::Lock => "lock                      toggle the selected layer's lock",
            Self::Bold => "bold                      toggle bold",
            Self::Italic => "italic                    toggle italic",
            Self::Undo => "undo",
            Self::Redo => "redo",
            Self::History => "history                   undo and redo steps",
            Self::Export => "export [path]             write the flattened PNG",
            Self::Reset => "reset                     discard everything, including saved state",
            Self::Quit => "quit",
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Flow {
    Continue,
    Quit,
}

fn number(arg: Option<&str>, what: &str) -> anyhow::Result<f32> {
    let arg = arg.ok_or_else(|| anyhow::anyhow!("missing {what}"))?;
    let value: captioner_core::util::FiniteF32 =
        arg.parse().with_context(|| format!("{what} {arg:?}"))?;
    Ok(value.get())
}

pub struct Shell<S: KeyValueStore> {
    editor: Editor,
    interaction: Interaction,
    autosave: Autosave<S>,
    decoder: Decoder,
    images: RuntimeCache<Arc<image::RgbaImage>>,
    fonts: FontBook,
    keys: KeysToActions,
    max_upload_bytes: u64,
}

impl<S: KeyValueStore> Shell<S> {
    pub fn new(
        mut editor: Editor,
        store: S,
        fonts: FontBook,
        decoder: Decoder,
        keys: KeysToActions,
        max_upload_bytes: u64,
    ) -> Self {
        let autosave = Autosave::attach(store, &mut editor);
        Self {
            editor,
            interaction: Interaction::new(),
            autosave,
            decoder,
            images: RuntimeCache::new(),
            fonts,
            keys,
            max_upload_bytes,
        }
    }
    #[must_use]
    pub fn editor(&self) -> &Editor {
        &self.editor
    }
    /// Read commands until `quit` or end of input.
    pub fn run(&mut self, input: impl std::io::BufRead, mut out: impl Write) -> anyhow::Result<()> {
        self.settle(&mut out)?;
        writeln!(
            out,
            "{} layers. Type `help` for commands.",
            self.editor.document().layers.len()
        )?;
        for line in input.lines() {
            let line = line?;
            match self.execute(&line, &mut out) {
                Ok(Flow::Quit) => break,
                Ok(Flow::Continue) => (),
                Err(e) => writeln!(out, "error: {e:#}")?,
            }
            self.settle(&mut out)?;
        }
        Ok(())
    }
    /// Catch up on everything that follows from the last change.
    pub fn settle(&mut self, out: &mut impl Write) -> std::io::Result<()> {
        while let Some(done) = self.decoder.try_recv() {
            self.apply(done, out)?;
        }
        if let DeriveRequest::Decode { key, data_url } = self.images.request(self.editor.document())
        {
            if !self.decoder.submit(Job::Derive { key, data_url }) {
                log::error!("decoder is gone, background can't be shown");
            }
        }
        self.fonts.sync(self.editor.document());
        if let Some(id) = self.interaction.render_pass(&mut self.editor) {
            log::debug!("drag primed on {id}");
        }
        if let SaveOutcome::Failed(warning) = self.autosave.pump(&self.editor) {
            writeln!(out, "warning: {}", warning.message)?;
        }
        Ok(())
    }
    fn apply(&mut self, done: Done, out: &mut impl Write) -> std::io::Result<()> {
        match done {
            Done::Upload {
                ticket,
                result: Ok((source, image)),
            } => match self.editor.finish_image_load(ticket, source) {
                Ok(()) => {
                    // Already decoded, no need to go through the worker again.
                    if let DeriveRequest::Decode { key, .. } =
                        self.images.request(self.editor.document())
                    {
                        self.images.install(key, image);
                    }
                    let dims = self.editor.document().canvas_dimensions;
                    writeln!(out, "image loaded, canvas is {}x{}", dims.width, dims.height)?;
                }
                Err(e) => writeln!(out, "error: {e}")?,
            },
            Done::Upload { result: Err(e), .. } => writeln!(out, "error: {e}")?,
            Done::Derive {
                key,
                result: Ok(image),
            } => {
                self.images.install(key, image);
            }
            Done::Derive {
                key,
                result: Err(e),
            } => {
                log::error!("failed to decode document image {key:?}: {e}");
                writeln!(out, "error: the saved image could not be decoded: {e}")?;
            }
        }
        Ok(())
    }
    /// Block on the decoder until `last` matches a finished job, applying everything received.
    fn wait(&mut self, out: &mut impl Write, last: impl Fn(&Done) -> bool) -> anyhow::Result<()> {
        loop {
            let done = self
                .decoder
                .recv_timeout(DECODE_TIMEOUT)
                .ok_or_else(|| anyhow::anyhow!("timed out waiting on the image decoder"))?;
            let is_last = last(&done);
            self.apply(done, out)?;
            if is_last {
                return Ok(());
            }
        }
    }
    /// A layer by index in `list` order or by a unique id prefix.
    fn resolve(&self, arg: Option<&str>) -> anyhow::Result<LayerID> {
        let arg = arg.ok_or_else(|| anyhow::anyhow!("missing layer"))?;
        let layers = &self.editor.document().layers;
        if let Ok(index) = arg.parse::<usize>() {
            return layers
                .get(index)
                .map(|layer| layer.id)
                .ok_or_else(|| anyhow::anyhow!("no layer {index}"));
        }
        let mut matches = layers
            .iter()
            .filter(|layer| layer.id.to_string().starts_with(arg));
        match (matches.next(), matches.next()) {
            (Some(layer), None) => Ok(layer.id),
            (None, _) => anyhow::bail!("no layer {arg:?}"),
            (Some(_), Some(_)) => anyhow::bail!("{arg:?} matches more than one layer"),
        }
    }
    fn selected(&self) -> anyhow::Result<LayerID> {
        self.editor
            .document()
            .selected_layer_id
            .ok_or_else(|| anyhow::anyhow!("no layer selected"))
    }
    fn report(out: &mut impl Write, changed: bool) -> std::io::Result<()> {
        if !changed {
            writeln!(out, "nothing changed")?;
        }
        Ok(())
    }
    /// Run one command line.
    pub fn execute(&mut self, line: &str, out: &mut impl Write) -> anyhow::Result<Flow> {
        let line = line.trim();
        let (name, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        if name.is_empty() || name.starts_with('#') {
            return Ok(Flow::Continue);
        }
        let command: Command = name
            .parse()
            .map_err(|_| anyhow::anyhow!("unknown command {name:?}, try `help`"))?;
        let mut args = rest.split_whitespace();

        match command {
            Command::Help => {
                use strum::IntoEnumIterator;
                for command in Command::iter() {
                    writeln!(out, "  {}", command.usage())?;
                }
            }
            Command::Image if rest == "clear" => {
                let changed = self.editor.clear_image();
                Self::report(out, changed)?;
            }
            Command::Image => self.upload_image(rest, out)?,
            Command::Font => self.upload_font(rest, out)?,
            Command::Fonts => {
                for family in self.editor.document().font_families(BUILTIN_FAMILIES) {
                    let custom = if self.fonts.has_custom(family) {
                        " (custom)"
                    } else {
                        ""
                    };
                    writeln!(out, "  {family}{custom}")?;
                }
            }
            Command::Add => {
                let id = self.editor.add_layer();
                writeln!(out, "added {}", id.short())?;
            }
            Command::Select => {
                let id = self.resolve(args.next())?;
                self.interaction.pointer_down(&mut self.editor, id);
            }
            Command::Deselect => {
                self.interaction.background_click(&mut self.editor);
            }
            Command::List => self.list(out)?,
            Command::Show => {
                let id = self.selected()?;
                if let Some(layer) = self.editor.document().layer(id) {
                    writeln!(out, "{}", serde_json::to_string_pretty(layer)?)?;
                }
            }
            Command::Set => {
                let id = self.selected()?;
                let (field, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                let field: LayerField = field
                    .parse()
                    .map_err(|_| anyhow::anyhow!("unknown field {field:?}"))?;
                let value = value.trim().replace("\\n", "\n");
                let patch = LayerPatch::new(id).set(field, &value)?;
                let changed = self.editor.update(&patch);
                Self::report(out, changed)?;
            }
            Command::Drag => self.drag(&mut args)?,
            Command::Transform => {
                let id = self.selected()?;
                let end = TransformEnd {
                    x: number(args.next(), "x")?,
                    y: number(args.next(), "y")?,
                    rotation: number(args.next(), "rotation")?,
                    scale_x: number(args.next(), "scale x")?,
                    scale_y: number(args.next(), "scale y")?,
                };
                let changed = self.interaction.transform_end(&mut self.editor, id, end);
                Self::report(out, changed)?;
            }
            Command::Key => {
                let hotkey: KeyboardHotkey = rest.parse()?;
                match self
                    .keys
                    .dispatch(&mut self.editor, KeyEvent::from(hotkey), false)
                {
                    Some(action) => writeln!(out, "{}", action.as_ref())?,
                    None => writeln!(out, "{hotkey} is not bound")?,
                }
            }
            Command::Duplicate => match self.editor.duplicate_selected() {
                Some(id) => writeln!(out, "duplicated as {}", id.short())?,
                None => anyhow::bail!("no layer selected"),
            },
            Command::Delete => match self.editor.delete_selected() {
                Some(layer) => writeln!(out, "deleted {}", layer.id.short())?,
                None => anyhow::bail!("no layer selected"),
            },
            Command::Move => {
                let dragged = self.resolve(args.next())?;
                let target = self.resolve(args.next())?;
                let changed = self.editor.move_layer_onto(dragged, target);
                Self::report(out, changed)?;
            }
            Command::Raise => {
                let id = self.selected()?;
                let changed = self.editor.bring_forward(id);
                Self::report(out, changed)?;
            }
            Command::Lower => {
                let id = self.selected()?;
                let changed = self.editor.send_backward(id);
                Self::report(out, changed)?;
            }
            Command::Lock => {
                let id = self.selected()?;
                let changed = self.editor.toggle_lock(id);
                Self::report(out, changed)?;
            }
            Command::Bold => {
                let id = self.selected()?;
                let changed = self.editor.toggle_bold(id);
                Self::report(out, changed)?;
            }
            Command::Italic => {
                let id = self.selected()?;
                let changed = self.editor.toggle_italic(id);
                Self::report(out, changed)?;
            }
            Command::Undo => {
                let label = self.editor.undo_label().map(str::to_owned);
                match (self.editor.undo(), label) {
                    (true, Some(label)) => writeln!(out, "undid {label}")?,
                    (true, None) => (),
                    (false, _) => writeln!(out, "nothing to undo")?,
                }
            }
            Command::Redo => {
                let label = self.editor.redo_label().map(str::to_owned);
                match (self.editor.redo(), label) {
                    (true, Some(label)) => writeln!(out, "redid {label}")?,
                    (true, None) => (),
                    (false, _) => writeln!(out, "nothing to redo")?,
                }
            }
            Command::History => {
                let history = self.editor.history();
                for entry in history.past() {
                    writeln!(out, "  {}", entry.label.as_deref().unwrap_or("?"))?;
                }
                writeln!(out, "> now")?;
                for entry in history.future() {
                    writeln!(out, "  {}", entry.label.as_deref().unwrap_or("?"))?;
                }
            }
            Command::Export => self.export(rest, out)?,
            Command::Reset => {
                self.interaction = Interaction::new();
                let removed = self.autosave.reset(&mut self.editor);
                writeln!(out, "everything discarded")?;
                if let Err(err) = removed {
                    writeln!(out, "warning: saved state may come back: {err}")?;
                }
            }
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }
    fn list(&self, out: &mut impl Write) -> std::io::Result<()> {
        let document = self.editor.document();
        if document.layers.is_empty() {
            writeln!(out, "no layers")?;
        }
        for (index, layer) in document.layers.iter().enumerate() {
            let marker = if document.selected_layer_id == Some(layer.id) {
                '*'
            } else {
                ' '
            };
            let lock = if layer.locked { " [locked]" } else { "" };
            writeln!(
                out,
                "{marker}{index} {} ({}, {}) {:?}{lock}",
                layer.id.short(),
                layer.x,
                layer.y,
                layer.text
            )?;
        }
        Ok(())
    }
    fn upload_image(&mut self, path: &str, out: &mut impl Write) -> anyhow::Result<()> {
        anyhow::ensure!(!path.is_empty(), "missing path");
        let path = std::path::Path::new(path);
        let name = path.file_name().map(|name| name.to_string_lossy());
        let size = std::fs::metadata(path)
            .with_context(|| format!("reading {}", path.display()))?
            .len();
        upload::validate_png(name.as_deref().unwrap_or(""), None, size, self.max_upload_bytes)?;
        let bytes = std::fs::read(path)?;
        let ticket = self.editor.begin_image_load();
        anyhow::ensure!(
            self.decoder.submit(Job::Upload { ticket, bytes }),
            "image decoder is not running"
        );
        self.wait(
            out,
            |done| matches!(done, Done::Upload { ticket: t, .. } if *t == ticket),
        )
    }
    fn upload_font(&mut self, rest: &str, out: &mut impl Write) -> anyhow::Result<()> {
        let (path, family) = match rest.split_once(char::is_whitespace) {
            Some((path, family)) => (path, Some(family)),
            None => (rest, None),
        };
        anyhow::ensure!(!path.is_empty(), "missing path");
        let path = std::path::Path::new(path);
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let family = upload::validate_font(&name, family)?;
        let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        let extension = name.rsplit_once('.').map_or("ttf", |(_, ext)| ext);
        let url = data_url::encode(&format!("font/{}", extension.to_ascii_lowercase()), &bytes);
        if let Err(e) = self.fonts.add_custom(&family, bytes) {
            writeln!(out, "warning: {e}, exports will use a fallback face")?;
        }
        self.editor.add_custom_font(CustomFont {
            family: family.clone(),
            url,
        });
        writeln!(out, "added font {family:?}")?;
        Ok(())
    }
    fn drag<'a>(&mut self, args: &mut impl Iterator<Item = &'a str>) -> anyhow::Result<()> {
        let id = self.selected()?;
        let mut points = Vec::new();
        while let Some(x) = args.next() {
            points.push([number(Some(x), "x")?, number(args.next(), "y")?]);
        }
        let Some((&[x, y], path)) = points.split_last() else {
            anyhow::bail!("missing x y");
        };
        if self.interaction.dragging() != Some(id) {
            self.interaction.pointer_down(&mut self.editor, id);
        }
        anyhow::ensure!(self.interaction.dragging() == Some(id), "layer is locked");
        for &[x, y] in path {
            self.interaction.drag_move(x, y);
            self.interaction.frame(&mut self.editor);
        }
        self.interaction.drag_move(x, y);
        self.interaction.drag_end(&mut self.editor, x, y);
        Ok(())
    }
    fn export(&mut self, path: &str, out: &mut impl Write) -> anyhow::Result<()> {
        let path = if path.is_empty() {
            export::DEFAULT_FILE_NAME
        } else {
            path
        };
        if self.editor.document().has_image() && self.images.image().is_none() {
            self.wait(out, |done| matches!(done, Done::Derive { .. }))?;
        }
        export::export(
            self.images.image().map(|image| &**image),
            self.editor.document(),
            &self.fonts,
            std::path::Path::new(path),
        )?;
        writeln!(out, "wrote {path}")?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use captioner_core::{io::storage::MemoryStore, EditorConfig};

    fn shell(store: &MemoryStore) -> Shell<&MemoryStore> {
        Shell::new(
            Editor::new(EditorConfig::default()),
            store,
            FontBook::empty(),
            Decoder::spawn().unwrap(),
            crate::global::hotkeys::Hotkeys::default().keys_to_actions,
            upload::DEFAULT_MAX_UPLOAD_BYTES,
        )
    }
    fn run(shell: &mut Shell<&MemoryStore>, line: &str) -> String {
        let mut out = Vec::new();
        if let Err(e) = shell.execute(line, &mut out) {
            writeln!(out, "error: {e:#}").unwrap();
        }
        shell.settle(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }
    fn scratch(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("captioner-shell-{}-{name}", std::process::id()))
    }

    #[test]
    fn edit_and_undo() {
        let store = MemoryStore::new();
        let mut shell = shell(&store);
        run(&mut shell, "add");
        run(&mut shell, "set text Hello\\nworld");
        assert_eq!(shell.editor().document().layers[0].text, "Hello\nworld");
        assert_eq!(run(&mut shell, "undo"), "undid edit\n");
        assert_eq!(
            shell.editor().document().layers[0].text,
            "Double-click to edit"
        );
        assert_eq!(run(&mut shell, "redo"), "redid edit\n");
    }
    #[test]
    fn bad_input_is_reported() {
        let store = MemoryStore::new();
        let mut shell = shell(&store);
        assert!(run(&mut shell, "frobnicate").starts_with("error: unknown command"));
        assert!(run(&mut shell, "set text hi").contains("no layer selected"));
        run(&mut shell, "add");
        assert!(run(&mut shell, "set fill red").starts_with("error:"));
        assert!(run(&mut shell, "set wobble 1").contains("unknown field"));
        assert_eq!(shell.editor().history_counts(), (1, 0));
    }
    #[test]
    fn drag_is_one_step() {
        let store = MemoryStore::new();
        let mut shell = shell(&store);
        run(&mut shell, "add");
        run(&mut shell, "drag 70 70 80 80 100 120");
        let layer = &shell.editor().document().layers[0];
        assert_eq!((layer.x, layer.y), (100.0, 120.0));
        assert_eq!(shell.editor().undo_label(), Some("move"));
        run(&mut shell, "undo");
        let layer = &shell.editor().document().layers[0];
        assert_eq!((layer.x, layer.y), (60.0, 60.0));
    }
    #[test]
    fn duplicate_primes_drag() {
        let store = MemoryStore::new();
        let mut shell = shell(&store);
        run(&mut shell, "add");
        run(&mut shell, "dup");
        let copy = shell.editor().document().selected_layer_id;
        assert_eq!(shell.interaction.dragging(), copy);
    }
    #[test]
    fn locked_layers_stay_put() {
        let store = MemoryStore::new();
        let mut shell = shell(&store);
        run(&mut shell, "add");
        run(&mut shell, "lock");
        assert!(run(&mut shell, "drag 5 5").contains("locked"));
        assert_eq!(run(&mut shell, "key ArrowUp"), "NudgeUp\n");
        let layer = &shell.editor().document().layers[0];
        assert_eq!((layer.x, layer.y), (60.0, 60.0));
    }
    #[test]
    fn keys_dispatch() {
        let store = MemoryStore::new();
        let mut shell = shell(&store);
        run(&mut shell, "add");
        assert_eq!(run(&mut shell, "key shift+ArrowRight"), "NudgeRightLarge\n");
        assert_eq!(shell.editor().document().layers[0].x, 70.0);
        assert_eq!(run(&mut shell, "key ctrl+KeyZ"), "Undo\n");
        assert_eq!(shell.editor().document().layers[0].x, 60.0);
        assert_eq!(run(&mut shell, "key KeyQ"), "KeyQ is not bound\n");
    }
    #[test]
    fn autosaves_between_commands() {
        let store = MemoryStore::new();
        let mut shell = shell(&store);
        run(&mut shell, "add");
        let saved = captioner_core::io::autosave::load_editor(&store, EditorConfig::default());
        assert_eq!(saved.document(), shell.editor().document());

        run(&mut shell, "reset");
        assert!(shell.editor().document().layers.is_empty());
        assert!(store
            .get(captioner_core::io::persist::STORAGE_KEY)
            .unwrap()
            .is_none());
    }
    #[test]
    fn quota_warning_is_printed() {
        let store = MemoryStore::with_quota(16);
        let mut shell = shell(&store);
        let out = run(&mut shell, "add");
        assert!(out.contains("warning: Autosave paused"), "{out}");
        assert_eq!(shell.editor().document().layers.len(), 1);
    }
    #[test]
    fn image_then_export() {
        let store = MemoryStore::new();
        let mut shell = shell(&store);
        assert!(run(&mut shell, "export").contains("Upload an image"));

        let png = scratch("background.png");
        image::RgbaImage::from_pixel(8, 6, image::Rgba([1, 2, 3, 255]))
            .save(&png)
            .unwrap();
        let out = run(&mut shell, &format!("image {}", png.display()));
        assert_eq!(out, "image loaded, canvas is 8x6\n");
        assert_eq!(shell.editor().undo_label(), Some("replace image"));

        let exported = scratch("out.png");
        run(&mut shell, &format!("export {}", exported.display()));
        let written = image::open(&exported).unwrap().into_rgba8();
        assert_eq!(written.dimensions(), (8, 6));
        assert_eq!(written.get_pixel(0, 0).0, [1, 2, 3, 255]);

        let _ = std::fs::remove_file(png);
        let _ = std::fs::remove_file(exported);
    }
    #[test]
    fn rejects_non_png() {
        let store = MemoryStore::new();
        let mut shell = shell(&store);
        let jpeg = scratch("photo.jpg");
        std::fs::write(&jpeg, b"\xff\xd8\xff").unwrap();
        assert!(run(&mut shell, &format!("image {}", jpeg.display())).contains("PNG"));
        assert!(!shell.editor().document().has_image());
        let _ = std::fs::remove_file(jpeg);
    }
}
