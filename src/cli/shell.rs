//! Interactive editing shell
//!
//! Reads one command per line and drives the same workflow as the desktop
//! editor: import an archive, open a texture, pick colors, click cells, save
//! the edit and export every edited texture as a resource pack.
//!
//! At most one editor is open at a time. Its changes stay private until
//! `save`; `cancel`, `quit` and end of input discard them.

use image::Rgba;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process::ExitCode;
use std::str::FromStr;
use thiserror::Error;

use crate::color::{format_hex, parse_color, ColorError};
use crate::config::MctexConfig;
use crate::editor::{ColorPicker, EditorSession};
use crate::exporter::ExportError;
use crate::importer::{import_archive, ImportError};
use crate::output::{save_png, OutputError};
use crate::raster::{RasterError, TexturePath};
use crate::state::{AppState, StateError};
use crate::terminal::render_ansi_with_coordinates;
use crate::versions::{canonical_label, pack_format, DEFAULT_PACK_FORMAT};

use super::info::{known_labels, version_table};
use super::paint::{export_message, NOTHING_TO_EXPORT};
use super::{EXIT_ERROR, EXIT_SUCCESS};

const HELP: &str = "\
Commands:
  import <archive>     Load textures from a mod archive (.jar/.zip)
  list                 List imported textures (* = edited)
  open <n|path>        Open an editor on a texture
  color [COLOR]        Pick the paint color (no argument cancels)
  click <px> <py>      Click the canvas at pointer coordinates
  paint <x> <y>        Paint a texture pixel directly
  show [n|path]        Preview the open editor or a texture
  render <file.png>    Save the editor canvas as PNG
  save                 Save the open editor and close it
  cancel               Close the open editor without saving
  revert <n|path>      Drop the saved edit of a texture
  edits                List edited textures
  clear                Drop all saved edits
  version [LABEL]      Show or select the Minecraft version
  versions             List Minecraft versions and pack formats
  export [file.zip]    Write edited textures as a resource pack
  help                 Show this help
  quit                 Leave the shell";

/// Shell command failure. The shell reports it and keeps reading.
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("unknown command '{0}' (try 'help')")]
    UnknownCommand(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("no editor is open")]
    NoEditor,
    #[error("an editor is already open on {0}; save or cancel it first")]
    EditorOpen(TexturePath),
    #[error("no texture matches '{0}'")]
    NoSuchTexture(String),
    #[error(transparent)]
    Import(#[from] ImportError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    State(#[from] StateError),
    #[error(transparent)]
    Raster(#[from] RasterError),
    #[error(transparent)]
    Output(#[from] OutputError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// What the read loop does after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Color picker answering with a color typed on the command line.
///
/// A missing argument is a cancelled dialog; so is an unparseable one.
struct ArgumentPicker<'a> {
    input: Option<&'a str>,
    rejected: Option<ColorError>,
}

impl ColorPicker for ArgumentPicker<'_> {
    fn pick(&mut self, _current: Rgba<u8>) -> Option<Rgba<u8>> {
        match parse_color(self.input?) {
            Ok(color) => Some(color),
            Err(e) => {
                self.rejected = Some(e);
                None
            }
        }
    }
}

struct OpenEditor {
    path: TexturePath,
    session: EditorSession,
}

/// Line-oriented editing shell writing its transcript to `out`.
pub struct Shell<W: Write> {
    state: AppState,
    config: MctexConfig,
    editor: Option<OpenEditor>,
    out: W,
    failures: usize,
}

impl<W: Write> Shell<W> {
    pub fn new(config: MctexConfig, out: W) -> Self {
        Self { state: AppState::new(), config, editor: None, out, failures: 0 }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Selected Minecraft version label.
    pub fn version(&self) -> &str {
        &self.config.pack.version
    }

    /// Number of commands that failed so far.
    pub fn failures(&self) -> usize {
        self.failures
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Execute commands from `input` until `quit` or end of input.
    ///
    /// Returns the number of failed commands.
    pub fn run<R: BufRead>(&mut self, input: R) -> io::Result<usize> {
        for line in input.lines() {
            let result = self.execute(&line?);
            if self.report(result)? == Flow::Quit {
                break;
            }
        }
        self.discard_editor()?;
        self.out.flush()?;
        Ok(self.failures)
    }

    /// Print a failed command and count it.
    pub fn report(&mut self, result: Result<Flow, ShellError>) -> io::Result<Flow> {
        match result {
            Ok(flow) => Ok(flow),
            Err(ShellError::Io(e)) => Err(e),
            Err(e) => {
                self.failures += 1;
                log::debug!("Shell command failed: {:?}", e);
                writeln!(self.out, "Error: {}", e)?;
                Ok(Flow::Continue)
            }
        }
    }

    /// Execute one command line. Blank lines and `#` comments do nothing.
    pub fn execute(&mut self, line: &str) -> Result<Flow, ShellError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(Flow::Continue);
        }

        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };
        let arg = (!rest.is_empty()).then_some(rest);

        match command.to_ascii_lowercase().as_str() {
            "import" => self.import(Path::new(arg.ok_or(ShellError::Usage("import <archive>"))?)),
            "list" | "ls" => self.list(),
            "open" => self.open(arg.ok_or(ShellError::Usage("open <n|path>"))?),
            "color" => self.color(arg),
            "click" => self.click(rest),
            "paint" => self.paint(rest),
            "show" => self.show(arg),
            "render" => self.render(arg.ok_or(ShellError::Usage("render <file.png>"))?),
            "save" => self.save(),
            "cancel" => self.cancel(),
            "revert" => self.revert(arg.ok_or(ShellError::Usage("revert <n|path>"))?),
            "edits" => self.edits(),
            "clear" => self.clear(),
            "version" => self.select_version(arg),
            "versions" => Ok(write!(self.out, "{}", version_table(&self.config.pack.version))?),
            "export" => self.export(arg),
            "help" | "?" => Ok(writeln!(self.out, "{}", HELP)?),
            "quit" | "exit" => return Ok(Flow::Quit),
            other => return Err(ShellError::UnknownCommand(other.to_string())),
        }?;

        Ok(Flow::Continue)
    }

    /// Replace the imported originals with the textures of `archive`.
    pub fn import(&mut self, archive: &Path) -> Result<(), ShellError> {
        let result = import_archive(archive)?;
        for skipped in &result.skipped {
            writeln!(self.out, "Warning: skipped {}: {}", skipped.path, skipped.reason)?;
        }
        writeln!(
            self.out,
            "Imported {} textures from {}",
            result.textures.len(),
            archive.display()
        )?;
        self.state.load_import(result);
        Ok(())
    }

    fn list(&mut self) -> Result<(), ShellError> {
        let gallery = self.state.gallery();
        if gallery.is_empty() {
            writeln!(self.out, "(no textures imported)")?;
        }
        for (i, item) in gallery.iter().enumerate() {
            writeln!(
                self.out,
                "{:>3}. {}{}  {}x{}",
                i + 1,
                item.path,
                if item.edited { " *" } else { "" },
                item.image.width(),
                item.image.height()
            )?;
        }
        Ok(())
    }

    /// Resolve a 1-based gallery index or a texture path.
    fn resolve_texture(&self, reference: &str) -> Result<TexturePath, ShellError> {
        let not_found = || ShellError::NoSuchTexture(reference.to_string());

        if let Ok(index) = reference.parse::<usize>() {
            return index
                .checked_sub(1)
                .and_then(|i| self.state.originals().paths().nth(i))
                .cloned()
                .ok_or_else(not_found);
        }

        let path = TexturePath::from(reference);
        if self.state.display_image(&path).is_some() {
            Ok(path)
        } else {
            Err(not_found())
        }
    }

    fn open(&mut self, reference: &str) -> Result<(), ShellError> {
        if let Some(open) = &self.editor {
            return Err(ShellError::EditorOpen(open.path.clone()));
        }

        let path = self.resolve_texture(reference)?;
        let session = self.state.open_editor(&path, self.config.editor_options())?;
        let (w, h) = session.dimensions();
        writeln!(
            self.out,
            "Editing {} ({}x{}, {}px cells, color {}){}",
            path,
            w,
            h,
            session.pixel_size(),
            format_hex(session.color()),
            if self.state.is_edited(&path) { " from saved edit" } else { "" }
        )?;
        self.editor = Some(OpenEditor { path, session });
        Ok(())
    }

    fn color(&mut self, input: Option<&str>) -> Result<(), ShellError> {
        let open = self.editor.as_mut().ok_or(ShellError::NoEditor)?;
        let mut picker = ArgumentPicker { input, rejected: None };

        if open.session.choose_color(&mut picker) {
            writeln!(self.out, "Color: {}", format_hex(open.session.color()))?;
        } else {
            if let Some(e) = picker.rejected {
                writeln!(self.out, "Warning: {}", e)?;
            }
            writeln!(self.out, "Color unchanged: {}", format_hex(open.session.color()))?;
        }
        Ok(())
    }

    fn click(&mut self, args: &str) -> Result<(), ShellError> {
        let open = self.editor.as_mut().ok_or(ShellError::NoEditor)?;
        let (px, py) = parse_pair::<i32>(args, "click <px> <py>")?;

        match open.session.click(px, py) {
            Some((x, y)) => writeln!(
                self.out,
                "Painted ({}, {}) {}",
                x,
                y,
                format_hex(open.session.color())
            )?,
            None => writeln!(self.out, "Outside the image")?,
        }
        Ok(())
    }

    fn paint(&mut self, args: &str) -> Result<(), ShellError> {
        let open = self.editor.as_mut().ok_or(ShellError::NoEditor)?;
        let (x, y) = parse_pair::<u32>(args, "paint <x> <y>")?;

        if open.session.paint(x, y) {
            writeln!(self.out, "Painted ({}, {}) {}", x, y, format_hex(open.session.color()))?;
        } else {
            writeln!(self.out, "Outside the image")?;
        }
        Ok(())
    }

    fn show(&mut self, reference: Option<&str>) -> Result<(), ShellError> {
        let (title, image) = match (reference, &self.editor) {
            (Some(reference), _) => {
                let path = self.resolve_texture(reference)?;
                let image = self
                    .state
                    .display_image(&path)
                    .cloned()
                    .ok_or_else(|| ShellError::NoSuchTexture(reference.to_string()))?;
                (path.to_string(), image)
            }
            (None, Some(open)) => (format!("{} (editing)", open.path), open.session.snapshot()?),
            (None, None) => return Err(ShellError::Usage("show <n|path>")),
        };

        writeln!(self.out, "{}", title)?;
        write!(self.out, "{}", render_ansi_with_coordinates(&image))?;
        Ok(())
    }

    fn render(&mut self, destination: &str) -> Result<(), ShellError> {
        let open = self.editor.as_ref().ok_or(ShellError::NoEditor)?;
        let canvas = open.session.render()?;
        save_png(&canvas, Path::new(destination))?;
        writeln!(self.out, "Saved: {} ({}x{})", destination, canvas.width(), canvas.height())?;
        Ok(())
    }

    fn save(&mut self) -> Result<(), ShellError> {
        let open = self.editor.take().ok_or(ShellError::NoEditor)?;
        let image = open.session.commit()?;
        writeln!(self.out, "Saved {}", open.path)?;
        self.state.apply_edit(open.path, image);
        Ok(())
    }

    fn cancel(&mut self) -> Result<(), ShellError> {
        let open = self.editor.take().ok_or(ShellError::NoEditor)?;
        writeln!(self.out, "Discarded changes to {}", open.path)?;
        open.session.abandon();
        Ok(())
    }

    /// Close the open editor, if any, without saving.
    fn discard_editor(&mut self) -> io::Result<()> {
        if let Some(open) = self.editor.take() {
            writeln!(self.out, "Discarded unsaved changes to {}", open.path)?;
            open.session.abandon();
        }
        Ok(())
    }

    fn revert(&mut self, reference: &str) -> Result<(), ShellError> {
        let path = self.resolve_texture(reference)?;
        if self.state.revert(&path) {
            writeln!(self.out, "Reverted {}", path)?;
        } else {
            writeln!(self.out, "{} has no edits", path)?;
        }
        Ok(())
    }

    fn edits(&mut self) -> Result<(), ShellError> {
        if self.state.edited().is_empty() {
            writeln!(self.out, "(no edits)")?;
        }
        for path in self.state.edited().paths() {
            writeln!(self.out, "{}", path)?;
        }
        Ok(())
    }

    fn clear(&mut self) -> Result<(), ShellError> {
        let count = self.state.edited().len();
        self.state.clear_edits();
        writeln!(self.out, "Cleared {} edits", count)?;
        Ok(())
    }

    fn select_version(&mut self, label: Option<&str>) -> Result<(), ShellError> {
        if let Some(label) = label {
            self.config.pack.version =
                canonical_label(label).map_or_else(|| label.to_string(), str::to_string);
        }

        let version = &self.config.pack.version;
        match pack_format(version) {
            Some(format) => writeln!(self.out, "Version: {} (pack_format {})", version, format)?,
            None => writeln!(
                self.out,
                "Warning: unknown version '{}'; exports use pack_format {} (known: {})",
                version,
                DEFAULT_PACK_FORMAT,
                known_labels()
            )?,
        }
        Ok(())
    }

    /// Export the edited textures. Without a destination nothing happens.
    fn export(&mut self, destination: Option<&str>) -> Result<(), ShellError> {
        let Some(destination) = destination else {
            return Ok(());
        };

        match self.state.export(&self.config.export_options(), Path::new(destination)) {
            Ok(summary) => writeln!(self.out, "{}", export_message(&summary))?,
            Err(ExportError::NothingToExport) => {
                writeln!(self.out, "Warning: {}", NOTHING_TO_EXPORT)?
            }
            Err(e) => return Err(e.into()),
        }
        Ok(())
    }
}

/// Parse two numbers separated by whitespace or a comma.
fn parse_pair<T: FromStr>(args: &str, usage: &'static str) -> Result<(T, T), ShellError> {
    let mut parts = args.split(|c: char| c == ',' || c.is_whitespace()).filter(|s| !s.is_empty());
    match (parts.next(), parts.next(), parts.next()) {
        (Some(a), Some(b), None) => match (a.parse(), b.parse()) {
            (Ok(a), Ok(b)) => Ok((a, b)),
            _ => Err(ShellError::Usage(usage)),
        },
        _ => Err(ShellError::Usage(usage)),
    }
}

/// Execute the shell command
pub fn run_shell(archive: Option<&Path>, config: MctexConfig) -> ExitCode {
    let stdout = io::stdout();
    let mut shell = Shell::new(config, stdout.lock());

    let outcome = match archive {
        Some(archive) => {
            let result = shell.import(archive).map(|()| Flow::Continue);
            shell.report(result)
        }
        None => Ok(Flow::Continue),
    };

    match outcome.and_then(|_| shell.run(io::stdin().lock())) {
        Ok(0) => ExitCode::from(EXIT_SUCCESS),
        Ok(_) => ExitCode::from(EXIT_ERROR),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}
