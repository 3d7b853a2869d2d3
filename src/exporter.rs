//! Resource-pack export
//!
//! Writes the edited textures plus a generated `pack.mcmeta` into a new ZIP
//! archive. The pack is assembled in a scratch directory first, then zipped
//! into a temporary file next to the destination and renamed into place, so a
//! failed export never leaves a half-written archive at the destination.
//!
//! Only the textures handed in are exported; untouched originals are not
//! included.

use image::RgbaImage;
use serde::Serialize;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use zip::write::SimpleFileOptions;
use zip::CompressionMethod;

use crate::output::{encode_png, OutputError};
use crate::raster::TexturePath;
use crate::textures::TextureSet;
use crate::versions::{self, DEFAULT_VERSION_LABEL};

/// Manifest entry name at the pack root
pub const MANIFEST_NAME: &str = "pack.mcmeta";

/// Description written when none is configured (`§b` renders aqua in-game)
pub const DEFAULT_DESCRIPTION: &str = "§bErstellt mit Texture Editor";

/// Error type for export operations
#[derive(Debug, Error)]
pub enum ExportError {
    /// The edited set is empty
    #[error("there are no edited textures to export")]
    NothingToExport,
    /// Strict mode rejected the version label
    #[error("unknown Minecraft version '{0}'")]
    UnknownVersion(String),
    /// A texture path would escape the pack root
    #[error("texture path '{0}' cannot be written into a pack")]
    UnsafePath(TexturePath),
    /// File I/O error while staging or writing
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// PNG encoding error
    #[error("failed to encode '{path}': {message}")]
    Encode { path: TexturePath, message: String },
    /// ZIP assembly error
    #[error("failed to write archive: {0}")]
    Zip(#[from] zip::result::ZipError),
    /// Manifest serialization error
    #[error("failed to write pack.mcmeta: {0}")]
    Manifest(#[from] serde_json::Error),
    /// Renaming the finished archive into place failed
    #[error("failed to finalize '{path}': {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// `pack.mcmeta` document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackManifest {
    pub pack: PackSection,
}

/// The `pack` object inside `pack.mcmeta`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackSection {
    pub pack_format: u32,
    pub description: String,
}

impl PackManifest {
    pub fn new(pack_format: u32, description: impl Into<String>) -> Self {
        Self { pack: PackSection { pack_format, description: description.into() } }
    }

    /// Render as pretty-printed JSON.
    ///
    /// ```
    /// use mctex::exporter::PackManifest;
    ///
    /// let text = PackManifest::new(6, "demo").to_mcmeta().unwrap();
    /// assert_eq!(
    ///     text,
    ///     "{\n  \"pack\": {\n    \"pack_format\": 6,\n    \"description\": \"demo\"\n  }\n}"
    /// );
    /// ```
    pub fn to_mcmeta(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Export settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    /// Version label looked up in [`versions::VERSION_FORMATS`]
    pub version_label: String,
    /// Manifest description
    pub description: String,
    /// Reject unknown version labels instead of using the newest format
    pub strict_version: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            version_label: DEFAULT_VERSION_LABEL.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
            strict_version: false,
        }
    }
}

impl ExportOptions {
    pub fn for_version(label: impl Into<String>) -> Self {
        Self { version_label: label.into(), ..Default::default() }
    }
}

/// What an export wrote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub destination: PathBuf,
    pub version_label: String,
    pub pack_format: u32,
    /// The label was unknown and the default format was written
    pub used_default_format: bool,
    pub texture_count: usize,
}

/// Export `edited` as a resource pack at `destination`.
///
/// # Errors
///
/// - [`ExportError::NothingToExport`] if `edited` is empty; nothing is created.
/// - [`ExportError::UnknownVersion`] in strict mode for unknown labels.
/// - Any write failure; the destination is left untouched in that case.
pub fn export_pack(
    edited: &TextureSet,
    options: &ExportOptions,
    destination: &Path,
) -> Result<ExportSummary, ExportError> {
    if edited.is_empty() {
        return Err(ExportError::NothingToExport);
    }

    let resolved = versions::resolve(&options.version_label);
    if !resolved.known && options.strict_version {
        return Err(ExportError::UnknownVersion(options.version_label.clone()));
    }
    if let Some(bad) = edited.paths().find(|p| !p.is_safe_relative()) {
        return Err(ExportError::UnsafePath(bad.clone()));
    }

    log::info!(
        "Exporting {} textures with pack_format {} for version {}",
        edited.len(),
        resolved.format,
        options.version_label
    );

    let manifest = PackManifest::new(resolved.format, options.description.clone());
    let staging = tempfile::Builder::new().prefix("mctex-export-").tempdir()?;
    let staged = stage_pack(staging.path(), &manifest, edited)?;
    write_archive(staging.path(), &staged, destination)?;
    // Dropping `staging` removes the scratch directory, on error paths too

    Ok(ExportSummary {
        destination: destination.to_path_buf(),
        version_label: options.version_label.clone(),
        pack_format: resolved.format,
        used_default_format: !resolved.known,
        texture_count: edited.len(),
    })
}

/// Write the manifest and every texture below `root`.
///
/// Returns the entry names in archive order.
fn stage_pack(
    root: &Path,
    manifest: &PackManifest,
    textures: &TextureSet,
) -> Result<Vec<String>, ExportError> {
    let mut entries = Vec::with_capacity(textures.len() + 1);

    fs::write(root.join(MANIFEST_NAME), manifest.to_mcmeta()?)?;
    entries.push(MANIFEST_NAME.to_string());

    for (path, image) in textures.iter() {
        stage_texture(root, path, image)?;
        entries.push(path.as_str().to_string());
    }

    Ok(entries)
}

fn stage_texture(root: &Path, path: &TexturePath, image: &RgbaImage) -> Result<(), ExportError> {
    let target = path.as_str().split('/').fold(root.to_path_buf(), |acc, part| acc.join(part));
    let png = encode_png(image).map_err(|e| match e {
        OutputError::Io(io) => ExportError::Io(io),
        OutputError::Image(err) => ExportError::Encode { path: path.clone(), message: err.to_string() },
    })?;
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&target, png)?;
    Ok(())
}

/// Zip the staged entries into a temp file beside `destination`, then rename it over.
fn write_archive(root: &Path, entries: &[String], destination: &Path) -> Result<(), ExportError> {
    let parent = match destination.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let partial = tempfile::Builder::new().prefix(".mctex-").suffix(".zip.part").tempfile_in(&parent)?;

    {
        let mut zip = zip::ZipWriter::new(BufWriter::new(partial.as_file()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        for name in entries {
            let source = name.split('/').fold(root.to_path_buf(), |acc, part| acc.join(part));
            let data = fs::read(&source)?;
            zip.start_file(name.as_str(), options)?;
            zip.write_all(&data)?;
        }
        let mut writer = zip.finish()?;
        writer.flush()?;
    }
    partial.as_file().sync_all()?;

    partial
        .persist(destination)
        .map_err(|e| ExportError::Persist { path: destination.to_path_buf(), source: e.error })?;
    Ok(())
}

/// Parse the manifest of a pack archive.
pub fn read_manifest<R: std::io::Read + std::io::Seek>(
    archive: &mut zip::ZipArchive<R>,
) -> Result<serde_json::Value, ExportError> {
    let entry = archive.by_name(MANIFEST_NAME)?;
    Ok(serde_json::from_reader(entry)?)
}
