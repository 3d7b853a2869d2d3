//! Texture extraction from mod archives
//!
//! Mod `.jar` files are ZIP containers. Every entry under [`TEXTURE_PREFIX`]
//! ending in [`TEXTURE_EXTENSION`] is decoded as PNG and converted to RGBA8.
//!
//! Failures are handled at two levels:
//! - The archive itself (missing file, not a ZIP) fails the whole import.
//! - A single unreadable or undecodable entry is skipped and recorded in
//!   [`ImportResult::skipped`]; the remaining entries are still imported.

use image::ImageFormat;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::raster::TexturePath;
use crate::textures::TextureSet;

/// Entries must start with this prefix to be imported
pub const TEXTURE_PREFIX: &str = "assets/";

/// Entries must end with this extension to be imported
pub const TEXTURE_EXTENSION: &str = ".png";

/// Error opening an archive for import
#[derive(Debug, Error)]
pub enum ImportError {
    /// The archive file could not be opened
    #[error("cannot open '{path}': {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The data is not a readable ZIP container
    #[error("not a valid archive: {0}")]
    Archive(#[from] zip::result::ZipError),
}

/// An entry that matched the texture filter but could not be imported
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedEntry {
    pub path: TexturePath,
    pub reason: String,
}

/// Textures extracted from one archive
#[derive(Debug, Clone, Default)]
pub struct ImportResult {
    /// Decoded textures in archive order
    pub textures: TextureSet,
    /// Matching entries that failed to read or decode
    pub skipped: Vec<SkippedEntry>,
}

/// Whether an archive entry name is an importable texture.
pub fn is_texture_entry(name: &str) -> bool {
    name.starts_with(TEXTURE_PREFIX) && name.ends_with(TEXTURE_EXTENSION)
}

/// Import all textures from the archive at `path`.
///
/// # Errors
///
/// Returns [`ImportError`] if the file cannot be opened or is not a ZIP
/// archive. Bad entries never cause an error.
pub fn import_archive(path: &Path) -> Result<ImportResult, ImportError> {
    let file =
        File::open(path).map_err(|source| ImportError::Open { path: path.to_path_buf(), source })?;
    let result = import_from_reader(BufReader::new(file))?;
    log::info!(
        "Imported {} textures from '{}' ({} skipped)",
        result.textures.len(),
        path.display(),
        result.skipped.len()
    );
    Ok(result)
}

/// Import all textures from an archive held by any seekable reader.
pub fn import_from_reader<R: Read + Seek>(reader: R) -> Result<ImportResult, ImportError> {
    let mut archive = zip::ZipArchive::new(reader)?;
    let mut result = ImportResult::default();

    for i in 0..archive.len() {
        let mut entry = match archive.by_index(i) {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("Skipping archive entry #{}: {}", i, e);
                continue;
            }
        };
        if entry.is_dir() || !is_texture_entry(entry.name()) {
            continue;
        }

        let path = TexturePath::new(entry.name());
        let mut data = Vec::new();
        if let Err(e) = entry.read_to_end(&mut data) {
            skip(&mut result, path, format!("read failed: {}", e));
            continue;
        }

        match image::load_from_memory_with_format(&data, ImageFormat::Png) {
            Ok(decoded) => {
                result.textures.insert(path, decoded.to_rgba8());
            }
            Err(e) => skip(&mut result, path, format!("decode failed: {}", e)),
        }
    }

    Ok(result)
}

fn skip(result: &mut ImportResult, path: TexturePath, reason: String) {
    log::warn!("Error loading {}: {}", path, reason);
    result.skipped.push(SkippedEntry { path, reason });
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;

    fn png_bytes(image: &RgbaImage) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        image.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    fn build_zip(entries: &[(&str, Vec<u8>)]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, data) in entries {
            writer.start_file(*name, SimpleFileOptions::default()).unwrap();
            writer.write_all(data).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_filters_prefix_suffix_and_skips_corrupt() {
        let red = RgbaImage::from_pixel(2, 2, Rgba([255, 0, 0, 255]));
        let zip = build_zip(&[
            ("assets/a.png", png_bytes(&red)),
            ("assets/b.png", b"definitely not a png".to_vec()),
            ("other/c.png", png_bytes(&red)),
            ("assets/d.txt", b"hello".to_vec()),
        ]);

        let result = import_from_reader(Cursor::new(zip)).expect("archive should open");

        let paths: Vec<&str> = result.textures.paths().map(|p| p.as_str()).collect();
        assert_eq!(paths, ["assets/a.png"]);
        assert_eq!(result.textures.get(&"assets/a.png".into()), Some(&red));

        assert_eq!(result.skipped.len(), 1);
        assert_eq!(result.skipped[0].path.as_str(), "assets/b.png");
        assert!(result.skipped[0].reason.starts_with("decode failed"));
    }

    #[test]
    fn test_converts_to_rgba() {
        let gray = image::GrayImage::from_pixel(3, 1, image::Luma([128]));
        let mut bytes = Cursor::new(Vec::new());
        gray.write_to(&mut bytes, ImageFormat::Png).unwrap();
        let zip = build_zip(&[("assets/m/textures/g.png", bytes.into_inner())]);

        let result = import_from_reader(Cursor::new(zip)).unwrap();
        let image = result.textures.get(&"assets/m/textures/g.png".into()).unwrap();
        assert_eq!(*image.get_pixel(2, 0), Rgba([128, 128, 128, 255]));
    }

    #[test]
    fn test_keeps_archive_order() {
        let px = png_bytes(&RgbaImage::new(1, 1));
        let zip = build_zip(&[
            ("assets/z.png", px.clone()),
            ("assets/a.png", px.clone()),
            ("assets/m.png", px),
        ]);
        let result = import_from_reader(Cursor::new(zip)).unwrap();
        let paths: Vec<&str> = result.textures.paths().map(|p| p.as_str()).collect();
        assert_eq!(paths, ["assets/z.png", "assets/a.png", "assets/m.png"]);
    }

    #[test]
    fn test_extension_is_case_sensitive() {
        assert!(is_texture_entry("assets/x/y.png"));
        assert!(!is_texture_entry("assets/x/y.PNG"));
        assert!(!is_texture_entry("data/assets/y.png"));
    }

    #[test]
    fn test_not_a_zip_is_fatal() {
        let result = import_from_reader(Cursor::new(b"plain text, no archive".to_vec()));
        assert!(matches!(result, Err(ImportError::Archive(_))));
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let temp = tempfile::TempDir::new().unwrap();
        let missing = temp.path().join("missing.jar");
        match import_archive(&missing) {
            Err(ImportError::Open { path, .. }) => assert_eq!(path, missing),
            other => panic!("expected open error, got {:?}", other.map(|r| r.textures.len())),
        }
    }
}
