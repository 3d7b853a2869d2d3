//! Read-only command implementations (list, versions, show)

use std::fs::File;
use std::path::Path;
use std::process::ExitCode;

use crate::config::MctexConfig;
use crate::exporter::read_manifest;
use crate::importer::import_archive;
use crate::raster::TexturePath;
use crate::terminal::render_ansi_with_coordinates;
use crate::versions::{self, canonical_label, DEFAULT_PACK_FORMAT, VERSION_FORMATS};

use super::{load_state, EXIT_ERROR, EXIT_SUCCESS};

/// Execute the list command
pub fn run_list(archive: &Path, json: bool) -> ExitCode {
    let result = match import_archive(archive) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let manifest = pack_manifest(archive);

    if json {
        let textures: Vec<_> = result
            .textures
            .iter()
            .map(|(path, image)| {
                serde_json::json!({
                    "path": path.as_str(),
                    "width": image.width(),
                    "height": image.height(),
                })
            })
            .collect();
        let skipped: Vec<_> = result
            .skipped
            .iter()
            .map(|s| serde_json::json!({ "path": s.path.as_str(), "reason": s.reason }))
            .collect();
        let pack = manifest.map(|m| m["pack"].clone());
        let doc = serde_json::json!({ "pack": pack, "textures": textures, "skipped": skipped });
        match serde_json::to_string_pretty(&doc) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::from(EXIT_ERROR);
            }
        }
        return ExitCode::from(EXIT_SUCCESS);
    }

    for skipped in &result.skipped {
        eprintln!("Warning: skipped {}: {}", skipped.path, skipped.reason);
    }
    for (path, image) in result.textures.iter() {
        println!("{}  {}x{}", path, image.width(), image.height());
    }
    eprintln!("{} textures", result.textures.len());
    if let Some(manifest) = manifest {
        eprintln!(
            "Resource pack: pack_format {}, description {}",
            manifest["pack"]["pack_format"], manifest["pack"]["description"]
        );
    }

    ExitCode::from(EXIT_SUCCESS)
}

/// The `pack.mcmeta` of `archive`, if it is a resource pack.
fn pack_manifest(archive: &Path) -> Option<serde_json::Value> {
    let mut zip = zip::ZipArchive::new(File::open(archive).ok()?).ok()?;
    match read_manifest(&mut zip) {
        Ok(manifest) => Some(manifest),
        Err(e) => {
            log::debug!("No readable pack manifest in {}: {}", archive.display(), e);
            None
        }
    }
}

/// Known version labels, comma separated.
pub(crate) fn known_labels() -> String {
    versions::labels().collect::<Vec<_>>().join(", ")
}

/// Version label table with the `selected` label marked.
pub(crate) fn version_table(selected: &str) -> String {
    let selected = canonical_label(selected);
    let mut table = format!("{:<12} pack_format\n", "version");
    for (label, format) in VERSION_FORMATS {
        let marker = if selected == Some(*label) { "  (selected)" } else { "" };
        table.push_str(&format!("{:<12} {}{}\n", label, format, marker));
    }
    table
}

/// Execute the versions command
pub fn run_versions(config: &MctexConfig) -> ExitCode {
    print!("{}", version_table(&config.pack.version));
    if canonical_label(&config.pack.version).is_none() {
        eprintln!(
            "Warning: configured version '{}' is unknown; exports use pack_format {}",
            config.pack.version, DEFAULT_PACK_FORMAT
        );
        eprintln!("Known versions: {}", known_labels());
    }
    ExitCode::from(EXIT_SUCCESS)
}

/// Execute the show command
pub fn run_show(archive: &Path, texture: &str) -> ExitCode {
    let state = match load_state(archive) {
        Ok(s) => s,
        Err(code) => return code,
    };

    let path = TexturePath::from(texture);
    let Some(image) = state.display_image(&path) else {
        eprintln!("Error: texture '{}' not found in {}", texture, archive.display());
        return ExitCode::from(EXIT_ERROR);
    };

    println!("{}  {}x{}", path, image.width(), image.height());
    print!("{}", render_ansi_with_coordinates(image));
    ExitCode::from(EXIT_SUCCESS)
}
