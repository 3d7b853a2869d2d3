//! Paint command implementation: one-shot edit and export

use std::path::Path;
use std::process::ExitCode;

use crate::config::MctexConfig;
use crate::exporter::{ExportError, ExportSummary};
use crate::raster::TexturePath;

use super::render::apply_set_ops;
use super::{load_state, parse_set_ops, EXIT_ERROR, EXIT_SUCCESS};

/// Message shown when there is nothing to export.
pub(crate) const NOTHING_TO_EXPORT: &str = "There are no edited textures to export.";

/// One-line description of a finished export.
pub(crate) fn export_message(summary: &ExportSummary) -> String {
    let mut message = format!(
        "Exported {} texture{} to {} (pack_format {})",
        summary.texture_count,
        if summary.texture_count == 1 { "" } else { "s" },
        summary.destination.display(),
        summary.pack_format
    );
    if summary.used_default_format {
        message.push_str(&format!("; version '{}' is unknown", summary.version_label));
    }
    message
}

/// Execute the paint command
pub fn run_paint(
    archive: &Path,
    texture: &str,
    set: &[String],
    output: Option<&Path>,
    config: &MctexConfig,
) -> ExitCode {
    let ops = match parse_set_ops(set) {
        Ok(ops) => ops,
        Err(code) => return code,
    };
    let mut state = match load_state(archive) {
        Ok(s) => s,
        Err(code) => return code,
    };

    let path = TexturePath::from(texture);
    let mut session = match state.open_editor(&path, config.editor_options()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };
    let painted = apply_set_ops(&mut session, &ops);
    let edited = match session.commit() {
        Ok(image) => image,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };
    state.apply_edit(path.clone(), edited);
    println!("Painted {} pixel{} of {}", painted, if painted == 1 { "" } else { "s" }, path);

    // Without a destination the export is skipped, like a dismissed save dialog
    let Some(destination) = output else {
        return ExitCode::from(EXIT_SUCCESS);
    };

    match state.export(&config.export_options(), destination) {
        Ok(summary) => {
            println!("{}", export_message(&summary));
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(ExportError::NothingToExport) => {
            eprintln!("Warning: {}", NOTHING_TO_EXPORT);
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn summary(count: usize, known: bool) -> ExportSummary {
        ExportSummary {
            destination: PathBuf::from("out/pack.zip"),
            version_label: "1.16.x".to_string(),
            pack_format: 6,
            used_default_format: !known,
            texture_count: count,
        }
    }

    #[test]
    fn test_export_message() {
        assert_eq!(
            export_message(&summary(1, true)),
            "Exported 1 texture to out/pack.zip (pack_format 6)"
        );
        assert!(export_message(&summary(3, true)).starts_with("Exported 3 textures"));
        assert!(export_message(&summary(2, false)).ends_with("version '1.16.x' is unknown"));
    }
}
