//! Render command implementation

use std::path::Path;
use std::process::ExitCode;

use crate::config::MctexConfig;
use crate::editor::EditorSession;
use crate::output::{render_output_path, save_png};
use crate::raster::TexturePath;

use super::{load_state, parse_set_ops, SetOp, EXIT_ERROR, EXIT_SUCCESS};

/// Apply `--set` operations to a session. Out-of-bounds pixels are reported and skipped.
pub(crate) fn apply_set_ops(session: &mut EditorSession, ops: &[SetOp]) -> usize {
    let mut painted = 0;
    for op in ops {
        session.set_color(op.color);
        if session.paint(op.x, op.y) {
            painted += 1;
        } else {
            let (w, h) = session.dimensions();
            eprintln!("Warning: pixel ({}, {}) is outside the {}x{} texture", op.x, op.y, w, h);
        }
    }
    painted
}

/// Execute the render command
pub fn run_render(
    archive: &Path,
    texture: &str,
    output: Option<&Path>,
    set: &[String],
    config: &MctexConfig,
) -> ExitCode {
    let ops = match parse_set_ops(set) {
        Ok(ops) => ops,
        Err(code) => return code,
    };
    let state = match load_state(archive) {
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
    apply_set_ops(&mut session, &ops);

    let output_path = render_output_path(texture, session.pixel_size(), output);
    let rendered = session.render();
    session.abandon();
    let canvas = match rendered {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    if let Err(e) = save_png(&canvas, &output_path) {
        eprintln!("Error: Failed to save '{}': {}", output_path.display(), e);
        return ExitCode::from(EXIT_ERROR);
    }

    println!("Saved: {} ({}x{})", output_path.display(), canvas.width(), canvas.height());
    ExitCode::from(EXIT_SUCCESS)
}
