//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod info;
mod paint;
mod render;
pub mod shell;

use clap::{Parser, Subcommand};
use image::Rgba;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::color::parse_color;
use crate::config::{load_config, merge_cli_overrides, CliOverrides, MctexConfig, MAX_PIXEL_SIZE};
use crate::importer::import_archive;
use crate::state::AppState;

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// mctex - Extract, edit and repackage Minecraft textures
#[derive(Parser)]
#[command(name = "mctex")]
#[command(about = "mctex - Extract Minecraft textures from mod archives, edit pixels, build resource packs")]
#[command(version)]
pub struct Cli {
    /// Configuration file (default: nearest mctex.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log progress information to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the textures found in a mod archive
    List {
        /// Mod archive (.jar or .zip)
        archive: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the Minecraft version labels and their pack formats
    Versions,
    /// Preview a texture in the terminal
    Show {
        /// Mod archive (.jar or .zip)
        archive: PathBuf,

        /// Texture path inside the archive
        #[arg(short, long)]
        texture: String,
    },
    /// Render a texture as the magnified editor grid to PNG
    Render {
        /// Mod archive (.jar or .zip)
        archive: PathBuf,

        /// Texture path inside the archive
        #[arg(short, long)]
        texture: String,

        /// Output file or directory (default: {texture}_x{size}.png)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Canvas pixels per texture pixel
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=MAX_PIXEL_SIZE as i64))]
        pixel_size: Option<u32>,

        /// Paint a pixel before rendering: x,y=COLOR (repeatable)
        #[arg(long, value_name = "X,Y=COLOR")]
        set: Vec<String>,
    },
    /// Paint pixels of one texture and export the result as a resource pack
    Paint {
        /// Mod archive (.jar or .zip)
        archive: PathBuf,

        /// Texture path inside the archive
        #[arg(short, long)]
        texture: String,

        /// Paint a pixel: x,y=COLOR (repeatable)
        #[arg(long, value_name = "X,Y=COLOR", required = true)]
        set: Vec<String>,

        /// Resource pack to write. Without it nothing is written.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Minecraft version label (see `mctex versions`)
        #[arg(long = "mc-version", value_name = "LABEL")]
        mc_version: Option<String>,

        /// Description for pack.mcmeta
        #[arg(long)]
        description: Option<String>,

        /// Fail on unknown version labels instead of using the newest format
        #[arg(long)]
        strict_version: bool,
    },
    /// Interactive editing session reading commands from stdin
    Shell {
        /// Mod archive to import at startup
        archive: Option<PathBuf>,

        /// Minecraft version label selected at startup
        #[arg(long = "mc-version", value_name = "LABEL")]
        mc_version: Option<String>,
    },
}

/// A `--set x,y=COLOR` operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetOp {
    pub x: u32,
    pub y: u32,
    pub color: Rgba<u8>,
}

/// Parse `x,y=COLOR`.
pub fn parse_set_op(arg: &str) -> Result<SetOp, String> {
    let (coords, color) =
        arg.split_once('=').ok_or_else(|| format!("'{}': expected x,y=COLOR", arg))?;
    let (x, y) =
        coords.split_once(',').ok_or_else(|| format!("'{}': expected x,y before '='", arg))?;
    let x = x.trim().parse::<u32>().map_err(|e| format!("'{}': bad x coordinate: {}", arg, e))?;
    let y = y.trim().parse::<u32>().map_err(|e| format!("'{}': bad y coordinate: {}", arg, e))?;
    let color = parse_color(color).map_err(|e| format!("'{}': {}", arg, e))?;
    Ok(SetOp { x, y, color })
}

/// Parse every `--set` value, reporting the first bad one.
pub(crate) fn parse_set_ops(specs: &[String]) -> Result<Vec<SetOp>, ExitCode> {
    specs
        .iter()
        .map(|s| parse_set_op(s))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| {
            eprintln!("Error: --set {}", e);
            ExitCode::from(EXIT_INVALID_ARGS)
        })
}

/// Import `archive` into a fresh state, printing the outcome.
///
/// Skipped entries are reported as warnings; an unopenable archive is an error.
pub(crate) fn load_state(archive: &Path) -> Result<AppState, ExitCode> {
    let result = match import_archive(archive) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Err(ExitCode::from(EXIT_ERROR));
        }
    };
    for skipped in &result.skipped {
        eprintln!("Warning: skipped {}: {}", skipped.path, skipped.reason);
    }

    let mut state = AppState::new();
    state.load_import(result);
    Ok(state)
}

fn init_logging(verbose: bool) -> Option<flexi_logger::LoggerHandle> {
    let level = if verbose { "info" } else { "warn" };
    let started = flexi_logger::Logger::try_with_env_or_str(level)
        .and_then(|logger| logger.log_to_stderr().start());
    match started {
        Ok(handle) => Some(handle),
        Err(e) => {
            eprintln!("Warning: logging disabled: {}", e);
            None
        }
    }
}

fn resolve_config(path: Option<&Path>, overrides: &CliOverrides) -> Result<MctexConfig, ExitCode> {
    let mut config = match load_config(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Err(ExitCode::from(EXIT_ERROR));
        }
    };
    merge_cli_overrides(&mut config, overrides);
    Ok(config)
}

/// Run the CLI application
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    let _logger = init_logging(cli.verbose);

    let overrides = match &cli.command {
        Commands::Render { pixel_size, .. } => {
            CliOverrides { pixel_size: *pixel_size, ..Default::default() }
        }
        Commands::Paint { mc_version, description, strict_version, .. } => CliOverrides {
            version: mc_version.clone(),
            description: description.clone(),
            strict_version: strict_version.then_some(true),
            ..Default::default()
        },
        Commands::Shell { mc_version, .. } => {
            CliOverrides { version: mc_version.clone(), ..Default::default() }
        }
        _ => CliOverrides::default(),
    };
    let config = match resolve_config(cli.config.as_deref(), &overrides) {
        Ok(c) => c,
        Err(code) => return code,
    };

    match cli.command {
        Commands::List { archive, json } => info::run_list(&archive, json),
        Commands::Versions => info::run_versions(&config),
        Commands::Show { archive, texture } => info::run_show(&archive, &texture),
        Commands::Render { archive, texture, output, set, .. } => {
            render::run_render(&archive, &texture, output.as_deref(), &set, &config)
        }
        Commands::Paint { archive, texture, set, output, .. } => {
            paint::run_paint(&archive, &texture, &set, output.as_deref(), &config)
        }
        Commands::Shell { archive, .. } => shell::run_shell(archive.as_deref(), config),
    }
}
