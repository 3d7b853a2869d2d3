//! mctex - Command-line tool for editing Minecraft mod textures into resource packs

use std::process::ExitCode;

use mctex::cli;

fn main() -> ExitCode {
    cli::run()
}
