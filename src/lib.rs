//! mctex - Library for extracting, editing and repackaging Minecraft textures
//!
//! This library provides functionality to:
//! - Import PNG textures under `assets/` from mod archives (.jar/.zip)
//! - Edit textures pixel by pixel in isolated editor sessions
//! - Export edited textures as resource packs with a `pack.mcmeta`

pub mod cli;
pub mod color;
pub mod config;
pub mod editor;
pub mod exporter;
pub mod importer;
pub mod output;
pub mod raster;
pub mod state;
pub mod terminal;
pub mod textures;
pub mod versions;
