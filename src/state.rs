//! Application state: imported originals and the user's edits
//!
//! [`AppState`] replaces window-held globals. It owns two texture sets:
//! - the **originals** from the most recent import, replaced wholesale by the
//!   next import and never modified in place;
//! - the **edited** set, which survives re-imports and exports until it is
//!   cleared, and which overrides the originals for display and export.

use image::RgbaImage;
use std::path::Path;
use thiserror::Error;

use crate::editor::{EditorOptions, EditorSession};
use crate::exporter::{export_pack, ExportError, ExportOptions, ExportSummary};
use crate::importer::ImportResult;
use crate::raster::TexturePath;
use crate::textures::TextureSet;

/// Error type for state operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    /// No imported or edited texture has this path
    #[error("unknown texture '{0}'")]
    UnknownTexture(TexturePath),
}

/// One gallery tile
#[derive(Debug, Clone, Copy)]
pub struct GalleryItem<'a> {
    pub path: &'a TexturePath,
    /// Edited version if there is one, otherwise the original
    pub image: &'a RgbaImage,
    pub edited: bool,
}

/// Textures known to the running application.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    originals: TextureSet,
    edited: TextureSet,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the originals with a fresh import. Edits are kept.
    pub fn load_import(&mut self, import: ImportResult) {
        self.originals = import.textures;
    }

    pub fn originals(&self) -> &TextureSet {
        &self.originals
    }

    pub fn edited(&self) -> &TextureSet {
        &self.edited
    }

    pub fn is_edited(&self, path: &TexturePath) -> bool {
        self.edited.contains(path)
    }

    /// The image shown for `path`: the edit if there is one, else the original.
    pub fn display_image(&self, path: &TexturePath) -> Option<&RgbaImage> {
        self.edited.get(path).or_else(|| self.originals.get(path))
    }

    /// Gallery tiles in import order.
    pub fn gallery(&self) -> Vec<GalleryItem<'_>> {
        self.originals
            .iter()
            .map(|(path, original)| match self.edited.get(path) {
                Some(image) => GalleryItem { path, image, edited: true },
                None => GalleryItem { path, image: original, edited: false },
            })
            .collect()
    }

    /// Open an editor on a copy of the displayed image for `path`.
    pub fn open_editor(
        &self,
        path: &TexturePath,
        options: EditorOptions,
    ) -> Result<EditorSession, StateError> {
        let image =
            self.display_image(path).ok_or_else(|| StateError::UnknownTexture(path.clone()))?;
        Ok(EditorSession::open_with(image, options))
    }

    /// Record a finished edit, replacing any earlier edit of the same path.
    pub fn apply_edit(&mut self, path: TexturePath, image: RgbaImage) {
        log::info!("Edited: {}", path);
        self.edited.insert(path, image);
    }

    /// Drop the edit for `path`. Returns `false` if it was not edited.
    pub fn revert(&mut self, path: &TexturePath) -> bool {
        let reverted = self.edited.remove(path).is_some();
        if reverted {
            log::info!("Reverted: {}", path);
        }
        reverted
    }

    pub fn clear_edits(&mut self) {
        self.edited.clear();
    }

    /// Export the edited set as a resource pack.
    pub fn export(
        &self,
        options: &ExportOptions,
        destination: &Path,
    ) -> Result<ExportSummary, ExportError> {
        export_pack(&self.edited, options, destination)
    }
}
