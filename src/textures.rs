//! Insertion-ordered collection of textures keyed by archive path

use image::RgbaImage;
use std::collections::HashMap;

use crate::raster::TexturePath;

/// Map from [`TexturePath`] to image that remembers insertion order.
///
/// Import order is the archive's enumeration order, and listings, gallery
/// views and exports follow it. Re-inserting an existing path replaces the
/// image but keeps the original position.
#[derive(Debug, Clone, Default)]
pub struct TextureSet {
    entries: Vec<(TexturePath, RgbaImage)>,
    index: HashMap<TexturePath, usize>,
}

impl TextureSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, path: &TexturePath) -> bool {
        self.index.contains_key(path)
    }

    pub fn get(&self, path: &TexturePath) -> Option<&RgbaImage> {
        self.index.get(path).map(|&i| &self.entries[i].1)
    }

    /// Insert or overwrite. Returns the previous image for this path, if any.
    pub fn insert(&mut self, path: TexturePath, image: RgbaImage) -> Option<RgbaImage> {
        match self.index.get(&path) {
            Some(&i) => Some(std::mem::replace(&mut self.entries[i].1, image)),
            None => {
                self.index.insert(path.clone(), self.entries.len());
                self.entries.push((path, image));
                None
            }
        }
    }

    /// Remove a path. Later entries keep their relative order.
    pub fn remove(&mut self, path: &TexturePath) -> Option<RgbaImage> {
        let i = self.index.remove(path)?;
        let (_, image) = self.entries.remove(i);
        for (_, slot) in self.index.iter_mut() {
            if *slot > i {
                *slot -= 1;
            }
        }
        Some(image)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TexturePath, &RgbaImage)> {
        self.entries.iter().map(|(p, img)| (p, img))
    }

    pub fn paths(&self) -> impl Iterator<Item = &TexturePath> {
        self.entries.iter().map(|(p, _)| p)
    }
}

impl FromIterator<(TexturePath, RgbaImage)> for TextureSet {
    fn from_iter<I: IntoIterator<Item = (TexturePath, RgbaImage)>>(iter: I) -> Self {
        let mut set = TextureSet::new();
        for (path, image) in iter {
            set.insert(path, image);
        }
        set
    }
}
