//! Public file storage: the per-context directory tree where enabled
//! fonts' files land.

use std::{
    fs::{create_dir_all, remove_dir_all},
    path::PathBuf,
};

use crate::{config::FONTS_PUBLIC_FILE_DIR, error::Result};

/// A context-rooted public file area.
///
/// Only the `google-fonts/<id>` subtree of each context is ever
/// touched; the rest of the tree belongs to the host.
#[derive(Debug, Clone)]
pub struct PublicStorage {
    root: PathBuf,
}

impl PublicStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory holding one font's downloaded files for a context.
    pub fn font_dir(&self, context: &str, font_id: &str) -> PathBuf {
        self.root.join(context).join(FONTS_PUBLIC_FILE_DIR).join(font_id)
    }

    /// Delete-then-create a font's directory so no stale files survive
    /// a re-download.
    pub fn recreate_font_dir(&self, context: &str, font_id: &str) -> Result<PathBuf> {
        let dir = self.font_dir(context, font_id);
        if dir.exists() {
            remove_dir_all(&dir)?;
        }
        create_dir_all(&dir)?;
        Ok(dir)
    }

    /// Remove a font's directory and everything in it. Removing a
    /// directory that was never created is fine.
    pub fn remove_font_dir(&self, context: &str, font_id: &str) -> Result<()> {
        let dir = self.font_dir(context, font_id);
        if dir.exists() {
            remove_dir_all(&dir)?;
        }
        Ok(())
    }
}
