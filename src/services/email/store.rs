use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Flat on-disk store for extracted attachments. All files land directly
/// under the output root; a second attachment with the same name
/// overwrites the first.
pub struct AttachmentStore {
    root: PathBuf,
}

impl AttachmentStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Creates the output root and any missing parents. Safe to call when
    /// the directory already exists.
    pub fn ensure_root(&self) -> Result<()> {
        fs::create_dir_all(&self.root)
            .with_context(|| format!("Failed to create output directory {:?}", self.root))
    }

    /// Writes `data` to `<root>/<filename>` and returns the written path.
    /// An existing file with the same name is overwritten.
    pub fn save(&self, filename: &str, data: &[u8]) -> Result<PathBuf> {
        self.ensure_root()?;

        let path = self.root.join(filename);
        fs::write(&path, data)
            .with_context(|| format!("Failed to write attachment to {:?}", path))?;

        info!("Attachment saved to: {:?}", path);
        Ok(path)
    }
}
