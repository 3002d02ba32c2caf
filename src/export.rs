//! File export collaborator.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Something that can save text content under a filename.
pub trait FileSink {
    fn emit(&self, content: &str, filename: &str, media_type: &str) -> Result<()>;
}

/// Writes exported files into a directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path a file would be written to. Only the final path component of
    /// `filename` is used, so a stored name cannot escape the directory.
    pub fn target(&self, filename: &str) -> Result<PathBuf> {
        let name = Path::new(filename)
            .file_name()
            .ok_or_else(|| anyhow::anyhow!("Invalid export filename: {:?}", filename))?;
        Ok(self.dir.join(name))
    }
}

impl FileSink for DirectorySink {
    fn emit(&self, content: &str, filename: &str, media_type: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create {}", self.dir.display()))?;
        let path = self.target(filename)?;
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!(
            "Exported {} bytes ({}) to {}",
            content.len(),
            media_type,
            path.display()
        );
        Ok(())
    }
}
