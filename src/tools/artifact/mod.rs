//! Translator Artifact

mod tests;

use crate::error::{Result, ScaffoldError};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// A translator script written where the translation server loads translators from.
///
/// The file lives as long as this value; dropping it deletes the file.
pub struct TranslatorArtifact {
    file: NamedTempFile,
}

impl TranslatorArtifact {
    /// Write `script` to a fresh `translator-*.js` file inside `dir`.
    pub fn create(dir: &Path, script: &str) -> Result<Self> {
        std::fs::create_dir_all(dir)?;
        let mut file = tempfile::Builder::new()
            .prefix("translator-")
            .suffix(".js")
            .tempfile_in(dir)
            .map_err(|e| {
                ScaffoldError::storage_error(
                    "write_translator",
                    format!("{}: {e}", dir.display()),
                )
            })?;
        file.write_all(script.as_bytes())?;
        file.flush()?;
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Delete the file now, reporting failures that a plain drop would swallow.
    pub fn release(self) -> Result<PathBuf> {
        let path = self.file.path().to_path_buf();
        self.file.close()?;
        Ok(path)
    }
}
