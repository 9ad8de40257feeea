//! Whole-file persistence for pipeline artifacts.

use crate::error::{PipelineError, Result};
use std::fs;
use std::path::Path;

/// Read a whole file as text.
pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Write text to a file, creating parent directories as needed.
pub fn write_text(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| PipelineError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    fs::write(path, content).map_err(|source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    })
}
