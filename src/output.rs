//! Writing object units to disk.

use std::fs;
use std::path::{Path, PathBuf};

use sixty_compiler::ObjectUnit;

use crate::error::{CompileError, CompileResult};

/// Write each unit to `<output_dir>/<path>.j`, creating directories as
/// needed. Returns the written paths relative to `output_dir`.
pub fn write_units(units: &[ObjectUnit], output_dir: &Path) -> CompileResult<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(units.len());
    for unit in units {
        let relative = PathBuf::from(unit.file_name());
        let path = output_dir.join(&relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| CompileError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&path, unit.to_string()).map_err(|source| CompileError::Io {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(file = %path.display(), "wrote object unit");
        written.push(relative);
    }
    Ok(written)
}
