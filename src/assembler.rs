//! Running the external assembler.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::config::AssemblerConfig;
use crate::error::{CompileError, CompileResult};

/// Assemble `files`, given relative to `dir`, in one assembler run.
pub fn assemble(config: &AssemblerConfig, dir: &Path, files: &[PathBuf]) -> CompileResult<()> {
    let command = config.command_line();
    tracing::debug!(command = %command, files = files.len(), "assembling");

    let status = Command::new(&config.program)
        .args(&config.args)
        .args(files)
        .current_dir(dir)
        .status()
        .map_err(|source| CompileError::AssemblerSpawn {
            command: command.clone(),
            source,
        })?;

    if !status.success() {
        tracing::warn!(command = %command, %status, "assembler failed");
        return Err(CompileError::Assembler { command, status });
    }
    Ok(())
}
