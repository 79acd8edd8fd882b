//! Errors that stop a compilation.
//!
//! Semantic errors inside a program are collected, not returned one by one;
//! they surface here together once analysis is over.

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use sixty_core::SemanticError;
use thiserror::Error;

/// Result type for facade operations.
pub type CompileResult<T> = Result<T, CompileError>;

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("there were {count} syntax errors; object files not created or modified")]
    Syntax { count: usize },

    #[error("there were {count} semantic errors; object files not created or modified")]
    Semantic {
        count: usize,
        errors: Vec<SemanticError>,
    },

    #[error("cannot write '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("assembler '{command}' failed: {status}")]
    Assembler { command: String, status: ExitStatus },

    #[error("cannot run assembler '{command}': {source}")]
    AssemblerSpawn {
        command: String,
        #[source]
        source: io::Error,
    },
}

impl CompileError {
    /// The semantic errors behind a failed compilation, if any.
    pub fn semantic_errors(&self) -> &[SemanticError] {
        match self {
            CompileError::Semantic { errors, .. } => errors,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_counts() {
        let error = CompileError::Syntax { count: 2 };
        assert_eq!(
            error.to_string(),
            "there were 2 syntax errors; object files not created or modified"
        );
        assert!(error.semantic_errors().is_empty());
    }

    #[test]
    fn io_error_names_the_path() {
        let error = CompileError::Io {
            path: PathBuf::from("out/demo.j"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(error.to_string(), "cannot write 'out/demo.j': denied");
        assert!(std::error::Error::source(&error).is_some());
    }
}
