//! SixtyFortran compiler.
//!
//! Takes a parsed program through semantic analysis and code generation,
//! writes one Jasmin-style `.j` file per unit, and optionally runs the
//! external assembler over them.
//!
//! # Example
//!
//! ```
//! use bumpalo::Bump;
//! use sixty::CompileOptions;
//! use sixty::ast::{AstBuilder, BinaryOp};
//!
//! let arena = Bump::new();
//! let b = AstBuilder::new(&arena);
//! let sum = b.binary(b.int(5), BinaryOp::Add, b.int(3));
//! let program = b.program(&[b.assign_new(b.named("integer"), &["x"], sum)]);
//!
//! let options = CompileOptions::default().with_program_name("demo");
//! let units = sixty::compile(&program, &options).unwrap();
//! assert_eq!(units[0].path, "demo");
//! ```

pub mod assembler;
pub mod config;
pub mod error;
pub mod output;

pub use config::{AssemblerConfig, CompileOptions};
pub use error::{CompileError, CompileResult};

pub use sixty_ast as ast;
pub use sixty_compiler as compiler;
pub use sixty_core::SemanticError;

use std::path::PathBuf;

use sixty_ast::Program;
use sixty_compiler::{CompilationContext, Compiler, ObjectUnit};

/// What a successful build produced.
#[derive(Debug)]
pub struct BuildOutput {
    pub units: Vec<ObjectUnit>,
    /// Written files, relative to the output directory.
    pub files: Vec<PathBuf>,
}

/// Analyze and generate `program` in memory.
///
/// Fails with every semantic error if there is at least one.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn compile(program: &Program<'_>, options: &CompileOptions) -> CompileResult<Vec<ObjectUnit>> {
    let mut ctx = CompilationContext::new(options.program_name.as_str());
    let result = Compiler::compile(program, &mut ctx);
    if !result.is_success() {
        return Err(CompileError::Semantic {
            count: result.errors.len(),
            errors: result.errors,
        });
    }
    Ok(result.units)
}

/// Run the whole pipeline on a parsed program.
///
/// `syntax_errors` is the parser's error count; a program with syntax errors
/// is not analyzed. Nothing is written unless analysis succeeds.
pub fn build(
    program: &Program<'_>,
    syntax_errors: usize,
    options: &CompileOptions,
) -> CompileResult<BuildOutput> {
    if syntax_errors > 0 {
        return Err(CompileError::Syntax {
            count: syntax_errors,
        });
    }

    let units = compile(program, options)?;
    let files = output::write_units(&units, &options.output_dir)?;
    if options.assemble {
        assembler::assemble(&options.assembler, &options.output_dir, &files)?;
    }
    Ok(BuildOutput { units, files })
}
