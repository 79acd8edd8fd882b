//! Compilation options.

use std::path::{Path, PathBuf};

/// External assembler invocation. Written files are appended to `args`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblerConfig {
    pub program: String,
    pub args: Vec<String>,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self {
            program: "java".to_string(),
            args: vec!["-jar".to_string(), "jasmin.jar".to_string()],
        }
    }
}

impl AssemblerConfig {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// The command as it would be typed, for messages.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Options for one compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    /// Name of the main unit; every other unit goes under `<name>_bin/`.
    pub program_name: String,
    /// Directory the `.j` files are written to.
    pub output_dir: PathBuf,
    /// Run the assembler on the written files.
    pub assemble: bool,
    pub assembler: AssemblerConfig,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            program_name: "main".to_string(),
            output_dir: PathBuf::from("."),
            assemble: true,
            assembler: AssemblerConfig::default(),
        }
    }
}

impl CompileOptions {
    /// Options for compiling the file at `path`: the program is named after
    /// the file stem.
    pub fn from_source_path(path: impl AsRef<Path>) -> Self {
        let program_name = path
            .as_ref()
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("main")
            .to_string();
        Self {
            program_name,
            ..Self::default()
        }
    }

    pub fn with_program_name(mut self, name: impl Into<String>) -> Self {
        self.program_name = name.into();
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_assemble(mut self, assemble: bool) -> Self {
        self.assemble = assemble;
        self
    }

    pub fn with_assembler(mut self, assembler: AssemblerConfig) -> Self {
        self.assembler = assembler;
        self
    }

    /// Directory of every unit except the main one.
    pub fn bin_dir(&self) -> PathBuf {
        self.output_dir.join(format!("{}_bin", self.program_name))
    }
}
