//! Compilation unit planning.
//!
//! The target has no nested classes or functions, so every type and routine
//! becomes its own top-level unit. A unit's name is prefixed by the chain of
//! its ancestors (`Type$routine`), which keeps paths unique and stable.
//! Blocks get a unit too, as a naming token; they share the class of their
//! nearest type or routine ancestor.
//!
//! Units are planned by the analyzer as it discovers definitions, and read
//! unchanged by the code generator.

use sixty_core::{TypeId, UnitId, names};

/// Separator between a unit's ancestors and its own name.
pub const SEPARATOR: char = '$';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitKind {
    Main,
    Type,
    Routine,
    /// Naming token only; emits into its parent's class.
    Block,
}

/// A planned output unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    pub id: UnitId,
    pub name: String,
    /// Concatenated ancestor names, each followed by the separator.
    pub prefix: String,
    /// Output directory, relative to the output root.
    pub directory: String,
    pub parent: Option<UnitId>,
    pub kind: UnitKind,
    /// Type implemented by a Type unit.
    pub owner_type: Option<TypeId>,
}

impl Unit {
    /// Qualified path, used for every cross-unit reference: `dir/Prefix$name`.
    pub fn path(&self) -> String {
        format!("{}{}{}", self.directory, self.prefix, self.name)
    }

    /// Relative path of the emitted assembly file.
    pub fn file_name(&self) -> String {
        format!("{}.j", self.path())
    }
}

/// Tree of planned units, rooted at the main unit.
#[derive(Debug, Clone)]
pub struct UnitTree {
    units: Vec<Unit>,
    bin_dir: String,
}

impl UnitTree {
    /// Plan the main unit for `program`. Every other unit lands in
    /// `<program>_bin/`.
    pub fn new(program: &str) -> Self {
        let main = Unit {
            id: UnitId::new(0),
            name: program.to_string(),
            prefix: String::new(),
            directory: String::new(),
            parent: None,
            kind: UnitKind::Main,
            owner_type: None,
        };
        Self {
            units: vec![main],
            bin_dir: format!("{program}_bin/"),
        }
    }

    pub fn main(&self) -> UnitId {
        UnitId::new(0)
    }

    /// Directory of every non-main unit.
    pub fn bin_dir(&self) -> &str {
        &self.bin_dir
    }

    /// Path of the routine base class.
    pub fn routine_base_path(&self) -> String {
        format!("{}{}", self.bin_dir, names::ROUTINE_BASE)
    }

    pub fn get(&self, id: UnitId) -> &Unit {
        &self.units[id.as_usize()]
    }

    pub fn path(&self, id: UnitId) -> String {
        self.get(id).path()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Plan a child of `parent`.
    pub fn plan(
        &mut self,
        parent: UnitId,
        name: impl Into<String>,
        kind: UnitKind,
        owner_type: Option<TypeId>,
    ) -> UnitId {
        let parent_unit = self.get(parent);
        let prefix = format!("{}{}{SEPARATOR}", parent_unit.prefix, parent_unit.name);
        let id = UnitId::new(self.units.len() as u32);
        let unit = Unit {
            id,
            name: name.into(),
            prefix,
            directory: self.bin_dir.clone(),
            parent: Some(parent),
            kind,
            owner_type,
        };
        tracing::debug!(unit = %unit.path(), ?kind, "planned unit");
        self.units.push(unit);
        id
    }
}
