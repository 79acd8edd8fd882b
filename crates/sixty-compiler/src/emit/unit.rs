//! Classes as emitted text.

use std::fmt;

use super::{AccessFlags, Method};

/// A `.field` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    pub name: String,
    pub descriptor: String,
    pub flags: AccessFlags,
}

/// One emitted class: the output of a Main, Type or Routine unit, or the
/// routine base class.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectUnit {
    /// Qualified path, e.g. `demo_bin/demo$point`.
    pub path: String,
    pub super_path: String,
    pub fields: Vec<FieldDecl>,
    pub methods: Vec<Method>,
}

impl ObjectUnit {
    pub fn new(path: impl Into<String>, super_path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            super_path: super_path.into(),
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// Add a field unless one of the same name exists.
    pub fn add_field(&mut self, name: impl Into<String>, descriptor: impl Into<String>, flags: AccessFlags) {
        let name = name.into();
        if self.has_field(&name) {
            return;
        }
        self.fields.push(FieldDecl {
            name,
            descriptor: descriptor.into(),
            flags,
        });
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.iter().any(|field| field.name == name)
    }

    pub fn add_method(&mut self, method: Method) {
        self.methods.push(method);
    }

    pub fn method(&self, name: &str) -> Option<&Method> {
        self.methods.iter().find(|method| method.name == name)
    }

    /// Output file, relative to the output directory.
    pub fn file_name(&self) -> String {
        format!("{}.j", self.path)
    }
}

impl fmt::Display for ObjectUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, ".class public {}", self.path)?;
        writeln!(f, ".super {}", self.super_path)?;
        for field in &self.fields {
            writeln!(f, ".field {} {} {}", field.flags, field.name, field.descriptor)?;
        }
        for method in &self.methods {
            writeln!(f)?;
            write!(f, "{method}")?;
        }
        Ok(())
    }
}
