//! Method bodies and their limits.

use std::fmt;

use super::{AccessFlags, Instruction, MethodDescriptor};

/// A `.var` directive: a named local slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalVar {
    pub slot: u32,
    pub name: String,
    pub descriptor: String,
}

/// A finished method.
#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    pub name: String,
    pub descriptor: MethodDescriptor,
    pub flags: AccessFlags,
    pub vars: Vec<LocalVar>,
    pub code: Vec<Instruction>,
    pub max_stack: u32,
    pub max_locals: u32,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, ".method {} {}{}", self.flags, self.name, self.descriptor)?;
        writeln!(f, "    .limit stack {}", self.max_stack)?;
        writeln!(f, "    .limit locals {}", self.max_locals)?;
        for var in &self.vars {
            writeln!(f, "    .var {} is {} {}", var.slot, var.name, var.descriptor)?;
        }
        for instruction in &self.code {
            match instruction {
                Instruction::Label(_) => writeln!(f, "{instruction}")?,
                _ => writeln!(f, "    {instruction}")?,
            }
        }
        writeln!(f, ".end method")
    }
}

/// Builds one method body, tracking operand stack depth.
///
/// Statements leave the stack empty, so the depth at every label is the
/// depth of the enclosing statement boundary and a single running counter
/// is exact.
#[derive(Debug)]
pub struct MethodEmitter {
    name: String,
    descriptor: MethodDescriptor,
    flags: AccessFlags,
    vars: Vec<LocalVar>,
    code: Vec<Instruction>,
    depth: i32,
    max_stack: i32,
    max_locals: u32,
}

impl MethodEmitter {
    pub fn new(name: impl Into<String>, descriptor: MethodDescriptor, flags: AccessFlags) -> Self {
        Self {
            name: name.into(),
            descriptor,
            flags,
            vars: Vec::new(),
            code: Vec::new(),
            depth: 0,
            max_stack: 0,
            max_locals: 0,
        }
    }

    pub fn emit(&mut self, instruction: Instruction) {
        self.depth = (self.depth + instruction.stack_effect()).max(0);
        self.max_stack = self.max_stack.max(self.depth);
        self.code.push(instruction);
    }

    pub fn declare_var(&mut self, slot: u32, name: impl Into<String>, descriptor: impl Into<String>) {
        self.vars.push(LocalVar {
            slot,
            name: name.into(),
            descriptor: descriptor.into(),
        });
        self.max_locals = self.max_locals.max(slot + 1);
    }

    /// Raise the local variable limit to at least `locals`.
    pub fn set_max_locals(&mut self, locals: u32) {
        self.max_locals = self.max_locals.max(locals);
    }

    pub fn finish(mut self) -> Method {
        self.vars.sort_by_key(|var| var.slot);
        Method {
            name: self.name,
            descriptor: self.descriptor,
            flags: self.flags,
            vars: self.vars,
            code: self.code,
            max_stack: self.max_stack as u32,
            max_locals: self.max_locals,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::CompilationContext;
    use crate::emit::MemberRef;

    fn integer_literal(method: &mut MethodEmitter, value: i32) {
        method.emit(Instruction::New("library/integer".into()));
        method.emit(Instruction::Dup);
        method.emit(Instruction::IConst(value));
        method.emit(Instruction::invoke_special(
            "library/integer",
            "<init>",
            MethodDescriptor::new(vec!["I".into()], None),
        ));
    }

    #[test]
    fn max_stack_tracks_deepest_point() {
        let mut method = MethodEmitter::new("main", MethodDescriptor::void(), AccessFlags::PUBLIC);
        integer_literal(&mut method, 5);
        integer_literal(&mut method, 3);
        method.emit(Instruction::invoke_virtual(
            "library/integer",
            "operator_plus",
            MethodDescriptor::new(vec!["Llibrary/integer;".into()], Some("Llibrary/integer;".into())),
        ));
        method.emit(Instruction::AStore(1));
        method.emit(Instruction::Return);

        let method = method.finish();
        // new, dup, iconst on top of the first value
        assert_eq!(method.max_stack, 4);
    }

    #[test]
    fn double_constants_count_twice() {
        let mut method = MethodEmitter::new("f", MethodDescriptor::void(), AccessFlags::PUBLIC);
        method.emit(Instruction::New("library/real".into()));
        method.emit(Instruction::Dup);
        method.emit(Instruction::Ldc2Double(1.5));
        method.emit(Instruction::invoke_special(
            "library/real",
            "<init>",
            MethodDescriptor::new(vec!["D".into()], None),
        ));
        method.emit(Instruction::Pop);
        assert_eq!(method.finish().max_stack, 4);
    }

    #[test]
    fn renders_directives_then_code() {
        let mut ctx = CompilationContext::new("demo");
        let exit = ctx.next_label();
        let mut method = MethodEmitter::new(
            "operator_parenthesis",
            MethodDescriptor::new(vec!["Llibrary/bool;".into()], None),
            AccessFlags::PUBLIC,
        );
        method.declare_var(1, "flag", "Llibrary/bool;");
        method.declare_var(0, "this", "Ldemo_bin/demo$f;");
        method.emit(Instruction::ALoad(1));
        method.emit(Instruction::GetField(MemberRef::new("library/bool", "value", "I")));
        method.emit(Instruction::IfEq(exit));
        method.emit(Instruction::Label(exit));
        method.emit(Instruction::Return);

        let text = method.finish().to_string();
        let expected = "\
.method public operator_parenthesis(Llibrary/bool;)V
    .limit stack 1
    .limit locals 2
    .var 0 is this Ldemo_bin/demo$f;
    .var 1 is flag Llibrary/bool;
    aload 1
    getfield library/bool/value I
    ifeq L001
L001:
    return
.end method
";
        assert_eq!(text, expected);
    }
}
