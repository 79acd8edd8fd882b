//! Textual object code.
//!
//! The generator builds one [`ObjectUnit`] per class. Method bodies are
//! assembled with a [`MethodEmitter`], which tracks the operand stack depth
//! of every instruction so that `.limit stack` comes out exact. Units render
//! to assembler source through `Display`.
//!
//! # Example
//!
//! ```
//! use sixty_compiler::emit::{AccessFlags, Instruction, MethodDescriptor, MethodEmitter, ObjectUnit};
//!
//! let mut method = MethodEmitter::new("<init>", MethodDescriptor::void(), AccessFlags::PUBLIC);
//! method.emit(Instruction::ALoad(0));
//! method.emit(Instruction::invoke_special("java/lang/Object", "<init>", MethodDescriptor::void()));
//! method.emit(Instruction::Return);
//! method.set_max_locals(1);
//!
//! let mut unit = ObjectUnit::new("demo", "java/lang/Object");
//! unit.add_method(method.finish());
//!
//! let text = unit.to_string();
//! assert!(text.starts_with(".class public demo\n.super java/lang/Object\n"));
//! assert!(text.contains(".limit stack 1"));
//! ```

mod instruction;
mod method;
mod unit;

pub use instruction::{Instruction, MemberRef, MethodDescriptor, MethodRef};
pub use method::{LocalVar, Method, MethodEmitter};
pub use unit::{FieldDecl, ObjectUnit};

use std::fmt;

use bitflags::bitflags;

bitflags! {
    /// Access modifiers of classes, fields and methods.
    ///
    /// Values follow the class file encoding; only the keywords are emitted.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct AccessFlags: u16 {
        const PUBLIC = 0x0001;
        const PRIVATE = 0x0002;
        const STATIC = 0x0008;
        const FINAL = 0x0010;
    }
}

impl fmt::Display for AccessFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keywords = [
            (AccessFlags::PUBLIC, "public"),
            (AccessFlags::PRIVATE, "private"),
            (AccessFlags::STATIC, "static"),
            (AccessFlags::FINAL, "final"),
        ];
        let mut first = true;
        for (flag, keyword) in keywords {
            if self.contains(flag) {
                if !first {
                    f.write_str(" ")?;
                }
                f.write_str(keyword)?;
                first = false;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_render_as_keywords() {
        assert_eq!(AccessFlags::PUBLIC.to_string(), "public");
        assert_eq!((AccessFlags::PUBLIC | AccessFlags::STATIC).to_string(), "public static");
        assert_eq!(AccessFlags::empty().to_string(), "");
    }
}
