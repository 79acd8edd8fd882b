//! Instructions and the descriptors they reference.

use std::fmt;

use crate::context::Label;

// ============================================================================
// Descriptors
// ============================================================================

/// Parameter and return descriptors of a method, such as
/// `(Llibrary/integer;)Llibrary/bool;`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MethodDescriptor {
    pub params: Vec<String>,
    /// `None` renders as `V`.
    pub returns: Option<String>,
}

impl MethodDescriptor {
    pub fn new(params: Vec<String>, returns: Option<String>) -> Self {
        Self { params, returns }
    }

    /// `()V`
    pub fn void() -> Self {
        Self::new(Vec::new(), None)
    }

    /// Operand stack slots taken by the parameters.
    pub fn param_slots(&self) -> i32 {
        self.params.iter().map(|p| slot_size(p)).sum()
    }

    /// Operand stack slots taken by the return value.
    pub fn return_slots(&self) -> i32 {
        self.returns.as_deref().map_or(0, slot_size)
    }
}

impl fmt::Display for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for param in &self.params {
            f.write_str(param)?;
        }
        f.write_str(")")?;
        f.write_str(self.returns.as_deref().unwrap_or("V"))
    }
}

/// Category 2 values (`long`, `double`) take two slots.
fn slot_size(descriptor: &str) -> i32 {
    match descriptor {
        "D" | "J" => 2,
        _ => 1,
    }
}

/// A method addressed as `owner/name(params)returns`.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodRef {
    pub owner: String,
    pub name: String,
    pub descriptor: MethodDescriptor,
}

impl fmt::Display for MethodRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}{}", self.owner, self.name, self.descriptor)
    }
}

/// A field addressed as `owner/name descriptor`.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberRef {
    pub owner: String,
    pub name: String,
    pub descriptor: String,
}

impl MemberRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>, descriptor: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            descriptor: descriptor.into(),
        }
    }
}

impl fmt::Display for MemberRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} {}", self.owner, self.name, self.descriptor)
    }
}

// ============================================================================
// Instructions
// ============================================================================

/// One line of a method body.
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    New(String),
    Dup,
    Pop,
    AConstNull,
    /// Renders as the shortest constant form: `iconst`, `bipush`, `sipush` or `ldc`.
    IConst(i32),
    LdcString(String),
    /// Category 2 constant.
    Ldc2Double(f64),
    ALoad(u32),
    AStore(u32),
    GetField(MemberRef),
    PutField(MemberRef),
    GetStatic(MemberRef),
    PutStatic(MemberRef),
    InvokeVirtual(MethodRef),
    InvokeSpecial(MethodRef),
    InvokeStatic(MethodRef),
    /// Pops an `int`; jumps when it is zero.
    IfEq(Label),
    Goto(Label),
    /// Jump target; not an instruction.
    Label(Label),
    AReturn,
    Return,
}

impl Instruction {
    pub fn invoke_virtual(owner: impl Into<String>, name: impl Into<String>, descriptor: MethodDescriptor) -> Self {
        Instruction::InvokeVirtual(method_ref(owner, name, descriptor))
    }

    pub fn invoke_special(owner: impl Into<String>, name: impl Into<String>, descriptor: MethodDescriptor) -> Self {
        Instruction::InvokeSpecial(method_ref(owner, name, descriptor))
    }

    pub fn invoke_static(owner: impl Into<String>, name: impl Into<String>, descriptor: MethodDescriptor) -> Self {
        Instruction::InvokeStatic(method_ref(owner, name, descriptor))
    }

    /// Net change of the operand stack depth, in slots.
    pub fn stack_effect(&self) -> i32 {
        match self {
            Instruction::New(_)
            | Instruction::Dup
            | Instruction::AConstNull
            | Instruction::IConst(_)
            | Instruction::LdcString(_)
            | Instruction::ALoad(_) => 1,
            Instruction::Ldc2Double(_) => 2,
            Instruction::Pop | Instruction::AStore(_) | Instruction::IfEq(_) | Instruction::AReturn => -1,
            Instruction::GetField(field) => slot_size(&field.descriptor) - 1,
            Instruction::PutField(field) => -1 - slot_size(&field.descriptor),
            Instruction::GetStatic(field) => slot_size(&field.descriptor),
            Instruction::PutStatic(field) => -slot_size(&field.descriptor),
            Instruction::InvokeVirtual(method) | Instruction::InvokeSpecial(method) => {
                method.descriptor.return_slots() - method.descriptor.param_slots() - 1
            }
            Instruction::InvokeStatic(method) => {
                method.descriptor.return_slots() - method.descriptor.param_slots()
            }
            Instruction::Goto(_) | Instruction::Label(_) | Instruction::Return => 0,
        }
    }
}

fn method_ref(owner: impl Into<String>, name: impl Into<String>, descriptor: MethodDescriptor) -> MethodRef {
    MethodRef {
        owner: owner.into(),
        name: name.into(),
        descriptor,
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::New(class) => write!(f, "new {class}"),
            Instruction::Dup => f.write_str("dup"),
            Instruction::Pop => f.write_str("pop"),
            Instruction::AConstNull => f.write_str("aconst_null"),
            Instruction::IConst(-1) => f.write_str("iconst_m1"),
            Instruction::IConst(value @ 0..=5) => write!(f, "iconst_{value}"),
            Instruction::IConst(value) => match i16::try_from(*value) {
                Ok(small) if i8::try_from(small).is_ok() => write!(f, "bipush {small}"),
                Ok(small) => write!(f, "sipush {small}"),
                Err(_) => write!(f, "ldc {value}"),
            },
            Instruction::LdcString(value) => write!(f, "ldc \"{}\"", escape(value)),
            Instruction::Ldc2Double(value) => write!(f, "ldc2_w {}", double_literal(*value)),
            Instruction::ALoad(slot) => write!(f, "aload {slot}"),
            Instruction::AStore(slot) => write!(f, "astore {slot}"),
            Instruction::GetField(field) => write!(f, "getfield {field}"),
            Instruction::PutField(field) => write!(f, "putfield {field}"),
            Instruction::GetStatic(field) => write!(f, "getstatic {field}"),
            Instruction::PutStatic(field) => write!(f, "putstatic {field}"),
            Instruction::InvokeVirtual(method) => write!(f, "invokevirtual {method}"),
            Instruction::InvokeSpecial(method) => write!(f, "invokespecial {method}"),
            Instruction::InvokeStatic(method) => write!(f, "invokestatic {method}"),
            Instruction::IfEq(label) => write!(f, "ifeq {label}"),
            Instruction::Goto(label) => write!(f, "goto {label}"),
            Instruction::Label(label) => write!(f, "{label}:"),
            Instruction::AReturn => f.write_str("areturn"),
            Instruction::Return => f.write_str("return"),
        }
    }
}

/// Escape a string constant for a quoted operand.
fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// A double constant always carries a decimal point, so the assembler does
/// not read it as a `long`.
fn double_literal(value: f64) -> String {
    let text = value.to_string();
    if value.is_finite() && !text.contains(['.', 'e', 'E']) {
        format!("{text}.0")
    } else {
        text
    }
}
