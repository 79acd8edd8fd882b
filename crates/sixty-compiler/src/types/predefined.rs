//! Types provided by the runtime library.
//!
//! The runtime classes live under `library/` and implement every operator as
//! a method with a fixed name. The tables below must match those classes
//! exactly: generated code calls them by name and descriptor.

use sixty_core::{TypeId, names};

use super::{ArgumentList, RoutineSpec, TypeKind, TypeSpec};

/// Ids of the predefined types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Predefined {
    pub integer: TypeId,
    pub real: TypeId,
    pub string: TypeId,
    pub boolean: TypeId,
    /// Callable type of the `print` routine value.
    pub print: TypeId,
    /// Callable type of the `read` routine value.
    pub read: TypeId,
}

impl Predefined {
    /// Push the runtime library types into `types` and return their ids.
    pub(super) fn install(types: &mut Vec<TypeSpec>) -> Self {
        let id = |offset: usize| TypeId::new((types.len() + offset) as u32);
        let ids = Predefined {
            integer: id(0),
            real: id(1),
            string: id(2),
            boolean: id(3),
            print: id(4),
            read: id(5),
        };

        types.push(numeric(&ids, names::INTEGER, ids.integer, true));
        types.push(numeric(&ids, names::REAL, ids.real, false));
        types.push(string(&ids));
        types.push(boolean(&ids));
        types.push(print(&ids));
        types.push(read(&ids));
        ids
    }

    /// Type names declared in the main scope, with their ids.
    pub fn named_types(&self) -> [(&'static str, TypeId); 4] {
        [
            (names::INTEGER, self.integer),
            (names::REAL, self.real),
            (names::STRING, self.string),
            (names::BOOL, self.boolean),
        ]
    }
}

fn library(name: &str, kind: TypeKind) -> TypeSpec {
    TypeSpec::new(name, kind).with_path(format!("{}{name}", names::LIBRARY_DIR))
}

fn routine(name: &str, args: &[TypeId], returns: Option<TypeId>) -> RoutineSpec {
    RoutineSpec::new(name, ArgumentList::new(args.to_vec()), returns)
}

/// `integer` and `real` share their operator set; only `integer` has `mod`.
fn numeric(ids: &Predefined, name: &str, this: TypeId, with_mod: bool) -> TypeSpec {
    let mut spec = library(name, TypeKind::Library);
    spec.routines.push(routine(names::OPERATOR_ASSIGNMENT, &[this], None));

    let mut arithmetic = vec![
        names::OPERATOR_PLUS,
        names::OPERATOR_MINUS,
        names::OPERATOR_STAR,
        names::OPERATOR_SLASH,
    ];
    if with_mod {
        arithmetic.push(names::OPERATOR_MOD);
    }
    for op in arithmetic {
        spec.routines.push(routine(op, &[this], Some(this)));
    }

    for op in [
        names::OPERATOR_EQUALS,
        names::OPERATOR_NOT_EQUALS,
        names::OPERATOR_LESS_THAN,
        names::OPERATOR_GREATER_THAN,
        names::OPERATOR_LESS_EQUALS,
        names::OPERATOR_GREATER_EQUALS,
    ] {
        spec.routines.push(routine(op, &[this], Some(ids.boolean)));
    }

    spec.static_routines
        .push(routine(names::UNARY_MINUS, &[this], Some(this)));
    let other_numeric = if this == ids.integer { ids.real } else { ids.integer };
    for source in [ids.string, other_numeric, ids.boolean] {
        spec.static_routines
            .push(routine(names::OPERATOR_PARENTHESIS, &[source], Some(this)));
    }
    spec
}

fn string(ids: &Predefined) -> TypeSpec {
    let mut spec = library(names::STRING, TypeKind::Library);
    spec.routines.extend([
        routine(names::OPERATOR_ASSIGNMENT, &[ids.string], None),
        routine(names::OPERATOR_PLUS, &[ids.string], Some(ids.string)),
        routine("substring", &[ids.integer, ids.integer], Some(ids.string)),
        routine(names::OPERATOR_EQUALS, &[ids.string], Some(ids.boolean)),
        routine(names::OPERATOR_NOT_EQUALS, &[ids.string], Some(ids.boolean)),
    ]);
    for source in [ids.real, ids.integer, ids.boolean] {
        spec.static_routines
            .push(routine(names::OPERATOR_PARENTHESIS, &[source], Some(ids.string)));
    }
    spec
}

fn boolean(ids: &Predefined) -> TypeSpec {
    let mut spec = library(names::BOOL, TypeKind::Library);
    spec.routines.extend([
        routine(names::OPERATOR_ASSIGNMENT, &[ids.boolean], None),
        routine(names::OPERATOR_EQUALS, &[ids.boolean], Some(ids.boolean)),
        routine(names::OPERATOR_NOT_EQUALS, &[ids.boolean], Some(ids.boolean)),
        routine(names::OPERATOR_OR, &[ids.boolean], Some(ids.boolean)),
        routine(names::OPERATOR_AND, &[ids.boolean], Some(ids.boolean)),
    ]);
    spec.static_routines.extend([
        routine(names::OPERATOR_NOT, &[ids.boolean], Some(ids.boolean)),
        routine(names::OPERATOR_PARENTHESIS, &[ids.string], Some(ids.boolean)),
    ]);
    spec
}

fn print(ids: &Predefined) -> TypeSpec {
    let mut spec = library(names::PRINT, TypeKind::Builtin);
    spec.routines
        .push(routine(names::OPERATOR_PARENTHESIS, &[ids.string], None));
    spec
}

fn read(ids: &Predefined) -> TypeSpec {
    let mut spec = library(names::READ, TypeKind::Builtin);
    spec.routines
        .push(routine(names::OPERATOR_PARENTHESIS, &[], Some(ids.string)));
    spec
}

#[cfg(test)]
mod tests {
    use crate::types::{ArgumentList, TypeRegistry};

    #[test]
    fn integer_operators() {
        let types = TypeRegistry::new("p_bin/routine");
        let p = *types.predefined();
        let int_arg = ArgumentList::from([p.integer]);

        for op in ["operator_plus", "operator_minus", "operator_star", "operator_slash", "operator_mod"] {
            let found = types.lookup_routine(p.integer, op, &int_arg);
            assert_eq!(found.and_then(|r| r.returns), Some(p.integer), "{op}");
        }
        let gt = types.lookup_routine(p.integer, "operator_greater_than", &int_arg);
        assert_eq!(gt.and_then(|r| r.returns), Some(p.boolean));
        assert!(types.lookup_static_routine(p.integer, "unary_minus", &int_arg).is_some());
    }

    #[test]
    fn real_has_no_mod() {
        let types = TypeRegistry::new("p_bin/routine");
        let p = *types.predefined();
        assert!(
            types
                .lookup_routine(p.real, "operator_mod", &ArgumentList::from([p.real]))
                .is_none()
        );
        assert!(
            types
                .lookup_static_routine(p.real, "operator_parenthesis", &ArgumentList::from([p.integer]))
                .is_some()
        );
    }

    #[test]
    fn bool_logic_and_string_members() {
        let types = TypeRegistry::new("p_bin/routine");
        let p = *types.predefined();
        let bool_arg = ArgumentList::from([p.boolean]);

        assert!(types.lookup_routine(p.boolean, "operator_and", &bool_arg).is_some());
        assert!(types.lookup_routine(p.boolean, "operator_or", &bool_arg).is_some());
        assert!(types.lookup_static_routine(p.boolean, "operator_not", &bool_arg).is_some());
        assert!(
            types
                .lookup_routine(p.string, "substring", &ArgumentList::from([p.integer, p.integer]))
                .is_some()
        );
        assert!(
            types
                .lookup_routine(p.string, "operator_greater_than", &ArgumentList::from([p.integer]))
                .is_none()
        );
    }

    #[test]
    fn builtin_callables() {
        let types = TypeRegistry::new("p_bin/routine");
        let p = *types.predefined();

        let print = types.lookup_routine(p.print, "operator_parenthesis", &ArgumentList::from([p.string]));
        assert!(print.is_some_and(|r| r.returns.is_none()));
        let read = types.lookup_routine(p.read, "operator_parenthesis", &ArgumentList::empty());
        assert_eq!(read.and_then(|r| r.returns), Some(p.string));
        assert_eq!(types.path(p.print), "library/print");
    }
}
