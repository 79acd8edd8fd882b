//! Typed indices.
//!
//! Scopes, types and units live in flat arenas owned by the analyzer and are
//! referred to by index. Syntax tree nodes that receive annotations carry a
//! [`NodeId`] handed out by the tree builder.

use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u32);

        impl $name {
            #[inline]
            pub const fn new(index: u32) -> Self {
                Self(index)
            }

            /// Get the underlying index.
            #[inline]
            pub const fn index(self) -> u32 {
                self.0
            }

            /// The index as a `usize`, for arena access.
            #[inline]
            pub const fn as_usize(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "_{}"), self.0)
            }
        }

        impl From<u32> for $name {
            fn from(index: u32) -> Self {
                Self::new(index)
            }
        }

        impl From<$name> for u32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(
    /// Identifies an annotated syntax tree node.
    NodeId,
    "node"
);

define_id!(
    /// Identifies a lexical scope in the analyzer's scope tree.
    ScopeId,
    "scope"
);

define_id!(
    /// Identifies a type in the type registry.
    TypeId,
    "type"
);

define_id!(
    /// Identifies a planned compilation unit.
    UnitId,
    "unit"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_roundtrip() {
        let id = ScopeId::new(42);
        assert_eq!(id.index(), 42);
        assert_eq!(id.as_usize(), 42);
        assert_eq!(u32::from(id), 42);
        assert_eq!(ScopeId::from(42), id);
    }

    #[test]
    fn id_display() {
        assert_eq!(UnitId::new(5).to_string(), "unit_5");
        assert_eq!(NodeId::new(0).to_string(), "node_0");
        assert_eq!(TypeId::new(3).to_string(), "type_3");
    }

    #[test]
    fn ids_order_by_index() {
        assert!(NodeId::new(1) < NodeId::new(2));
    }
}
