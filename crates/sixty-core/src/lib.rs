//! Core types shared by every SixtyFortran compiler crate.
//!
//! - [`Span`]: source positions carried by tree nodes and diagnostics
//! - [`ids`]: typed indices into the analyzer's arenas and the syntax tree
//! - [`SemanticError`] and [`Diagnostics`]: recoverable semantic errors and their collector
//! - [`names`]: reserved operator routine names and runtime library paths

pub mod diagnostics;
pub mod error;
pub mod ids;
pub mod names;
pub mod span;

pub use diagnostics::{Checkpoint, Diagnostics};
pub use error::SemanticError;
pub use ids::{NodeId, ScopeId, TypeId, UnitId};
pub use span::Span;
