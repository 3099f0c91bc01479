//! # apex-core
//!
//! Pattern data model, validation, trust math, error taxonomy, configuration,
//! and the SQLite-backed pattern store for the APEX Pattern Lookup Core.

pub mod config;
pub mod errors;
pub mod model;
pub mod store;
pub mod validate;

pub use errors::{ApexError, ApexResult};
pub use model::{Pattern, PatternKind, Resource};
