//! vsop-schema
//!
//! Schema-tolerant column resolution.
//!
//! Source tables drift: headers get renamed, translated, duplicated, or
//! dropped. Downstream code reads by [`LogicalField`]; this crate maps each
//! field to an actual column through an ordered rule chain and, when nothing
//! matches, adds a virtual column filled with the field's fallback so lookups
//! never fail.
//!
//! Pure logic over [`vsop_table::RawTable`]. No IO.

mod config;
mod field;
mod resolver;
mod rules;

pub use config::{
    FieldSpec, SchemaConfig, SchemaConfigError, DEFAULT_DO_NOT_MATCH_MARKERS,
    DEFAULT_VIRTUAL_SUFFIX,
};
pub use field::LogicalField;
pub use resolver::{resolve_table, ResolvedColumn, ResolvedColumns, Resolver};
pub use rules::{MatchRule, DEFAULT_CHAIN};
