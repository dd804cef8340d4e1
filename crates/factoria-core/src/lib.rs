//! Core contracts for factoria.
//!
//! This crate defines the descriptor types exchanged between schema
//! providers, association scanners, the classification engine and the
//! output assembler, together with the schema snapshot format and the
//! model manifest types.

pub mod constraints;
pub mod descriptor;
pub mod error;
pub mod model;
pub mod redaction;
pub mod schema;
pub mod types;
pub mod validation;

pub use constraints::{Constraint, ForeignKey, PrimaryKey};
pub use descriptor::{
    AssociationSignal, ColumnDescriptor, DeclaredType, FactorySpec, GeneratorDescriptor,
    GeneratorKind,
};
pub use error::{Error, Result};
pub use model::{BelongsTo, ModelDefinition};
pub use redaction::redact_connection_string;
pub use schema::{Column, DatabaseSchema, Schema, Table, TableSchema, snapshot_json_schema};
pub use types::{ColumnType, EnumType, IdentityGeneration};
pub use validation::validate_snapshot;

/// Current contract version for `schema.json` snapshots.
pub const SNAPSHOT_VERSION: &str = "0.1";
