//! Schema providers and column normalization.
//!
//! Providers load raw table metadata (live from Postgres or from a
//! `schema.json` snapshot); [`normalize`] turns it into the column
//! descriptors consumed by the classification engine.

pub mod normalize;
pub mod options;
pub mod postgres;
pub mod provider;
pub mod snapshot;

pub use normalize::{TypeOverrides, describe_columns, normalize_type};
pub use options::ProviderOptions;
pub use postgres::PostgresProvider;
pub use provider::{SchemaProvider, TableRef, introspect_tables};
pub use snapshot::SnapshotProvider;
