use std::path::Path;

use async_trait::async_trait;

use factoria_core::{DatabaseSchema, Error, Result, TableSchema, validate_snapshot};

use crate::provider::{SchemaProvider, TableRef};

/// Schema provider serving tables from a `schema.json` snapshot.
#[derive(Debug, Clone)]
pub struct SnapshotProvider {
    snapshot: DatabaseSchema,
}

impl SnapshotProvider {
    /// Wrap an in-memory snapshot after validating it.
    pub fn new(snapshot: DatabaseSchema) -> Result<Self> {
        validate_snapshot(&snapshot)?;
        Ok(Self { snapshot })
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let snapshot: DatabaseSchema = serde_json::from_str(&contents)?;
        tracing::debug!(
            event = "snapshot_loaded",
            path = %path.display(),
            schemas = snapshot.schemas.len(),
        );
        Self::new(snapshot)
    }
}

#[async_trait]
impl SchemaProvider for SnapshotProvider {
    fn engine(&self) -> &'static str {
        "snapshot"
    }

    async fn describe_table(&self, table_ref: &TableRef) -> Result<TableSchema> {
        let table = self
            .snapshot
            .find_table(&table_ref.schema, &table_ref.table)
            .ok_or_else(|| Error::NotFound(format!("table {table_ref}")))?;

        Ok(TableSchema {
            schema: table_ref.schema.clone(),
            enums: self.snapshot.enums_for(table),
            table: table.clone(),
        })
    }
}
